//! Markdown rendering for Notion blocks.

use std::fmt;
use std::sync::Arc;

use log::warn;

use crate::error::{Error, Result};
use crate::images::{HttpImageStore, ImageStore};
use crate::model::{plain_text, BlockKind, BlockType, FileSource, Page, RichText};

use super::overrides::{
    BlockOverride, ImageOverride, PageOverride, RowOverride, SeparationOverride, TextOverride,
};
use super::text::compose_markdown;
use super::{RenderedBlock, Renderer, TableCell};

/// Spaces of indentation per nesting level.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

const CODE_FENCE: &str = "```";
const DIVIDER: &str = "---";
const TODO_UNCHECKED: &str = "* [ ] ";
const TODO_CHECKED: &str = "* [x] ";

/// Notion language names and their Markdown equivalents.
const LANGUAGES: &[(&str, &str)] = &[
    ("c++", "cpp"),
    ("c#", "csharp"),
    ("f#", "fsharp"),
    ("plain text", "txt"),
];

/// Markdown renderer.
#[derive(Clone)]
pub struct MarkdownRenderer {
    indent_width: usize,
    images: Arc<dyn ImageStore>,
}

impl MarkdownRenderer {
    /// Create a renderer saving hosted images over HTTP.
    pub fn new() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            images: Arc::new(HttpImageStore::default()),
        }
    }

    /// Set the number of spaces per nesting level.
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Use another image store.
    pub fn with_image_store(mut self, store: Arc<dyn ImageStore>) -> Self {
        self.images = store;
        self
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MarkdownRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkdownRenderer")
            .field("indent_width", &self.indent_width)
            .finish_non_exhaustive()
    }
}

impl Renderer for MarkdownRenderer {
    fn render_page_header(&self, page: &Page, o: Option<&PageOverride>) -> String {
        if let Some(f) = o {
            return f(page);
        }
        format!("# {}", page.title())
    }

    fn render_page_footer(&self, page: &Page, o: Option<&PageOverride>) -> String {
        if let Some(f) = o {
            return f(page);
        }
        String::new()
    }

    fn render_text(&self, runs: &[RichText], o: Option<&TextOverride>) -> String {
        if let Some(f) = o {
            return f(runs);
        }
        compose_markdown(runs)
    }

    fn render_heading_1(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String {
        if let Some(f) = o {
            return f(b);
        }
        format!("# {}", b.text)
    }

    fn render_heading_2(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String {
        if let Some(f) = o {
            return f(b);
        }
        format!("## {}", b.text)
    }

    fn render_heading_3(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String {
        if let Some(f) = o {
            return f(b);
        }
        format!("### {}", b.text)
    }

    fn render_paragraph(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String {
        if let Some(f) = o {
            return f(b);
        }
        b.text.clone()
    }

    fn render_bulleted_list_item(
        &self,
        b: &RenderedBlock<'_>,
        o: Option<&BlockOverride>,
    ) -> String {
        if let Some(f) = o {
            return f(b);
        }
        format!("* {}", b.text)
    }

    fn render_numbered_list_item(
        &self,
        b: &RenderedBlock<'_>,
        o: Option<&BlockOverride>,
    ) -> String {
        if let Some(f) = o {
            return f(b);
        }
        format!("1. {}", b.text)
    }

    fn render_todo(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String {
        if let Some(f) = o {
            return f(b);
        }
        let checked = match &b.block.kind {
            BlockKind::ToDo(todo) => todo.checked,
            other => {
                debug_assert!(false, "render_todo called for {}", other.block_type());
                false
            }
        };
        let marker = if checked { TODO_CHECKED } else { TODO_UNCHECKED };
        format!("{}{}", marker, b.text)
    }

    fn render_quote(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String {
        if let Some(f) = o {
            return f(b);
        }
        format!("> {}", b.text)
    }

    fn render_callout(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String {
        if let Some(f) = o {
            return f(b);
        }
        // Markdown has no callout; render as a quote.
        format!("> {}", b.text)
    }

    fn render_code(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String {
        if let Some(f) = o {
            return f(b);
        }
        let language = match &b.block.kind {
            BlockKind::Code(code) => resolve_language_for_code_block(&code.language),
            other => {
                debug_assert!(false, "render_code called for {}", other.block_type());
                ""
            }
        };
        format!("{}{}\n{}\n{}", CODE_FENCE, language, b.text, CODE_FENCE)
    }

    fn render_divider(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String {
        if let Some(f) = o {
            return f(b);
        }
        DIVIDER.to_string()
    }

    fn render_image(&self, b: &RenderedBlock<'_>, o: Option<&ImageOverride>) -> Result<String> {
        if let Some(f) = o {
            return f(b);
        }
        let image = match &b.block.kind {
            BlockKind::Image(image) => image,
            other => {
                return Err(Error::Render(format!(
                    "render_image was passed a {} block",
                    other.block_type()
                )))
            }
        };

        let caption = plain_text(&image.caption);
        let alt = if caption.is_empty() { "image" } else { &caption };

        match &image.source {
            FileSource::External { external } => Ok(format!("![{}]({})", alt, external.url)),
            FileSource::File { file } => {
                let path = self
                    .images
                    .save_remote_image(&file.url, &b.options.images)?;
                Ok(format!("![{}]({})", alt, path.display()))
            }
            FileSource::Unsupported => {
                warn!("Image {} has an unsupported source", b.block.id);
                Ok(String::new())
            }
        }
    }

    fn render_table_row(&self, cells: &[TableCell], o: Option<&RowOverride>) -> String {
        if let Some(f) = o {
            return f(cells);
        }
        let mut row = String::new();
        for cell in cells {
            row.push_str("| ");
            row.push_str(&cell.text);
            row.push(' ');
        }
        row.push('|');

        if cells.first().is_some_and(|c| c.is_row_header) {
            row.push('\n');
            for _ in cells {
                row.push_str("| --- ");
            }
            row.push('|');
        }
        row
    }

    fn add_padding(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String {
        if let Some(f) = o {
            return f(b);
        }
        if b.depth == 0 || b.text.is_empty() {
            return b.text.clone();
        }
        let padding = " ".repeat(b.depth * self.indent_width);
        let mut padded = padding.clone();
        padded.push_str(&b.text.replace('\n', &format!("\n{}", padding)));
        padded
    }

    fn section_separation(
        &self,
        previous: Option<BlockType>,
        current: BlockType,
        o: Option<&SeparationOverride>,
    ) -> String {
        if let Some(f) = o {
            return f(previous, current);
        }
        if previous == Some(current) && current.groups_tightly() {
            "\n".to_string()
        } else if current.is_renderable() {
            "\n\n".to_string()
        } else {
            String::new()
        }
    }
}

/// Map a Notion code language to the name Markdown tools expect.
///
/// Unknown names pass through unchanged.
pub fn resolve_language_for_code_block(language: &str) -> &str {
    LANGUAGES
        .iter()
        .find(|(notion, _)| *notion == language)
        .map_or(language, |(_, markdown)| *markdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, CodeBlock, ImageBlock, TextBlock, ToDoBlock};
    use crate::render::{ImageSaveOptions, RenderOptions, TableState};
    use std::path::PathBuf;
    use std::sync::Mutex;

    fn rendered<'a>(
        text: &str,
        block: &'a Block,
        depth: usize,
        page: &'a Page,
        options: &'a RenderOptions,
    ) -> RenderedBlock<'a> {
        RenderedBlock {
            text: text.to_string(),
            block,
            depth,
            page,
            options,
        }
    }

    /// Records requested URLs instead of downloading.
    #[derive(Default)]
    struct RecordingStore {
        urls: Mutex<Vec<String>>,
    }

    impl ImageStore for RecordingStore {
        fn save_remote_image(&self, url: &str, options: &ImageSaveOptions) -> Result<PathBuf> {
            self.urls.lock().unwrap().push(url.to_string());
            Ok(options.save_dir().join("asset.png"))
        }
    }

    #[test]
    fn test_headings_and_lists() {
        let r = MarkdownRenderer::new();
        let page = Page::new("p", "Notes");
        let options = RenderOptions::default();
        let block = Block::new("b", BlockKind::Paragraph(TextBlock::plain("x")));
        let b = rendered("Title", &block, 0, &page, &options);

        assert_eq!(r.render_heading_1(&b, None), "# Title");
        assert_eq!(r.render_heading_2(&b, None), "## Title");
        assert_eq!(r.render_heading_3(&b, None), "### Title");
        assert_eq!(r.render_paragraph(&b, None), "Title");
        assert_eq!(r.render_bulleted_list_item(&b, None), "* Title");
        assert_eq!(r.render_numbered_list_item(&b, None), "1. Title");
        assert_eq!(r.render_quote(&b, None), "> Title");
        assert_eq!(r.render_callout(&b, None), "> Title");
        assert_eq!(r.render_divider(&b, None), "---");
    }

    #[test]
    fn test_page_header_and_footer() {
        let r = MarkdownRenderer::new();
        let page = Page::new("p", "Notes");
        assert_eq!(r.render_page_header(&page, None), "# Notes");
        assert_eq!(r.render_page_footer(&page, None), "");
        assert_eq!(r.render_page_header(&Page::default(), None), "# ");
    }

    #[test]
    fn test_todo_markers() {
        let r = MarkdownRenderer::new();
        let page = Page::default();
        let options = RenderOptions::default();
        let open = Block::new("a", BlockKind::ToDo(ToDoBlock::default()));
        let done = Block::new(
            "b",
            BlockKind::ToDo(ToDoBlock {
                rich_text: Vec::new(),
                checked: true,
            }),
        );
        assert_eq!(
            r.render_todo(&rendered("buy milk", &open, 0, &page, &options), None),
            "* [ ] buy milk"
        );
        assert_eq!(
            r.render_todo(&rendered("buy milk", &done, 0, &page, &options), None),
            "* [x] buy milk"
        );
    }

    #[test]
    fn test_code_block_language() {
        let r = MarkdownRenderer::new();
        let page = Page::default();
        let options = RenderOptions::default();
        let block = Block::new(
            "c",
            BlockKind::Code(CodeBlock {
                language: "c++".to_string(),
                ..Default::default()
            }),
        );
        let out = r.render_code(
            &rendered("int main() {\n}", &block, 0, &page, &options),
            None,
        );
        assert_eq!(out, "```cpp\nint main() {\n}\n```");
    }

    #[test]
    fn test_language_table() {
        assert_eq!(resolve_language_for_code_block("c#"), "csharp");
        assert_eq!(resolve_language_for_code_block("f#"), "fsharp");
        assert_eq!(resolve_language_for_code_block("plain text"), "txt");
        assert_eq!(resolve_language_for_code_block("rust"), "rust");
        assert_eq!(resolve_language_for_code_block(""), "");
    }

    #[test]
    fn test_external_image_links_directly() {
        let store = Arc::new(RecordingStore::default());
        let r = MarkdownRenderer::new().with_image_store(store.clone());
        let page = Page::default();
        let options = RenderOptions::default();
        let block = Block::new(
            "i",
            BlockKind::Image(ImageBlock::external("https://example.com/cat.png")),
        );
        let out = r
            .render_image(&rendered("", &block, 0, &page, &options), None)
            .unwrap();
        assert_eq!(out, "![image](https://example.com/cat.png)");
        assert!(store.urls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_hosted_image_uses_store_and_caption() {
        let store = Arc::new(RecordingStore::default());
        let r = MarkdownRenderer::new().with_image_store(store.clone());
        let page = Page::default();
        let options = RenderOptions::new().with_image_dir("assets");
        let mut image = ImageBlock::hosted("https://files.example.com/bucket/id/a.png");
        image.caption = vec![RichText::plain("A cat")];
        let block = Block::new("i", BlockKind::Image(image));

        let out = r
            .render_image(&rendered("", &block, 0, &page, &options), None)
            .unwrap();
        let expected = format!("![A cat]({})", PathBuf::from("assets").join("asset.png").display());
        assert_eq!(out, expected);
        assert_eq!(store.urls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unsupported_image_source_renders_nothing() {
        let store = Arc::new(RecordingStore::default());
        let r = MarkdownRenderer::new().with_image_store(store.clone());
        let page = Page::default();
        let options = RenderOptions::default();
        let block = Block::new(
            "i",
            BlockKind::Image(ImageBlock {
                caption: vec![RichText::plain("upload")],
                source: FileSource::Unsupported,
            }),
        );
        let out = r
            .render_image(&rendered("", &block, 0, &page, &options), None)
            .unwrap();
        assert_eq!(out, "");
        assert!(store.urls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_image_on_wrong_block_is_error() {
        let r = MarkdownRenderer::new();
        let page = Page::default();
        let options = RenderOptions::default();
        let block = Block::new("d", BlockKind::Divider);
        let err = r
            .render_image(&rendered("", &block, 0, &page, &options), None)
            .unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }

    fn cells(values: &[&str], state: TableState) -> Vec<TableCell> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| TableCell {
                text: v.to_string(),
                is_row_header: state.is_header_row(),
                is_column_header: state.has_column_header && i == 0,
                column: i,
                table: state,
            })
            .collect()
    }

    #[test]
    fn test_table_row_with_header_separator() {
        let r = MarkdownRenderer::new();
        let mut state = TableState {
            has_row_header: true,
            table_width: 2,
            ..Default::default()
        };
        assert_eq!(
            r.render_table_row(&cells(&["a", "b"], state), None),
            "| a | b |\n| --- | --- |"
        );
        state.current_row = 1;
        assert_eq!(r.render_table_row(&cells(&["c", "d"], state), None), "| c | d |");
    }

    #[test]
    fn test_table_row_without_header() {
        let r = MarkdownRenderer::new();
        let state = TableState::default();
        assert_eq!(r.render_table_row(&cells(&["a"], state), None), "| a |");
    }

    #[test]
    fn test_padding_every_line() {
        let r = MarkdownRenderer::new();
        let page = Page::default();
        let options = RenderOptions::default();
        let block = Block::new("c", BlockKind::Code(CodeBlock::default()));

        let b = rendered("```\nline\n```", &block, 2, &page, &options);
        assert_eq!(
            r.add_padding(&b, None),
            "        ```\n        line\n        ```"
        );

        let root = rendered("text\nmore", &block, 0, &page, &options);
        assert_eq!(r.add_padding(&root, None), "text\nmore");

        let empty = rendered("", &block, 3, &page, &options);
        assert_eq!(r.add_padding(&empty, None), "");

        let narrow = MarkdownRenderer::new().with_indent_width(2);
        let b = rendered("* x", &block, 1, &page, &options);
        assert_eq!(narrow.add_padding(&b, None), "  * x");
    }

    #[test]
    fn test_separation_is_total() {
        let r = MarkdownRenderer::new();
        let mut prev: Vec<Option<BlockType>> = vec![None];
        prev.extend(BlockType::ALL.iter().copied().map(Some));

        for p in &prev {
            for c in BlockType::ALL {
                let sep = r.section_separation(*p, c, None);
                assert!(
                    sep.is_empty() || sep == "\n" || sep == "\n\n",
                    "unexpected separator {:?} for {:?} -> {:?}",
                    sep,
                    p,
                    c
                );
                if *p == Some(c) && c.groups_tightly() {
                    assert_eq!(sep, "\n");
                }
                if !c.is_renderable() {
                    assert_eq!(sep, "");
                }
            }
        }
    }

    #[test]
    fn test_separation_cases() {
        let r = MarkdownRenderer::new();
        use BlockType::*;
        assert_eq!(r.section_separation(Some(ToDo), ToDo, None), "\n");
        assert_eq!(r.section_separation(Some(TableRow), TableRow, None), "\n");
        assert_eq!(r.section_separation(Some(Paragraph), Paragraph, None), "\n\n");
        assert_eq!(
            r.section_separation(Some(BulletedListItem), NumberedListItem, None),
            "\n\n"
        );
        assert_eq!(r.section_separation(None, Heading1, None), "\n\n");
        assert_eq!(r.section_separation(Some(Paragraph), Table, None), "");
    }

    #[test]
    fn test_override_replaces_default() {
        let r = MarkdownRenderer::new();
        let page = Page::new("p", "Notes");
        let options = RenderOptions::default();
        let block = Block::new("d", BlockKind::Divider);
        let b = rendered("", &block, 0, &page, &options);

        let divider: BlockOverride = Arc::new(|_| "***".to_string());
        assert_eq!(r.render_divider(&b, Some(&divider)), "***");

        let header: PageOverride = Arc::new(|p| format!("title: {}", p.title()));
        assert_eq!(r.render_page_header(&page, Some(&header)), "title: Notes");

        let sep: SeparationOverride = Arc::new(|_, _| "\n---\n".to_string());
        assert_eq!(
            r.section_separation(None, BlockType::Paragraph, Some(&sep)),
            "\n---\n"
        );

        let text: TextOverride = Arc::new(|runs| plain_text(runs).to_uppercase());
        assert_eq!(r.render_text(&[RichText::bold("hi")], Some(&text)), "HI");
    }
}
