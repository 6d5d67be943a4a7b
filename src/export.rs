//! Page export: walks a page's block tree and renders it.

use std::time::Duration;

use log::{debug, trace, warn};

use crate::config;
use crate::error::{Error, Result};
use crate::model::{Block, BlockKind, BlockType, TableRowBlock};
use crate::render::{
    Format, MarkdownRenderer, RenderContext, RenderOptions, RenderedBlock, Renderer, TableCell,
    TableState,
};
use crate::source::{ContentSource, NotionClient, DEFAULT_TIMEOUT};

/// Renders pages fetched from a content source.
///
/// Every call owns its output buffer and context; an exporter holds no
/// per-render state and can serve any number of calls.
pub struct Exporter<S> {
    source: S,
    renderer: Box<dyn Renderer>,
}

impl Exporter<NotionClient> {
    /// Builder for an exporter talking to the Notion API.
    pub fn builder() -> ExporterBuilder {
        ExporterBuilder::new()
    }
}

impl<S: ContentSource> Exporter<S> {
    /// Create an exporter from a source and a renderer.
    pub fn new(source: S, renderer: Box<dyn Renderer>) -> Self {
        Self { source, renderer }
    }

    /// Create a Markdown exporter over `source`.
    pub fn with_source(source: S) -> Self {
        Self::new(source, Box::new(MarkdownRenderer::new()))
    }

    /// The content source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The renderer.
    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    /// Render a page: header, every block in document order, then footer.
    ///
    /// Any fetch or image failure aborts the call; no partial output is
    /// returned.
    pub fn render(&self, page_id: &str, options: &RenderOptions) -> Result<String> {
        debug!("Rendering page {}", page_id);
        let page = self
            .source
            .fetch_page(page_id)
            .map_err(|e| Error::page_fetch(page_id, e))?;
        let overrides = &options.overrides;

        let mut output = self
            .renderer
            .render_page_header(&page, overrides.page_header.as_ref());
        output.push_str(&self.render_blocks(page_id, RenderContext::root(&page, options))?);
        output.push_str(
            &self
                .renderer
                .render_page_footer(&page, overrides.page_footer.as_ref()),
        );
        Ok(output)
    }

    /// Render a page's blocks onto an existing document.
    ///
    /// A blank line separates the existing content from the appended
    /// blocks. No header or footer is written. `buffer` is left untouched
    /// when rendering fails.
    pub fn render_append(
        &self,
        buffer: &mut String,
        page_id: &str,
        options: &RenderOptions,
    ) -> Result<()> {
        debug!("Appending page {}", page_id);
        let page = self
            .source
            .fetch_page(page_id)
            .map_err(|e| Error::page_fetch(page_id, e))?;
        let blocks = self.render_blocks(page_id, RenderContext::root(&page, options))?;

        buffer.push_str("\n\n");
        buffer.push_str(&blocks);
        Ok(())
    }

    fn render_blocks(&self, container_id: &str, mut ctx: RenderContext<'_>) -> Result<String> {
        let blocks = self
            .source
            .fetch_all_children(container_id)
            .map_err(|e| Error::children_fetch(container_id, e))?;
        debug!(
            "Rendering {} blocks of {} at depth {}",
            blocks.len(),
            container_id,
            ctx.depth
        );

        let options = ctx.options;
        let overrides = &options.overrides;
        let mut output = String::new();

        for block in &blocks {
            let block_type = block.block_type();

            let rendered = match &block.kind {
                BlockKind::Table(table) => {
                    ctx.table = Some(TableState::new(table));
                    String::new()
                }
                BlockKind::Paragraph(p)
                    if options.skip_empty_paragraphs && p.rich_text.is_empty() =>
                {
                    trace!("Skipping empty paragraph {}", block.id);
                    continue;
                }
                BlockKind::Image(_) if options.images.ignore_images => {
                    trace!("Skipping image {}", block.id);
                    continue;
                }
                BlockKind::TableRow(row) => self.render_row(row, &mut ctx),
                BlockKind::Unsupported(tag) => {
                    warn!("Block {} has unsupported type {}", block.id, tag);
                    String::new()
                }
                _ => self.render_block(block, &ctx)?,
            };

            let b = RenderedBlock {
                text: rendered,
                block,
                depth: ctx.depth,
                page: ctx.page,
                options,
            };
            let padded = self.renderer.add_padding(&b, overrides.padding.as_ref());

            output.push_str(&self.renderer.section_separation(
                ctx.previous,
                block_type,
                overrides.separation.as_ref(),
            ));
            output.push_str(&padded);
            ctx.previous = Some(block_type);

            if block.has_children {
                output.push_str(&self.render_blocks(&block.id, ctx.descend(block_type))?);
            }
        }

        Ok(output)
    }

    /// Render a block through the renderer operation for its variant.
    fn render_block(&self, block: &Block, ctx: &RenderContext<'_>) -> Result<String> {
        let overrides = &ctx.options.overrides;
        let r = self.renderer.as_ref();

        let text = block
            .rich_text()
            .map(|runs| r.render_text(runs, overrides.text.as_ref()))
            .unwrap_or_default();
        let b = RenderedBlock {
            text,
            block,
            depth: ctx.depth,
            page: ctx.page,
            options: ctx.options,
        };

        let o = overrides.for_block(block.block_type());
        let rendered = match block.block_type() {
            BlockType::Heading1 => r.render_heading_1(&b, o),
            BlockType::Heading2 => r.render_heading_2(&b, o),
            BlockType::Heading3 => r.render_heading_3(&b, o),
            BlockType::Paragraph => r.render_paragraph(&b, o),
            BlockType::BulletedListItem => r.render_bulleted_list_item(&b, o),
            BlockType::NumberedListItem => r.render_numbered_list_item(&b, o),
            BlockType::ToDo => r.render_todo(&b, o),
            BlockType::Quote => r.render_quote(&b, o),
            BlockType::Callout => r.render_callout(&b, o),
            BlockType::Code => r.render_code(&b, o),
            BlockType::Divider => r.render_divider(&b, o),
            BlockType::Image => r.render_image(&b, overrides.image.as_ref())?,
            BlockType::Table | BlockType::TableRow | BlockType::Unsupported => String::new(),
        };
        Ok(rendered)
    }

    /// Render one row and advance the table's row counter.
    fn render_row(&self, row: &TableRowBlock, ctx: &mut RenderContext<'_>) -> String {
        let options = ctx.options;
        let overrides = &options.overrides;
        let table = ctx.table.unwrap_or_else(|| {
            warn!("Table row rendered outside of a table");
            TableState::default()
        });

        let cells: Vec<TableCell> = row
            .cells
            .iter()
            .enumerate()
            .map(|(column, runs)| TableCell {
                text: self.renderer.render_text(runs, overrides.text.as_ref()),
                is_row_header: table.is_header_row(),
                is_column_header: table.has_column_header && column == 0,
                column,
                table,
            })
            .collect();
        let rendered = self
            .renderer
            .render_table_row(&cells, overrides.table_row.as_ref());

        ctx.table = Some(TableState {
            current_row: table.current_row + 1,
            ..table
        });
        rendered
    }
}

/// Builder for an [`Exporter`] backed by the Notion API.
///
/// # Example
///
/// ```no_run
/// use nexp::{Exporter, RenderOptions};
///
/// let exporter = Exporter::builder()
///     .token("secret_abc")
///     .format("md".parse()?)
///     .build()?;
/// let markdown = exporter.render("de4d2477f3214ec98614fd46a4e1487f", &RenderOptions::new())?;
/// # Ok::<(), nexp::Error>(())
/// ```
#[derive(Default)]
pub struct ExporterBuilder {
    token: Option<String>,
    format: Format,
    renderer: Option<Box<dyn Renderer>>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl ExporterBuilder {
    /// Create a builder with defaults (Markdown, token resolved at build time).
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this token instead of resolving one.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Output format; ignored when a renderer is set.
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Use a custom renderer.
    pub fn renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Override the API root.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Request timeout for API calls.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolve the token and build the exporter.
    pub fn build(self) -> Result<Exporter<NotionClient>> {
        let token = config::resolve_token(self.token.as_deref())?;
        let mut client =
            NotionClient::with_timeout(token, self.timeout.unwrap_or(DEFAULT_TIMEOUT))?;
        if let Some(base_url) = self.base_url {
            client = client.with_base_url(base_url);
        }
        let renderer = self.renderer.unwrap_or_else(|| self.format.renderer());
        Ok(Exporter::new(client, renderer))
    }
}
