//! Block types.
//!
//! A [`Block`] is one node of a page's content tree. Its payload is a
//! [`BlockKind`] so renderers reach variant fields (checked state, code
//! language, table header flags) by matching rather than casting.

use std::fmt;

use chrono::{DateTime, Utc};
use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::RichText;

/// A single block fetched from the content source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawBlock")]
pub struct Block {
    /// Opaque id used to fetch children
    pub id: String,

    /// Whether the block has child blocks
    pub has_children: bool,

    /// Variant payload
    pub kind: BlockKind,
}

impl Block {
    /// Create a block without children.
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            has_children: false,
            kind,
        }
    }

    /// Mark the block as having children.
    pub fn with_children(mut self) -> Self {
        self.has_children = true;
        self
    }

    /// The variant discriminator.
    pub fn block_type(&self) -> BlockType {
        self.kind.block_type()
    }

    /// Rich text carried by the block, if the variant has a single text field.
    pub fn rich_text(&self) -> Option<&[RichText]> {
        match &self.kind {
            BlockKind::Heading1(b)
            | BlockKind::Heading2(b)
            | BlockKind::Heading3(b)
            | BlockKind::Paragraph(b)
            | BlockKind::BulletedListItem(b)
            | BlockKind::NumberedListItem(b)
            | BlockKind::Quote(b) => Some(&b.rich_text),
            BlockKind::ToDo(b) => Some(&b.rich_text),
            BlockKind::Callout(b) => Some(&b.rich_text),
            BlockKind::Code(b) => Some(&b.rich_text),
            BlockKind::Divider
            | BlockKind::Image(_)
            | BlockKind::Table(_)
            | BlockKind::TableRow(_)
            | BlockKind::Unsupported(_) => None,
        }
    }
}

/// Block payloads keyed by variant.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Heading1(TextBlock),
    Heading2(TextBlock),
    Heading3(TextBlock),
    Paragraph(TextBlock),
    BulletedListItem(TextBlock),
    NumberedListItem(TextBlock),
    ToDo(ToDoBlock),
    Quote(TextBlock),
    Callout(CalloutBlock),
    Code(CodeBlock),
    Divider,
    Image(ImageBlock),
    Table(TableBlock),
    TableRow(TableRowBlock),
    /// Any variant this crate does not render; holds the service's tag.
    Unsupported(String),
}

impl BlockKind {
    /// The variant discriminator.
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockKind::Heading1(_) => BlockType::Heading1,
            BlockKind::Heading2(_) => BlockType::Heading2,
            BlockKind::Heading3(_) => BlockType::Heading3,
            BlockKind::Paragraph(_) => BlockType::Paragraph,
            BlockKind::BulletedListItem(_) => BlockType::BulletedListItem,
            BlockKind::NumberedListItem(_) => BlockType::NumberedListItem,
            BlockKind::ToDo(_) => BlockType::ToDo,
            BlockKind::Quote(_) => BlockType::Quote,
            BlockKind::Callout(_) => BlockType::Callout,
            BlockKind::Code(_) => BlockType::Code,
            BlockKind::Divider => BlockType::Divider,
            BlockKind::Image(_) => BlockType::Image,
            BlockKind::Table(_) => BlockType::Table,
            BlockKind::TableRow(_) => BlockType::TableRow,
            BlockKind::Unsupported(_) => BlockType::Unsupported,
        }
    }
}

/// Variant tag of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    BulletedListItem,
    NumberedListItem,
    ToDo,
    Quote,
    Callout,
    Code,
    Divider,
    Image,
    Table,
    TableRow,
    Unsupported,
}

impl BlockType {
    /// Every tag, in declaration order.
    pub const ALL: [BlockType; 15] = [
        BlockType::Heading1,
        BlockType::Heading2,
        BlockType::Heading3,
        BlockType::Paragraph,
        BlockType::BulletedListItem,
        BlockType::NumberedListItem,
        BlockType::ToDo,
        BlockType::Quote,
        BlockType::Callout,
        BlockType::Code,
        BlockType::Divider,
        BlockType::Image,
        BlockType::Table,
        BlockType::TableRow,
        BlockType::Unsupported,
    ];

    /// The service's tag string.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Heading1 => "heading_1",
            BlockType::Heading2 => "heading_2",
            BlockType::Heading3 => "heading_3",
            BlockType::Paragraph => "paragraph",
            BlockType::BulletedListItem => "bulleted_list_item",
            BlockType::NumberedListItem => "numbered_list_item",
            BlockType::ToDo => "to_do",
            BlockType::Quote => "quote",
            BlockType::Callout => "callout",
            BlockType::Code => "code",
            BlockType::Divider => "divider",
            BlockType::Image => "image",
            BlockType::Table => "table",
            BlockType::TableRow => "table_row",
            BlockType::Unsupported => "unsupported",
        }
    }

    /// Whether a renderer produces standalone output for this tag.
    ///
    /// Tables only set up state for their rows; unsupported blocks render
    /// nothing.
    pub fn is_renderable(self) -> bool {
        !matches!(self, BlockType::Table | BlockType::Unsupported)
    }

    /// Whether consecutive siblings of this tag are grouped tightly.
    pub fn groups_tightly(self) -> bool {
        matches!(
            self,
            BlockType::TableRow
                | BlockType::ToDo
                | BlockType::NumberedListItem
                | BlockType::BulletedListItem
        )
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload shared by text-only variants (headings, paragraph, lists, quote).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub color: Option<String>,
}

impl TextBlock {
    /// Text block made of a single unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::from_runs(vec![RichText::plain(text)])
    }

    /// Text block from styled runs.
    pub fn from_runs(rich_text: Vec<RichText>) -> Self {
        Self {
            rich_text,
            color: None,
        }
    }
}

/// To-do list item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ToDoBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub checked: bool,
}

/// Callout. The icon is kept opaque.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CalloutBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub icon: Option<Value>,
}

/// Code block with the service's language name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CodeBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub caption: Vec<RichText>,
}

/// Image block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageBlock {
    #[serde(default)]
    pub caption: Vec<RichText>,
    #[serde(flatten)]
    pub source: FileSource,
}

impl ImageBlock {
    /// Image referenced from outside the service.
    pub fn external(url: impl Into<String>) -> Self {
        Self {
            caption: Vec::new(),
            source: FileSource::External {
                external: ExternalFile { url: url.into() },
            },
        }
    }

    /// Image uploaded to (and hosted by) the service.
    pub fn hosted(url: impl Into<String>) -> Self {
        Self {
            caption: Vec::new(),
            source: FileSource::File {
                file: HostedFile {
                    url: url.into(),
                    expiry_time: None,
                },
            },
        }
    }
}

/// Where an image lives.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileSource {
    /// Linked from an external URL
    External { external: ExternalFile },
    /// Hosted by the service behind a signed, expiring URL
    File { file: HostedFile },
    /// Any other source type (`file_upload`, ...); rendered as nothing
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExternalFile {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HostedFile {
    pub url: String,
    #[serde(default)]
    pub expiry_time: Option<DateTime<Utc>>,
}

/// Table header flags. Rows arrive as the table's children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TableBlock {
    #[serde(default)]
    pub table_width: usize,
    #[serde(default)]
    pub has_column_header: bool,
    #[serde(default)]
    pub has_row_header: bool,
}

/// One table row; each cell is a rich-text field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TableRowBlock {
    #[serde(default)]
    pub cells: Vec<Vec<RichText>>,
}

impl TableRowBlock {
    /// Row of unstyled cells.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self {
            cells: values
                .into_iter()
                .map(|v| vec![RichText::plain(v)])
                .collect(),
        }
    }
}

/// Wire shape: `{"id", "type", "has_children", "<type>": {payload}}`.
#[derive(Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    has_children: bool,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl From<RawBlock> for Block {
    fn from(mut raw: RawBlock) -> Self {
        let payload = raw
            .fields
            .remove(&raw.kind)
            .filter(|v| !v.is_null())
            .unwrap_or_else(|| Value::Object(Map::new()));

        // A malformed payload degrades to an unsupported block so its
        // siblings still render.
        let kind = decode_kind(&raw.kind, payload).unwrap_or_else(|e| {
            warn!("Block {} has an unreadable {} payload: {}", raw.id, raw.kind, e);
            BlockKind::Unsupported(raw.kind.clone())
        });

        Block {
            id: raw.id,
            has_children: raw.has_children,
            kind,
        }
    }
}

fn decode_kind(tag: &str, payload: Value) -> serde_json::Result<BlockKind> {
    Ok(match tag {
        "heading_1" => BlockKind::Heading1(serde_json::from_value(payload)?),
        "heading_2" => BlockKind::Heading2(serde_json::from_value(payload)?),
        "heading_3" => BlockKind::Heading3(serde_json::from_value(payload)?),
        "paragraph" => BlockKind::Paragraph(serde_json::from_value(payload)?),
        "bulleted_list_item" => BlockKind::BulletedListItem(serde_json::from_value(payload)?),
        "numbered_list_item" => BlockKind::NumberedListItem(serde_json::from_value(payload)?),
        "to_do" => BlockKind::ToDo(serde_json::from_value(payload)?),
        "quote" => BlockKind::Quote(serde_json::from_value(payload)?),
        "callout" => BlockKind::Callout(serde_json::from_value(payload)?),
        "code" => BlockKind::Code(serde_json::from_value(payload)?),
        "divider" => BlockKind::Divider,
        "image" => BlockKind::Image(serde_json::from_value(payload)?),
        "table" => BlockKind::Table(serde_json::from_value(payload)?),
        "table_row" => BlockKind::TableRow(serde_json::from_value(payload)?),
        other => BlockKind::Unsupported(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_paragraph() {
        let json = r#"{
            "object": "block",
            "id": "b1",
            "type": "paragraph",
            "has_children": true,
            "paragraph": {
                "rich_text": [{ "plain_text": "hello", "href": null }],
                "color": "default"
            }
        }"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.id, "b1");
        assert!(block.has_children);
        assert_eq!(block.block_type(), BlockType::Paragraph);
        assert_eq!(block.rich_text().unwrap()[0].plain_text, "hello");
    }

    #[test]
    fn test_deserialize_to_do_and_code() {
        let todo: Block = serde_json::from_str(
            r#"{"id":"t","type":"to_do","to_do":{"rich_text":[],"checked":true}}"#,
        )
        .unwrap();
        assert!(matches!(todo.kind, BlockKind::ToDo(ToDoBlock { checked: true, .. })));

        let code: Block = serde_json::from_str(
            r#"{"id":"c","type":"code","code":{"rich_text":[],"language":"c++","caption":[]}}"#,
        )
        .unwrap();
        match code.kind {
            BlockKind::Code(c) => assert_eq!(c.language, "c++"),
            other => panic!("Expected code block, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_images() {
        let external: Block = serde_json::from_str(
            r#"{"id":"i1","type":"image","image":{
                "caption":[],"type":"external",
                "external":{"url":"https://example.com/cat.jpg"}}}"#,
        )
        .unwrap();
        assert_eq!(
            external.kind,
            BlockKind::Image(ImageBlock::external("https://example.com/cat.jpg"))
        );

        let hosted: Block = serde_json::from_str(
            r#"{"id":"i2","type":"image","image":{
                "caption":[],"type":"file",
                "file":{"url":"https://s3.example.com/a/b/c.png","expiry_time":"2024-01-01T00:00:00.000Z"}}}"#,
        )
        .unwrap();
        match hosted.kind {
            BlockKind::Image(ImageBlock {
                source: FileSource::File { file },
                ..
            }) => {
                assert_eq!(file.url, "https://s3.example.com/a/b/c.png");
                assert!(file.expiry_time.is_some());
            }
            other => panic!("Expected hosted image, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_table_and_row() {
        let table: Block = serde_json::from_str(
            r#"{"id":"t","type":"table","has_children":true,"table":{
                "table_width":2,"has_column_header":false,"has_row_header":true}}"#,
        )
        .unwrap();
        assert_eq!(
            table.kind,
            BlockKind::Table(TableBlock {
                table_width: 2,
                has_column_header: false,
                has_row_header: true,
            })
        );

        let row: Block = serde_json::from_str(
            r#"{"id":"r","type":"table_row","table_row":{"cells":[[{"plain_text":"a"}],[]]}}"#,
        )
        .unwrap();
        match row.kind {
            BlockKind::TableRow(r) => assert_eq!(r.cells.len(), 2),
            other => panic!("Expected table row, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let block: Block = serde_json::from_str(
            r#"{"id":"x","type":"toggle","has_children":true,"toggle":{"rich_text":[]}}"#,
        )
        .unwrap();
        assert_eq!(block.kind, BlockKind::Unsupported("toggle".to_string()));
        assert_eq!(block.block_type(), BlockType::Unsupported);
        assert!(block.has_children);
    }

    #[test]
    fn test_divider_ignores_payload() {
        let block: Block =
            serde_json::from_str(r#"{"id":"d","type":"divider","divider":{}}"#).unwrap();
        assert_eq!(block.kind, BlockKind::Divider);
    }

    #[test]
    fn test_block_type_tags() {
        assert_eq!(BlockType::Heading1.to_string(), "heading_1");
        assert_eq!(BlockType::ToDo.as_str(), "to_do");
        assert!(!BlockType::Table.is_renderable());
        assert!(BlockType::TableRow.is_renderable());
        assert!(BlockType::ToDo.groups_tightly());
        assert!(!BlockType::Paragraph.groups_tightly());
    }

    #[test]
    fn test_unknown_image_source_keeps_siblings() {
        let page: crate::source::ChildrenPage = serde_json::from_str(
            r#"{"results":[
                {"id":"p","type":"paragraph","paragraph":{"rich_text":[{"plain_text":"before"}]}},
                {"id":"i","type":"image","image":{"caption":[],"type":"file_upload",
                    "file_upload":{"id":"43833259-72ae-404e-8441-b6577f3159b4"}}},
                {"id":"q","type":"quote","quote":{"rich_text":[{"plain_text":"after"}]}}
            ],"next_cursor":null,"has_more":false}"#,
        )
        .unwrap();

        assert_eq!(page.results.len(), 3);
        match &page.results[1].kind {
            BlockKind::Image(image) => assert_eq!(image.source, FileSource::Unsupported),
            other => panic!("Expected image block, got {:?}", other),
        }
        assert_eq!(page.results[2].block_type(), BlockType::Quote);
    }

    #[test]
    fn test_malformed_payload_is_unsupported() {
        let block: Block = serde_json::from_str(
            r#"{"id":"t","type":"to_do","has_children":true,"to_do":{"rich_text":"oops","checked":1}}"#,
        )
        .unwrap();
        assert_eq!(block.kind, BlockKind::Unsupported("to_do".to_string()));
        assert!(block.has_children);
    }
}
