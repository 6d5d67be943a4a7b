//! Document model types for Notion content.
//!
//! Pages, blocks and rich text as delivered by the content source. The
//! model is format-agnostic; renderers decide how each piece looks.

mod block;
mod page;
mod rich_text;

pub use block::{
    Block, BlockKind, BlockType, CalloutBlock, CodeBlock, ExternalFile, FileSource, HostedFile,
    ImageBlock, TableBlock, TableRowBlock, TextBlock, ToDoBlock,
};
pub use page::{extract_page_id, Page, Property};
pub use rich_text::{plain_text, Annotations, RichText, RunStyle};
