//! # nexp
//!
//! Export Notion pages to Markdown.
//!
//! A page's block tree is fetched from a content source (the Notion API or
//! an in-memory store), walked depth-first in document order and rendered
//! block by block. Rendering is pluggable: implement [`render::Renderer`]
//! for a new format, or replace single steps of the Markdown renderer with
//! [`render::Overrides`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use nexp::{Exporter, RenderOptions};
//!
//! fn main() -> nexp::Result<()> {
//!     // Token from NOTION_TOKEN or ~/.config/nexp.yaml
//!     let exporter = Exporter::builder().build()?;
//!
//!     let options = RenderOptions::new()
//!         .with_image_dir("assets")
//!         .with_skip_empty_paragraphs(true);
//!     let markdown = exporter.render("de4d2477f3214ec98614fd46a4e1487f", &options)?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Offline rendering
//!
//! ```
//! use nexp::model::{Block, BlockKind, Page, TextBlock};
//! use nexp::source::MemorySource;
//! use nexp::{Exporter, RenderOptions};
//!
//! let mut source = MemorySource::new();
//! source.add_page(Page::new("p1", "Notes"));
//! source.add_children(
//!     "p1",
//!     vec![Block::new("b1", BlockKind::Paragraph(TextBlock::plain("hello")))],
//! );
//!
//! let markdown = Exporter::with_source(source).render("p1", &RenderOptions::new())?;
//! assert_eq!(markdown, "# Notes\n\nhello");
//! # Ok::<(), nexp::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Markdown output**: headings, lists, to-dos, quotes, code, tables, images
//! - **Nesting**: child blocks indented by depth
//! - **Overrides**: replace any rendering step per call
//! - **Images**: hosted images saved locally, external images linked

pub mod config;
pub mod error;
pub mod export;
pub mod images;
pub mod model;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use config::{resolve_token, NexpConfig};
pub use error::{Error, Result};
pub use export::{Exporter, ExporterBuilder};
pub use images::{HttpImageStore, ImageStore};
pub use model::{extract_page_id, Block, BlockKind, BlockType, Page, RichText};
pub use render::{
    Format, ImageSaveOptions, MarkdownRenderer, Overrides, RenderOptions, Renderer,
};
pub use source::{ContentSource, MemorySource, NotionClient};

/// Export a page to Markdown using the resolved token.
///
/// `page` may be a bare page id or a Notion URL ending in one.
///
/// # Example
///
/// ```no_run
/// use nexp::{export_page, RenderOptions};
///
/// let markdown = export_page(
///     "https://www.notion.so/team/Climbing-de4d2477f3214ec98614fd46a4e1487f",
///     &RenderOptions::default(),
/// )
/// .unwrap();
/// std::fs::write("climbing.md", markdown).unwrap();
/// ```
pub fn export_page(page: &str, options: &RenderOptions) -> Result<String> {
    let page_id = extract_page_id(page)?;
    Exporter::builder().build()?.render(&page_id, options)
}
