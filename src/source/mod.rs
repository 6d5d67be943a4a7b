//! Content sources that supply pages and block children.
//!
//! The exporter never talks to the network directly; it asks a
//! [`ContentSource`] for a page and, block by block, for children. Children
//! are paginated; [`ContentSource::fetch_all_children`] follows cursors until
//! the source reports no further results.

mod memory;
mod notion;

pub use memory::MemorySource;
pub use notion::{NotionClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, NOTION_VERSION, PAGE_SIZE};
pub(crate) use notion::USER_AGENT;

use serde::Deserialize;

use crate::error::Result;
use crate::model::{Block, Page};

/// One page of child blocks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChildrenPage {
    /// Blocks in this page, in document order
    #[serde(default)]
    pub results: Vec<Block>,

    /// Cursor for the next page
    #[serde(default)]
    pub next_cursor: Option<String>,

    /// Whether more results exist
    #[serde(default)]
    pub has_more: bool,
}

/// Trait for anything that can serve Notion pages and blocks.
pub trait ContentSource {
    /// Retrieve a page by id.
    fn fetch_page(&self, page_id: &str) -> Result<Page>;

    /// Retrieve one page of children of `block_id`, starting at `cursor`.
    fn fetch_children(&self, block_id: &str, cursor: Option<&str>) -> Result<ChildrenPage>;

    /// Retrieve every child of `block_id`, following pagination cursors.
    fn fetch_all_children(&self, block_id: &str) -> Result<Vec<Block>> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.fetch_children(block_id, cursor.as_deref())?;
            blocks.extend(page.results);

            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        Ok(blocks)
    }
}

impl<S: ContentSource + ?Sized> ContentSource for &S {
    fn fetch_page(&self, page_id: &str) -> Result<Page> {
        (**self).fetch_page(page_id)
    }

    fn fetch_children(&self, block_id: &str, cursor: Option<&str>) -> Result<ChildrenPage> {
        (**self).fetch_children(block_id, cursor)
    }
}
