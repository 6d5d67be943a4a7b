//! In-memory content source.

use std::collections::HashMap;

use super::{ChildrenPage, ContentSource};
use crate::error::{Error, Result};
use crate::model::{Block, Page};

/// Content source backed by maps, paginating children like the remote API.
///
/// # Example
///
/// ```
/// use nexp::model::{Block, BlockKind, Page, TextBlock};
/// use nexp::source::{ContentSource, MemorySource};
///
/// let mut source = MemorySource::new().with_page_size(1);
/// source.add_page(Page::new("p1", "Notes"));
/// source.add_children(
///     "p1",
///     vec![
///         Block::new("a", BlockKind::Paragraph(TextBlock::plain("one"))),
///         Block::new("b", BlockKind::Paragraph(TextBlock::plain("two"))),
///     ],
/// );
///
/// assert_eq!(source.fetch_all_children("p1").unwrap().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    pages: HashMap<String, Page>,
    children: HashMap<String, Vec<Block>>,
    page_size: usize,
}

impl MemorySource {
    /// Create an empty source returning up to 100 children per request.
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            children: HashMap::new(),
            page_size: super::PAGE_SIZE as usize,
        }
    }

    /// Set how many children a single request returns.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Register a page.
    pub fn add_page(&mut self, page: Page) {
        self.pages.insert(page.id.clone(), page);
    }

    /// Append children under `parent_id` (a page or block id).
    pub fn add_children(&mut self, parent_id: impl Into<String>, blocks: Vec<Block>) {
        self.children
            .entry(parent_id.into())
            .or_default()
            .extend(blocks);
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentSource for MemorySource {
    fn fetch_page(&self, page_id: &str) -> Result<Page> {
        self.pages
            .get(page_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(page_id.to_string()))
    }

    fn fetch_children(&self, block_id: &str, cursor: Option<&str>) -> Result<ChildrenPage> {
        let all = self
            .children
            .get(block_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let start = match cursor {
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| Error::NotFound(format!("cursor {}", c)))?,
            None => 0,
        };
        let start = start.min(all.len());
        let end = (start + self.page_size).min(all.len());
        let has_more = end < all.len();

        Ok(ChildrenPage {
            results: all[start..end].to_vec(),
            next_cursor: has_more.then(|| end.to_string()),
            has_more,
        })
    }
}
