//! Per-operation overrides for customizing rendering.
//!
//! An override replaces one default rendering step for a single render
//! call without reimplementing the whole [`Renderer`](super::Renderer).
//! When an override is set, the default body of that step does not run.
//!
//! # Example
//!
//! ```
//! use nexp::render::{Overrides, RenderOptions};
//!
//! // Render dividers as a row of asterisks and drop page titles.
//! let overrides = Overrides::new()
//!     .with_divider(|_block| "***".to_string())
//!     .with_page_header(|_page| String::new());
//!
//! let options = RenderOptions::new().with_overrides(overrides);
//! assert!(options.overrides.divider.is_some());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::model::{BlockType, Page, RichText};

use super::{RenderedBlock, TableCell};

/// Replaces the rendering of a single block.
pub type BlockOverride = Arc<dyn Fn(&RenderedBlock<'_>) -> String + Send + Sync>;

/// Replaces image rendering; may fail like the default.
pub type ImageOverride = Arc<dyn Fn(&RenderedBlock<'_>) -> Result<String> + Send + Sync>;

/// Replaces page header or footer rendering.
pub type PageOverride = Arc<dyn Fn(&Page) -> String + Send + Sync>;

/// Replaces rich text composition for a whole run sequence.
pub type TextOverride = Arc<dyn Fn(&[RichText]) -> String + Send + Sync>;

/// Replaces table row rendering.
pub type RowOverride = Arc<dyn Fn(&[TableCell]) -> String + Send + Sync>;

/// Replaces the separator policy. Receives (previous, current).
pub type SeparationOverride = Arc<dyn Fn(Option<BlockType>, BlockType) -> String + Send + Sync>;

/// Set of optional overrides, one slot per rendering operation.
#[derive(Clone, Default)]
pub struct Overrides {
    pub page_header: Option<PageOverride>,
    pub page_footer: Option<PageOverride>,
    pub text: Option<TextOverride>,
    pub heading_1: Option<BlockOverride>,
    pub heading_2: Option<BlockOverride>,
    pub heading_3: Option<BlockOverride>,
    pub paragraph: Option<BlockOverride>,
    pub bulleted_list_item: Option<BlockOverride>,
    pub numbered_list_item: Option<BlockOverride>,
    pub to_do: Option<BlockOverride>,
    pub quote: Option<BlockOverride>,
    pub callout: Option<BlockOverride>,
    pub code: Option<BlockOverride>,
    pub divider: Option<BlockOverride>,
    pub image: Option<ImageOverride>,
    pub table_row: Option<RowOverride>,
    pub padding: Option<BlockOverride>,
    pub separation: Option<SeparationOverride>,
}

impl Overrides {
    /// Create an empty override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no override is set.
    pub fn is_empty(&self) -> bool {
        self.active().is_empty()
    }

    /// Override for the block renderer handling `block_type`, if any.
    ///
    /// Images and table rows have their own signatures and are not returned.
    pub fn for_block(&self, block_type: BlockType) -> Option<&BlockOverride> {
        match block_type {
            BlockType::Heading1 => self.heading_1.as_ref(),
            BlockType::Heading2 => self.heading_2.as_ref(),
            BlockType::Heading3 => self.heading_3.as_ref(),
            BlockType::Paragraph => self.paragraph.as_ref(),
            BlockType::BulletedListItem => self.bulleted_list_item.as_ref(),
            BlockType::NumberedListItem => self.numbered_list_item.as_ref(),
            BlockType::ToDo => self.to_do.as_ref(),
            BlockType::Quote => self.quote.as_ref(),
            BlockType::Callout => self.callout.as_ref(),
            BlockType::Code => self.code.as_ref(),
            BlockType::Divider => self.divider.as_ref(),
            BlockType::Image
            | BlockType::Table
            | BlockType::TableRow
            | BlockType::Unsupported => None,
        }
    }

    fn active(&self) -> Vec<&'static str> {
        let slots: [(&'static str, bool); 18] = [
            ("page_header", self.page_header.is_some()),
            ("page_footer", self.page_footer.is_some()),
            ("text", self.text.is_some()),
            ("heading_1", self.heading_1.is_some()),
            ("heading_2", self.heading_2.is_some()),
            ("heading_3", self.heading_3.is_some()),
            ("paragraph", self.paragraph.is_some()),
            ("bulleted_list_item", self.bulleted_list_item.is_some()),
            ("numbered_list_item", self.numbered_list_item.is_some()),
            ("to_do", self.to_do.is_some()),
            ("quote", self.quote.is_some()),
            ("callout", self.callout.is_some()),
            ("code", self.code.is_some()),
            ("divider", self.divider.is_some()),
            ("image", self.image.is_some()),
            ("table_row", self.table_row.is_some()),
            ("padding", self.padding.is_some()),
            ("separation", self.separation.is_some()),
        ];
        slots
            .into_iter()
            .filter(|(_, set)| *set)
            .map(|(name, _)| name)
            .collect()
    }

    /// Override the page header.
    pub fn with_page_header<F>(mut self, f: F) -> Self
    where
        F: Fn(&Page) -> String + Send + Sync + 'static,
    {
        self.page_header = Some(Arc::new(f));
        self
    }

    /// Override the page footer.
    pub fn with_page_footer<F>(mut self, f: F) -> Self
    where
        F: Fn(&Page) -> String + Send + Sync + 'static,
    {
        self.page_footer = Some(Arc::new(f));
        self
    }

    /// Override rich text composition.
    pub fn with_text<F>(mut self, f: F) -> Self
    where
        F: Fn(&[RichText]) -> String + Send + Sync + 'static,
    {
        self.text = Some(Arc::new(f));
        self
    }

    /// Override the renderer for one of the plain block variants.
    ///
    /// Variants without a block-shaped override (image, table, table row,
    /// unsupported) are ignored; use [`with_image`](Self::with_image) and
    /// [`with_table_row`](Self::with_table_row) for those.
    pub fn with_block<F>(mut self, block_type: BlockType, f: F) -> Self
    where
        F: Fn(&RenderedBlock<'_>) -> String + Send + Sync + 'static,
    {
        let f: BlockOverride = Arc::new(f);
        let slot = match block_type {
            BlockType::Heading1 => &mut self.heading_1,
            BlockType::Heading2 => &mut self.heading_2,
            BlockType::Heading3 => &mut self.heading_3,
            BlockType::Paragraph => &mut self.paragraph,
            BlockType::BulletedListItem => &mut self.bulleted_list_item,
            BlockType::NumberedListItem => &mut self.numbered_list_item,
            BlockType::ToDo => &mut self.to_do,
            BlockType::Quote => &mut self.quote,
            BlockType::Callout => &mut self.callout,
            BlockType::Code => &mut self.code,
            BlockType::Divider => &mut self.divider,
            BlockType::Image
            | BlockType::Table
            | BlockType::TableRow
            | BlockType::Unsupported => return self,
        };
        *slot = Some(f);
        self
    }

    /// Override paragraph rendering.
    pub fn with_paragraph<F>(self, f: F) -> Self
    where
        F: Fn(&RenderedBlock<'_>) -> String + Send + Sync + 'static,
    {
        self.with_block(BlockType::Paragraph, f)
    }

    /// Override divider rendering.
    pub fn with_divider<F>(self, f: F) -> Self
    where
        F: Fn(&RenderedBlock<'_>) -> String + Send + Sync + 'static,
    {
        self.with_block(BlockType::Divider, f)
    }

    /// Override code block rendering.
    pub fn with_code<F>(self, f: F) -> Self
    where
        F: Fn(&RenderedBlock<'_>) -> String + Send + Sync + 'static,
    {
        self.with_block(BlockType::Code, f)
    }

    /// Override image rendering.
    pub fn with_image<F>(mut self, f: F) -> Self
    where
        F: Fn(&RenderedBlock<'_>) -> Result<String> + Send + Sync + 'static,
    {
        self.image = Some(Arc::new(f));
        self
    }

    /// Override table row rendering.
    pub fn with_table_row<F>(mut self, f: F) -> Self
    where
        F: Fn(&[TableCell]) -> String + Send + Sync + 'static,
    {
        self.table_row = Some(Arc::new(f));
        self
    }

    /// Override depth padding.
    ///
    /// Runs for every visited block, including table markers and
    /// unsupported blocks whose rendering is empty.
    pub fn with_padding<F>(mut self, f: F) -> Self
    where
        F: Fn(&RenderedBlock<'_>) -> String + Send + Sync + 'static,
    {
        self.padding = Some(Arc::new(f));
        self
    }

    /// Override the separator policy.
    pub fn with_separation<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<BlockType>, BlockType) -> String + Send + Sync + 'static,
    {
        self.separation = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overrides")
            .field("active", &self.active())
            .finish()
    }
}
