//! The rendering contract implemented by output formats.

use crate::error::Result;
use crate::model::{Block, BlockType, Page, RichText};

use super::context::TableState;
use super::overrides::{
    BlockOverride, ImageOverride, PageOverride, RowOverride, SeparationOverride, TextOverride,
};
use super::RenderOptions;

/// A block handed to a renderer, with its text already styled.
#[derive(Debug, Clone)]
pub struct RenderedBlock<'a> {
    /// Output of [`Renderer::render_text`] for the block's rich text. For
    /// padding this is the block's rendered output.
    pub text: String,

    /// The source block; match on `block.kind` for variant fields.
    pub block: &'a Block,

    /// Nesting depth (root children are 0)
    pub depth: usize,

    /// The page being exported, for metadata-dependent rendering
    pub page: &'a Page,

    /// Options of the current render call
    pub options: &'a RenderOptions,
}

/// One rendered cell of a table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    /// Styled cell text
    pub text: String,

    /// The table declares row headers and this is its first row
    pub is_row_header: bool,

    /// The table declares column headers and this is the row's first cell
    pub is_column_header: bool,

    /// Position of the cell within its row
    pub column: usize,

    /// State of the enclosing table when the row was rendered
    pub table: TableState,
}

/// Trait translating Notion blocks into a text representation.
///
/// Every operation takes an optional override. When one is given it
/// replaces the default body entirely; the default logic does not run first.
pub trait Renderer: Send + Sync {
    /// Text placed above the page's blocks.
    fn render_page_header(&self, page: &Page, o: Option<&PageOverride>) -> String;

    /// Text placed below the page's blocks.
    fn render_page_footer(&self, page: &Page, o: Option<&PageOverride>) -> String;

    /// Compose styled runs into a flat string. Empty input yields "".
    fn render_text(&self, runs: &[RichText], o: Option<&TextOverride>) -> String;

    fn render_heading_1(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String;
    fn render_heading_2(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String;
    fn render_heading_3(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String;
    fn render_paragraph(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String;
    fn render_bulleted_list_item(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>)
        -> String;
    fn render_numbered_list_item(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>)
        -> String;

    /// Must only be called for to-do blocks.
    fn render_todo(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String;

    fn render_quote(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String;
    fn render_callout(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String;

    /// Must only be called for code blocks.
    fn render_code(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String;

    fn render_divider(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String;

    /// Reference an image, persisting hosted images locally as needed.
    fn render_image(&self, b: &RenderedBlock<'_>, o: Option<&ImageOverride>) -> Result<String>;

    /// Render one table row from its cells.
    fn render_table_row(&self, cells: &[TableCell], o: Option<&RowOverride>) -> String;

    /// Indent every line of `b.text` according to `b.depth`.
    ///
    /// ```text
    /// * list item one      <-- depth: 0
    ///     * list item two  <-- depth: 1
    ///         > quote      <-- depth: 2
    /// ```
    fn add_padding(&self, b: &RenderedBlock<'_>, o: Option<&BlockOverride>) -> String;

    /// Separator emitted before a block of type `current` that follows a
    /// sibling of type `previous` (`None` at the start of a run).
    fn section_separation(
        &self,
        previous: Option<BlockType>,
        current: BlockType,
        o: Option<&SeparationOverride>,
    ) -> String;
}
