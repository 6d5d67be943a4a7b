//! Traversal state threaded through recursive rendering.

use crate::model::{BlockType, Page, TableBlock};

use super::RenderOptions;

/// State of the table whose rows are currently being rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableState {
    /// The table marks its first row as a header
    pub has_row_header: bool,

    /// The table marks its first column as a header
    pub has_column_header: bool,

    /// Number of cells per row
    pub table_width: usize,

    /// Index of the next row to render
    pub current_row: usize,
}

impl TableState {
    /// Fresh state for a newly encountered table.
    pub fn new(table: &TableBlock) -> Self {
        Self {
            has_row_header: table.has_row_header,
            has_column_header: table.has_column_header,
            table_width: table.table_width,
            current_row: 0,
        }
    }

    /// Whether the row at `current_row` is a header row.
    pub fn is_header_row(&self) -> bool {
        self.has_row_header && self.current_row == 0
    }
}

/// Per-call render context. Copied, never shared, when descending.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Nesting depth, 0 for the page's direct children
    pub depth: usize,

    /// Tag of the previously rendered sibling
    pub previous: Option<BlockType>,

    /// Enclosing table, if any
    pub table: Option<TableState>,

    /// Page being exported
    pub page: &'a Page,

    /// Options of this render call
    pub options: &'a RenderOptions,
}

impl<'a> RenderContext<'a> {
    /// Context for the page's top-level blocks.
    pub fn root(page: &'a Page, options: &'a RenderOptions) -> Self {
        Self {
            depth: 0,
            previous: None,
            table: None,
            page,
            options,
        }
    }

    /// Context for the children of a block of type `parent`.
    ///
    /// Table rows stay at the table's depth.
    pub fn descend(&self, parent: BlockType) -> Self {
        let mut child = *self;
        if parent != BlockType::Table {
            child.depth += 1;
        }
        child
    }
}
