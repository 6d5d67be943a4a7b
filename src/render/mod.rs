//! Rendering module for converting Notion blocks to text formats.
//!
//! A [`Renderer`] has one operation per block variant plus page header,
//! page footer, padding and inter-block separation. [`MarkdownRenderer`]
//! supplies the defaults; any operation can be replaced for a single call
//! through [`Overrides`] in [`RenderOptions`].

mod context;
mod markdown;
mod options;
mod overrides;
mod renderer;
mod text;

pub use context::{RenderContext, TableState};
pub use markdown::{resolve_language_for_code_block, MarkdownRenderer, DEFAULT_INDENT_WIDTH};
pub use options::{ImageSaveOptions, RenderOptions, DEFAULT_IMAGE_DIR};
pub use overrides::{
    BlockOverride, ImageOverride, Overrides, PageOverride, RowOverride, SeparationOverride,
    TextOverride,
};
pub use renderer::{RenderedBlock, Renderer, TableCell};
pub use text::compose_markdown;

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Output formats with a built-in renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Markdown
    #[default]
    Markdown,
}

impl Format {
    /// Default renderer for this format.
    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            Format::Markdown => Box::new(MarkdownRenderer::new()),
        }
    }

    /// Canonical name.
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Markdown => "markdown",
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markdown" | "md" => Ok(Format::Markdown),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
