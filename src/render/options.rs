//! Rendering options and configuration.

use std::path::{Path, PathBuf};

use super::Overrides;

/// Directory hosted images are saved to when none is configured.
pub const DEFAULT_IMAGE_DIR: &str = "images";

/// Options for a single render call.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// How image blocks are handled
    pub images: ImageSaveOptions,

    /// Per-operation overrides
    pub overrides: Overrides,

    /// Drop paragraphs whose rich text is empty
    pub skip_empty_paragraphs: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the image options.
    pub fn with_images(mut self, images: ImageSaveOptions) -> Self {
        self.images = images;
        self
    }

    /// Set the override set.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Enable or disable skipping of empty paragraphs.
    pub fn with_skip_empty_paragraphs(mut self, skip: bool) -> Self {
        self.skip_empty_paragraphs = skip;
        self
    }

    /// Set the directory hosted images are saved to.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.images.save_dir = dir.into();
        self
    }

    /// Leave images out of the output.
    pub fn with_ignore_images(mut self, ignore: bool) -> Self {
        self.images.ignore_images = ignore;
        self
    }

    /// Download images again even when a local copy exists.
    pub fn with_overwrite_existing(mut self, overwrite: bool) -> Self {
        self.images.overwrite_existing = overwrite;
        self
    }
}

/// How image blocks are handled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSaveOptions {
    /// Where hosted images are persisted; empty means [`DEFAULT_IMAGE_DIR`]
    pub save_dir: PathBuf,

    /// Omit image blocks from the output
    pub ignore_images: bool,

    /// Re-download images that already exist locally
    pub overwrite_existing: bool,
}

impl ImageSaveOptions {
    /// Options saving to `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: dir.into(),
            ..Default::default()
        }
    }

    /// Copy with defaults filled in.
    pub fn resolve(&self) -> Self {
        let mut resolved = self.clone();
        if resolved.save_dir.as_os_str().is_empty() {
            resolved.save_dir = PathBuf::from(DEFAULT_IMAGE_DIR);
        }
        resolved
    }

    /// Directory images end up in after defaults are applied.
    pub fn save_dir(&self) -> &Path {
        if self.save_dir.as_os_str().is_empty() {
            Path::new(DEFAULT_IMAGE_DIR)
        } else {
            &self.save_dir
        }
    }
}
