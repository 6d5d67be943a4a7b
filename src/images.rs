//! Persistence of hosted images to the local filesystem.
//!
//! Images hosted by Notion sit behind signed URLs that expire, so the
//! Markdown renderer saves a local copy and references that instead.
//! External images are linked directly and never reach this module.

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use tempfile::NamedTempFile;
use url::Url;

use crate::error::{Error, Result};
use crate::render::ImageSaveOptions;
use crate::source::{DEFAULT_TIMEOUT, USER_AGENT};

/// Extension given to every saved image.
pub const IMAGE_EXTENSION: &str = "png";

/// Saves remote images and reports where they ended up.
pub trait ImageStore: Send + Sync {
    /// Persist the image at `url` according to `options`, returning its local path.
    fn save_remote_image(&self, url: &str, options: &ImageSaveOptions) -> Result<PathBuf>;
}

/// Store downloading images over HTTP.
///
/// One client is built on first download and reused for every later one.
#[derive(Debug, Clone)]
pub struct HttpImageStore {
    timeout: Duration,
    client: OnceLock<Client>,
}

impl HttpImageStore {
    /// Create a store with a custom download timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> Result<&Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()?;
        Ok(self.client.get_or_init(|| client))
    }
}

impl Default for HttpImageStore {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }
}

impl ImageStore for HttpImageStore {
    fn save_remote_image(&self, url: &str, options: &ImageSaveOptions) -> Result<PathBuf> {
        let dir = options.save_dir();
        fs::create_dir_all(dir)?;

        let path = dir.join(image_file_name(url)?);
        if path.exists() && !options.overwrite_existing {
            debug!("Image already saved at {}", path.display());
            return Ok(path);
        }

        debug!("Downloading image to {}", path.display());
        let mut response = self.client()?.get(url).send()?;
        if response.status() != StatusCode::OK {
            return Err(Error::ImageDownload {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        // Only a complete body may appear at `path`; the temp file is removed on drop.
        let mut file = NamedTempFile::new_in(dir)?;
        response.copy_to(&mut file)?;
        file.persist(&path).map_err(|e| e.error)?;
        Ok(path)
    }
}

/// Local file name for a hosted image.
///
/// Hosted URLs look like `https://host/<bucket>/<asset-id>/<name>`; the
/// asset id is stable across signed URLs and becomes the file name.
pub fn image_file_name(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    match parsed.path().split('/').nth(2) {
        Some(id) if !id.is_empty() => Ok(format!("{}.{}", id, IMAGE_EXTENSION)),
        _ => Err(Error::InvalidImageUrl(url.to_string())),
    }
}
