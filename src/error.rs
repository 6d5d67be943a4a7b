//! Error types for nexp library.

use std::io;
use thiserror::Error;

/// Result type alias for nexp operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while fetching and rendering Notion content.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be encoded or decoded.
    #[error("Configuration error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// URL could not be parsed.
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// The Notion API answered with a non-success status.
    #[error("Notion API error ({status} {code}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Notion error code, e.g. `object_not_found`
        code: String,
        /// Human readable message from the service
        message: String,
    },

    /// Retrieving a page failed.
    #[error("Failed getting Notion page ({id}): {source}")]
    PageFetch {
        /// Page id that was requested
        id: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Retrieving the children of a block failed.
    #[error("Failed getting children of block ({id}): {source}")]
    ChildrenFetch {
        /// Block id whose children were requested
        id: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Object is unknown to the content source.
    #[error("Object not found: {0}")]
    NotFound(String),

    /// No token was given explicitly, in the environment or in the config file.
    #[error("No Notion token found: pass one explicitly, set NOTION_TOKEN, or run `nexp login`")]
    MissingToken,

    /// The home directory could not be determined.
    #[error("Could not resolve home directory")]
    HomeDirUnavailable,

    /// The page reference does not contain a page id.
    #[error("Could not detect valid page id in {0}")]
    InvalidPageReference(String),

    /// No renderer exists for the requested format.
    #[error("No renderer support for format {0}")]
    UnsupportedFormat(String),

    /// Hosted image URL does not follow the expected layout.
    #[error("Invalid image URL: {0}")]
    InvalidImageUrl(String),

    /// Image download answered with something other than 200.
    #[error("Non 200 status code ({status}) returned when retrieving image {url}")]
    ImageDownload {
        /// Image URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Error during rendering.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Wrap a failure that happened while fetching page `id`.
    pub fn page_fetch(id: impl Into<String>, source: Error) -> Self {
        Error::PageFetch {
            id: id.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a failure that happened while fetching the children of `id`.
    pub fn children_fetch(id: impl Into<String>, source: Error) -> Self {
        Error::ChildrenFetch {
            id: id.into(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingToken;
        assert!(err.to_string().starts_with("No Notion token found"));

        let err = Error::ImageDownload {
            url: "https://example.com/a.png".to_string(),
            status: 403,
        };
        assert_eq!(
            err.to_string(),
            "Non 200 status code (403) returned when retrieving image https://example.com/a.png"
        );
    }

    #[test]
    fn test_fetch_wrappers_keep_source() {
        let err = Error::page_fetch("abc", Error::NotFound("abc".to_string()));
        assert_eq!(
            err.to_string(),
            "Failed getting Notion page (abc): Object not found: abc"
        );
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Object not found: abc"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
