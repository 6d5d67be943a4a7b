//! Blocking HTTP client for the Notion REST API.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{ChildrenPage, ContentSource};
use crate::error::{Error, Result};
use crate::model::Page;

/// Public Notion API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

/// API version sent with every request.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Children requested per call (the API maximum).
pub const PAGE_SIZE: u32 = 100;

pub(crate) const USER_AGENT: &str = concat!("nexp/", env!("CARGO_PKG_VERSION"));

/// Error body returned by the API on failure.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Notion API client.
pub struct NotionClient {
    client: Client,
    base_url: String,
    token: String,
}

impl NotionClient {
    /// Create a client with the default timeout.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(token, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
        })
    }

    /// Point the client at another API root (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// API root in use.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .query(query)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let parsed: Option<ApiErrorBody> = serde_json::from_str(&body).ok();
            let (code, message) = match parsed {
                Some(e) => (e.code, e.message),
                None => (String::new(), body),
            };
            return Err(Error::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        Ok(response.json()?)
    }
}

impl ContentSource for NotionClient {
    fn fetch_page(&self, page_id: &str) -> Result<Page> {
        self.get(&format!("pages/{}", page_id), &[])
    }

    fn fetch_children(&self, block_id: &str, cursor: Option<&str>) -> Result<ChildrenPage> {
        let page_size = PAGE_SIZE.to_string();
        let mut query = vec![("page_size", page_size.as_str())];
        if let Some(cursor) = cursor {
            query.push(("start_cursor", cursor));
        }
        self.get(&format!("blocks/{}/children", block_id), &query)
    }
}
