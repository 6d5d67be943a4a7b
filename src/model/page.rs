//! Page-level types.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::RichText;
use crate::error::{Error, Result};

/// Root document of an export.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Page {
    /// Page id
    pub id: String,

    /// Public URL of the page
    #[serde(default)]
    pub url: String,

    /// Page properties keyed by name; exactly one has the "title" type
    #[serde(default)]
    pub properties: BTreeMap<String, Property>,

    /// Creation timestamp
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,

    /// Last edit timestamp
    #[serde(default)]
    pub last_edited_time: Option<DateTime<Utc>>,
}

impl Page {
    /// Create a page whose "title" property holds `title`.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert(
            "title".to_string(),
            Property::title(vec![RichText::plain(title)]),
        );
        Self {
            id: id.into(),
            properties,
            ..Default::default()
        }
    }

    /// Display title of the page.
    ///
    /// Plain text of the first run of the title property, or an empty string
    /// when the property is missing or empty.
    pub fn title(&self) -> &str {
        self.properties
            .values()
            .find(|p| p.is_title())
            .and_then(|p| p.title.first())
            .map(|run| run.plain_text.as_str())
            .unwrap_or("")
    }
}

/// A page property. Only the title is interpreted; everything else is kept
/// as raw JSON for header/footer overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Property {
    #[serde(default)]
    pub id: String,

    /// Property type, e.g. "title", "select", "date"
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Rich text of a title property
    #[serde(default)]
    pub title: Vec<RichText>,

    /// Remaining type-specific fields
    #[serde(flatten)]
    pub value: Map<String, Value>,
}

impl Property {
    /// Title property with the given runs.
    pub fn title(runs: Vec<RichText>) -> Self {
        Self {
            id: "title".to_string(),
            kind: "title".to_string(),
            title: runs,
            value: Map::new(),
        }
    }

    /// Whether this is the page's title property.
    pub fn is_title(&self) -> bool {
        self.kind == "title"
    }
}

// Compiled once on first use
static PAGE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]{32}$").unwrap());

/// Extract the bare 32 character page id from a raw id or a page URL.
///
/// `https://www.notion.so/joshrosso/Climbing-de4d2477f3214ec98614fd46a4e1487f`
/// yields `de4d2477f3214ec98614fd46a4e1487f`. Query strings and fragments are
/// ignored.
pub fn extract_page_id(reference: &str) -> Result<String> {
    let trimmed = reference.trim();
    let without_suffix = trimmed
        .split(['?', '#'])
        .next()
        .unwrap_or(trimmed)
        .trim_end_matches('/');

    PAGE_ID.find(without_suffix)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| Error::InvalidPageReference(reference.to_string()))
}
