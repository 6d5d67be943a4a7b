//! Rich text runs and their annotations.

use serde::{Deserialize, Serialize};

/// A run of text with consistent styling.
///
/// A rich-text field is an ordered sequence of runs; rendering each run and
/// concatenating the results reconstructs the block's text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    /// The text content without any styling
    #[serde(default)]
    pub plain_text: String,

    /// Hyperlink target, if the run is a link
    #[serde(default)]
    pub href: Option<String>,

    /// Style flags
    #[serde(default)]
    pub annotations: Annotations,
}

impl RichText {
    /// Create an unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            ..Default::default()
        }
    }

    /// Create a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        let mut run = Self::plain(text);
        run.annotations.bold = true;
        run
    }

    /// Create an italic run.
    pub fn italic(text: impl Into<String>) -> Self {
        let mut run = Self::plain(text);
        run.annotations.italic = true;
        run
    }

    /// Create a strikethrough run.
    pub fn strikethrough(text: impl Into<String>) -> Self {
        let mut run = Self::plain(text);
        run.annotations.strikethrough = true;
        run
    }

    /// Create an inline-code run.
    pub fn code(text: impl Into<String>) -> Self {
        let mut run = Self::plain(text);
        run.annotations.code = true;
        run
    }

    /// Create a hyperlink run.
    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        let mut run = Self::plain(text);
        run.href = Some(href.into());
        run
    }

    /// The single style used to represent this run.
    ///
    /// Precedence is hyperlink > bold > italic > strikethrough > inline code
    /// > plain. Flags are never composed.
    pub fn style(&self) -> RunStyle<'_> {
        let a = &self.annotations;
        match self.href.as_deref() {
            Some(href) if !href.is_empty() => RunStyle::Link(href),
            _ if a.bold => RunStyle::Bold,
            _ if a.italic => RunStyle::Italic,
            _ if a.strikethrough => RunStyle::Strikethrough,
            _ if a.code => RunStyle::Code,
            _ => RunStyle::Plain,
        }
    }
}

/// Concatenated plain text of a rich-text field.
pub fn plain_text(runs: &[RichText]) -> String {
    runs.iter().map(|r| r.plain_text.as_str()).collect()
}

/// Style flags attached to a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    /// Bold text
    #[serde(default)]
    pub bold: bool,

    /// Italic text
    #[serde(default)]
    pub italic: bool,

    /// Strikethrough text
    #[serde(default)]
    pub strikethrough: bool,

    /// Underlined text (no Markdown form)
    #[serde(default)]
    pub underline: bool,

    /// Inline code
    #[serde(default)]
    pub code: bool,

    /// Notion color name, e.g. "default" or "red_background"
    #[serde(default)]
    pub color: Option<String>,
}

/// The representation chosen for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStyle<'a> {
    /// Hyperlink to the contained target
    Link(&'a str),
    /// Bold
    Bold,
    /// Italic
    Italic,
    /// Strikethrough
    Strikethrough,
    /// Inline code
    Code,
    /// No styling
    Plain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_wins_over_bold() {
        let mut run = RichText::link("docs", "https://example.com");
        run.annotations.bold = true;
        assert_eq!(run.style(), RunStyle::Link("https://example.com"));
    }

    #[test]
    fn test_style_precedence_chain() {
        let mut run = RichText::plain("x");
        run.annotations.code = true;
        assert_eq!(run.style(), RunStyle::Code);
        run.annotations.strikethrough = true;
        assert_eq!(run.style(), RunStyle::Strikethrough);
        run.annotations.italic = true;
        assert_eq!(run.style(), RunStyle::Italic);
        run.annotations.bold = true;
        assert_eq!(run.style(), RunStyle::Bold);
    }

    #[test]
    fn test_empty_href_is_not_a_link() {
        let mut run = RichText::bold("x");
        run.href = Some(String::new());
        assert_eq!(run.style(), RunStyle::Bold);
    }

    #[test]
    fn test_deserialize_api_rich_text() {
        let json = r#"{
            "type": "text",
            "text": { "content": "not", "link": null },
            "annotations": {
                "bold": true, "italic": false, "strikethrough": false,
                "underline": false, "code": false, "color": "default"
            },
            "plain_text": "not",
            "href": null
        }"#;
        let run: RichText = serde_json::from_str(json).unwrap();
        assert_eq!(run.plain_text, "not");
        assert!(run.annotations.bold);
        assert_eq!(run.style(), RunStyle::Bold);
    }

    #[test]
    fn test_plain_text_concatenation() {
        let runs = vec![
            RichText::plain("The unexamined life is "),
            RichText::bold("not"),
            RichText::plain(" worth living."),
        ];
        assert_eq!(
            plain_text(&runs),
            "The unexamined life is not worth living."
        );
    }
}
