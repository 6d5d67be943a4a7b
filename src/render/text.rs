//! Inline styling of rich text runs.

use crate::model::{RichText, RunStyle};

/// Compose styled runs into Markdown.
///
/// Each run gets exactly one representation, chosen by
/// [`RichText::style`]. Runs are concatenated without separators.
pub fn compose_markdown(runs: &[RichText]) -> String {
    let mut out = String::new();
    for run in runs {
        let text = run.plain_text.as_str();
        match run.style() {
            RunStyle::Link(href) => {
                out.push('[');
                out.push_str(text);
                out.push_str("](");
                out.push_str(href);
                out.push(')');
            }
            RunStyle::Bold => wrap(&mut out, text, "**"),
            RunStyle::Italic => wrap(&mut out, text, "_"),
            RunStyle::Strikethrough => wrap(&mut out, text, "~"),
            RunStyle::Code => wrap(&mut out, text, "`"),
            RunStyle::Plain => out.push_str(text),
        }
    }
    out
}

fn wrap(out: &mut String, text: &str, delimiter: &str) {
    out.push_str(delimiter);
    out.push_str(text);
    out.push_str(delimiter);
}
