//! Typed nodes for every markup element the renderer hands to a component

use serde::{Deserialize, Serialize};
use std::fmt;

/// Markup that is already safe to emit without escaping.
///
/// Only the syntax highlighter and the renderer's own components construct
/// this. Anything wrapped here bypasses escaping, so author or reader
/// supplied text must never be passed to [`TrustedHtml::new`] unescaped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TrustedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a link points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Site-relative path, navigated client-side
    Internal,
    /// Fragment on the current page
    InPage,
    /// Everything else; opens in a new tab
    External,
}

impl LinkKind {
    pub fn classify(href: &str) -> Self {
        if href.starts_with('/') {
            LinkKind::Internal
        } else if href.starts_with('#') {
            LinkKind::InPage
        } else {
            LinkKind::External
        }
    }
}

#[derive(Debug, Clone)]
pub struct Heading {
    /// 1..=6
    pub level: u8,
    /// Plain text of the heading
    pub text: String,
    pub slug: String,
    /// Rendered inner HTML
    pub children: String,
}

#[derive(Debug, Clone)]
pub struct Link {
    pub href: String,
    pub kind: LinkKind,
    pub title: Option<String>,
    pub children: String,
}

#[derive(Debug, Clone)]
pub struct Image {
    pub src: String,
    pub alt: String,
    pub title: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

/// Inline code span or fenced code block
#[derive(Debug, Clone)]
pub struct Code {
    pub code: String,
    pub language: Option<String>,
    pub block: bool,
    /// Highlighter output for `code`
    pub highlighted: TrustedHtml,
}

/// Table contents. Cells are HTML fragments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct Callout {
    pub emoji: String,
    /// Rendered body HTML
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct ProsCard {
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ConsCard {
    pub title: String,
    pub items: Vec<String>,
}

/// One renderable element
#[derive(Debug, Clone)]
pub enum Node {
    Heading(Heading),
    Link(Link),
    Image(Image),
    Code(Code),
    Table(TableData),
    Callout(Callout),
    ProsCard(ProsCard),
    ConsCard(ConsCard),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_links() {
        assert_eq!(LinkKind::classify("/about"), LinkKind::Internal);
        assert_eq!(LinkKind::classify("#section"), LinkKind::InPage);
        assert_eq!(LinkKind::classify("https://x.com"), LinkKind::External);
        assert_eq!(LinkKind::classify("mailto:me@x.com"), LinkKind::External);
        assert_eq!(LinkKind::classify(""), LinkKind::External);
    }
}
