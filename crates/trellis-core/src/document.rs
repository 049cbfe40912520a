//! The editable document and its persisted forms.
//!
//! A [`Document`] is the markup/styling/scripting triple every other part of
//! the playground reads. [`Snapshot`] and [`Project`] are the immutable,
//! timestamped copies the content store keeps.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// One of the three editing panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pane {
    #[serde(rename = "html")]
    Markup,
    #[serde(rename = "css")]
    Styling,
    #[serde(rename = "js")]
    Scripting,
}

impl Pane {
    pub const ALL: [Pane; 3] = [Pane::Markup, Pane::Styling, Pane::Scripting];

    /// Short name used for DOM ids and persisted records.
    pub fn as_str(self) -> &'static str {
        match self {
            Pane::Markup => "html",
            Pane::Styling => "css",
            Pane::Scripting => "js",
        }
    }

    /// Parse the short name back into a pane.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "html" => Some(Pane::Markup),
            "css" => Some(Pane::Styling),
            "js" => Some(Pane::Scripting),
            _ => None,
        }
    }

    /// Language id handed to the rich editor backend.
    pub fn language(self) -> &'static str {
        match self {
            Pane::Markup => "html",
            Pane::Styling => "css",
            Pane::Scripting => "javascript",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Pane::Markup => 0,
            Pane::Styling => 1,
            Pane::Scripting => 2,
        }
    }
}

impl fmt::Display for Pane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The markup/styling/scripting triple being edited.
///
/// Field names on the wire are the short pane names so records written by
/// older builds (and share links) stay readable. Missing fields decode as
/// empty text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "html", default)]
    pub markup: String,
    #[serde(rename = "css", default)]
    pub styling: String,
    #[serde(rename = "js", default)]
    pub scripting: String,
}

impl Document {
    pub fn new(
        markup: impl Into<String>,
        styling: impl Into<String>,
        scripting: impl Into<String>,
    ) -> Self {
        Self {
            markup: markup.into(),
            styling: styling.into(),
            scripting: scripting.into(),
        }
    }

    /// The page shown on first run and after a reset.
    pub fn starter() -> Self {
        Self::new(STARTER_MARKUP, STARTER_STYLING, STARTER_SCRIPTING)
    }

    pub fn get(&self, pane: Pane) -> &str {
        match pane {
            Pane::Markup => &self.markup,
            Pane::Styling => &self.styling,
            Pane::Scripting => &self.scripting,
        }
    }

    pub fn set(&mut self, pane: Pane, text: impl Into<String>) {
        let slot = match pane {
            Pane::Markup => &mut self.markup,
            Pane::Styling => &mut self.styling,
            Pane::Scripting => &mut self.scripting,
        };
        *slot = text.into();
    }

    pub fn is_empty(&self) -> bool {
        self.markup.is_empty() && self.styling.is_empty() && self.scripting.is_empty()
    }
}

const STARTER_MARKUP: &str = "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <title>My Awesome Page</title>\n</head>\n<body>\n    <h1>Welcome!</h1>\n    <p>Start coding to see magic happen.</p>\n    <button id=\"testBtn\">Click Me</button>\n</body>\n</html>";
const STARTER_STYLING: &str =
    "body{font-family:sans-serif;padding:2rem;text-align:center;background:#f0f2f5;}\nh1{color:#333;}";
const STARTER_SCRIPTING: &str = "document.getElementById('testBtn')?.addEventListener('click',()=>alert('JS is working!'));";

/// A timestamped, immutable copy of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(flatten)]
    pub document: Document,
    #[serde(rename = "timestamp")]
    pub saved_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(document: Document, saved_at: DateTime<Utc>) -> Self {
        Self { document, saved_at }
    }

    /// Label shown in the recent-saves list.
    pub fn display_name(&self) -> String {
        display_name(&self.document.markup)
    }
}

/// A named snapshot kept until the user deletes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: SmolStr,
    pub name: String,
    #[serde(flatten)]
    pub document: Document,
    pub created_at: DateTime<Utc>,
}

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title>").expect("valid regex"));
static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1>").expect("valid regex"));
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style>").expect("valid regex"));
static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("valid regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

const NAME_PREVIEW_CHARS: usize = 30;

/// Derive a human label from markup.
///
/// Prefers the `<title>`, then the first `<h1>` (tags stripped), then the
/// first few characters of visible text.
pub fn display_name(markup: &str) -> String {
    if markup.trim().is_empty() {
        return "Untitled".to_string();
    }

    if let Some(title) = TITLE_RE.captures(markup).and_then(|c| c.get(1)) {
        let title = title.as_str().trim();
        if !title.is_empty() {
            return title.to_string();
        }
    }

    if let Some(h1) = H1_RE.captures(markup).and_then(|c| c.get(1)) {
        let text = TAG_RE.replace_all(h1.as_str(), "");
        let text = text.trim();
        if !text.is_empty() {
            return text.to_string();
        }
    }

    let visible = STYLE_RE.replace_all(markup, "");
    let visible = SCRIPT_RE.replace_all(&visible, "");
    let visible = TAG_RE.replace_all(&visible, " ");
    let visible = SPACE_RE.replace_all(&visible, " ");
    let visible = visible.trim();
    if visible.is_empty() {
        return "Untitled".to_string();
    }

    let mut chars = visible.chars();
    let head: String = chars.by_ref().take(NAME_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pane_names_round_trip() {
        for pane in Pane::ALL {
            assert_eq!(Pane::from_name(pane.as_str()), Some(pane));
        }
        assert_eq!(Pane::from_name("ts"), None);
    }

    #[test]
    fn test_document_missing_fields_default_empty() {
        let doc: Document = serde_json::from_str(r#"{"html":"<p>x</p>"}"#).unwrap();
        assert_eq!(doc.markup, "<p>x</p>");
        assert!(doc.styling.is_empty());
        assert!(doc.scripting.is_empty());
    }

    #[test]
    fn test_snapshot_wire_format() {
        let saved_at = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let snap = Snapshot::new(Document::new("a", "b", "c"), saved_at);
        let value = serde_json::to_value(&snap).unwrap();
        assert_eq!(value["html"], "a");
        assert_eq!(value["css"], "b");
        assert_eq!(value["js"], "c");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_display_name_prefers_title() {
        let markup = "<html><head><title> Landing </title></head><body><h1>Hi</h1></body></html>";
        assert_eq!(display_name(markup), "Landing");
    }

    #[test]
    fn test_display_name_falls_back_to_h1() {
        assert_eq!(display_name("<h1 class=\"x\">Hello <em>there</em></h1>"), "Hello there");
    }

    #[test]
    fn test_display_name_truncates_visible_text() {
        let markup = "<style>p{}</style><p>abcdefghij abcdefghij abcdefghij abcdefghij</p>";
        assert_eq!(display_name(markup), "abcdefghij abcdefghij abcdefgh...");
    }

    #[test]
    fn test_display_name_untitled() {
        assert_eq!(display_name("   "), "Untitled");
        assert_eq!(display_name("<div></div>"), "Untitled");
    }

    #[test]
    fn test_set_replaces_single_pane() {
        let mut doc = Document::new("a", "b", "c");
        doc.set(Pane::Styling, "x");
        assert_eq!(doc, Document::new("a", "x", "c"));
    }
}
