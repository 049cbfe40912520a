//! Editor surface: three text buffers behind one backend interface.
//!
//! The backend is chosen once at startup. A rich backend offers formatting; the
//! fallback is a bare text buffer. Get/set and change notification behave the
//! same for both, because notification is produced here by the surface rather
//! than by the backend.

use serde::{Deserialize, Serialize};

use crate::document::{Document, Pane};
use crate::error::EditorError;

/// Which family of backend is driving the panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Full editor with syntax support and formatting.
    Rich,
    /// Plain text input. Formatting is unavailable.
    Fallback,
}

/// Editor colour theme. Serialized as the rich editor's theme ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    #[serde(rename = "vs")]
    Light,
    #[serde(rename = "vs-dark")]
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "vs",
            Theme::Dark => "vs-dark",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "vs" => Some(Theme::Light),
            "vs-dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

/// One pane's text storage.
///
/// Implementations hold the text only. They never notify: the
/// [`EditorSurface`] reports changes so both backend kinds behave alike.
pub trait EditorBackend {
    fn kind(&self) -> BackendKind;

    /// Current buffer contents.
    fn value(&self) -> String;

    /// Replace the whole buffer.
    fn set_value(&mut self, text: &str);

    /// Insert text at a char offset, clamped to the end of the buffer.
    fn insert(&mut self, char_offset: usize, text: &str) {
        let mut value = self.value();
        let byte = value
            .char_indices()
            .nth(char_offset)
            .map(|(i, _)| i)
            .unwrap_or(value.len());
        value.insert_str(byte, text);
        self.set_value(&value);
    }

    /// Reformat the buffer in place.
    fn format(&mut self) -> Result<(), EditorError> {
        Err(EditorError::FormattingUnavailable)
    }

    fn set_theme(&mut self, _theme: Theme) {}

    /// Re-measure after the pane becomes visible.
    fn layout(&mut self) {}
}

/// Rope-backed rich buffer for native use.
#[derive(Debug, Clone, Default)]
pub struct RopeBackend {
    rope: ropey::Rope,
}

impl RopeBackend {
    pub fn new(text: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(text),
        }
    }
}

impl EditorBackend for RopeBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Rich
    }

    fn value(&self) -> String {
        self.rope.to_string()
    }

    fn set_value(&mut self, text: &str) {
        self.rope = ropey::Rope::from_str(text);
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        let offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(offset, text);
    }

    fn format(&mut self) -> Result<(), EditorError> {
        let formatted = format_source(&self.rope.to_string());
        self.rope = ropey::Rope::from_str(&formatted);
        Ok(())
    }
}

/// Plain string buffer, the fallback when no rich editor is available.
#[derive(Debug, Clone, Default)]
pub struct PlainBackend {
    text: String,
}

impl PlainBackend {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl EditorBackend for PlainBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Fallback
    }

    fn value(&self) -> String {
        self.text.clone()
    }

    fn set_value(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }
}

/// Notification that a pane's contents changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferChange {
    pub pane: Pane,
    /// Per-pane counter, bumped on every change.
    pub revision: u64,
}

/// The three panes plus the active tab.
pub struct EditorSurface {
    panes: [Box<dyn EditorBackend>; 3],
    revisions: [u64; 3],
    active: Pane,
}

impl EditorSurface {
    /// Build a surface from one backend per pane, in markup/styling/scripting
    /// order.
    pub fn new(
        markup: Box<dyn EditorBackend>,
        styling: Box<dyn EditorBackend>,
        scripting: Box<dyn EditorBackend>,
    ) -> Self {
        Self {
            panes: [markup, styling, scripting],
            revisions: [0; 3],
            active: Pane::Markup,
        }
    }

    /// Surface of native rich backends holding `doc`.
    pub fn rich(doc: &Document) -> Self {
        Self::new(
            Box::new(RopeBackend::new(&doc.markup)),
            Box::new(RopeBackend::new(&doc.styling)),
            Box::new(RopeBackend::new(&doc.scripting)),
        )
    }

    /// Surface of fallback backends holding `doc`.
    pub fn plain(doc: &Document) -> Self {
        Self::new(
            Box::new(PlainBackend::new(&doc.markup)),
            Box::new(PlainBackend::new(&doc.styling)),
            Box::new(PlainBackend::new(&doc.scripting)),
        )
    }

    /// Backend family in use. Panes always share one family.
    pub fn kind(&self) -> BackendKind {
        self.panes[0].kind()
    }

    pub fn get(&self, pane: Pane) -> String {
        self.panes[pane.index()].value()
    }

    /// Replace a pane's text. Always reports a change, even for equal text.
    pub fn set(&mut self, pane: Pane, text: &str) -> BufferChange {
        self.panes[pane.index()].set_value(text);
        self.bump(pane)
    }

    /// Insert text into a pane, as typing would.
    pub fn insert(&mut self, pane: Pane, char_offset: usize, text: &str) -> BufferChange {
        self.panes[pane.index()].insert(char_offset, text);
        self.bump(pane)
    }

    /// Record that the backend's text was changed by the user directly.
    pub fn notify_input(&mut self, pane: Pane) -> BufferChange {
        self.bump(pane)
    }

    pub fn revision(&self, pane: Pane) -> u64 {
        self.revisions[pane.index()]
    }

    pub fn active(&self) -> Pane {
        self.active
    }

    /// Make `pane` the visible tab. Other panes keep their text untouched.
    pub fn switch_tab(&mut self, pane: Pane) {
        self.active = pane;
        self.panes[pane.index()].layout();
    }

    /// Format the active pane.
    pub fn format_active(&mut self) -> Result<BufferChange, EditorError> {
        let pane = self.active;
        self.panes[pane.index()].format()?;
        Ok(self.bump(pane))
    }

    pub fn set_theme(&mut self, theme: Theme) {
        for backend in &mut self.panes {
            backend.set_theme(theme);
        }
    }

    /// Snapshot all three panes.
    pub fn document(&self) -> Document {
        Document::new(
            self.get(Pane::Markup),
            self.get(Pane::Styling),
            self.get(Pane::Scripting),
        )
    }

    /// Overwrite all three panes with `doc`. Never merges.
    pub fn replace_document(&mut self, doc: &Document) -> [BufferChange; 3] {
        Pane::ALL.map(|pane| self.set(pane, doc.get(pane)))
    }

    pub fn backend_mut(&mut self, pane: Pane) -> &mut dyn EditorBackend {
        self.panes[pane.index()].as_mut()
    }

    fn bump(&mut self, pane: Pane) -> BufferChange {
        let slot = &mut self.revisions[pane.index()];
        *slot += 1;
        tracing::trace!(%pane, revision = *slot, "buffer changed");
        BufferChange {
            pane,
            revision: *slot,
        }
    }
}

/// Whitespace normaliser used by the native rich backend.
///
/// Trims trailing whitespace, expands tabs to four spaces, collapses runs of
/// blank lines to one and ends the text with a single newline.
pub fn format_source(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = false;
    for line in text.lines() {
        let line = line.replace('\t', "    ");
        let line = line.trim_end();
        if line.is_empty() {
            if blank_run || out.is_empty() {
                continue;
            }
            blank_run = true;
        } else {
            blank_run = false;
        }
        out.push_str(line);
        out.push('\n');
    }
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surfaces() -> [EditorSurface; 2] {
        let doc = Document::new("<p>hi</p>", "p{}", "let x = 1;");
        [EditorSurface::rich(&doc), EditorSurface::plain(&doc)]
    }

    #[test]
    fn test_get_set_identical_across_backends() {
        for mut surface in surfaces() {
            assert_eq!(surface.get(Pane::Markup), "<p>hi</p>");
            let change = surface.set(Pane::Markup, "<b>x</b>");
            assert_eq!(change, BufferChange { pane: Pane::Markup, revision: 1 });
            assert_eq!(surface.get(Pane::Markup), "<b>x</b>");
        }
    }

    #[test]
    fn test_insert_notifies_on_both_backends() {
        for mut surface in surfaces() {
            let change = surface.insert(Pane::Scripting, 4, "y");
            assert_eq!(change.pane, Pane::Scripting);
            assert_eq!(change.revision, 1);
            assert_eq!(surface.get(Pane::Scripting), "let yx = 1;");
        }
    }

    #[test]
    fn test_insert_past_end_appends() {
        for mut surface in surfaces() {
            surface.insert(Pane::Styling, 100, "a{}");
            assert_eq!(surface.get(Pane::Styling), "p{}a{}");
        }
    }

    #[test]
    fn test_switch_tab_keeps_other_buffers() {
        for mut surface in surfaces() {
            surface.set(Pane::Styling, "edited");
            surface.switch_tab(Pane::Scripting);
            surface.switch_tab(Pane::Markup);
            assert_eq!(surface.get(Pane::Styling), "edited");
            assert_eq!(surface.active(), Pane::Markup);
        }
    }

    #[test]
    fn test_fallback_cannot_format() {
        let [mut rich, mut plain] = surfaces();
        assert!(rich.format_active().is_ok());
        assert!(matches!(
            plain.format_active(),
            Err(EditorError::FormattingUnavailable)
        ));
        assert_eq!(plain.revision(Pane::Markup), 0);
    }

    #[test]
    fn test_replace_document_overwrites_all_panes() {
        for mut surface in surfaces() {
            let doc = Document::new("", "", "");
            surface.replace_document(&doc);
            assert_eq!(surface.document(), doc);
        }
    }

    #[test]
    fn test_format_source() {
        let src = "\n\na {\t\n\tcolor: red;   \n\n\n}\n\n";
        assert_eq!(format_source(src), "a {\n    color: red;\n\n}\n");
    }

    #[test]
    fn test_theme_names() {
        assert_eq!(Theme::from_name(Theme::Dark.as_str()), Some(Theme::Dark));
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }
}
