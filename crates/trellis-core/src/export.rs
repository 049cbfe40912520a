//! Export pipeline.
//!
//! File export is synchronous and pure. Raster and paginated exports need a
//! capture routine from the host page, so the core only computes their
//! geometry and guards against overlapping runs.

use std::fmt;

use crate::document::{Document, Pane};
use crate::error::ExportError;
use crate::preview::{
    self, DOC_CLOSE, DOC_OPEN, MARKUP_BYTES_OPEN, SCRIPT_OPEN, STYLE_CLOSE_BODY_OPEN,
    STYLE_OPEN,
};
use crate::viewport::{PresetSize, Size, ViewportPreset, Zoom};

/// Device pixel ratio used for captures.
pub const CAPTURE_SCALE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    /// Self-contained HTML file.
    File,
    /// PNG screenshot of the preview.
    Raster,
    /// Single-page PDF of the preview.
    Paginated,
}

impl ExportKind {
    pub fn filename(self) -> &'static str {
        match self {
            ExportKind::File => "index.html",
            ExportKind::Raster => "preview-screenshot.png",
            ExportKind::Paginated => "html-preview.pdf",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportKind::File => "text/html",
            ExportKind::Raster => "image/png",
            ExportKind::Paginated => "application/pdf",
        }
    }

    /// Whether this kind needs an asynchronous capture.
    pub fn needs_capture(self) -> bool {
        !matches!(self, ExportKind::File)
    }

    /// Error log context.
    pub fn context(self) -> &'static str {
        match self {
            ExportKind::File => "Download HTML",
            ExportKind::Raster => "Screenshot",
            ExportKind::Paginated => "Export PDF",
        }
    }

    pub fn progress_message(self) -> Option<&'static str> {
        match self {
            ExportKind::File => None,
            ExportKind::Raster => Some("Capturing preview..."),
            ExportKind::Paginated => Some("Generating PDF..."),
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            ExportKind::File => "HTML file downloaded!",
            ExportKind::Raster => "Screenshot saved!",
            ExportKind::Paginated => "PDF exported successfully!",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            ExportKind::File => "HTML download failed.",
            ExportKind::Raster => "Screenshot failed.",
            ExportKind::Paginated => "PDF export failed.",
        }
    }

    pub fn missing_library_message(self) -> &'static str {
        match self {
            ExportKind::Paginated => "Required library not loaded.",
            _ => "Screenshot library not loaded.",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.context())
    }
}

/// A finished download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: &'static str,
    pub mime: &'static str,
    pub contents: String,
}

/// The current document as a standalone `index.html`.
pub fn export_file(doc: &Document) -> ExportFile {
    ExportFile {
        filename: ExportKind::File.filename(),
        mime: ExportKind::File.mime(),
        contents: preview::render_export(doc),
    }
}

/// Recover the buffers from a file produced by [`export_file`].
///
/// The recorded markup length decides where the scripting buffer starts.
/// Files without it (or edited so it no longer lines up) fall back to the
/// first `<script>` after the last `</script`, which misreads markup that
/// opens a `<script>` it never closes.
pub fn parse_standalone(html: &str) -> Result<Document, ExportError> {
    let rest = html
        .strip_prefix(DOC_OPEN)
        .ok_or(ExportError::Malformed("missing document header"))?;
    let (markup_bytes, rest) = match rest.strip_prefix(MARKUP_BYTES_OPEN) {
        Some(tail) => {
            let (len, tail) = tail
                .split_once("\">")
                .ok_or(ExportError::Malformed("unterminated markup length"))?;
            let len = len
                .parse::<usize>()
                .map_err(|_| ExportError::Malformed("invalid markup length"))?;
            (Some(len), tail)
        }
        None => (None, rest),
    };
    let rest = rest
        .strip_prefix(STYLE_OPEN)
        .ok_or(ExportError::Malformed("missing style element"))?;
    let (styling, rest) = rest
        .split_once(STYLE_CLOSE_BODY_OPEN)
        .ok_or(ExportError::Malformed("unterminated style element"))?;
    let body = rest
        .strip_suffix(DOC_CLOSE)
        .ok_or(ExportError::Malformed("missing document footer"))?;

    let script_at = match markup_bytes {
        Some(len) if body.is_char_boundary(len) && body[len..].starts_with(SCRIPT_OPEN) => len,
        _ => guess_script_start(body)?,
    };

    let markup = &body[..script_at];
    let scripting = &body[script_at + SCRIPT_OPEN.len()..];

    Ok(Document::new(
        markup,
        preview::unescape_closing(styling, Pane::Styling),
        preview::unescape_closing(scripting, Pane::Scripting),
    ))
}

fn guess_script_start(body: &str) -> Result<usize, ExportError> {
    // Scripting never contains `</script` once escaped, so everything up to
    // the last one belongs to the markup.
    let lowered = body.to_ascii_lowercase();
    let search_from = lowered.rfind("</script").unwrap_or(0);
    body[search_from..]
        .find(SCRIPT_OPEN)
        .map(|i| search_from + i)
        .ok_or(ExportError::Malformed("missing script element"))
}

/// Capture geometry, in CSS pixels of the previewed document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureRequest {
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl CaptureRequest {
    /// What to capture for the current viewport.
    ///
    /// Fixed presets capture the part of the device box visible in the
    /// container at the current zoom. Fill mode captures the frame's full
    /// scrollable size.
    pub fn for_viewport(
        preset: ViewportPreset,
        zoom: Zoom,
        container: Size,
        frame_scroll: Size,
    ) -> Self {
        let (width, height) = match preset.size() {
            PresetSize::Fill => (frame_scroll.width, frame_scroll.height),
            PresetSize::Fixed { width, height } => {
                let z = zoom.get();
                let visible = |device: u32, available: f64| {
                    let device = device as f64;
                    if available > 0.0 {
                        device.min(available / z)
                    } else {
                        device
                    }
                };
                (
                    visible(width, container.width),
                    visible(height, container.height),
                )
            }
        };
        Self {
            width: width.max(1.0).round(),
            height: height.max(1.0).round(),
            scale: CAPTURE_SCALE,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// jsPDF orientation flag.
    pub fn code(self) -> &'static str {
        match self {
            Orientation::Portrait => "p",
            Orientation::Landscape => "l",
        }
    }
}

/// Page for the paginated export, sized to the capture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub orientation: Orientation,
    pub width: f64,
    pub height: f64,
}

impl PageLayout {
    pub fn for_capture(capture: Size) -> Self {
        let orientation = if capture.width > capture.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        };
        Self {
            orientation,
            width: capture.width,
            height: capture.height,
        }
    }
}

/// Allows one capture export at a time.
#[derive(Debug, Clone, Default)]
pub struct ExportGate {
    in_flight: Option<ExportKind>,
}

impl ExportGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate for a capture export.
    pub fn begin(&mut self, kind: ExportKind) -> Result<(), ExportError> {
        if !kind.needs_capture() {
            return Ok(());
        }
        if let Some(running) = self.in_flight {
            tracing::debug!(%kind, %running, "export rejected, another is running");
            return Err(ExportError::Busy);
        }
        self.in_flight = Some(kind);
        Ok(())
    }

    /// Release the gate if `kind` holds it.
    pub fn finish(&mut self, kind: ExportKind) -> bool {
        if self.in_flight == Some(kind) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    pub fn in_flight(&self) -> Option<ExportKind> {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_export_has_no_instrumentation() {
        let file = export_file(&Document::new("<p>hi</p>", "p{}", "go();"));
        assert_eq!(file.filename, "index.html");
        assert_eq!(file.mime, "text/html");
        assert!(!file.contents.contains("__trellisReport"));
        assert!(file.contents.contains("<script>go();</script>"));
    }

    #[test]
    fn test_roundtrip_with_embedded_scripts() {
        let doc = Document::new(
            "<script src=\"a.js\"></script><p>x</p><SCRIPT>var q = 1;</SCRIPT>",
            "a::after{content:\"</style>\"}",
            "document.write('<script></script>');",
        );
        let parsed = parse_standalone(&export_file(&doc).contents).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_roundtrip_with_unclosed_script_in_comment() {
        let doc = Document::new("<p>hi</p><!-- <script> -->", "", "run();");
        assert_eq!(parse_standalone(&export_file(&doc).contents).unwrap(), doc);

        let doc = Document::new("<!-- <script> -->", "", "var t = '<script>';");
        assert_eq!(parse_standalone(&export_file(&doc).contents).unwrap(), doc);
    }

    #[test]
    fn test_parse_without_markup_length() {
        let doc = Document::new("<p>x</p><script>a()</script>", "p{}", "go();");
        let html = preview::render_standalone(&doc);
        assert_eq!(parse_standalone(&html).unwrap(), doc);
    }

    #[test]
    fn test_parse_ignores_stale_markup_length() {
        let doc = Document::new("<p>x</p>", "", "go();");
        let html = export_file(&doc)
            .contents
            .replace("<p>x</p>", "<p>edited</p>");
        let parsed = parse_standalone(&html).unwrap();
        assert_eq!(parsed.markup, "<p>edited</p>");
        assert_eq!(parsed.scripting, "go();");
    }

    #[test]
    fn test_roundtrip_empty() {
        let doc = Document::default();
        assert_eq!(parse_standalone(&export_file(&doc).contents).unwrap(), doc);
    }

    #[test]
    fn test_parse_rejects_foreign_html() {
        assert!(matches!(
            parse_standalone("<html><body></body></html>"),
            Err(ExportError::Malformed(_))
        ));
    }

    #[test]
    fn test_capture_fill_uses_scroll_size() {
        let req = CaptureRequest::for_viewport(
            ViewportPreset::Desktop,
            Zoom::new(0.5),
            Size::new(800.0, 600.0),
            Size::new(1200.0, 2400.0),
        );
        assert_eq!(req.size(), Size::new(1200.0, 2400.0));
        assert_eq!(req.scale, 2.0);
    }

    #[test]
    fn test_capture_fixed_accounts_for_zoom() {
        // Fitted: whole device box is visible.
        let fitted = CaptureRequest::for_viewport(
            ViewportPreset::Mobile,
            Zoom::new(0.9),
            Size::new(800.0, 600.0),
            Size::new(375.0, 3000.0),
        );
        assert_eq!(fitted.size(), Size::new(375.0, 667.0));

        // Zoomed in past the container: only the visible part.
        let zoomed = CaptureRequest::for_viewport(
            ViewportPreset::Macbook,
            Zoom::new(2.0),
            Size::new(800.0, 600.0),
            Size::new(1440.0, 900.0),
        );
        assert_eq!(zoomed.size(), Size::new(400.0, 300.0));
    }

    #[test]
    fn test_page_orientation() {
        let wide = PageLayout::for_capture(Size::new(1440.0, 900.0));
        assert_eq!(wide.orientation, Orientation::Landscape);
        assert_eq!(wide.orientation.code(), "l");
        let square = PageLayout::for_capture(Size::new(500.0, 500.0));
        assert_eq!(square.orientation, Orientation::Portrait);
    }

    #[test]
    fn test_gate_allows_one_capture() {
        let mut gate = ExportGate::new();
        gate.begin(ExportKind::Raster).unwrap();
        assert!(matches!(gate.begin(ExportKind::Paginated), Err(ExportError::Busy)));
        gate.begin(ExportKind::File).unwrap();
        assert!(!gate.finish(ExportKind::File));
        assert_eq!(gate.in_flight(), Some(ExportKind::Raster));
        assert!(gate.finish(ExportKind::Raster));
        gate.begin(ExportKind::Paginated).unwrap();
    }
}
