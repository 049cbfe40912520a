//! Preview document assembly.
//!
//! The preview is a single HTML string handed to an isolated frame. Styling
//! goes into `<head>`, markup into `<body>`, and scripting into a trailing
//! `<script>`. Preview builds add an error hook that reports faults to the
//! host page with `postMessage`; standalone builds (used by file export) are
//! the same document without it.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::document::{Document, Pane};

/// `type` field of messages posted by the preview frame.
pub const FRAME_ERROR_TYPE: &str = "trellis:frame-error";

pub(crate) const DOC_OPEN: &str =
    "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\"><title>Exported Page</title>";
/// Byte length of the markup, recorded in exported files so the body can be
/// split without guessing which `<script>` opens the scripting buffer.
pub(crate) const MARKUP_BYTES_OPEN: &str = "<meta name=\"trellis-markup-bytes\" content=\"";
pub(crate) const STYLE_OPEN: &str = "<style>";
pub(crate) const STYLE_CLOSE_BODY_OPEN: &str = "</style></head><body>";
pub(crate) const SCRIPT_OPEN: &str = "<script>";
pub(crate) const DOC_CLOSE: &str = "</script></body></html>";

/// Installed in `<head>` of preview builds. Uncaught errors and the body
/// script's caught error both go through `__trellisReport`.
const ERROR_HOOK: &str = concat!(
    "<script>",
    "window.__trellisReport=function(kind,m,l,c,e){try{window.parent.postMessage({type:'trellis:frame-error',",
    "payload:{kind:kind,message:String(m),line:l==null?null:l,column:c==null?null:c,stack:e&&e.stack?String(e.stack):null}},'*');}catch(_){}};",
    "window.onerror=function(m,s,l,c,e){window.__trellisReport('uncaught',m,l,c,e);return true;};",
    "window.addEventListener('unhandledrejection',function(ev){var r=ev.reason;",
    "window.__trellisReport('rejection',r&&r.message?r.message:r,null,null,r);});",
    "</script>"
);

static SCRIPT_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(script)").expect("valid regex"));
static STYLE_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(style)").expect("valid regex"));

/// Whether the error hook is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instrumentation {
    Preview,
    Standalone,
}

/// Build the preview document, with the frame error hook.
pub fn render_preview(doc: &Document) -> String {
    assemble(doc, Instrumentation::Preview, false)
}

/// Build the self-contained document used for file export.
pub fn render_standalone(doc: &Document) -> String {
    assemble(doc, Instrumentation::Standalone, false)
}

/// Standalone document that also records where the markup ends.
pub(crate) fn render_export(doc: &Document) -> String {
    assemble(doc, Instrumentation::Standalone, true)
}

fn assemble(doc: &Document, instrumentation: Instrumentation, mark_markup: bool) -> String {
    let styling = escape_closing(&doc.styling, Pane::Styling);
    let scripting = escape_closing(&doc.scripting, Pane::Scripting);

    let mut out = String::with_capacity(
        doc.markup.len() + styling.len() + scripting.len() + ERROR_HOOK.len() + 256,
    );
    out.push_str(DOC_OPEN);
    if instrumentation == Instrumentation::Preview {
        out.push_str(ERROR_HOOK);
    }
    if mark_markup {
        out.push_str(MARKUP_BYTES_OPEN);
        out.push_str(&doc.markup.len().to_string());
        out.push_str("\">");
    }
    out.push_str(STYLE_OPEN);
    out.push_str(&styling);
    out.push_str(STYLE_CLOSE_BODY_OPEN);
    out.push_str(&doc.markup);
    out.push_str(SCRIPT_OPEN);
    match instrumentation {
        Instrumentation::Preview => {
            out.push_str("try{\n");
            out.push_str(&scripting);
            out.push_str("\n}catch(e){window.__trellisReport('caught',e&&e.message?e.message:e,null,null,e);}");
        }
        Instrumentation::Standalone => out.push_str(&scripting),
    }
    out.push_str(DOC_CLOSE);
    out
}

/// Stop a buffer from terminating the element it is embedded in.
///
/// `</script` inside scripting and `</style` inside styling become `<\/...`,
/// which both languages read as the same text inside string literals.
pub fn escape_closing(text: &str, pane: Pane) -> Cow<'_, str> {
    match pane {
        Pane::Scripting => SCRIPT_CLOSE_RE.replace_all(text, r"<\/${1}"),
        Pane::Styling => STYLE_CLOSE_RE.replace_all(text, r"<\/${1}"),
        Pane::Markup => Cow::Borrowed(text),
    }
}

static SCRIPT_ESCAPED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<\\/(script)").expect("valid regex"));
static STYLE_ESCAPED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<\\/(style)").expect("valid regex"));

/// Inverse of [`escape_closing`].
pub fn unescape_closing(text: &str, pane: Pane) -> Cow<'_, str> {
    match pane {
        Pane::Scripting => SCRIPT_ESCAPED_RE.replace_all(text, "</${1}"),
        Pane::Styling => STYLE_ESCAPED_RE.replace_all(text, "</${1}"),
        Pane::Markup => Cow::Borrowed(text),
    }
}

/// How a fault inside the frame surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameErrorKind {
    /// Reached the frame's global error handler.
    Uncaught,
    /// Thrown synchronously by the scripting buffer and caught by the wrapper.
    Caught,
    /// An unhandled promise rejection.
    Rejection,
}

/// Typed payload of a `trellis:frame-error` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameMessage {
    pub kind: FrameErrorKind,
    pub message: String,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub column: Option<u32>,
    #[serde(default)]
    pub stack: Option<String>,
}

impl FrameMessage {
    /// `line:column` when the frame reported one.
    pub fn location(&self) -> Option<String> {
        match (self.line, self.column) {
            (Some(line), Some(col)) => Some(format!("{line}:{col}")),
            (Some(line), None) => Some(line.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for FrameMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location() {
            Some(loc) => write!(f, "{} (line {loc})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Deserialize)]
struct FrameEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

/// Decode a message event's data. Anything that isn't a frame error report
/// (other origins, other message types, malformed payloads) yields `None`.
pub fn parse_frame_message(data: serde_json::Value) -> Option<FrameMessage> {
    let envelope: FrameEnvelope = serde_json::from_value(data).ok()?;
    if envelope.kind != FRAME_ERROR_TYPE {
        return None;
    }
    match serde_json::from_value(envelope.payload?) {
        Ok(msg) => Some(msg),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring malformed frame message");
            None
        }
    }
}

/// Why a render happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderReason {
    Change(Pane),
    Run,
    Load,
}

/// Rebuilds the preview wholesale on every request.
#[derive(Debug, Default)]
pub struct PreviewRenderer {
    renders: u64,
    last: String,
}

impl PreviewRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the preview for `doc`. There is no diffing; every call produces
    /// a full document that replaces the frame contents.
    pub fn render(&mut self, doc: &Document, reason: RenderReason) -> &str {
        self.renders += 1;
        self.last = render_preview(doc);
        tracing::debug!(?reason, renders = self.renders, bytes = self.last.len(), "preview rendered");
        &self.last
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }

    pub fn last(&self) -> &str {
        &self.last
    }
}

/// Document for "open in new window": content is injected at runtime so the
/// viewer can toggle styling and scripting.
pub fn render_popout(doc: &Document) -> String {
    // `</` is escaped so the JSON can't close the surrounding script element.
    let content = serde_json::to_string(doc)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");
    format!(
        concat!(
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\"><title>Preview</title>",
            "<style id=\"popout-css\"></style>",
            "<style>body{{margin:0;font-family:sans-serif;}}",
            "#controls{{position:fixed;top:10px;right:10px;z-index:9999;background:rgba(255,255,255,0.8);padding:5px;border-radius:5px;box-shadow:0 2px 5px rgba(0,0,0,0.2);}}",
            "#controls button{{font-size:10px;padding:2px 5px;margin-left:5px;border-radius:3px;border:1px solid #ccc;background:#fff;cursor:pointer;}}</style>",
            "</head><body>",
            "<div id=\"controls\"><button id=\"toggleCssBtn\">Toggle CSS</button><button id=\"toggleJsBtn\">Toggle JS</button></div>",
            "<div id=\"popout-html\"></div>",
            "<script>var content={content};var jsEnabled=true;",
            "function render(){{document.getElementById('popout-html').innerHTML=content.html||'';",
            "document.getElementById('popout-css').textContent=content.css||'';",
            "var old=document.getElementById('popout-js');if(old)old.remove();",
            "if(jsEnabled){{var s=document.createElement('script');s.id='popout-js';",
            "s.textContent='try{{'+(content.js||'')+'\\n}}catch(e){{console.error(e)}}';document.body.appendChild(s);}}}}",
            "document.getElementById('toggleCssBtn').addEventListener('click',function(){{var c=document.getElementById('popout-css');c.disabled=!c.disabled;}});",
            "document.getElementById('toggleJsBtn').addEventListener('click',function(){{jsEnabled=!jsEnabled;render();}});",
            "render();</script></body></html>"
        ),
        content = content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_document_renders_valid_shell() {
        let html = render_preview(&Document::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style></style></head><body><script>try{\n\n}catch"));
        assert!(html.ends_with("</script></body></html>"));
    }

    #[test]
    fn test_preview_embeds_all_buffers() {
        let doc = Document::new("<h1>Hi</h1>", "h1{color:red}", "console.log(1)");
        let html = render_preview(&doc);
        assert!(html.contains("<style>h1{color:red}</style>"));
        assert!(html.contains("<body><h1>Hi</h1><script>try{\nconsole.log(1)\n}"));
        assert!(html.contains(FRAME_ERROR_TYPE));
    }

    #[test]
    fn test_standalone_has_no_instrumentation() {
        let doc = Document::new("<p>x</p>", "", "alert(1)");
        let html = render_standalone(&doc);
        assert!(!html.contains("__trellisReport"));
        assert!(!html.contains(FRAME_ERROR_TYPE));
        assert!(html.ends_with("<body><p>x</p><script>alert(1)</script></body></html>"));
    }

    #[test]
    fn test_preview_and_standalone_share_structure() {
        let doc = Document::new("<p>x</p>", "p{}", "f()");
        let preview = render_preview(&doc)
            .replace(ERROR_HOOK, "")
            .replace("try{\nf()\n}catch(e){window.__trellisReport('caught',e&&e.message?e.message:e,null,null,e);}", "f()");
        assert_eq!(preview, render_standalone(&doc));
    }

    #[test]
    fn test_closing_tags_escaped() {
        let doc = Document::new("", "a::after{content:'</STYLE>'}", "var s='</script>';");
        let html = render_standalone(&doc);
        assert!(html.contains("content:'<\\/STYLE>'"));
        assert!(html.contains("var s='<\\/script>';"));
        assert_eq!(
            unescape_closing(&escape_closing("x</Script>y", Pane::Scripting), Pane::Scripting),
            "x</Script>y"
        );
    }

    #[test]
    fn test_parse_frame_message() {
        let data = json!({
            "type": FRAME_ERROR_TYPE,
            "payload": {"kind": "uncaught", "message": "boom", "line": 3, "column": 7, "stack": null}
        });
        let msg = parse_frame_message(data).unwrap();
        assert_eq!(msg.kind, FrameErrorKind::Uncaught);
        assert_eq!(msg.location().as_deref(), Some("3:7"));
        assert_eq!(msg.to_string(), "boom (line 3:7)");
    }

    #[test]
    fn test_parse_frame_message_ignores_foreign_messages() {
        assert!(parse_frame_message(json!({"type": "webpackOk"})).is_none());
        assert!(parse_frame_message(json!("hello")).is_none());
        assert!(parse_frame_message(json!({"type": FRAME_ERROR_TYPE, "payload": {"kind": "weird"}})).is_none());
    }

    #[test]
    fn test_renderer_counts_every_render() {
        let mut renderer = PreviewRenderer::new();
        let doc = Document::new("<p>a</p>", "", "");
        renderer.render(&doc, RenderReason::Load);
        renderer.render(&doc, RenderReason::Run);
        assert_eq!(renderer.renders(), 2);
        assert_eq!(renderer.last(), render_preview(&doc));
    }

    #[test]
    fn test_popout_escapes_embedded_json() {
        let doc = Document::new("<script>x</script>", "", "");
        let html = render_popout(&doc);
        assert!(html.contains(r"<script>x<\/script>"));
        assert_eq!(html.matches("</script>").count(), 1);
    }
}
