//! Error types for trellis.
//!
//! Every fault in the playground is non-fatal: callers log these into the
//! session [`ErrorLog`](crate::errors::ErrorLog) and carry on.

use miette::Diagnostic;

/// Main error type for trellis operations.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum TrellisError {
    #[error(transparent)]
    #[diagnostic_source]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic_source]
    Export(#[from] ExportError),

    #[error(transparent)]
    #[diagnostic_source]
    Share(#[from] ShareError),

    #[error(transparent)]
    #[diagnostic_source]
    Editor(#[from] EditorError),

    #[error(transparent)]
    #[diagnostic_source]
    Feedback(#[from] FeedbackError),
}

/// Persistence failures. Reads never produce these; they fail soft instead.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum StoreError {
    #[error("storage backend unavailable")]
    #[diagnostic(code(trellis::store::unavailable))]
    Unavailable,

    #[error("failed to write {key}: {reason}")]
    #[diagnostic(
        code(trellis::store::write),
        help("browser storage may be full or disabled")
    )]
    Write { key: String, reason: String },

    #[error("failed to serialize {key}")]
    #[diagnostic(code(trellis::store::serialize))]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Export pipeline failures.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum ExportError {
    #[error("{0} library not loaded")]
    #[diagnostic(code(trellis::export::missing_library))]
    MissingLibrary(&'static str),

    #[error("another export is already running")]
    #[diagnostic(
        code(trellis::export::busy),
        help("wait for the current export to finish")
    )]
    Busy,

    #[error("capture failed: {0}")]
    #[diagnostic(code(trellis::export::capture))]
    Capture(String),

    #[error("download failed: {0}")]
    #[diagnostic(code(trellis::export::download))]
    Download(String),

    #[error("not an exported trellis document: {0}")]
    #[diagnostic(code(trellis::export::malformed))]
    Malformed(&'static str),
}

/// Share link decoding failures.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum ShareError {
    #[error("share link is not valid base64")]
    #[diagnostic(code(trellis::share::encoding))]
    Encoding(#[from] base64::DecodeError),

    #[error("share link payload is not a document")]
    #[diagnostic(code(trellis::share::payload))]
    Payload(#[from] serde_json::Error),

    #[error("invalid page url")]
    #[diagnostic(code(trellis::share::url))]
    Url(#[from] url::ParseError),

    #[error("link has no `{0}` parameter")]
    #[diagnostic(code(trellis::share::missing_param))]
    MissingParam(String),
}

/// Editor backend failures.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum EditorError {
    #[error("Formatting not available.")]
    #[diagnostic(code(trellis::editor::formatting_unavailable))]
    FormattingUnavailable,

    #[error("rich editor failed to load: {0}")]
    #[diagnostic(
        code(trellis::editor::backend),
        help("the plain text editor is used instead")
    )]
    Backend(String),
}

/// Feedback form rejections.
#[derive(thiserror::Error, Debug, Diagnostic, PartialEq, Eq)]
pub enum FeedbackError {
    #[error("Please enter a message.")]
    #[diagnostic(code(trellis::feedback::empty_message))]
    EmptyMessage,
}

pub type Result<T, E = TrellisError> = std::result::Result<T, E>;
