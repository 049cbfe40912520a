//! trellis-core: the code playground without a DOM.
//!
//! This crate provides:
//! - `Document` and the three editing panes
//! - `EditorBackend` trait with rope-backed and plain implementations
//! - Preview assembly, viewport zoom, templates, export and share links
//! - `ContentStore` over any `KeyValueStore`, autosave and usage counters
//! - `App`, which ties it together behind an event/effect interface

pub mod analytics;
pub mod app;
pub mod autosave;
pub mod bindings;
pub mod clock;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod errors;
pub mod export;
pub mod feedback;
pub mod preview;
pub mod share;
pub mod store;
pub mod templates;
pub mod viewport;

pub use analytics::{Counter, Counters};
pub use app::{App, AppEvent, CaptureSupport, ClipboardPurpose, Dialog, Effect, Panel};
pub use autosave::{Autosave, AutosaveState, TickOutcome};
pub use bindings::{Binding, BindingTable, HostContext, Key, KeyCombo, Modifiers};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::PlaygroundConfig;
pub use document::{Document, Pane, Project, Snapshot, display_name};
pub use editor::{
    BackendKind, BufferChange, EditorBackend, EditorSurface, PlainBackend, RopeBackend, Theme,
};
pub use error::{
    EditorError, ExportError, FeedbackError, Result, ShareError, StoreError, TrellisError,
};
pub use errors::{ErrorEntry, ErrorLog, Notification, Notifications};
pub use export::{
    CaptureRequest, ExportFile, ExportGate, ExportKind, Orientation, PageLayout, export_file,
    parse_standalone,
};
pub use feedback::{Feedback, FeedbackCategory};
pub use preview::{
    FrameErrorKind, FrameMessage, PreviewRenderer, RenderReason, parse_frame_message,
    render_popout, render_preview, render_standalone,
};
pub use smol_str::SmolStr;
pub use store::{ContentStore, KeyValueStore, MemoryStore};
pub use templates::{CATALOG, Category, CategoryFilter, Template};
pub use viewport::{Size, ViewportPreset, Zoom, ZoomController};
