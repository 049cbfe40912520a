//! Browser DOM layer for the trellis playground.
//!
//! This crate binds `trellis-core` to a host page. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `storage`: localStorage-backed `KeyValueStore`
//! - `editor`: textarea fallback and Monaco editor backends
//! - `preview`: iframe host and frame error listener
//! - `capture`: html2canvas / jsPDF bindings
//! - `view`: panel rendering from `App` state
//! - `runtime`: event wiring and effect execution
//!
//! # Re-exports
//!
//! This crate re-exports `trellis-core` for convenience, so consumers
//! only need to depend on `trellis-browser`.

pub use trellis_core;
pub use trellis_core::*;

pub mod capture;
pub mod config;
pub mod dom;
pub mod editor;
pub mod preview;
pub mod runtime;
pub mod storage;
pub mod view;

pub use editor::{MonacoBackend, TextareaBackend};
pub use preview::FrameHost;
pub use runtime::{PageContext, Runtime};
pub use storage::LocalStore;

use wasm_bindgen::prelude::*;

/// Install the panic hook and console logging, then start the playground.
#[wasm_bindgen(start)]
pub fn init() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    init_tracing();
    runtime::boot()
}

fn init_tracing() {
    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    let _ = set_global_default(Registry::default().with(wasm_layer));
}
