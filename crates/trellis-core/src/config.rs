//! Playground configuration.
//!
//! Every field has a default, so a partial JSON override (or none at all) is
//! enough to build one.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use web_time::Duration;

use crate::viewport::DEFAULT_PADDING;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaygroundConfig {
    /// Prefix for every local storage key.
    pub storage_prefix: SmolStr,
    /// Time between autosave ticks, in milliseconds.
    pub autosave_interval_ms: u64,
    /// How long the "saving" indicator stays up before "saved".
    pub saving_display_ms: u64,
    /// How long "saved"/"error" stays up before reverting to armed.
    pub saved_display_ms: u64,
    /// Entries kept in the recent-saves list.
    pub recent_capacity: usize,
    /// Pixels subtracted from the preview container before auto-fit.
    pub zoom_padding: f64,
    /// Query parameter carrying a shared document.
    pub share_param: SmolStr,
    /// Address the feedback form composes mail to.
    pub feedback_recipient: SmolStr,
    /// Mini notifications visible at once.
    pub notification_limit: usize,
    /// Lifetime of a mini notification, in milliseconds.
    pub notification_ms: u64,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            storage_prefix: SmolStr::new_static("trellis:"),
            autosave_interval_ms: 30_000,
            saving_display_ms: 1_000,
            saved_display_ms: 2_000,
            recent_capacity: 5,
            zoom_padding: DEFAULT_PADDING,
            share_param: SmolStr::new_static("code"),
            feedback_recipient: SmolStr::new_static("feedback@trellis.invalid"),
            notification_limit: 4,
            notification_ms: 3_500,
        }
    }
}

impl PlaygroundConfig {
    /// Parse a JSON override, falling back to defaults on any error.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring invalid playground config");
                Self::default()
            }
        }
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_millis(self.autosave_interval_ms)
    }

    pub fn saving_display(&self) -> Duration {
        Duration::from_millis(self.saving_display_ms)
    }

    pub fn saved_display(&self) -> Duration {
        Duration::from_millis(self.saved_display_ms)
    }

    pub fn notification_lifetime(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }
}
