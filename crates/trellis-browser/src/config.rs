//! Page-supplied configuration.

use trellis_core::PlaygroundConfig;

/// Id of the optional `<script type="application/json">` override.
pub const CONFIG_ELEMENT_ID: &str = "trellis-config";

/// Read the page's config override, falling back to defaults.
pub fn load() -> PlaygroundConfig {
    match crate::dom::by_id::<web_sys::Element>(CONFIG_ELEMENT_ID).and_then(|el| el.text_content()) {
        Some(json) if !json.trim().is_empty() => PlaygroundConfig::from_json(&json),
        _ => PlaygroundConfig::default(),
    }
}
