//! Preview iframe host and the frame error listener.

use gloo_events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlElement, HtmlIFrameElement, MessageEvent};

use trellis_core::{FrameMessage, Size, ViewportPreset, Zoom, parse_frame_message};

pub const FRAME_ID: &str = "previewFrame";
pub const CONTAINER_ID: &str = "previewContainer";

/// The preview iframe and the container it sits in.
#[derive(Clone)]
pub struct FrameHost {
    frame: HtmlIFrameElement,
    container: HtmlElement,
}

impl FrameHost {
    pub fn find() -> Result<Self, JsValue> {
        let frame = crate::dom::by_id::<HtmlIFrameElement>(FRAME_ID)
            .ok_or_else(|| JsValue::from_str("#previewFrame missing"))?;
        let container = crate::dom::by_id::<HtmlElement>(CONTAINER_ID)
            .ok_or_else(|| JsValue::from_str("#previewContainer missing"))?;
        Ok(Self { frame, container })
    }

    pub fn frame(&self) -> &HtmlIFrameElement {
        &self.frame
    }

    /// Load a freshly built preview document.
    pub fn load(&self, html: &str) {
        self.frame.set_srcdoc(html);
    }

    pub fn container_size(&self) -> Size {
        Size::new(
            f64::from(self.container.client_width()),
            f64::from(self.container.client_height()),
        )
    }

    /// Scrollable size of the frame's body, or zero before it has loaded.
    pub fn scroll_size(&self) -> Size {
        self.body()
            .map(|body| {
                Size::new(
                    f64::from(body.scroll_width()),
                    f64::from(body.scroll_height()),
                )
            })
            .unwrap_or_default()
    }

    /// Body of the rendered document, the capture target.
    pub fn body(&self) -> Option<HtmlElement> {
        self.frame.content_document()?.body()
    }

    /// Size the frame for `preset`. Fixed presets get a device class the
    /// page stylesheet sizes; fill leaves the frame at 100%.
    pub fn apply_viewport(&self, preset: ViewportPreset) {
        let element: &web_sys::Element = self.frame.as_ref();
        element.set_class_name("preview-frame");
        if !preset.is_fill() {
            crate::dom::toggle_class(element, preset.id(), true);
        }
        crate::dom::set_style(&self.container, "justify-content", "center");
    }

    pub fn apply_zoom(&self, zoom: Zoom) {
        let frame: &HtmlElement = self.frame.as_ref();
        crate::dom::set_style(frame, "transform", &format!("scale({})", zoom.get()));
    }
}

/// Listen for error reports posted by the preview document. Other
/// messages are ignored.
pub fn listen_frame_messages(on_error: impl Fn(FrameMessage) + 'static) -> EventListener {
    EventListener::new(&gloo_utils::window(), "message", move |event| {
        let Some(event) = event.dyn_ref::<MessageEvent>() else {
            return;
        };
        let data: serde_json::Value = match serde_wasm_bindgen::from_value(event.data()) {
            Ok(data) => data,
            Err(_) => return,
        };
        if let Some(message) = parse_frame_message(data) {
            tracing::debug!(message = %message.message, "preview reported an error");
            on_error(message);
        }
    })
}
