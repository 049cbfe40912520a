//! Editor backends for the three panes.
//!
//! The playground starts on textarea panes and swaps in Monaco once the
//! AMD loader has fetched it. Both report user edits through the same
//! `on_input` callback; programmatic writes never do.

use std::cell::Cell;
use std::rc::Rc;

use gloo_events::EventListener;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlTextAreaElement};

use trellis_core::{
    BackendKind, Document, EditorBackend, EditorError, EditorSurface, Pane, PlainBackend, Theme,
};

/// Callback for edits made by the user in a pane.
pub type InputHandler = Rc<dyn Fn(Pane)>;

const TEXTAREA_STYLE: &str = "width:100%;height:100%;border:none;\
font-family:'Courier New',monospace;font-size:14px;padding:10px;resize:none;\
background:#1e1e1e;color:#d4d4d4;";

/// Id of the element hosting a pane's editor.
pub fn container_id(pane: Pane) -> String {
    format!("{}Editor", pane.as_str())
}

/// Plain `<textarea>` pane.
pub struct TextareaBackend {
    textarea: HtmlTextAreaElement,
    _input: EventListener,
}

impl TextareaBackend {
    /// Replace `container`'s children with a textarea holding `text`.
    pub fn mount(
        container: &Element,
        pane: Pane,
        text: &str,
        on_input: InputHandler,
    ) -> Result<Self, JsValue> {
        let document = crate::dom::document()?;
        let textarea: HtmlTextAreaElement = document.create_element("textarea")?.dyn_into()?;
        textarea.set_attribute("style", TEXTAREA_STYLE)?;
        textarea.set_attribute("spellcheck", "false")?;
        textarea.set_value(text);

        container.set_inner_html("");
        container.append_child(&textarea)?;

        let input = EventListener::new(&textarea, "input", move |_| on_input(pane));
        Ok(Self {
            textarea,
            _input: input,
        })
    }
}

impl EditorBackend for TextareaBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Fallback
    }

    fn value(&self) -> String {
        self.textarea.value()
    }

    fn set_value(&mut self, text: &str) {
        self.textarea.set_value(text);
    }
}

#[wasm_bindgen]
extern "C" {
    /// `monaco.editor.IStandaloneCodeEditor`.
    pub type MonacoEditor;

    #[wasm_bindgen(method, js_name = getValue)]
    fn get_value(this: &MonacoEditor) -> String;

    #[wasm_bindgen(method, js_name = setValue)]
    fn set_value(this: &MonacoEditor, value: &str);

    #[wasm_bindgen(method)]
    fn layout(this: &MonacoEditor);

    #[wasm_bindgen(method, js_name = getAction)]
    fn get_action(this: &MonacoEditor, id: &str) -> Option<EditorAction>;

    #[wasm_bindgen(method, js_name = onDidChangeModelContent)]
    fn on_did_change_model_content(this: &MonacoEditor, listener: &Closure<dyn FnMut()>);

    pub type EditorAction;

    #[wasm_bindgen(method)]
    fn run(this: &EditorAction) -> js_sys::Promise;

    #[wasm_bindgen(catch, js_namespace = ["monaco", "editor"], js_name = create)]
    fn create_editor(container: &Element, options: &JsValue) -> Result<MonacoEditor, JsValue>;

    #[wasm_bindgen(js_namespace = ["monaco", "editor"], js_name = setTheme)]
    fn set_global_theme(theme: &str);

    /// The AMD loader's `require`, present when the page includes it.
    #[wasm_bindgen(catch, js_name = require)]
    fn amd_require(modules: &js_sys::Array, on_load: &JsValue) -> Result<(), JsValue>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EditorOptions<'a> {
    value: &'a str,
    language: &'a str,
    theme: &'a str,
    font_size: u32,
    minimap: Minimap,
    automatic_layout: bool,
    word_wrap: &'a str,
}

#[derive(Serialize)]
struct Minimap {
    enabled: bool,
}

/// Monaco-backed pane.
pub struct MonacoBackend {
    editor: MonacoEditor,
    /// Set while we write the model so the change event is not echoed as
    /// user input.
    writing: Rc<Cell<bool>>,
    _on_change: Closure<dyn FnMut()>,
}

impl MonacoBackend {
    pub fn create(
        container: &Element,
        pane: Pane,
        text: &str,
        theme: Theme,
        on_input: InputHandler,
    ) -> Result<Self, JsValue> {
        let options = EditorOptions {
            value: text,
            language: pane.language(),
            theme: theme.as_str(),
            font_size: 14,
            minimap: Minimap { enabled: false },
            automatic_layout: true,
            word_wrap: "on",
        };
        let options = serde_wasm_bindgen::to_value(&options)?;

        container.set_inner_html("");
        let editor = create_editor(container, &options)?;

        let writing = Rc::new(Cell::new(false));
        let guard = writing.clone();
        let on_change = Closure::<dyn FnMut()>::new(move || {
            if !guard.get() {
                on_input(pane);
            }
        });
        editor.on_did_change_model_content(&on_change);

        Ok(Self {
            editor,
            writing,
            _on_change: on_change,
        })
    }
}

impl EditorBackend for MonacoBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Rich
    }

    fn value(&self) -> String {
        self.editor.get_value()
    }

    fn set_value(&mut self, text: &str) {
        self.writing.set(true);
        self.editor.set_value(text);
        self.writing.set(false);
    }

    fn format(&mut self) -> Result<(), EditorError> {
        let action = self
            .editor
            .get_action("editor.action.formatDocument")
            .ok_or_else(|| EditorError::Backend("format action missing".into()))?;
        // The edit lands asynchronously and arrives as a normal change event.
        let promise = action.run();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                tracing::warn!("format action failed: {:?}", e);
            }
        });
        Ok(())
    }

    fn set_theme(&mut self, theme: Theme) {
        set_global_theme(theme.as_str());
    }

    fn layout(&mut self) {
        self.editor.layout();
    }
}

/// Textarea panes holding `doc`. A pane whose container is missing gets a
/// detached plain buffer.
pub fn fallback_surface(doc: &Document, on_input: InputHandler) -> Result<EditorSurface, JsValue> {
    let [markup, styling, scripting] = Pane::ALL.map(|pane| -> Result<Box<dyn EditorBackend>, JsValue> {
        let text = doc.get(pane);
        match crate::dom::by_id::<Element>(&container_id(pane)) {
            Some(container) => Ok(Box::new(TextareaBackend::mount(
                &container,
                pane,
                text,
                on_input.clone(),
            )?)),
            None => {
                tracing::warn!(%pane, "editor container missing");
                Ok(Box::new(PlainBackend::new(text)))
            }
        }
    });
    Ok(EditorSurface::new(markup?, styling?, scripting?))
}

/// Monaco panes holding `doc`.
pub fn monaco_surface(
    doc: &Document,
    theme: Theme,
    on_input: InputHandler,
) -> Result<EditorSurface, JsValue> {
    let [markup, styling, scripting] = Pane::ALL.map(|pane| -> Result<Box<dyn EditorBackend>, JsValue> {
        let container = crate::dom::by_id::<Element>(&container_id(pane))
            .ok_or_else(|| JsValue::from_str(&format!("#{} missing", container_id(pane))))?;
        let backend = MonacoBackend::create(&container, pane, doc.get(pane), theme, on_input.clone())?;
        Ok(Box::new(backend))
    });
    Ok(EditorSurface::new(markup?, styling?, scripting?))
}

/// Ask the AMD loader for Monaco and run `on_ready` once it is loaded.
/// Returns `false` when the page has no loader.
pub fn load_monaco(on_ready: impl FnOnce() + 'static) -> bool {
    let modules = js_sys::Array::of1(&JsValue::from_str("vs/editor/editor.main"));
    let callback = Closure::once_into_js(on_ready);
    match amd_require(&modules, &callback) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("no module loader, keeping textarea editors: {:?}", e);
            false
        }
    }
}
