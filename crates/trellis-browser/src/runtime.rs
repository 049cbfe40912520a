//! Page wiring: DOM events in, `Effect`s out.
//!
//! One [`Runtime`] lives for the life of the page. Listeners hold weak
//! references to it; effects run after the `App` borrow is released, so an
//! effect may dispatch again (confirmations, prompts, async completions).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Element, Event, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement,
    KeyboardEvent, MouseEvent,
};

use trellis_core::{
    App, AppEvent, BindingTable, Document, EditorSurface, Effect, ExportKind, Feedback,
    FeedbackCategory, HostContext, Key, KeyCombo, Modifiers, Panel, Pane,
};

use crate::capture;
use crate::dom;
use crate::editor::{self, InputHandler};
use crate::preview::{self, FrameHost};
use crate::storage::LocalStore;
use crate::view;

thread_local! {
    static RUNTIME: RefCell<Option<Rc<Runtime>>> = const { RefCell::new(None) };
}

/// Start the playground once the document has been parsed.
pub fn boot() -> Result<(), JsValue> {
    let document = dom::document()?;
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", |_| {
            if let Err(e) = launch() {
                tracing::error!("playground failed to start: {:?}", e);
            }
        })
        .forget();
        Ok(())
    } else {
        launch()
    }
}

fn launch() -> Result<(), JsValue> {
    let runtime = Runtime::new(crate::config::load())?;
    runtime.start();
    RUNTIME.with(|slot| *slot.borrow_mut() = Some(runtime));
    Ok(())
}

/// The running page, if [`boot`] has completed.
pub fn current() -> Option<Rc<Runtime>> {
    RUNTIME.with(|slot| slot.borrow().clone())
}

/// Reads page state for bindings that need it at click time.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageContext;

impl HostContext for PageContext {
    fn page_url(&self) -> String {
        gloo_utils::window().location().href().unwrap_or_default()
    }

    fn feedback_form(&self) -> Feedback {
        let category = dom::by_id::<HtmlSelectElement>("feedbackType")
            .and_then(|s| FeedbackCategory::from_name(&s.value()))
            .unwrap_or_default();
        let message = dom::by_id::<HtmlTextAreaElement>("feedbackMessage")
            .map(|t| t.value())
            .unwrap_or_default();
        let feedback = Feedback::new(category, message);
        match dom::by_id::<HtmlInputElement>("feedbackEmail") {
            Some(email) => feedback.with_reply_to(email.value()),
            None => feedback,
        }
    }
}

pub struct Runtime {
    app: RefCell<App<LocalStore>>,
    frame: FrameHost,
    bindings: BindingTable,
    listeners: RefCell<Vec<EventListener>>,
    autosave: RefCell<Option<Interval>>,
    install_prompt: RefCell<Option<Event>>,
}

impl Runtime {
    pub fn new(config: trellis_core::PlaygroundConfig) -> Result<Rc<Self>, JsValue> {
        let frame = FrameHost::find()?;
        let mut app = App::new(
            config,
            EditorSurface::plain(&Document::starter()),
            LocalStore::new(),
        );
        app.set_capture_support(capture::support());
        Ok(Rc::new(Self {
            app: RefCell::new(app),
            frame,
            bindings: BindingTable::default(),
            listeners: RefCell::new(Vec::new()),
            autosave: RefCell::new(None),
            install_prompt: RefCell::new(None),
        }))
    }

    /// Mount editors, restore the session and wire every control.
    pub fn start(self: &Rc<Self>) {
        match editor::fallback_surface(&Document::starter(), self.input_handler()) {
            Ok(surface) => {
                let fx = self.app.borrow_mut().install_editor(surface);
                self.apply_all(fx);
            }
            Err(e) => tracing::error!("textarea editors unavailable: {:?}", e),
        }

        self.sync_container();
        let page_url = PageContext.page_url();
        let fx = self.app.borrow_mut().start(Some(&page_url));
        self.apply_all(fx);

        self.wire_controls();
        self.wire_lists();
        self.wire_window();
        self.start_autosave();
        self.upgrade_editor();
        view::tabs(Pane::Markup);
    }

    pub fn app(&self) -> std::cell::Ref<'_, App<LocalStore>> {
        self.app.borrow()
    }

    pub fn dispatch(self: &Rc<Self>, event: AppEvent) {
        if matches!(event, AppEvent::ChangeViewport(_)) {
            self.sync_container();
        }
        let tab = match &event {
            AppEvent::SwitchTab(pane) => Some(*pane),
            _ => None,
        };

        let fx = match self.app.try_borrow_mut() {
            Ok(mut app) => app.dispatch(event),
            Err(_) => {
                // Raised from inside an editor write; run it next turn.
                let this = Rc::downgrade(self);
                Timeout::new(0, move || {
                    if let Some(this) = this.upgrade() {
                        this.dispatch(event);
                    }
                })
                .forget();
                return;
            }
        };

        if let Some(pane) = tab {
            view::tabs(pane);
        }
        self.apply_all(fx);
    }

    fn apply_all(self: &Rc<Self>, fx: Vec<Effect>) {
        for effect in fx {
            self.apply(effect);
        }
    }

    fn apply(self: &Rc<Self>, effect: Effect) {
        let window = gloo_utils::window();
        match effect {
            Effect::RenderPreview(html) => self.frame.load(&html),
            Effect::Download(file) => {
                let result = dom::download_text(file.filename, file.mime, &file.contents)
                    .map_err(|e| {
                        tracing::error!(filename = file.filename, "download failed: {:?}", e);
                        dom::js_error_message(&e)
                    });
                self.dispatch(AppEvent::ExportFinished {
                    kind: ExportKind::File,
                    result,
                });
            }
            Effect::Capture {
                kind,
                request,
                page,
            } => {
                let Some(target) = self.frame.body() else {
                    self.dispatch(AppEvent::ExportFinished {
                        kind,
                        result: Err("preview has not loaded".into()),
                    });
                    return;
                };
                let this = Rc::downgrade(self);
                wasm_bindgen_futures::spawn_local(async move {
                    let result = capture::capture(kind, request, page, target).await;
                    if let Some(this) = this.upgrade() {
                        this.dispatch(AppEvent::ExportFinished { kind, result });
                    }
                });
            }
            Effect::OpenMailto(link) => {
                if let Err(e) = window.location().set_href(&link) {
                    tracing::warn!("mailto navigation failed: {:?}", e);
                }
            }
            Effect::CopyToClipboard { text, purpose } => {
                let clipboard = window.navigator().clipboard();
                let this = Rc::downgrade(self);
                wasm_bindgen_futures::spawn_local(async move {
                    let written =
                        wasm_bindgen_futures::JsFuture::from(clipboard.write_text(&text)).await;
                    if let Err(e) = &written {
                        tracing::warn!("clipboard write failed: {:?}", e);
                    }
                    if let Some(this) = this.upgrade() {
                        this.dispatch(AppEvent::ClipboardWritten {
                            purpose,
                            ok: written.is_ok(),
                        });
                    }
                });
            }
            Effect::ReplaceUrl(url) => {
                let replaced = window
                    .history()
                    .and_then(|h| h.replace_state_with_url(&JsValue::NULL, "", Some(&url)));
                if let Err(e) = replaced {
                    tracing::warn!("history update failed: {:?}", e);
                }
            }
            Effect::Confirm { message, then } => {
                if window.confirm_with_message(&message).unwrap_or(false) {
                    self.dispatch(*then);
                }
            }
            Effect::PromptProjectName { default } => {
                if let Ok(Some(name)) =
                    window.prompt_with_message_and_default("Enter project name:", &default)
                {
                    self.dispatch(AppEvent::SaveProject { name: Some(name) });
                }
            }
            Effect::Alert(message) => {
                let _ = window.alert_with_message(&message);
            }
            Effect::OpenPopout(html) => {
                if let Err(e) = open_popout(&html) {
                    tracing::warn!("pop-out window failed: {:?}", e);
                }
            }
            Effect::PromptInstall => self.prompt_install(),
            Effect::ApplyTheme(theme) => view::theme(theme),
            Effect::ApplyViewport(preset) => {
                self.frame.apply_viewport(preset);
                view::viewport(preset);
            }
            Effect::ApplyZoom(zoom) => {
                self.frame.apply_zoom(zoom);
                view::zoom(zoom);
            }
            Effect::SetFullscreen(on) => view::fullscreen(on),
            Effect::Notify(_) => view::refresh(&self.app.borrow(), Panel::Notifications),
            Effect::CloseDialog(dialog) => view::close_dialog(dialog.element_id()),
            Effect::Refresh(panel) => view::refresh(&self.app.borrow(), panel),
            Effect::Schedule { after, event } => {
                let millis = u32::try_from(after.as_millis()).unwrap_or(u32::MAX);
                let this = Rc::downgrade(self);
                Timeout::new(millis, move || {
                    if let Some(this) = this.upgrade() {
                        this.dispatch(*event);
                    }
                })
                .forget();
            }
        }
    }

    fn input_handler(self: &Rc<Self>) -> InputHandler {
        let this = Rc::downgrade(self);
        Rc::new(move |pane| {
            if let Some(this) = this.upgrade() {
                this.dispatch(AppEvent::Input(pane));
            }
        })
    }

    /// Swap the textareas for Monaco once the loader delivers it.
    fn upgrade_editor(self: &Rc<Self>) {
        let this = Rc::downgrade(self);
        editor::load_monaco(move || {
            let Some(this) = this.upgrade() else {
                return;
            };
            let (doc, theme) = {
                let app = this.app.borrow();
                (app.document(), app.theme())
            };
            match editor::monaco_surface(&doc, theme, this.input_handler()) {
                Ok(surface) => {
                    let fx = this.app.borrow_mut().install_editor(surface);
                    this.apply_all(fx);
                }
                Err(e) => {
                    // Monaco may have cleared some containers; put textareas back.
                    if let Ok(surface) = editor::fallback_surface(&doc, this.input_handler()) {
                        let fx = this.app.borrow_mut().install_editor(surface);
                        this.apply_all(fx);
                    }
                    this.dispatch(AppEvent::EditorUnavailable(dom::js_error_message(&e)));
                }
            }
        });
    }

    fn start_autosave(self: &Rc<Self>) {
        let millis = u32::try_from(self.app.borrow().autosave().interval().as_millis())
            .unwrap_or(u32::MAX);
        let this = Rc::downgrade(self);
        let interval = Interval::new(millis, move || {
            if let Some(this) = this.upgrade() {
                this.dispatch(AppEvent::AutosaveTick);
            }
        });
        *self.autosave.borrow_mut() = Some(interval);
    }

    fn prompt_install(self: &Rc<Self>) {
        let Some(prompt_event) = self.install_prompt.borrow_mut().take() else {
            return;
        };
        let prompted = js_sys::Reflect::get(&prompt_event, &JsValue::from_str("prompt"))
            .and_then(|f| f.dyn_into::<js_sys::Function>())
            .and_then(|prompt| prompt.call0(&prompt_event));
        if let Err(e) = prompted {
            tracing::warn!("install prompt failed: {:?}", e);
        }
        // A deferred install prompt can only be shown once.
        self.dispatch(AppEvent::InstallOffered(false));
    }

    fn sync_container(&self) {
        let size = self.frame.container_size();
        if let Ok(mut app) = self.app.try_borrow_mut() {
            app.dispatch(AppEvent::ContainerResized(size));
        }
    }

    fn listen(&self, listener: EventListener) {
        self.listeners.borrow_mut().push(listener);
    }

    /// Send `event` to this runtime from a listener.
    fn sender(self: &Rc<Self>) -> impl Fn(AppEvent) + Clone + 'static {
        let this = Rc::downgrade(self);
        move |event| {
            if let Some(this) = this.upgrade() {
                this.dispatch(event);
            }
        }
    }

    fn wire_controls(self: &Rc<Self>) {
        for id in self.bindings.control_ids() {
            let Some(el) = dom::by_id::<Element>(id) else {
                continue;
            };
            let this = Rc::downgrade(self);
            self.listen(EventListener::new(&el, "click", move |_| {
                let Some(this) = this.upgrade() else {
                    return;
                };
                if let Some(event) = this.bindings.click(id, &PageContext) {
                    this.dispatch(event);
                }
            }));
        }

        for (selector, attribute) in [
            (".tab-btn", "lang"),
            ("#viewportMenu a", "viewport"),
            (".template-categories .btn", "category"),
        ] {
            let Ok(nodes) = gloo_utils::document().query_selector_all(selector) else {
                continue;
            };
            for i in 0..nodes.length() {
                let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                    continue;
                };
                let this = Rc::downgrade(self);
                let target = el.clone();
                self.listen(EventListener::new(&el, "click", move |event| {
                    event.prevent_default();
                    let Some(this) = this.upgrade() else {
                        return;
                    };
                    let value = target
                        .get_attribute(&format!("data-{attribute}"))
                        .unwrap_or_default();
                    if let Some(event) = this.bindings.data_attribute(attribute, &value) {
                        this.dispatch(event);
                    }
                }));
            }
        }

        if let Some(selector) = dom::by_id::<HtmlSelectElement>("templateSelector") {
            let send = self.sender();
            let select = selector.clone();
            self.listen(EventListener::new(&selector, "change", move |_| {
                let key = select.value();
                if !key.is_empty() {
                    select.set_value("");
                    send(AppEvent::LoadTemplate {
                        key,
                        confirmed: false,
                    });
                }
            }));
        }

        if let Some(search) = dom::by_id::<HtmlInputElement>("templateSearchInput") {
            let send = self.sender();
            let input = search.clone();
            self.listen(EventListener::new(&search, "input", move |_| {
                send(AppEvent::SearchTemplates(input.value()));
            }));
        }

        self.wire_zoom_slider();
    }

    /// Delegated clicks on the regenerated lists.
    fn wire_lists(self: &Rc<Self>) {
        let send = self.sender();
        self.delegate("recentSavesList", "a[data-index]", move |item| {
            let index = item.get_attribute("data-index")?.parse().ok()?;
            send(AppEvent::LoadRecent {
                index,
                confirmed: false,
            });
            Some(())
        });

        let send = self.sender();
        self.delegate("projectsList", "[data-id]", move |item| {
            let id = item.get_attribute("data-id")?;
            match item.get_attribute("data-action")?.as_str() {
                "load" => send(AppEvent::LoadProject {
                    id,
                    confirmed: false,
                }),
                "delete" => send(AppEvent::DeleteProject {
                    id,
                    confirmed: false,
                }),
                _ => {}
            }
            Some(())
        });

        let send = self.sender();
        self.delegate("templateGallery", ".template-card", move |card| {
            let key = card.get_attribute("data-key")?;
            send(AppEvent::LoadTemplate {
                key,
                confirmed: false,
            });
            Some(())
        });

        for (modal, panel) in [
            ("projectsModal", Panel::Projects),
            ("templatesModal", Panel::Gallery),
            ("analyticsModal", Panel::Stats),
        ] {
            let Some(el) = dom::by_id::<Element>(modal) else {
                continue;
            };
            let this = Rc::downgrade(self);
            self.listen(EventListener::new(&el, "show.bs.modal", move |_| {
                if let Some(this) = this.upgrade() {
                    view::refresh(&this.app.borrow(), panel);
                }
            }));
        }
    }

    fn delegate(
        &self,
        container_id: &str,
        selector: &'static str,
        on_item: impl Fn(&Element) -> Option<()> + 'static,
    ) {
        let Some(container) = dom::by_id::<Element>(container_id) else {
            return;
        };
        self.listen(EventListener::new(&container, "click", move |event| {
            let item = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|t| t.closest(selector).ok().flatten());
            if let Some(item) = item {
                event.prevent_default();
                on_item(&item);
            }
        }));
    }

    fn wire_zoom_slider(self: &Rc<Self>) {
        let Some(slider) = dom::by_id::<HtmlElement>("zoomSlider") else {
            return;
        };
        let dragging = Rc::new(Cell::new(false));

        let position = {
            let slider = slider.clone();
            move |event: &Event| -> Option<f64> {
                let event = event.dyn_ref::<MouseEvent>()?;
                let rect = slider.get_bounding_client_rect();
                if rect.width() <= 0.0 {
                    return None;
                }
                Some((f64::from(event.client_x()) - rect.left()) / rect.width())
            }
        };

        let send = self.sender();
        let (drag, at) = (dragging.clone(), position.clone());
        self.listen(EventListener::new(&slider, "mousedown", move |event| {
            drag.set(true);
            if let Some(p) = at(event) {
                send(AppEvent::ZoomSlider(p));
            }
        }));

        let window = gloo_utils::window();
        let send = self.sender();
        let drag = dragging.clone();
        self.listen(EventListener::new(&window, "mousemove", move |event| {
            if drag.get() {
                if let Some(p) = position(event) {
                    send(AppEvent::ZoomSlider(p));
                }
            }
        }));
        self.listen(EventListener::new(&window, "mouseup", move |_| {
            dragging.set(false);
        }));
    }

    fn wire_window(self: &Rc<Self>) {
        let window = gloo_utils::window();
        let document = gloo_utils::document();

        let this = Rc::downgrade(self);
        self.listen(EventListener::new(&document, "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let Some(this) = this.upgrade() else {
                return;
            };
            let combo = KeyCombo::with_modifiers(
                Key::from_dom(&event.key()),
                Modifiers {
                    ctrl: event.ctrl_key(),
                    alt: event.alt_key(),
                    shift: event.shift_key(),
                    meta: event.meta_key(),
                },
            );
            if let Some(app_event) = this.bindings.key(&combo) {
                this.dispatch(app_event);
            }
        }));

        let this = Rc::downgrade(self);
        self.listen(EventListener::new(&window, "resize", move |_| {
            if let Some(this) = this.upgrade() {
                this.sync_container();
            }
        }));

        let this = Rc::downgrade(self);
        self.listen(EventListener::new(self.frame.frame(), "load", move |_| {
            if let Some(this) = this.upgrade() {
                let size = this.frame.scroll_size();
                if let Ok(mut app) = this.app.try_borrow_mut() {
                    app.set_frame_scroll(size);
                }
            }
        }));

        let send = self.sender();
        self.listen(preview::listen_frame_messages(move |message| {
            send(AppEvent::FrameError(message));
        }));

        let send = self.sender();
        self.listen(EventListener::new(&window, "beforeunload", move |_| {
            send(AppEvent::Unload);
        }));

        let this = Rc::downgrade(self);
        let options = EventListenerOptions::enable_prevent_default();
        self.listen(EventListener::new_with_options(
            &window,
            "beforeinstallprompt",
            options,
            move |event| {
                event.prevent_default();
                if let Some(this) = this.upgrade() {
                    *this.install_prompt.borrow_mut() = Some(event.clone());
                    this.dispatch(AppEvent::InstallOffered(true));
                }
            },
        ));
    }
}

/// Show `html` in a new tab via an object URL.
fn open_popout(html: &str) -> Result<(), JsValue> {
    let parts = js_sys::Array::of1(&JsValue::from_str(html));
    let opts = web_sys::BlobPropertyBag::new();
    opts.set_type("text/html");
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &opts)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;
    dom::window()?.open_with_url_and_target(&url, "_blank")?;
    // The new tab needs the URL until it has loaded.
    Timeout::new(60_000, move || {
        let _ = web_sys::Url::revoke_object_url(&url);
    })
    .forget();
    Ok(())
}
