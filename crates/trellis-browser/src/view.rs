//! Redraw page regions from `App` state.
//!
//! Lists are rebuilt wholesale with `innerHTML`; clicks on their items are
//! picked up by delegated listeners in the runtime, keyed on `data-*`
//! attributes.

use chrono::{DateTime, Local, Utc};
use markdown_weaver_escape::escape_html;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use trellis_core::{App, AutosaveState, KeyValueStore, Panel, Theme, ViewportPreset, Zoom};

use crate::dom::{self, by_id, set_html, set_text, toggle_class};

pub fn refresh<S: KeyValueStore>(app: &App<S>, panel: Panel) {
    match panel {
        Panel::Recent => recent(app),
        Panel::Projects => projects(app),
        Panel::Gallery => gallery(app),
        Panel::Errors => errors(app),
        Panel::Notifications => notifications(app),
        Panel::Autosave => autosave(app),
        Panel::Stats => stats(app),
    }
}

/// Text safe to place in element content or a quoted attribute.
fn escaped(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Writing to a String can't fail.
    let _ = escape_html(&mut out, text);
    out
}

fn local(at: DateTime<Utc>) -> DateTime<Local> {
    at.with_timezone(&Local)
}

fn recent<S: KeyValueStore>(app: &App<S>) {
    let saves = app.store().list_recent();
    if saves.is_empty() {
        set_html(
            "recentSavesList",
            r#"<li><span class="dropdown-item-text text-muted">No recent saves.</span></li>"#,
        );
        return;
    }
    let items: String = saves
        .iter()
        .enumerate()
        .map(|(index, save)| {
            let name = escaped(&save.display_name());
            let at = local(save.saved_at);
            format!(
                r##"<li><a class="dropdown-item" href="#" data-index="{index}" title="{name}&#10;Saved at {full}">{time}: {name}</a></li>"##,
                full = at.format("%Y-%m-%d %H:%M:%S"),
                time = at.format("%H:%M:%S"),
            )
        })
        .collect();
    set_html("recentSavesList", &items);
}

fn projects<S: KeyValueStore>(app: &App<S>) {
    let projects = app.store().list_projects();
    if projects.is_empty() {
        set_html(
            "projectsList",
            r#"<p class="text-center text-muted mt-3">No saved projects found.</p>"#,
        );
        return;
    }
    let items: String = projects
        .iter()
        .map(|p| {
            let id = escaped(&p.id);
            format!(
                r#"<div class="project-item"><div class="project-header"><h6 class="project-title">{name}</h6><small class="project-date">{date}</small></div><div class="project-actions"><button class="btn btn-sm btn-primary" data-id="{id}" data-action="load">Load</button><button class="btn btn-sm btn-outline-danger" data-id="{id}" data-action="delete">Delete</button></div></div>"#,
                name = escaped(&p.name),
                date = local(p.created_at).format("%Y-%m-%d %H:%M"),
            )
        })
        .collect();
    set_html("projectsList", &items);
}

fn gallery<S: KeyValueStore>(app: &App<S>) {
    let active = app.gallery_filter();
    if let Ok(buttons) = gloo_utils::document().query_selector_all(".template-categories .btn") {
        for i in 0..buttons.length() {
            let Some(button) = buttons.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let is_active = button
                .get_attribute("data-category")
                .is_some_and(|c| c == active.as_str());
            toggle_class(&button, "active", is_active);
        }
    }

    let templates = app.gallery();
    if templates.is_empty() {
        set_html(
            "templateGallery",
            r#"<p class="text-center text-muted col-12">No templates found.</p>"#,
        );
        return;
    }
    let cards: String = templates
        .iter()
        .map(|t| {
            format!(
                r#"<div class="col"><div class="template-card" data-key="{key}"><div class="template-preview"><iframe srcdoc="{thumb}" scrolling="no"></iframe></div><div class="template-info"><h5 class="template-title">{name}</h5><p class="template-description">{description}</p></div></div></div>"#,
                key = t.key,
                thumb = escaped(&t.thumbnail()),
                name = escaped(t.name),
                description = escaped(t.description),
            )
        })
        .collect();
    set_html("templateGallery", &cards);
}

fn errors<S: KeyValueStore>(app: &App<S>) {
    let log = app.errors();
    let Some(panel) = by_id::<HtmlElement>("errorPanel") else {
        return;
    };
    if !log.is_visible() || log.is_empty() {
        dom::set_style(&panel, "display", "none");
        return;
    }
    let items: String = log
        .entries()
        .iter()
        .map(|e| {
            format!(
                r#"<div class="error-item"><strong>{}:</strong> {}</div>"#,
                escaped(&e.context),
                escaped(&e.message)
            )
        })
        .collect();
    set_html("errorList", &items);
    dom::set_style(&panel, "display", "block");
}

fn notifications<S: KeyValueStore>(app: &App<S>) {
    let items: String = app
        .notifications()
        .visible()
        .map(|n| {
            format!(
                r#"<div class="mini-notification show" data-id="{}">{}</div>"#,
                n.id,
                escaped(&n.message)
            )
        })
        .collect();
    set_html("notification-container", &items);
}

fn autosave<S: KeyValueStore>(app: &App<S>) {
    let Some(el) = by_id::<HtmlElement>("autoSaveStatus") else {
        return;
    };
    let state = app.autosave();
    for class in ["saving", "saved", "error", "off"] {
        toggle_class(&el, class, class == state.status_class());
    }
    if let Ok(Some(icon)) = el.query_selector("i") {
        toggle_class(&icon, "fa-spin", state.state() == AutosaveState::Saving);
    }
    if let Ok(Some(text)) = el.query_selector(".save-text") {
        text.set_text_content(Some(state.status_label()));
    }
    el.set_title(state.status_title());
}

fn stats<S: KeyValueStore>(app: &App<S>) {
    let cards: String = app
        .counters()
        .rows()
        .into_iter()
        .map(|(label, value)| {
            format!(
                r#"<div class="analytics-card"><div class="analytics-number">{value}</div><div class="analytics-label">{label}</div></div>"#
            )
        })
        .collect();
    set_html(
        "analyticsContent",
        &format!(
            r#"<div class="analytics-grid">{cards}</div><p class="text-center text-muted small mt-3">Stats are stored in your browser's local storage.</p>"#
        ),
    );
}

pub fn theme(theme: Theme) {
    if let Some(body) = gloo_utils::document().body() {
        toggle_class(&body, "dark-theme", theme.is_dark());
    }
    if let Ok(Some(icon)) = gloo_utils::document().query_selector("#themeToggle i") {
        icon.set_class_name(if theme.is_dark() { "fas fa-sun" } else { "fas fa-moon" });
    }
}

/// Dropdown label and active menu entry for `preset`.
pub fn viewport(preset: ViewportPreset) {
    set_html(
        "viewportDropdown",
        &format!(
            r#"<i class="{}"></i><span class="d-none d-md-inline ms-1">{}</span>"#,
            preset.icon(),
            escaped(&preset.label())
        ),
    );
    if let Ok(items) = gloo_utils::document().query_selector_all("#viewportMenu a") {
        for i in 0..items.length() {
            if let Some(item) = items.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                let is_active = item
                    .get_attribute("data-viewport")
                    .is_some_and(|v| v == preset.id());
                toggle_class(&item, "active", is_active);
            }
        }
    }
}

pub fn zoom(zoom: Zoom) {
    set_text("zoomValue", &zoom.percent_label());
    if let Some(thumb) = by_id::<HtmlElement>("zoomThumb") {
        let left = format!("calc({}% - 7px)", zoom.slider_position() * 100.0);
        dom::set_style(&thumb, "left", &left);
    }
}

pub fn fullscreen(on: bool) {
    if let Ok(Some(panel)) = gloo_utils::document().query_selector(".preview-panel") {
        toggle_class(&panel, "fullscreen-mode", on);
    }
    let icon = if on { "compress" } else { "expand" };
    set_html("fullscreenBtn", &format!(r#"<i class="fas fa-{icon}"></i>"#));
}

/// Highlight the tab for `pane` and show only its editor container.
pub fn tabs(active: trellis_core::Pane) {
    let document = gloo_utils::document();
    if let Ok(buttons) = document.query_selector_all(".tab-btn") {
        for i in 0..buttons.length() {
            if let Some(button) = buttons.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                let is_active = button
                    .get_attribute("data-lang")
                    .is_some_and(|l| l == active.as_str());
                toggle_class(&button, "active", is_active);
            }
        }
    }
    for pane in trellis_core::Pane::ALL {
        if let Some(el) = by_id::<HtmlElement>(&crate::editor::container_id(pane)) {
            let display = if pane == active { "block" } else { "none" };
            dom::set_style(&el, "display", display);
        }
    }
}

/// Hide a Bootstrap modal by id, if Bootstrap is on the page.
pub fn close_dialog(id: &str) {
    let Some(el) = by_id::<Element>(id) else {
        return;
    };
    match bootstrap::Modal::get_instance(&el) {
        Ok(Some(modal)) => modal.hide(),
        Ok(None) => {}
        Err(e) => tracing::debug!(id, "no modal support: {:?}", e),
    }
}

mod bootstrap {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_namespace = bootstrap)]
        pub type Modal;

        #[wasm_bindgen(catch, static_method_of = Modal, js_namespace = bootstrap, js_name = getInstance)]
        pub fn get_instance(element: &web_sys::Element) -> Result<Option<Modal>, JsValue>;

        #[wasm_bindgen(method)]
        pub fn hide(this: &Modal);
    }
}
