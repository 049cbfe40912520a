//! Application state and event dispatch.
//!
//! [`App`] owns every piece of session state. The host feeds it
//! [`AppEvent`]s and carries out the returned [`Effect`]s; nothing here
//! touches a DOM, so the whole flow runs natively in tests.

use std::fmt;

use web_time::Duration;

use crate::analytics::{Counter, Counters};
use crate::autosave::{Autosave, TickOutcome};
use crate::clock::{Clock, SystemClock};
use crate::config::PlaygroundConfig;
use crate::document::{Document, Pane};
use crate::editor::{EditorSurface, Theme};
use crate::error::{EditorError, ExportError, StoreError};
use crate::errors::{ErrorLog, Notifications};
use crate::export::{self, CaptureRequest, ExportGate, ExportKind, PageLayout};
use crate::feedback::Feedback;
use crate::preview::{self, FrameMessage, PreviewRenderer, RenderReason};
use crate::share;
use crate::store::{ContentStore, KeyValueStore};
use crate::templates::{self, CategoryFilter, Template};
use crate::viewport::{Size, ViewportPreset, Zoom, ZoomController};

/// What a clipboard write was for, so the result can be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardPurpose {
    Code,
    ShareLink,
}

/// Everything that can happen to the playground.
///
/// Destructive events carry `confirmed`. Dispatching them unconfirmed
/// yields [`Effect::Confirm`] with the confirmed event to send back.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The user edited a pane directly in its backend.
    Input(Pane),
    /// Replace a pane's text programmatically.
    SetText { pane: Pane, text: String },
    SwitchTab(Pane),
    Run,
    Format,
    Copy,
    Clear { confirmed: bool },
    Reset { confirmed: bool },
    ToggleTheme,

    ChangeViewport(ViewportPreset),
    ContainerResized(Size),
    ZoomSlider(f64),
    ToggleFullscreen,
    ExitFullscreen,
    OpenPopout,

    Export(ExportKind),
    /// The host finished writing an export, or gave up.
    ExportFinished {
        kind: ExportKind,
        result: Result<(), String>,
    },

    AutosaveTick,
    AutosaveSettle,
    ToggleAutosave,
    /// The page is going away.
    Unload,

    LoadRecent { index: usize, confirmed: bool },
    /// Save the current document as a project. `None` asks for a name first.
    SaveProject { name: Option<String> },
    NewProject { confirmed: bool },
    LoadProject { id: String, confirmed: bool },
    DeleteProject { id: String, confirmed: bool },

    LoadTemplate { key: String, confirmed: bool },
    FilterTemplates(CategoryFilter),
    SearchTemplates(String),

    /// Build a share link against the given page address.
    Share { page_url: String },
    ClipboardWritten { purpose: ClipboardPurpose, ok: bool },
    SubmitFeedback(Feedback),
    Install,
    InstallOffered(bool),

    FrameError(FrameMessage),
    /// The rich editor could not be started; the fallback stays.
    EditorUnavailable(String),
    DismissErrors,
    ExpireNotifications,
}

/// UI regions that need redrawing from [`App`] state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Recent,
    Projects,
    Gallery,
    Errors,
    Notifications,
    Autosave,
    Stats,
}

/// Dialog ids in the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    Projects,
    Templates,
    Feedback,
}

impl Dialog {
    pub fn element_id(self) -> &'static str {
        match self {
            Dialog::Projects => "projectsModal",
            Dialog::Templates => "templatesModal",
            Dialog::Feedback => "feedbackModal",
        }
    }
}

/// Work for the host to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    RenderPreview(String),
    /// Save a file; the host answers with `ExportFinished`.
    Download(export::ExportFile),
    Capture {
        kind: ExportKind,
        request: CaptureRequest,
        page: Option<PageLayout>,
    },
    OpenMailto(String),
    CopyToClipboard {
        text: String,
        purpose: ClipboardPurpose,
    },
    ReplaceUrl(String),
    Confirm {
        message: String,
        then: Box<AppEvent>,
    },
    /// Ask for a project name, then send `SaveProject { name: Some(..) }`.
    PromptProjectName { default: String },
    /// Synchronous rejection of user input.
    Alert(String),
    OpenPopout(String),
    PromptInstall,
    ApplyTheme(Theme),
    ApplyViewport(ViewportPreset),
    ApplyZoom(Zoom),
    SetFullscreen(bool),
    Notify(String),
    CloseDialog(Dialog),
    Refresh(Panel),
    /// Dispatch `event` after `after` has passed.
    Schedule { after: Duration, event: Box<AppEvent> },
}

/// Which capture routines the host page provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureSupport {
    pub raster: bool,
    pub paginated: bool,
}

impl CaptureSupport {
    pub const ALL: Self = Self {
        raster: true,
        paginated: true,
    };

    fn supports(self, kind: ExportKind) -> bool {
        match kind {
            ExportKind::File => true,
            ExportKind::Raster => self.raster,
            ExportKind::Paginated => self.paginated,
        }
    }
}

pub struct App<S> {
    config: PlaygroundConfig,
    clock: Box<dyn Clock>,
    editor: EditorSurface,
    renderer: PreviewRenderer,
    zoom: ZoomController,
    container: Size,
    frame_scroll: Size,
    autosave: Autosave,
    store: ContentStore<S>,
    counters: Counters,
    errors: ErrorLog,
    notifications: Notifications,
    theme: Theme,
    fullscreen: bool,
    exports: ExportGate,
    capture: CaptureSupport,
    install_available: bool,
    gallery_filter: CategoryFilter,
    gallery_search: String,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(config: PlaygroundConfig, editor: EditorSurface, backend: S) -> Self {
        Self::with_clock(config, editor, backend, Box::new(SystemClock))
    }

    pub fn with_clock(
        config: PlaygroundConfig,
        editor: EditorSurface,
        backend: S,
        clock: Box<dyn Clock>,
    ) -> Self {
        let store = ContentStore::with_prefix(
            backend,
            config.storage_prefix.clone(),
            config.recent_capacity,
        );
        let counters = store.counters();
        let autosave = Autosave::new(store.autosave_enabled(), &config);
        let notifications =
            Notifications::new(config.notification_limit, config.notification_lifetime());
        Self {
            zoom: ZoomController::new(config.zoom_padding),
            config,
            clock,
            editor,
            renderer: PreviewRenderer::new(),
            container: Size::default(),
            frame_scroll: Size::default(),
            autosave,
            store,
            counters,
            errors: ErrorLog::new(),
            notifications,
            theme: Theme::default(),
            fullscreen: false,
            exports: ExportGate::new(),
            capture: CaptureSupport::default(),
            install_available: false,
            gallery_filter: CategoryFilter::All,
            gallery_search: String::new(),
        }
    }

    pub fn set_capture_support(&mut self, capture: CaptureSupport) {
        self.capture = capture;
    }

    /// Session start: counts the session, restores preferences and the last
    /// document, then applies a share link found in `page_url`.
    pub fn start(&mut self, page_url: Option<&str>) -> Vec<Effect> {
        let mut fx = Vec::new();
        self.count(Counter::Sessions);

        self.theme = self.store.theme();
        self.editor.set_theme(self.theme);
        fx.push(Effect::ApplyTheme(self.theme));

        if let Some(doc) = self.store.load_current() {
            self.editor.replace_document(&doc);
        }

        if let Some(url) = page_url {
            self.apply_share_link(url, &mut fx);
        }

        let zoom = self.zoom.change_viewport(ViewportPreset::Desktop, self.container);
        fx.push(Effect::ApplyViewport(ViewportPreset::Desktop));
        fx.push(Effect::ApplyZoom(zoom));

        self.render(RenderReason::Load, &mut fx);
        fx.push(Effect::Refresh(Panel::Autosave));
        fx.push(Effect::Refresh(Panel::Recent));
        tracing::info!(
            editor = ?self.editor.kind(),
            autosave = self.autosave.is_enabled(),
            "playground started"
        );
        fx
    }

    /// Swap in a different editor surface, keeping the current text.
    pub fn install_editor(&mut self, mut editor: EditorSurface) -> Vec<Effect> {
        let doc = self.editor.document();
        editor.replace_document(&doc);
        editor.set_theme(self.theme);
        editor.switch_tab(self.editor.active());
        tracing::info!(from = ?self.editor.kind(), to = ?editor.kind(), "editor backend replaced");
        self.editor = editor;
        let mut fx = Vec::new();
        self.render(RenderReason::Load, &mut fx);
        fx
    }

    pub fn dispatch(&mut self, event: AppEvent) -> Vec<Effect> {
        let mut fx = Vec::new();
        match event {
            AppEvent::Input(pane) => {
                self.editor.notify_input(pane);
                self.render(RenderReason::Change(pane), &mut fx);
            }
            AppEvent::SetText { pane, text } => {
                self.editor.set(pane, &text);
                self.render(RenderReason::Change(pane), &mut fx);
            }
            AppEvent::SwitchTab(pane) => self.editor.switch_tab(pane),
            AppEvent::Run => self.render(RenderReason::Run, &mut fx),
            AppEvent::Format => self.format(&mut fx),
            AppEvent::Copy => {
                let text = self.editor.get(self.editor.active());
                if !text.is_empty() {
                    fx.push(Effect::CopyToClipboard {
                        text,
                        purpose: ClipboardPurpose::Code,
                    });
                }
            }
            AppEvent::Clear { confirmed } => {
                let pane = self.editor.active();
                if !confirmed {
                    let message = format!("Clear the {} editor?", pane.as_str().to_uppercase());
                    confirm(&mut fx, message, AppEvent::Clear { confirmed: true });
                } else {
                    self.editor.set(pane, "");
                    self.render(RenderReason::Change(pane), &mut fx);
                }
            }
            AppEvent::Reset { confirmed } => {
                if !confirmed {
                    confirm(
                        &mut fx,
                        "Reset all editors to default content?",
                        AppEvent::Reset { confirmed: true },
                    );
                } else {
                    self.replace_document(&Document::starter(), &mut fx);
                    self.notify("Editors have been reset.", &mut fx);
                }
            }
            AppEvent::ToggleTheme => {
                self.theme = self.theme.toggled();
                self.editor.set_theme(self.theme);
                if let Err(e) = self.store.set_theme(self.theme) {
                    tracing::warn!(error = %e, "theme preference not saved");
                }
                fx.push(Effect::ApplyTheme(self.theme));
            }

            AppEvent::ChangeViewport(preset) => {
                let zoom = self.zoom.change_viewport(preset, self.container);
                fx.push(Effect::ApplyViewport(preset));
                fx.push(Effect::ApplyZoom(zoom));
                self.notify(format!("Viewport: {preset}"), &mut fx);
            }
            AppEvent::ContainerResized(size) => self.container = size,
            AppEvent::ZoomSlider(position) => {
                fx.push(Effect::ApplyZoom(self.zoom.set_slider(position)));
            }
            AppEvent::ToggleFullscreen => {
                self.fullscreen = !self.fullscreen;
                fx.push(Effect::SetFullscreen(self.fullscreen));
            }
            AppEvent::ExitFullscreen => {
                if self.fullscreen {
                    self.fullscreen = false;
                    fx.push(Effect::SetFullscreen(false));
                }
            }
            AppEvent::OpenPopout => {
                fx.push(Effect::OpenPopout(preview::render_popout(&self.editor.document())));
            }

            AppEvent::Export(kind) => self.export(kind, &mut fx),
            AppEvent::ExportFinished { kind, result } => {
                self.exports.finish(kind);
                match result {
                    Ok(()) => self.export_succeeded(kind, &mut fx),
                    Err(reason) => {
                        let error = if kind.needs_capture() {
                            ExportError::Capture(reason)
                        } else {
                            ExportError::Download(reason)
                        };
                        self.notify(kind.failure_message(), &mut fx);
                        self.fail(kind.context(), error, &mut fx);
                    }
                }
            }

            AppEvent::AutosaveTick => self.autosave_tick(true, &mut fx),
            AppEvent::AutosaveSettle => {
                let now = self.clock.now();
                self.autosave.settle(now);
                fx.push(Effect::Refresh(Panel::Autosave));
                self.schedule_settle(&mut fx);
            }
            AppEvent::ToggleAutosave => {
                let enabled = self.autosave.toggle();
                let word = if enabled { "enabled" } else { "disabled" };
                self.notify(format!("Auto-save {word}."), &mut fx);
                fx.push(Effect::Refresh(Panel::Autosave));
                if let Err(e) = self.store.set_autosave_enabled(enabled) {
                    tracing::warn!(error = %e, "autosave preference not saved");
                }
            }
            AppEvent::Unload => self.autosave_tick(false, &mut fx),

            AppEvent::LoadRecent { index, confirmed } => {
                let Some(snapshot) = self.store.recent(index) else {
                    return fx;
                };
                if !confirmed {
                    confirm(
                        &mut fx,
                        "Load this version? Unsaved changes will be lost.",
                        AppEvent::LoadRecent {
                            index,
                            confirmed: true,
                        },
                    );
                } else {
                    self.replace_document(&snapshot.document, &mut fx);
                    let at = snapshot.saved_at.format("%H:%M:%S");
                    self.notify(format!("Loaded save from {at}"), &mut fx);
                }
            }
            AppEvent::SaveProject { name } => self.save_project(name, &mut fx),
            AppEvent::NewProject { confirmed } => {
                if !confirmed {
                    confirm(
                        &mut fx,
                        "Clear all editors for a new project?",
                        AppEvent::NewProject { confirmed: true },
                    );
                } else {
                    self.replace_document(&Document::starter(), &mut fx);
                    self.count(Counter::ProjectsCreated);
                    self.notify("New blank project started.", &mut fx);
                    fx.push(Effect::CloseDialog(Dialog::Projects));
                    fx.push(Effect::Refresh(Panel::Stats));
                }
            }
            AppEvent::LoadProject { id, confirmed } => {
                let Some(project) = self.store.load_project(&id) else {
                    return fx;
                };
                if !confirmed {
                    let message = format!("Load project \"{}\"?", project.name);
                    confirm(&mut fx, message, AppEvent::LoadProject { id, confirmed: true });
                } else {
                    self.replace_document(&project.document, &mut fx);
                    self.notify(format!("Project \"{}\" loaded.", project.name), &mut fx);
                    fx.push(Effect::CloseDialog(Dialog::Projects));
                }
            }
            AppEvent::DeleteProject { id, confirmed } => {
                let Some(project) = self.store.load_project(&id) else {
                    return fx;
                };
                if !confirmed {
                    let message = format!("Delete project \"{}\"?", project.name);
                    confirm(&mut fx, message, AppEvent::DeleteProject { id, confirmed: true });
                } else {
                    match self.store.delete_project(&id) {
                        Ok(_) => {
                            self.notify("Project deleted.", &mut fx);
                            fx.push(Effect::Refresh(Panel::Projects));
                        }
                        Err(e) => self.fail("Delete Project", e, &mut fx),
                    }
                }
            }

            AppEvent::LoadTemplate { key, confirmed } => {
                let Some(template) = templates::find(&key) else {
                    self.notify("Template not found.", &mut fx);
                    return fx;
                };
                if !confirmed {
                    confirm(
                        &mut fx,
                        "Load template and overwrite current code?",
                        AppEvent::LoadTemplate {
                            key,
                            confirmed: true,
                        },
                    );
                } else {
                    self.replace_document(&template.document(), &mut fx);
                    self.count(Counter::TemplatesLoaded);
                    self.notify(format!("Template \"{}\" loaded.", template.name), &mut fx);
                    fx.push(Effect::CloseDialog(Dialog::Templates));
                }
            }
            AppEvent::FilterTemplates(filter) => {
                self.gallery_filter = filter;
                fx.push(Effect::Refresh(Panel::Gallery));
            }
            AppEvent::SearchTemplates(search) => {
                self.gallery_search = search;
                fx.push(Effect::Refresh(Panel::Gallery));
            }

            AppEvent::Share { page_url } => {
                let doc = self.editor.document();
                match share::share_url_with(&page_url, &self.config.share_param, &doc) {
                    Ok(text) => fx.push(Effect::CopyToClipboard {
                        text,
                        purpose: ClipboardPurpose::ShareLink,
                    }),
                    Err(e) => self.fail("Share Code", e, &mut fx),
                }
            }
            AppEvent::ClipboardWritten { purpose, ok } => {
                let message = match (purpose, ok) {
                    (ClipboardPurpose::Code, true) => "Code copied to clipboard!",
                    (ClipboardPurpose::Code, false) => "Failed to copy code.",
                    (ClipboardPurpose::ShareLink, true) => "Share link copied to clipboard!",
                    (ClipboardPurpose::ShareLink, false) => "Failed to copy link.",
                };
                self.notify(message, &mut fx);
            }
            AppEvent::SubmitFeedback(feedback) => {
                match feedback.to_mailto(&self.config.feedback_recipient) {
                    Ok(link) => {
                        fx.push(Effect::OpenMailto(link));
                        fx.push(Effect::CloseDialog(Dialog::Feedback));
                        self.notify("Thank you for your feedback!", &mut fx);
                    }
                    Err(e) => fx.push(Effect::Alert(e.to_string())),
                }
            }
            AppEvent::Install => {
                if self.install_available {
                    fx.push(Effect::PromptInstall);
                } else {
                    self.notify("App installation not available.", &mut fx);
                }
            }
            AppEvent::InstallOffered(available) => self.install_available = available,

            AppEvent::FrameError(message) => self.fail("Preview", message, &mut fx),
            AppEvent::EditorUnavailable(reason) => {
                self.fail("Editor Init", EditorError::Backend(reason), &mut fx)
            }
            AppEvent::DismissErrors => {
                self.errors.dismiss();
                fx.push(Effect::Refresh(Panel::Errors));
            }
            AppEvent::ExpireNotifications => {
                let now = self.clock.now();
                if self.notifications.expire(now) > 0 {
                    fx.push(Effect::Refresh(Panel::Notifications));
                }
            }
        }
        fx
    }

    pub fn config(&self) -> &PlaygroundConfig {
        &self.config
    }

    pub fn editor(&self) -> &EditorSurface {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorSurface {
        &mut self.editor
    }

    pub fn document(&self) -> Document {
        self.editor.document()
    }

    pub fn renderer(&self) -> &PreviewRenderer {
        &self.renderer
    }

    pub fn zoom(&self) -> &ZoomController {
        &self.zoom
    }

    pub fn autosave(&self) -> &Autosave {
        &self.autosave
    }

    pub fn store(&self) -> &ContentStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ContentStore<S> {
        &mut self.store
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn exports(&self) -> &ExportGate {
        &self.exports
    }

    /// Gallery entries under the current filter and search.
    pub fn gallery(&self) -> Vec<&'static Template> {
        templates::filter(self.gallery_filter, &self.gallery_search)
    }

    pub fn gallery_filter(&self) -> CategoryFilter {
        self.gallery_filter
    }

    /// Record the frame's scrollable size, used for fill-mode captures.
    pub fn set_frame_scroll(&mut self, size: Size) {
        self.frame_scroll = size;
    }

    fn render(&mut self, reason: RenderReason, fx: &mut Vec<Effect>) {
        let doc = self.editor.document();
        let html = self.renderer.render(&doc, reason);
        fx.push(Effect::RenderPreview(html.to_string()));
    }

    fn replace_document(&mut self, doc: &Document, fx: &mut Vec<Effect>) {
        self.editor.replace_document(doc);
        self.render(RenderReason::Load, fx);
    }

    fn format(&mut self, fx: &mut Vec<Effect>) {
        match self.editor.format_active() {
            Ok(change) => {
                self.render(RenderReason::Change(change.pane), fx);
                self.notify("Code formatted.", fx);
            }
            Err(e @ EditorError::FormattingUnavailable) => self.notify(e.to_string(), fx),
            Err(e) => self.fail("Format", e, fx),
        }
    }

    fn apply_share_link(&mut self, page_url: &str, fx: &mut Vec<Effect>) {
        let Some((decoded, stripped)) = share::take_shared_with(page_url, &self.config.share_param)
        else {
            return;
        };
        match decoded {
            Ok(doc) => {
                self.editor.replace_document(&doc);
                self.notify("Shared code loaded successfully!", fx);
            }
            Err(e) => self.fail("Load Shared Code", e, fx),
        }
        fx.push(Effect::ReplaceUrl(stripped));
    }

    fn export(&mut self, kind: ExportKind, fx: &mut Vec<Effect>) {
        if !kind.needs_capture() {
            let file = export::export_file(&self.editor.document());
            fx.push(Effect::Download(file));
            return;
        }
        if !self.capture.supports(kind) {
            self.notify(kind.missing_library_message(), fx);
            self.fail(kind.context(), ExportError::MissingLibrary(library_name(kind)), fx);
            return;
        }
        if let Err(e) = self.exports.begin(kind) {
            self.notify(e.to_string(), fx);
            return;
        }
        if let Some(progress) = kind.progress_message() {
            self.notify(progress, fx);
        }
        let request = CaptureRequest::for_viewport(
            self.zoom.preset(),
            self.zoom.zoom(),
            self.container,
            self.frame_scroll,
        );
        let page = (kind == ExportKind::Paginated).then(|| PageLayout::for_capture(request.size()));
        fx.push(Effect::Capture {
            kind,
            request,
            page,
        });
    }

    fn export_succeeded(&mut self, kind: ExportKind, fx: &mut Vec<Effect>) {
        self.count(Counter::Exports);
        tracing::info!(%kind, "export complete");
        self.notify(kind.success_message(), fx);
    }

    /// One autosave pass. `scheduled` is false for the final save on unload,
    /// which has no display window to follow.
    fn autosave_tick(&mut self, scheduled: bool, fx: &mut Vec<Effect>) {
        let now = self.clock.now();
        let wall = self.clock.wall();
        let doc = self.editor.document();
        let store = &mut self.store;
        let outcome = self.autosave.tick(now, || -> Result<(), StoreError> {
            store.save_current(&doc)?;
            store.append_recent(&doc, wall)?;
            Ok(())
        });
        match outcome {
            TickOutcome::Skipped => return,
            TickOutcome::Saved => {
                self.count(Counter::Saves);
                tracing::info!("autosaved");
                fx.push(Effect::Refresh(Panel::Recent));
            }
            TickOutcome::Failed(e) => {
                self.notify("Auto save failed.", fx);
                self.fail("Auto Save", e, fx);
            }
        }
        if scheduled {
            fx.push(Effect::Refresh(Panel::Autosave));
            self.schedule_settle(fx);
        }
    }

    fn schedule_settle(&self, fx: &mut Vec<Effect>) {
        if let Some(after) = self.autosave.next_settle(self.clock.now()) {
            fx.push(Effect::Schedule {
                after,
                event: Box::new(AppEvent::AutosaveSettle),
            });
        }
    }

    fn save_project(&mut self, name: Option<String>, fx: &mut Vec<Effect>) {
        let wall = self.clock.wall();
        let Some(name) = name else {
            fx.push(Effect::PromptProjectName {
                default: format!("My Project {}", wall.format("%Y-%m-%d")),
            });
            return;
        };
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let doc = self.editor.document();
        match self.store.create_project(name, &doc, wall) {
            Ok(project) => {
                self.count(Counter::ProjectsCreated);
                self.notify(format!("Project \"{}\" saved!", project.name), fx);
                fx.push(Effect::Refresh(Panel::Projects));
            }
            Err(e) => self.fail("Save Project", e, fx),
        }
    }

    fn persist_counters(&mut self) {
        if let Err(e) = self.store.save_counters(&self.counters) {
            tracing::warn!(error = %e, "counters not saved");
        }
    }

    fn count(&mut self, counter: Counter) {
        self.counters.increment(counter);
        self.persist_counters();
    }

    fn notify(&mut self, message: impl Into<String>, fx: &mut Vec<Effect>) {
        let message = message.into();
        let now = self.clock.now();
        self.notifications.push(message.clone(), now);
        fx.push(Effect::Notify(message));
        fx.push(Effect::Schedule {
            after: self.notifications.lifetime(),
            event: Box::new(AppEvent::ExpireNotifications),
        });
    }

    /// Record a non-fatal fault: error list, error counter, panel refresh.
    fn fail(&mut self, context: &str, error: impl fmt::Display, fx: &mut Vec<Effect>) {
        self.errors.push(context, error.to_string());
        self.count(Counter::Errors);
        fx.push(Effect::Refresh(Panel::Errors));
        fx.push(Effect::Refresh(Panel::Stats));
    }
}

fn confirm(fx: &mut Vec<Effect>, message: impl Into<String>, then: AppEvent) {
    fx.push(Effect::Confirm {
        message: message.into(),
        then: Box::new(then),
    });
}

fn library_name(kind: ExportKind) -> &'static str {
    match kind {
        ExportKind::Paginated => "jsPDF",
        _ => "html2canvas",
    }
}
