//! Fixed wiring from page controls and keys to [`AppEvent`]s.

use std::collections::HashMap;

use smol_str::SmolStr;

use crate::app::AppEvent;
use crate::document::Pane;
use crate::export::ExportKind;
use crate::feedback::Feedback;
use crate::templates::CategoryFilter;
use crate::viewport::ViewportPreset;

/// Key values, as reported by keyboard events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Character(SmolStr),
    Escape,
    Enter,
    Unidentified,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Key::Escape,
            "Enter" => Key::Enter,
            k if k.chars().count() == 1 => Key::Character(SmolStr::new(k)),
            _ => Key::Unidentified,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }
}

/// What a control does. Some need page state read at click time.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Event(AppEvent),
    /// Share against the current page address.
    Share,
    /// Submit the feedback form's current values.
    SubmitFeedback,
}

/// Page state some bindings read when they fire.
pub trait HostContext {
    fn page_url(&self) -> String;

    fn feedback_form(&self) -> Feedback;
}

/// Control ids and key combos, and the events they raise.
#[derive(Debug, Clone)]
pub struct BindingTable {
    controls: Vec<(&'static str, Binding)>,
    keys: HashMap<KeyCombo, AppEvent>,
}

impl Default for BindingTable {
    fn default() -> Self {
        use AppEvent as E;
        let ev = Binding::Event;
        let controls = vec![
            ("themeToggle", ev(E::ToggleTheme)),
            ("runBtn", ev(E::Run)),
            ("copyBtn", ev(E::Copy)),
            ("formatBtn", ev(E::Format)),
            ("clearBtn", ev(E::Clear { confirmed: false })),
            ("resetBtnEditor", ev(E::Reset { confirmed: false })),
            ("resetBtn", ev(E::Reset { confirmed: false })),
            ("newWindowBtn", ev(E::OpenPopout)),
            ("fullscreenBtn", ev(E::ToggleFullscreen)),
            ("exitFullscreenBtn", ev(E::ToggleFullscreen)),
            ("downloadHtmlBtn", ev(E::Export(ExportKind::File))),
            ("screenshotBtn", ev(E::Export(ExportKind::Raster))),
            ("exportPdfBtn", ev(E::Export(ExportKind::Paginated))),
            ("autoSaveStatus", ev(E::ToggleAutosave)),
            ("installPWA", ev(E::Install)),
            ("shareBtn", Binding::Share),
            ("saveProjectBtn", ev(E::SaveProject { name: None })),
            ("newProjectBtn", ev(E::NewProject { confirmed: false })),
            ("submitFeedbackBtn", Binding::SubmitFeedback),
            ("hideErrorPanel", ev(E::DismissErrors)),
        ];

        let mut keys = HashMap::new();
        keys.insert(KeyCombo::new(Key::Escape), E::ExitFullscreen);

        Self { controls, keys }
    }
}

impl BindingTable {
    pub fn control_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.controls.iter().map(|(id, _)| *id)
    }

    pub fn binding(&self, control_id: &str) -> Option<&Binding> {
        self.controls
            .iter()
            .find(|(id, _)| *id == control_id)
            .map(|(_, b)| b)
    }

    /// Event for a click on `control_id`.
    pub fn click(&self, control_id: &str, host: &dyn HostContext) -> Option<AppEvent> {
        let event = match self.binding(control_id)? {
            Binding::Event(event) => event.clone(),
            Binding::Share => AppEvent::Share {
                page_url: host.page_url(),
            },
            Binding::SubmitFeedback => AppEvent::SubmitFeedback(host.feedback_form()),
        };
        Some(event)
    }

    /// Event for a control identified by a `data-*` attribute instead of an
    /// id: editor tabs (`lang`), viewport menu items (`viewport`) and
    /// gallery category buttons (`category`).
    pub fn data_attribute(&self, attribute: &str, value: &str) -> Option<AppEvent> {
        match attribute {
            "lang" => Pane::from_name(value).map(AppEvent::SwitchTab),
            "viewport" => ViewportPreset::from_id(value).map(AppEvent::ChangeViewport),
            "category" => CategoryFilter::from_name(value).map(AppEvent::FilterTemplates),
            _ => None,
        }
    }

    pub fn key(&self, combo: &KeyCombo) -> Option<AppEvent> {
        self.keys.get(combo).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::FeedbackCategory;

    struct FakeHost;

    impl HostContext for FakeHost {
        fn page_url(&self) -> String {
            "https://play.example/".to_string()
        }

        fn feedback_form(&self) -> Feedback {
            Feedback::new(FeedbackCategory::Bug, "broken")
        }
    }

    #[test]
    fn test_clicks() {
        let table = BindingTable::default();
        assert_eq!(table.click("runBtn", &FakeHost), Some(AppEvent::Run));
        assert_eq!(
            table.click("clearBtn", &FakeHost),
            Some(AppEvent::Clear { confirmed: false })
        );
        assert_eq!(
            table.click("shareBtn", &FakeHost),
            Some(AppEvent::Share {
                page_url: "https://play.example/".into()
            })
        );
        assert!(matches!(
            table.click("submitFeedbackBtn", &FakeHost),
            Some(AppEvent::SubmitFeedback(f)) if f.message == "broken"
        ));
        assert_eq!(table.click("nope", &FakeHost), None);
    }

    #[test]
    fn test_data_attributes() {
        let table = BindingTable::default();
        assert_eq!(
            table.data_attribute("lang", "css"),
            Some(AppEvent::SwitchTab(Pane::Styling))
        );
        assert_eq!(
            table.data_attribute("viewport", "galaxy-fold"),
            Some(AppEvent::ChangeViewport(ViewportPreset::GalaxyFold))
        );
        assert_eq!(
            table.data_attribute("category", "all"),
            Some(AppEvent::FilterTemplates(CategoryFilter::All))
        );
        assert_eq!(table.data_attribute("viewport", "watch"), None);
    }

    #[test]
    fn test_escape_exits_fullscreen() {
        let table = BindingTable::default();
        let combo = KeyCombo::new(Key::from_dom("Escape"));
        assert_eq!(table.key(&combo), Some(AppEvent::ExitFullscreen));

        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        assert_eq!(table.key(&KeyCombo::with_modifiers(Key::Escape, ctrl)), None);
    }

    #[test]
    fn test_control_ids_unique() {
        let table = BindingTable::default();
        let mut ids: Vec<_> = table.control_ids().collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
