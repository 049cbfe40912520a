//! Key-value persistence for documents, projects, preferences and counters.
//!
//! Each logical record lives under one key and is always written whole.
//! Reads never fail: a missing or unreadable record comes back as its
//! default, with a warning logged.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use smol_str::{SmolStr, format_smolstr};

use crate::analytics::{Counter, Counters};
use crate::document::{Document, Project, Snapshot};
use crate::editor::Theme;
use crate::error::StoreError;

const CURRENT: &str = "current";
const RECENT: &str = "recent";
const PROJECTS: &str = "projects";
const THEME: &str = "theme";
const AUTOSAVE: &str = "autosave";
const ANALYTICS: &str = "analytics";

pub const DEFAULT_PREFIX: &str = "trellis:";
pub const DEFAULT_RECENT_CAPACITY: usize = 5;

/// Raw string storage, e.g. browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str);
}

/// In-memory store for native use and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, as a full quota would.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::Write {
                key: key.to_string(),
                reason: "store is read-only".to_string(),
            });
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Typed records on top of a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct ContentStore<S> {
    backend: S,
    prefix: SmolStr,
    recent_capacity: usize,
}

impl<S: KeyValueStore> ContentStore<S> {
    pub fn new(backend: S) -> Self {
        Self::with_prefix(backend, DEFAULT_PREFIX, DEFAULT_RECENT_CAPACITY)
    }

    pub fn with_prefix(backend: S, prefix: impl Into<SmolStr>, recent_capacity: usize) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
            recent_capacity,
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    pub fn save_current(&mut self, doc: &Document) -> Result<(), StoreError> {
        self.write(CURRENT, doc)
    }

    /// The last saved document.
    ///
    /// `None` if nothing was ever saved. An unreadable record is dropped and
    /// loads as an empty document.
    pub fn load_current(&mut self) -> Option<Document> {
        let key = self.key(CURRENT);
        let raw = self.backend.get(&key)?;
        match serde_json::from_str(&raw) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(%key, error = %e, "discarding unreadable current document");
                self.backend.remove(&key);
                Some(Document::default())
            }
        }
    }

    /// Push a snapshot onto the recent list, keeping only the newest entries.
    pub fn append_recent(
        &mut self,
        doc: &Document,
        saved_at: DateTime<Utc>,
    ) -> Result<Vec<Snapshot>, StoreError> {
        let mut recent = self.list_recent();
        recent.insert(0, Snapshot::new(doc.clone(), saved_at));
        recent.truncate(self.recent_capacity);
        self.write(RECENT, &recent)?;
        Ok(recent)
    }

    /// Newest first.
    pub fn list_recent(&self) -> Vec<Snapshot> {
        self.read(RECENT)
    }

    pub fn recent(&self, index: usize) -> Option<Snapshot> {
        self.list_recent().into_iter().nth(index)
    }

    /// Save a named project at the front of the list.
    pub fn create_project(
        &mut self,
        name: &str,
        doc: &Document,
        created_at: DateTime<Utc>,
    ) -> Result<Project, StoreError> {
        let mut projects = self.list_projects();
        let mut millis = created_at.timestamp_millis();
        let id = loop {
            let id = format_smolstr!("proj_{millis}");
            if projects.iter().all(|p| p.id != id) {
                break id;
            }
            millis += 1;
        };
        let project = Project {
            id,
            name: name.to_string(),
            document: doc.clone(),
            created_at,
        };
        projects.insert(0, project.clone());
        self.write(PROJECTS, &projects)?;
        tracing::info!(id = %project.id, name, "project created");
        Ok(project)
    }

    pub fn list_projects(&self) -> Vec<Project> {
        self.read(PROJECTS)
    }

    pub fn load_project(&self, id: &str) -> Option<Project> {
        self.list_projects().into_iter().find(|p| p.id == id)
    }

    /// Remove a project. Returns whether anything was removed; an unknown id
    /// leaves the stored list untouched.
    pub fn delete_project(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut projects = self.list_projects();
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Ok(false);
        }
        self.write(PROJECTS, &projects)?;
        Ok(true)
    }

    pub fn theme(&self) -> Theme {
        self.backend
            .get(&self.key(THEME))
            .and_then(|raw| Theme::from_name(&raw))
            .unwrap_or_default()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), StoreError> {
        let key = self.key(THEME);
        self.backend.set(&key, theme.as_str())
    }

    /// Defaults to enabled.
    pub fn autosave_enabled(&self) -> bool {
        let key = self.key(AUTOSAVE);
        match self.backend.get(&key) {
            None => true,
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(%key, error = %e, "unreadable autosave flag");
                true
            }),
        }
    }

    pub fn set_autosave_enabled(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.write(AUTOSAVE, &enabled)
    }

    pub fn counters(&self) -> Counters {
        self.read(ANALYTICS)
    }

    pub fn save_counters(&mut self, counters: &Counters) -> Result<(), StoreError> {
        self.write(ANALYTICS, counters)
    }

    /// Bump one counter and persist the whole record.
    pub fn increment(&mut self, counter: Counter) -> Result<Counters, StoreError> {
        let mut counters = self.counters();
        counters.increment(counter);
        self.save_counters(&counters)?;
        Ok(counters)
    }

    fn read<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let key = self.key(name);
        let Some(raw) = self.backend.get(&key) else {
            return T::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(%key, error = %e, "unreadable record, using default");
            T::default()
        })
    }

    fn write<T: Serialize + ?Sized>(&mut self, name: &str, value: &T) -> Result<(), StoreError> {
        let key = self.key(name);
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.clone(),
            source,
        })?;
        self.backend.set(&key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn doc(n: usize) -> Document {
        Document::new(format!("<p>{n}</p>"), "", "")
    }

    #[test]
    fn test_current_roundtrip() {
        let mut store = ContentStore::new(MemoryStore::new());
        assert_eq!(store.load_current(), None);

        let d = Document::new("<b>x</b>", "b{}", "1;");
        store.save_current(&d).unwrap();
        assert_eq!(store.load_current(), Some(d));
    }

    #[test]
    fn test_corrupt_current_loads_empty() {
        let mut store = ContentStore::new(MemoryStore::new());
        store.backend_mut().set("trellis:current", "{oops").unwrap();
        assert_eq!(store.load_current(), Some(Document::default()));
        assert!(store.backend().get("trellis:current").is_none());
    }

    #[test]
    fn test_current_with_missing_fields() {
        let mut store = ContentStore::new(MemoryStore::new());
        store
            .backend_mut()
            .set("trellis:current", r#"{"html":"<i>hi</i>"}"#)
            .unwrap();
        assert_eq!(store.load_current(), Some(Document::new("<i>hi</i>", "", "")));
    }

    #[test]
    fn test_recent_is_capped_newest_first() {
        let mut store = ContentStore::new(MemoryStore::new());
        for n in 0..8 {
            store.append_recent(&doc(n), at(n as i64)).unwrap();
        }
        let recent = store.list_recent();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].document, doc(7));
        assert_eq!(recent[4].document, doc(3));
        assert!(recent.windows(2).all(|w| w[0].saved_at >= w[1].saved_at));
    }

    #[test]
    fn test_corrupt_recent_is_empty() {
        let mut store = ContentStore::new(MemoryStore::new());
        store.backend_mut().set("trellis:recent", "42").unwrap();
        assert!(store.list_recent().is_empty());
        let recent = store.append_recent(&doc(1), at(0)).unwrap();
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn test_projects_prepended_with_unique_ids() {
        let mut store = ContentStore::new(MemoryStore::new());
        let a = store.create_project("A", &doc(1), at(0)).unwrap();
        let b = store.create_project("B", &doc(2), at(0)).unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("proj_"));

        let projects = store.list_projects();
        assert_eq!(projects[0].name, "B");
        assert_eq!(projects[1].name, "A");
        assert_eq!(store.load_project(&a.id).unwrap().document, doc(1));
    }

    #[test]
    fn test_delete_unknown_project_is_noop() {
        let mut store = ContentStore::new(MemoryStore::new());
        store.create_project("A", &doc(1), at(0)).unwrap();
        let before = store.backend().get("trellis:projects");

        assert!(!store.delete_project("proj_missing").unwrap());
        assert_eq!(store.backend().get("trellis:projects"), before);
    }

    #[test]
    fn test_delete_project() {
        let mut store = ContentStore::new(MemoryStore::new());
        let a = store.create_project("A", &doc(1), at(0)).unwrap();
        assert!(store.delete_project(&a.id).unwrap());
        assert!(store.list_projects().is_empty());
    }

    #[test]
    fn test_preferences_defaults_and_writes() {
        let mut store = ContentStore::new(MemoryStore::new());
        assert_eq!(store.theme(), Theme::Light);
        assert!(store.autosave_enabled());

        store.set_theme(Theme::Dark).unwrap();
        store.set_autosave_enabled(false).unwrap();
        assert_eq!(store.theme(), Theme::Dark);
        assert!(!store.autosave_enabled());
        assert_eq!(store.backend().get("trellis:theme").as_deref(), Some("vs-dark"));
    }

    #[test]
    fn test_counters_persist() {
        let mut store = ContentStore::new(MemoryStore::new());
        store.increment(Counter::Exports).unwrap();
        let counters = store.increment(Counter::Exports).unwrap();
        assert_eq!(counters.exports, 2);
        assert_eq!(store.counters().exports, 2);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let mut store = ContentStore::new(MemoryStore::new());
        store.backend_mut().set_read_only(true);
        let err = store.save_current(&doc(1)).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }

    #[test]
    fn test_custom_prefix() {
        let mut store = ContentStore::with_prefix(MemoryStore::new(), "pg/", 2);
        for n in 0..3 {
            store.append_recent(&doc(n), at(n as i64)).unwrap();
        }
        assert_eq!(store.list_recent().len(), 2);
        assert!(store.backend().get("pg/recent").is_some());
    }
}
