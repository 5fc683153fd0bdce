use crate::i18n::Language;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::warn;

/// Storage key for the persisted language preference.
const LANGUAGE_KEY: &str = "language";

/// Key/value persistence behind the language store.
///
/// The production frontend keeps this in browser-local storage; here it is a
/// seam so the store can run against a file on disk or plain memory in tests.
pub trait PreferenceStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> std::io::Result<()>;
}

/// In-memory storage, used by tests and as a default for ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().expect("storage mutex poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        self.values.lock().expect("storage mutex poisoned").insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed storage: one file per key under a root directory.
#[derive(Debug)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl PreferenceStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok().map(|s| s.trim().to_string())
    }

    fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.path_for(key), value)
    }
}

/// Observable language preference store.
///
/// Holds exactly one active language, publishes every change on a watch
/// channel, and persists it under the `"language"` key. Consumers re-read the
/// derived translations from [`crate::i18n::TranslationCatalog`] when
/// notified; the store itself carries no strings.
pub struct LanguageStore {
    storage: Box<dyn PreferenceStorage>,
    current: watch::Sender<Language>,
}

impl LanguageStore {
    /// Initialize the store for a session.
    ///
    /// A previously persisted value wins over locale detection; with neither,
    /// the store starts at the Portuguese default. Consumers that run before
    /// this constructor (the pre-hydration render) must use
    /// `Language::default()` themselves.
    pub fn initialize(storage: Box<dyn PreferenceStorage>, reported_locale: Option<&str>) -> Self {
        let initial = storage
            .get(LANGUAGE_KEY)
            .as_deref()
            .and_then(Language::from_code)
            .unwrap_or_else(|| reported_locale.map(Language::detect).unwrap_or_default());

        let (current, _) = watch::channel(initial);
        Self { storage, current }
    }

    /// The active language.
    pub fn language(&self) -> Language {
        *self.current.borrow()
    }

    /// Switch the active language and persist it.
    ///
    /// Synchronous in-memory update, then best-effort persistence; a storage
    /// failure is logged and the in-memory state still changes. Setting the
    /// already-active language is a no-op apart from the redundant persist.
    pub fn set_language(&self, language: Language) {
        self.current.send_replace(language);
        if let Err(e) = self.storage.set(LANGUAGE_KEY, language.code()) {
            warn!(language = language.code(), error = %e, "failed to persist language preference");
        }
    }

    /// Subscribe to language changes. The receiver immediately sees the
    /// current value and is woken on every `set_language`.
    pub fn subscribe(&self) -> watch::Receiver<Language> {
        self.current.subscribe()
    }
}
