//! Internationalization (i18n) for the portfolio.
//!
//! Two languages are supported: Portuguese (the default shown before any
//! preference is known) and English. The module holds the language type with
//! locale detection, the typed translation catalog, and the observable
//! preference store with pluggable persistence.

mod catalog;
mod language;
mod store;

pub use catalog::{ContactStrings, TranslationCatalog, Translations};
pub use language::Language;
pub use store::{FileStorage, InMemoryStorage, LanguageStore, PreferenceStorage};
