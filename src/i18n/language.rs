use serde::{Deserialize, Serialize};

/// A supported display language.
///
/// Portuguese is the fallback everywhere a preference is not yet known, so a
/// first render and a hydrated render agree until the stored value is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Pt,
    En,
}

impl Language {
    /// ISO 639-1 code, also the value persisted under the `"language"` key.
    pub fn code(self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
        }
    }

    /// Parse a persisted code. Anything outside the two-value domain is `None`.
    pub fn from_code(code: &str) -> Option<Language> {
        match code {
            "pt" => Some(Language::Pt),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    /// Derive a language from a reported locale such as `pt-BR` or `en-US`.
    ///
    /// A `pt` prefix (case-insensitive) selects Portuguese, everything else
    /// English. Locale lists like `Accept-Language` values are resolved by
    /// their first entry.
    pub fn detect(locale: &str) -> Language {
        let first = locale.split(',').next().unwrap_or("").trim();
        if first.to_ascii_lowercase().starts_with("pt") { Language::Pt } else { Language::En }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Pt
    }
}
