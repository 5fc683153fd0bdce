use crate::i18n::Language;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Navigation labels.
#[derive(Debug, Clone, Serialize)]
pub struct NavStrings {
    pub home: &'static str,
    pub about: &'static str,
    pub skills: &'static str,
    pub projects: &'static str,
    pub contact: &'static str,
}

/// Hero section copy.
#[derive(Debug, Clone, Serialize)]
pub struct HeroStrings {
    pub description: &'static str,
    pub passion: &'static str,
    pub scroll: &'static str,
}

/// About section copy.
#[derive(Debug, Clone, Serialize)]
pub struct AboutStrings {
    pub title: &'static str,
    pub description: &'static str,
    pub experience: &'static str,
    pub projects: &'static str,
}

/// Contact section copy, including every message the contact API returns to
/// the client. Server-side log detail stays in English regardless.
#[derive(Debug, Clone, Serialize)]
pub struct ContactStrings {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub all_fields_required: &'static str,
    pub name_length: &'static str,
    pub subject_length: &'static str,
    pub message_length: &'static str,
    pub invalid_email: &'static str,
    pub invalid_content_type: &'static str,
    pub invalid_json: &'static str,
    pub payload_too_large: &'static str,
    pub rate_limited: &'static str,
    pub service_unavailable: &'static str,
    pub dispatch_failed: &'static str,
    pub success: &'static str,
    pub not_found: &'static str,
}

/// Footer copy.
#[derive(Debug, Clone, Serialize)]
pub struct FooterStrings {
    pub rights: &'static str,
}

/// The full set of localized strings for one language. One fixed schema for
/// every locale, so a key present in one language exists in all of them.
#[derive(Debug, Clone, Serialize)]
pub struct Translations {
    pub nav: NavStrings,
    pub hero: HeroStrings,
    pub about: AboutStrings,
    pub contact: ContactStrings,
    pub footer: FooterStrings,
}

const PT: Translations = Translations {
    nav: NavStrings {
        home: "Início",
        about: "Sobre",
        skills: "Habilidades",
        projects: "Projetos",
        contact: "Contato",
    },
    hero: HeroStrings {
        description: "Construindo meu próprio caminho com a minha paixão.",
        passion: "Aficionado por tecnologia e por conhecimento inovativo.",
        scroll: "Scroll",
    },
    about: AboutStrings {
        title: "Sobre mim",
        description: "Desenvolvedor focado em performance e design, transformando ideias em realidade digital.",
        experience: "Anos de Experiência",
        projects: "Projetos Completos",
    },
    contact: ContactStrings {
        title: "Contato",
        subtitle: "Vamos conversar sobre seu próximo projeto",
        all_fields_required: "Todos os campos são obrigatórios",
        name_length: "Nome deve ter entre 2 e 100 caracteres",
        subject_length: "Assunto deve ter entre 5 e 200 caracteres",
        message_length: "Mensagem deve ter entre 10 e 5000 caracteres",
        invalid_email: "Email inválido",
        invalid_content_type: "Content-Type deve ser application/json",
        invalid_json: "JSON inválido",
        payload_too_large: "Payload muito grande",
        rate_limited: "Muitas tentativas. Tente novamente mais tarde.",
        service_unavailable: "Serviço de email não configurado",
        dispatch_failed: "Erro ao processar sua mensagem. Tente novamente mais tarde.",
        success: "Mensagem enviada com sucesso!",
        not_found: "Recurso não encontrado",
    },
    footer: FooterStrings {
        rights: "Todos os direitos reservados",
    },
};

const EN: Translations = Translations {
    nav: NavStrings {
        home: "Home",
        about: "About",
        skills: "Skills",
        projects: "Projects",
        contact: "Contact",
    },
    hero: HeroStrings {
        description: "Building my own path with my passion.",
        passion: "Passionate about technology and innovative knowledge.",
        scroll: "Scroll",
    },
    about: AboutStrings {
        title: "About me",
        description: "Developer focused on performance and design, turning ideas into digital reality.",
        experience: "Years of Experience",
        projects: "Completed Projects",
    },
    contact: ContactStrings {
        title: "Contact",
        subtitle: "Let's talk about your next project",
        all_fields_required: "All fields are required",
        name_length: "Name must be between 2 and 100 characters",
        subject_length: "Subject must be between 5 and 200 characters",
        message_length: "Message must be between 10 and 5000 characters",
        invalid_email: "Invalid email",
        invalid_content_type: "Content-Type must be application/json",
        invalid_json: "Invalid JSON",
        payload_too_large: "Payload too large",
        rate_limited: "Too many attempts. Please try again later.",
        service_unavailable: "Email service not configured",
        dispatch_failed: "Failed to process your message. Please try again later.",
        success: "Message sent successfully!",
        not_found: "Resource not found",
    },
    footer: FooterStrings {
        rights: "All rights reserved",
    },
};

/// Global, load-validated translation catalog.
pub struct TranslationCatalog;

static VALIDATED: OnceLock<()> = OnceLock::new();

impl TranslationCatalog {
    /// Look up the full translation table for a language.
    ///
    /// The first call validates both locale tables against each other; a
    /// structural mismatch between languages is a build defect and panics
    /// rather than silently drifting.
    pub fn for_language(language: Language) -> &'static Translations {
        VALIDATED.get_or_init(|| {
            if let Err(e) = Self::validate() {
                panic!("translation catalog is inconsistent: {}", e);
            }
        });

        match language {
            Language::Pt => &PT,
            Language::En => &EN,
        }
    }

    /// Shortcut for the contact-section strings, the only part the HTTP layer
    /// consumes.
    pub fn contact(language: Language) -> &'static ContactStrings {
        &Self::for_language(language).contact
    }

    /// Check that both locales declare the same key set and that no leaf
    /// string is empty.
    pub fn validate() -> Result<(), String> {
        let pt = serde_json::to_value(&PT).map_err(|e| e.to_string())?;
        let en = serde_json::to_value(&EN).map_err(|e| e.to_string())?;

        let pt_keys = collect_keys(&pt, "");
        let en_keys = collect_keys(&en, "");
        if pt_keys != en_keys {
            let missing: Vec<_> = pt_keys.symmetric_difference(&en_keys).cloned().collect();
            return Err(format!("locale key sets differ: {:?}", missing));
        }

        for (value, locale) in [(&pt, "pt"), (&en, "en")] {
            if let Some(key) = find_empty_leaf(value, "") {
                return Err(format!("empty string at '{}' in locale '{}'", key, locale));
            }
        }

        Ok(())
    }
}

fn collect_keys(value: &serde_json::Value, prefix: &str) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    if let serde_json::Value::Object(map) = value {
        for (k, v) in map {
            let path = if prefix.is_empty() { k.clone() } else { format!("{}.{}", prefix, k) };
            keys.insert(path.clone());
            keys.extend(collect_keys(v, &path));
        }
    }
    keys
}

fn find_empty_leaf(value: &serde_json::Value, prefix: &str) -> Option<String> {
    match value {
        serde_json::Value::Object(map) => {
            for (k, v) in map {
                let path = if prefix.is_empty() { k.clone() } else { format!("{}.{}", prefix, k) };
                if let Some(found) = find_empty_leaf(v, &path) {
                    return Some(found);
                }
            }
            None
        }
        serde_json::Value::String(s) if s.is_empty() => Some(prefix.to_string()),
        _ => None,
    }
}
