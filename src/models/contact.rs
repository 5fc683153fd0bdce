use crate::error::app_error::AppError;
use crate::i18n::ContactStrings;
use crate::security::{sanitize_input, validate_email};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A contact-form submission as sent by the client.
///
/// Missing JSON keys deserialize to empty strings, so "field absent" and
/// "field empty" take the same rejection path, matching the frontend's
/// truthiness check. Length bounds apply to the raw, pre-sanitize text.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct ContactRequest {
    #[serde(default)]
    #[validate(length(min = 2, max = 100, code = "name_length"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "email_format"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 5, max = 200, code = "subject_length"))]
    pub subject: String,
    #[serde(default)]
    #[validate(length(min = 10, max = 5000, code = "message_length"))]
    pub message: String,
}

fn email_format(value: &str) -> Result<(), ValidationError> {
    if validate_email(value) { Ok(()) } else { Err(ValidationError::new("invalid_email")) }
}

/// The same submission with every field HTML-escaped, ready for the email
/// bodies. Constructed exactly once per request, after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactRequest {
    /// Run the presence, length, and email-format checks in pipeline order,
    /// localizing the first violation.
    pub fn checked(&self, strings: &ContactStrings) -> Result<(), AppError> {
        if self.name.is_empty() || self.email.is_empty() || self.subject.is_empty() || self.message.is_empty() {
            return Err(AppError::BadRequest(strings.all_fields_required.to_string()));
        }

        if let Err(errors) = self.validate() {
            let fields = errors.field_errors();
            // Report the first violated constraint in pipeline order: lengths
            // before email format.
            for (field, message) in [
                ("name", strings.name_length),
                ("subject", strings.subject_length),
                ("message", strings.message_length),
                ("email", strings.invalid_email),
            ] {
                if fields.contains_key(field) {
                    return Err(AppError::BadRequest(message.to_string()));
                }
            }
            return Err(AppError::BadRequest(strings.all_fields_required.to_string()));
        }

        Ok(())
    }

    pub fn sanitized(&self) -> SanitizedSubmission {
        SanitizedSubmission {
            name: sanitize_input(&self.name),
            email: sanitize_input(&self.email),
            subject: sanitize_input(&self.subject),
            message: sanitize_input(&self.message),
        }
    }
}

/// Body of the 200 response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Language, TranslationCatalog};

    fn request(name: &str, email: &str, subject: &str, message: &str) -> ContactRequest {
        ContactRequest {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        }
    }

    fn strings() -> &'static ContactStrings {
        TranslationCatalog::contact(Language::En)
    }

    fn valid() -> ContactRequest {
        request("Maria Silva", "maria@example.com", "Project inquiry", "I would like to talk about a website.")
    }

    #[test]
    fn valid_submission_passes() {
        assert!(valid().checked(strings()).is_ok());
    }

    #[test]
    fn missing_keys_deserialize_to_empty_fields() {
        let parsed: ContactRequest = serde_json::from_str(r#"{"name": "Maria"}"#).unwrap();
        assert_eq!(parsed.name, "Maria");
        assert!(parsed.email.is_empty());
        let err = parsed.checked(strings()).unwrap_err();
        assert_eq!(err.to_string(), strings().all_fields_required);
    }

    #[test]
    fn name_length_bounds() {
        let mut req = valid();
        req.name = "M".to_string();
        assert_eq!(req.checked(strings()).unwrap_err().to_string(), strings().name_length);

        req.name = "M".repeat(101);
        assert_eq!(req.checked(strings()).unwrap_err().to_string(), strings().name_length);

        req.name = "M".repeat(100);
        assert!(req.checked(strings()).is_ok());
    }

    #[test]
    fn subject_length_bounds() {
        let mut req = valid();
        req.subject = "Hey".to_string();
        assert_eq!(req.checked(strings()).unwrap_err().to_string(), strings().subject_length);

        req.subject = "s".repeat(201);
        assert_eq!(req.checked(strings()).unwrap_err().to_string(), strings().subject_length);
    }

    #[test]
    fn message_length_bounds() {
        let mut req = valid();
        req.message = "short".to_string();
        assert_eq!(req.checked(strings()).unwrap_err().to_string(), strings().message_length);

        req.message = "m".repeat(5001);
        assert_eq!(req.checked(strings()).unwrap_err().to_string(), strings().message_length);
    }

    #[test]
    fn length_violations_win_over_email_format() {
        let mut req = valid();
        req.name = "M".to_string();
        req.email = "not-an-email".to_string();
        assert_eq!(req.checked(strings()).unwrap_err().to_string(), strings().name_length);
    }

    #[test]
    fn invalid_email_is_rejected() {
        let mut req = valid();
        req.email = "not-an-email".to_string();
        assert_eq!(req.checked(strings()).unwrap_err().to_string(), strings().invalid_email);
    }

    #[test]
    fn localized_messages_follow_the_language() {
        let mut req = valid();
        req.email = "nope".to_string();
        let pt = TranslationCatalog::contact(Language::Pt);
        assert_eq!(req.checked(pt).unwrap_err().to_string(), "Email inválido");
    }

    #[test]
    fn sanitized_escapes_every_field() {
        let req = request(
            "  <Maria>  ",
            "maria@example.com",
            "Quote \"fast\" site",
            "Tom & Jerry's <plan>",
        );
        let clean = req.sanitized();
        assert_eq!(clean.name, "&lt;Maria&gt;");
        assert_eq!(clean.email, "maria@example.com");
        assert_eq!(clean.subject, "Quote &quot;fast&quot; site");
        assert_eq!(clean.message, "Tom &amp; Jerry&#039;s &lt;plan&gt;");
    }

    #[test]
    fn bounds_apply_to_raw_length_not_sanitized() {
        // 9 raw chars, but sanitization expands them well past 10. The raw
        // string must still be rejected by the message minimum.
        let mut req = valid();
        req.message = "&&&&&&&&&".to_string();
        assert_eq!(req.checked(strings()).unwrap_err().to_string(), strings().message_length);
    }
}
