use crate::config::Config;
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::i18n::TranslationCatalog;
use crate::middleware::rate_limit::ContactRateLimit;
use crate::middleware::{ClientIp, RequestLanguage};
use crate::models::contact::{ContactRequest, ContactResponse};
use crate::service::email::EmailService;
use chrono::Utc;
use rocket::State;
use rocket::post;
use rocket::serde::json::Json;
use rocket_okapi::openapi;
use tracing::info;

/// Contact-form submission endpoint.
///
/// The rate limit is applied by the `ContactRateLimit` guard before the body
/// is read; content-type, size, and JSON checks happen in the `JsonBody` data
/// guard. What remains here is the field pipeline: presence, lengths, email
/// format, sanitization, then the two notification emails.
#[openapi(tag = "Contact")]
#[post("/", data = "<payload>")]
pub async fn submit_contact(
    config: &State<Config>,
    _rate_limit: ContactRateLimit,
    client_ip: ClientIp,
    language: RequestLanguage,
    payload: JsonBody<ContactRequest>,
) -> Result<Json<ContactResponse>, AppError> {
    let strings = TranslationCatalog::contact(language.0);

    payload.checked(strings)?;
    let submission = payload.sanitized();

    let email = EmailService::new(config.email.clone());
    email.ensure_configured(strings)?;
    email.send_contact_notifications(&submission, &client_ip.0, strings).await?;

    // Never log the email address or the message body.
    info!(
        name = %submission.name,
        client_ip = %client_ip.0,
        timestamp = %Utc::now().to_rfc3339(),
        "contact form submission processed"
    );

    Ok(Json(ContactResponse {
        success: true,
        message: strings.success.to_string(),
    }))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![submit_contact]
}

#[cfg(test)]
mod tests {
    use crate::i18n::{Language, TranslationCatalog};
    use crate::{Config, build_rocket};
    use rocket::http::{ContentType, Header, Status};
    use rocket::local::asynchronous::Client;
    use serde_json::{Value, json};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn configured(email_base_url: &str) -> Config {
        let mut config = Config::default();
        config.email.api_key = "test-key".to_string();
        config.email.admin_email = "admin@example.com".to_string();
        config.email.sender_email = "noreply@example.com".to_string();
        config.email.api_base_url = email_base_url.to_string();
        config
    }

    fn valid_payload() -> Value {
        json!({
            "name": "Maria Silva",
            "email": "maria@example.com",
            "subject": "Novo projeto",
            "message": "Gostaria de conversar sobre um site."
        })
    }

    async fn client(config: Config) -> Client {
        Client::tracked(build_rocket(config)).await.expect("valid rocket instance")
    }

    async fn mock_provider() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/smtp/email"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;
        server
    }

    #[rocket::async_test]
    async fn valid_submission_sends_two_emails_and_returns_200() {
        let provider = mock_provider().await;
        let client = client(configured(&provider.uri())).await;

        let response = client
            .post("/api/contact")
            .header(ContentType::JSON)
            .body(valid_payload().to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], TranslationCatalog::contact(Language::Pt).success);

        assert_eq!(provider.received_requests().await.unwrap().len(), 2);
    }

    #[rocket::async_test]
    async fn short_message_is_rejected_with_400() {
        let provider = mock_provider().await;
        let client = client(configured(&provider.uri())).await;

        let mut payload = valid_payload();
        payload["message"] = json!("curta");

        let response = client
            .post("/api/contact")
            .header(ContentType::JSON)
            .body(payload.to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["error"], TranslationCatalog::contact(Language::Pt).message_length);

        // Nothing reached the provider.
        assert!(provider.received_requests().await.unwrap().is_empty());
    }

    #[rocket::async_test]
    async fn missing_field_is_rejected_with_400() {
        let provider = mock_provider().await;
        let client = client(configured(&provider.uri())).await;

        let response = client
            .post("/api/contact")
            .header(ContentType::JSON)
            .body(json!({"name": "Maria Silva"}).to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["error"], TranslationCatalog::contact(Language::Pt).all_fields_required);
    }

    #[rocket::async_test]
    async fn oversized_body_is_rejected_with_413() {
        let provider = mock_provider().await;
        let client = client(configured(&provider.uri())).await;

        let mut payload = valid_payload();
        payload["message"] = json!("m".repeat(11_000));

        let response = client
            .post("/api/contact")
            .header(ContentType::JSON)
            .body(payload.to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::PayloadTooLarge);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["error"], TranslationCatalog::contact(Language::Pt).payload_too_large);
    }

    #[rocket::async_test]
    async fn non_json_content_type_is_rejected_with_400() {
        let provider = mock_provider().await;
        let client = client(configured(&provider.uri())).await;

        let response = client
            .post("/api/contact")
            .header(ContentType::Form)
            .body("name=Maria")
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["error"], TranslationCatalog::contact(Language::Pt).invalid_content_type);
    }

    #[rocket::async_test]
    async fn malformed_json_is_rejected_with_400() {
        let provider = mock_provider().await;
        let client = client(configured(&provider.uri())).await;

        let response = client
            .post("/api/contact")
            .header(ContentType::JSON)
            .body("{not valid json")
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["error"], TranslationCatalog::contact(Language::Pt).invalid_json);
    }

    #[rocket::async_test]
    async fn missing_secret_answers_503_without_naming_it() {
        let mut config = Config::default();
        config.email.api_key = "test-key".to_string();
        // admin_email and sender_email stay empty.
        let client = client(config).await;

        let response = client
            .post("/api/contact")
            .header(ContentType::JSON)
            .body(valid_payload().to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::ServiceUnavailable);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["error"], TranslationCatalog::contact(Language::Pt).service_unavailable);
        assert!(!body["error"].as_str().unwrap().to_lowercase().contains("admin"));
    }

    #[rocket::async_test]
    async fn provider_failure_answers_500_with_generic_message() {
        let provider = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/smtp/email"))
            .respond_with(ResponseTemplate::new(502).set_body_string("gateway exploded"))
            .mount(&provider)
            .await;
        let client = client(configured(&provider.uri())).await;

        let response = client
            .post("/api/contact")
            .header(ContentType::JSON)
            .body(valid_payload().to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::InternalServerError);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["error"], TranslationCatalog::contact(Language::Pt).dispatch_failed);
        assert!(!body["error"].as_str().unwrap().contains("gateway"));
    }

    #[rocket::async_test]
    async fn rate_limit_answers_429_with_retry_after() {
        let provider = mock_provider().await;
        let mut config = configured(&provider.uri());
        config.rate_limit.max_requests = 1;
        let client = client(config).await;

        let first = client
            .post("/api/contact")
            .header(ContentType::JSON)
            .body(valid_payload().to_string())
            .dispatch()
            .await;
        assert_eq!(first.status(), Status::Ok);

        let second = client
            .post("/api/contact")
            .header(ContentType::JSON)
            .body(valid_payload().to_string())
            .dispatch()
            .await;
        assert_eq!(second.status(), Status::TooManyRequests);

        let retry_after: u64 = second.headers().get_one("Retry-After").expect("Retry-After header").parse().expect("numeric");
        assert!(retry_after >= 1 && retry_after <= 3600);

        let body: Value = second.into_json().await.expect("json body");
        assert_eq!(body["error"], TranslationCatalog::contact(Language::Pt).rate_limited);

        // The denied request never reached validation or dispatch.
        assert_eq!(provider.received_requests().await.unwrap().len(), 2);
    }

    #[rocket::async_test]
    async fn accept_language_localizes_the_response() {
        let provider = mock_provider().await;
        let client = client(configured(&provider.uri())).await;

        let mut payload = valid_payload();
        payload["email"] = json!("not-an-email");

        let response = client
            .post("/api/contact")
            .header(ContentType::JSON)
            .header(Header::new("Accept-Language", "en-US,en;q=0.9"))
            .body(payload.to_string())
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::BadRequest);
        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["error"], TranslationCatalog::contact(Language::En).invalid_email);
    }

    #[rocket::async_test]
    async fn responses_carry_security_headers() {
        let provider = mock_provider().await;
        let client = client(configured(&provider.uri())).await;

        let response = client
            .post("/api/contact")
            .header(ContentType::JSON)
            .body(valid_payload().to_string())
            .dispatch()
            .await;

        assert_eq!(response.headers().get_one("X-Content-Type-Options"), Some("nosniff"));
        assert_eq!(response.headers().get_one("X-Frame-Options"), Some("DENY"));
        assert!(response.headers().get_one("X-Request-Id").is_some());
    }
}
