use crate::error::json::BodyRejection;
use crate::i18n::TranslationCatalog;
use crate::middleware::rate_limit::RateLimitRetryAfter;
use crate::middleware::request_language;
use rocket::http::{ContentType, Header, Status};
use rocket::response::Responder;
use rocket::serde::Serialize;
use rocket::serde::json::Json;
use rocket::{Request, Response, catch};
use std::io::Cursor;

/// JSON error body: `{"error": "..."}`.
#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorBody {
    pub error: String,
}

#[catch(404)]
pub fn not_found(req: &Request) -> Json<ErrorBody> {
    let strings = TranslationCatalog::contact(request_language(req));
    Json(ErrorBody {
        error: strings.not_found.to_string(),
    })
}

/// Guard-level 400s: the JSON body guard stashes why it rejected the request
/// so the client gets the precise constraint back.
#[catch(400)]
pub fn bad_request(req: &Request) -> Json<ErrorBody> {
    let strings = TranslationCatalog::contact(request_language(req));
    let message = match req.local_cache(|| None::<BodyRejection>) {
        Some(BodyRejection::WrongContentType) => strings.invalid_content_type,
        Some(BodyRejection::InvalidJson) | Some(BodyRejection::TooLarge) | None => strings.invalid_json,
    };
    Json(ErrorBody {
        error: message.to_string(),
    })
}

#[catch(413)]
pub fn payload_too_large(req: &Request) -> Json<ErrorBody> {
    let strings = TranslationCatalog::contact(request_language(req));
    Json(ErrorBody {
        error: strings.payload_too_large.to_string(),
    })
}

/// 429 body plus a `Retry-After` header carrying the remaining window.
pub struct RateLimitedBody {
    error: String,
    retry_after_secs: u64,
}

impl<'r> Responder<'r, 'static> for RateLimitedBody {
    fn respond_to(self, _req: &Request<'_>) -> rocket::response::Result<'static> {
        let body = serde_json::json!({ "error": self.error }).to_string();
        Response::build()
            .status(Status::TooManyRequests)
            .header(ContentType::JSON)
            .header(Header::new("Retry-After", self.retry_after_secs.to_string()))
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}

#[catch(429)]
pub fn too_many_requests(req: &Request) -> RateLimitedBody {
    let strings = TranslationCatalog::contact(request_language(req));
    let retry_after_secs = req
        .local_cache(|| None::<RateLimitRetryAfter>)
        .as_ref()
        .map(|r| r.0)
        .unwrap_or(60);

    RateLimitedBody {
        error: strings.rate_limited.to_string(),
        retry_after_secs,
    }
}
