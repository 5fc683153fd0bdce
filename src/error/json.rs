use rocket::data::{ByteUnit, Data, FromData, Outcome};
use rocket::http::Status;
use rocket::request::Request;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::ops::Deref;
use thiserror::Error;
use tracing::warn;

/// Hard cap on the contact payload, in bytes. Bodies over this answer 413.
const MAX_BODY_BYTES: u64 = 10_000;

/// Why a request body was rejected before reaching the handler. Stashed in the
/// request's local cache so the status catchers can localize the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRejection {
    WrongContentType,
    TooLarge,
    InvalidJson,
}

#[derive(Debug, Error)]
pub enum JsonBodyError {
    #[error("content type must be application/json")]
    WrongContentType,
    #[error("payload exceeds {MAX_BODY_BYTES} bytes")]
    TooLarge,
    #[error("failed to read request body: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// JSON body guard for the contact form.
///
/// Unlike Rocket's built-in `Json`, this guard rejects non-JSON content types
/// with 400 instead of forwarding, enforces the byte cap with 413, and logs
/// structured information about parse failures.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T> Deref for JsonBody<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// local_cache is write-once; only the first rejection for a request sticks.
fn reject(req: &Request<'_>, rejection: BodyRejection) {
    req.local_cache(|| Some(rejection));
}

#[rocket::async_trait]
impl<'r, T: DeserializeOwned> FromData<'r> for JsonBody<T> {
    type Error = JsonBodyError;

    async fn from_data(req: &'r Request<'_>, data: Data<'r>) -> Outcome<'r, Self> {
        let is_json = req.content_type().map(|ct| ct.is_json()).unwrap_or(false);
        if !is_json {
            warn!(
                method = %req.method(),
                uri = %req.uri(),
                content_type = ?req.content_type(),
                "rejected non-JSON content type"
            );
            reject(req, BodyRejection::WrongContentType);
            return Outcome::Error((Status::BadRequest, JsonBodyError::WrongContentType));
        }

        let limit = req.limits().get("contact-form").unwrap_or(ByteUnit::Byte(MAX_BODY_BYTES));

        let bytes = match data.open(limit).into_bytes().await {
            Ok(bytes) if bytes.is_complete() => bytes.into_inner(),
            Ok(_) => {
                warn!(
                    method = %req.method(),
                    uri = %req.uri(),
                    limit = %limit,
                    "JSON payload exceeded size limit"
                );
                reject(req, BodyRejection::TooLarge);
                return Outcome::Error((Status::PayloadTooLarge, JsonBodyError::TooLarge));
            }
            Err(e) => {
                warn!(
                    method = %req.method(),
                    uri = %req.uri(),
                    error = %e,
                    "failed to read request body"
                );
                reject(req, BodyRejection::InvalidJson);
                return Outcome::Error((Status::BadRequest, JsonBodyError::Io(e)));
            }
        };

        match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => Outcome::Success(JsonBody(value)),
            Err(e) => {
                warn!(
                    method = %req.method(),
                    uri = %req.uri(),
                    error_message = %e,
                    error_line = e.line(),
                    error_column = e.column(),
                    error_category = ?e.classify(),
                    "failed to parse JSON request body"
                );
                reject(req, BodyRejection::InvalidJson);
                Outcome::Error((Status::BadRequest, JsonBodyError::Parse(e)))
            }
        }
    }
}

impl<'r, T: DeserializeOwned + JsonSchema> rocket_okapi::request::OpenApiFromData<'r> for JsonBody<T> {
    fn request_body(r#gen: &mut rocket_okapi::r#gen::OpenApiGenerator) -> rocket_okapi::Result<okapi::openapi3::RequestBody> {
        <rocket::serde::json::Json<T> as rocket_okapi::request::OpenApiFromData<'r>>::request_body(r#gen)
    }
}
