use chrono::Utc;
use rocket::http::{ContentType, Status};
use rocket::response::Responder;
use rocket::{Request, Response};
use rocket_okapi::OpenApiError;
use rocket_okapi::okapi::openapi3::Responses;
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::response::OpenApiResponderInner;
use std::io::Cursor;
use thiserror::Error;
use tracing::error;

/// All failures the API converts into a JSON error response.
///
/// The `Display` string of each variant is what the client sees; provider and
/// configuration detail is attached out-of-band and only ever logged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    TooManyRequests(String),
    #[error("{0}")]
    NotFound(String),
    /// A deployment secret is missing. `detail` names which one, server-side
    /// only; the client message stays generic.
    #[error("{message}")]
    ServiceUnavailable { message: String, detail: &'static str },
    /// The email provider rejected or failed a send.
    #[error("{message}")]
    Dispatch { message: String, detail: String },
    #[error("{message}")]
    Internal { message: String, detail: String },
    #[error("Internal server error")]
    ConfigurationError {
        message: String,
        #[source]
        source: figment::Error,
    },
}

impl From<&AppError> for Status {
    fn from(e: &AppError) -> Self {
        match e {
            AppError::BadRequest(_) => Status::BadRequest,
            AppError::TooManyRequests(_) => Status::TooManyRequests,
            AppError::NotFound(_) => Status::NotFound,
            AppError::ServiceUnavailable { .. } => Status::ServiceUnavailable,
            AppError::Dispatch { .. } | AppError::Internal { .. } | AppError::ConfigurationError { .. } => Status::InternalServerError,
        }
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::ConfigurationError {
            message: "Failed to read configuration".to_string(),
            source: e,
        }
    }
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, req: &Request<'_>) -> rocket::response::Result<'static> {
        let method = req.method();
        let uri = req.uri();

        let request_id = req
            .local_cache(|| None::<crate::middleware::RequestId>)
            .as_ref()
            .map(|r| r.0.as_str())
            .unwrap_or("unknown");

        // Full detail stays server-side, with a timestamp for correlation.
        error!(
            error = ?self,
            request_id = %request_id,
            method = %method,
            uri = %uri,
            timestamp = %Utc::now().to_rfc3339(),
            "request failed"
        );

        let status = Status::from(&self);
        let body = serde_json::json!({ "error": self.to_string() }).to_string();

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}

impl OpenApiResponderInner for AppError {
    fn responses(_gen: &mut OpenApiGenerator) -> Result<Responses, OpenApiError> {
        use rocket_okapi::okapi::openapi3::{RefOr, Response as OpenApiResponse};
        let mut responses = Responses::default();
        for (code, description) in [
            ("400", "Bad Request"),
            ("413", "Payload Too Large"),
            ("429", "Too Many Requests"),
            ("500", "Internal Server Error"),
            ("503", "Service Unavailable"),
        ] {
            responses.responses.insert(
                code.to_string(),
                RefOr::Object(OpenApiResponse {
                    description: description.to_string(),
                    ..Default::default()
                }),
            );
        }
        Ok(responses)
    }
}
