use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;
use crate::middleware::client_ip;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket_okapi::okapi::openapi3::{RefOr, Response as OpenApiResponse, Responses};
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::request::{OpenApiFromRequest, RequestHeaderInput};
use tokio::sync::Mutex;
use tracing::warn;

/// One identifier's standing within the current window.
#[derive(Debug, Clone)]
struct Record {
    count: u32,
    window_reset_at: Instant,
}

/// Fixed-window request counter keyed by client identifier.
///
/// An explicit object rather than process-global state so every test can own
/// an isolated instance. Concurrent requests for the same identifier racing a
/// window boundary may both be admitted; this is a best-effort limiter, not a
/// strict guarantee.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    cleanup_interval: Duration,
    records: Mutex<HashMap<String, Record>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allow,
    Limited { retry_after: Duration },
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests.max(1),
            window: Duration::from_secs(config.window_seconds.max(1)),
            cleanup_interval: Duration::from_secs(config.cleanup_interval_seconds.max(1)),
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Periodically evict records whose window has already expired, so the map
    /// stays bounded by the set of identifiers active within one window.
    pub fn spawn_cleanup_task(self: Arc<Self>) {
        let cleanup_interval = self.cleanup_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(cleanup_interval);
            loop {
                ticker.tick().await;
                let now = Instant::now();
                let mut records = self.records.lock().await;
                records.retain(|_, record| now <= record.window_reset_at);
            }
        });
    }

    /// Decide whether a request from `identifier` is admitted.
    ///
    /// A new identifier, or one whose window has expired, gets a fresh record
    /// with `count = 1` and is allowed. Below the limit the count increments;
    /// at the limit the request is denied without incrementing, so a blocked
    /// client never extends its own penalty. O(1), no I/O; denial is a normal
    /// return value, not an error.
    pub async fn check(&self, identifier: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut records = self.records.lock().await;

        match records.get_mut(identifier) {
            Some(record) if now <= record.window_reset_at => {
                if record.count < self.max_requests {
                    record.count += 1;
                    RateLimitDecision::Allow
                } else {
                    RateLimitDecision::Limited {
                        retry_after: record.window_reset_at.saturating_duration_since(now),
                    }
                }
            }
            _ => {
                records.insert(
                    identifier.to_string(),
                    Record {
                        count: 1,
                        window_reset_at: now + self.window,
                    },
                );
                RateLimitDecision::Allow
            }
        }
    }

    /// Boolean form of [`check`](Self::check).
    pub async fn allows(&self, identifier: &str) -> bool {
        matches!(self.check(identifier).await, RateLimitDecision::Allow)
    }

    #[cfg(test)]
    async fn record_count(&self, identifier: &str) -> u32 {
        self.records.lock().await.get(identifier).map(|r| r.count).unwrap_or(0)
    }

    #[cfg(test)]
    async fn tracked_identifiers(&self) -> usize {
        self.records.lock().await.len()
    }

    #[cfg(test)]
    async fn sweep(&self) {
        let now = Instant::now();
        let mut records = self.records.lock().await;
        records.retain(|_, record| now <= record.window_reset_at);
    }
}

/// Remaining window seconds for the `Retry-After` header, stashed in the
/// request's local cache by the guard and read by the 429 catcher.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitRetryAfter(pub u64);

/// Request guard that applies the contact-form rate limit before any body is
/// read. Denial short-circuits to the 429 catcher.
#[derive(Debug, Clone, Copy)]
pub struct ContactRateLimit;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ContactRateLimit {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let limiter = match request.rocket().state::<Arc<RateLimiter>>() {
            Some(limiter) => limiter,
            None => return Outcome::Success(ContactRateLimit),
        };

        let identifier = client_ip(request);

        match limiter.check(&identifier).await {
            RateLimitDecision::Allow => Outcome::Success(ContactRateLimit),
            RateLimitDecision::Limited { retry_after } => {
                let retry_after_secs = retry_after.as_secs().max(1);
                request.local_cache(|| Some(RateLimitRetryAfter(retry_after_secs)));
                warn!(
                    identifier = %identifier,
                    method = %request.method(),
                    uri = %request.uri(),
                    retry_after_secs = %retry_after_secs,
                    "rate limit exceeded"
                );
                Outcome::Error((Status::TooManyRequests, ()))
            }
        }
    }
}

impl<'a> OpenApiFromRequest<'a> for ContactRateLimit {
    fn from_request_input(_gen: &mut OpenApiGenerator, _name: String, _required: bool) -> rocket_okapi::Result<RequestHeaderInput> {
        Ok(RequestHeaderInput::None)
    }

    fn get_responses(_gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        let mut responses = Responses::default();
        responses.responses.insert(
            "429".to_string(),
            RefOr::Object(OpenApiResponse {
                description: "Too Many Requests".to_string(),
                ..Default::default()
            }),
        );
        Ok(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32, window_seconds: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_requests,
            window_seconds,
            cleanup_interval_seconds: 60,
        })
    }

    #[rocket::async_test]
    async fn blocks_after_limit_and_resets_after_window() {
        let limiter = limiter(2, 1);

        assert!(limiter.allows("10.0.0.1").await);
        assert!(limiter.allows("10.0.0.1").await);
        assert!(!limiter.allows("10.0.0.1").await);

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(limiter.allows("10.0.0.1").await);
    }

    #[rocket::async_test]
    async fn denial_does_not_increment() {
        let limiter = limiter(1, 60);

        assert!(limiter.allows("10.0.0.1").await);
        assert!(!limiter.allows("10.0.0.1").await);
        assert!(!limiter.allows("10.0.0.1").await);
        assert_eq!(limiter.record_count("10.0.0.1").await, 1);
    }

    #[rocket::async_test]
    async fn identifiers_are_independent() {
        let limiter = limiter(1, 60);

        assert!(limiter.allows("10.0.0.1").await);
        assert!(limiter.allows("10.0.0.2").await);
        assert!(!limiter.allows("10.0.0.1").await);
        assert!(!limiter.allows("10.0.0.2").await);
    }

    #[rocket::async_test]
    async fn limited_decision_reports_remaining_window() {
        let limiter = limiter(1, 60);

        assert!(limiter.allows("10.0.0.1").await);
        match limiter.check("10.0.0.1").await {
            RateLimitDecision::Limited { retry_after } => {
                assert!(retry_after <= Duration::from_secs(60));
                assert!(retry_after > Duration::from_secs(58));
            }
            RateLimitDecision::Allow => panic!("expected limit"),
        }
    }

    #[rocket::async_test]
    async fn sweep_evicts_expired_records() {
        let limiter = limiter(5, 1);

        assert!(limiter.allows("10.0.0.1").await);
        assert!(limiter.allows("10.0.0.2").await);
        assert_eq!(limiter.tracked_identifiers().await, 2);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        limiter.sweep().await;

        assert_eq!(limiter.tracked_identifiers().await, 0);
    }
}
