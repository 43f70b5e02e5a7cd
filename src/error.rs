use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::error;

/// Errors surfaced by the Auth0 client.
///
/// API failures are pass-through translations of the HTTP status and the JSON
/// error body Auth0 returns. The only local recovery logic in the crate is
/// the retry layer, which consults [`Error::is_retryable`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The client was constructed or called with incomplete configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request never produced an HTTP response (connect, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Auth0 rejected the request and returned a parsable error body.
    #[error("auth0 api error ({status}): {code}: {description}")]
    Api {
        status: u16,
        code: String,
        description: String,
    },

    /// 401/403 with no parsable error body.
    #[error("unauthorized")]
    Unauthorized,

    /// 429 from Auth0's rate limiter. `retry_after` is taken from the
    /// `Retry-After` header when present.
    #[error("too many requests")]
    RateLimited { retry_after: Option<Duration> },

    /// 5xx from Auth0.
    #[error("auth0 unavailable ({status}): {message}")]
    ServiceUnavailable { status: u16, message: String },

    /// Any other non-success status with no parsable error body.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A 2xx response whose body did not match the documented shape.
    #[error("failed to decode auth0 response")]
    Decode(#[source] reqwest::Error),

    /// The retry budget was exhausted without a successful response.
    #[error("retries exhausted after {attempts} attempts: {last_error}")]
    RetryExhausted { attempts: u32, last_error: String },

    /// An ID token failed signature, issuer, or audience validation.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// An ID token was validly signed but has expired.
    #[error("token expired")]
    TokenExpired,

    /// Failures with no better classification.
    #[error("unexpected error")]
    Unexpected(#[source] anyhow::Error),
}

impl Error {
    /// Whether the retry layer should attempt the request again.
    ///
    /// Only rate limiting, 5xx responses, and transport-level failures are
    /// retryable; every other error would fail identically on resend.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::RateLimited { .. } | Error::ServiceUnavailable { .. } => true,
            Error::Transport(source) => source.is_timeout() || source.is_connect(),
            _ => false,
        }
    }

    /// Server-suggested delay before the next attempt, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Error body returned by the Auth0 APIs.
///
/// The Authentication API uses `error`/`error_description` while the
/// Management API and the signup endpoint use `code`/`description` (with
/// `statusCode` and `name` alongside). All fields default to empty so either
/// shape deserializes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub error_description: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "statusCode")]
    pub status_code: Option<u16>,
}

impl ApiErrorBody {
    pub fn code_or_error(&self) -> &str {
        if self.code.is_empty() {
            self.error.as_str()
        } else {
            self.code.as_str()
        }
    }

    pub fn description_or_error_description(&self) -> &str {
        if self.description.is_empty() {
            if self.error_description.is_empty() {
                "auth0 request failed"
            } else {
                self.error_description.as_str()
            }
        } else {
            self.description.as_str()
        }
    }

    /// Translate the body into an [`Error`], keyed on the HTTP status.
    ///
    /// Rate limits and 5xx keep their dedicated variants so the retry layer
    /// can classify them; everything else surfaces the remote code and
    /// description verbatim.
    pub fn into_error(self, status: u16, retry_after: Option<Duration>) -> Error {
        error!(
            status = status,
            code = %self.code_or_error(),
            description = %self.description_or_error_description(),
            "auth0 api error response"
        );

        match status {
            429 => Error::RateLimited { retry_after },
            500..=599 => Error::ServiceUnavailable {
                status,
                message: self.description_or_error_description().to_string(),
            },
            _ => Error::Api {
                status,
                code: self.code_or_error().to_string(),
                description: self.description_or_error_description().to_string(),
            },
        }
    }
}

/// Fallback classification for responses whose body could not be parsed.
pub(crate) fn error_from_status(status: u16, retry_after: Option<Duration>) -> Error {
    match status {
        401 | 403 => Error::Unauthorized,
        429 => Error::RateLimited { retry_after },
        500..=599 => Error::ServiceUnavailable {
            status,
            message: "auth0 returned an unparsable error".to_string(),
        },
        _ => Error::BadRequest(format!("auth0 request failed with status {status}")),
    }
}
