//! services/api/src/web/error.rs
//!
//! The error type handlers return to HTTP callers. Every failure leaving the
//! API is serialized as a `{"detail": ...}` JSON body with a matching status
//! code, so the web client can surface messages uniformly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use showtimex_core::booking::BookingError;
use tracing::{error, warn};

use crate::web::identity::CredentialError;

/// A request-scoped error as seen by an HTTP caller.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl HttpError {
    /// A 500 that carries its cause for the boundary log while the caller
    /// only ever sees a generic message.
    pub fn internal(context: &str, cause: impl std::fmt::Display) -> Self {
        HttpError::Internal(format!("{context}: {cause}"))
    }

    fn status(&self) -> StatusCode {
        match self {
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            HttpError::Forbidden(_) => StatusCode::FORBIDDEN,
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Every failure is logged exactly once, here, as it leaves the API: client
/// errors at `warn`, server errors at `error`. Internal causes stay in the
/// log and out of the response body.
impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {self}");
        } else {
            warn!("request rejected: {self}");
        }
        let detail = match &self {
            HttpError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<CredentialError> for HttpError {
    fn from(e: CredentialError) -> Self {
        HttpError::Unauthorized(e.to_string())
    }
}

/// The default mapping for booking workflow errors. The ownership message
/// matches the read path; update and delete handlers override it with their
/// own wording.
impl From<BookingError> for HttpError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::MovieNotFound(_) => HttpError::NotFound("Movie not found".to_string()),
            BookingError::BookingNotFound(_) => {
                HttpError::NotFound("Booking not found".to_string())
            }
            BookingError::NotOwner => {
                HttpError::Forbidden("Can only view your own bookings".to_string())
            }
            BookingError::InvalidTicketCount(_) => {
                HttpError::BadRequest("Ticket count must be greater than zero".to_string())
            }
            BookingError::InvalidSlot(e) => HttpError::BadRequest(e.to_string()),
            BookingError::InvalidTicketType(e) => HttpError::BadRequest(e.to_string()),
            BookingError::Encoding(e) => {
                HttpError::Internal(format!("Failed to generate ticket code: {e}"))
            }
            BookingError::Store(e) => HttpError::internal("storage error", e),
        }
    }
}
