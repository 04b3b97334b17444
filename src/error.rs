use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::client::handoff::MailDraft;
use crate::models::AckBody;

/// Errors returned by the intake endpoint.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The acknowledgment a caller gets back. Internal details are logged, not sent.
    pub fn to_ack(&self) -> AckBody {
        match self {
            AppError::BadRequest(msg) => AckBody::failed(msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                AckBody::failed("Internal server error")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), axum::Json(self.to_ack())).into_response()
    }
}

/// Why a record was not delivered automatically.
#[derive(Debug)]
pub enum DeliveryError {
    /// The endpoint could not be reached, or the request was blocked.
    Network(String),
    /// A response arrived but was not a valid acknowledgment.
    Protocol(String),
    /// A well-formed acknowledgment with `success: false`.
    RemoteRejection(String),
    /// The script-tag callback never fired.
    Timeout(Duration),
    /// The form input failed validation; nothing was sent.
    Invalid(Vec<String>),
    /// Every transport failed and the record was handed to the user as a mail draft.
    HandedOff {
        draft: MailDraft,
        cause: Box<DeliveryError>,
    },
}

impl DeliveryError {
    pub fn is_handed_off(&self) -> bool {
        matches!(self, DeliveryError::HandedOff { .. })
    }

    pub fn draft(&self) -> Option<&MailDraft> {
        match self {
            DeliveryError::HandedOff { draft, .. } => Some(draft),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryError::Network(msg) => write!(f, "Network error: {msg}"),
            DeliveryError::Protocol(msg) => write!(f, "Protocol error: {msg}"),
            DeliveryError::RemoteRejection(msg) => write!(f, "Rejected by endpoint: {msg}"),
            DeliveryError::Timeout(after) => {
                write!(f, "No callback within {}ms", after.as_millis())
            }
            DeliveryError::Invalid(problems) => write!(f, "Invalid submission: {}", problems.join("; ")),
            DeliveryError::HandedOff { cause, .. } => {
                write!(f, "Automatic delivery failed ({cause}); handed off as mail draft")
            }
        }
    }
}

impl std::error::Error for DeliveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeliveryError::HandedOff { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}
