pub mod parser;

use chrono::{SecondsFormat, Utc};

use crate::error::AppError;
use crate::models::{AckBody, DEFAULT_ACK_MESSAGE, HealthStatus};
use crate::state::SharedState;

use parser::AppendRequest;

/// Append one record to its sheet. No deduplication: resubmitting appends again.
pub fn append(state: &SharedState, request: &AppendRequest) -> Result<AckBody, AppError> {
    let rows = state
        .workbook
        .append(&request.sheet_name, &request.data)
        .map_err(AppError::BadRequest)?;

    tracing::info!(
        "Appended row {rows} to sheet '{}'",
        request.sheet_name
    );

    Ok(AckBody::ok(DEFAULT_ACK_MESSAGE))
}

pub fn health(message: &str) -> HealthStatus {
    HealthStatus {
        success: true,
        message: message.to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}
