use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::client::jsonp;
use crate::error::AppError;
use crate::intake::{self, parser};
use crate::state::SharedState;

pub async fn post_record(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    let raw = parser::parse_body(content_type, &body).map_err(AppError::BadRequest)?;
    let request = parser::extract_append(&raw).map_err(AppError::BadRequest)?;

    let ack = intake::append(&state, &request)?;
    Ok((StatusCode::OK, Json(ack)).into_response())
}

pub async fn get_record(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    if let Some(callback) = params.get("callback") {
        return script_append(&state, callback, &params);
    }

    if params.get("test").is_some_and(|v| v == "true") {
        return Ok(Json(intake::health("Test successful")).into_response());
    }

    let message = format!("{} is running", state.config.service_name);
    Ok(Json(intake::health(&message)).into_response())
}

/// The script-tag variant: the acknowledgment, success or not, is delivered
/// through the callback so the loader can see it.
fn script_append(
    state: &SharedState,
    callback: &str,
    params: &HashMap<String, String>,
) -> Result<Response, AppError> {
    if !jsonp::is_valid_callback_name(callback) {
        return Err(AppError::BadRequest(format!("Invalid callback name: {callback}")));
    }

    let ack = parser::extract_append_from_query(params)
        .map_err(AppError::BadRequest)
        .and_then(|request| intake::append(state, &request))
        .unwrap_or_else(|e| e.to_ack());

    let payload = serde_json::to_value(&ack)
        .map_err(|e| AppError::Internal(format!("Failed to encode acknowledgment: {e}")))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        jsonp::render_invocation(callback, &payload),
    )
        .into_response())
}

pub async fn options_record(State(state): State<SharedState>) -> Response {
    (
        [
            ("Access-Control-Allow-Origin", state.config.allowed_origin.clone()),
            ("Access-Control-Allow-Methods", "GET, POST, OPTIONS".to_string()),
            ("Access-Control-Allow-Headers", "Content-Type".to_string()),
            ("Access-Control-Max-Age", "86400".to_string()),
        ],
        StatusCode::NO_CONTENT,
    )
        .into_response()
}
