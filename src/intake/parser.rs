use std::collections::HashMap;

use serde_json::{Map, Value};

/// A record-append request, however it arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct AppendRequest {
    pub sheet_name: String,
    pub data: Value,
}

/// Parse a request body based on Content-Type header.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<Value, String> {
    let ct = content_type.unwrap_or("application/json");

    if ct.contains("application/json") {
        serde_json::from_slice(body).map_err(|e| format!("Invalid JSON in request body: {e}"))
    } else if ct.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(body)
    } else {
        // Try JSON first, then form-urlencoded
        serde_json::from_slice(body)
            .or_else(|_| parse_form_urlencoded(body))
            .map_err(|e| format!("Unable to parse body: {e}"))
    }
}

fn parse_form_urlencoded(body: &[u8]) -> Result<Value, String> {
    let body_str = std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;

    let mut map = Map::new();
    for (k, v) in form_urlencoded::parse(body_str.as_bytes()) {
        map.insert(k.into_owned(), Value::String(v.into_owned()));
    }
    Ok(Value::Object(map))
}

/// Pull `sheetName` and `data` out of a parsed body. `data` may be an object
/// or a string holding JSON, as form-encoded and query transports send it.
pub fn extract_append(value: &Value) -> Result<AppendRequest, String> {
    let sheet_name = value
        .get("sheetName")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let data = match value.get("data") {
        Some(Value::String(raw)) if !raw.trim().is_empty() => Some(
            serde_json::from_str::<Value>(raw)
                .map_err(|e| format!("Invalid JSON in data parameter: {e}"))?,
        ),
        Some(Value::Object(obj)) => Some(Value::Object(obj.clone())),
        _ => None,
    };

    match (sheet_name, data) {
        (Some(sheet_name), Some(data)) if data.is_object() => Ok(AppendRequest {
            sheet_name: sheet_name.to_string(),
            data,
        }),
        (Some(_), Some(_)) => Err("data must be a JSON object".to_string()),
        _ => Err(format!("Missing sheetName or data. Received: {value}")),
    }
}

/// Same as [`extract_append`] for query-string parameters.
pub fn extract_append_from_query(params: &HashMap<String, String>) -> Result<AppendRequest, String> {
    let value = Value::Object(
        params
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    );
    extract_append(&value)
}
