use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static INVOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*([A-Za-z_$][A-Za-z0-9_$.]*)\s*\((.*)\)\s*;?\s*$").unwrap()
});

static CALLBACK_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$.]*$").unwrap());

/// Split a script body of the form `name({...});` into the callback name and its argument.
pub fn parse_invocation(body: &str) -> Result<(String, Value), String> {
    let caps = INVOCATION_RE
        .captures(body)
        .ok_or_else(|| "Response is not a single callback invocation".to_string())?;

    let name = caps[1].to_string();
    let arg = caps[2].trim();
    let payload: Value =
        serde_json::from_str(arg).map_err(|e| format!("Callback argument is not JSON: {e}"))?;

    Ok((name, payload))
}

/// Render a callback invocation. The payload is serialized JSON, so the output
/// is a single expression statement.
pub fn render_invocation(name: &str, payload: &Value) -> String {
    format!("{name}({payload});")
}

pub fn is_valid_callback_name(name: &str) -> bool {
    CALLBACK_NAME_RE.is_match(name)
}
