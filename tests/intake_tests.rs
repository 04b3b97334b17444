mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

use sheetrelay::client::jsonp;

fn contact_data() -> Value {
    json!({
        "type": "contact",
        "name": "Test User",
        "email": "test@example.com",
        "subject": "Test Submission",
        "message": "This is a test form submission.",
        "timestamp": "2025-08-31T12:00:00.000Z",
        "source": "test-script"
    })
}

// ── Health ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let app = common::spawn_intake().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn health_check_probe() {
    let app = common::spawn_intake().await;

    let resp = app
        .client
        .get(app.url("/exec?health=check"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Open Build Form Handler is running");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_probe() {
    let app = common::spawn_intake().await;

    let body: Value = app
        .client
        .get(app.url("/?test=true"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Test successful");
}

// ── CORS Preflight ──────────────────────────────────────────────

#[tokio::test]
async fn cors_preflight_options() {
    let app = common::spawn_intake().await;

    let resp = app
        .client
        .request(reqwest::Method::OPTIONS, app.url("/exec"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert_eq!(
        resp.headers()["access-control-allow-methods"],
        "GET, POST, OPTIONS"
    );
    assert!(resp.headers().contains_key("access-control-allow-headers"));
}

#[tokio::test]
async fn responses_carry_cors_and_nosniff() {
    let app = common::spawn_intake().await;

    let resp = app
        .client
        .post(app.url("/exec"))
        .json(&json!({ "sheetName": "contacts", "data": contact_data() }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
}

// ── Record append ───────────────────────────────────────────────

#[tokio::test]
async fn post_json_appends_row_with_headers() {
    let app = common::spawn_intake().await;

    let resp = app
        .client
        .post(app.url("/exec"))
        .json(&json!({ "sheetName": "contacts", "data": contact_data() }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "success": true, "message": "Data submitted successfully" }));

    let sheet = app.state.workbook.sheet("contacts").unwrap();
    assert_eq!(
        sheet.headers,
        vec!["Timestamp", "Name", "Email", "Subject", "Message", "Source", "Status"]
    );
    assert_eq!(
        sheet.rows[0],
        vec![
            "2025-08-31T12:00:00.000Z",
            "Test User",
            "test@example.com",
            "Test Submission",
            "This is a test form submission.",
            "test-script",
            "New",
        ]
    );
}

#[tokio::test]
async fn post_form_encoded_with_json_data() {
    let app = common::spawn_intake().await;
    let data = json!({
        "type": "mentor",
        "name": "Linus",
        "email": "linus@example.com",
        "experience": "senior",
        "skills": "C",
        "motivation": "Give back",
        "timestamp": "2025-08-31T12:00:00.000Z"
    })
    .to_string();

    let resp = app
        .client
        .post(app.url("/"))
        .form(&[("sheetName", "applications"), ("data", data.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let sheet = app.state.workbook.sheet("applications").unwrap();
    assert_eq!(sheet.headers.len(), 9);
    assert_eq!(sheet.rows[0][1], "mentor");
    // Missing github becomes an empty cell.
    assert_eq!(sheet.rows[0][7], "");
    assert_eq!(sheet.rows[0][8], "New");
}

#[tokio::test]
async fn missing_source_defaults_to_website() {
    let app = common::spawn_intake().await;
    let mut data = contact_data();
    data.as_object_mut().unwrap().remove("source");

    app.client
        .post(app.url("/exec"))
        .json(&json!({ "sheetName": "contacts", "data": data }))
        .send()
        .await
        .unwrap();

    assert_eq!(app.state.workbook.sheet("contacts").unwrap().rows[0][5], "website");
}

#[tokio::test]
async fn unknown_sheet_gets_generic_headers() {
    let app = common::spawn_intake().await;

    app.client
        .post(app.url("/exec"))
        .json(&json!({
            "sheetName": "newsletter",
            "data": { "email": "a@b.c", "timestamp": "2025-08-31T12:00:00.000Z", "list": "weekly" }
        }))
        .send()
        .await
        .unwrap();

    let sheet = app.state.workbook.sheet("newsletter").unwrap();
    assert_eq!(sheet.headers, vec!["Timestamp", "email", "list"]);
    assert_eq!(sheet.rows[0], vec!["2025-08-31T12:00:00.000Z", "a@b.c", "weekly"]);
}

#[tokio::test]
async fn resubmission_appends_duplicate_rows() {
    let app = common::spawn_intake().await;
    let envelope = json!({ "sheetName": "contacts", "data": contact_data() });

    for _ in 0..2 {
        let resp = app
            .client
            .post(app.url("/exec"))
            .json(&envelope)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    assert_eq!(app.state.workbook.row_count("contacts"), 2);
}

#[tokio::test]
async fn missing_sheet_name_is_rejected() {
    let app = common::spawn_intake().await;

    let resp = app
        .client
        .post(app.url("/exec"))
        .json(&json!({ "data": contact_data() }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Missing sheetName or data"));
    assert!(app.state.workbook.sheet_names().is_empty());
}

#[tokio::test]
async fn invalid_json_is_rejected() {
    let app = common::spawn_intake().await;

    let resp = app
        .client
        .post(app.url("/exec"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON"));
}

// ── Script-tag variant ──────────────────────────────────────────

#[tokio::test]
async fn callback_get_appends_and_wraps_ack() {
    let app = common::spawn_intake().await;
    let data = contact_data().to_string();

    let resp = app
        .client
        .get(app.url("/exec"))
        .query(&[
            ("callback", "sheetrelay_cb_1"),
            ("sheetName", "contacts"),
            ("data", data.as_str()),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("application/javascript"));

    let body = resp.text().await.unwrap();
    let (name, payload) = jsonp::parse_invocation(&body).unwrap();
    assert_eq!(name, "sheetrelay_cb_1");
    assert_eq!(payload["success"], true);
    assert_eq!(app.state.workbook.row_count("contacts"), 1);
}

#[tokio::test]
async fn callback_get_reports_failure_through_callback() {
    let app = common::spawn_intake().await;

    let resp = app
        .client
        .get(app.url("/exec"))
        .query(&[("callback", "cb"), ("sheetName", "contacts"), ("data", "{broken")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let (name, payload) = jsonp::parse_invocation(&resp.text().await.unwrap()).unwrap();
    assert_eq!(name, "cb");
    assert_eq!(payload["success"], false);
    assert!(payload["error"].as_str().unwrap().contains("Invalid JSON in data parameter"));
    assert_eq!(app.state.workbook.row_count("contacts"), 0);
}

#[tokio::test]
async fn invalid_callback_name_is_rejected() {
    let app = common::spawn_intake().await;

    let resp = app
        .client
        .get(app.url("/exec"))
        .query(&[("callback", "alert(1)//"), ("sheetName", "contacts"), ("data", "{}")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.state.workbook.row_count("contacts"), 0);
}
