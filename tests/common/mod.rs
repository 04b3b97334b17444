#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use reqwest::Client;
use serde_json::json;

use sheetrelay::client::direct::DirectTransport;
use sheetrelay::client::handoff::{Handoff, MailDraft};
use sheetrelay::client::registry::CallbackRegistry;
use sheetrelay::client::script_tag::ScriptTagTransport;
use sheetrelay::client::SubmissionClient;
use sheetrelay::config::{ClientConfig, Config};
use sheetrelay::models::{ApplicationDetails, FormInput, RecordKind};
use sheetrelay::state::SharedState;

/// A running reference intake server.
pub struct TestIntake {
    pub addr: SocketAddr,
    pub state: SharedState,
    pub client: Client,
}

impl TestIntake {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn endpoint(&self) -> String {
        self.url("/exec")
    }
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        service_name: "Open Build Form Handler".to_string(),
        allowed_origin: "*".to_string(),
        max_body_size: 1_048_576,
        log_level: "warn".to_string(),
    }
}

pub async fn spawn_intake() -> TestIntake {
    let (app, state) = sheetrelay::build_app(test_config());
    let addr = spawn_router(app).await;

    TestIntake {
        addr,
        state,
        client: Client::new(),
    }
}

/// Serve a router on a random local port.
pub async fn spawn_router(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    addr
}

/// A URL nothing is listening on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/exec")
}

// ── Stub endpoint ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub enum PostReply {
    Ack,
    Reject,
    ServerError,
    NotJson,
}

#[derive(Debug, Clone, Copy)]
pub enum GetReply {
    Ack,
    Reject,
    ServerError,
    /// Answer correctly, but only after this many milliseconds.
    Delayed(u64),
    WrongCallback,
    NotScript,
}

#[derive(Default)]
pub struct Hits {
    pub posts: AtomicUsize,
    pub gets: AtomicUsize,
    pub last_query: Mutex<Option<HashMap<String, String>>>,
}

impl Hits {
    pub fn posts(&self) -> usize {
        self.posts.load(Ordering::SeqCst)
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> HashMap<String, String> {
        self.last_query.lock().unwrap().clone().unwrap_or_default()
    }
}

#[derive(Clone)]
struct Stub {
    post: PostReply,
    get: GetReply,
    hits: Arc<Hits>,
}

/// Spawn an endpoint with scripted replies. Returns its URL and hit counters.
pub async fn spawn_stub(post: PostReply, get_reply: GetReply) -> (String, Arc<Hits>) {
    let hits = Arc::new(Hits::default());
    let stub = Stub {
        post,
        get: get_reply,
        hits: hits.clone(),
    };

    let app = Router::new()
        .route("/exec", get(stub_get).post(stub_post))
        .with_state(stub);
    let addr = spawn_router(app).await;

    (format!("http://{addr}/exec"), hits)
}

async fn stub_post(State(stub): State<Stub>) -> Response {
    stub.hits.posts.fetch_add(1, Ordering::SeqCst);
    match stub.post {
        PostReply::Ack => {
            Json(json!({ "success": true, "message": "Data submitted successfully" })).into_response()
        }
        PostReply::Reject => {
            Json(json!({ "success": false, "error": "Sheet is locked" })).into_response()
        }
        PostReply::ServerError => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        PostReply::NotJson => (StatusCode::OK, "<html>Moved</html>").into_response(),
    }
}

async fn stub_get(
    State(stub): State<Stub>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    stub.hits.gets.fetch_add(1, Ordering::SeqCst);
    let callback = params.get("callback").cloned().unwrap_or_default();
    *stub.hits.last_query.lock().unwrap() = Some(params);

    match stub.get {
        GetReply::Ack => format!(r#"{callback}({{"success":true,"message":"Data submitted successfully"}});"#)
            .into_response(),
        GetReply::Reject => {
            format!(r#"{callback}({{"success":false,"error":"Sheet is locked"}});"#).into_response()
        }
        GetReply::ServerError => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        GetReply::Delayed(ms) => {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            format!(r#"{callback}({{"success":true}});"#).into_response()
        }
        GetReply::WrongCallback => r#"someone_else({"success":true});"#.into_response(),
        GetReply::NotScript => "<html></html>".into_response(),
    }
}

// ── Client helpers ──────────────────────────────────────────────

/// Collects every draft it is handed.
#[derive(Default)]
pub struct RecordingHandoff {
    pub drafts: Mutex<Vec<MailDraft>>,
}

impl RecordingHandoff {
    pub fn count(&self) -> usize {
        self.drafts.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<MailDraft> {
        self.drafts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Handoff for RecordingHandoff {
    async fn hand_off(&self, draft: &MailDraft) -> Result<(), String> {
        self.drafts.lock().unwrap().push(draft.clone());
        Ok(())
    }
}

pub fn client_config(endpoint_url: &str, callback_timeout: Duration) -> ClientConfig {
    ClientConfig {
        callback_timeout,
        request_timeout: Duration::from_secs(5),
        ..ClientConfig::for_endpoint(endpoint_url)
    }
}

/// Direct then script-tag, both against `direct_url`/`script_url`.
pub fn build_client(
    direct_url: &str,
    script_url: &str,
    callback_timeout: Duration,
    registry: Arc<CallbackRegistry>,
    handoff: Arc<RecordingHandoff>,
) -> SubmissionClient {
    let config = client_config(direct_url, callback_timeout);
    let http = Client::builder()
        .timeout(config.request_timeout)
        .build()
        .unwrap();

    SubmissionClient::new(&config, handoff)
        .expect("client")
        .with_transport(Arc::new(DirectTransport::new(http.clone(), direct_url)))
        .with_transport(Arc::new(ScriptTagTransport::new(
            http,
            script_url,
            registry,
            callback_timeout,
        )))
}

pub fn ada() -> FormInput {
    FormInput::contact("Ada Lovelace", "ada@example.com", "general", "Hello")
}

pub fn developer() -> FormInput {
    FormInput::application(
        RecordKind::Developer,
        "Grace Hopper",
        "grace@example.com",
        ApplicationDetails {
            experience: "junior".to_string(),
            skills: "Rust, COBOL".to_string(),
            motivation: "I want to contribute to open source.".to_string(),
            github: Some("https://github.com/grace".to_string()),
        },
    )
}
