pub mod config;
pub mod error;
pub mod state;
pub mod models;
pub mod client;
pub mod intake;
pub mod routes;
pub mod sheets;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::sheets::Workbook;
use crate::state::{AppState, SharedState};

pub fn build_app(config: Config) -> (Router, SharedState) {
    let allow_origin = HeaderValue::from_str(&config.allowed_origin).unwrap_or_else(|e| {
        tracing::warn!("Invalid allowed origin '{}': {e}; using '*'", config.allowed_origin);
        HeaderValue::from_static("*")
    });
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        config,
        workbook: Workbook::new(),
    });

    let app = Router::new()
        .merge(routes::intake_routes())
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(max_body_size))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("access-control-allow-origin"),
                    allow_origin,
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                )),
        )
        .with_state(state.clone());

    (app, state)
}

async fn health() -> &'static str {
    "ok"
}
