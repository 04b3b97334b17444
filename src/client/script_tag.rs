use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::direct::truncate;
use super::jsonp;
use super::registry::{CallbackPayload, CallbackRegistry};
use super::Transport;
use crate::error::DeliveryError;
use crate::models::{Ack, AckBody, SubmissionRecord, TargetCollection};

/// JSONP-style delivery: a `GET` carrying the record in the query string,
/// answered by a script that invokes a per-call callback.
pub struct ScriptTagTransport {
    client: reqwest::Client,
    endpoint_url: String,
    registry: Arc<CallbackRegistry>,
    timeout: Duration,
}

impl ScriptTagTransport {
    pub fn new(
        client: reqwest::Client,
        endpoint_url: &str,
        registry: Arc<CallbackRegistry>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            endpoint_url: endpoint_url.to_string(),
            registry,
            timeout,
        }
    }

    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }
}

#[async_trait]
impl Transport for ScriptTagTransport {
    fn name(&self) -> &str {
        "script-tag"
    }

    async fn attempt(
        &self,
        target: &TargetCollection,
        record: &SubmissionRecord,
    ) -> Result<Ack, DeliveryError> {
        let data = record.to_json().map_err(DeliveryError::Protocol)?;

        let (mut pending, rx) = self.registry.register();
        let callback = pending.id().to_string();

        let request = self.client.get(&self.endpoint_url).query(&[
            ("callback", callback.as_str()),
            ("sheetName", target.as_str()),
            ("data", data.as_str()),
        ]);

        tracing::debug!("GET {} (callback {callback}, sheet '{target}')", self.endpoint_url);

        let registry = Arc::clone(&self.registry);
        let loader = tokio::spawn(async move {
            let payload = load(request, &callback).await;
            registry.dispatch(&callback, payload);
        });
        pending.attach_loader(loader);

        // `pending` is dropped on every path out of here, which deregisters the
        // callback and aborts the loader.
        let outcome = tokio::time::timeout(self.timeout, rx).await;
        drop(pending);

        match outcome {
            Err(_) => Err(DeliveryError::Timeout(self.timeout)),
            Ok(Err(_)) => Err(DeliveryError::Network(
                "Script loader exited without invoking the callback".to_string(),
            )),
            Ok(Ok(payload)) => AckBody::from_value(payload?),
        }
    }
}

/// Fetch the script and pull the argument out of its callback invocation.
async fn load(request: reqwest::RequestBuilder, callback: &str) -> CallbackPayload {
    let resp = request
        .send()
        .await
        .map_err(|e| DeliveryError::Network(format!("Script request failed: {e}")))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| DeliveryError::Network(format!("Failed to read script body: {e}")))?;

    tracing::debug!("Script response {}: {}", status.as_u16(), truncate(&body));

    if !status.is_success() {
        return Err(DeliveryError::Network(format!(
            "Script load failed with HTTP {}",
            status.as_u16()
        )));
    }

    let (name, payload) = jsonp::parse_invocation(&body).map_err(DeliveryError::Protocol)?;
    if name != callback {
        return Err(DeliveryError::Protocol(format!(
            "Script invoked '{name}' instead of '{callback}'"
        )));
    }

    Ok(payload)
}
