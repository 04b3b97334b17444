use async_trait::async_trait;
use serde::Serialize;

use super::Transport;
use crate::error::DeliveryError;
use crate::models::{Ack, AckBody, SubmissionRecord, TargetCollection};

const LOG_BODY_LIMIT: usize = 1024;

#[derive(Serialize)]
pub struct Envelope<'a> {
    #[serde(rename = "sheetName")]
    pub sheet_name: &'a str,
    pub data: &'a SubmissionRecord,
}

/// Plain `POST` of `{sheetName, data}` as JSON.
pub struct DirectTransport {
    client: reqwest::Client,
    endpoint_url: String,
}

impl DirectTransport {
    pub fn new(client: reqwest::Client, endpoint_url: &str) -> Self {
        Self {
            client,
            endpoint_url: endpoint_url.to_string(),
        }
    }
}

#[async_trait]
impl Transport for DirectTransport {
    fn name(&self) -> &str {
        "direct"
    }

    async fn attempt(
        &self,
        target: &TargetCollection,
        record: &SubmissionRecord,
    ) -> Result<Ack, DeliveryError> {
        let envelope = Envelope {
            sheet_name: target.as_str(),
            data: record,
        };

        if tracing::enabled!(tracing::Level::DEBUG) {
            let body = serde_json::to_string(&envelope).unwrap_or_default();
            tracing::debug!("POST {} body: {}", self.endpoint_url, truncate(&body));
        }

        let resp = self
            .client
            .post(&self.endpoint_url)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| DeliveryError::Network(format!("Request to intake endpoint failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| DeliveryError::Network(format!("Failed to read response body: {e}")))?;

        tracing::debug!("POST {} -> {}: {}", self.endpoint_url, status.as_u16(), truncate(&body));

        if !status.is_success() {
            return Err(DeliveryError::Protocol(format!(
                "HTTP {}: {}",
                status.as_u16(),
                truncate(&body)
            )));
        }

        AckBody::parse(&body)
    }
}

pub(crate) fn truncate(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}
