pub mod direct;
pub mod form;
pub mod handoff;
pub mod jsonp;
pub mod probe;
pub mod registry;
pub mod script_tag;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::config::ClientConfig;
use crate::error::DeliveryError;
use crate::models::{Ack, FormInput, HealthStatus, SubmissionRecord, TargetCollection};

use direct::DirectTransport;
use handoff::{Handoff, LoggingHandoff, MailDraft, SmtpHandoff};
use probe::ProbeMode;
use registry::CallbackRegistry;
use script_tag::ScriptTagTransport;

/// One way of getting a record to the intake endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &str;
    async fn attempt(
        &self,
        target: &TargetCollection,
        record: &SubmissionRecord,
    ) -> Result<Ack, DeliveryError>;
}

/// Delivers records through an ordered chain of transports, ending in a mail handoff.
pub struct SubmissionClient {
    transports: Vec<Arc<dyn Transport>>,
    handoff: Arc<dyn Handoff>,
    http: reqwest::Client,
    endpoint_url: String,
    source: String,
    site_name: String,
    fallback_recipient: String,
}

impl SubmissionClient {
    /// A client with no transports. Every submission goes straight to the handoff
    /// until transports are added with [`SubmissionClient::with_transport`].
    pub fn new(config: &ClientConfig, handoff: Arc<dyn Handoff>) -> Result<Self, String> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            transports: Vec::new(),
            handoff,
            http,
            endpoint_url: config.endpoint_url.clone(),
            source: config.source.clone(),
            site_name: config.site_name.clone(),
            fallback_recipient: config.fallback_recipient.clone(),
        })
    }

    /// Direct POST, then script-tag, then the handoff picked by config.
    pub fn from_config(config: &ClientConfig, registry: Arc<CallbackRegistry>) -> Result<Self, String> {
        let handoff: Arc<dyn Handoff> = match config.smtp.as_ref() {
            Some(smtp) => match SmtpHandoff::new(smtp) {
                Ok(mailer) => {
                    tracing::info!("Fallback drafts will be relayed over SMTP");
                    Arc::new(mailer)
                }
                Err(e) => {
                    tracing::warn!("SMTP handoff not available: {e}");
                    Arc::new(LoggingHandoff)
                }
            },
            None => Arc::new(LoggingHandoff),
        };

        let client = Self::new(config, handoff)?;
        let direct = DirectTransport::new(client.http.clone(), &config.endpoint_url);
        let script_tag = ScriptTagTransport::new(
            client.http.clone(),
            &config.endpoint_url,
            registry,
            config.callback_timeout,
        );

        Ok(client
            .with_transport(Arc::new(direct))
            .with_transport(Arc::new(script_tag)))
    }

    /// Append a transport. Transports are tried in the order they were added.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transports.push(transport);
        self
    }

    pub fn transport_names(&self) -> Vec<&str> {
        self.transports.iter().map(|t| t.name()).collect()
    }

    pub async fn submit(
        &self,
        input: FormInput,
        target: &TargetCollection,
    ) -> Result<Ack, DeliveryError> {
        input.validate().map_err(DeliveryError::Invalid)?;

        let record = input.stamp(&self.source, Utc::now());
        let mut last_error = None;

        for transport in &self.transports {
            match transport.attempt(target, &record).await {
                Ok(ack) => {
                    tracing::info!(
                        "Delivered {} record to '{target}' via {}",
                        record.kind(),
                        transport.name()
                    );
                    return Ok(ack);
                }
                Err(e) => {
                    tracing::warn!("Transport {} failed for '{target}': {e}", transport.name());
                    last_error = Some(e);
                }
            }
        }

        let cause = last_error
            .unwrap_or_else(|| DeliveryError::Network("No transports configured".to_string()));
        let draft = MailDraft::for_record(&self.fallback_recipient, &self.site_name, &record);

        if let Err(e) = self.handoff.hand_off(&draft).await {
            tracing::error!("Mail handoff failed for '{target}': {e}");
        }

        Err(DeliveryError::HandedOff {
            draft,
            cause: Box::new(cause),
        })
    }

    /// Submit to the collection the record's kind belongs to.
    pub async fn submit_form(&self, input: FormInput) -> Result<Ack, DeliveryError> {
        let target = TargetCollection::for_kind(input.kind);
        self.submit(input, &target).await
    }

    pub async fn health(&self, mode: ProbeMode) -> Result<HealthStatus, DeliveryError> {
        probe::check(&self.http, &self.endpoint_url, mode).await
    }
}
