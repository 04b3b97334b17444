use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::models::SubmissionRecord;

/// A pre-filled email carrying a record that could not be delivered automatically.
#[derive(Debug, Clone, PartialEq)]
pub struct MailDraft {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl MailDraft {
    pub fn for_record(recipient: &str, site_name: &str, record: &SubmissionRecord) -> Self {
        let body = serde_json::to_string_pretty(record).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize record for mail draft: {e}");
            format!("{record:?}")
        });

        Self {
            recipient: recipient.to_string(),
            subject: format!("{site_name} {} - {}", record.kind(), record.name()),
            body,
        }
    }

    pub fn mailto_uri(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.recipient,
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}

/// Where a mail draft goes once the network transports are exhausted.
#[async_trait]
pub trait Handoff: Send + Sync {
    async fn hand_off(&self, draft: &MailDraft) -> Result<(), String>;
}

/// Surfaces the `mailto:` link in the log for the operator or the embedding UI to open.
pub struct LoggingHandoff;

#[async_trait]
impl Handoff for LoggingHandoff {
    async fn hand_off(&self, draft: &MailDraft) -> Result<(), String> {
        tracing::warn!("Automatic delivery failed, open to send manually: {}", draft.mailto_uri());
        Ok(())
    }
}

/// Relays the draft to the fallback recipient through an SMTP server.
pub struct SmtpHandoff {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpHandoff {
    pub fn new(config: &SmtpConfig) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| format!("SMTP error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Handoff for SmtpHandoff {
    async fn hand_off(&self, draft: &MailDraft) -> Result<(), String> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| format!("Invalid from address: {e}"))?,
            )
            .to(draft
                .recipient
                .parse()
                .map_err(|e| format!("Invalid to address: {e}"))?)
            .subject(draft.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(draft.body.clone())
            .map_err(|e| format!("Failed to build email: {e}"))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| format!("Failed to send email: {e}"))?;

        tracing::info!("Relayed mail draft '{}' to {}", draft.subject, draft.recipient);
        Ok(())
    }
}
