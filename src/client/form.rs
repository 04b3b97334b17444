use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::handoff::MailDraft;
use super::SubmissionClient;
use crate::models::{FormInput, TargetCollection};

const CONTACT_SENT: &str =
    "Thank you! Your message has been sent successfully. We'll get back to you soon.";
const CONTACT_FAILED: &str =
    "There was an error sending your message. Please try again or contact us directly.";
const APPLICATION_SENT: &str = "Application submitted successfully! We'll review your application and get back to you within 3-5 business days.";
const APPLICATION_FAILED: &str =
    "There was an error submitting your application. Please try again or contact us directly.";

/// The one message a form shows after a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Sent {
        message: String,
    },
    Failed {
        message: String,
        /// Present when the record was handed off for manual sending.
        draft: Option<MailDraft>,
    },
    /// A submission from this form is already running.
    Busy,
}

/// One form instance bound to a target collection.
pub struct FormController {
    client: Arc<SubmissionClient>,
    target: TargetCollection,
    in_flight: AtomicBool,
}

impl FormController {
    pub fn new(client: Arc<SubmissionClient>, target: TargetCollection) -> Self {
        Self {
            client,
            target,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn submit(&self, input: FormInput) -> Notice {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Notice::Busy;
        }
        let _release = InFlight(&self.in_flight);

        let (sent, failed) = if input.kind.is_application() {
            (APPLICATION_SENT, APPLICATION_FAILED)
        } else {
            (CONTACT_SENT, CONTACT_FAILED)
        };

        match self.client.submit(input, &self.target).await {
            Ok(_) => Notice::Sent {
                message: sent.to_string(),
            },
            Err(e) => {
                tracing::error!("Submission to '{}' failed: {e}", self.target);
                Notice::Failed {
                    message: failed.to_string(),
                    draft: e.draft().cloned(),
                }
            }
        }
    }
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
