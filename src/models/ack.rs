use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;

pub const DEFAULT_ACK_MESSAGE: &str = "Data submitted successfully";

/// Wire acknowledgment shared by every transport and by the intake endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AckBody {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AckBody {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            error: None,
        }
    }

    pub fn failed(error: &str) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.to_string()),
        }
    }

    pub fn into_result(self) -> Result<Ack, DeliveryError> {
        if self.success {
            Ok(Ack {
                message: self
                    .message
                    .unwrap_or_else(|| DEFAULT_ACK_MESSAGE.to_string()),
            })
        } else {
            let reason = self
                .error
                .or(self.message)
                .unwrap_or_else(|| "Remote endpoint rejected the submission".to_string());
            Err(DeliveryError::RemoteRejection(reason))
        }
    }

    /// Parse a raw response body. Anything that is not an `AckBody` is a
    /// protocol error; a well-formed `success: false` is a rejection.
    pub fn parse(body: &str) -> Result<Ack, DeliveryError> {
        let parsed: AckBody = serde_json::from_str(body).map_err(|e| {
            DeliveryError::Protocol(format!("Unexpected acknowledgment body: {e}"))
        })?;
        parsed.into_result()
    }

    pub fn from_value(value: serde_json::Value) -> Result<Ack, DeliveryError> {
        let parsed: AckBody = serde_json::from_value(value).map_err(|e| {
            DeliveryError::Protocol(format!("Unexpected acknowledgment payload: {e}"))
        })?;
        parsed.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ack {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}
