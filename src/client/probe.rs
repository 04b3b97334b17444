use crate::error::DeliveryError;
use crate::models::HealthStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMode {
    /// `?health=check`
    Health,
    /// `?test=true`
    Test,
}

impl ProbeMode {
    fn query(&self) -> [(&'static str, &'static str); 1] {
        match self {
            ProbeMode::Health => [("health", "check")],
            ProbeMode::Test => [("test", "true")],
        }
    }
}

/// Ask the intake endpoint whether it is alive. Carries no record.
pub async fn check(
    client: &reqwest::Client,
    endpoint_url: &str,
    mode: ProbeMode,
) -> Result<HealthStatus, DeliveryError> {
    let resp = client
        .get(endpoint_url)
        .query(&mode.query())
        .send()
        .await
        .map_err(|e| DeliveryError::Network(format!("Health probe failed: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(DeliveryError::Protocol(format!(
            "Health probe returned HTTP {}",
            status.as_u16()
        )));
    }

    let health: HealthStatus = resp
        .json()
        .await
        .map_err(|e| DeliveryError::Protocol(format!("Unexpected health body: {e}")))?;

    if !health.success {
        return Err(DeliveryError::RemoteRejection(health.message));
    }

    Ok(health)
}
