use std::net::IpAddr;
use std::time::Duration;

/// Settings for the reference intake server.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub service_name: String,
    pub allowed_origin: String,
    pub max_body_size: usize,
    pub log_level: String,
}

/// Settings for the submission client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint_url: String,
    pub source: String,
    pub site_name: String,
    pub fallback_recipient: String,
    pub request_timeout: Duration,
    pub callback_timeout: Duration,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("SHEETRELAY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid SHEETRELAY_HOST: {e}"))?;

        let port: u16 = env_or("SHEETRELAY_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid SHEETRELAY_PORT: {e}"))?;

        let max_body_size: usize = env_or("SHEETRELAY_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid SHEETRELAY_MAX_BODY_SIZE: {e}"))?;

        Ok(Config {
            host,
            port,
            service_name: env_or("SHEETRELAY_SERVICE_NAME", "Open Build Form Handler"),
            allowed_origin: env_or("SHEETRELAY_ALLOWED_ORIGIN", "*"),
            max_body_size,
            log_level: env_or("SHEETRELAY_LOG_LEVEL", "info"),
        })
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, String> {
        let endpoint_url = env_required("SHEETRELAY_ENDPOINT_URL")?;

        let request_timeout = env_secs("SHEETRELAY_REQUEST_TIMEOUT_SECS", "30")?;
        let callback_timeout = env_secs("SHEETRELAY_CALLBACK_TIMEOUT_SECS", "10")?;

        let smtp = match (
            std::env::var("SHEETRELAY_SMTP_HOST").ok(),
            std::env::var("SHEETRELAY_SMTP_PORT").ok(),
            std::env::var("SHEETRELAY_SMTP_USER").ok(),
            std::env::var("SHEETRELAY_SMTP_PASS").ok(),
            std::env::var("SHEETRELAY_SMTP_FROM").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid SHEETRELAY_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        Ok(ClientConfig {
            endpoint_url,
            source: env_or("SHEETRELAY_SOURCE", "open-build-website"),
            site_name: env_or("SHEETRELAY_SITE_NAME", "Open Build"),
            fallback_recipient: env_or("SHEETRELAY_FALLBACK_RECIPIENT", "contact@open.build"),
            request_timeout,
            callback_timeout,
            smtp,
        })
    }

    /// Defaults for everything but the endpoint.
    pub fn for_endpoint(endpoint_url: &str) -> Self {
        ClientConfig {
            endpoint_url: endpoint_url.to_string(),
            source: "open-build-website".to_string(),
            site_name: "Open Build".to_string(),
            fallback_recipient: "contact@open.build".to_string(),
            request_timeout: Duration::from_secs(30),
            callback_timeout: Duration::from_secs(10),
            smtp: None,
        }
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_secs(key: &str, default: &str) -> Result<Duration, String> {
    env_or(key, default)
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| format!("Invalid {key}: {e}"))
}
