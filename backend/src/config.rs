use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_PIPEDRIVE_API_URL: &str = "https://api.pipedrive.com/v1";
pub const DEFAULT_EMAIL_FROM: &str = "Little John <analysis@littlejohn.fr>";
pub const DEFAULT_BOOKING_URL: &str = "https://calendly.com/little-john";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pipedrive_api_key: String,
    pub pipedrive_api_url: String,
    pub resend_api_key: String,
    pub email_from: String,
    pub booking_url: String,
    pub port: u16,
    pub http_timeout: Duration,
    pub sentry_dsn: Option<String>,
}

/// Fails fast on the variables the service cannot run without.
pub fn validate_env() -> Result<(), ConfigError> {
    let required_vars = ["PIPEDRIVE_API_KEY", "RESEND_API_KEY"];
    for var in required_vars {
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => {}
            _ => return Err(ConfigError::Missing(var)),
        }
    }
    Ok(())
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        validate_env()?;
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any key lookup, so tests don't have to touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let pipedrive_api_key = get("PIPEDRIVE_API_KEY").ok_or(ConfigError::Missing("PIPEDRIVE_API_KEY"))?;
        let resend_api_key = get("RESEND_API_KEY").ok_or(ConfigError::Missing("RESEND_API_KEY"))?;

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid { name: "PORT", value: raw })?,
            None => 3000,
        };
        let timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid { name: "HTTP_TIMEOUT_SECS", value: raw })?,
            None => 30,
        };

        Ok(Self {
            pipedrive_api_key,
            pipedrive_api_url: get("PIPEDRIVE_API_URL")
                .unwrap_or_else(|| DEFAULT_PIPEDRIVE_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            resend_api_key,
            email_from: get("EMAIL_FROM").unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string()),
            booking_url: get("BOOKING_URL").unwrap_or_else(|| DEFAULT_BOOKING_URL.to_string()),
            port,
            http_timeout: Duration::from_secs(timeout_secs),
            sentry_dsn: get("SENTRY_DSN"),
        })
    }
}
