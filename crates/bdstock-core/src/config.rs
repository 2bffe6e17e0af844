use std::env;

use crate::http_client::DEFAULT_TIMEOUT_MS;
use crate::ValidationError;

pub const DEFAULT_DSE_BASE_URL: &str = "https://www.dsebd.org";
pub const DEFAULT_CSE_BASE_URL: &str = "https://www.cse.com.bd";
pub const DEFAULT_USER_AGENT: &str = concat!("bdstock/", env!("CARGO_PKG_VERSION"));

pub const DSE_BASE_URL_VAR: &str = "BDSTOCK_DSE_BASE_URL";
pub const CSE_BASE_URL_VAR: &str = "BDSTOCK_CSE_BASE_URL";
pub const TIMEOUT_MS_VAR: &str = "BDSTOCK_TIMEOUT_MS";
pub const USER_AGENT_VAR: &str = "BDSTOCK_USER_AGENT";

/// Where the exchanges live and how to talk to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeConfig {
    pub dse_base_url: String,
    pub cse_base_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            dse_base_url: DEFAULT_DSE_BASE_URL.to_owned(),
            cse_base_url: DEFAULT_CSE_BASE_URL.to_owned(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl ExchangeConfig {
    /// Defaults overridden by the `BDSTOCK_*` environment variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    /// Blank values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(url) = read(DSE_BASE_URL_VAR) {
            config = config.with_dse_base_url(url)?;
        }
        if let Some(url) = read(CSE_BASE_URL_VAR) {
            config = config.with_cse_base_url(url)?;
        }
        if let Some(timeout) = read(TIMEOUT_MS_VAR) {
            config.timeout_ms = parse_timeout(&timeout)?;
        }
        if let Some(user_agent) = read(USER_AGENT_VAR) {
            config.user_agent = user_agent;
        }
        Ok(config)
    }

    pub fn with_dse_base_url(mut self, url: impl Into<String>) -> Result<Self, ValidationError> {
        self.dse_base_url = normalize_base_url(url.into())?;
        Ok(self)
    }

    pub fn with_cse_base_url(mut self, url: impl Into<String>) -> Result<Self, ValidationError> {
        self.cse_base_url = normalize_base_url(url.into())?;
        Ok(self)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Result<Self, ValidationError> {
        if timeout_ms == 0 {
            return Err(ValidationError::InvalidTimeout {
                value: timeout_ms.to_string(),
            });
        }
        self.timeout_ms = timeout_ms;
        Ok(self)
    }
}

fn normalize_base_url(url: String) -> Result<String, ValidationError> {
    let trimmed = url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ValidationError::InvalidBaseUrl { value: url });
    }
    Ok(trimmed.to_owned())
}

fn parse_timeout(value: &str) -> Result<u64, ValidationError> {
    match value.parse::<u64>() {
        Ok(timeout) if timeout > 0 => Ok(timeout),
        _ => Err(ValidationError::InvalidTimeout {
            value: value.to_owned(),
        }),
    }
}
