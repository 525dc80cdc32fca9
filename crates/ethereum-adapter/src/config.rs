use std::time::Duration;

use crate::constants::{
    ADDRESS_PATH, DEFAULT_BASE_URL, DEFAULT_DETECT_POLL_MS, DEFAULT_DETECT_TIMEOUT_MS,
    DEFAULT_REPORT_TIMEOUT_SECS, PAYLOAD_PARAM, SIGNATURE_PATH,
};
use crate::error::AdapterError;

/// How to look for an injected provider (mirrors `@metamask/detect-provider`).
#[derive(Clone, Debug, PartialEq)]
pub struct DetectOptions {
    /// Give up after this long if nothing has been injected.
    pub timeout: Duration,
    pub poll_interval: Duration,
    /// Only accept a provider that reports `isMetaMask`.
    pub must_be_metamask: bool,
    /// Do not log when no provider is found.
    pub silent: bool,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_DETECT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_DETECT_POLL_MS),
            must_be_metamask: false,
            silent: false,
        }
    }
}

impl DetectOptions {
    /// Probes after the first one that fit inside the timeout.
    pub fn retries(&self) -> u64 {
        if self.poll_interval.is_zero() {
            return 0;
        }
        let retries = self.timeout.as_nanos() / self.poll_interval.as_nanos();
        u64::try_from(retries).unwrap_or(u64::MAX)
    }
}

/// Where reports are sent.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportConfig {
    /// Empty means same-origin (the page is served by the adapter server).
    pub base_url: String,
    pub address_path: String,
    pub signature_path: String,
    pub timeout: Duration,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            address_path: ADDRESS_PATH.to_string(),
            signature_path: SIGNATURE_PATH.to_string(),
            timeout: Duration::from_secs(DEFAULT_REPORT_TIMEOUT_SECS),
        }
    }
}

impl ReportConfig {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Adapter configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct AdapterConfig {
    pub detect: DetectOptions,
    pub reports: ReportConfig,
    /// Query parameter the sign flow reads its payload from.
    pub payload_param: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            detect: DetectOptions::default(),
            reports: ReportConfig::default(),
            payload_param: PAYLOAD_PARAM.to_string(),
        }
    }
}

impl AdapterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Browser config: same-origin unless `ETH_ADAPTER_BASE_URL` was set at
    /// compile time.
    pub fn browser() -> Self {
        let mut config = Self::new();
        if let Some(url) = option_env!("ETH_ADAPTER_BASE_URL") {
            config.reports.base_url = url.to_string();
        }
        config
    }

    /// Native config from `ETH_ADAPTER_*` environment variables.
    pub fn from_env() -> Result<Self, AdapterError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, AdapterError> {
        let mut config = Self::new();
        config.reports.base_url = var("ETH_ADAPTER_BASE_URL")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        if let Some(ms) = parse_u64(&var, "ETH_ADAPTER_DETECT_TIMEOUT_MS")? {
            config.detect.timeout = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_u64(&var, "ETH_ADAPTER_REPORT_TIMEOUT_SECS")? {
            config.reports.timeout = Duration::from_secs(secs);
        }
        config.detect.must_be_metamask = match var("ETH_ADAPTER_MUST_BE_METAMASK").as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(AdapterError::ConfigError(format!(
                    "ETH_ADAPTER_MUST_BE_METAMASK must be true or false, got `{other}`"
                )))
            }
        };
        if let Some(param) = var("ETH_ADAPTER_PAYLOAD_PARAM").filter(|p| !p.is_empty()) {
            config.payload_param = param;
        }
        Ok(config)
    }
}

fn parse_u64(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<u64>, AdapterError> {
    match var(key).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|e| AdapterError::ConfigError(format!("{key}=`{v}`: {e}"))),
    }
}
