//! Runtime configuration.
//!
//! Values come from the environment (a `.env` file is loaded by `main` via
//! dotenv) with the defaults below.

use std::error::Error;
use std::time::Duration;

/// Geolocation service root, requests go to `{base}/{ip}/json/`.
pub const DEFAULT_IPAPI_BASE_URL: &str = "https://ipapi.co";
pub const DEFAULT_TIMEOUT_SEC: u64 = 10;
/// Idle time after which a cached lookup is dropped.
pub const DEFAULT_CACHE_GC_MINUTES: i64 = 60;
/// Local time refresh period for `--watch`.
pub const TICK_MSEC: u64 = 1000;

pub const ENV_BASE_URL: &str = "IPAPI_BASE_URL";
pub const ENV_TIMEOUT_SEC: &str = "IP_LOOKUP_TIMEOUT_SEC";
pub const ENV_CACHE_GC_MINUTES: &str = "IP_LOOKUP_CACHE_GC_MINUTES";
pub const ENV_CACHE_FILE: &str = "IP_LOOKUP_CACHE_FILE";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub ipapi_base_url: String,
    pub request_timeout: Duration,
    pub cache_gc_after: chrono::Duration,
    pub cache_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ipapi_base_url: DEFAULT_IPAPI_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SEC),
            cache_gc_after: chrono::Duration::minutes(DEFAULT_CACHE_GC_MINUTES),
            cache_file: None,
        }
    }
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Config, Box<dyn Error>> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup, unset keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = value(ENV_BASE_URL) {
            config.ipapi_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(secs) = value(ENV_TIMEOUT_SEC) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| format!("Invalid {ENV_TIMEOUT_SEC}={secs}: {e}"))?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(minutes) = value(ENV_CACHE_GC_MINUTES) {
            let minutes: i64 = minutes
                .trim()
                .parse()
                .map_err(|e| format!("Invalid {ENV_CACHE_GC_MINUTES}={minutes}: {e}"))?;
            if minutes < 0 {
                return Err(format!("{ENV_CACHE_GC_MINUTES} must not be negative").into());
            }
            config.cache_gc_after = chrono::Duration::minutes(minutes);
        }
        config.cache_file = value(ENV_CACHE_FILE);

        log::debug!("config: {config:?}");
        Ok(config)
    }
}

/// Number of clock refreshes in a watch lasting `seconds`.
pub fn watch_ticks(seconds: u64) -> u64 {
    seconds.saturating_mul(1000) / TICK_MSEC
}
