//! Application Configuration
//!
//! WASM has no process environment, so overrides are captured at build
//! time (`EPAGAL_API_URL=... trunk build`).

use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_POLL_SECS: u64 = 30;
const DEFAULT_LOG_CAPACITY: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Backend base URL without trailing slash, e.g. http://localhost:8000/api
    pub api_base_url: String,
    /// Notifications re-fetch period
    pub poll_interval: Duration,
    pub log_level: String,
    pub log_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_values(
            option_env!("EPAGAL_API_URL"),
            option_env!("EPAGAL_POLL_SECS"),
            option_env!("EPAGAL_LOG_LEVEL"),
            option_env!("EPAGAL_LOG_CAPACITY"),
        )
    }
}

impl AppConfig {
    /// Resolve raw (possibly missing or empty) values against defaults
    pub fn from_values(
        api_url: Option<&str>,
        poll_secs: Option<&str>,
        log_level: Option<&str>,
        log_capacity: Option<&str>,
    ) -> Self {
        let api_base_url = api_url
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();
        let poll_secs = poll_secs
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_POLL_SECS);
        let log_level = log_level
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("info")
            .to_string();
        let log_capacity = log_capacity
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_LOG_CAPACITY);

        Self {
            api_base_url,
            poll_interval: Duration::from_secs(poll_secs),
            log_level,
            log_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::from_values(None, None, None, None);
        assert_eq!(cfg.api_base_url, "http://localhost:8000/api");
        assert_eq!(cfg.poll_interval, Duration::from_secs(30));
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.log_capacity, 500);
    }

    #[test]
    fn test_overrides_and_normalisation() {
        let cfg = AppConfig::from_values(
            Some("https://api.epagal.gob.ec/api/"),
            Some("10"),
            Some("debug"),
            Some("50"),
        );
        assert_eq!(cfg.api_base_url, "https://api.epagal.gob.ec/api");
        assert_eq!(cfg.poll_interval, Duration::from_secs(10));
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.log_capacity, 50);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let cfg = AppConfig::from_values(Some("  "), Some("0"), Some(""), Some("many"));
        assert_eq!(cfg.api_base_url, DEFAULT_API_URL);
        assert_eq!(cfg.poll_interval, Duration::from_secs(DEFAULT_POLL_SECS));
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.log_capacity, DEFAULT_LOG_CAPACITY);
    }
}
