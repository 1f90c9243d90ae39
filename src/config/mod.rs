pub mod profiles;

use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use profiles::{Profile, ProfileDefaults};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub identity_url: String,
    pub app_url: String,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub session_file: Option<PathBuf>,
    pub image_concurrency: usize,
    pub breaker_failure_threshold: u32,
    pub json_logs: bool,
}

pub struct ConfigInfo {
    pub config: Config,
    pub profile: Profile,
    pub overrides: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<ConfigInfo> {
        dotenv().ok();
        Self::from_lookup(Profile::from_env(), |key| env::var(key).ok())
    }

    /// Builds the config from `lookup`, falling back to the profile defaults
    /// for anything it does not provide.
    pub fn from_lookup<F>(profile: Profile, lookup: F) -> anyhow::Result<ConfigInfo>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ProfileDefaults::for_profile(profile);
        let mut overrides = Vec::new();
        let mut read = |key: &str| {
            let value = lookup(key).filter(|v| !v.trim().is_empty());
            if value.is_some() {
                overrides.push(key.to_string());
            }
            value
        };

        let identity_url = read("BNPL_IDENTITY_URL").unwrap_or(defaults.identity_url);
        let app_url = read("BNPL_APP_URL").unwrap_or(defaults.app_url);
        let api_key = read("BNPL_API_KEY");

        let request_timeout_secs = match read("BNPL_REQUEST_TIMEOUT_SECS") {
            Some(v) => v
                .parse()
                .map_err(|_| anyhow::anyhow!("BNPL_REQUEST_TIMEOUT_SECS must be a number of seconds"))?,
            None => defaults.request_timeout_secs,
        };

        let image_concurrency = match read("BNPL_IMAGE_CONCURRENCY") {
            Some(v) => v
                .parse()
                .map_err(|_| anyhow::anyhow!("BNPL_IMAGE_CONCURRENCY must be a positive integer"))?,
            None => defaults.image_concurrency,
        };
        if image_concurrency == 0 {
            anyhow::bail!("BNPL_IMAGE_CONCURRENCY must be a positive integer");
        }

        let breaker_failure_threshold = match read("BNPL_BREAKER_THRESHOLD") {
            Some(v) => v
                .parse()
                .map_err(|_| anyhow::anyhow!("BNPL_BREAKER_THRESHOLD must be a positive integer"))?,
            None => defaults.breaker_failure_threshold,
        };
        if breaker_failure_threshold == 0 {
            anyhow::bail!("BNPL_BREAKER_THRESHOLD must be a positive integer");
        }

        let session_file = read("BNPL_SESSION_FILE").map(PathBuf::from);
        let json_logs = read("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        for (key, url) in [("BNPL_IDENTITY_URL", &identity_url), ("BNPL_APP_URL", &app_url)] {
            url::Url::parse(url).map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", key, e))?;
        }

        Ok(ConfigInfo {
            config: Config {
                identity_url,
                app_url,
                api_key,
                request_timeout_secs,
                session_file,
                image_concurrency,
                breaker_failure_threshold,
                json_logs,
            },
            profile,
            overrides,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let info = Config::from_lookup(Profile::Production, lookup(&[])).unwrap();
        let defaults = ProfileDefaults::for_profile(Profile::Production);
        assert_eq!(info.config.identity_url, defaults.identity_url);
        assert_eq!(info.config.app_url, defaults.app_url);
        assert!(info.config.api_key.is_none());
        assert!(info.overrides.is_empty());
    }

    #[test]
    fn test_overrides_are_recorded() {
        let info = Config::from_lookup(
            Profile::Development,
            lookup(&[
                ("BNPL_APP_URL", "http://localhost:8080/mobile"),
                ("BNPL_API_KEY", "secret"),
                ("BNPL_REQUEST_TIMEOUT_SECS", "5"),
                ("LOG_FORMAT", "JSON"),
            ]),
        )
        .unwrap();

        assert_eq!(info.config.app_url, "http://localhost:8080/mobile");
        assert_eq!(info.config.api_key.as_deref(), Some("secret"));
        assert_eq!(info.config.request_timeout_secs, 5);
        assert!(info.config.json_logs);
        assert_eq!(
            info.overrides,
            vec!["BNPL_APP_URL", "BNPL_API_KEY", "BNPL_REQUEST_TIMEOUT_SECS", "LOG_FORMAT"]
        );
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let result = Config::from_lookup(
            Profile::Development,
            lookup(&[("BNPL_REQUEST_TIMEOUT_SECS", "soon")]),
        );
        assert!(result.is_err());

        let result = Config::from_lookup(
            Profile::Development,
            lookup(&[("BNPL_IMAGE_CONCURRENCY", "0")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_breaker_threshold_is_rejected() {
        let result = Config::from_lookup(
            Profile::Development,
            lookup(&[("BNPL_BREAKER_THRESHOLD", "0")]),
        );
        assert!(result.is_err());

        let info = Config::from_lookup(
            Profile::Development,
            lookup(&[("BNPL_BREAKER_THRESHOLD", "3")]),
        )
        .unwrap();
        assert_eq!(info.config.breaker_failure_threshold, 3);
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let result = Config::from_lookup(
            Profile::Development,
            lookup(&[("BNPL_IDENTITY_URL", "not a url")]),
        );
        assert!(result.is_err());
    }
}
