use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;
use crate::models::DelayConfig;
use crate::runner::FailurePolicy;

pub const DEFAULT_SEARCH_URL: &str = "https://reg.msu.edu/Courses/Search.aspx";

/// Which session implementation drives the search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Plain HTTP form posts with a cookie store.
    Http,
    /// Headless Chromium, needs the `browser` feature.
    Browser,
}

/// Runtime settings. The defaults reproduce the fixed behavior of the tool:
/// read `input.txt`, write `input.csv`, wait at most 10 seconds per step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address of the catalog search form.
    pub search_url: String,
    /// Course list, one code per line.
    pub input_path: PathBuf,
    /// Destination CSV, overwritten on every run.
    pub output_path: PathBuf,
    /// Upper bound in seconds on waiting for a page or element.
    pub wait_timeout_secs: u64,
    pub user_agent: String,
    pub backend: Backend,
    pub on_failure: FailurePolicy,
    /// Default tracing level for this crate; `RUST_LOG` takes precedence.
    pub log_level: String,
    pub delay: DelayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            input_path: PathBuf::from("input.txt"),
            output_path: PathBuf::from("input.csv"),
            wait_timeout_secs: 10,
            user_agent: format!("catalog-scraper/{}", env!("CARGO_PKG_VERSION")),
            backend: Backend::Http,
            on_failure: FailurePolicy::Abort,
            log_level: "info".to_string(),
            delay: DelayConfig::default(),
        }
    }
}

impl Config {
    /// Defaults, then `catalog.toml` if present, then `CATALOG_*` variables
    /// (`CATALOG_DELAY__ENABLED=false` sets `delay.enabled`).
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("catalog.toml"))
            .merge(Env::prefixed("CATALOG_").split("__"))
    }

    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        Ok(figment.extract()?)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_behavior() {
        let config = Config::from_figment(Figment::from(Serialized::defaults(Config::default())))
            .unwrap();
        assert_eq!(config.search_url, DEFAULT_SEARCH_URL);
        assert_eq!(config.input_path, PathBuf::from("input.txt"));
        assert_eq!(config.output_path, PathBuf::from("input.csv"));
        assert_eq!(config.wait_timeout(), Duration::from_secs(10));
        assert_eq!(config.backend, Backend::Http);
        assert_eq!(config.on_failure, FailurePolicy::Abort);
    }

    #[test]
    fn layers_override_defaults() {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Serialized::default("wait_timeout_secs", 3))
            .merge(Serialized::default("on_failure", "skip"))
            .merge(Serialized::default("delay.enabled", false));
        let config = Config::from_figment(figment).unwrap();

        assert_eq!(config.wait_timeout(), Duration::from_secs(3));
        assert_eq!(config.on_failure, FailurePolicy::Skip);
        assert!(!config.delay.enabled);
    }

    #[test]
    fn bad_values_are_input_errors() {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Serialized::default("backend", "carrier-pigeon"));
        let err = Config::from_figment(figment).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Input);
    }
}
