use std::path::PathBuf;
use thiserror::Error;

use crate::api::coingecko::CoinGeckoClient;
use crate::services::chart_service::MissingBarPolicy;
use crate::services::comparison_service::ComparisonOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("Invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Runtime settings read from the environment (after `.env` is loaded)
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: Option<String>,
    pub coingecko_base_url: String,
    pub coingecko_api_key: Option<String>,
    pub comparison: ComparisonOptions,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = ComparisonOptions::default();

        let missing_bars = match get("MISSING_BAR_POLICY") {
            Some(raw) => raw
                .parse::<MissingBarPolicy>()
                .map_err(|message| ConfigError::Invalid { key: "MISSING_BAR_POLICY", message })?,
            None => defaults.missing_bars,
        };

        Ok(Self {
            discord_token: get("DISCORD_TOKEN"),
            coingecko_base_url: get("COINGECKO_BASE_URL")
                .unwrap_or_else(|| CoinGeckoClient::DEFAULT_BASE_URL.to_string()),
            coingecko_api_key: get("COINGECKO_API_KEY"),
            comparison: ComparisonOptions {
                csv_path: get("REPORT_CSV_PATH").map(PathBuf::from).unwrap_or(defaults.csv_path),
                chart_path: get("REPORT_CHART_PATH").map(PathBuf::from).unwrap_or(defaults.chart_path),
                missing_bars,
            },
        })
    }

    pub fn require_discord_token(&self) -> Result<&str, ConfigError> {
        self.discord_token
            .as_deref()
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))
    }

    /// The one price client shared by everything in this process
    pub fn price_client(&self) -> CoinGeckoClient {
        CoinGeckoClient::with_base_url(self.coingecko_api_key.clone(), self.coingecko_base_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.coingecko_base_url, "https://api.coingecko.com/api/v3");
        assert_eq!(config.comparison.csv_path, PathBuf::from("crypto_prices.csv"));
        assert_eq!(config.comparison.chart_path, PathBuf::from("crypto_changes.png"));
        assert_eq!(config.comparison.missing_bars, MissingBarPolicy::Skip);
        assert!(config.require_discord_token().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("COINGECKO_API_KEY", "  "),
            ("REPORT_CSV_PATH", "out/prices.csv"),
            ("MISSING_BAR_POLICY", "marker"),
        ])
        .unwrap();

        assert_eq!(config.require_discord_token().unwrap(), "abc");
        assert!(config.coingecko_api_key.is_none());
        assert_eq!(config.comparison.csv_path, PathBuf::from("out/prices.csv"));
        assert_eq!(config.comparison.missing_bars, MissingBarPolicy::Marker);
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        let err = config_from(&[("MISSING_BAR_POLICY", "hide")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "MISSING_BAR_POLICY", .. }));
    }
}
