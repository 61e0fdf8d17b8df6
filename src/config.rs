use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::services::analysis::NarrativeFormat;
use crate::sources::yahoo::DEFAULT_BASE_URL;
use crate::types::LookbackPeriod;

fn parse_var<T: FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Yahoo Finance API root.
    pub yahoo_base_url: String,
    /// Lookback used when a request does not name one.
    pub default_period: LookbackPeriod,
    /// Exchange suffix appended to bare tickers (".NS" for NSE). Empty disables.
    pub ticker_suffix: String,
    /// Currency symbol prefixed to prices in the narrative.
    pub currency_symbol: String,
    /// Decimal places in the narrative.
    pub report_decimals: usize,
    /// Snapshot cache lifetime in seconds. Zero disables caching.
    pub cache_ttl_secs: u64,
    /// Upstream HTTP timeout in seconds.
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            yahoo_base_url: DEFAULT_BASE_URL.to_string(),
            default_period: LookbackPeriod::OneYear,
            ticker_suffix: ".NS".to_string(),
            currency_symbol: "₹".to_string(),
            report_decimals: 2,
            cache_ttl_secs: 300,
            http_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Unset or unparsable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let default_period = match get("DEFAULT_PERIOD") {
            Some(raw) => raw.parse::<LookbackPeriod>().unwrap_or_else(|_| {
                warn!("Unknown DEFAULT_PERIOD {:?}, using {}", raw, defaults.default_period);
                defaults.default_period
            }),
            None => defaults.default_period,
        };

        Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_var(get("PORT")).unwrap_or(defaults.port),
            yahoo_base_url: get("YAHOO_BASE_URL").unwrap_or(defaults.yahoo_base_url),
            default_period,
            ticker_suffix: get("TICKER_SUFFIX").unwrap_or(defaults.ticker_suffix),
            currency_symbol: get("CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),
            report_decimals: parse_var(get("REPORT_DECIMALS"))
                .map_or(defaults.report_decimals, |d: usize| d.min(8)),
            cache_ttl_secs: parse_var(get("CACHE_TTL_SECS")).unwrap_or(defaults.cache_ttl_secs),
            http_timeout_secs: parse_var(get("HTTP_TIMEOUT_SECS"))
                .unwrap_or(defaults.http_timeout_secs),
        }
    }

    pub fn narrative_format(&self) -> NarrativeFormat {
        NarrativeFormat::new(self.currency_symbol.clone(), self.report_decimals)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
