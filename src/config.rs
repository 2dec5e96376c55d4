use crate::error::{OptionsError, Result};
use dotenv::dotenv;
use serde::Deserialize;
use std::env;

/// Configuration for the Alpha Vantage market-data API
#[derive(Debug, Clone, Deserialize)]
pub struct AlphaVantageConfig {
    /// Alpha Vantage API key
    pub api_key: String,
    /// Alpha Vantage API base URL
    pub base_url: String,
    /// Client-side request quota
    pub requests_per_minute: u32,
}

/// Configuration for the application
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Alpha Vantage API configuration
    pub alpha_vantage: AlphaVantageConfig,
    /// Symbol shown when the viewer starts
    pub default_symbol: String,
    /// Log level
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let default_base_url = "https://www.alphavantage.co".to_string();
        let default_log_level = "info".to_string();
        let default_symbol = "NVDA".to_string();
        let default_requests_per_minute = 5;

        let api_key = env::var("ALPHAVANTAGE_API_KEY").map_err(|_| {
            OptionsError::ConfigError(
                "ALPHAVANTAGE_API_KEY environment variable not set".to_string(),
            )
        })?;

        let base_url = env::var("ALPHAVANTAGE_BASE_URL").unwrap_or(default_base_url);
        let requests_per_minute = match env::var("ALPHAVANTAGE_REQUESTS_PER_MINUTE") {
            Ok(raw) => parse_requests_per_minute(&raw)?,
            Err(_) => default_requests_per_minute,
        };
        let default_symbol = env::var("DEFAULT_SYMBOL")
            .map(|s| s.trim().to_uppercase())
            .unwrap_or(default_symbol);
        let log_level = env::var("LOG_LEVEL").unwrap_or(default_log_level);

        Ok(Config {
            alpha_vantage: AlphaVantageConfig {
                api_key,
                base_url,
                requests_per_minute,
            },
            default_symbol,
            log_level,
        })
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self) -> Result<()> {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.log_level));

        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .map_err(|e| OptionsError::ConfigError(format!("Failed to init logging: {}", e)))?;

        Ok(())
    }
}

fn parse_requests_per_minute(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(OptionsError::ConfigError(format!(
            "ALPHAVANTAGE_REQUESTS_PER_MINUTE must be a positive integer, got '{}'",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_per_minute_must_be_positive() {
        assert_eq!(parse_requests_per_minute(" 75 ").unwrap(), 75);
        assert!(parse_requests_per_minute("0").is_err());
        assert!(parse_requests_per_minute("fast").is_err());
    }
}
