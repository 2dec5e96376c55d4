use crate::config::AlphaVantageConfig;
use crate::error::{OptionsError, Result};
use crate::models::{ChainRow, OptionType, OptionsData};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, trace, warn};
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One contract row of a `HISTORICAL_OPTIONS` response. Every field arrives
/// as a string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoricalOptionRow {
    #[serde(rename = "contractID", default)]
    pub contract_id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub expiration: String,
    #[serde(default)]
    pub strike: String,
    #[serde(rename = "type", default)]
    pub contract_type: String,
    #[serde(default)]
    pub mark: String,
    #[serde(default)]
    pub delta: String,
    #[serde(default)]
    pub gamma: String,
    #[serde(default)]
    pub theta: String,
    #[serde(default)]
    pub vega: String,
    #[serde(default)]
    pub rho: String,
}

#[derive(Debug, Clone, Deserialize)]
struct HistoricalOptionsResponse {
    data: Vec<HistoricalOptionRow>,
}

/// A `SYMBOL_SEARCH` match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolMatch {
    #[serde(rename = "1. symbol")]
    pub symbol: String,
    #[serde(rename = "2. name", default)]
    pub name: String,
}

impl SymbolMatch {
    pub fn label(&self) -> String {
        format!("{} - {}", self.symbol, self.name)
    }
}

/// Non-numeric values become NaN and flow through to the plot unchanged.
fn parse_loose(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(f64::NAN)
}

impl HistoricalOptionRow {
    /// `None` for contract types other than call and put.
    pub fn to_chain_row(&self) -> Option<ChainRow> {
        let option_type = OptionType::from_str(&self.contract_type).ok()?;
        Some(ChainRow {
            option_type,
            expiration: self.expiration.clone(),
            strike: parse_loose(&self.strike),
            mark: parse_loose(&self.mark),
            delta: parse_loose(&self.delta),
            gamma: parse_loose(&self.gamma),
            theta: parse_loose(&self.theta),
            vega: parse_loose(&self.vega),
            rho: parse_loose(&self.rho),
        })
    }
}

/// Alpha Vantage answers throttled or invalid calls with HTTP 200 and a
/// message under one of these keys.
fn upstream_message(body: &Value) -> Option<&str> {
    ["Information", "Note", "Error Message"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
}

/// `"Global Quote"."05. price"` as a number.
pub fn parse_global_quote(body: &Value) -> Option<f64> {
    let raw = body.get("Global Quote")?.get("05. price")?.as_str()?;
    raw.trim().parse::<f64>().ok()
}

pub fn parse_historical_options(body: &Value) -> Result<Vec<ChainRow>> {
    if body.get("data").is_none() {
        let message = upstream_message(body).unwrap_or("response has no 'data' field");
        return Err(OptionsError::UpstreamFetch(message.to_string()));
    }

    let response: HistoricalOptionsResponse = serde_json::from_value(body.clone())
        .map_err(|e| OptionsError::ParseError(format!("Failed to parse options chain: {}", e)))?;

    let rows: Vec<ChainRow> = response
        .data
        .iter()
        .filter_map(|row| {
            let parsed = row.to_chain_row();
            if parsed.is_none() {
                trace!("Ignoring contract {} of type '{}'", row.contract_id, row.contract_type);
            }
            parsed
        })
        .collect();
    Ok(rows)
}

pub fn parse_symbol_search(body: &Value) -> Result<Vec<SymbolMatch>> {
    match body.get("bestMatches") {
        Some(matches) => serde_json::from_value(matches.clone())
            .map_err(|e| OptionsError::ParseError(format!("Failed to parse symbol matches: {}", e))),
        None => {
            let message = upstream_message(body).unwrap_or("response has no 'bestMatches' field");
            Err(OptionsError::UpstreamFetch(message.to_string()))
        }
    }
}

pub struct RestClient {
    client: reqwest::Client,
    config: AlphaVantageConfig,
    limiter: DefaultDirectRateLimiter,
}

impl RestClient {
    pub fn new(config: AlphaVantageConfig) -> Self {
        let per_minute = NonZeroU32::new(config.requests_per_minute).unwrap_or(nonzero!(5u32));
        Self {
            client: reqwest::Client::new(),
            limiter: RateLimiter::direct(Quota::per_minute(per_minute)),
            config,
        }
    }

    /// `{base_url}/query` with the given parameters and the API key.
    pub fn query_url(&self, params: &[(&str, &str)]) -> Result<Url> {
        let base = format!("{}/query", self.config.base_url.trim_end_matches('/'));
        let pairs = params
            .iter()
            .copied()
            .chain(std::iter::once(("apikey", self.config.api_key.as_str())));
        Url::parse_with_params(&base, pairs)
            .map_err(|e| OptionsError::ConfigError(format!("Invalid base URL '{}': {}", base, e)))
    }

    async fn get_json(&self, params: &[(&str, &str)]) -> Result<Value> {
        let url = self.query_url(params)?;
        self.limiter.until_ready().await;

        let resp = self
            .client
            .get(url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| OptionsError::UpstreamFetch(format!("Request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(OptionsError::UpstreamFetch(format!("HTTP {}", status)));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| OptionsError::ParseError(format!("Failed to decode response body: {}", e)))
    }

    /// Latest traded price, or `None` when the quote is missing or unparseable.
    pub async fn get_quote(&self, symbol: &str) -> Result<Option<f64>> {
        debug!("Getting quote for {}", symbol);
        let body = self.get_json(&[("function", "GLOBAL_QUOTE"), ("symbol", symbol)]).await?;
        let price = parse_global_quote(&body);
        if price.is_none() {
            warn!(
                "No price in quote for {}: {}",
                symbol,
                upstream_message(&body).unwrap_or("missing 'Global Quote'")
            );
        }
        Ok(price)
    }

    /// Full chain for `symbol`, with intrinsic and extrinsic value taken
    /// against `current_price`.
    pub async fn get_option_chain(&self, symbol: &str, current_price: f64) -> Result<OptionsData> {
        info!("Getting option chain for {}", symbol);
        let body = self
            .get_json(&[("function", "HISTORICAL_OPTIONS"), ("symbol", symbol)])
            .await?;
        let rows = parse_historical_options(&body)?;
        let data = OptionsData::from_rows(current_price, rows);
        info!("Got {} contracts for {}", data.contract_count(), symbol);
        Ok(data)
    }

    pub async fn search_symbols(&self, keywords: &str) -> Result<Vec<SymbolMatch>> {
        if keywords.trim().is_empty() {
            return Ok(Vec::new());
        }
        debug!("Searching symbols for '{}'", keywords);
        let body = self
            .get_json(&[("function", "SYMBOL_SEARCH"), ("keywords", keywords.trim())])
            .await?;
        parse_symbol_search(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> RestClient {
        RestClient::new(AlphaVantageConfig {
            api_key: "demo".to_string(),
            base_url: "https://www.alphavantage.co/".to_string(),
            requests_per_minute: 5,
        })
    }

    #[test]
    fn query_url_carries_function_and_key() {
        let url = client()
            .query_url(&[("function", "GLOBAL_QUOTE"), ("symbol", "BRK.B")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.alphavantage.co/query?function=GLOBAL_QUOTE&symbol=BRK.B&apikey=demo"
        );
    }

    #[test]
    fn global_quote_price() {
        let body = json!({"Global Quote": {"01. symbol": "NVDA", "05. price": "131.2600"}});
        assert_eq!(parse_global_quote(&body), Some(131.26));
        assert_eq!(parse_global_quote(&json!({"Global Quote": {}})), None);
        assert_eq!(parse_global_quote(&json!({"Global Quote": {"05. price": "n/a"}})), None);
    }

    #[test]
    fn historical_rows_skip_unknown_types() {
        let body = json!({
            "endpoint": "Historical Options",
            "data": [
                {"contractID": "A", "expiration": "2024-02-01", "strike": "100.00", "type": "put",
                 "mark": "2.50", "delta": "-0.41", "gamma": "0.03", "theta": "-0.05", "vega": "0.11", "rho": "-0.02"},
                {"contractID": "B", "expiration": "2024-02-01", "strike": "100.00", "type": "warrant", "mark": "1"},
                {"contractID": "C", "expiration": "2024-02-01", "strike": "105", "type": "call", "mark": "-"}
            ]
        });
        let rows = parse_historical_options(&body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].option_type, OptionType::Put);
        assert_eq!(rows[0].strike, 100.0);
        assert_eq!(rows[0].delta, -0.41);
        assert_eq!(rows[1].option_type, OptionType::Call);
        assert!(rows[1].mark.is_nan());
        assert!(rows[1].rho.is_nan());
    }

    #[test]
    fn throttled_chain_reports_upstream_message() {
        let body = json!({"Information": "rate limit reached"});
        match parse_historical_options(&body) {
            Err(OptionsError::UpstreamFetch(msg)) => assert_eq!(msg, "rate limit reached"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn symbol_search_matches() {
        let body = json!({"bestMatches": [{"1. symbol": "NVDA", "2. name": "NVIDIA Corp", "3. type": "Equity"}]});
        let matches = parse_symbol_search(&body).unwrap();
        assert_eq!(matches[0].label(), "NVDA - NVIDIA Corp");
        assert!(parse_symbol_search(&json!({"Note": "slow down"})).is_err());
    }
}
