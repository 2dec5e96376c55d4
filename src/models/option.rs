use crate::error::{OptionsError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Value the holder would receive from exercising right now.
    pub fn intrinsic_value(&self, underlying_price: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (underlying_price - strike).max(0.0),
            OptionType::Put => (strike - underlying_price).max(0.0),
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            other => Err(OptionsError::ParseError(format!("unknown option type '{}'", other))),
        }
    }
}

/// Per-contract values the chain fetch derives for one (expiry, strike).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsMetrics {
    pub intrinsic_value: f64,
    pub extrinsic_value: f64,
    pub mark_price: f64,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

impl OptionsMetrics {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::IntrinsicValue => self.intrinsic_value,
            Metric::ExtrinsicValue => self.extrinsic_value,
            Metric::MarkPrice => self.mark_price,
            Metric::Delta => self.delta,
            Metric::Gamma => self.gamma,
            Metric::Theta => self.theta,
            Metric::Vega => self.vega,
            Metric::Rho => self.rho,
        }
    }
}

/// The metric plotted on the z axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    IntrinsicValue,
    ExtrinsicValue,
    MarkPrice,
    Delta,
    Gamma,
    Theta,
    Vega,
    Rho,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::MarkPrice,
        Metric::IntrinsicValue,
        Metric::ExtrinsicValue,
        Metric::Delta,
        Metric::Gamma,
        Metric::Theta,
        Metric::Vega,
        Metric::Rho,
    ];

    /// Field name as it appears in the metrics record; also used as the z axis name.
    pub fn field_name(&self) -> &'static str {
        match self {
            Metric::IntrinsicValue => "intrinsicValue",
            Metric::ExtrinsicValue => "extrinsicValue",
            Metric::MarkPrice => "markPrice",
            Metric::Delta => "delta",
            Metric::Gamma => "gamma",
            Metric::Theta => "theta",
            Metric::Vega => "vega",
            Metric::Rho => "rho",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::IntrinsicValue => "Intrinsic Value",
            Metric::ExtrinsicValue => "Extrinsic Value",
            Metric::MarkPrice => "Mark Price",
            Metric::Delta => "Delta",
            Metric::Gamma => "Gamma",
            Metric::Theta => "Theta",
            Metric::Vega => "Vega",
            Metric::Rho => "Rho",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for Metric {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.field_name() == s)
            .ok_or_else(|| OptionsError::InvalidMetric(s.to_string()))
    }
}
