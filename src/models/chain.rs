//! Option chains keyed by expiration and strike, and their flattening into plot axes.

use crate::models::axis::AxisData;
use crate::models::option::{Metric, OptionType, OptionsMetrics};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Strike price (as formatted upstream) to metrics.
pub type StrikePriceMap = BTreeMap<String, OptionsMetrics>;

/// Expiration date string (`YYYY-MM-DD`) to the strikes listed for it.
pub type ExpiryMap = BTreeMap<String, StrikePriceMap>;

pub const DAYS_AXIS_NAME: &str = "Days Til Expiration";
pub const STRIKE_AXIS_NAME: &str = "Strike Price";

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// One contract as reported by the chain provider, before grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainRow {
    pub option_type: OptionType,
    pub expiration: String,
    pub strike: f64,
    pub mark: f64,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

/// Full chain for one symbol, split by side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsData {
    pub current_price: f64,
    pub call_options: ExpiryMap,
    pub put_options: ExpiryMap,
}

impl OptionsData {
    /// Group provider rows into per-side expiry maps, deriving intrinsic and
    /// extrinsic value against `current_price`.
    pub fn from_rows<I>(current_price: f64, rows: I) -> Self
    where
        I: IntoIterator<Item = ChainRow>,
    {
        let mut data = OptionsData {
            current_price,
            ..Default::default()
        };

        for row in rows {
            let intrinsic_value = row.option_type.intrinsic_value(current_price, row.strike);
            let metrics = OptionsMetrics {
                intrinsic_value,
                extrinsic_value: row.mark - intrinsic_value,
                mark_price: row.mark,
                delta: row.delta,
                gamma: row.gamma,
                theta: row.theta,
                vega: row.vega,
                rho: row.rho,
            };

            data.side_mut(row.option_type)
                .entry(row.expiration)
                .or_default()
                .insert(format!("{:.2}", row.strike), metrics);
        }

        data
    }

    pub fn side(&self, option_type: OptionType) -> &ExpiryMap {
        match option_type {
            OptionType::Call => &self.call_options,
            OptionType::Put => &self.put_options,
        }
    }

    fn side_mut(&mut self, option_type: OptionType) -> &mut ExpiryMap {
        match option_type {
            OptionType::Call => &mut self.call_options,
            OptionType::Put => &mut self.put_options,
        }
    }

    pub fn contract_count(&self) -> usize {
        self.call_options
            .values()
            .chain(self.put_options.values())
            .map(|strikes| strikes.len())
            .sum()
    }
}

/// Selection applied to a chain before it is plotted. All bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainFilter {
    pub option_type: OptionType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub from_strike: f64,
    pub to_strike: f64,
}

impl ChainFilter {
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// NaN strikes never match.
    pub fn contains_strike(&self, strike: f64) -> bool {
        strike >= self.from_strike && strike <= self.to_strike
    }
}

/// Parse an expiration key. Date-only keys resolve to midnight UTC.
pub fn parse_expiry(key: &str) -> Option<DateTime<Utc>> {
    let key = key.trim();
    if let Ok(date) = NaiveDate::parse_from_str(key, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
    }
    DateTime::parse_from_rfc3339(key)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a strike key; malformed keys yield NaN so range checks reject them.
pub fn parse_strike(key: &str) -> f64 {
    key.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Whole days from `now` until `expiry`, rounded up. Negative for past expirations.
pub fn days_until_expiration(expiry: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (expiry - now).num_milliseconds() as f64;
    (millis / MILLIS_PER_DAY).ceil()
}

/// Restrict one side of the chain to the filter's date window and strike range.
pub fn filter_chain(data: &OptionsData, filter: &ChainFilter) -> ExpiryMap {
    let mut filtered = ExpiryMap::new();

    for (expiry, strikes) in data.side(filter.option_type) {
        let Some(expiry_date) = parse_expiry(expiry) else {
            trace!("Skipping unparseable expiration '{}'", expiry);
            continue;
        };
        if !filter.contains_date(expiry_date.date_naive()) {
            continue;
        }

        for (strike, metrics) in strikes {
            if filter.contains_strike(parse_strike(strike)) {
                filtered
                    .entry(expiry.clone())
                    .or_default()
                    .insert(strike.clone(), *metrics);
            }
        }
    }

    filtered
}

/// Flatten a (filtered) chain into plot axes: expirations ascending by date,
/// strikes ascending by value within each expiration.
pub fn flatten_chain(chain: &ExpiryMap, metric: Metric, now: DateTime<Utc>) -> AxisData {
    let mut output = AxisData::new(DAYS_AXIS_NAME, STRIKE_AXIS_NAME, metric.field_name());

    let mut expiries: Vec<(DateTime<Utc>, &StrikePriceMap)> = chain
        .iter()
        .filter_map(|(key, strikes)| match parse_expiry(key) {
            Some(expiry) => Some((expiry, strikes)),
            None => {
                trace!("Skipping unparseable expiration '{}'", key);
                None
            }
        })
        .collect();
    expiries.sort_by_key(|(expiry, _)| *expiry);

    for (expiry, strikes) in expiries {
        let days = days_until_expiration(expiry, now);

        let mut sorted: Vec<(f64, &OptionsMetrics)> = strikes
            .iter()
            .map(|(strike, metrics)| (parse_strike(strike), metrics))
            .collect();
        sorted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        for (strike, metrics) in sorted {
            output.push(days, strike, metrics.get(metric));
        }
    }

    output
}

/// Filter then flatten; the single entry point the view calls on any input change.
pub fn compute_plot_data(
    data: &OptionsData,
    filter: &ChainFilter,
    metric: Metric,
    now: DateTime<Utc>,
) -> AxisData {
    let filtered = filter_chain(data, filter);
    let plot = flatten_chain(&filtered, metric, now);
    debug!(
        "Computed {} plot rows ({} side, {}..={}, strikes {}..={}, metric {})",
        plot.len(),
        filter.option_type,
        filter.start_date,
        filter.end_date,
        filter.from_strike,
        filter.to_strike,
        metric
    );
    plot
}
