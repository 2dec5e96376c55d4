//! Viewer inputs and the data derived from them, independent of any window.

use crate::models::{compute_plot_data, AxisData, ChainFilter, Metric, OptionType, OptionsData};
use crate::ui::worker::FetchRequest;
use crate::utils::round_to_significant_digits;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, info, warn};

pub const START_OFFSET_DAYS: i64 = 7;
pub const END_OFFSET_DAYS: i64 = 42;
pub const LOWER_STRIKE_FACTOR: f64 = 0.75;
pub const UPPER_STRIKE_FACTOR: f64 = 1.25;
/// Significant digits of the price handed to the 3D view.
pub const DISPLAY_PRICE_DIGITS: i32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Idle,
    LoadingQuote,
    LoadingChain,
    Ready { rows: usize },
    Error(String),
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Idle => write!(f, "Select a symbol"),
            Status::LoadingQuote => write!(f, "Loading quote..."),
            Status::LoadingChain => write!(f, "Loading option chain..."),
            Status::Ready { rows } => write!(f, "{} contracts plotted", rows),
            Status::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewerState {
    pub symbol: String,
    pub current_price: Option<f64>,
    pub option_type: OptionType,
    pub metric: Metric,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub from_strike: Option<f64>,
    pub to_strike: Option<f64>,
    pub options_data: Option<OptionsData>,
    pub plot_data: Option<AxisData>,
    pub status: Status,
    generation: u64,
}

impl ViewerState {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            current_price: None,
            option_type: OptionType::Put,
            metric: Metric::ExtrinsicValue,
            start_date: None,
            end_date: None,
            from_strike: None,
            to_strike: None,
            options_data: None,
            plot_data: None,
            status: Status::Idle,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, Status::LoadingQuote | Status::LoadingChain)
    }

    /// Switch to `symbol` and return the quote request for it. Clears the
    /// price and every response still in flight for the previous symbol.
    pub fn select_symbol(&mut self, symbol: &str) -> FetchRequest {
        self.symbol = symbol.trim().to_uppercase();
        self.current_price = None;
        self.options_data = None;
        self.plot_data = None;
        self.generation += 1;
        self.status = Status::LoadingQuote;
        info!("Selected symbol {}", self.symbol);

        FetchRequest::Quote {
            symbol: self.symbol.clone(),
            generation: self.generation,
        }
    }

    fn is_current(&self, symbol: &str, generation: u64) -> bool {
        symbol == self.symbol && generation == self.generation
    }

    /// Apply a quote response. On a fresh price, resets the filter defaults
    /// around it and returns the chain request.
    pub fn on_quote(
        &mut self,
        symbol: &str,
        generation: u64,
        price: Option<f64>,
        today: NaiveDate,
    ) -> Option<FetchRequest> {
        if !self.is_current(symbol, generation) {
            debug!("Dropping stale quote for {} (generation {})", symbol, generation);
            return None;
        }

        let Some(price) = price else {
            warn!("No quote available for {}", symbol);
            self.status = Status::Error(format!("No quote available for {}", symbol));
            return None;
        };

        self.current_price = Some(price);
        self.apply_defaults(price, today);
        self.status = Status::LoadingChain;

        Some(FetchRequest::Chain {
            symbol: self.symbol.clone(),
            current_price: price,
            generation: self.generation,
        })
    }

    fn apply_defaults(&mut self, price: f64, today: NaiveDate) {
        self.start_date = Some(today + Duration::days(START_OFFSET_DAYS));
        self.end_date = Some(today + Duration::days(END_OFFSET_DAYS));
        self.from_strike = Some((price * LOWER_STRIKE_FACTOR).round());
        self.to_strike = Some((price * UPPER_STRIKE_FACTOR).round());
    }

    /// Apply a chain response and recompute the plot. Returns whether it was applied.
    pub fn on_chain(
        &mut self,
        symbol: &str,
        generation: u64,
        data: Option<OptionsData>,
        now: DateTime<Utc>,
    ) -> bool {
        if !self.is_current(symbol, generation) {
            debug!("Dropping stale chain for {} (generation {})", symbol, generation);
            return false;
        }

        match data {
            Some(data) => {
                self.options_data = Some(data);
                self.recompute(now);
            }
            None => {
                self.status = Status::Error(format!("Option chain unavailable for {}", symbol));
            }
        }
        true
    }

    /// The active filter, once a price has set its defaults.
    pub fn filter(&self) -> Option<ChainFilter> {
        Some(ChainFilter {
            option_type: self.option_type,
            start_date: self.start_date?,
            end_date: self.end_date?,
            from_strike: self.from_strike?,
            to_strike: self.to_strike?,
        })
    }

    /// Re-derive the plot from the raw chain and the current inputs.
    pub fn recompute(&mut self, now: DateTime<Utc>) {
        let (Some(data), Some(filter)) = (&self.options_data, self.filter()) else {
            return;
        };
        let plot = compute_plot_data(data, &filter, self.metric, now);
        self.status = Status::Ready { rows: plot.len() };
        self.plot_data = Some(plot);
    }

    /// Price handed to the 3D view.
    pub fn display_price(&self) -> Option<f64> {
        self.current_price
            .map(|price| round_to_significant_digits(price, DISPLAY_PRICE_DIGITS))
    }
}
