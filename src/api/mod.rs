//! Alpha Vantage client
//!
//! Quote, option chain and symbol search requests against the Alpha Vantage REST API.

mod rest;

pub use rest::{
    parse_global_quote, parse_historical_options, parse_symbol_search, HistoricalOptionRow,
    RestClient, SymbolMatch,
};
