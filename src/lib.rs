//! # options-surface
//!
//! Interactive 3D scatter view of an option chain: days to expiration on x,
//! strike on y and a selectable per-contract metric on z, with translucent
//! volumes marking the strikes above and below the current price.
//!
//! ## Features
//!
//! - Alpha Vantage client for quotes, historical option chains and symbol search
//! - Chain filtering by side, expiration window and strike range
//! - Normalization into a fixed cube with hue-mapped point colors
//! - Orbit/pan/zoom camera, hover tooltips and DPI-aware text labels
//! - Environment-based configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::{NaiveDate, Utc};
//! use options_surface::api::RestClient;
//! use options_surface::config::Config;
//! use options_surface::models::{compute_plot_data, ChainFilter, Metric, OptionType};
//! use options_surface::viz::PlotScene;
//!
//! #[tokio::main]
//! async fn main() -> options_surface::error::Result<()> {
//!     let config = Config::from_env()?;
//!     config.init_logging()?;
//!
//!     let client = RestClient::new(config.alpha_vantage.clone());
//!     let price = client.get_quote("NVDA").await?.unwrap_or(100.0);
//!     let chain = client.get_option_chain("NVDA", price).await?;
//!
//!     let filter = ChainFilter {
//!         option_type: OptionType::Put,
//!         start_date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
//!         end_date: NaiveDate::from_ymd_opt(2024, 2, 12).unwrap(),
//!         from_strike: (price * 0.75).round(),
//!         to_strike: (price * 1.25).round(),
//!     };
//!     let plot = compute_plot_data(&chain, &filter, Metric::ExtrinsicValue, Utc::now());
//!
//!     let scene = PlotScene::build(&plot, OptionType::Put, price);
//!     println!("{} points", scene.points.len());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod ui;
pub mod utils;
pub mod viz;

// Re-export commonly used types
pub use api::RestClient;
pub use config::Config;
pub use error::{OptionsError, Result};
