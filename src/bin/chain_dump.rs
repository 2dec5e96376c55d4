//! Print the plot axes the viewer would draw for a symbol, as JSON.
//!
//! Usage: `chain_dump <SYMBOL> [metric] [call|put]`

use chrono::Utc;
use options_surface::api::RestClient;
use options_surface::config::Config;
use options_surface::error::{OptionsError, Result};
use options_surface::models::{Metric, OptionType};
use options_surface::ui::{FetchRequest, ViewerState};
use std::io::Write;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    config.init_logging()?;

    let args: Vec<String> = std::env::args().collect();
    let symbol = args.get(1).cloned().unwrap_or_else(|| config.default_symbol.clone());
    let metric = match args.get(2) {
        Some(raw) => raw.parse::<Metric>()?,
        None => Metric::ExtrinsicValue,
    };
    let option_type = match args.get(3) {
        Some(raw) => raw.parse::<OptionType>()?,
        None => OptionType::Put,
    };

    let client = RestClient::new(config.alpha_vantage.clone());
    let mut state = ViewerState::new(&symbol);
    state.metric = metric;
    state.option_type = option_type;

    let generation = match state.select_symbol(&symbol) {
        FetchRequest::Quote { generation, .. } => generation,
        other => return Err(OptionsError::Other(format!("unexpected request {:?}", other))),
    };

    let price = client.get_quote(&state.symbol).await?;
    let today = Utc::now().date_naive();
    let Some(FetchRequest::Chain { current_price, .. }) =
        state.on_quote(&state.symbol.clone(), generation, price, today)
    else {
        return Err(OptionsError::UpstreamFetch(format!("no quote for {}", state.symbol)));
    };
    info!("{} last {}", state.symbol, current_price);

    let data = client.get_option_chain(&state.symbol, current_price).await?;
    state.on_chain(&state.symbol.clone(), generation, Some(data), Utc::now());

    let plot = state
        .plot_data
        .as_ref()
        .ok_or_else(|| OptionsError::Other("nothing to plot".to_string()))?;
    info!("{}", state.status);
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, plot)?;
    writeln!(out)?;

    Ok(())
}
