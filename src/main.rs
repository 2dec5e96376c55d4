use eframe::egui;
use options_surface::api::RestClient;
use options_surface::config::Config;
use options_surface::error::{OptionsError, Result};
use options_surface::ui::{spawn_fetch_worker, FetchEvent, FetchRequest, SurfaceApp};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    config.init_logging()?;

    let (request_sender, request_receiver) = mpsc::channel::<FetchRequest>(16);
    let (event_sender, event_receiver) = mpsc::channel::<FetchEvent>(16);

    let client = RestClient::new(config.alpha_vantage.clone());
    let _worker = spawn_fetch_worker(client, request_receiver, event_sender);

    let symbol = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.default_symbol.clone());
    info!("Starting viewer for {}", symbol);
    let app = SurfaceApp::new(&symbol, request_sender, event_receiver);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Options Surface"),
        ..Default::default()
    };

    eframe::run_native(
        "Options Surface",
        native_options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| {
        let err_msg = format!("Failed to start GUI: {}", e);
        warn!("{}", err_msg);
        OptionsError::Other(err_msg)
    })?;

    info!("shutting down");
    Ok(())
}
