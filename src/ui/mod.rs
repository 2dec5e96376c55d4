//! Desktop viewer: symbol, side, metric, date and strike controls next to the 3D view.

mod state;
mod worker;

pub use state::{Status, ViewerState};
pub use worker::{spawn_fetch_worker, FetchEvent, FetchRequest};

use crate::api::SymbolMatch;
use crate::models::{Metric, OptionType};
use crate::viz::ViewSession;
use chrono::{NaiveDate, Utc};
use eframe::egui;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SurfaceApp {
    state: ViewerState,
    session: Option<ViewSession>,
    requests: mpsc::Sender<FetchRequest>,
    events: mpsc::Receiver<FetchEvent>,
    symbol_input: String,
    search_results: Vec<SymbolMatch>,
    start_input: String,
    end_input: String,
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
}

impl SurfaceApp {
    pub fn new(
        default_symbol: &str,
        requests: mpsc::Sender<FetchRequest>,
        events: mpsc::Receiver<FetchEvent>,
    ) -> Self {
        let mut app = Self {
            state: ViewerState::new(default_symbol),
            session: None,
            requests,
            events,
            symbol_input: default_symbol.to_string(),
            search_results: Vec::new(),
            start_input: String::new(),
            end_input: String::new(),
        };
        let request = app.state.select_symbol(default_symbol);
        app.send(request);
        app
    }

    fn send(&mut self, request: FetchRequest) {
        if let Err(e) = self.requests.try_send(request) {
            warn!("Failed to queue fetch request: {}", e);
            self.state.status = Status::Error(format!("Fetch queue unavailable: {}", e));
        }
    }

    fn select_symbol(&mut self, symbol: &str) {
        if symbol.trim().is_empty() {
            return;
        }
        let request = self.state.select_symbol(symbol);
        self.symbol_input = self.state.symbol.clone();
        self.search_results.clear();
        self.send(request);
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                FetchEvent::Quote {
                    symbol,
                    generation,
                    price,
                } => {
                    let today = Utc::now().date_naive();
                    if let Some(request) = self.state.on_quote(&symbol, generation, price, today) {
                        self.start_input = format_date(self.state.start_date);
                        self.end_input = format_date(self.state.end_date);
                        self.send(request);
                    }
                }
                FetchEvent::Chain {
                    symbol,
                    generation,
                    data,
                } => {
                    self.state.on_chain(&symbol, generation, data, Utc::now());
                }
                FetchEvent::Search { keywords, matches } => {
                    if keywords.trim() == self.symbol_input.trim() {
                        self.search_results = matches;
                    }
                }
            }
        }
    }

    /// Returns whether any plot input changed.
    fn controls(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;

        ui.label("Symbol");
        let mut chosen: Option<String> = None;
        ui.horizontal(|ui| {
            let edit = ui.text_edit_singleline(&mut self.symbol_input);
            if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                chosen = Some(self.symbol_input.clone());
            }
            if ui.button("Search").clicked() {
                let keywords = self.symbol_input.trim().to_string();
                self.send(FetchRequest::Search { keywords });
            }
        });
        for result in &self.search_results {
            if ui.selectable_label(false, result.label()).clicked() {
                chosen = Some(result.symbol.clone());
            }
        }
        if let Some(symbol) = chosen {
            self.select_symbol(&symbol);
        }

        ui.separator();
        ui.horizontal(|ui| {
            changed |= ui.radio_value(&mut self.state.option_type, OptionType::Call, "Call").changed();
            changed |= ui.radio_value(&mut self.state.option_type, OptionType::Put, "Put").changed();
        });

        egui::ComboBox::from_id_salt("metric_select")
            .selected_text(self.state.metric.label())
            .show_ui(ui, |ui| {
                for metric in Metric::ALL {
                    changed |= ui
                        .selectable_value(&mut self.state.metric, metric, metric.label())
                        .changed();
                }
            });

        ui.separator();
        ui.label("Expiration window");
        changed |= date_input(ui, "From", &mut self.start_input, &mut self.state.start_date);
        changed |= date_input(ui, "To", &mut self.end_input, &mut self.state.end_date);

        ui.label("Strike range");
        changed |= strike_input(ui, "From", &mut self.state.from_strike);
        changed |= strike_input(ui, "To", &mut self.state.to_strike);

        ui.separator();
        if let Some(price) = self.state.current_price {
            ui.label(format!("{} last: {:.2}", self.state.symbol, price));
        }
        ui.label(self.state.status.to_string());

        changed
    }
}

/// Dates are committed only once they parse.
fn date_input(ui: &mut egui::Ui, label: &str, text: &mut String, date: &mut Option<NaiveDate>) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(label);
        if ui.text_edit_singleline(text).changed() {
            if let Ok(parsed) = NaiveDate::parse_from_str(text.trim(), DATE_FORMAT) {
                changed = *date != Some(parsed);
                *date = Some(parsed);
            }
        }
    });
    changed
}

fn strike_input(ui: &mut egui::Ui, label: &str, strike: &mut Option<f64>) -> bool {
    let Some(value) = strike.as_mut() else {
        return false;
    };
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::DragValue::new(value).speed(1.0).range(0.0..=f64::MAX))
            .changed()
    })
    .inner
}

impl eframe::App for SurfaceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        egui::SidePanel::left("controls").min_width(220.0).show(ctx, |ui| {
            ui.heading("Options Surface");
            if self.controls(ui) {
                self.state.recompute(Utc::now());
            }
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                match (&self.state.plot_data, self.state.display_price()) {
                    (Some(plot), Some(price)) => {
                        let session = self.session.get_or_insert_with(ViewSession::new);
                        session.sync(ctx, plot, self.state.option_type, price);
                        session.show(ui);
                    }
                    _ => {
                        // Unmount the view; dropping the session frees its textures
                        self.session = None;
                        ui.centered_and_justified(|ui| {
                            if self.state.is_loading() {
                                ui.spinner();
                            } else {
                                ui.label(self.state.status.to_string());
                            }
                        });
                    }
                }
            });

        if self.state.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
