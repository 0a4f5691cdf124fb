mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::MarketDashApp;
use clap::Parser;
use eframe::egui;
use state::{AppState, Tab};

/// Product-level market dashboard.
#[derive(Debug, Parser)]
#[command(name = "market-dash", version, about)]
struct Cli {
    /// Chart data file (.csv, .json or .parquet).
    #[arg(default_value = config::DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Start with the known-vendor filter enabled.
    #[arg(long)]
    only_known_vendors: bool,

    /// Product to select at startup; opens the Time Series tab.
    #[arg(long)]
    upc: Option<String>,
}

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();

    let mut state = AppState::default();
    if cli.data.exists() {
        state.load_path(&cli.data);
    } else {
        log::warn!(
            "{} not found; use File → Open… to load chart data",
            cli.data.display()
        );
    }
    state.set_only_known_vendors(cli.only_known_vendors);
    if let Some(upc) = &cli.upc {
        state.select_upc(upc);
        state.active_tab = Tab::TimeSeries;
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config::WINDOW_TITLE)
            .with_inner_size(config::WINDOW_SIZE)
            .with_min_inner_size(config::WINDOW_MIN_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        config::WINDOW_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(MarketDashApp::new(state)))),
    )
}
