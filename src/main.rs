mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::LaptopTrendsApp;
use clap::Parser;
use eframe::egui;

use laptop_trends::config::{LoaderConfig, DEFAULT_IMAGE_BASE_URL, ENV_DATA_PATH, ENV_IMAGE_BASE};
use state::AppState;

/// Laptop catalog dashboard.
#[derive(Debug, Parser)]
#[command(name = "laptop-trends", version, about)]
struct Cli {
    /// CSV catalog to open on start-up
    #[arg(env = ENV_DATA_PATH)]
    data: Option<PathBuf>,

    /// Base URL that bare image filenames are resolved against
    #[arg(long, env = ENV_IMAGE_BASE, default_value = DEFAULT_IMAGE_BASE_URL)]
    image_base: String,
}

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();

    let mut state = AppState::new(LoaderConfig::with_image_base(cli.image_base));
    if let Some(path) = &cli.data {
        state.open(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Laptop Trends",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can fetch and render thumbnails.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(LaptopTrendsApp::new(state)))
        }),
    )
}
