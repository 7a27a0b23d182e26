// src/main.rs
use std::sync::Arc;

use anyhow::{Context, Result};
use eframe::egui;
use log::{info, warn};

mod api;
mod app;
mod config;
mod file;
mod render;
mod state;
mod ui;

use api::HttpBackend;
use app::DashboardApp;
use config::DashboardSettings;
use file::FileManager;
use state::AppState;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let files = FileManager::new();
    let settings = files.load_settings().unwrap_or_else(|e| {
        warn!("Using default settings: {:#}", e);
        DashboardSettings::default()
    });
    let catalog = app::load_sector_catalog(&files, &settings);
    let backend = HttpBackend::new(&settings).context("Failed to create backend client")?;
    info!("Backend at {}", backend.base_url());
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let state = AppState::new(settings, catalog);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_title("Sentiment Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Sentiment Dashboard",
        options,
        Box::new(move |_cc| Box::new(DashboardApp::new(state, runtime, Arc::new(backend)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))
}
