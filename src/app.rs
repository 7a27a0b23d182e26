// src/app.rs
use std::sync::Arc;

use anyhow::Result;
use eframe::egui;
use log::{debug, info};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::Backend;
use crate::config::{DashboardSettings, SectorCatalog};
use crate::file::FileManager;
use crate::state::orchestrator::run;
use crate::state::{AppState, Completion, Pending};
use crate::ui::UiAction;

/// Sector mapping from the configured file, or the one compiled into the binary.
pub fn load_sector_catalog(files: &FileManager, settings: &DashboardSettings) -> Result<SectorCatalog> {
    match &settings.sector_config_path {
        Some(path) => {
            info!("Loading sector configuration from {}", path.display());
            files.load_sector_catalog(path)
        }
        None => SectorCatalog::embedded(),
    }
}

pub struct DashboardApp {
    state: AppState,
    runtime: Runtime,
    backend: Arc<dyn Backend>,
    completions_tx: UnboundedSender<Completion>,
    completions_rx: UnboundedReceiver<Completion>,
}

impl DashboardApp {
    pub fn new(state: AppState, runtime: Runtime, backend: Arc<dyn Backend>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            state,
            runtime,
            backend,
            completions_tx,
            completions_rx,
        }
    }

    /// Run the request on the runtime; its completion comes back through the channel.
    fn spawn(&self, ctx: &egui::Context, pending: Pending) {
        let backend = Arc::clone(&self.backend);
        let tx = self.completions_tx.clone();
        let ctx = ctx.clone();
        debug!("Dispatching {} to {}", pending.ticket.operation.label(), pending.request.path());

        self.runtime.spawn(async move {
            let completion = run(backend.as_ref(), pending).await;
            if tx.send(completion).is_err() {
                debug!("Dashboard closed before a request finished");
            }
            ctx.request_repaint();
        });
    }

    fn drain_completions(&mut self) {
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.state.complete(completion);
        }
    }

    fn apply(&mut self, ctx: &egui::Context, action: UiAction) {
        let pending = match action {
            UiAction::Submit => self.state.begin_submission(),
            UiAction::SetMode(mode) => {
                self.state.set_mode(mode);
                None
            }
            UiAction::Drilldown(card) => self.state.begin_drilldown(card),
            UiAction::UpdateApiKeys => self.state.begin_api_key_update(),
            UiAction::ClearLogs => {
                self.state.clear_logs();
                None
            }
        };
        if let Some(pending) = pending {
            self.spawn(ctx, pending);
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_completions();

        let mut actions = Vec::new();

        egui::SidePanel::left("form_panel")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    crate::ui::form::draw_form_panel(ui, &mut self.state, &mut actions);
                });
            });

        egui::TopBottomPanel::bottom("log_panel")
            .resizable(true)
            .default_height(200.0)
            .show(ctx, |ui| {
                crate::ui::logs::draw_log_panel(ui, &mut self.state.logs, &mut actions);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            crate::ui::logs::draw_error_panel(ui, &self.state.errors);
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    crate::ui::results::draw_results(ui, &mut self.state, &mut actions);
                });
        });

        crate::ui::api_keys::draw_api_key_dialog(ctx, &mut self.state, &mut actions);

        for action in actions {
            self.apply(ctx, action);
        }
    }
}
