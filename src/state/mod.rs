// src/state/mod.rs
use anyhow::Result;

use crate::config::{DashboardSettings, SectorCatalog};
use crate::render::{AdhocView, LiveChart, SectorCard};

pub mod chart_registry;
pub mod error_panel;
pub mod form;
pub mod log_buffer;
pub mod orchestrator;

use chart_registry::ChartRegistry;
use error_panel::ErrorPanel;
use form::{ApiKeyInputs, FormState};
use log_buffer::LogBuffer;

pub use orchestrator::{Completion, Pending};

pub const IDLE_SUMMARY: &str = "Configure and run an operation.";

// What the results area currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    Empty,
    Sectors(Vec<SectorCard>),
    Adhoc(AdhocView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub text: String,
    pub is_error: bool,
}

impl Summary {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true }
    }
}

// Top-level submission state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
}

/// All mutable dashboard state. Owned by the UI thread; renderers and the
/// orchestrator receive it by reference.
#[derive(Debug)]
pub struct AppState {
    pub settings: DashboardSettings,
    pub catalog: SectorCatalog,

    // Inputs
    pub form: FormState,
    pub api_keys: ApiKeyInputs,
    pub show_api_keys: bool,

    // Panels
    pub logs: LogBuffer,
    pub errors: ErrorPanel,
    pub charts: ChartRegistry<LiveChart>,
    pub results: ResultsView,
    pub summary: Summary,

    pub phase: Phase,
    generation: u64,
    in_flight: usize,
}

impl AppState {
    pub fn new(settings: DashboardSettings, catalog: Result<SectorCatalog>) -> Self {
        let mut logs = LogBuffer::new();
        let catalog = match catalog {
            Ok(catalog) => catalog,
            Err(e) => {
                logs.warning(format!("{:#}. Sector selection will be empty.", e));
                SectorCatalog::default()
            }
        };

        let mut state = Self {
            form: FormState::new(&settings),
            settings,
            catalog,
            api_keys: ApiKeyInputs::default(),
            show_api_keys: false,
            logs,
            errors: ErrorPanel::new(),
            charts: ChartRegistry::new(),
            results: ResultsView::Empty,
            summary: Summary::info(IDLE_SUMMARY),
            phase: Phase::Idle,
            generation: 0,
            in_flight: 0,
        };
        state.logs.info("Frontend initialized. Ready.");
        state
    }

    /// Any request outstanding: top-level, drill-down or key update.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    pub fn clear_logs(&mut self) {
        self.logs.clear();
    }

    /// Drop rendered results, their charts and any shown errors.
    pub fn clear_results(&mut self) {
        self.charts.clear_all();
        self.results = ResultsView::Empty;
        self.errors.clear();
    }

    pub fn sector_card_mut(&mut self, id: &uuid::Uuid) -> Option<&mut SectorCard> {
        match &mut self.results {
            ResultsView::Sectors(cards) => cards.iter_mut().find(|card| card.id == *id),
            ResultsView::Empty | ResultsView::Adhoc(_) => None,
        }
    }
}
