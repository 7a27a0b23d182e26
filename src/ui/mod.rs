// src/ui/mod.rs
use eframe::egui;
use uuid::Uuid;

use crate::api::models::LogLevel;
use crate::state::form::OperationMode;

pub mod api_keys;
pub mod charts;
pub mod form;
pub mod logs;
pub mod results;

/// User intents collected while drawing a frame and applied afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Submit,
    SetMode(OperationMode),
    Drilldown(Uuid),
    UpdateApiKeys,
    ClearLogs,
}

pub const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 53, 69);
pub const WARNING_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 160, 20);

pub fn level_color(level: LogLevel) -> Option<egui::Color32> {
    match level {
        LogLevel::Error => Some(ERROR_COLOR),
        LogLevel::Warning => Some(WARNING_COLOR),
        LogLevel::Info | LogLevel::Unknown => None,
    }
}
