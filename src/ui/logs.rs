// src/ui/logs.rs
use eframe::egui;

use super::{level_color, UiAction, ERROR_COLOR};
use crate::state::error_panel::ErrorPanel;
use crate::state::log_buffer::LogBuffer;

pub fn draw_log_panel(ui: &mut egui::Ui, logs: &mut LogBuffer, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        ui.heading("Logs");
        ui.weak(format!("{} entries", logs.len()));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Clear Logs").clicked() {
                actions.push(UiAction::ClearLogs);
            }
        });
    });
    ui.separator();

    let scroll_to_end = logs.take_scroll_request();
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for line in logs.render() {
                let mut text = egui::RichText::new(line.text()).monospace();
                if let Some(color) = level_color(line.level) {
                    text = text.color(color);
                }
                ui.label(text);
            }
            if scroll_to_end {
                ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
            }
        });
}

/// Messages are shown verbatim, one row each; nothing is drawn when empty.
pub fn draw_error_panel(ui: &mut egui::Ui, errors: &ErrorPanel) {
    if !errors.is_visible() {
        return;
    }
    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(1.0, ERROR_COLOR))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            for message in errors.items() {
                ui.colored_label(ERROR_COLOR, format!("• {}", message));
            }
        });
    ui.add_space(8.0);
}
