// src/ui/api_keys.rs
use eframe::egui;

use super::UiAction;
use crate::state::AppState;

pub fn draw_api_key_dialog(ctx: &egui::Context, state: &mut AppState, actions: &mut Vec<UiAction>) {
    if !state.show_api_keys {
        return;
    }

    let mut open = true;
    let busy = state.is_busy();
    egui::Window::new("Session API Keys")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label("Keys apply to the current backend session only. Leave a field blank to keep it unchanged.");
            ui.add_space(8.0);

            egui::Grid::new("api_key_grid").num_columns(2).spacing([8.0, 6.0]).show(ui, |ui| {
                ui.label("Gemini API Key:");
                ui.add(egui::TextEdit::singleline(&mut state.api_keys.gemini_key).password(true));
                ui.end_row();

                ui.label("NewsAPI Key:");
                ui.add(egui::TextEdit::singleline(&mut state.api_keys.newsapi_key).password(true));
                ui.end_row();
            });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.add_enabled(!busy, egui::Button::new("Update Keys")).clicked() {
                    actions.push(UiAction::UpdateApiKeys);
                }
                if busy {
                    ui.spinner();
                }
            });
        });

    state.show_api_keys = open;
}
