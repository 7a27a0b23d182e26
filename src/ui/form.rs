// src/ui/form.rs
use eframe::egui;

use super::UiAction;
use crate::api::models::TargetKind;
use crate::state::form::OperationMode;
use crate::state::AppState;

pub fn draw_form_panel(ui: &mut egui::Ui, state: &mut AppState, actions: &mut Vec<UiAction>) {
    ui.heading("Sentiment Analysis");
    ui.add_space(8.0);

    // Mode selection goes through an action so previous results get cleared.
    let mut mode = state.form.mode;
    egui::ComboBox::from_label("Operation")
        .selected_text(mode.label())
        .show_ui(ui, |ui| {
            for option in OperationMode::ALL {
                ui.selectable_value(&mut mode, option, option.label());
            }
        });
    if mode != state.form.mode {
        actions.push(UiAction::SetMode(mode));
    }

    ui.add_space(8.0);
    match state.form.mode {
        OperationMode::SectorBatch => draw_sector_inputs(ui, state),
        OperationMode::Adhoc => draw_adhoc_inputs(ui, state),
    }

    ui.add_space(8.0);
    draw_common_inputs(ui, state);

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        let run = egui::Button::new("Run Operation");
        if ui.add_enabled(!state.is_submitting(), run).clicked() {
            actions.push(UiAction::Submit);
        }
        if state.is_busy() {
            ui.spinner();
            ui.label("Working...");
        }
    });

    ui.add_space(12.0);
    if ui.button("Session API Keys...").clicked() {
        state.show_api_keys = true;
    }
}

fn draw_sector_inputs(ui: &mut egui::Ui, state: &mut AppState) {
    ui.group(|ui| {
        ui.set_width(ui.available_width());
        ui.strong("Sectors");
        if state.catalog.is_empty() {
            ui.label("No sectors configured.");
            return;
        }
        egui::ScrollArea::vertical()
            .id_source("sector_select")
            .max_height(180.0)
            .show(ui, |ui| {
                for sector in state.catalog.sector_names() {
                    let mut picked = state.form.is_sector_selected(sector);
                    let label = format!("{} ({} stocks)", sector, state.catalog.stocks(sector).len());
                    if ui.checkbox(&mut picked, label).changed() {
                        state.form.set_sector_selected(sector, picked);
                    }
                }
            });
    });
}

fn draw_adhoc_inputs(ui: &mut egui::Ui, state: &mut AppState) {
    let form = &mut state.form;
    ui.group(|ui| {
        ui.set_width(ui.available_width());
        ui.strong("Ad-hoc Target");

        ui.horizontal(|ui| {
            ui.label("Name:");
            ui.add(egui::TextEdit::singleline(&mut form.target_name).hint_text("e.g. RELIANCE or Nifty Bank"));
        });
        ui.horizontal(|ui| {
            ui.label("Type:");
            ui.radio_value(&mut form.target_kind, TargetKind::Stock, "Stock");
            ui.radio_value(&mut form.target_kind, TargetKind::Sector, "Sector");
        });

        ui.horizontal(|ui| {
            ui.label("News Source:");
            egui::ComboBox::from_id_source("news_source")
                .selected_text(form.news_source.as_str())
                .show_ui(ui, |ui| {
                    for option in &state.settings.news_source_options {
                        ui.selectable_value(&mut form.news_source, option.clone(), option);
                    }
                });
        });

        ui.checkbox(&mut form.trigger_scrape, "Scrape fresh articles first");
        ui.add_enabled_ui(form.trigger_scrape, |ui| {
            ui.horizontal(|ui| {
                ui.label("Domains:");
                ui.add(egui::TextEdit::singleline(&mut form.scrape_domains).hint_text("comma-separated"));
            });
        });
    });
}

fn draw_common_inputs(ui: &mut egui::Ui, state: &mut AppState) {
    let form = &mut state.form;
    ui.group(|ui| {
        ui.set_width(ui.available_width());
        egui::Grid::new("common_inputs").num_columns(2).spacing([8.0, 6.0]).show(ui, |ui| {
            ui.label("Start date:");
            ui.add(egui::TextEdit::singleline(&mut form.start_date).hint_text("YYYY-MM-DD"));
            ui.end_row();

            ui.label("End date:");
            ui.add(egui::TextEdit::singleline(&mut form.end_date).hint_text("YYYY-MM-DD"));
            ui.end_row();

            ui.label("Max articles for LLM:");
            ui.add(egui::TextEdit::singleline(&mut form.max_articles).desired_width(60.0));
            ui.end_row();
        });

        ui.label("Custom LLM prompt (optional):");
        ui.add(
            egui::TextEdit::multiline(&mut form.custom_prompt)
                .desired_rows(3)
                .desired_width(f32::INFINITY),
        );
    });
}
