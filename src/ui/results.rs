// src/ui/results.rs
use eframe::egui;

use super::charts::draw_surface;
use super::{UiAction, ERROR_COLOR};
use crate::render::detail::NOT_AVAILABLE;
use crate::render::{
    AdhocView, ArticleTable, DetailBlock, DetailLine, Drilldown, DrilldownResults, LiveChart, SectorCard,
};
use crate::state::chart_registry::ChartRegistry;
use crate::state::{AppState, ResultsView};

const STOCK_ROW_HEIGHT: f32 = 22.0;

pub fn draw_results(ui: &mut egui::Ui, state: &mut AppState, actions: &mut Vec<UiAction>) {
    let summary = if state.summary.is_error {
        egui::RichText::new(&state.summary.text).color(ERROR_COLOR)
    } else {
        egui::RichText::new(&state.summary.text)
    };
    ui.label(summary);
    ui.separator();

    let charts = &state.charts;
    match &mut state.results {
        ResultsView::Empty => {}
        ResultsView::Sectors(cards) if cards.is_empty() => {
            ui.label("No batch sector results to display.");
        }
        ResultsView::Sectors(cards) => {
            for card in cards.iter_mut() {
                draw_sector_card(ui, card, charts, actions);
                ui.add_space(12.0);
            }
        }
        ResultsView::Adhoc(view) => draw_adhoc_view(ui, view, charts),
    }
}

pub fn draw_detail(ui: &mut egui::Ui, block: &DetailBlock) {
    for line in &block.lines {
        match line {
            DetailLine::Heading(text) => {
                ui.strong(text);
            }
            DetailLine::Field { label, value } => {
                ui.horizontal_wrapped(|ui| {
                    ui.strong(format!("{}:", label));
                    ui.label(value);
                });
            }
            DetailLine::List { label, items } => {
                ui.strong(format!("{}:", label));
                match items {
                    Some(items) => {
                        for item in items {
                            ui.label(format!("  • {}", item));
                        }
                    }
                    None => {
                        ui.label(format!("  {}", NOT_AVAILABLE));
                    }
                }
            }
            DetailLine::Error(_) => {
                ui.colored_label(ERROR_COLOR, line.text());
            }
            DetailLine::Note(text) => {
                ui.label(egui::RichText::new(text).italics());
            }
        }
    }
}

fn draw_sector_card(
    ui: &mut egui::Ui,
    card: &mut SectorCard,
    charts: &ChartRegistry<LiveChart>,
    actions: &mut Vec<UiAction>,
) {
    ui.group(|ui| {
        ui.set_width(ui.available_width());
        ui.heading(&card.header);
        draw_surface(ui, &card.chart, charts);
        ui.small(&card.context_line);
        ui.add_space(6.0);

        egui::CollapsingHeader::new("Details")
            .id_source(("sector_detail", card.id))
            .default_open(true)
            .show(ui, |ui| draw_detail(ui, &card.detail));

        ui.add_space(6.0);
        match &mut card.drilldown {
            Drilldown::Unavailable(note) => {
                ui.label(egui::RichText::new(note.as_str()).italics());
            }
            Drilldown::Available(selector) => {
                ui.label(format!("Analyze Stocks for {}:", card.sector_name));
                egui::ScrollArea::vertical()
                    .id_source(("stock_select", card.id))
                    .max_height(selector.visible_rows as f32 * STOCK_ROW_HEIGHT)
                    .show(ui, |ui| {
                        for (stock, picked) in selector.options.iter().zip(selector.selected.iter_mut()) {
                            ui.checkbox(picked, stock);
                        }
                    });

                ui.horizontal(|ui| {
                    let button = egui::Button::new("Analyze Selected Stocks");
                    if ui.add_enabled(!selector.in_flight, button).clicked() {
                        actions.push(UiAction::Drilldown(card.id));
                    }
                    if selector.in_flight {
                        ui.spinner();
                    }
                });
                if let Some(note) = &selector.note {
                    ui.colored_label(super::WARNING_COLOR, note);
                }

                match &selector.results {
                    DrilldownResults::NotRun => {}
                    DrilldownResults::Empty(text) => {
                        ui.label(egui::RichText::new(text.as_str()).italics());
                    }
                    DrilldownResults::Failed(text) => {
                        ui.colored_label(ERROR_COLOR, text);
                    }
                    DrilldownResults::Stocks(stocks) => {
                        for stock in stocks {
                            ui.group(|ui| {
                                ui.strong(&stock.header);
                                draw_detail(ui, &stock.detail);
                            });
                        }
                    }
                }
            }
        }
    });
}

fn draw_adhoc_view(ui: &mut egui::Ui, view: &AdhocView, charts: &ChartRegistry<LiveChart>) {
    ui.heading(&view.title);
    ui.add_space(6.0);
    draw_detail(ui, &view.llm);
    ui.add_space(8.0);
    draw_surface(ui, &view.chart, charts);
    ui.add_space(8.0);

    ui.strong("Articles analyzed");
    match &view.articles {
        ArticleTable::Empty(text) => {
            ui.label(text);
        }
        ArticleTable::Rows(rows) => {
            egui::Grid::new("adhoc_articles")
                .num_columns(4)
                .striped(true)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    ui.strong("Date");
                    ui.strong("Source");
                    ui.strong("Content");
                    ui.strong("VADER");
                    ui.end_row();

                    for row in rows {
                        ui.label(&row.date);
                        ui.label(&row.source);
                        if row.link == "#" {
                            ui.label(&row.snippet).on_hover_text(&row.full_content);
                        } else {
                            ui.hyperlink_to(&row.snippet, &row.link).on_hover_text(&row.full_content);
                        }
                        ui.label(&row.vader);
                        ui.end_row();
                    }
                });
        }
    }
}
