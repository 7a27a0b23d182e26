// src/ui/charts.rs
use eframe::egui;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::render::chart::{BarChartSpec, ChartSpec, ChartSurface, LiveChart, Rgba, Series, TimeSeriesSpec};
use crate::state::chart_registry::ChartRegistry;

const BAR_CHART_HEIGHT: f32 = 110.0;
const SENTIMENT_PLOT_HEIGHT: f32 = 200.0;
const PRICE_PLOT_HEIGHT: f32 = 140.0;

fn color(rgba: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(rgba.r, rgba.g, rgba.b, rgba.a)
}

/// Draw whatever a mount point holds. A live key with no registered chart
/// falls back to an inline note instead of failing the surrounding card.
pub fn draw_surface(ui: &mut egui::Ui, surface: &ChartSurface, charts: &ChartRegistry<LiveChart>) {
    match surface {
        ChartSurface::Placeholder(text) => {
            ui.colored_label(super::ERROR_COLOR, text);
        }
        ChartSurface::Live(key) => match charts.get(key).and_then(LiveChart::spec) {
            Some(ChartSpec::Bars(spec)) => draw_bar_chart(ui, key, spec),
            Some(ChartSpec::TimeSeries(spec)) => draw_time_series(ui, key, spec),
            None => {
                if first_miss(ui.ctx(), key) {
                    log::warn!("Chart surface '{}' has no live chart", key);
                }
                ui.colored_label(super::ERROR_COLOR, "Chart unavailable.");
            }
        },
    }
}

/// True only the first time a key is reported missing, so the warning is not repeated every frame.
fn first_miss(ctx: &egui::Context, key: &str) -> bool {
    let id = egui::Id::new(("missing-chart", key));
    ctx.data_mut(|data| !std::mem::replace(data.get_temp_mut_or_default::<bool>(id), true))
}

pub fn draw_bar_chart(ui: &mut egui::Ui, id: &str, spec: &BarChartSpec) {
    let mut plot = Plot::new(id)
        .height(BAR_CHART_HEIGHT)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show_axes([true, false])
        .include_x(spec.domain.0)
        .include_x(spec.domain.1)
        .x_axis_label(spec.axis_title);
    if spec.show_legend {
        plot = plot.legend(Legend::default());
    }

    plot.show(ui, |plot_ui| {
        // One chart per bar so each score gets its own legend entry.
        for (idx, bar) in spec.bars.iter().enumerate() {
            let drawn = Bar::new(idx as f64, bar.value)
                .width(0.6)
                .name(bar.label)
                .fill(color(bar.fill))
                .stroke(egui::Stroke::new(1.0, color(bar.border)));
            plot_ui.bar_chart(
                BarChart::new(vec![drawn])
                    .horizontal()
                    .color(color(bar.border))
                    .name(bar.label),
            );
        }
    });
}

/// Contiguous runs of present values; a `None` breaks the line.
fn segments(series: &Series) -> Vec<Vec<[f64; 2]>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (idx, value) in series.values.iter().enumerate() {
        match value {
            Some(v) => current.push([idx as f64, *v]),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn plot_series(plot_ui: &mut egui_plot::PlotUi, series: &Series) {
    for (run_idx, run) in segments(series).into_iter().enumerate() {
        let mut line = Line::new(PlotPoints::from(run)).color(color(series.color)).width(2.0);
        if run_idx == 0 {
            line = line.name(&series.label);
        }
        plot_ui.line(line);
    }
}

fn date_hover(labels: Vec<String>) -> impl Fn(&str, &egui_plot::PlotPoint) -> String {
    move |name, point| {
        let idx = point.x.round();
        let date = if idx >= 0.0 { labels.get(idx as usize).map(String::as_str) } else { None };
        format!("{}\n{}: {:.3}", name, date.unwrap_or("-"), point.y)
    }
}

/// Sentiment on a fixed [-1, 1] axis; price, when present, in a second plot
/// sharing the date axis.
pub fn draw_time_series(ui: &mut egui::Ui, id: &str, spec: &TimeSeriesSpec) {
    ui.strong(&spec.title);
    let link_group = egui::Id::new(id).with("dates");
    let (low, high) = spec.sentiment_axis.range.unwrap_or((-1.0, 1.0));

    Plot::new(format!("{}-sentiment", id))
        .height(SENTIMENT_PLOT_HEIGHT)
        .legend(Legend::default())
        .include_y(low)
        .include_y(high)
        .y_axis_label(spec.sentiment_axis.title)
        .link_axis(link_group, true, false)
        .label_formatter(date_hover(spec.labels.clone()))
        .show(ui, |plot_ui| plot_series(plot_ui, &spec.sentiment));

    if let Some(price) = &spec.price {
        Plot::new(format!("{}-price", id))
            .height(PRICE_PLOT_HEIGHT)
            .legend(Legend::default())
            .y_axis_label(price.axis.title)
            .link_axis(link_group, true, false)
            .label_formatter(date_hover(spec.labels.clone()))
            .show(ui, |plot_ui| plot_series(plot_ui, &price.series));
    }

    if let (Some(first), Some(last)) = (spec.labels.first(), spec.labels.last()) {
        ui.small(format!("{} to {}", first, last));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaps_split_lines() {
        let series = Series {
            label: "X Closing Price".into(),
            values: vec![None, Some(1.0), Some(2.0), None, Some(4.0)],
            color: Rgba::new(0, 0, 0, 255),
        };
        assert_eq!(segments(&series), vec![vec![[1.0, 1.0], [2.0, 2.0]], vec![[4.0, 4.0]]]);
    }

    #[test]
    fn test_missing_chart_reported_once_per_key() {
        let ctx = egui::Context::default();
        assert!(first_miss(&ctx, "sector-chart-a"));
        assert!(!first_miss(&ctx, "sector-chart-a"));
        assert!(!first_miss(&ctx, "sector-chart-a"));
        assert!(first_miss(&ctx, "sector-chart-b"));
    }
}
