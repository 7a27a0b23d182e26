// src/render/chart.rs
use std::collections::HashMap;

use crate::api::models::{DailySentiment, PricePoint};
use crate::state::chart_registry::ChartHandle;

pub const SCORE_DOMAIN: (f64, f64) = (-1.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

const FILL_ALPHA: u8 = 153; // 0.6
const BORDER_ALPHA: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Positive,
    Negative,
    Neutral,
}

/// Which score a bar shows; each has its own banding threshold and palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSource {
    Llm,
    Vader,
}

impl ScoreSource {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreSource::Llm => "LLM Overall",
            ScoreSource::Vader => "VADER Avg. (Batch)",
        }
    }

    pub fn threshold(&self) -> f64 {
        match self {
            ScoreSource::Llm => 0.1,
            ScoreSource::Vader => 0.05,
        }
    }

    pub fn band(&self, score: f64) -> Band {
        let t = self.threshold();
        if score > t {
            Band::Positive
        } else if score < -t {
            Band::Negative
        } else {
            Band::Neutral
        }
    }

    pub fn color(&self, band: Band) -> Rgba {
        match (self, band) {
            (ScoreSource::Llm, Band::Positive) => Rgba::new(75, 192, 192, BORDER_ALPHA),
            (ScoreSource::Llm, Band::Negative) => Rgba::new(255, 99, 132, BORDER_ALPHA),
            (ScoreSource::Llm, Band::Neutral) => Rgba::new(201, 203, 207, BORDER_ALPHA),
            (ScoreSource::Vader, Band::Positive) => Rgba::new(54, 162, 235, BORDER_ALPHA),
            (ScoreSource::Vader, Band::Negative) => Rgba::new(255, 159, 64, BORDER_ALPHA),
            (ScoreSource::Vader, Band::Neutral) => Rgba::new(153, 102, 255, BORDER_ALPHA),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBar {
    pub source: ScoreSource,
    pub label: &'static str,
    pub value: f64,
    pub band: Band,
    pub fill: Rgba,
    pub border: Rgba,
}

impl ScoreBar {
    pub fn new(source: ScoreSource, value: f64) -> Self {
        let band = source.band(value);
        let border = source.color(band);
        Self {
            source,
            label: source.label(),
            value,
            band,
            fill: border.with_alpha(FILL_ALPHA),
            border,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChartSpec {
    pub bars: Vec<ScoreBar>,
    pub domain: (f64, f64),
    pub axis_title: &'static str,
    pub show_legend: bool,
}

/// One bar per available score; `None` when neither score is usable.
pub fn score_bar_chart(llm_score: Option<f64>, vader_score: Option<f64>) -> Option<BarChartSpec> {
    let bars: Vec<ScoreBar> = [(ScoreSource::Llm, llm_score), (ScoreSource::Vader, vader_score)]
        .into_iter()
        .filter_map(|(source, score)| score.filter(|v| v.is_finite()).map(|v| ScoreBar::new(source, v)))
        .collect();

    if bars.is_empty() {
        return None;
    }

    Some(BarChartSpec {
        show_legend: bars.len() > 1,
        bars,
        domain: SCORE_DOMAIN,
        axis_title: "Score (-1 to 1)",
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub values: Vec<Option<f64>>,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub title: &'static str,
    pub range: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceOverlay {
    pub series: Series,
    pub axis: Axis,
}

/// Daily sentiment on a fixed left axis, optionally price on a right axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesSpec {
    pub title: String,
    pub labels: Vec<String>,
    pub sentiment: Series,
    pub sentiment_axis: Axis,
    pub price: Option<PriceOverlay>,
}

/// Price per sentiment date by exact date-string match; dates without a price stay `None`.
pub fn align_prices(labels: &[String], prices: &[PricePoint]) -> Vec<Option<f64>> {
    let mut by_date: HashMap<&str, Option<f64>> = HashMap::new();
    for point in prices {
        by_date.entry(point.date.as_str()).or_insert(point.close_price);
    }
    labels
        .iter()
        .map(|date| by_date.get(date.as_str()).copied().flatten())
        .collect()
}

pub fn sentiment_series(target_name: &str, daily: &[DailySentiment]) -> (Vec<String>, Series) {
    let labels = daily.iter().map(|d| d.date.clone()).collect();
    let series = Series {
        label: format!("{} Avg Sentiment (VADER)", target_name),
        values: daily.iter().map(|d| d.avg_sentiment_score).collect(),
        color: Rgba::new(75, 192, 192, BORDER_ALPHA),
    };
    (labels, series)
}

pub fn price_overlay(target_name: &str, labels: &[String], prices: &[PricePoint]) -> PriceOverlay {
    PriceOverlay {
        series: Series {
            label: format!("{} Closing Price", target_name),
            values: align_prices(labels, prices),
            color: Rgba::new(255, 99, 132, BORDER_ALPHA),
        },
        axis: Axis { title: "Stock Price", range: None },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    Bars(BarChartSpec),
    TimeSeries(TimeSeriesSpec),
}

/// Chart held by the registry; destroying it releases the plotted data.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveChart {
    spec: Option<ChartSpec>,
}

impl LiveChart {
    pub fn new(spec: ChartSpec) -> Self {
        Self { spec: Some(spec) }
    }

    pub fn spec(&self) -> Option<&ChartSpec> {
        self.spec.as_ref()
    }
}

impl ChartHandle for LiveChart {
    fn destroy(&mut self) {
        self.spec = None;
    }
}

/// What a chart mount point shows: a registered chart or an inline placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSurface {
    Live(String),
    Placeholder(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(date: &str, close: f64) -> PricePoint {
        PricePoint { date: date.to_string(), close_price: Some(close) }
    }

    #[test]
    fn test_align_prices_leaves_gaps() {
        let labels = vec!["2024-01-01".to_string(), "2024-01-02".to_string()];
        let aligned = align_prices(&labels, &[price("2024-01-02", 100.0)]);
        assert_eq!(aligned, vec![None, Some(100.0)]);
    }

    #[test]
    fn test_align_prices_does_not_carry_forward() {
        let labels: Vec<String> = ["2024-01-01", "2024-01-02", "2024-01-03"].iter().map(|s| s.to_string()).collect();
        let aligned = align_prices(&labels, &[price("2024-01-01", 10.0), price("2024-01-03", 12.0), price("2024-01-05", 99.0)]);
        assert_eq!(aligned, vec![Some(10.0), None, Some(12.0)]);
    }

    #[test]
    fn test_bar_banding_thresholds() {
        assert_eq!(ScoreSource::Llm.band(0.1), Band::Neutral);
        assert_eq!(ScoreSource::Llm.band(0.11), Band::Positive);
        assert_eq!(ScoreSource::Llm.band(-0.2), Band::Negative);
        assert_eq!(ScoreSource::Vader.band(0.06), Band::Positive);
        assert_eq!(ScoreSource::Vader.band(-0.05), Band::Neutral);
        assert_eq!(ScoreSource::Vader.band(-0.051), Band::Negative);
    }

    #[test]
    fn test_bar_chart_only_includes_available_scores() {
        assert!(score_bar_chart(None, None).is_none());
        assert!(score_bar_chart(Some(f64::NAN), None).is_none());

        let chart = score_bar_chart(None, Some(0.42)).unwrap();
        assert_eq!(chart.bars.len(), 1);
        assert_eq!(chart.bars[0].label, "VADER Avg. (Batch)");
        assert!(!chart.show_legend);
        assert_eq!(chart.domain, (-1.0, 1.0));

        let chart = score_bar_chart(Some(-0.2), Some(0.42)).unwrap();
        assert_eq!(chart.bars[0].source, ScoreSource::Llm);
        assert_eq!(chart.bars[0].band, Band::Negative);
        assert_eq!(chart.bars[0].fill, Rgba::new(255, 99, 132, 153));
        assert!(chart.show_legend);
    }

    #[test]
    fn test_destroyed_chart_releases_spec() {
        let mut chart = LiveChart::new(ChartSpec::Bars(score_bar_chart(Some(0.5), None).unwrap()));
        assert!(chart.spec().is_some());
        chart.destroy();
        assert!(chart.spec().is_none());
    }
}
