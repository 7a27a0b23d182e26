// src/render/sector.rs
use uuid::Uuid;

use super::chart::{score_bar_chart, ChartSpec, ChartSurface, LiveChart};
use super::detail::{format_score, render_subject, DetailBlock, Scope, Subject, NOT_AVAILABLE};
use crate::api::models::{SectorResult, StockResult};
use crate::state::chart_registry::ChartRegistry;

const MAX_VISIBLE_STOCK_ROWS: usize = 5;

/// One rendered sector: chart mount, detail block and drill-down controls.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorCard {
    pub id: Uuid,
    pub sector_name: String,
    pub header: String,
    pub chart: ChartSurface,
    pub context_line: String,
    pub detail: DetailBlock,
    pub drilldown: Drilldown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Drilldown {
    Unavailable(String),
    Available(StockSelector),
}

/// Multi-select over a sector's constituent stocks plus the outcome of its last run.
#[derive(Debug, Clone, PartialEq)]
pub struct StockSelector {
    pub options: Vec<String>,
    pub selected: Vec<bool>,
    pub visible_rows: usize,
    pub in_flight: bool,
    pub note: Option<String>,
    pub results: DrilldownResults,
}

impl StockSelector {
    pub fn new(options: Vec<String>) -> Self {
        Self {
            visible_rows: options.len().min(MAX_VISIBLE_STOCK_ROWS),
            selected: vec![false; options.len()],
            options,
            in_flight: false,
            note: None,
            results: DrilldownResults::NotRun,
        }
    }

    pub fn selected_stocks(&self) -> Vec<String> {
        self.options
            .iter()
            .zip(&self.selected)
            .filter(|(_, picked)| **picked)
            .map(|(stock, _)| stock.clone())
            .collect()
    }

    pub fn set_selected(&mut self, stock: &str, picked: bool) {
        if let Some(idx) = self.options.iter().position(|s| s == stock) {
            self.selected[idx] = picked;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrilldownResults {
    NotRun,
    Stocks(Vec<StockCard>),
    Empty(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockCard {
    pub stock_name: String,
    pub header: String,
    pub detail: DetailBlock,
}

pub fn chart_key(id: &Uuid) -> String {
    format!("sector-chart-{}", id)
}

/// Build one card per sector result and register its score chart.
pub fn render_sector_batch(results: &[SectorResult], charts: &mut ChartRegistry<LiveChart>) -> Vec<SectorCard> {
    results.iter().map(|result| render_sector_card(result, charts)).collect()
}

pub fn render_sector_card(result: &SectorResult, charts: &mut ChartRegistry<LiveChart>) -> SectorCard {
    let id = Uuid::new_v4();
    let llm_score = result.gemini_analysis_sector.as_ref().and_then(|llm| llm.sentiment_score_llm);
    let vader_score = result.avg_vader_score_sector;

    let chart = match score_bar_chart(llm_score, vader_score) {
        Some(spec) => {
            let key = chart_key(&id);
            charts.set(key.clone(), || LiveChart::new(ChartSpec::Bars(spec)));
            ChartSurface::Live(key)
        }
        None => ChartSurface::Placeholder("No sentiment scores available for chart.".to_string()),
    };

    let drilldown = if result.constituent_stocks.is_empty() {
        Drilldown::Unavailable("No constituent stocks for this sector.".to_string())
    } else {
        Drilldown::Available(StockSelector::new(result.constituent_stocks.clone()))
    };

    SectorCard {
        id,
        sector_name: result.sector_name.clone(),
        header: format!(
            "SECTOR: {} (LLM: {}, VADER: {})",
            result.sector_name,
            format_score(llm_score, 2),
            format_score(vader_score, 2)
        ),
        chart,
        context_line: format!(
            "Context: {} | Articles for LLM: {}",
            result.llm_context_date_range.as_deref().unwrap_or(NOT_AVAILABLE),
            result
                .num_articles_for_llm_sector
                .map(|n| n.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        ),
        detail: render_subject(&Subject::from(result), Scope::Batch),
        drilldown,
    }
}

pub fn render_stock_results(results: &[StockResult]) -> DrilldownResults {
    if results.is_empty() {
        return DrilldownResults::Empty("No analysis results for selected stocks.".to_string());
    }

    DrilldownResults::Stocks(
        results
            .iter()
            .map(|result| {
                let llm_score = result.gemini_analysis_stock.as_ref().and_then(|llm| llm.sentiment_score_llm);
                StockCard {
                    stock_name: result.stock_name.clone(),
                    header: format!(
                        "{} (LLM {}, VADER {})",
                        result.stock_name,
                        format_score(llm_score, 2),
                        format_score(result.avg_vader_score_stock, 2)
                    ),
                    detail: render_subject(&Subject::from(result), Scope::StockAnalysis),
                }
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::LlmAnalysis;

    #[test]
    fn test_card_with_stocks_offers_selector() {
        let mut charts = ChartRegistry::new();
        let result = SectorResult {
            sector_name: "Tech".into(),
            constituent_stocks: vec!["AAA".into(), "BBB".into()],
            ..Default::default()
        };
        let card = render_sector_card(&result, &mut charts);

        assert_eq!(card.header, "SECTOR: Tech (LLM: N/A, VADER: N/A)");
        assert_eq!(card.context_line, "Context: N/A | Articles for LLM: N/A");
        assert_eq!(card.chart, ChartSurface::Placeholder("No sentiment scores available for chart.".into()));
        assert!(charts.is_empty());
        match &card.drilldown {
            Drilldown::Available(selector) => {
                assert_eq!(selector.options, vec!["AAA".to_string(), "BBB".to_string()]);
                assert_eq!(selector.visible_rows, 2);
                assert!(selector.selected_stocks().is_empty());
            }
            other => panic!("expected selector, got {:?}", other),
        }
    }

    #[test]
    fn test_card_without_stocks_shows_placeholder() {
        let mut charts = ChartRegistry::new();
        let result = SectorResult {
            sector_name: "Energy".into(),
            avg_vader_score_sector: Some(0.3),
            gemini_analysis_sector: Some(LlmAnalysis { sentiment_score_llm: Some(0.5), ..Default::default() }),
            ..Default::default()
        };
        let card = render_sector_card(&result, &mut charts);
        assert_eq!(card.drilldown, Drilldown::Unavailable("No constituent stocks for this sector.".into()));
        assert_eq!(card.header, "SECTOR: Energy (LLM: 0.50, VADER: 0.30)");

        let key = chart_key(&card.id);
        assert_eq!(card.chart, ChartSurface::Live(key.clone()));
        match charts.get(&key).and_then(|c| c.spec()) {
            Some(ChartSpec::Bars(bars)) => assert_eq!(bars.bars.len(), 2),
            other => panic!("expected bar chart, got {:?}", other),
        }
    }

    #[test]
    fn test_each_card_gets_its_own_chart_key() {
        let mut charts = ChartRegistry::new();
        let results: Vec<SectorResult> = (0..3)
            .map(|i| SectorResult {
                sector_name: format!("S{}", i),
                avg_vader_score_sector: Some(0.1 * i as f64),
                ..Default::default()
            })
            .collect();
        let cards = render_sector_batch(&results, &mut charts);
        assert_eq!(cards.len(), 3);
        assert_eq!(charts.len(), 3);
        assert_eq!(cards.iter().map(|c| c.sector_name.as_str()).collect::<Vec<_>>(), vec!["S0", "S1", "S2"]);
    }

    #[test]
    fn test_selector_tracks_selection() {
        let mut selector = StockSelector::new((0..8).map(|i| format!("T{}", i)).collect());
        assert_eq!(selector.visible_rows, 5);
        selector.set_selected("T3", true);
        selector.set_selected("T1", true);
        selector.set_selected("missing", true);
        assert_eq!(selector.selected_stocks(), vec!["T1".to_string(), "T3".to_string()]);
    }

    #[test]
    fn test_stock_results_rendering() {
        assert_eq!(
            render_stock_results(&[]),
            DrilldownResults::Empty("No analysis results for selected stocks.".into())
        );
        let results = vec![StockResult {
            stock_name: "TCS".into(),
            avg_vader_score_stock: Some(0.126),
            ..Default::default()
        }];
        match render_stock_results(&results) {
            DrilldownResults::Stocks(cards) => {
                assert_eq!(cards[0].header, "TCS (LLM N/A, VADER 0.13)");
                assert!(cards[0].detail.text_lines().contains(&"VADER Avg. (Stock Analysis): N/A (Score: 0.126)".to_string()));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
