// src/render/adhoc.rs
use super::chart::{price_overlay, sentiment_series, Axis, ChartSpec, ChartSurface, LiveChart, TimeSeriesSpec, SCORE_DOMAIN};
use super::detail::{format_score, render_adhoc_llm, DetailBlock, NOT_AVAILABLE};
use crate::api::models::{AdhocData, AdhocTarget, Article, DailySentiment, PricePoint};
use crate::state::chart_registry::ChartRegistry;
use crate::state::log_buffer::LogBuffer;

pub const ADHOC_CHART_KEY: &str = "adhoc-sentiment-price";
pub const SNIPPET_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct AdhocView {
    pub title: String,
    pub llm: DetailBlock,
    pub articles: ArticleTable,
    pub chart: ChartSurface,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArticleTable {
    Rows(Vec<ArticleRow>),
    Empty(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRow {
    pub date: String,
    pub source: String,
    pub snippet: String,
    pub link: String,
    pub full_content: String,
    pub vader: String,
}

/// First 100 characters of `content`, with an ellipsis when cut.
pub fn snippet(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

pub fn article_row(article: &Article) -> ArticleRow {
    let content = article.content.clone().unwrap_or_default();
    let snippet = snippet(&content);
    ArticleRow {
        date: article.date.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        source: article.source.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        snippet: if snippet.is_empty() { NOT_AVAILABLE.to_string() } else { snippet },
        link: article.uri.clone().filter(|u| !u.is_empty()).unwrap_or_else(|| "#".to_string()),
        full_content: content,
        vader: format_score(article.vader_score, 3),
    }
}

pub fn article_table(articles: &[Article]) -> ArticleTable {
    if articles.is_empty() {
        ArticleTable::Empty("No articles were processed for LLM.".to_string())
    } else {
        ArticleTable::Rows(articles.iter().map(article_row).collect())
    }
}

/// Sentiment over time; the price axis only exists for a single instrument with price data.
pub fn sentiment_price_chart(
    target: &AdhocTarget,
    target_name: &str,
    daily: &[DailySentiment],
    prices: Option<&[PricePoint]>,
) -> Option<TimeSeriesSpec> {
    if daily.is_empty() {
        return None;
    }

    let (labels, sentiment) = sentiment_series(target_name, daily);
    let price = match (target, prices) {
        (AdhocTarget::Stock { .. }, Some(prices)) if !prices.is_empty() => {
            Some(price_overlay(target_name, &labels, prices))
        }
        (AdhocTarget::Stock { .. }, _) | (AdhocTarget::Sector { .. }, _) => None,
    };
    let title = match target {
        AdhocTarget::Stock { .. } => format!("Daily Sentiment & Price for {}", target_name),
        AdhocTarget::Sector { .. } => format!("Daily Sentiment for {}", target_name),
    };

    Some(TimeSeriesSpec {
        title,
        labels,
        sentiment,
        sentiment_axis: Axis { title: "Avg. VADER Score", range: Some(SCORE_DOMAIN) },
        price,
    })
}

pub fn render_adhoc(
    target: &AdhocTarget,
    data: &AdhocData,
    charts: &mut ChartRegistry<LiveChart>,
    logs: &mut LogBuffer,
) -> AdhocView {
    let target_name = data.target_name.as_deref().unwrap_or(target.name());

    let daily = data.daily_sentiment_data.as_deref().unwrap_or(&[]);
    let chart = match sentiment_price_chart(target, target_name, daily, data.price_data.as_deref()) {
        Some(spec) => {
            charts.set(ADHOC_CHART_KEY, || LiveChart::new(ChartSpec::TimeSeries(spec)));
            ChartSurface::Live(ADHOC_CHART_KEY.to_string())
        }
        None => {
            logs.warning("Data for rolling sentiment/price chart not fully available.");
            charts.clear(ADHOC_CHART_KEY);
            ChartSurface::Placeholder("No daily sentiment data to plot.".to_string())
        }
    };

    AdhocView {
        title: format!("Analysis for: {}", target.name()),
        llm: render_adhoc_llm(data.llm_analysis.as_ref(), target_name),
        articles: article_table(&data.articles_analyzed),
        chart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::LogLevel;

    fn daily(dates: &[&str]) -> Vec<DailySentiment> {
        dates
            .iter()
            .map(|d| DailySentiment { date: d.to_string(), avg_sentiment_score: Some(0.1) })
            .collect()
    }

    #[test]
    fn test_snippet_truncates_on_characters() {
        assert_eq!(snippet("short"), "short");
        let exact: String = "é".repeat(100);
        assert_eq!(snippet(&exact), exact);
        let long: String = "é".repeat(101);
        assert_eq!(snippet(&long), format!("{}...", "é".repeat(100)));
    }

    #[test]
    fn test_article_row_defaults() {
        let row = article_row(&Article::default());
        assert_eq!(row.date, "N/A");
        assert_eq!(row.source, "N/A");
        assert_eq!(row.snippet, "N/A");
        assert_eq!(row.link, "#");
        assert_eq!(row.vader, "N/A");

        let row = article_row(&Article {
            content: Some("Markets rallied".into()),
            uri: Some("https://news.example/a".into()),
            vader_score: Some(0.5),
            ..Default::default()
        });
        assert_eq!(row.snippet, "Markets rallied");
        assert_eq!(row.full_content, "Markets rallied");
        assert_eq!(row.vader, "0.500");
    }

    #[test]
    fn test_price_axis_only_for_stock_with_prices() {
        let days = daily(&["2024-01-01", "2024-01-02"]);
        let prices = vec![PricePoint { date: "2024-01-02".into(), close_price: Some(100.0) }];

        let stock = AdhocTarget::stock("INFY");
        let spec = sentiment_price_chart(&stock, "INFY", &days, Some(prices.as_slice())).unwrap();
        let overlay = spec.price.unwrap();
        assert_eq!(overlay.series.values, vec![None, Some(100.0)]);
        assert_eq!(spec.sentiment_axis.range, Some((-1.0, 1.0)));

        let spec = sentiment_price_chart(&stock, "INFY", &days, Some(&[][..])).unwrap();
        assert!(spec.price.is_none());

        let sector = AdhocTarget::sector("Nifty IT");
        let spec = sentiment_price_chart(&sector, "Nifty IT", &days, Some(prices.as_slice())).unwrap();
        assert!(spec.price.is_none());
        assert_eq!(spec.title, "Daily Sentiment for Nifty IT");
    }

    #[test]
    fn test_missing_sentiment_replaces_chart_with_placeholder() {
        let mut charts = ChartRegistry::new();
        let mut logs = LogBuffer::new();
        let target = AdhocTarget::stock("INFY");

        let with_data = AdhocData { daily_sentiment_data: Some(daily(&["2024-01-01"])), ..Default::default() };
        let view = render_adhoc(&target, &with_data, &mut charts, &mut logs);
        assert_eq!(view.chart, ChartSurface::Live(ADHOC_CHART_KEY.to_string()));
        assert!(charts.contains(ADHOC_CHART_KEY));

        let view = render_adhoc(&target, &AdhocData::default(), &mut charts, &mut logs);
        assert_eq!(view.chart, ChartSurface::Placeholder("No daily sentiment data to plot.".into()));
        assert!(!charts.contains(ADHOC_CHART_KEY));
        assert_eq!(logs.entries().last().unwrap().level, LogLevel::Warning);
        assert_eq!(view.title, "Analysis for: INFY");
        assert_eq!(view.articles, ArticleTable::Empty("No articles were processed for LLM.".into()));
    }
}
