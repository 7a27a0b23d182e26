// src/render/detail.rs
use crate::api::models::{LlmAnalysis, SectorResult, StockResult, TargetKind};

pub const NOT_AVAILABLE: &str = "N/A";

/// Which pass produced a detail block; it suffixes every label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Batch,
    StockAnalysis,
    Adhoc,
}

impl Scope {
    fn suffix(&self) -> Option<&'static str> {
        match self {
            Scope::Batch => Some("Batch"),
            Scope::StockAnalysis => Some("Stock Analysis"),
            Scope::Adhoc => None,
        }
    }

    fn label(&self, scoped: &str, plain: &str) -> String {
        match self.suffix() {
            Some(suffix) => format!("{} ({})", scoped, suffix),
            None => plain.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailLine {
    Heading(String),
    Field { label: String, value: String },
    /// `None` renders as "N/A".
    List { label: String, items: Option<Vec<String>> },
    Error(String),
    Note(String),
}

impl DetailLine {
    pub fn text(&self) -> String {
        match self {
            DetailLine::Heading(text) | DetailLine::Note(text) => text.clone(),
            DetailLine::Field { label, value } => format!("{}: {}", label, value),
            DetailLine::List { label, items: None } => format!("{}: {}", label, NOT_AVAILABLE),
            DetailLine::List { label, items: Some(items) } => format!("{}: {}", label, items.join("; ")),
            DetailLine::Error(text) => format!("Error: {}", text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailBlock {
    pub lines: Vec<DetailLine>,
}

impl DetailBlock {
    pub fn text_lines(&self) -> Vec<String> {
        self.lines.iter().map(DetailLine::text).collect()
    }

    fn field(&mut self, label: String, value: impl Into<String>) {
        self.lines.push(DetailLine::Field { label, value: value.into() });
    }
}

/// Sector and stock results seen through one shape.
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a> {
    pub kind: TargetKind,
    pub llm: Option<&'a LlmAnalysis>,
    pub avg_vader: Option<f64>,
    pub vader_label: Option<&'a str>,
    pub num_articles: Option<u32>,
    pub error: Option<&'a str>,
}

impl<'a> From<&'a SectorResult> for Subject<'a> {
    fn from(result: &'a SectorResult) -> Self {
        Self {
            kind: TargetKind::Sector,
            llm: result.gemini_analysis_sector.as_ref(),
            avg_vader: result.avg_vader_score_sector,
            vader_label: result.vader_sentiment_label_sector.as_deref(),
            num_articles: result.num_articles_for_llm_sector,
            error: result.error_message_sector.as_deref(),
        }
    }
}

impl<'a> From<&'a StockResult> for Subject<'a> {
    fn from(result: &'a StockResult) -> Self {
        Self {
            kind: TargetKind::Stock,
            llm: result.gemini_analysis_stock.as_ref(),
            avg_vader: result.avg_vader_score_stock,
            vader_label: result.vader_sentiment_label_stock.as_deref(),
            num_articles: result.num_articles_for_llm_stock,
            error: result.error_message_stock.as_deref(),
        }
    }
}

pub fn format_score(score: Option<f64>, decimals: usize) -> String {
    match score.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.*}", decimals, v),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn text_or_na(text: Option<&str>) -> String {
    text.filter(|t| !t.is_empty()).unwrap_or(NOT_AVAILABLE).to_string()
}

/// Non-blank items, or `None` when absent, empty, or all blank.
pub fn list_or_na(items: Option<&[String]>) -> Option<Vec<String>> {
    let kept: Vec<String> = items
        .unwrap_or(&[])
        .iter()
        .filter(|item| !item.trim().is_empty())
        .cloned()
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept)
    }
}

pub fn render_subject(subject: &Subject<'_>, scope: Scope) -> DetailBlock {
    let mut block = DetailBlock::default();

    if subject.kind == TargetKind::Stock {
        block.lines.push(DetailLine::Note(format!(
            "Articles for LLM ({}): {}",
            scope.suffix().unwrap_or("Ad-hoc"),
            subject.num_articles.map(|n| n.to_string()).unwrap_or_else(|| NOT_AVAILABLE.to_string())
        )));
    }
    if let Some(error) = subject.error.filter(|e| !e.is_empty()) {
        block.lines.push(DetailLine::Error(error.to_string()));
    }

    let vader_value = match subject.avg_vader.filter(|v| v.is_finite()) {
        Some(score) => format!("{} (Score: {:.3})", text_or_na(subject.vader_label), score),
        None => NOT_AVAILABLE.to_string(),
    };
    block.field(scope.label("VADER Avg.", "VADER Avg."), vader_value);

    match subject.llm {
        Some(llm) => push_llm_lines(&mut block, llm, scope),
        None if subject.error.map_or(true, str::is_empty) => {
            block.lines.push(DetailLine::Note(format!(
                "No LLM analysis data available for this {} ({}).",
                subject.kind.as_str(),
                scope.suffix().unwrap_or("Ad-hoc")
            )));
        }
        None => {}
    }

    block
}

/// LLM block for the ad-hoc view, headed by the target name.
pub fn render_adhoc_llm(llm: Option<&LlmAnalysis>, target_name: &str) -> DetailBlock {
    let mut block = DetailBlock::default();
    match llm {
        Some(llm) => {
            block.lines.push(DetailLine::Heading(format!("LLM Analysis for {}", target_name)));
            push_llm_lines(&mut block, llm, Scope::Adhoc);
        }
        None => block.lines.push(DetailLine::Note("No LLM analysis available for this target.".to_string())),
    }
    block
}

fn push_llm_lines(block: &mut DetailBlock, llm: &LlmAnalysis, scope: Scope) {
    block.field(
        scope.label("LLM Overall", "Overall Sentiment"),
        format!(
            "{} (Score: {})",
            text_or_na(llm.overall_sentiment.as_deref()),
            format_score(llm.sentiment_score_llm, 2)
        ),
    );
    block.field(scope.label("LLM Summary", "Summary"), text_or_na(llm.summary.as_deref()));
    block.field(scope.label("LLM Reason", "Reason"), text_or_na(llm.sentiment_reason.as_deref()));

    let list = |scoped: &str, plain: &str, items: &Option<Vec<String>>| DetailLine::List {
        label: scope.label(scoped, plain),
        items: list_or_na(items.as_deref()),
    };
    block.lines.push(list("LLM Key Themes", "Key Themes", &llm.key_themes));
    block.field(
        scope.label("LLM Potential Impact", "Potential Impact"),
        text_or_na(llm.potential_impact.as_deref()),
    );
    block.lines.push(list("LLM Companies/Context", "Companies/Context", &llm.key_companies_mentioned_context));
    block.lines.push(list("LLM Risks", "Risks", &llm.risks_identified));
    block.lines.push(list("LLM Opportunities", "Opportunities", &llm.opportunities_identified));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sector() -> SectorResult {
        SectorResult {
            sector_name: "Tech".into(),
            avg_vader_score_sector: Some(0.42),
            vader_sentiment_label_sector: Some("Positive".into()),
            gemini_analysis_sector: Some(LlmAnalysis {
                sentiment_score_llm: Some(-0.2),
                overall_sentiment: Some("Negative".into()),
                summary: Some("x".into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_sector_scores_are_formatted() {
        let result = sample_sector();
        let lines = render_subject(&Subject::from(&result), Scope::Batch).text_lines();
        assert!(lines.contains(&"VADER Avg. (Batch): Positive (Score: 0.420)".to_string()));
        assert!(lines.contains(&"LLM Overall (Batch): Negative (Score: -0.20)".to_string()));
        assert!(lines.contains(&"LLM Summary (Batch): x".to_string()));
    }

    #[test]
    fn test_lists_render_na_uniformly() {
        let mut result = sample_sector();
        if let Some(llm) = result.gemini_analysis_sector.as_mut() {
            llm.key_themes = None;
            llm.key_companies_mentioned_context = Some(vec![]);
            llm.risks_identified = Some(vec!["  ".into(), String::new()]);
            llm.opportunities_identified = Some(vec!["exports".into(), " ".into()]);
        }
        let lines = render_subject(&Subject::from(&result), Scope::Batch).text_lines();
        assert!(lines.contains(&"LLM Key Themes (Batch): N/A".to_string()));
        assert!(lines.contains(&"LLM Companies/Context (Batch): N/A".to_string()));
        assert!(lines.contains(&"LLM Risks (Batch): N/A".to_string()));
        assert!(lines.contains(&"LLM Opportunities (Batch): exports".to_string()));
    }

    #[test]
    fn test_missing_scores_render_na() {
        let result = SectorResult { sector_name: "Energy".into(), ..Default::default() };
        let lines = render_subject(&Subject::from(&result), Scope::Batch).text_lines();
        assert_eq!(lines[0], "VADER Avg. (Batch): N/A");
        assert_eq!(lines[1], "No LLM analysis data available for this sector (Batch).");
    }

    #[test]
    fn test_stock_block_reports_article_count_and_error() {
        let result = StockResult {
            stock_name: "TCS".into(),
            num_articles_for_llm_stock: Some(3),
            error_message_stock: Some("No relevant articles".into()),
            ..Default::default()
        };
        let lines = render_subject(&Subject::from(&result), Scope::StockAnalysis).text_lines();
        assert_eq!(lines[0], "Articles for LLM (Stock Analysis): 3");
        assert_eq!(lines[1], "Error: No relevant articles");
        assert_eq!(lines[2], "VADER Avg. (Stock Analysis): N/A");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_adhoc_llm_block_uses_plain_labels() {
        let llm = LlmAnalysis {
            overall_sentiment: Some("Neutral".into()),
            sentiment_score_llm: None,
            key_themes: Some(vec!["rates".into()]),
            ..Default::default()
        };
        let lines = render_adhoc_llm(Some(&llm), "HDFCBANK").text_lines();
        assert_eq!(lines[0], "LLM Analysis for HDFCBANK");
        assert_eq!(lines[1], "Overall Sentiment: Neutral (Score: N/A)");
        assert!(lines.contains(&"Key Themes: rates".to_string()));

        let lines = render_adhoc_llm(None, "HDFCBANK").text_lines();
        assert_eq!(lines, vec!["No LLM analysis available for this target.".to_string()]);
    }
}
