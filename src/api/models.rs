// src/api/models.rs
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

// Log entries

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    #[default]
    Unknown,
}

impl LogLevel {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_uppercase()).as_deref() {
            Some("INFO") => LogLevel::Info,
            Some("WARNING") | Some("WARN") => LogLevel::Warning,
            Some("ERROR") => LogLevel::Error,
            _ => LogLevel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Unknown => "UNKNOWN",
        }
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(LogLevel::parse(raw.as_deref()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default, deserialize_with = "lenient_text_or_empty")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "lenient_text_or_empty")]
    pub message: String,
    #[serde(default)]
    pub level: LogLevel,
}

impl LogEntry {
    pub fn new(timestamp: impl Into<String>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            message: message.into(),
            level,
        }
    }
}

// Target tagging

/// Whether an analysis result describes a whole sector or a single instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Sector,
    Stock,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Sector => "sector",
            TargetKind::Stock => "stock",
        }
    }
}

/// Ad-hoc analysis target; serialized flat as `target_type` + `target_name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "target_type", rename_all = "lowercase")]
pub enum AdhocTarget {
    Stock { target_name: String },
    Sector { target_name: String },
}

impl AdhocTarget {
    pub fn stock(name: impl Into<String>) -> Self {
        AdhocTarget::Stock { target_name: name.into() }
    }

    pub fn sector(name: impl Into<String>) -> Self {
        AdhocTarget::Sector { target_name: name.into() }
    }

    pub fn for_kind(kind: TargetKind, name: impl Into<String>) -> Self {
        match kind {
            TargetKind::Stock => AdhocTarget::stock(name),
            TargetKind::Sector => AdhocTarget::sector(name),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            AdhocTarget::Stock { target_name } | AdhocTarget::Sector { target_name } => target_name,
        }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            AdhocTarget::Stock { .. } => TargetKind::Stock,
            AdhocTarget::Sector { .. } => TargetKind::Sector,
        }
    }
}

// Request payloads

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ApiKeysRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newsapi_key: Option<String>,
}

impl ApiKeysRequest {
    pub fn is_empty(&self) -> bool {
        self.gemini_key.is_none() && self.newsapi_key.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorBatchRequest {
    pub selected_sectors: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    pub sector_max_articles: u32,
    pub sector_custom_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdhocRequest {
    #[serde(flatten)]
    pub target: AdhocTarget,
    pub start_date: String,
    pub end_date: String,
    pub news_source_priority: String,
    pub trigger_scrape: bool,
    pub scrape_domains: Vec<String>,
    pub max_articles_llm: u32,
    pub custom_prompt_llm: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockDrilldownRequest {
    pub sector_name: String,
    pub selected_stocks: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    pub lookback_days: u32,
    pub stock_max_articles: u32,
    pub custom_prompt: String,
}

// Response payloads

/// Structured output of the language-model analysis. Every field is optional
/// and tolerant of loosely-typed values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LlmAnalysis {
    #[serde(deserialize_with = "lenient_text")]
    pub overall_sentiment: Option<String>,
    #[serde(deserialize_with = "lenient_score")]
    pub sentiment_score_llm: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub sentiment_reason: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub potential_impact: Option<String>,
    #[serde(deserialize_with = "lenient_text_list")]
    pub key_themes: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_text_list")]
    pub key_companies_mentioned_context: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_text_list")]
    pub risks_identified: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_text_list")]
    pub opportunities_identified: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SectorResult {
    #[serde(deserialize_with = "lenient_text_or_empty")]
    pub sector_name: String,
    #[serde(deserialize_with = "lenient_llm")]
    pub gemini_analysis_sector: Option<LlmAnalysis>,
    #[serde(deserialize_with = "lenient_score")]
    pub avg_vader_score_sector: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub vader_sentiment_label_sector: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub num_articles_for_llm_sector: Option<u32>,
    #[serde(deserialize_with = "lenient_text")]
    pub error_message_sector: Option<String>,
    #[serde(deserialize_with = "lenient_names")]
    pub constituent_stocks: Vec<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub llm_context_date_range: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StockResult {
    #[serde(deserialize_with = "lenient_text_or_empty")]
    pub stock_name: String,
    #[serde(deserialize_with = "lenient_llm")]
    pub gemini_analysis_stock: Option<LlmAnalysis>,
    #[serde(deserialize_with = "lenient_score")]
    pub avg_vader_score_stock: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub vader_sentiment_label_stock: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub num_articles_for_llm_stock: Option<u32>,
    #[serde(deserialize_with = "lenient_text")]
    pub error_message_stock: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub llm_context_date_range: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Article {
    #[serde(deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub source: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub content: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub uri: Option<String>,
    #[serde(deserialize_with = "lenient_score")]
    pub vader_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailySentiment {
    #[serde(deserialize_with = "lenient_text_or_empty")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_score")]
    pub avg_sentiment_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PricePoint {
    #[serde(deserialize_with = "lenient_text_or_empty")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_score")]
    pub close_price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiKeysData {
    #[serde(deserialize_with = "lenient_text")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SectorBatchData {
    #[serde(deserialize_with = "lenient_items")]
    pub results: Vec<SectorResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AdhocData {
    #[serde(deserialize_with = "lenient_text")]
    pub target_name: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub all_articles_fetched_count: Option<u64>,
    #[serde(deserialize_with = "lenient_items")]
    pub articles_analyzed: Vec<Article>,
    #[serde(deserialize_with = "lenient_llm")]
    pub llm_analysis: Option<LlmAnalysis>,
    #[serde(deserialize_with = "lenient_series")]
    pub daily_sentiment_data: Option<Vec<DailySentiment>>,
    #[serde(deserialize_with = "lenient_series")]
    pub price_data: Option<Vec<PricePoint>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StockDrilldownData {
    #[serde(deserialize_with = "lenient_items")]
    pub results_stocks: Vec<StockResult>,
    #[serde(deserialize_with = "lenient_text")]
    pub sector_name: Option<String>,
}

// Lenient field decoding

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(value_to_text(Value::deserialize(deserializer)?))
}

fn lenient_text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(value_to_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_text_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .map(|item| value_to_text(item).unwrap_or_default())
                .collect(),
        ),
        _ => None,
    })
}

/// Scores arrive as numbers, numeric strings or null; non-finite values are dropped.
fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let score = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(score.filter(|v| v.is_finite()))
}

/// Counts arrive as integers, integral floats or numeric strings; anything else is absent.
fn lenient_count<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(integral),
        _ => None,
    };
    Ok(count.and_then(|n| T::try_from(n).ok()))
}

fn integral(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64).then(|| value as u64)
}

fn lenient_llm<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<LlmAnalysis>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => match serde_json::from_value(value) {
            Ok(llm) => Some(llm),
            Err(e) => {
                log::warn!("Ignoring unreadable LLM analysis: {}", e);
                None
            }
        },
        Value::Null => None,
        other => {
            log::warn!("Ignoring LLM analysis that is not an object: {}", other);
            None
        }
    })
}

/// Ticker lists keep their non-blank text items.
fn lenient_names<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(value_to_text)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect(),
        _ => Vec::new(),
    })
}

/// Decode a list item by item; unreadable items are skipped so their siblings survive.
fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log::warn!("Skipping unreadable {} in response: {}", short_type_name::<T>(), e);
                None
            }
        })
        .collect()
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

fn lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => decode_items(items),
        Value::Null => Vec::new(),
        other => {
            log::warn!("Expected a list in response, got: {}", other);
            Vec::new()
        }
    })
}

/// Like [`lenient_items`] but keeps "absent" distinct from "empty"; points without a date are dropped.
fn lenient_series<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Dated,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            decode_items::<T>(items)
                .into_iter()
                .filter(|point| !point.date().trim().is_empty())
                .collect(),
        ),
        _ => None,
    })
}

trait Dated {
    fn date(&self) -> &str;
}

impl Dated for DailySentiment {
    fn date(&self) -> &str {
        &self.date
    }
}

impl Dated for PricePoint {
    fn date(&self) -> &str {
        &self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_log_level_parsing() {
        let entry: LogEntry = serde_json::from_value(json!({
            "timestamp": "10:00:00.000", "message": "hi", "level": "warning"
        })).unwrap();
        assert_eq!(entry.level, LogLevel::Warning);

        let entry: LogEntry = serde_json::from_value(json!({
            "timestamp": "10:00:00.000", "message": "hi", "level": "DEBUG"
        })).unwrap();
        assert_eq!(entry.level, LogLevel::Unknown);

        let entry: LogEntry = serde_json::from_value(json!({ "message": "no level" })).unwrap();
        assert_eq!(entry.level, LogLevel::Unknown);
        assert_eq!(entry.timestamp, "");
    }

    #[test]
    fn test_adhoc_request_serializes_flat_target() {
        let request = AdhocRequest {
            target: AdhocTarget::stock("RELIANCE"),
            start_date: "2024-01-01".into(),
            end_date: "2024-01-07".into(),
            news_source_priority: "Local Database (Scraped)".into(),
            trigger_scrape: true,
            scrape_domains: vec!["example.com".into()],
            max_articles_llm: 5,
            custom_prompt_llm: String::new(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["target_type"], "stock");
        assert_eq!(value["target_name"], "RELIANCE");
        assert_eq!(value["scrape_domains"], json!(["example.com"]));
        assert_eq!(value["max_articles_llm"], 5);
    }

    #[test]
    fn test_api_keys_request_omits_blank_keys() {
        let request = ApiKeysRequest { gemini_key: Some("abc".into()), newsapi_key: None };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({ "gemini_key": "abc" }));
    }

    #[test]
    fn test_sector_result_tolerates_loose_values() {
        let result: SectorResult = serde_json::from_value(json!({
            "sector_name": "Tech",
            "avg_vader_score_sector": "0.25",
            "constituent_stocks": null,
            "gemini_analysis_sector": {
                "sentiment_score_llm": 0.4,
                "key_themes": ["ai", null, 3]
            }
        })).unwrap();
        assert_eq!(result.avg_vader_score_sector, Some(0.25));
        assert!(result.constituent_stocks.is_empty());
        let llm = result.gemini_analysis_sector.unwrap();
        assert_eq!(llm.key_themes, Some(vec!["ai".to_string(), String::new(), "3".to_string()]));
        assert_eq!(llm.overall_sentiment, None);
    }

    #[test]
    fn test_odd_optional_fields_degrade_to_absent() {
        let result: SectorResult = serde_json::from_value(json!({
            "sector_name": "Energy",
            "gemini_analysis_sector": "LLM quota exceeded",
            "num_articles_for_llm_sector": 3.0,
            "constituent_stocks": ["CCC", 7, null, " "]
        })).unwrap();
        assert_eq!(result.gemini_analysis_sector, None);
        assert_eq!(result.num_articles_for_llm_sector, Some(3));
        assert_eq!(result.constituent_stocks, vec!["CCC".to_string(), "7".to_string()]);

        let stock: StockResult = serde_json::from_value(json!({
            "stock_name": "AAA",
            "gemini_analysis_stock": [1, 2],
            "num_articles_for_llm_stock": "4"
        })).unwrap();
        assert_eq!(stock.gemini_analysis_stock, None);
        assert_eq!(stock.num_articles_for_llm_stock, Some(4));
    }

    #[test]
    fn test_adhoc_data_skips_points_without_dates() {
        let data: AdhocData = serde_json::from_value(json!({
            "all_articles_fetched_count": 12.5,
            "articles_analyzed": [{"source": "wire"}, "junk"],
            "llm_analysis": 42,
            "daily_sentiment_data": [
                {"avg_sentiment_score": 0.2},
                {"date": null, "avg_sentiment_score": 0.1},
                {"date": "2024-01-02", "avg_sentiment_score": 0.3}
            ],
            "price_data": "unavailable"
        })).unwrap();
        assert_eq!(data.all_articles_fetched_count, None);
        assert_eq!(data.articles_analyzed.len(), 1);
        assert_eq!(data.llm_analysis, None);
        let daily = data.daily_sentiment_data.unwrap();
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].date, "2024-01-02");
        assert_eq!(data.price_data, None);
    }

    #[test]
    fn test_batch_keeps_readable_results() {
        let data: SectorBatchData = serde_json::from_value(json!({
            "results": [{"sector_name": "Tech"}, "not a sector", null]
        })).unwrap();
        assert_eq!(data.results.len(), 1);
        assert_eq!(data.results[0].sector_name, "Tech");
    }
}
