// src/state/form.rs
use chrono::{Duration, Local, NaiveDate};

use crate::api::models::{
    AdhocRequest, AdhocTarget, ApiKeysRequest, SectorBatchRequest, StockDrilldownRequest, TargetKind,
};
use crate::api::ApiRequest;
use crate::config::DashboardSettings;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    SectorBatch,
    Adhoc,
}

impl OperationMode {
    pub const ALL: [OperationMode; 2] = [OperationMode::SectorBatch, OperationMode::Adhoc];

    /// Wire name, also used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationMode::SectorBatch => "sector_batch_analysis",
            OperationMode::Adhoc => "stock_adhoc_analysis_scrape",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OperationMode::SectorBatch => "Batch Sector Analysis",
            OperationMode::Adhoc => "Ad-hoc Analysis & Scrape",
        }
    }
}

/// Everything the user can type into the main form. Values are kept as
/// entered and only interpreted when a request is built.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub mode: OperationMode,

    // Shared
    pub start_date: String,
    pub end_date: String,
    pub max_articles: String,
    pub custom_prompt: String,

    // Sector batch
    pub selected_sectors: Vec<String>,

    // Ad-hoc
    pub target_name: String,
    pub target_kind: TargetKind,
    pub news_source: String,
    pub trigger_scrape: bool,
    pub scrape_domains: String,
}

impl FormState {
    pub fn new(settings: &DashboardSettings) -> Self {
        let today = Local::now().date_naive();
        Self::with_dates(settings, today - Duration::days(6), today)
    }

    pub fn with_dates(settings: &DashboardSettings, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            mode: OperationMode::SectorBatch,
            start_date: start.format(DATE_FORMAT).to_string(),
            end_date: end.format(DATE_FORMAT).to_string(),
            max_articles: settings.default_max_articles.to_string(),
            custom_prompt: String::new(),
            selected_sectors: Vec::new(),
            target_name: String::new(),
            target_kind: TargetKind::Stock,
            news_source: settings.default_news_source(),
            trigger_scrape: false,
            scrape_domains: String::new(),
        }
    }

    pub fn is_sector_selected(&self, sector: &str) -> bool {
        self.selected_sectors.iter().any(|s| s == sector)
    }

    pub fn set_sector_selected(&mut self, sector: &str, picked: bool) {
        let present = self.is_sector_selected(sector);
        if picked && !present {
            self.selected_sectors.push(sector.to_string());
        } else if !picked && present {
            self.selected_sectors.retain(|s| s != sector);
        }
    }

    /// Falls back to the configured default when the field is not a positive integer.
    pub fn max_articles(&self, settings: &DashboardSettings) -> u32 {
        self.max_articles
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .unwrap_or(settings.default_max_articles)
    }

    /// Payload for the active mode. Fields of the other mode are not read.
    pub fn build_request(&self, settings: &DashboardSettings) -> ApiRequest {
        match self.mode {
            OperationMode::SectorBatch => ApiRequest::SectorBatch(SectorBatchRequest {
                selected_sectors: normalize_list(&self.selected_sectors),
                start_date: self.start_date.trim().to_string(),
                end_date: self.end_date.trim().to_string(),
                sector_max_articles: self.max_articles(settings),
                sector_custom_prompt: self.custom_prompt.clone(),
            }),
            OperationMode::Adhoc => ApiRequest::Adhoc(AdhocRequest {
                target: self.adhoc_target(),
                start_date: self.start_date.trim().to_string(),
                end_date: self.end_date.trim().to_string(),
                news_source_priority: self.news_source.clone(),
                trigger_scrape: self.trigger_scrape,
                scrape_domains: if self.trigger_scrape {
                    split_domains(&self.scrape_domains)
                } else {
                    Vec::new()
                },
                max_articles_llm: self.max_articles(settings),
                custom_prompt_llm: self.custom_prompt.clone(),
            }),
        }
    }

    pub fn adhoc_target(&self) -> AdhocTarget {
        AdhocTarget::for_kind(self.target_kind, self.target_name.trim())
    }

    pub fn drilldown_request(
        &self,
        sector_name: &str,
        selected_stocks: Vec<String>,
        settings: &DashboardSettings,
    ) -> ApiRequest {
        ApiRequest::StockDrilldown(StockDrilldownRequest {
            sector_name: sector_name.to_string(),
            selected_stocks: normalize_list(&selected_stocks),
            start_date: self.start_date.trim().to_string(),
            end_date: self.end_date.trim().to_string(),
            lookback_days: lookback_days(&self.start_date, &self.end_date),
            stock_max_articles: self.max_articles(settings),
            custom_prompt: self.custom_prompt.clone(),
        })
    }
}

/// Trimmed, non-empty items in their original order.
pub fn normalize_list<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.as_ref().trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn split_domains(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|domain| !domain.is_empty())
        .map(str::to_string)
        .collect()
}

/// Inclusive day count between two `YYYY-MM-DD` dates, or the default when
/// either date is unparseable or the range is reversed.
pub fn lookback_days(start: &str, end: &str) -> u32 {
    let parse = |raw: &str| NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok();
    match (parse(start), parse(end)) {
        (Some(start), Some(end)) if end >= start => {
            u32::try_from((end - start).num_days() + 1).unwrap_or(DEFAULT_LOOKBACK_DAYS)
        }
        _ => DEFAULT_LOOKBACK_DAYS,
    }
}

/// Session API keys as typed in the key dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiKeyInputs {
    pub gemini_key: String,
    pub newsapi_key: String,
}

impl ApiKeyInputs {
    /// Only non-blank keys are sent.
    pub fn to_request(&self) -> ApiKeysRequest {
        let key = |raw: &str| Some(raw.trim().to_string()).filter(|k| !k.is_empty());
        ApiKeysRequest {
            gemini_key: key(&self.gemini_key),
            newsapi_key: key(&self.newsapi_key),
        }
    }
}
