// src/config/settings.rs
use serde::{Serialize, Deserialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardSettings {
    pub backend_url: String,
    pub connect_timeout_secs: u64,
    pub default_max_articles: u32,
    pub news_source_options: Vec<String>,
    pub sector_config_path: Option<PathBuf>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5003".to_string(),
            connect_timeout_secs: 10,
            default_max_articles: 5,
            news_source_options: vec!["Local Database (Scraped)".to_string()],
            sector_config_path: None,
        }
    }
}

impl DashboardSettings {
    pub fn default_news_source(&self) -> String {
        self.news_source_options.first().cloned().unwrap_or_default()
    }
}
