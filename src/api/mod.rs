// src/api/mod.rs
pub mod client;
pub mod envelope;
pub mod models;

use thiserror::Error;

pub use client::{dispatch, ApiReply, ApiRequest, Backend, HttpBackend};

pub const UPDATE_API_KEYS_PATH: &str = "/api/update-api-keys";
pub const SECTOR_ANALYSIS_PATH: &str = "/api/sector-analysis";
pub const ADHOC_ANALYSIS_PATH: &str = "/api/adhoc-analysis-scrape";
pub const STOCK_ANALYSIS_PATH: &str = "/api/stock-analysis";

/// Client-side failures: the request never produced a usable server verdict.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to initialize HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Network error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Response is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Response body is not a JSON object (HTTP {0})")]
    UnexpectedBody(u16),

    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
}
