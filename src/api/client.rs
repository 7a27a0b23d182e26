// src/api/client.rs
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use std::time::Duration;

use super::envelope::{Envelope, RawReply};
use super::models::{
    AdhocData, AdhocRequest, ApiKeysData, ApiKeysRequest, LogEntry, SectorBatchData,
    SectorBatchRequest, StockDrilldownData, StockDrilldownRequest,
};
use super::{
    ClientError, ADHOC_ANALYSIS_PATH, SECTOR_ANALYSIS_PATH, STOCK_ANALYSIS_PATH,
    UPDATE_API_KEYS_PATH,
};
use crate::config::DashboardSettings;

/// Transport seam to the analysis backend. One call is one HTTP `POST` with a JSON body.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<RawReply, ClientError>;
}

/// reqwest-backed [`Backend`] talking to the dashboard server.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(settings: &DashboardSettings) -> Result<Self, ClientError> {
        // Only the connect phase is bounded; a stalled response is left to the transport.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            client,
            base_url: settings.backend_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<RawReply, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[Backend] POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .json(&body)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(ClientError::Transport)?;
        debug!("[Backend] {} -> HTTP {} ({} bytes)", path, status, body.len());

        Ok(RawReply { status, body })
    }
}

/// One of the four backend operations, with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    UpdateApiKeys(ApiKeysRequest),
    SectorBatch(SectorBatchRequest),
    Adhoc(AdhocRequest),
    StockDrilldown(StockDrilldownRequest),
}

impl ApiRequest {
    pub fn path(&self) -> &'static str {
        match self {
            ApiRequest::UpdateApiKeys(_) => UPDATE_API_KEYS_PATH,
            ApiRequest::SectorBatch(_) => SECTOR_ANALYSIS_PATH,
            ApiRequest::Adhoc(_) => ADHOC_ANALYSIS_PATH,
            ApiRequest::StockDrilldown(_) => STOCK_ANALYSIS_PATH,
        }
    }

    pub fn body(&self) -> Result<serde_json::Value, ClientError> {
        match self {
            ApiRequest::UpdateApiKeys(p) => to_body(p),
            ApiRequest::SectorBatch(p) => to_body(p),
            ApiRequest::Adhoc(p) => to_body(p),
            ApiRequest::StockDrilldown(p) => to_body(p),
        }
    }
}

fn to_body<T: Serialize>(payload: &T) -> Result<serde_json::Value, ClientError> {
    serde_json::to_value(payload).map_err(ClientError::Encode)
}

/// Decoded reply, typed by the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply {
    UpdateApiKeys(Envelope<ApiKeysData>),
    SectorBatch(Envelope<SectorBatchData>),
    Adhoc(Envelope<AdhocData>),
    StockDrilldown(Envelope<StockDrilldownData>),
}

impl ApiReply {
    /// Server log entries carried by the reply, in order.
    pub fn logs(&self) -> &[LogEntry] {
        match self {
            ApiReply::UpdateApiKeys(env) => &env.logs,
            ApiReply::SectorBatch(env) => &env.logs,
            ApiReply::Adhoc(env) => &env.logs,
            ApiReply::StockDrilldown(env) => &env.logs,
        }
    }
}

/// Send exactly one request and decode its reply. No retries.
pub async fn dispatch<B: Backend + ?Sized>(backend: &B, request: &ApiRequest) -> Result<ApiReply, ClientError> {
    let raw = backend.post_json(request.path(), request.body()?).await?;

    Ok(match request {
        ApiRequest::UpdateApiKeys(_) => ApiReply::UpdateApiKeys(Envelope::decode(raw)?),
        ApiRequest::SectorBatch(_) => ApiReply::SectorBatch(Envelope::decode(raw)?),
        ApiRequest::Adhoc(_) => ApiReply::Adhoc(Envelope::decode(raw)?),
        ApiRequest::StockDrilldown(_) => ApiReply::StockDrilldown(Envelope::decode(raw)?),
    })
}
