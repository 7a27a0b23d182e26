// src/state/orchestrator.rs
//
// Submission lifecycle. Each user action is split into a synchronous `begin_*`
// step that mutates state and yields a `Pending` request, the network call
// (`run`), and a synchronous `complete` step that applies the reply. Only the
// middle step runs off the UI thread.
use log::{debug, warn};
use uuid::Uuid;

use super::{AppState, Phase, ResultsView, Summary, IDLE_SUMMARY};
use crate::api::envelope::{Failure, Verdict};
use crate::api::models::AdhocTarget;
use crate::api::{dispatch, ApiReply, ApiRequest, Backend, ClientError};
use crate::render::{render_adhoc, render_sector_batch, render_stock_results, Drilldown, DrilldownResults};
use crate::state::form::OperationMode;

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    SectorBatch,
    Adhoc(AdhocTarget),
    Drilldown { card: Uuid, sector_name: String },
    UpdateApiKeys,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::SectorBatch => OperationMode::SectorBatch.as_str(),
            Operation::Adhoc(_) => OperationMode::Adhoc.as_str(),
            Operation::Drilldown { .. } => "sub-stock analysis",
            Operation::UpdateApiKeys => "update API keys",
        }
    }

    fn is_top_level(&self) -> bool {
        matches!(self, Operation::SectorBatch | Operation::Adhoc(_))
    }

    /// Key updates touch no rendered results and can never go stale.
    fn is_generation_bound(&self) -> bool {
        !matches!(self, Operation::UpdateApiKeys)
    }
}

/// Identifies an in-flight request and the results generation it was issued for.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub generation: u64,
    pub operation: Operation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pending {
    pub ticket: Ticket,
    pub request: ApiRequest,
}

#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub result: Result<ApiReply, ClientError>,
}

/// Perform the network half of a pending operation.
pub async fn run<B: Backend + ?Sized>(backend: &B, pending: Pending) -> Completion {
    let result = dispatch(backend, &pending.request).await;
    Completion { ticket: pending.ticket, result }
}

fn server_error(status: u16) -> String {
    format!("Server error: {}.", status)
}

impl AppState {
    fn ticket(&self, operation: Operation) -> Ticket {
        Ticket { generation: self.generation, operation }
    }

    /// Switch operation mode: previous results, charts and errors are dropped.
    pub fn set_mode(&mut self, mode: OperationMode) {
        self.form.mode = mode;
        self.generation += 1;
        self.clear_results();
        self.summary = Summary::info(IDLE_SUMMARY);
    }

    /// Idle -> Submitting. `None` while a top-level submission is outstanding.
    pub fn begin_submission(&mut self) -> Option<Pending> {
        if self.phase == Phase::Submitting {
            debug!("Submission ignored: another one is in flight");
            return None;
        }

        self.generation += 1;
        self.clear_results();
        self.phase = Phase::Submitting;
        self.in_flight += 1;
        self.summary = Summary::info("Processing request...");
        self.logs.info(format!("Starting operation: {}", self.form.mode.as_str()));

        let request = self.form.build_request(&self.settings);
        let operation = match &request {
            ApiRequest::Adhoc(adhoc) => Operation::Adhoc(adhoc.target.clone()),
            _ => Operation::SectorBatch,
        };
        Some(Pending { ticket: self.ticket(operation), request })
    }

    /// Start a drill-down for one sector card. Other cards are untouched.
    pub fn begin_drilldown(&mut self, card_id: Uuid) -> Option<Pending> {
        let generation = self.generation;
        let Some(card) = self.sector_card_mut(&card_id) else {
            warn!("Drill-down requested for unknown sector card {}", card_id);
            return None;
        };
        let sector_name = card.sector_name.clone();
        let Drilldown::Available(selector) = &mut card.drilldown else {
            return None;
        };
        if selector.in_flight {
            return None;
        }

        let selected = selector.selected_stocks();
        if selected.is_empty() {
            let note = format!("Please select stocks for {}.", sector_name);
            selector.note = Some(note.clone());
            self.logs.warning(note);
            return None;
        }

        selector.in_flight = true;
        selector.note = None;
        self.in_flight += 1;
        self.logs.info(format!(
            "Starting sub-stock analysis for {} ({}). Dates: {}-{}",
            sector_name,
            selected.join(", "),
            self.form.start_date,
            self.form.end_date
        ));

        let request = self.form.drilldown_request(&sector_name, selected, &self.settings);
        Some(Pending {
            ticket: Ticket {
                generation,
                operation: Operation::Drilldown { card: card_id, sector_name },
            },
            request,
        })
    }

    pub fn begin_api_key_update(&mut self) -> Option<Pending> {
        let payload = self.api_keys.to_request();
        if payload.is_empty() {
            self.logs.warning("No API keys entered to update.");
            return None;
        }
        self.in_flight += 1;
        Some(Pending {
            ticket: self.ticket(Operation::UpdateApiKeys),
            request: ApiRequest::UpdateApiKeys(payload),
        })
    }

    /// Apply a finished request. Busy state is always released, server logs are
    /// always appended; results are applied only if the ticket is still current.
    pub fn complete(&mut self, completion: Completion) {
        let Completion { ticket, result } = completion;

        self.in_flight = self.in_flight.saturating_sub(1);
        if ticket.operation.is_top_level() {
            self.phase = Phase::Idle;
        }
        if let Operation::Drilldown { card, .. } = &ticket.operation {
            if let Some(Drilldown::Available(selector)) = self.sector_card_mut(card).map(|c| &mut c.drilldown) {
                selector.in_flight = false;
            }
        }

        if let Ok(reply) = &result {
            self.logs.extend(reply.logs().iter().cloned());
        }

        if ticket.operation.is_generation_bound() && ticket.generation != self.generation {
            self.logs.warning(format!(
                "Discarding stale response for {} (results were reset).",
                ticket.operation.label()
            ));
            return;
        }

        match ticket.operation {
            Operation::SectorBatch => self.complete_sector_batch(result),
            Operation::Adhoc(target) => self.complete_adhoc(target, result),
            Operation::Drilldown { card, sector_name } => self.complete_drilldown(card, &sector_name, result),
            Operation::UpdateApiKeys => self.complete_api_key_update(result),
        }
    }

    fn client_failure(&mut self, mode: &str, detail: String) {
        let message = format!("Client error ({}): {}", mode, detail);
        self.logs.error(message.clone());
        self.errors.show(vec![message]);
        self.summary = Summary::error("A client-side error occurred.");
    }

    fn complete_sector_batch(&mut self, result: Result<ApiReply, ClientError>) {
        let mode = OperationMode::SectorBatch.as_str();
        let envelope = match result {
            Ok(ApiReply::SectorBatch(envelope)) => envelope,
            Ok(other) => return self.client_failure(mode, format!("unexpected reply {:?}", other)),
            Err(e) => return self.client_failure(mode, e.to_string()),
        };

        match envelope.verdict {
            Verdict::Success(data) => {
                self.summary = Summary::info(format!(
                    "Batch sector analysis complete. Found {} sector result(s).",
                    data.results.len()
                ));
                let cards = render_sector_batch(&data.results, &mut self.charts);
                self.results = ResultsView::Sectors(cards);
            }
            Verdict::Failed(failure) => {
                self.errors.show(failure.messages_or(server_error));
                self.summary = Summary::error("Batch sector analysis failed.");
            }
            Verdict::Malformed(detail) => self.client_failure(mode, detail),
        }
    }

    fn complete_adhoc(&mut self, target: AdhocTarget, result: Result<ApiReply, ClientError>) {
        let mode = OperationMode::Adhoc.as_str();
        let envelope = match result {
            Ok(ApiReply::Adhoc(envelope)) => envelope,
            Ok(other) => return self.client_failure(mode, format!("unexpected reply {:?}", other)),
            Err(e) => return self.client_failure(mode, e.to_string()),
        };

        match envelope.verdict {
            Verdict::Success(data) => {
                self.summary = Summary::info(format!(
                    "Ad-hoc analysis for '{}' complete. Fetched {} articles in total, analyzed {} with LLM.",
                    data.target_name.as_deref().unwrap_or(target.name()),
                    data.all_articles_fetched_count.unwrap_or(0),
                    data.articles_analyzed.len()
                ));
                let view = render_adhoc(&target, &data, &mut self.charts, &mut self.logs);
                self.results = ResultsView::Adhoc(view);
            }
            Verdict::Failed(failure) => {
                self.errors.show(failure.messages_or(server_error));
                self.summary = Summary::error("Ad-hoc analysis/scrape failed.");
            }
            Verdict::Malformed(detail) => self.client_failure(mode, detail),
        }
    }

    fn complete_drilldown(&mut self, card_id: Uuid, sector_name: &str, result: Result<ApiReply, ClientError>) {
        let outcome = match result {
            Ok(ApiReply::StockDrilldown(envelope)) => match envelope.verdict {
                Verdict::Success(data) => render_stock_results(&data.results_stocks),
                Verdict::Failed(Failure { status, messages, .. }) => {
                    let messages = messages
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| vec![format!("Sub-stock analysis server error: {}", status)]);
                    self.errors.show(messages);
                    DrilldownResults::Failed("Sub-stock analysis failed.".to_string())
                }
                Verdict::Malformed(detail) => self.drilldown_client_failure(detail),
            },
            Ok(other) => self.drilldown_client_failure(format!("unexpected reply {:?}", other)),
            Err(e) => self.drilldown_client_failure(e.to_string()),
        };

        match self.sector_card_mut(&card_id).map(|card| &mut card.drilldown) {
            Some(Drilldown::Available(selector)) => selector.results = outcome,
            _ => warn!("Sector card for {} no longer exists; drill-down result dropped", sector_name),
        }
    }

    fn drilldown_client_failure(&mut self, detail: String) -> DrilldownResults {
        self.logs.error(format!("Client error (sub-stock analysis): {}", detail));
        DrilldownResults::Failed("Client error during sub-stock analysis.".to_string())
    }

    fn complete_api_key_update(&mut self, result: Result<ApiReply, ClientError>) {
        let envelope = match result {
            Ok(ApiReply::UpdateApiKeys(envelope)) => envelope,
            Ok(other) => {
                let detail = format!("unexpected reply {:?}", other);
                self.logs.error(format!("Client error updating API keys: {}", detail));
                self.errors.show(vec![format!("Client error: {}", detail)]);
                return;
            }
            Err(e) => {
                self.logs.error(format!("Client error updating API keys: {}", e));
                self.errors.show(vec![format!("Client error: {}", e)]);
                return;
            }
        };

        match envelope.verdict {
            Verdict::Success(data) => {
                self.logs.info(data.message.unwrap_or_else(|| "API Key update response.".to_string()));
                self.errors.clear();
            }
            Verdict::Failed(failure) => {
                self.logs.info(failure.message.clone().unwrap_or_else(|| "API Key update response.".to_string()));
                self.errors.show(vec![failure
                    .message
                    .unwrap_or_else(|| format!("Error: {}", failure.status))]);
            }
            Verdict::Malformed(detail) => {
                debug!("API key reply did not match the expected shape: {}", detail);
                self.logs.info("API Key update response.");
                self.errors.clear();
            }
        }
    }
}
