// src/api/envelope.rs
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::models::LogEntry;
use super::ClientError;

/// Raw HTTP reply as handed back by a [`super::Backend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawReply {
    pub status: u16,
    pub body: String,
}

/// Server-signalled failure: non-2xx status or a truthy `error` field.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub status: u16,
    pub error: Value,
    pub messages: Option<Vec<String>>,
    pub message: Option<String>,
}

impl Failure {
    /// `messages` when the server sent any, else the `error` text, else `fallback(status)`.
    pub fn messages_or(&self, fallback: impl FnOnce(u16) -> String) -> Vec<String> {
        if let Some(messages) = self.messages.as_ref().filter(|m| !m.is_empty()) {
            return messages.clone();
        }
        match &self.error {
            Value::String(text) if !text.trim().is_empty() => vec![text.clone()],
            _ => vec![fallback(self.status)],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict<T> {
    Success(T),
    Failed(Failure),
    /// 2xx without an error flag, but the body did not match the expected shape.
    Malformed(String),
}

/// A decoded response: the `logs` it carried plus the success/failure verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub status: u16,
    pub logs: Vec<LogEntry>,
    pub verdict: Verdict<T>,
}

impl<T: DeserializeOwned> Envelope<T> {
    pub fn decode(reply: RawReply) -> Result<Self, ClientError> {
        let value: Value = serde_json::from_str(&reply.body).map_err(ClientError::Decode)?;
        let Value::Object(mut map) = value else {
            return Err(ClientError::UnexpectedBody(reply.status));
        };

        let logs = take_logs(&mut map);
        let error = map.remove("error").unwrap_or(Value::Null);
        let messages = map.remove("messages").and_then(text_list);

        let verdict = if !is_success_status(reply.status) || is_truthy(&error) {
            let message = map.get("message").and_then(|m| m.as_str()).map(str::to_string);
            Verdict::Failed(Failure {
                status: reply.status,
                error,
                messages,
                message,
            })
        } else {
            match serde_json::from_value::<T>(Value::Object(map)) {
                Ok(data) => Verdict::Success(data),
                Err(e) => Verdict::Malformed(e.to_string()),
            }
        };

        Ok(Self {
            status: reply.status,
            logs,
            verdict,
        })
    }
}

pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// JSON truthiness as a browser client would judge it.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn take_logs(map: &mut Map<String, Value>) -> Vec<LogEntry> {
    match map.remove("logs") {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<LogEntry>(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping malformed log entry in response: {}", e);
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn text_list(value: Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
        ),
        Value::String(s) => Some(vec![s]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{LogLevel, SectorBatchData};
    use serde_json::json;

    fn reply(status: u16, body: Value) -> RawReply {
        RawReply { status, body: body.to_string() }
    }

    #[test]
    fn test_error_flag_fails_even_on_200() {
        let env: Envelope<SectorBatchData> = Envelope::decode(reply(200, json!({
            "error": true,
            "messages": ["Please select at least one sector."],
            "logs": [{"timestamp": "t", "message": "m", "level": "INFO"}],
            "results": []
        }))).unwrap();
        assert_eq!(env.logs.len(), 1);
        assert_eq!(env.logs[0].level, LogLevel::Info);
        match env.verdict {
            Verdict::Failed(failure) => {
                assert_eq!(
                    failure.messages_or(|s| format!("Server error: {}.", s)),
                    vec!["Please select at least one sector.".to_string()]
                );
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_false_error_with_2xx_is_success() {
        let env: Envelope<SectorBatchData> = Envelope::decode(reply(200, json!({
            "error": false,
            "results": [{"sector_name": "Tech"}]
        }))).unwrap();
        match env.verdict {
            Verdict::Success(data) => assert_eq!(data.results[0].sector_name, "Tech"),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_fallback_messages() {
        let env: Envelope<SectorBatchData> = Envelope::decode(reply(500, json!({}))).unwrap();
        let Verdict::Failed(failure) = env.verdict else { panic!("expected failure") };
        assert_eq!(failure.messages_or(|s| format!("Server error: {}.", s)), vec!["Server error: 500.".to_string()]);

        let env: Envelope<SectorBatchData> = Envelope::decode(reply(200, json!({ "error": "quota exhausted" }))).unwrap();
        let Verdict::Failed(failure) = env.verdict else { panic!("expected failure") };
        assert_eq!(failure.messages_or(|s| format!("Server error: {}.", s)), vec!["quota exhausted".to_string()]);
    }

    #[test]
    fn test_non_json_body_is_client_error() {
        let result = Envelope::<SectorBatchData>::decode(RawReply { status: 502, body: "<html>Bad gateway</html>".into() });
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!(1)));
    }
}
