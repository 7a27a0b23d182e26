// src/state/log_buffer.rs
use std::collections::VecDeque;

use crate::api::models::{LogEntry, LogLevel};

pub const MAX_LOG_ENTRIES: usize = 300;

/// Local wall-clock time as shown in the log panel, e.g. `14:03:07.251`.
pub fn now_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S%.3f").to_string()
}

/// One formatted row of the log panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub prefix: String,
    pub level: LogLevel,
    pub message: String,
}

impl LogLine {
    pub fn text(&self) -> String {
        format!("{} {}", self.prefix, self.message)
    }
}

#[derive(Debug, Default)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    scroll_pending: bool,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push one entry, evicting the oldest beyond [`MAX_LOG_ENTRIES`].
    pub fn append(&mut self, entry: LogEntry) {
        match entry.level {
            LogLevel::Error => log::error!("UI_LOG: {}", entry.message),
            LogLevel::Warning => log::warn!("UI_LOG: {}", entry.message),
            LogLevel::Info | LogLevel::Unknown => log::info!("UI_LOG: {}", entry.message),
        }

        self.entries.push_back(entry);
        while self.entries.len() > MAX_LOG_ENTRIES {
            self.entries.pop_front();
        }
        self.scroll_pending = true;
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = LogEntry>) {
        for entry in entries {
            self.append(entry);
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.append(LogEntry::new(now_timestamp(), LogLevel::Info, message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.append(LogEntry::new(now_timestamp(), LogLevel::Warning, message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.append(LogEntry::new(now_timestamp(), LogLevel::Error, message));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.info("UI Logs cleared.");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Full redraw of the panel contents; calling it twice yields the same lines.
    pub fn render(&self) -> Vec<LogLine> {
        self.entries
            .iter()
            .map(|entry| LogLine {
                prefix: format!("[{}] [{}]", entry.timestamp, entry.level.as_str()),
                level: entry.level,
                message: entry.message.clone(),
            })
            .collect()
    }

    /// True once after each change; the panel scrolls to the bottom when it sees it.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> LogEntry {
        LogEntry::new("00:00:00.000", LogLevel::Info, format!("entry {}", n))
    }

    #[test]
    fn test_buffer_is_capped_with_fifo_eviction() {
        let mut logs = LogBuffer::new();
        for n in 0..750 {
            logs.append(entry(n));
            assert!(logs.len() <= MAX_LOG_ENTRIES);
        }
        assert_eq!(logs.len(), MAX_LOG_ENTRIES);

        let messages: Vec<_> = logs.entries().map(|e| e.message.clone()).collect();
        let expected: Vec<_> = (450..750).map(|n| format!("entry {}", n)).collect();
        assert_eq!(messages, expected);
    }

    #[test]
    fn test_clear_leaves_only_the_notice() {
        let mut logs = LogBuffer::new();
        for n in 0..10 {
            logs.append(entry(n));
        }
        logs.clear();
        assert_eq!(logs.len(), 1);
        let only = logs.entries().next().unwrap();
        assert_eq!(only.message, "UI Logs cleared.");
        assert_eq!(only.level, LogLevel::Info);
    }

    #[test]
    fn test_render_is_idempotent_and_formatted() {
        let mut logs = LogBuffer::new();
        logs.append(LogEntry::new("12:00:00.001", LogLevel::Warning, "careful <b>"));
        logs.append(LogEntry::new("12:00:00.002", LogLevel::Unknown, "odd"));

        let first = logs.render();
        assert_eq!(first, logs.render());
        assert_eq!(first[0].text(), "[12:00:00.001] [WARNING] careful <b>");
        assert_eq!(first[1].text(), "[12:00:00.002] [UNKNOWN] odd");
    }

    #[test]
    fn test_scroll_request_is_consumed() {
        let mut logs = LogBuffer::new();
        assert!(!logs.take_scroll_request());
        logs.info("hello");
        assert!(logs.take_scroll_request());
        assert!(!logs.take_scroll_request());
    }
}
