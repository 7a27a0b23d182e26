// src/state/error_panel.rs

/// User-facing error list. Content is always replaced wholesale and drawn as plain text.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ErrorPanel {
    messages: Vec<String>,
}

impl ErrorPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, messages: Vec<String>) {
        self.messages = messages;
    }

    pub fn clear(&mut self) {
        self.show(Vec::new());
    }

    pub fn is_visible(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn items(&self) -> &[String] {
        &self.messages
    }
}
