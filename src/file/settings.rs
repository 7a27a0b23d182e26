// src/file/settings.rs
use super::FileHandler;
use crate::config::DashboardSettings;
use std::path::Path;
use std::fs;
use anyhow::{Result, Context};

#[derive(Debug)]
pub struct SettingsFileHandler;

impl SettingsFileHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FileHandler<DashboardSettings> for SettingsFileHandler {
    fn load(&self, path: &Path) -> Result<DashboardSettings> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        ron::from_str(&content).context("Failed to parse settings file")
    }
}
