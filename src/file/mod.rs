// src/file/mod.rs
use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};
use crate::config::{DashboardSettings, SectorCatalog};

pub mod sectors;
pub mod settings;

// Core trait for file operations
pub trait FileHandler<T> {
    fn load(&self, path: &Path) -> Result<T>;
}

pub const APP_DIR_NAME: &str = "sentiment-dashboard";
pub const SETTINGS_FILE_NAME: &str = "settings.ron";

#[derive(Debug)]
pub struct FileManager {
    config_dir: Option<PathBuf>,
    settings_handler: settings::SettingsFileHandler,
    sector_handler: sectors::SectorConfigFileHandler,
}

impl FileManager {
    pub fn new() -> Self {
        Self {
            config_dir: dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME)),
            settings_handler: settings::SettingsFileHandler::new(),
            sector_handler: sectors::SectorConfigFileHandler::new(),
        }
    }

    #[cfg(test)]
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self {
            config_dir: Some(config_dir),
            ..Self::new()
        }
    }

    pub fn settings_path(&self) -> Option<PathBuf> {
        self.config_dir.as_ref().map(|dir| dir.join(SETTINGS_FILE_NAME))
    }

    /// Missing file means defaults; an unreadable one is reported to the caller.
    pub fn load_settings(&self) -> Result<DashboardSettings> {
        match self.settings_path() {
            Some(path) if path.exists() => self.settings_handler.load(&path),
            _ => Ok(DashboardSettings::default()),
        }
    }

    pub fn load_sector_catalog(&self, path: &Path) -> Result<SectorCatalog> {
        if !path.exists() {
            return Err(anyhow!("Sector config file not found: {}", path.display()));
        }
        self.sector_handler.load(path)
    }
}
