// src/file/sectors.rs
use super::FileHandler;
use crate::config::SectorCatalog;
use std::path::Path;
use std::fs;
use anyhow::{Result, Context};

#[derive(Debug)]
pub struct SectorConfigFileHandler;

impl SectorConfigFileHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FileHandler<SectorCatalog> for SectorConfigFileHandler {
    fn load(&self, path: &Path) -> Result<SectorCatalog> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read sector config from {}", path.display()))?;
        SectorCatalog::parse(&content)
    }
}
