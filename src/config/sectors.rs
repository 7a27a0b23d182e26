// src/config/sectors.rs
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;

/// Sector → constituent tickers mapping compiled into the binary.
pub const EMBEDDED_SECTOR_CONFIG: &str = include_str!("../../assets/sector_stocks.json");

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectorCatalog {
    sectors: BTreeMap<String, Vec<String>>,
}

impl SectorCatalog {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(anyhow!("Sector-stock configuration not found"));
        }
        let sectors: BTreeMap<String, Vec<String>> = serde_json::from_str(raw)
            .context("Error parsing sector-stock configuration")?;
        Ok(Self { sectors })
    }

    pub fn embedded() -> Result<Self> {
        Self::parse(EMBEDDED_SECTOR_CONFIG)
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn sector_names(&self) -> impl Iterator<Item = &str> {
        self.sectors.keys().map(String::as_str)
    }

    pub fn stocks(&self, sector: &str) -> &[String] {
        self.sectors.get(sector).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_parses() {
        let catalog = SectorCatalog::embedded().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.sector_names().any(|s| s == "Nifty IT"));
        assert_eq!(catalog.stocks("Nifty IT")[0], "TCS");
    }

    #[test]
    fn test_missing_or_broken_config_is_an_error() {
        assert!(SectorCatalog::parse("").is_err());
        assert!(SectorCatalog::parse("{ not json").is_err());
        assert!(SectorCatalog::parse("[1, 2]").is_err());
    }

    #[test]
    fn test_unknown_sector_has_no_stocks() {
        let catalog = SectorCatalog::parse(r#"{"Tech": ["AAA", "BBB"]}"#).unwrap();
        assert_eq!(catalog.stocks("Tech"), &["AAA".to_string(), "BBB".to_string()]);
        assert!(catalog.stocks("Energy").is_empty());
    }
}
