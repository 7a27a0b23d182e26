// src/config/mod.rs
pub mod sectors;
pub mod settings;

// Re-export commonly used types
pub use sectors::SectorCatalog;
pub use settings::DashboardSettings;
