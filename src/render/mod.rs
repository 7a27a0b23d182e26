// src/render/mod.rs
pub mod adhoc;
pub mod chart;
pub mod detail;
pub mod sector;

pub use adhoc::{render_adhoc, AdhocView, ArticleTable};
pub use chart::LiveChart;
pub use detail::{DetailBlock, DetailLine};
pub use sector::{render_sector_batch, render_stock_results, Drilldown, DrilldownResults, SectorCard};
