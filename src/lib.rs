pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod sources;

pub use models::{AnalysisReport, AnalysisResponse};
pub use services::{Analyzer, Providers};
