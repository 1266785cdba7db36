// src/application/mod.rs
pub mod analyzer;
pub mod import;
pub mod store;

// Re-export public API
pub use analyzer::MarketAnalyzer;
pub use import::{DeliveryImporter, DeliveryRecord};
pub use store::{AnalysisStore, Progress};
