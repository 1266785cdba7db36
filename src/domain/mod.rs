// src/domain/mod.rs
pub mod errors;
pub mod models;
pub mod validation;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export common types for convenience
pub use errors::{
    AnalysisError, AnalysisResult, AppError, AppResult, ExportError, ExportResult, FeedError,
    FeedResult,
};
pub use models::{
    Analysis, AnalysisPayload, CurrencyCorrelation, CurrencyStrength, MarketSentiment, NewsItem,
    TradingOpportunity,
};
