//! Core market data model, aggregation and ambient plumbing

pub mod cache;
pub mod config;
pub mod error;
pub mod fallback;
pub mod log;
pub mod market;
pub mod quote;
pub mod reconcile;
pub mod source;

// Re-export main types for cleaner imports
pub use market::MarketService;
pub use quote::{Category, Quote, RawInstrumentRecord, Snapshot};
pub use source::QuoteSource;
