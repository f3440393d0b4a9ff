// Core modules
pub mod api;
pub mod engine;
pub mod indicators;
pub mod ledger;
pub mod market;
pub mod models;
pub mod persistence;
pub mod risk;
pub mod strategy;

// Re-export commonly used types
pub use models::*;

// Error handling
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
