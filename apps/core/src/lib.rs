//! RealTalk core: pre-send risk analysis and rewrite orchestration for the
//! browser extension backend.

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod llm;
pub mod models;
pub mod rewrite;
pub mod risk;
pub mod service;
pub mod telemetry;
pub mod usage;

pub use error::AppError;
pub use service::RewriteService;

#[cfg(test)]
mod tests;
