//! Chat-completion broker: the `ChatCompletion` seam and its OpenRouter client.

pub mod client;
pub mod traits;

pub use client::OpenRouterClient;
pub use traits::ChatCompletion;
