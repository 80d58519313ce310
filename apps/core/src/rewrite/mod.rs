//! # Rewrite Module
//!
//! Everything between a risk assessment and the text shown to the user:
//! mode selection, prompt assembly, response validation, fallbacks and labels.

pub mod fallback;
pub mod labels;
pub mod mode;
pub mod prompts;
pub mod response;

pub use fallback::{fallback_rewrites, fallback_smooth};
pub use mode::{recommended_mode, select_mode, RewriteMode};
pub use prompts::{Prompt, PromptBuilder};
pub use response::{parse_rewrites, parse_smoothed, Rewrite};
