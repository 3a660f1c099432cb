//! Language model assistance for formlab.
//!
//! [`Assistant`] is the seam: [`HttpAssistant`] talks to a hosted messages
//! endpoint, tests substitute their own implementation. Every request made
//! through [`ask`] has a deterministic fallback, so callers always get text
//! back and can tell from [`AssistantReply`] whether it came from the model.

pub mod client;
pub mod error;
pub mod fallback;
pub mod prompts;
pub mod reply;

pub use client::{Assistant, HttpAssistant};
pub use error::AssistantError;
pub use prompts::AnalysisRequest;
pub use reply::{AssistantReply, analyze_process, ask, generate_card, review_label};
