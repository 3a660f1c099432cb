//! Terminal styling for formlab output.
//!
//! Provides the Ayu-based palette, semantic renderers for verdicts, risk
//! levels and label states, and terminal detection.

pub mod styles;
pub mod terminal;
