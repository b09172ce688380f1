//! Entity Match - client for fuzzy entity-matching screening APIs
//!
//! Sends one or more named queries describing people or companies to a
//! `match` endpoint in a single request and returns the normalized
//! candidates for each query, in the service's ranking order.

pub mod config;
pub mod core;
pub mod models;
pub mod presets;
pub mod services;

// Re-export commonly used types
pub use crate::core::ProtocolError;
pub use models::{MatchRequest, MatchResponse, MatchResult, QuerySpec};
pub use services::{MatchClient, MatchError};
