//! Post Optimizer: rewrites rough social-media drafts into tone-specific variants
//! through an LLM provider, suggests hashtags, and ships a client that drives both
//! endpoints.

pub mod client;
pub mod config;
pub mod errors;
pub mod generation;
pub mod llm_client;
pub mod models;
pub mod routes;
pub mod state;
