// Post generation and hashtag suggestion gateways.
// All LLM calls go through llm_client; no direct provider HTTP calls here.

pub mod handlers;
pub mod hashtags;
pub mod optimizer;
pub mod prompts;
pub mod tone;
