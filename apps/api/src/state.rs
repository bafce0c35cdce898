use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when the selected provider's credential is unset.
    pub llm: Option<LlmClient>,
    pub config: Config,
}

impl AppState {
    /// The configured LLM client, or a 500 naming the missing credential.
    pub fn llm(&self) -> Result<&LlmClient, AppError> {
        self.llm
            .as_ref()
            .ok_or(AppError::MissingCredential(self.config.provider.credential_var()))
    }
}
