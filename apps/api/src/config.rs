use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// The LLM backend the gateways talk to. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Groq,
    Gemini,
    Anthropic,
}

impl ProviderKind {
    /// Environment variable holding this provider's credential.
    pub fn credential_var(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Groq => "GROQ_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Groq => "groq",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "groq" => Ok(ProviderKind::Groq),
            "gemini" => Ok(ProviderKind::Gemini),
            "anthropic" => Ok(ProviderKind::Anthropic),
            other => bail!("Unknown LLM_PROVIDER '{other}' (expected openai, groq, gemini or anthropic)"),
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// The provider credential is optional at startup: a missing key is reported
/// per request as a server configuration error, so the health endpoint stays up.
#[derive(Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub api_key: Option<String>,
    /// Overrides the provider's default model when set.
    pub model: Option<String>,
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match lookup("LLM_PROVIDER") {
            Some(raw) => raw.parse::<ProviderKind>()?,
            None => ProviderKind::OpenAi,
        };

        Ok(Config {
            provider,
            api_key: non_empty(lookup(provider.credential_var())),
            model: non_empty(lookup("LLM_MODEL")),
            llm_timeout_secs: lookup("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_openai_without_key() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.provider, ProviderKind::OpenAi);
        assert!(config.api_key.is_none());
        assert_eq!(config.port, 8080);
        assert_eq!(config.llm_timeout_secs, 30);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_reads_credential_of_selected_provider_only() {
        let config = Config::from_lookup(lookup_from(&[
            ("LLM_PROVIDER", "Groq"),
            ("OPENAI_API_KEY", "sk-openai"),
            ("GROQ_API_KEY", "gsk-groq"),
        ]))
        .unwrap();
        assert_eq!(config.provider, ProviderKind::Groq);
        assert_eq!(config.api_key.as_deref(), Some("gsk-groq"));
    }

    #[test]
    fn test_blank_credential_is_treated_as_missing() {
        let config = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_unknown_provider_fails() {
        let err = Config::from_lookup(lookup_from(&[("LLM_PROVIDER", "mystery")])).unwrap_err();
        assert!(err.to_string().contains("mystery"));
    }

    #[test]
    fn test_invalid_port_fails() {
        assert!(Config::from_lookup(lookup_from(&[("PORT", "not-a-port")])).is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config =
            Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk-secret")])).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
