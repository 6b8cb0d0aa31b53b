//! Provider Configuration
//!
//! Endpoint, credentials and model for the chat backend, read once at
//! startup and passed to the provider constructor.

use std::str::FromStr;
use std::sync::Arc;

use agent_core::{AgentError, LlmProvider, Result};

use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;

const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";

/// Which wire protocol the endpoint speaks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    Ollama,
    OpenAi,
}

impl FromStr for ProviderKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(ProviderKind::Ollama),
            "openai" | "openai-compatible" | "gemini" => Ok(ProviderKind::OpenAi),
            other => Err(AgentError::Config(format!("Unknown LLM provider: {other}"))),
        }
    }
}

/// Chat backend configuration
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub kind: ProviderKind,

    /// Base URL (`http://localhost:11434`, `https://api.openai.com/v1`)
    pub endpoint: String,

    /// Bearer token for hosted endpoints
    pub api_key: Option<String>,

    /// Model identifier sent with every request
    pub model: String,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Ollama,
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            model: "llama3.2".into(),
            timeout_secs: 120,
        }
    }
}

impl ProviderConfig {
    /// Read `LLM_PROVIDER`, `LLM_ENDPOINT`, `LLM_API_KEY`, `LLM_MODEL` and
    /// `LLM_TIMEOUT_SECS`. Ollama falls back to `OLLAMA_HOST`/`OLLAMA_PORT`.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let kind = match std::env::var("LLM_PROVIDER") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.kind,
        };

        let endpoint = std::env::var("LLM_ENDPOINT").unwrap_or_else(|_| match kind {
            ProviderKind::Ollama => {
                let ollama = crate::ollama::OllamaConfig::from_env();
                format!("{}:{}", ollama.host, ollama.port)
            }
            ProviderKind::OpenAi => DEFAULT_OPENAI_ENDPOINT.into(),
        });

        let api_key = std::env::var("LLM_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        let timeout_secs = match std::env::var("LLM_TIMEOUT_SECS") {
            Ok(value) => value
                .parse()
                .map_err(|_| AgentError::Config(format!("Invalid LLM_TIMEOUT_SECS: {value}")))?,
            Err(_) => defaults.timeout_secs,
        };

        Ok(Self {
            kind,
            endpoint,
            api_key,
            model: std::env::var("LLM_MODEL").unwrap_or(defaults.model),
            timeout_secs,
        })
    }

    /// Construct the configured provider
    pub fn build(&self) -> Result<Arc<dyn LlmProvider>> {
        match self.kind {
            ProviderKind::Ollama => Ok(Arc::new(OllamaProvider::from_provider_config(self)?)),
            ProviderKind::OpenAi => {
                if self.api_key.is_none() {
                    tracing::warn!(endpoint = %self.endpoint, "No API key set for OpenAI-compatible endpoint");
                }
                Ok(Arc::new(OpenAiProvider::new(self)?))
            }
        }
    }
}
