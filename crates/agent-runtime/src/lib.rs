//! # agent-runtime
//!
//! Runtime providers for the text-math agent.
//!
//! ## Providers
//!
//! - **Ollama** (default): Local LLM inference via Ollama
//! - **OpenAI-compatible**: Any hosted `/chat/completions` endpoint with a bearer key
//! - **Scripted**: Offline replies for tests and dry runs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::ProviderConfig;
//!
//! let config = ProviderConfig::from_env()?;
//! let agent = AgentBuilder::new()
//!     .provider(config.build()?)
//!     .model(&config.model)
//!     .build()?;
//! ```

pub mod config;
pub mod ollama;
pub mod openai;
pub mod scripted;

pub use config::{ProviderConfig, ProviderKind};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use scripted::ScriptedProvider;

// Re-export core types for convenience
pub use agent_core::{Agent, AgentError, LlmProvider, Message, Result, Role, Tool, ToolRegistry};
