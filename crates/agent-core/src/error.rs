//! Error Types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AgentError>;

/// Failures of the agent loop, its providers and its tools
#[derive(Error, Debug)]
pub enum AgentError {
    /// The model endpoint answered with an error
    #[error("Provider error: {0}")]
    Provider(String),

    /// The model endpoint could not be reached
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// The call's arguments do not fit the tool's schema
    #[error("Tool validation error: {0}")]
    ToolValidation(String),

    /// The tool ran and reported a declared error (e.g. division by zero)
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// The model kept calling tools without giving an answer
    #[error("Maximum iterations ({0}) reached")]
    MaxIterations(usize),

    /// A provider reply could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Authentication failed: {0}")]
    Auth(String),
}

impl AgentError {
    /// Transient provider failures worth retrying after a pause
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AgentError::ProviderUnavailable(_) | AgentError::RateLimited(_)
        )
    }

    /// Whether the error came from a tool rather than the model or transport
    pub fn is_tool_error(&self) -> bool {
        matches!(
            self,
            AgentError::ToolNotFound(_) | AgentError::ToolValidation(_) | AgentError::ToolExecution(_)
        )
    }
}
