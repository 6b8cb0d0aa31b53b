//! Error Types for Math Tools

use agent_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MathError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("{operation} needs at least {needed} numbers, found {found}")]
    MissingOperand {
        operation: &'static str,
        needed: usize,
        found: usize,
    },

    #[error("Integer overflow during {0}")]
    Overflow(&'static str),

    #[error("Wikipedia lookup failed: {0}")]
    Wikipedia(String),
}

impl From<MathError> for AgentError {
    fn from(err: MathError) -> Self {
        AgentError::ToolExecution(err.to_string())
    }
}

impl From<reqwest::Error> for MathError {
    fn from(err: reqwest::Error) -> Self {
        MathError::Wikipedia(err.to_string())
    }
}
