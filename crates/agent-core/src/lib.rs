//! # agent-core
//!
//! Core agent logic with provider-agnostic LLM abstraction and a single-argument
//! tool system.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Agent                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │  Reasoning  │  │    Tools    │  │   LlmProvider       │  │
//! │  │    Loop     │──│   Registry  │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tools take one free-form string and return a [`ToolOutput`]: plain text,
//! a bare number, or a `{"result": n}` [`StructuredResult`]. Each run of the
//! reasoning loop leaves a [`Conversation`] whose tool messages carry the
//! producing tool's name, so callers can inspect what was invoked.

pub mod error;
pub mod message;
pub mod provider;
pub mod reasoning;
pub mod tool;
pub mod value;

pub use error::{AgentError, Result};
pub use message::{Conversation, Message, Role};
pub use provider::LlmProvider;
pub use reasoning::{Agent, AgentBuilder, AgentConfig};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
pub use value::{Number, StructuredResult, ToolOutput};
