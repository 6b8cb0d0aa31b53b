//! Scripted Provider
//!
//! An offline `LlmProvider` that answers from a script instead of a model.
//! Used in tests and for dry runs of the harness.

use std::sync::atomic::{AtomicUsize, Ordering};

use agent_core::{
    error::Result,
    message::Message,
    provider::{Completion, GenerationOptions, LlmProvider, ModelInfo, ProviderInfo},
};
use async_trait::async_trait;

type Responder = Box<dyn Fn(&[Message]) -> String + Send + Sync>;

enum Script {
    /// Replies in order, cycling when exhausted
    Sequence(Vec<String>),
    /// Reply computed from the conversation so far
    Responder(Responder),
}

/// Provider that replays scripted replies
pub struct ScriptedProvider {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Script::Sequence(replies.into_iter().map(Into::into).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(&[Message]) -> String + Send + Sync + 'static,
    {
        Self {
            script: Script::Responder(Box::new(responder)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of completions served
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Fenced tool call the agent loop understands
pub fn tool_call_reply(tool: &str, input: &str) -> String {
    let call = serde_json::json!({ "tool": tool, "arguments": { "input": input } });
    format!("```tool\n{call}\n```")
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        Ok(ProviderInfo {
            name: "Scripted".into(),
            models: vec![ModelInfo::named("scripted")],
            supports_tools: false,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let content = match &self.script {
            Script::Sequence(replies) if replies.is_empty() => String::new(),
            Script::Sequence(replies) => replies[index % replies.len()].clone(),
            Script::Responder(responder) => responder(messages),
        };

        Ok(Completion::text(content, options.model.clone()))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        Ok(vec![ModelInfo::named("scripted")])
    }
}
