//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern for agent behavior.
//! The agent observes, thinks, acts (via tools), and responds. Every
//! tool result is recorded in the conversation as a tool message, so the
//! finished conversation is a complete trace of the run.

use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message, Role};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{Tool, ToolCall, ToolRegistry, ToolResult};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt template
    pub system_prompt: String,

    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,

    /// Generation options
    pub generation: GenerationOptions,

    /// Whether to append tool descriptions to system prompt
    pub inject_tool_descriptions: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: 10,
            generation: GenerationOptions::default(),
            inject_tool_descriptions: true,
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful assistant that can perform various mathematical operations.
Use the tools precisely and explain your reasoning clearly.

When you need to use a tool, respond with a JSON block in this exact format:
```tool
{"tool": "tool_name", "arguments": {"input": "value"}}
```

Call one tool at a time. After receiving tool results, synthesize them into a helpful response.
If you can answer directly without tools, do so."#;

const TOOL_FENCE: &str = "```tool";
const FENCE_END: &str = "```";

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Build the full system prompt including tool descriptions
    fn build_system_prompt(&self) -> String {
        let mut prompt = self.config.system_prompt.clone();

        if self.config.inject_tool_descriptions && !self.tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&self.tools.generate_prompt_section());
        }

        prompt
    }

    /// Run the agent on a conversation, returning the final answer
    pub async fn run(&self, conversation: &mut Conversation) -> Result<String> {
        if conversation.messages().first().map(|m| &m.role) != Some(&Role::System) {
            conversation
                .messages_mut()
                .insert(0, Message::system(self.build_system_prompt()));
        }

        let mut iterations = 0;

        loop {
            iterations += 1;

            if iterations > self.config.max_iterations {
                return Err(AgentError::MaxIterations(self.config.max_iterations));
            }

            let completion = self
                .provider
                .complete(conversation.messages(), &self.config.generation)
                .await?;

            let content = completion.content;
            conversation.push(Message::assistant(&content));

            if let Some(tool_call) = parse_tool_call(&content) {
                let result = self.execute_tool(&tool_call).await;
                conversation.push(tool_message(result));
                continue;
            }

            return Ok(content);
        }
    }

    /// Run with a simple string input (creates temporary conversation)
    pub async fn ask(&self, question: &str) -> Result<String> {
        let mut conversation = self.start(question);
        self.run(&mut conversation).await
    }

    /// Run one human turn and return the full trace
    pub async fn invoke(&self, question: &str) -> Result<Conversation> {
        let mut conversation = self.start(question);
        self.run(&mut conversation).await?;
        Ok(conversation)
    }

    fn start(&self, question: &str) -> Conversation {
        let mut conversation = Conversation::with_system_prompt(self.build_system_prompt());
        conversation.push(Message::user(question));
        conversation
    }

    /// Execute a tool call; failures become unsuccessful results
    async fn execute_tool(&self, call: &ToolCall) -> ToolResult {
        tracing::debug!(tool = %call.name, "Executing tool");

        match self.tools.execute(call).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool failed");
                let mut result = ToolResult::failure(&call.name, format!("Error: {e}"));
                result.id.clone_from(&call.id);
                result
            }
        }
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

fn tool_message(result: ToolResult) -> Message {
    let message = Message::tool(result.name, result.output, result.id);
    if result.success {
        message
    } else {
        message.failed()
    }
}

/// Parse a tool call from LLM response
pub fn parse_tool_call(content: &str) -> Option<ToolCall> {
    if let Some(start_idx) = content.find(TOOL_FENCE) {
        let after_marker = &content[start_idx + TOOL_FENCE.len()..];
        if let Some(end_idx) = after_marker.find(FENCE_END) {
            let json_str = after_marker[..end_idx].trim();

            if let Ok(call) = serde_json::from_str::<ToolCall>(json_str) {
                return Some(with_call_id(call));
            }
        }
    }

    parse_inline_tool_call(content).map(with_call_id)
}

/// Try to parse an inline JSON object with a "tool" key
fn parse_inline_tool_call(content: &str) -> Option<ToolCall> {
    if !content.contains(r#""tool""#) {
        return None;
    }

    let start = content.find('{')?;
    let end = content.rfind('}')?;

    if end <= start {
        return None;
    }

    serde_json::from_str::<ToolCall>(&content[start..=end]).ok()
}

fn with_call_id(mut call: ToolCall) -> ToolCall {
    if call.id.is_none() {
        call.id = Some(uuid::Uuid::new_v4().to_string());
    }
    call
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    #[must_use]
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    #[must_use]
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    #[must_use]
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Completion, ModelInfo, ProviderInfo};
    use crate::tool::ToolSchema;
    use crate::value::ToolOutput;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays canned replies in order, then repeats the last one
    struct Replay {
        replies: Vec<String>,
        cursor: Mutex<usize>,
    }

    impl Replay {
        fn new(replies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                replies: replies.iter().map(ToString::to_string).collect(),
                cursor: Mutex::new(0),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for Replay {
        async fn info(&self) -> Result<ProviderInfo> {
            Ok(ProviderInfo {
                name: "replay".into(),
                models: vec![],
                supports_tools: false,
            })
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            _messages: &[Message],
            options: &GenerationOptions,
        ) -> Result<Completion> {
            let mut cursor = self.cursor.lock().unwrap();
            let reply = self.replies[(*cursor).min(self.replies.len() - 1)].clone();
            *cursor += 1;
            Ok(Completion::text(reply, options.model.clone()))
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            Ok(vec![])
        }
    }

    struct Halve;

    #[async_trait]
    impl Tool for Halve {
        fn schema(&self) -> ToolSchema {
            ToolSchema::single_input("halve", "Halve an integer", "An integer")
        }

        async fn invoke(&self, input: &str) -> Result<ToolOutput> {
            let n: i64 = input
                .trim()
                .parse()
                .map_err(|_| AgentError::ToolExecution(format!("not an integer: {input}")))?;
            Ok(ToolOutput::structured(n / 2))
        }
    }

    fn agent(replies: &[&str]) -> Agent {
        AgentBuilder::new()
            .provider(Replay::new(replies))
            .tool(Halve)
            .max_iterations(4)
            .build()
            .unwrap()
    }

    #[test]
    fn test_parse_fenced_tool_call() {
        let content = r#"Let me check that for you.
```tool
{"tool": "multiply_numbers", "arguments": {"input": "2, 3, 4"}}
```"#;

        let call = parse_tool_call(content).unwrap();
        assert_eq!(call.name, "multiply_numbers");
        assert_eq!(call.input("input").as_deref(), Some("2, 3, 4"));
        assert!(call.id.is_some());
    }

    #[test]
    fn test_parse_inline_tool_call() {
        let call = parse_tool_call(r#"Sure: {"tool": "halve", "arguments": "10"}"#).unwrap();
        assert_eq!(call.name, "halve");
        assert!(parse_tool_call("The answer is 24.").is_none());
    }

    #[tokio::test]
    async fn test_invoke_records_tool_trace() {
        let agent = agent(&[
            r#"```tool
{"tool": "halve", "arguments": {"input": "10"}}
```"#,
            "Half of 10 is 5.",
        ]);

        let trace = agent.invoke("What is half of 10?").await.unwrap();
        let roles: Vec<_> = trace.messages().iter().map(|m| m.role.clone()).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::Tool, Role::Assistant]
        );

        let tool_msg = trace.find_tool_message(|n| n == "halve").unwrap();
        assert_eq!(tool_msg.content, r#"{"result":5}"#);
        assert!(!tool_msg.is_tool_failure());
        assert_eq!(trace.last().unwrap().content, "Half of 10 is 5.");
    }

    #[tokio::test]
    async fn test_failed_tool_is_recorded() {
        let agent = agent(&[
            r#"```tool
{"tool": "halve", "arguments": {"input": "ten"}}
```"#,
            "I could not do that.",
        ]);

        let trace = agent.invoke("Halve ten").await.unwrap();
        let tool_msg = trace.find_tool_message(|n| n == "halve").unwrap();
        assert!(tool_msg.is_tool_failure());
        assert!(tool_msg.content.starts_with("Error: Tool execution error"));
    }

    #[tokio::test]
    async fn test_max_iterations() {
        let agent = agent(&[r#"```tool
{"tool": "halve", "arguments": "8"}
```"#]);

        let err = agent.ask("loop forever").await.unwrap_err();
        assert!(matches!(err, AgentError::MaxIterations(4)));
    }

    #[test]
    fn test_builder_requires_provider() {
        assert!(matches!(AgentBuilder::new().build(), Err(AgentError::Config(_))));
    }

    #[test]
    fn test_system_prompt_lists_tools() {
        let agent = agent(&["ok"]);
        let prompt = agent.build_system_prompt();
        assert!(prompt.contains("### halve"));
        assert!(prompt.starts_with("You are a helpful assistant"));
    }
}
