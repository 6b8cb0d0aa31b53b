//! Tool System
//!
//! Every tool takes exactly one free-form string argument and produces a
//! [`ToolOutput`]. Tools are registered at runtime and invoked by the
//! reasoning loop.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::value::ToolOutput;

/// Name of the single argument every tool accepts
pub const INPUT_PARAMETER: &str = "input";

/// Arguments of a tool call: either a bare string or a key-value object
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolArguments {
    Text(String),
    Map(HashMap<String, serde_json::Value>),
}

impl Default for ToolArguments {
    fn default() -> Self {
        ToolArguments::Map(HashMap::new())
    }
}

/// Tool call request from the LLM
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool identifier
    #[serde(alias = "tool")]
    pub name: String,

    /// Arguments as a string or key-value pairs
    #[serde(default)]
    pub arguments: ToolArguments,

    /// Optional call ID for tracking
    #[serde(default)]
    pub id: Option<String>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: ToolArguments::Text(input.into()),
            id: None,
        }
    }

    /// Resolve the argument string for `parameter`.
    ///
    /// A bare string argument is used as-is. In an object, the named key
    /// wins; an object with a single entry is accepted under any key.
    /// Non-string JSON values are passed as their JSON text.
    pub fn input(&self, parameter: &str) -> Option<String> {
        let value = match &self.arguments {
            ToolArguments::Text(s) => return Some(s.clone()),
            ToolArguments::Map(map) => match map.get(parameter) {
                Some(v) => v,
                None if map.len() == 1 => map.values().next()?,
                None => return None,
            },
        };

        Some(match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Result from tool execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub name: String,

    /// Call ID (if provided in request)
    pub id: Option<String>,

    /// Whether execution succeeded
    pub success: bool,

    /// Output (rendered tool output or error)
    pub output: String,

    /// Structured data (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn success(name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: true,
            output: output.into(),
            data: None,
        }
    }

    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: false,
            output: error.into(),
            data: None,
        }
    }

    /// Build a successful result from a tool's output
    pub fn from_output(name: impl Into<String>, output: &ToolOutput) -> Self {
        let result = Self::success(name, output.to_string());
        match output.data() {
            Some(data) => result.with_data(data),
            None => result,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (always "string" for the tools here)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,
}

/// Tool definition schema (for LLM function calling)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,

    /// Category for grouping
    #[serde(default)]
    pub category: Option<String>,
}

impl ToolSchema {
    /// Schema for a tool taking one required string named `input`
    pub fn single_input(
        name: impl Into<String>,
        description: impl Into<String>,
        input_description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: vec![ParameterSchema {
                name: INPUT_PARAMETER.into(),
                param_type: "string".into(),
                description: input_description.into(),
                required: true,
            }],
            category: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Name of the argument the tool reads
    pub fn input_parameter(&self) -> &str {
        self.parameters
            .first()
            .map_or(INPUT_PARAMETER, |p| p.name.as_str())
    }
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for LLM function calling
    fn schema(&self) -> ToolSchema;

    /// Run the tool on its single string argument
    async fn invoke(&self, input: &str) -> Result<ToolOutput>;

    /// Validate a call before execution
    fn validate(&self, call: &ToolCall) -> Result<()> {
        let schema = self.schema();

        for param in schema.parameters.iter().filter(|p| p.required) {
            if call.input(&param.name).is_none() {
                return Err(AgentError::ToolValidation(format!(
                    "Missing required parameter: {}",
                    param.name
                )));
            }
        }

        Ok(())
    }
}

/// Registry for available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let schema = tool.schema();
        self.tools.insert(schema.name, Arc::new(tool));
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Invoke a tool by name with its argument string
    pub async fn invoke(&self, name: &str, input: &str) -> Result<ToolOutput> {
        let tool = self
            .get(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;

        tracing::debug!(tool = %name, input = %input, "Invoking tool");
        tool.invoke(input).await
    }

    /// Execute a tool call
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let tool = self
            .get(&call.name)
            .ok_or_else(|| AgentError::ToolNotFound(call.name.clone()))?;

        tool.validate(call)?;

        let schema = tool.schema();
        let input = call.input(schema.input_parameter()).unwrap_or_default();

        tracing::debug!(tool = %call.name, input = %input, "Executing tool call");
        let output = tool.invoke(&input).await?;

        let mut result = ToolResult::from_output(&call.name, &output);
        result.id.clone_from(&call.id);
        Ok(result)
    }

    /// Get all tool schemas, sorted by name
    pub fn schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<_> = self.tools.values().map(|t| t.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Get tool names
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Owned set of registered names
    pub fn name_set(&self) -> HashSet<String> {
        self.tools.keys().cloned().collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Generate system prompt section describing available tools
    pub fn generate_prompt_section(&self) -> String {
        let mut prompt = String::from("## Available Tools\n\n");
        prompt.push_str("You can use the following tools by responding with a JSON block:\n\n");
        prompt.push_str(
            "```tool\n{\"tool\": \"tool_name\", \"arguments\": {\"input\": \"value\"}}\n```\n\n",
        );

        for schema in self.schemas() {
            prompt.push_str(&format!("### {}\n", schema.name));
            prompt.push_str(&format!("{}\n", schema.description));

            if !schema.parameters.is_empty() {
                prompt.push_str("**Parameters:**\n");
                for param in &schema.parameters {
                    let required = if param.required { " (required)" } else { "" };
                    prompt.push_str(&format!(
                        "- `{}` ({}){}: {}\n",
                        param.name, param.param_type, required, param.description
                    ));
                }
            }
            prompt.push('\n');
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema::single_input("echo", "Echo the input back", "Text to echo")
        }

        async fn invoke(&self, input: &str) -> Result<ToolOutput> {
            Ok(ToolOutput::text(input))
        }
    }

    struct LengthTool;

    #[async_trait]
    impl Tool for LengthTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema::single_input("length", "Count characters", "Text to measure")
        }

        async fn invoke(&self, input: &str) -> Result<ToolOutput> {
            let len = i64::try_from(input.chars().count())
                .map_err(|e| AgentError::ToolExecution(e.to_string()))?;
            Ok(ToolOutput::structured(len))
        }
    }

    #[test]
    fn test_tool_registry() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);
        registry.register(LengthTool);

        assert_eq!(registry.len(), 2);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("length").is_some());
        assert!(registry.get("unknown").is_none());
        assert_eq!(registry.names(), vec!["echo", "length"]);
        assert!(registry.name_set().contains("length"));
    }

    #[test]
    fn test_call_input_resolution() {
        let bare: ToolCall =
            serde_json::from_str(r#"{"tool": "echo", "arguments": "2, 3"}"#).unwrap();
        assert_eq!(bare.name, "echo");
        assert_eq!(bare.input("input").as_deref(), Some("2, 3"));

        let keyed: ToolCall =
            serde_json::from_str(r#"{"name": "echo", "arguments": {"input": "a", "x": 1}}"#)
                .unwrap();
        assert_eq!(keyed.input("input").as_deref(), Some("a"));

        let other_key: ToolCall =
            serde_json::from_str(r#"{"tool": "echo", "arguments": {"text": "b"}}"#).unwrap();
        assert_eq!(other_key.input("input").as_deref(), Some("b"));

        let numeric: ToolCall =
            serde_json::from_str(r#"{"tool": "echo", "arguments": {"input": 42}}"#).unwrap();
        assert_eq!(numeric.input("input").as_deref(), Some("42"));

        let missing: ToolCall = serde_json::from_str(r#"{"tool": "echo"}"#).unwrap();
        assert!(missing.input("input").is_none());
    }

    #[tokio::test]
    async fn test_execute_dispatch() {
        let mut registry = ToolRegistry::new();
        registry.register(LengthTool);

        let mut call = ToolCall::new("length", "four");
        call.id = Some("call-1".into());
        let result = registry.execute(&call).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, r#"{"result":4}"#);
        assert_eq!(result.id.as_deref(), Some("call-1"));
        assert_eq!(result.data, Some(serde_json::json!({"result": 4})));

        let output = registry.invoke("length", "").await.unwrap();
        assert_eq!(output, ToolOutput::structured(0));
    }

    #[tokio::test]
    async fn test_execute_errors() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let unknown = registry.execute(&ToolCall::new("nope", "x")).await;
        assert!(matches!(unknown, Err(AgentError::ToolNotFound(name)) if name == "nope"));

        let no_args: ToolCall = serde_json::from_str(r#"{"tool": "echo"}"#).unwrap();
        let invalid = registry.execute(&no_args).await;
        assert!(matches!(invalid, Err(AgentError::ToolValidation(_))));
    }

    #[test]
    fn test_prompt_section_lists_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);
        let prompt = registry.generate_prompt_section();
        assert!(prompt.contains("### echo"));
        assert!(prompt.contains("- `input` (string) (required): Text to echo"));
    }
}
