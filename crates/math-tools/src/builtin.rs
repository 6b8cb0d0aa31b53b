//! Built-in Tools
//!
//! The closed set of tools this crate ships, each exposed to the agent
//! under a fixed name through the uniform [`Tool`] trait.

use async_trait::async_trait;

use agent_core::{Number, Result as CoreResult, Tool, ToolOutput, ToolRegistry, ToolSchema};

use crate::arithmetic;
use crate::error::Result;
use crate::wikipedia::WikipediaClient;

/// A tool from the built-in set
#[derive(Clone, Debug)]
pub enum BuiltinTool {
    /// Integer-token sum, text output
    Sum,
    /// Signed decimal sum, text output
    DecimalSum,
    /// Digit-run sum, bare number output
    DigitSum,
    Subtract,
    Multiply,
    Divide,
    Power,
    WikipediaLookup(WikipediaClient),
}

impl BuiltinTool {
    /// The seven arithmetic tools, in a stable order
    pub fn arithmetic() -> Vec<Self> {
        vec![
            BuiltinTool::Sum,
            BuiltinTool::DecimalSum,
            BuiltinTool::DigitSum,
            BuiltinTool::Subtract,
            BuiltinTool::Multiply,
            BuiltinTool::Divide,
            BuiltinTool::Power,
        ]
    }

    /// Name the model uses to call this tool
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinTool::Sum => "add_numbers",
            BuiltinTool::DecimalSum => "sum_decimal_numbers",
            BuiltinTool::DigitSum => "sum_numbers_from_text",
            BuiltinTool::Subtract => "subtract_numbers",
            BuiltinTool::Multiply => "multiply_numbers",
            BuiltinTool::Divide => "divide_numbers",
            BuiltinTool::Power => "calculate_power",
            BuiltinTool::WikipediaLookup(_) => "search_wikipedia",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            BuiltinTool::Sum => {
                "Adds integers extracted from the input text and returns the sum as a string."
            }
            BuiltinTool::DecimalSum => {
                "Extracts and sums all numbers including decimals and negatives from the input text."
            }
            BuiltinTool::DigitSum => {
                "Adds all whole numbers found in the input string and returns the sum as a number."
            }
            BuiltinTool::Subtract => {
                "Extracts numbers from a string, negates the first number, and successively \
                 subtracts the remaining numbers. Returns {\"result\": n}; 0 if no numbers are found."
            }
            BuiltinTool::Multiply => {
                "Extracts numbers from a string and calculates their product. \
                 Returns {\"result\": n}; 1 if no numbers are found."
            }
            BuiltinTool::Divide => {
                "Divides the first number in the string by each subsequent number in sequence. \
                 Returns {\"result\": n}; 0 if no numbers are found. Division by zero is an error."
            }
            BuiltinTool::Power => {
                "Raises the first number in the string to the power of the second. \
                 Returns {\"result\": n}; 0 if no numbers are found."
            }
            BuiltinTool::WikipediaLookup(_) => {
                "Search Wikipedia for factual information about a topic."
            }
        }
    }

    fn input_description(&self) -> &'static str {
        match self {
            BuiltinTool::WikipediaLookup(_) => "The topic or question to search for on Wikipedia",
            BuiltinTool::Power => "Base and exponent, e.g. '2, 3'",
            _ => "Numbers separated by spaces or commas, e.g. '100, 20, 10'",
        }
    }

    fn category(&self) -> &'static str {
        match self {
            BuiltinTool::WikipediaLookup(_) => "reference",
            _ => "math",
        }
    }

    /// Run the tool without going through the agent error type
    pub async fn run(&self, input: &str) -> Result<ToolOutput> {
        Ok(match self {
            BuiltinTool::Sum => ToolOutput::Text(arithmetic::add_numbers(input)?),
            BuiltinTool::DecimalSum => ToolOutput::Text(arithmetic::sum_decimal_numbers(input)),
            BuiltinTool::DigitSum => {
                ToolOutput::Number(Number::Int(arithmetic::sum_numbers_from_text(input)?))
            }
            BuiltinTool::Subtract => ToolOutput::Structured(arithmetic::subtract_numbers(input)?),
            BuiltinTool::Multiply => ToolOutput::Structured(arithmetic::multiply_numbers(input)?),
            BuiltinTool::Divide => ToolOutput::Structured(arithmetic::divide_numbers(input)?),
            BuiltinTool::Power => ToolOutput::Structured(arithmetic::calculate_power(input)?),
            BuiltinTool::WikipediaLookup(client) => ToolOutput::Text(client.lookup(input).await?),
        })
    }
}

#[async_trait]
impl Tool for BuiltinTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema::single_input(self.name(), self.description(), self.input_description())
            .with_category(self.category())
    }

    async fn invoke(&self, input: &str) -> CoreResult<ToolOutput> {
        self.run(input).await.map_err(Into::into)
    }
}

/// Register the arithmetic tools and, when given, the Wikipedia lookup
pub fn register_all(registry: &mut ToolRegistry, wikipedia: Option<WikipediaClient>) {
    for tool in BuiltinTool::arithmetic() {
        registry.register(tool);
    }
    if let Some(client) = wikipedia {
        registry.register(BuiltinTool::WikipediaLookup(client));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::{AgentError, StructuredResult, ToolCall};

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        register_all(&mut registry, None);
        registry
    }

    #[test]
    fn test_register_all_names() {
        let registry = registry();
        assert_eq!(
            registry.names(),
            vec![
                "add_numbers",
                "calculate_power",
                "divide_numbers",
                "multiply_numbers",
                "subtract_numbers",
                "sum_decimal_numbers",
                "sum_numbers_from_text",
            ]
        );
    }

    #[tokio::test]
    async fn test_output_shapes() {
        let registry = registry();

        assert_eq!(
            registry.invoke("add_numbers", "1 2 3").await.unwrap(),
            ToolOutput::text("The sum is 6")
        );
        assert_eq!(
            registry.invoke("sum_numbers_from_text", "-10, -20, -30").await.unwrap(),
            ToolOutput::Number(Number::Int(60))
        );
        assert_eq!(
            registry.invoke("multiply_numbers", "2, 3, 4").await.unwrap(),
            ToolOutput::Structured(StructuredResult::new(24))
        );
    }

    #[tokio::test]
    async fn test_division_by_zero_propagates() {
        let registry = registry();
        let err = registry.invoke("divide_numbers", "10, 0").await.unwrap_err();
        assert!(matches!(err, AgentError::ToolExecution(msg) if msg == "Division by zero"));
    }

    #[tokio::test]
    async fn test_execute_renders_structured_json() {
        let registry = registry();
        let result = registry
            .execute(&ToolCall::new("calculate_power", "2, 3"))
            .await
            .unwrap();
        assert_eq!(result.output, r#"{"result":8}"#);
        assert_eq!(
            StructuredResult::from_json(&result.output).unwrap(),
            StructuredResult::new(8)
        );
    }

    #[test]
    fn test_schema() {
        let schema = BuiltinTool::Divide.schema();
        assert_eq!(schema.name, "divide_numbers");
        assert_eq!(schema.category.as_deref(), Some("math"));
        assert_eq!(schema.input_parameter(), "input");
    }
}
