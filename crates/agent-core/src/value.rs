//! Tool Values
//!
//! The tagged output of a tool invocation and the `{"result": number}`
//! record used for machine-checkable results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric value that is either a whole number or floating point.
///
/// Equality is numeric: `Int(10) == Float(10.0)`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(self, Number::Int(_))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::Int(n)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            // Debug keeps the fractional part, so 10.0 stays "10.0"
            Number::Float(x) => write!(f, "{x:?}"),
        }
    }
}

/// Structured tool result: a record with a single `result` field
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructuredResult {
    pub result: Number,
}

impl StructuredResult {
    pub fn new(result: impl Into<Number>) -> Self {
        Self {
            result: result.into(),
        }
    }

    /// Encode as JSON text (`{"result":24}`)
    pub fn to_json(&self) -> String {
        format!("{{\"result\":{}}}", self.result)
    }

    /// Decode from JSON text produced by a tool
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text.trim())
    }
}

/// Output of a tool invocation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ToolOutput {
    /// Free-form text ("The sum is 6")
    Text(String),

    /// A bare number
    Number(Number),

    /// Machine-checkable `{"result": n}` record
    Structured(StructuredResult),
}

impl ToolOutput {
    pub fn text(s: impl Into<String>) -> Self {
        ToolOutput::Text(s.into())
    }

    pub fn structured(result: impl Into<Number>) -> Self {
        ToolOutput::Structured(StructuredResult::new(result))
    }

    pub fn as_structured(&self) -> Option<&StructuredResult> {
        match self {
            ToolOutput::Structured(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ToolOutput::Text(s) => Some(s),
            _ => None,
        }
    }

    /// JSON form of non-text outputs, used as `ToolResult::data`
    pub fn data(&self) -> Option<serde_json::Value> {
        match self {
            ToolOutput::Text(_) => None,
            ToolOutput::Number(n) => serde_json::to_value(n).ok(),
            ToolOutput::Structured(s) => serde_json::to_value(s).ok(),
        }
    }
}

/// Rendered as the message content the model (and the harness) reads
impl fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolOutput::Text(s) => f.write_str(s),
            ToolOutput::Number(n) => write!(f, "{n}"),
            ToolOutput::Structured(s) => f.write_str(&s.to_json()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_equality_across_types() {
        assert_eq!(Number::Int(10), Number::Float(10.0));
        assert_eq!(Number::Float(10.0), Number::Int(10));
        assert_ne!(Number::Int(10), Number::Float(10.5));
        assert_ne!(Number::Int(-130), Number::Int(130));
    }

    #[test]
    fn test_structured_json() {
        let result = StructuredResult::new(24);
        assert_eq!(result.to_json(), r#"{"result":24}"#);
        assert_eq!(StructuredResult::from_json(&result.to_json()).unwrap(), result);

        let quotient = StructuredResult::new(10.0);
        assert_eq!(quotient.to_json(), r#"{"result":10.0}"#);
        let decoded = StructuredResult::from_json(&quotient.to_json()).unwrap();
        assert!(!decoded.result.is_integer());
        assert_eq!(decoded, StructuredResult::new(10));
    }

    #[test]
    fn test_structured_from_loose_json() {
        let parsed = StructuredResult::from_json(" {\"result\": -130} \n").unwrap();
        assert_eq!(parsed.result, Number::Int(-130));
        assert!(StructuredResult::from_json("The sum is 6").is_err());
        assert!(StructuredResult::from_json(r#"{"value": 6}"#).is_err());
    }

    #[test]
    fn test_tool_output_rendering() {
        assert_eq!(ToolOutput::text("The sum is 6").to_string(), "The sum is 6");
        assert_eq!(ToolOutput::Number(Number::Int(60)).to_string(), "60");
        assert_eq!(ToolOutput::structured(8).to_string(), r#"{"result":8}"#);
        assert!(ToolOutput::text("x").data().is_none());
        assert_eq!(
            ToolOutput::structured(8).data(),
            Some(serde_json::json!({"result": 8}))
        );
    }
}
