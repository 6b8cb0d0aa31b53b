//! Verification Cases
//!
//! A case pairs a natural-language question with the `{"result": n}` the
//! tools should produce for it.

use std::path::Path;

use agent_core::{Number, StructuredResult};
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// One question and the structured result it must yield
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Question handed to the agent
    pub query: String,

    /// Result the tool must return
    pub expected: StructuredResult,

    /// Human-readable label used in reports
    pub description: String,
}

impl TestCase {
    pub fn new(
        query: impl Into<String>,
        expected: impl Into<Number>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            expected: StructuredResult::new(expected),
            description: description.into(),
        }
    }
}

/// Built-in cases covering the structured-result tools
pub fn default_cases() -> Vec<TestCase> {
    vec![
        TestCase::new("Multiply 2, 3, and 4.", 24, "Multiplication of three numbers"),
        TestCase::new(
            "Subtract 20 and 10 from 100.",
            -130,
            "Subtraction negates the first number",
        ),
        TestCase::new(
            "Divide 100 by 5, then divide the result by 2.",
            10.0,
            "Successive division",
        ),
        TestCase::new("What is 2 to the power of 10?", 1024, "Power of two"),
        TestCase::new("What is 2 raised to the power of 3?", 8, "Small exponent"),
    ]
}

/// Load cases from a JSON array of `{query, expected, description}` objects
pub fn load_cases(path: impl AsRef<Path>) -> Result<Vec<TestCase>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| HarnessError::Cases {
        path: path.to_path_buf(),
        source,
    })
}
