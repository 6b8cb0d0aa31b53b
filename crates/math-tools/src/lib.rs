//! # math-tools
//!
//! Tools that pull numbers out of free-form text and do arithmetic on them,
//! plus a Wikipedia lookup, for use with an `agent_core::Agent`.
//!
//! ## Extraction policies
//!
//! Tools read numbers in one of three ways (see [`extract`]):
//!
//! - **Integer tokens**: whitespace-split, commas removed, digit-only tokens.
//!   `-30` and `2.5` are skipped. Used by add, subtract, multiply, divide
//!   and power.
//! - **Decimal pattern**: signed, optionally fractional numbers. Used by the
//!   decimal sum, the only tool that sees negative numbers.
//! - **Digit runs**: every run of digits, signs ignored. Used by the
//!   numeric sum.
//!
//! ## Tools
//!
//! ```text
//! add_numbers            "1 2 3"         -> "The sum is 6"
//! sum_decimal_numbers    "-1.5, 2"       -> "The sum is 0.5"
//! sum_numbers_from_text  "-10, -20"      -> 30
//! subtract_numbers       "100, 20, 10"   -> {"result": -130}
//! multiply_numbers       "2, 3, 4"       -> {"result": 24}
//! divide_numbers         "100, 5, 2"     -> {"result": 10.0}
//! calculate_power        "2, 3"          -> {"result": 8}
//! search_wikipedia       "Exponentiation" -> "Page: ...\nSummary: ..."
//! ```

pub mod arithmetic;
pub mod builtin;
pub mod error;
pub mod extract;
pub mod wikipedia;

pub use builtin::{BuiltinTool, register_all};
pub use error::{MathError, Result};
pub use wikipedia::{WikipediaClient, WikipediaConfig};

/// System prompt for the math assistant agent
pub const MATH_ASSISTANT_PROMPT: &str = r#"You are a helpful assistant that can perform various mathematical operations.
Use the tools precisely and explain your reasoning clearly.

## Calling tools

Respond with exactly one JSON block when you need a tool:
```tool
{"tool": "tool_name", "arguments": {"input": "2, 3, 4"}}
```

Pass the numbers from the question as the `input` string, in the order they
appear. Tools that return {"result": n} are authoritative; report that value.
After receiving the tool result, answer briefly."#;
