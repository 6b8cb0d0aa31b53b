//! # tool-harness
//!
//! Checks that the math tools, driven by a model through the agent loop,
//! return the expected `{"result": n}` for a set of natural-language
//! questions.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tool_harness::{HarnessConfig, VerificationHarness, default_cases};
//!
//! let harness = VerificationHarness::new(agent, HarnessConfig::from_env()?);
//! let report = harness.run(&default_cases()).await;
//! assert!(report.all_passed());
//! ```

pub mod case;
pub mod error;
pub mod harness;

pub use case::{TestCase, default_cases, load_cases};
pub use error::{HarnessError, Result};
pub use harness::{
    CaseReport, FailureReason, HarnessConfig, Report, VerificationHarness, verify_trace,
};
