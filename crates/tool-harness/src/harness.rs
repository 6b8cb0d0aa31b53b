//! Verification Harness
//!
//! Runs each case through the agent and checks the trace: some tool message
//! must come from a known tool and parse to the expected `{"result": n}`.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use agent_core::{Agent, Conversation, Number, StructuredResult};

use crate::case::TestCase;
use crate::error::{HarnessError, Result};

/// Harness configuration
#[derive(Clone, Debug, Default)]
pub struct HarnessConfig {
    /// Pause between cases, for rate-limited providers
    pub call_delay: Duration,

    /// JSON file of cases to run instead of the built-in set
    pub cases_path: Option<std::path::PathBuf>,
}

impl HarnessConfig {
    pub fn from_env() -> Result<Self> {
        let call_delay = match std::env::var("HARNESS_CALL_DELAY_MS") {
            Ok(ms) => Duration::from_millis(ms.trim().parse().map_err(|_| {
                HarnessError::Config(format!("HARNESS_CALL_DELAY_MS is not a number: '{ms}'"))
            })?),
            Err(_) => Duration::ZERO,
        };

        Ok(Self {
            call_delay,
            cases_path: std::env::var("HARNESS_CASES").ok().map(Into::into),
        })
    }
}

/// Why a case did not pass
#[derive(Clone, Debug, PartialEq)]
pub enum FailureReason {
    /// No message in the trace came from a registered tool
    NoToolInvoked,

    /// A tool answered, but not with `{"result": n}`
    MalformedResult { tool: String, content: String },

    /// The tool's result differs from the expected one
    Mismatch { expected: Number, actual: Number },

    /// The agent run itself failed
    Agent(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoToolInvoked => write!(f, "no tool was invoked"),
            Self::MalformedResult { tool, content } => {
                write!(f, "tool '{tool}' returned a malformed result: {content}")
            }
            Self::Mismatch { expected, actual } => {
                write!(f, "expected {expected}, got {actual}")
            }
            Self::Agent(e) => write!(f, "agent error: {e}"),
        }
    }
}

/// Outcome of a single case
#[derive(Clone, Debug)]
pub struct CaseReport {
    pub description: String,
    pub query: String,
    pub outcome: std::result::Result<Number, FailureReason>,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }

    /// `None` when the case passed
    pub fn failure_reason(&self) -> Option<&FailureReason> {
        self.outcome.as_ref().err()
    }
}

/// Outcome of a whole run, in case order
#[derive(Clone, Debug, Default)]
pub struct Report {
    pub cases: Vec<CaseReport>,
}

impl Report {
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.cases.iter().all(CaseReport::passed)
    }

    /// Descriptions of the passing cases
    pub fn passed_descriptions(&self) -> Vec<&str> {
        self.cases
            .iter()
            .filter(|c| c.passed())
            .map(|c| c.description.as_str())
            .collect()
    }
}

/// Check a finished trace against the expected result.
///
/// The first tool message whose name is in `tool_names` decides the case.
pub fn verify_trace(
    trace: &Conversation,
    tool_names: &HashSet<String>,
    expected: &StructuredResult,
) -> std::result::Result<Number, FailureReason> {
    let message = trace
        .find_tool_message(|name| tool_names.contains(name))
        .ok_or(FailureReason::NoToolInvoked)?;

    let actual = StructuredResult::from_json(&message.content).map_err(|_| {
        FailureReason::MalformedResult {
            tool: message.tool_name.clone().unwrap_or_default(),
            content: message.content.clone(),
        }
    })?;

    if actual.result == expected.result {
        Ok(actual.result)
    } else {
        Err(FailureReason::Mismatch {
            expected: expected.result,
            actual: actual.result,
        })
    }
}

/// Drives cases through an agent, one at a time
pub struct VerificationHarness {
    agent: Agent,
    tool_names: HashSet<String>,
    config: HarnessConfig,
}

impl VerificationHarness {
    /// Accept results from every tool the agent has registered
    pub fn new(agent: Agent, config: HarnessConfig) -> Self {
        let tool_names = agent.tools().name_set();
        Self {
            agent,
            tool_names,
            config,
        }
    }

    /// Restrict which tool names count as answering a case
    #[must_use]
    pub fn with_tool_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tool_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn tool_names(&self) -> &HashSet<String> {
        &self.tool_names
    }

    pub async fn run(&self, cases: &[TestCase]) -> Report {
        self.run_with(cases, |_| {}).await
    }

    /// Run every case in order, handing each report to `on_case` as it lands.
    /// A failing case never stops the run.
    pub async fn run_with<F>(&self, cases: &[TestCase], mut on_case: F) -> Report
    where
        F: FnMut(&CaseReport),
    {
        let mut report = Report::default();

        for (i, case) in cases.iter().enumerate() {
            if i > 0 && !self.config.call_delay.is_zero() {
                tokio::time::sleep(self.config.call_delay).await;
            }

            let case_report = self.check(case).await;
            match &case_report.outcome {
                Ok(actual) => {
                    tracing::info!(result = %actual, "✓ {}", case.description);
                }
                Err(reason) => {
                    tracing::warn!(query = %case.query, "✗ {}: {}", case.description, reason);
                }
            }

            on_case(&case_report);
            report.cases.push(case_report);
        }

        report
    }

    /// Run a single case
    pub async fn check(&self, case: &TestCase) -> CaseReport {
        tracing::debug!(query = %case.query, "Running case");

        let outcome = match self.agent.invoke(&case.query).await {
            Ok(trace) => verify_trace(&trace, &self.tool_names, &case.expected),
            Err(e) => Err(FailureReason::Agent(e.to_string())),
        };

        CaseReport {
            description: case.description.clone(),
            query: case.query.clone(),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::Message;

    fn names(list: &[&str]) -> HashSet<String> {
        list.iter().map(ToString::to_string).collect()
    }

    fn trace(messages: Vec<Message>) -> Conversation {
        let mut conversation = Conversation::with_system_prompt("sys");
        for message in messages {
            conversation.push(message);
        }
        conversation
    }

    #[test]
    fn test_matching_result_passes() {
        let trace = trace(vec![
            Message::user("Multiply 2, 3, and 4."),
            Message::assistant("calling"),
            Message::tool("multiply_numbers", r#"{"result": 24}"#, None),
            Message::assistant("The product is 24."),
        ]);

        let outcome = verify_trace(
            &trace,
            &names(&["multiply_numbers"]),
            &StructuredResult::new(24),
        );
        assert_eq!(outcome, Ok(Number::Int(24)));
    }

    #[test]
    fn test_integer_and_float_compare_numerically() {
        let trace = trace(vec![Message::tool("divide_numbers", r#"{"result":10}"#, None)]);
        let outcome = verify_trace(
            &trace,
            &names(&["divide_numbers"]),
            &StructuredResult::new(10.0),
        );
        assert!(outcome.is_ok());
    }

    #[test]
    fn test_mismatch() {
        let trace = trace(vec![Message::tool("multiply_numbers", r#"{"result":25}"#, None)]);
        let outcome = verify_trace(
            &trace,
            &names(&["multiply_numbers"]),
            &StructuredResult::new(24),
        );
        assert_eq!(
            outcome,
            Err(FailureReason::Mismatch {
                expected: Number::Int(24),
                actual: Number::Int(25),
            })
        );
    }

    #[test]
    fn test_no_tool_message() {
        let trace = trace(vec![
            Message::user("Multiply 2, 3, and 4."),
            Message::assistant("It's 24."),
        ]);
        let outcome = verify_trace(&trace, &names(&["multiply_numbers"]), &StructuredResult::new(24));
        assert_eq!(outcome, Err(FailureReason::NoToolInvoked));
    }

    #[test]
    fn test_unknown_tool_is_ignored() {
        let trace = trace(vec![Message::tool("search_wikipedia", r#"{"result":24}"#, None)]);
        let outcome = verify_trace(&trace, &names(&["multiply_numbers"]), &StructuredResult::new(24));
        assert_eq!(outcome, Err(FailureReason::NoToolInvoked));
    }

    #[test]
    fn test_text_output_is_malformed() {
        let trace = trace(vec![Message::tool("add_numbers", "The sum is 6", None)]);
        let outcome = verify_trace(&trace, &names(&["add_numbers"]), &StructuredResult::new(6));
        assert_eq!(
            outcome,
            Err(FailureReason::MalformedResult {
                tool: "add_numbers".into(),
                content: "The sum is 6".into(),
            })
        );
    }

    #[test]
    fn test_report_counts() {
        let report = Report {
            cases: vec![
                CaseReport {
                    description: "a".into(),
                    query: "qa".into(),
                    outcome: Ok(Number::Int(1)),
                },
                CaseReport {
                    description: "b".into(),
                    query: "qb".into(),
                    outcome: Err(FailureReason::NoToolInvoked),
                },
            ],
        };

        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_passed());
        assert_eq!(report.passed_descriptions(), vec!["a"]);
        assert!(report.cases[0].failure_reason().is_none());
        assert_eq!(
            report.cases[1].failure_reason().map(ToString::to_string).as_deref(),
            Some("no tool was invoked")
        );
    }
}
