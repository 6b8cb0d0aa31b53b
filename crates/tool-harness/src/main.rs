//! tool-harness binary
//!
//! Runs the verification cases against the configured model and exits
//! non-zero if any case fails. With arguments, asks the joined arguments as
//! a single question and prints the trace instead.

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{AgentBuilder, Role, ToolRegistry};
use agent_runtime::ProviderConfig;
use math_tools::{MATH_ASSISTANT_PROMPT, WikipediaClient, WikipediaConfig, register_all};
use tool_harness::{HarnessConfig, VerificationHarness, default_cases, load_cases};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let provider_config = ProviderConfig::from_env()?;
    let provider = provider_config.build()?;

    match provider.health_check().await {
        Ok(true) => {
            if let Ok(info) = provider.info().await {
                tracing::info!("✓ Connected to {} at {}", info.name, provider_config.endpoint);
                for model in info.models {
                    tracing::info!("  Model: {}", model.id);
                }
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Provider not available at {} - cases will fail", provider_config.endpoint);
        }
    }

    let wikipedia = match WikipediaClient::new(WikipediaConfig::from_env()) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!("⚠ Wikipedia lookup disabled: {}", e);
            None
        }
    };

    let mut tools = ToolRegistry::new();
    register_all(&mut tools, wikipedia);
    tracing::info!("Registered {} tools: {}", tools.len(), tools.names().join(", "));

    let agent = AgentBuilder::new()
        .provider(provider)
        .tools(tools)
        .system_prompt(MATH_ASSISTANT_PROMPT)
        .model(&provider_config.model)
        .build()?;

    let question = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if !question.trim().is_empty() {
        let trace = agent.invoke(&question).await?;
        for message in trace.messages().iter().filter(|m| m.role != Role::System) {
            match &message.tool_name {
                Some(tool) => println!("[{tool}] {}", message.content),
                None => println!("[{}] {}", message.role, message.content),
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = HarnessConfig::from_env()?;
    let cases = match &config.cases_path {
        Some(path) => load_cases(path)?,
        None => default_cases(),
    };

    tracing::info!("🚀 Running {} cases with model {}", cases.len(), provider_config.model);

    let harness = VerificationHarness::new(agent, config);
    let report = harness.run(&cases).await;

    tracing::info!("{}/{} cases passed", report.passed(), report.cases.len());
    for description in report.passed_descriptions() {
        tracing::info!("  ✓ {}", description);
    }

    Ok(if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
