//! Multi-agent pipeline demo
//!
//! Runs the fixed four-phase pipeline (research, plan, critique, execute)
//! for one free-text objective and prints the final deliverable.
//!
//! Usage: `multiagent "<objective string>"`

use agent_flows::config::Config;
use agent_flows::llm::OpenAiClient;
use agent_flows::pipeline::Coordinator;
use agent_flows::trace::{LogSink, Tracer};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Some(objective) = std::env::args().nth(1) else {
        eprintln!("Usage: multiagent \"<objective string>\"");
        std::process::exit(1);
    };

    let config = Config::from_env()?;

    let llm = Arc::new(OpenAiClient::new(
        reqwest::Client::new(),
        config.llm.api_key.clone(),
        config.llm.model.clone(),
        config.llm.base_url.clone(),
    ));
    let tracer = Tracer::new("MultiAgent", Arc::new(LogSink));

    let coordinator = Coordinator::new(llm, tracer);
    let output = coordinator.run(&objective).await?;

    println!("\n===== FINAL OUTPUT =====\n");
    println!("{output}");
    Ok(())
}
