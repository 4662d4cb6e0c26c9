//! Batch research load-test
//!
//! Fires twenty research jobs concurrently. Each job runs a two-stage
//! research graph (collect facts, then write a report), is traced under its
//! own run, and fires an answer-relevancy evaluation without blocking the
//! report. A failed topic is logged and does not stop the other jobs.

use agent_flows::config::Config;
use agent_flows::eval::{HttpEvaluator, ScorerConfig};
use agent_flows::llm::{ChatMessage, ChatProvider, OpenAiClient};
use agent_flows::orchestrator::tool::{ToolGraph, ToolSpec};
use agent_flows::orchestrator::{EvaluationSettings, Orchestrator};
use agent_flows::trace::{LogSink, Tracer};
use std::sync::Arc;
use std::time::Instant;

const TOPICS: [&str; 20] = [
    "AI regulation timeline in the EU",
    "History of quantum supremacy claims",
    "Supply-chain risks for cobalt mining",
    "Impact of El Niño on global wheat prices",
    "Deepfake detection techniques 2025",
    "Cost drivers of small-modular reactors",
    "Ethics of brain–computer interfaces",
    "Nvidia vs AMD GPU market share 2024",
    "Drought-resistant maize genetics",
    "Quantum networking milestones",
    "Hydrogen fuel logistics in aviation",
    "Global lithium recycling startups",
    "Climate impact of cement alternatives",
    "Ocean iron fertilization research",
    "Privacy laws on facial recognition",
    "Roadmap for room-temperature superconductors",
    "Cybersecurity of EV charging stations",
    "VR therapy outcomes in PTSD",
    "Satellite mega-constellation debris risks",
    "AI chip export controls Asia",
];

/// Build the two-stage research graph: collect facts, then write the report
fn research_graph(llm: Arc<OpenAiClient>) -> ToolGraph {
    let research_llm = llm.clone();
    let report_llm = llm;

    ToolGraph::new(
        "run_research",
        vec![
            ToolSpec::new("conduct_research", move |args| {
                let llm = research_llm.clone();
                async move {
                    let messages = vec![
                        ChatMessage::system(
                            "You are a research assistant. Collect the key facts on the \
                             topic as concise bullet points with sources.",
                        ),
                        ChatMessage::user(args.objective.clone()),
                    ];
                    Ok(llm.complete(&messages, None).await?)
                }
            }),
            ToolSpec::new("write_report", move |args| {
                let llm = report_llm.clone();
                async move {
                    let messages = vec![
                        ChatMessage::system(
                            "You are a report writer. Turn the research notes into a \
                             structured report with an introduction and conclusion.",
                        ),
                        ChatMessage::user(format!(
                            "Topic: {}\n\nResearch notes:\n{}",
                            args.objective, args.deps[0]
                        )),
                    ];
                    Ok(llm.complete(&messages, None).await?)
                }
            })
            .depends_on(&["conduct_research"]),
        ],
        "write_report",
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    let http = reqwest::Client::new();
    let llm = Arc::new(OpenAiClient::new(
        http.clone(),
        config.llm.api_key.clone(),
        config.llm.model.clone(),
        config.llm.base_url.clone(),
    ));
    let evaluator = Arc::new(HttpEvaluator::new(
        http,
        config.eval.api_key.clone(),
        config.eval.base_url.clone(),
    ));
    let tracer = Tracer::new("GPT Researcher Load-Test", Arc::new(LogSink));

    let orchestrator = Arc::new(Orchestrator::new(tracer).with_evaluation(
        evaluator,
        EvaluationSettings {
            scorers: vec![ScorerConfig::answer_relevancy(0.7)],
            model: "gpt-4o".to_string(),
        },
    ));

    let started = Instant::now();

    let jobs = TOPICS.iter().map(|topic| {
        let orchestrator = orchestrator.clone();
        let graph = research_graph(llm.clone());
        async move { (*topic, orchestrator.run(&graph, topic).await) }
    });
    let outcomes = futures_util::future::join_all(jobs).await;

    let mut succeeded = 0;
    for (topic, outcome) in outcomes {
        match outcome {
            Ok(report) => {
                succeeded += 1;
                tracing::debug!(topic, report_len = report.len(), "Report finished");
            }
            Err(e) => tracing::error!(topic, error = %e, "Report failed"),
        }
    }

    println!(
        "Finished {}/{} reports in {:.1}s",
        succeeded,
        TOPICS.len(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
