//! Trip planner demo
//!
//! Builds a three-day itinerary for a city: a local weather lookup and two
//! concurrent LLM searches (restaurants, museums) feed a terminal
//! compilation tool. The composed itinerary is printed to stdout and an
//! answer-relevancy evaluation is fired without blocking the result.
//!
//! Usage: `trip-planner [city]` (defaults to Barcelona).

use agent_flows::config::Config;
use agent_flows::eval::{HttpEvaluator, ScorerConfig};
use agent_flows::llm::{ChatMessage, ChatProvider, OpenAiClient};
use agent_flows::orchestrator::tool::{ToolGraph, ToolSpec};
use agent_flows::orchestrator::{EvaluationSettings, Orchestrator};
use agent_flows::trace::{LogSink, Tracer};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Pick a forecast for the city
///
/// Deterministic stand-in for a weather service: the same city always gets
/// the same forecast.
fn forecast_for(city: &str) -> &'static str {
    const FORECASTS: [&str; 3] = ["sunny", "rainy", "cloudy"];
    let mut hasher = DefaultHasher::new();
    city.hash(&mut hasher);
    FORECASTS[(hasher.finish() % FORECASTS.len() as u64) as usize]
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or(text)
}

/// Build the itinerary tool graph
///
/// `get_weather`, `search_restaurants` and `search_museums` have no mutual
/// dependencies and run concurrently; `compile_itinerary` consumes all
/// three in declared order.
fn itinerary_graph(llm: Arc<OpenAiClient>) -> ToolGraph {
    let restaurants_llm = llm.clone();
    let museums_llm = llm;

    ToolGraph::new(
        "plan_trip",
        vec![
            ToolSpec::new("get_weather", |args| async move {
                Ok(format!(
                    "The forecast for {} next week is {}.",
                    args.objective,
                    forecast_for(&args.objective)
                ))
            }),
            ToolSpec::new("search_restaurants", move |args| {
                let llm = restaurants_llm.clone();
                async move {
                    let messages = vec![
                        ChatMessage::system("You are a food critic."),
                        ChatMessage::user(format!(
                            "Top 3 must-eat restaurants in {}.",
                            args.objective
                        )),
                    ];
                    Ok(llm.complete(&messages, None).await?)
                }
            }),
            ToolSpec::new("search_museums", move |args| {
                let llm = museums_llm.clone();
                async move {
                    let messages = vec![
                        ChatMessage::system("You are a travel curator."),
                        ChatMessage::user(format!("Three must-see museums in {}.", args.objective)),
                    ];
                    Ok(llm.complete(&messages, None).await?)
                }
            }),
            ToolSpec::new("compile_itinerary", |args| async move {
                let city = &args.objective;
                let weather = &args.deps[0];
                let food = &args.deps[1];
                let culture = &args.deps[2];
                Ok(format!(
                    "**{city} - 3-Day Itinerary**\n\n\
                     Weather snapshot: {weather}\n\n\
                     - Day 1: Morning market crawl, lunch at {}\n\
                     - Day 2: Spend the afternoon at {}\n\
                     - Day 3: Free day, evening food tour\n\n\
                     Enjoy your trip!",
                    first_line(food),
                    first_line(culture)
                ))
            })
            .depends_on(&["get_weather", "search_restaurants", "search_museums"]),
        ],
        "compile_itinerary",
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let city = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Barcelona".to_string());

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
    let tracer = Tracer::new("Flowchart Demo", Arc::new(LogSink));

    let orchestrator = Orchestrator::new(tracer).with_evaluation(
        evaluator,
        EvaluationSettings {
            scorers: vec![ScorerConfig::answer_relevancy(0.6)],
            model: "gpt-4o".to_string(),
        },
    );

    let graph = itinerary_graph(llm);
    let itinerary = orchestrator.run(&graph, &city).await?;

    println!("{itinerary}");
    Ok(())
}
