//! Concurrent multi-tool orchestration
//!
//! An [`Orchestrator`] executes a [`tool::ToolGraph`] with the
//! dependency-aware dispatcher, extracts the terminal tool's output as the
//! composed artifact, and fires a non-blocking quality evaluation before
//! returning the artifact to the caller.

pub mod dispatcher;
pub mod tool;

use crate::error::OrchestratorError;
use crate::eval::{spawn_evaluation, EvaluationRequest, Evaluator, ScorerConfig};
use crate::trace::{SpanKind, Tracer};
use anyhow::anyhow;
use std::sync::Arc;
use uuid::Uuid;

/// Scorer configuration attached to every run of an orchestrator
#[derive(Debug, Clone)]
pub struct EvaluationSettings {
    /// Scorers the evaluation service should run
    pub scorers: Vec<ScorerConfig>,
    /// Model hint for the judge
    pub model: String,
}

/// Runs tool graphs and attaches post-hoc evaluation
pub struct Orchestrator {
    tracer: Tracer,
    evaluation: Option<(Arc<dyn Evaluator>, EvaluationSettings)>,
}

impl Orchestrator {
    /// Create an orchestrator without evaluation
    pub fn new(tracer: Tracer) -> Self {
        Self {
            tracer,
            evaluation: None,
        }
    }

    /// Attach a fire-and-forget evaluator
    pub fn with_evaluation(
        mut self,
        evaluator: Arc<dyn Evaluator>,
        settings: EvaluationSettings,
    ) -> Self {
        self.evaluation = Some((evaluator, settings));
        self
    }

    /// Execute a graph and return the composed artifact
    ///
    /// The whole run is wrapped in an agent span named after the graph.
    /// After the artifact is computed an evaluation request is submitted in
    /// a detached task; its outcome never affects the returned value, and
    /// the artifact is returned immediately after submission.
    ///
    /// # Arguments
    /// * `graph` - The tool graph to execute
    /// * `objective` - Free-text objective passed to every tool and reported
    ///   to the evaluator
    ///
    /// # Returns
    /// * `Ok(String)` - The terminal tool's output
    /// * `Err(OrchestratorError)` - Graph validation or a tool failed
    pub async fn run(
        &self,
        graph: &tool::ToolGraph,
        objective: &str,
    ) -> Result<String, OrchestratorError> {
        let run_id = Uuid::new_v4();

        tracing::debug!(
            run_id = %run_id,
            workflow = %graph.name(),
            total_tools = graph.tools().len(),
            "Starting orchestration"
        );

        let artifact = self
            .tracer
            .observe(graph.name(), SpanKind::Agent, async {
                let context = dispatcher::dispatch(graph, objective, &self.tracer).await?;
                context
                    .get_output(graph.terminal())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        OrchestratorError::Internal(anyhow!(
                            "terminal tool '{}' produced no output",
                            graph.terminal()
                        ))
                    })
            })
            .await?;

        if let Some((evaluator, settings)) = &self.evaluation {
            // Detached: the run's return is not ordered after submission
            spawn_evaluation(
                evaluator.clone(),
                EvaluationRequest {
                    input: objective.to_string(),
                    actual_output: artifact.clone(),
                    scorers: settings.scorers.clone(),
                    model: settings.model.clone(),
                },
            );
        }

        tracing::debug!(
            run_id = %run_id,
            workflow = %graph.name(),
            artifact_len = artifact.len(),
            "Orchestration completed"
        );

        Ok(artifact)
    }
}
