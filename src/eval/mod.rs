//! Post-hoc quality evaluation collaborator
//!
//! After an orchestration produces its artifact, an [`EvaluationRequest`] is
//! submitted to an external scoring service. Submission is fire-and-forget:
//! the orchestrator never awaits the outcome, and submission errors are
//! logged but never propagated to the caller. The pass/fail judgment is
//! observed out-of-band (dashboard or logs).

pub mod client;

pub use client::HttpEvaluator;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Built-in scorer kinds understood by the evaluation service
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    /// How relevant the output is to the input
    AnswerRelevancy,
}

/// One scorer with its pass/fail threshold
#[derive(Serialize, Debug, Clone)]
pub struct ScorerConfig {
    /// Scorer kind
    pub kind: ScorerKind,
    /// Minimum score to pass
    pub threshold: f64,
}

impl ScorerConfig {
    /// Answer-relevancy scorer with the given threshold
    pub fn answer_relevancy(threshold: f64) -> Self {
        Self {
            kind: ScorerKind::AnswerRelevancy,
            threshold,
        }
    }
}

/// A quality-scoring request for one composed artifact
#[derive(Serialize, Debug, Clone)]
pub struct EvaluationRequest {
    /// The objective or question the run answered
    pub input: String,
    /// The composed artifact to score
    pub actual_output: String,
    /// Scorers to run
    pub scorers: Vec<ScorerConfig>,
    /// Model the judge should use
    pub model: String,
}

/// Failure modes of an evaluation submission
///
/// These are best-effort: callers of the orchestrator never see them.
#[derive(Error, Debug)]
pub enum EvalError {
    /// The HTTP request could not be sent
    #[error("Failed to send evaluation request: {0}")]
    Request(#[from] reqwest::Error),

    /// The service rejected the submission
    #[error("Evaluation service returned error status {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },
}

/// An evaluation submission collaborator
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Submit one evaluation request
    async fn submit(&self, request: EvaluationRequest) -> Result<(), EvalError>;
}

/// Submit an evaluation without blocking the caller
///
/// Spawns a detached task; the returned handle is for tests only and is
/// ignored by orchestrators. Submission errors are logged at warn level and
/// never propagate.
pub fn spawn_evaluation(
    evaluator: Arc<dyn Evaluator>,
    request: EvaluationRequest,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let input = request.input.clone();
        if let Err(e) = evaluator.submit(request).await {
            tracing::warn!(
                input = %input,
                error = %e,
                "Evaluation submission failed (ignored)"
            );
        }
    })
}
