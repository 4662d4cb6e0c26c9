//! Sequential multi-phase coordinator
//!
//! The degenerate no-concurrency case of the orchestration pattern: a fixed
//! pipeline of research, planning, critique and execution over a shared
//! append-only blackboard, with exactly one conditional plan revision after
//! critique. This is not a general control loop; regardless of the revised
//! plan's quality there is never a second critique round.

pub mod prompts;

use crate::error::OrchestratorError;
use crate::llm::ChatProvider;
use crate::trace::{SpanKind, Tracer};
use chrono::{DateTime, Utc};
use prompts::{CriticPrompt, ExecutorPrompt, PlannerPrompt, PromptBuilder, ResearcherPrompt};
use std::sync::Arc;

/// One phase output on the blackboard
#[derive(Debug, Clone)]
pub struct BlackboardEntry {
    /// Agent that produced the entry
    pub author: String,
    /// The phase output
    pub content: String,
    /// When the entry was appended
    pub recorded_at: DateTime<Utc>,
}

/// Shared append-only log of phase outputs
///
/// Each phase appends exactly one entry; no phase mutates another's entry.
#[derive(Debug, Default)]
pub struct Blackboard {
    entries: Vec<BlackboardEntry>,
}

impl Blackboard {
    /// Create an empty blackboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one phase output
    pub fn append(&mut self, author: &str, content: &str) {
        self.entries.push(BlackboardEntry {
            author: author.to_string(),
            content: content.to_string(),
            recorded_at: Utc::now(),
        });
    }

    /// All entries in append order
    pub fn entries(&self) -> &[BlackboardEntry] {
        &self.entries
    }

    /// Render the most recent `n` entries as `[author] content` lines
    pub fn last_n(&self, n: usize) -> String {
        let start = self.entries.len().saturating_sub(n);
        self.entries[start..]
            .iter()
            .map(|e| format!("[{}] {}", e.author, e.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One LLM-backed pipeline agent: a named role with its prompt builder
pub struct Agent {
    name: String,
    builder: Box<dyn PromptBuilder>,
    temperature: Option<f32>,
}

impl Agent {
    /// Create an agent
    pub fn new(name: impl Into<String>, builder: Box<dyn PromptBuilder>) -> Self {
        Self {
            name: name.into(),
            builder,
            temperature: Some(0.7),
        }
    }

    /// Agent name (also the blackboard author)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the agent and append its response to the blackboard
    async fn call(
        &self,
        llm: &dyn ChatProvider,
        tracer: &Tracer,
        user_msg: &str,
        board: &mut Blackboard,
    ) -> Result<String, OrchestratorError> {
        let messages = self.builder.build(user_msg, board);

        let response = tracer
            .observe(
                &self.name,
                SpanKind::Agent,
                llm.complete(&messages, self.temperature),
            )
            .await
            .map_err(|e| OrchestratorError::tool_failure(self.name.clone(), e))?;

        board.append(&self.name, &response);
        Ok(response)
    }
}

/// Decide whether the critique asks for a plan revision
///
/// The Critic is prompted to answer with a JSON list of issues or `[]`.
/// Well-formed output is parsed structurally; output that is not valid JSON
/// falls back to the literal `[]` sentinel check the prompt establishes.
fn critique_requests_changes(critique: &str) -> bool {
    if let Ok(serde_json::Value::Array(issues)) = serde_json::from_str(critique.trim()) {
        return !issues.is_empty();
    }
    !critique.contains("[]")
}

/// Fixed four-phase pipeline coordinator
///
/// Phases run strictly in order: research, plan, critique, then execution,
/// with the plan revised exactly once when the critique reports issues.
pub struct Coordinator {
    llm: Arc<dyn ChatProvider>,
    tracer: Tracer,
    researcher: Agent,
    planner: Agent,
    critic: Agent,
    executor: Agent,
}

impl Coordinator {
    /// Create a coordinator with the standard four roles
    pub fn new(llm: Arc<dyn ChatProvider>, tracer: Tracer) -> Self {
        Self {
            llm,
            tracer,
            researcher: Agent::new("Researcher", Box::new(ResearcherPrompt)),
            planner: Agent::new("Planner", Box::new(PlannerPrompt)),
            critic: Agent::new("Critic", Box::new(CriticPrompt)),
            executor: Agent::new("Executor", Box::new(ExecutorPrompt)),
        }
    }

    /// Run the pipeline for one objective and return the final deliverable
    pub async fn run(&self, objective: &str) -> Result<String, OrchestratorError> {
        self.tracer
            .observe(
                "coordinator",
                SpanKind::Function,
                self.run_phases(objective),
            )
            .await
    }

    async fn run_phases(&self, objective: &str) -> Result<String, OrchestratorError> {
        let mut board = Blackboard::new();
        let llm = self.llm.as_ref();

        // Phase 1: research
        self.researcher
            .call(llm, &self.tracer, objective, &mut board)
            .await?;

        // Phase 2: planning
        let plan = self
            .planner
            .call(llm, &self.tracer, objective, &mut board)
            .await?;

        // Phase 3: critique, with at most one revision
        let critique = self
            .critic
            .call(llm, &self.tracer, &plan, &mut board)
            .await?;

        if critique_requests_changes(&critique) {
            tracing::debug!(critique_len = critique.len(), "Critique reported issues, revising plan once");
            self.planner
                .call(
                    llm,
                    &self.tracer,
                    &format!("Revise the plan to fix these issues: {}", critique),
                    &mut board,
                )
                .await?;
        }

        // Phase 4: execute
        let deliverable = self
            .executor
            .call(llm, &self.tracer, objective, &mut board)
            .await?;

        tracing::debug!(
            phases = board.entries().len(),
            deliverable_len = deliverable.len(),
            "Pipeline completed"
        );

        Ok(deliverable)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::llm::{ChatMessage, ChatProvider, LlmError};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// ChatProvider fake returning canned responses in order
    pub struct ScriptedProvider {
        responses: Mutex<VecDeque<String>>,
        calls: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedProvider {
        pub fn new(responses: &[&str]) -> Self {
            Self {
                responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Message lists of every call made so far
        pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatProvider for ScriptedProvider {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            _temperature: Option<f32>,
        ) -> Result<String, LlmError> {
            self.calls.lock().unwrap().push(messages.to_vec());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or(LlmError::Empty)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::ScriptedProvider;
    use super::*;
    use crate::trace::LogSink;

    fn test_tracer() -> Tracer {
        Tracer::new("pipeline-tests", Arc::new(LogSink))
    }

    #[test]
    fn test_critique_requests_changes_structured() {
        assert!(!critique_requests_changes("[]"));
        assert!(!critique_requests_changes("  [] "));
        assert!(critique_requests_changes(r#"["missing market data"]"#));
        assert!(critique_requests_changes(r#"[{"issue": "hallucinated source"}]"#));
    }

    #[test]
    fn test_critique_requests_changes_sentinel_fallback() {
        // Not valid JSON: the literal sentinel decides
        assert!(!critique_requests_changes("No issues found: []"));
        assert!(critique_requests_changes("The plan skips validation entirely."));
    }

    #[test]
    fn test_blackboard_last_n() {
        let mut board = Blackboard::new();
        board.append("Researcher", "facts");
        board.append("Planner", "plan");
        board.append("Critic", "[]");

        assert_eq!(board.last_n(2), "[Planner] plan\n[Critic] []");
        assert_eq!(board.last_n(10), "[Researcher] facts\n[Planner] plan\n[Critic] []");
        assert_eq!(Blackboard::new().last_n(3), "");
    }

    #[tokio::test]
    async fn test_clean_critique_skips_revision() {
        let llm = Arc::new(ScriptedProvider::new(&[
            "- fact",
            "1. plan step",
            "[]",
            "final deliverable",
        ]));
        let coordinator = Coordinator::new(llm.clone(), test_tracer());

        let result = coordinator.run("GPU trends memo").await.unwrap();

        assert_eq!(result, "final deliverable");
        // researcher, planner, critic, executor; no revision call
        assert_eq!(llm.call_count(), 4);
    }

    #[tokio::test]
    async fn test_critique_with_issues_revises_exactly_once() {
        let llm = Arc::new(ScriptedProvider::new(&[
            "- fact",
            "1. plan step",
            r#"["plan omits pricing data"]"#,
            "1. revised plan step",
            "final deliverable",
        ]));
        let coordinator = Coordinator::new(llm.clone(), test_tracer());

        let result = coordinator.run("GPU trends memo").await.unwrap();

        assert_eq!(result, "final deliverable");
        assert_eq!(llm.call_count(), 5);

        // The 4th call is the planner revision carrying the critique
        let calls = llm.calls();
        let revision_user_msg = &calls[3].last().unwrap().content;
        assert!(revision_user_msg.contains("Revise the plan"));
        assert!(revision_user_msg.contains("plan omits pricing data"));

        // The executor (5th call) sees the revised plan on the blackboard
        let executor_user_msg = &calls[4].last().unwrap().content;
        assert!(executor_user_msg.contains("1. revised plan step"));
    }

    #[tokio::test]
    async fn test_executor_runs_once_even_after_revision() {
        let llm = Arc::new(ScriptedProvider::new(&[
            "- fact",
            "1. plan step",
            "The plan skips validation entirely.",
            "1. revised plan step",
            "final deliverable",
        ]));
        let coordinator = Coordinator::new(llm.clone(), test_tracer());

        coordinator.run("objective").await.unwrap();

        // Exactly one executor call: the scripted queue is fully drained
        // and a sixth call would have failed with LlmError::Empty
        assert_eq!(llm.call_count(), 5);
    }

    #[tokio::test]
    async fn test_phase_failure_aborts_pipeline() {
        // Only two responses scripted: the critic call fails
        let llm = Arc::new(ScriptedProvider::new(&["- fact", "1. plan step"]));
        let coordinator = Coordinator::new(llm.clone(), test_tracer());

        match coordinator.run("objective").await {
            Err(OrchestratorError::ToolFailure { tool, .. }) => assert_eq!(tool, "Critic"),
            other => panic!("Expected ToolFailure, got: {:?}", other),
        }
        assert_eq!(llm.call_count(), 3, "executor never ran");
    }
}
