//! Prompt construction for the four pipeline roles
//!
//! Each role is a [`PromptBuilder`]: a capability that turns the incoming
//! user message and the shared blackboard into a role-tagged message list.
//! Roles are composed into agents by value; there is no inheritance
//! hierarchy behind them.

use crate::llm::ChatMessage;
use crate::pipeline::Blackboard;

/// Builds the message list for one agent invocation
pub trait PromptBuilder: Send + Sync {
    /// Construct the messages for this role
    ///
    /// # Arguments
    /// * `user_msg` - The message addressed to this agent
    /// * `board` - The shared blackboard with all prior phase outputs
    fn build(&self, user_msg: &str, board: &Blackboard) -> Vec<ChatMessage>;
}

/// Researcher: collects citation-ready facts
pub struct ResearcherPrompt;

impl PromptBuilder for ResearcherPrompt {
    fn build(&self, user_msg: &str, _board: &Blackboard) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(
                "You are Researcher, an expert at collecting citation-ready facts. \
                 Return bullet points only, no opinion.",
            ),
            ChatMessage::user(user_msg),
        ]
    }
}

/// Planner: turns facts into a numbered execution plan
pub struct PlannerPrompt;

impl PromptBuilder for PlannerPrompt {
    fn build(&self, user_msg: &str, board: &Blackboard) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(
                "You are Planner. Using the researcher's notes, craft a numbered \
                 execution plan that another agent can follow. Be specific.",
            ),
            ChatMessage::user(format!(
                "{}\n\nRecent notes:\n{}",
                user_msg,
                board.last_n(5)
            )),
        ]
    }
}

/// Critic: spots flaws, missing data and hallucinations in the plan
pub struct CriticPrompt;

impl PromptBuilder for CriticPrompt {
    fn build(&self, user_msg: &str, _board: &Blackboard) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(
                "You are Critic. Identify logical flaws, missing data, or hallucinations \
                 in the planner output. Respond with a JSON list of issues or [].",
            ),
            ChatMessage::user(user_msg),
        ]
    }
}

/// Executor: generates the final deliverable from the approved plan
pub struct ExecutorPrompt;

impl PromptBuilder for ExecutorPrompt {
    fn build(&self, user_msg: &str, board: &Blackboard) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(
                "You are Executor. Follow the approved plan and generate the final \
                 deliverable requested by the user. Include footer citations.",
            ),
            ChatMessage::user(format!(
                "{}\n\nPlan & feedback:\n{}",
                user_msg,
                board.last_n(5)
            )),
        ]
    }
}
