//! Error types and error handling for the crate
//!
//! This module defines the error taxonomy shared by the dispatcher, the
//! orchestrator and the sequential pipeline. Configuration and graph-shape
//! errors are fatal and reported before any tool runs; tool failures abort
//! the current run only.

use thiserror::Error;

/// Orchestration error types
///
/// All errors that can abort an orchestration run are represented by this
/// enum. Evaluation submission failures are deliberately absent: they are
/// logged by the evaluation hook and never propagate to the caller.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// Required configuration is missing or invalid (e.g. missing API key)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The tool graph contains a dependency cycle
    ///
    /// Carries the names of the tools that could never become ready,
    /// sorted for deterministic reporting.
    #[error("Cyclic dependency among tools: {0:?}")]
    CyclicDependency(Vec<String>),

    /// A tool declares a dependency on a tool that is not in the graph
    #[error("Tool '{tool}' depends on unknown tool '{dependency}'")]
    UnknownDependency {
        /// The tool declaring the dependency
        tool: String,
        /// The missing dependency name
        dependency: String,
    },

    /// Two tools in the same graph share a name
    #[error("Duplicate tool name: '{0}'")]
    DuplicateTool(String),

    /// The designated terminal tool is not in the graph
    #[error("Terminal tool '{0}' is not defined in the graph")]
    UnknownTerminal(String),

    /// A tool invocation failed; dependents were not started
    #[error("Tool '{tool}' failed: {cause}")]
    ToolFailure {
        /// Name of the failing tool
        tool: String,
        /// Underlying failure
        #[source]
        cause: anyhow::Error,
    },

    /// Internal error (catch-all for unexpected conditions)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl OrchestratorError {
    /// Wrap an arbitrary failure as a `ToolFailure` for the named tool
    pub fn tool_failure(tool: impl Into<String>, cause: impl Into<anyhow::Error>) -> Self {
        Self::ToolFailure {
            tool: tool.into(),
            cause: cause.into(),
        }
    }
}
