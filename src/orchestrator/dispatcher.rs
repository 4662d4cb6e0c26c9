//! Dependency-aware concurrent dispatch
//!
//! Executes a validated [`ToolGraph`] so that each tool starts only after
//! all of its dependencies have written their output into the
//! [`RunContext`], while tools whose dependencies are already satisfied run
//! concurrently.
//!
//! Failure semantics: the first tool failure aborts the run. No further
//! tools are launched and the failure is surfaced as
//! [`OrchestratorError::ToolFailure`], but already-launched siblings are
//! never cancelled; the dispatcher waits for all of them before returning.
//! There is no retry and no internal timeout: a hung tool call blocks the
//! orchestration indefinitely, and callers needing bounded latency must
//! impose an external timeout.

use crate::error::OrchestratorError;
use crate::orchestrator::tool::{RunContext, ToolArgs, ToolGraph};
use crate::trace::{SpanKind, Tracer};
use anyhow::anyhow;
use std::collections::HashSet;
use tokio::task::JoinSet;

/// Execute all tools in the graph, respecting declared dependencies
///
/// # Arguments
/// * `graph` - The tool graph to execute (validated before anything starts)
/// * `objective` - Free-text objective passed to every tool
/// * `tracer` - Span instrumentation for each tool invocation
///
/// # Returns
/// * `Ok(RunContext)` - Every tool's output, keyed by tool name
/// * `Err(OrchestratorError)` - Graph validation failed, or a tool failed
pub async fn dispatch(
    graph: &ToolGraph,
    objective: &str,
    tracer: &Tracer,
) -> Result<RunContext, OrchestratorError> {
    graph.validate()?;

    let mut context = RunContext::default();
    let mut started: HashSet<&str> = HashSet::new();
    let mut in_flight: JoinSet<(String, anyhow::Result<String>)> = JoinSet::new();
    let mut first_failure: Option<OrchestratorError> = None;

    loop {
        // Launch every tool whose dependencies are satisfied. Once a failure
        // has been recorded nothing new starts, so dependents of the failed
        // tool (and everything else not yet launched) never run.
        if first_failure.is_none() {
            for tool in graph.tools() {
                if started.contains(tool.name()) {
                    continue;
                }
                if !tool
                    .deps()
                    .iter()
                    .all(|dep| context.get_output(dep).is_some())
                {
                    continue;
                }

                started.insert(tool.name());
                let args = ToolArgs {
                    objective: objective.to_string(),
                    // Dependency outputs in declared order, not completion order
                    deps: tool
                        .deps()
                        .iter()
                        .map(|dep| {
                            context
                                .get_output(dep)
                                .expect("dependency completed")
                                .to_string()
                        })
                        .collect(),
                };

                tracing::debug!(
                    tool = %tool.name(),
                    num_deps = tool.deps().len(),
                    "Launching tool"
                );

                let name = tool.name().to_string();
                let run = tool.runner();
                let task_tracer = tracer.clone();
                in_flight.spawn(async move {
                    let result = task_tracer.observe(&name, SpanKind::Tool, run(args)).await;
                    (name, result)
                });
            }
        }

        let Some(joined) = in_flight.join_next().await else {
            break;
        };

        match joined {
            Ok((name, Ok(output))) => {
                tracing::debug!(
                    tool = %name,
                    output_len = output.len(),
                    "Tool completed"
                );
                context.set_output(&name, output);
            }
            Ok((name, Err(cause))) => {
                if first_failure.is_none() {
                    tracing::error!(tool = %name, error = %cause, "Tool failed, aborting run");
                    first_failure = Some(OrchestratorError::ToolFailure { tool: name, cause });
                } else {
                    tracing::warn!(
                        tool = %name,
                        error = %cause,
                        "Additional tool failure after run already failed"
                    );
                }
            }
            Err(join_error) => {
                if first_failure.is_none() {
                    first_failure = Some(OrchestratorError::Internal(anyhow!(
                        "tool task aborted unexpectedly: {}",
                        join_error
                    )));
                }
            }
        }
    }

    if let Some(failure) = first_failure {
        return Err(failure);
    }

    if context.len() != graph.tools().len() {
        return Err(OrchestratorError::Internal(anyhow!(
            "dispatch finished with {} of {} tool outputs",
            context.len(),
            graph.tools().len()
        )));
    }

    Ok(context)
}
