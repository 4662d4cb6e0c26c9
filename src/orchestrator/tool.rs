//! Tool graph data model
//!
//! A workflow is a statically-declared set of [`ToolSpec`]s forming a DAG,
//! plus one designated terminal tool whose output is the composed artifact.
//! The graph is configuration, not runtime state: it is validated once
//! before dispatch and never mutated during a run.

use crate::error::OrchestratorError;
use std::collections::{HashMap, HashSet, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Output of one tool invocation
pub type ToolOutput = anyhow::Result<String>;

/// Boxed future produced by a tool's run function
pub type ToolFuture = Pin<Box<dyn Future<Output = ToolOutput> + Send>>;

type ToolFn = Arc<dyn Fn(ToolArgs) -> ToolFuture + Send + Sync>;

/// Inputs handed to a tool when it becomes ready
#[derive(Debug, Clone)]
pub struct ToolArgs {
    /// The free-text objective the orchestration was invoked with
    pub objective: String,
    /// Outputs of this tool's dependencies, in declared `depends_on` order
    ///
    /// The order is fixed by the declaration, never by which dependency
    /// finished first.
    pub deps: Vec<String>,
}

/// A unit of work with a name, declared dependencies and an async run function
pub struct ToolSpec {
    name: String,
    depends_on: Vec<String>,
    run: ToolFn,
}

impl ToolSpec {
    /// Create a tool from an async function
    ///
    /// # Example
    /// ```no_run
    /// use agent_flows::orchestrator::tool::ToolSpec;
    ///
    /// let weather = ToolSpec::new("get_weather", |args| async move {
    ///     Ok(format!("The forecast for {} next week is sunny.", args.objective))
    /// });
    /// ```
    pub fn new<F, Fut>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn(ToolArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolOutput> + Send + 'static,
    {
        Self {
            name: name.into(),
            depends_on: Vec::new(),
            run: Arc::new(move |args| Box::pin(run(args))),
        }
    }

    /// Declare the tools this tool depends on, in argument order
    pub fn depends_on(mut self, deps: &[&str]) -> Self {
        self.depends_on = deps.iter().map(|d| d.to_string()).collect();
        self
    }

    /// Tool name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared dependencies in argument order
    pub fn deps(&self) -> &[String] {
        &self.depends_on
    }

    pub(crate) fn runner(&self) -> ToolFn {
        self.run.clone()
    }
}

impl std::fmt::Debug for ToolSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSpec")
            .field("name", &self.name)
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

/// A named DAG of tools with one terminal tool
#[derive(Debug)]
pub struct ToolGraph {
    name: String,
    tools: Vec<ToolSpec>,
    terminal: String,
}

impl ToolGraph {
    /// Create a graph
    ///
    /// # Arguments
    /// * `name` - Workflow name used for the root span
    /// * `tools` - All tools in the graph
    /// * `terminal` - Name of the tool whose output is the composed artifact
    pub fn new(name: impl Into<String>, tools: Vec<ToolSpec>, terminal: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tools,
            terminal: terminal.into(),
        }
    }

    /// Workflow name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All tools in the graph
    pub fn tools(&self) -> &[ToolSpec] {
        &self.tools
    }

    /// Name of the terminal tool
    pub fn terminal(&self) -> &str {
        &self.terminal
    }

    /// Validate the graph before dispatch
    ///
    /// Rejects duplicate tool names, dependencies on undefined tools, an
    /// undefined terminal tool, and dependency cycles. Cycle detection runs
    /// Kahn's algorithm; the error names the tools that could never become
    /// ready, sorted for deterministic reporting.
    ///
    /// # Returns
    /// * `Ok(())` - The graph is dispatchable
    /// * `Err(OrchestratorError)` - The first problem found
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        let mut names: HashSet<&str> = HashSet::new();
        for tool in &self.tools {
            if !names.insert(tool.name()) {
                return Err(OrchestratorError::DuplicateTool(tool.name().to_string()));
            }
        }

        for tool in &self.tools {
            for dep in tool.deps() {
                if !names.contains(dep.as_str()) {
                    return Err(OrchestratorError::UnknownDependency {
                        tool: tool.name().to_string(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        if !names.contains(self.terminal.as_str()) {
            return Err(OrchestratorError::UnknownTerminal(self.terminal.clone()));
        }

        // Kahn's algorithm: peel off zero-indegree tools; anything left over
        // is part of (or downstream of) a cycle.
        let mut indegree: HashMap<&str, usize> = self
            .tools
            .iter()
            .map(|t| (t.name(), t.deps().len()))
            .collect();
        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
        for tool in &self.tools {
            for dep in tool.deps() {
                dependents.entry(dep.as_str()).or_default().push(tool.name());
            }
        }

        let mut queue: VecDeque<&str> = indegree
            .iter()
            .filter(|(_, d)| **d == 0)
            .map(|(n, _)| *n)
            .collect();
        let mut resolved = 0usize;

        while let Some(name) = queue.pop_front() {
            resolved += 1;
            for dependent in dependents.get(name).into_iter().flatten() {
                let d = indegree
                    .get_mut(dependent)
                    .expect("dependent is a known tool");
                *d -= 1;
                if *d == 0 {
                    queue.push_back(dependent);
                }
            }
        }

        if resolved < self.tools.len() {
            let mut unresolved: Vec<String> = indegree
                .iter()
                .filter(|(_, d)| **d > 0)
                .map(|(n, _)| n.to_string())
                .collect();
            unresolved.sort();
            return Err(OrchestratorError::CyclicDependency(unresolved));
        }

        Ok(())
    }
}

/// Per-run mapping from tool name to produced output
///
/// Created fresh at dispatch start and discarded once the artifact has been
/// extracted. A key is written exactly once: overwriting another tool's
/// entry is a programming error, not a runtime condition to recover from.
#[derive(Debug, Default)]
pub struct RunContext {
    outputs: HashMap<String, String>,
}

impl RunContext {
    /// Store the output of a completed tool
    ///
    /// # Panics
    /// Panics if the tool already has an output recorded.
    pub fn set_output(&mut self, name: &str, output: String) {
        let previous = self.outputs.insert(name.to_string(), output);
        assert!(
            previous.is_none(),
            "output for tool '{}' written twice",
            name
        );
    }

    /// Output of a tool, if it has completed
    pub fn get_output(&self, name: &str) -> Option<&str> {
        self.outputs.get(name).map(String::as_str)
    }

    /// Number of completed tools
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Whether no tool has completed yet
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str) -> ToolSpec {
        ToolSpec::new(name, |_| async { Ok(String::new()) })
    }

    #[test]
    fn test_validate_accepts_diamond() {
        let graph = ToolGraph::new(
            "diamond",
            vec![
                noop("a"),
                noop("b").depends_on(&["a"]),
                noop("c").depends_on(&["a"]),
                noop("d").depends_on(&["b", "c"]),
            ],
            "d",
        );
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_two_node_cycle() {
        let graph = ToolGraph::new(
            "cycle",
            vec![noop("a").depends_on(&["b"]), noop("b").depends_on(&["a"])],
            "b",
        );
        match graph.validate() {
            Err(OrchestratorError::CyclicDependency(tools)) => {
                assert_eq!(tools, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("Expected CyclicDependency, got: {:?}", other),
        }
    }

    #[test]
    fn test_validate_names_only_cycle_members() {
        // c is acyclic; only a and b are unresolved
        let graph = ToolGraph::new(
            "partial",
            vec![
                noop("a").depends_on(&["b"]),
                noop("b").depends_on(&["a"]),
                noop("c"),
            ],
            "c",
        );
        match graph.validate() {
            Err(OrchestratorError::CyclicDependency(tools)) => {
                assert_eq!(tools, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("Expected CyclicDependency, got: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_self_dependency() {
        let graph = ToolGraph::new("selfloop", vec![noop("a").depends_on(&["a"])], "a");
        assert!(matches!(
            graph.validate(),
            Err(OrchestratorError::CyclicDependency(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_dependency() {
        let graph = ToolGraph::new("bad", vec![noop("a").depends_on(&["ghost"])], "a");
        match graph.validate() {
            Err(OrchestratorError::UnknownDependency { tool, dependency }) => {
                assert_eq!(tool, "a");
                assert_eq!(dependency, "ghost");
            }
            other => panic!("Expected UnknownDependency, got: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_duplicate_name() {
        let graph = ToolGraph::new("dup", vec![noop("a"), noop("a")], "a");
        assert!(matches!(
            graph.validate(),
            Err(OrchestratorError::DuplicateTool(name)) if name == "a"
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_terminal() {
        let graph = ToolGraph::new("noterm", vec![noop("a")], "missing");
        assert!(matches!(
            graph.validate(),
            Err(OrchestratorError::UnknownTerminal(name)) if name == "missing"
        ));
    }

    #[test]
    #[should_panic(expected = "written twice")]
    fn test_run_context_rejects_overwrite() {
        let mut context = RunContext::default();
        context.set_output("a", "first".to_string());
        context.set_output("a", "second".to_string());
    }
}
