//! Span instrumentation for tool and agent invocations
//!
//! The tracing collaborator wraps each unit of work as a named span and
//! reports its inputs-side metadata, timing and outcome to an injected
//! [`TraceSink`]. Instrumentation is observational only: [`Tracer::observe`]
//! returns the wrapped future's result unchanged and never alters control
//! flow.
//!
//! The tracer is an explicit value constructed at process start and passed
//! into orchestrators and agents; there is no global instance.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Kind of instrumented span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// A single tool call
    Tool,
    /// An agent invocation (one or more tool/LLM calls)
    Agent,
    /// A root workflow function
    Function,
}

impl SpanKind {
    /// Stable lowercase label for log output
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanKind::Tool => "tool",
            SpanKind::Agent => "agent",
            SpanKind::Function => "function",
        }
    }
}

/// Record of one completed span
#[derive(Debug, Clone)]
pub struct SpanRecord {
    /// Span name (tool or agent name)
    pub name: String,
    /// Span kind
    pub kind: SpanKind,
    /// Wall-clock duration of the wrapped work
    pub duration: Duration,
    /// Error description if the work failed
    pub error: Option<String>,
}

impl SpanRecord {
    /// Whether the wrapped work succeeded
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Observability sink receiving span events
///
/// Implementations must be cheap and infallible: a sink can log, buffer or
/// forward records, but it has no way to fail the observed work.
pub trait TraceSink: Send + Sync {
    /// Called when a span starts
    fn span_started(&self, name: &str, kind: SpanKind);
    /// Called when a span closes, successfully or not
    fn span_closed(&self, record: &SpanRecord);
}

/// Sink that forwards span events to the `tracing` subscriber
#[derive(Debug, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn span_started(&self, name: &str, kind: SpanKind) {
        tracing::debug!(span = %name, kind = %kind.as_str(), "span started");
    }

    fn span_closed(&self, record: &SpanRecord) {
        match &record.error {
            None => tracing::debug!(
                span = %record.name,
                kind = %record.kind.as_str(),
                duration_ms = record.duration.as_millis() as u64,
                "span completed"
            ),
            Some(error) => tracing::warn!(
                span = %record.name,
                kind = %record.kind.as_str(),
                duration_ms = record.duration.as_millis() as u64,
                error = %error,
                "span failed"
            ),
        }
    }
}

/// Named tracer bound to a project and a sink
#[derive(Clone)]
pub struct Tracer {
    project: String,
    sink: Arc<dyn TraceSink>,
}

impl Tracer {
    /// Create a tracer reporting to the given sink
    pub fn new(project: impl Into<String>, sink: Arc<dyn TraceSink>) -> Self {
        Self {
            project: project.into(),
            sink,
        }
    }

    /// Project name shown alongside every span
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Run a unit of work inside a named span
    ///
    /// Emits a start event, awaits the work, then emits a close event with
    /// the duration and outcome. The work's result is returned unchanged.
    pub async fn observe<T, E, Fut>(&self, name: &str, kind: SpanKind, work: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        self.sink.span_started(name, kind);
        let start = Instant::now();

        let result = work.await;

        self.sink.span_closed(&SpanRecord {
            name: name.to_string(),
            kind,
            duration: start.elapsed(),
            error: result.as_ref().err().map(|e| e.to_string()),
        });

        result
    }
}

impl std::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer")
            .field("project", &self.project)
            .finish_non_exhaustive()
    }
}
