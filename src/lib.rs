//! Instrumented LLM agent workflows
//!
//! Building blocks for small agent workflows that call some tools
//! sequentially and others concurrently, merge their outputs
//! deterministically, and attach a fire-and-forget quality evaluation to
//! each run:
//!
//! - [`orchestrator`]: tool graphs, the dependency-aware concurrent
//!   dispatcher and the orchestrator itself
//! - [`pipeline`]: the fixed four-phase sequential coordinator
//!   (research, plan, critique, execute)
//! - [`llm`]: the chat completion collaborator
//! - [`eval`]: the post-hoc evaluation collaborator
//! - [`trace`]: span instrumentation with injected sinks
//!
//! The demonstration binaries are in `src/main.rs` and `src/bin/`.

pub mod config;
pub mod error;
pub mod eval;
pub mod llm;
pub mod orchestrator;
pub mod pipeline;
pub mod trace;
