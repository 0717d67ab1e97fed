//! Workflow payloads: ordered compositions of other templates' executions.
//!
//! Workflows are the one place that needs to compile nested definitions, so
//! this crate also defines the `Compiler` capability the catalogue implements.

#![forbid(unsafe_code)]

mod compile;
mod model;

pub use compile::{
    CompiledStep, CompiledWorkflow, CompiledWorkflowStep, Compiler, WorkflowCompileOptions,
    WorkflowError,
};
pub use model::{Workflow, WorkflowStep};
