//! The workflow sub-compiler: resolves the shared variables file and
//! recursively compiles every referenced template through the `Compiler`
//! capability.

use crate::model::{Workflow, WorkflowStep};
use camino::{Utf8Path, Utf8PathBuf};
use probekit_types::{Info, Resolver};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque compiled artifact produced for a nested input. The workflow keeps
/// the artifact alive without knowing its concrete type; the catalogue's
/// compiled wrapper implements this.
pub trait CompiledStep: fmt::Debug + Send + Sync {}

/// Capability to compile a nested input definition recursively. Only the
/// workflow sub-compiler consumes this; templates never do.
pub trait Compiler {
    /// Compile the definition `reference` points at, resolved against the
    /// file at `base`.
    fn compile(&self, reference: &str, base: &Utf8Path) -> anyhow::Result<Box<dyn CompiledStep>>;
}

/// Configuration bundle handed to [`Workflow::compile`] by the dispatcher.
///
/// Carries both capabilities: the resolver for the variables file and the
/// compiler for nested steps.
pub struct WorkflowCompileOptions<'a> {
    pub id: &'a str,
    pub info: &'a Info,
    /// Path of the definition file, also the base for reference resolution.
    pub path: &'a Utf8Path,
    pub resolver: &'a dyn Resolver,
    pub compiler: &'a dyn Compiler,
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("workflow has no logic entries")]
    Empty,

    #[error("could not load variables file `{reference}`")]
    Variables {
        reference: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("variables file `{reference}`: line {line} is not `key=value`")]
    MalformedVariable { reference: String, line: usize },

    #[error("step {index}: could not compile template `{reference}`")]
    Step {
        index: usize,
        reference: String,
        #[source]
        source: anyhow::Error,
    },
}

/// A workflow after variable loading and recursive step compilation.
#[derive(Debug)]
pub struct CompiledWorkflow {
    pub id: String,
    pub info: Info,
    pub path: Utf8PathBuf,
    pub variables: BTreeMap<String, String>,
    pub steps: Vec<CompiledWorkflowStep>,
}

#[derive(Debug)]
pub struct CompiledWorkflowStep {
    pub template: String,
    pub compiled: Box<dyn CompiledStep>,
    pub subtemplates: Vec<CompiledWorkflowStep>,
}

impl Workflow {
    pub fn compile(
        &self,
        opts: WorkflowCompileOptions<'_>,
    ) -> Result<CompiledWorkflow, WorkflowError> {
        if self.is_empty() {
            return Err(WorkflowError::Empty);
        }

        let variables = match &self.variables {
            Some(reference) => load_variables(reference, &opts)?,
            None => BTreeMap::new(),
        };

        let steps = self
            .workflows
            .iter()
            .enumerate()
            .map(|(index, step)| compile_step(index, step, &opts))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompiledWorkflow {
            id: opts.id.to_string(),
            info: opts.info.clone(),
            path: opts.path.to_path_buf(),
            variables,
            steps,
        })
    }
}

fn load_variables(
    reference: &str,
    opts: &WorkflowCompileOptions<'_>,
) -> Result<BTreeMap<String, String>, WorkflowError> {
    let content = opts
        .resolver
        .resolve(reference, opts.path)
        .map_err(|source| WorkflowError::Variables {
            reference: reference.to_string(),
            source,
        })?;

    let mut variables = BTreeMap::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(WorkflowError::MalformedVariable {
                reference: reference.to_string(),
                line: lineno + 1,
            });
        };
        variables.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(variables)
}

fn compile_step(
    index: usize,
    step: &WorkflowStep,
    opts: &WorkflowCompileOptions<'_>,
) -> Result<CompiledWorkflowStep, WorkflowError> {
    let compiled = opts
        .compiler
        .compile(&step.template, opts.path)
        .map_err(|source| WorkflowError::Step {
            index,
            reference: step.template.clone(),
            source,
        })?;

    // Subtemplate failures report the index of their top-level step.
    let subtemplates = step
        .subtemplates
        .iter()
        .map(|sub| compile_step(index, sub, opts))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompiledWorkflowStep {
        template: step.template.clone(),
        compiled,
        subtemplates,
    })
}
