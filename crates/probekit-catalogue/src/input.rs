//! The typed input definition, its classifier, and the compilation dispatcher.

use camino::Utf8Path;
use probekit_templates::{CompiledTemplate, Template, TemplateCompileOptions, TemplateError};
use probekit_types::{Info, Resolver};
use probekit_workflows::{
    CompiledWorkflow, Compiler, Workflow, WorkflowCompileOptions, WorkflowError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The canonical typed representation of a definition file.
///
/// Both payload shapes are flattened in, matching the on-disk format where a
/// file is one or the other with no explicit discriminator. Which shape is
/// actually populated is decided by [`Input::classify`], never by inspecting
/// the fields directly.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Input {
    /// Unique identifier for the definition.
    pub id: String,

    /// Descriptive metadata; carried through compilation unchanged.
    pub info: Info,

    #[serde(flatten)]
    pub template: Template,

    #[serde(flatten)]
    pub workflow: Workflow,
}

/// The two definition kinds. Classification failure is an error, never a
/// third variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Template,
    Workflow,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Template => f.write_str("template"),
            InputKind::Workflow => f.write_str("workflow"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    /// Neither request collections nor workflow logic are present.
    #[error("input `{id}` is neither a template nor a workflow")]
    Unrecognized { id: String },

    /// Both shapes are populated. A file like this is malformed; refusing it
    /// outright beats picking a winner by precedence.
    #[error("input `{id}` mixes template and workflow fields")]
    Ambiguous { id: String },
}

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error("could not compile template")]
    Template(#[source] TemplateError),

    #[error("could not compile workflow")]
    Workflow(#[source] WorkflowError),
}

/// A successfully compiled definition. Exactly one payload exists by
/// construction; callers branch on the variant (or [`CompiledInput::kind`]).
#[derive(Debug)]
pub enum CompiledInput {
    Template(CompiledTemplate),
    Workflow(CompiledWorkflow),
}

impl CompiledInput {
    pub fn kind(&self) -> InputKind {
        match self {
            CompiledInput::Template(_) => InputKind::Template,
            CompiledInput::Workflow(_) => InputKind::Workflow,
        }
    }

    pub fn as_template(&self) -> Option<&CompiledTemplate> {
        match self {
            CompiledInput::Template(t) => Some(t),
            CompiledInput::Workflow(_) => None,
        }
    }

    pub fn as_workflow(&self) -> Option<&CompiledWorkflow> {
        match self {
            CompiledInput::Template(_) => None,
            CompiledInput::Workflow(w) => Some(w),
        }
    }
}

impl Input {
    /// Decide which kind this input represents.
    ///
    /// Template-shaped means any of the `dns`/`http`/`requests` collections
    /// is non-empty; workflow-shaped means the `workflows` logic collection
    /// is. Exactly one must hold.
    pub fn classify(&self) -> Result<InputKind, ClassifyError> {
        match (!self.template.is_empty(), !self.workflow.is_empty()) {
            (true, false) => Ok(InputKind::Template),
            (false, true) => Ok(InputKind::Workflow),
            (true, true) => Err(ClassifyError::Ambiguous {
                id: self.id.clone(),
            }),
            (false, false) => Err(ClassifyError::Unrecognized {
                id: self.id.clone(),
            }),
        }
    }

    /// Compile this input into its executable form.
    ///
    /// `path` is the definition file's own location, used by the sub-compilers
    /// to resolve relative references. The resolver goes to both branches; the
    /// compiler only to workflows, which recursively compile nested steps.
    pub fn compile(
        &self,
        path: &Utf8Path,
        resolver: &dyn Resolver,
        compiler: &dyn Compiler,
    ) -> Result<CompiledInput, CompileError> {
        match self.classify()? {
            InputKind::Template => {
                let compiled = self
                    .template
                    .compile(TemplateCompileOptions {
                        id: &self.id,
                        info: &self.info,
                        path,
                        resolver,
                    })
                    .map_err(CompileError::Template)?;
                Ok(CompiledInput::Template(compiled))
            }
            InputKind::Workflow => {
                let compiled = self
                    .workflow
                    .compile(WorkflowCompileOptions {
                        id: &self.id,
                        info: &self.info,
                        path,
                        resolver,
                        compiler,
                    })
                    .map_err(CompileError::Workflow)?;
                Ok(CompiledInput::Workflow(compiled))
            }
        }
    }
}
