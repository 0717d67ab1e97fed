use serde::{Deserialize, Serialize};

/// Workflow-shaped payload: the `workflows` logic collection plus an optional
/// shared variables file.
///
/// Defaults to empty so it can be flattened into the input alongside the
/// template payload; shape detection happens in the catalogue.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workflows: Vec<WorkflowStep>,

    /// Reference to a `key=value` variables file shared by every step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<String>,
}

impl Workflow {
    /// True when the logic collection is unpopulated. A lone `variables`
    /// entry does not make an input workflow-shaped.
    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}

/// One entry in the logic collection: a template to execute, with optional
/// follow-up templates run against its matches.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub template: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtemplates: Vec<WorkflowStep>,
}
