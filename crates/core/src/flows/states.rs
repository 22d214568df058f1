use serde::{Deserialize, Serialize};

use crate::domain::approval::{ApprovalStage, ApprovalStatus};
use crate::domain::document::DocumentKind;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApprovalAction {
    /// Move to the next stage of the document's chain.
    Advance,
    Reject { reason: String },
    Revise { remarks: String },
}

impl ApprovalAction {
    /// Wire name used by the shared status endpoint's `Action` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Advance => "approve",
            Self::Reject { .. } => "reject",
            Self::Revise { .. } => "revise",
        }
    }

    pub fn remarks(&self) -> Option<&str> {
        match self {
            Self::Advance => None,
            Self::Reject { reason } => Some(reason.as_str()),
            Self::Revise { remarks } => Some(remarks.as_str()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub kind: DocumentKind,
    pub from: ApprovalStatus,
    pub to: ApprovalStatus,
    pub action: ApprovalAction,
    /// Stage whose owner performs this transition. For rejection and revision
    /// this is the stage that would have come next.
    pub acting_stage: ApprovalStage,
}
