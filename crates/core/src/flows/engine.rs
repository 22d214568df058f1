use std::collections::BTreeMap;

use thiserror::Error;

use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::domain::approval::{ApprovalStage, ApprovalStatus, Role};
use crate::domain::document::DocumentKind;
use crate::flows::states::{ApprovalAction, TransitionOutcome};

pub trait FlowDefinition {
    fn kind(&self) -> DocumentKind;
    fn initial_status(&self) -> ApprovalStatus;
    fn allowed_next(&self, current: ApprovalStatus) -> Vec<ApprovalStatus>;
    fn transition(
        &self,
        current: ApprovalStatus,
        action: &ApprovalAction,
    ) -> Result<TransitionOutcome, TransitionError>;
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("{kind} cannot move from {from} to {to}")]
    InvalidTransition { kind: DocumentKind, from: ApprovalStatus, to: ApprovalStatus },
    #[error("{kind} in status {from} has no further approval stage")]
    NoFurtherStage { kind: DocumentKind, from: ApprovalStatus },
    #[error("a reason is required to move a document to {target}")]
    MissingReason { target: ApprovalStatus },
}

/// Legal moves as a `{status -> allowed next statuses}` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionGraph {
    edges: BTreeMap<ApprovalStatus, Vec<ApprovalStatus>>,
}

impl TransitionGraph {
    pub fn allowed_next(&self, from: ApprovalStatus) -> &[ApprovalStatus] {
        self.edges.get(&from).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn allows(&self, from: ApprovalStatus, to: ApprovalStatus) -> bool {
        self.allowed_next(from).contains(&to)
    }

    pub fn is_terminal(&self, status: ApprovalStatus) -> bool {
        self.allowed_next(status).is_empty()
    }
}

/// The fixed Prepared → … → Received (→ Closed) chain of one document kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StagedFlow {
    kind: DocumentKind,
}

impl StagedFlow {
    pub fn new(kind: DocumentKind) -> Self {
        Self { kind }
    }

    /// Stage that executes next from `current`, if any.
    pub fn next_stage(&self, current: ApprovalStatus) -> Option<ApprovalStage> {
        let stages = self.kind.stages();
        match current {
            ApprovalStatus::Draft | ApprovalStatus::Revised => stages.first().copied(),
            ApprovalStatus::Rejected => None,
            stage_status => {
                let stage = stage_status.stage()?;
                let position = stages.iter().position(|candidate| *candidate == stage)?;
                stages.get(position + 1).copied()
            }
        }
    }

    /// A document is in progress once prepared and until its chain ends.
    fn in_progress(&self, current: ApprovalStatus) -> bool {
        current.stage().is_some() && self.next_stage(current).is_some()
    }

    pub fn graph(&self) -> TransitionGraph {
        let edges = ApprovalStatus::ALL
            .iter()
            .map(|status| (*status, self.allowed_next(*status)))
            .collect();
        TransitionGraph { edges }
    }

    /// Whether the page owned by `role` may act on a document in `current`.
    pub fn actionable_by(&self, role: Role, current: ApprovalStatus) -> bool {
        self.next_stage(current) == Some(role.stage())
    }

    /// Maps a requested target status onto the action that reaches it.
    pub fn action_for(
        &self,
        current: ApprovalStatus,
        target: ApprovalStatus,
        remarks: Option<&str>,
    ) -> Result<ApprovalAction, TransitionError> {
        let remarks = remarks.unwrap_or_default().to_string();
        match target {
            ApprovalStatus::Rejected => Ok(ApprovalAction::Reject { reason: remarks }),
            ApprovalStatus::Revised => Ok(ApprovalAction::Revise { remarks }),
            _ if self.next_stage(current).map(|stage| stage.status()) == Some(target) => {
                Ok(ApprovalAction::Advance)
            }
            _ => Err(TransitionError::InvalidTransition { kind: self.kind, from: current, to: target }),
        }
    }

    fn branch(
        &self,
        current: ApprovalStatus,
        target: ApprovalStatus,
        reason: &str,
    ) -> Result<ApprovalStage, TransitionError> {
        if reason.trim().is_empty() {
            return Err(TransitionError::MissingReason { target });
        }
        if !self.in_progress(current) {
            return Err(TransitionError::InvalidTransition {
                kind: self.kind,
                from: current,
                to: target,
            });
        }
        self.next_stage(current).ok_or(TransitionError::NoFurtherStage {
            kind: self.kind,
            from: current,
        })
    }
}

impl FlowDefinition for StagedFlow {
    fn kind(&self) -> DocumentKind {
        self.kind
    }

    fn initial_status(&self) -> ApprovalStatus {
        ApprovalStatus::Draft
    }

    fn allowed_next(&self, current: ApprovalStatus) -> Vec<ApprovalStatus> {
        let mut next: Vec<ApprovalStatus> =
            self.next_stage(current).map(|stage| stage.status()).into_iter().collect();
        if self.in_progress(current) {
            next.push(ApprovalStatus::Rejected);
            next.push(ApprovalStatus::Revised);
        }
        next
    }

    fn transition(
        &self,
        current: ApprovalStatus,
        action: &ApprovalAction,
    ) -> Result<TransitionOutcome, TransitionError> {
        let (to, acting_stage) = match action {
            ApprovalAction::Advance => {
                let stage = self.next_stage(current).ok_or(TransitionError::NoFurtherStage {
                    kind: self.kind,
                    from: current,
                })?;
                (stage.status(), stage)
            }
            ApprovalAction::Reject { reason } => {
                (ApprovalStatus::Rejected, self.branch(current, ApprovalStatus::Rejected, reason)?)
            }
            ApprovalAction::Revise { remarks } => {
                (ApprovalStatus::Revised, self.branch(current, ApprovalStatus::Revised, remarks)?)
            }
        };

        Ok(TransitionOutcome { kind: self.kind, from: current, to, action: action.clone(), acting_stage })
    }
}

pub struct WorkflowEngine<F> {
    flow: F,
}

impl<F> WorkflowEngine<F>
where
    F: FlowDefinition,
{
    pub fn new(flow: F) -> Self {
        Self { flow }
    }

    pub fn flow(&self) -> &F {
        &self.flow
    }

    pub fn kind(&self) -> DocumentKind {
        self.flow.kind()
    }

    pub fn initial_status(&self) -> ApprovalStatus {
        self.flow.initial_status()
    }

    pub fn apply(
        &self,
        current: ApprovalStatus,
        action: &ApprovalAction,
    ) -> Result<TransitionOutcome, TransitionError> {
        self.flow.transition(current, action)
    }

    pub fn apply_with_audit<S>(
        &self,
        current: ApprovalStatus,
        action: &ApprovalAction,
        sink: &S,
        audit: &AuditContext,
    ) -> Result<TransitionOutcome, TransitionError>
    where
        S: AuditSink + ?Sized,
    {
        let result = self.apply(current, action);
        match &result {
            Ok(outcome) => {
                sink.emit(
                    AuditEvent::new(
                        audit.document_id.clone(),
                        Some(self.kind()),
                        audit.correlation_id.clone(),
                        "approval.transition_applied",
                        AuditCategory::Transition,
                        audit.actor.clone(),
                        AuditOutcome::Success,
                    )
                    .with_metadata("from", outcome.from.as_str())
                    .with_metadata("to", outcome.to.as_str())
                    .with_metadata("action", outcome.action.as_str()),
                );
            }
            Err(error) => {
                sink.emit(
                    AuditEvent::new(
                        audit.document_id.clone(),
                        Some(self.kind()),
                        audit.correlation_id.clone(),
                        "approval.transition_rejected",
                        AuditCategory::Transition,
                        audit.actor.clone(),
                        AuditOutcome::Rejected,
                    )
                    .with_metadata("error", error.to_string()),
                );
            }
        }
        result
    }
}

impl WorkflowEngine<StagedFlow> {
    pub fn for_kind(kind: DocumentKind) -> Self {
        Self::new(StagedFlow::new(kind))
    }
}

impl Role {
    pub fn can_act(&self, kind: DocumentKind, current: ApprovalStatus) -> bool {
        StagedFlow::new(kind).actionable_by(*self, current)
    }
}
