use std::time::Duration;

use docflow_core::config::WorkflowConfig;
use docflow_core::domain::approval::{Actor, ApprovalRecord, ApprovalStatus};
use docflow_core::domain::document::{DocumentId, ResourceDescriptor};
use docflow_core::flows::StagedFlow;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ClientError;
use crate::transitions::{TransitionService, UpdatedRecord};

/// Result of driving one document. `failure` holds the error that stopped the run early.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DriveReport {
    pub document_id: DocumentId,
    pub start: ApprovalStatus,
    pub steps: Vec<UpdatedRecord>,
    pub final_status: ApprovalStatus,
    #[serde(serialize_with = "serialize_failure")]
    pub failure: Option<ClientError>,
}

impl DriveReport {
    pub fn completed(&self) -> bool {
        self.failure.is_none()
    }
}

fn serialize_failure<S>(failure: &Option<ClientError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match failure {
        Some(error) => serializer.serialize_some(&error.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Pushes a document through every remaining stage of its chain, one call at a time.
pub struct WorkflowDriver {
    service: TransitionService,
    step_delay: Duration,
}

impl WorkflowDriver {
    pub fn new(service: TransitionService, step_delay: Duration) -> Self {
        Self { service, step_delay }
    }

    pub fn from_config(service: TransitionService, config: &WorkflowConfig) -> Self {
        Self::new(service, Duration::from_millis(config.step_delay_ms))
    }

    /// Stops at the first failed step; no retry.
    pub async fn drive(
        &self,
        resource: &ResourceDescriptor,
        document_id: &DocumentId,
        current: ApprovalRecord,
        actor: &Actor,
    ) -> DriveReport {
        let flow = StagedFlow::new(resource.kind);
        let start = current.effective_status();
        let mut record = current;
        let mut status = start;
        let mut steps = Vec::new();
        let mut failure = None;

        info!(
            event_name = "workflow.drive.started",
            kind = %resource.kind,
            document_id = %document_id,
            status = %start,
            "driving document through remaining stages"
        );

        // Bounded by the chain length so a backend that keeps echoing an old status cannot loop us.
        for step in 0..=resource.kind.stages().len() {
            let Some(next) = flow.next_stage(status) else {
                break;
            };
            if step > 0 && !self.step_delay.is_zero() {
                tokio::time::sleep(self.step_delay).await;
            }

            let target = next.status();
            match self.service.advance(resource, document_id, &record, target, actor, None).await {
                Ok(updated) => {
                    info!(
                        event_name = "workflow.step.completed",
                        document_id = %document_id,
                        step,
                        status = %updated.status,
                        "workflow step completed"
                    );
                    record = updated.record.clone();
                    status = updated.status;
                    steps.push(updated);
                }
                Err(error) => {
                    warn!(
                        event_name = "workflow.step.failed",
                        document_id = %document_id,
                        step,
                        target = %target,
                        error = %error,
                        "workflow step failed"
                    );
                    failure = Some(error);
                    break;
                }
            }
        }

        DriveReport { document_id: document_id.clone(), start, steps, final_status: status, failure }
    }
}
