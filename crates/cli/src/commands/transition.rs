use std::sync::Arc;

use docflow_client::{ApiClient, ClientError, TransitionService};
use docflow_core::audit::InMemoryAuditSink;
use docflow_core::domain::approval::ApprovalStatus;
use docflow_core::domain::document::{DocumentId, ResourceDescriptor};
use docflow_core::flows::{StagedFlow, TransitionError};
use serde::Serialize;

use crate::commands::{
    build_runtime, invalid_argument, load_config, CommandResult, DocumentArgs,
};

/// Which way to move the document.
#[derive(Debug, Clone)]
pub enum TransitionRequest {
    /// To the next stage of the chain.
    Advance,
    Reject { reason: String },
    Revise { remarks: String },
}

impl TransitionRequest {
    fn command(&self) -> &'static str {
        match self {
            Self::Advance => "advance",
            Self::Reject { .. } => "reject",
            Self::Revise { .. } => "revise",
        }
    }

    fn remarks(&self) -> Option<&str> {
        match self {
            Self::Advance => None,
            Self::Reject { reason } => Some(reason),
            Self::Revise { remarks } => Some(remarks),
        }
    }

    fn branch_target(&self) -> Option<ApprovalStatus> {
        match self {
            Self::Advance => None,
            Self::Reject { .. } => Some(ApprovalStatus::Rejected),
            Self::Revise { .. } => Some(ApprovalStatus::Revised),
        }
    }
}

#[derive(Debug, Serialize)]
struct TransitionReport {
    document_id: DocumentId,
    kind: String,
    from: ApprovalStatus,
    to: ApprovalStatus,
    audit_events: Vec<String>,
}

pub fn run(args: DocumentArgs, request: TransitionRequest) -> CommandResult {
    let command = request.command();

    let resource = match args.resource() {
        Ok(resource) => resource,
        Err(message) => return invalid_argument(command, message),
    };
    let actor = match args.actor() {
        Ok(actor) => actor,
        Err(message) => return invalid_argument(command, message),
    };
    let expected = match args.from.as_deref().map(str::parse::<ApprovalStatus>).transpose() {
        Ok(expected) => expected,
        Err(error) => return invalid_argument(command, error.to_string()),
    };
    let document_id = DocumentId(args.id.trim().to_string());

    // A blank reason is refused before the document is even fetched.
    if let Some(target) = request.branch_target() {
        let blank = request.remarks().map_or(true, |remarks| remarks.trim().is_empty());
        if blank {
            let error = ClientError::from(TransitionError::MissingReason { target });
            return CommandResult::client_failure(command, &error);
        }
    }

    let config = match load_config(command) {
        Ok(config) => config,
        Err(result) => return result,
    };
    let runtime = match build_runtime(command) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };
    let client = match ApiClient::from_config(&config.api) {
        Ok(client) => client,
        Err(error) => return CommandResult::client_failure(command, &error),
    };

    let audit = Arc::new(InMemoryAuditSink::default());
    let service = TransitionService::new(client).with_audit(audit.clone());

    let result = runtime.block_on(async {
        let current = service.resolve_current(&resource, &document_id, expected).await?;
        let from = current.effective_status();
        let target = target_for(&resource, &request, from)?;
        let updated = service
            .advance(&resource, &document_id, &current, target, &actor, request.remarks())
            .await?;
        Ok::<_, ClientError>((from, updated))
    });

    match result {
        Ok((from, updated)) => {
            let report = TransitionReport {
                document_id: updated.document_id.clone(),
                kind: updated.kind.to_string(),
                from,
                to: updated.status,
                audit_events: audit.events().into_iter().map(|event| event.event_type).collect(),
            };
            CommandResult::success_with(
                command,
                format!("{} {} moved from {from} to {}", updated.kind, updated.document_id, updated.status),
                &report,
            )
        }
        Err(error) => CommandResult::client_failure(command, &error),
    }
}

fn target_for(
    resource: &ResourceDescriptor,
    request: &TransitionRequest,
    from: ApprovalStatus,
) -> Result<ApprovalStatus, ClientError> {
    if let Some(target) = request.branch_target() {
        return Ok(target);
    }
    StagedFlow::new(resource.kind)
        .next_stage(from)
        .map(|stage| stage.status())
        .ok_or_else(|| ClientError::from(TransitionError::NoFurtherStage { kind: resource.kind, from }))
}
