use std::sync::Arc;

use docflow_client::{
    ApiClient, ApiResponse, AttachmentFile, DocumentResource, InMemoryTransport, TransitionService,
};
use docflow_core::dashboard::{DashboardState, Tab};
use docflow_core::domain::approval::{Actor, ApprovalRecord, ApprovalStatus};
use docflow_core::domain::document::{DocumentId, DocumentKind, DocumentSummary, ResourceDescriptor};
use serde_json::json;

type ContractResult<T = ()> = Result<T, String>;

macro_rules! require {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err(format!($($arg)*));
        }
    };
}

macro_rules! require_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return Err(format!(
                "assertion failed: `left == right` (`{:?}` != `{:?}`)",
                $left,
                $right
            ));
        }
    };
}

fn prepared_record() -> ApprovalRecord {
    ApprovalRecord::prepared(&Actor::new("u-prep", "Rina"), chrono::Utc::now())
}

#[tokio::test]
async fn rejected_transition_shows_backend_message_verbatim() -> ContractResult {
    let transport = Arc::new(InMemoryTransport::with_script(vec![Ok(ApiResponse::json(
        400,
        &json!({ "message": "Invalid status transition" }),
    ))]));
    let service = TransitionService::new(ApiClient::new(transport.clone()));

    let error = match service
        .advance(
            &ResourceDescriptor::for_kind(DocumentKind::ArInvoice),
            &DocumentId("STG-100".to_string()),
            &prepared_record(),
            ApprovalStatus::Checked,
            &Actor::new("u-check", "Dewi"),
            None,
        )
        .await
    {
        Ok(updated) => return Err(format!("expected failure, got {updated:?}")),
        Err(error) => error,
    };

    require_eq!(error.dialog_message(), "Invalid status transition");
    require_eq!(transport.requests().len(), 1);
    Ok(())
}

#[tokio::test]
async fn whitespace_rejection_reason_issues_no_request() -> ContractResult {
    let transport = Arc::new(InMemoryTransport::default());
    let service = TransitionService::new(ApiClient::new(transport.clone()));

    for kind in DocumentKind::ALL {
        let result = service
            .advance(
                &ResourceDescriptor::for_kind(kind),
                &DocumentId("DOC-1".to_string()),
                &prepared_record(),
                ApprovalStatus::Rejected,
                &Actor::new("u-check", "Dewi"),
                Some(" \t "),
            )
            .await;
        require!(result.is_err(), "{kind} accepted a blank rejection reason");
    }

    require!(transport.requests().is_empty(), "no request may be sent for a blank reason");
    Ok(())
}

#[tokio::test]
async fn six_attachments_are_refused_before_upload() -> ContractResult {
    let transport = Arc::new(InMemoryTransport::default());
    let resource = DocumentResource::new(
        ApiClient::new(transport.clone()),
        ResourceDescriptor::for_kind(DocumentKind::OutgoingPayment),
    );
    let mut files: Vec<AttachmentFile> =
        (1..=5).map(|n| AttachmentFile::new(format!("doc-{n}.pdf"), vec![0x25])).collect();
    files.push(AttachmentFile::new("notes.txt", vec![0x41]));

    let result = resource.upload_attachments(&DocumentId("OP-7".to_string()), 0, files).await;

    require!(result.is_err(), "a six-file batch must be refused");
    require!(transport.requests().is_empty(), "no upload call may be issued");
    Ok(())
}

#[tokio::test]
async fn listed_documents_page_through_the_draft_tab() -> ContractResult {
    let mut rows: Vec<_> =
        (1..=20).map(|n| json!({ "id": format!("D-{n}"), "docNum": n })).collect();
    rows.extend((21..=35).map(|n| {
        json!({ "id": format!("D-{n}"), "docNum": n, "approval": { "approvalStatus": "Checked" } })
    }));
    let transport = Arc::new(InMemoryTransport::default());
    transport.push_json(200, json!({ "status": true, "data": rows }));
    let resource = DocumentResource::new(
        ApiClient::new(transport),
        ResourceDescriptor::for_kind(DocumentKind::Reimbursement),
    );

    let documents: Vec<DocumentSummary> =
        resource.list_summaries(&Default::default()).await.map_err(|error| error.to_string())?;
    let tab: Tab = "draft".parse().map_err(|error| format!("{error}"))?;
    let state = DashboardState::new(10).switch_tab(tab).change_page(&documents, 2);
    let view = state.view(&documents);

    require_eq!(view.window.start_item, 11);
    require_eq!(view.window.end_item, 20);
    require_eq!(view.window.total_items, 20);
    require_eq!(view.items.first().map(|item| item.id.as_str()), Some("D-11"));
    require_eq!(view.counts.count(ApprovalStatus::Checked), 15);
    Ok(())
}
