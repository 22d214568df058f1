//! Per-document-type adapters that push an approval transition to the backend.
//!
//! Every document type moves through the same status graph but the backend
//! exposes four different endpoint shapes for it. [`adapter_for`] picks the
//! shape from the document kind; [`TransitionService`] validates locally
//! before anything is sent.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docflow_core::audit::{AuditContext, AuditSink, NoopAuditSink};
use docflow_core::domain::approval::{Actor, ApprovalRecord, ApprovalStatus};
use docflow_core::domain::document::{
    approval_of, DocumentId, DocumentKind, ResourceDescriptor, TransitionStyle,
};
use docflow_core::errors::DomainError;
use docflow_core::flows::{ApprovalAction, TransitionOutcome, WorkflowEngine};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::resources::DocumentResource;
use crate::transport::ApiRequest;

/// A validated transition, ready to be sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedTransition {
    pub document_id: DocumentId,
    pub outcome: TransitionOutcome,
    pub actor: Actor,
    pub at: DateTime<Utc>,
    /// The current record moved to the target status and stamped.
    pub record: ApprovalRecord,
}

impl PreparedTransition {
    pub fn remarks(&self) -> &str {
        self.outcome.action.remarks().map(str::trim).unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UpdatedRecord {
    pub document_id: DocumentId,
    pub kind: DocumentKind,
    pub status: ApprovalStatus,
    pub record: ApprovalRecord,
    /// Payload the backend answered with, if any.
    pub response: Option<Value>,
}

#[async_trait]
pub trait ApprovalTransitionClient: Send + Sync {
    fn style(&self) -> TransitionStyle;

    fn resource(&self) -> &ResourceDescriptor;

    fn client(&self) -> &ApiClient;

    fn build_request(&self, transition: &PreparedTransition) -> ApiRequest;

    async fn advance(&self, transition: PreparedTransition) -> Result<UpdatedRecord, ClientError> {
        let request = self.build_request(&transition);
        let response = self.client().data(request).await?;

        // A record echoed by the backend wins over the locally stamped one.
        let echoed = response
            .as_ref()
            .and_then(|value| approval_of(value))
            .filter(|record| record.approval_status.is_some());
        let record = echoed.unwrap_or(transition.record);

        Ok(UpdatedRecord {
            document_id: transition.document_id,
            kind: transition.outcome.kind,
            status: record.effective_status(),
            record,
            response,
        })
    }
}

/// `PATCH {base}/approval/{id}` with the full record.
pub struct NestedApprovalPatch {
    client: ApiClient,
    resource: ResourceDescriptor,
}

impl NestedApprovalPatch {
    pub fn new(client: ApiClient, resource: ResourceDescriptor) -> Self {
        Self { client, resource }
    }
}

#[async_trait]
impl ApprovalTransitionClient for NestedApprovalPatch {
    fn style(&self) -> TransitionStyle {
        TransitionStyle::NestedApprovalPatch
    }

    fn resource(&self) -> &ResourceDescriptor {
        &self.resource
    }

    fn client(&self) -> &ApiClient {
        &self.client
    }

    fn build_request(&self, transition: &PreparedTransition) -> ApiRequest {
        let path = format!("{}/approval/{}", self.resource.base_path, transition.document_id);
        ApiRequest::patch(path).with_json(record_json(&transition.record))
    }
}

/// `PUT {base}/approvals/{id}` with the full record plus `stagingID`.
pub struct ApprovalsPut {
    client: ApiClient,
    resource: ResourceDescriptor,
}

impl ApprovalsPut {
    pub fn new(client: ApiClient, resource: ResourceDescriptor) -> Self {
        Self { client, resource }
    }
}

#[async_trait]
impl ApprovalTransitionClient for ApprovalsPut {
    fn style(&self) -> TransitionStyle {
        TransitionStyle::ApprovalsPut
    }

    fn resource(&self) -> &ResourceDescriptor {
        &self.resource
    }

    fn client(&self) -> &ApiClient {
        &self.client
    }

    fn build_request(&self, transition: &PreparedTransition) -> ApiRequest {
        let path = format!("{}/approvals/{}", self.resource.base_path, transition.document_id);
        let mut body = record_json(&transition.record);
        if let Value::Object(object) = &mut body {
            object.insert("stagingID".to_string(), Value::String(transition.document_id.to_string()));
        }
        ApiRequest::put(path).with_json(body)
    }
}

/// `POST {base}/status` with `{id, UserId, StatusAt, Action, Remarks}`.
pub struct StatusPost {
    client: ApiClient,
    resource: ResourceDescriptor,
}

impl StatusPost {
    pub fn new(client: ApiClient, resource: ResourceDescriptor) -> Self {
        Self { client, resource }
    }
}

#[async_trait]
impl ApprovalTransitionClient for StatusPost {
    fn style(&self) -> TransitionStyle {
        TransitionStyle::StatusPost
    }

    fn resource(&self) -> &ResourceDescriptor {
        &self.resource
    }

    fn client(&self) -> &ApiClient {
        &self.client
    }

    fn build_request(&self, transition: &PreparedTransition) -> ApiRequest {
        let body = json!({
            "id": transition.document_id.as_str(),
            "UserId": transition.actor.id,
            "StatusAt": transition.outcome.acting_stage.verb(),
            "Action": transition.outcome.action.as_str(),
            "Remarks": transition.remarks(),
        });
        ApiRequest::post(format!("{}/status", self.resource.base_path)).with_json(body)
    }
}

/// `PATCH {base}/{role}/{id}/approve|reject`, and `POST {base}/revision/{id}` for revisions.
pub struct RoleActionPatch {
    client: ApiClient,
    resource: ResourceDescriptor,
}

impl RoleActionPatch {
    pub fn new(client: ApiClient, resource: ResourceDescriptor) -> Self {
        Self { client, resource }
    }
}

#[async_trait]
impl ApprovalTransitionClient for RoleActionPatch {
    fn style(&self) -> TransitionStyle {
        TransitionStyle::RoleActionPatch
    }

    fn resource(&self) -> &ResourceDescriptor {
        &self.resource
    }

    fn client(&self) -> &ApiClient {
        &self.client
    }

    fn build_request(&self, transition: &PreparedTransition) -> ApiRequest {
        let base = &self.resource.base_path;
        let id = &transition.document_id;
        let stage = transition.outcome.acting_stage;
        let role = stage.role().as_str();

        match &transition.outcome.action {
            ApprovalAction::Advance => ApiRequest::patch(format!("{base}/{role}/{id}/approve")),
            ApprovalAction::Reject { .. } => ApiRequest::patch(format!("{base}/{role}/{id}/reject"))
                .with_json(json!({ "remarks": transition.remarks() })),
            ApprovalAction::Revise { .. } => ApiRequest::post(format!("{base}/revision/{id}"))
                .with_json(json!({
                    "userId": transition.actor.id,
                    "remarks": transition.remarks(),
                    "stage": stage.verb(),
                })),
        }
    }
}

fn record_json(record: &ApprovalRecord) -> Value {
    serde_json::to_value(record).unwrap_or_else(|_| Value::Object(Default::default()))
}

pub fn adapter_for(client: ApiClient, resource: ResourceDescriptor) -> Box<dyn ApprovalTransitionClient> {
    match resource.kind.transition_style() {
        TransitionStyle::NestedApprovalPatch => Box::new(NestedApprovalPatch::new(client, resource)),
        TransitionStyle::ApprovalsPut => Box::new(ApprovalsPut::new(client, resource)),
        TransitionStyle::StatusPost => Box::new(StatusPost::new(client, resource)),
        TransitionStyle::RoleActionPatch => Box::new(RoleActionPatch::new(client, resource)),
    }
}

/// Validates transitions locally and dispatches them to the right adapter.
#[derive(Clone)]
pub struct TransitionService {
    client: ApiClient,
    audit: Arc<dyn AuditSink>,
}

impl TransitionService {
    pub fn new(client: ApiClient) -> Self {
        Self { client, audit: Arc::new(NoopAuditSink) }
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Checks id, reason and graph without touching the network.
    pub fn prepare(
        &self,
        resource: &ResourceDescriptor,
        document_id: &DocumentId,
        current: &ApprovalRecord,
        action: ApprovalAction,
        actor: &Actor,
        at: DateTime<Utc>,
    ) -> Result<PreparedTransition, ClientError> {
        if document_id.is_blank() {
            return Err(ClientError::Validation(DomainError::MissingDocumentId));
        }

        let engine = WorkflowEngine::for_kind(resource.kind);
        let context = AuditContext::new(
            Some(document_id.clone()),
            Uuid::new_v4().to_string(),
            actor.id.clone(),
        );
        let outcome =
            engine.apply_with_audit(current.effective_status(), &action, self.audit.as_ref(), &context)?;
        let record = current.advanced(outcome.to, actor, at, outcome.action.remarks());

        Ok(PreparedTransition { document_id: document_id.clone(), outcome, actor: actor.clone(), at, record })
    }

    /// Applies `action` to a document whose current approval record is known.
    pub async fn apply(
        &self,
        resource: &ResourceDescriptor,
        document_id: &DocumentId,
        current: &ApprovalRecord,
        action: ApprovalAction,
        actor: &Actor,
    ) -> Result<UpdatedRecord, ClientError> {
        let prepared = match self.prepare(resource, document_id, current, action, actor, Utc::now()) {
            Ok(prepared) => prepared,
            Err(error) => {
                warn!(
                    event_name = "approval.transition.refused",
                    kind = %resource.kind,
                    document_id = %document_id,
                    error = %error,
                    "transition rejected locally"
                );
                return Err(error);
            }
        };

        let from = prepared.outcome.from;
        let to = prepared.outcome.to;
        info!(
            event_name = "approval.transition.sent",
            kind = %resource.kind,
            document_id = %document_id,
            from = %from,
            to = %to,
            actor = %actor.id,
            "sending approval transition"
        );

        let adapter = adapter_for(self.client.clone(), resource.clone());
        match adapter.advance(prepared).await {
            Ok(updated) => {
                info!(
                    event_name = "approval.transition.applied",
                    kind = %resource.kind,
                    document_id = %document_id,
                    status = %updated.status,
                    "approval transition applied"
                );
                Ok(updated)
            }
            Err(error) => {
                warn!(
                    event_name = "approval.transition.failed",
                    kind = %resource.kind,
                    document_id = %document_id,
                    from = %from,
                    to = %to,
                    error = %error,
                    "approval transition failed"
                );
                Err(error)
            }
        }
    }

    /// Moves a document to `target`, which must be the next stage, `Rejected` or `Revised`.
    pub async fn advance(
        &self,
        resource: &ResourceDescriptor,
        document_id: &DocumentId,
        current: &ApprovalRecord,
        target: ApprovalStatus,
        actor: &Actor,
        remarks: Option<&str>,
    ) -> Result<UpdatedRecord, ClientError> {
        let engine = WorkflowEngine::for_kind(resource.kind);
        let action = engine.flow().action_for(current.effective_status(), target, remarks)?;
        self.apply(resource, document_id, current, action, actor).await
    }

    /// The record a transition should start from.
    ///
    /// Full-record styles always read the stored record so earlier stamps are
    /// sent back unchanged; `expected` then only guards against a stale view.
    /// Other styles trust `expected` and skip the fetch.
    pub async fn resolve_current(
        &self,
        resource: &ResourceDescriptor,
        document_id: &DocumentId,
        expected: Option<ApprovalStatus>,
    ) -> Result<ApprovalRecord, ClientError> {
        match expected {
            Some(status) if !resource.kind.transition_style().sends_full_record() => {
                Ok(ApprovalRecord { approval_status: Some(status), ..ApprovalRecord::default() })
            }
            _ => {
                let documents = DocumentResource::new(self.client.clone(), resource.clone());
                let (_, stored) = documents.get_with_approval(document_id).await?;
                match expected {
                    Some(expected) if stored.effective_status() != expected => {
                        Err(ClientError::Validation(DomainError::StaleStatus {
                            expected,
                            stored: stored.effective_status(),
                        }))
                    }
                    _ => Ok(stored),
                }
            }
        }
    }

    /// Fetches the document first and advances from its stored approval record.
    pub async fn advance_fetched(
        &self,
        resource: &ResourceDescriptor,
        document_id: &DocumentId,
        target: ApprovalStatus,
        actor: &Actor,
        remarks: Option<&str>,
    ) -> Result<UpdatedRecord, ClientError> {
        let documents = DocumentResource::new(self.client.clone(), resource.clone());
        let (_, current) = documents.get_with_approval(document_id).await?;
        self.advance(resource, document_id, &current, target, actor, remarks).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use docflow_core::audit::InMemoryAuditSink;
    use docflow_core::domain::approval::{Actor, ApprovalRecord, ApprovalStage, ApprovalStatus};
    use docflow_core::domain::document::{
        DocumentId, DocumentKind, PurchaseRequestType, ResourceDescriptor,
    };
    use docflow_core::errors::DomainError;
    use docflow_core::flows::{ApprovalAction, TransitionError};
    use serde_json::json;

    use super::{adapter_for, TransitionService};
    use crate::client::ApiClient;
    use crate::error::ClientError;
    use crate::memory::InMemoryTransport;
    use crate::transport::{ApiResponse, HttpMethod, RequestBody};

    fn preparer() -> Actor {
        Actor::new("u-prep", "Rina")
    }

    fn checked_record() -> ApprovalRecord {
        let at = Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).single().expect("time");
        ApprovalRecord::prepared(&preparer(), at).advanced(
            ApprovalStatus::Checked,
            &Actor::new("u-check", "Dewi"),
            at,
            None,
        )
    }

    fn service(transport: Arc<InMemoryTransport>) -> TransitionService {
        TransitionService::new(ApiClient::new(transport))
    }

    #[tokio::test]
    async fn ar_invoice_acknowledge_patches_nested_approval() {
        let transport = Arc::new(InMemoryTransport::default());
        transport.push(Ok(ApiResponse::empty(204)));
        let resource = ResourceDescriptor::for_kind(DocumentKind::ArInvoice);
        let actor = Actor::new("u-ack", "Sari");

        let updated = service(transport.clone())
            .advance(
                &resource,
                &DocumentId("STG-1".to_string()),
                &checked_record(),
                ApprovalStatus::Acknowledged,
                &actor,
                None,
            )
            .await
            .expect("acknowledged");

        assert_eq!(updated.status, ApprovalStatus::Acknowledged);
        assert_eq!(updated.record.acknowledged_by.as_deref(), Some("u-ack"));
        assert_eq!(updated.record.acknowledged_by_name.as_deref(), Some("Sari"));
        assert!(updated.record.acknowledged_date.is_some());
        assert_eq!(updated.record.checked_by.as_deref(), Some("u-check"));

        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Patch);
        assert_eq!(request.path, "/api/ar-invoices/approval/STG-1");
        let body = request.json_body().expect("json body");
        assert_eq!(body["approvalStatus"], "Acknowledged");
        assert_eq!(body["acknowledgedBy"], "u-ack");
        assert_eq!(body["preparedBy"], "u-prep");
    }

    #[tokio::test]
    async fn full_record_kinds_resend_stored_stamps_even_with_a_known_status() {
        let transport = Arc::new(InMemoryTransport::default());
        transport.push_json(
            200,
            json!({ "status": true, "data": { "id": "STG-5", "approval": {
                "approvalStatus": "Checked",
                "preparedBy": "u-prep", "preparedByName": "Rina",
                "preparedDate": "2025-04-01T09:00:00Z",
                "checkedBy": "u-check", "checkedByName": "Dewi",
                "checkedDate": "2025-04-02T09:00:00Z"
            } } }),
        );
        transport.push(Ok(ApiResponse::empty(204)));
        let resource = ResourceDescriptor::for_kind(DocumentKind::ArInvoice);
        let id = DocumentId("STG-5".to_string());
        let service = service(transport.clone());

        let current = service
            .resolve_current(&resource, &id, Some(ApprovalStatus::Checked))
            .await
            .expect("stored record");
        service
            .advance(&resource, &id, &current, ApprovalStatus::Acknowledged, &Actor::new("u-ack", "Sari"), None)
            .await
            .expect("acknowledged");

        let requests = transport.requests();
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].path, "/api/ar-invoices/STG-5");
        let body = requests[1].json_body().expect("json body");
        assert_eq!(body["approvalStatus"], "Acknowledged");
        assert_eq!(body["preparedBy"], "u-prep");
        assert_eq!(body["preparedByName"], "Rina");
        assert_eq!(body["checkedBy"], "u-check");
        assert_eq!(body["acknowledgedBy"], "u-ack");
    }

    #[tokio::test]
    async fn stale_expected_status_is_refused_before_the_transition() {
        let transport = Arc::new(InMemoryTransport::default());
        transport.push_json(
            200,
            json!({ "status": true, "data": { "id": "OP-8", "approval": { "approvalStatus": "Acknowledged" } } }),
        );
        let resource = ResourceDescriptor::for_kind(DocumentKind::OutgoingPayment);

        let error = service(transport.clone())
            .resolve_current(&resource, &DocumentId("OP-8".to_string()), Some(ApprovalStatus::Checked))
            .await
            .expect_err("stale");

        assert_eq!(
            error,
            ClientError::Validation(DomainError::StaleStatus {
                expected: ApprovalStatus::Checked,
                stored: ApprovalStatus::Acknowledged,
            })
        );
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn status_post_kinds_trust_the_known_status_without_fetching() {
        let transport = Arc::new(InMemoryTransport::default());
        let resource = ResourceDescriptor::for_kind(DocumentKind::CashAdvance);

        let current = service(transport.clone())
            .resolve_current(&resource, &DocumentId("CA-1".to_string()), Some(ApprovalStatus::Approved))
            .await
            .expect("record");

        assert_eq!(current.effective_status(), ApprovalStatus::Approved);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn echoed_record_from_backend_wins() {
        let transport = Arc::new(InMemoryTransport::default());
        transport.push_json(
            200,
            json!({ "status": true, "data": { "approval": {
                "approvalStatus": "Acknowledged", "acknowledgedBy": "server-user"
            } } }),
        );
        let resource = ResourceDescriptor::for_kind(DocumentKind::OutgoingPayment);

        let updated = service(transport.clone())
            .apply(
                &resource,
                &DocumentId("OP-4".to_string()),
                &checked_record(),
                ApprovalAction::Advance,
                &Actor::new("u-ack", "Sari"),
            )
            .await
            .expect("applied");

        assert_eq!(updated.record.acknowledged_by.as_deref(), Some("server-user"));
        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.path, "/api/staging-outgoing-payments/approvals/OP-4");
        assert_eq!(request.json_body().expect("body")["stagingID"], "OP-4");
    }

    #[tokio::test]
    async fn settlement_rejection_posts_status_with_remarks() {
        let transport = Arc::new(InMemoryTransport::default());
        transport.push_json(200, json!({ "status": true, "message": "ok" }));
        let resource = ResourceDescriptor::for_kind(DocumentKind::Settlement);

        let updated = service(transport.clone())
            .advance(
                &resource,
                &DocumentId("ST-2".to_string()),
                &checked_record(),
                ApprovalStatus::Rejected,
                &Actor::new("u-ack", "Sari"),
                Some("  receipts missing "),
            )
            .await
            .expect("rejected");

        assert_eq!(updated.status, ApprovalStatus::Rejected);
        assert_eq!(updated.record.rejection_remarks.as_deref(), Some("receipts missing"));
        let request = &transport.requests()[0];
        assert_eq!(request.path, "/api/settlements/status");
        assert_eq!(
            request.json_body(),
            Some(&json!({
                "id": "ST-2",
                "UserId": "u-ack",
                "StatusAt": "Acknowledge",
                "Action": "reject",
                "Remarks": "receipts missing"
            }))
        );
    }

    #[tokio::test]
    async fn blank_rejection_reason_never_reaches_the_network() {
        let transport = Arc::new(InMemoryTransport::default());
        let audit = Arc::new(InMemoryAuditSink::default());
        let service = service(transport.clone()).with_audit(audit.clone());

        let error = service
            .advance(
                &ResourceDescriptor::for_kind(DocumentKind::CashAdvance),
                &DocumentId("CA-1".to_string()),
                &checked_record(),
                ApprovalStatus::Rejected,
                &Actor::new("u-ack", "Sari"),
                Some("   "),
            )
            .await
            .expect_err("blank reason");

        assert_eq!(
            error,
            ClientError::Validation(DomainError::Transition(TransitionError::MissingReason {
                target: ApprovalStatus::Rejected
            }))
        );
        assert!(transport.requests().is_empty());
        assert_eq!(audit.events()[0].event_type, "approval.transition_rejected");
    }

    #[tokio::test]
    async fn skipping_a_stage_is_refused_locally() {
        let transport = Arc::new(InMemoryTransport::default());
        let error = service(transport.clone())
            .advance(
                &ResourceDescriptor::for_kind(DocumentKind::ArInvoice),
                &DocumentId("STG-1".to_string()),
                &checked_record(),
                ApprovalStatus::Approved,
                &Actor::new("u-appr", "Agus"),
                None,
            )
            .await
            .expect_err("checked cannot jump to approved");

        assert!(matches!(
            error,
            ClientError::Validation(DomainError::Transition(TransitionError::InvalidTransition { .. }))
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn remote_failure_message_is_surfaced() {
        let transport = Arc::new(InMemoryTransport::with_script(vec![Ok(ApiResponse::json(
            409,
            &json!({ "Message": "Document was modified by another user" }),
        ))]));

        let error = service(transport)
            .advance(
                &ResourceDescriptor::purchase_request(PurchaseRequestType::Item),
                &DocumentId("PR-1".to_string()),
                &checked_record(),
                ApprovalStatus::Acknowledged,
                &Actor::new("u-ack", "Sari"),
                None,
            )
            .await
            .expect_err("conflict");

        assert_eq!(error.to_string(), "Document was modified by another user");
        assert_eq!(error.dialog_message(), "Document was modified by another user");
    }

    #[test]
    fn reimbursement_requests_use_role_paths() {
        let transport = Arc::new(InMemoryTransport::default());
        let client = ApiClient::new(transport.clone());
        let service = TransitionService::new(client.clone());
        let resource = ResourceDescriptor::for_kind(DocumentKind::Reimbursement);
        let adapter = adapter_for(client, resource.clone());
        let id = DocumentId("R-5".to_string());
        let actor = Actor::new("u-ack", "Sari");
        let at = Utc::now();

        let approve = service
            .prepare(&resource, &id, &checked_record(), ApprovalAction::Advance, &actor, at)
            .expect("advance");
        let request = adapter.build_request(&approve);
        assert_eq!(request.method, HttpMethod::Patch);
        assert_eq!(request.path, "/api/reimbursements/acknowledger/R-5/approve");
        assert_eq!(request.body, RequestBody::Empty);

        let reject = service
            .prepare(
                &resource,
                &id,
                &checked_record(),
                ApprovalAction::Reject { reason: "duplicate".to_string() },
                &actor,
                at,
            )
            .expect("reject");
        let request = adapter.build_request(&reject);
        assert_eq!(request.path, "/api/reimbursements/acknowledger/R-5/reject");
        assert_eq!(request.json_body(), Some(&json!({ "remarks": "duplicate" })));

        let revise = service
            .prepare(
                &resource,
                &id,
                &checked_record(),
                ApprovalAction::Revise { remarks: "fix totals".to_string() },
                &actor,
                at,
            )
            .expect("revise");
        assert_eq!(revise.outcome.acting_stage, ApprovalStage::Acknowledged);
        let request = adapter.build_request(&revise);
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "/api/reimbursements/revision/R-5");
        assert_eq!(
            request.json_body(),
            Some(&json!({ "userId": "u-ack", "remarks": "fix totals", "stage": "Acknowledge" }))
        );
        assert_eq!(revise.record.revision_number, Some(1));
        assert!(transport.requests().is_empty());
    }
}
