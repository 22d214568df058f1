pub mod attachments;
pub mod audit;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod format;
pub mod forms;

pub use attachments::{validate_batch, AttachmentCandidate, AttachmentError, AttachmentInfo};
pub use audit::{AuditContext, AuditEvent, AuditSink, InMemoryAuditSink, NoopAuditSink};
pub use config::{AppConfig, ConfigError, LoadOptions};
pub use dashboard::{DashboardItem, DashboardState, DashboardView, Search, SearchField, Tab};
pub use domain::approval::{Actor, ApprovalRecord, ApprovalStage, ApprovalStatus, Role};
pub use domain::document::{
    DocumentId, DocumentKind, DocumentSummary, PurchaseRequestType, ResourceDescriptor,
    TransitionStyle,
};
pub use errors::DomainError;
pub use flows::{ApprovalAction, StagedFlow, TransitionError, TransitionOutcome, WorkflowEngine};
pub use forms::{build_payload, populate_form, FieldBinding, FieldFormat, FormValues, PayloadError};
