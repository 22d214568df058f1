use thiserror::Error;

use crate::attachments::AttachmentError;
use crate::domain::approval::{ApprovalStatus, UnknownStatus};
use crate::domain::document::UnknownDocumentKind;
use crate::flows::TransitionError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    InvalidStatus(#[from] UnknownStatus),
    #[error(transparent)]
    UnknownDocumentKind(#[from] UnknownDocumentKind),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("document id is required")]
    MissingDocumentId,
    #[error(transparent)]
    Attachment(#[from] AttachmentError),
    /// The caller acted on a status the stored document no longer has.
    #[error("document is {stored}, not {expected}")]
    StaleStatus { expected: ApprovalStatus, stored: ApprovalStatus },
}
