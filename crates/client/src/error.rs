use docflow_core::attachments::AttachmentError;
use docflow_core::errors::DomainError;
use docflow_core::flows::TransitionError;
use thiserror::Error;

use crate::transport::TransportError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    /// Rejected locally; nothing was sent.
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Non-2xx response. Displays as the message extracted from the body.
    #[error("{message}")]
    Http { status: u16, message: String },
    /// 2xx response whose envelope reported `status: false`.
    #[error("{message}")]
    Application { code: Option<i64>, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Text for the blocking error dialog shown to the operator.
    pub fn dialog_message(&self) -> String {
        match self {
            Self::Validation(error) => error.to_string(),
            Self::Transport(_) => {
                "Could not reach the approval service. Check your connection and try again."
                    .to_string()
            }
            Self::Http { message, .. } | Self::Application { message, .. } => message.clone(),
            Self::Decode(_) => "The approval service returned an unexpected response.".to_string(),
        }
    }

    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Transport(_) => "transport",
            Self::Http { .. } => "http",
            Self::Application { .. } => "application",
            Self::Decode(_) => "decode",
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<TransitionError> for ClientError {
    fn from(value: TransitionError) -> Self {
        Self::Validation(DomainError::Transition(value))
    }
}

impl From<AttachmentError> for ClientError {
    fn from(value: AttachmentError) -> Self {
        Self::Validation(DomainError::Attachment(value))
    }
}
