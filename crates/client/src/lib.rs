//! HTTP side of the approval workflow: a transport seam, the backend's
//! response envelope, document CRUD and the per-type transition adapters.

pub mod attachments;
pub mod client;
pub mod envelope;
pub mod error;
pub mod memory;
pub mod resources;
pub mod transitions;
pub mod transport;
pub mod workflow;

pub use attachments::AttachmentFile;
pub use client::ApiClient;
pub use envelope::{error_message, ApiEnvelope};
pub use error::ClientError;
pub use memory::InMemoryTransport;
pub use resources::{DocumentResource, ListQuery, SortOrder};
pub use transitions::{
    adapter_for, ApprovalTransitionClient, PreparedTransition, TransitionService, UpdatedRecord,
};
pub use transport::{ApiRequest, ApiResponse, ApiTransport, HttpMethod, ReqwestTransport, TransportError};
pub use workflow::{DriveReport, WorkflowDriver};
