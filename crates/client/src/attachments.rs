use docflow_core::attachments::{validate_batch, AttachmentCandidate, AttachmentInfo};
use docflow_core::domain::document::DocumentId;
use tracing::info;

use crate::error::ClientError;
use crate::resources::{require_id, DocumentResource};
use crate::transport::{ApiRequest, FilePart};

pub const UPLOAD_FIELD: &str = "files";

/// A picked file with its bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentFile {
    pub candidate: AttachmentCandidate,
    pub bytes: Vec<u8>,
}

impl AttachmentFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let candidate = AttachmentCandidate::from_file_name(file_name, bytes.len() as u64);
        Self { candidate, bytes }
    }
}

impl DocumentResource {
    fn attachments_path(&self, id: &DocumentId) -> String {
        format!("{}/attachments", self.descriptor().item_path(id))
    }

    pub async fn list_attachments(&self, id: &DocumentId) -> Result<Vec<AttachmentInfo>, ClientError> {
        require_id(id)?;
        let data = self.client().data(ApiRequest::get(self.attachments_path(id))).await?;
        match data {
            None => Ok(Vec::new()),
            Some(value) => {
                serde_json::from_value(value).map_err(|error| ClientError::Decode(error.to_string()))
            }
        }
    }

    /// Uploads a batch after checking it against the `existing` attachment count.
    /// An invalid batch is refused as a whole and nothing is sent.
    pub async fn upload_attachments(
        &self,
        id: &DocumentId,
        existing: usize,
        files: Vec<AttachmentFile>,
    ) -> Result<(), ClientError> {
        require_id(id)?;
        let candidates: Vec<AttachmentCandidate> =
            files.iter().map(|file| file.candidate.clone()).collect();
        validate_batch(existing, &candidates)?;

        let count = files.len();
        let parts = files
            .into_iter()
            .map(|file| FilePart {
                field: UPLOAD_FIELD.to_string(),
                file_name: file.candidate.file_name,
                content_type: file.candidate.content_type,
                bytes: file.bytes,
            })
            .collect();
        let path = format!("{}/upload", self.attachments_path(id));
        self.client().data(ApiRequest::post(path).with_files(parts)).await?;

        info!(
            event_name = "client.attachments.uploaded",
            document_id = %id,
            count,
            "attachments uploaded"
        );
        Ok(())
    }

    /// Raw file bytes; download responses are not enveloped.
    pub async fn download_attachment(
        &self,
        id: &DocumentId,
        attachment_id: &str,
    ) -> Result<Vec<u8>, ClientError> {
        require_id(id)?;
        let path = format!("{}/{attachment_id}/download", self.attachments_path(id));
        let response = self.client().execute(ApiRequest::get(path)).await?;
        Ok(response.body)
    }

    pub async fn delete_attachment(&self, id: &DocumentId, attachment_id: &str) -> Result<(), ClientError> {
        require_id(id)?;
        let path = format!("{}/{attachment_id}", self.attachments_path(id));
        self.client().data(ApiRequest::delete(path)).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use docflow_core::attachments::AttachmentError;
    use docflow_core::domain::document::{DocumentId, DocumentKind, ResourceDescriptor};
    use docflow_core::errors::DomainError;
    use serde_json::json;

    use super::AttachmentFile;
    use crate::client::ApiClient;
    use crate::error::ClientError;
    use crate::memory::InMemoryTransport;
    use crate::resources::DocumentResource;
    use crate::transport::{ApiResponse, HttpMethod, RequestBody};

    fn reimbursements(transport: Arc<InMemoryTransport>) -> DocumentResource {
        DocumentResource::new(
            ApiClient::new(transport),
            ResourceDescriptor::for_kind(DocumentKind::Reimbursement),
        )
    }

    #[tokio::test]
    async fn six_files_are_refused_without_any_upload_call() {
        let transport = Arc::new(InMemoryTransport::default());
        let resource = reimbursements(transport.clone());
        let mut files: Vec<_> =
            (1..=5).map(|n| AttachmentFile::new(format!("receipt-{n}.pdf"), vec![1, 2, 3])).collect();
        files.push(AttachmentFile::new("photo.jpg", vec![1]));

        let error = resource
            .upload_attachments(&DocumentId("R-9".to_string()), 0, files)
            .await
            .expect_err("over limit");

        assert!(matches!(
            error,
            ClientError::Validation(DomainError::Attachment(AttachmentError::TooMany { .. }))
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn valid_batch_is_sent_as_multipart_files() {
        let transport = Arc::new(InMemoryTransport::default());
        transport.push_json(200, json!({ "status": true }));
        let resource = reimbursements(transport.clone());

        resource
            .upload_attachments(
                &DocumentId("R-9".to_string()),
                3,
                vec![AttachmentFile::new("a.pdf", vec![37, 80]), AttachmentFile::new("b.pdf", vec![37])],
            )
            .await
            .expect("uploaded");

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/api/reimbursements/R-9/attachments/upload");
        match &requests[0].body {
            RequestBody::Multipart(parts) => {
                assert_eq!(parts.len(), 2);
                assert!(parts.iter().all(|part| part.field == "files"));
                assert_eq!(parts[0].content_type, "application/pdf");
            }
            other => panic!("expected multipart body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn listing_and_downloading() {
        let transport = Arc::new(InMemoryTransport::default());
        transport.push_json(
            200,
            json!({ "status": true, "data": [{ "id": "att-1", "fileName": "a.pdf" }] }),
        );
        transport.push(Ok(ApiResponse::new(200, b"%PDF-1.7".to_vec())));
        let resource = reimbursements(transport.clone());
        let id = DocumentId("R-9".to_string());

        let listed = resource.list_attachments(&id).await.expect("listed");
        assert_eq!(listed[0].file_name, "a.pdf");

        let bytes = resource.download_attachment(&id, "att-1").await.expect("downloaded");
        assert_eq!(bytes, b"%PDF-1.7");

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/api/reimbursements/R-9/attachments");
        assert_eq!(requests[1].method, HttpMethod::Get);
        assert_eq!(requests[1].path, "/api/reimbursements/R-9/attachments/att-1/download");
    }

    #[tokio::test]
    async fn delete_targets_the_attachment_itself() {
        let transport = Arc::new(InMemoryTransport::with_script(vec![Ok(ApiResponse::empty(204))]));
        let resource = reimbursements(transport.clone());

        resource
            .delete_attachment(&DocumentId("R-9".to_string()), "att-2")
            .await
            .expect("deleted");

        let requests = transport.requests();
        assert_eq!(requests[0].method, HttpMethod::Delete);
        assert_eq!(requests[0].path, "/api/reimbursements/R-9/attachments/att-2");
    }
}
