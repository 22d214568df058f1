use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_ATTACHMENTS: usize = 5;
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A file the user picked for upload, before any bytes are sent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentCandidate {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
}

impl AttachmentCandidate {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, size_bytes: u64) -> Self {
        Self { file_name: file_name.into(), content_type: content_type.into(), size_bytes }
    }

    /// Content type inferred from the file extension.
    pub fn from_file_name(file_name: impl Into<String>, size_bytes: u64) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self { file_name, content_type, size_bytes }
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE)
    }
}

/// Attachment metadata as listed by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentInfo {
    #[serde(alias = "Id", alias = "attachmentId")]
    pub id: String,
    #[serde(default, alias = "FileName", alias = "name")]
    pub file_name: String,
    #[serde(default, alias = "FileUrl", alias = "filePath")]
    pub file_url: Option<String>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("no files selected")]
    Empty,
    #[error("a document can hold at most {max} attachments ({existing} kept, {added} added)")]
    TooMany { existing: usize, added: usize, max: usize },
    #[error("`{file_name}` is not a PDF file")]
    UnsupportedType { file_name: String },
    #[error("`{file_name}` is empty")]
    EmptyFile { file_name: String },
}

/// Checks a whole upload batch. Either every file is acceptable or the batch is refused.
pub fn validate_batch(existing: usize, batch: &[AttachmentCandidate]) -> Result<(), AttachmentError> {
    if batch.is_empty() {
        return Err(AttachmentError::Empty);
    }
    if existing + batch.len() > MAX_ATTACHMENTS {
        return Err(AttachmentError::TooMany {
            existing,
            added: batch.len(),
            max: MAX_ATTACHMENTS,
        });
    }
    for candidate in batch {
        if !candidate.is_pdf() {
            return Err(AttachmentError::UnsupportedType { file_name: candidate.file_name.clone() });
        }
        if candidate.size_bytes == 0 {
            return Err(AttachmentError::EmptyFile { file_name: candidate.file_name.clone() });
        }
    }
    Ok(())
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => PDF_CONTENT_TYPE,
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_batch, AttachmentCandidate, AttachmentError, MAX_ATTACHMENTS};

    fn pdf(name: &str) -> AttachmentCandidate {
        AttachmentCandidate::from_file_name(name, 1_024)
    }

    #[test]
    fn six_files_are_rejected_even_when_five_are_pdf() {
        let mut batch: Vec<_> = (1..=5).map(|n| pdf(&format!("invoice-{n}.pdf"))).collect();
        batch.push(AttachmentCandidate::from_file_name("scan.png", 2_048));

        let error = validate_batch(0, &batch).expect_err("batch over limit");
        assert_eq!(error, AttachmentError::TooMany { existing: 0, added: 6, max: MAX_ATTACHMENTS });
    }

    #[test]
    fn kept_attachments_count_against_the_limit() {
        let batch = vec![pdf("a.pdf"), pdf("b.pdf")];
        assert!(validate_batch(3, &batch).is_ok());
        assert!(matches!(validate_batch(4, &batch), Err(AttachmentError::TooMany { .. })));
    }

    #[test]
    fn non_pdf_files_reject_the_batch() {
        let batch = vec![pdf("a.pdf"), AttachmentCandidate::from_file_name("notes.DOCX", 10)];
        assert_eq!(
            validate_batch(0, &batch),
            Err(AttachmentError::UnsupportedType { file_name: "notes.DOCX".to_string() })
        );
    }

    #[test]
    fn extension_inference_is_case_insensitive() {
        assert!(AttachmentCandidate::from_file_name("RECEIPT.PDF", 1).is_pdf());
        assert!(validate_batch(0, &[]).is_err());
        assert!(validate_batch(0, &[AttachmentCandidate::from_file_name("zero.pdf", 0)]).is_err());
    }
}
