//! Finished render artifacts.
//!
//! After all sections run the template is flushed to bytes exactly once;
//! the artifact wraps those bytes with the metadata the external
//! attachment store expects: storage filename, content hash, size and a
//! human-friendly client-facing filename.

use serde::Serialize;
use sha2::{Digest, Sha256};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

/// MIME type of the generated document.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// One finished report document.
///
/// Immutable once built; ownership passes to the attachment store.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedArtifact {
    /// Storage filename: host identifier plus a uniqueness token, so
    /// concurrent renders never overwrite each other.
    pub file_name: String,
    /// Client-facing download filename.
    pub client_file_name: String,
    /// Always [`DOCX_MIME`].
    pub mime_type: &'static str,
    /// SHA-256 of the document bytes, hex encoded.
    pub sha256: String,
    /// Document size in bytes.
    pub byte_size: u64,
    /// The document itself.
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl GeneratedArtifact {
    /// Wrap finished document bytes with their storage metadata.
    pub fn new(
        bytes: Vec<u8>,
        host_id: &str,
        client_name: &str,
        project_name: &str,
        version_name: &str,
    ) -> Self {
        let sha256 = hex::encode(Sha256::digest(&bytes));
        let byte_size = bytes.len() as u64;
        Self {
            file_name: format!("{}-{}", host_id, Uuid::new_v4().simple()),
            client_file_name: client_file_name(client_name, project_name, version_name),
            mime_type: DOCX_MIME,
            sha256,
            byte_size,
            bytes,
        }
    }

    /// The row handed to the attachment store.
    pub fn attachment_record(&self, parent_id: i64, submitter_uid: i64) -> AttachmentRecord {
        AttachmentRecord {
            parent_type: "report",
            parent_id,
            submitter_uid,
            file_name: self.file_name.clone(),
            file_mimetype: self.mime_type,
            file_hash: self.sha256.clone(),
            file_size: self.byte_size,
            client_file_name: self.client_file_name.clone(),
        }
    }
}

/// Attachment-store row for a generated report.
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentRecord {
    pub parent_type: &'static str,
    pub parent_id: i64,
    pub submitter_uid: i64,
    pub file_name: String,
    pub file_mimetype: &'static str,
    pub file_hash: String,
    pub file_size: u64,
    pub client_file_name: String,
}

/// Build `{client}-{project}-v{version}.docx` from sanitized components.
fn client_file_name(client_name: &str, project_name: &str, version_name: &str) -> String {
    format!(
        "{}-{}-v{}.docx",
        sanitize_component(client_name),
        sanitize_component(project_name),
        version_name,
    )
}

/// Lowercase, underscore spaces, and strip diacritics from a filename
/// component. NFD decomposition splits accented letters into base letter
/// plus combining mark; dropping the marks leaves plain ASCII for common
/// Latin input.
pub fn sanitize_component(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .replace(' ', "_")
}
