//! Document domain types.
//!
//! A session holds at most one [`Document`], the server-side handle of a file
//! the user uploaded. [`DocumentFile`] is the client-side file that gets sent.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A processed document as known to the session.
///
/// Created on a successful upload and never mutated afterwards; a new upload
/// replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Opaque identifier assigned by the document service.
    pub id: String,
    /// File name shown to the user.
    pub display_name: String,
    /// Number of chunks the service split the document into.
    pub chunk_count: u32,
}

/// Document formats the backend knows how to extract text from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    /// Determines the kind from a file name's extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }
}

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFile {
    /// Original file name (no directory components).
    pub name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// MIME type guessed from the extension.
    pub mime_type: String,
}

impl DocumentFile {
    /// Builds a file from in-memory contents.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        let mime_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Self {
            name,
            bytes: bytes.into(),
            mime_type,
        }
    }

    /// Reads a file from disk.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read or the path has no
    /// file name component.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                crate::error::DocQaError::io(format!("Not a file path: {}", path.display()))
            })?
            .to_string();

        let bytes = tokio::fs::read(path).await?;
        Ok(Self::from_bytes(name, bytes))
    }

    /// The document kind, if the extension is one the backend supports.
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_file_name(&self.name)
    }

    /// File size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(DocumentKind::from_file_name("report.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_file_name("notes.docx"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_file_name("a.b.txt"), Some(DocumentKind::Txt));
        assert_eq!(DocumentKind::from_file_name("image.png"), None);
        assert_eq!(DocumentKind::from_file_name("README"), None);
    }

    #[test]
    fn test_from_bytes_guesses_mime_type() {
        let file = DocumentFile::from_bytes("report.txt", b"hello".to_vec());
        assert_eq!(file.mime_type, "text/plain");
        assert_eq!(file.size(), 5);
        assert_eq!(file.kind(), Some(DocumentKind::Txt));

        let unknown = DocumentFile::from_bytes("blob", Vec::new());
        assert_eq!(unknown.mime_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn test_from_path_reads_contents() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("paper.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let file = DocumentFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "paper.pdf");
        assert_eq!(file.bytes, b"%PDF-1.7");
        assert_eq!(file.mime_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = DocumentFile::from_path(dir.path().join("missing.txt"))
            .await
            .unwrap_err();
        assert!(err.is_io());
    }
}
