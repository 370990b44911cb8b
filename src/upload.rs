//! Locally held file attachments.
//!
//! A [`FileList`] exclusively owns the bytes of the files it holds. Removing
//! or replacing a file hands ownership back to the caller (or drops it), so
//! nothing else can keep a stale reference into the list.

use std::path::Path;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::IntakeError;

/// A file picked by the user, held in memory until submission.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    /// Local token for list addressing. Never sent to the backend.
    pub id: Uuid,
    pub display_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub content: Arc<Vec<u8>>,
}

impl UploadedFile {
    pub fn new(display_name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            mime_type: mime_type.into(),
            size_bytes: content.len() as u64,
            content: Arc::new(content),
        }
    }

    /// Read a file from disk, deriving the MIME type from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, IntakeError> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await.map_err(|e| IntakeError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime_type = mime_for_name(&display_name).to_string();
        Ok(Self::new(display_name, mime_type, content))
    }

    /// Lower-cased extension of the display name, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.display_name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    /// Whether the file's extension is one of `allowed` (lower-case, no dot).
    pub fn has_extension(&self, allowed: &[&str]) -> bool {
        self.extension()
            .is_some_and(|ext| allowed.iter().any(|a| *a == ext))
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.content.as_ref().clone()
    }
}

/// Guess a MIME type from a file name.
pub fn mime_for_name(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "rtf" => "application/rtf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// An ordered list of owned attachments addressed by their local id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileList {
    files: Vec<UploadedFile>,
}

impl FileList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file: UploadedFile) -> Uuid {
        let id = file.id;
        self.files.push(file);
        id
    }

    /// Remove a file by id, returning it to the caller.
    pub fn remove(&mut self, id: Uuid) -> Option<UploadedFile> {
        let idx = self.files.iter().position(|f| f.id == id)?;
        Some(self.files.remove(idx))
    }

    /// Replace the whole list with a single file, returning what was held before.
    pub fn replace_with(&mut self, file: UploadedFile) -> Vec<UploadedFile> {
        std::mem::replace(&mut self.files, vec![file])
    }

    pub fn clear(&mut self) -> Vec<UploadedFile> {
        std::mem::take(&mut self.files)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size_bytes).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UploadedFile> {
        self.files.iter()
    }

    pub fn first(&self) -> Option<&UploadedFile> {
        self.files.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_by_id_returns_the_file() {
        let mut list = FileList::new();
        let a = list.push(UploadedFile::new("a.pdf", "application/pdf", vec![1, 2, 3]));
        let b = list.push(UploadedFile::new("b.pdf", "application/pdf", vec![4]));

        let removed = list.remove(a).unwrap();
        assert_eq!(removed.display_name, "a.pdf");
        assert_eq!(list.len(), 1);
        assert_eq!(list.first().unwrap().id, b);
        assert!(list.remove(a).is_none());
    }

    #[test]
    fn ids_are_unique_per_file() {
        let a = UploadedFile::new("same.pdf", "application/pdf", vec![]);
        let b = UploadedFile::new("same.pdf", "application/pdf", vec![]);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn replace_with_hands_back_previous() {
        let mut list = FileList::new();
        list.push(UploadedFile::new("old.docx", "x", vec![0; 10]));
        let previous = list.replace_with(UploadedFile::new("new.docx", "x", vec![0; 4]));
        assert_eq!(previous.len(), 1);
        assert_eq!(previous[0].display_name, "old.docx");
        assert_eq!(list.len(), 1);
        assert_eq!(list.total_bytes(), 4);
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        let file = UploadedFile::new("Essay.DOCX", "x", vec![]);
        assert!(file.has_extension(&["pdf", "docx"]));
        assert!(!file.has_extension(&["pdf"]));
        let bare = UploadedFile::new("README", "x", vec![]);
        assert!(!bare.has_extension(&["pdf"]));
    }

    #[test]
    fn mime_guessing() {
        assert_eq!(mime_for_name("cv.pdf"), "application/pdf");
        assert_eq!(mime_for_name("me.JPG"), "image/jpeg");
        assert_eq!(mime_for_name("blob"), "application/octet-stream");
    }

    #[tokio::test]
    async fn from_path_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.pdf");
        tokio::fs::write(&path, b"%PDF-1.4").await.unwrap();

        let file = UploadedFile::from_path(&path).await.unwrap();
        assert_eq!(file.display_name, "sample.pdf");
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.size_bytes, 8);
    }

    #[tokio::test]
    async fn from_path_missing_file_errors() {
        let err = UploadedFile::from_path("/definitely/not/here.pdf").await.unwrap_err();
        assert!(matches!(err, IntakeError::FileRead { .. }));
    }
}
