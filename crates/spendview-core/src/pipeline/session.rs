use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use uuid::Uuid;

use crate::backend::PresignedPost;

/// Extensions the receipt processor actually reads
const PROCESSED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bin"];

/// A file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    name: String,
    bytes: Vec<u8>,
    mime: String,
}

impl UploadFile {
    /// Create from in-memory contents, guessing the MIME type from `name`
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self { name, bytes, mime }
    }

    /// Read a file from disk
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    /// Why the backend will store but not process this file, if it won't
    pub fn processing_warning(&self) -> Option<String> {
        match self.extension().as_deref() {
            Some("pdf") => Some(format!(
                "{} is a PDF; the receipt processor skips PDFs, totals will not change",
                self.name
            )),
            Some(ext) if PROCESSED_EXTENSIONS.contains(&ext) => None,
            _ => Some(format!(
                "{} is not a jpg/jpeg/png/bin file; the receipt processor will skip it",
                self.name
            )),
        }
    }
}

/// State of a single upload attempt
#[derive(Debug)]
pub struct UploadSession {
    id: Uuid,
    file: UploadFile,
    credential: Option<PresignedPost>,
    progress: u8,
    status: String,
}

impl UploadSession {
    pub fn new(file: UploadFile) -> Self {
        Self {
            id: Uuid::new_v4(),
            file,
            credential: None,
            progress: 0,
            status: String::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file(&self) -> &UploadFile {
        &self.file
    }

    pub(crate) fn credential(&self) -> Option<&PresignedPost> {
        self.credential.as_ref()
    }

    pub fn set_credential(&mut self, credential: PresignedPost) {
        self.credential = Some(credential);
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Set progress, clamped to 100
    pub fn set_progress(&mut self, percent: u8) {
        self.progress = percent.min(100);
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }
}

/// Holds the busy flag for the lifetime of one upload attempt
#[derive(Debug)]
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    /// Claim the flag, or `None` if another attempt holds it
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_guess_from_name() {
        assert_eq!(UploadFile::new("receipt.png", vec![]).mime(), "image/png");
        assert_eq!(UploadFile::new("scan.JPG", vec![]).mime(), "image/jpeg");
        assert_eq!(
            UploadFile::new("blob", vec![1, 2]).mime(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_processing_warning() {
        assert!(UploadFile::new("a.jpeg", vec![]).processing_warning().is_none());
        assert!(UploadFile::new("a.BIN", vec![]).processing_warning().is_none());
        assert!(UploadFile::new("a.pdf", vec![])
            .processing_warning()
            .unwrap()
            .contains("PDF"));
        assert!(UploadFile::new("notes.txt", vec![]).processing_warning().is_some());
        assert!(UploadFile::new("noext", vec![]).processing_warning().is_some());
    }

    #[tokio::test]
    async fn test_from_path_reads_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lunch.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.name(), "lunch.png");
        assert_eq!(file.size(), 4);
        assert_eq!(file.mime(), "image/png");
    }

    #[test]
    fn test_busy_guard_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);
        let guard = BusyGuard::acquire(&flag).expect("first acquire");
        assert!(BusyGuard::acquire(&flag).is_none());
        drop(guard);
        assert!(!flag.load(Ordering::Acquire));
        assert!(BusyGuard::acquire(&flag).is_some());
    }

    #[test]
    fn test_session_progress_is_clamped() {
        let mut session = UploadSession::new(UploadFile::new("a.png", vec![]));
        session.set_progress(250);
        assert_eq!(session.progress(), 100);
        assert!(session.credential().is_none());
        assert_eq!(session.status(), "");
    }
}
