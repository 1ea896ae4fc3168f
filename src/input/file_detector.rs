//! File type detection

use std::path::Path;

/// Resume files larger than this are rejected before any read.
pub const MAX_RESUME_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Text,
    Doc,
    Docx,
    Pdf,
    Unknown,
}

impl FileKind {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "txt" => FileKind::Text,
            "doc" => FileKind::Doc,
            "docx" => FileKind::Docx,
            "pdf" => FileKind::Pdf,
            _ => FileKind::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(FileKind::from_extension)
            .unwrap_or(FileKind::Unknown)
    }

    /// Whether the allow-list accepts this kind as a resume upload.
    pub fn is_allowed(&self) -> bool {
        !matches!(self, FileKind::Unknown)
    }

    /// Only plain text decodes cleanly; the other accepted kinds go through
    /// the same raw decode and may come out garbled.
    pub fn is_plain_text(&self) -> bool {
        matches!(self, FileKind::Text)
    }
}
