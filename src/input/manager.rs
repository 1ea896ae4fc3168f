//! Input manager for resume and job description files

use crate::error::{JobOptimizerError, Result};
use crate::input::file_detector::{FileKind, MAX_RESUME_BYTES};
use crate::input::text_extractor::{RawTextExtractor, TextExtractor};
use log::{info, warn};
use std::path::Path;
use tokio::fs;

pub struct InputManager {
    extractor: RawTextExtractor,
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            extractor: RawTextExtractor,
        }
    }

    /// Full intake pipeline for a resume file. Checks run in a fixed order:
    /// existence, then size, then the extension allow-list, then the read.
    pub async fn load_resume(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(JobOptimizerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let metadata = fs::metadata(path).await?;
        if metadata.len() > MAX_RESUME_BYTES {
            warn!(
                "Rejecting {} ({} bytes, limit {})",
                path.display(),
                metadata.len(),
                MAX_RESUME_BYTES
            );
            return Err(JobOptimizerError::FileTooLarge);
        }

        let kind = FileKind::from_path(path);
        if !kind.is_allowed() {
            let ext = path
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or("(none)");
            warn!("Rejecting {} with extension {:?}", path.display(), ext);
            return Err(JobOptimizerError::UnsupportedFormat);
        }

        if !kind.is_plain_text() {
            warn!(
                "{} is not plain text; raw decode may produce unusable content",
                path.display()
            );
        }

        info!("Reading resume file: {}", path.display());
        self.extractor.extract(path).await
    }

    /// Reads a job description file as plain text. This stands in for pasting
    /// the text, so the resume intake checks do not apply.
    pub async fn load_job_text(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(JobOptimizerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        info!("Reading job description file: {}", path.display());
        self.extractor.extract(path).await
    }
}
