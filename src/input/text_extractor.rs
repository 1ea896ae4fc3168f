//! Raw text extraction

use crate::error::{JobOptimizerError, Result};
use log::warn;
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Reads the file bytes and decodes them lossily as UTF-8. Every accepted
/// format goes through this path; there is no format-specific parsing.
pub struct RawTextExtractor;

impl TextExtractor for RawTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await.map_err(|e| {
            warn!("Failed to read {}: {}", path.display(), e);
            JobOptimizerError::UnreadableFile
        })?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
