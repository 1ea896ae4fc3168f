//! Error handling for the job optimizer application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobOptimizerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Local validation failure; the message is shown to the user verbatim.
    #[error("{0}")]
    InvalidInput(String),

    #[error("File size exceeds 5MB limit")]
    FileTooLarge,

    #[error("Invalid file type. Please upload a .txt, .doc, .docx, or .pdf file")]
    UnsupportedFormat,

    #[error("Failed to read file. Please try again or use a different file.")]
    UnreadableFile,

    /// Transport failure or unreadable response body. Carries the
    /// operation's stock failure text; the cause is logged, not displayed.
    #[error("{0}")]
    Network(String),

    /// Non-success HTTP status from the backend. The message is the parsed
    /// `detail` field, or the operation's stock failure text when absent.
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Session storage error: {0}")]
    SessionStorage(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

pub type Result<T> = std::result::Result<T, JobOptimizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intake_messages_are_verbatim() {
        assert_eq!(
            JobOptimizerError::FileTooLarge.to_string(),
            "File size exceeds 5MB limit"
        );
        assert_eq!(
            JobOptimizerError::UnsupportedFormat.to_string(),
            "Invalid file type. Please upload a .txt, .doc, .docx, or .pdf file"
        );
        assert_eq!(
            JobOptimizerError::UnreadableFile.to_string(),
            "Failed to read file. Please try again or use a different file."
        );
    }

    #[test]
    fn test_backend_error_displays_message_only() {
        let err = JobOptimizerError::Backend {
            status: 422,
            message: "Job description is too short".to_string(),
        };
        assert_eq!(err.to_string(), "Job description is too short");
    }
}
