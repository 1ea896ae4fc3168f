//! Input processing module
//! Handles file detection, intake checks, and text extraction

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use file_detector::{FileKind, MAX_RESUME_BYTES};
pub use manager::InputManager;
