//! Output module
//! Renders stored operation results for the console or as raw JSON

pub mod formatter;
pub mod views;

pub use formatter::{formatter_for, ConsoleFormatter, JsonFormatter, OutputFormatter};
