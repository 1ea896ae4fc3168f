//! Job optimizer library

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod repl;
pub mod session;

pub use config::Config;
pub use error::{JobOptimizerError, Result};
