//! Backend API module
//! Wire types and the HTTP client for the four analysis operations

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{Operation, OperationInputs};
