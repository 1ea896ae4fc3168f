//! Session state module
//! In-memory state, the durable snapshot, and the reconciler that ties them
//! to the backend liveness probe

pub mod manager;
pub mod state;
pub mod store;

pub use manager::{ReconcileOutcome, SessionManager};
pub use state::SessionState;
pub use store::SessionStore;
