//! Session reconciler
//!
//! Owns the in-memory state, the durable store, per-operation loading flags,
//! and the backend online indicator. Every mutation is written to the store
//! immediately so a restart picks up exactly where the user left off.

use crate::api::{ApiClient, Operation, OperationInputs};
use crate::error::{JobOptimizerError, Result};
use crate::session::state::SessionState;
use crate::session::store::SessionStore;
use chrono::Utc;
use log::{debug, info};
use serde_json::Value;
use std::collections::HashSet;

/// What the startup liveness probe decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Backend answered and a previous session was discarded.
    OnlineCleared,
    /// Backend answered; there was nothing to discard.
    Online,
    /// Backend did not answer; restored state is kept.
    Offline,
}

impl ReconcileOutcome {
    pub fn is_online(&self) -> bool {
        !matches!(self, ReconcileOutcome::Offline)
    }
}

pub struct SessionManager {
    state: SessionState,
    store: SessionStore,
    loading: HashSet<Operation>,
    online: Option<bool>,
}

impl SessionManager {
    /// Reads the snapshot once. Everything after this goes through the
    /// manager's own mutations.
    pub fn open(store: SessionStore) -> Self {
        let state = store.load().unwrap_or_default();
        Self {
            state,
            store,
            loading: HashSet::new(),
            online: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// `None` until `reconcile` has run.
    pub fn online(&self) -> Option<bool> {
        self.online
    }

    pub fn is_loading(&self, op: Operation) -> bool {
        self.loading.contains(&op)
    }

    /// The single liveness probe per invocation. A responsive backend means a
    /// fresh start: all in-memory and persisted state is discarded. An
    /// unresponsive backend keeps whatever the snapshot restored.
    pub async fn reconcile(&mut self, client: &ApiClient) -> Result<ReconcileOutcome> {
        let alive = client.probe().await;
        self.online = Some(alive);

        if !alive {
            debug!("Backend probe failed, keeping restored session state");
            return Ok(ReconcileOutcome::Offline);
        }

        let had_state = !self.state.is_empty();
        info!("Backend probe succeeded, starting a fresh session");
        self.clear_all()?;

        if had_state {
            Ok(ReconcileOutcome::OnlineCleared)
        } else {
            Ok(ReconcileOutcome::Online)
        }
    }

    pub fn set_job_description(&mut self, text: String) -> Result<()> {
        self.state.job_description = text;
        self.persist()
    }

    pub fn set_resume(&mut self, text: String) -> Result<()> {
        self.state.resume = text;
        self.persist()
    }

    /// Validation gate for a trigger. Resume-backed operations check the
    /// resume before the job description; the order is user-visible. A failed
    /// check leaves every flag and slot untouched.
    pub fn begin_operation(&mut self, op: Operation) -> Result<OperationInputs> {
        if op.requires_resume() && self.state.resume.trim().is_empty() {
            return Err(JobOptimizerError::InvalidInput(
                "Please upload a resume".to_string(),
            ));
        }
        if self.state.job_description.trim().is_empty() {
            return Err(JobOptimizerError::InvalidInput(
                "Please enter a job description".to_string(),
            ));
        }

        self.loading.insert(op);
        debug!("Operation {} started", op.command_name());

        if op.requires_resume() {
            Ok(OperationInputs {
                text: self.state.resume.clone(),
                job_description: Some(self.state.job_description.clone()),
            })
        } else {
            Ok(OperationInputs {
                text: self.state.job_description.clone(),
                job_description: None,
            })
        }
    }

    /// Stores the verbatim response in the operation's own slot and makes it
    /// the active view.
    pub fn complete_operation(&mut self, op: Operation, value: Value) -> Result<()> {
        self.state.set_result(op, value);
        self.state.active_view = op;
        self.loading.remove(&op);
        debug!("Operation {} completed", op.command_name());
        self.persist()
    }

    /// Failure path: only the loading flag changes.
    pub fn abort_operation(&mut self, op: Operation) {
        self.loading.remove(&op);
        debug!("Operation {} failed", op.command_name());
    }

    /// Validates, invokes, and applies one operation end to end.
    pub async fn run_operation(&mut self, client: &ApiClient, op: Operation) -> Result<Value> {
        let inputs = self.begin_operation(op)?;
        match client.invoke(op, &inputs).await {
            Ok(value) => {
                self.complete_operation(op, value.clone())?;
                Ok(value)
            }
            Err(e) => {
                self.abort_operation(op);
                Err(e)
            }
        }
    }

    /// Empties every field and deletes the snapshot.
    pub fn clear_all(&mut self) -> Result<()> {
        self.state = SessionState::default();
        self.loading.clear();
        self.store.clear()
    }

    fn persist(&mut self) -> Result<()> {
        self.state.saved_at = Some(Utc::now());
        self.store.save(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manager_in(dir: &tempfile::TempDir) -> SessionManager {
        SessionManager::open(SessionStore::new(dir.path().join("session.json")))
    }

    #[test]
    fn test_analyze_requires_job_description() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(&dir);

        let err = manager.begin_operation(Operation::Analyze).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a job description");
        assert!(!manager.is_loading(Operation::Analyze));
    }

    #[test]
    fn test_resume_operations_check_resume_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(&dir);
        manager.set_job_description("A job".to_string()).unwrap();

        for op in [Operation::Match, Operation::Optimize, Operation::CoverLetter] {
            let err = manager.begin_operation(op).unwrap_err();
            assert_eq!(err.to_string(), "Please upload a resume");
        }

        // With a resume but a blank job description the second check fires.
        manager.set_resume("A resume".to_string()).unwrap();
        manager.set_job_description("   ".to_string()).unwrap();
        let err = manager.begin_operation(Operation::Match).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a job description");
    }

    #[test]
    fn test_whitespace_only_inputs_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(&dir);
        manager.set_job_description("  \n\t ".to_string()).unwrap();

        assert!(manager.begin_operation(Operation::Analyze).is_err());
    }

    #[test]
    fn test_failed_validation_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(&dir);

        let _ = manager.begin_operation(Operation::CoverLetter);

        assert!(!manager.is_loading(Operation::CoverLetter));
        assert!(manager.state().result_for(Operation::CoverLetter).is_none());
        assert_eq!(manager.state().active_view, Operation::Analyze);
    }

    #[test]
    fn test_begin_operation_builds_request_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(&dir);
        manager.set_job_description("the role".to_string()).unwrap();
        manager.set_resume("the resume".to_string()).unwrap();

        let inputs = manager.begin_operation(Operation::Analyze).unwrap();
        assert_eq!(inputs.text, "the role");
        assert!(inputs.job_description.is_none());

        let inputs = manager.begin_operation(Operation::Optimize).unwrap();
        assert_eq!(inputs.text, "the resume");
        assert_eq!(inputs.job_description.as_deref(), Some("the role"));
    }

    #[test]
    fn test_complete_switches_active_view_and_clears_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(&dir);
        manager.set_job_description("jd".to_string()).unwrap();
        manager.set_resume("cv".to_string()).unwrap();

        manager.begin_operation(Operation::Match).unwrap();
        assert!(manager.is_loading(Operation::Match));

        manager
            .complete_operation(Operation::Match, json!({"match_result": "ok"}))
            .unwrap();
        assert!(!manager.is_loading(Operation::Match));
        assert_eq!(manager.state().active_view, Operation::Match);
        assert!(manager.state().result_for(Operation::Match).is_some());
    }

    #[test]
    fn test_abort_leaves_results_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(&dir);
        manager.set_job_description("jd".to_string()).unwrap();
        manager
            .complete_operation(Operation::Analyze, json!({"analysis": {}}))
            .unwrap();

        manager.begin_operation(Operation::Analyze).unwrap();
        manager.abort_operation(Operation::Analyze);

        assert!(!manager.is_loading(Operation::Analyze));
        assert!(manager.state().result_for(Operation::Analyze).is_some());
    }

    #[test]
    fn test_clear_all_resets_state_and_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager_in(&dir);
        manager.set_job_description("jd".to_string()).unwrap();
        manager
            .complete_operation(Operation::CoverLetter, json!({"cover_letter": "Dear"}))
            .unwrap();

        manager.clear_all().unwrap();

        assert!(manager.state().is_empty());
        assert_eq!(manager.state().active_view, Operation::Analyze);

        let reopened = manager_in(&dir);
        assert!(reopened.state().is_empty());
    }
}
