//! The form fields and result payloads for one invocation

use crate::api::types::Operation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything the user has entered or received so far. Fields are mutually
/// independent; each result slot is either absent or the verbatim parsed
/// JSON from its endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub job_description: String,
    pub resume: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_results: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_results: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimize_results: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter_results: Option<Value>,
    /// The result pane the user last populated.
    pub active_view: Operation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            job_description: String::new(),
            resume: String::new(),
            analysis_results: None,
            match_results: None,
            optimize_results: None,
            cover_letter_results: None,
            active_view: Operation::Analyze,
            saved_at: None,
        }
    }
}

impl SessionState {
    pub fn result_for(&self, op: Operation) -> Option<&Value> {
        match op {
            Operation::Analyze => self.analysis_results.as_ref(),
            Operation::Match => self.match_results.as_ref(),
            Operation::Optimize => self.optimize_results.as_ref(),
            Operation::CoverLetter => self.cover_letter_results.as_ref(),
        }
    }

    pub fn set_result(&mut self, op: Operation, value: Value) {
        match op {
            Operation::Analyze => self.analysis_results = Some(value),
            Operation::Match => self.match_results = Some(value),
            Operation::Optimize => self.optimize_results = Some(value),
            Operation::CoverLetter => self.cover_letter_results = Some(value),
        }
    }

    /// Operations that currently hold a result, in fixed display order.
    pub fn stored_views(&self) -> Vec<Operation> {
        Operation::ALL
            .into_iter()
            .filter(|op| self.result_for(*op).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.job_description.is_empty() && self.resume.is_empty() && self.stored_views().is_empty()
    }
}
