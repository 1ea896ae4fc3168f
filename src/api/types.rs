//! Operations and wire types for the optimizer backend

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four remote operations the backend offers. Also doubles as the view
/// selector: each operation owns exactly one result pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Analyze,
    Match,
    Optimize,
    CoverLetter,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Analyze,
        Operation::Match,
        Operation::Optimize,
        Operation::CoverLetter,
    ];

    pub fn endpoint_path(&self) -> &'static str {
        match self {
            Operation::Analyze => "/analyze-job-rule-based",
            Operation::Match => "/match-resume-rule-based",
            Operation::Optimize => "/optimize",
            Operation::CoverLetter => "/generate-cover-letter",
        }
    }

    pub fn command_name(&self) -> &'static str {
        match self {
            Operation::Analyze => "analyze",
            Operation::Match => "match",
            Operation::Optimize => "optimize",
            Operation::CoverLetter => "cover-letter",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Operation::Analyze => "Job Analysis",
            Operation::Match => "Resume Match",
            Operation::Optimize => "Optimization Suggestions",
            Operation::CoverLetter => "Cover Letter",
        }
    }

    pub fn loading_label(&self) -> &'static str {
        match self {
            Operation::Analyze => "Analyzing",
            Operation::Match => "Matching",
            Operation::Optimize => "Optimizing",
            Operation::CoverLetter => "Generating",
        }
    }

    /// Shown when the backend rejects the request without a `detail` message.
    pub fn default_failure_message(&self) -> &'static str {
        match self {
            Operation::Analyze => "Failed to analyze job description",
            Operation::Match => "Failed to match resume",
            Operation::Optimize => "Failed to optimize resume",
            Operation::CoverLetter => "Failed to generate cover letter",
        }
    }

    /// True for the operations that send the resume alongside the job text.
    pub fn requires_resume(&self) -> bool {
        !matches!(self, Operation::Analyze)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command_name())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "analyze" | "analysis" => Ok(Operation::Analyze),
            "match" => Ok(Operation::Match),
            "optimize" => Ok(Operation::Optimize),
            "cover-letter" | "letter" | "cover" => Ok(Operation::CoverLetter),
            other => Err(format!(
                "Unknown operation: {}. Expected analyze, match, optimize, or cover-letter",
                other
            )),
        }
    }
}

/// Inputs captured when an operation is triggered, so later session edits do
/// not leak into an in-flight request.
#[derive(Debug, Clone)]
pub struct OperationInputs {
    pub text: String,
    pub job_description: Option<String>,
}

/// Body for the analyze endpoint (also the liveness probe, with empty text).
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub text: &'a str,
}

/// Body for the match, optimize, and cover-letter endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeRequest<'a> {
    pub text: &'a str,
    pub job_description: &'a str,
}

/// Error payload the backend attaches to non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(Operation::Analyze.endpoint_path(), "/analyze-job-rule-based");
        assert_eq!(Operation::Match.endpoint_path(), "/match-resume-rule-based");
        assert_eq!(Operation::Optimize.endpoint_path(), "/optimize");
        assert_eq!(
            Operation::CoverLetter.endpoint_path(),
            "/generate-cover-letter"
        );
    }

    #[test]
    fn test_operation_serializes_kebab_case() {
        let json = serde_json::to_string(&Operation::CoverLetter).unwrap();
        assert_eq!(json, "\"cover-letter\"");

        let parsed: Operation = serde_json::from_str("\"cover-letter\"").unwrap();
        assert_eq!(parsed, Operation::CoverLetter);
    }

    #[test]
    fn test_from_str_accepts_aliases() {
        assert_eq!("analyze".parse::<Operation>().unwrap(), Operation::Analyze);
        assert_eq!("MATCH".parse::<Operation>().unwrap(), Operation::Match);
        assert_eq!("letter".parse::<Operation>().unwrap(), Operation::CoverLetter);
        assert_eq!(
            "cover-letter".parse::<Operation>().unwrap(),
            Operation::CoverLetter
        );
        assert!("summarize".parse::<Operation>().is_err());
    }

    #[test]
    fn test_resume_request_body_shape() {
        let body = ResumeRequest {
            text: "resume text",
            job_description: "job text",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["text"], "resume text");
        assert_eq!(json["job_description"], "job text");
    }

    #[test]
    fn test_error_body_tolerates_missing_detail() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.detail.is_none());

        let body: ErrorBody = serde_json::from_str("{\"detail\":\"too short\"}").unwrap();
        assert_eq!(body.detail.as_deref(), Some("too short"));
    }
}
