//! HTTP client for the optimizer backend

use crate::api::types::{AnalyzeRequest, ErrorBody, Operation, OperationInputs, ResumeRequest};
use crate::error::{JobOptimizerError, Result};
use log::{debug, warn};
use serde_json::Value;

/// Thin client over the backend's four POST endpoints.
///
/// Carries no timeout, retry, or cancellation: every trigger is a single
/// plain JSON POST and the outcome is whatever comes back.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            JobOptimizerError::Configuration(format!("Failed to build HTTP client: {}", e))
        })?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, op: Operation) -> String {
        format!("{}{}", self.base_url, op.endpoint_path())
    }

    /// Single liveness probe: an empty analyze request. Any HTTP response,
    /// success or error status alike, means the backend is up; only a
    /// transport failure reports it down.
    pub async fn probe(&self) -> bool {
        let url = self.endpoint(Operation::Analyze);
        match self
            .http
            .post(&url)
            .json(&AnalyzeRequest { text: "" })
            .send()
            .await
        {
            Ok(response) => {
                debug!("Liveness probe answered with {}", response.status());
                true
            }
            Err(e) => {
                debug!("Liveness probe failed: {}", e);
                false
            }
        }
    }

    /// POST one operation and hand back the parsed response verbatim.
    /// A transport failure or an unreadable success body surfaces the
    /// operation's stock failure message with the cause logged.
    pub async fn invoke(&self, op: Operation, inputs: &OperationInputs) -> Result<Value> {
        let url = self.endpoint(op);
        debug!("POST {}", url);

        let request = self.http.post(&url);
        let sent = match op {
            Operation::Analyze => {
                request
                    .json(&AnalyzeRequest { text: &inputs.text })
                    .send()
                    .await
            }
            _ => {
                request
                    .json(&ResumeRequest {
                        text: &inputs.text,
                        job_description: inputs.job_description.as_deref().unwrap_or(""),
                    })
                    .send()
                    .await
            }
        };

        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                return Err(JobOptimizerError::Network(
                    op.default_failure_message().to_string(),
                ));
            }
        };

        let status = response.status();
        if status.is_success() {
            match response.json::<Value>().await {
                Ok(value) => Ok(value),
                Err(e) => {
                    warn!("Could not parse response from {}: {}", url, e);
                    Err(JobOptimizerError::Network(
                        op.default_failure_message().to_string(),
                    ))
                }
            }
        } else {
            let message = match response.json::<ErrorBody>().await {
                Ok(ErrorBody {
                    detail: Some(detail),
                }) => detail,
                _ => op.default_failure_message().to_string(),
            };
            warn!("Backend returned {} for {}: {}", status, op, message);
            Err(JobOptimizerError::Backend {
                status: status.as_u16(),
                message,
            })
        }
    }

    pub async fn analyze_job(&self, job_description: &str) -> Result<Value> {
        let inputs = OperationInputs {
            text: job_description.to_string(),
            job_description: None,
        };
        self.invoke(Operation::Analyze, &inputs).await
    }

    pub async fn match_resume(&self, resume: &str, job_description: &str) -> Result<Value> {
        let inputs = OperationInputs {
            text: resume.to_string(),
            job_description: Some(job_description.to_string()),
        };
        self.invoke(Operation::Match, &inputs).await
    }

    pub async fn optimize_resume(&self, resume: &str, job_description: &str) -> Result<Value> {
        let inputs = OperationInputs {
            text: resume.to_string(),
            job_description: Some(job_description.to_string()),
        };
        self.invoke(Operation::Optimize, &inputs).await
    }

    pub async fn generate_cover_letter(
        &self,
        resume: &str,
        job_description: &str,
    ) -> Result<Value> {
        let inputs = OperationInputs {
            text: resume.to_string(),
            job_description: Some(job_description.to_string()),
        };
        self.invoke(Operation::CoverLetter, &inputs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.endpoint(Operation::Optimize),
            "http://localhost:8000/optimize"
        );
    }
}
