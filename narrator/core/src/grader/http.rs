//! HTTP Grading Client
//!
//! Grading collaborator implementation over a JSON HTTP endpoint.
//!
//! # Wire format
//!
//! - `POST {base}/api/grade` with
//!   `{question, buggyCode, expectedCode, userCode, technology}`
//! - response `{isCorrect: bool, explanation: string}`
//! - `GET {base}/api/health` for reachability

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{GraderConfig, GradeRequest, GradeVerdict, GradingBackend};

/// HTTP grading collaborator client.
#[derive(Clone)]
pub struct HttpGrader {
    base_url: String,
    request_timeout: Duration,
    http_client: reqwest::Client,
}

impl HttpGrader {
    /// Create a client for a base URL with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_config(&GraderConfig::new(base_url))
    }

    /// Create a client from a [`GraderConfig`].
    #[must_use]
    pub fn from_config(config: &GraderConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(config.timeout_secs),
            http_client: reqwest::Client::new(),
        }
    }

    /// Create from environment variables, if a grader is configured.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        GraderConfig::from_env().map(|c| Self::from_config(&c))
    }

    fn grade_url(&self) -> String {
        format!("{}/api/grade", self.base_url)
    }

    fn health_url(&self) -> String {
        format!("{}/api/health", self.base_url)
    }
}

#[async_trait]
impl GradingBackend for HttpGrader {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(self.health_url())
            .timeout(self.request_timeout)
            .send()
            .await
            .is_ok_and(|r| r.status().is_success())
    }

    async fn grade_debugging(&self, request: &GradeRequest) -> anyhow::Result<GradeVerdict> {
        let body = serde_json::json!({
            "question": request.question,
            "buggyCode": request.buggy_code,
            "expectedCode": request.expected_code,
            "userCode": request.user_code,
            "technology": request.technology.label(),
        });

        let response = self
            .http_client
            .post(self.grade_url())
            .timeout(self.request_timeout)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("grader returned {status}: {body}");
        }

        let data: serde_json::Value = response.json().await?;

        let is_correct = data
            .get("isCorrect")
            .and_then(serde_json::Value::as_bool)
            .ok_or_else(|| anyhow::anyhow!("grader response missing isCorrect"))?;
        let explanation = data
            .get("explanation")
            .and_then(|e| e.as_str())
            .unwrap_or("")
            .to_string();

        Ok(GradeVerdict {
            is_correct,
            explanation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let grader = HttpGrader::new("http://localhost:8750/");
        assert_eq!(grader.grade_url(), "http://localhost:8750/api/grade");
        assert_eq!(grader.health_url(), "http://localhost:8750/api/health");
    }

    #[test]
    fn test_from_config_timeout() {
        let config = GraderConfig {
            base_url: "http://g.test".into(),
            timeout_secs: 2,
        };
        let grader = HttpGrader::from_config(&config);
        assert_eq!(grader.request_timeout, Duration::from_secs(2));
    }
}
