//! Grading Backend Traits
//!
//! Trait definitions for the external answer-grading collaborator. The
//! abstraction lets the evaluator work against any grading provider (or a
//! test double) without changing evaluation logic.

use async_trait::async_trait;

use crate::catalog::Technology;

/// A debugging-exercise grading request.
#[derive(Clone, Debug)]
pub struct GradeRequest {
    /// The exercise question.
    pub question: String,
    /// The buggy code shown to the user.
    pub buggy_code: String,
    /// The reference fix.
    pub expected_code: String,
    /// The user's submitted fix.
    pub user_code: String,
    /// Technology the exercise belongs to.
    pub technology: Technology,
}

/// Verdict returned by a grading collaborator.
#[derive(Clone, Debug)]
pub struct GradeVerdict {
    /// Whether the submission was judged correct.
    pub is_correct: bool,
    /// Collaborator-provided explanation (may be empty).
    pub explanation: String,
}

/// Grading collaborator trait.
///
/// Implement this to add a grading provider. Implementations may fail
/// freely (`anyhow::Result`); the evaluator converts every failure into a
/// fallback evaluation.
#[async_trait]
pub trait GradingBackend: Send + Sync {
    /// Provider name (for logs).
    fn name(&self) -> &str;

    /// Check if the collaborator is reachable.
    async fn health_check(&self) -> bool;

    /// Grade a debugging submission.
    async fn grade_debugging(&self, request: &GradeRequest) -> anyhow::Result<GradeVerdict>;
}

/// Grading collaborator connection configuration.
#[derive(Clone, Debug)]
pub struct GraderConfig {
    /// Service base URL.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8750".to_string(),
            timeout_secs: 5,
        }
    }
}

impl GraderConfig {
    /// Create a config for a base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Create from environment variables, if a grader is configured.
    ///
    /// Reads `PRAXIS_GRADER_URL` and `PRAXIS_GRADER_TIMEOUT_SECS`.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("PRAXIS_GRADER_URL").ok()?;
        let timeout_secs = std::env::var("PRAXIS_GRADER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);
        Some(Self {
            base_url,
            timeout_secs,
        })
    }
}
