//! Exercise Evaluator
//!
//! Grades a submitted answer against an exercise using type-specific rules.
//! Choice, boolean, and completion exercises grade locally; debugging
//! exercises defer to the external grading collaborator behind a deadline,
//! falling back to a normalized-whitespace comparison when the collaborator
//! is absent, slow, or broken.
//!
//! The evaluator never returns an error: every collaborator failure is
//! converted into a fallback result so the exercise UI always has something
//! to show.

use std::sync::Arc;
use std::time::Duration;

use crate::catalog::Technology;
use crate::exercise::{Answer, Exercise, ExerciseKind};
use crate::grader::{GradeRequest, GradingBackend};

/// How an evaluation was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvaluationSource {
    /// Graded by a local rule.
    Local,
    /// Graded by the external collaborator.
    External,
    /// Collaborator unavailable or failed; best-effort local comparison.
    Fallback,
}

impl EvaluationSource {
    /// Whether callers should surface reduced confidence.
    #[must_use]
    pub fn is_best_effort(&self) -> bool {
        matches!(self, Self::Fallback)
    }
}

/// Result of grading one submitted answer.
#[derive(Clone, Debug)]
pub struct EvaluationResult {
    /// Whether the answer was judged correct.
    pub is_correct: bool,
    /// Explanation to show with the result.
    pub explanation: String,
    /// How the result was produced.
    pub source: EvaluationSource,
}

/// Default deadline for one external grading call.
pub const DEFAULT_GRADING_TIMEOUT: Duration = Duration::from_secs(5);

/// Grades exercise answers.
#[derive(Clone)]
pub struct Evaluator {
    grader: Option<Arc<dyn GradingBackend>>,
    grading_timeout: Duration,
}

impl Evaluator {
    /// Evaluator with no external collaborator; debugging exercises grade
    /// through the fallback comparison.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grader: None,
            grading_timeout: DEFAULT_GRADING_TIMEOUT,
        }
    }

    /// Attach an external grading collaborator.
    #[must_use]
    pub fn with_grader(mut self, grader: Arc<dyn GradingBackend>) -> Self {
        self.grader = Some(grader);
        self
    }

    /// Override the external grading deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.grading_timeout = timeout;
        self
    }

    /// Grade `answer` against `exercise`.
    ///
    /// Suspends only for debugging exercises, and never longer than the
    /// grading deadline. Never returns an error.
    pub async fn evaluate(
        &self,
        exercise: &Exercise,
        answer: &Answer,
        technology: Technology,
    ) -> EvaluationResult {
        match &exercise.kind {
            ExerciseKind::Choice { correct_index, .. } => {
                let is_correct = matches!(answer, Answer::Choice(i) if i == correct_index);
                self.local(exercise, is_correct)
            }
            ExerciseKind::Boolean { answer: expected } => {
                let is_correct = matches!(answer, Answer::Boolean(b) if b == expected);
                self.local(exercise, is_correct)
            }
            ExerciseKind::Completion { expected, .. } => {
                let is_correct = matches!(
                    answer,
                    Answer::Text(text) if text.trim().eq_ignore_ascii_case(expected.trim())
                );
                self.local(exercise, is_correct)
            }
            ExerciseKind::Debugging {
                buggy_code,
                expected,
            } => {
                let Answer::Text(user_code) = answer else {
                    return self.local(exercise, false);
                };
                self.grade_debugging(exercise, buggy_code, expected, user_code, technology)
                    .await
            }
        }
    }

    fn local(&self, exercise: &Exercise, is_correct: bool) -> EvaluationResult {
        EvaluationResult {
            is_correct,
            explanation: exercise.explanation.clone(),
            source: EvaluationSource::Local,
        }
    }

    fn fallback(&self, exercise: &Exercise, expected: &str, user_code: &str) -> EvaluationResult {
        EvaluationResult {
            is_correct: normalize_whitespace(user_code) == normalize_whitespace(expected),
            explanation: exercise.explanation.clone(),
            source: EvaluationSource::Fallback,
        }
    }

    async fn grade_debugging(
        &self,
        exercise: &Exercise,
        buggy_code: &str,
        expected: &str,
        user_code: &str,
        technology: Technology,
    ) -> EvaluationResult {
        let Some(grader) = &self.grader else {
            return self.fallback(exercise, expected, user_code);
        };

        let request = GradeRequest {
            question: exercise.question.clone(),
            buggy_code: buggy_code.to_string(),
            expected_code: expected.to_string(),
            user_code: user_code.to_string(),
            technology,
        };

        match tokio::time::timeout(self.grading_timeout, grader.grade_debugging(&request)).await {
            Ok(Ok(verdict)) => EvaluationResult {
                is_correct: verdict.is_correct,
                explanation: if verdict.explanation.is_empty() {
                    exercise.explanation.clone()
                } else {
                    verdict.explanation
                },
                source: EvaluationSource::External,
            },
            Ok(Err(error)) => {
                tracing::warn!(grader = grader.name(), %error, "grading failed, falling back");
                self.fallback(exercise, expected, user_code)
            }
            Err(_) => {
                tracing::warn!(grader = grader.name(), "grading timed out, falling back");
                self.fallback(exercise, expected, user_code)
            }
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapse all whitespace runs to single spaces and trim.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grader::GradeVerdict;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    fn exercise(kind: ExerciseKind) -> Exercise {
        Exercise {
            question: "q".into(),
            kind,
            explanation: "because".into(),
        }
    }

    struct FailingGrader;

    #[async_trait]
    impl GradingBackend for FailingGrader {
        fn name(&self) -> &'static str {
            "failing"
        }
        async fn health_check(&self) -> bool {
            false
        }
        async fn grade_debugging(&self, _request: &GradeRequest) -> anyhow::Result<GradeVerdict> {
            anyhow::bail!("unreachable service")
        }
    }

    struct SlowGrader;

    #[async_trait]
    impl GradingBackend for SlowGrader {
        fn name(&self) -> &'static str {
            "slow"
        }
        async fn health_check(&self) -> bool {
            true
        }
        async fn grade_debugging(&self, _request: &GradeRequest) -> anyhow::Result<GradeVerdict> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(GradeVerdict {
                is_correct: true,
                explanation: String::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_boolean_strict_equality() {
        let ex = exercise(ExerciseKind::Boolean { answer: true });
        let result = Evaluator::new()
            .evaluate(&ex, &Answer::Boolean(true), Technology::Html)
            .await;
        assert!(result.is_correct);
        assert_eq!(result.source, EvaluationSource::Local);

        let result = Evaluator::new()
            .evaluate(&ex, &Answer::Boolean(false), Technology::Html)
            .await;
        assert!(!result.is_correct);
    }

    #[tokio::test]
    async fn test_completion_trims_and_case_folds() {
        let ex = exercise(ExerciseKind::Completion {
            code_template: None,
            expected: "Hello".into(),
        });
        let result = Evaluator::new()
            .evaluate(&ex, &Answer::Text(" hello ".into()), Technology::Python)
            .await;
        assert!(result.is_correct);
    }

    #[tokio::test]
    async fn test_choice_index_equality() {
        let ex = exercise(ExerciseKind::Choice {
            options: vec!["a".into(), "b".into(), "c".into()],
            correct_index: 2,
        });
        let wrong = Evaluator::new()
            .evaluate(&ex, &Answer::Choice(1), Technology::Css)
            .await;
        assert!(!wrong.is_correct);

        let right = Evaluator::new()
            .evaluate(&ex, &Answer::Choice(2), Technology::Css)
            .await;
        assert!(right.is_correct);
    }

    #[tokio::test]
    async fn test_mismatched_answer_shape_is_incorrect() {
        let ex = exercise(ExerciseKind::Boolean { answer: true });
        let result = Evaluator::new()
            .evaluate(&ex, &Answer::Text("true".into()), Technology::Html)
            .await;
        assert!(!result.is_correct);
        assert_eq!(result.source, EvaluationSource::Local);
    }

    #[tokio::test]
    async fn test_debugging_without_grader_falls_back() {
        let ex = exercise(ExerciseKind::Debugging {
            buggy_code: "conts x = 1;".into(),
            expected: "const x = 1;".into(),
        });
        let result = Evaluator::new()
            .evaluate(
                &ex,
                &Answer::Text("const  x =\n1;".into()),
                Technology::JavaScript,
            )
            .await;
        assert!(result.is_correct);
        assert_eq!(result.source, EvaluationSource::Fallback);
        assert_eq!(result.explanation, "because");
    }

    #[tokio::test]
    async fn test_grader_error_becomes_fallback_not_error() {
        let ex = exercise(ExerciseKind::Debugging {
            buggy_code: "b".into(),
            expected: "const x = 1;".into(),
        });
        let evaluator = Evaluator::new().with_grader(Arc::new(FailingGrader));

        let result = evaluator
            .evaluate(&ex, &Answer::Text("wrong".into()), Technology::JavaScript)
            .await;
        assert!(!result.is_correct);
        assert_eq!(result.source, EvaluationSource::Fallback);
        assert!(result.source.is_best_effort());
    }

    #[tokio::test(start_paused = true)]
    async fn test_grader_timeout_becomes_fallback() {
        let ex = exercise(ExerciseKind::Debugging {
            buggy_code: "b".into(),
            expected: "fixed".into(),
        });
        let evaluator = Evaluator::new()
            .with_grader(Arc::new(SlowGrader))
            .with_timeout(Duration::from_millis(50));

        let result = evaluator
            .evaluate(&ex, &Answer::Text("fixed".into()), Technology::Vue)
            .await;
        assert!(result.is_correct);
        assert_eq!(result.source, EvaluationSource::Fallback);
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a\n\tb   c "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
    }
}
