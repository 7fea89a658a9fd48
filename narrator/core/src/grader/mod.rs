//! External Grading Collaborator
//!
//! Client seam for the text-grading service used by debugging exercises.
//! The trait abstraction keeps the evaluator independent of any particular
//! grading provider; the HTTP implementation talks JSON to a configured
//! endpoint. Failures never escape the evaluator - they become fallback
//! evaluations.

mod http;
mod traits;

pub use http::HttpGrader;
pub use traits::{GraderConfig, GradeRequest, GradeVerdict, GradingBackend};
