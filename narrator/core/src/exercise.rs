//! Exercise Types
//!
//! Tagged-union exercise records, submitted answers, and the answer sheet.
//! Each exercise variant carries only the fields its type uses, which keeps
//! grading exhaustively checkable; the JSON wire shape stays the duck-typed
//! `{"type": ...}` form of the content files.
//!
//! The answer sheet tracks one slot per exercise index: replaceable before
//! submission, frozen after, cleared when the user navigates away and back.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One exercise attached to an element.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    /// The question shown to the user.
    pub question: String,
    /// Type-specific payload.
    #[serde(flatten)]
    pub kind: ExerciseKind,
    /// Static explanation shown with the result.
    pub explanation: String,
}

/// Type-specific exercise payloads.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExerciseKind {
    /// Pick one option by index.
    Choice {
        /// The options, in display order.
        options: Vec<String>,
        /// Index of the correct option.
        #[serde(rename = "correctAnswer")]
        correct_index: usize,
    },
    /// True/false question.
    Boolean {
        /// The correct truth value.
        #[serde(rename = "correctAnswer")]
        answer: bool,
    },
    /// Fill in the blank of a code template.
    Completion {
        /// Template with the blank, shown to the user.
        #[serde(rename = "codeTemplate", default)]
        code_template: Option<String>,
        /// Expected completion.
        #[serde(rename = "correctAnswer")]
        expected: String,
    },
    /// Fix broken code; graded by the external collaborator.
    Debugging {
        /// The buggy code shown to the user.
        #[serde(rename = "buggyCode")]
        buggy_code: String,
        /// Reference fix.
        #[serde(rename = "correctAnswer")]
        expected: String,
    },
}

impl ExerciseKind {
    /// Short label for the exercise type.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Choice { .. } => "multiple choice",
            Self::Boolean { .. } => "true or false",
            Self::Completion { .. } => "completion",
            Self::Debugging { .. } => "debugging",
        }
    }
}

/// A submitted answer. The shape must match the exercise type; mismatches
/// grade as incorrect rather than erroring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Answer {
    /// Option index for [`ExerciseKind::Choice`].
    Choice(usize),
    /// Truth value for [`ExerciseKind::Boolean`].
    Boolean(bool),
    /// Free text for [`ExerciseKind::Completion`] and [`ExerciseKind::Debugging`].
    Text(String),
}

#[derive(Clone, Debug)]
struct AnswerSlot {
    answer: Answer,
    submitted: bool,
}

/// Per-exercise answer records for one lesson session.
#[derive(Clone, Debug, Default)]
pub struct AnswerSheet {
    slots: HashMap<usize, AnswerSlot>,
}

impl AnswerSheet {
    /// Create an empty sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the answer for an exercise. Returns `false` if
    /// that index is frozen by an earlier submission.
    pub fn select(&mut self, index: usize, answer: Answer) -> bool {
        match self.slots.get(&index) {
            Some(slot) if slot.submitted => false,
            _ => {
                self.slots.insert(
                    index,
                    AnswerSlot {
                        answer,
                        submitted: false,
                    },
                );
                true
            }
        }
    }

    /// Freeze the answer at an index for grading. Returns the frozen answer,
    /// or `None` if nothing was selected or it was already submitted.
    pub fn submit(&mut self, index: usize) -> Option<Answer> {
        let slot = self.slots.get_mut(&index)?;
        if slot.submitted {
            return None;
        }
        slot.submitted = true;
        Some(slot.answer.clone())
    }

    /// The currently recorded answer for an index.
    #[must_use]
    pub fn answer(&self, index: usize) -> Option<&Answer> {
        self.slots.get(&index).map(|s| &s.answer)
    }

    /// Whether the answer at an index has been submitted.
    #[must_use]
    pub fn is_submitted(&self, index: usize) -> bool {
        self.slots.get(&index).is_some_and(|s| s.submitted)
    }

    /// Clear one slot (navigating away and back resets the attempt).
    pub fn clear(&mut self, index: usize) {
        self.slots.remove(&index);
    }

    /// Clear every slot.
    pub fn clear_all(&mut self) {
        self.slots.clear();
    }
}
