//! Display State Types
//!
//! View-model state for the TUI. These types bridge the narrator core and
//! rendering: the core owns playback and grading truth, the display state
//! owns what the user is pointing at.
//!
//! # Design Philosophy
//!
//! The TUI is a thin client over the narrator core. Screens render display
//! state; key handlers mutate it through small, testable methods. Nothing
//! here talks to the terminal.

use std::collections::HashMap;
use std::time::Instant;

use narrator_core::{
    search, Answer, AnswerSheet, Element, EvaluationResult, ExerciseKind, Sequencer,
    SequencerTiming, DEFAULT_LIMIT,
};

/// Which screen is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    /// Catalog browser with search.
    Browse,
    /// Lesson playback (narration or exercises).
    Lesson,
}

/// Browse screen state: the search query and result selection.
#[derive(Debug, Default)]
pub struct BrowseState {
    /// Current search input.
    pub query: String,
    /// Ranked result ids (all elements when the query is empty).
    pub results: Vec<String>,
    /// Selected row within `results`.
    pub selected: usize,
}

impl BrowseState {
    /// Recompute results for the current query over a catalog.
    pub fn refresh(&mut self, catalog: &narrator_core::Catalog) {
        self.results = if self.query.trim().is_empty() {
            catalog.iter().map(|(id, _)| id.to_string()).collect()
        } else {
            search(catalog, &self.query, DEFAULT_LIMIT)
                .into_iter()
                .map(|hit| hit.id.to_string())
                .collect()
        };
        if self.selected >= self.results.len() {
            self.selected = self.results.len().saturating_sub(1);
        }
    }

    /// Move the selection by `delta`, clamped to the result list.
    pub fn move_selection(&mut self, delta: i32) {
        if self.results.is_empty() {
            return;
        }
        let last = self.results.len() as i32 - 1;
        self.selected = (self.selected as i32 + delta).clamp(0, last) as usize;
    }

    /// The selected element id, if any.
    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.results.get(self.selected).map(String::as_str)
    }
}

/// Per-exercise input cursor for the active exercise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExerciseInput {
    /// Option cursor for choice exercises.
    Choice(usize),
    /// Truth cursor for boolean exercises.
    Boolean(bool),
    /// Free-text entry for completion and debugging exercises.
    Text(String),
}

/// One open lesson: the element, its sequencer, and exercise progress.
pub struct LessonState {
    /// Element identifier within the catalog.
    pub element_id: String,
    /// The element being narrated.
    pub element: Element,
    /// The narration sequencer.
    pub sequencer: Sequencer,
    /// Submitted answers, frozen per index.
    pub answers: AnswerSheet,
    /// Index of the exercise being shown.
    pub exercise_index: usize,
    /// Input state for the active exercise.
    pub input: ExerciseInput,
    /// Grading feedback per exercise index.
    pub feedback: HashMap<usize, EvaluationResult>,
    /// Exercise index with a grading call in flight.
    pub awaiting: Option<usize>,
}

impl LessonState {
    /// Open a lesson for an element and start playback.
    #[must_use]
    pub fn open(element_id: &str, element: &Element, timing: SequencerTiming, now: Instant) -> Self {
        let mut sequencer = Sequencer::for_element(element).with_timing(timing);
        sequencer.start(now);
        let mut lesson = Self {
            element_id: element_id.to_string(),
            element: element.clone(),
            sequencer,
            answers: AnswerSheet::new(),
            exercise_index: 0,
            input: ExerciseInput::Text(String::new()),
            feedback: HashMap::new(),
            awaiting: None,
        };
        lesson.input = lesson.fresh_input(0);
        lesson
    }

    /// The exercise currently shown, if the element has any.
    #[must_use]
    pub fn current_exercise(&self) -> Option<&narrator_core::Exercise> {
        self.element.exercises.get(self.exercise_index)
    }

    /// Initial input state for an exercise index.
    fn fresh_input(&self, index: usize) -> ExerciseInput {
        match self.element.exercises.get(index).map(|e| &e.kind) {
            Some(ExerciseKind::Choice { .. }) => ExerciseInput::Choice(0),
            Some(ExerciseKind::Boolean { .. }) => ExerciseInput::Boolean(true),
            _ => ExerciseInput::Text(String::new()),
        }
    }

    /// The answer the current input denotes.
    #[must_use]
    pub fn current_answer(&self) -> Answer {
        match &self.input {
            ExerciseInput::Choice(i) => Answer::Choice(*i),
            ExerciseInput::Boolean(b) => Answer::Boolean(*b),
            ExerciseInput::Text(t) => Answer::Text(t.clone()),
        }
    }

    /// Record the current input on the answer sheet (replaced freely until
    /// submission freezes it).
    pub fn select_current(&mut self) {
        let answer = self.current_answer();
        self.answers.select(self.exercise_index, answer);
    }

    /// Move to a neighboring exercise. Navigating away clears the departed
    /// exercise's answer and feedback, so coming back is a fresh attempt.
    pub fn navigate_exercise(&mut self, delta: i32) -> bool {
        let count = self.element.exercises.len() as i32;
        let target = self.exercise_index as i32 + delta;
        if target < 0 || target >= count {
            return false;
        }
        self.answers.clear(self.exercise_index);
        self.feedback.remove(&self.exercise_index);
        if self.awaiting == Some(self.exercise_index) {
            self.awaiting = None;
        }
        self.exercise_index = target as usize;
        self.input = self.fresh_input(self.exercise_index);
        true
    }

    /// Freeze the current answer for grading. Returns the frozen answer
    /// when a grading call should be spawned.
    pub fn submit_current(&mut self) -> Option<Answer> {
        if self.awaiting.is_some() || self.feedback.contains_key(&self.exercise_index) {
            return None;
        }
        self.select_current();
        let frozen = self.answers.submit(self.exercise_index)?;
        self.awaiting = Some(self.exercise_index);
        Some(frozen)
    }

    /// Store a grading result delivered by the evaluator task.
    pub fn apply_evaluation(&mut self, index: usize, result: EvaluationResult) -> bool {
        if self.awaiting == Some(index) {
            self.awaiting = None;
        }
        // A result for a cleared (navigated-away) attempt is dropped.
        if !self.answers.is_submitted(index) {
            return false;
        }
        self.feedback.insert(index, result);
        true
    }

    /// Feedback for the exercise currently shown.
    #[must_use]
    pub fn current_feedback(&self) -> Option<&EvaluationResult> {
        self.feedback.get(&self.exercise_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use narrator_core::{Catalog, EvaluationSource, Exercise, Technology};
    use pretty_assertions::assert_eq;

    fn element_with_exercises() -> Element {
        Element {
            name: "flex".into(),
            exercises: vec![
                Exercise {
                    question: "Pick".into(),
                    kind: ExerciseKind::Choice {
                        options: vec!["a".into(), "b".into()],
                        correct_index: 1,
                    },
                    explanation: "b".into(),
                },
                Exercise {
                    question: "True?".into(),
                    kind: ExerciseKind::Boolean { answer: true },
                    explanation: "yes".into(),
                },
            ],
            ..Element::default()
        }
    }

    fn open_lesson() -> LessonState {
        LessonState::open(
            "flex",
            &element_with_exercises(),
            SequencerTiming::default(),
            Instant::now(),
        )
    }

    fn result(correct: bool) -> EvaluationResult {
        EvaluationResult {
            is_correct: correct,
            explanation: "x".into(),
            source: EvaluationSource::Local,
        }
    }

    #[test]
    fn test_browse_refresh_lists_all_when_query_empty() {
        let catalog = Catalog::from_entries(
            Technology::Css,
            [
                ("flex".to_string(), Element::default()),
                ("grid".to_string(), Element::default()),
            ],
        );
        let mut browse = BrowseState::default();
        browse.refresh(&catalog);
        assert_eq!(browse.results, vec!["flex", "grid"]);
    }

    #[test]
    fn test_browse_selection_clamps() {
        let mut browse = BrowseState {
            results: vec!["a".into(), "b".into()],
            ..BrowseState::default()
        };
        browse.move_selection(5);
        assert_eq!(browse.selected, 1);
        browse.move_selection(-9);
        assert_eq!(browse.selected, 0);
    }

    #[test]
    fn test_submit_freezes_and_awaits() {
        let mut lesson = open_lesson();
        lesson.input = ExerciseInput::Choice(1);

        let frozen = lesson.submit_current().unwrap();
        assert_eq!(frozen, Answer::Choice(1));
        assert_eq!(lesson.awaiting, Some(0));

        // A second submit while waiting is rejected.
        assert!(lesson.submit_current().is_none());

        assert!(lesson.apply_evaluation(0, result(true)));
        assert!(lesson.current_feedback().unwrap().is_correct);
        assert!(lesson.submit_current().is_none());
    }

    #[test]
    fn test_navigation_clears_departed_attempt() {
        let mut lesson = open_lesson();
        lesson.input = ExerciseInput::Choice(0);
        lesson.submit_current().unwrap();
        lesson.apply_evaluation(0, result(false));

        assert!(lesson.navigate_exercise(1));
        assert_eq!(lesson.exercise_index, 1);
        assert_eq!(lesson.input, ExerciseInput::Boolean(true));

        // Coming back: the earlier attempt is gone.
        assert!(lesson.navigate_exercise(-1));
        assert!(lesson.current_feedback().is_none());
        assert!(!lesson.answers.is_submitted(0));
        assert!(lesson.submit_current().is_some());
    }

    #[test]
    fn test_navigation_stops_at_ends() {
        let mut lesson = open_lesson();
        assert!(!lesson.navigate_exercise(-1));
        assert!(lesson.navigate_exercise(1));
        assert!(!lesson.navigate_exercise(1));
    }

    #[test]
    fn test_late_result_for_cleared_attempt_is_dropped() {
        let mut lesson = open_lesson();
        lesson.input = ExerciseInput::Choice(0);
        lesson.submit_current().unwrap();

        // User navigates away before the grader answers.
        lesson.navigate_exercise(1);
        assert!(!lesson.apply_evaluation(0, result(true)));
        lesson.navigate_exercise(-1);
        assert!(lesson.current_feedback().is_none());
    }
}
