//! Narrator Core - Headless Narration Engine for praxis
//!
//! This crate provides the narration logic for praxis, completely
//! independent of any UI framework. It can drive a TUI, web UI, native
//! GUI, or run headless for testing/automation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       UI Surfaces                            │
//! │   ┌─────────┐   ┌─────────┐   ┌──────────────────────────┐  │
//! │   │   TUI   │   │   Web   │   │   Headless (tests)       │  │
//! │   │(ratatui)│   │         │   │                          │  │
//! │   └────┬────┘   └────┬────┘   └────────────┬─────────────┘  │
//! │        └─────────────┴─────────────────────┘                │
//! │               tick(now) / controls (down)                   │
//! │               NarrativeState view (up)                      │
//! └──────────────────────────┬───────────────────────────────────┘
//!                            │
//! ┌──────────────────────────┼───────────────────────────────────┐
//! │                    NARRATOR CORE                             │
//! │  ┌───────────────────────┴────────────────────────────────┐  │
//! │  │                     Sequencer                          │  │
//! │  │  ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌────────┐  │  │
//! │  │  │  Timer   │  │  Typing  │  │ Catalog  │  │ Grader │  │  │
//! │  │  │ Registry │  │  Effect  │  │  Store   │  │ (HTTP) │  │  │
//! │  │  └──────────┘  └──────────┘  └──────────┘  └────────┘  │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Sequencer`]: the narrative step sequencer driving each lesson
//! - [`NarrativeState`]: the display state surfaces render
//! - [`CatalogStore`]: lifetime-scoped cache over the content directory
//! - [`Evaluator`]: grades exercise answers, deferring debugging exercises
//!   to the external collaborator with a fallback path
//! - [`search`](search::search): relevance search over a catalog
//! - [`Preferences`]: the only persisted state (theme + recent searches)
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Instant;
//! use narrator_core::{CatalogStore, Sequencer, Technology};
//!
//! let mut store = CatalogStore::new("content");
//! let catalog = store.load(Technology::Css).unwrap();
//! let element = catalog.get("flex").unwrap();
//!
//! let mut sequencer = Sequencer::for_element(element);
//! sequencer.start(Instant::now());
//! loop {
//!     // Each frame: fire due timers, then render sequencer.view().
//!     if sequencer.tick(Instant::now()) {
//!         // redraw
//!     }
//!     # break;
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`catalog`]: content records and per-technology catalog loading
//! - [`timer`]: group-cancelable deadline timers
//! - [`typing`]: character-by-character reveal
//! - [`sequencer`]: the five-phase step state machine
//! - [`exercise`]: exercise records and the answer sheet
//! - [`evaluate`]: answer grading with the collaborator fallback path
//! - [`grader`]: external grading collaborator client
//! - [`search`]: relevance search
//! - [`prefs`]: persisted preferences
//! - [`config`]: file + environment configuration
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework. It's pure narration logic that can be used anywhere.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod evaluate;
pub mod exercise;
pub mod grader;
pub mod prefs;
pub mod search;
pub mod sequencer;
pub mod timer;
pub mod typing;

// Re-exports for convenience
pub use catalog::{
    Attribute, Catalog, CatalogError, CatalogStore, CodeExample, ContentStep, Element, Technology,
    VisualDemo,
};
pub use config::{ConfigError, NarratorConfig};
pub use evaluate::{EvaluationResult, EvaluationSource, Evaluator, DEFAULT_GRADING_TIMEOUT};
pub use exercise::{Answer, AnswerSheet, Exercise, ExerciseKind};
pub use grader::{GradeRequest, GradeVerdict, GraderConfig, GradingBackend, HttpGrader};
pub use prefs::{Preferences, PreferencesError, ThemeChoice, MAX_RECENT_SEARCHES};
pub use search::{search, SearchHit, DEFAULT_LIMIT};
pub use sequencer::{
    NarrativeState, PlaybackStatus, Sequencer, SequencerTiming, StepPhase, EXERCISE_INTRO,
};
pub use timer::{TimerHandle, TimerRegistry};
pub use typing::TypingEffect;
