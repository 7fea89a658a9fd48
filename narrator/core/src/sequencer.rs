//! Narrative Step Sequencer
//!
//! Drives the five-phase reveal of each content step (Title, Text, Code,
//! Visual, Transition), advances through the steps on timers, and hands off
//! to the exercise phase after the last step. Supports pause/resume, manual
//! seek, and restart.
//!
//! # Design
//!
//! The sequencer is single-threaded and poll-driven: the surface calls
//! [`Sequencer::tick`] with the current `Instant` each frame, the same way
//! the event loop drives a frame animator. No two phases ever run
//! concurrently; a phase's only suspension point is the timer it scheduled.
//!
//! Every state-transition entry point (`start`, `pause`, `resume`, `seek`,
//! `restart`, internal phase changes) cancels all pending timers before
//! touching state. A stale timer from a previous step must never mutate
//! state after a newer one has started; this ordering is a correctness
//! requirement, not a cleanup nicety.
//!
//! Resuming restarts the current step's reveal from the Title phase rather
//! than continuing mid-character. That matches the reference behavior and
//! is deliberate; see DESIGN.md before "fixing" it.

use std::time::{Duration, Instant};

use crate::catalog::{ContentStep, Element};
use crate::timer::TimerRegistry;
use crate::typing::TypingEffect;

/// Fixed message shown when the exercise phase begins.
pub const EXERCISE_INTRO: &str =
    "That's the walkthrough! Try the exercises below to check your understanding.";

/// The five micro-phases of one step's reveal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepPhase {
    /// Heading reveal.
    Title,
    /// Body text typing.
    Text,
    /// Code snippet typing.
    Code,
    /// Visual demo hold.
    Visual,
    /// Gap before the next step.
    Transition,
}

/// Coarse playback state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// Created but not started.
    Idle,
    /// Advancing through step phases on timers.
    Playing,
    /// All timers canceled; resume restarts the current step.
    Paused,
    /// Past the last step, exercises available.
    Exercises,
    /// Past the last step, no exercises.
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TypingChannel {
    Text,
    Code,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerEvent {
    /// The current phase's delay elapsed.
    PhaseElapsed(StepPhase),
    /// Reveal one more character on a channel.
    TypingTick(TypingChannel),
}

/// Timing knobs for playback.
#[derive(Clone, Debug)]
pub struct SequencerTiming {
    /// Title reveal hold before body text starts.
    pub title_delay: Duration,
    /// Visual demo hold (longer, so a demo registers).
    pub visual_hold: Duration,
    /// Consumed by an absent title/text/code/visual instead of zero, to
    /// avoid discontinuous jumps.
    pub skip_delay: Duration,
    /// Gap between steps.
    pub transition_delay: Duration,
    /// Per-character cadence for body text.
    pub text_tick: Duration,
    /// Per-character cadence for code (slower than text).
    pub code_tick: Duration,
}

impl Default for SequencerTiming {
    fn default() -> Self {
        Self {
            title_delay: Duration::from_millis(800),
            visual_hold: Duration::from_millis(2000),
            skip_delay: Duration::from_millis(40),
            transition_delay: Duration::from_millis(600),
            text_tick: Duration::from_millis(18),
            code_tick: Duration::from_millis(32),
        }
    }
}

/// Display state owned by the sequencer. Surfaces render this; nothing else
/// mutates it.
#[derive(Clone, Debug, Default)]
pub struct NarrativeState {
    /// Current step index; equals the step count in the exercise phase.
    pub current_step: usize,
    /// Whether the step title is revealed.
    pub show_title: bool,
    /// Whether the body text panel is revealed.
    pub show_text: bool,
    /// Whether the code panel is revealed.
    pub show_code: bool,
    /// Whether the visual demo panel is revealed.
    pub show_visual: bool,
    /// Body text revealed so far; grows monotonically within a step.
    pub typed_text: String,
    /// Code revealed so far; grows monotonically within a step.
    pub typed_code: String,
    /// Whether the trailing exercise phase is active.
    pub exercise_mode: bool,
    /// Introductory message for the exercise phase.
    pub exercise_intro: Option<String>,
}

/// The narrative step sequencer.
pub struct Sequencer {
    steps: Vec<ContentStep>,
    has_exercises: bool,
    timing: SequencerTiming,
    status: PlaybackStatus,
    phase: Option<StepPhase>,
    state: NarrativeState,
    timers: TimerRegistry<TimerEvent>,
    text_fx: Option<TypingEffect>,
    code_fx: Option<TypingEffect>,
}

impl Sequencer {
    /// Create a sequencer over a step list.
    #[must_use]
    pub fn new(steps: Vec<ContentStep>, has_exercises: bool) -> Self {
        Self {
            steps,
            has_exercises,
            timing: SequencerTiming::default(),
            status: PlaybackStatus::Idle,
            phase: None,
            state: NarrativeState::default(),
            timers: TimerRegistry::new(),
            text_fx: None,
            code_fx: None,
        }
    }

    /// Create a sequencer for an element's narration.
    #[must_use]
    pub fn for_element(element: &Element) -> Self {
        Self::new(element.steps.clone(), !element.exercises.is_empty())
    }

    /// Override the timing knobs.
    #[must_use]
    pub fn with_timing(mut self, timing: SequencerTiming) -> Self {
        self.timing = timing;
        self
    }

    // ------------------------------------------------------------------
    // Playback controls
    // ------------------------------------------------------------------

    /// Begin playback from step 0. With no steps at all, lands directly in
    /// the exercise phase (or Finished when there are no exercises either).
    pub fn start(&mut self, now: Instant) {
        self.timers.cancel_all();
        self.state = NarrativeState::default();
        self.phase = None;
        self.text_fx = None;
        self.code_fx = None;

        if self.steps.is_empty() {
            self.enter_epilogue();
        } else {
            self.status = PlaybackStatus::Playing;
            self.enter_step(0, now);
        }
    }

    /// Cancel all timers and halt. Idempotent; a no-op in the exercise and
    /// finished states, which hold no timers.
    pub fn pause(&mut self) {
        self.timers.cancel_all();
        if matches!(
            self.status,
            PlaybackStatus::Idle | PlaybackStatus::Playing | PlaybackStatus::Paused
        ) {
            self.status = PlaybackStatus::Paused;
        }
    }

    /// Resume from pause. Restarts the current step's reveal from the Title
    /// phase; never resumes mid-character. A no-op unless paused.
    pub fn resume(&mut self, now: Instant) {
        if self.status != PlaybackStatus::Paused {
            return;
        }
        if self.state.current_step >= self.steps.len() {
            self.enter_epilogue();
        } else {
            self.status = PlaybackStatus::Playing;
            self.enter_step(self.state.current_step, now);
        }
    }

    /// Jump to a step without animating: the target step is shown fully
    /// revealed and playback is left paused. Seeking to the index one past
    /// the last step enters the exercise phase. Out-of-range targets are
    /// ignored.
    pub fn seek(&mut self, index: usize) {
        if index > self.steps.len() {
            tracing::warn!(index, steps = self.steps.len(), "seek out of range");
            return;
        }
        self.timers.cancel_all();

        if index == self.steps.len() {
            self.enter_epilogue();
            return;
        }

        let step = &self.steps[index];
        self.state = NarrativeState {
            current_step: index,
            show_title: true,
            show_text: true,
            show_code: true,
            show_visual: true,
            typed_text: step.text.clone().unwrap_or_default(),
            typed_code: step.code.clone().unwrap_or_default(),
            exercise_mode: false,
            exercise_intro: None,
        };
        self.phase = None;
        self.text_fx = None;
        self.code_fx = None;
        self.status = PlaybackStatus::Paused;
    }

    /// Reset to initial state and start over from step 0.
    pub fn restart(&mut self, now: Instant) {
        self.start(now);
    }

    /// Fire due timers and apply their effects. Returns `true` when the
    /// display state changed. Call regularly with the current `Instant`.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.status != PlaybackStatus::Playing {
            return false;
        }
        let mut changed = false;
        for event in self.timers.fire_due(now) {
            changed |= self.handle_event(event, now);
            if self.status != PlaybackStatus::Playing {
                break;
            }
        }
        changed
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The display state to render.
    #[must_use]
    pub fn view(&self) -> &NarrativeState {
        &self.state
    }

    /// Coarse playback status.
    #[must_use]
    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// The active micro-phase while playing.
    #[must_use]
    pub fn current_phase(&self) -> Option<StepPhase> {
        self.phase
    }

    /// Number of content steps.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Whether exercises follow the last step.
    #[must_use]
    pub fn has_exercises(&self) -> bool {
        self.has_exercises
    }

    /// Whether playback is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.status == PlaybackStatus::Paused
    }

    /// Number of pending timers (introspection for surfaces and tests).
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Earliest pending deadline, for event-loop sleep budgeting.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    // ------------------------------------------------------------------
    // Phase machinery
    // ------------------------------------------------------------------

    fn enter_step(&mut self, index: usize, now: Instant) {
        self.timers.cancel_all();
        let step = &self.steps[index];

        self.state = NarrativeState {
            current_step: index,
            ..NarrativeState::default()
        };
        self.text_fx = None;
        self.code_fx = None;
        self.phase = Some(StepPhase::Title);
        tracing::debug!(step = index, "entering step");

        let delay = if step.title.is_some() {
            self.state.show_title = true;
            self.timing.title_delay
        } else {
            self.timing.skip_delay
        };
        self.timers
            .schedule_once(now, delay, TimerEvent::PhaseElapsed(StepPhase::Title));
    }

    fn begin_text(&mut self, now: Instant) {
        self.timers.cancel_all();
        self.phase = Some(StepPhase::Text);

        let text = self.steps[self.state.current_step]
            .text
            .clone()
            .unwrap_or_default();
        if text.is_empty() {
            self.timers.schedule_once(
                now,
                self.timing.skip_delay,
                TimerEvent::PhaseElapsed(StepPhase::Text),
            );
        } else {
            self.state.show_text = true;
            self.text_fx = Some(TypingEffect::new(text));
            self.timers.schedule_repeating(
                now,
                self.timing.text_tick,
                TimerEvent::TypingTick(TypingChannel::Text),
            );
        }
    }

    fn begin_code(&mut self, now: Instant) {
        self.timers.cancel_all();
        self.phase = Some(StepPhase::Code);

        let code = self.steps[self.state.current_step]
            .code
            .clone()
            .unwrap_or_default();
        if code.is_empty() {
            self.timers.schedule_once(
                now,
                self.timing.skip_delay,
                TimerEvent::PhaseElapsed(StepPhase::Code),
            );
        } else {
            self.state.show_code = true;
            self.code_fx = Some(TypingEffect::new(code));
            self.timers.schedule_repeating(
                now,
                self.timing.code_tick,
                TimerEvent::TypingTick(TypingChannel::Code),
            );
        }
    }

    fn begin_visual(&mut self, now: Instant) {
        self.timers.cancel_all();
        self.phase = Some(StepPhase::Visual);

        let delay = if self.steps[self.state.current_step].visual_demo.is_some() {
            self.state.show_visual = true;
            self.timing.visual_hold
        } else {
            self.timing.skip_delay
        };
        self.timers
            .schedule_once(now, delay, TimerEvent::PhaseElapsed(StepPhase::Visual));
    }

    fn begin_transition(&mut self, now: Instant) {
        self.timers.cancel_all();
        self.phase = Some(StepPhase::Transition);
        self.timers.schedule_once(
            now,
            self.timing.transition_delay,
            TimerEvent::PhaseElapsed(StepPhase::Transition),
        );
    }

    fn advance_step(&mut self, now: Instant) {
        let next = self.state.current_step + 1;
        if next < self.steps.len() {
            self.enter_step(next, now);
        } else {
            self.enter_epilogue();
        }
    }

    fn enter_epilogue(&mut self) {
        self.timers.cancel_all();
        self.phase = None;
        self.text_fx = None;
        self.code_fx = None;
        self.state.current_step = self.steps.len();
        if self.has_exercises {
            self.status = PlaybackStatus::Exercises;
            self.state.exercise_mode = true;
            self.state.exercise_intro = Some(EXERCISE_INTRO.to_string());
            tracing::debug!("entering exercise phase");
        } else {
            self.status = PlaybackStatus::Finished;
            tracing::debug!("narration finished");
        }
    }

    /// Apply one fired timer event. Events whose phase no longer matches
    /// (possible within a single drained batch after a phase change) are
    /// discarded unhandled.
    fn handle_event(&mut self, event: TimerEvent, now: Instant) -> bool {
        match event {
            TimerEvent::PhaseElapsed(phase) if self.phase == Some(phase) => {
                match phase {
                    StepPhase::Title => self.begin_text(now),
                    StepPhase::Text => self.begin_code(now),
                    StepPhase::Code => self.begin_visual(now),
                    StepPhase::Visual => self.begin_transition(now),
                    StepPhase::Transition => self.advance_step(now),
                }
                true
            }
            TimerEvent::TypingTick(TypingChannel::Text)
                if self.phase == Some(StepPhase::Text) =>
            {
                if let Some(fx) = &mut self.text_fx {
                    let done = fx.advance();
                    self.state.typed_text = fx.revealed().to_string();
                    if done {
                        self.begin_code(now);
                    }
                    true
                } else {
                    false
                }
            }
            TimerEvent::TypingTick(TypingChannel::Code)
                if self.phase == Some(StepPhase::Code) =>
            {
                if let Some(fx) = &mut self.code_fx {
                    let done = fx.advance();
                    self.state.typed_code = fx.revealed().to_string();
                    if done {
                        self.begin_visual(now);
                    }
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}
