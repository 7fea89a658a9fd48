//! Chaos Tests for Playback Control Resilience
//!
//! These tests hammer the sequencer with rapid control sequences - the
//! exact conditions that made the reference behavior's stale timer
//! callbacks fire into a newer step. Every entry point must cancel all
//! pending timers before touching state, so no interleaving of pause,
//! resume, seek, and restart may ever let an old phase leak forward.

use std::time::{Duration, Instant};

use narrator_core::catalog::{ContentStep, VisualDemo};
use narrator_core::sequencer::{PlaybackStatus, Sequencer, SequencerTiming, StepPhase};
use narrator_core::timer::TimerRegistry;

fn fast_timing() -> SequencerTiming {
    SequencerTiming {
        title_delay: Duration::from_millis(8),
        visual_hold: Duration::from_millis(20),
        skip_delay: Duration::from_millis(2),
        transition_delay: Duration::from_millis(6),
        text_tick: Duration::from_millis(1),
        code_tick: Duration::from_millis(2),
    }
}

fn three_steps() -> Vec<ContentStep> {
    (0..3)
        .map(|i| ContentStep {
            title: Some(format!("Step {i}")),
            text: Some(format!("body text {i}")),
            code: Some(format!("let s{i} = {i};")),
            visual_demo: Some(VisualDemo {
                content: format!("<demo {i}>"),
            }),
        })
        .collect()
}

/// The view must always be internally consistent, whatever was done to the
/// sequencer.
fn assert_consistent(seq: &Sequencer) {
    let view = seq.view();
    assert!(view.current_step <= seq.step_count());
    if let Some(step_text) = three_steps()
        .get(view.current_step)
        .and_then(|s| s.text.clone())
    {
        assert!(
            step_text.starts_with(view.typed_text.as_str()),
            "typed text {:?} is not a prefix of the step text",
            view.typed_text
        );
    }
    match seq.status() {
        PlaybackStatus::Paused | PlaybackStatus::Exercises | PlaybackStatus::Finished => {
            assert_eq!(seq.pending_timers(), 0, "halted states must hold no timers");
        }
        PlaybackStatus::Playing => {
            assert!(seq.pending_timers() > 0, "playing requires a pending timer");
        }
        PlaybackStatus::Idle => {}
    }
}

#[test]
fn chaos_rapid_pause_resume_never_leaks_a_phase() {
    let mut seq = Sequencer::new(three_steps(), false).with_timing(fast_timing());
    let start = Instant::now();
    seq.start(start);

    let mut now = start;
    for i in 0..500 {
        now += Duration::from_millis(1);
        seq.tick(now);

        match i % 7 {
            0 => seq.pause(),
            1 => seq.resume(now),
            _ => {}
        }
        assert_consistent(&seq);

        // A paused sequencer must stay frozen however long the clock runs.
        if seq.is_paused() {
            let frozen = seq.view().clone();
            seq.tick(now + Duration::from_secs(5));
            assert_eq!(seq.view().typed_text, frozen.typed_text);
            assert_eq!(seq.view().current_step, frozen.current_step);
        }
    }
}

#[test]
fn chaos_seek_storm_leaves_no_timers() {
    let mut seq = Sequencer::new(three_steps(), true).with_timing(fast_timing());
    let start = Instant::now();
    seq.start(start);

    let mut now = start;
    for i in 0..200 {
        now += Duration::from_millis(3);
        seq.tick(now);
        seq.seek(i % 4); // 3 steps + the exercise index
        assert_eq!(seq.pending_timers(), 0);
        assert_consistent(&seq);
    }
}

#[test]
fn chaos_interleaved_controls_converge() {
    let mut seq = Sequencer::new(three_steps(), true).with_timing(fast_timing());
    let start = Instant::now();
    seq.start(start);

    // A fixed torture schedule of every control in quick succession.
    let mut now = start;
    for i in 0..300 {
        now += Duration::from_millis(2);
        seq.tick(now);
        match i % 11 {
            0 => seq.pause(),
            1 => seq.resume(now),
            2 => seq.seek(2),
            3 => seq.restart(now),
            4 => seq.seek(3),
            5 => seq.resume(now),
            _ => {}
        }
        assert_consistent(&seq);
    }

    // After the storm, playback still runs to completion.
    seq.restart(now);
    while seq.status() == PlaybackStatus::Playing {
        now += Duration::from_millis(1);
        seq.tick(now);
        assert_consistent(&seq);
    }
    assert_eq!(seq.status(), PlaybackStatus::Exercises);
    assert_eq!(seq.view().current_step, 3);
}

#[test]
fn chaos_stale_tick_after_restart_does_not_mutate_new_step() {
    let mut seq = Sequencer::new(three_steps(), false).with_timing(fast_timing());
    let start = Instant::now();
    seq.start(start);

    // Type halfway into step 0's text.
    let mut now = start;
    while seq.view().typed_text.len() < 4 {
        now += Duration::from_millis(1);
        seq.tick(now);
    }

    // Jump ahead, then restart. Whatever deadlines existed before must be
    // gone: the very next tick may only affect step 0's title phase.
    seq.seek(2);
    seq.restart(now);
    assert_eq!(seq.view().current_step, 0);
    assert_eq!(seq.view().typed_text, "");

    seq.tick(now + Duration::from_millis(1));
    assert_eq!(seq.current_phase(), Some(StepPhase::Title));
    assert_eq!(seq.view().typed_text, "");
}

#[test]
fn chaos_cancel_all_twice_is_safe() {
    let now = Instant::now();
    let mut timers: TimerRegistry<u32> = TimerRegistry::new();
    for i in 0..16 {
        timers.schedule_once(now, Duration::from_millis(u64::from(i)), i);
        timers.schedule_repeating(now, Duration::from_millis(u64::from(i) + 1), 100 + i);
    }

    timers.cancel_all();
    assert_eq!(timers.pending(), 0);
    timers.cancel_all();
    assert_eq!(timers.pending(), 0);
    assert!(timers.fire_due(now + Duration::from_secs(60)).is_empty());
}
