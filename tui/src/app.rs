//! Main Application
//!
//! The App owns the TUI lifecycle as a thin client over the narrator core:
//! - Event loop (keyboard, resize) via crossterm's async stream
//! - Sequencer ticking with deadline-aware sleep budgeting
//! - Grading calls spawned off the loop, results delivered over a channel
//!
//! The App converts terminal events into sequencer controls and answer
//! sheet updates; screens render what the core reports. No narration or
//! grading decisions are made here.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Terminal;
use tokio::sync::mpsc;

use narrator_core::{
    CatalogStore, EvaluationResult, Evaluator, ExerciseKind, GradingBackend, HttpGrader,
    NarratorConfig, Preferences, Technology,
};

use crate::display::{BrowseState, ExerciseInput, LessonState, Screen};
use crate::screens;
use crate::theme::Theme;

/// Shortest sleep between event-loop wakeups (~60fps cap).
const MIN_TICK: Duration = Duration::from_millis(16);

/// Longest sleep when nothing is animating.
const MAX_TICK: Duration = Duration::from_millis(250);

/// Outcome of one event-loop select.
enum LoopSignal {
    /// A terminal event arrived.
    Terminal(Event),
    /// The terminal event stream ended or failed.
    StreamClosed,
    /// A grading task delivered a result.
    Evaluation(usize, EvaluationResult),
    /// The sleep budget elapsed.
    Timeout,
}

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// Catalog cache over the content directory.
    store: CatalogStore,
    /// Technology being browsed.
    technology: Technology,
    /// Playback timing from config.
    timing: narrator_core::SequencerTiming,

    // === Preferences ===
    /// Persisted preferences (theme + recent searches).
    prefs: Preferences,
    /// Where preferences are saved, if anywhere.
    prefs_path: Option<PathBuf>,
    /// Active palette.
    theme: Theme,

    // === Screens ===
    /// Which screen is showing.
    screen: Screen,
    /// Browse screen state.
    browse: BrowseState,
    /// Open lesson, if any.
    lesson: Option<LessonState>,
    /// Error banner for the browse screen.
    banner: Option<String>,

    // === Grading ===
    /// Evaluator shared with spawned grading tasks.
    evaluator: Evaluator,
    /// Sender handed to grading tasks.
    eval_tx: mpsc::Sender<(usize, EvaluationResult)>,
    /// Receiver drained by the event loop.
    eval_rx: mpsc::Receiver<(usize, EvaluationResult)>,
}

impl App {
    /// Create the app: load preferences and the technology's catalog, and
    /// wire up the evaluator.
    pub fn new(
        config: &NarratorConfig,
        technology: Technology,
        prefs: Preferences,
        prefs_path: Option<PathBuf>,
    ) -> Self {
        let mut store = CatalogStore::new(&config.content_dir);
        let banner = match store.load(technology) {
            Ok(_) => None,
            Err(error) => {
                tracing::error!(%error, "catalog load failed");
                Some(format!("{error}"))
            }
        };

        let mut evaluator = Evaluator::new();
        if let Some(grader_config) = &config.grader {
            let grader: Arc<dyn GradingBackend> =
                Arc::new(HttpGrader::from_config(grader_config));
            evaluator = evaluator
                .with_grader(grader)
                .with_timeout(Duration::from_secs(grader_config.timeout_secs));
        }

        let theme = Theme::from_choice(prefs.theme);
        let (eval_tx, eval_rx) = mpsc::channel(8);

        let mut app = Self {
            running: true,
            store,
            technology,
            timing: config.timing.clone(),
            prefs,
            prefs_path,
            theme,
            screen: Screen::Browse,
            browse: BrowseState::default(),
            lesson: None,
            banner,
            evaluator,
            eval_tx,
            eval_rx,
        };
        app.refresh_results();
        app
    }

    /// Open the lesson for an element id immediately (CLI `--element`).
    pub fn open_element(&mut self, id: &str) {
        let Some(element) = self.store.get(self.technology).and_then(|c| c.get(id)) else {
            self.banner = Some(format!("unknown element: {id}"));
            return;
        };
        self.lesson = Some(LessonState::open(
            id,
            element,
            self.timing.clone(),
            Instant::now(),
        ));
        self.screen = Screen::Lesson;
    }

    /// Run the event loop until quit.
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut events = EventStream::new();
        let mut redraw = true;

        while self.running {
            if redraw {
                terminal.draw(|frame| self.render(frame))?;
                redraw = false;
            }

            // Resolve the select into a plain signal first; handlers below
            // need exclusive access to self.
            let budget = self.tick_budget();
            let signal = tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(event)) => LoopSignal::Terminal(event),
                    Some(Err(error)) => {
                        tracing::error!(%error, "terminal event stream failed");
                        LoopSignal::StreamClosed
                    }
                    None => LoopSignal::StreamClosed,
                },
                received = self.eval_rx.recv() => match received {
                    Some((index, result)) => LoopSignal::Evaluation(index, result),
                    None => LoopSignal::Timeout,
                },
                () = tokio::time::sleep(budget) => LoopSignal::Timeout,
            };

            match signal {
                LoopSignal::Terminal(event) => redraw |= self.handle_terminal_event(&event),
                LoopSignal::StreamClosed => self.running = false,
                LoopSignal::Evaluation(index, result) => {
                    if let Some(lesson) = &mut self.lesson {
                        redraw |= lesson.apply_evaluation(index, result);
                    }
                }
                LoopSignal::Timeout => {}
            }

            if let Some(lesson) = &mut self.lesson {
                redraw |= lesson.sequencer.tick(Instant::now());
            }
        }

        // Leaving the loop tears the lesson down; cancel its timers first.
        if let Some(lesson) = &mut self.lesson {
            lesson.sequencer.pause();
        }
        Ok(())
    }

    /// How long the loop may sleep before the next pending deadline.
    fn tick_budget(&self) -> Duration {
        match self.lesson.as_ref().and_then(|l| l.sequencer.next_deadline()) {
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .clamp(MIN_TICK, MAX_TICK),
            None => MAX_TICK,
        }
    }

    fn render(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        frame.render_widget(
            Block::default().style(Style::default().bg(self.theme.background)),
            area,
        );
        match self.screen {
            Screen::Browse => screens::browse::render(
                frame,
                area,
                &self.theme,
                self.technology,
                self.store.get(self.technology),
                &self.browse,
                &self.prefs.recent_searches,
                self.banner.as_deref(),
            ),
            Screen::Lesson => {
                if let Some(lesson) = &self.lesson {
                    screens::lesson::render(frame, area, &self.theme, lesson);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Event handling
    // ------------------------------------------------------------------

    fn handle_terminal_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(*key),
            Event::Resize(..) => true,
            _ => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Global bindings first.
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => {
                    self.running = false;
                    return true;
                }
                KeyCode::Char('t') => {
                    let choice = self.prefs.toggle_theme();
                    self.theme = Theme::from_choice(choice);
                    self.save_prefs();
                    return true;
                }
                _ => {}
            }
        }

        match self.screen {
            Screen::Browse => self.handle_browse_key(key),
            Screen::Lesson => self.handle_lesson_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.running = false;
                true
            }
            KeyCode::Up => {
                self.browse.move_selection(-1);
                true
            }
            KeyCode::Down => {
                self.browse.move_selection(1);
                true
            }
            KeyCode::Enter => {
                self.open_selected();
                true
            }
            KeyCode::Backspace => {
                self.browse.query.pop();
                self.refresh_results();
                true
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.browse.query.push(c);
                self.refresh_results();
                true
            }
            _ => false,
        }
    }

    fn handle_lesson_key(&mut self, key: KeyEvent) -> bool {
        let Some(lesson) = &mut self.lesson else {
            self.screen = Screen::Browse;
            return true;
        };

        if key.code == KeyCode::Esc {
            self.close_lesson();
            return true;
        }

        if lesson.sequencer.view().exercise_mode {
            Self::handle_exercise_key(
                lesson,
                key,
                &self.evaluator,
                self.technology,
                &self.eval_tx,
            )
        } else {
            Self::handle_narration_key(lesson, key)
        }
    }

    fn handle_narration_key(lesson: &mut LessonState, key: KeyEvent) -> bool {
        let now = Instant::now();
        match key.code {
            KeyCode::Char(' ') => {
                if lesson.sequencer.is_paused() {
                    lesson.sequencer.resume(now);
                } else {
                    lesson.sequencer.pause();
                }
                true
            }
            KeyCode::Left => {
                let current = lesson.sequencer.view().current_step;
                lesson.sequencer.seek(current.saturating_sub(1));
                true
            }
            KeyCode::Right => {
                let current = lesson.sequencer.view().current_step;
                lesson.sequencer.seek(current + 1);
                true
            }
            KeyCode::Char('r') => {
                lesson.sequencer.restart(now);
                true
            }
            _ => false,
        }
    }

    fn handle_exercise_key(
        lesson: &mut LessonState,
        key: KeyEvent,
        evaluator: &Evaluator,
        technology: Technology,
        eval_tx: &mpsc::Sender<(usize, EvaluationResult)>,
    ) -> bool {
        match key.code {
            KeyCode::Left => {
                if !lesson.navigate_exercise(-1) {
                    // Before the first exercise: back into the narration.
                    let steps = lesson.sequencer.step_count();
                    if steps > 0 {
                        lesson.sequencer.seek(steps - 1);
                    }
                }
                true
            }
            KeyCode::Right => lesson.navigate_exercise(1),
            KeyCode::Up | KeyCode::Down => {
                let option_count = lesson.current_exercise().map_or(0, |e| match &e.kind {
                    ExerciseKind::Choice { options, .. } => options.len(),
                    _ => 0,
                });
                match &mut lesson.input {
                    ExerciseInput::Choice(cursor) => {
                        if option_count == 0 {
                            return false;
                        }
                        *cursor = if key.code == KeyCode::Up {
                            cursor.saturating_sub(1)
                        } else {
                            (*cursor + 1).min(option_count - 1)
                        };
                    }
                    ExerciseInput::Boolean(cursor) => *cursor = !*cursor,
                    ExerciseInput::Text(_) => return false,
                }
                lesson.select_current();
                true
            }
            KeyCode::Backspace => {
                if let ExerciseInput::Text(entry) = &mut lesson.input {
                    entry.pop();
                    lesson.select_current();
                    true
                } else {
                    false
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let ExerciseInput::Text(entry) = &mut lesson.input {
                    entry.push(c);
                    lesson.select_current();
                    true
                } else {
                    false
                }
            }
            KeyCode::Enter => {
                let Some(answer) = lesson.submit_current() else {
                    return false;
                };
                let Some(exercise) = lesson.current_exercise().cloned() else {
                    return false;
                };
                let index = lesson.exercise_index;
                let evaluator = evaluator.clone();
                let tx = eval_tx.clone();
                tokio::spawn(async move {
                    let result = evaluator.evaluate(&exercise, &answer, technology).await;
                    let _ = tx.send((index, result)).await;
                });
                true
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    fn refresh_results(&mut self) {
        if let Some(catalog) = self.store.get(self.technology) {
            self.browse.refresh(catalog);
        }
    }

    fn open_selected(&mut self) {
        let Some(id) = self.browse.selected_id().map(String::from) else {
            return;
        };
        if !self.browse.query.trim().is_empty() {
            self.prefs.push_recent_search(&self.browse.query);
            self.save_prefs();
        }
        self.open_element(&id);
    }

    fn close_lesson(&mut self) {
        // Cancel every outstanding timer before the lesson is dropped.
        if let Some(lesson) = &mut self.lesson {
            lesson.sequencer.pause();
        }
        self.lesson = None;
        self.screen = Screen::Browse;
    }

    fn save_prefs(&self) {
        let Some(path) = &self.prefs_path else {
            return;
        };
        if let Err(error) = self.prefs.save(path) {
            tracing::warn!(%error, "failed to save preferences");
        }
    }
}
