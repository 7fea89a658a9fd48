//! Lesson Playback Screen
//!
//! Renders the narration panels the sequencer has revealed so far: step
//! title, typed body text, typed code, and the visual demo. Falls through
//! to the exercise screen once the sequencer enters exercise mode.

use narrator_core::{PlaybackStatus, StepPhase};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::display::LessonState;
use crate::screens::exercises;
use crate::theme::Theme;
use crate::widgets::{TextBlock, TextBlockState};

/// Render the lesson screen (narration or exercises).
pub fn render(frame: &mut Frame, area: Rect, theme: &Theme, lesson: &LessonState) {
    if lesson.sequencer.view().exercise_mode {
        exercises::render(frame, area, theme, lesson);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(2), // title
            Constraint::Min(3),    // body text
            Constraint::Length(7), // code
            Constraint::Length(5), // visual demo
            Constraint::Length(1), // status + hints
        ])
        .split(area);

    render_header(frame, rows[0], theme, lesson);
    render_title(frame, rows[1], theme, lesson);
    render_text(frame, rows[2], theme, lesson);
    render_code(frame, rows[3], theme, lesson);
    render_visual(frame, rows[4], theme, lesson);
    render_status(frame, rows[5], theme, lesson);
}

fn render_header(frame: &mut Frame, area: Rect, theme: &Theme, lesson: &LessonState) {
    let view = lesson.sequencer.view();
    let steps = lesson.sequencer.step_count();
    let step_label = if steps == 0 {
        String::new()
    } else {
        format!(
            "step {}/{}",
            (view.current_step + 1).min(steps),
            steps
        )
    };
    let header = Line::from(vec![
        Span::styled(
            format!(" {} ", lesson.element.name),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(step_label, Style::default().fg(theme.dim)),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn render_title(frame: &mut Frame, area: Rect, theme: &Theme, lesson: &LessonState) {
    let view = lesson.sequencer.view();
    if !view.show_title {
        return;
    }
    let title = lesson
        .element
        .steps
        .get(view.current_step)
        .and_then(|s| s.title.as_deref())
        .unwrap_or_default();
    let line = Line::from(Span::styled(
        title,
        Style::default()
            .fg(theme.foreground)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_text(frame: &mut Frame, area: Rect, theme: &Theme, lesson: &LessonState) {
    let view = lesson.sequencer.view();
    if !view.show_text {
        return;
    }
    let typing = lesson.sequencer.current_phase() == Some(StepPhase::Text);
    let mut state = TextBlockState::default();
    frame.render_stateful_widget(
        TextBlock::new(&view.typed_text)
            .style(Style::default().fg(theme.foreground))
            .typing(typing),
        area,
        &mut state,
    );
}

fn render_code(frame: &mut Frame, area: Rect, theme: &Theme, lesson: &LessonState) {
    let view = lesson.sequencer.view();
    if !view.show_code {
        return;
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(" code ", Style::default().fg(theme.dim)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let typing = lesson.sequencer.current_phase() == Some(StepPhase::Code);
    let mut state = TextBlockState::default();
    frame.render_stateful_widget(
        TextBlock::new(&view.typed_code)
            .style(Style::default().fg(theme.code))
            .typing(typing),
        inner,
        &mut state,
    );
}

fn render_visual(frame: &mut Frame, area: Rect, theme: &Theme, lesson: &LessonState) {
    let view = lesson.sequencer.view();
    if !view.show_visual {
        return;
    }
    let Some(demo) = lesson
        .element
        .steps
        .get(view.current_step)
        .and_then(|s| s.visual_demo.as_ref())
    else {
        return;
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(" demo ", Style::default().fg(theme.dim)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut state = TextBlockState::default();
    frame.render_stateful_widget(
        TextBlock::new(&demo.content).style(Style::default().fg(theme.visual)),
        inner,
        &mut state,
    );
}

fn render_status(frame: &mut Frame, area: Rect, theme: &Theme, lesson: &LessonState) {
    let status = match lesson.sequencer.status() {
        PlaybackStatus::Paused => "paused",
        PlaybackStatus::Playing => "playing",
        PlaybackStatus::Finished => "finished",
        PlaybackStatus::Exercises => "exercises",
        PlaybackStatus::Idle => "ready",
    };
    let line = Line::from(vec![
        Span::styled(format!(" {status} "), Style::default().fg(theme.accent)),
        Span::styled(
            "· Space pause/resume · \u{2190}/\u{2192} seek · r restart · Esc back",
            Style::default().fg(theme.dim),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
