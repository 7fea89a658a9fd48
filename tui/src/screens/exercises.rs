//! Exercise Screen
//!
//! Per-type answer inputs and grading feedback for the trailing exercise
//! phase. Fallback-graded results carry a reduced-confidence marker.

use narrator_core::{EvaluationResult, Exercise, ExerciseKind};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::display::{ExerciseInput, LessonState};
use crate::theme::Theme;

/// Render the exercise phase.
pub fn render(frame: &mut Frame, area: Rect, theme: &Theme, lesson: &LessonState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header + intro
            Constraint::Length(3), // question
            Constraint::Min(5),    // answer input
            Constraint::Length(5), // feedback
            Constraint::Length(1), // hints
        ])
        .split(area);

    render_header(frame, rows[0], theme, lesson);

    let Some(exercise) = lesson.current_exercise() else {
        let done = Paragraph::new("No exercises for this element.")
            .style(Style::default().fg(theme.dim));
        frame.render_widget(done, rows[1]);
        return;
    };

    render_question(frame, rows[1], theme, lesson, exercise);
    render_input(frame, rows[2], theme, lesson, exercise);
    render_feedback(frame, rows[3], theme, lesson);
    render_hints(frame, rows[4], theme, exercise);
}

fn render_header(frame: &mut Frame, area: Rect, theme: &Theme, lesson: &LessonState) {
    let intro = lesson
        .sequencer
        .view()
        .exercise_intro
        .as_deref()
        .unwrap_or_default();
    let lines = vec![
        Line::from(Span::styled(
            format!(" {} · exercises ", lesson.element.name),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(intro, Style::default().fg(theme.dim))),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_question(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    lesson: &LessonState,
    exercise: &Exercise,
) {
    let count = lesson.element.exercises.len();
    let label = format!(
        " {}/{} · {} ",
        lesson.exercise_index + 1,
        count,
        exercise.kind.label()
    );
    let question = Paragraph::new(exercise.question.as_str())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(theme.foreground))
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(theme.border))
                .title(Span::styled(label, Style::default().fg(theme.dim))),
        );
    frame.render_widget(question, area);
}

fn render_input(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    lesson: &LessonState,
    exercise: &Exercise,
) {
    match (&exercise.kind, &lesson.input) {
        (ExerciseKind::Choice { options, .. }, ExerciseInput::Choice(cursor)) => {
            let lines: Vec<Line> = options
                .iter()
                .enumerate()
                .map(|(i, option)| option_line(theme, option, i == *cursor))
                .collect();
            frame.render_widget(Paragraph::new(lines), area);
        }
        (ExerciseKind::Boolean { .. }, ExerciseInput::Boolean(cursor)) => {
            let lines = vec![
                option_line(theme, "true", *cursor),
                option_line(theme, "false", !*cursor),
            ];
            frame.render_widget(Paragraph::new(lines), area);
        }
        (ExerciseKind::Completion { code_template, .. }, ExerciseInput::Text(entry)) => {
            let mut lines = Vec::new();
            if let Some(template) = code_template {
                lines.push(Line::from(Span::styled(
                    template.clone(),
                    Style::default().fg(theme.code),
                )));
                lines.push(Line::default());
            }
            lines.push(entry_line(theme, entry));
            frame.render_widget(Paragraph::new(lines), area);
        }
        (ExerciseKind::Debugging { buggy_code, .. }, ExerciseInput::Text(entry)) => {
            let mut lines: Vec<Line> = buggy_code
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(theme.error))))
                .collect();
            lines.push(Line::default());
            lines.push(entry_line(theme, entry));
            frame.render_widget(Paragraph::new(lines), area);
        }
        // Input state out of sync with the exercise type; render nothing
        // rather than a wrong widget.
        _ => {}
    }
}

fn option_line<'a>(theme: &Theme, text: &'a str, selected: bool) -> Line<'a> {
    let marker = if selected { "(o) " } else { "( ) " };
    let style = if selected {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.foreground)
    };
    Line::from(vec![
        Span::styled(marker, Style::default().fg(theme.accent)),
        Span::styled(text, style),
    ])
}

fn entry_line<'a>(theme: &Theme, entry: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled("> ", Style::default().fg(theme.dim)),
        Span::styled(entry, Style::default().fg(theme.foreground)),
        Span::styled("\u{258c}", Style::default().fg(theme.accent)),
    ])
}

fn render_feedback(frame: &mut Frame, area: Rect, theme: &Theme, lesson: &LessonState) {
    if lesson.awaiting == Some(lesson.exercise_index) {
        let waiting =
            Paragraph::new("Grading...").style(Style::default().fg(theme.dim));
        frame.render_widget(waiting, area);
        return;
    }
    let Some(result) = lesson.current_feedback() else {
        return;
    };
    frame.render_widget(feedback_paragraph(theme, result), area);
}

fn feedback_paragraph<'a>(theme: &Theme, result: &'a EvaluationResult) -> Paragraph<'a> {
    let (verdict, color) = if result.is_correct {
        ("Correct!", theme.success)
    } else {
        ("Not quite.", theme.error)
    };
    let mut heading = vec![Span::styled(
        verdict,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    if result.source.is_best_effort() {
        heading.push(Span::styled(
            "  (best-effort: grader unavailable)",
            Style::default().fg(theme.fallback),
        ));
    }
    Paragraph::new(vec![
        Line::from(heading),
        Line::from(Span::styled(
            result.explanation.as_str(),
            Style::default().fg(theme.foreground),
        )),
    ])
    .wrap(Wrap { trim: true })
}

fn render_hints(frame: &mut Frame, area: Rect, theme: &Theme, exercise: &Exercise) {
    let input_hint = match exercise.kind {
        ExerciseKind::Choice { .. } | ExerciseKind::Boolean { .. } => "\u{2191}/\u{2193} select",
        ExerciseKind::Completion { .. } | ExerciseKind::Debugging { .. } => "type your answer",
    };
    let line = Line::from(Span::styled(
        format!(" {input_hint} · Enter submit · \u{2190}/\u{2192} exercise · Esc back"),
        Style::default().fg(theme.dim),
    ));
    frame.render_widget(Paragraph::new(line), area);
}
