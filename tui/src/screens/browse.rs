//! Catalog Browser Screen
//!
//! Element list with incremental relevance search. The list shows every
//! element when the query is empty and the ranked hits otherwise.

use narrator_core::{Catalog, Technology};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::display::BrowseState;
use crate::theme::Theme;

/// Render the browse screen.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    technology: Technology,
    catalog: Option<&Catalog>,
    browse: &BrowseState,
    recent: &[String],
    banner: Option<&str>,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search box
            Constraint::Min(3),    // results
            Constraint::Length(1), // hints
        ])
        .split(area);

    render_search_box(frame, rows[0], theme, technology, browse);

    match catalog {
        Some(catalog) => render_results(frame, rows[1], theme, catalog, browse),
        None => {
            let message = banner.unwrap_or("No catalog loaded.");
            let error = Paragraph::new(message).style(Style::default().fg(theme.error));
            frame.render_widget(error, rows[1]);
        }
    }

    render_hints(frame, rows[2], theme, recent, banner);
}

fn render_search_box(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    technology: Technology,
    browse: &BrowseState,
) {
    let title = format!(" {} elements ", technology.label());
    let input = Paragraph::new(Line::from(vec![
        Span::styled("/ ", Style::default().fg(theme.dim)),
        Span::styled(browse.query.as_str(), Style::default().fg(theme.foreground)),
        Span::styled("\u{258c}", Style::default().fg(theme.accent)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(Span::styled(title, Style::default().fg(theme.accent))),
    );
    frame.render_widget(input, area);
}

fn render_results(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    catalog: &Catalog,
    browse: &BrowseState,
) {
    let items: Vec<ListItem> = browse
        .results
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let Some(element) = catalog.get(id) else {
                return ListItem::new(Line::from(id.as_str()));
            };
            let selected = i == browse.selected;
            let name_style = if selected {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.foreground)
            };
            let marker = if selected { "> " } else { "  " };
            let mut spans = vec![
                Span::styled(marker, Style::default().fg(theme.accent)),
                Span::styled(element.name.clone(), name_style),
            ];
            if !element.category.is_empty() {
                spans.push(Span::styled(
                    format!("  [{}]", element.category),
                    Style::default().fg(theme.dim),
                ));
            }
            if !element.description.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", element.description),
                    Style::default().fg(theme.dim),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let count = format!(" {} result(s) ", browse.results.len());
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(Span::styled(count, Style::default().fg(theme.dim))),
    );
    frame.render_widget(list, area);
}

fn render_hints(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    recent: &[String],
    banner: Option<&str>,
) {
    let line = if let Some(banner) = banner {
        Line::from(Span::styled(banner, Style::default().fg(theme.error)))
    } else if recent.is_empty() {
        Line::from(Span::styled(
            " type to search · Enter open · Ctrl+T theme · Esc quit",
            Style::default().fg(theme.dim),
        ))
    } else {
        Line::from(Span::styled(
            format!(
                " recent: {} · Enter open · Ctrl+T theme · Esc quit",
                recent.join(", ")
            ),
            Style::default().fg(theme.dim),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}
