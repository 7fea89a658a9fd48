//! TextBlock Widget
//!
//! A borderless, scrollable text region with an optional typing cursor
//! appended while text is still being revealed.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;

/// Block cursor appended while typing is in progress.
const TYPING_CURSOR: &str = "\u{258c}";

/// State for a scrollable text block
#[derive(Default)]
pub struct TextBlockState {
    /// Scroll offset (lines from top)
    pub scroll_offset: usize,
    /// Total content lines
    pub total_lines: usize,
}

impl TextBlockState {
    /// Scroll by delta (positive = down)
    pub fn scroll(&mut self, delta: i32) {
        let new_offset = self.scroll_offset as i32 + delta;
        self.scroll_offset = new_offset.max(0) as usize;
    }

    /// Scroll to bottom
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.total_lines.saturating_sub(1);
    }
}

/// A borderless, scrollable text block
pub struct TextBlock<'a> {
    content: &'a str,
    style: Style,
    typing: bool,
}

impl<'a> TextBlock<'a> {
    /// Create a block over borrowed content.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            style: Style::default(),
            typing: false,
        }
    }

    /// Set the text style.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Append a block cursor after the last character while revealing.
    #[must_use]
    pub fn typing(mut self, typing: bool) -> Self {
        self.typing = typing;
        self
    }
}

impl<'a> StatefulWidget for TextBlock<'a> {
    type State = TextBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Wrap text to width
        let mut wrapped: Vec<String> = self
            .content
            .lines()
            .flat_map(|line| {
                if line.is_empty() {
                    vec![String::new()]
                } else {
                    wrap(line, area.width as usize)
                        .into_iter()
                        .map(|cow| cow.to_string())
                        .collect()
                }
            })
            .collect();

        if self.typing {
            match wrapped.last_mut() {
                Some(last) if last.len() < area.width as usize => last.push_str(TYPING_CURSOR),
                _ => wrapped.push(TYPING_CURSOR.to_string()),
            }
        }

        state.total_lines = wrapped.len();

        // Clamp scroll
        let max_scroll = state.total_lines.saturating_sub(area.height as usize);
        state.scroll_offset = state.scroll_offset.min(max_scroll);

        // Render visible lines
        for (i, line) in wrapped
            .iter()
            .skip(state.scroll_offset)
            .take(area.height as usize)
            .enumerate()
        {
            let y = area.y + i as u16;
            buf.set_string(area.x, y, line, self.style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_clamps_at_zero() {
        let mut state = TextBlockState::default();
        state.scroll(-5);
        assert_eq!(state.scroll_offset, 0);
        state.scroll(3);
        assert_eq!(state.scroll_offset, 3);
    }

    #[test]
    fn test_render_counts_wrapped_lines() {
        let mut state = TextBlockState::default();
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        TextBlock::new("first line\n\nsecond")
            .render(area, &mut buf, &mut state);
        assert_eq!(state.total_lines, 3);
    }

    #[test]
    fn test_typing_cursor_appended() {
        let mut state = TextBlockState::default();
        let area = Rect::new(0, 0, 20, 2);
        let mut buf = Buffer::empty(area);
        TextBlock::new("typed")
            .typing(true)
            .render(area, &mut buf, &mut state);

        let row: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert!(row.contains(TYPING_CURSOR));
    }
}
