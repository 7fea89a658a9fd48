//! Theme and Colors
//!
//! Light and dark palettes for the lesson viewer. The active palette is
//! chosen from the persisted theme preference and can be toggled at
//! runtime with Ctrl+T.

use narrator_core::ThemeChoice;
use ratatui::style::Color;

/// Accent used for headings and the selected row (dark theme).
const DARK_ACCENT: Color = Color::Rgb(130, 180, 255);

/// Accent used for headings and the selected row (light theme).
const LIGHT_ACCENT: Color = Color::Rgb(30, 80, 180);

/// Success green shared by both palettes.
const SUCCESS_GREEN: Color = Color::Rgb(120, 210, 120);

/// Error red shared by both palettes.
const ERROR_RED: Color = Color::Rgb(235, 90, 90);

/// Reduced-confidence amber for fallback grading feedback.
const FALLBACK_AMBER: Color = Color::Rgb(230, 180, 80);

/// Active color palette.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    /// Screen background.
    pub background: Color,
    /// Default text.
    pub foreground: Color,
    /// Headings, selection, key hints.
    pub accent: Color,
    /// De-emphasized text (categories, separators, hints).
    pub dim: Color,
    /// Panel borders.
    pub border: Color,
    /// Code panel text.
    pub code: Color,
    /// Visual demo panel text.
    pub visual: Color,
    /// Correct-answer feedback.
    pub success: Color,
    /// Incorrect-answer feedback and error banners.
    pub error: Color,
    /// Best-effort (fallback) feedback marker.
    pub fallback: Color,
}

impl Theme {
    /// The dark palette.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(18, 20, 26),
            foreground: Color::Rgb(215, 218, 225),
            accent: DARK_ACCENT,
            dim: Color::Rgb(110, 115, 125),
            border: Color::Rgb(70, 75, 90),
            code: Color::Rgb(160, 220, 160),
            visual: Color::Rgb(200, 170, 240),
            success: SUCCESS_GREEN,
            error: ERROR_RED,
            fallback: FALLBACK_AMBER,
        }
    }

    /// The light palette.
    #[must_use]
    pub fn light() -> Self {
        Self {
            background: Color::Rgb(248, 248, 245),
            foreground: Color::Rgb(40, 42, 48),
            accent: LIGHT_ACCENT,
            dim: Color::Rgb(140, 140, 145),
            border: Color::Rgb(175, 178, 185),
            code: Color::Rgb(30, 110, 40),
            visual: Color::Rgb(110, 60, 160),
            success: Color::Rgb(30, 140, 50),
            error: Color::Rgb(190, 40, 40),
            fallback: Color::Rgb(170, 120, 20),
        }
    }

    /// Palette for a persisted theme choice.
    #[must_use]
    pub fn from_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Dark => Self::dark(),
            ThemeChoice::Light => Self::light(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_choice_selects_palette() {
        let dark = Theme::from_choice(ThemeChoice::Dark);
        let light = Theme::from_choice(ThemeChoice::Light);
        assert_ne!(format!("{:?}", dark.background), format!("{:?}", light.background));
    }
}
