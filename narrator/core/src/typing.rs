//! Typing Effect Engine
//!
//! Reveals a text or code string one character at a time. The effect holds
//! no timer of its own: the sequencer drives it from a repeating registry
//! timer and reads back the revealed prefix, so restarting is just
//! constructing a fresh effect after the old timers are canceled.
//!
//! Progress counts `char`s, not bytes, so multi-byte text reveals cleanly.

/// Character-by-character reveal over a fixed string.
#[derive(Clone, Debug)]
pub struct TypingEffect {
    full: String,
    /// Byte offset of the end of each revealed prefix; `offsets[n]` is the
    /// prefix length in bytes after revealing `n` chars.
    offsets: Vec<usize>,
    revealed: usize,
}

impl TypingEffect {
    /// Create a new effect over `full_text`. Empty text is born complete.
    pub fn new(full_text: impl Into<String>) -> Self {
        let full = full_text.into();
        let mut offsets = Vec::with_capacity(full.len() + 1);
        offsets.push(0);
        for (i, c) in full.char_indices() {
            offsets.push(i + c.len_utf8());
        }
        Self {
            full,
            offsets,
            revealed: 0,
        }
    }

    /// Reveal one more character. Returns `true` once the full text is
    /// revealed; advancing a completed effect stays complete.
    pub fn advance(&mut self) -> bool {
        if self.revealed < self.total_chars() {
            self.revealed += 1;
        }
        self.is_done()
    }

    /// Reveal the whole text at once (used by seek).
    pub fn reveal_all(&mut self) {
        self.revealed = self.total_chars();
    }

    /// The revealed prefix so far.
    #[must_use]
    pub fn revealed(&self) -> &str {
        &self.full[..self.offsets[self.revealed]]
    }

    /// Number of characters revealed so far.
    #[must_use]
    pub fn revealed_chars(&self) -> usize {
        self.revealed
    }

    /// Total characters in the full text.
    #[must_use]
    pub fn total_chars(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Whether the full text has been revealed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.revealed == self.total_chars()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reveals_one_char_per_advance() {
        let mut fx = TypingEffect::new("abc");
        assert_eq!(fx.revealed(), "");

        assert!(!fx.advance());
        assert_eq!(fx.revealed(), "a");
        assert!(!fx.advance());
        assert_eq!(fx.revealed(), "ab");
        assert!(fx.advance());
        assert_eq!(fx.revealed(), "abc");
    }

    #[test]
    fn test_empty_text_is_born_complete() {
        let fx = TypingEffect::new("");
        assert!(fx.is_done());
        assert_eq!(fx.revealed(), "");
        assert_eq!(fx.total_chars(), 0);
    }

    #[test]
    fn test_progress_is_monotonic_and_exact() {
        let text = "let x = 1;";
        let mut fx = TypingEffect::new(text);
        let mut last = 0;
        while !fx.is_done() {
            fx.advance();
            assert!(fx.revealed_chars() > last);
            last = fx.revealed_chars();
        }
        assert_eq!(fx.revealed_chars(), text.chars().count());
        assert_eq!(fx.revealed(), text);
    }

    #[test]
    fn test_multibyte_boundaries() {
        let mut fx = TypingEffect::new("aé☃");
        fx.advance();
        assert_eq!(fx.revealed(), "a");
        fx.advance();
        assert_eq!(fx.revealed(), "aé");
        fx.advance();
        assert_eq!(fx.revealed(), "aé☃");
        assert!(fx.is_done());
    }

    #[test]
    fn test_advance_past_end_is_stable() {
        let mut fx = TypingEffect::new("x");
        assert!(fx.advance());
        assert!(fx.advance());
        assert_eq!(fx.revealed(), "x");
        assert_eq!(fx.revealed_chars(), 1);
    }

    #[test]
    fn test_reveal_all() {
        let mut fx = TypingEffect::new("hello");
        fx.reveal_all();
        assert!(fx.is_done());
        assert_eq!(fx.revealed(), "hello");
    }
}
