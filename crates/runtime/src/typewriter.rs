//! Character-by-character text reveal.

use battle_core::TextDisplay;

/// Reveals one string at a fixed rate.
///
/// Requesting a different string restarts the reveal from nothing.
/// Requesting the string already shown keeps its progress, and if it was
/// already complete, completion is reported again on the next advance.
#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String,
    total: usize,
    visible: usize,
    ms_per_char: u32,
    carry_ms: u32,
    reported: bool,
    skipped: bool,
}

impl Typewriter {
    pub const DEFAULT_MS_PER_CHAR: u32 = 30;

    pub fn new(ms_per_char: u32) -> Self {
        Self {
            text: String::new(),
            total: 0,
            visible: 0,
            ms_per_char,
            carry_ms: 0,
            reported: true,
            skipped: false,
        }
    }

    pub fn request(&mut self, text: &str) {
        if text == self.text {
            if self.is_complete() {
                self.reported = false;
            }
            return;
        }
        self.text = text.to_string();
        self.total = self.text.chars().count();
        self.visible = 0;
        self.carry_ms = 0;
        self.reported = false;
        self.skipped = false;
    }

    /// Reveals the whole string now.
    pub fn skip(&mut self) {
        if !self.is_complete() {
            self.skipped = true;
        }
        self.visible = self.total;
    }

    /// Moves time forward. Returns true exactly once, when the reveal completes.
    pub fn advance(&mut self, dt_ms: u32) -> bool {
        if self.ms_per_char == 0 {
            self.visible = self.total;
        } else if self.visible < self.total {
            self.carry_ms += dt_ms;
            let step = (self.carry_ms / self.ms_per_char) as usize;
            self.carry_ms %= self.ms_per_char;
            self.visible = (self.visible + step).min(self.total);
        }

        if self.is_complete() && !self.reported {
            self.reported = true;
            return true;
        }
        false
    }

    pub fn is_complete(&self) -> bool {
        self.visible >= self.total
    }

    /// True if the current string was completed by [`Typewriter::skip`].
    pub fn was_skipped(&self) -> bool {
        self.skipped
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Revealed prefix of the current string.
    pub fn visible(&self) -> &str {
        match self.text.char_indices().nth(self.visible) {
            Some((end, _)) => &self.text[..end],
            None => &self.text,
        }
    }
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MS_PER_CHAR)
    }
}

impl TextDisplay for Typewriter {
    fn request(&mut self, text: &str) {
        Typewriter::request(self, text);
    }

    fn skip(&mut self) {
        Typewriter::skip(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_at_configured_rate() {
        let mut tw = Typewriter::new(30);
        tw.request("* Hi!");
        assert_eq!(tw.visible(), "");
        assert!(!tw.advance(16));
        assert_eq!(tw.visible(), "");
        assert!(!tw.advance(16));
        assert_eq!(tw.visible(), "*");
        assert!(!tw.advance(90));
        assert_eq!(tw.visible(), "* Hi");
        assert!(tw.advance(30));
        assert_eq!(tw.visible(), "* Hi!");
        assert!(!tw.advance(30));
    }

    #[test]
    fn skip_completes_and_reports_once() {
        let mut tw = Typewriter::new(30);
        tw.request("long line of text");
        tw.skip();
        assert!(tw.is_complete());
        assert!(tw.was_skipped());
        assert_eq!(tw.visible(), "long line of text");
        assert!(tw.advance(16));
        assert!(!tw.advance(16));
    }

    #[test]
    fn new_string_resets_and_same_string_does_not() {
        let mut tw = Typewriter::new(10);
        tw.request("abc");
        tw.advance(20);
        assert_eq!(tw.visible(), "ab");

        tw.request("abc");
        assert_eq!(tw.visible(), "ab");

        tw.request("xyz");
        assert_eq!(tw.visible(), "");
        assert!(!tw.was_skipped());
    }

    #[test]
    fn repeated_complete_string_reports_again() {
        let mut tw = Typewriter::new(10);
        tw.request("ok");
        assert!(tw.advance(20));
        tw.request("ok");
        assert_eq!(tw.visible(), "ok");
        assert!(tw.advance(16));
    }

    #[test]
    fn multibyte_text_is_sliced_on_char_boundaries() {
        let mut tw = Typewriter::new(10);
        tw.request("♥ soul");
        tw.advance(10);
        assert_eq!(tw.visible(), "♥");
    }
}
