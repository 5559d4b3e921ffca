use std::time::{Duration, Instant};

/// Quiet period before typed search text reaches the filter draft.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// Debounced free-text search box for interactive front ends.
///
/// Typed text is surfaced once per quiet period by [`SearchInput::settle`].
/// Surfacing only feeds the filter draft; it never applies filters. One-shot
/// callers such as a command line set the draft value directly instead.
#[derive(Debug, Clone)]
pub struct SearchInput {
    text: String,
    last_keystroke: Option<Instant>,
    quiet_period: Duration,
    synced_from: String,
}

impl SearchInput {
    /// Creates a search box showing `initial`.
    #[must_use]
    pub fn new(initial: &str, quiet_period: Duration) -> Self {
        Self {
            text: initial.to_owned(),
            last_keystroke: None,
            quiet_period,
            synced_from: initial.to_owned(),
        }
    }

    /// Returns the local text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Records a keystroke.
    pub fn type_text(&mut self, text: &str, now: Instant) {
        self.text = text.to_owned();
        self.last_keystroke = Some(now);
    }

    /// Returns the text once the quiet period has elapsed since the last keystroke.
    ///
    /// The surfaced text becomes the panel value the next [`SearchInput::sync`]
    /// compares against.
    pub fn settle(&mut self, now: Instant) -> Option<String> {
        let last_keystroke = self.last_keystroke?;
        if now.saturating_duration_since(last_keystroke) < self.quiet_period {
            return None;
        }

        self.last_keystroke = None;
        self.synced_from = self.text.clone();
        Some(self.text.clone())
    }

    /// Replaces the local text when the panel's value changed underneath it.
    ///
    /// Returns whether the local text was replaced.
    pub fn sync(&mut self, panel_value: &str) -> bool {
        if self.synced_from == panel_value {
            return false;
        }

        self.synced_from = panel_value.to_owned();
        self.text = panel_value.to_owned();
        self.last_keystroke = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_of_keystrokes_settles_once_with_latest_text() {
        let start = Instant::now();
        let mut input = SearchInput::new("", SEARCH_DEBOUNCE);

        input.type_text("c", start);
        input.type_text("ch", start + Duration::from_millis(100));
        input.type_text("chi", start + Duration::from_millis(200));

        assert!(input.settle(start + Duration::from_millis(400)).is_none());
        assert_eq!(
            input.settle(start + Duration::from_millis(450)).as_deref(),
            Some("chi")
        );
        assert!(input.settle(start + Duration::from_secs(2)).is_none());
    }

    #[test]
    fn panel_reset_clears_surfaced_text() {
        let start = Instant::now();
        let mut input = SearchInput::new("", SEARCH_DEBOUNCE);

        input.type_text("chiller", start);
        assert_eq!(
            input.settle(start + SEARCH_DEBOUNCE).as_deref(),
            Some("chiller")
        );
        assert!(!input.sync("chiller"));

        assert!(input.sync(""));
        assert_eq!(input.text(), "");
    }

    #[test]
    fn unsurfaced_typing_survives_an_unchanged_panel_value() {
        let start = Instant::now();
        let mut input = SearchInput::new("", SEARCH_DEBOUNCE);
        input.type_text("pending", start);
        assert!(!input.sync(""));
        assert_eq!(input.text(), "pending");

        assert!(input.sync("reset"));
        assert_eq!(input.text(), "reset");
        assert!(input.settle(start + SEARCH_DEBOUNCE).is_none());
    }
}
