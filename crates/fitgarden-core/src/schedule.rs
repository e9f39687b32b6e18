// ── Delivery time window ──
//
// The backend stores the window as one "start-end" string. Staff type it
// in all sorts of shapes ("13:00-15:00", "13-15", "9-11"), so parsing is
// a lenient heuristic with a fixed fallback window.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback window used when an input cannot be parsed.
const DEFAULT_START: &str = "13:00";
const DEFAULT_END: &str = "15:00";

/// A delivery/pickup time window, both ends as "HH:MM" strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: String,
    pub end: String,
}

impl TimeWindow {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Parse a combined "start-end" string.
    ///
    /// Accepts "HH:MM-HH:MM" (tokens kept verbatim) and bare-hour forms
    /// like "13-15" or "9-11" (tokens zero-padded to "HH:00"). Anything
    /// else — wrong token count, non-numeric pieces, out-of-range hours —
    /// falls back to the default 13:00–15:00 window.
    pub fn parse(raw: &str) -> Self {
        let mut tokens = raw.split('-').map(str::trim);
        let (Some(start), Some(end), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Self::default();
        };
        match (normalize_token(start), normalize_token(end)) {
            (Some(start), Some(end)) => Self { start, end },
            _ => Self::default(),
        }
    }

    /// The combined wire form, e.g. "13:00-15:00".
    pub fn as_wire(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::new(DEFAULT_START, DEFAULT_END)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Validate one token, returning its canonical "HH:MM" form.
///
/// "13:00" stays as typed; a bare hour becomes "HH:00".
fn normalize_token(token: &str) -> Option<String> {
    if let Some((hours, minutes)) = token.split_once(':') {
        let h: u32 = hours.parse().ok()?;
        let m: u32 = minutes.parse().ok()?;
        if h < 24 && m < 60 && minutes.len() == 2 {
            return Some(token.to_owned());
        }
        return None;
    }
    let h: u32 = token.parse().ok()?;
    (h < 24).then(|| format!("{h:02}:00"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_form_is_kept_verbatim() {
        let w = TimeWindow::parse("13:00-15:00");
        assert_eq!(w, TimeWindow::new("13:00", "15:00"));

        let w = TimeWindow::parse("9:30-11:45");
        assert_eq!(w, TimeWindow::new("9:30", "11:45"));
    }

    #[test]
    fn bare_hours_are_zero_padded() {
        assert_eq!(TimeWindow::parse("13-15"), TimeWindow::new("13:00", "15:00"));
        assert_eq!(TimeWindow::parse("9-11"), TimeWindow::new("09:00", "11:00"));
    }

    #[test]
    fn whitespace_around_tokens_is_tolerated() {
        assert_eq!(
            TimeWindow::parse(" 13:00 - 15:00 "),
            TimeWindow::new("13:00", "15:00")
        );
    }

    #[test]
    fn unparseable_inputs_fall_back_to_default() {
        for raw in ["", "almoço", "13", "13-15-17", "25-27", "13:0-15:00", "aa-bb"] {
            assert_eq!(TimeWindow::parse(raw), TimeWindow::default(), "input: {raw:?}");
        }
    }

    #[test]
    fn default_window_is_13_to_15() {
        assert_eq!(TimeWindow::default().as_wire(), "13:00-15:00");
    }

    #[test]
    fn wire_form_roundtrips() {
        let w = TimeWindow::parse("18-20");
        assert_eq!(TimeWindow::parse(&w.as_wire()), w);
    }
}
