//! Line-oriented text input.

/// Longest accepted line; input past the cap is dropped.
pub const MAX_LINE: usize = 64;

/// One complete line of input, terminator not included.
pub type Line = heapless::String<MAX_LINE>;

/// Non-blocking source of complete text lines.
///
/// Returns at most one complete line per call and never a partial one.
/// Lines arrive in FIFO order.
pub trait LineSource {
    fn try_read_line(&mut self) -> Option<Line>;
}

/// A pending line slot is itself a source. This is what the firmware hands
/// to the round controller each tick (`channel.try_receive().ok()`), and
/// what tests use directly.
impl LineSource for Option<Line> {
    fn try_read_line(&mut self) -> Option<Line> {
        self.take()
    }
}

/// Normalizes a received line before comparison: surrounding whitespace is
/// trimmed, then each backspace byte (8) deletes the previously accepted
/// character instead of being kept as input.
///
/// Trimming happens first and only byte 8 is special; other control bytes
/// pass through and simply fail the comparison.
pub fn normalize(raw: &str) -> Line {
    let mut out = Line::new();
    for c in raw.trim().chars() {
        if c == '\u{8}' {
            out.pop();
        } else {
            let _ = out.push(c);
        }
    }
    out
}
