//! Debounced edge detection for a noisy digital input.

/// Direction of a debounced level transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Rising,
    Falling,
}

/// Turns raw samples of a digital input into one-shot edges.
///
/// The stable level only changes after the raw level has held its new value
/// for at least the debounce window, at which point exactly one [`Edge`] is
/// emitted. Sampling may happen at irregular intervals; the decision depends
/// only on timestamps, not on call cadence.
pub struct Debouncer {
    debounce_ms: u32,
    last_raw: bool,
    stable: bool,
    changed_at: u32,
}

impl Debouncer {
    /// `initial` is the level the input idles at (high for pull-up buttons).
    pub fn new(initial: bool, debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            last_raw: initial,
            stable: initial,
            changed_at: 0,
        }
    }

    /// Current debounced level.
    pub fn is_high(&self) -> bool {
        self.stable
    }

    /// Feed one raw sample taken at `now_ms`.
    pub fn poll(&mut self, raw: bool, now_ms: u32) -> Option<Edge> {
        if raw != self.last_raw {
            self.changed_at = now_ms;
            self.last_raw = raw;
        }
        if raw != self.stable && now_ms.wrapping_sub(self.changed_at) >= self.debounce_ms {
            self.stable = raw;
            return Some(if raw { Edge::Rising } else { Edge::Falling });
        }
        None
    }
}
