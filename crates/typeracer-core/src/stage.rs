//! Staged indicator lines driven by elapsed time.

/// What the four indicator lines should show right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StageOutput {
    /// One band blinking, every other line dark.
    Band { index: usize, lit: bool },
    /// Terminal grace window: all four lines blink in phase.
    AllBlink { lit: bool },
    /// Grace window over, every line off.
    Complete,
}

/// Maps elapsed time onto four quartile bands of a fixed total duration.
///
/// Band membership and blink phase are recomputed from elapsed time on
/// every call, never kept incrementally, so a missed or delayed tick
/// self-corrects and repeated calls with the same time are identical.
pub struct StagedOutput {
    total_ms: u32,
    grace_ms: u32,
    blink_ms: u32,
}

impl StagedOutput {
    pub const fn new(total_ms: u32, grace_ms: u32, blink_ms: u32) -> Self {
        Self {
            total_ms,
            grace_ms,
            blink_ms,
        }
    }

    /// Active band for a normalized progress value, lower bound inclusive.
    pub fn band(progress: f32) -> usize {
        if progress >= 0.75 {
            3
        } else if progress >= 0.5 {
            2
        } else if progress >= 0.25 {
            1
        } else {
            0
        }
    }

    /// Output for `elapsed_ms` since the reference timestamp.
    pub fn render(&self, elapsed_ms: u32) -> StageOutput {
        let lit = (elapsed_ms / self.blink_ms) % 2 == 0;
        if elapsed_ms >= self.total_ms {
            if elapsed_ms.wrapping_sub(self.total_ms) < self.grace_ms {
                StageOutput::AllBlink { lit }
            } else {
                StageOutput::Complete
            }
        } else {
            let index = (elapsed_ms as u64 * 4 / self.total_ms as u64) as usize;
            StageOutput::Band { index, lit }
        }
    }
}
