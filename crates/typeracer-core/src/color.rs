//! Tri-channel indicator colors.

/// One frame of the RGB indicator, 0-255 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// All channels dark.
    pub const OFF: Rgb = Rgb::new(0, 0, 0);
    /// White, shown while waiting for a round to start.
    pub const STANDBY: Rgb = Rgb::new(255, 255, 255);
    /// Yellow countdown blink.
    pub const COUNTDOWN: Rgb = Rgb::new(255, 255, 0);
    /// Shown while a round is running, before any answer.
    pub const IN_ROUND: Rgb = Rgb::new(0, 0, 255);
    /// Green feedback for a matched word.
    pub const CORRECT: Rgb = Rgb::new(0, 255, 0);
    /// Red feedback for a missed word.
    pub const WRONG: Rgb = Rgb::new(255, 0, 0);
    /// Charging indicator: idle.
    pub const CHARGER_IDLE: Rgb = Rgb::new(0, 255, 0);
    /// Charging indicator: charge in progress.
    pub const CHARGING: Rgb = Rgb::new(255, 0, 0);
}
