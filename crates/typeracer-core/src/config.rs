//! Compile-time configuration shared by both programs.

/// Minimum time a raw button level must hold before it counts as a real
/// state change.
pub const DEBOUNCE_MS: u32 = 50;

/// Length of the pre-round countdown.
pub const COUNTDOWN_MS: u32 = 3_000;

/// Blink period of the indicator during the countdown.
pub const COUNTDOWN_BLINK_MS: u32 = 50;

/// Length of one round of the typing game.
pub const ROUND_MS: u32 = 30_000;

/// Blink period of the staged indicator LEDs.
pub const BLINK_MS: u32 = 600;

/// Time for a full charge on the charging indicator.
pub const CHARGE_MS: u32 = 12_000;

/// All-lines blink window once the charge completes.
pub const CHARGE_GRACE_MS: u32 = 4_000;

/// How long the stop button must be held to force-stop a charge.
pub const FORCE_STOP_HOLD_MS: u32 = 1_000;
