//! Platform-independent game logic for the typeracer firmware.
//!
//! Everything in this crate is a pure state machine driven by millisecond
//! timestamps supplied by the caller: a button debouncer, the staged LED
//! progression used by the charging indicator, and the round controller of
//! the typing game. No peripheral access, no allocation, no blocking.
//!
//! Timestamps are `u32` milliseconds and all elapsed-time arithmetic uses
//! wrapping subtraction, so behavior is unchanged across counter overflow.

#![cfg_attr(not(test), no_std)]

pub mod color;
pub mod config;
pub mod debounce;
pub mod line;
pub mod round;
pub mod stage;
pub mod words;

pub use color::Rgb;
pub use debounce::{Debouncer, Edge};
pub use line::{Line, LineSource, normalize};
pub use round::{ButtonEvent, Difficulty, Events, GameEvent, RoundConfig, RoundController, RoundState};
pub use stage::{StageOutput, StagedOutput};
