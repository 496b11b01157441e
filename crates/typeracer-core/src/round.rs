//! Round lifecycle of the typing game.
//!
//! Two independent timers run while a round is active: the round timer,
//! which ends the round after a fixed duration, and the prompt timer, which
//! re-draws the prompt whenever the player lets it expire. A correct answer
//! re-arms the prompt timer; a wrong answer touches neither timer nor the
//! prompt. Nothing here blocks: the countdown is a state with a stored
//! deadline, ticked alongside everything else.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::color::Rgb;
use crate::config::{COUNTDOWN_BLINK_MS, COUNTDOWN_MS, ROUND_MS};
use crate::line::{LineSource, normalize};
use crate::words::VOCABULARY;

/// Game difficulty, selectable between rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// How long the player gets per prompt.
    pub const fn prompt_interval_ms(self) -> u32 {
        match self {
            Difficulty::Easy => 5_000,
            Difficulty::Medium => 3_000,
            Difficulty::Hard => 1_500,
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Where the round currently is.
///
/// `Ended` is transient: the tick that ends a round reports it and the next
/// tick clears the round fields and returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RoundState {
    Idle,
    Countdown,
    Active,
    Ended,
}

/// A debounced press of one of the two physical buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    StartStop,
    Difficulty,
}

/// Something the serial console and logger should report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameEvent {
    DifficultyChanged(Difficulty),
    CountdownStarted,
    /// Seconds left until the round begins.
    CountdownTick(u32),
    RoundStarted { prompt: &'static str },
    /// The prompt timer ran out; carries the newly drawn prompt.
    PromptExpired { prompt: &'static str },
    /// The player matched the prompt; carries the newly drawn prompt.
    PromptMatched { prompt: &'static str },
    PromptMissed,
    RoundEnded { correct: u32 },
}

/// Events emitted by one tick or button press.
pub type Events = heapless::Vec<GameEvent, 4>;

/// Durations that shape a round.
#[derive(Debug, Clone, Copy)]
pub struct RoundConfig {
    pub countdown_ms: u32,
    pub round_ms: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            countdown_ms: COUNTDOWN_MS,
            round_ms: ROUND_MS,
        }
    }
}

/// Owns the whole game state: lifecycle, both timers, difficulty, score and
/// the feedback color. Single writer; fed by the cooperative loop.
pub struct RoundController {
    state: RoundState,
    difficulty: Difficulty,
    config: RoundConfig,
    rng: SmallRng,
    countdown_from: u32,
    started_at: u32,
    prompt_due_at: u32,
    prompt: &'static str,
    correct: u32,
    announced_secs: u32,
    feedback: Rgb,
}

impl RoundController {
    pub fn new(seed: u64) -> Self {
        Self::with_config(RoundConfig::default(), seed)
    }

    pub fn with_config(config: RoundConfig, seed: u64) -> Self {
        Self {
            state: RoundState::Idle,
            difficulty: Difficulty::Easy,
            config,
            rng: SmallRng::seed_from_u64(seed),
            countdown_from: 0,
            started_at: 0,
            prompt_due_at: 0,
            prompt: "",
            correct: 0,
            announced_secs: 0,
            feedback: Rgb::STANDBY,
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Correct answers so far in the current round.
    pub fn correct(&self) -> u32 {
        self.correct
    }

    /// The word the player currently has to type.
    pub fn prompt(&self) -> Option<&'static str> {
        match self.state {
            RoundState::Active => Some(self.prompt),
            _ => None,
        }
    }

    /// When the current prompt expires.
    pub fn prompt_deadline(&self) -> Option<u32> {
        match self.state {
            RoundState::Active => Some(self.prompt_due_at),
            _ => None,
        }
    }

    /// Handles a debounced button press.
    ///
    /// Difficulty changes are only accepted while idle; the start/stop
    /// button starts a round from idle and stops an active one, overriding
    /// any remaining round time. The countdown is not interruptible.
    pub fn handle_button(&mut self, event: ButtonEvent, now_ms: u32, events: &mut Events) {
        match (event, self.state) {
            (ButtonEvent::StartStop, RoundState::Idle) => {
                self.countdown_from = now_ms;
                self.announced_secs = 0;
                self.state = RoundState::Countdown;
                let _ = events.push(GameEvent::CountdownStarted);
            }
            (ButtonEvent::StartStop, RoundState::Active) => self.end_round(events),
            (ButtonEvent::Difficulty, RoundState::Idle) => {
                self.difficulty = self.difficulty.next();
                let _ = events.push(GameEvent::DifficultyChanged(self.difficulty));
            }
            _ => {}
        }
    }

    /// Advances the game by one loop iteration.
    ///
    /// `input` yields at most one complete line; it is only consulted while
    /// a round is active.
    pub fn tick(&mut self, now_ms: u32, input: &mut impl LineSource, events: &mut Events) {
        match self.state {
            RoundState::Idle => {}
            RoundState::Ended => {
                self.clear_round();
                self.state = RoundState::Idle;
            }
            RoundState::Countdown => self.tick_countdown(now_ms, events),
            RoundState::Active => self.tick_active(now_ms, input, events),
        }
    }

    /// Current indicator color.
    pub fn indicator(&self, now_ms: u32) -> Rgb {
        match self.state {
            RoundState::Idle | RoundState::Ended => Rgb::STANDBY,
            RoundState::Countdown => {
                let elapsed = now_ms.wrapping_sub(self.countdown_from);
                if (elapsed / COUNTDOWN_BLINK_MS) % 2 == 0 {
                    Rgb::COUNTDOWN
                } else {
                    Rgb::OFF
                }
            }
            RoundState::Active => self.feedback,
        }
    }

    fn tick_countdown(&mut self, now_ms: u32, events: &mut Events) {
        let elapsed = now_ms.wrapping_sub(self.countdown_from);
        if elapsed >= self.config.countdown_ms {
            self.started_at = now_ms;
            self.prompt_due_at = now_ms.wrapping_add(self.difficulty.prompt_interval_ms());
            self.prompt = self.draw_prompt();
            self.feedback = Rgb::IN_ROUND;
            self.state = RoundState::Active;
            let _ = events.push(GameEvent::RoundStarted { prompt: self.prompt });
        } else {
            let secs = (self.config.countdown_ms - elapsed).div_ceil(1_000);
            if secs != self.announced_secs {
                self.announced_secs = secs;
                let _ = events.push(GameEvent::CountdownTick(secs));
            }
        }
    }

    fn tick_active(&mut self, now_ms: u32, input: &mut impl LineSource, events: &mut Events) {
        if now_ms.wrapping_sub(self.started_at) >= self.config.round_ms {
            self.end_round(events);
            return;
        }
        if deadline_reached(now_ms, self.prompt_due_at) {
            self.prompt = self.draw_prompt();
            self.prompt_due_at = now_ms.wrapping_add(self.difficulty.prompt_interval_ms());
            let _ = events.push(GameEvent::PromptExpired { prompt: self.prompt });
        }
        if let Some(raw) = input.try_read_line() {
            if normalize(&raw).as_str() == self.prompt {
                self.correct += 1;
                self.prompt = self.draw_prompt();
                self.prompt_due_at = now_ms.wrapping_add(self.difficulty.prompt_interval_ms());
                self.feedback = Rgb::CORRECT;
                let _ = events.push(GameEvent::PromptMatched { prompt: self.prompt });
            } else {
                self.feedback = Rgb::WRONG;
                let _ = events.push(GameEvent::PromptMissed);
            }
        }
    }

    fn end_round(&mut self, events: &mut Events) {
        self.state = RoundState::Ended;
        self.feedback = Rgb::STANDBY;
        let _ = events.push(GameEvent::RoundEnded { correct: self.correct });
    }

    fn clear_round(&mut self) {
        self.started_at = 0;
        self.prompt_due_at = 0;
        self.prompt = "";
        self.correct = 0;
    }

    fn draw_prompt(&mut self) -> &'static str {
        VOCABULARY[self.rng.gen_range(0..VOCABULARY.len())]
    }
}

/// Wraparound-safe `now >= deadline` for deadlines within half the counter
/// range of `now`.
fn deadline_reached(now_ms: u32, deadline_ms: u32) -> bool {
    now_ms.wrapping_sub(deadline_ms) < u32::MAX / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::Line;

    fn controller() -> RoundController {
        RoundController::new(0xC0FFEE)
    }

    /// Presses start at `t` and ticks through the countdown; returns the
    /// activation timestamp.
    fn start_active(ctrl: &mut RoundController, t: u32) -> u32 {
        let mut ev = Events::new();
        ctrl.handle_button(ButtonEvent::StartStop, t, &mut ev);
        ctrl.tick(t, &mut None::<Line>, &mut ev);
        let activation = t + COUNTDOWN_MS;
        ctrl.tick(activation, &mut None::<Line>, &mut ev);
        assert_eq!(ctrl.state(), RoundState::Active);
        activation
    }

    fn submit(ctrl: &mut RoundController, t: u32, line: &str) -> Events {
        let mut ev = Events::new();
        let mut input = Some(Line::try_from(line).unwrap());
        ctrl.tick(t, &mut input, &mut ev);
        ev
    }

    #[test]
    fn difficulty_cycles_while_idle() {
        let mut ctrl = controller();
        let mut ev = Events::new();
        ctrl.handle_button(ButtonEvent::Difficulty, 0, &mut ev);
        assert_eq!(ctrl.difficulty(), Difficulty::Medium);
        ctrl.handle_button(ButtonEvent::Difficulty, 0, &mut ev);
        assert_eq!(ctrl.difficulty(), Difficulty::Hard);
        ctrl.handle_button(ButtonEvent::Difficulty, 0, &mut ev);
        assert_eq!(ctrl.difficulty(), Difficulty::Easy);
        assert!(ev.contains(&GameEvent::DifficultyChanged(Difficulty::Hard)));
    }

    #[test]
    fn difficulty_rejected_outside_idle() {
        let mut ctrl = controller();
        let mut ev = Events::new();
        ctrl.handle_button(ButtonEvent::StartStop, 0, &mut ev);
        assert_eq!(ctrl.state(), RoundState::Countdown);

        ev.clear();
        ctrl.handle_button(ButtonEvent::Difficulty, 100, &mut ev);
        assert!(ev.is_empty());
        assert_eq!(ctrl.difficulty(), Difficulty::Easy);

        let mut ctrl = controller();
        start_active(&mut ctrl, 0);
        ev.clear();
        ctrl.handle_button(ButtonEvent::Difficulty, 4_000, &mut ev);
        assert!(ev.is_empty());
        assert_eq!(ctrl.difficulty(), Difficulty::Easy);
    }

    #[test]
    fn countdown_announces_each_second_without_blocking() {
        let mut ctrl = controller();
        let mut ev = Events::new();
        ctrl.handle_button(ButtonEvent::StartStop, 0, &mut ev);
        assert_eq!(ev.as_slice(), [GameEvent::CountdownStarted]);

        ev.clear();
        ctrl.tick(0, &mut None::<Line>, &mut ev);
        assert_eq!(ev.as_slice(), [GameEvent::CountdownTick(3)]);

        ev.clear();
        ctrl.tick(500, &mut None::<Line>, &mut ev);
        assert!(ev.is_empty());

        ev.clear();
        ctrl.tick(1_000, &mut None::<Line>, &mut ev);
        assert_eq!(ev.as_slice(), [GameEvent::CountdownTick(2)]);

        ev.clear();
        ctrl.tick(2_000, &mut None::<Line>, &mut ev);
        assert_eq!(ev.as_slice(), [GameEvent::CountdownTick(1)]);

        ev.clear();
        ctrl.tick(3_000, &mut None::<Line>, &mut ev);
        assert!(matches!(ev.as_slice(), [GameEvent::RoundStarted { .. }]));
        assert_eq!(ctrl.state(), RoundState::Active);
    }

    #[test]
    fn start_stop_ignored_during_countdown() {
        let mut ctrl = controller();
        let mut ev = Events::new();
        ctrl.handle_button(ButtonEvent::StartStop, 0, &mut ev);

        ev.clear();
        ctrl.handle_button(ButtonEvent::StartStop, 1_000, &mut ev);
        assert!(ev.is_empty());
        assert_eq!(ctrl.state(), RoundState::Countdown);
    }

    #[test]
    fn mismatch_leaves_prompt_timer_untouched() {
        let mut ctrl = controller();
        let mut ev = Events::new();
        // Medium: prompt interval 3000ms.
        ctrl.handle_button(ButtonEvent::Difficulty, 0, &mut ev);
        let t0 = start_active(&mut ctrl, 0);
        assert_eq!(ctrl.prompt_deadline(), Some(t0 + 3_000));

        let ev = submit(&mut ctrl, t0 + 1_000, "zzz");
        assert_eq!(ev.as_slice(), [GameEvent::PromptMissed]);
        assert_eq!(ctrl.prompt_deadline(), Some(t0 + 3_000));
        assert_eq!(ctrl.correct(), 0);
        assert_eq!(ctrl.indicator(t0 + 1_000), Rgb::WRONG);
    }

    #[test]
    fn match_scores_and_rearms_prompt_timer() {
        let mut ctrl = controller();
        let mut ev = Events::new();
        ctrl.handle_button(ButtonEvent::Difficulty, 0, &mut ev);
        let t0 = start_active(&mut ctrl, 0);
        let prompt = ctrl.prompt().unwrap();

        let ev = submit(&mut ctrl, t0 + 1_000, prompt);
        assert!(matches!(ev.as_slice(), [GameEvent::PromptMatched { .. }]));
        assert_eq!(ctrl.correct(), 1);
        assert_eq!(ctrl.prompt_deadline(), Some(t0 + 4_000));
        assert_eq!(ctrl.indicator(t0 + 1_000), Rgb::CORRECT);
    }

    #[test]
    fn received_lines_are_normalized_before_comparison() {
        let mut ctrl = controller();
        let t0 = start_active(&mut ctrl, 0);
        let prompt = ctrl.prompt().unwrap();

        let raw = format!("{prompt}\r");
        let ev = submit(&mut ctrl, t0 + 500, &raw);
        assert!(matches!(ev.as_slice(), [GameEvent::PromptMatched { .. }]));
        assert_eq!(ctrl.correct(), 1);
    }

    #[test]
    fn empty_line_counts_as_mismatch() {
        let mut ctrl = controller();
        let t0 = start_active(&mut ctrl, 0);
        let ev = submit(&mut ctrl, t0 + 500, "\r");
        assert_eq!(ev.as_slice(), [GameEvent::PromptMissed]);
    }

    #[test]
    fn prompt_expiry_redraws_and_rearms() {
        let mut ctrl = controller();
        // Easy: prompt interval 5000ms.
        let t0 = start_active(&mut ctrl, 0);

        let mut ev = Events::new();
        ctrl.tick(t0 + 5_000, &mut None::<Line>, &mut ev);
        assert!(matches!(ev.as_slice(), [GameEvent::PromptExpired { .. }]));
        assert_eq!(ctrl.prompt_deadline(), Some(t0 + 10_000));
    }

    #[test]
    fn round_ends_on_its_own_timer() {
        let mut ctrl = controller();
        let t0 = start_active(&mut ctrl, 0);

        let mut ev = Events::new();
        ctrl.tick(t0 + ROUND_MS, &mut None::<Line>, &mut ev);
        assert_eq!(ev.as_slice(), [GameEvent::RoundEnded { correct: 0 }]);
        assert_eq!(ctrl.state(), RoundState::Ended);

        // Ended is transient: the next tick returns to idle.
        ev.clear();
        ctrl.tick(t0 + ROUND_MS + 10, &mut None::<Line>, &mut ev);
        assert_eq!(ctrl.state(), RoundState::Idle);
        assert_eq!(ctrl.indicator(t0 + ROUND_MS + 10), Rgb::STANDBY);
        assert_eq!(ctrl.prompt(), None);
    }

    #[test]
    fn manual_stop_overrides_remaining_time() {
        let mut ctrl = controller();
        let t0 = start_active(&mut ctrl, 0);
        let prompt = ctrl.prompt().unwrap();
        submit(&mut ctrl, t0 + 1_000, prompt);

        let mut ev = Events::new();
        ctrl.handle_button(ButtonEvent::StartStop, t0 + 1_234, &mut ev);
        assert_eq!(ev.as_slice(), [GameEvent::RoundEnded { correct: 1 }]);
        assert_eq!(ctrl.state(), RoundState::Ended);
    }

    #[test]
    fn easy_round_end_to_end_without_input() {
        let mut ctrl = controller();
        assert_eq!(ctrl.difficulty(), Difficulty::Easy);
        let t0 = start_active(&mut ctrl, 0);

        let mut ev = Events::new();
        ctrl.tick(t0 + 5_000, &mut None::<Line>, &mut ev);
        assert!(matches!(ev.as_slice(), [GameEvent::PromptExpired { .. }]));
        assert_eq!(ctrl.prompt_deadline(), Some(t0 + 10_000));

        ev.clear();
        ctrl.tick(t0 + 30_000, &mut None::<Line>, &mut ev);
        assert_eq!(ev.as_slice(), [GameEvent::RoundEnded { correct: 0 }]);
    }

    #[test]
    fn countdown_indicator_blinks_yellow() {
        let mut ctrl = controller();
        let mut ev = Events::new();
        ctrl.handle_button(ButtonEvent::StartStop, 0, &mut ev);
        assert_eq!(ctrl.indicator(0), Rgb::COUNTDOWN);
        assert_eq!(ctrl.indicator(COUNTDOWN_BLINK_MS), Rgb::OFF);
        assert_eq!(ctrl.indicator(2 * COUNTDOWN_BLINK_MS), Rgb::COUNTDOWN);
    }

    #[test]
    fn new_round_starts_from_a_clean_score() {
        let mut ctrl = controller();
        let t0 = start_active(&mut ctrl, 0);
        let prompt = ctrl.prompt().unwrap();
        submit(&mut ctrl, t0 + 1_000, prompt);
        assert_eq!(ctrl.correct(), 1);

        let mut ev = Events::new();
        ctrl.handle_button(ButtonEvent::StartStop, t0 + 2_000, &mut ev);
        ctrl.tick(t0 + 2_010, &mut None::<Line>, &mut ev);
        assert_eq!(ctrl.state(), RoundState::Idle);

        let t1 = start_active(&mut ctrl, t0 + 3_000);
        assert_eq!(ctrl.correct(), 0);
        assert_eq!(ctrl.prompt_deadline(), Some(t1 + 5_000));
    }
}
