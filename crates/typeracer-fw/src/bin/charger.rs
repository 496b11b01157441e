//! STM32F103 Blue Pill Charging Indicator
//! =============================================================================================
//!
//! Simulates a battery charging station:
//! - Four staged LEDs show charge progress in quartiles, the active
//!   quartile blinking at 600ms
//! - An RGB LED shows green while idle and red while charging
//! - A start button begins a 12 second charge; holding the stop button for
//!   one second force-completes it
//! - When the charge (or a force-stop) completes, all four LEDs blink
//!   together for 4 seconds, then everything returns to idle
//!
//! Hardware Connections:
//!   RGB LED (common cathode):
//!      R    -> PA0 (TIM2_CH1)
//!      G    -> PA1 (TIM2_CH2)
//!      B    -> PA2 (TIM2_CH3)
//!
//!   Staged LEDs (active high):
//!      25%  -> PA4
//!      50%  -> PA5
//!      75%  -> PA6
//!      100% -> PA7
//!
//!   Buttons (to GND, internal pull-up):
//!      Start -> PB0
//!      Stop  -> PB1

#![no_std]
#![no_main]

use defmt_rtt as _; // Global logger
use embassy_executor::Spawner;
use embassy_stm32::{
    gpio::{Input, Level, Output, OutputType, Pull, Speed},
    time::Hertz,
    timer::simple_pwm::{PwmPin, SimplePwm},
};
use embassy_time::{Duration, Instant, Ticker};
use panic_probe as _; // Panic handler

use typeracer_core::{
    Debouncer, Edge, Rgb, StageOutput, StagedOutput,
    config::{BLINK_MS, CHARGE_GRACE_MS, CHARGE_MS, DEBOUNCE_MS, FORCE_STOP_HOLD_MS},
};
use typeracer_fw::hardware::{
    gpio_button::GpioButton,
    gpio_led::GpioLed,
    pwm_rgb::PwmRgb,
    traits::{Button, ColorLed, Led},
};

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_stm32::init(Default::default());

    defmt::info!("charging indicator started");

    // RGB status LED on TIM2 PWM
    let red = PwmPin::new_ch1(p.PA0, OutputType::PushPull);
    let green = PwmPin::new_ch2(p.PA1, OutputType::PushPull);
    let blue = PwmPin::new_ch3(p.PA2, OutputType::PushPull);
    let pwm = SimplePwm::new(
        p.TIM2,
        Some(red),
        Some(green),
        Some(blue),
        None,
        Hertz::khz(1),
        Default::default(),
    );
    let channels = pwm.split();
    let mut rgb = PwmRgb::new(channels.ch1, channels.ch2, channels.ch3);
    rgb.set_color(Rgb::CHARGER_IDLE);

    // One LED per charge quartile
    let mut leds = [
        GpioLed::new(Output::new(p.PA4, Level::Low, Speed::Low)),
        GpioLed::new(Output::new(p.PA5, Level::Low, Speed::Low)),
        GpioLed::new(Output::new(p.PA6, Level::Low, Speed::Low)),
        GpioLed::new(Output::new(p.PA7, Level::Low, Speed::Low)),
    ];

    let start = GpioButton::new(Input::new(p.PB0, Pull::Up));
    let stop = GpioButton::new(Input::new(p.PB1, Pull::Up));
    let mut start_debounce = Debouncer::new(true, DEBOUNCE_MS);
    let mut stop_debounce = Debouncer::new(true, DEBOUNCE_MS);

    let stage = StagedOutput::new(CHARGE_MS, CHARGE_GRACE_MS, BLINK_MS);

    // Timestamp the running charge started at, if any
    let mut charging_since: Option<u32> = None;
    // When the stop button went down, for the hold-to-force-stop gesture
    let mut stop_held_since: Option<u32> = None;

    let mut ticker = Ticker::every(Duration::from_millis(10));

    loop {
        let now = Instant::now().as_millis() as u32;

        if start_debounce.poll(!start.is_pressed(), now) == Some(Edge::Falling)
            && charging_since.is_none()
        {
            defmt::info!("charge started");
            rgb.set_color(Rgb::CHARGING);
            charging_since = Some(now);
        }

        match stop_debounce.poll(!stop.is_pressed(), now) {
            Some(Edge::Falling) => stop_held_since = Some(now),
            Some(Edge::Rising) => stop_held_since = None,
            None => {}
        }

        // Holding stop for a full second rebases the charge so that the
        // elapsed time equals the charge duration: the terminal all-blink
        // window still plays before the indicator goes idle.
        if let (Some(_), Some(held_since)) = (charging_since, stop_held_since) {
            if now.wrapping_sub(held_since) >= FORCE_STOP_HOLD_MS {
                defmt::info!("charge force-stopped");
                charging_since = Some(now.wrapping_sub(CHARGE_MS));
                stop_held_since = None;
            }
        }

        if let Some(since) = charging_since {
            match stage.render(now.wrapping_sub(since)) {
                StageOutput::Band { index, lit } => {
                    for (i, led) in leds.iter_mut().enumerate() {
                        led.set(i == index && lit);
                    }
                }
                StageOutput::AllBlink { lit } => {
                    for led in leds.iter_mut() {
                        led.set(lit);
                    }
                }
                StageOutput::Complete => {
                    defmt::info!("charge complete");
                    for led in leds.iter_mut() {
                        led.off();
                    }
                    rgb.set_color(Rgb::CHARGER_IDLE);
                    charging_since = None;
                }
            }
        }

        ticker.next().await;
    }
}
