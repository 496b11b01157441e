//! STM32F103 Blue Pill Typeracer
//! =============================================================================================
//!
//! A round-based typing game played over a serial terminal:
//! - Two tactile buttons: start/stop and difficulty select
//! - RGB status LED driven by TIM2 PWM
//! - USART1 carries the prompts out and the typed words back
//!
//! Hardware Connections:
//!   RGB LED (common cathode):
//!      R    -> PA0 (TIM2_CH1)
//!      G    -> PA1 (TIM2_CH2)
//!      B    -> PA2 (TIM2_CH3)
//!
//!   Buttons (to GND, internal pull-up):
//!      Start/Stop  -> PB0
//!      Difficulty  -> PB1
//!
//!   Serial (9600 8N1 to the host terminal):
//!      TX   -> PA9
//!      RX   -> PA10
//!
//! Gameplay:
//! 1. While idle the LED is white; the difficulty button cycles
//!    Easy/Medium/Hard (5s/3s/1.5s per word)
//! 2. Start press runs a 3 second yellow countdown, then 30 seconds of play
//! 3. Each prompt must be typed back before its timer expires; a correct
//!    word scores, flashes green and draws the next word, a wrong one
//!    flashes red and leaves the prompt timer running
//! 4. Stop press ends the round early; the final score is printed

#![no_std]
#![no_main]

use core::fmt::Write;
use defmt_rtt as _; // Global logger
use embassy_executor::Spawner;
use embassy_stm32::{
    bind_interrupts,
    gpio::{Input, OutputType, Pull},
    peripherals,
    time::Hertz,
    timer::simple_pwm::{PwmPin, SimplePwm},
    usart::{self, BufferedInterruptHandler, BufferedUart, BufferedUartRx, BufferedUartTx},
};
use embassy_sync::{
    blocking_mutex::raw::ThreadModeRawMutex,
    channel::{Channel, Sender},
};
use embassy_time::{Duration, Instant, Ticker};
use embedded_io_async::{Read, Write as _};
use heapless::String;
use panic_probe as _; // Panic handler
use static_cell::StaticCell;

use typeracer_core::{
    ButtonEvent, Debouncer, Edge, Events, GameEvent, Line, RoundController,
    config::DEBOUNCE_MS,
};
use typeracer_fw::hardware::{
    gpio_button::GpioButton,
    pwm_rgb::PwmRgb,
    traits::{Button, ColorLed},
};

// Channel for debounced button presses
static BUTTON_CHANNEL: Channel<ThreadModeRawMutex, ButtonEvent, 4> = Channel::new();

// Channel for complete lines typed by the player
static LINE_CHANNEL: Channel<ThreadModeRawMutex, Line, 2> = Channel::new();

static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main application entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    // Initialize peripherals with default configuration
    let p = embassy_stm32::init(Default::default());

    defmt::info!("typeracer started");

    // Bind USART interrupt handler
    bind_interrupts!(struct Irqs {
        USART1 => BufferedInterruptHandler<peripherals::USART1>;
    });

    // Serial link to the player's terminal
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = 9_600;
    let uart = BufferedUart::new(
        p.USART1,
        Irqs,
        p.PA10,
        p.PA9,
        TX_BUF.init([0; 64]),
        RX_BUF.init([0; 64]),
        uart_config,
    )
    .unwrap();
    let (mut tx, rx) = uart.split();

    // RGB status LED on TIM2 PWM, one channel per color
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

    // Buttons idle high, press pulls to ground
    let start_stop = GpioButton::new(Input::new(p.PB0, Pull::Up));
    let difficulty = GpioButton::new(Input::new(p.PB1, Pull::Up));

    _spawner
        .spawn(button_task(
            start_stop,
            ButtonEvent::StartStop,
            BUTTON_CHANNEL.sender(),
            Duration::from_millis(10), // Polling interval
        ))
        .unwrap();

    _spawner
        .spawn(button_task(
            difficulty,
            ButtonEvent::Difficulty,
            BUTTON_CHANNEL.sender(),
            Duration::from_millis(10),
        ))
        .unwrap();

    _spawner
        .spawn(line_reader(rx, LINE_CHANNEL.sender()))
        .unwrap();

    let mut game = RoundController::new(Instant::now().as_ticks());
    let mut ticker = Ticker::every(Duration::from_millis(10));

    // Cooperative game loop: drain button presses, feed at most one pending
    // line into the controller, report what happened, refresh the LED.
    loop {
        let now = Instant::now().as_millis() as u32;
        let mut events = Events::new();

        while let Ok(button) = BUTTON_CHANNEL.try_receive() {
            game.handle_button(button, now, &mut events);
        }

        let mut pending = LINE_CHANNEL.try_receive().ok();
        game.tick(now, &mut pending, &mut events);

        for event in &events {
            report(&mut tx, event).await;
        }

        rgb.set_color(game.indicator(now));
        ticker.next().await;
    }
}

/// Button Sampling Task
///
/// One instance per physical button. Samples the raw level on a fixed
/// ticker, runs it through the debouncer and forwards each accepted press
/// (falling edge, the buttons idle high) as a single event.
#[embassy_executor::task(pool_size = 2)]
async fn button_task(
    button: GpioButton<'static>,
    event: ButtonEvent,
    sender: Sender<'static, ThreadModeRawMutex, ButtonEvent, 4>,
    poll: Duration,
) {
    let mut debouncer = Debouncer::new(true, DEBOUNCE_MS);
    let mut ticker = Ticker::every(poll);

    loop {
        let now = Instant::now().as_millis() as u32;
        if debouncer.poll(!button.is_pressed(), now) == Some(Edge::Falling) {
            sender.send(event).await;
        }
        ticker.next().await;
    }
}

/// Serial Line Assembly Task
///
/// Collects bytes from the UART into a bounded buffer and forwards one
/// complete line per newline. Bytes beyond the line cap are dropped; an
/// overlong line cannot match any word, so nothing is lost.
#[embassy_executor::task]
async fn line_reader(
    mut rx: BufferedUartRx<'static>,
    sender: Sender<'static, ThreadModeRawMutex, Line, 2>,
) {
    let mut line = Line::new();
    let mut byte = [0u8; 1];

    loop {
        let Ok(n) = rx.read(&mut byte).await else {
            line.clear();
            continue;
        };
        if n == 0 {
            continue;
        }
        if byte[0] == b'\n' {
            sender.send(core::mem::take(&mut line)).await;
        } else {
            let _ = line.push(byte[0] as char);
        }
    }
}

/// Prints one game event to the player's terminal and the debug log.
async fn report(tx: &mut BufferedUartTx<'static>, event: &GameEvent) {
    defmt::info!("game event: {}", event);

    let mut msg: String<96> = String::new();
    match *event {
        GameEvent::DifficultyChanged(difficulty) => {
            let _ = write!(
                msg,
                "{} mode on! ({}ms per word)\r\n",
                difficulty.label(),
                difficulty.prompt_interval_ms()
            );
        }
        GameEvent::CountdownStarted => {
            let _ = write!(msg, "Game starting in:\r\n");
        }
        GameEvent::CountdownTick(secs) => {
            let _ = write!(msg, "{}\r\n", secs);
        }
        GameEvent::RoundStarted { prompt } | GameEvent::PromptMatched { prompt } => {
            let _ = write!(msg, "Type this word: {}\r\n", prompt);
        }
        GameEvent::PromptExpired { prompt } => {
            let _ = write!(
                msg,
                "New word timed out. Displaying next word.\r\nType this word: {}\r\n",
                prompt
            );
        }
        // The red flash is the only feedback for a miss
        GameEvent::PromptMissed => {}
        GameEvent::RoundEnded { correct } => {
            let _ = write!(msg, "Round ended. Correct words: {}\r\n", correct);
        }
    }

    if !msg.is_empty() {
        let _ = tx.write_all(msg.as_bytes()).await;
    }
}
