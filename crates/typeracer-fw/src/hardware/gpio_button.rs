use super::traits::Button;
use embassy_stm32::gpio::Input;

/// A tactile button wired idle-high (internal pull-up): a press pulls the
/// pin low. Debouncing happens in `typeracer_core::Debouncer`, fed from
/// `is_pressed` samples.
pub struct GpioButton<'d> {
    pin: Input<'d>,
}

impl<'d> GpioButton<'d> {
    pub fn new(pin: Input<'d>) -> Self {
        Self { pin }
    }
}

impl<'d> Button for GpioButton<'d> {
    fn is_pressed(&self) -> bool {
        self.pin.is_low()
    }
}
