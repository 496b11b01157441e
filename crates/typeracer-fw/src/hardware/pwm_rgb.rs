use super::traits::ColorLed;
use embassy_stm32::timer::GeneralInstance4Channel;
use embassy_stm32::timer::simple_pwm::SimplePwmChannel;
use typeracer_core::Rgb;

/// Common-cathode RGB LED on three PWM channels of one timer. Channel
/// intensity maps linearly onto duty cycle, 255 being fully on.
pub struct PwmRgb<'d, T: GeneralInstance4Channel> {
    red: SimplePwmChannel<'d, T>,
    green: SimplePwmChannel<'d, T>,
    blue: SimplePwmChannel<'d, T>,
}

impl<'d, T: GeneralInstance4Channel> PwmRgb<'d, T> {
    pub fn new(
        mut red: SimplePwmChannel<'d, T>,
        mut green: SimplePwmChannel<'d, T>,
        mut blue: SimplePwmChannel<'d, T>,
    ) -> Self {
        red.enable();
        green.enable();
        blue.enable();
        let mut rgb = Self { red, green, blue };
        rgb.set_color(Rgb::OFF);
        rgb
    }
}

impl<'d, T: GeneralInstance4Channel> ColorLed for PwmRgb<'d, T> {
    fn set_color(&mut self, color: Rgb) {
        self.red.set_duty_cycle_fraction(color.r as u16, 255);
        self.green.set_duty_cycle_fraction(color.g as u16, 255);
        self.blue.set_duty_cycle_fraction(color.b as u16, 255);
    }
}
