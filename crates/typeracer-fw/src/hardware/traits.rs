use typeracer_core::Rgb;

pub trait Led {
    fn on(&mut self);
    fn off(&mut self);
    fn toggle(&mut self);

    fn set(&mut self, lit: bool) {
        if lit { self.on() } else { self.off() }
    }
}

pub trait Button {
    fn is_pressed(&self) -> bool;
}

/// Tri-channel intensity output, 0-255 per channel.
pub trait ColorLed {
    fn set_color(&mut self, color: Rgb);
}
