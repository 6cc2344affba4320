//! GPIO HAL for the tuning buttons.

/// Tuning button identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
}

/// Button pin configuration.
#[derive(Debug, Clone, Copy)]
pub struct ButtonConfig {
    /// GPIO of the UP button
    pub up_pin: i32,
    /// GPIO of the DOWN button
    pub down_pin: i32,
    /// Enable internal pull-ups (buttons short to ground)
    pub pull_up: bool,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            up_pin: 5,
            down_pin: 6,
            pull_up: true,
        }
    }
}

/// Digital input for the two tuning buttons.
///
/// Buttons are active-low: a pressed button reads `false`.
pub trait ButtonInput {
    /// Raw pin level
    fn is_high(&mut self, button: Button) -> bool;

    /// Decoded press state
    #[inline]
    fn is_pressed(&mut self, button: Button) -> bool {
        !self.is_high(button)
    }
}
