use std::time::Duration;

/// Base duration of the press ripple expansion.
const EXPAND_SECONDS: f32 = 0.4;

/// Base duration of the press ripple fade out.
const FADE_SECONDS: f32 = 0.3;

/// Timing of ripple animations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleConfig {
    /// Speed multiplier for ripple expansion (higher = faster)
    pub expand_speed: f32,
    /// Speed multiplier for ripple fade out (higher = faster)
    pub fade_speed: f32,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            expand_speed: 1.0,
            fade_speed: 1.0,
        }
    }
}

impl RippleConfig {
    /// Create a new ripple config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expand_speed(mut self, speed: f32) -> Self {
        self.expand_speed = speed;
        self
    }

    pub fn fade_speed(mut self, speed: f32) -> Self {
        self.fade_speed = speed;
        self
    }

    pub fn expand_duration(&self) -> Duration {
        Duration::from_secs_f32(EXPAND_SECONDS / self.expand_speed.max(f32::EPSILON))
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_secs_f32(FADE_SECONDS / self.fade_speed.max(f32::EPSILON))
    }
}
