//! Motion domain: coyote and jump-buffer timers.

use serde::Serialize;

/// Grace timers deciding whether a jump request may fire.
///
/// A jump is consumed only while both timers are positive; consuming zeroes
/// both, so repeated attempts within one tick fire at most once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct JumpTimer {
    coyote_remaining: f32,
    buffer_remaining: f32,
}

impl JumpTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full window while grounded, linear decay to zero otherwise.
    pub fn refresh_coyote(&mut self, grounded: bool, coyote_time: f32, dt: f32) {
        if grounded {
            self.coyote_remaining = coyote_time;
        } else {
            self.coyote_remaining = (self.coyote_remaining - dt).max(0.0);
        }
    }

    /// Decays every tick regardless of grounded state, stopping at zero.
    pub fn decay_buffer(&mut self, dt: f32) {
        self.buffer_remaining = (self.buffer_remaining - dt).max(0.0);
    }

    /// Remember a jump press for `buffer_time` seconds.
    pub fn arm_buffer(&mut self, buffer_time: f32) {
        self.buffer_remaining = buffer_time;
    }

    pub fn can_consume(&self) -> bool {
        self.buffer_remaining > 0.0 && self.coyote_remaining > 0.0
    }

    /// Returns true exactly once per armed press that meets a coyote window.
    pub fn try_consume(&mut self) -> bool {
        if !self.can_consume() {
            return false;
        }
        self.clear();
        true
    }

    pub fn clear(&mut self) {
        self.coyote_remaining = 0.0;
        self.buffer_remaining = 0.0;
    }

    pub fn coyote_remaining(&self) -> f32 {
        self.coyote_remaining
    }

    pub fn buffer_remaining(&self) -> f32 {
        self.buffer_remaining
    }
}
