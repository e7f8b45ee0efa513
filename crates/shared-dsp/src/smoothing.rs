//! Linear parameter ramps for real-time audio.
//!
//! A new target is reached in a fixed number of samples, avoiding zipper
//! noise when engine coefficients change between blocks.

/// Value that ramps linearly to its target over a fixed sample count.
#[derive(Debug, Clone)]
pub struct LinearSmoother {
    current: f32,
    target: f32,
    step: f32,
    countdown: u32,
    steps_to_target: u32,
}

impl LinearSmoother {
    /// Create a smoother resting at `initial`. Until [`reset`](Self::reset)
    /// is called with a ramp length, new targets are applied immediately.
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            step: 0.0,
            countdown: 0,
            steps_to_target: 0,
        }
    }

    /// Set the ramp length and snap to the current target.
    pub fn reset(&mut self, sample_rate: f64, ramp_secs: f64) {
        self.steps_to_target = (ramp_secs * sample_rate).floor().max(0.0) as u32;
        self.set_current_and_target(self.target);
    }

    /// Jump straight to `value` with no ramp.
    pub fn set_current_and_target(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.countdown = 0;
    }

    /// Start ramping toward `value`. Setting the same target again is a no-op.
    pub fn set_target(&mut self, value: f32) {
        if value == self.target {
            return;
        }
        if self.steps_to_target == 0 {
            self.set_current_and_target(value);
            return;
        }
        self.target = value;
        self.countdown = self.steps_to_target;
        self.step = (self.target - self.current) / self.countdown as f32;
    }

    /// Advance one sample and return the new value.
    #[inline]
    pub fn next(&mut self) -> f32 {
        if self.countdown == 0 {
            return self.target;
        }
        self.countdown -= 1;
        if self.countdown > 0 {
            self.current += self.step;
        } else {
            self.current = self.target;
        }
        self.current
    }

    pub fn is_smoothing(&self) -> bool {
        self.countdown > 0
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }
}
