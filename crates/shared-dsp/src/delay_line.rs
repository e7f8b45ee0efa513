//! Fixed-length circular delay line for feedback filters.
//!
//! The buffer is sized once during setup; reading and writing on the
//! audio thread never allocates.

/// Circular buffer delaying its input by exactly `len()` samples.
pub struct DelayLine {
    data: Vec<f32>,
    pos: usize,
}

impl DelayLine {
    /// Create a delay line of `len` samples (at least one).
    pub fn new(len: usize) -> Self {
        Self {
            data: vec![0.0; len.max(1)],
            pos: 0,
        }
    }

    /// Change the delay length and clear the contents.
    ///
    /// Allocates when growing, so only call this outside the audio callback.
    pub fn resize(&mut self, len: usize) {
        self.data.clear();
        self.data.resize(len.max(1), 0.0);
        self.pos = 0;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The oldest sample, i.e. the one written `len()` pushes ago.
    #[inline]
    pub fn front(&self) -> f32 {
        self.data[self.pos]
    }

    /// Overwrite the oldest sample and advance.
    #[inline]
    pub fn push(&mut self, sample: f32) {
        self.data[self.pos] = sample;
        self.pos += 1;
        if self.pos >= self.data.len() {
            self.pos = 0;
        }
    }

    /// Zero the contents without changing the length.
    pub fn clear(&mut self) {
        self.data.fill(0.0);
        self.pos = 0;
    }
}
