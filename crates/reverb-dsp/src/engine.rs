//! Interface to the reverb engine driven by the block processor.

use crate::settings::ReverbSettings;

/// A stereo reverb engine.
///
/// `prepare` may allocate; every other method runs on the audio thread and
/// must not.
pub trait ReverbEngine: Send {
    /// Reconfigure for a sample rate. Called outside the audio callback.
    fn prepare(&mut self, sample_rate: f64, max_block_size: usize);

    /// Clear the reverb tail.
    fn reset(&mut self);

    /// Set new targets for the engine coefficients.
    fn apply(&mut self, settings: &ReverbSettings);

    /// Process one stereo frame.
    fn process_frame(&mut self, left: f32, right: f32) -> (f32, f32);

    /// Release anything held for processing.
    fn release(&mut self) {}

    /// Process planar stereo in place. Extra samples in the longer slice
    /// are left untouched.
    fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            (*l, *r) = self.process_frame(*l, *r);
        }
    }

    /// Process interleaved `[L, R, L, R, ...]` stereo in place. A trailing
    /// odd sample is left untouched.
    fn process_interleaved(&mut self, samples: &mut [f32]) {
        for frame in samples.chunks_exact_mut(2) {
            let (l, r) = self.process_frame(frame[0], frame[1]);
            frame[0] = l;
            frame[1] = r;
        }
    }
}
