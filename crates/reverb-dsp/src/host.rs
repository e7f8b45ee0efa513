//! Host-facing processing interface and the factory that builds the effect.

use std::sync::Arc;

use crate::params::ParamSnapshot;
use crate::processor::{self, StereoReverb, TAIL_LENGTH_SECS};
use crate::state::{decode_state, encode_state};
use crate::store::ParameterStore;

/// Capability set a host drives an effect instance through.
///
/// The host never calls `process` concurrently with itself or with
/// `setup`/`teardown`, and only calls `setup` with a layout that
/// `supports_layout` accepted.
pub trait AudioProcessor: Send {
    fn setup(&mut self, sample_rate: f64, max_block_size: usize);

    /// Process planar stereo in place.
    fn process(&mut self, left: &mut [f32], right: &mut [f32]);

    /// Process interleaved stereo in place.
    fn process_interleaved(&mut self, samples: &mut [f32]);

    fn teardown(&mut self);

    /// Serialize the current parameter values.
    fn get_state(&self) -> Vec<u8>;

    /// Restore parameter values. Malformed data is ignored and the current
    /// values are kept.
    fn set_state(&mut self, data: &[u8]);

    fn supports_layout(&self, input_channels: usize, output_channels: usize) -> bool {
        processor::supports_layout(input_channels, output_channels)
    }

    fn tail_length_seconds(&self) -> f64 {
        TAIL_LENGTH_SECS
    }
}

/// The stereo reverb with its own parameter store.
pub struct ReverbProcessor {
    params: Arc<ParameterStore>,
    reverb: StereoReverb,
}

impl Default for ReverbProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReverbProcessor {
    pub fn new() -> Self {
        Self {
            params: Arc::new(ParameterStore::new()),
            reverb: StereoReverb::new(),
        }
    }

    /// Shared handle for an editor or automation thread.
    pub fn params(&self) -> Arc<ParameterStore> {
        Arc::clone(&self.params)
    }

    pub fn snapshot(&self) -> ParamSnapshot {
        self.params.snapshot()
    }
}

impl AudioProcessor for ReverbProcessor {
    fn setup(&mut self, sample_rate: f64, max_block_size: usize) {
        log::debug!("reverb setup: {sample_rate} Hz, max block {max_block_size}");
        self.reverb.setup(sample_rate, max_block_size);
    }

    fn process(&mut self, left: &mut [f32], right: &mut [f32]) {
        let snapshot = self.params.snapshot();
        self.reverb.process(&snapshot, left, right);
    }

    fn process_interleaved(&mut self, samples: &mut [f32]) {
        let snapshot = self.params.snapshot();
        self.reverb.process_interleaved(&snapshot, samples);
    }

    fn teardown(&mut self) {
        self.reverb.teardown();
    }

    fn get_state(&self) -> Vec<u8> {
        match encode_state(&self.params.snapshot()) {
            Ok(blob) => blob,
            Err(err) => {
                log::error!("failed to serialize reverb state: {err}");
                Vec::new()
            }
        }
    }

    fn set_state(&mut self, data: &[u8]) {
        match decode_state(data) {
            Ok(snapshot) => self.params.replace(&snapshot),
            Err(err) => log::warn!("ignoring saved reverb state: {err}"),
        }
    }
}

/// Build a new effect instance.
pub fn create_processor() -> Box<dyn AudioProcessor> {
    Box::new(ReverbProcessor::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::STATE_MAGIC;

    #[test]
    fn factory_builds_stereo_only_processor() {
        let processor = create_processor();
        assert!(processor.supports_layout(2, 2));
        assert!(!processor.supports_layout(1, 1));
        assert!(!processor.supports_layout(2, 6));
        assert_eq!(processor.tail_length_seconds(), 10.0);
    }

    #[test]
    fn state_round_trip_into_fresh_instance() {
        let original = ReverbProcessor::new();
        original.params().set_room_size(0.7);
        original.params().set_decay_time(3.5);
        let blob = original.get_state();

        let mut fresh = create_processor();
        fresh.set_state(&blob);
        let restored = decode_state(&fresh.get_state()).unwrap();
        assert_eq!(restored.room_size, 0.7);
        assert_eq!(restored.decay_time, 3.5);
        assert_eq!(restored, original.snapshot());
    }

    #[test]
    fn malformed_state_keeps_current_values() {
        let mut processor = ReverbProcessor::new();
        processor.params().set_room_size(0.9);
        processor.params().set_decay_time(6.0);
        let before = processor.snapshot();

        let mut wrong_tag = STATE_MAGIC.to_vec();
        let payload = br#"{"tag":"Other","params":{"ROOM_SIZE":0.1,"DECAY":0.5}}"#;
        wrong_tag.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        wrong_tag.extend_from_slice(payload);

        let garbage: Vec<u8> = (0u8..64).collect();
        for blob in [Vec::new(), garbage, wrong_tag, vec![b'S', b'R', b'V', b'B']] {
            processor.set_state(&blob);
            assert_eq!(processor.snapshot(), before);
        }
    }

    #[test]
    fn processes_with_live_parameter_values() {
        let mut processor = ReverbProcessor::new();
        processor.setup(44100.0, 256);
        let params = processor.params();

        let mut left = vec![0.0; 256];
        let mut right = vec![0.0; 256];
        left[0] = 1.0;
        right[0] = 1.0;
        processor.process(&mut left, &mut right);
        assert!(left.iter().all(|s| s.is_finite()));

        params.set_room_size(1.0);
        let mut buf = vec![0.5; 512];
        processor.process_interleaved(&mut buf);
        assert!(buf.iter().all(|s| s.is_finite()));
        processor.teardown();
    }
}
