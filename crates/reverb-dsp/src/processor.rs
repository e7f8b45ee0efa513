//! Block processor: snapshot -> settings -> engine, once per audio buffer.

use no_denormals::no_denormals;

use crate::engine::ReverbEngine;
use crate::freeverb::Freeverb;
use crate::params::ParamSnapshot;
use crate::settings::map_settings;

/// Stereo in, stereo out. Nothing else is offered to hosts.
pub const NUM_CHANNELS: usize = 2;

/// How long the effect may keep ringing after the input goes silent.
pub const TAIL_LENGTH_SECS: f64 = 10.0;

/// Layout negotiation: only 2-in/2-out is accepted.
pub fn supports_layout(input_channels: usize, output_channels: usize) -> bool {
    input_channels == NUM_CHANNELS && output_channels == NUM_CHANNELS
}

/// Drives a reverb engine from per-block parameter snapshots.
///
/// `process` is real-time safe: it does not lock or allocate, and it runs
/// with denormals flushed to zero.
pub struct StereoReverb<E = Freeverb> {
    engine: E,
    sample_rate: f64,
    max_block_size: usize,
    prepared: bool,
}

impl StereoReverb<Freeverb> {
    pub fn new() -> Self {
        Self::with_engine(Freeverb::new())
    }
}

impl Default for StereoReverb<Freeverb> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ReverbEngine> StereoReverb<E> {
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            sample_rate: 0.0,
            max_block_size: 0,
            prepared: false,
        }
    }

    /// Reset the engine and configure it for `sample_rate`.
    pub fn setup(&mut self, sample_rate: f64, max_block_size: usize) {
        self.engine.reset();
        self.engine.prepare(sample_rate, max_block_size);
        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size;
        self.prepared = true;
    }

    /// Clear the reverb tail, keeping the current configuration.
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    pub fn teardown(&mut self) {
        self.engine.release();
        self.prepared = false;
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Process one planar stereo block in place. Before `setup` the buffer
    /// is left as is.
    pub fn process(&mut self, snapshot: &ParamSnapshot, left: &mut [f32], right: &mut [f32]) {
        if !self.prepared {
            return;
        }
        let engine = &mut self.engine;
        no_denormals(|| {
            engine.apply(&map_settings(snapshot));
            engine.process_stereo(left, right);
        });
    }

    /// Process one interleaved `[L, R, ...]` block in place.
    pub fn process_interleaved(&mut self, snapshot: &ParamSnapshot, samples: &mut [f32]) {
        if !self.prepared {
            return;
        }
        let engine = &mut self.engine;
        no_denormals(|| {
            engine.apply(&map_settings(snapshot));
            engine.process_interleaved(samples);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ReverbSettings;

    /// Engine stub that records calls and scales samples by the wet level.
    #[derive(Default)]
    struct Recorder {
        prepared_at: Option<(f64, usize)>,
        resets: usize,
        releases: usize,
        applied: Vec<ReverbSettings>,
    }

    impl ReverbEngine for Recorder {
        fn prepare(&mut self, sample_rate: f64, max_block_size: usize) {
            self.prepared_at = Some((sample_rate, max_block_size));
        }

        fn reset(&mut self) {
            self.resets += 1;
        }

        fn apply(&mut self, settings: &ReverbSettings) {
            self.applied.push(*settings);
        }

        fn process_frame(&mut self, left: f32, right: f32) -> (f32, f32) {
            let wet = self.applied.last().map_or(0.0, |s| s.wet_level);
            (left * wet, right * wet)
        }

        fn release(&mut self) {
            self.releases += 1;
        }
    }

    #[test]
    fn layout_negotiation() {
        assert!(supports_layout(2, 2));
        assert!(!supports_layout(1, 1));
        assert!(!supports_layout(1, 2));
        assert!(!supports_layout(2, 1));
        assert!(!supports_layout(6, 6));
        assert!(!supports_layout(0, 2));
    }

    #[test]
    fn setup_resets_then_prepares() {
        let mut reverb = StereoReverb::with_engine(Recorder::default());
        assert!(!reverb.is_prepared());
        reverb.setup(48000.0, 256);
        assert!(reverb.is_prepared());
        assert_eq!(reverb.engine().resets, 1);
        assert_eq!(reverb.engine().prepared_at, Some((48000.0, 256)));
        assert_eq!(reverb.sample_rate(), 48000.0);
        assert_eq!(reverb.max_block_size(), 256);
    }

    #[test]
    fn untouched_before_setup() {
        let mut reverb = StereoReverb::with_engine(Recorder::default());
        let mut left = vec![1.0; 8];
        let mut right = vec![1.0; 8];
        reverb.process(&ParamSnapshot::default(), &mut left, &mut right);
        assert_eq!(left, vec![1.0; 8]);
        assert!(reverb.engine().applied.is_empty());
    }

    #[test]
    fn settings_recomputed_every_block() {
        let mut reverb = StereoReverb::with_engine(Recorder::default());
        reverb.setup(44100.0, 64);
        let mut left = vec![1.0; 64];
        let mut right = vec![1.0; 64];

        let first = ParamSnapshot {
            room_size: 0.0,
            decay_time: 10.0,
        };
        let second = ParamSnapshot {
            room_size: 1.0,
            decay_time: 0.1,
        };
        reverb.process(&first, &mut left, &mut right);
        reverb.process(&second, &mut left, &mut right);
        reverb.process(&second, &mut left, &mut right);

        let applied = &reverb.engine().applied;
        assert_eq!(applied.len(), 3);
        assert_eq!(applied[0], map_settings(&first));
        assert_eq!(applied[1], map_settings(&second));
        assert_eq!(applied[1], applied[2]);
    }

    #[test]
    fn engine_runs_in_place() {
        let mut reverb = StereoReverb::with_engine(Recorder::default());
        reverb.setup(44100.0, 4);
        let mut left = vec![1.0; 4];
        let mut right = vec![2.0; 4];
        let snapshot = ParamSnapshot {
            room_size: 1.0,
            decay_time: 2.0,
        };
        reverb.process(&snapshot, &mut left, &mut right);
        let wet = map_settings(&snapshot).wet_level;
        assert!(left.iter().all(|&s| s == wet));
        assert!(right.iter().all(|&s| s == 2.0 * wet));
    }

    #[test]
    fn interleaved_block() {
        let mut reverb = StereoReverb::with_engine(Recorder::default());
        reverb.setup(44100.0, 4);
        let mut buf = vec![1.0, 2.0, 1.0, 2.0];
        reverb.process_interleaved(&ParamSnapshot::default(), &mut buf);
        let wet = map_settings(&ParamSnapshot::default()).wet_level;
        assert_eq!(buf, vec![wet, 2.0 * wet, wet, 2.0 * wet]);
    }

    #[test]
    fn teardown_releases_and_unprepares() {
        let mut reverb = StereoReverb::with_engine(Recorder::default());
        reverb.setup(44100.0, 64);
        reverb.teardown();
        assert!(!reverb.is_prepared());
        assert_eq!(reverb.engine().releases, 1);

        let mut left = vec![1.0; 4];
        let mut right = vec![1.0; 4];
        reverb.process(&ParamSnapshot::default(), &mut left, &mut right);
        assert_eq!(left, vec![1.0; 4]);
    }

    #[test]
    fn freeverb_processes_after_setup() {
        let mut reverb = StereoReverb::new();
        reverb.setup(44100.0, 512);
        let mut left = vec![0.0; 512];
        let mut right = vec![0.0; 512];
        left[0] = 1.0;
        reverb.process(&ParamSnapshot::default(), &mut left, &mut right);
        // the dry path carries the impulse straight through
        assert!(left[0] > 0.0);
        assert!(left.iter().chain(right.iter()).all(|s| s.is_finite()));
    }

    /// Run `left`/`right` through a fresh reverb, `block_size` frames at a time.
    fn render(
        left: &[f32],
        right: &[f32],
        snapshot: &ParamSnapshot,
        sample_rate: f64,
        block_size: usize,
    ) -> (Vec<f32>, Vec<f32>) {
        let mut out_l = left.to_vec();
        let mut out_r = right.to_vec();
        let mut reverb = StereoReverb::new();
        reverb.setup(sample_rate, block_size);
        for (l, r) in out_l
            .chunks_mut(block_size)
            .zip(out_r.chunks_mut(block_size))
        {
            reverb.process(snapshot, l, r);
        }
        (out_l, out_r)
    }

    #[test]
    fn block_size_does_not_change_output() {
        let signal: Vec<f32> = (0..5000).map(|i| ((i % 97) as f32 / 97.0) - 0.5).collect();
        let snapshot = ParamSnapshot {
            room_size: 0.8,
            decay_time: 5.0,
        };
        let (a_l, a_r) = render(&signal, &signal, &snapshot, 48000.0, 64);
        let (b_l, b_r) = render(&signal, &signal, &snapshot, 48000.0, 1024);
        assert_eq!(a_l, b_l);
        assert_eq!(a_r, b_r);
    }

    #[test]
    fn longer_decay_rings_longer() {
        let tail_energy = |decay_time: f32| -> f64 {
            let snapshot = ParamSnapshot {
                room_size: 0.5,
                decay_time,
            };
            let mut impulse = vec![0.0; 44100];
            impulse[0] = 1.0;
            let (l, _) = render(&impulse, &impulse, &snapshot, 44100.0, 512);
            l[22050..].iter().map(|&s| (s as f64) * (s as f64)).sum()
        };
        assert!(tail_energy(10.0) > tail_energy(0.1));
    }
}
