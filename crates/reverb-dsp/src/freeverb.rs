//! Freeverb-topology stereo reverb.
//!
//! Eight parallel lowpass-feedback combs feed four series allpasses per
//! channel. The right channel's delay lines are offset by a fixed spread to
//! decorrelate the two sides. Coefficients are ramped over 10 ms so a new
//! `ReverbSettings` every block never clicks.

use shared_dsp::{DelayLine, LinearSmoother};

use crate::engine::ReverbEngine;
use crate::settings::ReverbSettings;

const NUM_COMBS: usize = 8;
const NUM_ALLPASSES: usize = 4;

/// Tunings in samples at the reference rate.
const COMB_TUNINGS: [usize; NUM_COMBS] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
const ALLPASS_TUNINGS: [usize; NUM_ALLPASSES] = [556, 441, 341, 225];
const STEREO_SPREAD: usize = 23;
const REFERENCE_RATE: usize = 44100;

const ALLPASS_FEEDBACK: f32 = 0.5;
const INPUT_GAIN: f32 = 0.015;
const WET_SCALE: f32 = 3.0;
const DRY_SCALE: f32 = 2.0;
const DAMP_SCALE: f32 = 0.4;
const ROOM_SCALE: f32 = 0.28;
const ROOM_OFFSET: f32 = 0.7;
const SMOOTHING_SECS: f64 = 0.01;

#[inline]
fn flush_denormal(x: f32) -> f32 {
    if x.is_subnormal() {
        0.0
    } else {
        x
    }
}

/// Tuning rescaled to `sample_rate`, saturating on absurd rates.
fn scaled_length(tuning: usize, sample_rate: f64) -> usize {
    (sample_rate.trunc() * tuning as f64 / REFERENCE_RATE as f64) as usize
}

struct CombFilter {
    line: DelayLine,
    last: f32,
}

impl CombFilter {
    fn new() -> Self {
        Self {
            line: DelayLine::new(1),
            last: 0.0,
        }
    }

    fn resize(&mut self, len: usize) {
        self.line.resize(len);
        self.last = 0.0;
    }

    fn clear(&mut self) {
        self.line.clear();
        self.last = 0.0;
    }

    #[inline]
    fn process(&mut self, input: f32, damp: f32, feedback: f32) -> f32 {
        let output = self.line.front();
        self.last = flush_denormal(output * (1.0 - damp) + self.last * damp);
        self.line.push(flush_denormal(input + self.last * feedback));
        output
    }
}

struct AllPassFilter {
    line: DelayLine,
}

impl AllPassFilter {
    fn new() -> Self {
        Self {
            line: DelayLine::new(1),
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let buffered = self.line.front();
        self.line.push(flush_denormal(input + buffered * ALLPASS_FEEDBACK));
        buffered - input
    }
}

/// Stereo comb/allpass reverb.
pub struct Freeverb {
    combs: [[CombFilter; NUM_COMBS]; 2],
    allpasses: [[AllPassFilter; NUM_ALLPASSES]; 2],
    damping: LinearSmoother,
    feedback: LinearSmoother,
    dry_gain: LinearSmoother,
    wet_gain1: LinearSmoother,
    wet_gain2: LinearSmoother,
    input_gain: f32,
    settings: ReverbSettings,
    sample_rate: f64,
}

impl Default for Freeverb {
    fn default() -> Self {
        Self::new()
    }
}

impl Freeverb {
    /// Engine configured for 44.1 kHz with default settings.
    pub fn new() -> Self {
        let mut engine = Self {
            combs: std::array::from_fn(|_| std::array::from_fn(|_| CombFilter::new())),
            allpasses: std::array::from_fn(|_| std::array::from_fn(|_| AllPassFilter::new())),
            damping: LinearSmoother::new(0.0),
            feedback: LinearSmoother::new(0.0),
            dry_gain: LinearSmoother::new(0.0),
            wet_gain1: LinearSmoother::new(0.0),
            wet_gain2: LinearSmoother::new(0.0),
            input_gain: INPUT_GAIN,
            settings: ReverbSettings::default(),
            sample_rate: REFERENCE_RATE as f64,
        };
        engine.apply(&ReverbSettings::default());
        engine.set_sample_rate(REFERENCE_RATE as f64);
        engine
    }

    /// Resize every delay line for `sample_rate` and snap the coefficient ramps.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        for (channel, spread) in [0, STEREO_SPREAD].into_iter().enumerate() {
            for (comb, tuning) in self.combs[channel].iter_mut().zip(COMB_TUNINGS) {
                comb.resize(scaled_length(tuning + spread, sample_rate));
            }
            for (allpass, tuning) in self.allpasses[channel].iter_mut().zip(ALLPASS_TUNINGS) {
                allpass.line.resize(scaled_length(tuning + spread, sample_rate));
            }
        }

        for smoother in [
            &mut self.damping,
            &mut self.feedback,
            &mut self.dry_gain,
            &mut self.wet_gain1,
            &mut self.wet_gain2,
        ] {
            smoother.reset(sample_rate, SMOOTHING_SECS);
        }
        self.sample_rate = sample_rate;
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// The settings most recently applied.
    pub fn settings(&self) -> &ReverbSettings {
        &self.settings
    }

    /// Delay lengths of the left and right comb banks, in samples.
    pub fn comb_lengths(&self) -> [[usize; NUM_COMBS]; 2] {
        std::array::from_fn(|ch| std::array::from_fn(|i| self.combs[ch][i].line.len()))
    }

    fn update_damping(&mut self) {
        if self.settings.freeze {
            self.damping.set_target(0.0);
            self.feedback.set_target(1.0);
        } else {
            self.damping.set_target(self.settings.damping * DAMP_SCALE);
            self.feedback
                .set_target(self.settings.room_size * ROOM_SCALE + ROOM_OFFSET);
        }
    }
}

impl ReverbEngine for Freeverb {
    fn prepare(&mut self, sample_rate: f64, _max_block_size: usize) {
        self.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        for comb in self.combs.iter_mut().flatten() {
            comb.clear();
        }
        for allpass in self.allpasses.iter_mut().flatten() {
            allpass.line.clear();
        }
    }

    fn apply(&mut self, settings: &ReverbSettings) {
        let wet = settings.wet_level * WET_SCALE;
        self.dry_gain.set_target(settings.dry_level * DRY_SCALE);
        self.wet_gain1.set_target(0.5 * wet * (1.0 + settings.width));
        self.wet_gain2.set_target(0.5 * wet * (1.0 - settings.width));
        self.input_gain = if settings.freeze { 0.0 } else { INPUT_GAIN };
        self.settings = *settings;
        self.update_damping();
    }

    #[inline]
    fn process_frame(&mut self, left: f32, right: f32) -> (f32, f32) {
        let input = (left + right) * self.input_gain;
        let damp = self.damping.next();
        let feedback = self.feedback.next();

        let [combs_l, combs_r] = &mut self.combs;
        let mut out_l = 0.0;
        let mut out_r = 0.0;
        for (comb_l, comb_r) in combs_l.iter_mut().zip(combs_r.iter_mut()) {
            out_l += comb_l.process(input, damp, feedback);
            out_r += comb_r.process(input, damp, feedback);
        }

        let [allpasses_l, allpasses_r] = &mut self.allpasses;
        for (ap_l, ap_r) in allpasses_l.iter_mut().zip(allpasses_r.iter_mut()) {
            out_l = ap_l.process(out_l);
            out_r = ap_r.process(out_r);
        }

        let dry = self.dry_gain.next();
        let wet1 = self.wet_gain1.next();
        let wet2 = self.wet_gain2.next();

        (
            out_l * wet1 + out_r * wet2 + left * dry,
            out_r * wet1 + out_l * wet2 + right * dry,
        )
    }
}
