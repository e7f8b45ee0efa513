//! Stereo reverb as a nih-plug VST3/CLAP plugin and standalone app.
//!
//! Wraps the reverb-dsp block processor. Every block takes a snapshot of
//! the two parameters, maps it to engine settings and runs the engine over
//! the host buffer in place. Host save/restore of the parameters goes
//! through nih-plug's own state handling.

mod gui;
pub mod params;

use nih_plug::prelude::*;
use reverb_dsp::StereoReverb;
use std::sync::Arc;

use params::ReverbPluginParams;

pub struct StereoReverbPlugin {
    params: Arc<ReverbPluginParams>,
    reverb: StereoReverb,
}

impl Default for StereoReverbPlugin {
    fn default() -> Self {
        Self {
            params: Arc::new(ReverbPluginParams::default()),
            reverb: StereoReverb::new(),
        }
    }
}

fn channel_count(channels: Option<NonZeroU32>) -> usize {
    channels.map_or(0, |c| c.get() as usize)
}

/// Reverb tail length in samples at `sample_rate`.
fn tail_samples(sample_rate: f64) -> u32 {
    (reverb_dsp::TAIL_LENGTH_SECS * sample_rate) as u32
}

impl Plugin for StereoReverbPlugin {
    const NAME: &'static str = "Stereo Reverb";
    const VENDOR: &'static str = "reverb-project";
    const URL: &'static str = "";
    const EMAIL: &'static str = "";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        // Stereo only
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),
            ..AudioIOLayout::const_default()
        },
    ];

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn editor(&mut self, _async_executor: AsyncExecutor<Self>) -> Option<Box<dyn Editor>> {
        gui::create(self.params.clone())
    }

    fn initialize(
        &mut self,
        layout: &AudioIOLayout,
        config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let inputs = channel_count(layout.main_input_channels);
        let outputs = channel_count(layout.main_output_channels);
        if !reverb_dsp::supports_layout(inputs, outputs) {
            nih_plug::nih_log!("Rejected {inputs}-in/{outputs}-out layout");
            return false;
        }

        self.reverb
            .setup(config.sample_rate as f64, config.max_buffer_size as usize);
        nih_plug::nih_log!(
            "Reverb ready at {} Hz, max block {}",
            config.sample_rate,
            config.max_buffer_size
        );
        true
    }

    fn reset(&mut self) {
        self.reverb.reset();
    }

    fn deactivate(&mut self) {
        self.reverb.teardown();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        let snapshot = self.params.snapshot();
        if let [left, right] = buffer.as_slice() {
            self.reverb.process(&snapshot, left, right);
        }
        ProcessStatus::Tail(tail_samples(self.reverb.sample_rate()))
    }
}

impl ClapPlugin for StereoReverbPlugin {
    const CLAP_ID: &'static str = "com.reverb-project.stereo-reverb";
    const CLAP_DESCRIPTION: Option<&'static str> = Some("Two-knob stereo reverb");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Reverb,
    ];
}

impl Vst3Plugin for StereoReverbPlugin {
    const VST3_CLASS_ID: [u8; 16] = *b"StereoReverbFx01";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Reverb];
}

nih_export_clap!(StereoReverbPlugin);
nih_export_vst3!(StereoReverbPlugin);
