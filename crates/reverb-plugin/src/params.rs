//! nih-plug parameter declarations for the Stereo Reverb plugin.
//!
//! Ranges, steps and defaults come from the reverb-dsp declarations. Host
//! ranges stay linear; the knob skew lives in the editor only.

use nih_plug::prelude::*;
use nih_plug_egui::EguiState;
use reverb_dsp::{ParamSnapshot, ParamSpec, DECAY_TIME, ROOM_SIZE};
use std::sync::Arc;

pub const EDITOR_WIDTH: u32 = 380;
pub const EDITOR_HEIGHT: u32 = 220;

#[derive(Params)]
pub struct ReverbPluginParams {
    #[persist = "editor-state"]
    pub editor_state: Arc<EguiState>,

    // ids must match reverb_dsp::ROOM_SIZE.id / DECAY_TIME.id
    #[id = "ROOM_SIZE"]
    pub room_size: FloatParam,
    #[id = "DECAY"]
    pub decay: FloatParam,
}

fn float_param(spec: &ParamSpec) -> FloatParam {
    FloatParam::new(
        spec.name,
        spec.default,
        FloatRange::Linear {
            min: spec.min,
            max: spec.max,
        },
    )
    .with_step_size(spec.step)
}

impl Default for ReverbPluginParams {
    fn default() -> Self {
        Self {
            editor_state: EguiState::from_size(EDITOR_WIDTH, EDITOR_HEIGHT),

            room_size: float_param(&ROOM_SIZE)
                .with_value_to_string(formatters::v2s_f32_rounded(3)),
            decay: float_param(&DECAY_TIME)
                .with_unit(" s")
                .with_value_to_string(formatters::v2s_f32_rounded(2)),
        }
    }
}

impl ReverbPluginParams {
    /// Read both values for the current block. Plain atomic loads, safe on
    /// the audio thread.
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            room_size: self.room_size.value(),
            decay_time: self.decay.value(),
        }
    }
}
