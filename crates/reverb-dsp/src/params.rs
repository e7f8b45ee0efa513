//! Parameter declarations for the stereo reverb.
//!
//! Both parameters are stored linearly. The skew only shapes how a knob's
//! travel maps onto the range; hosts and state blobs always see plain values.

use serde::{Deserialize, Serialize};

/// How a control's travel is distributed over the value range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Skew {
    /// Linear travel.
    None,
    /// `normalized = proportion ^ factor`. Below 1.0 gives the low end more travel.
    Factor(f32),
    /// Skew chosen so this plain value sits at the centre of the travel.
    MidPoint(f32),
}

/// Declaration of one continuous parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Stable id used by hosts and state blobs. Never change once published.
    pub id: &'static str,
    pub name: &'static str,
    /// Label shown next to the control.
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
    pub skew: Skew,
}

pub const ROOM_SIZE: ParamSpec = ParamSpec {
    id: "ROOM_SIZE",
    name: "Room Size",
    label: "Room Size",
    min: 0.0,
    max: 1.0,
    step: 0.001,
    default: 0.5,
    skew: Skew::Factor(0.7),
};

pub const DECAY_TIME: ParamSpec = ParamSpec {
    id: "DECAY",
    name: "Decay Time",
    label: "Decay Time (s)",
    min: 0.1,
    max: 10.0,
    step: 0.01,
    default: 2.0,
    skew: Skew::MidPoint(1.0),
};

/// Every declared parameter, in display order.
pub const ALL_PARAMS: [ParamSpec; 2] = [ROOM_SIZE, DECAY_TIME];

impl ParamSpec {
    /// Force `value` into range. NaN falls back to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }

    /// Clamp and round to the nearest step.
    ///
    /// Rounding happens in f64 so values already on the grid come back
    /// bit-identical.
    pub fn snap(&self, value: f32) -> f32 {
        let min = decimal(self.min);
        let step = decimal(self.step);
        let steps = ((self.clamp(value) as f64 - min) / step).round();
        self.clamp((min + steps * step) as f32)
    }

    /// Exponent applied to the linear proportion of the range.
    pub fn skew_factor(&self) -> f32 {
        match self.skew {
            Skew::None => 1.0,
            Skew::Factor(f) => f,
            Skew::MidPoint(mid) => {
                let proportion = (mid - self.min) / (self.max - self.min);
                0.5f32.ln() / proportion.ln()
            }
        }
    }

    /// Plain value to control position in [0, 1].
    pub fn to_normalized(&self, value: f32) -> f32 {
        let proportion = (self.clamp(value) - self.min) / (self.max - self.min);
        proportion.powf(self.skew_factor())
    }

    /// Control position in [0, 1] to a snapped plain value.
    pub fn from_normalized(&self, normalized: f32) -> f32 {
        let proportion = normalized.clamp(0.0, 1.0).powf(1.0 / self.skew_factor());
        self.snap(self.min + proportion * (self.max - self.min))
    }
}

/// Widen a declared constant, dropping the f32 representation error.
/// Declarations carry at most six decimals.
fn decimal(value: f32) -> f64 {
    (value as f64 * 1e6).round() / 1e6
}

/// Look up a declaration by its id.
pub fn spec_by_id(id: &str) -> Option<&'static ParamSpec> {
    ALL_PARAMS.iter().find(|spec| spec.id == id)
}

/// Read-only view of the parameter values for one processing block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamSnapshot {
    pub room_size: f32,
    /// Seconds.
    pub decay_time: f32,
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self {
            room_size: ROOM_SIZE.default,
            decay_time: DECAY_TIME.default,
        }
    }
}

impl ParamSnapshot {
    /// Copy with both values forced into their declared ranges.
    pub fn clamped(self) -> Self {
        Self {
            room_size: ROOM_SIZE.clamp(self.room_size),
            decay_time: DECAY_TIME.clamp(self.decay_time),
        }
    }
}
