//! Mapping from the two user parameters to reverb engine settings.

use crate::params::ParamSnapshot;

/// Decay time (seconds) at which damping reaches zero.
pub const DECAY_DIVISOR: f32 = 10.0;
/// Wet level at room size 0; room size adds the same amount again at 1.
pub const WET_BASE: f32 = 0.33;
pub const WET_PER_ROOM: f32 = 0.33;
/// Fraction of the wet level taken off the dry level.
pub const DRY_COMPENSATION: f32 = 0.5;

/// Engine settings for one block. Derived every block, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbSettings {
    pub room_size: f32,
    /// High-frequency loss per reflection, 0..=1.
    pub damping: f32,
    pub wet_level: f32,
    pub dry_level: f32,
    /// Stereo width, 0..=1.
    pub width: f32,
    /// Sustain the tail indefinitely.
    pub freeze: bool,
}

impl Default for ReverbSettings {
    fn default() -> Self {
        map_settings(&ParamSnapshot::default())
    }
}

/// Map room size and decay time to engine settings.
///
/// Longer decay means less damping; a larger room means more wet signal,
/// with the dry level pulled down to keep loudness steady.
pub fn map_settings(snapshot: &ParamSnapshot) -> ReverbSettings {
    let room_size = snapshot.room_size;
    // decay can land a hair above 10 at the range boundary
    let damping = (1.0 - snapshot.decay_time / DECAY_DIVISOR).clamp(0.0, 1.0);
    let wet_level = WET_BASE + WET_PER_ROOM * room_size;
    let dry_level = 1.0 - wet_level * DRY_COMPENSATION;

    ReverbSettings {
        room_size,
        damping,
        wet_level,
        dry_level,
        width: 1.0,
        freeze: false,
    }
}
