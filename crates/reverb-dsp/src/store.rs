//! Lock-free parameter store for hosting the effect outside a plugin wrapper.
//!
//! Writers (an editor or automation thread) clamp and snap values into the
//! declared ranges, and NaN writes are dropped; the audio thread reads a
//! [`ParamSnapshot`] with plain atomic loads.

use std::sync::atomic::{AtomicU64, Ordering};

use atomic_float::AtomicF32;

use crate::params::{ParamSnapshot, ParamSpec, DECAY_TIME, ROOM_SIZE};

pub struct ParameterStore {
    room_size: AtomicF32,
    decay_time: AtomicF32,
    /// Bumped on every change so readers can tell when to refresh.
    version: AtomicU64,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterStore {
    pub fn new() -> Self {
        Self {
            room_size: AtomicF32::new(ROOM_SIZE.default),
            decay_time: AtomicF32::new(DECAY_TIME.default),
            version: AtomicU64::new(0),
        }
    }

    pub fn room_size(&self) -> f32 {
        self.room_size.load(Ordering::Relaxed)
    }

    pub fn decay_time(&self) -> f32 {
        self.decay_time.load(Ordering::Relaxed)
    }

    pub fn set_room_size(&self, value: f32) {
        if !value.is_nan() {
            self.write(&self.room_size, ROOM_SIZE.snap(value));
        }
    }

    pub fn set_decay_time(&self, value: f32) {
        if !value.is_nan() {
            self.write(&self.decay_time, DECAY_TIME.snap(value));
        }
    }

    /// Set a parameter by its host id. Returns `false` for an unknown id.
    pub fn set_by_id(&self, id: &str, value: f32) -> bool {
        match id {
            id if id == ROOM_SIZE.id => self.set_room_size(value),
            id if id == DECAY_TIME.id => self.set_decay_time(value),
            _ => return false,
        }
        true
    }

    pub fn get_by_id(&self, id: &str) -> Option<f32> {
        match id {
            id if id == ROOM_SIZE.id => Some(self.room_size()),
            id if id == DECAY_TIME.id => Some(self.decay_time()),
            _ => None,
        }
    }

    /// Reset one parameter to its declared default.
    pub fn reset_to_default(&self, spec: &ParamSpec) -> bool {
        self.set_by_id(spec.id, spec.default)
    }

    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            room_size: self.room_size(),
            decay_time: self.decay_time(),
        }
    }

    /// Replace both values, e.g. when restoring saved state.
    ///
    /// The two stores are independent, so a block running concurrently may
    /// see one new value next to one old one. Values are clamped but not
    /// snapped, so a restored blob reproduces exactly what was saved. NaN
    /// fields leave the current value in place.
    pub fn replace(&self, snapshot: &ParamSnapshot) {
        if !snapshot.room_size.is_nan() {
            self.write(&self.room_size, ROOM_SIZE.clamp(snapshot.room_size));
        }
        if !snapshot.decay_time.is_nan() {
            self.write(&self.decay_time, DECAY_TIME.clamp(snapshot.decay_time));
        }
    }

    /// Monotonic change counter.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    fn write(&self, cell: &AtomicF32, value: f32) {
        let old = cell.swap(value, Ordering::Relaxed);
        if old.to_bits() != value.to_bits() {
            self.version.fetch_add(1, Ordering::Release);
        }
    }
}
