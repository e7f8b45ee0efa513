//! Host-agnostic core of the stereo reverb.
//!
//! Two user parameters (room size, decay time) are mapped to engine
//! settings once per block and handed to a Freeverb-style engine.
//!
//! - `params`: parameter declarations and the per-block snapshot
//! - `settings`: snapshot -> engine settings
//! - `processor`: real-time block processing and layout negotiation
//! - `state`: save/restore blobs
//! - `host`: the `AudioProcessor` interface and its factory

pub mod engine;
pub mod freeverb;
pub mod host;
pub mod params;
pub mod processor;
pub mod settings;
pub mod state;
pub mod store;

pub use engine::ReverbEngine;
pub use freeverb::Freeverb;
pub use host::{create_processor, AudioProcessor, ReverbProcessor};
pub use params::{ParamSnapshot, ParamSpec, Skew, DECAY_TIME, ROOM_SIZE};
pub use processor::{supports_layout, StereoReverb, NUM_CHANNELS, TAIL_LENGTH_SECS};
pub use settings::{map_settings, ReverbSettings};
pub use state::{decode_state, encode_state, StateError};
pub use store::ParameterStore;
