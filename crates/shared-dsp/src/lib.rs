//! Real-time building blocks shared across the reverb crates.

pub mod delay_line;
pub mod smoothing;

pub use delay_line::DelayLine;
pub use smoothing::LinearSmoother;
