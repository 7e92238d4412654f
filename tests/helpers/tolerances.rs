//! Tolerance constants for audio testing.

/// Floating point rounding errors (for exact gain, offsets).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Values below this are considered silent.
pub const SILENCE_THRESHOLD: f32 = 0.0001;
