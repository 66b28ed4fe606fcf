//! Playback driver and frame pacing.

/// The Idle/Playing/Finished state machine that turns elapsed time into frames.
pub mod animation;
/// Host frame-pacing primitives.
pub mod pacer;
