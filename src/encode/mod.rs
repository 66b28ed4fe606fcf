//! Frame sinks for offline export.
//!
//! Sinks consume rendered frames in timeline order and are fed by
//! [`render_playback`](crate::render_playback).

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`) and PNG export.
pub mod ffmpeg;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
