//! Kickshot renders a short, procedurally animated football vignette: a stick-figure child runs up
//! and kicks a ball across a floodlit pitch while a match clock counts down.
//!
//! Every frame is a pure function of a normalized [`Progress`] and the surface size:
//!
//! - [`SceneGeometry`] derives every coordinate of one frame
//! - [`FrameRenderer`] draws it through a [`DrawContext`]
//! - [`AnimationDriver`] maps elapsed host time to progress and paces frames through a
//!   [`FramePacer`] until playback finishes
//!
//! Surfaces are kept crisp on high-density displays by [`SurfaceAdapter`]. [`CpuSurface`]
//! rasterizes with `vello_cpu`; [`render_still`] and [`render_playback`] export PNG stills and MP4
//! playbacks through a [`FrameSink`].
#![forbid(unsafe_code)]

mod config;
mod foundation;

/// Playback driver and frame pacers.
pub mod driver;
/// Frame sinks for offline export.
pub mod encode;
/// Drawing contexts, surfaces and the frame renderer.
pub mod render;
/// Per-frame scene geometry.
pub mod scene;
/// Device-pixel-ratio aware surface sizing.
pub mod surface;

pub use crate::config::VignetteConfig;
pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Color, Fps, FrameIndex, LogicalSize, PhysicalSize, Point, Progress,
    Rect, Vec2,
};
pub use crate::foundation::error::{KickshotError, KickshotResult};

pub use crate::driver::animation::{AnimationDriver, FrameOutcome, PlaybackState, StateChange};
pub use crate::driver::pacer::{FrameHandle, FramePacer, FrameTick, IntervalPacer, ManualPacer};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path, write_png};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::render::context::{
    DrawContext, GradientStop, LinearGradient, Paint, StrokeStyle, TextStyle,
};
pub use crate::render::cpu::{CpuSurface, FrameRGBA};
pub use crate::render::frame::{FrameRenderer, SceneLabels};
pub use crate::render::pipeline::{
    OfflineRenderer, RenderStats, progress_at_frame, render_playback, render_still,
};
pub use crate::render::recording::{DrawOp, RecordedOp, RecordingContext, RecordingSurface};
pub use crate::scene::geometry::{KickPhase, SceneGeometry};
pub use crate::surface::adapter::{DrawingSurface, SurfaceAdapter};
