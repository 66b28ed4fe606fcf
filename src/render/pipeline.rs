use crate::config::VignetteConfig;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, Progress};
use crate::foundation::error::KickshotResult;
use crate::render::cpu::{CpuSurface, FrameRGBA};
use crate::render::frame::FrameRenderer;
use crate::surface::adapter::SurfaceAdapter;

/// Deterministic offline renderer: one configured [`CpuSurface`] reused for every frame.
pub struct OfflineRenderer {
    adapter: SurfaceAdapter<CpuSurface>,
    renderer: FrameRenderer,
}

impl OfflineRenderer {
    /// Validate `config` and allocate a surface for it.
    pub fn new(config: &VignetteConfig) -> KickshotResult<Self> {
        config.validate()?;
        let surface = CpuSurface::new(config.logical_size(), config.device_pixel_ratio);
        let mut adapter = SurfaceAdapter::new(surface);
        adapter.configure()?;
        Ok(Self {
            adapter,
            renderer: FrameRenderer::new(config.labels.clone()),
        })
    }

    /// Draw the scene at `progress` and read back its pixels.
    ///
    /// Returns a [`FrameRGBA`] containing **premultiplied** RGBA8 pixels at the backing size.
    pub fn render(&mut self, progress: Progress) -> KickshotResult<FrameRGBA> {
        self.adapter.ensure_configured()?;
        let size = self.adapter.logical_size();
        let ctx = self.adapter.context()?;
        self.renderer.render(ctx, progress, size)?;
        ctx.present()?;
        self.adapter.surface().readback()
    }
}

/// Render a single frame at `progress`.
#[tracing::instrument(skip(config))]
pub fn render_still(config: &VignetteConfig, progress: Progress) -> KickshotResult<FrameRGBA> {
    OfflineRenderer::new(config)?.render(progress)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames_total: u64,
}

/// Progress of export frame `idx`: `min(idx / fps / total, 1)`.
pub fn progress_at_frame(config: &VignetteConfig, idx: FrameIndex) -> Progress {
    let total = config.total_duration().as_secs_f64();
    if total <= 0.0 {
        return Progress::END;
    }
    Progress::new(config.fps.frames_to_secs(idx.0) / total)
}

/// Render a whole playback at the configured fps into `sink`.
///
/// Frames are pushed in order; the last frame is always at progress 1.
#[tracing::instrument(skip(config, sink))]
pub fn render_playback(
    config: &VignetteConfig,
    sink: &mut dyn FrameSink,
) -> KickshotResult<RenderStats> {
    let mut offline = OfflineRenderer::new(config)?;
    let backing = config.backing_size();
    let frames = config.fps.frames_covering(config.total_duration());

    sink.begin(SinkConfig {
        width: backing.width,
        height: backing.height,
        fps: config.fps,
        frames,
    })?;
    let mut stats = RenderStats::default();
    for i in 0..frames {
        let idx = FrameIndex(i);
        let progress = if i + 1 == frames {
            Progress::END
        } else {
            progress_at_frame(config, idx)
        };
        let frame = offline.render(progress)?;
        sink.push_frame(idx, &frame)?;
        stats.frames_total += 1;
    }
    sink.end()?;

    tracing::debug!(frames = stats.frames_total, "playback exported");
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
