use std::time::Duration;

use crate::config::VignetteConfig;
use crate::driver::pacer::{FrameHandle, FramePacer, FrameTick};
use crate::foundation::core::Progress;
use crate::foundation::error::{KickshotError, KickshotResult};
use crate::render::frame::FrameRenderer;
use crate::surface::adapter::{DrawingSurface, SurfaceAdapter};

/// Playback lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Finished,
}

/// One transition of the playback state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateChange {
    pub from: PlaybackState,
    pub to: PlaybackState,
}

/// What [`AnimationDriver::on_frame`] did with a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    /// The scene was drawn and presented at `progress`.
    Drawn { progress: Progress },
    /// The surface had no drawable size; nothing was drawn but playback continues.
    Skipped { progress: Progress },
    /// The tick did not answer the pending request and was ignored.
    Stale,
}

type StateObserver = Box<dyn FnMut(StateChange)>;

/// Maps elapsed host time to [`Progress`] and draws one frame per pacer tick until progress
/// reaches 1.
///
/// The driver never blocks: the host loop waits on its pacer and calls [`Self::on_frame`]. At most
/// one frame request is outstanding, and ticks for any other handle are ignored.
pub struct AnimationDriver<S: DrawingSurface, P: FramePacer> {
    adapter: SurfaceAdapter<S>,
    renderer: FrameRenderer,
    pacer: P,
    total: Duration,

    state: PlaybackState,
    origin: Duration,
    pending: Option<FrameHandle>,
    progress: Progress,
    frames_drawn: u64,
    frames_skipped: u64,

    observers: Vec<StateObserver>,
}

impl<S: DrawingSurface, P: FramePacer> AnimationDriver<S, P> {
    pub fn new(surface: S, pacer: P, total: Duration) -> Self {
        Self {
            adapter: SurfaceAdapter::new(surface),
            renderer: FrameRenderer::default(),
            pacer,
            total,
            state: PlaybackState::Idle,
            origin: Duration::ZERO,
            pending: None,
            progress: Progress::START,
            frames_drawn: 0,
            frames_skipped: 0,
            observers: Vec::new(),
        }
    }

    /// Driver for a validated [`VignetteConfig`]: its duration and labels.
    pub fn from_config(surface: S, pacer: P, config: &VignetteConfig) -> KickshotResult<Self> {
        config.validate()?;
        Ok(Self::new(surface, pacer, config.total_duration())
            .with_renderer(FrameRenderer::new(config.labels.clone())))
    }

    pub fn with_renderer(mut self, renderer: FrameRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Register a callback for every state transition.
    pub fn on_state_change(&mut self, observer: impl FnMut(StateChange) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Progress of the most recent frame.
    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn total_duration(&self) -> Duration {
        self.total
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }

    pub fn adapter(&self) -> &SurfaceAdapter<S> {
        &self.adapter
    }

    /// Host-side access to the adapter, e.g. to `configure` after a resize.
    pub fn adapter_mut(&mut self) -> &mut SurfaceAdapter<S> {
        &mut self.adapter
    }

    pub fn surface(&self) -> &S {
        self.adapter.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.adapter.surface_mut()
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    pub fn pacer_mut(&mut self) -> &mut P {
        &mut self.pacer
    }

    /// Begin playback with the clock origin at `now`.
    ///
    /// Valid from `Idle` or `Finished`; a no-op while `Playing`. Fails with
    /// [`KickshotError::MissingSurfaceContext`] without scheduling anything when the surface has
    /// no context.
    #[tracing::instrument(skip(self), fields(state = ?self.state))]
    pub fn start(&mut self, now: Duration) -> KickshotResult<()> {
        if self.state == PlaybackState::Playing {
            tracing::debug!("start ignored while playing");
            return Ok(());
        }
        self.adapter.context()?;
        self.adapter.configure()?;

        self.origin = now;
        self.progress = Progress::START;
        self.transition(PlaybackState::Playing);
        self.pending = Some(self.pacer.request_frame());
        Ok(())
    }

    /// Restart playback from the beginning with the clock origin at `now`.
    ///
    /// From `Idle` or `Finished` this is [`Self::start`]. While `Playing` the clock origin is reset
    /// and the outstanding frame request is kept.
    #[tracing::instrument(skip(self), fields(state = ?self.state))]
    pub fn replay(&mut self, now: Duration) -> KickshotResult<()> {
        if self.state == PlaybackState::Playing {
            self.origin = now;
            self.progress = Progress::START;
            return Ok(());
        }
        self.start(now)
    }

    /// Revoke the pending frame. `Playing` becomes `Idle`; other states are kept.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.pacer.cancel_frame(handle);
        }
        if self.state == PlaybackState::Playing {
            self.transition(PlaybackState::Idle);
        }
    }

    /// Handle one frame opportunity.
    ///
    /// Draws the scene at `min((now - origin) / total, 1)`, then either requests the next frame or
    /// finishes. An undrawable surface skips the draw but keeps playback going. Any other error
    /// stops playback (`Idle`) and is returned.
    pub fn on_frame(&mut self, tick: FrameTick) -> KickshotResult<FrameOutcome> {
        if self.state != PlaybackState::Playing || self.pending != Some(tick.handle) {
            tracing::trace!(handle = tick.handle.0, "ignoring stale frame");
            return Ok(FrameOutcome::Stale);
        }
        self.pending = None;

        let elapsed = tick.now.saturating_sub(self.origin);
        let progress = Progress::from_elapsed(elapsed, self.total);
        self.progress = progress;

        let outcome = match self.draw(progress) {
            Ok(()) => {
                self.frames_drawn += 1;
                FrameOutcome::Drawn { progress }
            }
            Err(e) if e.is_transient() => {
                self.frames_skipped += 1;
                tracing::warn!(error = %e, progress = progress.get(), "skipping frame");
                FrameOutcome::Skipped { progress }
            }
            Err(e) => {
                self.transition(PlaybackState::Idle);
                return Err(e);
            }
        };

        if progress.is_complete() {
            self.transition(PlaybackState::Finished);
        } else {
            self.pending = Some(self.pacer.request_frame());
        }
        Ok(outcome)
    }

    fn draw(&mut self, progress: Progress) -> KickshotResult<()> {
        self.adapter.ensure_configured()?;
        let size = self.adapter.logical_size();
        if !size.is_drawable() {
            return Err(KickshotError::invalid_dimensions(size.width, size.height));
        }
        let ctx = self.adapter.context()?;
        self.renderer.render(ctx, progress, size)?;
        ctx.present()
    }

    fn transition(&mut self, to: PlaybackState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        tracing::debug!(?from, ?to, "playback state changed");
        let change = StateChange { from, to };
        for observer in &mut self.observers {
            observer(change);
        }
    }
}

impl<S: DrawingSurface, P: FramePacer> Drop for AnimationDriver<S, P> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/animation.rs"]
mod tests;
