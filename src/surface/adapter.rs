use crate::foundation::core::{Affine, LogicalSize, PhysicalSize};
use crate::foundation::error::{KickshotError, KickshotResult};
use crate::render::context::DrawContext;

/// A pixel-addressable surface owned by the host.
///
/// The host decides the logical size and device pixel ratio; the adapter keeps the backing store
/// and context transform in step with them.
pub trait DrawingSurface {
    /// Current logical size, in the units the scene geometry uses.
    fn logical_size(&self) -> LogicalSize;

    fn device_pixel_ratio(&self) -> f64;

    /// Current backing store size in physical pixels.
    fn backing_size(&self) -> PhysicalSize;

    /// Reallocate and clear the backing store.
    fn resize_backing(&mut self, size: PhysicalSize) -> KickshotResult<()>;

    /// The 2D context, or `None` when the host could not obtain one.
    fn context(&mut self) -> Option<&mut dyn DrawContext>;
}

/// Keeps a [`DrawingSurface`] crisp: backing store at `floor(logical * dpr)` and a context
/// transform of `scale(dpr)`.
pub struct SurfaceAdapter<S> {
    surface: S,
    configured_dpr: Option<f64>,
    missing_context_reported: bool,
}

impl<S: DrawingSurface> SurfaceAdapter<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            configured_dpr: None,
            missing_context_reported: false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for host-side changes (logical size, dpr). Call [`Self::configure`]
    /// afterwards, or let the next frame pick the change up lazily.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_inner(self) -> S {
        self.surface
    }

    pub fn logical_size(&self) -> LogicalSize {
        self.surface.logical_size()
    }

    /// Backing size the current logical size and dpr call for.
    pub fn expected_backing(&self) -> PhysicalSize {
        PhysicalSize::from_logical(
            self.surface.logical_size(),
            self.surface.device_pixel_ratio(),
        )
    }

    /// `true` when the backing store or transform no longer matches the surface.
    pub fn needs_configure(&self) -> bool {
        self.surface.backing_size() != self.expected_backing()
            || self.configured_dpr != Some(self.surface.device_pixel_ratio())
    }

    /// Resize the backing store to the current logical size and reset the transform to
    /// `scale(dpr)`. Clears the surface.
    pub fn configure(&mut self) -> KickshotResult<()> {
        let logical = self.surface.logical_size();
        let dpr = self.surface.device_pixel_ratio();
        let backing = PhysicalSize::from_logical(logical, dpr);

        self.surface.resize_backing(backing)?;
        let ctx = self.context()?;
        ctx.set_transform(Affine::IDENTITY);
        ctx.scale(dpr);
        self.configured_dpr = Some(dpr);

        tracing::debug!(
            logical_w = logical.width,
            logical_h = logical.height,
            dpr,
            backing_w = backing.width,
            backing_h = backing.height,
            "configured surface"
        );
        Ok(())
    }

    /// Re-run [`Self::configure`] only when a mismatch is detected. Returns whether it did.
    pub fn ensure_configured(&mut self) -> KickshotResult<bool> {
        if !self.needs_configure() {
            return Ok(false);
        }
        self.configure()?;
        Ok(true)
    }

    /// The drawing context. A missing context is logged once and reported as
    /// [`KickshotError::MissingSurfaceContext`] on every call.
    pub fn context(&mut self) -> KickshotResult<&mut dyn DrawContext> {
        let Self {
            surface,
            missing_context_reported,
            ..
        } = self;
        match surface.context() {
            Some(ctx) => Ok(ctx),
            None => {
                if !*missing_context_reported {
                    tracing::error!("drawing surface has no 2d context; nothing will be rendered");
                    *missing_context_reported = true;
                }
                Err(KickshotError::MissingSurfaceContext)
            }
        }
    }

    /// Whether the missing-context condition has already been reported.
    pub fn missing_context_reported(&self) -> bool {
        self.missing_context_reported
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/adapter.rs"]
mod tests;
