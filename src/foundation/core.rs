use std::time::Duration;

use crate::foundation::error::{KickshotError, KickshotResult};
use crate::foundation::math::mul_div255_u8;

pub use kurbo::{Affine, BezPath, Circle, Ellipse, Line, Point, Rect, Vec2};

/// Normalized playback position, always in `[0, 1]`.
///
/// Constructors clamp, and NaN maps to the start of playback, so a `Progress` can never carry an
/// out-of-range value into the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Progress(f64);

impl Progress {
    /// Start of playback.
    pub const START: Self = Self(0.0);
    /// End of playback.
    pub const END: Self = Self(1.0);

    /// Clamp `value` into `[0, 1]`.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::START;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// `min(elapsed / total, 1)`. A zero `total` is complete immediately.
    pub fn from_elapsed(elapsed: Duration, total: Duration) -> Self {
        if total.is_zero() {
            return Self::END;
        }
        Self::new(elapsed.as_secs_f64() / total.as_secs_f64())
    }

    /// Raw value in `[0, 1]`.
    pub fn get(self) -> f64 {
        self.0
    }

    /// `true` once playback reached its end.
    pub fn is_complete(self) -> bool {
        self.0 >= 1.0
    }
}

/// Surface size in logical (CSS-like) units, the space all scene geometry is computed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LogicalSize {
    pub width: f64,
    pub height: f64,
}

impl LogicalSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both extents finite and strictly positive.
    pub fn is_drawable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Backing store size in physical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `floor(logical * dpr)` per axis. Negative or non-finite products collapse to zero.
    pub fn from_logical(logical: LogicalSize, device_pixel_ratio: f64) -> Self {
        fn scaled(v: f64, dpr: f64) -> u32 {
            let p = (v * dpr).floor();
            if !p.is_finite() || p <= 0.0 {
                return 0;
            }
            p.min(f64::from(u32::MAX)) as u32
        }

        Self {
            width: scaled(logical.width, device_pixel_ratio),
            height: scaled(logical.height, device_pixel_ratio),
        }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Integer logical canvas size, as stored in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn logical(self) -> LogicalSize {
        LogicalSize::new(f64::from(self.width), f64::from(self.height))
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> KickshotResult<Self> {
        if den == 0 {
            return Err(KickshotError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(KickshotError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frame_duration(self) -> Duration {
        Duration::from_secs_f64(self.frame_duration_secs())
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Number of frame boundaries needed to cover `duration`, end inclusive.
    pub fn frames_covering(self, duration: Duration) -> u64 {
        let exact = duration.as_secs_f64() * self.as_f64();
        let nearest = exact.round();
        let frames = if (exact - nearest).abs() < 1e-9 {
            nearest
        } else {
            exact.ceil()
        };
        frames.max(0.0) as u64 + 1
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Alpha as a unit float.
    pub fn alpha_f32(self) -> f32 {
        f32::from(self.a) / 255.0
    }

    /// Premultiplied `[r, g, b, a]` bytes.
    pub fn premultiplied(self) -> [u8; 4] {
        let a = u16::from(self.a);
        [
            mul_div255_u8(u16::from(self.r), a),
            mul_div255_u8(u16::from(self.g), a),
            mul_div255_u8(u16::from(self.b), a),
            self.a,
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
