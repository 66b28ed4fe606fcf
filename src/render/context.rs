use crate::foundation::core::{Affine, BezPath, Color, Point, Rect};
use crate::foundation::error::KickshotResult;

/// Stroke parameters. Caps and joins are always round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
}

impl StrokeStyle {
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient axis in `[0, 1]`.
    pub offset: f64,
    pub color: Color,
}

/// Linear gradient between two points in user space. Colors extend past both ends.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    /// Straight-alpha color at axis position `t`.
    ///
    /// Stops are blended in premultiplied space, so a transparent stop contributes no color.
    pub fn sample(&self, t: f64) -> Color {
        let [r, g, b, a] = self.sample_premul_f64(t);
        if a <= 0.0 {
            return Color::rgba(0, 0, 0, 0);
        }
        let unpremul = |c: f64| -> u8 { (c * 255.0 / a).round().clamp(0.0, 255.0) as u8 };
        Color::rgba(unpremul(r), unpremul(g), unpremul(b), to_u8(a))
    }

    /// Premultiplied `[r, g, b, a]` bytes at axis position `t`.
    pub fn sample_premultiplied(&self, t: f64) -> [u8; 4] {
        self.sample_premul_f64(t).map(to_u8)
    }

    fn sample_premul_f64(&self, t: f64) -> [f64; 4] {
        let Some(first) = self.stops.first() else {
            return [0.0; 4];
        };
        if t <= first.offset {
            return premul_f64(first.color);
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                let k = if span <= 0.0 { 1.0 } else { (t - a.offset) / span };
                let (pa, pb) = (premul_f64(a.color), premul_f64(b.color));
                return std::array::from_fn(|i| crate::foundation::math::lerp(pa[i], pb[i], k));
            }
        }
        premul_f64(self.stops[self.stops.len() - 1].color)
    }

    /// Axis position of `p`: `0` at `start`, `1` at `end`.
    pub fn axis_position(&self, p: Point) -> f64 {
        let axis = self.end - self.start;
        let len2 = axis.hypot2();
        if len2 <= 0.0 {
            return 0.0;
        }
        (p - self.start).dot(axis) / len2
    }
}

fn premul_f64(c: Color) -> [f64; 4] {
    let a = f64::from(c.a);
    [
        f64::from(c.r) * a / 255.0,
        f64::from(c.g) * a / 255.0,
        f64::from(c.b) * a / 255.0,
        a,
    ]
}

fn to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear(LinearGradient),
}

/// Font description for [`DrawContext::fill_text`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// CSS weight, 100..=900.
    pub weight: u16,
    pub size_px: f64,
    pub family: &'static str,
    pub color: Color,
}

/// Immediate-mode 2D drawing context.
///
/// Coordinates pass through the current transform, which the surface adapter sets to
/// `scale(device_pixel_ratio)` so callers draw in logical units.
pub trait DrawContext {
    /// Drop everything drawn since the last clear.
    fn clear(&mut self);

    fn transform(&self) -> Affine;

    fn set_transform(&mut self, transform: Affine);

    /// Post-multiply the current transform by a uniform scale.
    fn scale(&mut self, factor: f64) {
        let t = self.transform() * Affine::scale(factor);
        self.set_transform(t);
    }

    /// Opacity applied to every following draw call until changed again.
    fn set_global_alpha(&mut self, alpha: f32);

    fn fill_rect(&mut self, rect: Rect, paint: &Paint);

    fn stroke_rect(&mut self, rect: Rect, stroke: &StrokeStyle) {
        let mut path = BezPath::new();
        path.move_to((rect.x0, rect.y0));
        path.line_to((rect.x1, rect.y0));
        path.line_to((rect.x1, rect.y1));
        path.line_to((rect.x0, rect.y1));
        path.close_path();
        self.stroke_path(&path, stroke);
    }

    fn fill_path(&mut self, path: &BezPath, color: Color);

    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeStyle);

    /// Draw `text` with its alphabetic baseline starting at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle);

    /// Make the drawn frame visible. Raster surfaces rasterize here.
    fn present(&mut self) -> KickshotResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/context.rs"]
mod tests;
