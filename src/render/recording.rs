use kurbo::PathEl;

use crate::foundation::core::{Affine, BezPath, Color, LogicalSize, PhysicalSize, Point, Rect};
use crate::foundation::error::KickshotResult;
use crate::foundation::math::Fnv1a64;
use crate::render::context::{DrawContext, Paint, StrokeStyle, TextStyle};
use crate::surface::adapter::DrawingSurface;

/// One recorded draw call, with the transform and global alpha in effect when it was issued.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear,
    FillRect {
        rect: Rect,
        paint: Paint,
    },
    StrokeRect {
        rect: Rect,
        stroke: StrokeStyle,
    },
    FillPath {
        path: BezPath,
        color: Color,
    },
    StrokePath {
        path: BezPath,
        stroke: StrokeStyle,
    },
    FillText {
        text: String,
        origin: Point,
        style: TextStyle,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedOp {
    pub op: DrawOp,
    pub transform: Affine,
    pub alpha: f32,
}

/// A [`DrawContext`] that keeps a list of draw calls instead of pixels.
#[derive(Clone, Debug)]
pub struct RecordingContext {
    ops: Vec<RecordedOp>,
    transform: Affine,
    alpha: f32,
    presented: u64,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self {
            ops: Vec::new(),
            transform: Affine::IDENTITY,
            alpha: 1.0,
            presented: 0,
        }
    }
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[RecordedOp] {
        &self.ops
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Number of [`DrawContext::present`] calls so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Texts drawn since the last clear, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|r| match &r.op {
                DrawOp::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Stable FNV-1a digest of the recorded ops.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        for r in &self.ops {
            for c in r.transform.as_coeffs() {
                h.write_f64(c);
            }
            h.write_u32(r.alpha.to_bits());
            match &r.op {
                DrawOp::Clear => h.write_u8(0),
                DrawOp::FillRect { rect, paint } => {
                    h.write_u8(1);
                    hash_rect(&mut h, *rect);
                    match paint {
                        Paint::Solid(c) => hash_color(&mut h, *c),
                        Paint::Linear(g) => {
                            hash_point(&mut h, g.start);
                            hash_point(&mut h, g.end);
                            for s in &g.stops {
                                h.write_f64(s.offset);
                                hash_color(&mut h, s.color);
                            }
                        }
                    }
                }
                DrawOp::StrokeRect { rect, stroke } => {
                    h.write_u8(2);
                    hash_rect(&mut h, *rect);
                    hash_stroke(&mut h, stroke);
                }
                DrawOp::FillPath { path, color } => {
                    h.write_u8(3);
                    hash_path(&mut h, path);
                    hash_color(&mut h, *color);
                }
                DrawOp::StrokePath { path, stroke } => {
                    h.write_u8(4);
                    hash_path(&mut h, path);
                    hash_stroke(&mut h, stroke);
                }
                DrawOp::FillText {
                    text,
                    origin,
                    style,
                } => {
                    h.write_u8(5);
                    h.write_str(text);
                    hash_point(&mut h, *origin);
                    h.write_u32(u32::from(style.weight));
                    h.write_f64(style.size_px);
                    h.write_str(style.family);
                    hash_color(&mut h, style.color);
                }
            }
        }
        h.finish()
    }

    fn push(&mut self, op: DrawOp) {
        self.ops.push(RecordedOp {
            op,
            transform: self.transform,
            alpha: self.alpha,
        });
    }
}

impl DrawContext for RecordingContext {
    fn clear(&mut self) {
        self.ops.clear();
        self.alpha = 1.0;
        self.push(DrawOp::Clear);
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.push(DrawOp::FillRect {
            rect,
            paint: paint.clone(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &StrokeStyle) {
        self.push(DrawOp::StrokeRect {
            rect,
            stroke: *stroke,
        });
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.push(DrawOp::FillPath {
            path: path.clone(),
            color,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeStyle) {
        self.push(DrawOp::StrokePath {
            path: path.clone(),
            stroke: *stroke,
        });
    }

    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle) {
        self.push(DrawOp::FillText {
            text: text.to_owned(),
            origin,
            style: *style,
        });
    }

    fn present(&mut self) -> KickshotResult<()> {
        self.presented += 1;
        Ok(())
    }
}

/// Headless [`DrawingSurface`] backed by a [`RecordingContext`].
///
/// Hosts without pixels (and tests) use it to drive the full pipeline.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    logical: LogicalSize,
    dpr: f64,
    backing: PhysicalSize,
    resizes: u64,
    ctx: Option<RecordingContext>,
}

impl RecordingSurface {
    pub fn new(logical: LogicalSize, device_pixel_ratio: f64) -> Self {
        Self {
            logical,
            dpr: device_pixel_ratio,
            backing: PhysicalSize::default(),
            resizes: 0,
            ctx: Some(RecordingContext::new()),
        }
    }

    /// A surface whose host failed to provide a context.
    pub fn without_context(logical: LogicalSize, device_pixel_ratio: f64) -> Self {
        Self {
            ctx: None,
            ..Self::new(logical, device_pixel_ratio)
        }
    }

    pub fn set_logical_size(&mut self, logical: LogicalSize) {
        self.logical = logical;
    }

    pub fn set_device_pixel_ratio(&mut self, dpr: f64) {
        self.dpr = dpr;
    }

    pub fn recording(&self) -> Option<&RecordingContext> {
        self.ctx.as_ref()
    }

    /// Number of backing store reallocations.
    pub fn resizes(&self) -> u64 {
        self.resizes
    }
}

impl DrawingSurface for RecordingSurface {
    fn logical_size(&self) -> LogicalSize {
        self.logical
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.dpr
    }

    fn backing_size(&self) -> PhysicalSize {
        self.backing
    }

    fn resize_backing(&mut self, size: PhysicalSize) -> KickshotResult<()> {
        self.backing = size;
        self.resizes += 1;
        if let Some(ctx) = self.ctx.as_mut() {
            ctx.clear();
        }
        Ok(())
    }

    fn context(&mut self) -> Option<&mut dyn DrawContext> {
        self.ctx.as_mut().map(|c| c as &mut dyn DrawContext)
    }
}

fn hash_point(h: &mut Fnv1a64, p: Point) {
    h.write_f64(p.x);
    h.write_f64(p.y);
}

fn hash_rect(h: &mut Fnv1a64, r: Rect) {
    for v in [r.x0, r.y0, r.x1, r.y1] {
        h.write_f64(v);
    }
}

fn hash_color(h: &mut Fnv1a64, c: Color) {
    h.write_bytes(&[c.r, c.g, c.b, c.a]);
}

fn hash_stroke(h: &mut Fnv1a64, s: &StrokeStyle) {
    hash_color(h, s.color);
    h.write_f64(s.width);
}

fn hash_path(h: &mut Fnv1a64, path: &BezPath) {
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                h.write_u8(b'M');
                hash_point(h, p);
            }
            PathEl::LineTo(p) => {
                h.write_u8(b'L');
                hash_point(h, p);
            }
            PathEl::QuadTo(a, b) => {
                h.write_u8(b'Q');
                hash_point(h, a);
                hash_point(h, b);
            }
            PathEl::CurveTo(a, b, c) => {
                h.write_u8(b'C');
                hash_point(h, a);
                hash_point(h, b);
                hash_point(h, c);
            }
            PathEl::ClosePath => h.write_u8(b'Z'),
        }
    }
}
