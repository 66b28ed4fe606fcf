use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::core::{Affine, BezPath, Color, LogicalSize, PhysicalSize, Point, Rect};
use crate::foundation::error::{KickshotError, KickshotResult};
use crate::foundation::math::Fnv1a64;
use crate::render::context::{DrawContext, LinearGradient, Paint, StrokeStyle, TextStyle};
use crate::render::text::TextRasterizer;
use crate::surface::adapter::DrawingSurface;

const MAX_GRADIENTS: usize = 16;

/// A rendered frame as RGBA8 pixels.
///
/// Frames read back from [`CpuSurface`] are **premultiplied alpha**. The `premultiplied` flag makes
/// this explicit at API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA8 bytes of the pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

struct Raster {
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
}

/// [`DrawingSurface`] rasterized on the CPU by `vello_cpu`.
///
/// Draw calls accumulate in a render context and are rasterized into the backing pixmap on
/// [`DrawContext::present`].
pub struct CpuSurface {
    logical: LogicalSize,
    dpr: f64,
    backing: PhysicalSize,
    raster: Option<Raster>,

    transform: Affine,
    alpha: f32,
    alpha_layer_open: bool,

    gradient_cache: HashMap<u64, vello_cpu::Image>,
    text: TextRasterizer,
}

impl CpuSurface {
    /// A surface with an empty backing store. Configure it through a
    /// [`SurfaceAdapter`](crate::SurfaceAdapter) before drawing.
    pub fn new(logical: LogicalSize, device_pixel_ratio: f64) -> Self {
        Self {
            logical,
            dpr: device_pixel_ratio,
            backing: PhysicalSize::default(),
            raster: None,
            transform: Affine::IDENTITY,
            alpha: 1.0,
            alpha_layer_open: false,
            gradient_cache: HashMap::new(),
            text: TextRasterizer::new(),
        }
    }

    /// Host-side viewport change. Takes effect on the next configure.
    pub fn set_logical_size(&mut self, logical: LogicalSize) {
        self.logical = logical;
    }

    pub fn set_device_pixel_ratio(&mut self, dpr: f64) {
        self.dpr = dpr;
    }

    /// Copy of the backing store as of the last [`DrawContext::present`].
    pub fn readback(&self) -> KickshotResult<FrameRGBA> {
        let raster = self
            .raster
            .as_ref()
            .ok_or_else(|| KickshotError::render("surface has no backing store"))?;
        Ok(FrameRGBA {
            width: u32::from(raster.pixmap.width()),
            height: u32::from(raster.pixmap.height()),
            data: raster.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn begin_op(&mut self) -> Option<&mut vello_cpu::RenderContext> {
        let raster = self.raster.as_mut()?;
        raster.ctx.set_transform(affine_to_cpu(self.transform));
        raster
            .ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Some(&mut raster.ctx)
    }

    fn close_alpha_layer(&mut self) {
        if !self.alpha_layer_open {
            return;
        }
        if let Some(raster) = self.raster.as_mut() {
            raster.ctx.pop_layer();
        }
        self.alpha_layer_open = false;
    }

    /// Rasterize `gradient` over the device-space bounds of `rect`.
    fn gradient_paint(
        &mut self,
        rect: Rect,
        gradient: &LinearGradient,
    ) -> KickshotResult<(vello_cpu::Image, Rect)> {
        let device = self.transform.transform_rect_bbox(rect);
        let bounds = Rect::new(
            device.x0.floor(),
            device.y0.floor(),
            device.x1.ceil(),
            device.y1.ceil(),
        );
        let w = bounds.width().max(1.0) as u32;
        let h = bounds.height().max(1.0) as u32;

        let mut key = Fnv1a64::new_default();
        for v in [bounds.x0, bounds.y0, bounds.x1, bounds.y1] {
            key.write_f64(v);
        }
        for c in self.transform.as_coeffs() {
            key.write_f64(c);
        }
        key.write_f64(gradient.start.x);
        key.write_f64(gradient.start.y);
        key.write_f64(gradient.end.x);
        key.write_f64(gradient.end.y);
        for s in &gradient.stops {
            key.write_f64(s.offset);
            key.write_bytes(&[s.color.r, s.color.g, s.color.b, s.color.a]);
        }
        let key = key.finish();
        if let Some(img) = self.gradient_cache.get(&key).cloned() {
            return Ok((img, bounds));
        }

        let inv = self.transform.inverse();
        let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
        for y in 0..h {
            for x in 0..w {
                let device_pt = Point::new(
                    bounds.x0 + f64::from(x) + 0.5,
                    bounds.y0 + f64::from(y) + 0.5,
                );
                let t = gradient.axis_position(inv * device_pt);
                let c = gradient.sample_premultiplied(t);
                let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
                bytes[idx..idx + 4].copy_from_slice(&c);
            }
        }
        let img = rgba_premul_to_image(&bytes, w, h)?;
        if self.gradient_cache.len() >= MAX_GRADIENTS {
            self.gradient_cache.clear();
        }
        self.gradient_cache.insert(key, img.clone());
        Ok((img, bounds))
    }

    fn draw_image(&mut self, image: vello_cpu::Image, transform: Affine, w: f64, h: f64) {
        let Some(raster) = self.raster.as_mut() else {
            return;
        };
        raster.ctx.set_transform(affine_to_cpu(transform));
        raster
            .ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        raster.ctx.set_paint(image);
        raster
            .ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
    }
}

impl DrawingSurface for CpuSurface {
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
        self.alpha_layer_open = false;
        self.alpha = 1.0;
        self.gradient_cache.clear();
        self.backing = size;

        if size.is_empty() {
            self.raster = None;
            return Ok(());
        }
        let w: u16 = size
            .width
            .try_into()
            .map_err(|_| KickshotError::render("backing width exceeds u16"))?;
        let h: u16 = size
            .height
            .try_into()
            .map_err(|_| KickshotError::render("backing height exceeds u16"))?;
        self.raster = Some(Raster {
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
        });
        Ok(())
    }

    fn context(&mut self) -> Option<&mut dyn DrawContext> {
        Some(self)
    }
}

impl DrawContext for CpuSurface {
    fn clear(&mut self) {
        self.alpha_layer_open = false;
        self.alpha = 1.0;
        if let Some(raster) = self.raster.as_mut() {
            raster.ctx.reset();
        }
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        self.close_alpha_layer();
        self.alpha = alpha;
        if alpha < 1.0
            && let Some(raster) = self.raster.as_mut()
        {
            raster.ctx.push_opacity_layer(alpha);
            self.alpha_layer_open = true;
        }
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        match paint {
            Paint::Solid(c) => {
                let Some(ctx) = self.begin_op() else {
                    return;
                };
                ctx.set_paint(color_to_cpu(*c));
                ctx.fill_rect(&rect_to_cpu(rect));
            }
            Paint::Linear(gradient) => match self.gradient_paint(rect, gradient) {
                Ok((img, bounds)) => {
                    let place = Affine::translate((bounds.x0, bounds.y0));
                    self.draw_image(img, place, bounds.width(), bounds.height());
                }
                Err(e) => tracing::warn!(error = %e, "skipping gradient fill"),
            },
        }
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &StrokeStyle) {
        let Some(ctx) = self.begin_op() else {
            return;
        };
        ctx.set_paint(color_to_cpu(stroke.color));
        ctx.set_stroke(stroke_to_cpu(stroke));
        ctx.stroke_rect(&rect_to_cpu(rect));
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        let Some(ctx) = self.begin_op() else {
            return;
        };
        ctx.set_paint(color_to_cpu(color));
        ctx.fill_path(&bezpath_to_cpu(path));
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeStyle) {
        let Some(ctx) = self.begin_op() else {
            return;
        };
        ctx.set_paint(color_to_cpu(stroke.color));
        ctx.set_stroke(stroke_to_cpu(stroke));
        ctx.stroke_path(&bezpath_to_cpu(path));
    }

    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle) {
        if self.raster.is_none() || text.is_empty() {
            return;
        }
        let [a, b, _, _, _, _] = self.transform.as_coeffs();
        let scale = (a * a + b * b).sqrt().max(1e-6);
        let label = match self.text.raster(text, style, scale) {
            Ok(label) => label,
            Err(e) => {
                tracing::warn!(error = %e, text, "skipping text");
                return;
            }
        };
        let img = match rgba_premul_to_image(&label.rgba8_premul, label.width, label.height) {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!(error = %e, text, "skipping text");
                return;
            }
        };
        let place = self.transform
            * Affine::translate((origin.x, origin.y - label.ascent))
            * Affine::scale(1.0 / label.scale);
        self.draw_image(
            img,
            place,
            f64::from(label.width),
            f64::from(label.height),
        );
    }

    fn present(&mut self) -> KickshotResult<()> {
        self.close_alpha_layer();
        let Some(raster) = self.raster.as_mut() else {
            return Ok(());
        };
        raster.pixmap.data_as_u8_slice_mut().fill(0);
        raster.ctx.flush();
        raster.ctx.render_to_pixmap(&mut raster.pixmap);
        Ok(())
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn color_to_cpu(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn stroke_to_cpu(s: &StrokeStyle) -> vello_cpu::kurbo::Stroke {
    vello_cpu::kurbo::Stroke::new(s.width)
        .with_caps(vello_cpu::kurbo::Cap::Round)
        .with_join(vello_cpu::kurbo::Join::Round)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> KickshotResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| KickshotError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| KickshotError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(KickshotError::render("pixmap byte len mismatch"));
    }
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in bytes.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        });
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> KickshotResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
