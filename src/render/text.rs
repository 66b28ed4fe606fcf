//! Text rasterization through `usvg`/`resvg` with the system font database.
//!
//! Each label is laid out as a one-line SVG document, rasterized at device scale and cached as a
//! premultiplied RGBA8 image. Missing fonts are not an error: the label rasterizes empty.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::foundation::error::{KickshotError, KickshotResult};
use crate::foundation::math::Fnv1a64;
use crate::render::context::TextStyle;

const MAX_CACHED: usize = 64;
const MAX_DIM: u32 = 8_192;
/// Baseline position inside the raster, in units of font size.
const ASCENT: f64 = 1.15;
const LINE_BOX: f64 = 1.5;
/// Right-side slack past the measured glyph bounds, in units of font size.
const PAD: f64 = 0.1;

/// A rasterized label, premultiplied RGBA8 in device pixels.
#[derive(Clone, Debug)]
pub(crate) struct TextRaster {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) rgba8_premul: Arc<Vec<u8>>,
    /// Distance from the raster top to the baseline, in logical units.
    pub(crate) ascent: f64,
    /// Device pixels per logical unit the raster was made at.
    pub(crate) scale: f64,
}

pub(crate) struct TextRasterizer {
    options: Option<usvg::Options<'static>>,
    cache: HashMap<u64, TextRaster>,
}

impl TextRasterizer {
    pub(crate) fn new() -> Self {
        Self {
            options: None,
            cache: HashMap::new(),
        }
    }

    /// Rasterize `text` at `scale` device pixels per logical unit.
    pub(crate) fn raster(
        &mut self,
        text: &str,
        style: &TextStyle,
        scale: f64,
    ) -> KickshotResult<TextRaster> {
        let key = cache_key(text, style, scale);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit.clone());
        }

        let (layout_w, logical_h) = layout_box(text, style);
        let svg = label_svg(text, style, layout_w, logical_h);
        let options = self.options.get_or_insert_with(system_font_options);
        let tree = usvg::Tree::from_str(&svg, options)
            .map_err(|e| KickshotError::render(format!("text layout failed: {e}")))?;

        let logical_w = measured_width(&tree, style.size_px);
        let width = to_px(logical_w * scale)?;
        let height = to_px(logical_h * scale)?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| KickshotError::render("failed to allocate text pixmap"))?;
        let xform = resvg::tiny_skia::Transform::from_scale(scale as f32, scale as f32);
        resvg::render(&tree, xform, &mut pixmap.as_mut());

        let out = TextRaster {
            width,
            height,
            rgba8_premul: Arc::new(pixmap.data().to_vec()),
            ascent: style.size_px * ASCENT,
            scale,
        };
        if self.cache.len() >= MAX_CACHED {
            self.cache.clear();
        }
        self.cache.insert(key, out.clone());
        Ok(out)
    }
}

fn system_font_options() -> usvg::Options<'static> {
    let mut opts = usvg::Options::default();
    opts.fontdb_mut().load_system_fonts();
    tracing::debug!(faces = opts.fontdb.len(), "loaded system fonts");
    opts
}

fn cache_key(text: &str, style: &TextStyle, scale: f64) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_str(text);
    h.write_str(style.family);
    h.write_u32(u32::from(style.weight));
    h.write_f64(style.size_px);
    h.write_bytes(&[style.color.r, style.color.g, style.color.b, style.color.a]);
    h.write_f64(scale);
    h.finish()
}

/// Document box for the label SVG. Glyphs past its right edge are still in the tree, so the
/// width only seeds the viewBox; the raster is sized from [`measured_width`].
fn layout_box(text: &str, style: &TextStyle) -> (f64, f64) {
    let chars = text.chars().count().max(1) as f64;
    let size = style.size_px.max(1.0);
    (chars * size, size * LINE_BOX)
}

/// Logical width covering every laid-out glyph, or `1` when nothing was laid out.
fn measured_width(tree: &usvg::Tree, size_px: f64) -> f64 {
    let root = tree.root();
    if !root.has_children() {
        return 1.0;
    }
    let right = f64::from(root.abs_bounding_box().right());
    if !right.is_finite() || right <= 0.0 {
        return 1.0;
    }
    right + size_px.max(1.0) * PAD
}

fn to_px(v: f64) -> KickshotResult<u32> {
    if !v.is_finite() || v <= 0.0 {
        return Err(KickshotError::render("text raster has invalid size"));
    }
    let px = (v.ceil() as u32).max(1);
    if px > MAX_DIM {
        return Err(KickshotError::render(format!(
            "text raster too large: {px}px (max {MAX_DIM})"
        )));
    }
    Ok(px)
}

fn label_svg(text: &str, style: &TextStyle, w: f64, h: f64) -> String {
    let c = style.color;
    let mut svg = String::with_capacity(256 + text.len());
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = write!(
        svg,
        r#"<text x="0" y="{baseline}" font-family="{family}, Helvetica, sans-serif" font-weight="{weight}" font-size="{size}" fill="rgb({r},{g},{b})" fill-opacity="{alpha}">"#,
        baseline = style.size_px * ASCENT,
        family = escape_xml(style.family),
        weight = style.weight,
        size = style.size_px,
        r = c.r,
        g = c.g,
        b = c.b,
        alpha = c.alpha_f32(),
    );
    svg.push_str(&escape_xml(text));
    svg.push_str("</text></svg>");
    svg
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
