//! Progress-to-frame rendering.
//!
//! [`FrameRenderer::render`] is a pure function of `(progress, size)` plus the configured labels:
//! it clears the context and redraws the whole scene from [`SceneGeometry`], in a fixed order
//! (background, field, goal post, scoreboard, figure, ball, trail, overlay text).

use kurbo::Shape;

use crate::foundation::core::{BezPath, Color, Line, LogicalSize, Point, Progress};
use crate::foundation::error::{KickshotError, KickshotResult};
use crate::render::context::{
    DrawContext, GradientStop, LinearGradient, Paint, StrokeStyle, TextStyle,
};
use crate::scene::geometry::{Ball, FieldLayout, Figure, Overlay, SceneGeometry, Scoreboard, Trail};

const TOLERANCE: f64 = 0.1;
const FONT_FAMILY: &str = "Arial";

mod palette {
    use crate::foundation::core::Color;

    pub(super) const BACKGROUND: Color = Color::rgb(0x40, 0x70, 0xff);
    pub(super) const SKY_TOP: Color = Color::rgba(255, 255, 255, 89);
    pub(super) const SKY_CLEAR: Color = Color::rgba(255, 255, 255, 0);
    pub(super) const SKY_BOTTOM: Color = Color::rgb(10, 40, 10);
    pub(super) const PITCH: Color = Color::rgb(0x1f, 0x7a, 0x1f);
    pub(super) const PITCH_LINES: Color = Color::rgba(255, 255, 255, 179);
    pub(super) const GOAL_POST: Color = Color::rgba(255, 255, 255, 89);
    pub(super) const BOARD: Color = Color::rgb(0x1d, 0x2a, 0x62);
    pub(super) const CREST: Color = Color::rgb(0xf4, 0xc5, 0x42);
    pub(super) const SKIN: Color = Color::rgb(0xf5, 0xd0, 0xa5);
    pub(super) const MOUTH: Color = Color::rgb(0x6b, 0x3f, 0x2d);
    pub(super) const JERSEY: Color = Color::rgb(0x0f, 0x3c, 0xa6);
    pub(super) const SHORTS: Color = Color::rgb(0xf8, 0xd3, 0x47);
    pub(super) const LEGS: Color = Color::rgb(0x0e, 0x0e, 0x0e);
    pub(super) const COLLAR: Color = Color::rgb(0xd0, 0x82, 0x34);
    pub(super) const BALL_SEAMS: Color = Color::rgb(0x11, 0x11, 0x11);
    pub(super) const TITLE: Color = Color::rgba(255, 255, 255, 235);
    pub(super) const SUBTITLE: Color = Color::rgba(255, 255, 255, 204);
    pub(super) const CLOCK: Color = Color::rgba(255, 255, 255, 217);
}

/// Texts drawn into the scene.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneLabels {
    pub title: String,
    pub subtitle: String,
    /// Short team name on the scoreboard.
    pub crest: String,
}

impl Default for SceneLabels {
    fn default() -> Self {
        Self {
            title: "KOSOVAR DREAMS".to_owned(),
            subtitle: "Pristina Junior League Finals".to_owned(),
            crest: "KOSOVA".to_owned(),
        }
    }
}

/// Draws complete frames of the vignette. Holds no per-frame state.
#[derive(Clone, Debug, Default)]
pub struct FrameRenderer {
    labels: SceneLabels,
}

impl FrameRenderer {
    pub fn new(labels: SceneLabels) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &SceneLabels {
        &self.labels
    }

    /// Replace everything on `ctx` with the scene at `progress`.
    ///
    /// Returns [`KickshotError::InvalidDimensions`] without touching `ctx` when `size` is not
    /// drawable.
    pub fn render(
        &self,
        ctx: &mut dyn DrawContext,
        progress: Progress,
        size: LogicalSize,
    ) -> KickshotResult<()> {
        if !size.is_drawable() {
            return Err(KickshotError::invalid_dimensions(size.width, size.height));
        }
        let g = SceneGeometry::compute(progress, size);
        tracing::trace!(progress = progress.get(), phase = ?g.phase, "render frame");

        ctx.clear();
        ctx.set_global_alpha(1.0);
        draw_background(ctx, size);
        draw_field(ctx, &g.field);
        draw_scoreboard(ctx, &g.scoreboard, &self.labels.crest);
        draw_figure(ctx, &g.figure);
        draw_ball(ctx, &g.ball);
        draw_overlay(ctx, &g.overlay, &self.labels);
        if let Some(trail) = &g.trail {
            draw_trail(ctx, trail);
        }
        Ok(())
    }
}

fn line_path(line: Line) -> BezPath {
    let mut p = BezPath::new();
    p.move_to(line.p0);
    p.line_to(line.p1);
    p
}

fn style(weight: u16, size_px: f64, color: Color) -> TextStyle {
    TextStyle {
        weight,
        size_px,
        family: FONT_FAMILY,
        color,
    }
}

fn draw_background(ctx: &mut dyn DrawContext, size: LogicalSize) {
    let full = kurbo::Rect::new(0.0, 0.0, size.width, size.height);
    ctx.fill_rect(full, &Paint::Solid(palette::BACKGROUND));

    let sky = LinearGradient {
        start: Point::ZERO,
        end: Point::new(0.0, size.height),
        stops: vec![
            GradientStop {
                offset: 0.0,
                color: palette::SKY_TOP,
            },
            GradientStop {
                offset: 0.4,
                color: palette::SKY_CLEAR,
            },
            GradientStop {
                offset: 1.0,
                color: palette::SKY_BOTTOM,
            },
        ],
    };
    ctx.fill_rect(full, &Paint::Linear(sky));
}

fn draw_field(ctx: &mut dyn DrawContext, field: &FieldLayout) {
    let lines = StrokeStyle::new(palette::PITCH_LINES, 2.0);
    ctx.fill_rect(field.pitch, &Paint::Solid(palette::PITCH));
    ctx.stroke_rect(field.border, &lines);
    ctx.stroke_path(&field.center_circle.to_path(TOLERANCE), &lines);
    ctx.fill_rect(field.goal_post, &Paint::Solid(palette::GOAL_POST));
}

fn draw_scoreboard(ctx: &mut dyn DrawContext, board: &Scoreboard, label: &str) {
    ctx.fill_rect(board.board, &Paint::Solid(palette::BOARD));
    ctx.fill_path(&board.crest.to_path(TOLERANCE), palette::CREST);
    ctx.fill_text(label, board.label_origin, &style(600, 12.0, Color::WHITE));
}

fn draw_figure(ctx: &mut dyn DrawContext, fig: &Figure) {
    ctx.fill_path(&fig.head.to_path(TOLERANCE), palette::SKIN);
    for eye in fig.eyes {
        ctx.fill_path(&eye.to_path(TOLERANCE), Color::BLACK);
    }
    ctx.stroke_path(
        &fig.mouth.to_path(TOLERANCE),
        &StrokeStyle::new(palette::MOUTH, 2.0),
    );

    ctx.stroke_path(
        &line_path(fig.torso),
        &StrokeStyle::new(palette::JERSEY, 8.0),
    );
    let sleeve = StrokeStyle::new(palette::JERSEY, 6.0);
    for arm in fig.arms {
        ctx.stroke_path(&line_path(arm), &sleeve);
    }
    ctx.stroke_path(
        &line_path(fig.shorts),
        &StrokeStyle::new(palette::SHORTS, 10.0),
    );

    let legs = StrokeStyle::new(palette::LEGS, 7.0);
    ctx.stroke_path(&line_path(fig.anchor_leg), &legs);
    ctx.stroke_path(&line_path(fig.kick_leg), &legs);

    ctx.fill_rect(fig.collar, &Paint::Solid(palette::COLLAR));
}

fn draw_ball(ctx: &mut dyn DrawContext, ball: &Ball) {
    let shape = kurbo::Circle::new(ball.center, ball.radius);
    ctx.fill_path(&shape.to_path(TOLERANCE), Color::WHITE);

    let [h, v] = ball.seams();
    let mut seams = line_path(h);
    seams.move_to(v.p0);
    seams.line_to(v.p1);
    ctx.stroke_path(&seams, &StrokeStyle::new(palette::BALL_SEAMS, 2.0));
}

fn draw_trail(ctx: &mut dyn DrawContext, trail: &Trail) {
    ctx.set_global_alpha(trail.alpha as f32);
    ctx.stroke_path(
        &line_path(trail.line),
        &StrokeStyle::new(Color::WHITE, 6.0),
    );
    ctx.set_global_alpha(1.0);
}

fn draw_overlay(ctx: &mut dyn DrawContext, overlay: &Overlay, labels: &SceneLabels) {
    ctx.fill_text(
        &labels.title,
        overlay.title_origin,
        &style(900, 32.0, palette::TITLE),
    );
    ctx.fill_text(
        &labels.subtitle,
        overlay.subtitle_origin,
        &style(600, 18.0, palette::SUBTITLE),
    );
    ctx.fill_text(
        &overlay.clock,
        overlay.clock_origin,
        &style(700, 14.0, palette::CLOCK),
    );
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
