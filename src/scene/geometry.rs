//! Pure per-frame scene geometry.
//!
//! Every coordinate of a frame is derived here from `(progress, width, height)` alone. Nothing is
//! carried over between frames, so rendering any progress value in any order gives the same picture.

use std::f64::consts::{PI, TAU};

use crate::foundation::core::{Circle, Ellipse, Line, LogicalSize, Point, Progress, Rect, Vec2};

/// Progress at which the approach ends and the kick begins.
pub const KICK_START: f64 = 0.55;

/// Inset of the field (and the overlay text block) from the surface edges.
pub const FIELD_MARGIN: f64 = 40.0;
const FIELD_HEIGHT_FRACTION: f64 = 0.35;
const BORDER_INSET_X: f64 = 12.0;
const BORDER_INSET_Y: f64 = 18.0;
const CENTER_CIRCLE_RADIUS: f64 = 35.0;

const CHILD_START_OFFSET: f64 = 120.0;
const CHILD_TRAVEL_FRACTION: f64 = 0.35;
const BOB_HEIGHT: f64 = 6.0;
const HIP_HEIGHT: f64 = 60.0;

pub const HEAD_RADIUS: f64 = 14.0;
pub const TORSO_LENGTH: f64 = 40.0;
pub const LEG_LENGTH: f64 = 38.0;
pub const ARM_LENGTH: f64 = 32.0;
const ARM_SWING: f64 = 8.0;
const ANCHOR_LEG_WOBBLE: f64 = 0.15;
const ANCHOR_LEG_REACH: f64 = 0.4;
const KICK_REST_ANGLE: f64 = PI / 2.4;
const KICK_REST_SWING: f64 = 0.1;
const KICK_SWEEP: f64 = 1.4;
const KICK_WOBBLE: f64 = 0.05;

pub const BALL_RADIUS: f64 = 12.0;
const BALL_FOOT_OFFSET: Vec2 = Vec2::new(26.0, -6.0);
const BALL_FLIGHT_FRACTION: f64 = 0.35;
const BALL_ARC_HEIGHT: f64 = 65.0;
const BALL_DRIFT: f64 = 12.0;

const TRAIL_START: f64 = 0.2;
const TRAIL_RAMP: f64 = 2.0;
pub const TRAIL_MAX_ALPHA: f64 = 0.9;
const TRAIL_OFFSET: Vec2 = Vec2::new(-24.0, -18.0);

/// Seconds shown by the countdown clock at the start of playback.
pub const COUNTDOWN_SECS: f64 = 10.0;

/// Which half of the scripted motion a progress value falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KickPhase {
    /// Running toward the ball; the ball rests at the foot.
    Approach,
    /// Leg swing and ball flight. Starts exactly at [`KICK_START`].
    Kick,
}

impl KickPhase {
    pub fn of(progress: Progress) -> Self {
        if progress.get() < KICK_START {
            Self::Approach
        } else {
            Self::Kick
        }
    }
}

/// Progress re-normalized inside the kick phase: `0` at [`KICK_START`] and before, `1` at the end.
pub fn kick_progress(progress: Progress) -> f64 {
    match KickPhase::of(progress) {
        KickPhase::Approach => 0.0,
        KickPhase::Kick => ((progress.get() - KICK_START) / (1.0 - KICK_START)).clamp(0.0, 1.0),
    }
}

/// Countdown label in `00:SS.s` form, counting from [`COUNTDOWN_SECS`] down to zero.
pub fn countdown_label(progress: Progress) -> String {
    let secs = ((1.0 - progress.get()) * COUNTDOWN_SECS).max(0.0);
    let tenths = (secs * 10.0).round() as u64;
    format!("00:{:02}.{}", tenths / 10, tenths % 10)
}

/// Pitch, border, center circle and goal post.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldLayout {
    pub margin: f64,
    pub top: f64,
    pub height: f64,
    /// The grass rectangle.
    pub pitch: Rect,
    /// Inset touch line.
    pub border: Rect,
    pub center_circle: Circle,
    pub goal_post: Rect,
    /// Y of the ground line the figure stands on.
    pub base_ground: f64,
}

/// Top-right score block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scoreboard {
    pub board: Rect,
    pub crest: Ellipse,
    pub label_origin: Point,
}

/// Stick figure segments for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Figure {
    /// Head center; moves with the horizontal run and the vertical bob.
    pub origin: Point,
    pub head: Circle,
    pub eyes: [Circle; 2],
    /// Lower half circle.
    pub mouth: kurbo::Arc,
    pub torso: Line,
    pub arms: [Line; 2],
    pub shorts: Line,
    pub anchor_leg: Line,
    pub kick_leg: Line,
    pub collar: Rect,
    pub anchor_leg_angle: f64,
    pub kick_leg_angle: f64,
}

/// The ball and its optional motion streak.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ball {
    pub center: Point,
    pub radius: f64,
}

impl Ball {
    /// Horizontal and vertical seam lines.
    pub fn seams(&self) -> [Line; 2] {
        let Point { x, y } = self.center;
        let r = self.radius;
        [
            Line::new((x - r, y), (x + r, y)),
            Line::new((x, y - r), (x, y + r)),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trail {
    pub line: Line,
    /// Global alpha in `(0, TRAIL_MAX_ALPHA]`.
    pub alpha: f64,
}

/// Anchors of the overlay text block.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    pub title_origin: Point,
    pub subtitle_origin: Point,
    pub clock_origin: Point,
    pub clock: String,
}

/// Every derived coordinate of one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneGeometry {
    pub progress: Progress,
    pub size: LogicalSize,
    pub phase: KickPhase,
    pub kick_progress: f64,
    pub field: FieldLayout,
    pub scoreboard: Scoreboard,
    pub figure: Figure,
    pub ball: Ball,
    pub trail: Option<Trail>,
    pub overlay: Overlay,
}

impl SceneGeometry {
    /// Compute the scene for `progress` on a surface of `size` logical units.
    pub fn compute(progress: Progress, size: LogicalSize) -> Self {
        let p = progress.get();
        let LogicalSize { width, height } = size;

        let field = field_layout(width, height);
        let scoreboard = scoreboard(width);

        let phase = KickPhase::of(progress);
        let kick = kick_progress(progress);
        let movement = (p * 2.0 * TAU).sin();

        let child_start_x = field.margin + CHILD_START_OFFSET;
        let travel = width * CHILD_TRAVEL_FRACTION;
        let child_x = child_start_x + travel * (p / KICK_START).min(1.0);
        let child_y = field.base_ground - HIP_HEIGHT - movement.abs() * BOB_HEIGHT;
        let origin = Point::new(child_x, child_y);

        let anchor_leg_angle = PI / 2.0 + ANCHOR_LEG_WOBBLE * (p * TAU).sin();
        let kick_leg_angle = match phase {
            KickPhase::Approach => KICK_REST_ANGLE - movement * KICK_REST_SWING,
            KickPhase::Kick => KICK_REST_ANGLE - kick * KICK_SWEEP + movement * KICK_WOBBLE,
        };
        let figure = figure(
            origin,
            field.base_ground,
            movement,
            anchor_leg_angle,
            kick_leg_angle,
        );

        let rest = Point::new(child_x, field.base_ground) + BALL_FOOT_OFFSET;
        let center = match phase {
            KickPhase::Approach => rest,
            KickPhase::Kick => {
                let lift = (kick * PI).min(PI).sin() * BALL_ARC_HEIGHT + kick * BALL_DRIFT;
                Point::new(rest.x + kick * width * BALL_FLIGHT_FRACTION, rest.y - lift)
            }
        };
        let ball = Ball {
            center,
            radius: BALL_RADIUS,
        };

        let trail = (kick > TRAIL_START).then(|| Trail {
            line: Line::new(center + TRAIL_OFFSET, center),
            alpha: ((kick - TRAIL_START) * TRAIL_RAMP).min(TRAIL_MAX_ALPHA),
        });

        let overlay = Overlay {
            title_origin: Point::new(FIELD_MARGIN, FIELD_MARGIN + 28.0),
            subtitle_origin: Point::new(FIELD_MARGIN, FIELD_MARGIN + 52.0),
            clock_origin: Point::new(width / 2.0 - 36.0, FIELD_MARGIN + 18.0),
            clock: countdown_label(progress),
        };

        Self {
            progress,
            size,
            phase,
            kick_progress: kick,
            field,
            scoreboard,
            figure,
            ball,
            trail,
            overlay,
        }
    }

    /// Every coordinate finite and every extent non-negative.
    pub fn is_well_formed(&self) -> bool {
        let pt = |p: Point| p.x.is_finite() && p.y.is_finite();
        let rect = |r: Rect| pt(r.origin()) && r.width() >= 0.0 && r.height() >= 0.0;
        let line = |l: Line| pt(l.p0) && pt(l.p1);
        let circle = |c: Circle| pt(c.center) && c.radius >= 0.0;

        let f = &self.field;
        let fig = &self.figure;
        let radii = fig.mouth.radii;
        let crest = self.scoreboard.crest.radii();

        rect(f.pitch)
            && rect(f.border)
            && circle(f.center_circle)
            && rect(f.goal_post)
            && f.base_ground.is_finite()
            && rect(self.scoreboard.board)
            && pt(self.scoreboard.crest.center())
            && crest.x >= 0.0
            && crest.y >= 0.0
            && circle(fig.head)
            && fig.eyes.iter().all(|&e| circle(e))
            && pt(fig.mouth.center)
            && radii.x >= 0.0
            && radii.y >= 0.0
            && line(fig.torso)
            && fig.arms.iter().all(|&a| line(a))
            && line(fig.shorts)
            && line(fig.anchor_leg)
            && line(fig.kick_leg)
            && rect(fig.collar)
            && pt(self.ball.center)
            && self.ball.radius >= 0.0
            && self
                .trail
                .is_none_or(|t| line(t.line) && (0.0..=TRAIL_MAX_ALPHA).contains(&t.alpha))
            && pt(self.overlay.title_origin)
            && pt(self.overlay.subtitle_origin)
            && pt(self.overlay.clock_origin)
    }
}

fn rect_clamped(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::from_origin_size((x, y), (w.max(0.0), h.max(0.0)))
}

fn field_layout(width: f64, height: f64) -> FieldLayout {
    let margin = FIELD_MARGIN;
    let field_height = height * FIELD_HEIGHT_FRACTION;
    let top = height - field_height - margin;
    let mid_y = top + field_height / 2.0;

    FieldLayout {
        margin,
        top,
        height: field_height,
        pitch: rect_clamped(margin, top, width - margin * 2.0, field_height),
        border: rect_clamped(
            margin + BORDER_INSET_X,
            top + BORDER_INSET_Y,
            width - (margin + BORDER_INSET_X) * 2.0,
            field_height - BORDER_INSET_Y * 2.0,
        ),
        center_circle: Circle::new((width / 2.0, mid_y), CENTER_CIRCLE_RADIUS),
        goal_post: rect_clamped(width - margin - 46.0, mid_y - 40.0, 6.0, 80.0),
        base_ground: top + field_height - 20.0,
    }
}

fn scoreboard(width: f64) -> Scoreboard {
    let m = FIELD_MARGIN;
    Scoreboard {
        board: rect_clamped(width - m - 120.0, m, 100.0, 70.0),
        crest: Ellipse::new((width - m - 70.0, m + 40.0), (22.0, 12.0), 0.0),
        label_origin: Point::new(width - m - 116.0, m + 18.0),
    }
}

fn figure(
    origin: Point,
    base_ground: f64,
    movement: f64,
    anchor_leg_angle: f64,
    kick_leg_angle: f64,
) -> Figure {
    let Point { x, y } = origin;
    let neck = y + HEAD_RADIUS;
    let shorts_top = neck + TORSO_LENGTH;
    let hip = shorts_top + 2.0;
    let arm_swing = movement * ARM_SWING;
    let shoulder = Point::new(x, neck + 8.0);
    let hand_y = neck + 18.0;

    let anchor_foot_x = x - anchor_leg_angle.cos() * LEG_LENGTH * ANCHOR_LEG_REACH;
    let kick_foot = Point::new(
        x + kick_leg_angle.cos() * LEG_LENGTH,
        hip + kick_leg_angle.sin() * LEG_LENGTH,
    );

    Figure {
        origin,
        head: Circle::new(origin, HEAD_RADIUS),
        eyes: [
            Circle::new((x - 4.0, y - 4.0), 2.0),
            Circle::new((x + 4.0, y - 4.0), 2.0),
        ],
        mouth: kurbo::Arc {
            center: Point::new(x, y + 3.0),
            radii: Vec2::new(6.0, 6.0),
            start_angle: 0.0,
            sweep_angle: PI,
            x_rotation: 0.0,
        },
        torso: Line::new((x, neck), (x, shorts_top)),
        arms: [
            Line::new(shoulder, (x - ARM_LENGTH + arm_swing, hand_y)),
            Line::new(shoulder, (x + ARM_LENGTH + arm_swing, hand_y)),
        ],
        shorts: Line::new((x, shorts_top), (x, shorts_top + 4.0)),
        anchor_leg: Line::new((x - 4.0, hip), (anchor_foot_x, base_ground - 4.0)),
        kick_leg: Line::new((x + 4.0, hip), kick_foot),
        collar: rect_clamped(x - 12.0, neck - 6.0, 24.0, 10.0),
        anchor_leg_angle,
        kick_leg_angle,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/geometry.rs"]
mod tests;
