use super::*;

const EPS: f64 = 1e-9;

fn hd() -> LogicalSize {
    LogicalSize::new(960.0, 540.0)
}

fn at(p: f64) -> SceneGeometry {
    SceneGeometry::compute(Progress::new(p), hd())
}

#[test]
fn start_of_playback_holds_ball_at_the_foot() {
    let g = at(0.0);
    assert_eq!(g.phase, KickPhase::Approach);
    assert_eq!(g.kick_progress, 0.0);
    assert!((g.field.base_ground - 480.0).abs() < EPS);

    let child_start_x = FIELD_MARGIN + 120.0;
    let ground = g.field.base_ground;
    assert_eq!(g.figure.origin, Point::new(child_start_x, ground - 60.0));
    assert_eq!(g.ball.center, Point::new(child_start_x + 26.0, ground - 6.0));
    assert!((g.figure.kick_leg_angle - PI / 2.4).abs() < EPS);
    assert!((g.figure.anchor_leg_angle - PI / 2.0).abs() < EPS);
    assert!(g.trail.is_none());
    assert_eq!(g.overlay.clock, "00:10.0");
}

#[test]
fn kick_boundary_starts_the_kick_phase_at_zero() {
    let g = at(KICK_START);
    assert_eq!(g.phase, KickPhase::Kick);
    assert_eq!(g.kick_progress, 0.0);
    assert_eq!(KickPhase::of(Progress::new(KICK_START - 1e-9)), KickPhase::Approach);

    let travelled_x = FIELD_MARGIN + 120.0 + 960.0 * 0.35;
    assert!((g.figure.origin.x - travelled_x).abs() < EPS);
    assert!((g.ball.center.x - (travelled_x + 26.0)).abs() < EPS);
    assert!((g.ball.center.y - (480.0 - 6.0)).abs() < EPS);
}

#[test]
fn end_of_playback_completes_flight_and_clock() {
    let kick_start = at(KICK_START);
    let g = at(1.0);
    assert_eq!(g.kick_progress, 1.0);
    assert!((g.ball.center.x - kick_start.ball.center.x - 0.35 * 960.0).abs() < EPS);
    assert!((g.ball.center.y - (480.0 - 6.0 - 12.0)).abs() < 1e-6);
    assert!((g.figure.kick_leg_angle - (PI / 2.4 - 1.4)).abs() < 1e-6);
    assert!((g.trail.unwrap().alpha - TRAIL_MAX_ALPHA).abs() < EPS);
    assert_eq!(g.overlay.clock, "00:00.0");
}

#[test]
fn figure_translation_holds_after_kick_start() {
    let a = at(0.6);
    let b = at(0.95);
    assert_eq!(a.figure.origin.x, b.figure.origin.x);
    assert!(at(0.3).figure.origin.x < a.figure.origin.x);
}

#[test]
fn ball_x_is_monotonic_through_the_kick() {
    let steps = 2000;
    let mut prev: Option<f64> = None;
    for i in 0..=steps {
        let p = KICK_START + (1.0 - KICK_START) * (i as f64) / (steps as f64);
        let x = at(p).ball.center.x;
        if let Some(prev) = prev {
            if i < steps {
                assert!(x > prev, "ball x must strictly increase at p={p}");
            } else {
                assert!(x >= prev);
            }
        }
        prev = Some(x);
    }
}

#[test]
fn ball_rises_then_falls() {
    let launch = at(KICK_START).ball.center.y;
    let apex = at(KICK_START + (1.0 - KICK_START) * 0.5).ball.center.y;
    let landing = at(1.0).ball.center.y;
    assert!(apex < launch - 60.0);
    assert!(landing > apex);
}

#[test]
fn trail_fades_in_and_caps() {
    let kick_at = |k: f64| at(KICK_START + (1.0 - KICK_START) * k);
    assert!(kick_at(0.19).trail.is_none());
    assert!((kick_at(0.4).trail.unwrap().alpha - 0.4).abs() < 1e-6);
    assert!((kick_at(0.65).trail.unwrap().alpha - 0.9).abs() < 1e-6);
    assert!((kick_at(0.8).trail.unwrap().alpha - 0.9).abs() < EPS);

    let t = kick_at(0.5).trail.unwrap();
    let ball = kick_at(0.5).ball.center;
    assert_eq!(t.line.p1, ball);
    assert_eq!(t.line.p0, ball + Vec2::new(-24.0, -18.0));
}

#[test]
fn countdown_label_rounds_to_tenths() {
    assert_eq!(countdown_label(Progress::new(0.5)), "00:05.0");
    assert_eq!(countdown_label(Progress::new(0.123)), "00:08.8");
    assert_eq!(countdown_label(Progress::new(0.999)), "00:00.0");
    assert_eq!(countdown_label(Progress::new(0.001)), "00:10.0");
}

#[test]
fn geometry_is_well_formed_across_progress_and_sizes() {
    let sizes = [
        LogicalSize::new(1.0, 1.0),
        LogicalSize::new(37.5, 20.25),
        LogicalSize::new(320.0, 180.0),
        LogicalSize::new(960.0, 540.0),
        LogicalSize::new(3840.0, 2160.0),
    ];
    for size in sizes {
        for i in 0..=400 {
            let p = Progress::new(i as f64 / 400.0);
            let g = SceneGeometry::compute(p, size);
            assert!(g.is_well_formed(), "malformed geometry at p={p:?} size={size:?}");
        }
        for p in [0.0, KICK_START, 1.0] {
            assert!(SceneGeometry::compute(Progress::new(p), size).is_well_formed());
        }
    }
}

#[test]
fn same_inputs_give_identical_geometry() {
    for p in [0.0, 0.17, KICK_START, 0.8, 1.0] {
        assert_eq!(at(p), at(p));
    }
}

#[test]
fn field_scales_with_surface() {
    let small = SceneGeometry::compute(Progress::START, LogicalSize::new(480.0, 270.0));
    let big = SceneGeometry::compute(Progress::START, LogicalSize::new(960.0, 540.0));
    assert!((small.field.height * 2.0 - big.field.height).abs() < EPS);
    assert_eq!(big.field.pitch.width(), 960.0 - 80.0);
    assert_eq!(big.field.center_circle.center.x, 480.0);
}
