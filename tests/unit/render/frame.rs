use super::*;
use crate::render::recording::{DrawOp, RecordingContext};
use crate::scene::geometry::KICK_START;

fn hd() -> LogicalSize {
    LogicalSize::new(960.0, 540.0)
}

fn record(progress: f64) -> RecordingContext {
    let mut ctx = RecordingContext::new();
    FrameRenderer::default()
        .render(&mut ctx, Progress::new(progress), hd())
        .unwrap();
    ctx
}

#[test]
fn frame_starts_with_clear_and_background() {
    let ctx = record(0.0);
    let ops = ctx.ops();
    assert_eq!(ops[0].op, DrawOp::Clear);
    assert!(matches!(
        &ops[1].op,
        DrawOp::FillRect { paint: Paint::Solid(c), .. } if *c == palette::BACKGROUND
    ));
    let DrawOp::FillRect {
        rect,
        paint: Paint::Linear(sky),
    } = &ops[2].op
    else {
        panic!("expected gradient overlay, got {:?}", ops[2].op);
    };
    assert_eq!(rect.width(), 960.0);
    assert_eq!(sky.end, Point::new(0.0, 540.0));
    let offsets: Vec<f64> = sky.stops.iter().map(|s| s.offset).collect();
    assert_eq!(offsets, vec![0.0, 0.4, 1.0]);
}

#[test]
fn approach_frame_has_no_trail_and_full_opacity() {
    let ctx = record(0.0);
    assert_eq!(ctx.ops().len(), 26);
    assert!(ctx.ops().iter().all(|r| r.alpha == 1.0));
}

#[test]
fn final_frame_draws_trail_at_capped_alpha() {
    let ctx = record(1.0);
    assert_eq!(ctx.ops().len(), 27);

    let faded: Vec<_> = ctx.ops().iter().filter(|r| r.alpha < 1.0).collect();
    assert_eq!(faded.len(), 1);
    assert!((faded[0].alpha - 0.9).abs() < 1e-6);
    assert!(matches!(
        &faded[0].op,
        DrawOp::StrokePath { stroke, .. } if stroke.color == Color::WHITE && stroke.width == 6.0
    ));
    assert_eq!(ctx.alpha(), 1.0);
}

#[test]
fn trail_is_stroked_over_the_overlay_text() {
    let ctx = record(1.0);
    let ops = ctx.ops();
    let last = ops.last().unwrap();
    assert!((last.alpha - 0.9).abs() < 1e-6);
    assert!(matches!(&last.op, DrawOp::StrokePath { .. }));
    assert!(matches!(&ops[ops.len() - 2].op, DrawOp::FillText { .. }));
}

#[test]
fn overlay_texts_follow_labels_and_clock() {
    assert_eq!(
        record(0.0).texts(),
        vec![
            "KOSOVA",
            "KOSOVAR DREAMS",
            "Pristina Junior League Finals",
            "00:10.0"
        ]
    );
    assert_eq!(record(1.0).texts().last().copied(), Some("00:00.0"));

    let renderer = FrameRenderer::new(SceneLabels {
        title: "NIGHT MATCH".to_owned(),
        ..SceneLabels::default()
    });
    let mut ctx = RecordingContext::new();
    renderer
        .render(&mut ctx, Progress::new(KICK_START), hd())
        .unwrap();
    assert_eq!(ctx.texts()[1], "NIGHT MATCH");
}

#[test]
fn invalid_dimensions_leave_context_untouched() {
    let mut ctx = RecordingContext::new();
    let err = FrameRenderer::default()
        .render(&mut ctx, Progress::START, LogicalSize::new(0.0, 540.0))
        .unwrap_err();
    assert!(err.is_transient());
    assert!(ctx.ops().is_empty());
}

#[test]
fn rendering_is_deterministic_and_replaces_prior_frame() {
    let a = record(0.42);
    let b = record(0.42);
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), record(0.43).fingerprint());

    let mut ctx = RecordingContext::new();
    let renderer = FrameRenderer::default();
    renderer.render(&mut ctx, Progress::new(0.9), hd()).unwrap();
    renderer.render(&mut ctx, Progress::new(0.42), hd()).unwrap();
    assert_eq!(ctx.fingerprint(), a.fingerprint());
}

#[test]
fn ball_is_drawn_where_geometry_puts_it() {
    let p = Progress::new(0.8);
    let g = SceneGeometry::compute(p, hd());
    let ctx = record(0.8);
    let expected = kurbo::Circle::new(g.ball.center, g.ball.radius).to_path(TOLERANCE);
    assert!(ctx.ops().iter().any(|r| matches!(
        &r.op,
        DrawOp::FillPath { path, color } if *color == Color::WHITE && *path == expected
    )));
}

#[test]
fn labels_deserialize_with_defaults() {
    let labels: SceneLabels = serde_json::from_str(r#"{ "crest": "PRISHTINA" }"#).unwrap();
    assert_eq!(labels.crest, "PRISHTINA");
    assert_eq!(labels.title, SceneLabels::default().title);
    assert!(serde_json::from_str::<SceneLabels>(r#"{ "motto": "x" }"#).is_err());
}
