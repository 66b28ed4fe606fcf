use super::*;

#[test]
fn progress_clamps_and_rejects_nan() {
    assert_eq!(Progress::new(-0.5), Progress::START);
    assert_eq!(Progress::new(1.7), Progress::END);
    assert_eq!(Progress::new(f64::NAN), Progress::START);
    assert_eq!(Progress::new(0.25).get(), 0.25);
}

#[test]
fn progress_from_elapsed_saturates_at_one() {
    let total = Duration::from_millis(9000);
    assert_eq!(
        Progress::from_elapsed(Duration::ZERO, total),
        Progress::START
    );
    assert_eq!(
        Progress::from_elapsed(Duration::from_millis(4500), total).get(),
        0.5
    );
    let late = Progress::from_elapsed(Duration::from_millis(20_000), total);
    assert_eq!(late, Progress::END);
    assert!(late.is_complete());
    assert!(Progress::from_elapsed(Duration::from_millis(1), Duration::ZERO).is_complete());
}

#[test]
fn physical_size_floors_for_common_ratios() {
    let logical = LogicalSize::new(333.0, 187.0);
    for (dpr, w, h) in [(1.0, 333, 187), (1.5, 499, 280), (2.0, 666, 374), (3.0, 999, 561)] {
        assert_eq!(
            PhysicalSize::from_logical(logical, dpr),
            PhysicalSize::new(w, h)
        );
    }
}

#[test]
fn physical_size_collapses_degenerate_inputs() {
    assert!(PhysicalSize::from_logical(LogicalSize::new(-4.0, 10.0), 2.0).is_empty());
    assert!(PhysicalSize::from_logical(LogicalSize::new(f64::NAN, 10.0), 1.0).is_empty());
    assert!(!LogicalSize::new(0.0, 10.0).is_drawable());
    assert!(!LogicalSize::new(10.0, f64::INFINITY).is_drawable());
    assert!(LogicalSize::new(1.0, 1.0).is_drawable());
}

#[test]
fn fps_covers_duration_end_inclusive() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.frames_covering(Duration::from_secs(1)), 31);
    assert_eq!(fps.frames_covering(Duration::ZERO), 1);
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn color_premultiplies() {
    assert_eq!(Color::rgba(255, 128, 0, 255).premultiplied(), [255, 128, 0, 255]);
    assert_eq!(Color::rgba(255, 255, 255, 0).premultiplied(), [0, 0, 0, 0]);
    assert_eq!(Color::rgba(200, 100, 50, 128).premultiplied(), [100, 50, 25, 128]);
}
