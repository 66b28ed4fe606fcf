use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{Canvas, Fps};

fn tiny() -> VignetteConfig {
    VignetteConfig {
        duration_ms: 100,
        canvas: Canvas {
            width: 64,
            height: 36,
        },
        fps: Fps { num: 30, den: 1 },
        ..VignetteConfig::default()
    }
}

#[test]
fn still_frame_matches_backing_size() {
    let cfg = VignetteConfig {
        device_pixel_ratio: 2.0,
        ..tiny()
    };
    let frame = render_still(&cfg, Progress::new(0.3)).unwrap();
    assert_eq!((frame.width, frame.height), (128, 72));
    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 128 * 72 * 4);
}

#[test]
fn still_frame_rejects_invalid_config() {
    let cfg = VignetteConfig {
        duration_ms: 0,
        ..tiny()
    };
    assert!(render_still(&cfg, Progress::START).is_err());
}

#[test]
fn playback_covers_start_to_end_in_order() {
    let cfg = tiny();
    let mut sink = InMemorySink::new();
    let stats = render_playback(&cfg, &mut sink).unwrap();

    assert_eq!(stats.frames_total, 4);
    assert!(sink.is_finished());
    let sink_cfg = sink.config().unwrap();
    assert_eq!((sink_cfg.width, sink_cfg.height, sink_cfg.frames), (64, 36, 4));

    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 2, 3]);
    assert!(sink.frames().iter().all(|(_, f)| f.width == 64 && f.height == 36));
    // The approach frame and the final frame differ.
    assert_ne!(sink.frames()[0].1.data, sink.frames()[3].1.data);
}

#[test]
fn frame_progress_is_elapsed_over_total() {
    let cfg = tiny();
    assert_eq!(progress_at_frame(&cfg, FrameIndex(0)), Progress::START);
    assert!((progress_at_frame(&cfg, FrameIndex(1)).get() - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(progress_at_frame(&cfg, FrameIndex(10)), Progress::END);
}

#[test]
fn offline_renderer_is_deterministic() {
    let cfg = tiny();
    let mut r = OfflineRenderer::new(&cfg).unwrap();
    let a = r.render(Progress::new(0.7)).unwrap();
    let _ = r.render(Progress::new(0.1)).unwrap();
    let b = r.render(Progress::new(0.7)).unwrap();
    assert_eq!(a.data, b.data);
}
