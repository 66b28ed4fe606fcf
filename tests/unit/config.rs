use super::*;

#[test]
fn empty_object_yields_defaults() {
    let cfg = VignetteConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, VignetteConfig::default());
    assert_eq!(cfg.total_duration(), Duration::from_millis(9_000));
    assert_eq!(cfg.logical_size(), LogicalSize::new(960.0, 540.0));
    assert_eq!(cfg.fps, Fps { num: 60, den: 1 });
    cfg.validate().unwrap();
}

#[test]
fn partial_overrides_keep_other_defaults() {
    let cfg = VignetteConfig::from_json_str(
        r#"{
            "duration_ms": 3000,
            "device_pixel_ratio": 2.0,
            "labels": { "title": "FINAL WHISTLE" }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.duration_ms, 3_000);
    assert_eq!(cfg.backing_size(), PhysicalSize::new(1920, 1080));
    assert_eq!(cfg.labels.title, "FINAL WHISTLE");
    assert_eq!(cfg.labels.crest, "KOSOVA");
    assert_eq!(cfg.canvas, VignetteConfig::default().canvas);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = VignetteConfig::from_json_str(r#"{ "loop": true }"#).unwrap_err();
    assert!(matches!(err, KickshotError::Serde(_)));
}

#[test]
fn validation_rejects_bad_values() {
    let bad = [
        VignetteConfig {
            duration_ms: 0,
            ..VignetteConfig::default()
        },
        VignetteConfig {
            canvas: Canvas {
                width: 0,
                height: 540,
            },
            ..VignetteConfig::default()
        },
        VignetteConfig {
            device_pixel_ratio: 0.0,
            ..VignetteConfig::default()
        },
        VignetteConfig {
            device_pixel_ratio: f64::NAN,
            ..VignetteConfig::default()
        },
        VignetteConfig {
            device_pixel_ratio: 0.001,
            ..VignetteConfig::default()
        },
        VignetteConfig {
            device_pixel_ratio: 100.0,
            ..VignetteConfig::default()
        },
        VignetteConfig {
            fps: Fps { num: 0, den: 1 },
            ..VignetteConfig::default()
        },
    ];
    for cfg in bad {
        assert!(
            matches!(cfg.validate(), Err(KickshotError::Validation(_))),
            "{cfg:?}"
        );
    }
}

#[test]
fn missing_file_is_a_validation_error() {
    let err = VignetteConfig::from_path("/definitely/not/here/kickshot.json").unwrap_err();
    assert!(err.to_string().contains("open config JSON"));
}
