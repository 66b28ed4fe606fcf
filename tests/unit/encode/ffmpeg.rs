use super::*;

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_premul_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_half_alpha_blends_background() {
    // Premultiplied white @ 50% over black.
    let src = vec![128u8, 128, 128, 128];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg(&mut dst, &src, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![128, 128, 128, 255]);
    assert!(flatten_premul_over_bg(&mut [0u8; 8], &src, [0, 0, 0, 255]).is_err());
}

#[test]
fn unpremultiply_restores_straight_color() {
    assert_eq!(unpremultiply(&[64, 0, 32, 128]), vec![128, 0, 64, 128]);
    assert_eq!(unpremultiply(&[0, 0, 0, 0]), vec![0, 0, 0, 0]);
    assert_eq!(unpremultiply(&[9, 8, 7, 255]), vec![9, 8, 7, 255]);
}

#[test]
fn sink_config_must_suit_yuv420p() {
    let ok = SinkConfig {
        width: 960,
        height: 540,
        fps: Fps { num: 60, den: 1 },
        frames: 541,
    };
    validate_sink_config(&ok).unwrap();
    assert!(validate_sink_config(&SinkConfig { width: 961, ..ok }).is_err());
    assert!(validate_sink_config(&SinkConfig { height: 0, ..ok }).is_err());
    assert!(
        validate_sink_config(&SinkConfig {
            fps: Fps { num: 0, den: 1 },
            ..ok
        })
        .is_err()
    );
}

#[test]
fn push_before_begin_is_rejected() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/never.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn png_is_written_with_straight_alpha() {
    let dir = std::env::temp_dir().join(format!("kickshot-png-{}", std::process::id()));
    let path = dir.join("nested").join("frame.png");
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![255, 0, 0, 255, 64, 0, 0, 128],
        premultiplied: true,
    };
    write_png(&frame, &path).unwrap();

    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [128, 0, 0, 128]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn encoder_args_describe_raw_input_and_h264_output() {
    let cfg = SinkConfig {
        width: 960,
        height: 540,
        fps: Fps { num: 30000, den: 1001 },
        frames: 301,
    };
    let mut opts = FfmpegSinkOpts::new("out/kick.mp4");
    let args: Vec<String> = encoder_args(&opts, &cfg)
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(args[0], "-y");
    let at = |flag: &str| args.iter().position(|a| a == flag).unwrap();
    assert_eq!(args[at("-s") + 1], "960x540");
    assert_eq!(args[at("-r") + 1], "30000/1001");
    assert!(at("-r") < at("-i"));
    assert_eq!(args[at("-c:v") + 1], "libx264");
    assert_eq!(args.last().map(String::as_str), Some("out/kick.mp4"));

    opts.overwrite = false;
    assert_eq!(encoder_args(&opts, &cfg)[0], "-n");
}
