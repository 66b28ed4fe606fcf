use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use kickshot::{
    AnimationDriver, Canvas, CpuSurface, FfmpegSink, FfmpegSinkOpts, FrameOutcome, IntervalPacer,
    Progress, VignetteConfig,
};

#[derive(Parser, Debug)]
#[command(name = "kickshot", version)]
struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render the whole playback as an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Play the vignette in real time against a wall-clock pacer.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct SceneArgs {
    /// Vignette config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the logical canvas width.
    #[arg(long)]
    width: Option<u32>,

    /// Override the logical canvas height.
    #[arg(long)]
    height: Option<u32>,

    /// Override the device pixel ratio.
    #[arg(long)]
    dpr: Option<f64>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Playback progress in [0, 1].
    #[arg(long, default_value_t = 1.0)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Overwrite output if it already exists.
    #[arg(long, default_value_t = true)]
    overwrite: bool,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Replay this many times after the first playback finishes.
    #[arg(long, default_value_t = 0)]
    replays: u32,

    /// Write the last presented frame as a PNG.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn load_config(args: &SceneArgs) -> anyhow::Result<VignetteConfig> {
    let mut cfg = match &args.config {
        Some(path) => VignetteConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => VignetteConfig::default(),
    };
    cfg.canvas = Canvas {
        width: args.width.unwrap_or(cfg.canvas.width),
        height: args.height.unwrap_or(cfg.canvas.height),
    };
    if let Some(dpr) = args.dpr {
        cfg.device_pixel_ratio = dpr;
    }
    cfg.validate().context("invalid vignette config")?;
    Ok(cfg)
}

fn write_frame(frame: &kickshot::FrameRGBA, out: &Path) -> anyhow::Result<()> {
    kickshot::write_png(frame, out).with_context(|| format!("write png '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.scene)?;
    if !(0.0..=1.0).contains(&args.progress) {
        anyhow::bail!("--progress must be within [0, 1], got {}", args.progress);
    }
    let frame = kickshot::render_still(&cfg, Progress::new(args.progress))?;
    write_frame(&frame, &args.out)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.scene)?;
    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: args.out.clone(),
        overwrite: args.overwrite,
        bg_rgba: [0, 0, 0, 255],
    });
    let stats = kickshot::render_playback(&cfg, &mut sink)
        .with_context(|| format!("render '{}'", args.out.display()))?;

    tracing::info!(frames = stats.frames_total, "render finished");
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.scene)?;
    let surface = CpuSurface::new(cfg.logical_size(), cfg.device_pixel_ratio);
    let pacer = IntervalPacer::new(cfg.fps);
    let mut driver = AnimationDriver::from_config(surface, pacer, &cfg)?;
    driver.on_state_change(|change| {
        tracing::info!(from = ?change.from, to = ?change.to, "playback");
    });

    for round in 0..=args.replays {
        let now = driver.pacer().now();
        if round == 0 {
            driver.start(now)?;
        } else {
            driver.replay(now)?;
        }
        while let Some(tick) = driver.pacer_mut().wait_next() {
            if let FrameOutcome::Skipped { progress } = driver.on_frame(tick)? {
                tracing::debug!(progress = progress.get(), "frame skipped");
            }
        }
    }

    tracing::info!(
        drawn = driver.frames_drawn(),
        skipped = driver.frames_skipped(),
        "playback finished"
    );
    if let Some(out) = &args.out {
        let frame = driver.surface().readback()?;
        write_frame(&frame, out)?;
    }
    Ok(())
}
