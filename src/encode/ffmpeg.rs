use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{KickshotError, KickshotResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::cpu::FrameRGBA;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

/// Spawns the system `ffmpeg` and streams flattened RGBA8 frames to its stdin.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    session: Option<Session>,
}

/// One running encode: the child process plus the per-export state that goes with it.
struct Session {
    cfg: SinkConfig,
    child: Child,
    stdin: ChildStdin,
    stderr: JoinHandle<std::io::Result<Vec<u8>>>,
    opaque: Vec<u8>,
    next_min: u64,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            session: None,
        }
    }
}

/// Reject configurations `libx264`/`yuv420p` output cannot take.
pub fn validate_sink_config(cfg: &SinkConfig) -> KickshotResult<()> {
    Fps::new(cfg.fps.num, cfg.fps.den)?;
    if cfg.width == 0 || cfg.height == 0 {
        return Err(KickshotError::validation(format!(
            "cannot encode a {}x{} video",
            cfg.width, cfg.height
        )));
    }
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(KickshotError::validation(format!(
            "yuv420p needs even dimensions, got {}x{}",
            cfg.width, cfg.height
        )));
    }
    Ok(())
}

/// Arguments for one `ffmpeg` run reading raw RGBA8 from stdin and writing H.264 MP4.
fn encoder_args(opts: &FfmpegSinkOpts, cfg: &SinkConfig) -> Vec<OsString> {
    let size = format!("{}x{}", cfg.width, cfg.height);
    let rate = format!("{}/{}", cfg.fps.num, cfg.fps.den);
    let overwrite = if opts.overwrite { "-y" } else { "-n" };
    let input = [
        "-f", "rawvideo", "-pix_fmt", "rgba", "-s", size.as_str(), "-r", rate.as_str(), "-i", "pipe:0",
    ];
    let output = [
        "-an", "-c:v", "libx264", "-pix_fmt", "yuv420p", "-movflags", "+faststart",
    ];

    let mut args: Vec<OsString> = vec![overwrite.into(), "-loglevel".into(), "error".into()];
    args.extend(input.iter().chain(&output).map(|a| OsString::from(*a)));
    args.push(opts.out_path.as_os_str().to_owned());
    args
}

impl Session {
    fn spawn(cfg: SinkConfig, args: Vec<OsString>) -> KickshotResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| KickshotError::encode(format!("could not start ffmpeg: {e}")))?;
        let (Some(stdin), Some(mut stderr)) = (child.stdin.take(), child.stderr.take()) else {
            let _ = child.kill();
            return Err(KickshotError::encode("ffmpeg pipes were not opened"));
        };
        // ffmpeg blocks once its stderr pipe fills, so read it concurrently.
        let stderr = std::thread::spawn(move || {
            let mut buf = Vec::new();
            stderr.read_to_end(&mut buf)?;
            Ok(buf)
        });
        let opaque = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        Ok(Self {
            cfg,
            child,
            stdin,
            stderr,
            opaque,
            next_min: 0,
        })
    }

    fn finish(self) -> KickshotResult<()> {
        let Self {
            mut child,
            stdin,
            stderr,
            ..
        } = self;
        drop(stdin);
        let status = child
            .wait()
            .map_err(|e| KickshotError::encode(format!("waiting on ffmpeg: {e}")))?;
        let log = stderr
            .join()
            .map_err(|_| KickshotError::encode("ffmpeg stderr reader panicked"))?
            .map_err(|e| KickshotError::encode(format!("reading ffmpeg stderr: {e}")))?;
        if status.success() {
            return Ok(());
        }
        Err(KickshotError::encode(format!(
            "ffmpeg failed ({status}): {}",
            String::from_utf8_lossy(&log).trim()
        )))
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> KickshotResult<()> {
        validate_sink_config(&cfg)?;
        if self.session.is_some() {
            return Err(KickshotError::encode("ffmpeg sink is already encoding"));
        }
        let out = &self.opts.out_path;
        ensure_parent_dir(out)?;
        if !self.opts.overwrite && out.exists() {
            return Err(KickshotError::validation(format!(
                "refusing to overwrite '{}'",
                out.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(KickshotError::encode("MP4 export needs `ffmpeg` on PATH"));
        }

        let session = Session::spawn(cfg, encoder_args(&self.opts, &cfg))?;
        tracing::debug!(
            out = %out.display(),
            width = cfg.width,
            height = cfg.height,
            frames = cfg.frames,
            "ffmpeg started"
        );
        self.session = Some(session);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> KickshotResult<()> {
        let Some(session) = self.session.as_mut() else {
            return Err(KickshotError::encode("ffmpeg sink has not begun"));
        };
        if idx.0 < session.next_min {
            return Err(KickshotError::encode(format!(
                "frame {} arrived after frame {}",
                idx.0,
                session.next_min.saturating_sub(1)
            )));
        }
        let (w, h) = (session.cfg.width, session.cfg.height);
        if frame.width != w || frame.height != h || frame.data.len() != session.opaque.len() {
            return Err(KickshotError::validation(format!(
                "frame is {}x{} ({} bytes), sink expects {w}x{h}",
                frame.width,
                frame.height,
                frame.data.len()
            )));
        }
        session.next_min = idx.0 + 1;

        flatten_premul_over_bg(&mut session.opaque, &frame.data, self.opts.bg_rgba)?;
        session
            .stdin
            .write_all(&session.opaque)
            .map_err(|e| KickshotError::encode(format!("piping frame {} to ffmpeg: {e}", idx.0)))
    }

    fn end(&mut self) -> KickshotResult<()> {
        self.session
            .take()
            .ok_or_else(|| KickshotError::encode("ffmpeg sink has not begun"))?
            .finish()
    }
}

/// Write `frame` as a straight-alpha RGBA8 PNG.
pub fn write_png(frame: &FrameRGBA, path: &Path) -> KickshotResult<()> {
    use anyhow::Context as _;

    ensure_parent_dir(path)?;
    let straight;
    let data = if frame.premultiplied {
        straight = unpremultiply(&frame.data);
        &straight
    } else {
        &frame.data
    };
    image::save_buffer_with_format(
        path,
        data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn unpremultiply(src: &[u8]) -> Vec<u8> {
    let mut out = src.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

/// Composite premultiplied `src` over an opaque `bg` into `dst`, which ends up fully opaque.
fn flatten_premul_over_bg(dst: &mut [u8], src: &[u8], bg: [u8; 4]) -> KickshotResult<()> {
    if dst.len() != src.len() || !src.len().is_multiple_of(4) {
        return Err(KickshotError::validation(format!(
            "cannot flatten {} bytes into {}",
            src.len(),
            dst.len()
        )));
    }
    for (out, px) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let cover = 255 - u16::from(px[3]);
        for c in 0..3 {
            let under = mul_div255_u16(u16::from(bg[c]), cover);
            out[c] = (u16::from(px[c]) + under).min(255) as u8;
        }
        out[3] = 255;
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> KickshotResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
