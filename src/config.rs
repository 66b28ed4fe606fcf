//! JSON configuration for a vignette playback.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::foundation::core::{Canvas, Fps, LogicalSize, PhysicalSize};
use crate::foundation::error::{KickshotError, KickshotResult};
use crate::render::frame::SceneLabels;

/// Everything a host can tune about one vignette.
///
/// Every field is optional in JSON; missing fields take the defaults below.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VignetteConfig {
    /// Total playback length in milliseconds.
    pub duration_ms: u64,
    /// Logical canvas size.
    pub canvas: Canvas,
    pub device_pixel_ratio: f64,
    /// Frame rate for live pacing and export.
    pub fps: Fps,
    pub labels: SceneLabels,
}

impl Default for VignetteConfig {
    fn default() -> Self {
        Self {
            duration_ms: 9_000,
            canvas: Canvas {
                width: 960,
                height: 540,
            },
            device_pixel_ratio: 1.0,
            fps: Fps { num: 60, den: 1 },
            labels: SceneLabels::default(),
        }
    }
}

impl VignetteConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> KickshotResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| KickshotError::serde(format!("parse vignette config JSON: {e}")))
    }

    pub fn from_json_str(s: &str) -> KickshotResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| KickshotError::serde(format!("parse vignette config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> KickshotResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            KickshotError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> KickshotResult<()> {
        if self.duration_ms == 0 {
            return Err(KickshotError::validation("duration_ms must be > 0"));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(KickshotError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        if !self.device_pixel_ratio.is_finite() || self.device_pixel_ratio <= 0.0 {
            return Err(KickshotError::validation(format!(
                "device_pixel_ratio must be finite and > 0, got {}",
                self.device_pixel_ratio
            )));
        }
        let backing = self.backing_size();
        if backing.is_empty() {
            return Err(KickshotError::validation(format!(
                "canvas {}x{} at dpr {} has no physical pixels",
                self.canvas.width, self.canvas.height, self.device_pixel_ratio
            )));
        }
        if backing.width > u32::from(u16::MAX) || backing.height > u32::from(u16::MAX) {
            return Err(KickshotError::validation(format!(
                "backing store {}x{} exceeds {}px per side",
                backing.width,
                backing.height,
                u16::MAX
            )));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        Ok(())
    }

    pub fn total_duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn logical_size(&self) -> LogicalSize {
        self.canvas.logical()
    }

    /// Physical pixel size of a surface configured from this config.
    pub fn backing_size(&self) -> PhysicalSize {
        PhysicalSize::from_logical(self.logical_size(), self.device_pixel_ratio)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
