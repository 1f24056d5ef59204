use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::export::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{CanvasSize, ImageData};
use crate::foundation::error::{FlipbookError, FlipbookResult};

/// Configuration for MP4 encoding via the system `ffmpeg` binary.
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    /// Output width in pixels; must be even (yuv420p).
    pub width: u32,
    /// Output height in pixels; must be even (yuv420p).
    pub height: u32,
    /// Output frames per second.
    pub fps: u32,
    /// Output file path.
    pub out_path: PathBuf,
    /// Overwrite an existing output file.
    pub overwrite: bool,
}

impl EncodeConfig {
    /// Check dimensions and frame rate.
    pub fn validate(&self) -> FlipbookResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FlipbookError::invalid_argument(
                "encode width/height must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(FlipbookError::invalid_argument("encode fps must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // yuv420p output rejects odd dimensions.
            return Err(FlipbookError::invalid_argument(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }
}

/// Default MP4 configuration for the given geometry.
pub fn default_mp4_config(
    out_path: impl Into<PathBuf>,
    width: u32,
    height: u32,
    fps: u32,
) -> EncodeConfig {
    EncodeConfig {
        width,
        height,
        fps,
        out_path: out_path.into(),
        overwrite: true,
    }
}

/// True when an `ffmpeg` binary is reachable on PATH.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Create the parent directory of `path` if it does not exist.
pub fn ensure_parent_dir(path: &Path) -> FlipbookResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Streams raw straight-RGBA frames to a system `ffmpeg` child process,
/// producing a yuv420p MP4.
///
/// We intentionally shell out to the `ffmpeg` binary rather than linking
/// FFmpeg to avoid native dev header/lib requirements.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
}

impl FfmpegEncoder {
    /// Validate the config, check for `ffmpeg` on PATH, and spawn it.
    ///
    /// A missing binary is surfaced as
    /// [`FlipbookError::EncoderUnavailable`].
    pub fn new(cfg: EncodeConfig) -> FlipbookResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(FlipbookError::invalid_argument(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(FlipbookError::encoder_unavailable(
                "ffmpeg is required for MP4 export, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if cfg.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&cfg.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            FlipbookError::encoder_unavailable(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            FlipbookError::encoder_unavailable("failed to open ffmpeg stdin (unexpected)")
        })?;

        Ok(Self {
            cfg,
            child: Some(child),
            stdin: Some(stdin),
        })
    }

    /// Write one frame to the encoder.
    ///
    /// Frames larger than the configured size are cropped top-left (the
    /// export-safe size is at most one pixel smaller per dimension than the
    /// canvas); smaller frames are rejected.
    pub fn encode_frame(&mut self, frame: &ImageData) -> FlipbookResult<()> {
        let target = CanvasSize::new(self.cfg.width, self.cfg.height);
        if frame.size.width < target.width || frame.size.height < target.height {
            return Err(FlipbookError::invalid_argument(format!(
                "frame size mismatch: got {}x{}, expected at least {}x{}",
                frame.size.width, frame.size.height, target.width, target.height
            )));
        }
        let cropped;
        let bytes = if frame.size == target {
            &frame.pixels
        } else {
            cropped = frame.crop(target)?;
            &cropped.pixels
        };

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(FlipbookError::encoder_unavailable(
                "ffmpeg encoder is already finalized",
            ));
        };

        use std::io::Write as _;
        stdin.write_all(bytes).map_err(|e| {
            FlipbookError::encoder_unavailable(format!(
                "failed to write frame to ffmpeg stdin: {e}"
            ))
        })?;

        Ok(())
    }

    /// Close stdin and wait for `ffmpeg` to exit, surfacing its stderr on
    /// failure.
    pub fn finish(&mut self) -> FlipbookResult<()> {
        drop(self.stdin.take());

        let Some(child) = self.child.take() else {
            return Err(FlipbookError::encoder_unavailable(
                "ffmpeg encoder is already finalized",
            ));
        };

        let output = child.wait_with_output().map_err(|e| {
            FlipbookError::encoder_unavailable(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FlipbookError::encoder_unavailable(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

impl FrameSink for FfmpegEncoder {
    fn begin(&mut self, cfg: SinkConfig) -> FlipbookResult<()> {
        if cfg.size.width != self.cfg.width
            || cfg.size.height != self.cfg.height
            || cfg.fps != self.cfg.fps
        {
            return Err(FlipbookError::invalid_argument(format!(
                "sink config {}x{}@{} does not match encoder config {}x{}@{}",
                cfg.size.width, cfg.size.height, cfg.fps, self.cfg.width, self.cfg.height, self.cfg.fps
            )));
        }
        Ok(())
    }

    fn push_frame(&mut self, _index: usize, frame: &ImageData) -> FlipbookResult<()> {
        self.encode_frame(frame)
    }

    fn end(&mut self) -> FlipbookResult<()> {
        self.finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/ffmpeg.rs"]
mod tests;
