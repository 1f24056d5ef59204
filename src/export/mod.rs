//! Video export: frame sinks and the system-`ffmpeg` MP4 encoder.

/// `ffmpeg`-based MP4 encoding.
pub mod ffmpeg;
/// Export pipeline entry points.
pub mod render;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
