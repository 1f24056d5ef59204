use std::path::Path;

use crate::export::ffmpeg::{FfmpegEncoder, default_mp4_config};
use crate::export::sink::{FrameSink, SinkConfig};
use crate::foundation::error::{FlipbookError, FlipbookResult};
use crate::store::frames::FrameStore;

/// Push every frame's render source to `sink` in display order.
///
/// Frames are cropped to the store's export-safe size (each dimension
/// rounded down to even). Editing must not interleave with an export; the
/// shared borrow of the store enforces that within one session.
#[tracing::instrument(skip(store, sink), fields(frames = store.len()))]
pub fn export_render(
    store: &FrameStore,
    fps: u32,
    sink: &mut dyn FrameSink,
) -> FlipbookResult<()> {
    if fps == 0 {
        return Err(FlipbookError::invalid_argument("export fps must be non-zero"));
    }
    if store.is_empty() {
        return Err(FlipbookError::invalid_argument("nothing to export: store has no frames"));
    }
    let size = store.size().export_safe();
    if size.is_empty() {
        return Err(FlipbookError::invalid_argument(format!(
            "canvas {}x{} is too small to export",
            store.size().width,
            store.size().height
        )));
    }

    sink.begin(SinkConfig { size, fps })?;
    for (index, frame) in store.frames().iter().enumerate() {
        let cropped = frame.render_source().crop(size)?;
        sink.push_frame(index, &cropped)?;
    }
    sink.end()
}

/// Export the store as an MP4 at `out_path` via the system `ffmpeg` binary.
#[tracing::instrument(skip(store))]
pub fn export_to_mp4(store: &FrameStore, fps: u32, out_path: &Path) -> FlipbookResult<()> {
    let size = store.size().export_safe();
    let mut encoder = FfmpegEncoder::new(default_mp4_config(out_path, size.width, size.height, fps))?;
    export_render(store, fps, &mut encoder)
}

#[cfg(test)]
#[path = "../../tests/unit/export/render.rs"]
mod tests;
