//! Flipbook is the editing core of a raster flipbook-animation editor.
//!
//! Users draw on a canvas across multiple frames, pan and zoom the view, and
//! undo/redo edits; frames can be exported as a video and persisted across
//! sessions. This crate is the state engine behind that: the per-frame
//! command-based undo/redo stack, the affine pan/zoom transform, and the
//! persistence contract that reconciles live editable state (which holds
//! non-serializable executable operations) with a durable snapshot.
//!
//! # Architecture
//!
//! 1. **History**: user input becomes an [`Operation`] executed against a
//!    frame's [`RenderContext`] and recorded on its [`CommandStack`]. Undo
//!    regenerates pixel content by replaying the remaining history from
//!    scratch; drawing primitives are not invertible.
//! 2. **Store**: the [`FrameStore`] owns the ordered frames, the active
//!    selection, per-frame dirtiness, and compositing (including onion-skin
//!    preview).
//! 3. **Transform**: a [`ViewTransform`] owns pan/zoom state and exposes a
//!    lazily recomputed 6-coefficient affine matrix.
//! 4. **Persistence**: snapshots drop history entirely (operations close
//!    over live context callables); reloading restores pixels with empty
//!    stacks. Every committed [`Editor`] mutation autosaves.
//! 5. **Export** (optional): frames stream in display order to a
//!    [`FrameSink`], by default the system `ffmpeg` binary for MP4 output.
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Edits never fail**: interactive execute/undo/redo degrade to no-ops
//!   (empty stack, zero-area surface) instead of erroring; only persistence
//!   and export surface failures.
//! - **Single-threaded**: every operation runs to completion on the caller's
//!   thread; the rendering context is exclusively owned by the in-progress
//!   call.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod export;
mod foundation;
mod history;
mod persist;
mod raster;
mod session;
mod store;
mod transform;

pub use export::ffmpeg::{
    EncodeConfig, FfmpegEncoder, default_mp4_config, ensure_parent_dir, is_ffmpeg_on_path,
};
pub use export::render::{export_render, export_to_mp4};
pub use export::sink::{FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{
    Affine, CanvasSize, Color, ImageData, ImageRef, Point, Rect, Vec2,
};
pub use foundation::error::{FlipbookError, FlipbookResult};
pub use history::op::{DrawStep, OpKind, Operation, ReplayTarget};
pub use history::stack::CommandStack;
pub use persist::snapshot::SnapshotFrame;
pub use persist::storage::{
    KEY_FRAMES, KEY_MATRIX, KEY_POS, KEY_SCALE, KEY_SIZE, KeyValueStore, MemoryStore,
    load_session, save_frames, save_session,
};
pub use raster::compose::{StraightRgba8, over, over_in_place};
pub use raster::context::{RasterContext, RenderContext};
pub use session::Editor;
pub use store::frames::{Frame, FrameStore, OnionSkinSettings};
pub use transform::view::{DEFAULT_SCALE, ViewTransform};
