use std::collections::HashMap;

use crate::foundation::core::{CanvasSize, Color};
use crate::foundation::error::{FlipbookError, FlipbookResult};
use crate::persist::snapshot::SnapshotFrame;
use crate::raster::context::RenderContext;
use crate::store::frames::{Frame, FrameStore};
use crate::transform::view::ViewTransform;

/// Storage key holding the serialized frame snapshots.
pub const KEY_FRAMES: &str = "frames";
/// Storage key holding the 6 view-matrix coefficients.
pub const KEY_MATRIX: &str = "matrix";
/// Storage key holding the view translation.
pub const KEY_POS: &str = "pos";
/// Storage key holding the view scale.
pub const KEY_SCALE: &str = "scale";
/// Storage key holding the canvas dimensions.
pub const KEY_SIZE: &str = "size";

/// String-keyed, string-valued durable store (all values are JSON).
///
/// An absent key means "use default", never an error. Failures map to
/// [`FlipbookError::StorageUnavailable`] and are surfaced to the caller
/// rather than retried: a silent partial save would corrupt trust in the
/// snapshot.
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> FlipbookResult<Option<String>>;

    /// Write a value.
    fn set(&mut self, key: &str, value: &str) -> FlipbookResult<()>;
}

/// In-process [`KeyValueStore`] used by tests and headless sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> FlipbookResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> FlipbookResult<()> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> FlipbookResult<String> {
    serde_json::to_string(value).map_err(|e| FlipbookError::serde(e.to_string()))
}

// A malformed stored value reads as "no snapshot present"; only storage
// access failures propagate.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> FlipbookResult<Option<T>> {
    let Some(raw) = kv.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            tracing::warn!(key, %err, "ignoring malformed stored value");
            Ok(None)
        }
    }
}

/// Write the store's frames and canvas size durably.
///
/// Captures every frame through [`SnapshotFrame::capture`], which sets each
/// frame's persisted source and clears its dirty flag.
pub fn save_frames(store: &mut FrameStore, kv: &mut dyn KeyValueStore) -> FlipbookResult<()> {
    let snapshots: Vec<SnapshotFrame> = store
        .frames_mut()
        .iter_mut()
        .map(SnapshotFrame::capture)
        .collect();
    kv.set(KEY_FRAMES, &to_json(&snapshots)?)?;
    kv.set(KEY_SIZE, &to_json(&store.size())?)?;
    Ok(())
}

/// Manual checkpoint: frames, canvas size, and view transform.
pub fn save_session(
    store: &mut FrameStore,
    view: &mut ViewTransform,
    kv: &mut dyn KeyValueStore,
) -> FlipbookResult<()> {
    save_frames(store, kv)?;
    view.save(kv)
}

/// Rebuild a session from storage.
///
/// Frames come back with empty history stacks. An absent, empty, or
/// malformed `frames` value falls back to a single fresh frame created from
/// `ctx`; absent transform keys fall back to the default view.
pub fn load_session(
    kv: &dyn KeyValueStore,
    ctx: &mut dyn RenderContext,
    default_size: CanvasSize,
    background: Color,
) -> FlipbookResult<(FrameStore, ViewTransform)> {
    let size = read_json::<CanvasSize>(kv, KEY_SIZE)?.unwrap_or(default_size);
    let snapshots = read_json::<Vec<SnapshotFrame>>(kv, KEY_FRAMES)?.unwrap_or_default();
    let frames: Vec<Frame> = snapshots
        .into_iter()
        .map(SnapshotFrame::into_frame)
        .collect();
    let mut store = FrameStore::from_parts(frames, size, background);
    if store.is_empty() {
        store.create_frame(ctx);
    }
    let view = ViewTransform::load(kv)?;
    Ok((store, view))
}

#[cfg(test)]
#[path = "../../tests/unit/persist/storage.rs"]
mod tests;
