use std::path::Path;

use crate::export::render::{export_render, export_to_mp4};
use crate::export::sink::FrameSink;
use crate::foundation::core::{Affine, CanvasSize, Color, Point, Vec2};
use crate::foundation::error::FlipbookResult;
use crate::history::op::Operation;
use crate::persist::storage::{KeyValueStore, load_session, save_frames, save_session};
use crate::raster::context::RenderContext;
use crate::store::frames::{FrameStore, OnionSkinSettings};
use crate::transform::view::ViewTransform;

/// One editing session: an owned frame store, an owned view transform, and
/// the durable store they autosave into.
///
/// Every committed mutation triggers an explicit durable write (the
/// autosave policy); `save`/`load` expose manual checkpointing. Interactive
/// edits themselves never fail; the error channel of the mutating methods
/// carries only persistence failures, which are surfaced rather than
/// retried.
#[derive(Debug)]
pub struct Editor<K: KeyValueStore> {
    store: FrameStore,
    view: ViewTransform,
    kv: K,
}

impl<K: KeyValueStore> Editor<K> {
    /// Open a session, restoring any stored snapshot.
    ///
    /// With no (or malformed) stored state this starts a fresh session with
    /// one empty frame created from `ctx` and the default view.
    pub fn open(
        kv: K,
        ctx: &mut dyn RenderContext,
        default_size: CanvasSize,
        background: Color,
    ) -> FlipbookResult<Self> {
        let (store, view) = load_session(&kv, ctx, default_size, background)?;
        Ok(Self { store, view, kv })
    }

    /// Borrow the frame store.
    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    /// Borrow the durable store.
    pub fn storage(&self) -> &K {
        &self.kv
    }

    /// Apply a drawing operation to the active frame and autosave.
    ///
    /// Returns `Ok(false)` when the edit was a no-op (no active frame or a
    /// degenerate context); nothing is written in that case.
    pub fn execute(&mut self, op: Operation, ctx: &mut dyn RenderContext) -> FlipbookResult<bool> {
        let applied = self.store.execute(op, ctx);
        if applied {
            self.commit()?;
        }
        Ok(applied)
    }

    /// Undo on the active frame and autosave. `Ok(false)` when there was
    /// nothing to undo.
    pub fn undo(&mut self, ctx: &mut dyn RenderContext) -> FlipbookResult<bool> {
        let applied = self.store.undo(ctx);
        if applied {
            self.commit()?;
        }
        Ok(applied)
    }

    /// Redo on the active frame and autosave. `Ok(false)` when there was
    /// nothing to redo.
    pub fn redo(&mut self, ctx: &mut dyn RenderContext) -> FlipbookResult<bool> {
        let applied = self.store.redo(ctx);
        if applied {
            self.commit()?;
        }
        Ok(applied)
    }

    /// Create and select a fresh frame, autosaving; returns its index.
    pub fn create_frame(&mut self, ctx: &mut dyn RenderContext) -> FlipbookResult<usize> {
        let index = self.store.create_frame(ctx);
        self.commit()?;
        Ok(index)
    }

    /// Delete a frame (and its whole history) and autosave.
    pub fn delete_frame(&mut self, index: usize) -> FlipbookResult<()> {
        self.store.delete(index)?;
        self.commit()
    }

    /// Change the active frame. Selection is session state and is not
    /// persisted.
    pub fn select_frame(&mut self, index: usize) -> FlipbookResult<()> {
        self.store.select(index)
    }

    /// Onion-skin preview of the active frame.
    pub fn preview(&self, settings: OnionSkinSettings) -> Option<crate::foundation::core::ImageData> {
        self.store
            .active()
            .and_then(|index| self.store.onion_skin(index, settings))
    }

    /// Pan the view and persist the transform.
    pub fn pan(&mut self, delta: Vec2) -> FlipbookResult<()> {
        self.view.pan(delta);
        self.view.save(&mut self.kv)
    }

    /// Zoom about `anchor` and persist the transform.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) -> FlipbookResult<()> {
        self.view.zoom_at(anchor, factor)?;
        self.view.save(&mut self.kv)
    }

    /// Reset the view to its defaults and persist the transform.
    pub fn reset_view(&mut self) -> FlipbookResult<()> {
        self.view.reset();
        self.view.save(&mut self.kv)
    }

    /// The current view matrix (recomputed if stale).
    pub fn matrix(&mut self) -> Affine {
        self.view.matrix()
    }

    /// Manual checkpoint of frames, canvas size, and view transform.
    pub fn save(&mut self) -> FlipbookResult<()> {
        save_session(&mut self.store, &mut self.view, &mut self.kv)
    }

    /// Reload the session from storage, discarding unsaved in-memory state
    /// (and, by contract, all edit history).
    pub fn load(&mut self, ctx: &mut dyn RenderContext) -> FlipbookResult<()> {
        let (store, view) = load_session(
            &self.kv,
            ctx,
            self.store.size(),
            self.store.background(),
        )?;
        self.store = store;
        self.view = view;
        Ok(())
    }

    /// Export all frames through an arbitrary sink.
    pub fn export(&self, fps: u32, sink: &mut dyn FrameSink) -> FlipbookResult<()> {
        export_render(&self.store, fps, sink)
    }

    /// Export all frames as an MP4 via the system `ffmpeg` binary.
    pub fn export_mp4(&self, fps: u32, out_path: &Path) -> FlipbookResult<()> {
        export_to_mp4(&self.store, fps, out_path)
    }

    // The single visible write point behind the autosave policy.
    fn commit(&mut self) -> FlipbookResult<()> {
        save_frames(&mut self.store, &mut self.kv)
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
