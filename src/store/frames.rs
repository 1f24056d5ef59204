use crate::foundation::core::{CanvasSize, Color, ImageData, ImageRef};
use crate::foundation::error::{FlipbookError, FlipbookResult};
use crate::history::op::{Operation, ReplayTarget};
use crate::history::stack::CommandStack;
use crate::raster::compose;
use crate::raster::context::RenderContext;

/// One editable drawing surface: a frame of the flipbook.
///
/// A frame owns its command history and two extracted pixel sources: the
/// fully composited render (background applied) and the background-free
/// overlay used for onion-skin preview. Undo/redo regenerate both by full
/// replay.
#[derive(Debug)]
pub struct Frame {
    /// Whether this frame contributes to the composite render. Invisible
    /// frames are excluded from composition entirely, not drawn at zero
    /// alpha.
    pub visible: bool,
    /// Background color applied under the frame's drawn content.
    pub background: Color,
    dirty: bool,
    render_source: ImageRef,
    overlay_source: ImageRef,
    persisted_source: Option<ImageRef>,
    history: CommandStack,
}

impl Frame {
    /// A fresh empty frame captured from `ctx`.
    ///
    /// Clears the context (capturing the transparent overlay source), then
    /// fills with `background` (capturing the render source). Both history
    /// stacks start empty and nothing has been persisted yet.
    pub fn new(ctx: &mut dyn RenderContext, background: Color) -> Self {
        ctx.clear();
        let overlay_source = ctx.snapshot();
        ctx.fill(background);
        let render_source = ctx.snapshot();
        Self {
            visible: true,
            background,
            dirty: false,
            render_source,
            overlay_source,
            persisted_source: None,
            history: CommandStack::new(),
        }
    }

    pub(crate) fn from_persisted(
        visible: bool,
        background: Color,
        overlay_source: ImageRef,
        render_source: ImageRef,
    ) -> Self {
        Self {
            visible,
            background,
            dirty: false,
            render_source,
            overlay_source: overlay_source.clone(),
            persisted_source: Some(overlay_source),
            history: CommandStack::new(),
        }
    }

    /// Apply a new operation to the live context and record it.
    ///
    /// Clears the redo stack (linear history) and marks the frame dirty.
    /// Returns `false` without touching any state when the context is
    /// degenerate (zero-area); interactive edits never fail.
    pub fn execute(&mut self, op: Operation, ctx: &mut dyn RenderContext) -> bool {
        if ctx.size().is_empty() {
            return false;
        }
        op.apply(ctx, self.background, ReplayTarget::Composite);
        self.history.push_executed(op);
        self.refresh_sources(ctx);
        self.dirty = true;
        true
    }

    /// Undo the most recent operation, regenerating both pixel sources by
    /// replaying the remaining history from scratch.
    ///
    /// Returns `false` when there is nothing to undo or the context is
    /// degenerate; never an error.
    pub fn undo(&mut self, ctx: &mut dyn RenderContext) -> bool {
        if ctx.size().is_empty() {
            return false;
        }
        if !self.history.undo_into_redo() {
            return false;
        }
        self.refresh_sources(ctx);
        self.dirty = true;
        true
    }

    /// Re-apply the most recently undone operation.
    ///
    /// Returns `false` when there is nothing to redo or the context is
    /// degenerate.
    pub fn redo(&mut self, ctx: &mut dyn RenderContext) -> bool {
        if ctx.size().is_empty() {
            return false;
        }
        if self.history.redo_into_undo().is_none() {
            return false;
        }
        self.refresh_sources(ctx);
        self.dirty = true;
        true
    }

    // Replays twice: overlay target first, then composite, leaving the live
    // context displaying the composite.
    fn refresh_sources(&mut self, ctx: &mut dyn RenderContext) {
        self.history.replay(ctx, self.background, ReplayTarget::Overlay);
        self.overlay_source = ctx.snapshot();
        self.history.replay(ctx, self.background, ReplayTarget::Composite);
        self.render_source = ctx.snapshot();
    }

    /// True when the frame has mutated since the last persisted snapshot.
    ///
    /// Coarse by design: any execute/undo/redo sets it, only snapshot
    /// capture clears it. An undo back to previously-saved content still
    /// reads dirty.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Fully composited pixel content, background applied.
    pub fn render_source(&self) -> &ImageRef {
        &self.render_source
    }

    /// Background-free pixel content for transparency-aware preview.
    pub fn overlay_source(&self) -> &ImageRef {
        &self.overlay_source
    }

    /// Overlay content as of the last durable write; `None` until first
    /// save. Set only by the persistence path.
    pub fn persisted_source(&self) -> Option<&ImageRef> {
        self.persisted_source.as_ref()
    }

    pub(crate) fn mark_persisted(&mut self) {
        self.persisted_source = Some(self.overlay_source.clone());
        self.dirty = false;
    }

    /// Borrow this frame's command history.
    pub fn history(&self) -> &CommandStack {
        &self.history
    }
}

/// Onion-skin preview settings: how many preceding frames to ghost under the
/// current one, and the opacity of the nearest ghost.
///
/// Opacity halves per step further back.
#[derive(Clone, Copy, Debug)]
pub struct OnionSkinSettings {
    /// Number of preceding frames to include.
    pub depth: usize,
    /// Opacity of the nearest preceding frame, in `[0, 1]`.
    pub opacity: f32,
}

impl Default for OnionSkinSettings {
    fn default() -> Self {
        Self {
            depth: 1,
            opacity: 0.5,
        }
    }
}

/// The canonical ordered collection of frames plus the active selection.
#[derive(Debug)]
pub struct FrameStore {
    frames: Vec<Frame>,
    active: Option<usize>,
    size: CanvasSize,
    background: Color,
}

impl FrameStore {
    /// An empty store for a canvas of the given size.
    pub fn new(size: CanvasSize, background: Color) -> Self {
        Self {
            frames: Vec::new(),
            active: None,
            size,
            background,
        }
    }

    pub(crate) fn from_parts(frames: Vec<Frame>, size: CanvasSize, background: Color) -> Self {
        let active = if frames.is_empty() { None } else { Some(0) };
        Self {
            frames,
            active,
            size,
            background,
        }
    }

    /// Canvas dimensions shared by every frame.
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    /// Default background for newly created frames.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Frames in composite order (bottom to top).
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub(crate) fn frames_mut(&mut self) -> &mut [Frame] {
        &mut self.frames
    }

    /// Borrow one frame; `None` outside bounds.
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Mutably borrow one frame (to toggle visibility or change its
    /// background); `None` outside bounds.
    pub fn frame_mut(&mut self, index: usize) -> Option<&mut Frame> {
        self.frames.get_mut(index)
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when the store holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the active frame, if any frame is selected.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Borrow the active frame.
    pub fn active_frame(&self) -> Option<&Frame> {
        self.active.and_then(|i| self.frames.get(i))
    }

    /// Create a fresh empty frame from `ctx` and select it.
    ///
    /// Returns the new frame's index.
    pub fn create_frame(&mut self, ctx: &mut dyn RenderContext) -> usize {
        let frame = Frame::new(ctx, self.background);
        self.frames.push(frame);
        let index = self.frames.len() - 1;
        self.active = Some(index);
        index
    }

    /// Set the active frame.
    pub fn select(&mut self, index: usize) -> FlipbookResult<()> {
        if index >= self.frames.len() {
            return Err(FlipbookError::index_out_of_range(format!(
                "cannot select frame {index} of {}",
                self.frames.len()
            )));
        }
        self.active = Some(index);
        Ok(())
    }

    /// Remove a frame and its entire command history atomically.
    ///
    /// The active index is clamped to the new last frame when it would
    /// exceed bounds, or cleared when the store becomes empty.
    pub fn delete(&mut self, index: usize) -> FlipbookResult<()> {
        if index >= self.frames.len() {
            return Err(FlipbookError::index_out_of_range(format!(
                "cannot delete frame {index} of {}",
                self.frames.len()
            )));
        }
        self.frames.remove(index);
        self.active = match self.active {
            None => None,
            Some(_) if self.frames.is_empty() => None,
            Some(a) if a >= self.frames.len() => Some(self.frames.len() - 1),
            Some(a) => Some(a),
        };
        Ok(())
    }

    /// Apply an operation to the active frame. `false` when no frame is
    /// selected or the edit was a no-op.
    pub fn execute(&mut self, op: Operation, ctx: &mut dyn RenderContext) -> bool {
        match self.active {
            Some(i) => self.frames[i].execute(op, ctx),
            None => false,
        }
    }

    /// Undo on the active frame. `false` when there is nothing to undo.
    pub fn undo(&mut self, ctx: &mut dyn RenderContext) -> bool {
        match self.active {
            Some(i) => self.frames[i].undo(ctx),
            None => false,
        }
    }

    /// Redo on the active frame. `false` when there is nothing to redo.
    pub fn redo(&mut self, ctx: &mut dyn RenderContext) -> bool {
        match self.active {
            Some(i) => self.frames[i].redo(ctx),
            None => false,
        }
    }

    /// Layer every visible frame's render source bottom-to-top in store
    /// order. `None` when the store is empty.
    pub fn composite_render(&self) -> Option<ImageData> {
        if self.frames.is_empty() {
            return None;
        }
        let mut out = ImageData::transparent(self.size);
        for (index, frame) in self.frames.iter().enumerate() {
            if !frame.visible {
                continue;
            }
            let src = frame.render_source();
            if compose::over_in_place(&mut out.pixels, &src.pixels, 1.0).is_err() {
                tracing::warn!(index, "skipping frame with mismatched size in composite");
            }
        }
        Some(out)
    }

    /// Onion-skin preview for the frame at `index`: up to `settings.depth`
    /// preceding frames' overlay sources ghosted under it, nearest at
    /// `settings.opacity`, halving per step back. `None` outside bounds.
    pub fn onion_skin(&self, index: usize, settings: OnionSkinSettings) -> Option<ImageData> {
        let frame = self.frames.get(index)?;
        let mut out = ImageData::transparent(self.size);
        for distance in (1..=settings.depth).rev() {
            let Some(prev) = index.checked_sub(distance) else {
                continue;
            };
            let opacity = settings.opacity * 0.5f32.powi(distance as i32 - 1);
            let src = self.frames[prev].overlay_source();
            if compose::over_in_place(&mut out.pixels, &src.pixels, opacity).is_err() {
                tracing::warn!(index = prev, "skipping frame with mismatched size in preview");
            }
        }
        if compose::over_in_place(&mut out.pixels, &frame.overlay_source().pixels, 1.0).is_err() {
            tracing::warn!(index, "skipping frame with mismatched size in preview");
        }
        Some(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/frames.rs"]
mod tests;
