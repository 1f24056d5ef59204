use crate::foundation::core::{Color, ImageRef};
use crate::store::frames::Frame;

/// The durable, history-free form of one frame.
///
/// Undo/redo stacks are omitted entirely: operations close over live
/// rendering-context callables and cannot be serialized. Reloading a session
/// restores pixel content but discards edit history. This is a deliberate,
/// lossy contract.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SnapshotFrame {
    /// Whether the frame contributes to the composite render.
    pub visible: bool,
    /// Frame background color.
    pub background: Color,
    /// Background-free overlay content at the time of the snapshot.
    pub persisted: ImageRef,
    /// Fully composited render content.
    pub render: ImageRef,
}

impl SnapshotFrame {
    /// Capture a frame for durable storage.
    ///
    /// This is the only place a frame's persisted source is set and its
    /// dirty flag cleared.
    pub fn capture(frame: &mut Frame) -> Self {
        frame.mark_persisted();
        Self {
            visible: frame.visible,
            background: frame.background,
            persisted: frame.overlay_source().clone(),
            render: frame.render_source().clone(),
        }
    }

    /// Rebuild a live frame: same pixel content, empty history stacks, clean.
    pub fn into_frame(self) -> Frame {
        Frame::from_persisted(self.visible, self.background, self.persisted, self.render)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persist/snapshot.rs"]
mod tests;
