//! Frames and the canonical frame store.

/// `Frame`, `FrameStore`, selection, compositing, onion-skin preview.
pub mod frames;
