//! The injected drawing-surface seam and straight-alpha compositing.

/// Straight-alpha source-over blending helpers.
pub mod compose;
/// The `RenderContext` trait and the in-memory `RasterContext`.
pub mod context;
