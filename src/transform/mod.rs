//! The pan/zoom view transform.

/// `ViewTransform` and its lazy affine matrix.
pub mod view;
