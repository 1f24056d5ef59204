//! Core value types, error taxonomy, and pixel math shared across the crate.

/// Core value types (colors, sizes, image buffers) and kurbo re-exports.
pub mod core;
/// Error taxonomy and result alias.
pub mod error;
pub(crate) mod math;
