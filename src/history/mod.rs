//! Reversible drawing operations and the per-frame undo/redo stack.

/// Operations, draw steps, and replay targets.
pub mod op;
/// The linear-history command stack.
pub mod stack;
