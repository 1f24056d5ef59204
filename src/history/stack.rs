use crate::foundation::core::Color;
use crate::history::op::{Operation, ReplayTarget};
use crate::raster::context::RenderContext;

/// Per-frame undo/redo stacks of reversible drawing operations.
///
/// History is strictly linear: executing a new operation after an undo
/// discards the redo stack. Undo is replay-from-scratch rather than
/// inverse-operation based; brush strokes are not cheaply invertible, so the
/// remaining stack is re-applied in original order against a cleared surface.
/// This trades O(n) undo cost for correctness simplicity and is a confirmed
/// design choice.
#[derive(Debug, Default)]
pub struct CommandStack {
    undo: Vec<Operation>,
    redo: Vec<Operation>,
}

impl CommandStack {
    /// Empty stacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an operation that was just applied to the live surface.
    ///
    /// Pushes onto the undo stack and clears the redo stack entirely.
    pub fn push_executed(&mut self, op: Operation) {
        self.undo.push(op);
        self.redo.clear();
    }

    /// Move the most recent operation to the redo stack.
    ///
    /// Returns `false` (not an error) when there is nothing to undo.
    pub fn undo_into_redo(&mut self) -> bool {
        match self.undo.pop() {
            Some(op) => {
                self.redo.push(op);
                true
            }
            None => false,
        }
    }

    /// Move the most recently undone operation back onto the undo stack.
    ///
    /// Unlike [`CommandStack::push_executed`] this does not clear the redo
    /// stack further. Returns a borrow of the re-applied operation, or `None`
    /// when there is nothing to redo.
    pub fn redo_into_undo(&mut self) -> Option<&Operation> {
        let op = self.redo.pop()?;
        self.undo.push(op);
        self.undo.last()
    }

    /// Regenerate a surface from scratch: clear (plus background fill for a
    /// composite target), then re-apply every undo-stack operation in
    /// original order.
    pub fn replay(&self, ctx: &mut dyn RenderContext, background: Color, target: ReplayTarget) {
        ctx.clear();
        if target == ReplayTarget::Composite {
            ctx.fill(background);
        }
        for op in &self.undo {
            op.apply(ctx, background, target);
        }
    }

    /// Number of undoable operations.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of redoable operations.
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// True when no operation has been recorded (or all were undone).
    pub fn is_empty(&self) -> bool {
        self.undo.is_empty() && self.redo.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/stack.rs"]
mod tests;
