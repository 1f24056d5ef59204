use crate::foundation::core::Color;
use crate::raster::context::RenderContext;

/// One atomic pixel-mutating action inside an [`Operation`].
///
/// Steps are closures over [`RenderContext`] capabilities (a brush-stroke
/// segment, a rectangle fill). They are executable but deliberately not
/// serializable; this is what makes persisted snapshots history-free.
pub type DrawStep = Box<dyn Fn(&mut dyn RenderContext)>;

/// What an operation does to the surface when replayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpKind {
    /// Replays its draw steps in order.
    Draw,
    /// Wipes the surface; background-filled or transparent depending on the
    /// replay target.
    Clear,
}

/// Which surface a history replay is regenerating.
///
/// One undo history serves two buffers: the composited render (background
/// applied) and the transparency-preserving overlay used for onion-skin
/// preview. The only behavioral difference is how `Clear` fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayTarget {
    /// Fully composited content; `Clear` fills with the frame background.
    Composite,
    /// Background-free content; `Clear` leaves the surface transparent.
    Overlay,
}

/// An immutable, replayable unit of drawing history.
pub struct Operation {
    kind: OpKind,
    steps: Vec<DrawStep>,
}

impl Operation {
    /// A draw operation replaying `steps` in order.
    pub fn draw(steps: Vec<DrawStep>) -> Self {
        Self {
            kind: OpKind::Draw,
            steps,
        }
    }

    /// A canvas-clear operation.
    pub fn clear() -> Self {
        Self {
            kind: OpKind::Clear,
            steps: Vec::new(),
        }
    }

    /// Operation kind.
    pub fn kind(&self) -> OpKind {
        self.kind
    }

    /// Replay this operation against `ctx`.
    ///
    /// Deterministic; no effects beyond the context.
    pub fn apply(&self, ctx: &mut dyn RenderContext, background: Color, target: ReplayTarget) {
        match self.kind {
            OpKind::Clear => {
                ctx.clear();
                if target == ReplayTarget::Composite {
                    ctx.fill(background);
                }
            }
            OpKind::Draw => {
                for step in &self.steps {
                    step(ctx);
                }
            }
        }
    }
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("kind", &self.kind)
            .field("steps", &self.steps.len())
            .finish()
    }
}
