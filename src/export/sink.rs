use crate::foundation::core::{CanvasSize, ImageData};
use crate::foundation::error::FlipbookResult;

/// Configuration provided to a [`FrameSink`] before any frames are pushed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame dimensions; always export-safe (even in both dimensions).
    pub size: CanvasSize,
    /// Output frames per second.
    pub fps: u32,
}

/// Sink contract for consuming exported frames.
///
/// Ordering contract: `push_frame` is called in display order, index 0 first.
/// The sink's failure is surfaced to the caller, never swallowed.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> FlipbookResult<()>;

    /// Push one frame in display order.
    fn push_frame(&mut self, index: usize, frame: &ImageData) -> FlipbookResult<()>;

    /// Called once after the last frame is pushed.
    fn end(&mut self) -> FlipbookResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(usize, ImageData)>,
}

impl InMemorySink {
    /// A new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(usize, ImageData)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> FlipbookResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, index: usize, frame: &ImageData) -> FlipbookResult<()> {
        self.frames.push((index, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> FlipbookResult<()> {
        Ok(())
    }
}
