//! Frame-sink contract and the in-memory sink.

use crate::board::theme::LoopCount;
use crate::foundation::core::PlyIndex;
use crate::foundation::error::BoardcastResult;
use crate::render::surface::FrameRgba;

/// Configuration handed to a [`FrameSink`] before any frames are pushed.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Uniform inter-frame delay in milliseconds.
    pub delay_ms: u32,
    /// Animation loop behavior.
    pub loop_count: LoopCount,
}

/// Sink contract for consuming rendered frames in ply order.
///
/// Ordering contract: `push_frame` is called with strictly increasing ply
/// indices, starting at the first frame of the requested range.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> BoardcastResult<()>;
    /// Push one frame in strictly increasing ply order.
    fn push_frame(&mut self, ply: PlyIndex, frame: &FrameRgba) -> BoardcastResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> BoardcastResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(PlyIndex, FrameRgba)>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Borrow the captured frames in push order.
    pub fn frames(&self) -> &[(PlyIndex, FrameRgba)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> BoardcastResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, ply: PlyIndex, frame: &FrameRgba) -> BoardcastResult<()> {
        self.frames.push((ply, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> BoardcastResult<()> {
        Ok(())
    }
}