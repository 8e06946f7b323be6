use crate::core::{FrameIndex, FrameRgba};
use crate::error::ScanreelResult;

/// Configuration provided to a [`FrameSink`] at the start of a render.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Nominal per-frame display delay in milliseconds.
    pub delay_ms: u32,
    /// Whether the animation should loop forever.
    pub loop_forever: bool,
}

/// Sink contract for consuming composited frames in timeline order.
///
/// Ordering contract: `begin` is called exactly once before any frames,
/// `push_frame` is called with strictly increasing `FrameIndex`, and `end`
/// finalizes the stream exactly once after the last frame.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ScanreelResult<()>;
    /// Push one frame in strictly increasing timeline order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgba) -> ScanreelResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> ScanreelResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    /// Frames in push order.
    frames: Vec<(FrameIndex, FrameRgba)>,
    end_calls: u32,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRgba)] {
        &self.frames
    }

    /// How many times `end` has been called.
    pub fn end_calls(&self) -> u32 {
        self.end_calls
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ScanreelResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.end_calls = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgba) -> ScanreelResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ScanreelResult<()> {
        self.end_calls += 1;
        Ok(())
    }
}
