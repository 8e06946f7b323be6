use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};

use crate::core::{FrameIndex, FrameRgba};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::error::{ScanreelError, ScanreelResult};

/// Options for [`GifSink`] output.
#[derive(Clone, Debug)]
pub struct GifSinkOpts {
    /// Output GIF file path.
    pub out_path: PathBuf,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
    /// Palette quantizer sampling factor, 1 (best quality) to 30 (fastest).
    pub speed: i32,
}

impl GifSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            speed: 10,
        }
    }
}

/// Sink that streams frames into an animated GIF on disk.
///
/// The encoder owns palette reduction, inter-frame delay encoding, and the
/// loop-count metadata; this sink's job is to enforce the ordering contract
/// (one `begin`, strictly increasing frames, one `end`) and hand frames over.
pub struct GifSink {
    opts: GifSinkOpts,
    encoder: Option<GifEncoder<BufWriter<File>>>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    frames_written: u64,
    finished: bool,
}

impl GifSink {
    pub fn new(opts: GifSinkOpts) -> Self {
        Self {
            opts,
            encoder: None,
            cfg: None,
            last_idx: None,
            frames_written: 0,
            finished: false,
        }
    }

    /// Frames accepted so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> ScanreelResult<()> {
        if self.encoder.is_some() || self.finished {
            return Err(ScanreelError::encode("begin called twice"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ScanreelError::validation(
                "gif sink width/height must be non-zero",
            ));
        }
        if cfg.delay_ms == 0 {
            return Err(ScanreelError::validation("gif sink delay_ms must be >= 1"));
        }
        if !(1..=30).contains(&self.opts.speed) {
            return Err(ScanreelError::validation("gif speed must be in 1..=30"));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(ScanreelError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        let file = File::create(&self.opts.out_path)?;
        let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), self.opts.speed);
        if cfg.loop_forever {
            encoder
                .set_repeat(Repeat::Infinite)
                .map_err(|e| ScanreelError::encode(format!("set loop metadata: {e}")))?;
        }

        self.encoder = Some(encoder);
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.frames_written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgba) -> ScanreelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ScanreelError::encode("push_frame before begin"))?;
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| ScanreelError::encode("push_frame after end"))?;

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(ScanreelError::encode(format!(
                "frame {}x{} does not match configured {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(ScanreelError::encode(format!(
                "frame indices must be strictly increasing ({} after {})",
                idx.0, last.0
            )));
        }

        let buffer = frame.to_image()?;
        let delay = Delay::from_numer_denom_ms(cfg.delay_ms, 1);
        encoder
            .encode_frame(Frame::from_parts(buffer, 0, 0, delay))
            .map_err(|e| ScanreelError::encode(format!("encode frame {}: {e}", idx.0)))?;

        self.last_idx = Some(idx);
        self.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> ScanreelResult<()> {
        if self.finished {
            return Err(ScanreelError::encode("end called twice"));
        }
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| ScanreelError::encode("end before begin"))?;
        if self.frames_written == 0 {
            return Err(ScanreelError::encode("no frames were pushed"));
        }

        // Dropping the encoder writes the GIF trailer and flushes the writer.
        drop(encoder);
        self.finished = true;

        let bytes = std::fs::metadata(&self.opts.out_path)?.len();
        tracing::info!(
            path = %self.opts.out_path.display(),
            frames = self.frames_written,
            bytes,
            "gif written"
        );
        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> ScanreelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
