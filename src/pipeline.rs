use std::path::PathBuf;

use crate::{
    compose::FrameComposer,
    core::{FrameIndex, FrameRgba},
    encode::{FrameSink, GifSink, GifSinkOpts, SinkConfig},
    error::ScanreelResult,
    fonts::LabelFont,
    scene::Scene,
};

/// Aggregated rendering counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames composited and handed to the sink.
    pub frames_rendered: u64,
}

/// Compose a single frame of `scene`.
///
/// This is the one-shot API for producing pixels without a sink; the frame
/// loop in [`render_scene`] goes through the same compositor.
pub fn render_frame(
    scene: &Scene,
    font: Option<&LabelFont>,
    frame: FrameIndex,
) -> ScanreelResult<FrameRgba> {
    scene.validate()?;
    FrameComposer::new(scene, font)?.compose(frame)
}

/// Drive the full frame loop: strictly sequential, one `begin`, exactly N
/// `push_frame` calls in timeline order, one `end`.
#[tracing::instrument(skip(scene, font, sink), fields(frames = scene.frames))]
pub fn render_scene(
    scene: &Scene,
    font: Option<&LabelFont>,
    sink: &mut dyn FrameSink,
) -> ScanreelResult<RenderStats> {
    scene.validate()?;

    sink.begin(SinkConfig {
        width: scene.canvas.width,
        height: scene.canvas.height,
        delay_ms: scene.delay_ms,
        loop_forever: true,
    })?;

    let composer = FrameComposer::new(scene, font)?;
    let mut stats = RenderStats::default();
    for i in 0..scene.frames {
        let idx = FrameIndex(i);
        let frame = composer.compose(idx)?;
        sink.push_frame(idx, &frame)?;
        stats.frames_rendered += 1;
        if i % 10 == 0 {
            tracing::debug!(frame = i, "composited");
        }
    }

    sink.end()?;
    Ok(stats)
}

/// Options for [`render_to_gif`].
#[derive(Clone, Debug)]
pub struct RenderToGifOpts {
    /// Refuse to overwrite an existing output file when `false`.
    pub overwrite: bool,
    /// Explicit label font path; when unset, well-known locations are probed.
    pub font_path: Option<PathBuf>,
}

impl Default for RenderToGifOpts {
    fn default() -> Self {
        Self {
            overwrite: true,
            font_path: None,
        }
    }
}

/// Render a scene to an animated GIF file.
///
/// The label font is best-effort: a load failure is logged and discarded, and
/// the run continues with glyph rendering disabled. Subject geometry is
/// unaffected by the substitution.
pub fn render_to_gif(
    scene: &Scene,
    out_path: impl Into<PathBuf>,
    opts: &RenderToGifOpts,
) -> ScanreelResult<RenderStats> {
    let font = match LabelFont::load(opts.font_path.as_deref()) {
        Ok(font) => Some(font),
        Err(err) => {
            tracing::warn!(%err, "label font unavailable, rendering without text");
            None
        }
    };

    let mut sink = GifSink::new(GifSinkOpts {
        out_path: out_path.into(),
        overwrite: opts.overwrite,
        speed: scene.quality,
    });
    render_scene(scene, font.as_ref(), &mut sink)
}
