use std::path::Path;

use ab_glyph::{FontArc, PxScale};

use crate::error::{ScanreelError, ScanreelResult};

/// Well-known monospace font locations probed when no explicit path is given.
/// First hit wins.
pub const FALLBACK_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeMono.ttf",
    "/System/Library/Fonts/Menlo.ttc",
    "C:\\Windows\\Fonts\\consola.ttf",
];

/// The typeface used for callout and HUD text.
///
/// Loading is best-effort by design: the renderer treats a missing font as a
/// degraded-but-valid run (glyphs omitted, geometry untouched), so `load`
/// returns a `Result` and the caller decides to discard the error.
#[derive(Clone, Debug)]
pub struct LabelFont {
    font: FontArc,
}

impl LabelFont {
    /// Load a font from an explicit file path.
    pub fn from_path(path: impl AsRef<Path>) -> ScanreelResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| ScanreelError::font(format!("read '{}': {e}", path.display())))?;
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| ScanreelError::font(format!("parse '{}': {e}", path.display())))?;
        Ok(Self { font })
    }

    /// Load the label font: the explicit path if given, otherwise the first
    /// usable entry of [`FALLBACK_FONT_PATHS`].
    pub fn load(explicit: Option<&Path>) -> ScanreelResult<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        for &candidate in FALLBACK_FONT_PATHS {
            match Self::from_path(candidate) {
                Ok(font) => {
                    tracing::debug!(path = candidate, "label font resolved");
                    return Ok(font);
                }
                Err(err) => tracing::debug!(path = candidate, %err, "font candidate skipped"),
            }
        }
        Err(ScanreelError::font(
            "no usable monospace font found in fallback locations",
        ))
    }

    pub fn raw(&self) -> &FontArc {
        &self.font
    }
}

/// Convert a point size to the pixel scale used by the rasterizer (96 dpi).
pub fn scale(pt: f64) -> PxScale {
    PxScale::from((pt * 96.0 / 72.0) as f32)
}
