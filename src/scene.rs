use std::path::Path;

use crate::{
    core::{Canvas, Rgba8, Vec2},
    error::{ScanreelError, ScanreelResult},
    timeline::RevealPolicy,
};

/// Complete authored description of one GIF: canvas, timing, encoder quality,
/// reveal policy, and the subject list. Everything the renderer consumes is
/// fixed here before the frame loop starts; nothing mutates during a run.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub canvas: Canvas,
    /// Total frame count N; progress runs `i / (N - 1)`.
    pub frames: u32,
    /// Nominal per-frame display delay in milliseconds.
    pub delay_ms: u32,
    /// Palette quantizer sampling factor, 1 (best) to 30 (fastest).
    pub quality: i32,
    pub reveal: RevealPolicy,
    pub subjects: Vec<Subject>,
}

/// One animated figure. Authored parameters only; per-frame position, size,
/// and reveal stage are derived in `timeline` and never stored.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Subject {
    /// Display label shown in the callout, e.g. a badge id.
    pub label: String,
    pub status: Status,
    /// Highlight color for the detection box and callout.
    pub color: Rgba8,
    /// Start position as fractional canvas coordinates (0..1 each axis).
    pub pos_start: Vec2,
    /// End position as fractional canvas coordinates.
    pub pos_end: Vec2,
    /// Start size in pixels (head radius; all silhouette geometry scales from it).
    pub size_start: f64,
    /// End size in pixels.
    pub size_end: f64,
}

/// Classification shown in a subject's callout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Status {
    Authorized,
    Visitor,
    Unauthorized,
}

impl Status {
    pub fn caption(self) -> &'static str {
        match self {
            Self::Authorized => "AUTHORIZED",
            Self::Visitor => "VISITOR",
            Self::Unauthorized => "UNAUTHORIZED",
        }
    }

    /// Default highlight color for the status.
    pub fn color(self) -> Rgba8 {
        match self {
            Self::Authorized => Rgba8::rgb(0x00, 0xFF, 0x66),
            Self::Visitor => Rgba8::rgb(0x00, 0xCC, 0xFF),
            Self::Unauthorized => Rgba8::rgb(0xFF, 0x33, 0x33),
        }
    }
}

impl Scene {
    /// The built-in marketing scene: 800x500, 90 frames at 50 ms, four
    /// subjects walking toward the camera with staggered identification.
    pub fn demo() -> Self {
        fn subject(
            label: &str,
            status: Status,
            pos_start: (f64, f64),
            pos_end: (f64, f64),
            size_start: f64,
            size_end: f64,
        ) -> Subject {
            Subject {
                label: label.to_string(),
                status,
                color: status.color(),
                pos_start: Vec2::new(pos_start.0, pos_start.1),
                pos_end: Vec2::new(pos_end.0, pos_end.1),
                size_start,
                size_end,
            }
        }

        Self {
            canvas: Canvas {
                width: 800,
                height: 500,
            },
            frames: 90,
            delay_ms: 50,
            quality: 10,
            reveal: RevealPolicy {
                base: 0.3,
                step: 0.1,
                lead_in: 0.2,
            },
            subjects: vec![
                subject(
                    "EMP-8821",
                    Status::Authorized,
                    (0.15, 0.45),
                    (0.15, 0.65),
                    22.0,
                    75.0,
                ),
                subject(
                    "VIS-5521",
                    Status::Visitor,
                    (0.38, 0.40),
                    (0.38, 0.60),
                    18.0,
                    60.0,
                ),
                subject(
                    "EMP-1093",
                    Status::Authorized,
                    (0.62, 0.48),
                    (0.62, 0.70),
                    24.0,
                    80.0,
                ),
                subject(
                    "UNKNOWN",
                    Status::Unauthorized,
                    (0.85, 0.42),
                    (0.85, 0.62),
                    20.0,
                    70.0,
                ),
            ],
        }
    }

    /// Load a scene from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> ScanreelResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let scene: Self = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| ScanreelError::serde(format!("parse scene '{}': {e}", path.display())))?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn validate(&self) -> ScanreelResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ScanreelError::validation("canvas width/height must be > 0"));
        }
        if self.frames == 0 {
            return Err(ScanreelError::validation("frames must be >= 1"));
        }
        if self.delay_ms == 0 {
            return Err(ScanreelError::validation("delay_ms must be >= 1"));
        }
        if !(1..=30).contains(&self.quality) {
            return Err(ScanreelError::validation("quality must be in 1..=30"));
        }
        self.reveal.validate()?;

        for (i, s) in self.subjects.iter().enumerate() {
            if s.label.trim().is_empty() {
                return Err(ScanreelError::validation(format!(
                    "subject {i} label must be non-empty"
                )));
            }
            for (name, pos) in [("pos_start", s.pos_start), ("pos_end", s.pos_end)] {
                if !(0.0..=1.0).contains(&pos.x) || !(0.0..=1.0).contains(&pos.y) {
                    return Err(ScanreelError::validation(format!(
                        "subject {i} {name} must lie in [0,1] x [0,1]"
                    )));
                }
            }
            for (name, size) in [("size_start", s.size_start), ("size_end", s.size_end)] {
                if !size.is_finite() || size <= 0.0 {
                    return Err(ScanreelError::validation(format!(
                        "subject {i} {name} must be finite and > 0"
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_scene_validates() {
        Scene::demo().validate().unwrap();
    }

    #[test]
    fn json_round_trip() {
        let scene = Scene::demo();
        let s = serde_json::to_string_pretty(&scene).unwrap();
        let de: Scene = serde_json::from_str(&s).unwrap();
        de.validate().unwrap();
        assert_eq!(de.frames, 90);
        assert_eq!(de.subjects.len(), 4);
        assert_eq!(de.subjects[3].status, Status::Unauthorized);
    }

    #[test]
    fn validate_rejects_zero_frames() {
        let mut scene = Scene::demo();
        scene.frames = 0;
        assert!(scene.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_position() {
        let mut scene = Scene::demo();
        scene.subjects[0].pos_end = Vec2::new(1.2, 0.5);
        assert!(scene.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_quality() {
        let mut scene = Scene::demo();
        scene.quality = 0;
        assert!(scene.validate().is_err());
        scene.quality = 31;
        assert!(scene.validate().is_err());
    }

    #[test]
    fn validate_rejects_nonpositive_size() {
        let mut scene = Scene::demo();
        scene.subjects[1].size_start = 0.0;
        assert!(scene.validate().is_err());
    }

    #[test]
    fn status_captions_and_colors_are_distinct() {
        let all = [Status::Authorized, Status::Visitor, Status::Unauthorized];
        for a in all {
            for b in all {
                if a != b {
                    assert_ne!(a.caption(), b.caption());
                    assert_ne!(a.color(), b.color());
                }
            }
        }
    }
}
