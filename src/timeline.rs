use crate::{
    core::{Canvas, FrameIndex, Point, Vec2},
    error::{ScanreelError, ScanreelResult},
    scene::{Scene, Subject},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// Fixed-length timeline mapping frame indices to normalized progress.
///
/// Progress is `i / (N - 1)`: strictly increasing, 0.0 at the first frame and
/// exactly 1.0 at the last. A single-frame timeline degenerates to p = 1.0,
/// the fully-revealed end state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeline {
    frames: u32,
}

impl Timeline {
    pub fn new(frames: u32) -> ScanreelResult<Self> {
        if frames == 0 {
            return Err(ScanreelError::timeline("timeline must have >= 1 frame"));
        }
        Ok(Self { frames })
    }

    pub fn frames(self) -> u32 {
        self.frames
    }

    pub fn contains(self, frame: FrameIndex) -> bool {
        frame.0 < self.frames
    }

    pub fn progress(self, frame: FrameIndex) -> f64 {
        if self.frames == 1 {
            return 1.0;
        }
        let i = frame.0.min(self.frames - 1);
        f64::from(i) / f64::from(self.frames - 1)
    }

    /// Iterate `(index, progress)` over every frame, in timeline order.
    pub fn iter(self) -> impl Iterator<Item = (FrameIndex, f64)> {
        (0..self.frames).map(move |i| (FrameIndex(i), self.progress(FrameIndex(i))))
    }
}

/// Staggered-identification policy: subject `i` is identified once progress
/// reaches `base + i * step`, preceded by a `lead_in` wide scanning window.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RevealPolicy {
    pub base: f64,
    pub step: f64,
    pub lead_in: f64,
}

impl RevealPolicy {
    pub fn validate(&self) -> ScanreelResult<()> {
        if !self.base.is_finite() || !self.step.is_finite() || !self.lead_in.is_finite() {
            return Err(ScanreelError::validation(
                "reveal policy values must be finite",
            ));
        }
        if self.lead_in <= 0.0 {
            return Err(ScanreelError::validation("reveal lead_in must be > 0"));
        }
        if self.step < 0.0 {
            return Err(ScanreelError::validation("reveal step must be >= 0"));
        }
        Ok(())
    }

    pub fn threshold(&self, index: usize) -> f64 {
        self.base + index as f64 * self.step
    }

    /// Resolve the reveal stage for subject `index` at `progress`.
    ///
    /// Total over all inputs; the only transitions reachable by increasing
    /// progress are hidden -> scanning -> identified.
    pub fn stage(&self, index: usize, progress: f64) -> RevealStage {
        let threshold = self.threshold(index);
        let scan_start = threshold - self.lead_in;
        if progress < scan_start {
            RevealStage::Hidden
        } else if progress < threshold {
            RevealStage::Scanning {
                fraction: (progress - scan_start) / self.lead_in,
            }
        } else {
            RevealStage::Identified
        }
    }
}

/// Per-frame reveal state of one subject; see [`RevealPolicy::stage`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RevealStage {
    Hidden,
    /// Sweep line active; `fraction` runs 0..1 across the lead-in window.
    Scanning { fraction: f64 },
    Identified,
}

/// Instantaneous state of one subject, derived from authored parameters and
/// progress alone. Recomputed every frame, never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubjectState {
    /// Anchor point in pixels (silhouette neck; head and body hang off it).
    pub center: Point,
    /// Current size in pixels.
    pub size: f64,
    pub stage: RevealStage,
}

pub fn subject_state(
    subject: &Subject,
    policy: &RevealPolicy,
    index: usize,
    canvas: Canvas,
    progress: f64,
) -> SubjectState {
    let pos = <Vec2 as Lerp>::lerp(&subject.pos_start, &subject.pos_end, progress);
    let size = <f64 as Lerp>::lerp(&subject.size_start, &subject.size_end, progress);
    SubjectState {
        center: Point::new(
            f64::from(canvas.width) * pos.x,
            f64::from(canvas.height) * pos.y,
        ),
        size,
        stage: policy.stage(index, progress),
    }
}

/// Derive every subject's state at `progress` and sort back-to-front by
/// ascending current size, so nearer subjects occlude farther ones. The sort
/// is stable: equal sizes keep authored order. Returned indices point into
/// `scene.subjects`.
pub fn frame_states(scene: &Scene, progress: f64) -> Vec<(usize, SubjectState)> {
    let mut states: Vec<(usize, SubjectState)> = scene
        .subjects
        .iter()
        .enumerate()
        .map(|(i, s)| (i, subject_state(s, &scene.reveal, i, scene.canvas, progress)))
        .collect();
    states.sort_by(|a, b| a.1.size.total_cmp(&b.1.size));
    states
}
