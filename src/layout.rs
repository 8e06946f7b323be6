//! Pure geometry derived from a subject's instantaneous state.
//!
//! Everything here is a function of `SubjectState` and the canvas; nothing
//! touches pixels. The compositor turns these shapes into draw calls.

use crate::{
    core::{Canvas, Point, Rect, Vec2},
    timeline::SubjectState,
};

/// Vertical drop from the anchor point to the top of the body rect.
pub const BODY_DROP: f64 = 5.0;
/// Body half-width as a multiple of subject size.
pub const BODY_HALF_WIDTH: f64 = 1.5;
/// Body height as a multiple of subject size.
pub const BODY_HEIGHT: f64 = 4.0;
/// Detection-box padding as a multiple of subject size.
pub const BOX_PAD: f64 = 0.2;
/// Bracket corner length as a multiple of subject size.
pub const CORNER_LEN: f64 = 0.4;

/// Callout frame width in pixels.
pub const CALLOUT_W: f64 = 130.0;
/// Callout frame height in pixels; fits the label and status lines.
pub const CALLOUT_H: f64 = 44.0;
/// Minimum distance between the callout frame and the canvas edge.
pub const CALLOUT_MARGIN: f64 = 5.0;

/// Fan offsets from the detection-box top-center to the callout tip, one per
/// horizontal canvas quadrant. Spreads neighboring callouts apart so they do
/// not stack for subjects in different quadrants.
pub const CALLOUT_FAN: [Vec2; 4] = [
    Vec2::new(-100.0, -40.0),
    Vec2::new(-40.0, -80.0),
    Vec2::new(40.0, -40.0),
    Vec2::new(100.0, -80.0),
];

/// Silhouette shapes: a circular head over a rectangular body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Silhouette {
    pub head_center: Point,
    pub head_radius: f64,
    pub body: Rect,
}

pub fn silhouette(state: &SubjectState) -> Silhouette {
    let Point { x, y } = state.center;
    let s = state.size;
    Silhouette {
        head_center: Point::new(x, y - s),
        head_radius: s,
        body: Rect::new(
            x - s * BODY_HALF_WIDTH,
            y + BODY_DROP,
            x + s * BODY_HALF_WIDTH,
            y + BODY_DROP + s * BODY_HEIGHT,
        ),
    }
}

/// Detection box around the head, padded proportionally to size.
pub fn detection_box(state: &SubjectState) -> Rect {
    let Point { x, y } = state.center;
    let s = state.size;
    let pad = s * BOX_PAD;
    // Bottom edge lands exactly on the anchor: top (y - 2s - pad) + height (2s + pad).
    Rect::new(x - s - pad, y - 2.0 * s - pad, x + s + pad, y)
}

/// Stroke widths for the detection box, floored so the overlay stays visible
/// on small, distant subjects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxStrokes {
    pub outline: u32,
    pub corner: u32,
}

pub fn box_strokes(size: f64) -> BoxStrokes {
    BoxStrokes {
        outline: ((size / 15.0).floor() as u32).max(1),
        corner: ((size / 10.0).floor() as u32).max(2),
    }
}

pub fn corner_len(size: f64) -> f64 {
    size * CORNER_LEN
}

/// Endpoints of the horizontal sweep line across `bbox` at `fraction` of its
/// height (0 = top edge, 1 = bottom edge).
pub fn scan_line(bbox: Rect, fraction: f64) -> (Point, Point) {
    let y = bbox.y0 + bbox.height() * fraction;
    (Point::new(bbox.x0, y), Point::new(bbox.x1, y))
}

/// Placed callout: connector from `anchor` (box top-center) to `tip`, with
/// the text frame hanging above the tip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Callout {
    pub anchor: Point,
    pub tip: Point,
    pub frame: Rect,
}

/// Horizontal canvas quadrant of `x`, 0..=3.
pub fn quadrant(canvas: Canvas, x: f64) -> usize {
    let w = f64::from(canvas.width);
    if x < w * 0.25 {
        0
    } else if x < w * 0.50 {
        1
    } else if x < w * 0.75 {
        2
    } else {
        3
    }
}

/// Place a subject's callout.
///
/// The tip fans out from the box top-center by the quadrant offset; the frame
/// is centered on the tip and then shifted horizontally by exactly as much as
/// needed to keep it `CALLOUT_MARGIN` clear of both canvas edges. The
/// connector always runs to the unshifted tip.
pub fn callout(state: &SubjectState, canvas: Canvas) -> Callout {
    let bbox = detection_box(state);
    let anchor = Point::new(bbox.x0 + bbox.width() / 2.0, bbox.y0);
    let tip = anchor + CALLOUT_FAN[quadrant(canvas, state.center.x)];

    let min_x = CALLOUT_MARGIN;
    let max_x = f64::from(canvas.width) - CALLOUT_MARGIN - CALLOUT_W;
    // Canvases narrower than the frame plus margins pin to the left margin.
    let x = if max_x < min_x {
        min_x
    } else {
        (tip.x - CALLOUT_W / 2.0).clamp(min_x, max_x)
    };

    Callout {
        anchor,
        tip,
        frame: Rect::new(x, tip.y - CALLOUT_H, x + CALLOUT_W, tip.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::RevealStage;

    fn state(x: f64, y: f64, size: f64) -> SubjectState {
        SubjectState {
            center: Point::new(x, y),
            size,
            stage: RevealStage::Identified,
        }
    }

    const CANVAS: Canvas = Canvas {
        width: 800,
        height: 500,
    };

    #[test]
    fn silhouette_geometry() {
        let sil = silhouette(&state(100.0, 200.0, 20.0));
        assert_eq!(sil.head_center, Point::new(100.0, 180.0));
        assert_eq!(sil.head_radius, 20.0);
        assert_eq!(sil.body, Rect::new(70.0, 205.0, 130.0, 285.0));
    }

    #[test]
    fn detection_box_geometry() {
        let bbox = detection_box(&state(100.0, 200.0, 20.0));
        // pad = 4: spans [x - 24, x + 24] by [y - 44, y - 44 + 44].
        assert_eq!(bbox, Rect::new(76.0, 156.0, 124.0, 200.0));
        assert_eq!(bbox.width(), 48.0);
        assert_eq!(bbox.height(), 44.0);
    }

    #[test]
    fn stroke_floors_hold_for_small_subjects() {
        let s = box_strokes(10.0);
        assert_eq!(s.outline, 1);
        assert_eq!(s.corner, 2);
        let l = box_strokes(80.0);
        assert_eq!(l.outline, 5);
        assert_eq!(l.corner, 8);
        assert_eq!(corner_len(80.0), 32.0);
    }

    #[test]
    fn scan_line_sweeps_top_to_bottom() {
        let bbox = Rect::new(10.0, 100.0, 60.0, 140.0);
        let (a0, b0) = scan_line(bbox, 0.0);
        assert_eq!((a0.y, b0.y), (100.0, 100.0));
        assert_eq!((a0.x, b0.x), (10.0, 60.0));
        let (a1, _) = scan_line(bbox, 1.0);
        assert_eq!(a1.y, 140.0);
        let (am, _) = scan_line(bbox, 0.5);
        assert_eq!(am.y, 120.0);
    }

    #[test]
    fn quadrants_partition_the_canvas() {
        assert_eq!(quadrant(CANVAS, 0.0), 0);
        assert_eq!(quadrant(CANVAS, 199.9), 0);
        assert_eq!(quadrant(CANVAS, 200.0), 1);
        assert_eq!(quadrant(CANVAS, 399.9), 1);
        assert_eq!(quadrant(CANVAS, 400.0), 2);
        assert_eq!(quadrant(CANVAS, 600.0), 3);
        assert_eq!(quadrant(CANVAS, 800.0), 3);
    }

    #[test]
    fn fan_offsets_are_distinct_per_quadrant() {
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert_ne!(CALLOUT_FAN[i], CALLOUT_FAN[j]);
            }
        }
    }

    #[test]
    fn callout_unclamped_is_centered_on_tip() {
        let c = callout(&state(400.0, 250.0, 30.0), CANVAS);
        // Quadrant 2 offset (+40, -40).
        assert_eq!(c.anchor.x, 400.0);
        assert_eq!(c.tip.x, 440.0);
        assert_eq!(c.frame.x0, 440.0 - CALLOUT_W / 2.0);
        assert_eq!(c.frame.width(), CALLOUT_W);
        assert_eq!(c.frame.height(), CALLOUT_H);
        assert_eq!(c.frame.y1, c.tip.y);
    }

    #[test]
    fn callout_clamps_exactly_to_left_margin() {
        // Quadrant 0 subject near the left edge: tip.x - W/2 falls far
        // off-canvas and must be shifted to exactly the margin, no further.
        let c = callout(&state(40.0, 250.0, 20.0), CANVAS);
        assert_eq!(c.tip.x, -60.0);
        assert_eq!(c.frame.x0, CALLOUT_MARGIN);
        assert_eq!(c.frame.x1, CALLOUT_MARGIN + CALLOUT_W);
    }

    #[test]
    fn callout_clamps_exactly_to_right_margin() {
        let c = callout(&state(780.0, 250.0, 20.0), CANVAS);
        assert_eq!(c.tip.x, 880.0);
        assert_eq!(c.frame.x1, 800.0 - CALLOUT_MARGIN);
        assert_eq!(c.frame.x0, 800.0 - CALLOUT_MARGIN - CALLOUT_W);
    }

    #[test]
    fn callout_on_canvas_narrower_than_frame_pins_to_margin() {
        let narrow = Canvas {
            width: 100,
            height: 80,
        };
        let c = callout(&state(50.0, 40.0, 6.0), narrow);
        assert_eq!(c.frame.x0, CALLOUT_MARGIN);
    }

    #[test]
    fn callout_connector_targets_unclamped_tip() {
        let c = callout(&state(40.0, 250.0, 20.0), CANVAS);
        // The frame moved right but the connector still aims at the fan tip.
        assert!(c.tip.x < c.frame.x0);
        assert_eq!(c.anchor, Point::new(40.0, detection_box(&state(40.0, 250.0, 20.0)).y0));
    }
}
