use image::RgbaImage;

use crate::{
    core::{Canvas, FrameIndex, FrameRgba, Point, Rgba8, Vec2},
    draw,
    error::{ScanreelError, ScanreelResult},
    fonts::{self, LabelFont},
    layout,
    scene::{Scene, Subject},
    timeline::{self, RevealStage, SubjectState, Timeline},
};

pub const BACKGROUND: Rgba8 = Rgba8::rgb(0x0F, 0x14, 0x1E);
pub const GRID: Rgba8 = Rgba8::rgb(0x19, 0x23, 0x32);
pub const HEAD: Rgba8 = Rgba8::rgb(0x50, 0x64, 0x82);
pub const BODY: Rgba8 = Rgba8::rgb(0x3C, 0x50, 0x6E);
pub const CALLOUT_BG: Rgba8 = Rgba8::rgb(0x14, 0x19, 0x23);
/// Scan sweep and HUD color.
pub const ACCENT: Rgba8 = Rgba8::rgb(0x00, 0xFF, 0xFF);

pub const GRID_SPACING: u32 = 40;
const SCAN_STROKE: u32 = 2;
const CONNECTOR_STROKE: u32 = 2;
const CALLOUT_BORDER: u32 = 1;

const LABEL_PT: f64 = 12.0;
const HUD_PT: f64 = 16.0;
const HUD_SUB_PT: f64 = 12.0;

/// Renders one frame of a scene onto a fresh raster surface.
///
/// Layer order is fixed: background, grid, then per subject in size-ascending
/// order its silhouette followed by its reveal overlay, then the HUD caption.
/// Every frame is independent; the composer holds no raster state.
pub struct FrameComposer<'a> {
    scene: &'a Scene,
    timeline: Timeline,
    font: Option<&'a LabelFont>,
}

impl<'a> FrameComposer<'a> {
    /// The scene must already be validated.
    pub fn new(scene: &'a Scene, font: Option<&'a LabelFont>) -> ScanreelResult<Self> {
        Ok(Self {
            scene,
            timeline: Timeline::new(scene.frames)?,
            font,
        })
    }

    pub fn compose(&self, frame: FrameIndex) -> ScanreelResult<FrameRgba> {
        if !self.timeline.contains(frame) {
            return Err(ScanreelError::validation(format!(
                "frame index {} out of range 0..{}",
                frame.0, self.scene.frames
            )));
        }
        let progress = self.timeline.progress(frame);
        let canvas = self.scene.canvas;

        let mut img = RgbaImage::from_pixel(canvas.width, canvas.height, BACKGROUND.to_pixel());
        self.draw_grid(&mut img);

        for (index, state) in timeline::frame_states(self.scene, progress) {
            let subject = &self.scene.subjects[index];
            self.draw_silhouette(&mut img, &state);
            match state.stage {
                RevealStage::Hidden => {}
                RevealStage::Scanning { fraction } => self.draw_scan(&mut img, &state, fraction),
                RevealStage::Identified => self.draw_identified(&mut img, subject, &state),
            }
        }

        self.draw_hud(&mut img);
        Ok(FrameRgba::from_image(img))
    }

    fn draw_grid(&self, img: &mut RgbaImage) {
        let Canvas { width, height } = self.scene.canvas;
        let pixel = GRID.to_pixel();
        for x in (0..width).step_by(GRID_SPACING as usize) {
            for y in 0..height {
                img.put_pixel(x, y, pixel);
            }
        }
        for y in (0..height).step_by(GRID_SPACING as usize) {
            for x in 0..width {
                img.put_pixel(x, y, pixel);
            }
        }
    }

    fn draw_silhouette(&self, img: &mut RgbaImage, state: &SubjectState) {
        let sil = layout::silhouette(state);
        draw::filled_circle(img, sil.head_center, sil.head_radius, HEAD);
        draw::fill_rect(img, sil.body, BODY);
    }

    fn draw_scan(&self, img: &mut RgbaImage, state: &SubjectState, fraction: f64) {
        let bbox = layout::detection_box(state);
        let (a, b) = layout::scan_line(bbox, fraction);
        draw::line(img, a, b, SCAN_STROKE, ACCENT);
    }

    fn draw_identified(&self, img: &mut RgbaImage, subject: &Subject, state: &SubjectState) {
        let bbox = layout::detection_box(state);
        let strokes = layout::box_strokes(state.size);
        let color = subject.color;

        draw::stroke_rect(img, bbox, strokes.outline, color);

        // Corner brackets: an L at each box corner, arms pointing inward.
        let cl = layout::corner_len(state.size);
        let corners = [
            (bbox.x0, bbox.y0, cl, cl),
            (bbox.x1, bbox.y0, -cl, cl),
            (bbox.x0, bbox.y1, cl, -cl),
            (bbox.x1, bbox.y1, -cl, -cl),
        ];
        for (cx, cy, dx, dy) in corners {
            let elbow = Point::new(cx, cy);
            draw::line(img, Point::new(cx, cy + dy), elbow, strokes.corner, color);
            draw::line(img, elbow, Point::new(cx + dx, cy), strokes.corner, color);
        }

        let callout = layout::callout(state, self.scene.canvas);
        draw::line(img, callout.anchor, callout.tip, CONNECTOR_STROKE, color);
        draw::fill_rect(img, callout.frame, CALLOUT_BG);
        draw::stroke_rect(img, callout.frame, CALLOUT_BORDER, color);

        if let Some(font) = self.font {
            let origin = Point::new(callout.frame.x0 + 8.0, callout.frame.y0);
            draw::text(
                img,
                color,
                origin + Vec2::new(0.0, 6.0),
                fonts::scale(LABEL_PT),
                font.raw(),
                &subject.label,
            );
            draw::text(
                img,
                color,
                origin + Vec2::new(0.0, 24.0),
                fonts::scale(LABEL_PT),
                font.raw(),
                subject.status.caption(),
            );
        }
    }

    fn draw_hud(&self, img: &mut RgbaImage) {
        let Some(font) = self.font else {
            return;
        };
        draw::text(
            img,
            ACCENT,
            Point::new(20.0, 14.0),
            fonts::scale(HUD_PT),
            font.raw(),
            "SYSTEM: ACTIVE",
        );
        draw::text(
            img,
            ACCENT,
            Point::new(20.0, 42.0),
            fonts::scale(HUD_SUB_PT),
            font.raw(),
            &format!("TRACKING: {} SUBJECTS", self.scene.subjects.len()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_color(frame: &FrameRgba, color: Rgba8) -> bool {
        frame
            .data
            .chunks_exact(4)
            .any(|p| p == [color.r, color.g, color.b, color.a])
    }

    #[test]
    fn first_frame_has_no_detection_overlays() {
        let scene = Scene::demo();
        let composer = FrameComposer::new(&scene, None).unwrap();
        let frame = composer.compose(FrameIndex(0)).unwrap();
        assert_eq!(frame.width, 800);
        assert_eq!(frame.height, 500);
        for subject in &scene.subjects {
            assert!(!has_color(&frame, subject.color));
        }
        // Background and silhouettes are present.
        assert_eq!(frame.pixel(1, 1), Some([0x0F, 0x14, 0x1E, 255]));
        assert!(has_color(&frame, HEAD));
        assert!(has_color(&frame, BODY));
    }

    #[test]
    fn last_frame_shows_every_subject_identified() {
        let scene = Scene::demo();
        let composer = FrameComposer::new(&scene, None).unwrap();
        let frame = composer.compose(FrameIndex(89)).unwrap();
        for subject in &scene.subjects {
            assert!(has_color(&frame, subject.color));
        }
        assert!(has_color(&frame, CALLOUT_BG));
    }

    #[test]
    fn scanning_window_draws_sweep_line() {
        let scene = Scene::demo();
        let composer = FrameComposer::new(&scene, None).unwrap();
        // p = 13/89 ~ 0.146: subject 0 is mid-scan, nobody is identified.
        let frame = composer.compose(FrameIndex(13)).unwrap();
        assert!(has_color(&frame, ACCENT));
        for subject in &scene.subjects {
            assert!(!has_color(&frame, subject.color));
        }
    }

    #[test]
    fn grid_lines_at_fixed_spacing() {
        let scene = Scene::demo();
        let composer = FrameComposer::new(&scene, None).unwrap();
        let frame = composer.compose(FrameIndex(0)).unwrap();
        assert_eq!(frame.pixel(40, 1), Some([0x19, 0x23, 0x32, 255]));
        assert_eq!(frame.pixel(1, 40), Some([0x19, 0x23, 0x32, 255]));
        assert_eq!(frame.pixel(41, 1), Some([0x0F, 0x14, 0x1E, 255]));
    }

    #[test]
    fn out_of_range_frame_rejected() {
        let scene = Scene::demo();
        let composer = FrameComposer::new(&scene, None).unwrap();
        assert!(composer.compose(FrameIndex(90)).is_err());
    }

    #[test]
    fn composition_is_deterministic() {
        let scene = Scene::demo();
        let composer = FrameComposer::new(&scene, None).unwrap();
        let a = composer.compose(FrameIndex(45)).unwrap();
        let b = composer.compose(FrameIndex(45)).unwrap();
        assert_eq!(a, b);
    }
}
