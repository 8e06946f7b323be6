//! Thin raster helpers over `imageproc` draw calls.
//!
//! `imageproc` lines are one pixel wide; thickness here is built from
//! parallel sub-pixel-offset segments, and thick rectangle outlines from one
//! filled rect per edge, centered on the path the way a canvas stroke is.

use ab_glyph::{FontArc, PxScale};
use image::RgbaImage;
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut,
};
use imageproc::rect::Rect as PixelRect;

use crate::core::{Point, Rect, Rgba8, Vec2};

/// Fill `rect` (rounded to whole pixels). Degenerate rects are a no-op.
pub fn fill_rect(img: &mut RgbaImage, rect: Rect, color: Rgba8) {
    let x0 = rect.x0.round() as i32;
    let y0 = rect.y0.round() as i32;
    let w = (rect.x1.round() as i32) - x0;
    let h = (rect.y1.round() as i32) - y0;
    if w <= 0 || h <= 0 {
        return;
    }
    draw_filled_rect_mut(
        img,
        PixelRect::at(x0, y0).of_size(w as u32, h as u32),
        color.to_pixel(),
    );
}

/// Stroke `rect` with the stroke centered on its edges.
pub fn stroke_rect(img: &mut RgbaImage, rect: Rect, width: u32, color: Rgba8) {
    if width == 0 {
        return;
    }
    let w = f64::from(width);
    let half = w / 2.0;
    let outer = rect.inflate(half, half);
    // Top, bottom, left, right bands.
    fill_rect(img, Rect::new(outer.x0, outer.y0, outer.x1, outer.y0 + w), color);
    fill_rect(img, Rect::new(outer.x0, outer.y1 - w, outer.x1, outer.y1), color);
    fill_rect(img, Rect::new(outer.x0, outer.y0, outer.x0 + w, outer.y1), color);
    fill_rect(img, Rect::new(outer.x1 - w, outer.y0, outer.x1, outer.y1), color);
}

/// Draw a line of the given width between two points.
pub fn line(img: &mut RgbaImage, a: Point, b: Point, width: u32, color: Rgba8) {
    let pixel = color.to_pixel();
    if width <= 1 {
        draw_line_segment_mut(
            img,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            pixel,
        );
        return;
    }

    let d = b - a;
    let len = d.hypot();
    if len <= f64::EPSILON {
        return;
    }
    // Unit normal; parallel segments every half pixel leave no gaps on diagonals.
    let n = Vec2::new(-d.y / len, d.x / len);
    let w = f64::from(width);
    let half = (w - 1.0) / 2.0;
    let steps = ((w - 1.0) * 2.0) as u32 + 1;
    for k in 0..steps {
        let off = -half + f64::from(k) * 0.5;
        let oa = a + n * off;
        let ob = b + n * off;
        draw_line_segment_mut(
            img,
            (oa.x as f32, oa.y as f32),
            (ob.x as f32, ob.y as f32),
            pixel,
        );
    }
}

/// Fill a circle; radii under half a pixel draw nothing.
pub fn filled_circle(img: &mut RgbaImage, center: Point, radius: f64, color: Rgba8) {
    let r = radius.round() as i32;
    if r < 1 {
        return;
    }
    draw_filled_circle_mut(
        img,
        (center.x.round() as i32, center.y.round() as i32),
        r,
        color.to_pixel(),
    );
}

/// Draw `text` with its top-left corner at `top_left`.
pub fn text(
    img: &mut RgbaImage,
    color: Rgba8,
    top_left: Point,
    scale: PxScale,
    font: &FontArc,
    text: &str,
) {
    draw_text_mut(
        img,
        color.to_pixel(),
        top_left.x.round() as i32,
        top_left.y.round() as i32,
        scale,
        font,
        text,
    );
}
