//! Draws face annotations in place onto a captured frame.
//!
//! All operations are pure side effects on the caller's frame and clip
//! silently at frame edges. Draw order matters to the loop: box, then
//! landmarks, then label, so the label is never obscured.

use crate::overlay::font;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::{
    Color, BOX_THICKNESS_PX, LABEL_OFFSET_PX, LANDMARK_RADIUS_PX, NO_FACE_LABEL,
};
use crate::shared::frame::Frame;

/// Text scale for overlay labels.
const LABEL_SCALE: i32 = 2;

/// Draws the rectangle outline from `bbox.origin()` to
/// `(bbox.top_right_x(), bbox.bottom_left_y())`.
pub fn draw_box(bbox: &BoundingBox, frame: &mut Frame, color: Color) {
    let (x0, y0) = bbox.origin();
    let x1 = bbox.top_right_x();
    let y1 = bbox.bottom_left_y();

    for t in 0..BOX_THICKNESS_PX {
        draw_hline(frame, x0, x1, y0 + t, color);
        draw_hline(frame, x0, x1, y1 - t, color);
        draw_vline(frame, y0, y1, x0 + t, color);
        draw_vline(frame, y0, y1, x1 - t, color);
    }
}

/// Draws a small filled disc at every landmark point. An empty slice draws
/// nothing.
pub fn draw_landmarks(points: &[(i32, i32)], frame: &mut Frame, color: Color) {
    let r = LANDMARK_RADIUS_PX;
    for &(cx, cy) in points {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    put_pixel(frame, cx + dx, cy + dy, color);
                }
            }
        }
    }
}

/// Draws `label` offset from `(x, y)` so it clears a box's top-left corner.
///
/// The no-face sentinel is additionally drawn uppercased and centered on the
/// frame's geometric center, the only face-independent overlay.
pub fn write_label(x: i32, y: i32, label: &str, frame: &mut Frame, color: Color) {
    if label == NO_FACE_LABEL {
        let centered = label.to_uppercase();
        let cx = frame.width() as i32 / 2 - font::text_width(&centered, LABEL_SCALE) / 2;
        let cy = frame.height() as i32 / 2 - font::GLYPH_HEIGHT * LABEL_SCALE / 2;
        font::draw_text(frame, cx, cy, &centered, color, LABEL_SCALE);
    }
    font::draw_text(
        frame,
        x + LABEL_OFFSET_PX,
        y - LABEL_OFFSET_PX,
        label,
        color,
        LABEL_SCALE,
    );
}

fn draw_hline(frame: &mut Frame, x0: i32, x1: i32, y: i32, color: Color) {
    for x in x0.min(x1)..=x0.max(x1) {
        put_pixel(frame, x, y, color);
    }
}

fn draw_vline(frame: &mut Frame, y0: i32, y1: i32, x: i32, color: Color) {
    for y in y0.min(y1)..=y0.max(y1) {
        put_pixel(frame, x, y, color);
    }
}

fn put_pixel(frame: &mut Frame, x: i32, y: i32, color: Color) {
    debug_assert_eq!(frame.channels(), 3, "overlay renders onto RGB frames");
    let width = frame.width() as i32;
    let height = frame.height() as i32;
    if x < 0 || y < 0 || x >= width || y >= height {
        return;
    }
    let offset = (y as usize * width as usize + x as usize) * 3;
    frame.data_mut()[offset..offset + 3].copy_from_slice(&color);
}
