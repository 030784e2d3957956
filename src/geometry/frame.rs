use egui::Vec2;

use crate::widgets::Corner;

/// Clamp a frame size to the minimum width, deriving the height floor from
/// the aspect ratio.
pub fn enforce_min_frame_size(width: f32, height: f32, ratio: f32, min_width: f32) -> (f32, f32) {
    let min_height = min_width / ratio;
    (width.max(min_width), height.max(min_height))
}

/// Flip a pointer delta so that dragging a corner outward always grows the
/// frame.
pub fn outward_delta(corner: Corner, delta: Vec2) -> Vec2 {
    match corner {
        Corner::TopLeft => -delta,
        Corner::TopRight => Vec2::new(delta.x, -delta.y),
        Corner::BottomLeft => Vec2::new(-delta.x, delta.y),
        Corner::BottomRight => delta,
    }
}

/// New frame size for a corner drag.
///
/// The axis with the larger absolute delta drives the width; the height always
/// follows from `ratio`, then the minimum floor is applied.
pub fn resize_frame(start: Vec2, delta: Vec2, ratio: f32, min_width: f32) -> (f32, f32) {
    let width = if delta.x.abs() > delta.y.abs() {
        start.x + delta.x
    } else {
        (start.y + delta.y) * ratio
    };
    let height = width / ratio;
    enforce_min_frame_size(width, height, ratio, min_width)
}
