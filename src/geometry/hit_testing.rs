use egui::{Pos2, Rect};

use crate::element::{Element, ImageFrame, TextElement};
use crate::widgets::Corner;

/// Radius of the round resize handles, in logical points
pub const RESIZE_HANDLE_RADIUS: f32 = 8.0;
/// Radius of the delete button drawn on the top-right corner
pub const DELETE_BUTTON_RADIUS: f32 = 12.0;

/// Frames resize from every corner except the one carrying the delete button
pub const FRAME_RESIZE_CORNERS: [Corner; 3] = [Corner::TopLeft, Corner::BottomLeft, Corner::BottomRight];

/// Part of a selected element's chrome under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Resize(Corner),
    Delete,
}

pub fn corner_position(rect: Rect, corner: Corner) -> Pos2 {
    match corner {
        Corner::TopLeft => rect.left_top(),
        Corner::TopRight => rect.right_top(),
        Corner::BottomLeft => rect.left_bottom(),
        Corner::BottomRight => rect.right_bottom(),
    }
}

pub fn delete_button_center(rect: Rect) -> Pos2 {
    rect.right_top()
}

fn handle_at(rect: Rect, corners: &[Corner], pos: Pos2) -> Option<Handle> {
    if pos.distance(delete_button_center(rect)) <= DELETE_BUTTON_RADIUS {
        return Some(Handle::Delete);
    }
    corners
        .iter()
        .find(|corner| pos.distance(corner_position(rect, **corner)) <= RESIZE_HANDLE_RADIUS)
        .map(|corner| Handle::Resize(*corner))
}

/// Handle of a selected frame under `pos`
pub fn frame_handle_at(frame: &ImageFrame, pos: Pos2) -> Option<Handle> {
    handle_at(frame.rect(), &FRAME_RESIZE_CORNERS, pos)
}

/// Handle of a selected text element under `pos`
pub fn text_handle_at(text: &TextElement, pos: Pos2) -> Option<Handle> {
    handle_at(text.rect(), &[Corner::BottomRight], pos)
}
