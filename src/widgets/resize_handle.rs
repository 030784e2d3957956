use egui::{Color32, CursorIcon, Painter, Pos2, Stroke};

use crate::geometry::hit_testing::{DELETE_BUTTON_RADIUS, RESIZE_HANDLE_RADIUS};

const HANDLE_BLUE: Color32 = Color32::from_rgb(0x3B, 0x82, 0xF6);
const DELETE_RED: Color32 = Color32::from_rgb(0xEF, 0x44, 0x44);

/// A corner of an element's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Corner::TopLeft => "top_left",
            Corner::TopRight => "top_right",
            Corner::BottomLeft => "bottom_left",
            Corner::BottomRight => "bottom_right",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            Corner::TopLeft => CursorIcon::ResizeNwSe,
            Corner::TopRight => CursorIcon::ResizeNeSw,
            Corner::BottomLeft => CursorIcon::ResizeNeSw,
            Corner::BottomRight => CursorIcon::ResizeNwSe,
        }
    }
}

/// White disc with a blue border marking a resize handle
pub fn draw_resize_handle(painter: &Painter, position: Pos2) {
    painter.circle_filled(position, RESIZE_HANDLE_RADIUS, Color32::WHITE);
    painter.circle_stroke(position, RESIZE_HANDLE_RADIUS, Stroke::new(2.0, HANDLE_BLUE));
}

/// White disc with a red cross
pub fn draw_delete_button(painter: &Painter, position: Pos2) {
    painter.circle_filled(position, DELETE_BUTTON_RADIUS, Color32::WHITE);
    painter.circle_stroke(position, DELETE_BUTTON_RADIUS, Stroke::new(1.0, Color32::from_gray(220)));

    let arm = DELETE_BUTTON_RADIUS * 0.4;
    let stroke = Stroke::new(2.0, DELETE_RED);
    painter.line_segment(
        [position + egui::vec2(-arm, -arm), position + egui::vec2(arm, arm)],
        stroke,
    );
    painter.line_segment(
        [position + egui::vec2(arm, -arm), position + egui::vec2(-arm, arm)],
        stroke,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_cursors_are_diagonal_pairs() {
        assert_eq!(Corner::TopLeft.cursor_icon(), Corner::BottomRight.cursor_icon());
        assert_eq!(Corner::TopRight.cursor_icon(), Corner::BottomLeft.cursor_icon());
        assert_ne!(Corner::TopLeft.cursor_icon(), Corner::TopRight.cursor_icon());
        assert_eq!(Corner::BottomRight.as_str(), "bottom_right");
    }
}
