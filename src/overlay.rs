use egui::{Align2, Color32, CursorIcon, FontId, Painter, Pos2, Rect, Shadow, Stroke, Vec2, pos2, vec2};

use crate::canvas::CanvasEngine;
use crate::element::{Element, ImageFrame, TextElement};
use crate::geometry::Handle;
use crate::geometry::hit_testing::{
    FRAME_RESIZE_CORNERS, corner_position, delete_button_center, frame_handle_at, text_handle_at,
};
use crate::texture_manager::TextureManager;
use crate::tools::{SelectionState, ToolType};
use crate::widgets::{Corner, draw_delete_button, draw_resize_handle};

const SELECTION_BLUE: Color32 = Color32::from_rgb(0x3B, 0x82, 0xF6);
const PLACEHOLDER: Color32 = Color32::from_rgb(0xF4, 0xF4, 0xF5);

/// Draw frames and text labels above the raster. `origin` is the screen
/// position of the canvas' top-left corner.
pub fn paint_elements(painter: &Painter, origin: Pos2, engine: &CanvasEngine, textures: &mut TextureManager) {
    let offset = origin.to_vec2();
    let selection = engine.selection();
    let store = engine.store();

    for frame in store.frames_by_stacking() {
        let selected = selection.frame == Some(frame.id);
        paint_frame(painter, offset, frame, selected, textures);
    }

    for text in &store.text_elements {
        let selected = selection.text == Some(text.id);
        paint_text(painter, offset, text, selected);
    }
}

fn paint_frame(painter: &Painter, offset: Vec2, frame: &ImageFrame, selected: bool, textures: &mut TextureManager) {
    let rect = frame.rect().translate(offset);
    let shadow = Shadow {
        offset: vec2(0.0, 2.0),
        blur: 6.0,
        spread: 0.0,
        color: Color32::from_black_alpha(40),
    };
    painter.add(shadow.as_shape(rect, 2.0));
    painter.rect_filled(rect, 2.0, frame.color);

    let image_rect = frame.image_rect().translate(offset);
    match &frame.image {
        Some(image) if image.size()[0] > 0 && image.size()[1] > 0 => {
            let texture = textures.frame_texture(painter.ctx(), frame.id, image);
            let uv = cover_uv(image.size(), image_rect.size());
            painter.image(texture, image_rect, uv, Color32::WHITE);
        }
        _ => {
            painter.rect_filled(image_rect, 0.0, PLACEHOLDER);
            painter.text(
                image_rect.center(),
                Align2::CENTER_CENTER,
                "Drop a photo",
                FontId::proportional(14.0),
                Color32::from_gray(140),
            );
        }
    }

    if selected {
        painter.rect_stroke(rect.expand(1.0), 2.0, Stroke::new(2.0, SELECTION_BLUE));
        for corner in FRAME_RESIZE_CORNERS {
            draw_resize_handle(painter, corner_position(rect, corner));
        }
        draw_delete_button(painter, delete_button_center(rect));
    }
}

fn paint_text(painter: &Painter, offset: Vec2, text: &TextElement, selected: bool) {
    let rect = text.rect().translate(offset);
    let clipped = painter.with_clip_rect(rect.intersect(painter.clip_rect()));
    // Webfonts are not bundled; labels use the proportional family
    clipped.text(
        rect.center(),
        Align2::CENTER_CENTER,
        &text.text,
        FontId::proportional(text.font_size),
        text.color,
    );

    if selected {
        let dashes = egui::Shape::dashed_line(
            &[rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom(), rect.left_top()],
            Stroke::new(1.0, SELECTION_BLUE),
            4.0,
            3.0,
        );
        painter.extend(dashes);
        draw_resize_handle(painter, corner_position(rect, Corner::BottomRight));
        draw_delete_button(painter, delete_button_center(rect));
    }
}

/// UV rectangle that scales an image to fill `target` and crops the overflow,
/// keeping the center
pub fn cover_uv(image_size: [usize; 2], target: Vec2) -> Rect {
    let full = Rect::from_min_max(Pos2::ZERO, pos2(1.0, 1.0));
    let [w, h] = image_size;
    if w == 0 || h == 0 || target.x <= 0.0 || target.y <= 0.0 {
        return full;
    }
    let image_aspect = w as f32 / h as f32;
    let target_aspect = target.x / target.y;

    if image_aspect > target_aspect {
        let visible = target_aspect / image_aspect;
        let inset = (1.0 - visible) * 0.5;
        Rect::from_min_max(pos2(inset, 0.0), pos2(inset + visible, 1.0))
    } else {
        let visible = image_aspect / target_aspect;
        let inset = (1.0 - visible) * 0.5;
        Rect::from_min_max(pos2(0.0, inset), pos2(1.0, inset + visible))
    }
}

/// Cursor to show while hovering `pos` (canvas-local)
pub fn hover_cursor(engine: &CanvasEngine, pos: Pos2) -> Option<CursorIcon> {
    match engine.selection_state() {
        SelectionState::DraggingFrame { .. } | SelectionState::DraggingText { .. } => {
            return Some(CursorIcon::Grabbing);
        }
        SelectionState::ResizingFrame { corner, .. } => return Some(corner.cursor_icon()),
        SelectionState::ResizingText { .. } => return Some(CursorIcon::ResizeNwSe),
        SelectionState::Idle => {}
    }

    let store = engine.store();
    let handle = store
        .selected_text()
        .and_then(|text| text_handle_at(text, pos))
        .or_else(|| store.selected_frame().and_then(|frame| frame_handle_at(frame, pos)));
    match handle {
        Some(Handle::Delete) => return Some(CursorIcon::PointingHand),
        Some(Handle::Resize(corner)) => return Some(corner.cursor_icon()),
        None => {}
    }

    match engine.tool_type() {
        Some(ToolType::Marker | ToolType::WashiTape) => Some(CursorIcon::Crosshair),
        Some(ToolType::Text) if store.text_at(pos).is_none() => Some(CursorIcon::Text),
        _ if store.frame_at(pos).is_some() || store.text_at(pos).is_some() => Some(CursorIcon::Grab),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Rect, b: Rect) -> bool {
        (a.min - b.min).length() < 1e-5 && (a.max - b.max).length() < 1e-5
    }

    #[test]
    fn test_cover_uv_crops_wide_image() {
        let uv = cover_uv([400, 100], vec2(100.0, 100.0));
        assert!(approx(uv, Rect::from_min_max(pos2(0.375, 0.0), pos2(0.625, 1.0))));
    }

    #[test]
    fn test_cover_uv_crops_tall_image() {
        let uv = cover_uv([100, 200], vec2(100.0, 100.0));
        assert!(approx(uv, Rect::from_min_max(pos2(0.0, 0.25), pos2(1.0, 0.75))));
    }

    #[test]
    fn test_cover_uv_degenerate() {
        let full = Rect::from_min_max(Pos2::ZERO, pos2(1.0, 1.0));
        assert_eq!(cover_uv([0, 10], vec2(10.0, 10.0)), full);
        assert_eq!(cover_uv([10, 10], vec2(0.0, 10.0)), full);
    }
}
