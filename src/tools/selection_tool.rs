use egui::{Pos2, Vec2, vec2};
use log::debug;

use crate::command::Command;
use crate::config::CanvasConfig;
use crate::element::{ElementId, ElementStore, ImageFrame, TextElement};
use crate::geometry::frame::{outward_delta, resize_frame};
use crate::widgets::Corner;

/// Gesture on an existing frame or text element
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum SelectionState {
    #[default]
    Idle,
    DraggingFrame {
        id: ElementId,
        /// Pointer position relative to the frame center
        grab: Vec2,
        start: Pos2,
    },
    ResizingFrame {
        id: ElementId,
        corner: Corner,
        start_pointer: Pos2,
        start_size: Vec2,
    },
    DraggingText {
        id: ElementId,
        grab: Vec2,
        start: Pos2,
    },
    ResizingText {
        id: ElementId,
        start_pointer: Pos2,
        start_size: Vec2,
    },
}

/// Drag and resize of overlay elements. Runs alongside whichever tool is
/// selected; geometry is updated on every move and committed on release.
#[derive(Debug, Clone, Default)]
pub struct SelectionTool {
    state: SelectionState,
}

impl SelectionTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn begin_frame_drag(&mut self, frame: &ImageFrame, pointer: Pos2) {
        self.state = SelectionState::DraggingFrame {
            id: frame.id,
            grab: pointer - frame.center(),
            start: frame.center(),
        };
    }

    pub fn begin_frame_resize(&mut self, frame: &ImageFrame, corner: Corner, pointer: Pos2) {
        self.state = SelectionState::ResizingFrame {
            id: frame.id,
            corner,
            start_pointer: pointer,
            start_size: frame.size(),
        };
    }

    pub fn begin_text_drag(&mut self, text: &TextElement, pointer: Pos2) {
        self.state = SelectionState::DraggingText {
            id: text.id,
            grab: pointer - text.center(),
            start: text.center(),
        };
    }

    pub fn begin_text_resize(&mut self, text: &TextElement, pointer: Pos2) {
        self.state = SelectionState::ResizingText {
            id: text.id,
            start_pointer: pointer,
            start_size: text.size(),
        };
    }

    /// Apply the pointer position to the element under gesture. Returns true
    /// if anything changed.
    pub fn on_pointer_move(&mut self, pos: Pos2, store: &mut ElementStore, config: &CanvasConfig) -> bool {
        match self.state {
            SelectionState::Idle => false,
            SelectionState::DraggingFrame { id, grab, .. } => match store.frame_mut(id) {
                Some(frame) => {
                    let center = pos - grab;
                    frame.x = center.x;
                    frame.y = center.y;
                    true
                }
                None => self.abandon(),
            },
            SelectionState::ResizingFrame {
                id,
                corner,
                start_pointer,
                start_size,
            } => match store.frame_mut(id) {
                Some(frame) => {
                    let delta = outward_delta(corner, pos - start_pointer);
                    let (width, height) =
                        resize_frame(start_size, delta, config.frame_ratio(), config.frame_min_width);
                    frame.width = width;
                    frame.height = height;
                    true
                }
                None => self.abandon(),
            },
            SelectionState::DraggingText { id, grab, .. } => match store.text_mut(id) {
                Some(text) => {
                    let center = pos - grab;
                    text.x = center.x;
                    text.y = center.y;
                    true
                }
                None => self.abandon(),
            },
            SelectionState::ResizingText {
                id,
                start_pointer,
                start_size,
            } => match store.text_mut(id) {
                Some(text) => {
                    let delta = pos - start_pointer;
                    text.width = (start_size.x + delta.x).max(config.text_min_width);
                    text.height = (start_size.y + delta.y).max(config.text_min_height);
                    true
                }
                None => self.abandon(),
            },
        }
    }

    /// The element vanished mid-gesture; drop the gesture
    fn abandon(&mut self) -> bool {
        debug!("Element under gesture no longer exists");
        self.state = SelectionState::Idle;
        false
    }

    /// Finish the gesture, producing the command that records it
    pub fn on_pointer_up(&mut self, store: &ElementStore) -> Option<Command> {
        match std::mem::take(&mut self.state) {
            SelectionState::Idle => None,
            SelectionState::DraggingFrame { id, start, .. } => {
                store.frame(id).map(|frame| Command::MoveFrame {
                    id,
                    from: start,
                    to: frame.center(),
                })
            }
            SelectionState::ResizingFrame { id, start_size, .. } => {
                store.frame(id).map(|frame| Command::ResizeFrame {
                    id,
                    from: start_size,
                    to: frame.size(),
                })
            }
            SelectionState::DraggingText { id, start, .. } => store.text(id).map(|text| Command::MoveText {
                id,
                from: start,
                to: text.center(),
            }),
            SelectionState::ResizingText { id, start_size, .. } => {
                store.text(id).map(|text| Command::ResizeText {
                    id,
                    from: start_size,
                    to: vec2(text.width, text.height),
                })
            }
        }
    }

    /// Abandon the gesture and put the element back where it started
    pub fn cancel(&mut self, store: &mut ElementStore) -> bool {
        match std::mem::take(&mut self.state) {
            SelectionState::Idle => false,
            SelectionState::DraggingFrame { id, start, .. } => {
                if let Some(frame) = store.frame_mut(id) {
                    frame.x = start.x;
                    frame.y = start.y;
                }
                true
            }
            SelectionState::ResizingFrame { id, start_size, .. } => {
                if let Some(frame) = store.frame_mut(id) {
                    frame.width = start_size.x;
                    frame.height = start_size.y;
                }
                true
            }
            SelectionState::DraggingText { id, start, .. } => {
                if let Some(text) = store.text_mut(id) {
                    text.x = start.x;
                    text.y = start.y;
                }
                true
            }
            SelectionState::ResizingText { id, start_size, .. } => {
                if let Some(text) = store.text_mut(id) {
                    text.width = start_size.x;
                    text.height = start_size.y;
                }
                true
            }
        }
    }

    pub fn is_active_gesture(&self) -> bool {
        !matches!(self.state, SelectionState::Idle)
    }

    pub fn current_state_name(&self) -> &'static str {
        match self.state {
            SelectionState::Idle => "Idle",
            SelectionState::DraggingFrame { .. } => "DraggingFrame",
            SelectionState::ResizingFrame { .. } => "ResizingFrame",
            SelectionState::DraggingText { .. } => "Dragging",
            SelectionState::ResizingText { .. } => "Resizing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;
    use crate::element::Element;

    fn store_with_frame() -> (ElementStore, ElementId) {
        let config = CanvasConfig::default();
        let mut store = ElementStore::new();
        let frame = ImageFrame::new(pos2(100.0, 100.0), config.frame_color, 0.0, &config);
        let id = frame.id;
        store.frames.push(frame);
        (store, id)
    }

    #[test]
    fn test_drag_frame_keeps_grab_offset() {
        let config = CanvasConfig::default();
        let (mut store, id) = store_with_frame();
        let mut tool = SelectionTool::new();
        tool.begin_frame_drag(store.frame(id).unwrap(), pos2(110.0, 90.0));

        assert!(tool.on_pointer_move(pos2(160.0, 140.0), &mut store, &config));
        assert_eq!(store.frame(id).unwrap().center(), pos2(150.0, 150.0));

        let command = tool.on_pointer_up(&store).unwrap();
        assert_eq!(
            command,
            Command::MoveFrame { id, from: pos2(100.0, 100.0), to: pos2(150.0, 150.0) }
        );
        assert!(!tool.is_active_gesture());
    }

    #[test]
    fn test_resize_frame_keeps_ratio() {
        let config = CanvasConfig::default();
        let (mut store, id) = store_with_frame();
        let mut tool = SelectionTool::new();
        let corner = store.frame(id).unwrap().rect().left_top();
        tool.begin_frame_resize(store.frame(id).unwrap(), Corner::TopLeft, corner);

        // Dragging the top-left corner outward grows the frame
        tool.on_pointer_move(corner + vec2(-40.0, -10.0), &mut store, &config);
        let frame = store.frame(id).unwrap();
        assert!((frame.width - 260.0).abs() < 1e-3);
        assert!((frame.width / frame.height - config.frame_ratio()).abs() < 1e-5);

        tool.on_pointer_move(corner + vec2(1000.0, 0.0), &mut store, &config);
        assert_eq!(store.frame(id).unwrap().width, config.frame_min_width);
    }

    #[test]
    fn test_cancel_restores_geometry() {
        let config = CanvasConfig::default();
        let (mut store, id) = store_with_frame();
        let mut tool = SelectionTool::new();
        tool.begin_frame_drag(store.frame(id).unwrap(), pos2(100.0, 100.0));
        tool.on_pointer_move(pos2(300.0, 300.0), &mut store, &config);

        assert!(tool.cancel(&mut store));
        assert_eq!(store.frame(id).unwrap().center(), pos2(100.0, 100.0));
        assert!(tool.on_pointer_up(&store).is_none());
    }

    #[test]
    fn test_text_resize_floor() {
        let config = CanvasConfig::default();
        let mut store = ElementStore::new();
        let text = TextElement::new(pos2(0.0, 0.0), "hi".into(), &config);
        let id = text.id;
        store.text_elements.push(text);

        let mut tool = SelectionTool::new();
        tool.begin_text_resize(store.text(id).unwrap(), pos2(75.0, 25.0));
        tool.on_pointer_move(pos2(-500.0, -500.0), &mut store, &config);

        let text = store.text(id).unwrap();
        assert_eq!((text.width, text.height), (50.0, 20.0));
        assert_eq!(tool.current_state_name(), "Resizing");
    }
}
