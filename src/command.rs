use egui::{Color32, Pos2, Vec2};

use crate::element::{ElementId, ElementRef, ElementStore, FrameImage, ImageFrame, TextElement, WashiTapeElement};
use crate::error::CanvasError;

/// A committed mutation of the element store.
///
/// Gestures update element geometry live while the pointer moves; the command
/// produced on release carries the start and end values and is what makes the
/// change part of history.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddFrame(ImageFrame),
    MoveFrame {
        id: ElementId,
        from: Pos2,
        to: Pos2,
    },
    ResizeFrame {
        id: ElementId,
        from: Vec2,
        to: Vec2,
    },
    SetFrameColor {
        id: ElementId,
        color: Color32,
    },
    /// Attach an uploaded image. `created_at` is refreshed so the frame
    /// stacks above all others.
    SetFrameImage {
        id: ElementId,
        image: FrameImage,
        created_at: f64,
    },
    AddText(TextElement),
    EditText {
        id: ElementId,
        text: String,
    },
    MoveText {
        id: ElementId,
        from: Pos2,
        to: Pos2,
    },
    ResizeText {
        id: ElementId,
        from: Vec2,
        to: Vec2,
    },
    DeleteElement(ElementRef),
    RecordTape(WashiTapeElement),
}

impl Command {
    pub fn execute(&self, store: &mut ElementStore) -> Result<(), CanvasError> {
        match self {
            Command::AddFrame(frame) => {
                store.frames.push(frame.clone());
            }
            Command::MoveFrame { id, to, .. } => {
                let frame = store.frame_mut(*id).ok_or(CanvasError::ElementNotFound(ElementRef::Frame(*id)))?;
                frame.x = to.x;
                frame.y = to.y;
            }
            Command::ResizeFrame { id, to, .. } => {
                let frame = store.frame_mut(*id).ok_or(CanvasError::ElementNotFound(ElementRef::Frame(*id)))?;
                frame.width = to.x;
                frame.height = to.y;
            }
            Command::SetFrameColor { id, color } => {
                let frame = store.frame_mut(*id).ok_or(CanvasError::ElementNotFound(ElementRef::Frame(*id)))?;
                frame.color = *color;
            }
            Command::SetFrameImage { id, image, created_at } => {
                let frame = store.frame_mut(*id).ok_or(CanvasError::ElementNotFound(ElementRef::Frame(*id)))?;
                frame.image = Some(image.clone());
                frame.created_at = *created_at;
            }
            Command::AddText(text) => {
                if text.text.trim().is_empty() {
                    return Err(CanvasError::EmptyText);
                }
                store.text_elements.push(text.clone());
            }
            Command::EditText { id, text } => {
                if text.trim().is_empty() {
                    return Err(CanvasError::EmptyText);
                }
                let element = store.text_mut(*id).ok_or(CanvasError::ElementNotFound(ElementRef::Text(*id)))?;
                element.text = text.clone();
            }
            Command::MoveText { id, to, .. } => {
                let element = store.text_mut(*id).ok_or(CanvasError::ElementNotFound(ElementRef::Text(*id)))?;
                element.x = to.x;
                element.y = to.y;
            }
            Command::ResizeText { id, to, .. } => {
                let element = store.text_mut(*id).ok_or(CanvasError::ElementNotFound(ElementRef::Text(*id)))?;
                element.width = to.x;
                element.height = to.y;
            }
            Command::DeleteElement(element) => {
                if !store.remove(*element) {
                    return Err(CanvasError::ElementNotFound(*element));
                }
            }
            Command::RecordTape(tape) => {
                store.washi_tapes.push(tape.clone());
            }
        }
        Ok(())
    }

    /// Whether executing this command changes anything worth a history entry
    pub fn records_history(&self) -> bool {
        match self {
            Command::MoveFrame { from, to, .. } | Command::MoveText { from, to, .. } => from != to,
            Command::ResizeFrame { from, to, .. } | Command::ResizeText { from, to, .. } => from != to,
            _ => true,
        }
    }

    /// Snapshots taken for this command may leave the raster out
    pub fn skips_raster(&self) -> bool {
        matches!(self, Command::SetFrameImage { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::AddFrame(_) => "Add Frame",
            Command::MoveFrame { .. } => "Move Frame",
            Command::ResizeFrame { .. } => "Resize Frame",
            Command::SetFrameColor { .. } => "Set Frame Color",
            Command::SetFrameImage { .. } => "Set Frame Image",
            Command::AddText(_) => "Add Text",
            Command::EditText { .. } => "Edit Text",
            Command::MoveText { .. } => "Move Text",
            Command::ResizeText { .. } => "Resize Text",
            Command::DeleteElement(_) => "Delete Element",
            Command::RecordTape(_) => "Place Tape",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CanvasConfig;
    use egui::{pos2, vec2};

    fn store_with_frame() -> (ElementStore, ElementId) {
        let config = CanvasConfig::default();
        let mut store = ElementStore::new();
        let frame = ImageFrame::new(pos2(0.0, 0.0), config.frame_color, 0.0, &config);
        let id = frame.id;
        Command::AddFrame(frame).execute(&mut store).unwrap();
        (store, id)
    }

    #[test]
    fn test_move_and_resize_frame() {
        let (mut store, id) = store_with_frame();
        Command::MoveFrame { id, from: pos2(0.0, 0.0), to: pos2(10.0, 20.0) }
            .execute(&mut store)
            .unwrap();
        Command::ResizeFrame { id, from: vec2(220.0, 270.0), to: vec2(110.0, 135.0) }
            .execute(&mut store)
            .unwrap();

        let frame = store.frame(id).unwrap();
        assert_eq!(frame.center(), pos2(10.0, 20.0));
        assert_eq!(frame.size(), vec2(110.0, 135.0));
    }

    #[test]
    fn test_missing_element_is_reported() {
        let mut store = ElementStore::new();
        let id = ElementId::new();
        let result = Command::EditText { id, text: "x".into() }.execute(&mut store);
        assert_eq!(result, Err(CanvasError::ElementNotFound(ElementRef::Text(id))));
    }

    #[test]
    fn test_empty_text_rejected() {
        let config = CanvasConfig::default();
        let mut store = ElementStore::new();
        let text = TextElement::new(pos2(0.0, 0.0), "   ".into(), &config);
        assert_eq!(Command::AddText(text).execute(&mut store), Err(CanvasError::EmptyText));
        assert!(store.text_elements.is_empty());
    }

    #[test]
    fn test_delete_twice() {
        let (mut store, id) = store_with_frame();
        let delete = Command::DeleteElement(ElementRef::Frame(id));
        assert!(delete.execute(&mut store).is_ok());
        assert!(delete.execute(&mut store).is_err());
    }

    #[test]
    fn test_unchanged_gesture_records_nothing() {
        let id = ElementId::new();
        assert!(!Command::MoveFrame { id, from: pos2(1.0, 1.0), to: pos2(1.0, 1.0) }.records_history());
        assert!(Command::MoveText { id, from: pos2(1.0, 1.0), to: pos2(2.0, 1.0) }.records_history());
        assert!(Command::SetFrameImage { id, image: FrameImage::default(), created_at: 0.0 }.skips_raster());
    }
}
