use egui::Pos2;
use serde::{Deserialize, Serialize};

use super::{DrawnPath, Element, ElementId, ElementRef, ImageFrame, TextElement, WashiTapeElement};

/// Currently selected frame and text, tracked independently
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub frame: Option<ElementId>,
    pub text: Option<ElementId>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.frame.is_none() && self.text.is_none()
    }
}

/// In-memory collections of everything drawn above the raster
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementStore {
    pub paths: Vec<DrawnPath>,
    pub frames: Vec<ImageFrame>,
    pub text_elements: Vec<TextElement>,
    pub washi_tapes: Vec<WashiTapeElement>,
    #[serde(skip)]
    selection: Selection,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self, id: ElementId) -> Option<&ImageFrame> {
        self.frames.iter().find(|f| f.id == id)
    }

    pub fn frame_mut(&mut self, id: ElementId) -> Option<&mut ImageFrame> {
        self.frames.iter_mut().find(|f| f.id == id)
    }

    pub fn text(&self, id: ElementId) -> Option<&TextElement> {
        self.text_elements.iter().find(|t| t.id == id)
    }

    pub fn text_mut(&mut self, id: ElementId) -> Option<&mut TextElement> {
        self.text_elements.iter_mut().find(|t| t.id == id)
    }

    pub fn contains(&self, element: ElementRef) -> bool {
        match element {
            ElementRef::Frame(id) => self.frame(id).is_some(),
            ElementRef::Text(id) => self.text(id).is_some(),
        }
    }

    /// Remove an element, clearing its selection. Returns false if it was
    /// already gone.
    pub fn remove(&mut self, element: ElementRef) -> bool {
        match element {
            ElementRef::Frame(id) => {
                let before = self.frames.len();
                self.frames.retain(|f| f.id != id);
                if self.selection.frame == Some(id) {
                    self.selection.frame = None;
                }
                self.frames.len() != before
            }
            ElementRef::Text(id) => {
                let before = self.text_elements.len();
                self.text_elements.retain(|t| t.id != id);
                if self.selection.text == Some(id) {
                    self.selection.text = None;
                }
                self.text_elements.len() != before
            }
        }
    }

    /// Frames in paint order: oldest `created_at` first
    pub fn frames_by_stacking(&self) -> Vec<&ImageFrame> {
        let mut frames: Vec<&ImageFrame> = self.frames.iter().collect();
        frames.sort_by(|a, b| a.created_at.total_cmp(&b.created_at));
        frames
    }

    /// Topmost frame under `pos`
    pub fn frame_at(&self, pos: Pos2) -> Option<ElementId> {
        self.frames_by_stacking()
            .into_iter()
            .rev()
            .find(|f| f.hit_test(pos))
            .map(|f| f.id)
    }

    /// Topmost text under `pos`; later elements paint above earlier ones
    pub fn text_at(&self, pos: Pos2) -> Option<ElementId> {
        self.text_elements
            .iter()
            .rev()
            .find(|t| t.hit_test(pos))
            .map(|t| t.id)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected_frame(&self) -> Option<&ImageFrame> {
        self.selection.frame.and_then(|id| self.frame(id))
    }

    pub fn selected_text(&self) -> Option<&TextElement> {
        self.selection.text.and_then(|id| self.text(id))
    }

    pub fn select_frame(&mut self, id: Option<ElementId>) {
        self.selection.frame = id.filter(|id| self.frame(*id).is_some());
    }

    pub fn select_text(&mut self, id: Option<ElementId>) {
        self.selection.text = id.filter(|id| self.text(*id).is_some());
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::default();
    }

    /// Drop selections that point at elements which no longer exist
    pub fn prune_selection(&mut self) {
        if let Some(id) = self.selection.frame {
            if self.frame(id).is_none() {
                self.selection.frame = None;
            }
        }
        if let Some(id) = self.selection.text {
            if self.text(id).is_none() {
                self.selection.text = None;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty() && self.text_elements.is_empty() && self.washi_tapes.is_empty()
    }

    /// Pretty JSON dump of the collections, used by the debug window
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
