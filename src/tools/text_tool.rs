use egui::Pos2;

use super::{Tool, ToolAction, ToolContext};

/// Opens the text modal where the canvas was clicked
#[derive(Debug, Clone, Default)]
pub struct TextTool;

impl TextTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for TextTool {
    fn name(&self) -> &'static str {
        "Text"
    }

    fn on_click(&mut self, pos: Pos2, _ctx: &mut ToolContext<'_>) -> Option<ToolAction> {
        Some(ToolAction::OpenTextModal(pos))
    }
}
