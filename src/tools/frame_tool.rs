use egui::Pos2;

use super::{Tool, ToolAction, ToolContext};
use crate::element::ImageFrame;

/// Places one default-sized frame per click on empty canvas
#[derive(Debug, Clone, Default)]
pub struct FrameTool;

impl FrameTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for FrameTool {
    fn name(&self) -> &'static str {
        "Image Frame"
    }

    fn on_click(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> Option<ToolAction> {
        let frame = ImageFrame::new(pos, ctx.options.frame_color, ctx.now, ctx.config);
        Some(ToolAction::PlaceFrame(frame))
    }
}
