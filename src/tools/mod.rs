use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::config::CanvasConfig;
use crate::element::{ElementStore, ImageFrame, TapeSelection};
use crate::raster::{MarkerTip, RasterSurface};
use crate::util::color;

mod frame_tool;
mod marker_tool;
mod selection_tool;
mod text_tool;
mod washi_tape_tool;

pub use frame_tool::FrameTool;
pub use marker_tool::{MarkerState, MarkerTool, StrokeWindow};
pub use selection_tool::{SelectionState, SelectionTool};
pub use text_tool::TextTool;
pub use washi_tape_tool::{WashiTapeState, WashiTapeTool};

/// The tool picked in the toolbar
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolType {
    Marker,
    WashiTape,
    ImageFrame,
    Text,
}

impl ToolType {
    pub const ALL: [ToolType; 4] = [Self::Marker, Self::WashiTape, Self::ImageFrame, Self::Text];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Marker => "Marker",
            Self::WashiTape => "Washi Tape",
            Self::ImageFrame => "Image Frame",
            Self::Text => "Text",
        }
    }
}

/// Frame border style. Only the plain style exists today.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FramePattern {
    #[default]
    Regular,
}

/// Resolved toolbar values, read when a stroke, tape or frame is committed
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolOptions {
    #[serde(with = "color::hex")]
    pub marker_color: Color32,
    pub marker_tip: MarkerTip,
    pub washi_tape: TapeSelection,
    #[serde(with = "color::hex")]
    pub frame_color: Color32,
    pub frame_pattern: FramePattern,
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self {
            marker_color: Color32::from_rgb(0xFD, 0xBB, 0x80),
            marker_tip: MarkerTip::Marker,
            washi_tape: TapeSelection::default(),
            frame_color: Color32::from_rgb(0xE8, 0xE0, 0xD0),
            frame_pattern: FramePattern::Regular,
        }
    }
}

/// Everything a tool may read or draw into while handling an event
pub struct ToolContext<'a> {
    pub raster: &'a mut RasterSurface,
    pub store: &'a ElementStore,
    pub options: &'a ToolOptions,
    pub config: &'a CanvasConfig,
    pub now: f64,
}

/// What the engine should do after a tool handled an event
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    /// Raster pixels changed
    Repaint,
    /// A raster gesture finished; snapshot it
    CommitRaster,
    /// Apply a store command and snapshot it
    Execute(Command),
    /// Add a frame, select it and release the tool
    PlaceFrame(ImageFrame),
    /// Open the text modal for a new label at this position
    OpenTextModal(Pos2),
}

/// Per-tool interaction state machine. Positions are logical points.
pub trait Tool {
    fn name(&self) -> &'static str;

    /// Called when the tool becomes the selected tool
    fn activate(&mut self) {}

    /// Called when another tool is selected. Must abandon any gesture.
    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.cancel(ctx);
    }

    fn on_pointer_down(&mut self, _pos: Pos2, _ctx: &mut ToolContext<'_>) -> Option<ToolAction> {
        None
    }

    fn on_pointer_move(&mut self, _pos: Pos2, _ctx: &mut ToolContext<'_>) -> Option<ToolAction> {
        None
    }

    fn on_pointer_up(&mut self, _pos: Pos2, _ctx: &mut ToolContext<'_>) -> Option<ToolAction> {
        None
    }

    /// A click that started on empty canvas
    fn on_click(&mut self, _pos: Pos2, _ctx: &mut ToolContext<'_>) -> Option<ToolAction> {
        None
    }

    /// Abandon an in-progress gesture without committing it. Returns true if
    /// a gesture was active.
    fn cancel(&mut self, _ctx: &mut ToolContext<'_>) -> bool {
        false
    }

    fn is_active_gesture(&self) -> bool {
        false
    }

    fn current_state_name(&self) -> &'static str {
        "Idle"
    }
}

/// The selected tool with its state machine
#[derive(Debug, Clone)]
pub enum ActiveTool {
    Marker(MarkerTool),
    WashiTape(WashiTapeTool),
    ImageFrame(FrameTool),
    Text(TextTool),
}

impl ActiveTool {
    pub fn new(tool_type: ToolType) -> Self {
        match tool_type {
            ToolType::Marker => Self::Marker(MarkerTool::new()),
            ToolType::WashiTape => Self::WashiTape(WashiTapeTool::new()),
            ToolType::ImageFrame => Self::ImageFrame(FrameTool::new()),
            ToolType::Text => Self::Text(TextTool::new()),
        }
    }

    pub fn tool_type(&self) -> ToolType {
        match self {
            Self::Marker(_) => ToolType::Marker,
            Self::WashiTape(_) => ToolType::WashiTape,
            Self::ImageFrame(_) => ToolType::ImageFrame,
            Self::Text(_) => ToolType::Text,
        }
    }

    pub fn as_washi_tape(&self) -> Option<&WashiTapeTool> {
        match self {
            Self::WashiTape(tool) => Some(tool),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn Tool {
        match self {
            Self::Marker(tool) => tool,
            Self::WashiTape(tool) => tool,
            Self::ImageFrame(tool) => tool,
            Self::Text(tool) => tool,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Tool {
        match self {
            Self::Marker(tool) => tool,
            Self::WashiTape(tool) => tool,
            Self::ImageFrame(tool) => tool,
            Self::Text(tool) => tool,
        }
    }
}

impl Tool for ActiveTool {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn activate(&mut self) {
        self.inner_mut().activate();
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.inner_mut().deactivate(ctx);
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> Option<ToolAction> {
        self.inner_mut().on_pointer_down(pos, ctx)
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> Option<ToolAction> {
        self.inner_mut().on_pointer_move(pos, ctx)
    }

    fn on_pointer_up(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> Option<ToolAction> {
        self.inner_mut().on_pointer_up(pos, ctx)
    }

    fn on_click(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> Option<ToolAction> {
        self.inner_mut().on_click(pos, ctx)
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) -> bool {
        self.inner_mut().cancel(ctx)
    }

    fn is_active_gesture(&self) -> bool {
        self.inner().is_active_gesture()
    }

    fn current_state_name(&self) -> &'static str {
        self.inner().current_state_name()
    }
}

/// Convert a logical point into raster device pixels
pub(crate) fn to_device(pos: Pos2, dpr: f32) -> Pos2 {
    Pos2::new(pos.x * dpr, pos.y * dpr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ToolOptions::default();
        assert_eq!(options.marker_tip, MarkerTip::Marker);
        assert_eq!(options.washi_tape, TapeSelection::Pattern(crate::element::WashiPattern::Checkers));
    }

    #[test]
    fn test_active_tool_round_trip() {
        for tool_type in ToolType::ALL {
            let tool = ActiveTool::new(tool_type);
            assert_eq!(tool.tool_type(), tool_type);
            assert_eq!(tool.current_state_name(), "Idle");
        }
    }
}
