use egui::Pos2;
use log::debug;

use super::{Tool, ToolAction, ToolContext, to_device};
use crate::command::Command;
use crate::element::{ElementId, WashiTapeElement};
use crate::geometry::TapeGeometry;
use crate::raster::RasterSurface;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum WashiTapeState {
    #[default]
    Idle,
    /// Anchor and current pointer, both in device pixels
    Placing { anchor: Pos2, current: Pos2 },
}

/// Drag-to-place tape strip. Only a preview exists until release.
#[derive(Debug, Clone, Default)]
pub struct WashiTapeTool {
    state: WashiTapeState,
}

impl WashiTapeTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WashiTapeState {
        self.state
    }

    /// Geometry of the strip being placed, if any
    pub fn preview(&self, raster: &RasterSurface) -> Option<TapeGeometry> {
        match self.state {
            WashiTapeState::Placing { anchor, current } => {
                let drag = TapeGeometry::from_drag(anchor, current, 0.0);
                Some(raster.tape_geometry(anchor, drag.width, drag.rotation))
            }
            WashiTapeState::Idle => None,
        }
    }
}

impl Tool for WashiTapeTool {
    fn name(&self) -> &'static str {
        "Washi Tape"
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> Option<ToolAction> {
        let anchor = to_device(pos, ctx.raster.dpr());
        self.state = WashiTapeState::Placing { anchor, current: anchor };
        None
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> Option<ToolAction> {
        let WashiTapeState::Placing { current, .. } = &mut self.state else {
            return None;
        };
        *current = to_device(pos, ctx.raster.dpr());
        Some(ToolAction::Repaint)
    }

    fn on_pointer_up(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> Option<ToolAction> {
        let WashiTapeState::Placing { anchor, .. } = std::mem::take(&mut self.state) else {
            return None;
        };
        let drag = TapeGeometry::from_drag(anchor, to_device(pos, ctx.raster.dpr()), 0.0);
        if drag.width <= 0.0 {
            debug!("Zero-length tape discarded");
            return Some(ToolAction::Repaint);
        }

        let selection = ctx.options.washi_tape;
        ctx.raster.commit_tape(anchor.x, anchor.y, drag.width, drag.rotation, selection);
        Some(ToolAction::Execute(Command::RecordTape(WashiTapeElement {
            id: ElementId::new(),
            selection,
            x: anchor.x,
            y: anchor.y,
            width: drag.width,
            rotation: drag.rotation,
            created_at: ctx.now,
        })))
    }

    fn cancel(&mut self, _ctx: &mut ToolContext<'_>) -> bool {
        matches!(std::mem::take(&mut self.state), WashiTapeState::Placing { .. })
    }

    fn is_active_gesture(&self) -> bool {
        matches!(self.state, WashiTapeState::Placing { .. })
    }

    fn current_state_name(&self) -> &'static str {
        match self.state {
            WashiTapeState::Idle => "Idle",
            WashiTapeState::Placing { .. } => "Placing",
        }
    }
}
