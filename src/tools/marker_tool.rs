use egui::{Color32, Pos2};
use log::debug;

use super::{Tool, ToolAction, ToolContext, to_device};
use crate::raster::{MarkerTip, RasterSnapshot};

/// Number of most recent points kept for smoothing
pub const STROKE_WINDOW: usize = 4;

/// Sliding window of the most recent stroke points, in device pixels
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeWindow {
    points: Vec<Pos2>,
    pub color: Color32,
    pub tip: MarkerTip,
}

impl StrokeWindow {
    pub fn new(start: Pos2, color: Color32, tip: MarkerTip) -> Self {
        Self {
            points: vec![start],
            color,
            tip,
        }
    }

    pub fn push(&mut self, point: Pos2) {
        self.points.push(point);
        if self.points.len() > STROKE_WINDOW {
            let excess = self.points.len() - STROKE_WINDOW;
            self.points.drain(..excess);
        }
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }
}

#[derive(Debug, Clone, Default)]
pub enum MarkerState {
    #[default]
    Idle,
    Drawing {
        window: StrokeWindow,
        /// Raster before the gesture, restored if it is cancelled
        before: RasterSnapshot,
        drawn: bool,
    },
}

/// Freehand marker: every move commits the smoothed window straight into
/// the raster.
#[derive(Debug, Clone, Default)]
pub struct MarkerTool {
    state: MarkerState,
}

impl MarkerTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &MarkerState {
        &self.state
    }
}

impl Tool for MarkerTool {
    fn name(&self) -> &'static str {
        "Marker"
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> Option<ToolAction> {
        let start = to_device(pos, ctx.raster.dpr());
        self.state = MarkerState::Drawing {
            window: StrokeWindow::new(start, ctx.options.marker_color, ctx.options.marker_tip),
            before: ctx.raster.snapshot(),
            drawn: false,
        };
        None
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> Option<ToolAction> {
        let MarkerState::Drawing { window, drawn, .. } = &mut self.state else {
            return None;
        };
        window.push(to_device(pos, ctx.raster.dpr()));
        if ctx.raster.commit_stroke(window.points(), window.color, window.tip) {
            *drawn = true;
            Some(ToolAction::Repaint)
        } else {
            None
        }
    }

    fn on_pointer_up(&mut self, _pos: Pos2, _ctx: &mut ToolContext<'_>) -> Option<ToolAction> {
        match std::mem::take(&mut self.state) {
            MarkerState::Drawing { drawn: true, .. } => Some(ToolAction::CommitRaster),
            _ => None,
        }
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) -> bool {
        match std::mem::take(&mut self.state) {
            MarkerState::Drawing { before, drawn, .. } => {
                if drawn {
                    debug!("Marker stroke cancelled, restoring raster");
                    ctx.raster.restore(&before);
                }
                true
            }
            MarkerState::Idle => false,
        }
    }

    fn is_active_gesture(&self) -> bool {
        matches!(self.state, MarkerState::Drawing { .. })
    }

    fn current_state_name(&self) -> &'static str {
        match self.state {
            MarkerState::Idle => "Idle",
            MarkerState::Drawing { .. } => "Drawing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_window_keeps_last_four() {
        let mut window = StrokeWindow::new(pos2(0.0, 0.0), Color32::RED, MarkerTip::Thin);
        for i in 1..=6 {
            window.push(pos2(i as f32, 0.0));
        }
        assert_eq!(
            window.points(),
            &[pos2(3.0, 0.0), pos2(4.0, 0.0), pos2(5.0, 0.0), pos2(6.0, 0.0)]
        );
    }
}
