use egui::{Color32, Sense, Stroke, vec2};

use crate::JournalApp;
use crate::components::ToolButton;
use crate::element::{TapeSelection, WashiPattern};
use crate::raster::MarkerTip;
use crate::tools::{FramePattern, ToolOptions, ToolType};

pub const MARKER_COLORS: [Color32; 6] = [
    Color32::from_rgb(0xFD, 0xBB, 0x80), // orange
    Color32::from_rgb(0xFE, 0x72, 0x93), // pink
    Color32::from_rgb(0x84, 0xEB, 0x9E), // green
    Color32::from_rgb(0xFC, 0xEA, 0x60), // yellow
    Color32::from_rgb(0x80, 0xC6, 0xFF), // blue
    Color32::from_rgb(0xD4, 0xAF, 0xFE), // purple
];

pub const WASHI_TAPE_COLORS: [Color32; 3] = [
    Color32::from_rgb(0x7A, 0xCC, 0xA8), // teal
    Color32::from_rgb(0x6B, 0xAA, 0xE8), // blue
    Color32::from_rgb(0xF9, 0xCE, 0x70), // yellow
];

pub const FRAME_COLORS: [Color32; 5] = [
    Color32::from_rgb(0xE8, 0xE0, 0xD0), // paper
    Color32::from_rgb(0x6B, 0xAA, 0xE8), // blue
    Color32::from_rgb(0xF9, 0xCE, 0x70), // yellow
    Color32::from_rgb(0x7A, 0xCC, 0xA8), // teal
    Color32::from_rgb(0xFE, 0x72, 0x93), // pink
];

const RING: Color32 = Color32::from_rgb(0x90, 0xA2, 0xB9);

/// Toolbar value a tool button tints itself with
fn accent(tool: ToolType, options: &ToolOptions) -> Color32 {
    match tool {
        ToolType::Marker => options.marker_color,
        ToolType::WashiTape => match options.washi_tape {
            TapeSelection::Pattern(pattern) => pattern.base_color(),
            TapeSelection::Color(color) => color,
        },
        ToolType::ImageFrame => options.frame_color,
        ToolType::Text => Color32::from_gray(24),
    }
}

/// Round color button with a ring when selected
fn swatch(ui: &mut egui::Ui, color: Color32, selected: bool) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(vec2(28.0, 28.0), Sense::click());
    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        painter.circle_filled(rect.center(), 12.0, color);
        if selected || response.hovered() {
            let alpha = if selected { 255 } else { 180 };
            painter.circle_stroke(
                rect.center(),
                14.0,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(RING.r(), RING.g(), RING.b(), alpha)),
            );
        }
    }
    response
}

/// Tool buttons, undo/redo and the option row of the selected tool
pub fn toolbar_panel(app: &mut JournalApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("toolbar").resizable(false).show(ctx, |ui| {
        ui.add_space(6.0);
        let current = app.tool_type();
        let mut options = app.tool_options().clone();

        match current {
            Some(ToolType::Marker) => marker_options(ui, &mut options),
            Some(ToolType::WashiTape) => washi_tape_options(ui, &mut options),
            Some(ToolType::ImageFrame) => frame_options(ui, &mut options),
            Some(ToolType::Text) | None => {}
        }

        ui.horizontal(|ui| {
            for tool in ToolType::ALL {
                let selected = current == Some(tool);
                if ToolButton::new(tool, accent(tool, &options), selected).show(ui).clicked() {
                    // The frame tool stays picked; the others toggle
                    let next = if selected && tool != ToolType::ImageFrame {
                        None
                    } else {
                        Some(tool)
                    };
                    log::info!("Tool selected from UI: {}", next.map_or("none", |t| t.name()));
                    app.select_tool(next);
                }
            }

            ui.separator();

            if ui.add_enabled(app.can_undo(), egui::Button::new("⟲ Undo")).clicked() {
                app.undo();
            }
            if ui.add_enabled(app.can_redo(), egui::Button::new("⟳ Redo")).clicked() {
                app.redo();
            }

            ui.separator();
            ui.toggle_value(&mut app.show_debug, "Debug");
        });
        ui.add_space(6.0);

        if options != *app.tool_options() {
            app.set_tool_options(options);
        }
    });
}

fn marker_options(ui: &mut egui::Ui, options: &mut ToolOptions) {
    ui.horizontal(|ui| {
        for tip in [MarkerTip::Thin, MarkerTip::Marker] {
            ui.selectable_value(&mut options.marker_tip, tip, tip.name());
        }
        ui.separator();
        for color in MARKER_COLORS {
            if swatch(ui, color, options.marker_color == color).clicked() {
                options.marker_color = color;
            }
        }
    });
}

fn washi_tape_options(ui: &mut egui::Ui, options: &mut ToolOptions) {
    ui.horizontal(|ui| {
        for pattern in WashiPattern::ALL {
            let selection = TapeSelection::Pattern(pattern);
            let response = swatch(ui, pattern.base_color(), options.washi_tape == selection)
                .on_hover_text(pattern.name());
            if response.clicked() {
                options.washi_tape = selection;
            }
        }
        ui.separator();
        for color in WASHI_TAPE_COLORS {
            let selection = TapeSelection::Color(color);
            if swatch(ui, color, options.washi_tape == selection).clicked() {
                options.washi_tape = selection;
            }
        }
    });
}

fn frame_options(ui: &mut egui::Ui, options: &mut ToolOptions) {
    ui.horizontal(|ui| {
        ui.selectable_value(&mut options.frame_pattern, FramePattern::Regular, "Regular");
        ui.separator();
        for color in FRAME_COLORS {
            if swatch(ui, color, options.frame_color == color).clicked() {
                options.frame_color = color;
            }
        }
    });
}
