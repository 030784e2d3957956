use eframe::egui;

use crate::tools::ToolType;

const SELECTED_BG: egui::Color32 = egui::Color32::from_rgb(0x90, 0xA2, 0xB9);
const IDLE_BG: egui::Color32 = egui::Color32::from_rgb(0xE4, 0xE4, 0xE7);

/// Square toolbar button for one tool, tinted with the tool's current color
pub struct ToolButton {
    pub tool: ToolType,
    pub accent: egui::Color32,
    pub selected: bool,
}

impl ToolButton {
    pub fn new(tool: ToolType, accent: egui::Color32, selected: bool) -> Self {
        Self { tool, accent, selected }
    }

    pub fn icon(tool: ToolType) -> &'static str {
        match tool {
            ToolType::Marker => "🖌",
            ToolType::WashiTape => "▬",
            ToolType::ImageFrame => "◻",
            ToolType::Text => "T",
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let button_size = egui::vec2(40.0, 40.0);
        let (rect, response) = ui.allocate_exact_size(button_size, egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                SELECTED_BG
            } else if response.hovered() {
                egui::Color32::from_gray(210)
            } else {
                IDLE_BG
            };
            let painter = ui.painter();
            painter.rect_filled(rect, 8.0, bg_color);

            // Color chip showing what the tool will draw with
            let chip = egui::Rect::from_min_size(rect.left_bottom() + egui::vec2(6.0, -8.0), egui::vec2(28.0, 4.0));
            painter.rect_filled(chip, 2.0, self.accent);

            painter.text(
                rect.center() - egui::vec2(0.0, 3.0),
                egui::Align2::CENTER_CENTER,
                Self::icon(self.tool),
                egui::FontId::proportional(20.0),
                if self.selected { egui::Color32::BLACK } else { egui::Color32::from_gray(80) },
            );
        }

        response.on_hover_text(self.tool.name())
    }
}
