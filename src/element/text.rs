use egui::{Color32, Pos2, Rect, Vec2, pos2, vec2};
use serde::{Deserialize, Serialize};

use super::{Element, ElementId};
use crate::config::CanvasConfig;
use crate::util::color;

/// A text label overlay. `x, y` is the center in logical points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub id: ElementId,
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub font_size: f32,
    pub font_family: String,
    #[serde(with = "color::hex")]
    pub color: Color32,
    pub width: f32,
    pub height: f32,
}

impl TextElement {
    pub fn new(center: Pos2, text: String, config: &CanvasConfig) -> Self {
        Self {
            id: ElementId::new(),
            x: center.x,
            y: center.y,
            text,
            font_size: config.text_font_size,
            font_family: config.text_font_family.clone(),
            color: config.text_color,
            width: config.text_width,
            height: config.text_height,
        }
    }

    pub fn center(&self) -> Pos2 {
        pos2(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }
}

impl Element for TextElement {
    fn id(&self) -> ElementId {
        self.id
    }

    fn rect(&self) -> Rect {
        Rect::from_center_size(self.center(), self.size())
    }

    fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }
}
