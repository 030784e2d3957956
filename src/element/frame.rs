use std::sync::Arc;

use egui::{Color32, ColorImage, Pos2, Rect, Vec2, pos2, vec2};
use serde::{Deserialize, Serialize};

use super::{Element, ElementId, generate_revision};
use crate::config::CanvasConfig;
use crate::util::color;

/// Decoded photo shown inside a frame
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FrameImage {
    /// `data:` URL of the (possibly downscaled) upload
    pub url: String,
    #[serde(skip)]
    pub pixels: Arc<ColorImage>,
    #[serde(skip)]
    pub revision: u64,
}

impl FrameImage {
    pub fn new(url: String, pixels: ColorImage) -> Self {
        Self {
            url,
            pixels: Arc::new(pixels),
            revision: generate_revision(),
        }
    }

    pub fn size(&self) -> [usize; 2] {
        self.pixels.size
    }
}

impl PartialEq for FrameImage {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

/// A photo frame overlay. `x, y` is the center in logical points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageFrame {
    pub id: ElementId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(with = "color::hex")]
    pub color: Color32,
    pub image: Option<FrameImage>,
    pub padding: f32,
    pub bottom_padding: f32,
    pub created_at: f64,
}

impl ImageFrame {
    /// Default-sized frame centered on `center`
    pub fn new(center: Pos2, color: Color32, created_at: f64, config: &CanvasConfig) -> Self {
        Self {
            id: ElementId::new(),
            x: center.x,
            y: center.y,
            width: config.frame_width,
            height: config.frame_height,
            color,
            image: None,
            padding: config.frame_padding,
            bottom_padding: config.frame_bottom_padding,
            created_at,
        }
    }

    pub fn center(&self) -> Pos2 {
        pos2(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    /// Area the photo is drawn into
    pub fn image_rect(&self) -> Rect {
        let outer = self.rect();
        Rect::from_min_max(
            outer.min + Vec2::splat(self.padding),
            pos2(outer.max.x - self.padding, outer.max.y - self.bottom_padding),
        )
    }
}

impl Element for ImageFrame {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_frame_uses_config_defaults() {
        let config = CanvasConfig::default();
        let frame = ImageFrame::new(pos2(100.0, 100.0), config.frame_color, 1.0, &config);

        assert_eq!(frame.size(), vec2(220.0, 270.0));
        assert_eq!(frame.rect().min, pos2(-10.0, -35.0));
        assert!(frame.image.is_none());
    }

    #[test]
    fn test_image_rect_respects_padding() {
        let config = CanvasConfig::default();
        let frame = ImageFrame::new(pos2(0.0, 0.0), config.frame_color, 0.0, &config);
        let inner = frame.image_rect();

        assert_eq!(inner.width(), 220.0 - 16.0);
        assert_eq!(inner.height(), 270.0 - 8.0 - 40.0);
    }

    #[test]
    fn test_hit_and_translate() {
        let config = CanvasConfig::default();
        let mut frame = ImageFrame::new(pos2(0.0, 0.0), config.frame_color, 0.0, &config);
        assert!(frame.hit_test(pos2(100.0, 0.0)));
        frame.translate(vec2(500.0, 0.0));
        assert!(!frame.hit_test(pos2(100.0, 0.0)));
        assert_eq!(frame.center(), pos2(500.0, 0.0));
    }
}
