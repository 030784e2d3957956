use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::util::color;

/// Tunable constants of the canvas. Persisted with the app state, so every
/// field falls back to its default when missing from older saves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    #[serde(with = "color::hex")]
    pub background_color: Color32,
    #[serde(with = "color::hex")]
    pub grid_color: Color32,
    /// Grid spacing in logical points
    pub grid_spacing: f32,
    pub grid_line_width: f32,
    pub show_grid: bool,

    pub marker_width: f32,
    pub marker_alpha: f32,
    pub thin_width: f32,

    /// Tape height in logical points
    pub tape_height: f32,
    pub tape_color_alpha: f32,

    pub frame_width: f32,
    pub frame_height: f32,
    pub frame_min_width: f32,
    pub frame_padding: f32,
    pub frame_bottom_padding: f32,
    #[serde(with = "color::hex")]
    pub frame_color: Color32,

    pub text_font_size: f32,
    pub text_font_family: String,
    #[serde(with = "color::hex")]
    pub text_color: Color32,
    pub text_width: f32,
    pub text_height: f32,
    pub text_min_width: f32,
    pub text_min_height: f32,

    pub history_depth: usize,
    pub history_debounce_secs: f64,

    pub upload_max_width: u32,
    pub upload_max_height: u32,
    /// JPEG quality, 1..=100
    pub upload_jpeg_quality: u8,
    /// Decode uploads on the calling thread instead of a worker thread
    pub upload_inline: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            background_color: Color32::from_rgb(0xFA, 0xFA, 0xFA),
            grid_color: Color32::from_rgb(0xE4, 0xE4, 0xE7),
            grid_spacing: 10.0,
            grid_line_width: 0.3,
            show_grid: true,

            marker_width: 20.0,
            marker_alpha: 0.3,
            thin_width: 2.0,

            tape_height: 40.0,
            tape_color_alpha: 0.6,

            frame_width: 220.0,
            frame_height: 270.0,
            frame_min_width: 50.0,
            frame_padding: 8.0,
            frame_bottom_padding: 40.0,
            frame_color: Color32::from_rgb(0xE8, 0xE0, 0xD0),

            text_font_size: 20.0,
            text_font_family: "Cedarville Cursive".to_owned(),
            text_color: Color32::BLACK,
            text_width: 150.0,
            text_height: 50.0,
            text_min_width: 50.0,
            text_min_height: 20.0,

            history_depth: 15,
            history_debounce_secs: 0.3,

            upload_max_width: 1200,
            upload_max_height: 1200,
            upload_jpeg_quality: 85,
            upload_inline: cfg!(target_arch = "wasm32"),
        }
    }
}

impl CanvasConfig {
    /// Fixed width / height ratio of every frame
    pub fn frame_ratio(&self) -> f32 {
        self.frame_width / self.frame_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_ratio() {
        let config = CanvasConfig::default();
        assert!((config.frame_ratio() - 220.0 / 270.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: CanvasConfig = serde_json::from_str(r##"{"frame_color":"#6BAAE8"}"##).unwrap();
        assert_eq!(config.frame_color, Color32::from_rgb(0x6B, 0xAA, 0xE8));
        assert_eq!(config.history_depth, 15);
    }
}
