use egui::Color32;
use serde::{Deserialize, Serialize};

use super::ElementId;
use crate::util::color;

/// The five decorative tape fills
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WashiPattern {
    Checkers,
    Circles,
    Dots,
    Stars,
    Waves,
}

impl WashiPattern {
    pub const ALL: [WashiPattern; 5] = [
        Self::Checkers,
        Self::Circles,
        Self::Dots,
        Self::Stars,
        Self::Waves,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Checkers => "checkers",
            Self::Circles => "circles",
            Self::Dots => "dots",
            Self::Stars => "stars",
            Self::Waves => "waves",
        }
    }

    /// Background color of the tile, also used for toolbar swatches
    pub fn base_color(&self) -> Color32 {
        match self {
            Self::Checkers => Color32::from_rgb(0xA5, 0xB4, 0xFC),
            Self::Circles => Color32::from_rgb(0xF9, 0x73, 0x16),
            Self::Dots => Color32::from_rgb(0xB8, 0x85, 0xF2),
            Self::Stars => Color32::from_rgb(0xFD, 0xE0, 0x47),
            Self::Waves => Color32::from_rgb(0xF8, 0xE1, 0xE7),
        }
    }
}

/// What a tape strip is filled with. A strip is either patterned or a flat
/// translucent color, never both.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TapeSelection {
    Pattern(WashiPattern),
    Color(#[serde(with = "color::hex")] Color32),
}

impl Default for TapeSelection {
    fn default() -> Self {
        Self::Pattern(WashiPattern::Checkers)
    }
}

/// Record of a placed tape strip. The strip itself lives in the raster; this
/// entry is kept for snapshots only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WashiTapeElement {
    pub id: ElementId,
    pub selection: TapeSelection,
    /// Anchor in device pixels
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub rotation: f32,
    pub created_at: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_names_are_unique() {
        let mut names: Vec<_> = WashiPattern::ALL.iter().map(|p| p.name()).collect();
        names.dedup();
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn test_selection_serializes_tagged() {
        let json = serde_json::to_string(&TapeSelection::Pattern(WashiPattern::Stars)).unwrap();
        assert_eq!(json, r#"{"Pattern":"stars"}"#);

        let color = TapeSelection::Color(Color32::from_rgb(0x7A, 0xCC, 0xA8));
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, r##"{"Color":"#7ACCA8"}"##);
        assert_eq!(serde_json::from_str::<TapeSelection>(&json).unwrap(), color);
    }
}
