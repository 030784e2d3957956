use egui::{Color32, Pos2, pos2};
use tiny_skia::{LineCap, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use super::{fill_polygon, skia_color};
use crate::element::WashiPattern;

const CHECKER_SQUARE: Color32 = Color32::from_rgb(0xFC, 0xE7, 0xF3);
const CIRCLE_INK: Color32 = Color32::from_rgb(0xFA, 0xCC, 0x15);
const STAR_INK: Color32 = Color32::from_rgb(0x83, 0x9B, 0xDE);
const WAVE_INK: Color32 = Color32::from_rgb(0xEC, 0x48, 0x99);

impl WashiPattern {
    /// Edge length of one tile in logical units
    pub fn tile_size(&self) -> f32 {
        match self {
            Self::Stars => 24.0,
            _ => 36.0,
        }
    }
}

fn solid(color: Color32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(skia_color(color, 1.0));
    paint.anti_alias = true;
    paint
}

fn star_points(center: Pos2, outer: f32, inner: f32, spikes: usize) -> Vec<Pos2> {
    (0..spikes * 2)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let angle = i as f32 * std::f32::consts::PI / spikes as f32;
            pos2(center.x + angle.cos() * radius, center.y + angle.sin() * radius)
        })
        .collect()
}

/// Render one opaque pattern tile at `dpr` resolution. Shapes are laid out in
/// logical tile units and scaled by `dpr`.
pub fn render_tile(pattern: WashiPattern, dpr: f32) -> Pixmap {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    let side = (pattern.tile_size() * dpr).round().max(1.0) as u32;
    let mut tile = match Pixmap::new(side, side) {
        Some(tile) => tile,
        None => return Pixmap::new(1, 1).unwrap_or_else(|| unreachable!("1x1 pixmap is always valid")),
    };
    tile.fill(skia_color(pattern.base_color(), 1.0));
    let scale = Transform::from_scale(dpr, dpr);

    match pattern {
        WashiPattern::Checkers => {
            let paint = solid(CHECKER_SQUARE);
            for (x, y) in [(3.0, 3.0), (21.0, 3.0), (3.0, 21.0), (21.0, 21.0)] {
                if let Some(rect) = Rect::from_xywh(x, y, 12.0, 12.0) {
                    tile.fill_rect(rect, &paint, scale, None);
                }
            }
        }
        WashiPattern::Circles => {
            let paint = solid(CIRCLE_INK);
            if let Some(ring) = PathBuilder::from_circle(18.0, 18.0, 12.0) {
                let stroke = Stroke {
                    width: 3.0,
                    ..Stroke::default()
                };
                tile.stroke_path(&ring, &paint, &stroke, scale, None);
            }
            if let Some(dot) = PathBuilder::from_circle(18.0, 18.0, 6.0) {
                tile.fill_path(&dot, &paint, tiny_skia::FillRule::Winding, scale, None);
            }
        }
        // Dots tiles are plain background
        WashiPattern::Dots => {}
        WashiPattern::Stars => {
            let points: Vec<Pos2> = star_points(pos2(12.0, 12.0), 9.0, 4.5, 5)
                .into_iter()
                .map(|p| pos2(p.x * dpr, p.y * dpr))
                .collect();
            fill_polygon(&mut tile, &points, STAR_INK);
        }
        WashiPattern::Waves => {
            let mut builder = PathBuilder::new();
            for y in [9.0, 27.0] {
                builder.move_to(0.0, y);
                builder.cubic_to(9.0, y, 9.0, y + 9.0, 18.0, y + 9.0);
                builder.cubic_to(27.0, y + 9.0, 27.0, y, 36.0, y);
            }
            if let Some(path) = builder.finish() {
                let stroke = Stroke {
                    width: 3.0,
                    line_cap: LineCap::Butt,
                    ..Stroke::default()
                };
                tile.stroke_path(&path, &solid(WAVE_INK), &stroke, scale, None);
            }
        }
    }

    tile
}
