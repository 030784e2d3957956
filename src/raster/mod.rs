use std::fmt;
use std::sync::Arc;

use egui::{Color32, ColorImage, Pos2, pos2};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tiny_skia::{
    FillRule, FilterQuality, LineCap, LineJoin, Paint, Path, PathBuilder, Pattern, Pixmap, PixmapPaint, Rect,
    SpreadMode, Stroke, Transform,
};

use crate::config::CanvasConfig;
use crate::element::TapeSelection;
use crate::geometry::smoothing::{PathSegment, SmoothPath, smooth_path};
use crate::geometry::tape::TapeGeometry;

pub mod pattern;

/// Miter length limit relative to the line width, as in HTML canvas
pub const MITER_LIMIT: f32 = 10.0;

/// Marker stroke style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerTip {
    /// Narrow, opaque, round ends
    Thin,
    /// Wide translucent highlighter with square ends
    #[default]
    Marker,
}

impl MarkerTip {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Thin => "thin",
            Self::Marker => "marker",
        }
    }
}

/// Full copy of the raster pixels
#[derive(Clone)]
pub struct RasterSnapshot {
    pixmap: Arc<Pixmap>,
}

impl RasterSnapshot {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

impl PartialEq for RasterSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions() && self.pixmap.data() == other.pixmap.data()
    }
}

impl fmt::Debug for RasterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.dimensions();
        f.debug_struct("RasterSnapshot").field("width", &w).field("height", &h).finish()
    }
}

/// Off-screen pixel buffer holding every committed stroke and tape strip.
///
/// Coordinates are device pixels: logical points multiplied by `dpr`.
/// The buffer is always opaque, so its premultiplied pixels equal the
/// straight colors.
pub struct RasterSurface {
    pixmap: Pixmap,
    dpr: f32,
    config: CanvasConfig,
}

impl fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("dpr", &self.dpr)
            .finish_non_exhaustive()
    }
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, dpr: f32, config: CanvasConfig) -> Self {
        let background = skia_color(config.background_color, 1.0);
        Self {
            pixmap: blank_pixmap(width, height, background),
            dpr: sanitize_dpr(dpr),
            config,
        }
    }

    /// Reallocate the buffer and clear it to the background. Existing content
    /// is discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        debug!("Resizing raster surface to {}x{}", width, height);
        self.pixmap = blank_pixmap(width, height, self.background());
    }

    pub fn set_dpr(&mut self, dpr: f32) {
        self.dpr = sanitize_dpr(dpr);
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn dpr(&self) -> f32 {
        self.dpr
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            Color32::from_rgba_unmultiplied(c.red(), c.green(), c.blue(), c.alpha())
        })
    }

    fn background(&self) -> tiny_skia::Color {
        skia_color(self.config.background_color, 1.0)
    }

    /// Stroke the smoothed path through `points` (device pixels). Returns
    /// false if the window was too short to produce a segment.
    pub fn commit_stroke(&mut self, points: &[Pos2], color: Color32, tip: MarkerTip) -> bool {
        let Some(path) = smooth_path(points).as_ref().and_then(to_skia_path) else {
            return false;
        };

        let (width, alpha, line_cap, line_join) = match tip {
            MarkerTip::Marker => (
                self.config.marker_width * self.dpr,
                self.config.marker_alpha,
                LineCap::Butt,
                LineJoin::Miter,
            ),
            MarkerTip::Thin => (self.config.thin_width * self.dpr, 1.0, LineCap::Round, LineJoin::Round),
        };
        let stroke = Stroke {
            width,
            miter_limit: MITER_LIMIT,
            line_cap,
            line_join,
            ..Stroke::default()
        };

        // Opacity lives on this paint only
        let mut paint = Paint::default();
        paint.set_color(skia_color(color, alpha));
        paint.anti_alias = true;

        self.pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        true
    }

    /// Bake a tape strip anchored at `(x, y)` (device pixels)
    pub fn commit_tape(&mut self, x: f32, y: f32, width: f32, rotation: f32, selection: TapeSelection) {
        let geometry = self.tape_geometry(pos2(x, y), width, rotation);
        draw_tape(
            &mut self.pixmap,
            &geometry,
            selection,
            self.dpr,
            self.config.tape_color_alpha,
        );
    }

    /// Tape geometry for a strip placed by this surface
    pub fn tape_geometry(&self, anchor: Pos2, width: f32, rotation: f32) -> TapeGeometry {
        TapeGeometry::new(anchor, width, rotation, self.config.tape_height * self.dpr)
    }

    pub fn snapshot(&self) -> RasterSnapshot {
        RasterSnapshot {
            pixmap: Arc::new(self.pixmap.clone()),
        }
    }

    /// Copy a snapshot back in. A snapshot of a different size is copied into
    /// the overlapping region of a freshly cleared buffer.
    pub fn restore(&mut self, snapshot: &RasterSnapshot) {
        if snapshot.dimensions() == (self.width(), self.height()) {
            self.pixmap.clone_from(snapshot.pixmap());
            return;
        }

        debug!(
            "Restoring {:?} raster snapshot into {}x{} surface",
            snapshot.dimensions(),
            self.width(),
            self.height()
        );
        self.pixmap.fill(self.background());
        self.pixmap.draw_pixmap(
            0,
            0,
            snapshot.pixmap().as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}

/// Upload-ready copy of `pixmap`
pub fn pixmap_to_color_image(pixmap: &Pixmap) -> ColorImage {
    ColorImage::from_rgba_premultiplied([pixmap.width() as usize, pixmap.height() as usize], pixmap.data())
}

/// Fill a tape strip into `target`. Patterns are opaque tiles rendered at
/// `dpr` and sampled at `1 / dpr`; flat colors are drawn at `color_alpha`.
pub fn draw_tape(
    target: &mut Pixmap,
    geometry: &TapeGeometry,
    selection: TapeSelection,
    dpr: f32,
    color_alpha: f32,
) {
    if geometry.width <= 0.0 {
        return;
    }
    let Some(rect) = Rect::from_xywh(0.0, -geometry.height * 0.5, geometry.width, geometry.height) else {
        return;
    };
    // Tape-local space: x along the strip, y across it, origin at the anchor
    let transform =
        Transform::from_rotate(geometry.rotation).post_translate(geometry.anchor.x, geometry.anchor.y);

    match selection {
        TapeSelection::Pattern(pattern) => {
            let tile = pattern::render_tile(pattern, dpr);
            let scale = 1.0 / sanitize_dpr(dpr);
            let paint = Paint {
                shader: Pattern::new(
                    tile.as_ref(),
                    SpreadMode::Repeat,
                    FilterQuality::Nearest,
                    1.0,
                    Transform::from_scale(scale, scale),
                ),
                anti_alias: true,
                ..Paint::default()
            };
            target.fill_rect(rect, &paint, transform, None);
        }
        TapeSelection::Color(color) => {
            let mut paint = Paint::default();
            paint.set_color(skia_color(color, color_alpha));
            paint.anti_alias = true;
            target.fill_rect(rect, &paint, transform, None);
        }
    }
}

/// Fill a closed polygon through `points`
pub(crate) fn fill_polygon(target: &mut Pixmap, points: &[Pos2], color: Color32) {
    let mut builder = PathBuilder::new();
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    builder.move_to(first.x, first.y);
    for p in rest {
        builder.line_to(p.x, p.y);
    }
    builder.close();
    if let Some(path) = builder.finish() {
        let mut paint = Paint::default();
        paint.set_color(skia_color(color, 1.0));
        paint.anti_alias = true;
        target.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

fn to_skia_path(path: &SmoothPath) -> Option<Path> {
    if path.is_empty() {
        return None;
    }
    let mut builder = PathBuilder::new();
    builder.move_to(path.start.x, path.start.y);
    for segment in &path.segments {
        match *segment {
            PathSegment::Line { to } => builder.line_to(to.x, to.y),
            PathSegment::Quad { ctrl, to } => builder.quad_to(ctrl.x, ctrl.y, to.x, to.y),
        }
    }
    builder.finish()
}

/// `color` with its alpha scaled by `opacity`
pub(crate) fn skia_color(color: Color32, opacity: f32) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let mut color = tiny_skia::Color::from_rgba8(r, g, b, a);
    color.apply_opacity(opacity);
    color
}

fn blank_pixmap(width: u32, height: u32, background: tiny_skia::Color) -> Pixmap {
    let mut pixmap = match Pixmap::new(width.max(1), height.max(1)) {
        Some(pixmap) => pixmap,
        None => {
            warn!("Raster size {}x{} is not allocatable, using 1x1", width, height);
            Pixmap::new(1, 1).unwrap_or_else(|| unreachable!("1x1 pixmap is always valid"))
        }
    };
    pixmap.fill(background);
    pixmap
}

fn sanitize_dpr(dpr: f32) -> f32 {
    if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::WashiPattern;

    fn surface(w: u32, h: u32) -> RasterSurface {
        RasterSurface::new(w, h, 1.0, CanvasConfig::default())
    }

    fn close_to(actual: u8, expected: u8) -> bool {
        actual.abs_diff(expected) <= 1
    }

    #[test]
    fn test_resize_clears_to_background() {
        let mut raster = surface(10, 10);
        raster.commit_stroke(&[pos2(0.0, 5.0), pos2(10.0, 5.0)], Color32::RED, MarkerTip::Thin);
        raster.resize(20, 8);

        assert_eq!((raster.width(), raster.height()), (20, 8));
        assert!(raster.pixmap().pixels().iter().all(|p| p.red() == 0xFA && p.alpha() == 255));
    }

    #[test]
    fn test_single_point_draws_nothing() {
        let mut raster = surface(10, 10);
        let before = raster.snapshot();
        assert!(!raster.commit_stroke(&[pos2(5.0, 5.0)], Color32::RED, MarkerTip::Thin));
        assert_eq!(raster.snapshot(), before);
    }

    #[test]
    fn test_marker_is_translucent() {
        let mut raster = surface(40, 40);
        raster.commit_stroke(&[pos2(5.0, 20.0), pos2(35.0, 20.0)], Color32::BLACK, MarkerTip::Marker);
        let pixel = raster.pixel(20, 20).unwrap();
        // 30% black over #FAFAFA
        assert!(close_to(pixel.r(), 175), "{pixel:?}");
    }

    #[test]
    fn test_marker_has_butt_ends() {
        let mut raster = surface(60, 40);
        raster.commit_stroke(&[pos2(20.0, 20.0), pos2(40.0, 20.0)], Color32::BLACK, MarkerTip::Marker);
        assert_ne!(raster.pixel(21, 20), raster.pixel(18, 20));
        assert_eq!(raster.pixel(18, 20), Some(Color32::from_rgb(0xFA, 0xFA, 0xFA)));
    }

    #[test]
    fn test_thin_tip_has_round_ends() {
        let mut raster = surface(60, 40);
        raster.commit_stroke(&[pos2(20.0, 20.0), pos2(40.0, 20.0)], Color32::BLACK, MarkerTip::Thin);
        // The round cap reaches half the line width past the end point
        assert_ne!(raster.pixel(19, 20), Some(Color32::from_rgb(0xFA, 0xFA, 0xFA)));
        assert_eq!(raster.pixel(17, 20), Some(Color32::from_rgb(0xFA, 0xFA, 0xFA)));
    }

    #[test]
    fn test_restore_with_size_change_copies_overlap() {
        let mut raster = surface(10, 10);
        raster.commit_stroke(&[pos2(0.0, 1.0), pos2(10.0, 1.0)], Color32::RED, MarkerTip::Thin);
        let snapshot = raster.snapshot();
        let inked = raster.pixel(2, 1);

        raster.resize(5, 20);
        raster.restore(&snapshot);
        assert_eq!(raster.pixel(2, 1), inked);
        assert_eq!(raster.pixel(2, 15).map(|c| c.r()), Some(0xFA));
    }

    #[test]
    fn test_flat_tape_alpha() {
        let mut raster = surface(100, 60);
        raster.commit_tape(10.0, 30.0, 80.0, 0.0, TapeSelection::Color(Color32::from_rgb(0, 0, 0)));
        // 60% black over #FAFAFA
        let inside = raster.pixel(50, 30).unwrap();
        assert!(close_to(inside.r(), 100), "{inside:?}");
        assert_eq!(raster.pixel(50, 5).map(|c| c.r()), Some(0xFA));
    }

    #[test]
    fn test_rotated_tape_follows_angle() {
        let mut raster = surface(100, 100);
        raster.commit_tape(20.0, 20.0, 80.0, 45.0, TapeSelection::Color(Color32::BLACK));
        assert_ne!(raster.pixel(60, 60), Some(Color32::from_rgb(0xFA, 0xFA, 0xFA)));
        assert_eq!(raster.pixel(80, 20), Some(Color32::from_rgb(0xFA, 0xFA, 0xFA)));
    }

    #[test]
    fn test_pattern_tape_is_opaque_pattern() {
        let mut raster = surface(100, 60);
        raster.commit_tape(0.0, 30.0, 100.0, 0.0, TapeSelection::Pattern(WashiPattern::Dots));
        let [r, g, b, _] = WashiPattern::Dots.base_color().to_srgba_unmultiplied();
        assert_eq!(raster.pixel(50, 30), Some(Color32::from_rgb(r, g, b)));
    }
}
