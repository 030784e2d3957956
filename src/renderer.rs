use std::borrow::Cow;

use eframe::egui::{self, ColorImage, Painter, Rect, Stroke, TextureHandle, TextureOptions, pos2};
use tiny_skia::Pixmap;

use crate::canvas::CanvasEngine;
use crate::config::CanvasConfig;
use crate::element::TapeSelection;
use crate::geometry::TapeGeometry;
use crate::raster::{self, RasterSurface};

/// Single coalescing repaint flag. Any number of requests between two frames
/// produce one redraw.
#[derive(Debug, Default)]
pub struct RepaintScheduler {
    requested: bool,
}

impl RepaintScheduler {
    pub fn new() -> Self {
        Self { requested: true }
    }

    pub fn request(&mut self) {
        self.requested = true;
    }

    /// Consume the pending request
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.requested)
    }
}

/// Owns the GPU texture showing the composed raster
#[derive(Default)]
pub struct Renderer {
    texture: Option<TextureHandle>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the canvas texture, re-uploading it first when `dirty` is set
    ///
    /// Args:
    ///     ctx (Context): egui context used to allocate the texture
    ///     engine (CanvasEngine): Source of the raster and tape preview
    ///     dirty (bool): True if a repaint was requested since the last frame
    ///
    /// Returns:
    ///     Option<&TextureHandle>: The texture, once it has been created
    pub fn texture(&mut self, ctx: &egui::Context, engine: &CanvasEngine, dirty: bool) -> Option<&TextureHandle> {
        if dirty || self.texture.is_none() {
            let image = Self::compose(engine);
            match &mut self.texture {
                Some(texture) => texture.set(image, TextureOptions::LINEAR),
                None => self.texture = Some(ctx.load_texture("journal_canvas", image, TextureOptions::LINEAR)),
            }
        }
        self.texture.as_ref()
    }

    /// Committed raster with the live tape preview on top
    pub fn compose(engine: &CanvasEngine) -> ColorImage {
        let pixmap = compose_raster(engine.raster(), engine.config(), engine.tape_preview());
        raster::pixmap_to_color_image(&pixmap)
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("has_texture", &self.texture.is_some())
            .finish()
    }
}

/// The raster itself, or a copy with the tape preview drawn in while a strip
/// is being placed.
pub fn compose_raster<'a>(
    raster: &'a RasterSurface,
    config: &CanvasConfig,
    tape_preview: Option<(TapeGeometry, TapeSelection)>,
) -> Cow<'a, Pixmap> {
    match tape_preview {
        None => Cow::Borrowed(raster.pixmap()),
        Some((geometry, selection)) => {
            let mut pixmap = raster.pixmap().clone();
            raster::draw_tape(&mut pixmap, &geometry, selection, raster.dpr(), config.tape_color_alpha);
            Cow::Owned(pixmap)
        }
    }
}

/// Hairline reference grid every `grid_spacing` points over `rect`
pub fn paint_grid(painter: &Painter, rect: Rect, config: &CanvasConfig) {
    if !config.show_grid {
        return;
    }
    let stroke = Stroke::new(config.grid_line_width, config.grid_color);
    for x in grid_offsets(rect.width(), config.grid_spacing) {
        let x = rect.min.x + x;
        painter.line_segment([pos2(x, rect.min.y), pos2(x, rect.max.y)], stroke);
    }
    for y in grid_offsets(rect.height(), config.grid_spacing) {
        let y = rect.min.y + y;
        painter.line_segment([pos2(rect.min.x, y), pos2(rect.max.x, y)], stroke);
    }
}

/// Line positions `0, spacing, 2 * spacing, ...` below `extent`
fn grid_offsets(extent: f32, spacing: f32) -> Vec<f32> {
    if !spacing.is_finite() || spacing < 1.0 || !extent.is_finite() {
        return Vec::new();
    }
    (0..)
        .map(|i| i as f32 * spacing)
        .take_while(|offset| *offset < extent)
        .collect()
}
