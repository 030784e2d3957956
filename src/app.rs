use std::time::Duration;

use egui::{Color32, Pos2, Rect};
use log::{debug, info, warn};

use crate::canvas::{CanvasEngine, CanvasOutput};
use crate::config::CanvasConfig;
use crate::input::InputHandler;
use crate::overlay;
use crate::panels::{canvas_panel, debug_window, text_modal, toolbar_panel};
use crate::renderer::{self, Renderer};
use crate::texture_manager::TextureManager;
use crate::tools::{ToolOptions, ToolType};
use crate::upload::UploadSource;

/// We derive Deserialize/Serialize so we can persist the toolbar and canvas
/// settings on shutdown. The canvas content itself is not persisted.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct JournalApp {
    tool_options: ToolOptions,
    config: CanvasConfig,

    // Created on the first frame, once the canvas size is known
    #[serde(skip)]
    engine: Option<CanvasEngine>,
    #[serde(skip)]
    renderer: Renderer,
    #[serde(skip)]
    textures: TextureManager,
    #[serde(skip)]
    input: InputHandler,
    #[serde(skip)]
    pub(crate) show_debug: bool,
}

impl Default for JournalApp {
    fn default() -> Self {
        Self {
            tool_options: ToolOptions::default(),
            config: CanvasConfig::default(),
            engine: None,
            renderer: Renderer::new(),
            textures: TextureManager::default(),
            input: InputHandler::new(Rect::NOTHING),
            show_debug: false,
        }
    }
}

impl JournalApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        if let Some(storage) = cc.storage {
            return eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default();
        }
        Default::default()
    }

    pub fn engine(&self) -> Option<&CanvasEngine> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut CanvasEngine> {
        self.engine.as_mut()
    }

    pub fn tool_type(&self) -> Option<ToolType> {
        self.engine.as_ref().and_then(CanvasEngine::tool_type)
    }

    pub fn tool_options(&self) -> &ToolOptions {
        &self.tool_options
    }

    pub fn set_tool_options(&mut self, options: ToolOptions) {
        self.tool_options = options.clone();
        if let Some(engine) = &mut self.engine {
            engine.set_tool_options(options);
        }
    }

    pub fn select_tool(&mut self, tool: Option<ToolType>) {
        if let Some(engine) = &mut self.engine {
            engine.select_tool(tool);
        }
    }

    pub fn can_undo(&self) -> bool {
        self.engine.as_ref().is_some_and(CanvasEngine::can_undo)
    }

    pub fn can_redo(&self) -> bool {
        self.engine.as_ref().is_some_and(CanvasEngine::can_redo)
    }

    pub fn undo(&mut self) {
        if let Some(engine) = &mut self.engine {
            engine.undo();
        }
    }

    pub fn redo(&mut self) {
        if let Some(engine) = &mut self.engine {
            engine.redo();
        }
    }

    /// Create the engine on first use and keep it sized to the canvas rect
    pub(crate) fn prepare_canvas(&mut self, rect: Rect, pixels_per_point: f32) -> &mut CanvasEngine {
        self.input.set_canvas_rect(rect);
        let engine = self.engine.get_or_insert_with(|| {
            info!("Creating canvas engine for {:?}", rect.size());
            let mut engine = CanvasEngine::new(rect.size(), pixels_per_point, self.config.clone());
            engine.set_tool_options(self.tool_options.clone());
            engine
        });
        engine.resize(rect.size(), pixels_per_point);
        engine
    }

    /// Feed this frame's input to the engine. `pointer_blocked` is set when a
    /// window covers the canvas under the pointer.
    pub(crate) fn handle_canvas_input(&mut self, ctx: &egui::Context, pointer_blocked: bool) {
        let events = self.input.process_input(ctx, pointer_blocked);
        let Some(engine) = &mut self.engine else {
            return;
        };
        for event in events {
            engine.handle_event(event);
        }
        for output in engine.take_outputs() {
            match output {
                CanvasOutput::ToolChanged(tool) => {
                    debug!("Canvas switched tool to {}", tool.map_or("none", |t| t.name()));
                }
            }
        }
    }

    /// Route files dropped onto the window into frames
    pub(crate) fn handle_dropped_files(&mut self, ctx: &egui::Context, canvas_rect: Rect) {
        let (dropped, hover) = ctx.input(|i| (i.raw.dropped_files.clone(), i.pointer.hover_pos()));
        if dropped.is_empty() {
            return;
        }
        let Some(engine) = &mut self.engine else {
            return;
        };
        let pos = hover
            .filter(|pos| canvas_rect.contains(*pos))
            .map(|pos| Pos2::ZERO + (pos - canvas_rect.min));

        for file in &dropped {
            match UploadSource::from_dropped_file(file) {
                Ok(source) => {
                    engine.drop_file(pos, source);
                }
                Err(err) => warn!("Ignoring dropped file: {}", err),
            }
        }
    }

    /// Advance timers and paint the raster with the element overlay on top
    pub(crate) fn paint_canvas(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: Rect) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        engine.tick();
        if engine.history().is_pending() || engine.uploads_in_flight() > 0 {
            // Keep frames coming until the debounce and uploads settle
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        let dirty = engine.take_repaint();
        if let Some(texture) = self.renderer.texture(ctx, engine, dirty) {
            let uv = Rect::from_min_max(Pos2::ZERO, egui::pos2(1.0, 1.0));
            painter.image(texture.id(), rect, uv, Color32::WHITE);
        }
        renderer::paint_grid(painter, rect, engine.config());

        if dirty {
            let store = engine.store();
            self.textures.retain_frames(|id| store.frame(id).is_some());
        }
        self.textures.begin_frame();
        overlay::paint_elements(painter, rect.min, engine, &mut self.textures);

        if let Some(hover) = ctx.pointer_hover_pos().filter(|pos| rect.contains(*pos)) {
            if let Some(icon) = overlay::hover_cursor(engine, Pos2::ZERO + (hover - rect.min)) {
                ctx.set_cursor_icon(icon);
            }
        }
    }
}

impl eframe::App for JournalApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Some(engine) = &self.engine {
            self.tool_options = engine.options().clone();
        }
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        toolbar_panel(self, ctx);
        canvas_panel(self, ctx);
        text_modal(self, ctx);
        if self.show_debug {
            debug_window(self, ctx);
        }
    }
}
