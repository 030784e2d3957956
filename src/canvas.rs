use egui::{Key, Modifiers, Pos2, Vec2};
use log::{debug, info, warn};

use crate::command::Command;
use crate::config::CanvasConfig;
use crate::element::{ElementId, ElementRef, ElementStore, Selection, TapeSelection, TextElement};
use crate::error::CanvasError;
use crate::geometry::hit_testing::{frame_handle_at, text_handle_at};
use crate::geometry::{Handle, TapeGeometry};
use crate::history::{CanvasSnapshot, History};
use crate::input::InputEvent;
use crate::raster::RasterSurface;
use crate::renderer::RepaintScheduler;
use crate::tools::{ActiveTool, SelectionState, SelectionTool, Tool, ToolAction, ToolContext, ToolOptions, ToolType};
use crate::upload::{UploadQueue, UploadSource, is_image_mime};
use crate::util::{Clock, SystemClock};

/// Notifications for the host UI
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOutput {
    /// The engine changed the selected tool on its own (frame placed, `t` key)
    ToolChanged(Option<ToolType>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModalMode {
    /// New label centered at `pos`
    Create { pos: Pos2 },
    Edit { id: ElementId },
}

/// Open text modal and its draft text
#[derive(Debug, Clone, PartialEq)]
pub struct TextModal {
    pub mode: ModalMode,
    pub text: String,
}

/// The canvas editor core: raster, element store, tools, history and uploads.
///
/// Everything is driven from the UI thread through [`CanvasEngine::handle_event`]
/// and [`CanvasEngine::tick`]. Positions are logical points relative to the
/// canvas origin; the raster works in device pixels.
pub struct CanvasEngine {
    config: CanvasConfig,
    raster: RasterSurface,
    store: ElementStore,
    tool: Option<ActiveTool>,
    selection_tool: SelectionTool,
    options: ToolOptions,
    history: History,
    modal: Option<TextModal>,
    repaint: RepaintScheduler,
    clock: Box<dyn Clock>,
    uploads: UploadQueue,
    outputs: Vec<CanvasOutput>,
    logical_size: Vec2,
    /// Set when the last pointer-down landed on empty canvas
    click_armed: bool,
    pointer_down: bool,
    last_pointer: Option<Pos2>,
}

impl CanvasEngine {
    pub fn new(logical_size: Vec2, dpr: f32, config: CanvasConfig) -> Self {
        Self::with_clock(logical_size, dpr, config, Box::new(SystemClock))
    }

    pub fn with_clock(logical_size: Vec2, dpr: f32, config: CanvasConfig, clock: Box<dyn Clock>) -> Self {
        let (width, height) = device_size(logical_size, dpr);
        let raster = RasterSurface::new(width, height, dpr, config.clone());
        let store = ElementStore::new();
        let history = History::new(
            CanvasSnapshot::capture(&store, Some(&raster)),
            config.history_depth,
            config.history_debounce_secs,
        );
        info!("Canvas created at {}x{} device px (dpr {})", width, height, dpr);

        Self {
            uploads: UploadQueue::new(config.upload_inline),
            config,
            raster,
            store,
            tool: None,
            selection_tool: SelectionTool::new(),
            options: ToolOptions::default(),
            history,
            modal: None,
            repaint: RepaintScheduler::new(),
            clock,
            outputs: Vec::new(),
            logical_size,
            click_armed: false,
            pointer_down: false,
            last_pointer: None,
        }
    }

    // Accessors

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn raster(&self) -> &RasterSurface {
        &self.raster
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn options(&self) -> &ToolOptions {
        &self.options
    }

    pub fn tool_type(&self) -> Option<ToolType> {
        self.tool.as_ref().map(ActiveTool::tool_type)
    }

    pub fn selection(&self) -> Selection {
        self.store.selection()
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection_tool.state()
    }

    pub fn modal(&self) -> Option<&TextModal> {
        self.modal.as_ref()
    }

    pub fn logical_size(&self) -> Vec2 {
        self.logical_size
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn uploads_in_flight(&self) -> usize {
        self.uploads.in_flight()
    }

    /// State of the active tool's machine, or of the selection machine while
    /// an element gesture runs
    pub fn current_state_name(&self) -> &'static str {
        if self.selection_tool.is_active_gesture() {
            return self.selection_tool.current_state_name();
        }
        self.tool.as_ref().map_or("Idle", |tool| tool.current_state_name())
    }

    /// State of the text interaction: modal, gesture, selection
    pub fn text_state_name(&self) -> &'static str {
        match (&self.modal, self.selection_tool.state()) {
            (Some(TextModal { mode: ModalMode::Create { .. }, .. }), _) => "Creating",
            (Some(TextModal { mode: ModalMode::Edit { .. }, .. }), _) => "Editing",
            (None, SelectionState::DraggingText { .. }) => "Dragging",
            (None, SelectionState::ResizingText { .. }) => "Resizing",
            (None, _) if self.store.selection().text.is_some() => "Selected",
            _ => "Idle",
        }
    }

    /// Geometry and selection of the tape being placed, for the preview pass
    pub fn tape_preview(&self) -> Option<(TapeGeometry, TapeSelection)> {
        let tape = self.tool.as_ref()?.as_washi_tape()?;
        tape.preview(&self.raster).map(|geometry| (geometry, self.options.washi_tape))
    }

    pub fn take_outputs(&mut self) -> Vec<CanvasOutput> {
        std::mem::take(&mut self.outputs)
    }

    /// True once per batch of changes that need a redraw
    pub fn take_repaint(&mut self) -> bool {
        self.repaint.take()
    }

    // Lifecycle

    /// Reallocate the raster for a new viewport. Committed pixels are dropped;
    /// elements are kept.
    pub fn resize(&mut self, logical_size: Vec2, dpr: f32) {
        let (width, height) = device_size(logical_size, dpr);
        if self.logical_size == logical_size && self.raster.dpr() == dpr {
            return;
        }
        debug!("Canvas resized to {}x{} device px (dpr {})", width, height, dpr);
        self.cancel_gestures();
        self.logical_size = logical_size;
        self.raster.set_dpr(dpr);
        self.raster.resize(width, height);
        self.repaint.request();
    }

    /// Fire a due history snapshot and apply finished uploads
    pub fn tick(&mut self) {
        let now = self.clock.now();
        if self.history.tick(now, &self.store, &self.raster) {
            debug!("Snapshot captured ({} undo entries)", self.history.undo_len());
        }
        self.poll_uploads();
    }

    /// Capture the current state outside of history
    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot::capture(&self.store, Some(&self.raster))
    }

    /// Replace the live state with `snapshot` without touching history
    pub fn restore_snapshot(&mut self, snapshot: &CanvasSnapshot) {
        self.cancel_gestures();
        snapshot.restore(&mut self.store, &mut self.raster);
        self.repaint.request();
    }

    // Tools

    /// Switch tools. Any gesture in flight is abandoned without committing.
    /// Picking a tool also closes the modal and clears the selection.
    pub fn select_tool(&mut self, tool_type: Option<ToolType>) {
        self.cancel_gestures();
        let now = self.clock.now();
        if let Some(mut old) = self.tool.take() {
            let mut ctx = ToolContext {
                raster: &mut self.raster,
                store: &self.store,
                options: &self.options,
                config: &self.config,
                now,
            };
            old.deactivate(&mut ctx);
        }

        self.tool = tool_type.map(|tool_type| {
            let mut tool = ActiveTool::new(tool_type);
            tool.activate();
            tool
        });
        if tool_type.is_some() {
            self.modal = None;
            self.store.clear_selection();
        }
        debug!("Tool selected: {}", tool_type.map_or("none", |t| t.name()));
        self.repaint.request();
    }

    /// Replace the toolbar values. A changed frame color recolors the
    /// selected frame.
    pub fn set_tool_options(&mut self, options: ToolOptions) {
        let recolor = (options.frame_color != self.options.frame_color)
            .then_some(self.store.selection().frame)
            .flatten();
        self.options = options;
        if let Some(id) = recolor {
            self.execute(Command::SetFrameColor {
                id,
                color: self.options.frame_color,
            });
        }
        self.repaint.request();
    }

    /// Abandon every in-flight gesture, restoring the state it started from
    pub fn cancel_gestures(&mut self) {
        self.click_armed = false;
        if self.selection_tool.cancel(&mut self.store) {
            self.repaint.request();
        }
        if self.with_tool(|tool, ctx| tool.cancel(ctx)) == Some(true) {
            self.repaint.request();
        }
    }

    fn with_tool<R>(&mut self, f: impl FnOnce(&mut ActiveTool, &mut ToolContext<'_>) -> R) -> Option<R> {
        let now = self.clock.now();
        let tool = self.tool.as_mut()?;
        let mut ctx = ToolContext {
            raster: &mut self.raster,
            store: &self.store,
            options: &self.options,
            config: &self.config,
            now,
        };
        Some(f(tool, &mut ctx))
    }

    fn apply(&mut self, action: ToolAction) {
        match action {
            ToolAction::Repaint => self.repaint.request(),
            ToolAction::CommitRaster => {
                self.history.request_snapshot(self.clock.now(), false);
                self.repaint.request();
            }
            ToolAction::Execute(command) => {
                self.execute(command);
            }
            ToolAction::PlaceFrame(frame) => {
                let id = frame.id;
                if self.execute(Command::AddFrame(frame)) {
                    self.store.select_frame(Some(id));
                    self.select_tool(None);
                    self.outputs.push(CanvasOutput::ToolChanged(None));
                }
            }
            ToolAction::OpenTextModal(pos) => {
                self.modal = Some(TextModal {
                    mode: ModalMode::Create { pos },
                    text: String::new(),
                });
                self.repaint.request();
            }
        }
    }

    /// Apply a command to the store and schedule a snapshot if it records
    /// history. Stale targets are skipped.
    pub fn execute(&mut self, command: Command) -> bool {
        match command.execute(&mut self.store) {
            Ok(()) => {
                if command.records_history() {
                    self.history.request_snapshot(self.clock.now(), command.skips_raster());
                }
                self.repaint.request();
                true
            }
            Err(err) => {
                debug!("Skipping {}: {}", command.name(), err);
                false
            }
        }
    }

    // Events

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { pos } => self.pointer_down(pos),
            InputEvent::PointerMove { pos } => self.pointer_move(pos),
            InputEvent::PointerUp { pos } => self.pointer_up(pos),
            InputEvent::PointerLeave => {
                if let (true, Some(pos)) = (self.pointer_down, self.last_pointer) {
                    self.pointer_up(pos);
                }
                self.click_armed = false;
            }
            InputEvent::Click { pos } => self.click(pos),
            InputEvent::DoubleClick { pos } => self.double_click(pos),
            InputEvent::KeyDown {
                key,
                modifiers,
                in_text_input,
            } => self.key_down(key, modifiers, in_text_input),
        }
    }

    /// Text is hit-testable under the text tool, with no tool, or while a
    /// text element is selected
    fn text_hits_enabled(&self) -> bool {
        matches!(self.tool_type(), None | Some(ToolType::Text)) || self.store.selection().text.is_some()
    }

    fn pointer_down(&mut self, pos: Pos2) {
        if self.modal.is_some() {
            return;
        }
        self.pointer_down = true;
        self.last_pointer = Some(pos);
        self.click_armed = false;

        if let Some(text) = self.store.selected_text() {
            match text_handle_at(text, pos) {
                Some(Handle::Delete) => {
                    let id = text.id;
                    self.execute(Command::DeleteElement(ElementRef::Text(id)));
                    return;
                }
                Some(Handle::Resize(_)) => {
                    self.selection_tool.begin_text_resize(text, pos);
                    return;
                }
                None => {}
            }
        }

        if let Some(frame) = self.store.selected_frame() {
            match frame_handle_at(frame, pos) {
                Some(Handle::Delete) => {
                    let id = frame.id;
                    self.execute(Command::DeleteElement(ElementRef::Frame(id)));
                    return;
                }
                Some(Handle::Resize(corner)) => {
                    self.selection_tool.begin_frame_resize(frame, corner, pos);
                    return;
                }
                None => {}
            }
        }

        if self.text_hits_enabled() {
            if let Some(id) = self.store.text_at(pos) {
                self.store.select_text(Some(id));
                if let Some(text) = self.store.text(id) {
                    self.selection_tool.begin_text_drag(text, pos);
                }
                self.repaint.request();
                return;
            }
        }

        if let Some(id) = self.store.frame_at(pos) {
            self.store.select_frame(Some(id));
            let drawing_tool = matches!(self.tool_type(), Some(ToolType::Marker | ToolType::WashiTape));
            if !drawing_tool {
                if let Some(frame) = self.store.frame(id) {
                    self.selection_tool.begin_frame_drag(frame, pos);
                }
            }
            self.repaint.request();
            return;
        }

        if !self.store.selection().is_empty() {
            self.store.clear_selection();
            self.repaint.request();
        }
        self.click_armed = true;
        if let Some(action) = self.with_tool(|tool, ctx| tool.on_pointer_down(pos, ctx)).flatten() {
            self.apply(action);
        }
    }

    fn pointer_move(&mut self, pos: Pos2) {
        self.last_pointer = Some(pos);
        if self.selection_tool.is_active_gesture() {
            if self.selection_tool.on_pointer_move(pos, &mut self.store, &self.config) {
                self.repaint.request();
            }
            return;
        }
        if let Some(action) = self.with_tool(|tool, ctx| tool.on_pointer_move(pos, ctx)).flatten() {
            self.apply(action);
        }
    }

    fn pointer_up(&mut self, pos: Pos2) {
        self.pointer_down = false;
        self.last_pointer = Some(pos);
        if self.selection_tool.is_active_gesture() {
            if let Some(command) = self.selection_tool.on_pointer_up(&self.store) {
                if command.records_history() {
                    self.execute(command);
                }
            }
            self.repaint.request();
            return;
        }
        if let Some(action) = self.with_tool(|tool, ctx| tool.on_pointer_up(pos, ctx)).flatten() {
            self.apply(action);
        }
    }

    fn click(&mut self, pos: Pos2) {
        if self.modal.is_some() || !std::mem::take(&mut self.click_armed) {
            return;
        }
        if let Some(action) = self.with_tool(|tool, ctx| tool.on_click(pos, ctx)).flatten() {
            self.apply(action);
        }
    }

    fn double_click(&mut self, pos: Pos2) {
        if self.modal.is_some() || !self.text_hits_enabled() {
            return;
        }
        let Some(id) = self.store.text_at(pos) else {
            return;
        };
        self.selection_tool.cancel(&mut self.store);
        self.open_text_editor(id);
    }

    /// Open the modal in edit mode for an existing label
    pub fn open_text_editor(&mut self, id: ElementId) -> bool {
        let Some(text) = self.store.text(id) else {
            return false;
        };
        self.modal = Some(TextModal {
            mode: ModalMode::Edit { id },
            text: text.text.clone(),
        });
        self.store.select_text(Some(id));
        self.repaint.request();
        true
    }

    fn key_down(&mut self, key: Key, modifiers: Modifiers, in_text_input: bool) {
        if self.modal.is_some() {
            match key {
                Key::Escape => self.close_modal(),
                Key::Enter if modifiers.command => {
                    if let Err(err) = self.save_modal() {
                        debug!("Modal not saved: {}", err);
                    }
                }
                _ => {}
            }
            return;
        }
        if in_text_input {
            return;
        }

        if modifiers.command && key == Key::Z {
            if modifiers.shift {
                self.redo();
            } else {
                self.undo();
            }
            return;
        }

        match key {
            Key::T if !modifiers.command && !modifiers.alt => {
                let next = match self.tool_type() {
                    Some(ToolType::Text) => None,
                    _ => Some(ToolType::Text),
                };
                self.select_tool(next);
                self.outputs.push(CanvasOutput::ToolChanged(next));
            }
            Key::Delete | Key::Backspace => {
                self.delete_selected();
            }
            Key::Escape => {
                self.cancel_gestures();
                self.store.clear_selection();
                self.repaint.request();
            }
            _ => {}
        }
    }

    /// Delete the selected frame, or the selected text if no frame is selected
    pub fn delete_selected(&mut self) -> bool {
        let selection = self.store.selection();
        let target = match (selection.frame, selection.text) {
            (Some(id), _) => ElementRef::Frame(id),
            (None, Some(id)) => ElementRef::Text(id),
            (None, None) => return false,
        };
        self.selection_tool.cancel(&mut self.store);
        self.execute(Command::DeleteElement(target))
    }

    // History

    pub fn undo(&mut self) -> bool {
        self.cancel_gestures();
        let undone = self.history.undo(&mut self.store, &mut self.raster);
        self.after_history_step();
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gestures();
        let redone = self.history.redo(&mut self.store, &mut self.raster);
        self.after_history_step();
        redone
    }

    fn after_history_step(&mut self) {
        self.modal = None;
        self.store.clear_selection();
        self.repaint.request();
    }

    // Text modal

    pub fn modal_text_mut(&mut self) -> Option<&mut String> {
        self.modal.as_mut().map(|modal| &mut modal.text)
    }

    /// Commit the modal. Blank text keeps the modal open and returns the
    /// error; an unchanged edit closes it without recording history.
    pub fn save_modal(&mut self) -> Result<(), CanvasError> {
        let Some(modal) = &self.modal else {
            return Ok(());
        };
        if modal.text.trim().is_empty() {
            return Err(CanvasError::EmptyText);
        }
        let (mode, text) = (modal.mode, modal.text.clone());

        match mode {
            ModalMode::Create { pos } => {
                let element = TextElement::new(pos, text, &self.config);
                let id = element.id;
                if self.execute(Command::AddText(element)) {
                    self.store.select_text(Some(id));
                }
            }
            ModalMode::Edit { id } => {
                let changed = self.store.text(id).map(|t| t.text != text);
                match changed {
                    Some(true) => {
                        self.execute(Command::EditText { id, text });
                    }
                    Some(false) => {}
                    None => {
                        self.modal = None;
                        return Err(CanvasError::ElementNotFound(ElementRef::Text(id)));
                    }
                }
            }
        }
        self.modal = None;
        self.repaint.request();
        Ok(())
    }

    pub fn close_modal(&mut self) {
        if self.modal.take().is_some() {
            self.repaint.request();
        }
    }

    /// Delete the label being edited. No-op in create mode.
    pub fn delete_from_modal(&mut self) -> bool {
        let Some(TextModal {
            mode: ModalMode::Edit { id },
            ..
        }) = self.modal
        else {
            return false;
        };
        self.modal = None;
        self.execute(Command::DeleteElement(ElementRef::Text(id)))
    }

    // Uploads

    /// Start processing an image for `frame_id`. Non-image files and unknown
    /// frames are ignored.
    pub fn begin_upload(&mut self, frame_id: ElementId, source: UploadSource) -> bool {
        if !is_image_mime(&source.mime) {
            debug!("Ignoring {} ({}): not an image", source.name, source.mime);
            return false;
        }
        if self.store.frame(frame_id).is_none() {
            warn!("Upload target frame {} does not exist", frame_id);
            return false;
        }
        info!("Uploading {} into frame {}", source.name, frame_id);
        self.uploads.submit(frame_id, source, &self.config);
        true
    }

    /// Upload a dropped file into the frame under `pos`, else into the
    /// selected frame
    pub fn drop_file(&mut self, pos: Option<Pos2>, source: UploadSource) -> bool {
        let target = pos
            .and_then(|pos| self.store.frame_at(pos))
            .or(self.store.selection().frame);
        match target {
            Some(frame_id) => self.begin_upload(frame_id, source),
            None => {
                debug!("Dropped {} outside of any frame", source.name);
                false
            }
        }
    }

    /// Apply finished uploads. Returns the number of frames that got an image.
    pub fn poll_uploads(&mut self) -> usize {
        let mut applied = 0;
        for finished in self.uploads.poll() {
            match finished.result {
                Ok(image) => {
                    let command = Command::SetFrameImage {
                        id: finished.frame_id,
                        image,
                        created_at: self.clock.now(),
                    };
                    if self.execute(command) {
                        self.store.select_frame(Some(finished.frame_id));
                        applied += 1;
                    }
                }
                Err(err) => warn!("Upload into frame {} failed: {}", finished.frame_id, err),
            }
        }
        applied
    }
}

impl std::fmt::Debug for CanvasEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasEngine")
            .field("size", &(self.raster.width(), self.raster.height()))
            .field("tool", &self.tool_type())
            .field("state", &self.current_state_name())
            .field("selection", &self.store.selection())
            .field("undo_len", &self.history.undo_len())
            .finish()
    }
}

fn device_size(logical_size: Vec2, dpr: f32) -> (u32, u32) {
    let width = (logical_size.x * dpr).round().max(1.0) as u32;
    let height = (logical_size.y * dpr).round().max(1.0) as u32;
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ManualClock;
    use egui::{pos2, vec2};

    fn engine() -> (CanvasEngine, ManualClock) {
        let clock = ManualClock::new(0.0);
        let engine = CanvasEngine::with_clock(
            vec2(400.0, 300.0),
            1.0,
            CanvasConfig::default(),
            Box::new(clock.clone()),
        );
        (engine, clock)
    }

    fn click(engine: &mut CanvasEngine, pos: Pos2) {
        engine.handle_event(InputEvent::PointerDown { pos });
        engine.handle_event(InputEvent::PointerUp { pos });
        engine.handle_event(InputEvent::Click { pos });
    }

    #[test]
    fn test_device_size() {
        assert_eq!(device_size(vec2(100.0, 50.0), 2.0), (200, 100));
        assert_eq!(device_size(vec2(0.0, 0.0), 1.0), (1, 1));
    }

    #[test]
    fn test_frame_tool_places_selects_and_releases() {
        let (mut engine, _clock) = engine();
        engine.select_tool(Some(ToolType::ImageFrame));
        click(&mut engine, pos2(200.0, 150.0));

        assert_eq!(engine.store().frames.len(), 1);
        assert_eq!(engine.selection().frame, Some(engine.store().frames[0].id));
        assert_eq!(engine.tool_type(), None);
        assert_eq!(engine.take_outputs(), vec![CanvasOutput::ToolChanged(None)]);
    }

    #[test]
    fn test_click_on_element_does_not_reach_tool() {
        let (mut engine, _clock) = engine();
        engine.select_tool(Some(ToolType::ImageFrame));
        click(&mut engine, pos2(200.0, 150.0));
        engine.select_tool(Some(ToolType::ImageFrame));
        click(&mut engine, pos2(210.0, 160.0));

        assert_eq!(engine.store().frames.len(), 1);
        assert_eq!(engine.tool_type(), Some(ToolType::ImageFrame));
    }

    #[test]
    fn test_text_modal_lifecycle() {
        let (mut engine, _clock) = engine();
        engine.select_tool(Some(ToolType::Text));
        click(&mut engine, pos2(100.0, 100.0));
        assert_eq!(engine.text_state_name(), "Creating");

        assert_eq!(engine.save_modal(), Err(CanvasError::EmptyText));
        assert!(engine.modal().is_some());

        if let Some(text) = engine.modal_text_mut() {
            text.push_str("hello");
        }
        assert_eq!(engine.save_modal(), Ok(()));
        assert_eq!(engine.store().text_elements.len(), 1);
        assert_eq!(engine.text_state_name(), "Selected");

        engine.handle_event(InputEvent::DoubleClick { pos: pos2(100.0, 100.0) });
        assert_eq!(engine.text_state_name(), "Editing");
        assert!(engine.delete_from_modal());
        assert!(engine.store().text_elements.is_empty());
    }

    #[test]
    fn test_t_key_toggles_text_tool() {
        let (mut engine, _clock) = engine();
        engine.handle_event(InputEvent::key(Key::T, Modifiers::NONE));
        assert_eq!(engine.tool_type(), Some(ToolType::Text));
        engine.handle_event(InputEvent::key(Key::T, Modifiers::NONE));
        assert_eq!(engine.tool_type(), None);
        assert_eq!(
            engine.take_outputs(),
            vec![
                CanvasOutput::ToolChanged(Some(ToolType::Text)),
                CanvasOutput::ToolChanged(None)
            ]
        );
    }

    #[test]
    fn test_shortcuts_ignored_in_text_input() {
        let (mut engine, _clock) = engine();
        engine.handle_event(InputEvent::KeyDown {
            key: Key::T,
            modifiers: Modifiers::NONE,
            in_text_input: true,
        });
        assert_eq!(engine.tool_type(), None);
    }

    #[test]
    fn test_frame_color_follows_options() {
        let (mut engine, clock) = engine();
        engine.select_tool(Some(ToolType::ImageFrame));
        click(&mut engine, pos2(200.0, 150.0));
        clock.advance(1.0);
        engine.tick();

        let mut options = engine.options().clone();
        options.frame_color = egui::Color32::from_rgb(0x11, 0x22, 0x33);
        engine.set_tool_options(options);

        assert_eq!(engine.store().frames[0].color, egui::Color32::from_rgb(0x11, 0x22, 0x33));
        assert!(engine.history().is_pending());
    }

    #[test]
    fn test_escape_clears_selection() {
        let (mut engine, _clock) = engine();
        engine.select_tool(Some(ToolType::ImageFrame));
        click(&mut engine, pos2(200.0, 150.0));
        assert!(engine.selection().frame.is_some());

        engine.handle_event(InputEvent::key(Key::Escape, Modifiers::NONE));
        assert!(engine.selection().is_empty());
    }
}
