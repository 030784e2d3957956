use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect};

/// Canvas input, with positions in canvas-local logical points
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed
    PointerDown { pos: Pos2 },
    /// Pointer moved, with or without the button held
    PointerMove { pos: Pos2 },
    /// Primary button released
    PointerUp { pos: Pos2 },
    /// Pointer left the canvas
    PointerLeave,
    /// Press and release without a drag
    Click { pos: Pos2 },
    DoubleClick { pos: Pos2 },
    /// Key was pressed. `in_text_input` is set while a text field has focus.
    KeyDown {
        key: Key,
        modifiers: Modifiers,
        in_text_input: bool,
    },
}

impl InputEvent {
    pub fn key(key: Key, modifiers: Modifiers) -> Self {
        Self::KeyDown {
            key,
            modifiers,
            in_text_input: false,
        }
    }

    pub fn position(&self) -> Option<Pos2> {
        match self {
            Self::PointerDown { pos }
            | Self::PointerMove { pos }
            | Self::PointerUp { pos }
            | Self::Click { pos }
            | Self::DoubleClick { pos } => Some(*pos),
            Self::PointerLeave | Self::KeyDown { .. } => None,
        }
    }
}

/// Translates raw egui input into canvas events
#[derive(Debug)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Rect,
    pressed_in_canvas: bool,
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            last_pointer_pos: None,
            canvas_rect,
            pressed_in_canvas: false,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    fn to_canvas(&self, pos: Pos2) -> Pos2 {
        (pos - self.canvas_rect.min).to_pos2()
    }

    /// Process raw egui input and generate canvas events.
    ///
    /// `pointer_blocked` is set when another layer (a window or the toolbar)
    /// covers the pointer; presses there never reach the canvas, but a drag
    /// that started on the canvas keeps receiving moves and its release.
    pub fn process_input(&mut self, ctx: &Context, pointer_blocked: bool) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let in_text_input = ctx.wants_keyboard_input();

        ctx.input(|input| {
            let hover = input.pointer.hover_pos();
            let inside = hover.is_some_and(|pos| self.canvas_rect.contains(pos)) && !pointer_blocked;

            if input.pointer.button_pressed(PointerButton::Primary) && inside {
                if let Some(pos) = hover {
                    self.pressed_in_canvas = true;
                    events.push(InputEvent::PointerDown { pos: self.to_canvas(pos) });
                }
            }

            match hover {
                Some(pos) if inside || self.pressed_in_canvas => {
                    if Some(pos) != self.last_pointer_pos {
                        events.push(InputEvent::PointerMove { pos: self.to_canvas(pos) });
                    }
                    self.last_pointer_pos = Some(pos);
                }
                _ => {
                    if self.last_pointer_pos.take().is_some() {
                        events.push(InputEvent::PointerLeave);
                        self.pressed_in_canvas = false;
                    }
                }
            }

            if input.pointer.button_released(PointerButton::Primary) && self.pressed_in_canvas {
                self.pressed_in_canvas = false;
                let pos = hover.or(self.last_pointer_pos).map(|p| self.to_canvas(p));
                if let Some(pos) = pos {
                    events.push(InputEvent::PointerUp { pos });
                    if input.pointer.button_clicked(PointerButton::Primary) {
                        events.push(InputEvent::Click { pos });
                    }
                }
            }

            if input.pointer.button_double_clicked(PointerButton::Primary) && inside {
                if let Some(pos) = hover {
                    events.push(InputEvent::DoubleClick { pos: self.to_canvas(pos) });
                }
            }

            for event in &input.raw.events {
                if let egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } = event
                {
                    events.push(InputEvent::KeyDown {
                        key: *key,
                        modifiers: *modifiers,
                        in_text_input,
                    });
                }
            }
        });

        events
    }
}
