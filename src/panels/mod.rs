mod canvas_panel;
mod debug_window;
mod text_modal;
mod toolbar;

pub use canvas_panel::canvas_panel;
pub use debug_window::debug_window;
pub use text_modal::text_modal;
pub use toolbar::{FRAME_COLORS, MARKER_COLORS, WASHI_TAPE_COLORS, toolbar_panel};
