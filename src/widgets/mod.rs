mod resize_handle;

pub use resize_handle::{Corner, draw_delete_button, draw_resize_handle};
