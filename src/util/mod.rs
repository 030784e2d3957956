pub mod color;
pub mod debounce;
pub mod time;

pub use color::{parse_hex_color, to_hex_color};
pub use debounce::Debouncer;
pub use time::{Clock, ManualClock, SystemClock, current_time_secs};
