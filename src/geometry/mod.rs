pub mod frame;
pub mod hit_testing;
pub mod smoothing;
pub mod tape;

pub use hit_testing::Handle;
pub use smoothing::{SmoothPath, smooth_path};
pub use tape::TapeGeometry;
