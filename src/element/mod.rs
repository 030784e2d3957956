use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod frame;
pub mod store;
pub mod tape;
pub mod text;

pub use frame::{FrameImage, ImageFrame};
pub use store::{ElementStore, Selection};
pub use tape::{TapeSelection, WashiPattern, WashiTapeElement};
pub use text::TextElement;

/// Stable identifier of a canvas element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Reference to an element in the store, tagged with its kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementRef {
    Frame(ElementId),
    Text(ElementId),
}

impl ElementRef {
    pub fn id(&self) -> ElementId {
        match self {
            Self::Frame(id) | Self::Text(id) => *id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Frame(_) => "frame",
            Self::Text(_) => "text",
        }
    }
}

/// Vector path entry of a snapshot. Strokes are baked into the raster, so the
/// store never holds any.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawnPath {
    pub points: Vec<Pos2>,
    #[serde(with = "crate::util::color::hex")]
    pub color: egui::Color32,
    pub tip: crate::raster::MarkerTip,
}

/// Common behavior of the overlay elements
pub trait Element {
    fn id(&self) -> ElementId;

    /// Bounds in logical points
    fn rect(&self) -> Rect;

    fn hit_test(&self, pos: Pos2) -> bool {
        self.rect().contains(pos)
    }

    fn translate(&mut self, delta: Vec2);
}

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

/// Monotonic counter used to version decoded images for texture caching
pub fn generate_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::SeqCst)
}
