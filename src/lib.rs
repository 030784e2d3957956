#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod command;
pub mod components;
pub mod config;
pub mod element;
pub mod error;
pub mod geometry;
pub mod history;
pub mod input;
pub mod overlay;
pub mod panels;
pub mod raster;
pub mod renderer;
pub mod texture_manager;
pub mod tools;
pub mod upload;
pub mod util;
pub mod widgets;

pub use app::JournalApp;
pub use canvas::{CanvasEngine, CanvasOutput, ModalMode, TextModal};
pub use command::Command;
pub use config::CanvasConfig;
pub use element::{ElementId, ElementRef, ElementStore, ImageFrame, TextElement, WashiTapeElement};
pub use error::{CanvasError, UploadError};
pub use history::{CanvasSnapshot, History};
pub use input::InputEvent;
pub use raster::{MarkerTip, RasterSurface};
pub use renderer::Renderer;
pub use tools::{Tool, ToolOptions, ToolType};
pub use upload::UploadSource;
