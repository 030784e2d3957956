use thiserror::Error;

use crate::element::ElementRef;

/// Errors from applying a store command
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CanvasError {
    #[error("{} {} not found", .0.kind(), .0.id())]
    ElementNotFound(ElementRef),
    #[error("text must not be empty")]
    EmptyText,
}

/// Errors from the image upload pipeline
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("not an image: {mime}")]
    NotAnImage { mime: String },
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
    #[error("invalid data url")]
    InvalidDataUrl,
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
