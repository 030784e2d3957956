use std::io::Cursor;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};
use egui::ColorImage;
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use log::{debug, info, warn};

use crate::config::CanvasConfig;
use crate::element::{ElementId, FrameImage};
use crate::error::UploadError;

/// Raw file handed to the upload pipeline
#[derive(Clone, Debug)]
pub struct UploadSource {
    pub name: String,
    pub mime: String,
    pub bytes: Arc<[u8]>,
}

impl UploadSource {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Build a source from a file dropped onto the window. The MIME type
    /// falls back to the file extension when the platform does not report one.
    pub fn from_dropped_file(file: &egui::DroppedFile) -> Result<Self, UploadError> {
        let name = if let Some(path) = &file.path {
            path.display().to_string()
        } else if !file.name.is_empty() {
            file.name.clone()
        } else {
            "unknown".to_owned()
        };

        let mime = if !file.mime.is_empty() {
            file.mime.clone()
        } else {
            mime_from_extension(&name).unwrap_or_default().to_owned()
        };
        if !is_image_mime(&mime) {
            return Err(UploadError::NotAnImage { mime });
        }

        if let Some(bytes) = &file.bytes {
            return Ok(Self::new(name, mime, bytes.clone()));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(path) = &file.path {
            let bytes = std::fs::read(path).map_err(|source| UploadError::Read {
                path: name.clone(),
                source,
            })?;
            return Ok(Self::new(name, mime, bytes));
        }

        Err(UploadError::Read {
            path: name,
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "dropped file has no accessible data"),
        })
    }
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

fn mime_from_extension(name: &str) -> Option<&'static str> {
    ImageFormat::from_path(name).ok().map(|format| format.to_mime_type())
}

/// Target size that fits within `max_width` x `max_height`, shrinking the
/// width first and then the height, both preserving the aspect ratio.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let (mut w, mut h) = (width as f64, height as f64);
    if w > max_width as f64 {
        h = h * max_width as f64 / w;
        w = max_width as f64;
    }
    if h > max_height as f64 {
        w = w * max_height as f64 / h;
        h = max_height as f64;
    }
    ((w.round() as u32).max(1), (h.round() as u32).max(1))
}

pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes))
}

/// Split a base64 `data:` URL into its MIME type and payload
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>), UploadError> {
    let rest = url.strip_prefix("data:").ok_or(UploadError::InvalidDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(UploadError::InvalidDataUrl)?;
    let mime = header.strip_suffix(";base64").ok_or(UploadError::InvalidDataUrl)?;
    let bytes = general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| UploadError::InvalidDataUrl)?;
    Ok((mime.to_owned(), bytes))
}

fn to_color_image(image: &DynamicImage) -> ColorImage {
    let rgba = image.to_rgba8();
    ColorImage::from_rgba_unmultiplied([rgba.width() as usize, rgba.height() as usize], rgba.as_raw())
}

/// Decode an upload, downscale it if it exceeds the configured limits and
/// produce the frame image. Oversized images are re-encoded as JPEG; others
/// keep their original bytes.
pub fn process_image(source: &UploadSource, config: &CanvasConfig) -> Result<FrameImage, UploadError> {
    if !is_image_mime(&source.mime) {
        return Err(UploadError::NotAnImage {
            mime: source.mime.clone(),
        });
    }

    let decoded = image::load_from_memory(&source.bytes).map_err(UploadError::Decode)?;
    let (width, height) = decoded.dimensions();
    debug!("Decoded {}: {}x{}", source.name, width, height);

    if width <= config.upload_max_width && height <= config.upload_max_height {
        let pixels = to_color_image(&decoded);
        return Ok(FrameImage::new(to_data_url(&source.mime, &source.bytes), pixels));
    }

    let (target_w, target_h) = fit_within(width, height, config.upload_max_width, config.upload_max_height);
    info!(
        "Downscaling {} from {}x{} to {}x{}",
        source.name, width, height, target_w, target_h
    );
    let resized = decoded.resize_exact(target_w, target_h, FilterType::Triangle);

    let mut jpeg = Vec::new();
    let quality = config.upload_jpeg_quality.clamp(1, 100);
    resized
        .to_rgb8()
        .write_with_encoder(JpegEncoder::new_with_quality(&mut Cursor::new(&mut jpeg), quality))
        .map_err(UploadError::Encode)?;

    Ok(FrameImage::new(to_data_url("image/jpeg", &jpeg), to_color_image(&resized)))
}

/// Finished upload for one frame
#[derive(Debug)]
pub struct UploadResult {
    pub frame_id: ElementId,
    pub result: Result<FrameImage, UploadError>,
}

/// Runs image processing off the UI thread and hands results back through a
/// channel drained by [`UploadQueue::poll`].
#[derive(Debug)]
pub struct UploadQueue {
    sender: UnboundedSender<UploadResult>,
    receiver: UnboundedReceiver<UploadResult>,
    in_flight: usize,
    inline: bool,
}

impl UploadQueue {
    pub fn new(inline: bool) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            in_flight: 0,
            inline,
        }
    }

    pub fn submit(&mut self, frame_id: ElementId, source: UploadSource, config: &CanvasConfig) {
        self.in_flight += 1;
        let config = config.clone();
        let sender = self.sender.clone();
        let job = move || {
            let result = process_image(&source, &config);
            if sender.unbounded_send(UploadResult { frame_id, result }).is_err() {
                warn!("Upload finished after the queue was dropped");
            }
        };

        if self.inline {
            job();
            return;
        }

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(job);

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move { job() });
    }

    /// Collect every finished upload
    pub fn poll(&mut self) -> Vec<UploadResult> {
        let mut finished = Vec::new();
        while let Ok(Some(result)) = self.receiver.try_next() {
            finished.push(result);
        }
        self.in_flight = self.in_flight.saturating_sub(finished.len());
        finished
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }
}
