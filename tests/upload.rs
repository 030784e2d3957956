use std::io::Cursor;

use egui::{Color32, pos2, vec2};
use image::GenericImageView as _;
use journal_canvas::command::Command;
use journal_canvas::upload::decode_data_url;
use journal_canvas::util::ManualClock;
use journal_canvas::{CanvasConfig, CanvasEngine, ImageFrame, MarkerTip, TextElement, ToolType, UploadSource};

fn engine() -> (CanvasEngine, ManualClock) {
    let clock = ManualClock::new(0.0);
    let config = CanvasConfig {
        upload_inline: true,
        ..CanvasConfig::default()
    };
    let engine = CanvasEngine::with_clock(vec2(800.0, 600.0), 1.0, config, Box::new(clock.clone()));
    (engine, clock)
}

fn settle(engine: &mut CanvasEngine, clock: &ManualClock) {
    clock.advance(1.0);
    engine.tick();
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([0x7A, 0xCC, 0xA8]));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn add_frame(engine: &mut CanvasEngine, clock: &ManualClock) -> journal_canvas::ElementId {
    let frame = ImageFrame::new(pos2(500.0, 300.0), Color32::WHITE, engine.now(), engine.config());
    let id = frame.id;
    assert!(engine.execute(Command::AddFrame(frame)));
    settle(engine, clock);
    id
}

#[test]
fn test_large_upload_is_downscaled_to_jpeg() {
    let (mut engine, clock) = engine();
    let id = add_frame(&mut engine, &clock);
    let undo_before = engine.history().undo_len();

    let source = UploadSource::new("wide.png", "image/png", png(3000, 2000));
    assert!(engine.begin_upload(id, source));
    engine.tick();

    let frame = engine.store().frame(id).unwrap();
    let image = frame.image.as_ref().unwrap();
    assert!(image.url.starts_with("data:image/jpeg;base64,"));
    assert_eq!(image.size(), [1200, 800]);

    let (mime, bytes) = decode_data_url(&image.url).unwrap();
    assert_eq!(mime, "image/jpeg");
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.dimensions(), (1200, 800));

    assert_eq!(engine.selection().frame, Some(id));
    assert_eq!(engine.uploads_in_flight(), 0);

    // The image change is recorded without a raster copy
    settle(&mut engine, &clock);
    assert_eq!(engine.history().undo_len(), undo_before + 1);
    assert!(engine.history().current().unwrap().raster.is_none());
}

#[test]
fn test_upload_raises_frame_to_top() {
    let (mut engine, clock) = engine();
    let lower = add_frame(&mut engine, &clock);
    let upper = add_frame(&mut engine, &clock);
    let order: Vec<_> = engine.store().frames_by_stacking().into_iter().map(|f| f.id).collect();
    assert_eq!(order, vec![lower, upper]);

    clock.advance(5.0);
    assert!(engine.begin_upload(lower, UploadSource::new("small.png", "image/png", png(40, 30))));
    engine.tick();

    let order: Vec<_> = engine.store().frames_by_stacking().into_iter().map(|f| f.id).collect();
    assert_eq!(order, vec![upper, lower]);
    let image = engine.store().frame(lower).unwrap().image.as_ref().unwrap();
    assert!(image.url.starts_with("data:image/png;base64,"));
}

#[test]
fn test_non_image_upload_is_rejected() {
    let (mut engine, clock) = engine();
    let id = add_frame(&mut engine, &clock);
    let undo_before = engine.history().undo_len();

    let source = UploadSource::new("notes.txt", "text/plain", b"not a photo".to_vec());
    assert!(!engine.begin_upload(id, source));
    engine.tick();
    settle(&mut engine, &clock);

    assert!(engine.store().frame(id).unwrap().image.is_none());
    assert_eq!(engine.history().undo_len(), undo_before);
}

#[test]
fn test_corrupt_upload_leaves_frame_empty() {
    let (mut engine, clock) = engine();
    let id = add_frame(&mut engine, &clock);

    let source = UploadSource::new("broken.png", "image/png", vec![0u8; 32]);
    assert!(engine.begin_upload(id, source));
    engine.tick();

    assert!(engine.store().frame(id).unwrap().image.is_none());
    assert_eq!(engine.uploads_in_flight(), 0);
}

#[test]
fn test_drop_outside_frames_is_ignored() {
    let (mut engine, clock) = engine();
    add_frame(&mut engine, &clock);
    engine.select_tool(Some(ToolType::Marker));

    let source = UploadSource::new("a.png", "image/png", png(8, 8));
    assert!(!engine.drop_file(Some(pos2(20.0, 20.0)), source.clone()));
    assert!(engine.drop_file(Some(pos2(500.0, 300.0)), source));
}

#[test]
fn test_undo_across_upload_keeps_strokes() {
    let (mut engine, clock) = engine();
    let mut options = engine.options().clone();
    options.marker_tip = MarkerTip::Thin;
    options.marker_color = Color32::BLACK;
    engine.set_tool_options(options);
    engine.select_tool(Some(ToolType::Marker));
    engine.handle_event(journal_canvas::InputEvent::PointerDown { pos: pos2(20.0, 40.0) });
    engine.handle_event(journal_canvas::InputEvent::PointerMove { pos: pos2(60.0, 40.0) });
    engine.handle_event(journal_canvas::InputEvent::PointerUp { pos: pos2(100.0, 40.0) });
    engine.select_tool(None);
    settle(&mut engine, &clock);
    let inked = engine.raster().pixel(60, 40);

    let id = add_frame(&mut engine, &clock);
    assert!(engine.begin_upload(id, UploadSource::new("a.png", "image/png", png(16, 16))));
    engine.tick();
    settle(&mut engine, &clock);

    assert!(engine.undo());
    assert!(engine.store().frame(id).unwrap().image.is_none());
    assert_eq!(engine.raster().pixel(60, 40), inked);
}

#[test]
fn test_undo_to_upload_after_history_wraps_keeps_strokes() {
    let (mut engine, clock) = engine();
    let mut options = engine.options().clone();
    options.marker_tip = MarkerTip::Thin;
    options.marker_color = Color32::BLACK;
    engine.set_tool_options(options);
    engine.select_tool(Some(ToolType::Marker));
    engine.handle_event(journal_canvas::InputEvent::PointerDown { pos: pos2(20.0, 40.0) });
    engine.handle_event(journal_canvas::InputEvent::PointerMove { pos: pos2(60.0, 40.0) });
    engine.handle_event(journal_canvas::InputEvent::PointerUp { pos: pos2(100.0, 40.0) });
    engine.select_tool(None);
    settle(&mut engine, &clock);
    let inked = engine.raster().pixel(60, 40);
    assert_ne!(inked, Some(Color32::from_rgb(0xFA, 0xFA, 0xFA)));

    let id = add_frame(&mut engine, &clock);
    assert!(engine.begin_upload(id, UploadSource::new("a.png", "image/png", png(16, 16))));
    engine.tick();
    settle(&mut engine, &clock);

    // Enough later entries to push the stroke snapshot out of the history
    for i in 0..13 {
        let text = TextElement::new(pos2(650.0, 20.0 + i as f32 * 30.0), format!("note {i}"), engine.config());
        assert!(engine.execute(Command::AddText(text)));
        settle(&mut engine, &clock);
    }
    assert_eq!(engine.history().undo_len(), engine.history().capacity());

    for _ in 0..13 {
        assert!(engine.undo());
    }
    assert!(engine.store().text_elements.is_empty());
    assert!(engine.store().frame(id).unwrap().image.is_some());
    assert_eq!(engine.raster().pixel(60, 40), inked);
}
