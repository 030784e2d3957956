use log::debug;

use crate::element::{DrawnPath, ElementStore, ImageFrame, TextElement, WashiTapeElement};
use crate::raster::{RasterSnapshot, RasterSurface};
use crate::util::Debouncer;

/// Captured copy of the whole canvas state for one history slot
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CanvasSnapshot {
    pub paths: Vec<DrawnPath>,
    pub frames: Vec<ImageFrame>,
    pub text_elements: Vec<TextElement>,
    pub washi_tapes: Vec<WashiTapeElement>,
    /// `None` leaves the live raster untouched on restore
    pub raster: Option<RasterSnapshot>,
}

impl CanvasSnapshot {
    pub fn capture(store: &ElementStore, raster: Option<&RasterSurface>) -> Self {
        Self {
            paths: store.paths.clone(),
            frames: store.frames.clone(),
            text_elements: store.text_elements.clone(),
            washi_tapes: store.washi_tapes.clone(),
            raster: raster.map(RasterSurface::snapshot),
        }
    }

    /// Replace the live state with this snapshot
    pub fn restore(&self, store: &mut ElementStore, raster: &mut RasterSurface) {
        store.paths = self.paths.clone();
        store.frames = self.frames.clone();
        store.text_elements = self.text_elements.clone();
        store.washi_tapes = self.washi_tapes.clone();
        store.prune_selection();
        if let Some(snapshot) = &self.raster {
            raster.restore(snapshot);
        }
    }
}

/// Linear undo/redo over canvas snapshots with a debounced capture.
///
/// Index 0 of the undo stack is the state at construction and is never
/// evicted; the top of the undo stack always mirrors the live state once
/// pending captures are flushed.
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<CanvasSnapshot>,
    redo_stack: Vec<CanvasSnapshot>,
    capacity: usize,
    /// Pending capture; the payload is whether the raster may be skipped
    pending: Debouncer<bool>,
}

impl History {
    pub fn new(initial: CanvasSnapshot, capacity: usize, debounce_secs: f64) -> Self {
        Self {
            undo_stack: vec![initial],
            redo_stack: Vec::new(),
            capacity: capacity.max(2),
            pending: Debouncer::new(debounce_secs),
        }
    }

    /// Schedule a capture. Requests within the debounce window collapse into
    /// one; the raster is skipped only if every collapsed request skips it.
    pub fn request_snapshot(&mut self, now: f64, skip_raster: bool) {
        self.pending.schedule_with(now, skip_raster, |previous, new| previous && new);
    }

    /// Capture if the debounce period has elapsed. Returns true if a snapshot
    /// was pushed.
    pub fn tick(&mut self, now: f64, store: &ElementStore, raster: &RasterSurface) -> bool {
        match self.pending.poll(now) {
            Some(skip_raster) => {
                self.capture(store, raster, skip_raster);
                true
            }
            None => false,
        }
    }

    /// Capture a pending request immediately
    pub fn flush(&mut self, store: &ElementStore, raster: &RasterSurface) -> bool {
        match self.pending.flush() {
            Some(skip_raster) => {
                self.capture(store, raster, skip_raster);
                true
            }
            None => false,
        }
    }

    fn capture(&mut self, store: &ElementStore, raster: &RasterSurface, skip_raster: bool) {
        let raster = (!skip_raster).then_some(raster);
        self.push(CanvasSnapshot::capture(store, raster));
    }

    /// Push a snapshot, evicting the second-oldest entry when full and
    /// invalidating every redo.
    pub fn push(&mut self, mut snapshot: CanvasSnapshot) {
        if self.undo_stack.len() >= self.capacity {
            let evicted = self.undo_stack.remove(1);
            // Raster-less entries restore from the nearest older pixels,
            // so the evicted pixels move onto their successor
            let successor = match self.undo_stack.get_mut(1) {
                Some(next) => next,
                None => &mut snapshot,
            };
            if successor.raster.is_none() {
                successor.raster = evicted.raster;
            }
        }
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        debug!("History snapshot pushed ({} entries)", self.undo_stack.len());
    }

    /// Step back one entry. Returns false if only the initial state remains.
    pub fn undo(&mut self, store: &mut ElementStore, raster: &mut RasterSurface) -> bool {
        self.flush(store, raster);
        if self.undo_stack.len() <= 1 {
            return false;
        }
        let Some(current) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(current);
        self.restore_top(store, raster);
        true
    }

    /// Re-apply the most recently undone entry
    pub fn redo(&mut self, store: &mut ElementStore, raster: &mut RasterSurface) -> bool {
        self.flush(store, raster);
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(next);
        self.restore_top(store, raster);
        true
    }

    /// Restore the newest undo entry. Raster-less entries fall back to the
    /// closest older entry that carries pixels, so undoing across an upload
    /// keeps strokes consistent with the element state.
    fn restore_top(&self, store: &mut ElementStore, raster: &mut RasterSurface) {
        let Some(top) = self.undo_stack.last() else {
            return;
        };
        top.restore(store, raster);
        if top.raster.is_none() {
            if let Some(pixels) = self.undo_stack.iter().rev().find_map(|s| s.raster.as_ref()) {
                raster.restore(pixels);
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1 || self.pending.is_pending()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }

    /// The pristine state captured at construction
    pub fn initial(&self) -> Option<&CanvasSnapshot> {
        self.undo_stack.first()
    }

    pub fn current(&self) -> Option<&CanvasSnapshot> {
        self.undo_stack.last()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CanvasConfig;
    use crate::raster::MarkerTip;
    use egui::{Color32, pos2};

    fn setup() -> (ElementStore, RasterSurface, History) {
        let store = ElementStore::new();
        let raster = RasterSurface::new(32, 32, 1.0, CanvasConfig::default());
        let history = History::new(CanvasSnapshot::capture(&store, Some(&raster)), 15, 0.3);
        (store, raster, history)
    }

    fn add_frame(store: &mut ElementStore, x: f32) {
        let config = CanvasConfig::default();
        store.frames.push(ImageFrame::new(pos2(x, 0.0), config.frame_color, x as f64, &config));
    }

    #[test]
    fn test_debounced_capture() {
        let (mut store, raster, mut history) = setup();
        add_frame(&mut store, 1.0);
        history.request_snapshot(0.0, false);
        history.request_snapshot(0.1, false);

        assert!(!history.tick(0.35, &store, &raster));
        assert!(history.tick(0.4, &store, &raster));
        assert_eq!(history.undo_len(), 2);
    }

    #[test]
    fn test_skip_raster_requires_every_request() {
        let (store, raster, mut history) = setup();
        history.request_snapshot(0.0, true);
        history.request_snapshot(0.1, false);
        history.flush(&store, &raster);
        assert!(history.current().unwrap().raster.is_some());

        history.request_snapshot(1.0, true);
        history.flush(&store, &raster);
        assert!(history.current().unwrap().raster.is_none());
    }

    #[test]
    fn test_undo_redo_restores_state() {
        let (mut store, mut raster, mut history) = setup();
        raster.commit_stroke(&[pos2(0.0, 16.0), pos2(32.0, 16.0)], Color32::RED, MarkerTip::Thin);
        add_frame(&mut store, 5.0);
        history.request_snapshot(0.0, false);
        let drawn = raster.snapshot();

        assert!(history.undo(&mut store, &mut raster));
        assert!(store.frames.is_empty());
        assert_ne!(raster.snapshot(), drawn);

        assert!(history.redo(&mut store, &mut raster));
        assert_eq!(store.frames.len(), 1);
        assert_eq!(raster.snapshot(), drawn);
        assert!(!history.redo(&mut store, &mut raster));
    }

    #[test]
    fn test_undo_stops_at_initial() {
        let (mut store, mut raster, mut history) = setup();
        assert!(!history.undo(&mut store, &mut raster));
        assert!(!history.can_undo());
    }

    #[test]
    fn test_capacity_keeps_initial() {
        let (mut store, raster, mut history) = setup();
        let initial = history.initial().cloned();
        for i in 0..40 {
            add_frame(&mut store, i as f32);
            history.push(CanvasSnapshot::capture(&store, Some(&raster)));
            assert!(history.undo_len() <= 15);
        }
        assert_eq!(history.initial().cloned(), initial);
        assert_eq!(history.current().unwrap().frames.len(), 40);
    }

    #[test]
    fn test_eviction_keeps_pixels_for_rasterless_successor() {
        let (mut store, mut raster, mut history) = setup();
        raster.commit_stroke(&[pos2(0.0, 16.0), pos2(32.0, 16.0)], Color32::BLACK, MarkerTip::Thin);
        let inked = raster.pixel(16, 16);
        history.push(CanvasSnapshot::capture(&store, Some(&raster)));
        add_frame(&mut store, 1.0);
        history.push(CanvasSnapshot::capture(&store, None));
        for i in 0..13 {
            add_frame(&mut store, 10.0 + i as f32);
            history.push(CanvasSnapshot::capture(&store, Some(&raster)));
        }
        assert_eq!(history.undo_len(), 15);
        assert!(history.undo_stack[1].raster.is_some());

        for _ in 0..13 {
            assert!(history.undo(&mut store, &mut raster));
        }
        assert_eq!(store.frames.len(), 1);
        assert_eq!(raster.pixel(16, 16), inked);
    }

    #[test]
    fn test_push_clears_redo() {
        let (mut store, mut raster, mut history) = setup();
        add_frame(&mut store, 1.0);
        history.push(CanvasSnapshot::capture(&store, Some(&raster)));
        history.undo(&mut store, &mut raster);
        assert!(history.can_redo());

        history.push(CanvasSnapshot::capture(&store, Some(&raster)));
        assert!(!history.can_redo());
    }
}
