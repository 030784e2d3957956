use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

use crate::element::{ElementId, FrameImage};

/// GPU textures for frame images, keyed by frame and image revision.
///
/// A frame that receives a new image gets a new revision, so stale entries
/// simply stop being requested and age out of the cache.
pub struct TextureManager {
    texture_cache: HashMap<(ElementId, u64), TextureHandle>,
    /// Frame counter value at the last lookup of each entry
    last_used: HashMap<(ElementId, u64), u64>,
    current_frame: u64,
    max_cache_size: usize,
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size: max_cache_size.max(1),
        }
    }

    /// Should be called at the start of each UI frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Texture for the image of frame `frame_id`, uploading it on first use
    pub fn frame_texture(&mut self, ctx: &Context, frame_id: ElementId, image: &FrameImage) -> TextureId {
        self.get_or_create(ctx, frame_id, image.revision, || (*image.pixels).clone())
    }

    fn get_or_create(
        &mut self,
        ctx: &Context,
        frame_id: ElementId,
        revision: u64,
        generator: impl FnOnce() -> ColorImage,
    ) -> TextureId {
        let cache_key = (frame_id, revision);

        if let Some(handle) = self.texture_cache.get(&cache_key) {
            self.last_used.insert(cache_key, self.current_frame);
            return handle.id();
        }

        self.prune_cache_if_needed();

        let name = format!("frame_{}_r{}", frame_id, revision);
        let handle = ctx.load_texture(name, generator(), TextureOptions::LINEAR);
        let id = handle.id();
        self.texture_cache.insert(cache_key, handle);
        self.last_used.insert(cache_key, self.current_frame);
        id
    }

    /// Drop cached textures of frames for which `keep` returns false
    pub fn retain_frames(&mut self, keep: impl Fn(ElementId) -> bool) {
        self.texture_cache.retain(|(id, _), _| keep(*id));
        self.last_used.retain(|(id, _), _| keep(*id));
    }

    /// Evict least recently used entries so one more texture fits
    fn prune_cache_if_needed(&mut self) {
        if self.texture_cache.len() < self.max_cache_size {
            return;
        }

        let mut entries: Vec<((ElementId, u64), u64)> = self.last_used.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = self.texture_cache.len() + 1 - self.max_cache_size;
        for (key, _) in entries.into_iter().take(to_remove) {
            self.texture_cache.remove(&key);
            self.last_used.remove(&key);
        }
    }

    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    #[cfg(test)]
    fn contains(&self, frame_id: ElementId, revision: u64) -> bool {
        self.texture_cache.contains_key(&(frame_id, revision))
    }
}

impl Default for TextureManager {
    fn default() -> Self {
        Self::new(64)
    }
}
