//! Draw lists: layer pooling, clipping and per-frame merging

use plume_core::Rect;
use smallvec::SmallVec;

use crate::layer::{AtlasBinding, DrawCommand, DrawLayer, LayerId, LayerWriter};
use crate::vertex::Vertex2D;

/// Merged geometry of one draw list, ready for a backend
///
/// Commands are in paint order and their `index_offset`s point into
/// `indices`. Indices are absolute into `vertices`.
#[derive(Clone, Copy, Debug)]
pub struct DrawData<'a> {
    pub vertices: &'a [Vertex2D],
    pub indices: &'a [u32],
    pub commands: &'a [DrawCommand],
}

impl DrawData<'_> {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn total_elements(&self) -> u32 {
        self.commands.iter().map(|c| c.element_count).sum()
    }
}

/// A set of layers sharing one vertex buffer and one clip stack
///
/// Layers are requested from the list, filled through [`DrawList::layer`]
/// and submitted in paint order. Buffers are cleared at
/// [`DrawList::new_frame`] but keep their capacity.
#[derive(Debug, Default)]
pub struct DrawList {
    /// Every layer this list ever created
    layers: Vec<DrawLayer>,
    /// Idle layers ready for reuse
    cache: Vec<LayerId>,
    /// Layers submitted this frame, in paint order
    submitted: Vec<LayerId>,
    vertices: Vec<Vertex2D>,
    clip_stack: SmallVec<[Rect; 8]>,
    index_buffer_byte_size: usize,
    atlas: AtlasBinding,

    // Merge output of `build_draw_data`
    merged_indices: Vec<u32>,
    merged_commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_atlas(atlas: AtlasBinding) -> Self {
        Self {
            atlas,
            ..Self::default()
        }
    }

    /// Bind the texture and white-patch UV used by solid geometry and text
    pub fn set_atlas(&mut self, atlas: AtlasBinding) {
        self.atlas = atlas;
    }

    pub fn atlas(&self) -> AtlasBinding {
        self.atlas
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Layers
    // ─────────────────────────────────────────────────────────────────────────

    /// Take an idle layer from the cache, or create one
    pub fn request_layer(&mut self, name: &str) -> LayerId {
        let id = match self.cache.pop() {
            Some(id) => id,
            None => {
                self.layers.push(DrawLayer::default());
                tracing::trace!(
                    layers_created = self.layers.len(),
                    "draw layer pool grew"
                );
                LayerId(self.layers.len() - 1)
            }
        };
        self.layers[id.0].set_name(name);
        id
    }

    /// Reset a layer and put it back in the cache
    ///
    /// The handle must not be used again until it is handed out by
    /// [`request_layer`](Self::request_layer).
    pub fn return_layer(&mut self, id: LayerId) {
        self.check_layer(id);
        debug_assert!(!self.cache.contains(&id), "layer returned twice");
        self.layers[id.0].reset();
        self.cache.push(id);
    }

    /// Append a layer to this frame's paint order
    pub fn submit_layer(&mut self, id: LayerId) {
        self.check_layer(id);
        self.submitted.push(id);
        self.index_buffer_byte_size += self.layers[id.0].indices().len() * std::mem::size_of::<u32>();
    }

    /// Writer that emits geometry into `id` under the current clip rect
    pub fn layer(&mut self, id: LayerId) -> LayerWriter<'_> {
        self.check_layer(id);
        let clip = self.current_clip_rect();
        LayerWriter::new(&mut self.layers[id.0], &mut self.vertices, clip, self.atlas)
    }

    /// Read-only view of a layer
    pub fn layer_data(&self, id: LayerId) -> &DrawLayer {
        self.check_layer(id);
        &self.layers[id.0]
    }

    pub fn layers_created(&self) -> usize {
        self.layers.len()
    }

    pub fn cached_layers(&self) -> usize {
        self.cache.len()
    }

    pub fn submitted_layers(&self) -> &[LayerId] {
        &self.submitted
    }

    pub fn vertices(&self) -> &[Vertex2D] {
        &self.vertices
    }

    /// Bytes of index data submitted this frame
    pub fn index_buffer_byte_size(&self) -> usize {
        self.index_buffer_byte_size
    }

    fn check_layer(&self, id: LayerId) {
        assert!(
            id.0 < self.layers.len(),
            "layer handle {:?} does not belong to this draw list",
            id
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Clipping
    // ─────────────────────────────────────────────────────────────────────────

    /// Push a clip rect; with `accumulate` it is intersected with the current one
    pub fn push_clip_rect(&mut self, rect: Rect, accumulate: bool) {
        let rect = match self.clip_stack.last() {
            Some(top) if accumulate => rect.clip(top),
            _ => rect,
        };
        self.clip_stack.push(rect);
    }

    /// # Panics
    ///
    /// Panics if the clip stack is empty.
    pub fn pop_clip_rect(&mut self) {
        if self.clip_stack.pop().is_none() {
            panic!("pop_clip_rect called on an empty clip stack");
        }
    }

    /// Top of the clip stack, `None` when nothing clips
    pub fn current_clip_rect(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    pub fn clip_depth(&self) -> usize {
        self.clip_stack.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Frame lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Clear this frame's geometry and the layers submitted last frame
    ///
    /// The clip stack is left alone; callers keep it balanced.
    pub fn new_frame(&mut self) {
        if !self.clip_stack.is_empty() {
            tracing::warn!(
                depth = self.clip_stack.len(),
                "clip stack not empty at frame boundary"
            );
        }

        self.index_buffer_byte_size = 0;
        self.vertices.clear();
        self.merged_indices.clear();
        self.merged_commands.clear();
        for id in self.submitted.drain(..) {
            self.layers[id.0].clear();
        }
    }

    /// Merge submitted layers into one index buffer and command list
    pub fn build_draw_data(&mut self) -> DrawData<'_> {
        self.merged_indices.clear();
        self.merged_commands.clear();
        self.merged_indices.reserve(self.index_buffer_byte_size / std::mem::size_of::<u32>());

        for id in &self.submitted {
            let layer = &self.layers[id.0];
            let base = self.merged_indices.len() as u32;
            self.merged_indices.extend_from_slice(layer.indices());
            self.merged_commands
                .extend(layer.commands().iter().map(|command| DrawCommand {
                    index_offset: command.index_offset + base,
                    ..*command
                }));
        }

        DrawData {
            vertices: &self.vertices,
            indices: &self.merged_indices,
            commands: &self.merged_commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use plume_core::{Color, TextureId, Vec2};

    use super::*;

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Rect {
        Rect::new(Vec2::new(x0, y0), Vec2::new(x1, y1))
    }

    #[test]
    fn test_constant_state_batches_into_one_command() {
        let mut list = DrawList::new();
        let layer = list.request_layer("main");
        {
            let mut w = list.layer(layer);
            w.add_rect_filled(Vec2::ZERO, Vec2::new(10.0, 10.0), Color::WHITE);
            w.add_circle_filled(Vec2::new(5.0, 5.0), 3.0, Color::RED, 0);
            w.add_line(Vec2::ZERO, Vec2::ONE, Color::BLUE, 1.0);
        }
        let data = list.layer_data(layer);
        assert_eq!(data.commands().len(), 1);
        assert_eq!(data.commands()[0].element_count as usize, data.indices().len());
        assert!(data.indices().iter().all(|&i| i < data.vertex_count()));
    }

    #[test]
    fn test_clip_change_forces_new_command() {
        let mut list = DrawList::new();
        let layer = list.request_layer("main");
        list.layer(layer)
            .add_rect_filled(Vec2::ZERO, Vec2::ONE, Color::WHITE);
        list.push_clip_rect(rect(0.0, 0.0, 5.0, 5.0), false);
        list.layer(layer)
            .add_rect_filled(Vec2::ZERO, Vec2::ONE, Color::WHITE);
        list.pop_clip_rect();
        list.layer(layer)
            .add_rect_filled(Vec2::ZERO, Vec2::ONE, Color::WHITE);

        let clips: Vec<Option<Rect>> = list
            .layer_data(layer)
            .commands()
            .iter()
            .map(|c| c.clip)
            .collect();
        assert_eq!(clips, vec![None, Some(rect(0.0, 0.0, 5.0, 5.0)), None]);
    }

    #[test]
    fn test_clip_stack_accumulates() {
        let mut list = DrawList::new();
        assert_eq!(list.current_clip_rect(), None);

        list.push_clip_rect(rect(0.0, 0.0, 10.0, 10.0), false);
        list.push_clip_rect(rect(5.0, 5.0, 20.0, 20.0), true);
        assert_eq!(list.current_clip_rect(), Some(rect(5.0, 5.0, 10.0, 10.0)));

        list.push_clip_rect(rect(5.0, 5.0, 20.0, 20.0), false);
        assert_eq!(list.current_clip_rect(), Some(rect(5.0, 5.0, 20.0, 20.0)));

        list.pop_clip_rect();
        list.pop_clip_rect();
        assert_eq!(list.current_clip_rect(), Some(rect(0.0, 0.0, 10.0, 10.0)));
        list.pop_clip_rect();
        assert_eq!(list.current_clip_rect(), None);
    }

    #[test]
    #[should_panic(expected = "empty clip stack")]
    fn test_pop_empty_clip_stack_panics() {
        DrawList::new().pop_clip_rect();
    }

    #[test]
    fn test_submit_accumulates_index_bytes() {
        let mut list = DrawList::new();
        let a = list.request_layer("a");
        let b = list.request_layer("b");
        list.layer(a)
            .add_rect_filled(Vec2::ZERO, Vec2::ONE, Color::WHITE);
        list.layer(b)
            .add_triangle_filled(Vec2::ZERO, Vec2::ONE, Vec2::new(0.0, 1.0), Color::WHITE);
        list.submit_layer(a);
        list.submit_layer(b);
        assert_eq!(list.index_buffer_byte_size(), (6 + 3) * 4);

        list.new_frame();
        assert_eq!(list.index_buffer_byte_size(), 0);
        assert!(list.vertices().is_empty());
        assert!(list.submitted_layers().is_empty());
        assert!(list.layer_data(a).indices().is_empty());
        assert_eq!(list.layer_data(a).vertex_count(), 0);
        assert_eq!(list.layer_data(a).name(), "a");
    }

    #[test]
    fn test_returned_layers_are_reused() {
        let mut list = DrawList::new();
        let a = list.request_layer("a");
        list.layer(a)
            .add_rect_filled(Vec2::ZERO, Vec2::ONE, Color::WHITE);
        list.return_layer(a);
        assert_eq!(list.cached_layers(), 1);

        let b = list.request_layer("b");
        assert_eq!(a, b);
        assert_eq!(list.layers_created(), 1);
        assert_eq!(list.layer_data(b).name(), "b");
        assert!(list.layer_data(b).commands().is_empty());
    }

    #[test]
    fn test_build_draw_data_rebases_in_paint_order() {
        let mut list = DrawList::new();
        let back = list.request_layer("back");
        let front = list.request_layer("front");

        // emit front first so vertex order differs from paint order
        list.layer(front)
            .add_image(TextureId(3), Vec2::ZERO, Vec2::ONE);
        list.layer(back)
            .add_rect_filled(Vec2::ZERO, Vec2::ONE, Color::WHITE);
        list.layer(back)
            .add_triangle_filled(Vec2::ZERO, Vec2::ONE, Vec2::new(0.0, 1.0), Color::WHITE);

        list.submit_layer(back);
        list.submit_layer(front);
        let data = list.build_draw_data();

        assert_eq!(data.indices.len(), 15);
        assert_eq!(data.commands.len(), 2);
        assert_eq!(data.commands[0].index_offset, 0);
        assert_eq!(data.commands[0].element_count, 9);
        assert_eq!(data.commands[1].index_offset, 9);
        assert_eq!(data.commands[1].texture, TextureId(3));
        assert_eq!(data.total_elements() as usize, data.indices.len());
        // image vertices were emitted first
        assert_eq!(&data.indices[9..15], &[0, 1, 2, 0, 2, 3]);
        assert!(data.indices.iter().all(|&i| (i as usize) < data.vertices.len()));
    }

    #[test]
    #[should_panic(expected = "does not belong")]
    fn test_foreign_layer_handle_panics() {
        let mut other = DrawList::new();
        other.request_layer("x");
        other.request_layer("y");
        let foreign = other.request_layer("z");

        let mut list = DrawList::new();
        list.submit_layer(foreign);
    }
}
