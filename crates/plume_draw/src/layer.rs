//! Draw layers and the batching writer
//!
//! A [`DrawLayer`] holds the commands and indices of one z-ordered bucket of
//! geometry. Vertices live in the owning [`DrawList`](crate::DrawList) and are
//! shared by every layer, so indices are absolute into that buffer.
//!
//! All emission goes through [`LayerWriter`], which borrows a layer together
//! with the shared vertex buffer and the current clip rectangle. Consecutive
//! geometry with the same texture, SDF flag and clip rect lands in the same
//! [`DrawCommand`]; any change starts a new one.

use plume_core::{Color, Rect, TextureId, Vec2};

use crate::vertex::Vertex2D;

/// Handle to a layer owned by a [`DrawList`](crate::DrawList)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerId(pub(crate) usize);

/// One GPU draw call's worth of geometry
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    /// First vertex emitted for this command
    pub vertex_offset: u32,
    /// First index of this command in the index buffer
    pub index_offset: u32,
    /// Number of indices drawn
    pub element_count: u32,
    pub texture: TextureId,
    /// Texture holds signed distance fields rather than coverage
    pub sdf: bool,
    /// Scissor rectangle, `None` for the full viewport
    pub clip: Option<Rect>,
}

/// Font atlas state every solid-color primitive needs
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AtlasBinding {
    pub texture: TextureId,
    /// Texture coordinate of the atlas' white patch
    pub white_uv: [f32; 2],
}

/// Commands, indices and path scratch space for one layer
#[derive(Debug, Default)]
pub struct DrawLayer {
    name: String,
    commands: Vec<DrawCommand>,
    indices: Vec<u32>,
    pub(crate) path: Vec<Vec2>,
    vertex_count: u32,
}

impl DrawLayer {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Vertices reserved by this layer this frame
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name.clear();
        self.name.push_str(name);
    }

    /// Drop this frame's geometry, keeping buffer capacity
    pub(crate) fn clear(&mut self) {
        self.commands.clear();
        self.indices.clear();
        self.path.clear();
        self.vertex_count = 0;
    }

    /// Clear everything, including the name, before going back to the pool
    pub(crate) fn reset(&mut self) {
        self.clear();
        self.name.clear();
    }
}

/// Mutable view of a layer used to emit geometry
///
/// Obtained from [`DrawList::layer`](crate::DrawList::layer). Shape emitters
/// live in `primitives.rs` and text emitters in `text.rs`.
pub struct LayerWriter<'a> {
    pub(crate) layer: &'a mut DrawLayer,
    pub(crate) vertices: &'a mut Vec<Vertex2D>,
    pub(crate) clip: Option<Rect>,
    pub(crate) atlas: AtlasBinding,
}

impl<'a> LayerWriter<'a> {
    pub(crate) fn new(
        layer: &'a mut DrawLayer,
        vertices: &'a mut Vec<Vertex2D>,
        clip: Option<Rect>,
        atlas: AtlasBinding,
    ) -> Self {
        Self {
            layer,
            vertices,
            clip,
            atlas,
        }
    }

    /// The layer being written
    pub fn layer(&self) -> &DrawLayer {
        self.layer
    }

    /// Clip rect that new commands will carry
    pub fn clip(&self) -> Option<Rect> {
        self.clip
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Path building
    // ═══════════════════════════════════════════════════════════════════════

    /// Append a point to the scratch path
    pub fn path_line_to(&mut self, point: Vec2) {
        self.layer.path.push(point);
    }

    /// Stroke the scratch path as a thick polyline, then clear it
    pub fn submit_path(&mut self, color: Color, thickness: f32) {
        let path = std::mem::take(&mut self.layer.path);
        self.add_lines(&path, color, thickness);
        self.layer.path = path;
        self.layer.path.clear();
    }

    /// Stroke `points` as connected segments of width `thickness`
    ///
    /// A zero-length segment reuses the direction of the segment before it.
    pub fn add_lines(&mut self, points: &[Vec2], color: Color, thickness: f32) {
        if points.len() < 2 {
            return;
        }
        let segments = (points.len() - 1) as u32;
        self.prepare_draw_command(self.atlas.texture, false);
        self.reserve_triangles(6 * segments, 4 * segments);

        let color = color.pack();
        let uv = self.atlas.white_uv;
        let half = thickness / 2.0;
        let mut direction = Vec2::ZERO;
        for pair in points.windows(2) {
            let (p0, p1) = (pair[0], pair[1]);
            let delta = p1 - p0;
            if delta.length_squared() > 0.0 {
                direction = delta * (1.0 / delta.length());
            }
            let offset = Vec2::new(direction.y, -direction.x) * half;

            let start = self.vertex_start();
            self.add_vertex(p0 - offset, color, uv);
            self.add_vertex(p1 - offset, color, uv);
            self.add_vertex(p1 + offset, color, uv);
            self.add_vertex(p0 + offset, color, uv);
            self.add_index(start, 0, 1, 2);
            self.add_index(start, 0, 2, 3);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Batching
    // ═══════════════════════════════════════════════════════════════════════

    /// Make the last command compatible with `texture`, `sdf` and the clip
    pub(crate) fn prepare_draw_command(&mut self, texture: TextureId, sdf: bool) {
        let start_new = match self.layer.commands.last() {
            Some(last) => last.texture != texture || last.sdf != sdf || last.clip != self.clip,
            None => true,
        };
        if start_new {
            self.layer.commands.push(DrawCommand {
                vertex_offset: self.vertices.len() as u32,
                index_offset: self.layer.indices.len() as u32,
                element_count: 0,
                texture,
                sdf,
                clip: self.clip,
            });
        }
    }

    /// Account for geometry about to be emitted into the last command
    pub(crate) fn reserve_triangles(&mut self, index_count: u32, vertex_count: u32) {
        debug_assert!(
            !self.layer.commands.is_empty(),
            "reserve_triangles called before prepare_draw_command"
        );
        self.vertices.reserve(vertex_count as usize);
        self.layer.indices.reserve(index_count as usize);
        if let Some(command) = self.layer.commands.last_mut() {
            command.element_count += index_count;
        }
        self.layer.vertex_count += vertex_count;
    }

    pub(crate) fn vertex_start(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub(crate) fn add_vertex(&mut self, pos: Vec2, color: u32, uv: [f32; 2]) {
        self.vertices.push(Vertex2D {
            pos: pos.into(),
            uv,
            color,
        });
    }

    pub(crate) fn add_index(&mut self, vertex_start: u32, i0: u32, i1: u32, i2: u32) {
        self.layer.indices.extend_from_slice(&[
            vertex_start + i0,
            vertex_start + i1,
            vertex_start + i2,
        ]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer<'a>(layer: &'a mut DrawLayer, vertices: &'a mut Vec<Vertex2D>) -> LayerWriter<'a> {
        LayerWriter::new(layer, vertices, None, AtlasBinding::default())
    }

    #[test]
    fn test_polyline_vertex_and_index_counts() {
        let mut layer = DrawLayer::default();
        let mut vertices = Vec::new();
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
        ];
        writer(&mut layer, &mut vertices).add_lines(&points, Color::WHITE, 2.0);

        assert_eq!(vertices.len(), 8);
        assert_eq!(layer.indices().len(), 12);
        assert_eq!(layer.vertex_count(), 8);
        assert_eq!(layer.commands().len(), 1);
        assert_eq!(layer.commands()[0].element_count, 12);
    }

    #[test]
    fn test_horizontal_segment_is_offset_by_half_thickness() {
        let mut layer = DrawLayer::default();
        let mut vertices = Vec::new();
        let points = [Vec2::new(0.0, 5.0), Vec2::new(10.0, 5.0)];
        writer(&mut layer, &mut vertices).add_lines(&points, Color::WHITE, 2.0);

        // normal of +x is (0, -1)
        assert_eq!(vertices[0].pos, [0.0, 6.0]);
        assert_eq!(vertices[1].pos, [10.0, 6.0]);
        assert_eq!(vertices[2].pos, [10.0, 4.0]);
        assert_eq!(vertices[3].pos, [0.0, 4.0]);
    }

    #[test]
    fn test_repeated_point_stays_finite() {
        let mut layer = DrawLayer::default();
        let mut vertices = Vec::new();
        let points = [
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(5.0, 1.0),
            Vec2::new(5.0, 1.0),
        ];
        writer(&mut layer, &mut vertices).add_lines(&points, Color::RED, 3.0);

        assert_eq!(vertices.len(), 12);
        assert!(vertices
            .iter()
            .all(|v| v.pos[0].is_finite() && v.pos[1].is_finite()));
        // the trailing repeat keeps the +x direction of the middle segment
        assert_eq!(vertices[8].pos, [5.0, 2.5]);
    }

    #[test]
    fn test_single_point_path_emits_nothing() {
        let mut layer = DrawLayer::default();
        let mut vertices = Vec::new();
        let mut w = writer(&mut layer, &mut vertices);
        w.path_line_to(Vec2::new(3.0, 3.0));
        w.submit_path(Color::WHITE, 1.0);
        assert!(w.layer().commands().is_empty());
        assert!(w.layer().path.is_empty());
    }

    #[test]
    fn test_texture_change_starts_new_command() {
        let mut layer = DrawLayer::default();
        let mut vertices = Vec::new();
        let mut w = writer(&mut layer, &mut vertices);
        w.prepare_draw_command(TextureId(1), false);
        w.reserve_triangles(3, 3);
        w.prepare_draw_command(TextureId(1), false);
        w.reserve_triangles(3, 3);
        w.prepare_draw_command(TextureId(2), false);
        w.reserve_triangles(6, 4);
        w.prepare_draw_command(TextureId(2), true);
        w.reserve_triangles(6, 4);

        let counts: Vec<u32> = w.layer().commands().iter().map(|c| c.element_count).collect();
        assert_eq!(counts, vec![6, 6, 6]);
    }

    #[test]
    fn test_reset_clears_name() {
        let mut layer = DrawLayer::default();
        layer.set_name("overlay");
        layer.clear();
        assert_eq!(layer.name(), "overlay");
        layer.reset();
        assert_eq!(layer.name(), "");
    }
}
