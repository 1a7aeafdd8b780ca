//! Shape emitters
//!
//! Outlined shapes push points into the layer's scratch path and stroke it
//! as a thick polyline. Filled shapes write triangles directly: quads as two
//! triangles, circles and rounded rects as a fan around their center.

use std::f32::consts::{FRAC_PI_2, TAU};

use plume_core::{Color, TextureId, Vec2};

use crate::layer::LayerWriter;

/// Arc steps per rounded-rect corner when 0 is requested
pub const DEFAULT_CORNER_SEGMENTS: u32 = 3;
/// Circle and bezier segments when 0 is requested
pub const DEFAULT_CURVE_SEGMENTS: u32 = 12;

impl LayerWriter<'_> {
    pub fn add_line(&mut self, p0: Vec2, p1: Vec2, color: Color, thickness: f32) {
        self.path_line_to(p0);
        self.path_line_to(p1);
        self.submit_path(color, thickness);
    }

    pub fn add_triangle(&mut self, p0: Vec2, p1: Vec2, p2: Vec2, color: Color, thickness: f32) {
        for p in [p0, p1, p2, p0] {
            self.path_line_to(p);
        }
        self.submit_path(color, thickness);
    }

    pub fn add_triangle_filled(&mut self, p0: Vec2, p1: Vec2, p2: Vec2, color: Color) {
        self.prepare_draw_command(self.atlas.texture, false);
        self.reserve_triangles(3, 3);

        let (color, uv) = (color.pack(), self.atlas.white_uv);
        let start = self.vertex_start();
        self.add_vertex(p0, color, uv);
        self.add_vertex(p1, color, uv);
        self.add_vertex(p2, color, uv);
        self.add_index(start, 0, 1, 2);
    }

    pub fn add_rect(&mut self, min: Vec2, max: Vec2, color: Color, thickness: f32) {
        let bottom_left = Vec2::new(min.x, max.y);
        let top_right = Vec2::new(max.x, min.y);
        for p in [min, bottom_left, max, top_right, min] {
            self.path_line_to(p);
        }
        self.submit_path(color, thickness);
    }

    pub fn add_rect_filled(&mut self, min: Vec2, max: Vec2, color: Color) {
        let bottom_left = Vec2::new(min.x, max.y);
        let top_right = Vec2::new(max.x, min.y);
        self.add_quad_filled(min, bottom_left, max, top_right, color);
    }

    /// Rounded rect outline; `segments` arc steps per corner
    pub fn add_rect_rounded(
        &mut self,
        min: Vec2,
        max: Vec2,
        color: Color,
        thickness: f32,
        radius: f32,
        segments: u32,
    ) {
        let segments = if segments == 0 { DEFAULT_CORNER_SEGMENTS } else { segments };
        let path = &mut self.layer.path;
        rounded_rect_perimeter(min, max, radius, segments, |p| path.push(p));
        // close the loop back at the first corner's start
        self.path_line_to(Vec2::new(max.x, max.y - radius));
        self.submit_path(color, thickness);
    }

    /// Rounded rect filled as a fan of `4 * segments + 4` triangles
    pub fn add_rect_rounded_filled(
        &mut self,
        min: Vec2,
        max: Vec2,
        color: Color,
        radius: f32,
        segments: u32,
    ) {
        let segments = if segments == 0 { DEFAULT_CORNER_SEGMENTS } else { segments };
        let count = segments * 4 + 4;
        self.prepare_draw_command(self.atlas.texture, false);
        self.reserve_triangles(count * 3, count + 1);

        let (color, uv) = (color.pack(), self.atlas.white_uv);
        let start = self.vertex_start();
        self.add_vertex((min + max) * 0.5, color, uv);
        rounded_rect_perimeter(min, max, radius, segments, |p| self.add_vertex(p, color, uv));
        self.add_fan_indices(start, count);
    }

    pub fn add_quad(
        &mut self,
        p0: Vec2,
        p1: Vec2,
        p2: Vec2,
        p3: Vec2,
        color: Color,
        thickness: f32,
    ) {
        for p in [p0, p1, p2, p3, p0] {
            self.path_line_to(p);
        }
        self.submit_path(color, thickness);
    }

    /// Quad as triangles (0, 1, 2) and (0, 2, 3)
    pub fn add_quad_filled(&mut self, p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, color: Color) {
        self.prepare_draw_command(self.atlas.texture, false);
        self.reserve_triangles(6, 4);

        let (color, uv) = (color.pack(), self.atlas.white_uv);
        let start = self.vertex_start();
        self.add_vertex(p0, color, uv);
        self.add_vertex(p1, color, uv);
        self.add_vertex(p2, color, uv);
        self.add_vertex(p3, color, uv);
        self.add_index(start, 0, 1, 2);
        self.add_index(start, 0, 2, 3);
    }

    pub fn add_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        color: Color,
        segments: u32,
        thickness: f32,
    ) {
        let segments = if segments == 0 { DEFAULT_CURVE_SEGMENTS } else { segments };
        let path = &mut self.layer.path;
        circle_points(center, radius, segments, |p| path.push(p));
        self.path_line_to(Vec2::new(center.x + radius, center.y));
        self.submit_path(color, thickness);
    }

    /// Filled circle: `segments + 1` vertices and `3 * segments` indices
    pub fn add_circle_filled(&mut self, center: Vec2, radius: f32, color: Color, segments: u32) {
        let segments = if segments == 0 { DEFAULT_CURVE_SEGMENTS } else { segments };
        self.prepare_draw_command(self.atlas.texture, false);
        self.reserve_triangles(3 * segments, segments + 1);

        let (color, uv) = (color.pack(), self.atlas.white_uv);
        let start = self.vertex_start();
        self.add_vertex(center, color, uv);
        circle_points(center, radius, segments, |p| self.add_vertex(p, color, uv));
        self.add_fan_indices(start, segments);
    }

    pub fn add_image(&mut self, texture: TextureId, min: Vec2, max: Vec2) {
        self.add_image_ex(texture, min, max, Vec2::ZERO, Vec2::ONE, Color::WHITE);
    }

    pub fn add_image_ex(
        &mut self,
        texture: TextureId,
        min: Vec2,
        max: Vec2,
        uv_min: Vec2,
        uv_max: Vec2,
        color: Color,
    ) {
        self.prepare_draw_command(texture, false);
        self.reserve_triangles(6, 4);

        let color = color.pack();
        let start = self.vertex_start();
        self.add_vertex(min, color, uv_min.into());
        self.add_vertex(Vec2::new(min.x, max.y), color, [uv_min.x, uv_max.y]);
        self.add_vertex(max, color, uv_max.into());
        self.add_vertex(Vec2::new(max.x, min.y), color, [uv_max.x, uv_min.y]);
        self.add_index(start, 0, 1, 2);
        self.add_index(start, 0, 2, 3);
    }

    /// Quadratic bezier from `p0` to `p2` with control point `p1`
    pub fn add_bezier_quad(
        &mut self,
        p0: Vec2,
        p1: Vec2,
        p2: Vec2,
        color: Color,
        thickness: f32,
        segments: u32,
    ) {
        let segments = if segments == 0 { DEFAULT_CURVE_SEGMENTS } else { segments };
        self.path_line_to(p0);
        for i in 1..segments {
            let t = i as f32 / segments as f32;
            self.path_line_to(bezier_quad_point(p0, p1, p2, t));
        }
        self.path_line_to(p2);
        self.submit_path(color, thickness);
    }

    /// Cubic bezier from `p0` to `p3` with control points `p1` and `p2`
    #[allow(clippy::too_many_arguments)]
    pub fn add_bezier_cubic(
        &mut self,
        p0: Vec2,
        p1: Vec2,
        p2: Vec2,
        p3: Vec2,
        color: Color,
        thickness: f32,
        segments: u32,
    ) {
        let segments = if segments == 0 { DEFAULT_CURVE_SEGMENTS } else { segments };
        self.path_line_to(p0);
        for i in 1..segments {
            let t = i as f32 / segments as f32;
            self.path_line_to(bezier_cubic_point(p0, p1, p2, p3, t));
        }
        self.path_line_to(p3);
        self.submit_path(color, thickness);
    }

    /// Fan triangles around vertex 0 over `count` perimeter vertices
    fn add_fan_indices(&mut self, start: u32, count: u32) {
        for i in 0..count - 1 {
            self.add_index(start, i + 1, 0, i + 2);
        }
        self.add_index(start, count, 0, 1);
    }
}

/// Walk the perimeter corner by corner: bottom-right, bottom-left, top-left,
/// top-right. Each corner yields `segments + 1` points.
fn rounded_rect_perimeter(
    min: Vec2,
    max: Vec2,
    radius: f32,
    segments: u32,
    mut emit: impl FnMut(Vec2),
) {
    let corners = [
        (
            Vec2::new(max.x, max.y - radius),
            Vec2::new(max.x - radius, max.y - radius),
            Vec2::new(max.x - radius, max.y),
        ),
        (
            Vec2::new(min.x + radius, max.y),
            Vec2::new(min.x + radius, max.y - radius),
            Vec2::new(min.x, max.y - radius),
        ),
        (
            Vec2::new(min.x, min.y + radius),
            Vec2::new(min.x + radius, min.y + radius),
            Vec2::new(min.x + radius, min.y),
        ),
        (
            Vec2::new(max.x - radius, min.y),
            Vec2::new(max.x - radius, min.y + radius),
            Vec2::new(max.x, min.y + radius),
        ),
    ];

    let step = FRAC_PI_2 / segments as f32;
    let mut theta = 0.0f32;
    for (start, inner, end) in corners {
        emit(start);
        theta += step;
        for _ in 1..segments {
            emit(inner + Vec2::new(radius * (theta + FRAC_PI_2).sin(), radius * theta.sin()));
            theta += step;
        }
        emit(end);
    }
}

fn circle_points(center: Vec2, radius: f32, segments: u32, mut emit: impl FnMut(Vec2)) {
    let step = TAU / segments as f32;
    let mut theta = 0.0f32;
    for _ in 0..segments {
        emit(Vec2::new(
            center.x + radius * (theta + FRAC_PI_2).sin(),
            center.y + radius * theta.sin(),
        ));
        theta += step;
    }
}

pub(crate) fn bezier_quad_point(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}

pub(crate) fn bezier_cubic_point(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    let (uu, tt) = (u * u, t * t);
    p0 * (uu * u) + p1 * (3.0 * uu * t) + p2 * (3.0 * u * tt) + p3 * (tt * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{AtlasBinding, DrawLayer};
    use crate::vertex::Vertex2D;

    fn atlas() -> AtlasBinding {
        AtlasBinding {
            texture: TextureId(7),
            white_uv: [0.25, 0.5],
        }
    }

    fn emit(f: impl FnOnce(&mut LayerWriter<'_>)) -> (DrawLayer, Vec<Vertex2D>) {
        let mut layer = DrawLayer::default();
        let mut vertices = Vec::new();
        f(&mut LayerWriter::new(&mut layer, &mut vertices, None, atlas()));
        (layer, vertices)
    }

    fn assert_indices_in_range(layer: &DrawLayer) {
        assert!(layer.indices().iter().all(|&i| i < layer.vertex_count()));
    }

    #[test]
    fn test_rounded_rect_filled_counts() {
        let (layer, vertices) = emit(|w| {
            w.add_rect_rounded_filled(
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 10.0),
                Color::WHITE,
                2.0,
                4,
            )
        });
        assert_eq!(vertices.len(), 21);
        assert_eq!(layer.indices().len(), 20 * 3);
        assert_eq!(layer.commands()[0].element_count, 60);
        assert_eq!(vertices[0].pos, [5.0, 5.0]);
        assert_indices_in_range(&layer);
    }

    #[test]
    fn test_rounded_rect_perimeter_stays_inside_bounds() {
        let (_, vertices) = emit(|w| {
            w.add_rect_rounded_filled(
                Vec2::new(0.0, 0.0),
                Vec2::new(20.0, 10.0),
                Color::WHITE,
                3.0,
                0,
            )
        });
        // default of 3 segments per corner
        assert_eq!(vertices.len(), 17);
        for v in &vertices {
            assert!(v.pos[0] >= -1e-4 && v.pos[0] <= 20.0 + 1e-4);
            assert!(v.pos[1] >= -1e-4 && v.pos[1] <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn test_circle_filled_counts() {
        for segments in [3u32, 12, 32] {
            let (layer, vertices) = emit(|w| {
                w.add_circle_filled(Vec2::new(50.0, 50.0), 10.0, Color::GREEN, segments)
            });
            assert_eq!(vertices.len() as u32, segments + 1);
            assert_eq!(layer.indices().len() as u32, 3 * segments);
            assert_indices_in_range(&layer);
        }
    }

    #[test]
    fn test_circle_outline_default_segments() {
        let (layer, vertices) =
            emit(|w| w.add_circle(Vec2::new(0.0, 0.0), 5.0, Color::WHITE, 0, 1.0));
        // 12 points plus the closing point: 12 segments of 4 vertices
        assert_eq!(vertices.len(), 48);
        assert_eq!(layer.indices().len(), 72);
    }

    #[test]
    fn test_rect_filled_uses_white_uv() {
        let (layer, vertices) =
            emit(|w| w.add_rect_filled(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), Color::WHITE));
        assert_eq!(layer.commands()[0].texture, TextureId(7));
        assert!(vertices.iter().all(|v| v.uv == [0.25, 0.5]));
        assert_eq!(vertices[1].pos, [1.0, 4.0]);
        assert_eq!(vertices[3].pos, [3.0, 2.0]);
        assert_eq!(layer.indices(), &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_solid_shapes_batch_into_one_command() {
        let (layer, vertices) = emit(|w| {
            w.add_rect_filled(Vec2::ZERO, Vec2::ONE, Color::WHITE);
            w.add_line(Vec2::ZERO, Vec2::new(5.0, 5.0), Color::RED, 1.0);
            w.add_triangle_filled(Vec2::ZERO, Vec2::ONE, Vec2::new(0.0, 1.0), Color::BLUE);
            w.add_circle_filled(Vec2::ZERO, 2.0, Color::WHITE, 8);
        });
        assert_eq!(layer.commands().len(), 1);
        assert_eq!(layer.commands()[0].element_count as usize, layer.indices().len());
        assert_eq!(layer.vertex_count() as usize, vertices.len());
        assert_indices_in_range(&layer);
    }

    #[test]
    fn test_image_breaks_batch() {
        let (layer, vertices) = emit(|w| {
            w.add_rect_filled(Vec2::ZERO, Vec2::ONE, Color::WHITE);
            w.add_image(TextureId(99), Vec2::ZERO, Vec2::new(4.0, 4.0));
            w.add_rect_filled(Vec2::ZERO, Vec2::ONE, Color::WHITE);
        });
        let textures: Vec<TextureId> = layer.commands().iter().map(|c| c.texture).collect();
        assert_eq!(textures, vec![TextureId(7), TextureId(99), TextureId(7)]);
        assert_eq!(vertices[5].uv, [0.0, 1.0]);
        assert_eq!(vertices[7].uv, [1.0, 0.0]);
    }

    #[test]
    fn test_bezier_endpoints() {
        let p0 = Vec2::new(0.0, 0.0);
        let p1 = Vec2::new(5.0, 10.0);
        let p2 = Vec2::new(10.0, 0.0);
        assert_eq!(bezier_quad_point(p0, p1, p2, 0.0), p0);
        assert_eq!(bezier_quad_point(p0, p1, p2, 1.0), p2);
        assert_eq!(bezier_quad_point(p0, p1, p2, 0.5), Vec2::new(5.0, 5.0));

        let (layer, _) = emit(|w| w.add_bezier_cubic(p0, p1, p1, p2, Color::WHITE, 1.0, 6));
        // 6 segments of 6 indices
        assert_eq!(layer.indices().len(), 36);
    }
}
