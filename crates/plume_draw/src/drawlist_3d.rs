//! 3D debug geometry
//!
//! No layers or clipping: filled triangles and thick lines go straight into
//! two vertex/index buffer pairs that a backend draws with a view-projection
//! matrix. Lines are expanded to quads on the GPU from [`LineVertex3D`].

use plume_core::{Color, Mat4, Vec3};

use crate::primitives::DEFAULT_CURVE_SEGMENTS;
use crate::vertex::{LineVertex3D, Vertex3D};

#[derive(Debug, Default)]
pub struct DrawList3D {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    line_vertices: Vec<LineVertex3D>,
    line_indices: Vec<u32>,
}

impl DrawList3D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn line_vertices(&self) -> &[LineVertex3D] {
        &self.line_vertices
    }

    pub fn line_indices(&self) -> &[u32] {
        &self.line_indices
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty() && self.line_indices.is_empty()
    }

    /// Drop all geometry, keeping capacity
    pub fn new_frame(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.line_vertices.clear();
        self.line_indices.clear();
    }

    pub fn add_triangle_filled(&mut self, p0: Vec3, p1: Vec3, p2: Vec3, color: Color) {
        let color = color.pack();
        let start = self.vertices.len() as u32;
        self.vertices.extend([p0, p1, p2].map(|p| Vertex3D {
            pos: p.into(),
            color,
        }));
        self.indices.extend_from_slice(&[start, start + 1, start + 2]);
    }

    pub fn add_line(&mut self, p0: Vec3, p1: Vec3, color: Color, thickness: f32) {
        let color = color.pack();
        let near = LineVertex3D {
            pos: p0.into(),
            direction: -1.0,
            thickness,
            multiply: 1.0,
            other: p1.into(),
            color,
        };
        let far = LineVertex3D {
            pos: p1.into(),
            direction: -1.0,
            thickness,
            multiply: -1.0,
            other: p0.into(),
            color,
        };

        let start = self.line_vertices.len() as u32;
        self.line_vertices.reserve(4);
        self.line_vertices.push(near);
        self.line_vertices.push(far);
        self.line_vertices.push(LineVertex3D {
            direction: 1.0,
            ..far
        });
        self.line_vertices.push(LineVertex3D {
            direction: 1.0,
            ..near
        });
        self.line_indices.extend_from_slice(&[
            start,
            start + 1,
            start + 2,
            start,
            start + 2,
            start + 3,
        ]);
    }

    /// Three axis-aligned lines of length `size` crossing at `p`
    pub fn add_point(&mut self, p: Vec3, color: Color, size: f32, thickness: f32) {
        let half = size / 2.0;
        for axis in [Vec3::new(half, 0.0, 0.0), Vec3::new(0.0, half, 0.0), Vec3::new(0.0, 0.0, half)] {
            self.add_line(p - axis, p + axis, color, thickness);
        }
    }

    /// X, Y and Z axes of `transform` in red, green and blue
    pub fn add_transform(&mut self, transform: &Mat4, length: f32, thickness: f32) {
        let origin = transform.transform_point(Vec3::ZERO);
        let axes = [
            (Vec3::new(length, 0.0, 0.0), Color::RED),
            (Vec3::new(0.0, length, 0.0), Color::GREEN),
            (Vec3::new(0.0, 0.0, length), Color::BLUE),
        ];
        for (axis, color) in axes {
            self.add_line(origin, transform.transform_point(axis), color, thickness);
        }
    }

    /// Wireframe of a perspective frustum looking down +Z in `transform`'s space
    #[allow(clippy::too_many_arguments)]
    pub fn add_frustum(
        &mut self,
        transform: &Mat4,
        y_fov: f32,
        aspect: f32,
        near_z: f32,
        far_z: f32,
        color: Color,
        thickness: f32,
    ) {
        let tan_half = (y_fov / 2.0).tan();
        let (near_h, far_h) = (tan_half * near_z, tan_half * far_z);
        let (near_w, far_w) = (near_h * aspect, far_h * aspect);

        let corners = [
            Vec3::new(near_w, near_h, near_z),
            Vec3::new(near_w, -near_h, near_z),
            Vec3::new(-near_w, -near_h, near_z),
            Vec3::new(-near_w, near_h, near_z),
            Vec3::new(far_w, far_h, far_z),
            Vec3::new(far_w, -far_h, far_z),
            Vec3::new(-far_w, -far_h, far_z),
            Vec3::new(-far_w, far_h, far_z),
        ]
        .map(|p| transform.transform_point(p));

        self.add_box_edges(&corners, color, thickness);
    }

    pub fn add_centered_box(
        &mut self,
        center: Vec3,
        width: f32,
        height: f32,
        depth: f32,
        color: Color,
        thickness: f32,
    ) {
        let (hw, hh, hd) = (width / 2.0, height / 2.0, depth / 2.0);
        let corners = [
            Vec3::new(-hw, hh, -hd),
            Vec3::new(-hw, -hh, -hd),
            Vec3::new(hw, -hh, -hd),
            Vec3::new(hw, hh, -hd),
            Vec3::new(-hw, hh, hd),
            Vec3::new(-hw, -hh, hd),
            Vec3::new(hw, -hh, hd),
            Vec3::new(hw, hh, hd),
        ]
        .map(|offset| center + offset);

        self.add_box_edges(&corners, color, thickness);
    }

    /// Quadratic bezier as a chain of lines
    pub fn add_bezier_quad(
        &mut self,
        p0: Vec3,
        p1: Vec3,
        p2: Vec3,
        color: Color,
        thickness: f32,
        segments: u32,
    ) {
        self.add_curve(p0, p2, color, thickness, segments, |t| {
            let u = 1.0 - t;
            p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
        });
    }

    /// Cubic bezier as a chain of lines
    #[allow(clippy::too_many_arguments)]
    pub fn add_bezier_cubic(
        &mut self,
        p0: Vec3,
        p1: Vec3,
        p2: Vec3,
        p3: Vec3,
        color: Color,
        thickness: f32,
        segments: u32,
    ) {
        self.add_curve(p0, p3, color, thickness, segments, |t| {
            let u = 1.0 - t;
            let (uu, tt) = (u * u, t * t);
            p0 * (uu * u) + p1 * (3.0 * uu * t) + p2 * (3.0 * u * tt) + p3 * (tt * t)
        });
    }

    fn add_curve(
        &mut self,
        start: Vec3,
        end: Vec3,
        color: Color,
        thickness: f32,
        segments: u32,
        point_at: impl Fn(f32) -> Vec3,
    ) {
        let segments = if segments == 0 { DEFAULT_CURVE_SEGMENTS } else { segments };
        let mut previous = start;
        for i in 1..segments {
            let next = point_at(i as f32 / segments as f32);
            self.add_line(previous, next, color, thickness);
            previous = next;
        }
        self.add_line(previous, end, color, thickness);
    }

    /// Twelve edges of a hexahedron: near face 0-3, far face 4-7
    fn add_box_edges(&mut self, corners: &[Vec3; 8], color: Color, thickness: f32) {
        const EDGES: [(usize, usize); 12] = [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
        ];
        for (a, b) in EDGES {
            self.add_line(corners[a], corners[b], color, thickness);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_vertex_layout() {
        let mut list = DrawList3D::new();
        let p0 = Vec3::new(0.0, 0.0, 0.0);
        let p1 = Vec3::new(1.0, 2.0, 3.0);
        list.add_line(p0, p1, Color::WHITE, 2.0);

        let v = list.line_vertices();
        assert_eq!(v.len(), 4);
        assert_eq!((v[0].pos, v[0].direction, v[0].multiply), ([0.0, 0.0, 0.0], -1.0, 1.0));
        assert_eq!((v[1].pos, v[1].direction, v[1].multiply), ([1.0, 2.0, 3.0], -1.0, -1.0));
        assert_eq!((v[2].pos, v[2].direction, v[2].multiply), ([1.0, 2.0, 3.0], 1.0, -1.0));
        assert_eq!((v[3].pos, v[3].direction, v[3].multiply), ([0.0, 0.0, 0.0], 1.0, 1.0));
        assert_eq!(v[0].other, [1.0, 2.0, 3.0]);
        assert_eq!(list.line_indices(), &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_shape_line_counts() {
        let mut list = DrawList3D::new();
        list.add_point(Vec3::ZERO, Color::WHITE, 1.0, 1.0);
        assert_eq!(list.line_vertices().len(), 3 * 4);

        list.new_frame();
        list.add_centered_box(Vec3::ZERO, 1.0, 2.0, 3.0, Color::WHITE, 1.0);
        assert_eq!(list.line_vertices().len(), 12 * 4);

        list.new_frame();
        list.add_frustum(&Mat4::IDENTITY, 1.0, 1.5, 0.1, 10.0, Color::WHITE, 1.0);
        assert_eq!(list.line_indices().len(), 12 * 6);

        list.new_frame();
        list.add_bezier_quad(Vec3::ZERO, Vec3::ONE, Vec3::new(2.0, 0.0, 0.0), Color::WHITE, 1.0, 0);
        assert_eq!(list.line_vertices().len(), 12 * 4);
    }

    #[test]
    fn test_transform_axes_start_at_origin() {
        let mut list = DrawList3D::new();
        list.add_transform(&Mat4::translation(1.0, 2.0, 3.0), 2.0, 1.0);
        let v = list.line_vertices();
        assert_eq!(v.len(), 12);
        assert_eq!(v[0].pos, [1.0, 2.0, 3.0]);
        assert_eq!(v[0].other, [3.0, 2.0, 3.0]);
        assert_eq!(v[0].color, Color::RED.pack());
    }

    #[test]
    fn test_frustum_near_corner() {
        let mut list = DrawList3D::new();
        let fov = std::f32::consts::FRAC_PI_2;
        list.add_frustum(&Mat4::IDENTITY, fov, 2.0, 1.0, 10.0, Color::WHITE, 1.0);
        let first = list.line_vertices()[0].pos;
        assert!((first[0] - 2.0).abs() < 1e-5);
        assert!((first[1] - 1.0).abs() < 1e-5);
        assert_eq!(first[2], 1.0);
    }

    #[test]
    fn test_triangles_and_new_frame() {
        let mut list = DrawList3D::new();
        list.add_triangle_filled(Vec3::ZERO, Vec3::ONE, Vec3::new(1.0, 0.0, 0.0), Color::BLUE);
        list.add_triangle_filled(Vec3::ZERO, Vec3::ONE, Vec3::new(0.0, 1.0, 0.0), Color::BLUE);
        assert_eq!(list.indices(), &[0, 1, 2, 3, 4, 5]);
        assert!(!list.is_empty());
        list.new_frame();
        assert!(list.is_empty());
        assert!(list.vertices().is_empty());
    }
}
