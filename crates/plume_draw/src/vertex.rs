//! GPU vertex formats
//!
//! Every vertex type is `#[repr(C)]` and implements `bytemuck::Pod`, so a
//! backend can upload a whole buffer with `bytemuck::cast_slice`.

/// 2D vertex shared by every layer of a draw list
///
/// Memory layout:
/// - pos: `vec2<f32>`   (8 bytes)
/// - uv: `vec2<f32>`    (8 bytes)
/// - color: `u32`       (4 bytes) - packed RGBA8, red in the low byte
/// Total: 20 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex2D {
    /// Screen position in pixels
    pub pos: [f32; 2],
    /// Atlas or image texture coordinates
    pub uv: [f32; 2],
    /// Packed RGBA8 color
    pub color: u32,
}

/// Vertex for filled 3D triangles
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    pub pos: [f32; 3],
    pub color: u32,
}

/// Vertex for 3D lines expanded to screen-space quads in the vertex shader
///
/// Each line becomes four vertices. The shader projects both `pos` and
/// `other`, then offsets along the screen-space normal by
/// `direction * thickness`.
///
/// Memory layout:
/// - pos: `vec3<f32>`    (12 bytes)
/// - direction: `f32`    (4 bytes)
/// - thickness: `f32`    (4 bytes)
/// - multiply: `f32`     (4 bytes)
/// - other: `vec3<f32>`  (12 bytes)
/// - color: `u32`        (4 bytes)
/// Total: 40 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex3D {
    /// This endpoint
    pub pos: [f32; 3],
    /// Side of the line this vertex is pushed to (-1 or 1)
    pub direction: f32,
    /// Line thickness in pixels
    pub thickness: f32,
    /// Flips the normal for the far endpoint (-1 or 1)
    pub multiply: f32,
    /// The opposite endpoint
    pub other: [f32; 3],
    /// Packed RGBA8 color
    pub color: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_sizes_match_shader_layouts() {
        assert_eq!(std::mem::size_of::<Vertex2D>(), 20);
        assert_eq!(std::mem::size_of::<Vertex3D>(), 16);
        assert_eq!(std::mem::size_of::<LineVertex3D>(), 40);
    }

    #[test]
    fn test_cast_to_bytes() {
        let vertices = [Vertex2D {
            pos: [1.0, 2.0],
            uv: [0.0, 0.0],
            color: 0xFF00_00FF,
        }];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 20);
        assert_eq!(&bytes[16..20], &0xFF00_00FFu32.to_ne_bytes());
    }
}
