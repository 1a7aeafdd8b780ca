//! Render backend contract
//!
//! Backends turn [`DrawData`] and [`DrawList3D`] buffers into GPU draw calls.
//! The draw crate never talks to a graphics API itself.

use bitflags::bitflags;
use plume_core::{Mat4, TextureId};
use plume_text::FontAtlas;

use crate::drawlist::DrawData;
use crate::drawlist_3d::DrawList3D;

bitflags! {
    /// Pipeline state for 3D submissions
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Draw3DFlags: u32 {
        const NONE = 0;
        /// Test against the depth buffer
        const DEPTH_TEST = 1 << 0;
        /// Write to the depth buffer
        const DEPTH_WRITE = 1 << 1;
        /// Cull back-facing triangles
        const CULL_BACK = 1 << 2;
    }
}

/// Borrowed RGBA8 pixels to upload as a texture
#[derive(Clone, Copy, Debug)]
pub struct TextureImage<'a> {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes, rows top to bottom
    pub pixels: &'a [u8],
}

impl<'a> TextureImage<'a> {
    /// View of a built atlas' RGBA pixels
    pub fn from_atlas(atlas: &'a FontAtlas) -> Self {
        let (width, height) = atlas.size();
        Self {
            width,
            height,
            pixels: atlas.pixels_rgba32(),
        }
    }
}

/// Implemented by GPU backends
///
/// For every command a backend binds `command.texture`, sets the scissor to
/// `command.clip` (or the full viewport), and draws `element_count` indices
/// starting at `index_offset`.
pub trait RenderBackend {
    /// Upload an image and return the handle used by `add_image`
    fn register_texture(&mut self, image: TextureImage<'_>) -> TextureId;

    fn submit_drawlist(&mut self, data: DrawData<'_>, width: f32, height: f32, frame_index: u64);

    #[allow(clippy::too_many_arguments)]
    fn submit_drawlist_3d(
        &mut self,
        list: &DrawList3D,
        width: f32,
        height: f32,
        frame_index: u64,
        mvp: &Mat4,
        flags: Draw3DFlags,
    );
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Backend that records what it was given
    #[derive(Default)]
    pub(crate) struct RecordingBackend {
        pub textures: Vec<(u32, u32, usize)>,
        pub draw_calls: Vec<(u32, u32, TextureId)>,
        pub lines_3d: usize,
        pub flags_3d: Option<Draw3DFlags>,
    }

    impl RenderBackend for RecordingBackend {
        fn register_texture(&mut self, image: TextureImage<'_>) -> TextureId {
            self.textures
                .push((image.width, image.height, image.pixels.len()));
            TextureId(self.textures.len() as u64)
        }

        fn submit_drawlist(&mut self, data: DrawData<'_>, _: f32, _: f32, _: u64) {
            for command in data.commands {
                self.draw_calls
                    .push((command.index_offset, command.element_count, command.texture));
            }
        }

        fn submit_drawlist_3d(
            &mut self,
            list: &DrawList3D,
            _: f32,
            _: f32,
            _: u64,
            _: &Mat4,
            flags: Draw3DFlags,
        ) {
            self.lines_3d += list.line_indices().len() / 6;
            self.flags_3d = Some(flags);
        }
    }

    #[test]
    fn test_flags_combine() {
        let flags = Draw3DFlags::DEPTH_TEST | Draw3DFlags::DEPTH_WRITE;
        assert!(flags.contains(Draw3DFlags::DEPTH_TEST));
        assert!(!flags.contains(Draw3DFlags::CULL_BACK));
        assert_eq!(Draw3DFlags::default(), Draw3DFlags::NONE);
    }

    #[test]
    fn test_atlas_image_view() {
        let mut atlas = FontAtlas::new();
        atlas.add_default_font().unwrap();
        atlas.build().unwrap();

        let image = TextureImage::from_atlas(&atlas);
        assert_eq!(
            image.pixels.len(),
            (image.width * image.height * 4) as usize
        );

        let mut backend = RecordingBackend::default();
        assert_eq!(backend.register_texture(image), TextureId(1));
    }
}
