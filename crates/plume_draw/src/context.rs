//! Draw context: owns draw lists and drives their frame lifecycle

use plume_core::Mat4;
use plume_text::FontAtlas;

use crate::backend::{Draw3DFlags, RenderBackend, TextureImage};
use crate::drawlist::DrawList;
use crate::drawlist_3d::DrawList3D;
use crate::layer::AtlasBinding;

/// Handle to a 2D list registered with a [`DrawContext`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DrawListId(usize);

/// Handle to a 3D list registered with a [`DrawContext`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DrawList3DId(usize);

/// Registry of draw lists sharing one font atlas binding
///
/// One context is one drawing session. Dropping it frees every list.
#[derive(Debug, Default)]
pub struct DrawContext {
    drawlists: Vec<DrawList>,
    drawlists_3d: Vec<DrawList3D>,
    atlas: AtlasBinding,
    frame_count: u64,
}

impl DrawContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_drawlist(&mut self) -> DrawListId {
        self.drawlists.push(DrawList::with_atlas(self.atlas));
        DrawListId(self.drawlists.len() - 1)
    }

    pub fn register_drawlist_3d(&mut self) -> DrawList3DId {
        self.drawlists_3d.push(DrawList3D::new());
        DrawList3DId(self.drawlists_3d.len() - 1)
    }

    pub fn drawlist(&self, id: DrawListId) -> &DrawList {
        &self.drawlists[id.0]
    }

    pub fn drawlist_mut(&mut self, id: DrawListId) -> &mut DrawList {
        &mut self.drawlists[id.0]
    }

    pub fn drawlist_3d(&self, id: DrawList3DId) -> &DrawList3D {
        &self.drawlists_3d[id.0]
    }

    pub fn drawlist_3d_mut(&mut self, id: DrawList3DId) -> &mut DrawList3D {
        &mut self.drawlists_3d[id.0]
    }

    /// Frames started so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn atlas(&self) -> AtlasBinding {
        self.atlas
    }

    /// Bind a built atlas to every current and future list
    pub fn set_font_atlas(&mut self, atlas: &FontAtlas) {
        self.atlas = AtlasBinding {
            texture: atlas.texture(),
            white_uv: atlas.white_uv(),
        };
        for list in &mut self.drawlists {
            list.set_atlas(self.atlas);
        }
        tracing::debug!(texture = ?self.atlas.texture, "font atlas bound");
    }

    /// Upload a built atlas through `backend`, then bind it
    pub fn upload_font_atlas(&mut self, backend: &mut dyn RenderBackend, atlas: &mut FontAtlas) {
        let texture = backend.register_texture(TextureImage::from_atlas(atlas));
        atlas.set_texture(texture);
        self.set_font_atlas(atlas);
    }

    /// Reset every list for a new frame
    pub fn new_frame(&mut self) {
        for list in &mut self.drawlists {
            list.new_frame();
        }
        for list in &mut self.drawlists_3d {
            list.new_frame();
        }
        self.frame_count += 1;
    }

    /// Merge and hand a 2D list to `backend`
    pub fn submit(&mut self, backend: &mut dyn RenderBackend, id: DrawListId, width: f32, height: f32) {
        let frame = self.frame_count;
        let data = self.drawlists[id.0].build_draw_data();
        backend.submit_drawlist(data, width, height, frame);
    }

    pub fn submit_3d(
        &mut self,
        backend: &mut dyn RenderBackend,
        id: DrawList3DId,
        width: f32,
        height: f32,
        mvp: &Mat4,
        flags: Draw3DFlags,
    ) {
        backend.submit_drawlist_3d(&self.drawlists_3d[id.0], width, height, self.frame_count, mvp, flags);
    }
}

#[cfg(test)]
mod tests {
    use plume_core::{Color, Rect, TextureId, Vec2, Vec3};

    use super::*;
    use crate::backend::tests::RecordingBackend;

    #[test]
    fn test_new_frame_resets_lists_and_counts() {
        let mut ctx = DrawContext::new();
        let id = ctx.register_drawlist();
        let id_3d = ctx.register_drawlist_3d();

        let list = ctx.drawlist_mut(id);
        let layer = list.request_layer("main");
        list.layer(layer)
            .add_rect_filled(Vec2::ZERO, Vec2::ONE, Color::WHITE);
        list.submit_layer(layer);
        ctx.drawlist_3d_mut(id_3d)
            .add_line(Vec3::ZERO, Vec3::ONE, Color::WHITE, 1.0);

        ctx.new_frame();
        assert_eq!(ctx.frame_count(), 1);
        assert!(ctx.drawlist(id).vertices().is_empty());
        assert_eq!(ctx.drawlist(id).index_buffer_byte_size(), 0);
        assert!(ctx.drawlist_3d(id_3d).is_empty());
    }

    #[test]
    fn test_atlas_binding_reaches_all_lists() {
        let mut atlas = FontAtlas::new();
        atlas.add_default_font().unwrap();
        atlas.build().unwrap();

        let mut ctx = DrawContext::new();
        let before = ctx.register_drawlist();
        let mut backend = RecordingBackend::default();
        ctx.upload_font_atlas(&mut backend, &mut atlas);
        let after = ctx.register_drawlist();

        assert_eq!(atlas.texture(), TextureId(1));
        for id in [before, after] {
            assert_eq!(ctx.drawlist(id).atlas().texture, TextureId(1));
            assert_eq!(ctx.drawlist(id).atlas().white_uv, atlas.white_uv());
        }
    }

    #[test]
    fn test_submit_issues_one_call_per_command() {
        let mut ctx = DrawContext::new();
        let id = ctx.register_drawlist();
        let list = ctx.drawlist_mut(id);
        let layer = list.request_layer("main");
        list.layer(layer)
            .add_rect_filled(Vec2::ZERO, Vec2::ONE, Color::WHITE);
        list.push_clip_rect(Rect::new(Vec2::ZERO, Vec2::new(4.0, 4.0)), true);
        list.layer(layer)
            .add_rect_filled(Vec2::ZERO, Vec2::ONE, Color::WHITE);
        list.pop_clip_rect();
        list.submit_layer(layer);

        let mut backend = RecordingBackend::default();
        ctx.submit(&mut backend, id, 800.0, 600.0);
        assert_eq!(
            backend.draw_calls,
            vec![(0, 6, TextureId::NONE), (6, 6, TextureId::NONE)]
        );

        let id_3d = ctx.register_drawlist_3d();
        ctx.drawlist_3d_mut(id_3d)
            .add_centered_box(Vec3::ZERO, 1.0, 1.0, 1.0, Color::WHITE, 1.0);
        ctx.submit_3d(&mut backend, id_3d, 800.0, 600.0, &Mat4::IDENTITY, Draw3DFlags::DEPTH_TEST);
        assert_eq!(backend.lines_3d, 12);
        assert_eq!(backend.flags_3d, Some(Draw3DFlags::DEPTH_TEST));
    }
}
