//! Text emitters
//!
//! Glyph placement comes from [`Font::layout`], the same walker that text
//! measurement uses, so emitted quads always match measured sizes.

use plume_core::{Color, Rect, Vec2};
use plume_text::font::PlacedGlyph;
use plume_text::Font;

use crate::layer::LayerWriter;

impl LayerWriter<'_> {
    /// Draw `text` with its first line's top at `pos`
    ///
    /// `size` of 0 uses the font's configured size. A positive `wrap` breaks
    /// lines whose glyphs would pass `pos.x + wrap`.
    ///
    /// # Panics
    ///
    /// Panics on a character outside every range the font was built with.
    pub fn add_text(
        &mut self,
        font: &Font,
        size: f32,
        pos: Vec2,
        color: Color,
        text: &str,
        wrap: f32,
    ) {
        self.add_text_ex(font, size, pos, color, text.as_bytes(), wrap);
    }

    /// Byte-oriented [`add_text`](Self::add_text); malformed UTF-8 ends the run
    pub fn add_text_ex(
        &mut self,
        font: &Font,
        size: f32,
        pos: Vec2,
        color: Color,
        text: &[u8],
        wrap: f32,
    ) {
        let color = color.pack();
        for glyph in font.layout(size, pos, text, wrap) {
            if glyph.c != ' ' {
                self.add_glyph(&glyph, font.is_sdf(), color);
            }
        }
    }

    /// Draw `text`, dropping glyphs whose advanced pen leaves the clip box
    #[allow(clippy::too_many_arguments)]
    pub fn add_text_clipped(
        &mut self,
        font: &Font,
        size: f32,
        pos: Vec2,
        clip_min: Vec2,
        clip_max: Vec2,
        color: Color,
        text: &str,
        wrap: f32,
    ) {
        self.add_text_clipped_ex(font, size, pos, clip_min, clip_max, color, text.as_bytes(), wrap);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_text_clipped_ex(
        &mut self,
        font: &Font,
        size: f32,
        pos: Vec2,
        clip_min: Vec2,
        clip_max: Vec2,
        color: Color,
        text: &[u8],
        wrap: f32,
    ) {
        let clip = Rect::new(clip_min, clip_max);
        let color = color.pack();
        for glyph in font.layout(size, pos, text, wrap) {
            if glyph.c != ' ' && clip.contains(glyph.pen) {
                self.add_glyph(&glyph, font.is_sdf(), color);
            }
        }
    }

    fn add_glyph(&mut self, glyph: &PlacedGlyph, sdf: bool, color: u32) {
        self.prepare_draw_command(self.atlas.texture, sdf);
        self.reserve_triangles(6, 4);

        let (quad, uv) = (glyph.quad, glyph.uv);
        let start = self.vertex_start();
        self.add_vertex(quad.min, color, uv.min.into());
        self.add_vertex(Vec2::new(quad.max.x, quad.min.y), color, [uv.max.x, uv.min.y]);
        self.add_vertex(quad.max, color, uv.max.into());
        self.add_vertex(Vec2::new(quad.min.x, quad.max.y), color, [uv.min.x, uv.max.y]);
        self.add_index(start, 1, 0, 2);
        self.add_index(start, 2, 0, 3);
    }
}
