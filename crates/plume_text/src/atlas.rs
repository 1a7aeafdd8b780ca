//! Font atlas
//!
//! Packs the glyphs of every added font into one shared texture. Regular
//! glyphs are rasterized with their font's oversampling and packed first;
//! SDF glyphs and the reserved white patch are packed afterwards at 1x into
//! the same region. Adding a font marks the atlas dirty and the next
//! [`FontAtlas::build`] starts over from scratch.

use std::path::Path;
use std::sync::Arc;

use plume_core::TextureId;

use crate::config::{FontConfig, FontRange};
use crate::default_font::{default_font_config, default_font_data};
use crate::font::{Font, FontFace, FontGlyph};
use crate::packer::{PackRect, RectPacker};
use crate::rasterizer::{
    oversample_shift, prefilter_h, prefilter_v, GlyphRasterizer, RasterizedGlyph, SdfParams,
};
use crate::{Result, TextError};

/// Pixels left between packed glyphs
const GLYPH_PADDING: u32 = 1;
/// Side of the solid white patch used for untextured fills
const WHITE_RECT_SIZE: u32 = 8;
/// Packing height limit
const MAX_ATLAS_HEIGHT: u32 = 1024 * 32;

/// Handle to a font added to a [`FontAtlas`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub usize);

/// A font as added, before baking
struct FontSource {
    config: FontConfig,
    face: FontFace,
}

/// Per-glyph data gathered before packing
struct PreparedGlyph {
    code_point: u32,
    bitmap: RasterizedGlyph,
    x_advance: f32,
    left_bearing: f32,
    /// Index into the font's own rects, or into the shared custom rects for SDF
    rect: usize,
}

/// Per-font data gathered before packing
struct PreparedFont {
    ascent: f32,
    descent: f32,
    line_spacing: f32,
    ranges: Vec<FontRange>,
    max_code_point: u32,
    glyphs: Vec<PreparedGlyph>,
    /// Regular glyph rects (empty for SDF fonts)
    rects: Vec<PackRect>,
}

/// Shared texture holding the glyphs of every font
pub struct FontAtlas {
    sources: Vec<FontSource>,
    fonts: Vec<Arc<Font>>,
    width: u32,
    height: u32,
    pixels_alpha8: Vec<u8>,
    pixels_rgba32: Vec<u8>,
    white_uv: [f32; 2],
    texture: TextureId,
    dirty: bool,
}

impl FontAtlas {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            fonts: Vec::new(),
            width: 0,
            height: 0,
            pixels_alpha8: Vec::new(),
            pixels_rgba32: Vec::new(),
            white_uv: [0.0, 0.0],
            texture: TextureId::NONE,
            dirty: false,
        }
    }

    /// Add a font from TTF/OTF bytes
    pub fn add_font_from_memory(&mut self, config: FontConfig, data: Vec<u8>) -> Result<FontId> {
        let face = FontFace::from_data(data)?;
        Ok(self.add_face(config, face))
    }

    /// Add a font from a TTF/OTF file
    pub fn add_font_from_file(&mut self, config: FontConfig, path: impl AsRef<Path>) -> Result<FontId> {
        let face = FontFace::from_file(path.as_ref())?;
        Ok(self.add_face(config, face))
    }

    /// Add the embedded ProggyClean font at 13px
    pub fn add_default_font(&mut self) -> Result<FontId> {
        let data = default_font_data()?;
        self.add_font_from_memory(default_font_config(), data)
    }

    fn add_face(&mut self, config: FontConfig, face: FontFace) -> FontId {
        debug_assert!(config.h_oversample >= 1 && config.v_oversample >= 1);
        self.sources.push(FontSource { config, face });
        self.dirty = true;
        FontId(self.sources.len() - 1)
    }

    /// Whether fonts were added since the last build
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of fonts added
    pub fn font_count(&self) -> usize {
        self.sources.len()
    }

    /// Baked font, available after [`build`](Self::build)
    pub fn font(&self, id: FontId) -> Option<Arc<Font>> {
        self.fonts.get(id.0).cloned()
    }

    pub fn fonts(&self) -> &[Arc<Font>] {
        &self.fonts
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels_alpha8(&self) -> &[u8] {
        &self.pixels_alpha8
    }

    /// RGBA8 pixels: white RGB with coverage in alpha
    pub fn pixels_rgba32(&self) -> &[u8] {
        &self.pixels_rgba32
    }

    /// Texture coordinate of the solid white patch
    pub fn white_uv(&self) -> [f32; 2] {
        self.white_uv
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    /// Record the backend handle the pixels were uploaded to
    pub fn set_texture(&mut self, texture: TextureId) {
        self.texture = texture;
    }

    /// Drop every font and the baked texture data
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    fn prepare_font(
        rasterizer: &mut GlyphRasterizer,
        source: &FontSource,
        custom_rects: &mut Vec<(PackRect, usize, usize)>,
        font_index: usize,
        area: &mut u64,
    ) -> Result<PreparedFont> {
        let config = &source.config;
        let face = &source.face;
        let metrics = *face.metrics();

        let scale = face.scale_for_size(config.font_size);
        let ascent = (metrics.ascender as f32 * scale + 1.0).floor();
        let descent = (metrics.descender as f32 * scale + 1.0).floor();
        let line_spacing = ascent - descent + scale * metrics.line_gap as f32;

        let ranges = config.effective_ranges();
        let max_code_point = ranges.iter().map(FontRange::end).max().unwrap_or(0);

        let h_over = config.h_oversample.max(1);
        let v_over = config.v_oversample.max(1);
        let sdf = SdfParams {
            padding: config.sdf_padding,
            on_edge_value: config.on_edge_value,
            pixel_dist_scale: config.pixel_dist_scale(),
        };

        let mut glyphs = Vec::new();
        let mut rects = Vec::new();
        let mut missing_glyph_added = false;

        for range in &ranges {
            for code_point in range.first_code_point..range.end() {
                let glyph_id = char::from_u32(code_point)
                    .map(|c| face.glyph_index(c))
                    .unwrap_or(0);
                let (advance, bearing) = face.h_metrics(glyph_id);

                if config.sdf {
                    let bitmap = rasterizer.rasterize_sdf(face, glyph_id, scale, sdf)?;
                    let rect = PackRect::new(bitmap.width, bitmap.height);
                    *area += (rect.w * rect.h) as u64;
                    custom_rects.push((rect, font_index, glyphs.len()));
                    glyphs.push(PreparedGlyph {
                        code_point,
                        bitmap,
                        x_advance: advance as f32 * scale,
                        left_bearing: bearing as f32 * scale,
                        rect: custom_rects.len() - 1,
                    });
                    continue;
                }

                // Only the first missing glyph gets atlas space
                let duplicate_missing = glyph_id == 0 && missing_glyph_added;
                if glyph_id == 0 {
                    missing_glyph_added = true;
                }

                let (bitmap, rect) = if duplicate_missing {
                    (RasterizedGlyph::default(), PackRect::new(0, 0))
                } else {
                    let bitmap = rasterizer.rasterize(face, glyph_id, scale, h_over, v_over)?;
                    let rect = PackRect::new(
                        bitmap.width + GLYPH_PADDING + h_over - 1,
                        bitmap.height + GLYPH_PADDING + v_over - 1,
                    );
                    (bitmap, rect)
                };
                *area += (rect.w * rect.h) as u64;
                rects.push(rect);
                glyphs.push(PreparedGlyph {
                    code_point,
                    bitmap,
                    x_advance: if duplicate_missing { 0.0 } else { advance as f32 * scale },
                    left_bearing: bearing as f32 * scale,
                    rect: rects.len() - 1,
                });
            }
        }

        Ok(PreparedFont {
            ascent,
            descent,
            line_spacing,
            ranges,
            max_code_point,
            glyphs,
            rects,
        })
    }

    /// Rasterize and pack every font into a fresh texture
    pub fn build(&mut self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(TextError::NoFonts);
        }

        let mut rasterizer = GlyphRasterizer::new();
        let mut area: u64 = 0;
        // (rect, owning font, glyph index); the white patch is pushed last
        let mut custom_rects: Vec<(PackRect, usize, usize)> = Vec::new();
        let mut prepared = Vec::with_capacity(self.sources.len());
        for (i, source) in self.sources.iter().enumerate() {
            prepared.push(Self::prepare_font(
                &mut rasterizer,
                source,
                &mut custom_rects,
                i,
                &mut area,
            )?);
        }

        let white_index = custom_rects.len();
        custom_rects.push((PackRect::new(WHITE_RECT_SIZE, WHITE_RECT_SIZE), usize::MAX, 0));
        area += (WHITE_RECT_SIZE * WHITE_RECT_SIZE) as u64;

        // Width from a fixed ladder against a 70% fill factor
        let area_sqrt = (area as f32).sqrt() + 1.0;
        let width = if area_sqrt >= 4096.0 * 0.7 {
            4096
        } else if area_sqrt >= 2048.0 * 0.7 {
            2048
        } else if area_sqrt >= 1024.0 * 0.7 {
            1024
        } else {
            512
        };

        let mut packer = RectPacker::new(width, MAX_ATLAS_HEIGHT);
        let mut height = 0u32;
        let mut packed = true;

        for font in prepared.iter_mut() {
            packed &= packer.pack(&mut font.rects);
            for rect in font.rects.iter().filter(|r| r.was_packed) {
                height = height.max(rect.bottom());
            }
        }

        let mut custom: Vec<PackRect> = custom_rects.iter().map(|(r, _, _)| *r).collect();
        packed &= packer.pack(&mut custom);
        for rect in custom.iter().filter(|r| r.was_packed) {
            height = height.max(rect.bottom());
        }

        if !packed {
            return Err(TextError::AtlasFull {
                needed: packer.used_height(),
                limit: MAX_ATLAS_HEIGHT,
            });
        }

        self.width = width;
        self.height = height.max(1);
        self.pixels_alpha8 = vec![0; (self.width * self.height) as usize];

        // Regular glyphs
        for (font, source) in prepared.iter().zip(&self.sources) {
            let h_over = source.config.h_oversample.max(1);
            let v_over = source.config.v_oversample.max(1);
            for glyph in &font.glyphs {
                let rect = font.rects[glyph.rect];
                if rect.w == 0 || rect.h == 0 {
                    continue;
                }
                let rw = (rect.w - GLYPH_PADDING) as usize;
                let rh = (rect.h - GLYPH_PADDING) as usize;
                let mut region = vec![0u8; rw * rh];
                let bw = glyph.bitmap.width as usize;
                for row in 0..glyph.bitmap.height as usize {
                    region[row * rw..row * rw + bw]
                        .copy_from_slice(&glyph.bitmap.bitmap[row * bw..(row + 1) * bw]);
                }
                prefilter_h(&mut region, rw, rw, rh, h_over as usize);
                prefilter_v(&mut region, rw, rw, rh, v_over as usize);
                blit(&mut self.pixels_alpha8, width, rect.x, rect.y, rw, rh, &region);
            }
        }

        // SDF glyphs and the white patch
        for (i, (_, owner, glyph_index)) in custom_rects.iter().enumerate() {
            let rect = custom[i];
            if i == white_index {
                let white = vec![255u8; (WHITE_RECT_SIZE * WHITE_RECT_SIZE) as usize];
                blit(&mut self.pixels_alpha8, width, rect.x, rect.y, rect.w as usize, rect.h as usize, &white);
                continue;
            }
            let bitmap = &prepared[*owner].glyphs[*glyph_index].bitmap;
            if !bitmap.is_empty() {
                let (w, h) = (bitmap.width as usize, bitmap.height as usize);
                blit(&mut self.pixels_alpha8, width, rect.x, rect.y, w, h, &bitmap.bitmap);
            }
        }

        let white = custom[white_index];
        self.white_uv = [
            (white.x + white.w / 2) as f32 / self.width as f32,
            (white.y + white.h / 2) as f32 / self.height as f32,
        ];

        // Glyph tables
        let (atlas_w, atlas_h) = (self.width as f32, self.height as f32);
        let mut fonts = Vec::with_capacity(prepared.len());
        for (font, source) in prepared.into_iter().zip(&self.sources) {
            let config = &source.config;
            let h_over = config.h_oversample.max(1);
            let v_over = config.v_oversample.max(1);
            let mut code_points = vec![0u32; font.max_code_point as usize];
            let mut glyphs = Vec::with_capacity(font.glyphs.len());

            for glyph in &font.glyphs {
                let record = if config.sdf && glyph.bitmap.is_empty() {
                    FontGlyph {
                        x_advance: glyph.x_advance,
                        left_bearing: glyph.left_bearing,
                        ..Default::default()
                    }
                } else if config.sdf {
                    let rect = custom[glyph.rect];
                    let half_texel = 0.5 / atlas_h;
                    let b = &glyph.bitmap;
                    FontGlyph {
                        x0: b.left as f32,
                        y0: b.top as f32 + font.ascent,
                        x1: (b.left + b.width as i32) as f32,
                        y1: (b.top + b.height as i32) as f32 + font.ascent,
                        u0: rect.x as f32 / atlas_w,
                        v0: rect.y as f32 / atlas_h + half_texel,
                        u1: (rect.x + rect.w) as f32 / atlas_w,
                        v1: (rect.y + rect.h) as f32 / atlas_h - half_texel,
                        x_advance: glyph.x_advance,
                        left_bearing: glyph.left_bearing,
                    }
                } else {
                    let rect = font.rects[glyph.rect];
                    if rect.w == 0 || rect.h == 0 {
                        FontGlyph {
                            left_bearing: glyph.left_bearing,
                            ..Default::default()
                        }
                    } else {
                        let rw = rect.w - GLYPH_PADDING;
                        let rh = rect.h - GLYPH_PADDING;
                        let sub_x = oversample_shift(h_over);
                        let sub_y = oversample_shift(v_over);
                        let b = &glyph.bitmap;
                        FontGlyph {
                            x0: b.left as f32 / h_over as f32 + sub_x,
                            y0: b.top as f32 / v_over as f32 + sub_y + font.ascent,
                            x1: (b.left + rw as i32) as f32 / h_over as f32 + sub_x,
                            y1: (b.top + rh as i32) as f32 / v_over as f32 + sub_y + font.ascent,
                            u0: rect.x as f32 / atlas_w,
                            v0: rect.y as f32 / atlas_h,
                            u1: (rect.x + rw) as f32 / atlas_w,
                            v1: (rect.y + rh) as f32 / atlas_h,
                            x_advance: glyph.x_advance,
                            left_bearing: glyph.left_bearing,
                        }
                    }
                };
                code_points[glyph.code_point as usize] = glyphs.len() as u32;
                glyphs.push(record);
            }

            fonts.push(Arc::new(Font {
                config: config.clone(),
                ranges: font.ranges,
                ascent: font.ascent,
                descent: font.descent,
                line_spacing: font.line_spacing,
                code_points,
                glyphs,
            }));
        }
        self.fonts = fonts;

        self.pixels_rgba32 = self
            .pixels_alpha8
            .iter()
            .flat_map(|&a| [255, 255, 255, a])
            .collect();
        self.dirty = false;

        tracing::debug!(
            "Built font atlas: {} fonts, {} glyphs, {}x{}",
            self.fonts.len(),
            self.fonts.iter().map(|f| f.glyphs.len()).sum::<usize>(),
            self.width,
            self.height
        );
        Ok(())
    }
}

/// Copy a `w`x`h` bitmap into `pixels` at (`x`, `y`)
fn blit(pixels: &mut [u8], stride: u32, x: u32, y: u32, w: usize, h: usize, src: &[u8]) {
    let stride = stride as usize;
    for row in 0..h {
        let dst = (y as usize + row) * stride + x as usize;
        pixels[dst..dst + w].copy_from_slice(&src[row * w..(row + 1) * w]);
    }
}

impl Default for FontAtlas {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontAtlas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontAtlas")
            .field("fonts", &self.sources.len())
            .field("size", &(self.width, self.height))
            .field("texture", &self.texture)
            .field("dirty", &self.dirty)
            .finish()
    }
}
