//! Glyph rasterization using swash
//!
//! Converts font glyph outlines to coverage bitmaps for the atlas, optionally
//! oversampled, and derives signed distance fields from that coverage.

use crate::font::FontFace;
use crate::{Result, TextError};
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::{Format, Transform};

/// Rasterized glyph bitmap with placement
#[derive(Debug, Clone, Default)]
pub struct RasterizedGlyph {
    /// Bitmap pixel data (single channel, 8-bit)
    pub bitmap: Vec<u8>,
    /// Bitmap width in pixels
    pub width: u32,
    /// Bitmap height in pixels
    pub height: u32,
    /// Offset from the pen position to the left edge
    pub left: i32,
    /// Offset from the baseline to the top edge, y down
    pub top: i32,
}

impl RasterizedGlyph {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// SDF tuning for [`GlyphRasterizer::rasterize_sdf`]
#[derive(Debug, Clone, Copy)]
pub struct SdfParams {
    /// Pixels of field added on every side
    pub padding: u32,
    /// Field value on the outline
    pub on_edge_value: u8,
    /// Field change per pixel of distance
    pub pixel_dist_scale: f32,
}

/// Glyph rasterizer using swash
pub struct GlyphRasterizer {
    /// Swash scale context (caches scaling state)
    scale_context: ScaleContext,
}

impl GlyphRasterizer {
    /// Create a new glyph rasterizer
    pub fn new() -> Self {
        Self {
            scale_context: ScaleContext::new(),
        }
    }

    /// Rasterize a glyph's coverage
    ///
    /// `scale` converts font units to pixels. With oversampling the bitmap is
    /// `h_oversample`/`v_oversample` times larger and placement is reported in
    /// oversampled pixels.
    pub fn rasterize(
        &mut self,
        face: &FontFace,
        glyph_id: u16,
        scale: f32,
        h_oversample: u32,
        v_oversample: u32,
    ) -> Result<RasterizedGlyph> {
        let swash_font = swash::FontRef::from_index(face.data(), face.face_index() as usize)
            .ok_or(TextError::InvalidFontData)?;

        let ppem = scale * face.metrics().units_per_em as f32;
        let mut scaler = self.scale_context.builder(swash_font).size(ppem).build();

        let mut render = Render::new(&[
            Source::ColorOutline(0),
            Source::ColorBitmap(StrikeWith::BestFit),
            Source::Outline,
        ]);
        render.format(Format::Alpha);
        if h_oversample > 1 || v_oversample > 1 {
            render.transform(Some(Transform::scale(
                h_oversample.max(1) as f32,
                v_oversample.max(1) as f32,
            )));
        }

        match render.render(&mut scaler, glyph_id) {
            Some(img) if img.placement.width > 0 && img.placement.height > 0 => {
                Ok(RasterizedGlyph {
                    bitmap: img.data,
                    width: img.placement.width,
                    height: img.placement.height,
                    left: img.placement.left,
                    top: -img.placement.top,
                })
            }
            // Empty glyph (like space) - no bitmap
            _ => Ok(RasterizedGlyph::default()),
        }
    }

    /// Rasterize a glyph as a signed distance field
    ///
    /// Inside pixels get values above `on_edge_value`, outside pixels below it.
    /// Empty glyphs produce an empty bitmap.
    pub fn rasterize_sdf(
        &mut self,
        face: &FontFace,
        glyph_id: u16,
        scale: f32,
        params: SdfParams,
    ) -> Result<RasterizedGlyph> {
        let coverage = self.rasterize(face, glyph_id, scale, 1, 1)?;
        if coverage.is_empty() {
            return Ok(coverage);
        }
        Ok(distance_field(&coverage, params))
    }
}

impl Default for GlyphRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a padded distance field from a coverage bitmap
pub fn distance_field(coverage: &RasterizedGlyph, params: SdfParams) -> RasterizedGlyph {
    let pad = params.padding as i32;
    let cw = coverage.width as i32;
    let ch = coverage.height as i32;
    let width = cw + 2 * pad;
    let height = ch + 2 * pad;
    let radius = pad + 1;

    let inside = |x: i32, y: i32| -> bool {
        let (cx, cy) = (x - pad, y - pad);
        cx >= 0 && cy >= 0 && cx < cw && cy < ch && coverage.bitmap[(cy * cw + cx) as usize] >= 128
    };

    let mut bitmap = vec![0u8; (width * height) as usize];
    for y in 0..height {
        for x in 0..width {
            let here = inside(x, y);
            let mut best = radius as f32;
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    if inside(x + dx, y + dy) != here {
                        let d = ((dx * dx + dy * dy) as f32).sqrt() - 0.5;
                        best = best.min(d.max(0.0));
                    }
                }
            }
            let signed = if here { best } else { -best };
            let value = params.on_edge_value as f32 + signed * params.pixel_dist_scale;
            bitmap[(y * width + x) as usize] = value.clamp(0.0, 255.0) as u8;
        }
    }

    RasterizedGlyph {
        bitmap,
        width: width as u32,
        height: height as u32,
        left: coverage.left - pad,
        top: coverage.top - pad,
    }
}

/// Horizontal box filter of width `kernel` over a `w`x`h` region, in place
pub fn prefilter_h(pixels: &mut [u8], stride: usize, w: usize, h: usize, kernel: usize) {
    if kernel <= 1 {
        return;
    }
    let mut line = vec![0u8; w];
    for row in 0..h {
        let start = row * stride;
        line.copy_from_slice(&pixels[start..start + w]);
        let mut total = 0u32;
        for x in 0..w {
            total += line[x] as u32;
            if x >= kernel {
                total -= line[x - kernel] as u32;
            }
            pixels[start + x] = (total / kernel as u32) as u8;
        }
    }
}

/// Vertical box filter of height `kernel` over a `w`x`h` region, in place
pub fn prefilter_v(pixels: &mut [u8], stride: usize, w: usize, h: usize, kernel: usize) {
    if kernel <= 1 {
        return;
    }
    let mut column = vec![0u8; h];
    for x in 0..w {
        for (y, c) in column.iter_mut().enumerate() {
            *c = pixels[y * stride + x];
        }
        let mut total = 0u32;
        for y in 0..h {
            total += column[y] as u32;
            if y >= kernel {
                total -= column[y - kernel] as u32;
            }
            pixels[y * stride + x] = (total / kernel as u32) as u8;
        }
    }
}

/// Sub-pixel shift applied to quads of oversampled glyphs
pub fn oversample_shift(oversample: u32) -> f32 {
    if oversample == 0 {
        return 0.0;
    }
    -((oversample - 1) as f32) / (2.0 * oversample as f32)
}
