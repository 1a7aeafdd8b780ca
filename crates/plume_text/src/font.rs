//! Font loading, glyph tables and text measurement
//!
//! A [`FontFace`] is the parsed source file; a [`Font`] is what an atlas build
//! produces from it: vertical metrics at the configured size, a dense
//! code-point table and one [`FontGlyph`] per configured code point.

use std::sync::Arc;

use plume_core::{Rect, Vec2};

use crate::config::{FontConfig, FontRange};
use crate::utf8::chars_lossy;
use crate::{Result, TextError};

/// Font metrics in font units
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    /// Units per em (typically 1000 or 2048)
    pub units_per_em: u16,
    /// Ascender (distance from baseline to top of tallest glyph)
    pub ascender: i16,
    /// Descender (distance from baseline to bottom, typically negative)
    pub descender: i16,
    /// Line gap (additional spacing between lines)
    pub line_gap: i16,
}

/// A parsed font face
#[derive(Clone)]
pub struct FontFace {
    /// Raw font data (kept alive for ttf-parser and swash)
    data: Arc<Vec<u8>>,
    /// Face index within the font file (for TTC files)
    face_index: u32,
    metrics: FontMetrics,
}

impl FontFace {
    /// Load a font from raw TTF/OTF data (uses face index 0)
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_with_index(data, 0)
    }

    /// Load a font from raw TTF/OTF data with a specific face index
    pub fn from_data_with_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let data = Arc::new(data);

        let face = ttf_parser::Face::parse(&data, face_index)
            .map_err(|e| TextError::FontParseError(format!("{:?}", e)))?;

        let metrics = FontMetrics {
            units_per_em: face.units_per_em(),
            ascender: face.ascender(),
            descender: face.descender(),
            line_gap: face.line_gap(),
        };

        Ok(Self {
            data,
            face_index,
            metrics,
        })
    }

    /// Load a font from a file path
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        tracing::debug!("Loaded font file {:?} ({} bytes)", path, data.len());
        Self::from_data(data)
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// Get raw font data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    fn as_ttf_face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.face_index).ok()
    }

    /// Glyph index for a code point, 0 (the missing glyph) when absent
    pub fn glyph_index(&self, c: char) -> u16 {
        self.as_ttf_face()
            .and_then(|face| face.glyph_index(c))
            .map(|id| id.0)
            .unwrap_or(0)
    }

    /// Horizontal advance and left side bearing in font units
    pub fn h_metrics(&self, glyph_id: u16) -> (i32, i32) {
        let Some(face) = self.as_ttf_face() else {
            return (0, 0);
        };
        let id = ttf_parser::GlyphId(glyph_id);
        let advance = face.glyph_hor_advance(id).unwrap_or(0) as i32;
        let bearing = face.glyph_hor_side_bearing(id).unwrap_or(0) as i32;
        (advance, bearing)
    }

    /// Scale so that ascent-to-descent spans `pixel_height`
    pub fn pixel_height_scale(&self, pixel_height: f32) -> f32 {
        let span = (self.metrics.ascender as i32 - self.metrics.descender as i32) as f32;
        if span > 0.0 {
            pixel_height / span
        } else {
            0.0
        }
    }

    /// Scale so that one EM maps to `pixels`
    pub fn em_scale(&self, pixels: f32) -> f32 {
        pixels / self.metrics.units_per_em.max(1) as f32
    }

    /// Scale for a configured size: positive is pixel height, negative is EM-relative
    pub fn scale_for_size(&self, font_size: f32) -> f32 {
        if font_size > 0.0 {
            self.pixel_height_scale(font_size)
        } else {
            self.em_scale(-font_size)
        }
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("face_index", &self.face_index)
            .field("metrics", &self.metrics)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Placement and texture coordinates of one glyph at the configured size
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FontGlyph {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
    pub x_advance: f32,
    pub left_bearing: f32,
}

impl FontGlyph {
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A font baked into an atlas
#[derive(Debug, Clone)]
pub struct Font {
    pub(crate) config: FontConfig,
    /// Configured ranges with individual characters appended
    pub(crate) ranges: Vec<FontRange>,
    pub(crate) ascent: f32,
    pub(crate) descent: f32,
    pub(crate) line_spacing: f32,
    /// Dense table: code point -> index into `glyphs`
    pub(crate) code_points: Vec<u32>,
    pub(crate) glyphs: Vec<FontGlyph>,
}

impl Font {
    pub fn config(&self) -> &FontConfig {
        &self.config
    }

    /// Configured pixel size
    pub fn size(&self) -> f32 {
        self.config.font_size
    }

    pub fn is_sdf(&self) -> bool {
        self.config.sdf
    }

    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    pub fn descent(&self) -> f32 {
        self.descent
    }

    pub fn line_spacing(&self) -> f32 {
        self.line_spacing
    }

    pub fn ranges(&self) -> &[FontRange] {
        &self.ranges
    }

    pub fn glyphs(&self) -> &[FontGlyph] {
        &self.glyphs
    }

    /// Glyph for a code point, found by scanning the configured ranges
    pub fn find_glyph(&self, c: char) -> Option<&FontGlyph> {
        let cp = c as u32;
        self.ranges
            .iter()
            .find(|range| range.contains(cp))
            .and_then(|_| self.code_points.get(cp as usize))
            .and_then(|&index| self.glyphs.get(index as usize))
    }

    /// Glyph for a code point
    ///
    /// # Panics
    ///
    /// Panics if `c` is outside every configured range. Callers are expected
    /// to configure ranges for all text they draw.
    pub fn glyph_for(&self, c: char) -> &FontGlyph {
        match self.find_glyph(c) {
            Some(glyph) => glyph,
            None => panic!("glyph not found for code point U+{:04X}", c as u32),
        }
    }

    /// Multiplier from the configured size to `size`; 0 means unscaled
    pub fn scale_for(&self, size: f32) -> f32 {
        if size > 0.0 {
            size / self.config.font_size
        } else {
            1.0
        }
    }

    /// Lay out `text` starting at `origin`
    pub fn layout<'a>(
        &'a self,
        size: f32,
        origin: Vec2,
        text: &'a [u8],
        wrap: f32,
    ) -> TextLayout<'a, impl Iterator<Item = char> + 'a> {
        let scale = self.scale_for(size);
        TextLayout {
            font: self,
            chars: chars_lossy(text),
            scale,
            line_spacing: scale * self.line_spacing,
            origin,
            pen: origin,
            wrap,
            first: true,
        }
    }

    /// Size of the box covering every glyph quad of `text`
    pub fn calculate_text_size(&self, size: f32, text: &str, wrap: f32) -> Vec2 {
        self.calculate_text_bb(size, Vec2::ZERO, text, wrap).size()
    }

    /// Box covering every glyph quad of `text` drawn at `pos`
    pub fn calculate_text_bb(&self, size: f32, pos: Vec2, text: &str, wrap: f32) -> Rect {
        let mut min = Vec2::new(f32::MAX, f32::MAX);
        let mut max = Vec2::new(f32::MIN, f32::MIN);
        for placed in self.layout(size, pos, text.as_bytes(), wrap) {
            min = min.min(placed.quad.min);
            max = max.max(placed.quad.max);
        }
        if min.x > max.x {
            return Rect::new(pos, pos);
        }
        Rect::new(min, max)
    }
}

/// One glyph positioned by [`TextLayout`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    pub c: char,
    /// Screen-space quad
    pub quad: Rect,
    /// Atlas texture coordinates
    pub uv: Rect,
    /// Pen position after advancing past this glyph
    pub pen: Vec2,
}

/// Iterator placing glyphs: `\n` starts a new line, `\r` is ignored, and a
/// glyph whose right edge passes `origin.x + wrap` moves to the next line.
pub struct TextLayout<'a, I> {
    font: &'a Font,
    chars: I,
    scale: f32,
    line_spacing: f32,
    origin: Vec2,
    pen: Vec2,
    wrap: f32,
    first: bool,
}

impl<I: Iterator<Item = char>> Iterator for TextLayout<'_, I> {
    type Item = PlacedGlyph;

    fn next(&mut self) -> Option<PlacedGlyph> {
        loop {
            let c = self.chars.next()?;
            match c {
                '\n' => {
                    self.pen.x = self.origin.x;
                    self.pen.y += self.line_spacing;
                }
                '\r' => {}
                _ => {
                    let glyph = self.font.glyph_for(c);
                    let scale = self.scale;

                    if self.first {
                        if glyph.left_bearing > 0.0 {
                            self.pen.x += glyph.left_bearing * scale;
                        }
                        self.first = false;
                    }

                    let mut quad = Rect::new(
                        Vec2::new(self.pen.x + glyph.x0 * scale, self.pen.y + glyph.y0 * scale),
                        Vec2::new(self.pen.x + glyph.x1 * scale, self.pen.y + glyph.y1 * scale),
                    );

                    if self.wrap > 0.0 && quad.max.x > self.origin.x + self.wrap {
                        quad.min.x = self.origin.x + glyph.x0 * scale;
                        quad.max.x = self.origin.x + glyph.x1 * scale;
                        quad.min.y += self.line_spacing;
                        quad.max.y += self.line_spacing;
                        self.pen.x = self.origin.x;
                        self.pen.y += self.line_spacing;
                    }

                    self.pen.x += glyph.x_advance * scale;

                    return Some(PlacedGlyph {
                        c,
                        quad,
                        uv: Rect::new(
                            Vec2::new(glyph.u0, glyph.v0),
                            Vec2::new(glyph.u1, glyph.v1),
                        ),
                        pen: self.pen,
                    });
                }
            }
        }
    }
}
