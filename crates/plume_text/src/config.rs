//! Font configuration

use serde::{Deserialize, Serialize};

/// A contiguous run of code points
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontRange {
    pub first_code_point: u32,
    pub char_count: u32,
}

impl FontRange {
    pub const fn new(first_code_point: u32, char_count: u32) -> Self {
        Self {
            first_code_point,
            char_count,
        }
    }

    pub fn contains(&self, code_point: u32) -> bool {
        code_point >= self.first_code_point
            && code_point < self.first_code_point + self.char_count
    }

    /// One past the last code point
    pub fn end(&self) -> u32 {
        self.first_code_point + self.char_count
    }
}

/// Options for one font added to an atlas
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Pixel height; negative values are EM-relative
    pub font_size: f32,
    /// Rasterize as a signed distance field
    pub sdf: bool,
    /// Pixels of distance field around each glyph
    pub sdf_padding: u32,
    /// Field value on the glyph outline
    pub on_edge_value: u8,
    /// Field change per pixel of distance; 0 derives `on_edge_value / sdf_padding`
    pub sdf_pixel_dist_scale: f32,
    pub h_oversample: u32,
    pub v_oversample: u32,
    pub ranges: Vec<FontRange>,
    /// Explicit code points, each packed as a one-character range
    pub individual_chars: Vec<u32>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            font_size: 13.0,
            sdf: false,
            sdf_padding: 1,
            on_edge_value: 255,
            sdf_pixel_dist_scale: 0.0,
            h_oversample: 1,
            v_oversample: 1,
            ranges: vec![FontRange::new(0x20, 0x5F)],
            individual_chars: Vec::new(),
        }
    }
}

impl FontConfig {
    /// All ranges, with individual characters expanded to one-character ranges
    pub fn effective_ranges(&self) -> Vec<FontRange> {
        self.ranges
            .iter()
            .copied()
            .chain(self.individual_chars.iter().map(|&c| FontRange::new(c, 1)))
            .collect()
    }

    pub fn pixel_dist_scale(&self) -> f32 {
        if self.sdf_pixel_dist_scale > 0.0 {
            self.sdf_pixel_dist_scale
        } else {
            self.on_edge_value as f32 / self.sdf_padding.max(1) as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_individual_chars_become_ranges() {
        let config = FontConfig {
            ranges: vec![FontRange::new(0x20, 10)],
            individual_chars: vec![0x2022, 0x20AC],
            ..Default::default()
        };
        let ranges = config.effective_ranges();
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[1], FontRange::new(0x2022, 1));
        assert!(ranges[2].contains(0x20AC));
        assert!(!ranges[2].contains(0x20AD));
    }

    #[test]
    fn test_pixel_dist_scale_derived() {
        let config = FontConfig {
            sdf: true,
            sdf_padding: 4,
            on_edge_value: 180,
            ..Default::default()
        };
        assert_eq!(config.pixel_dist_scale(), 45.0);
    }
}
