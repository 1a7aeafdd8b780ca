//! Font atlas and glyph tables for Plume
//!
//! This crate provides:
//! - Font loading and metric extraction (TTF/OTF via ttf-parser)
//! - Glyph rasterization, regular and signed-distance-field (swash)
//! - Shelf rectangle packing into a single shared atlas texture
//! - The embedded ProggyClean default font and its decompressor
//! - Defensive UTF-8 decoding and text measurement

pub mod atlas;
pub mod compress;
pub mod config;
pub mod default_font;
pub mod font;
pub mod packer;
pub mod rasterizer;
pub mod utf8;

pub use atlas::{FontAtlas, FontId};
pub use compress::DecompressError;
pub use config::{FontConfig, FontRange};
pub use font::{Font, FontFace, FontGlyph, FontMetrics};
pub use packer::{PackRect, RectPacker};
pub use rasterizer::{GlyphRasterizer, RasterizedGlyph};
pub use utf8::{decode_utf8, Utf8Decode};

use thiserror::Error;

/// Text and font errors
#[derive(Error, Debug)]
pub enum TextError {
    #[error("Failed to load font: {0}")]
    FontLoadError(#[from] std::io::Error),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Invalid font data")]
    InvalidFontData,

    #[error("Default font is corrupt: {0}")]
    Decompress(#[from] DecompressError),

    #[error("Atlas is full: glyphs need {needed} rows, limit is {limit}")]
    AtlasFull { needed: u32, limit: u32 },

    #[error("Font atlas has no fonts")]
    NoFonts,
}

pub type Result<T> = std::result::Result<T, TextError>;
