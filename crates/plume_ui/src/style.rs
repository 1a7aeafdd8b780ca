//! Style metrics and color schemes
//!
//! Both load from TOML. Any field missing from the document keeps its
//! built-in default, so a theme file only lists what it changes:
//!
//! ```toml
//! font_size = 16.0
//! item_spacing = { x = 6.0, y = 6.0 }
//! ```

use std::path::Path;

use plume_core::{Color, Vec2};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Sizes and paddings used by windows and widgets
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiStyle {
    /// Vertical padding around the title text
    pub title_padding: f32,
    pub font_size: f32,
    /// Horizontal offset per tree level
    pub indent_size: f32,
    pub window_horizontal_padding: f32,
    pub window_vertical_padding: f32,
    pub scrollbar_size: f32,
    /// Width of the slider grab
    pub slider_size: f32,
    /// Gap between consecutive items
    pub item_spacing: Vec2,
    /// Gap between parts of one item (frame and label)
    pub inner_spacing: Vec2,
    pub frame_padding: Vec2,
}

impl Default for UiStyle {
    fn default() -> Self {
        Self {
            title_padding: 10.0,
            font_size: 13.0,
            indent_size: 15.0,
            window_horizontal_padding: 5.0,
            window_vertical_padding: 5.0,
            scrollbar_size: 10.0,
            slider_size: 12.0,
            item_spacing: Vec2::new(8.0, 4.0),
            inner_spacing: Vec2::new(4.0, 4.0),
            frame_padding: Vec2::new(4.0, 4.0),
        }
    }
}

impl UiStyle {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Height of a framed widget: one line of text plus vertical frame padding
    pub fn frame_height(&self) -> f32 {
        self.font_size + self.frame_padding.y * 2.0
    }

    /// Height of a window title bar
    pub fn title_bar_height(&self) -> f32 {
        self.font_size + self.title_padding * 2.0
    }

    pub fn window_padding(&self) -> Vec2 {
        Vec2::new(self.window_horizontal_padding, self.window_vertical_padding)
    }
}

/// Widget colors
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScheme {
    pub title_active: Color,
    pub title_bg: Color,
    pub title_bg_collapsed: Color,
    pub window_bg: Color,
    pub window_border: Color,
    pub child_bg: Color,
    pub button: Color,
    pub button_hovered: Color,
    pub button_active: Color,
    pub text: Color,
    pub text_disabled: Color,
    pub progress_bar: Color,
    pub checkmark: Color,
    pub frame_bg: Color,
    pub frame_bg_hovered: Color,
    pub frame_bg_active: Color,
    pub header: Color,
    pub header_hovered: Color,
    pub header_active: Color,
    pub scrollbar_bg: Color,
    pub scrollbar_handle: Color,
    pub scrollbar_frame: Color,
    pub scrollbar_active: Color,
    pub scrollbar_hovered: Color,
    pub text_selected_bg: Color,
    pub separator: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::dark()
    }
}

impl ColorScheme {
    /// Built-in dark theme
    pub fn dark() -> Self {
        let button_hovered = Color::rgba(0.61, 0.02, 0.10, 1.00);
        let button_active = Color::rgba(0.87, 0.02, 0.10, 1.00);
        Self {
            title_active: Color::rgba(0.33, 0.02, 0.10, 1.00),
            title_bg: Color::rgba(0.04, 0.04, 0.04, 1.00),
            title_bg_collapsed: Color::rgba(0.04, 0.04, 0.04, 1.00),
            window_bg: Color::rgba(0.10, 0.10, 0.10, 0.78),
            window_border: Color::rgba(0.33, 0.02, 0.10, 1.00),
            child_bg: Color::rgba(0.10, 0.10, 0.10, 0.78),
            button: Color::rgba(0.51, 0.02, 0.10, 1.00),
            button_hovered,
            button_active,
            text: Color::WHITE,
            text_disabled: Color::rgba(0.50, 0.50, 0.50, 1.00),
            progress_bar: Color::rgba(0.90, 0.70, 0.00, 1.00),
            checkmark: button_active,
            frame_bg: Color::rgba(0.23, 0.02, 0.10, 1.00),
            frame_bg_hovered: Color::rgba(0.26, 0.59, 0.98, 0.40),
            frame_bg_active: Color::rgba(0.26, 0.59, 0.98, 0.67),
            header: Color::rgba(0.51, 0.02, 0.10, 1.00),
            header_hovered: Color::rgba(0.26, 0.59, 0.98, 0.80),
            header_active: Color::rgba(0.26, 0.59, 0.98, 1.00),
            scrollbar_bg: Color::rgba(0.05, 0.05, 0.05, 0.85),
            scrollbar_handle: Color::rgba(0.51, 0.02, 0.10, 1.00),
            scrollbar_frame: Color::TRANSPARENT,
            scrollbar_active: button_active,
            scrollbar_hovered: button_hovered,
            text_selected_bg: Color::rgba(0.26, 0.59, 0.98, 0.35),
            separator: Color::rgba(0.43, 0.43, 0.50, 0.50),
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}
