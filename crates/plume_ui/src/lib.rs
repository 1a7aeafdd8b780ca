//! Plume UI
//!
//! An immediate-mode UI on top of `plume_draw`. Widgets are plain method
//! calls on [`UiContext`] made every frame; the context keeps only what has
//! to survive between frames (window placement, scroll, open/closed flags,
//! the focused text field).
//!
//! # Features
//!
//! - Movable, resizable, collapsible and scrollable windows with child
//!   windows and tooltips
//! - Row layouts: dynamic, static, per-column arrays, templates and free
//!   placement
//! - Buttons, checkboxes, radios, selectables, sliders, drags, progress bars
//!   and images
//! - Single-line text input with selection and undo/redo
//! - Collapsing headers, tree nodes, tab bars and list clipping
//! - Styles and color schemes loadable from TOML
//! - Debug, style editor and demo tool windows
//!
//! # Example
//!
//! ```ignore
//! use plume_ui::{UiContext, WindowFlags};
//!
//! let mut ui = UiContext::new();
//! ui.set_font_atlas(&atlas);
//!
//! // each frame
//! ui.new_frame(&input);
//! if ui.begin_window("Settings", None, WindowFlags::NONE) {
//!     ui.checkbox("VSync", &mut vsync);
//!     ui.slider_float("Gamma", &mut gamma, 1.0, 3.0);
//!     ui.end_window();
//! }
//! let draw_data = ui.render();
//! ```

pub mod clipper;
pub mod context;
pub mod id;
pub mod layout;
pub mod storage;
pub mod style;
pub mod text_edit;
mod tools;
mod widgets;
pub mod window;

pub use clipper::UiClipper;
pub use context::UiContext;
pub use id::{visible_label, IdStack};
pub use layout::LayoutRowType;
pub use storage::{Storage, StorageValue};
pub use style::{ColorScheme, UiStyle};
pub use text_edit::{filter_char, InputTextFlags, TextEditState};
pub use widgets::format_value;
pub use window::{Condition, UiWindow, WindowFlags};

use thiserror::Error;

/// UI errors
#[derive(Error, Debug)]
pub enum UiError {
    #[error("Failed to read theme: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid theme: {0}")]
    Theme(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, UiError>;
