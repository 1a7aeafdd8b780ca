//! Widgets
//!
//! Every widget follows the same steps: hash its label into an ID, take a
//! rectangle from the current layout row, run the shared hover/click
//! handling, then draw into the current window.

mod basic;
mod input;
mod slider;
pub(crate) mod tabs;
mod tree;

pub use slider::format_value;

use plume_core::{Rect, Vec2};

use crate::context::UiContext;

impl UiContext {
    /// Rectangle of the next item, advancing the cursor past it
    pub(crate) fn next_item_rect(&mut self, default_height: f32) -> Rect {
        let pos = self.cursor_pos();
        let size = self.calculate_item_size(default_height);
        self.advance_cursor(size.x, size.y);
        Rect::from_pos_size(pos, size)
    }

    /// Like [`next_item_rect`](Self::next_item_rect), but components of
    /// `size` that are zero come from the layout
    pub(crate) fn next_item_rect_sized(&mut self, size: Vec2) -> Rect {
        let pos = self.cursor_pos();
        let layout_size = self.calculate_item_size(self.style.frame_height());
        let size = Vec2::new(
            if size.x > 0.0 { size.x } else { layout_size.x },
            if size.y > 0.0 { size.y } else { layout_size.y },
        );
        self.advance_cursor(size.x, size.y);
        Rect::from_pos_size(pos, size)
    }

    /// Item whose frame is followed by its visible label
    ///
    /// Returns the frame and the label text; the label is drawn right of the
    /// frame.
    pub(crate) fn framed_item<'a>(&mut self, label: &'a str) -> (Rect, &'a str) {
        let text = crate::id::visible_label(label);
        let rect = self.next_item_rect(self.style.frame_height());
        if text.is_empty() {
            return (rect, text);
        }

        let label_width = self.text_size(text).x + self.style.inner_spacing.x;
        let frame_max_x = (rect.max.x - label_width).max(rect.min.x);
        let frame = Rect::new(rect.min, Vec2::new(frame_max_x, rect.max.y));

        if self.is_rect_visible(rect) {
            let pos = Vec2::new(
                frame.max.x + self.style.inner_spacing.x,
                rect.min.y + self.style.frame_padding.y,
            );
            let color = self.colors.text;
            self.draw_text(pos, color, text);
        }
        (frame, text)
    }
}
