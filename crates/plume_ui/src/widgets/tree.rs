//! Collapsing headers and tree nodes
//!
//! The open flag of each node lives in the window's storage under the
//! node's ID, so it survives frames where the node is not drawn.

use plume_core::{Color, Rect, Vec2};

use crate::context::{ItemState, UiContext};
use crate::id::visible_label;

impl UiContext {
    /// Full-width header; returns `true` while open
    ///
    /// Call [`end_collapsing_header`](Self::end_collapsing_header) only when
    /// this returns `true`.
    pub fn collapsing_header(&mut self, label: &str) -> bool {
        let (open, state, rect) = self.toggle_item(label);
        if self.is_rect_visible(rect) {
            let colors = &self.colors;
            let palette = [colors.header, colors.header_hovered, colors.header_active];
            let text_color = colors.text;
            self.draw_frame(rect, state, palette);
            self.draw_node_label(rect, open, text_color, visible_label(label));
        }
        if open {
            let id = self.last_item_id();
            self.id_stack.push(id);
        }
        open
    }

    pub fn end_collapsing_header(&mut self) {
        self.pop_id();
    }

    /// Indented tree node; returns `true` while open
    ///
    /// Call [`tree_pop`](Self::tree_pop) only when this returns `true`.
    pub fn tree_node(&mut self, label: &str) -> bool {
        let (open, state, rect) = self.toggle_item(label);
        if self.is_rect_visible(rect) {
            let colors = &self.colors;
            let highlight = if state.held {
                Some(colors.header_active)
            } else if state.hovered {
                Some(colors.header_hovered)
            } else {
                None
            };
            let text_color = colors.text;
            if let Some(color) = highlight {
                self.widget_layer().add_rect_filled(rect.min, rect.max, color);
            }
            self.draw_node_label(rect, open, text_color, visible_label(label));
        }
        if open {
            let id = self.last_item_id();
            self.id_stack.push(id);
            let (layout, _) = self.layout_mut();
            layout.tree_depth += 1;
        }
        open
    }

    pub fn tree_pop(&mut self) {
        let (layout, _) = self.layout_mut();
        assert!(layout.tree_depth > 0, "tree_pop called without an open tree_node");
        layout.tree_depth -= 1;
        self.pop_id();
    }

    /// Row that flips its stored open flag when clicked
    fn toggle_item(&mut self, label: &str) -> (bool, ItemState, Rect) {
        let id = self.get_id(label);
        let rect = self.next_item_rect(self.style.frame_height());
        let state = self.item_behavior(rect, id);

        let open = self.window_storage_mut().bool_mut(id, false);
        if state.pressed {
            *open = !*open;
        }
        (*open, state, rect)
    }

    /// Arrow pointing right (closed) or down (open) followed by the label
    fn draw_node_label(&mut self, rect: Rect, open: bool, color: Color, text: &str) {
        let padding = self.style.frame_padding;
        let side = self.style.font_size;
        let arrow = Rect::from_pos_size(rect.min + padding, Vec2::new(side, side))
            .expand(Vec2::new(-side * 0.2, -side * 0.2));

        let (p0, p1, p2) = if open {
            (arrow.min, Vec2::new(arrow.max.x, arrow.min.y), Vec2::new(arrow.center().x, arrow.max.y))
        } else {
            (arrow.min, Vec2::new(arrow.max.x, arrow.center().y), Vec2::new(arrow.min.x, arrow.max.y))
        };
        self.widget_layer().add_triangle_filled(p0, p1, p2, color);

        let text_pos = Vec2::new(
            rect.min.x + padding.x + side + self.style.inner_spacing.x,
            rect.min.y + padding.y,
        );
        self.draw_text_clipped(text_pos, rect, color, text);
    }
}
