//! Tab bars
//!
//! A tab bar takes one row; `begin_tab` lays its header out left to right in
//! that row and returns `true` for the selected tab, whose content then flows
//! below the bar.

use plume_core::{Rect, Vec2};

use crate::context::UiContext;
use crate::id::visible_label;

/// Persistent state of one tab bar
#[derive(Clone, Debug)]
pub(crate) struct TabBar {
    pub id: u32,
    /// Row the tab headers are placed in this frame
    pub row: Rect,
    /// Where the next tab header goes
    pub cursor_x: f32,
    /// ID of the selected tab, 0 until the first tab is seen
    pub selected: u32,
    /// Tab clicked this frame, selected from the next frame on
    pub next_selected: u32,
    /// Whether the selected tab was begun this frame
    pub selected_seen: bool,
    /// First tab of this frame, selected when the stored one disappears
    pub first_tab: u32,
}

impl UiContext {
    /// Start a tab bar; call [`end_tab_bar`](Self::end_tab_bar) only when
    /// this returns `true`
    pub fn begin_tab_bar(&mut self, name: &str) -> bool {
        let id = self.get_id(name);
        let row = self.next_item_rect(self.style.frame_height());
        self.set_last_item(id, row);
        if !self.is_rect_visible(row) {
            return false;
        }

        let index = match self.tab_bars.iter().position(|bar| bar.id == id) {
            Some(index) => index,
            None => {
                self.tab_bars.push(TabBar {
                    id,
                    row,
                    cursor_x: row.min.x,
                    selected: 0,
                    next_selected: 0,
                    selected_seen: false,
                    first_tab: 0,
                });
                self.tab_bars.len() - 1
            }
        };
        let bar = &mut self.tab_bars[index];
        bar.row = row;
        bar.cursor_x = row.min.x;
        bar.selected_seen = false;
        bar.first_tab = 0;

        let color = self.colors.header_active;
        self.widget_layer().add_line(
            Vec2::new(row.min.x, row.max.y),
            row.max,
            color,
            1.0,
        );

        self.tab_bar_stack.push(index);
        self.id_stack.push(id);
        true
    }

    pub fn end_tab_bar(&mut self) {
        let Some(index) = self.tab_bar_stack.pop() else {
            panic!("end_tab_bar called without begin_tab_bar");
        };
        let bar = &mut self.tab_bars[index];
        // the selected tab went away: fall back to the first one next frame
        if !bar.selected_seen {
            bar.selected = bar.first_tab;
        }
        if bar.next_selected != 0 {
            bar.selected = std::mem::take(&mut bar.next_selected);
        }
        self.pop_id();
    }

    /// Tab header; returns `true` for the selected tab
    ///
    /// Call [`end_tab`](Self::end_tab) only when this returns `true`.
    pub fn begin_tab(&mut self, name: &str) -> bool {
        let Some(&index) = self.tab_bar_stack.last() else {
            panic!("begin_tab called outside begin_tab_bar/end_tab_bar");
        };
        let id = self.get_id(name);
        let text = visible_label(name);
        let padding = self.style.frame_padding;
        let width = self.text_size(text).x + padding.x * 2.0;

        let bar = &mut self.tab_bars[index];
        let rect = Rect::new(
            Vec2::new(bar.cursor_x, bar.row.min.y),
            Vec2::new(bar.cursor_x + width, bar.row.max.y),
        );
        bar.cursor_x += width + self.style.inner_spacing.x;
        if bar.first_tab == 0 {
            bar.first_tab = id;
        }
        if bar.selected == 0 {
            bar.selected = id;
        }

        let state = self.item_behavior(rect, id);
        let bar = &mut self.tab_bars[index];
        if state.pressed {
            bar.next_selected = id;
        }
        let selected = bar.selected == id;
        if selected {
            bar.selected_seen = true;
        }

        if self.is_rect_visible(rect) {
            let colors = &self.colors;
            let color = if selected {
                colors.header_active
            } else if state.hovered {
                colors.header_hovered
            } else {
                colors.header
            };
            let text_color = colors.text;
            self.widget_layer().add_rect_filled(rect.min, rect.max, color);
            self.draw_text_clipped(rect.min + padding, rect, text_color, text);
        }

        if selected {
            self.id_stack.push(id);
        }
        selected
    }

    pub fn end_tab(&mut self) {
        self.pop_id();
    }
}
