//! Clipping long lists of equally tall items
//!
//! ```ignore
//! let mut clipper = UiClipper::new(lines.len());
//! while ui.step_clipper(&mut clipper) {
//!     for i in clipper.display_start()..clipper.display_end() {
//!         ui.text(&lines[i]);
//!     }
//! }
//! ```
//!
//! The first step draws item 0 to measure the row height. The second step
//! skips the rows above the window's clip rect and yields the visible range.
//! The last step skips the rows below it, so the window's content size and
//! scrollbar match a fully drawn list.

use crate::context::UiContext;

#[derive(Clone, Debug)]
pub struct UiClipper {
    items_count: usize,
    display_start: usize,
    display_end: usize,
    item_height: f32,
    start_y: f32,
    step: u8,
}

impl UiClipper {
    pub fn new(items_count: usize) -> Self {
        Self {
            items_count,
            display_start: 0,
            display_end: 0,
            item_height: 0.0,
            start_y: 0.0,
            step: 0,
        }
    }

    pub fn items_count(&self) -> usize {
        self.items_count
    }

    /// First item to draw in this step
    pub fn display_start(&self) -> usize {
        self.display_start
    }

    /// One past the last item to draw in this step
    pub fn display_end(&self) -> usize {
        self.display_end
    }

    /// Measured height of one item including spacing
    pub fn item_height(&self) -> f32 {
        self.item_height
    }
}

impl UiContext {
    /// Advance the clipper; draw `display_start..display_end` while this
    /// returns `true`
    pub fn step_clipper(&mut self, clipper: &mut UiClipper) -> bool {
        match clipper.step {
            0 => {
                if clipper.items_count == 0 {
                    clipper.step = 3;
                    return false;
                }
                clipper.start_y = self.cursor_pos().y;
                clipper.display_start = 0;
                clipper.display_end = 1;
                clipper.step = 1;
                true
            }
            1 => {
                let height = self.cursor_pos().y - clipper.start_y;
                clipper.item_height = height;
                clipper.step = 2;

                if height <= 0.0 {
                    clipper.display_start = 1;
                    clipper.display_end = clipper.items_count;
                    return true;
                }

                let clip = self.current_window().inner_clip_rect;
                let count = clipper.items_count;
                let first = ((clip.min.y - clipper.start_y) / height).floor().max(1.0) as usize;
                let last = ((clip.max.y - clipper.start_y) / height).ceil().max(0.0) as usize;
                let first = first.min(count);
                clipper.display_start = first;
                clipper.display_end = last.clamp(first, count);

                let (layout, style) = self.layout_mut();
                layout.skip_vertical((first - 1) as f32 * height, style);
                true
            }
            2 => {
                let remaining = clipper.items_count - clipper.display_end;
                if remaining > 0 {
                    let (layout, style) = self.layout_mut();
                    layout.skip_vertical(remaining as f32 * clipper.item_height, style);
                }
                clipper.step = 3;
                false
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use plume_core::Vec2;

    use super::*;
    use crate::context::tests::{input_at, place_window, test_context};
    use crate::window::WindowFlags;

    /// Draw `count` lines through a clipper; returns the indices drawn
    fn draw_list(ui: &mut UiContext, count: usize) -> Vec<usize> {
        let mut drawn = Vec::new();
        let mut clipper = UiClipper::new(count);
        while ui.step_clipper(&mut clipper) {
            for i in clipper.display_start()..clipper.display_end() {
                ui.text(&format!("line {i}"));
                drawn.push(i);
            }
        }
        drawn
    }

    #[test]
    fn test_only_visible_rows_are_drawn() {
        let mut ui = test_context();
        let input = input_at(Vec2::new(-100.0, -100.0));

        ui.new_frame(&input);
        place_window(&mut ui, Vec2::ZERO, Vec2::new(300.0, 200.0));
        assert!(ui.begin_window("Clipped", None, WindowFlags::NONE));
        ui.layout_dynamic(20.0, 1);
        let drawn = draw_list(&mut ui, 1000);
        ui.end_window();
        ui.render();

        assert_eq!(drawn, (0..7).collect::<Vec<_>>());
        // every row is accounted for: 1000 rows of 20 with 4 between them
        let window = ui.find_window("Clipped").expect("window exists");
        assert_eq!(window.content_size().y, 23996.0);
    }

    #[test]
    fn test_scrolled_list_skips_rows_above() {
        let mut ui = test_context();
        let input = input_at(Vec2::new(-100.0, -100.0));

        let frame = |ui: &mut UiContext, scroll: Option<f32>| {
            ui.new_frame(&input);
            place_window(ui, Vec2::ZERO, Vec2::new(300.0, 200.0));
            assert!(ui.begin_window("Scrolled", None, WindowFlags::NONE));
            if let Some(y) = scroll {
                ui.set_window_scroll(Vec2::new(0.0, y));
            }
            ui.layout_dynamic(20.0, 1);
            let drawn = draw_list(ui, 1000);
            ui.end_window();
            ui.render();
            drawn
        };

        frame(&mut ui, None);
        frame(&mut ui, Some(2400.0));
        // the scroll applies to the layout from the next frame on
        let drawn = frame(&mut ui, None);
        assert_eq!(drawn[0], 0);
        assert!(drawn[1] >= 99, "rows above the view are skipped: {drawn:?}");
        assert!(drawn.len() < 12);
    }

    #[test]
    fn test_empty_list_draws_nothing() {
        let mut ui = test_context();
        let input = input_at(Vec2::new(-100.0, -100.0));
        ui.new_frame(&input);
        place_window(&mut ui, Vec2::ZERO, Vec2::new(300.0, 200.0));
        assert!(ui.begin_window("Empty", None, WindowFlags::NONE));
        assert!(draw_list(&mut ui, 0).is_empty());
        ui.end_window();
        ui.render();
    }
}
