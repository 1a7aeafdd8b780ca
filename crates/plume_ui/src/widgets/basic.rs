//! Buttons, toggles, images and plain text

use plume_core::{Color, Rect, TextureId, Vec2};

use crate::context::{UiContext, CIRCLE_SEGMENTS};
use crate::id::visible_label;

impl UiContext {
    // ========================================================================
    // Buttons
    // ========================================================================

    /// Returns `true` on the frame the button is released over
    pub fn button(&mut self, label: &str) -> bool {
        let id = self.get_id(label);
        let text = visible_label(label);
        let rect = self.next_item_rect(self.style.frame_height());
        let state = self.item_behavior(rect, id);

        if self.is_rect_visible(rect) {
            let colors = &self.colors;
            let frame = [colors.button, colors.button_hovered, colors.button_active];
            let text_color = colors.text;
            self.draw_frame(rect, state, frame);
            let text_pos = rect.center() - self.text_size(text) * 0.5;
            self.draw_text_clipped(text_pos, rect, text_color, text);
        }
        state.pressed
    }

    /// Button with no visuals; zero components of `size` come from the layout
    pub fn invisible_button(&mut self, label: &str, size: Vec2) -> bool {
        let id = self.get_id(label);
        let rect = self.next_item_rect_sized(size);
        self.item_behavior(rect, id).pressed
    }

    /// Toggle `selected` on click; returns `true` when it changed
    pub fn selectable(&mut self, label: &str, selected: &mut bool) -> bool {
        let id = self.get_id(label);
        let text = visible_label(label);
        let rect = self.next_item_rect(self.style.frame_height());
        let state = self.item_behavior(rect, id);
        if state.pressed {
            *selected = !*selected;
        }

        if self.is_rect_visible(rect) {
            let colors = &self.colors;
            let highlight = if state.held {
                Some(colors.header_active)
            } else if state.hovered {
                Some(colors.header_hovered)
            } else if *selected {
                Some(colors.header)
            } else {
                None
            };
            let text_color = colors.text;
            if let Some(color) = highlight {
                self.widget_layer().add_rect_filled(rect.min, rect.max, color);
            }
            let text_pos = rect.min + self.style.frame_padding;
            self.draw_text_clipped(text_pos, rect, text_color, text);
        }
        state.pressed
    }

    /// Square box with a check mark; returns `true` when `checked` changed
    pub fn checkbox(&mut self, label: &str, checked: &mut bool) -> bool {
        let id = self.get_id(label);
        let text = visible_label(label);
        let rect = self.next_item_rect(self.style.frame_height());
        let state = self.item_behavior(rect, id);
        if state.pressed {
            *checked = !*checked;
        }

        if self.is_rect_visible(rect) {
            let side = rect.height();
            let check_box = Rect::from_pos_size(rect.min, Vec2::new(side, side));
            let colors = &self.colors;
            let frame = [colors.frame_bg, colors.frame_bg_hovered, colors.frame_bg_active];
            let (mark, text_color) = (colors.checkmark, colors.text);
            self.draw_frame(check_box, state, frame);
            if *checked {
                let inset = (side / 4.0).max(2.0);
                let mark_box = check_box.expand(Vec2::new(-inset, -inset));
                self.widget_layer().add_rect_filled(mark_box.min, mark_box.max, mark);
            }
            let text_pos = Vec2::new(
                check_box.max.x + self.style.inner_spacing.x,
                rect.min.y + self.style.frame_padding.y,
            );
            self.draw_text_clipped(text_pos, rect, text_color, text);
        }
        state.pressed
    }

    /// One option of a radio group stored in `selected`; returns `true` when clicked
    pub fn radio_button(&mut self, label: &str, selected: &mut i32, value: i32) -> bool {
        let id = self.get_id(label);
        let text = visible_label(label);
        let rect = self.next_item_rect(self.style.frame_height());
        let state = self.item_behavior(rect, id);
        if state.pressed {
            *selected = value;
        }

        if self.is_rect_visible(rect) {
            let radius = rect.height() * 0.5;
            let center = rect.min + Vec2::new(radius, radius);
            let colors = &self.colors;
            let bg = if state.held {
                colors.frame_bg_active
            } else if state.hovered {
                colors.frame_bg_hovered
            } else {
                colors.frame_bg
            };
            let (mark, text_color) = (colors.checkmark, colors.text);
            let mut layer = self.widget_layer();
            layer.add_circle_filled(center, radius, bg, CIRCLE_SEGMENTS);
            if *selected == value {
                layer.add_circle_filled(center, (radius - 4.0).max(2.0), mark, CIRCLE_SEGMENTS);
            }
            let text_pos = Vec2::new(
                rect.min.x + radius * 2.0 + self.style.inner_spacing.x,
                rect.min.y + self.style.frame_padding.y,
            );
            self.draw_text_clipped(text_pos, rect, text_color, text);
        }
        state.pressed
    }

    // ========================================================================
    // Images
    // ========================================================================

    pub fn image(&mut self, texture: TextureId, size: Vec2) {
        self.image_ex(
            texture,
            size,
            Vec2::ZERO,
            Vec2::ONE,
            Color::WHITE,
            Color::TRANSPARENT,
        );
    }

    /// Image with explicit texture coordinates, tint and border color
    pub fn image_ex(
        &mut self,
        texture: TextureId,
        size: Vec2,
        uv0: Vec2,
        uv1: Vec2,
        tint: Color,
        border: Color,
    ) {
        let rect = self.next_item_rect_sized(size);
        self.set_last_item(0, rect);
        if !self.is_rect_visible(rect) {
            return;
        }
        let mut layer = self.widget_layer();
        layer.add_image_ex(texture, rect.min, rect.max, uv0, uv1, tint);
        if border.a > 0.0 {
            layer.add_rect(rect.min, rect.max, border, 1.0);
        }
    }

    // ========================================================================
    // Display
    // ========================================================================

    /// Empty item; zero components of `size` come from the layout
    pub fn dummy(&mut self, size: Vec2) {
        let rect = self.next_item_rect_sized(size);
        self.set_last_item(0, rect);
    }

    /// Bar filled to `fraction`; `overlay` defaults to the percentage
    pub fn progress_bar(&mut self, fraction: f32, size: Vec2, overlay: Option<&str>) {
        let rect = self.next_item_rect_sized(size);
        self.set_last_item(0, rect);
        if !self.is_rect_visible(rect) {
            return;
        }

        let fraction = fraction.clamp(0.0, 1.0);
        let fill = Rect::new(
            rect.min,
            Vec2::new(rect.min.x + rect.width() * fraction, rect.max.y),
        );
        let colors = &self.colors;
        let (bg, bar, text_color) = (colors.frame_bg, colors.progress_bar, colors.text);
        let mut layer = self.widget_layer();
        layer.add_rect_filled(rect.min, rect.max, bg);
        layer.add_rect_filled(fill.min, fill.max, bar);

        let percent;
        let text = match overlay {
            Some(text) => text,
            None => {
                percent = format!("{:.0}%", fraction * 100.0);
                &percent
            }
        };
        let text_pos = rect.center() - self.text_size(text) * 0.5;
        self.draw_text_clipped(text_pos, rect, text_color, text);
    }

    pub fn text(&mut self, text: &str) {
        let color = self.colors.text;
        self.color_text(color, text);
    }

    /// Text that takes its own size; `\n` starts a new line
    pub fn color_text(&mut self, color: Color, text: &str) {
        let pos = self.cursor_pos();
        let size = self.text_size(text);
        let size = Vec2::new(size.x, size.y.max(self.style.font_size));
        self.advance_cursor(size.x, size.y);

        let rect = Rect::from_pos_size(pos, size);
        self.set_last_item(0, rect);
        if self.is_rect_visible(rect) {
            self.draw_text(pos, color, text);
        }
    }

    /// `label` followed by `value` in the second half of the row
    pub fn labeled_text(&mut self, label: &str, value: &str) {
        let text = visible_label(label);
        let rect = self.next_item_rect(self.style.font_size);
        self.set_last_item(0, rect);
        if !self.is_rect_visible(rect) {
            return;
        }
        let colors = &self.colors;
        let (label_color, value_color) = (colors.text_disabled, colors.text);
        let value_pos = Vec2::new(rect.min.x + rect.width() * 0.5, rect.min.y);
        let label_clip = Rect::new(rect.min, Vec2::new(value_pos.x, rect.max.y));
        self.draw_text_clipped(rect.min, label_clip, label_color, text);
        self.draw_text_clipped(value_pos, rect, value_color, value);
    }

    /// Horizontal line across the available width, on its own row
    pub fn separator(&mut self) {
        let (layout, style) = self.layout_mut();
        layout.skip_vertical(0.0, style);
        let width = layout.available_width(style);
        let y = layout.cursor_pos(style).y;
        let x = layout.cursor_pos(style).x;
        let spacing = style.item_spacing.y;
        layout.skip_vertical(spacing, style);

        let color = self.colors.separator;
        let rect = Rect::new(Vec2::new(x, y), Vec2::new(x + width, y + 1.0));
        if self.is_rect_visible(rect) {
            self.widget_layer().add_line(rect.min, Vec2::new(rect.max.x, y), color, 1.0);
        }
    }

    /// Empty vertical gap of one item spacing
    pub fn vertical_spacing(&mut self) {
        let (layout, style) = self.layout_mut();
        layout.skip_vertical(style.item_spacing.y, style);
    }

    /// Move following rows right by `width`, or by the indent size when 0
    pub fn indent(&mut self, width: f32) {
        let (layout, style) = self.layout_mut();
        layout.extra_indent += if width > 0.0 { width } else { style.indent_size };
    }

    pub fn unindent(&mut self, width: f32) {
        let (layout, style) = self.layout_mut();
        let width = if width > 0.0 { width } else { style.indent_size };
        layout.extra_indent = (layout.extra_indent - width).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use plume_core::Vec2;
    use plume_platform::InputState;

    use crate::context::tests::{input_at, place_window, press, release, test_context};
    use crate::context::UiContext;
    use crate::window::WindowFlags;

    /// Run one frame with a single window at the origin holding `body`
    fn frame<R>(ui: &mut UiContext, input: &InputState, body: impl FnOnce(&mut UiContext) -> R) -> R {
        ui.new_frame(input);
        place_window(ui, Vec2::ZERO, Vec2::new(300.0, 300.0));
        assert!(ui.begin_window("Widgets", None, WindowFlags::NONE));
        let result = body(ui);
        ui.end_window();
        ui.render();
        result
    }

    #[test]
    fn test_button_press_takes_a_full_click() {
        let mut ui = test_context();
        let mut input = input_at(Vec2::new(50.0, 45.0));
        let run = |ui: &mut UiContext, input: &InputState| {
            frame(ui, input, |ui| (ui.button("OK"), ui.last_item_id()))
        };

        // appear, then become hovered
        input.new_frame(0.016);
        let (pressed, id) = run(&mut ui, &input);
        assert!(!pressed);
        assert_eq!(ui.hovered_id(), 0);
        input.new_frame(0.016);
        assert!(!run(&mut ui, &input).0);
        assert_eq!(ui.hovered_id(), id);

        press(&mut input);
        input.new_frame(0.016);
        assert!(!run(&mut ui, &input).0);
        assert_eq!(ui.active_id(), id);

        release(&mut input);
        input.new_frame(0.016);
        assert!(run(&mut ui, &input).0);
        assert_eq!(ui.active_id(), 0);
    }

    #[test]
    fn test_click_within_one_frame_is_not_a_press() {
        let mut ui = test_context();
        let mut input = input_at(Vec2::new(50.0, 45.0));
        let run = |ui: &mut UiContext, input: &InputState| {
            frame(ui, input, |ui| (ui.button("Quick"), ui.last_item_id()))
        };
        for _ in 0..2 {
            input.new_frame(0.016);
            run(&mut ui, &input);
        }

        press(&mut input);
        release(&mut input);
        input.new_frame(0.016);
        let (pressed, id) = run(&mut ui, &input);
        assert!(!pressed);
        // the click still activates the button for one frame
        assert_eq!(ui.active_id(), id);

        input.new_frame(0.016);
        assert!(!run(&mut ui, &input).0);
        assert_eq!(ui.active_id(), 0);
    }

    #[test]
    fn test_checkbox_toggles_on_release() {
        let mut ui = test_context();
        let mut input = input_at(Vec2::new(12.0, 45.0));
        let mut checked = false;

        for _ in 0..2 {
            input.new_frame(0.016);
            frame(&mut ui, &input, |ui| ui.checkbox("Enabled", &mut checked));
        }
        press(&mut input);
        input.new_frame(0.016);
        frame(&mut ui, &input, |ui| ui.checkbox("Enabled", &mut checked));
        assert!(!checked);

        release(&mut input);
        input.new_frame(0.016);
        let changed = frame(&mut ui, &input, |ui| ui.checkbox("Enabled", &mut checked));
        assert!(changed);
        assert!(checked);
    }

    #[test]
    fn test_drag_off_the_button_cancels() {
        let mut ui = test_context();
        let mut input = input_at(Vec2::new(50.0, 45.0));
        for _ in 0..2 {
            input.new_frame(0.016);
            frame(&mut ui, &input, |ui| ui.button("Go"));
        }
        press(&mut input);
        input.new_frame(0.016);
        frame(&mut ui, &input, |ui| ui.button("Go"));

        crate::context::tests::move_mouse(&mut input, Vec2::new(50.0, 250.0));
        release(&mut input);
        input.new_frame(0.016);
        assert!(!frame(&mut ui, &input, |ui| ui.button("Go")));
    }

    #[test]
    fn test_dynamic_layout_places_side_by_side() {
        let mut ui = test_context();
        let input = input_at(Vec2::new(-100.0, -100.0));
        let rects = frame(&mut ui, &input, |ui| {
            ui.layout_dynamic(20.0, 2);
            (0..3)
                .map(|i| {
                    ui.invisible_button(&format!("cell {i}"), Vec2::ZERO);
                    ui.last_item_rect()
                })
                .collect::<Vec<_>>()
        });

        let spacing = ui.style().item_spacing;
        assert_eq!(rects[0].min.y, rects[1].min.y);
        assert!(rects[1].min.x > rects[0].max.x);
        assert_eq!(rects[1].min.x - rects[0].max.x, spacing.x);
        assert_eq!(rects[2].min.x, rects[0].min.x);
        assert_eq!(rects[2].min.y, rects[0].max.y + spacing.y);
        assert_eq!(rects[0].width(), rects[1].width());
    }

    #[test]
    fn test_radio_group_and_indent() {
        let mut ui = test_context();
        let input = input_at(Vec2::new(-100.0, -100.0));
        let mut choice = 1;
        let (first, indented) = frame(&mut ui, &input, |ui| {
            ui.radio_button("One", &mut choice, 1);
            let first = ui.last_item_rect();
            ui.indent(0.0);
            ui.radio_button("Two", &mut choice, 2);
            let indented = ui.last_item_rect();
            ui.unindent(0.0);
            (first, indented)
        });
        assert_eq!(choice, 1);
        assert_eq!(indented.min.x - first.min.x, ui.style().indent_size);
    }
}
