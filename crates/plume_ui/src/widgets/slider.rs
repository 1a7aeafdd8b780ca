//! Sliders, drags and value formatting

use plume_core::{Rect, Vec2};
use plume_platform::MouseButton;

use crate::context::{ItemState, UiContext};

/// Render `value` through a printf-style format
///
/// Understands `%f`, `%.Nf`, `%d`, `%i` and `%%`; everything else is copied
/// through, so `"%.1f ms"` renders as `"16.7 ms"`.
pub fn format_value(format: &str, value: f64) -> String {
    let mut out = String::with_capacity(format.len() + 8);
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some('d') | Some('i') => {
                chars.next();
                out.push_str(&format!("{}", value.round() as i64));
            }
            Some('f') => {
                chars.next();
                out.push_str(&format!("{value:.6}"));
            }
            Some('.') => {
                chars.next();
                let mut precision = String::new();
                while let Some(&digit) = chars.peek() {
                    if !digit.is_ascii_digit() {
                        break;
                    }
                    precision.push(digit);
                    chars.next();
                }
                if chars.peek() == Some(&'f') {
                    chars.next();
                    let precision = precision.parse::<usize>().unwrap_or(0);
                    out.push_str(&format!("{value:.precision$}"));
                } else {
                    out.push('%');
                    out.push('.');
                    out.push_str(&precision);
                }
            }
            _ => out.push('%'),
        }
    }
    out
}

/// Position of `value` within `min..=max`, in `0..=1`
fn normalized(value: f32, min: f32, max: f32) -> f32 {
    if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl UiContext {
    pub fn slider_float(&mut self, label: &str, value: &mut f32, min: f32, max: f32) -> bool {
        self.slider_float_f(label, value, min, max, "%.3f")
    }

    /// Horizontal slider over `min..=max`; returns `true` when `value` changed
    pub fn slider_float_f(
        &mut self,
        label: &str,
        value: &mut f32,
        min: f32,
        max: f32,
        format: &str,
    ) -> bool {
        let id = self.get_id(label);
        let (frame, _) = self.framed_item(label);
        let state = self.item_behavior(frame, id);

        let mut changed = false;
        if let Some(t) = self.slider_target(frame, state) {
            let new_value = min + t * (max - min);
            if new_value != *value {
                *value = new_value;
                changed = true;
            }
        }

        let text = format_value(format, *value as f64);
        self.draw_slider(frame, state, normalized(*value, min, max), &text);
        changed
    }

    pub fn slider_int(&mut self, label: &str, value: &mut i32, min: i32, max: i32) -> bool {
        self.slider_int_f(label, value, min, max, "%d")
    }

    /// Integer slider; the grab snaps to whole values
    pub fn slider_int_f(
        &mut self,
        label: &str,
        value: &mut i32,
        min: i32,
        max: i32,
        format: &str,
    ) -> bool {
        let id = self.get_id(label);
        let (frame, _) = self.framed_item(label);
        let state = self.item_behavior(frame, id);

        let mut changed = false;
        if let Some(t) = self.slider_target(frame, state) {
            let new_value = (min as f32 + t * (max - min) as f32).round() as i32;
            if new_value != *value {
                *value = new_value;
                changed = true;
            }
        }

        let t = normalized(*value as f32, min as f32, max as f32);
        self.draw_slider(frame, state, t, &format_value(format, *value as f64));
        changed
    }

    pub fn drag_float(
        &mut self,
        label: &str,
        value: &mut f32,
        speed: f32,
        min: f32,
        max: f32,
    ) -> bool {
        self.drag_float_f(label, value, speed, min, max, "%.3f")
    }

    /// Change `value` by horizontal mouse movement times `speed` while held
    ///
    /// The result is clamped to `min..=max` when `min < max`.
    pub fn drag_float_f(
        &mut self,
        label: &str,
        value: &mut f32,
        speed: f32,
        min: f32,
        max: f32,
        format: &str,
    ) -> bool {
        let id = self.get_id(label);
        let (frame, _) = self.framed_item(label);
        let state = self.item_behavior(frame, id);

        let mut changed = false;
        let delta = self.io.mouse_delta().x;
        if state.held && delta != 0.0 {
            let mut new_value = *value + delta * speed;
            if min < max {
                new_value = new_value.clamp(min, max);
            }
            if new_value != *value {
                *value = new_value;
                changed = true;
            }
        }

        if self.is_rect_visible(frame) {
            let colors = &self.colors;
            let palette = [colors.frame_bg, colors.frame_bg_hovered, colors.frame_bg_active];
            let text_color = colors.text;
            self.draw_frame(frame, state, palette);
            let text = format_value(format, *value as f64);
            let pos = frame.center() - self.text_size(&text) * 0.5;
            self.draw_text_clipped(pos, frame, text_color, &text);
        }
        changed
    }

    /// Where the mouse puts the grab, while the slider is clicked or held
    fn slider_target(&self, frame: Rect, state: ItemState) -> Option<f32> {
        let clicked = state.hovered && self.io.mouse_clicked(MouseButton::Left);
        if !(state.held || clicked) {
            return None;
        }
        let grab = self.style.slider_size;
        let track = (frame.width() - grab).max(1.0);
        let x = self.io.mouse_pos().x - frame.min.x - grab * 0.5;
        Some((x / track).clamp(0.0, 1.0))
    }

    fn draw_slider(&mut self, frame: Rect, state: ItemState, t: f32, text: &str) {
        if !self.is_rect_visible(frame) {
            return;
        }
        let grab_width = self.style.slider_size;
        let grab_x = frame.min.x + t * (frame.width() - grab_width).max(0.0);
        let grab = Rect::new(
            Vec2::new(grab_x, frame.min.y + 2.0),
            Vec2::new(grab_x + grab_width, frame.max.y - 2.0),
        );

        let colors = &self.colors;
        let palette = [colors.frame_bg, colors.frame_bg_hovered, colors.frame_bg_active];
        let grab_color = if state.held {
            colors.button_active
        } else {
            colors.button
        };
        let text_color = colors.text;
        self.draw_frame(frame, state, palette);
        self.widget_layer().add_rect_filled(grab.min, grab.max, grab_color);

        let pos = frame.center() - self.text_size(text) * 0.5;
        self.draw_text_clipped(pos, frame, text_color, text);
    }
}

#[cfg(test)]
mod tests {
    use plume_core::Vec2;
    use plume_platform::InputState;

    use super::*;
    use crate::context::tests::{input_at, move_mouse, place_window, press, release, test_context};
    use crate::window::WindowFlags;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value("%.2f", 3.14159), "3.14");
        assert_eq!(format_value("%.0f", 2.4), "2");
        assert_eq!(format_value("%d", 41.6), "42");
        assert_eq!(format_value("%.1f ms", 16.66), "16.7 ms");
        assert_eq!(format_value("100%%", 0.0), "100%");
        assert_eq!(format_value("%f", 1.0), "1.000000");
        assert_eq!(format_value("x = %q", 1.0), "x = %q");
    }

    #[test]
    fn test_normalized_handles_empty_range() {
        assert_eq!(normalized(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalized(50.0, 0.0, 10.0), 1.0);
        assert_eq!(normalized(1.0, 3.0, 3.0), 0.0);
    }

    fn slider_frame(ui: &mut UiContext, input: &InputState, value: &mut i32) -> bool {
        ui.new_frame(input);
        place_window(ui, Vec2::ZERO, Vec2::new(300.0, 300.0));
        assert!(ui.begin_window("Sliders", None, WindowFlags::NONE));
        let changed = ui.slider_int("##level", value, 0, 10);
        ui.end_window();
        ui.render();
        changed
    }

    #[test]
    fn test_slider_follows_mouse() {
        let mut ui = test_context();
        let mut input = input_at(Vec2::new(20.0, 45.0));
        let mut value = 3;

        for _ in 0..2 {
            input.new_frame(0.016);
            assert!(!slider_frame(&mut ui, &input, &mut value));
        }

        // click near the left end snaps to the minimum
        press(&mut input);
        input.new_frame(0.016);
        assert!(slider_frame(&mut ui, &input, &mut value));
        assert_eq!(value, 0);

        // dragging past the right end clamps to the maximum
        move_mouse(&mut input, Vec2::new(400.0, 45.0));
        input.new_frame(0.016);
        assert!(slider_frame(&mut ui, &input, &mut value));
        assert_eq!(value, 10);
    }

    /// Frame with one drag field; returns the change flag and the vertex count
    fn drag_frame(
        ui: &mut UiContext,
        input: &InputState,
        value: &mut f32,
        format: &str,
    ) -> (bool, usize) {
        ui.new_frame(input);
        place_window(ui, Vec2::ZERO, Vec2::new(300.0, 300.0));
        assert!(ui.begin_window("Drags", None, WindowFlags::NONE));
        let changed = ui.drag_float_f("##exposure", value, 0.5, -5.0, 5.0, format);
        ui.end_window();
        let vertices = ui.render().vertices.len();
        (changed, vertices)
    }

    #[test]
    fn test_drag_moves_by_speed_and_clamps() {
        let mut ui = test_context();
        let mut input = input_at(Vec2::new(50.0, 45.0));
        let mut value = 1.0;

        for _ in 0..2 {
            input.new_frame(0.016);
            assert!(!drag_frame(&mut ui, &input, &mut value, "%.1f EV").0);
        }
        press(&mut input);
        input.new_frame(0.016);
        assert!(!drag_frame(&mut ui, &input, &mut value, "%.1f EV").0);
        assert_eq!(value, 1.0);

        move_mouse(&mut input, Vec2::new(54.0, 45.0));
        input.new_frame(0.016);
        assert!(drag_frame(&mut ui, &input, &mut value, "%.1f EV").0);
        assert_eq!(value, 3.0);

        move_mouse(&mut input, Vec2::new(64.0, 45.0));
        input.new_frame(0.016);
        assert!(drag_frame(&mut ui, &input, &mut value, "%.1f EV").0);
        assert_eq!(value, 5.0);

        // released: further movement leaves the value alone
        release(&mut input);
        move_mouse(&mut input, Vec2::new(40.0, 45.0));
        input.new_frame(0.016);
        assert!(!drag_frame(&mut ui, &input, &mut value, "%.1f EV").0);
        assert_eq!(value, 5.0);
    }

    #[test]
    fn test_drag_label_uses_format() {
        let input = input_at(Vec2::new(-100.0, -100.0));
        let mut short = test_context();
        let mut long = test_context();
        let mut value = 2.5;

        drag_frame(&mut short, &input, &mut value, "%.1f");
        drag_frame(&mut long, &input, &mut value, "%.3f");
        let (_, short_vertices) = drag_frame(&mut short, &input, &mut value, "%.1f");
        let (_, long_vertices) = drag_frame(&mut long, &input, &mut value, "%.3f");

        // "2.500" has two more glyphs than "2.5"
        assert_eq!(long_vertices - short_vertices, 2 * 4);
        let width = |ui: &UiContext, format: &str| ui.text_size(&format_value(format, 2.5)).x;
        assert!(width(&short, "%.1f") < width(&long, "%.3f"));
    }
}
