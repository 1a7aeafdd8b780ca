//! Text and number input fields

use plume_core::{Rect, Vec2};
use plume_platform::{Key, MouseButton};
use plume_text::Font;

use crate::context::UiContext;
use crate::text_edit::{filter_char, InputTextFlags, InputTextState};
use crate::widgets::slider::format_value;

/// Character limit of `input_text` and `input_text_hint`
pub const DEFAULT_MAX_LEN: usize = 256;

/// What the keys of one frame did to the focused field
#[derive(Clone, Copy, Debug, Default)]
struct KeyOutcome {
    changed: bool,
    enter: bool,
    escape: bool,
}

/// Pen x offset before each character and after the last one
fn char_offsets(font: &Font, size: f32, text: &str) -> Vec<f32> {
    let mut offsets = Vec::with_capacity(text.len() + 1);
    offsets.push(0.0);
    offsets.extend(font.layout(size, Vec2::ZERO, text.as_bytes(), 0.0).map(|glyph| glyph.pen.x));
    offsets
}

/// Character index whose boundary is closest to `x`
fn index_at(offsets: &[f32], x: f32) -> usize {
    offsets
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - x).abs().total_cmp(&(*b - x).abs()))
        .map_or(0, |(index, _)| index)
}

impl UiContext {
    pub fn input_text(&mut self, label: &str, text: &mut String) -> bool {
        self.input_text_ex(label, "", text, DEFAULT_MAX_LEN, InputTextFlags::NONE)
    }

    /// Input field showing `hint` while it is empty
    pub fn input_text_hint(&mut self, label: &str, hint: &str, text: &mut String) -> bool {
        self.input_text_ex(label, hint, text, DEFAULT_MAX_LEN, InputTextFlags::NONE)
    }

    /// Single-line text field
    ///
    /// Clicking the field copies `text` into the shared edit state; edits
    /// are written back as they happen, or only on Enter with
    /// `ENTER_RETURNS_TRUE`. Escape restores the text the field had when it
    /// was activated. Returns `true` when `text` changed (or Enter was
    /// pressed with `ENTER_RETURNS_TRUE`).
    pub fn input_text_ex(
        &mut self,
        label: &str,
        hint: &str,
        text: &mut String,
        max_len: usize,
        flags: InputTextFlags,
    ) -> bool {
        let id = self.get_id(label);
        let (frame, _) = self.framed_item(label);
        let state = self.item_behavior(frame, id);
        let clicked = self.io.mouse_clicked(MouseButton::Left);

        let mut editing = self.input_text.as_ref().is_some_and(|edit| edit.id == id);
        let mut just_activated = false;
        if clicked && state.hovered && !editing {
            self.input_text = Some(InputTextState::new(id, text, flags));
            editing = true;
            just_activated = true;
            tracing::trace!(id, "input field activated");
        } else if clicked && !state.hovered && editing {
            // clicked elsewhere: the internal copy is dropped
            self.input_text = None;
            editing = false;
        }

        let font = self.font();
        let size = self.style.font_size;
        let text_origin_x = frame.min.x + self.style.frame_padding.x;
        let mut result = false;

        let taken = if editing { self.input_text.take() } else { None };
        if let Some(mut edit) = taken {
            let auto_select = just_activated && flags.contains(InputTextFlags::AUTO_SELECT_ALL);
            if clicked && state.hovered && !auto_select {
                let offsets = char_offsets(&font, size, &edit.edit.text());
                let x = self.io.mouse_pos().x - text_origin_x + edit.scroll_x;
                edit.edit.set_cursor(index_at(&offsets, x));
            }

            let outcome = self.input_text_keys(&mut edit, max_len);
            if outcome.escape {
                let restored = if flags.contains(InputTextFlags::ESCAPE_CLEARS_ALL) {
                    String::new()
                } else {
                    edit.initial.clone()
                };
                result = *text != restored && !flags.contains(InputTextFlags::ENTER_RETURNS_TRUE);
                if !flags.contains(InputTextFlags::ENTER_RETURNS_TRUE) {
                    *text = restored;
                }
                editing = false;
            } else if outcome.enter {
                if flags.contains(InputTextFlags::ENTER_RETURNS_TRUE) {
                    *text = edit.edit.text();
                    result = true;
                }
                editing = false;
            } else if outcome.changed && !flags.contains(InputTextFlags::ENTER_RETURNS_TRUE) {
                *text = edit.edit.text();
                result = true;
            }

            if editing {
                let offsets = char_offsets(&font, size, &self.display_text(&edit));
                let cursor_x = offsets.get(edit.edit.cursor()).copied().unwrap_or(0.0);
                let visible = (frame.width() - self.style.frame_padding.x * 2.0).max(1.0);
                if cursor_x - edit.scroll_x > visible {
                    edit.scroll_x = cursor_x - visible;
                } else if cursor_x < edit.scroll_x {
                    edit.scroll_x = cursor_x;
                }
                self.draw_input_frame(frame, state.hovered, true);
                self.draw_edit(frame, &edit, &offsets);
                self.input_text = Some(edit);
                self.mark_last_item_active();
            } else {
                tracing::trace!(id, "input field deactivated");
            }
        }

        if !editing {
            self.draw_input_frame(frame, state.hovered, false);
            let pos = Vec2::new(text_origin_x, frame.min.y + self.style.frame_padding.y);
            if text.is_empty() {
                let color = self.colors.text_disabled;
                self.draw_text_clipped(pos, frame, color, hint);
            } else {
                let shown = if flags.contains(InputTextFlags::PASSWORD) {
                    "*".repeat(text.chars().count())
                } else {
                    text.clone()
                };
                let color = self.colors.text;
                self.push_item_clip(frame);
                self.draw_text(pos, color, &shown);
                self.pop_item_clip();
            }
        }
        result
    }

    /// Field editing an `f32`; `format` is used while the field is inactive
    pub fn input_float(&mut self, label: &str, value: &mut f32, format: &str) -> bool {
        let mut buffer = format_value(format, *value as f64);
        let flags = InputTextFlags::CHARS_SCIENTIFIC | InputTextFlags::AUTO_SELECT_ALL;
        if !self.input_text_ex(label, "", &mut buffer, 64, flags) {
            return false;
        }
        match buffer.trim().parse::<f32>() {
            Ok(parsed) if parsed != *value => {
                *value = parsed;
                true
            }
            _ => false,
        }
    }

    pub fn input_int(&mut self, label: &str, value: &mut i32) -> bool {
        let mut buffer = value.to_string();
        let flags = InputTextFlags::CHARS_DECIMAL | InputTextFlags::AUTO_SELECT_ALL;
        if !self.input_text_ex(label, "", &mut buffer, 32, flags) {
            return false;
        }
        match buffer.trim().parse::<i32>() {
            Ok(parsed) if parsed != *value => {
                *value = parsed;
                true
            }
            _ => false,
        }
    }

    fn display_text(&self, edit: &InputTextState) -> String {
        if edit.flags.contains(InputTextFlags::PASSWORD) {
            "*".repeat(edit.edit.len())
        } else {
            edit.edit.text()
        }
    }

    /// Apply this frame's keys and typed characters to the focused field
    fn input_text_keys(&self, edit: &mut InputTextState, max_len: usize) -> KeyOutcome {
        let io = &self.io;
        let flags = edit.flags;
        let mods = io.modifiers();
        let shift = mods.shift;
        let shortcut = mods.shortcut();
        let read_only = flags.contains(InputTextFlags::READ_ONLY);
        let undo_allowed = !read_only && !flags.contains(InputTextFlags::NO_UNDO_REDO);
        let state = &mut edit.edit;
        let mut outcome = KeyOutcome::default();

        if io.key_pressed(Key::Left) {
            state.move_left(shift);
        }
        if io.key_pressed(Key::Right) {
            state.move_right(shift);
        }
        if io.key_pressed(Key::Home) {
            state.move_home(shift);
        }
        if io.key_pressed(Key::End) {
            state.move_end(shift);
        }
        if shortcut && io.key_pressed(Key::A) {
            state.select_all();
        }

        if !read_only {
            if io.key_pressed(Key::Backspace) {
                outcome.changed |= state.delete_backward();
            }
            if io.key_pressed(Key::Delete) {
                outcome.changed |= state.delete_forward();
            }
            if !shortcut {
                let typed: Vec<char> = io
                    .text_input()
                    .iter()
                    .filter_map(|&c| filter_char(c, flags))
                    .collect();
                if !typed.is_empty() {
                    outcome.changed |= state.insert(&typed, max_len);
                }
            }
        }

        if undo_allowed && shortcut {
            if io.key_pressed(Key::Z) && !shift {
                outcome.changed |= state.undo();
            } else if io.key_pressed(Key::Y) || (io.key_pressed(Key::Z) && shift) {
                outcome.changed |= state.redo();
            }
        }
        if flags.contains(InputTextFlags::NO_UNDO_REDO) {
            state.clear_history();
        }

        outcome.enter = io.key_pressed(Key::Enter) || io.key_pressed(Key::KeypadEnter);
        outcome.escape = io.key_pressed(Key::Escape);
        outcome
    }

    fn draw_input_frame(&mut self, frame: Rect, hovered: bool, editing: bool) {
        let colors = &self.colors;
        let color = if editing {
            colors.frame_bg_active
        } else if hovered {
            colors.frame_bg_hovered
        } else {
            colors.frame_bg
        };
        self.widget_layer().add_rect_filled(frame.min, frame.max, color);
    }

    /// Text, selection and cursor of the focused field
    fn draw_edit(&mut self, frame: Rect, edit: &InputTextState, offsets: &[f32]) {
        let padding = self.style.frame_padding;
        let origin = Vec2::new(frame.min.x + padding.x - edit.scroll_x, frame.min.y + padding.y);
        let line = Vec2::new(0.0, self.style.font_size);
        let x_at = |index: usize| origin.x + offsets.get(index).copied().unwrap_or(0.0);

        let colors = &self.colors;
        let (selected_bg, text_color) = (colors.text_selected_bg, colors.text);
        let blink_on = (self.io.time() * 1.5).fract() < 0.66;
        let shown = self.display_text(edit);

        self.push_item_clip(frame);
        if let Some((start, end)) = edit.edit.selection() {
            let min = Vec2::new(x_at(start), origin.y);
            let max = Vec2::new(x_at(end), origin.y) + line;
            self.widget_layer().add_rect_filled(min, max, selected_bg);
        }
        self.draw_text(origin, text_color, &shown);
        if blink_on {
            let x = x_at(edit.edit.cursor());
            let top = Vec2::new(x, origin.y);
            self.widget_layer().add_line(top, top + line, text_color, 1.0);
        }
        self.pop_item_clip();
    }
}

#[cfg(test)]
mod tests {
    use plume_core::Vec2;
    use plume_platform::{Event, InputEvent, InputState, Key, KeyboardEvent, Modifiers};

    use super::*;
    use crate::context::tests::{input_at, place_window, press, release, test_context};
    use crate::window::WindowFlags;

    fn key(input: &mut InputState, key: Key, mods: Modifiers) {
        input.handle_event(&Event::Input(InputEvent::Keyboard(KeyboardEvent::pressed(key, mods))));
        input.handle_event(&Event::Input(InputEvent::Keyboard(KeyboardEvent::released(key, mods))));
    }

    fn type_text(input: &mut InputState, text: &str) {
        for c in text.chars() {
            input.handle_event(&Event::Input(InputEvent::Text(c)));
        }
    }

    struct Harness {
        ui: UiContext,
        input: InputState,
    }

    impl Harness {
        /// Field placed at the top of a window, mouse over its right end
        fn new() -> Self {
            Self {
                ui: test_context(),
                input: input_at(Vec2::new(150.0, 45.0)),
            }
        }

        fn frame(&mut self, text: &mut String, flags: InputTextFlags) -> bool {
            self.input.new_frame(0.016);
            self.ui.new_frame(&self.input);
            place_window(&mut self.ui, Vec2::ZERO, Vec2::new(300.0, 300.0));
            assert!(self.ui.begin_window("Form", None, WindowFlags::NONE));
            let changed = self.ui.input_text_ex("##name", "", text, DEFAULT_MAX_LEN, flags);
            self.ui.end_window();
            self.ui.render();
            changed
        }

        /// Hover and click the field so it starts editing
        fn activate(&mut self, text: &mut String, flags: InputTextFlags) {
            self.frame(text, flags);
            self.frame(text, flags);
            press(&mut self.input);
            self.frame(text, flags);
            release(&mut self.input);
            self.frame(text, flags);
            assert!(self.ui.input_text.is_some());
        }
    }

    #[test]
    fn test_typing_writes_back() {
        let mut h = Harness::new();
        let mut text = String::from("ab");
        h.activate(&mut text, InputTextFlags::NONE);

        type_text(&mut h.input, "c");
        assert!(h.frame(&mut text, InputTextFlags::NONE));
        assert_eq!(text, "abc");

        key(&mut h.input, Key::Backspace, Modifiers::NONE);
        assert!(h.frame(&mut text, InputTextFlags::NONE));
        assert_eq!(text, "ab");
    }

    #[test]
    fn test_escape_reverts() {
        let mut h = Harness::new();
        let mut text = String::from("ab");
        h.activate(&mut text, InputTextFlags::NONE);

        type_text(&mut h.input, "xyz");
        h.frame(&mut text, InputTextFlags::NONE);
        assert_eq!(text, "abxyz");

        key(&mut h.input, Key::Escape, Modifiers::NONE);
        assert!(h.frame(&mut text, InputTextFlags::NONE));
        assert_eq!(text, "ab");
        assert!(h.ui.input_text.is_none());
    }

    #[test]
    fn test_undo_shortcut() {
        let mut h = Harness::new();
        let mut text = String::new();
        h.activate(&mut text, InputTextFlags::NONE);

        type_text(&mut h.input, "hello");
        h.frame(&mut text, InputTextFlags::NONE);
        key(&mut h.input, Key::Z, Modifiers::CTRL);
        assert!(h.frame(&mut text, InputTextFlags::NONE));
        assert_eq!(text, "");
    }

    #[test]
    fn test_enter_returns_true() {
        let flags = InputTextFlags::ENTER_RETURNS_TRUE | InputTextFlags::CHARS_UPPERCASE;
        let mut h = Harness::new();
        let mut text = String::new();
        h.activate(&mut text, flags);

        type_text(&mut h.input, "ok");
        assert!(!h.frame(&mut text, flags));
        assert_eq!(text, "");

        key(&mut h.input, Key::Enter, Modifiers::NONE);
        assert!(h.frame(&mut text, flags));
        assert_eq!(text, "OK");
        assert!(h.ui.input_text.is_none());
    }

    #[test]
    fn test_click_elsewhere_deactivates() {
        let mut h = Harness::new();
        let mut text = String::from("keep");
        h.activate(&mut text, InputTextFlags::NONE);

        crate::context::tests::move_mouse(&mut h.input, Vec2::new(150.0, 250.0));
        press(&mut h.input);
        h.frame(&mut text, InputTextFlags::NONE);
        assert!(h.ui.input_text.is_none());
        assert_eq!(text, "keep");
    }

    #[test]
    fn test_index_at_picks_nearest_boundary() {
        let offsets = [0.0, 7.0, 14.0, 21.0];
        assert_eq!(index_at(&offsets, -3.0), 0);
        assert_eq!(index_at(&offsets, 9.0), 1);
        assert_eq!(index_at(&offsets, 12.0), 2);
        assert_eq!(index_at(&offsets, 100.0), 3);
    }
}
