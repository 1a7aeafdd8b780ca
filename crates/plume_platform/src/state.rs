//! Per-frame input snapshot
//!
//! Events are accumulated as they arrive; [`InputState::new_frame`] turns
//! them into the edges the UI polls during the frame.

use plume_core::Vec2;
use rustc_hash::FxHashSet;

use crate::event::{Event, WindowEvent};
use crate::input::{InputEvent, Key, KeyState, Modifiers, MouseButton, MouseEvent};

/// Tracked mouse buttons
pub const MOUSE_BUTTON_COUNT: usize = 5;
/// Seconds between two clicks that count as a double click
pub const DOUBLE_CLICK_TIME: f64 = 0.30;
/// Pixels the mouse may move between two clicks of a double click
pub const DOUBLE_CLICK_MAX_DIST: f32 = 6.0;

/// Mouse, keyboard and display state for the current frame
#[derive(Debug, Clone)]
pub struct InputState {
    // Current frame
    mouse_pos: Vec2,
    mouse_delta: Vec2,
    mouse_down: [bool; MOUSE_BUTTON_COUNT],
    mouse_clicked: [bool; MOUSE_BUTTON_COUNT],
    mouse_released: [bool; MOUSE_BUTTON_COUNT],
    mouse_double_clicked: [bool; MOUSE_BUTTON_COUNT],
    mouse_clicked_pos: [Vec2; MOUSE_BUTTON_COUNT],
    mouse_clicked_time: [f64; MOUSE_BUTTON_COUNT],
    mouse_down_duration: [f32; MOUSE_BUTTON_COUNT],
    mouse_drag_max_dist_sqr: [f32; MOUSE_BUTTON_COUNT],
    wheel: Vec2,
    keys_down: FxHashSet<Key>,
    keys_pressed: FxHashSet<Key>,
    keys_released: FxHashSet<Key>,
    modifiers: Modifiers,
    text_input: Vec<char>,
    display_size: Vec2,
    display_scale: f32,
    focused: bool,
    delta_time: f32,
    time: f64,
    frame_count: u64,

    // Accumulated since the last `new_frame`
    prev_mouse_pos: Vec2,
    pending_clicked: [bool; MOUSE_BUTTON_COUNT],
    pending_released: [bool; MOUSE_BUTTON_COUNT],
    pending_wheel: Vec2,
    pending_pressed: FxHashSet<Key>,
    pending_key_released: FxHashSet<Key>,
    pending_text: Vec<char>,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            mouse_pos: Vec2::new(-f32::MAX, -f32::MAX),
            mouse_delta: Vec2::ZERO,
            mouse_down: [false; MOUSE_BUTTON_COUNT],
            mouse_clicked: [false; MOUSE_BUTTON_COUNT],
            mouse_released: [false; MOUSE_BUTTON_COUNT],
            mouse_double_clicked: [false; MOUSE_BUTTON_COUNT],
            mouse_clicked_pos: [Vec2::ZERO; MOUSE_BUTTON_COUNT],
            mouse_clicked_time: [f64::NEG_INFINITY; MOUSE_BUTTON_COUNT],
            mouse_down_duration: [-1.0; MOUSE_BUTTON_COUNT],
            mouse_drag_max_dist_sqr: [0.0; MOUSE_BUTTON_COUNT],
            wheel: Vec2::ZERO,
            keys_down: FxHashSet::default(),
            keys_pressed: FxHashSet::default(),
            keys_released: FxHashSet::default(),
            modifiers: Modifiers::default(),
            text_input: Vec::new(),
            display_size: Vec2::new(1280.0, 720.0),
            display_scale: 1.0,
            focused: true,
            delta_time: 1.0 / 60.0,
            time: 0.0,
            frame_count: 0,
            prev_mouse_pos: Vec2::new(-f32::MAX, -f32::MAX),
            pending_clicked: [false; MOUSE_BUTTON_COUNT],
            pending_released: [false; MOUSE_BUTTON_COUNT],
            pending_wheel: Vec2::ZERO,
            pending_pressed: FxHashSet::default(),
            pending_key_released: FxHashSet::default(),
            pending_text: Vec::new(),
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Event intake
    // ========================================================================

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Window(window) => self.handle_window_event(window),
            Event::Input(input) => self.handle_input_event(input),
        }
    }

    fn handle_window_event(&mut self, event: &WindowEvent) {
        match *event {
            WindowEvent::Resized { width, height } => {
                self.display_size = Vec2::new(width, height);
            }
            WindowEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    // keys released while unfocused never reach us
                    self.keys_down.clear();
                    self.mouse_down = [false; MOUSE_BUTTON_COUNT];
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor } => {
                tracing::debug!(scale_factor, "display scale changed");
                self.display_scale = scale_factor;
            }
        }
    }

    fn handle_input_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Mouse(mouse) => match *mouse {
                MouseEvent::Moved { x, y } => self.mouse_pos = Vec2::new(x, y),
                MouseEvent::ButtonPressed { button, x, y } => {
                    self.mouse_pos = Vec2::new(x, y);
                    if let Some(i) = button.index() {
                        self.mouse_down[i] = true;
                        self.pending_clicked[i] = true;
                    }
                }
                MouseEvent::ButtonReleased { button, x, y } => {
                    self.mouse_pos = Vec2::new(x, y);
                    if let Some(i) = button.index() {
                        self.mouse_down[i] = false;
                        self.pending_released[i] = true;
                    }
                }
                MouseEvent::Left => self.mouse_pos = Vec2::new(-f32::MAX, -f32::MAX),
            },
            InputEvent::Keyboard(keyboard) => {
                self.modifiers = keyboard.modifiers;
                match keyboard.state {
                    KeyState::Pressed => {
                        self.keys_down.insert(keyboard.key);
                        self.pending_pressed.insert(keyboard.key);
                    }
                    KeyState::Released => {
                        self.keys_down.remove(&keyboard.key);
                        self.pending_key_released.insert(keyboard.key);
                    }
                }
            }
            InputEvent::Text(c) => {
                if !c.is_control() {
                    self.pending_text.push(*c);
                }
            }
            InputEvent::Scroll { delta_x, delta_y } => {
                self.pending_wheel += Vec2::new(*delta_x, *delta_y);
            }
        }
    }

    // ========================================================================
    // Frame boundary
    // ========================================================================

    /// Publish everything accumulated since the previous frame
    pub fn new_frame(&mut self, delta_time: f32) {
        self.delta_time = delta_time.max(0.0);
        self.time += self.delta_time as f64;
        self.frame_count += 1;

        let valid = |p: Vec2| p.x > -f32::MAX / 2.0 && p.y > -f32::MAX / 2.0;
        self.mouse_delta = if valid(self.mouse_pos) && valid(self.prev_mouse_pos) {
            self.mouse_pos - self.prev_mouse_pos
        } else {
            Vec2::ZERO
        };
        self.prev_mouse_pos = self.mouse_pos;

        for i in 0..MOUSE_BUTTON_COUNT {
            self.mouse_clicked[i] = std::mem::take(&mut self.pending_clicked[i]);
            self.mouse_released[i] = std::mem::take(&mut self.pending_released[i]);
            self.mouse_double_clicked[i] = false;

            if self.mouse_clicked[i] {
                let since_last = self.time - self.mouse_clicked_time[i];
                let moved = (self.mouse_pos - self.mouse_clicked_pos[i]).length_squared();
                if since_last < DOUBLE_CLICK_TIME
                    && moved < DOUBLE_CLICK_MAX_DIST * DOUBLE_CLICK_MAX_DIST
                {
                    self.mouse_double_clicked[i] = true;
                    // a third click starts a new pair
                    self.mouse_clicked_time[i] = f64::NEG_INFINITY;
                } else {
                    self.mouse_clicked_time[i] = self.time;
                }
                self.mouse_clicked_pos[i] = self.mouse_pos;
                self.mouse_drag_max_dist_sqr[i] = 0.0;
                self.mouse_down_duration[i] = 0.0;
            } else if self.mouse_down[i] {
                self.mouse_down_duration[i] += self.delta_time;
                let dist = (self.mouse_pos - self.mouse_clicked_pos[i]).length_squared();
                self.mouse_drag_max_dist_sqr[i] = self.mouse_drag_max_dist_sqr[i].max(dist);
            } else {
                self.mouse_down_duration[i] = -1.0;
            }
        }

        self.wheel = std::mem::take(&mut self.pending_wheel);
        std::mem::swap(&mut self.keys_pressed, &mut self.pending_pressed);
        self.pending_pressed.clear();
        std::mem::swap(&mut self.keys_released, &mut self.pending_key_released);
        self.pending_key_released.clear();
        std::mem::swap(&mut self.text_input, &mut self.pending_text);
        self.pending_text.clear();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn mouse_pos(&self) -> Vec2 {
        self.mouse_pos
    }

    /// Whether the mouse position is inside the window
    pub fn is_mouse_pos_valid(&self) -> bool {
        self.mouse_pos.x > -f32::MAX / 2.0 && self.mouse_pos.y > -f32::MAX / 2.0
    }

    /// Movement since the previous frame
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.slot(button).is_some_and(|i| self.mouse_down[i])
    }

    /// Pressed since the previous frame
    pub fn mouse_clicked(&self, button: MouseButton) -> bool {
        self.slot(button).is_some_and(|i| self.mouse_clicked[i])
    }

    /// Released since the previous frame
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        self.slot(button).is_some_and(|i| self.mouse_released[i])
    }

    pub fn mouse_double_clicked(&self, button: MouseButton) -> bool {
        self.slot(button).is_some_and(|i| self.mouse_double_clicked[i])
    }

    /// Where the current press started
    pub fn mouse_clicked_pos(&self, button: MouseButton) -> Vec2 {
        self.slot(button)
            .map_or(Vec2::ZERO, |i| self.mouse_clicked_pos[i])
    }

    /// Seconds the button has been held, negative when up
    pub fn mouse_down_duration(&self, button: MouseButton) -> f32 {
        self.slot(button)
            .map_or(-1.0, |i| self.mouse_down_duration[i])
    }

    /// Whether the button is held and has moved at least `threshold` pixels
    pub fn is_mouse_dragging(&self, button: MouseButton, threshold: f32) -> bool {
        self.slot(button).is_some_and(|i| {
            self.mouse_down[i] && self.mouse_drag_max_dist_sqr[i] >= threshold * threshold
        })
    }

    /// Offset from the press position while dragging, zero otherwise
    pub fn mouse_drag_delta(&self, button: MouseButton, threshold: f32) -> Vec2 {
        match self.slot(button) {
            Some(i) if self.is_mouse_dragging(button, threshold) => {
                self.mouse_pos - self.mouse_clicked_pos[i]
            }
            _ => Vec2::ZERO,
        }
    }

    /// Wheel movement since the previous frame, y positive away from the user
    pub fn wheel(&self) -> Vec2 {
        self.wheel
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// Pressed (or auto-repeated) since the previous frame
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn key_released(&self, key: Key) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Characters typed since the previous frame
    pub fn text_input(&self) -> &[char] {
        &self.text_input
    }

    pub fn display_size(&self) -> Vec2 {
        self.display_size
    }

    pub fn display_scale(&self) -> f32 {
        self.display_scale
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Seconds accumulated over all frames
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn slot(&self, button: MouseButton) -> Option<usize> {
        button.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyboardEvent;

    fn mouse(state: &mut InputState, event: MouseEvent) {
        state.handle_event(&Event::Input(InputEvent::Mouse(event)));
    }

    fn click(state: &mut InputState, x: f32, y: f32) {
        mouse(
            state,
            MouseEvent::ButtonPressed {
                button: MouseButton::Left,
                x,
                y,
            },
        );
        state.new_frame(0.05);
        mouse(
            state,
            MouseEvent::ButtonReleased {
                button: MouseButton::Left,
                x,
                y,
            },
        );
        state.new_frame(0.05);
    }

    #[test]
    fn test_click_and_release_edges() {
        let mut state = InputState::new();
        mouse(
            &mut state,
            MouseEvent::ButtonPressed {
                button: MouseButton::Left,
                x: 5.0,
                y: 5.0,
            },
        );
        state.new_frame(0.016);
        assert!(state.mouse_clicked(MouseButton::Left));
        assert!(state.mouse_down(MouseButton::Left));
        assert!(!state.mouse_released(MouseButton::Left));

        state.new_frame(0.016);
        assert!(!state.mouse_clicked(MouseButton::Left));
        assert!(state.mouse_down(MouseButton::Left));

        mouse(
            &mut state,
            MouseEvent::ButtonReleased {
                button: MouseButton::Left,
                x: 5.0,
                y: 5.0,
            },
        );
        state.new_frame(0.016);
        assert!(state.mouse_released(MouseButton::Left));
        assert!(!state.mouse_down(MouseButton::Left));
    }

    #[test]
    fn test_double_click_window() {
        let mut state = InputState::new();
        mouse(
            &mut state,
            MouseEvent::ButtonPressed {
                button: MouseButton::Left,
                x: 10.0,
                y: 10.0,
            },
        );
        state.new_frame(0.05);
        mouse(
            &mut state,
            MouseEvent::ButtonReleased {
                button: MouseButton::Left,
                x: 10.0,
                y: 10.0,
            },
        );
        mouse(
            &mut state,
            MouseEvent::ButtonPressed {
                button: MouseButton::Left,
                x: 12.0,
                y: 11.0,
            },
        );
        state.new_frame(0.1);
        assert!(state.mouse_double_clicked(MouseButton::Left));
    }

    #[test]
    fn test_slow_second_click_is_not_double() {
        let mut state = InputState::new();
        click(&mut state, 10.0, 10.0);
        state.new_frame(0.5);
        mouse(
            &mut state,
            MouseEvent::ButtonPressed {
                button: MouseButton::Left,
                x: 10.0,
                y: 10.0,
            },
        );
        state.new_frame(0.05);
        assert!(state.mouse_clicked(MouseButton::Left));
        assert!(!state.mouse_double_clicked(MouseButton::Left));
    }

    #[test]
    fn test_drag_delta_respects_threshold() {
        let mut state = InputState::new();
        mouse(
            &mut state,
            MouseEvent::ButtonPressed {
                button: MouseButton::Left,
                x: 0.0,
                y: 0.0,
            },
        );
        state.new_frame(0.016);
        mouse(&mut state, MouseEvent::Moved { x: 2.0, y: 0.0 });
        state.new_frame(0.016);
        assert_eq!(state.mouse_drag_delta(MouseButton::Left, 5.0), Vec2::ZERO);
        assert_eq!(state.mouse_delta(), Vec2::new(2.0, 0.0));

        mouse(&mut state, MouseEvent::Moved { x: 10.0, y: 4.0 });
        state.new_frame(0.016);
        assert_eq!(
            state.mouse_drag_delta(MouseButton::Left, 5.0),
            Vec2::new(10.0, 4.0)
        );
    }

    #[test]
    fn test_key_edges_and_text() {
        let mut state = InputState::new();
        state.handle_event(&Event::Input(InputEvent::Keyboard(KeyboardEvent::pressed(
            Key::Backspace,
            Modifiers::CTRL,
        ))));
        state.handle_event(&Event::Input(InputEvent::Text('h')));
        state.handle_event(&Event::Input(InputEvent::Text('\u{8}')));
        state.handle_event(&Event::Input(InputEvent::Text('i')));
        state.new_frame(0.016);

        assert!(state.key_pressed(Key::Backspace));
        assert!(state.key_down(Key::Backspace));
        assert!(state.modifiers().ctrl);
        assert_eq!(state.text_input(), &['h', 'i']);

        state.handle_event(&Event::Input(InputEvent::Keyboard(KeyboardEvent::released(
            Key::Backspace,
            Modifiers::NONE,
        ))));
        state.new_frame(0.016);
        assert!(!state.key_pressed(Key::Backspace));
        assert!(state.key_released(Key::Backspace));
        assert!(!state.key_down(Key::Backspace));
        assert!(state.text_input().is_empty());
    }

    #[test]
    fn test_window_events() {
        let mut state = InputState::new();
        state.handle_event(&WindowEvent::Resized {
            width: 800.0,
            height: 600.0,
        }
        .into());
        state.handle_event(&WindowEvent::ScaleFactorChanged { scale_factor: 2.0 }.into());
        state.handle_event(&InputEvent::Scroll {
            delta_x: 0.0,
            delta_y: -1.0,
        }
        .into());
        state.new_frame(0.016);

        assert_eq!(state.display_size(), Vec2::new(800.0, 600.0));
        assert_eq!(state.display_scale(), 2.0);
        assert_eq!(state.wheel(), Vec2::new(0.0, -1.0));
        state.new_frame(0.016);
        assert_eq!(state.wheel(), Vec2::ZERO);
    }
}
