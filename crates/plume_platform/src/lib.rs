//! Plume Platform Input Layer
//!
//! Platform-agnostic input types and the polled input snapshot the UI reads
//! once per frame.
//!
//! # Architecture
//!
//! A platform integration (winit, SDL, a test harness) translates its native
//! events into [`Event`]s and feeds them to [`InputState::handle_event`].
//! Once per frame [`InputState::new_frame`] turns the accumulated events into
//! per-frame edges: clicks, releases, double clicks, key presses and typed
//! characters.
//!
//! # Example
//!
//! ```ignore
//! use plume_platform::*;
//!
//! let mut input = InputState::new();
//! input.handle_event(&Event::Input(InputEvent::Mouse(MouseEvent::Moved { x: 10.0, y: 20.0 })));
//! input.handle_event(&Event::Input(InputEvent::Mouse(MouseEvent::ButtonPressed {
//!     button: MouseButton::Left,
//!     x: 10.0,
//!     y: 20.0,
//! })));
//! input.new_frame(1.0 / 60.0);
//! assert!(input.mouse_clicked(MouseButton::Left));
//! ```

mod event;
mod input;
mod state;

pub use event::{Event, WindowEvent};
pub use input::{InputEvent, Key, KeyState, KeyboardEvent, Modifiers, MouseButton, MouseEvent};
pub use state::{InputState, DOUBLE_CLICK_MAX_DIST, DOUBLE_CLICK_TIME, MOUSE_BUTTON_COUNT};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::event::{Event, WindowEvent};
    pub use crate::input::{
        InputEvent, Key, KeyState, KeyboardEvent, Modifiers, MouseButton, MouseEvent,
    };
    pub use crate::state::InputState;
}
