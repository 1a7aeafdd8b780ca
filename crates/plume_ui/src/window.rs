//! Window state that persists across frames

use bitflags::bitflags;
use plume_core::{Rect, Vec2};
use plume_draw::LayerId;
use smallvec::SmallVec;

use crate::layout::WindowLayout;
use crate::storage::Storage;

bitflags! {
    /// Window behavior flags
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u32 {
        const NONE = 0;
        const NO_TITLE_BAR = 1 << 0;
        const NO_RESIZE = 1 << 1;
        const NO_MOVE = 1 << 2;
        const NO_COLLAPSE = 1 << 3;
        /// Size follows the content of the previous frame
        const AUTO_SIZE = 1 << 4;
        const CHILD_WINDOW = 1 << 5;
        const TOOLTIP = 1 << 6;
    }
}

bitflags! {
    /// When a `set_next_window_*` value is applied
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Condition: u32 {
        /// Same as `ALWAYS`
        const NONE = 0;
        const ALWAYS = 1 << 0;
        /// Only the first time the window is begun with this condition
        const ONCE = 1 << 1;
    }
}

impl Condition {
    fn normalized(self) -> Condition {
        if self.is_empty() {
            Condition::ALWAYS
        } else {
            self
        }
    }
}

/// Values queued by `set_next_window_*` for the next `begin_window`
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct NextWindowData {
    pub pos: Option<(Vec2, Condition)>,
    pub size: Option<(Vec2, Condition)>,
    pub collapsed: Option<(bool, Condition)>,
}

/// Index of a window in the context's window table
pub(crate) type WindowIndex = usize;

#[derive(Debug)]
pub struct UiWindow {
    pub(crate) name: String,
    pub(crate) id: u32,
    pub(crate) flags: WindowFlags,
    pub(crate) pos: Vec2,
    pub(crate) size: Vec2,
    /// Size restored when the window is expanded again
    pub(crate) full_size: Vec2,
    pub(crate) content_size: Vec2,
    pub(crate) min_size: Vec2,
    pub(crate) max_size: Vec2,
    pub(crate) scroll: Vec2,
    pub(crate) scroll_max: Vec2,
    /// Client area: below the title bar, inside the scrollbars
    pub(crate) inner_rect: Rect,
    pub(crate) outer_rect: Rect,
    /// Outer rect clipped by the parent window
    pub(crate) outer_rect_clipped: Rect,
    pub(crate) inner_clip_rect: Rect,
    pub(crate) parent: Option<WindowIndex>,
    pub(crate) root: WindowIndex,
    pub(crate) collapsed: bool,
    pub(crate) scrollbar_x: bool,
    pub(crate) scrollbar_y: bool,
    /// Frame this window was last begun in
    pub(crate) last_frame: u64,
    pub(crate) layout: WindowLayout,
    /// Child windows begun this frame, rebuilt every frame
    pub(crate) children: SmallVec<[WindowIndex; 4]>,
    pub(crate) bg_layer: LayerId,
    pub(crate) fg_layer: LayerId,
    pub(crate) pos_allowed: Condition,
    pub(crate) size_allowed: Condition,
    pub(crate) collapse_allowed: Condition,
    pub(crate) storage: Storage,
}

impl UiWindow {
    pub(crate) fn new(
        name: &str,
        id: u32,
        index: WindowIndex,
        bg_layer: LayerId,
        fg_layer: LayerId,
    ) -> Self {
        let size = Vec2::new(500.0, 500.0);
        Self {
            name: name.to_string(),
            id,
            flags: WindowFlags::NONE,
            pos: Vec2::new(200.0, 200.0),
            size,
            full_size: size,
            content_size: Vec2::ZERO,
            min_size: Vec2::new(200.0, 200.0),
            max_size: Vec2::new(10000.0, 10000.0),
            scroll: Vec2::ZERO,
            scroll_max: Vec2::ZERO,
            inner_rect: Rect::ZERO,
            outer_rect: Rect::ZERO,
            outer_rect_clipped: Rect::ZERO,
            inner_clip_rect: Rect::ZERO,
            parent: None,
            root: index,
            collapsed: false,
            scrollbar_x: false,
            scrollbar_y: false,
            last_frame: 0,
            layout: WindowLayout::default(),
            children: SmallVec::new(),
            bg_layer,
            fg_layer,
            pos_allowed: Condition::ALWAYS | Condition::ONCE,
            size_allowed: Condition::ALWAYS | Condition::ONCE,
            collapse_allowed: Condition::ALWAYS | Condition::ONCE,
            storage: Storage::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn content_size(&self) -> Vec2 {
        self.content_size
    }

    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    pub fn scroll_max(&self) -> Vec2 {
        self.scroll_max
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub(crate) fn is_child(&self) -> bool {
        self.flags.contains(WindowFlags::CHILD_WINDOW)
    }

    /// Apply queued `set_next_window_*` values allowed by their conditions
    pub(crate) fn apply_next_data(&mut self, next: &NextWindowData) {
        if let Some((pos, cond)) = next.pos {
            if take_condition(&mut self.pos_allowed, cond) {
                self.pos = pos;
            }
        }
        if let Some((size, cond)) = next.size {
            if take_condition(&mut self.size_allowed, cond) {
                self.size = size;
                self.full_size = size;
            }
        }
        if let Some((collapsed, cond)) = next.collapsed {
            if take_condition(&mut self.collapse_allowed, cond) {
                self.collapsed = collapsed;
            }
        }
    }

    /// Set scroll, clamped to `0..=scroll_max`
    pub(crate) fn set_scroll(&mut self, scroll: Vec2) {
        self.scroll = scroll.max(Vec2::ZERO).min(self.scroll_max);
    }
}

/// Whether `cond` may fire; `ONCE` is consumed when it does
fn take_condition(allowed: &mut Condition, cond: Condition) -> bool {
    let cond = cond.normalized();
    if !allowed.intersects(cond) {
        return false;
    }
    allowed.remove(Condition::ONCE);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> UiWindow {
        let mut list = plume_draw::DrawList::new();
        let bg = list.request_layer("bg");
        let fg = list.request_layer("fg");
        UiWindow::new("test", 1, 0, bg, fg)
    }

    #[test]
    fn test_once_condition_fires_once() {
        let mut window = window();
        let next = NextWindowData {
            pos: Some((Vec2::new(10.0, 10.0), Condition::ONCE)),
            ..Default::default()
        };
        window.apply_next_data(&next);
        assert_eq!(window.pos(), Vec2::new(10.0, 10.0));

        window.pos = Vec2::new(50.0, 50.0);
        let next = NextWindowData {
            pos: Some((Vec2::new(10.0, 10.0), Condition::ONCE)),
            ..Default::default()
        };
        window.apply_next_data(&next);
        assert_eq!(window.pos(), Vec2::new(50.0, 50.0));

        let next = NextWindowData {
            pos: Some((Vec2::new(1.0, 2.0), Condition::NONE)),
            size: Some((Vec2::new(300.0, 250.0), Condition::ALWAYS)),
            collapsed: Some((true, Condition::ALWAYS)),
        };
        window.apply_next_data(&next);
        assert_eq!(window.pos(), Vec2::new(1.0, 2.0));
        assert_eq!(window.size(), Vec2::new(300.0, 250.0));
        assert!(window.is_collapsed());
    }

    #[test]
    fn test_scroll_clamps() {
        let mut window = window();
        window.scroll_max = Vec2::new(0.0, 120.0);
        window.set_scroll(Vec2::new(40.0, 500.0));
        assert_eq!(window.scroll(), Vec2::new(0.0, 120.0));
        window.set_scroll(Vec2::new(-5.0, -5.0));
        assert_eq!(window.scroll(), Vec2::ZERO);
    }
}
