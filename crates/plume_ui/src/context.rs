//! The UI context
//!
//! [`UiContext`] owns everything that survives between frames: windows and
//! their storage, the focus order, hover/active IDs, the shared text-edit
//! state and the draw list the UI emits into. A frame is
//!
//! ```ignore
//! ui.new_frame(&input);
//! if ui.begin_window("Settings", None, WindowFlags::NONE) {
//!     ui.layout_dynamic(0.0, 2);
//!     if ui.button("Apply") { /* ... */ }
//!     ui.end_window();
//! }
//! let draw_data = ui.render();
//! ```
//!
//! Hover and active IDs are double buffered: widgets read the values
//! committed at the end of the previous frame and write the next ones, so
//! every widget in a frame sees the same snapshot regardless of draw order.

use std::sync::Arc;

use plume_core::{hash_str, Color, Rect, Vec2};
use plume_draw::{AtlasBinding, DrawData, DrawList, LayerId, LayerWriter};
use plume_platform::{InputState, MouseButton};
use plume_text::{Font, FontAtlas, FontId};
use rustc_hash::FxHashMap;

use crate::id::IdStack;
use crate::layout::WindowLayout;
use crate::storage::Storage;
use crate::style::{ColorScheme, UiStyle};
use crate::text_edit::InputTextState;
use crate::tools::DemoState;
use crate::widgets::tabs::TabBar;
use crate::window::{Condition, NextWindowData, UiWindow, WindowFlags, WindowIndex};

/// Offset of a tooltip from the mouse cursor
const TOOLTIP_OFFSET: Vec2 = Vec2::new(16.0, 16.0);
/// Lines scrolled per wheel notch
const WHEEL_LINES: f32 = 3.0;
/// Segments used for the rounded corners and circles of widgets
pub(crate) const CIRCLE_SEGMENTS: u32 = 12;

/// Interaction result of one item
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ItemState {
    /// Mouse released over the item while it was active
    pub pressed: bool,
    pub hovered: bool,
    /// Active and the mouse is still down
    pub held: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct LastItem {
    id: u32,
    rect: Rect,
    hovered: bool,
    active: bool,
}

pub struct UiContext {
    pub(crate) style: UiStyle,
    pub(crate) colors: ColorScheme,
    pub(crate) io: InputState,
    pub(crate) id_stack: IdStack,

    // Committed at the end of the previous frame
    pub(crate) hovered_id: u32,
    pub(crate) active_id: u32,
    // Written by widgets this frame
    pub(crate) next_hovered_id: u32,
    pub(crate) next_active_id: u32,
    last_item: LastItem,

    pub(crate) windows: Vec<UiWindow>,
    window_map: FxHashMap<u32, WindowIndex>,
    /// Root windows, back to front
    focus_order: Vec<WindowIndex>,
    /// Windows between their begin and end calls
    pub(crate) window_stack: Vec<WindowIndex>,
    hovered_window: Option<WindowIndex>,
    tooltip_window: Option<WindowIndex>,
    next_window: NextWindowData,

    pub(crate) tab_bars: Vec<TabBar>,
    /// Tab bars between their begin and end calls
    pub(crate) tab_bar_stack: Vec<usize>,
    /// Edit state of the focused input widget
    pub(crate) input_text: Option<InputTextState>,
    /// Values behind the demo window's widgets
    pub(crate) demo: DemoState,

    drawlist: DrawList,
    bg_layer: LayerId,
    fg_layer: LayerId,
    font: Option<Arc<Font>>,

    frame_count: u64,
    in_frame: bool,
    rendered: bool,
}

impl Default for UiContext {
    fn default() -> Self {
        Self::new()
    }
}

impl UiContext {
    pub fn new() -> Self {
        Self::with_style(UiStyle::default())
    }

    pub fn with_style(style: UiStyle) -> Self {
        let mut drawlist = DrawList::new();
        let bg_layer = drawlist.request_layer("ui background");
        let fg_layer = drawlist.request_layer("ui foreground");
        tracing::debug!(font_size = style.font_size, "ui context created");

        Self {
            style,
            colors: ColorScheme::dark(),
            io: InputState::new(),
            id_stack: IdStack::new(),
            hovered_id: 0,
            active_id: 0,
            next_hovered_id: 0,
            next_active_id: 0,
            last_item: LastItem::default(),
            windows: Vec::new(),
            window_map: FxHashMap::default(),
            focus_order: Vec::new(),
            window_stack: Vec::new(),
            hovered_window: None,
            tooltip_window: None,
            next_window: NextWindowData::default(),
            tab_bars: Vec::new(),
            tab_bar_stack: Vec::new(),
            input_text: None,
            demo: DemoState::default(),
            drawlist,
            bg_layer,
            fg_layer,
            font: None,
            frame_count: 0,
            in_frame: false,
            rendered: true,
        }
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    pub fn set_font(&mut self, font: Arc<Font>) {
        self.font = Some(font);
    }

    /// Bind the atlas texture; also selects the atlas' first font if none is set
    pub fn set_font_atlas(&mut self, atlas: &FontAtlas) {
        self.drawlist.set_atlas(AtlasBinding {
            texture: atlas.texture(),
            white_uv: atlas.white_uv(),
        });
        if self.font.is_none() {
            self.font = atlas.font(FontId(0));
        }
    }

    pub fn style(&self) -> &UiStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut UiStyle {
        &mut self.style
    }

    pub fn colors(&self) -> &ColorScheme {
        &self.colors
    }

    pub fn colors_mut(&mut self) -> &mut ColorScheme {
        &mut self.colors
    }

    pub fn set_dark_theme(&mut self) {
        self.colors = ColorScheme::dark();
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Input snapshot of the current frame
    pub fn io(&self) -> &InputState {
        &self.io
    }

    pub fn hovered_id(&self) -> u32 {
        self.hovered_id
    }

    pub fn active_id(&self) -> u32 {
        self.active_id
    }

    /// # Panics
    ///
    /// Panics if neither [`set_font`](Self::set_font) nor
    /// [`set_font_atlas`](Self::set_font_atlas) provided a font.
    pub(crate) fn font(&self) -> Arc<Font> {
        match &self.font {
            Some(font) => Arc::clone(font),
            None => panic!("no font set; call set_font or set_font_atlas before drawing text"),
        }
    }

    // ========================================================================
    // Frame lifecycle
    // ========================================================================

    pub fn new_frame(&mut self, input: &InputState) {
        if self.in_frame {
            self.end_frame();
        }
        if !self.rendered {
            // layers written but never submitted still hold last frame's geometry
            self.submit_layers();
        }
        self.drawlist.new_frame();

        self.io = input.clone();
        self.frame_count += 1;
        self.in_frame = true;
        self.rendered = false;

        self.next_hovered_id = 0;
        self.next_active_id = 0;
        self.last_item = LastItem::default();
        self.tooltip_window = None;
        self.hovered_window = self.find_hovered_window();

        tracing::trace!(
            frame = self.frame_count,
            hovered_window = ?self.hovered_window,
            "ui frame started"
        );
    }

    /// Finish the frame: commit hover/active IDs and apply click-to-focus
    ///
    /// # Panics
    ///
    /// Panics if a window or an ID scope is still open.
    pub fn end_frame(&mut self) {
        assert!(self.in_frame, "end_frame called without new_frame");
        assert!(
            self.window_stack.is_empty(),
            "end_frame called with {} window(s) still open; call end_window for every begin_window that returned true",
            self.window_stack.len()
        );
        assert!(
            self.id_stack.is_empty(),
            "end_frame called with {} ID scope(s) still pushed",
            self.id_stack.depth()
        );
        assert!(
            self.tab_bar_stack.is_empty(),
            "end_frame called with {} tab bar(s) still open",
            self.tab_bar_stack.len()
        );

        self.hovered_id = self.next_hovered_id;
        self.active_id = self.next_active_id;

        if self.io.mouse_clicked(MouseButton::Left) {
            if let Some(hovered) = self.hovered_window {
                self.focus_window(self.windows[hovered].root);
            }
        }
        self.in_frame = false;
    }

    /// Submit every layer in paint order and merge them into [`DrawData`]
    pub fn render(&mut self) -> DrawData<'_> {
        if self.in_frame {
            self.end_frame();
        }
        if !self.rendered {
            self.submit_layers();
            self.rendered = true;
        }
        self.drawlist.build_draw_data()
    }

    /// Background, root windows back to front with their children, tooltip,
    /// foreground
    fn submit_layers(&mut self) {
        self.drawlist.submit_layer(self.bg_layer);
        let order = self.focus_order.clone();
        for index in order {
            if self.windows[index].last_frame == self.frame_count {
                self.submit_window(index);
            }
        }
        if let Some(tooltip) = self.tooltip_window {
            self.submit_window(tooltip);
        }
        self.drawlist.submit_layer(self.fg_layer);
    }

    fn submit_window(&mut self, index: WindowIndex) {
        let window = &self.windows[index];
        let (bg, fg) = (window.bg_layer, window.fg_layer);
        let children = window.children.clone();
        self.drawlist.submit_layer(bg);
        self.drawlist.submit_layer(fg);
        for child in children {
            self.submit_window(child);
        }
    }

    /// Front-most window under the mouse, using last frame's rectangles
    fn find_hovered_window(&self) -> Option<WindowIndex> {
        if !self.io.is_mouse_pos_valid() {
            return None;
        }
        let mouse = self.io.mouse_pos();
        let previous = self.frame_count.saturating_sub(1);

        let root = self.focus_order.iter().rev().copied().find(|&index| {
            let window = &self.windows[index];
            window.last_frame == previous && window.outer_rect_clipped.contains(mouse)
        })?;

        // descend into the child under the mouse, last begun on top
        let mut hovered = root;
        'descend: loop {
            for &child in self.windows[hovered].children.iter().rev() {
                let window = &self.windows[child];
                if window.last_frame == previous && window.outer_rect_clipped.contains(mouse) {
                    hovered = child;
                    continue 'descend;
                }
            }
            return Some(hovered);
        }
    }

    fn focus_window(&mut self, root: WindowIndex) {
        if let Some(pos) = self.focus_order.iter().position(|&index| index == root) {
            if pos + 1 != self.focus_order.len() {
                self.focus_order.remove(pos);
                self.focus_order.push(root);
                tracing::trace!(window = %self.windows[root].name, "window focused");
            }
        }
    }

    // ========================================================================
    // IDs
    // ========================================================================

    /// ID of `label` in the current scope
    pub fn get_id(&self, label: &str) -> u32 {
        self.id_stack.id_str(label)
    }

    pub fn push_id_str(&mut self, label: &str) {
        let id = self.id_stack.id_str(label);
        self.id_stack.push(id);
    }

    pub fn push_id_u32(&mut self, value: u32) {
        let id = self.id_stack.id_u32(value);
        self.id_stack.push(id);
    }

    pub fn push_id_ptr<T: ?Sized>(&mut self, ptr: *const T) {
        let id = self.id_stack.id_ptr(ptr);
        self.id_stack.push(id);
    }

    /// # Panics
    ///
    /// Panics if the ID stack is empty.
    pub fn pop_id(&mut self) {
        self.id_stack.pop();
    }

    // ========================================================================
    // Windows
    // ========================================================================

    pub fn set_next_window_pos(&mut self, pos: Vec2, cond: Condition) {
        self.next_window.pos = Some((pos, cond));
    }

    pub fn set_next_window_size(&mut self, size: Vec2, cond: Condition) {
        self.next_window.size = Some((size, cond));
    }

    pub fn set_next_window_collapse(&mut self, collapsed: bool, cond: Condition) {
        self.next_window.collapsed = Some((collapsed, cond));
    }

    /// Begin a window; returns `false` when it is collapsed, closed or clipped
    ///
    /// Call [`end_window`](Self::end_window) only when this returns `true`.
    /// When `open` is given the title bar gets a close button that sets it to
    /// `false`; a closed window is skipped entirely.
    pub fn begin_window(&mut self, name: &str, open: Option<&mut bool>, flags: WindowFlags) -> bool {
        let id = self.id_stack.id_str(name);
        self.begin_window_with_id(name, id, open, flags)
    }

    pub fn end_window(&mut self) {
        let index = self.current_index();
        {
            let window = &mut self.windows[index];
            let layout = &window.layout;
            window.content_size = (layout.cursor_max - layout.cursor_start).max(Vec2::ZERO);
        }

        self.drawlist.pop_clip_rect();
        self.drawlist.push_clip_rect(self.windows[index].outer_rect_clipped, false);
        self.window_scrollbars(index);
        self.window_resize_grip(index);

        let window = &self.windows[index];
        let (outer, border) = (window.outer_rect, self.colors.window_border);
        self.drawlist.layer(window.fg_layer).add_rect(outer.min, outer.max, border, 1.0);
        self.drawlist.pop_clip_rect();

        self.id_stack.pop();
        self.window_stack.pop();
    }

    /// Begin a child region sized by the current layout row
    ///
    /// A row height of 0 fills the rest of the parent's visible height.
    pub fn begin_child(&mut self, name: &str) -> bool {
        let parent = self.current_index();
        let pos = self.cursor_pos();
        let mut size = self.calculate_item_size(0.0);
        if size.y <= 0.0 {
            let bottom = self.windows[parent].inner_rect.max.y - self.style.window_vertical_padding;
            size.y = (bottom - pos.y).max(self.style.frame_height());
        }
        self.advance_cursor(size.x, size.y);

        self.set_next_window_pos(pos, Condition::ALWAYS);
        self.set_next_window_size(size, Condition::ALWAYS);
        self.begin_window(
            name,
            None,
            WindowFlags::CHILD_WINDOW
                | WindowFlags::NO_TITLE_BAR
                | WindowFlags::NO_MOVE
                | WindowFlags::NO_RESIZE
                | WindowFlags::NO_COLLAPSE,
        )
    }

    pub fn end_child(&mut self) {
        let index = self.current_index();
        assert!(
            self.windows[index].is_child(),
            "end_child called while the current window is not a child"
        );
        self.end_window();
    }

    /// Begin the tooltip window next to the mouse; always pair with `end_tooltip`
    pub fn begin_tooltip(&mut self) {
        self.set_next_window_pos(self.io.mouse_pos() + TOOLTIP_OFFSET, Condition::ALWAYS);
        let id = hash_str("##tooltip", 0);
        let visible = self.begin_window_with_id(
            "##tooltip",
            id,
            None,
            WindowFlags::TOOLTIP
                | WindowFlags::NO_TITLE_BAR
                | WindowFlags::AUTO_SIZE
                | WindowFlags::NO_MOVE
                | WindowFlags::NO_RESIZE
                | WindowFlags::NO_COLLAPSE,
        );
        debug_assert!(visible, "tooltip windows cannot collapse");
    }

    pub fn end_tooltip(&mut self) {
        let index = self.current_index();
        assert!(
            self.windows[index].flags.contains(WindowFlags::TOOLTIP),
            "end_tooltip called while the current window is not the tooltip"
        );
        self.end_window();
    }

    /// Show `text` in a tooltip
    pub fn tooltip(&mut self, text: &str) {
        self.begin_tooltip();
        self.text(text);
        self.end_tooltip();
    }

    fn begin_window_with_id(
        &mut self,
        name: &str,
        id: u32,
        open: Option<&mut bool>,
        flags: WindowFlags,
    ) -> bool {
        assert!(self.in_frame, "begin_window called outside new_frame/end_frame");
        if matches!(open.as_deref(), Some(false)) {
            self.next_window = NextWindowData::default();
            return false;
        }

        let is_tooltip = flags.contains(WindowFlags::TOOLTIP);
        let index = self.find_or_create_window(name, id, flags);
        let parent = if is_tooltip {
            None
        } else {
            self.window_stack.last().copied()
        };
        let next = std::mem::take(&mut self.next_window);

        {
            let frame = self.frame_count;
            let window = &mut self.windows[index];
            assert!(
                window.last_frame != frame,
                "window `{}` begun twice in one frame",
                window.name
            );
            window.last_frame = frame;
            window.flags = flags;
            window.parent = parent;
            window.children.clear();
            window.apply_next_data(&next);
        }
        let root = match parent {
            Some(parent) => {
                self.windows[parent].children.push(index);
                self.windows[parent].root
            }
            None => index,
        };
        self.windows[index].root = root;
        if is_tooltip {
            self.tooltip_window = Some(index);
        }

        self.window_stack.push(index);
        self.id_stack.push(id);

        self.window_title_bar(index, open);
        self.window_geometry(index, parent);
        self.window_background(index);

        let window = &self.windows[index];
        let clipped_away = window.outer_rect_clipped.width() <= 0.0
            || window.outer_rect_clipped.height() <= 0.0;
        if window.collapsed || clipped_away {
            self.id_stack.pop();
            self.window_stack.pop();
            return false;
        }

        self.drawlist.push_clip_rect(self.windows[index].inner_clip_rect, false);
        true
    }

    fn find_or_create_window(&mut self, name: &str, id: u32, flags: WindowFlags) -> WindowIndex {
        if let Some(&index) = self.window_map.get(&id) {
            return index;
        }
        let index = self.windows.len();
        let bg = self.drawlist.request_layer(&format!("{name} bg"));
        let fg = self.drawlist.request_layer(&format!("{name} fg"));
        self.windows.push(UiWindow::new(name, id, index, bg, fg));
        self.window_map.insert(id, index);
        if !flags.intersects(WindowFlags::CHILD_WINDOW | WindowFlags::TOOLTIP) {
            self.focus_order.push(index);
        }
        tracing::debug!(window = name, id, index, "window created");
        index
    }

    fn has_title_bar(flags: WindowFlags) -> bool {
        !flags.intersects(WindowFlags::NO_TITLE_BAR | WindowFlags::CHILD_WINDOW | WindowFlags::TOOLTIP)
    }

    /// Title bar interaction: drag to move, double click to collapse, close
    fn window_title_bar(&mut self, index: WindowIndex, open: Option<&mut bool>) {
        let flags = self.windows[index].flags;
        if !Self::has_title_bar(flags) {
            return;
        }
        let title = self.title_rect(index);

        let title_id = self.get_id("##title");
        let state = self.item_behavior(title, title_id);
        if state.held && !flags.contains(WindowFlags::NO_MOVE) {
            let delta = self.io.mouse_delta();
            self.windows[index].pos += delta;
        }
        if state.hovered
            && self.io.mouse_double_clicked(MouseButton::Left)
            && !flags.contains(WindowFlags::NO_COLLAPSE)
        {
            let window = &mut self.windows[index];
            window.collapsed = !window.collapsed;
        }

        if let Some(open) = open {
            let close = self.close_button_rect(title);
            let close_id = self.get_id("##close");
            if self.item_behavior(close, close_id).pressed {
                *open = false;
            }
        }
    }

    fn title_rect(&self, index: WindowIndex) -> Rect {
        let window = &self.windows[index];
        Rect::from_pos_size(window.pos, Vec2::new(window.size.x, self.style.title_bar_height()))
    }

    fn close_button_rect(&self, title: Rect) -> Rect {
        let side = self.style.font_size;
        let min = Vec2::new(
            title.max.x - self.style.window_horizontal_padding - side,
            title.center().y - side * 0.5,
        );
        Rect::from_pos_size(min, Vec2::new(side, side))
    }

    /// Size, scroll and the rectangles of a window for this frame
    fn window_geometry(&mut self, index: WindowIndex, parent: Option<WindowIndex>) {
        let style = &self.style;
        let padding = style.window_padding();
        let parent_clip = parent.map(|p| self.windows[p].inner_clip_rect);
        let wheel_target = self.hovered_window == Some(index);
        let wheel = self.io.wheel();

        let window = &mut self.windows[index];
        let title_height = if Self::has_title_bar(window.flags) {
            style.title_bar_height()
        } else {
            0.0
        };

        if window.flags.contains(WindowFlags::AUTO_SIZE) {
            window.size = window.content_size + padding * 2.0 + Vec2::new(0.0, title_height);
        }
        let size = if window.collapsed {
            Vec2::new(window.size.x, title_height)
        } else {
            window.size
        };

        // scrollbars appear when last frame's content overflows
        let visible = size - Vec2::new(0.0, title_height) - padding * 2.0;
        let auto_size = window.flags.contains(WindowFlags::AUTO_SIZE);
        window.scrollbar_y = !auto_size && !window.collapsed && window.content_size.y > visible.y;
        let visible_x = visible.x - if window.scrollbar_y { style.scrollbar_size } else { 0.0 };
        window.scrollbar_x = !auto_size && !window.collapsed && window.content_size.x > visible_x;
        if window.scrollbar_x && !window.scrollbar_y {
            let visible_y = visible.y - style.scrollbar_size;
            window.scrollbar_y = window.content_size.y > visible_y;
        }

        let scrollbars = Vec2::new(
            if window.scrollbar_y { style.scrollbar_size } else { 0.0 },
            if window.scrollbar_x { style.scrollbar_size } else { 0.0 },
        );
        window.outer_rect = Rect::from_pos_size(window.pos, size);
        window.inner_rect = Rect::new(
            window.pos + Vec2::new(0.0, title_height),
            (window.pos + size - scrollbars).max(window.pos + Vec2::new(0.0, title_height)),
        );
        window.scroll_max = (window.content_size - (window.inner_rect.size() - padding * 2.0))
            .max(Vec2::ZERO);

        let mut scroll = window.scroll;
        if wheel_target && !window.collapsed {
            let step = style.font_size * WHEEL_LINES;
            scroll -= wheel * step;
        }
        window.set_scroll(scroll);

        match parent_clip {
            Some(clip) => {
                window.outer_rect_clipped = window.outer_rect.clip(&clip);
                window.inner_clip_rect = window.inner_rect.clip(&clip);
            }
            None => {
                window.outer_rect_clipped = window.outer_rect;
                window.inner_clip_rect = window.inner_rect;
            }
        }

        let cursor_start = window.inner_rect.min + padding - window.scroll;
        let content_width = (window.inner_rect.width() - padding.x * 2.0).max(0.0);
        window.layout = WindowLayout::new(cursor_start, content_width);
    }

    fn window_background(&mut self, index: WindowIndex) {
        let window = &self.windows[index];
        let (flags, collapsed, outer) = (window.flags, window.collapsed, window.outer_rect);
        let bg_layer = window.bg_layer;
        let name = crate::id::visible_label(&window.name).to_string();
        let focused = self.focus_order.last() == Some(&window.root);

        self.drawlist.push_clip_rect(window.outer_rect_clipped, false);
        let colors = &self.colors;

        if !collapsed {
            let bg = if flags.contains(WindowFlags::CHILD_WINDOW) {
                colors.child_bg
            } else {
                colors.window_bg
            };
            self.drawlist.layer(bg_layer).add_rect_filled(outer.min, outer.max, bg);
        }

        if Self::has_title_bar(flags) {
            let title = self.title_rect(index);
            let color = if collapsed {
                colors.title_bg_collapsed
            } else if focused {
                colors.title_active
            } else {
                colors.title_bg
            };
            let text_color = colors.text;
            let font = self.font();
            let text_pos = title.min + Vec2::new(self.style.window_horizontal_padding, self.style.title_padding);
            let close = self.close_button_rect(title);
            let mut layer = self.drawlist.layer(bg_layer);
            layer.add_rect_filled(title.min, title.max, color);
            layer.add_text_clipped(
                &font,
                self.style.font_size,
                text_pos,
                title.min,
                Vec2::new(close.min.x, title.max.y),
                text_color,
                &name,
                0.0,
            );
            if self.hovered_window == Some(index) || focused {
                let inset = close.expand(Vec2::new(-3.0, -3.0));
                layer.add_line(inset.min, inset.max, text_color, 1.5);
                layer.add_line(inset.top_right(), inset.bottom_left(), text_color, 1.5);
            }
        }
        self.drawlist.pop_clip_rect();
    }

    fn window_scrollbars(&mut self, index: WindowIndex) {
        let window = &self.windows[index];
        let (inner, size) = (window.inner_rect, self.style.scrollbar_size);
        if window.scrollbar_y {
            let track = Rect::new(
                Vec2::new(inner.max.x, inner.min.y),
                Vec2::new(inner.max.x + size, inner.max.y),
            );
            self.scrollbar(index, track, true);
        }
        if self.windows[index].scrollbar_x {
            let track = Rect::new(
                Vec2::new(inner.min.x, inner.max.y),
                Vec2::new(inner.max.x, inner.max.y + size),
            );
            self.scrollbar(index, track, false);
        }
    }

    /// One scrollbar with a draggable handle sized by visible/content
    fn scrollbar(&mut self, index: WindowIndex, track: Rect, vertical: bool) {
        let axis = |v: Vec2| if vertical { v.y } else { v.x };
        let window = &self.windows[index];
        let padding = self.style.window_padding();
        let visible = axis(window.inner_rect.size() - padding * 2.0).max(1.0);
        let content = axis(window.content_size).max(visible);
        let (scroll, scroll_max) = (axis(window.scroll), axis(window.scroll_max));

        let track_len = axis(track.size());
        let handle_len = (track_len * visible / content).clamp(self.style.scrollbar_size, track_len);
        let travel = (track_len - handle_len).max(0.0);
        let offset = if scroll_max > 0.0 { travel * scroll / scroll_max } else { 0.0 };
        let handle = if vertical {
            Rect::from_pos_size(track.min + Vec2::new(0.0, offset), Vec2::new(track.width(), handle_len))
        } else {
            Rect::from_pos_size(track.min + Vec2::new(offset, 0.0), Vec2::new(handle_len, track.height()))
        };

        let id = self.get_id(if vertical { "##scrollbar_y" } else { "##scrollbar_x" });
        let state = self.item_behavior(handle, id);
        if state.held && travel > 0.0 {
            let delta = axis(self.io.mouse_delta()) * scroll_max / travel;
            let window = &mut self.windows[index];
            let mut scroll = window.scroll;
            if vertical {
                scroll.y += delta;
            } else {
                scroll.x += delta;
            }
            window.set_scroll(scroll);
        }

        let colors = &self.colors;
        let handle_color = if state.held {
            colors.scrollbar_active
        } else if state.hovered {
            colors.scrollbar_hovered
        } else {
            colors.scrollbar_handle
        };
        let (bg, frame) = (colors.scrollbar_bg, colors.scrollbar_frame);
        let mut layer = self.drawlist.layer(self.windows[index].fg_layer);
        layer.add_rect_filled(track.min, track.max, bg);
        layer.add_rect(track.min, track.max, frame, 1.0);
        let radius = handle.width().min(handle.height()) * 0.5;
        layer.add_rect_rounded_filled(handle.min, handle.max, handle_color, radius, CIRCLE_SEGMENTS);
    }

    fn window_resize_grip(&mut self, index: WindowIndex) {
        let window = &self.windows[index];
        let no_grip = WindowFlags::NO_RESIZE
            | WindowFlags::AUTO_SIZE
            | WindowFlags::CHILD_WINDOW
            | WindowFlags::TOOLTIP;
        if window.flags.intersects(no_grip) {
            return;
        }
        let corner = window.outer_rect.max;
        let side = self.style.font_size;
        let grip = Rect::new(corner - Vec2::new(side, side), corner);

        let id = self.get_id("##resize");
        let state = self.item_behavior(grip, id);
        if state.held {
            let delta = self.io.mouse_delta();
            let window = &mut self.windows[index];
            window.size = (window.size + delta).max(window.min_size).min(window.max_size);
            window.full_size = window.size;
        }

        let color = if state.held {
            self.colors.button_active
        } else if state.hovered {
            self.colors.button_hovered
        } else {
            self.colors.button
        };
        let fg = self.windows[index].fg_layer;
        self.drawlist.layer(fg).add_triangle_filled(
            Vec2::new(grip.max.x, grip.min.y),
            grip.max,
            Vec2::new(grip.min.x, grip.max.y),
            color,
        );
    }

    // ========================================================================
    // Window queries
    // ========================================================================

    pub(crate) fn current_index(&self) -> WindowIndex {
        match self.window_stack.last() {
            Some(&index) => index,
            None => panic!("no current window; call this between begin_window and end_window"),
        }
    }

    pub(crate) fn current_window(&self) -> &UiWindow {
        &self.windows[self.current_index()]
    }

    pub(crate) fn current_window_mut(&mut self) -> &mut UiWindow {
        let index = self.current_index();
        &mut self.windows[index]
    }

    /// Layout of the current window together with the style
    pub(crate) fn layout_mut(&mut self) -> (&mut WindowLayout, &UiStyle) {
        let index = self.current_index();
        (&mut self.windows[index].layout, &self.style)
    }

    /// Root window named `name`, whether or not it was begun this frame
    pub fn find_window(&self, name: &str) -> Option<&UiWindow> {
        let id = hash_str(name, 0);
        self.window_map.get(&id).map(|&index| &self.windows[index])
    }

    pub fn window_pos(&self) -> Vec2 {
        self.current_window().pos
    }

    pub fn window_size(&self) -> Vec2 {
        self.current_window().size
    }

    pub fn window_scroll(&self) -> Vec2 {
        self.current_window().scroll
    }

    pub fn window_scroll_max(&self) -> Vec2 {
        self.current_window().scroll_max
    }

    /// Set the current window's scroll, clamped to `0..=window_scroll_max()`
    pub fn set_window_scroll(&mut self, scroll: Vec2) {
        self.current_window_mut().set_scroll(scroll);
    }

    /// Persistent key/value storage of the current window
    pub fn window_storage_mut(&mut self) -> &mut Storage {
        &mut self.current_window_mut().storage
    }

    /// Writer for the current window's background layer, under its clip
    pub fn window_bg_layer(&mut self) -> LayerWriter<'_> {
        let layer = self.current_window().bg_layer;
        self.drawlist.layer(layer)
    }

    /// Writer for the current window's foreground layer, under its clip
    pub fn window_fg_layer(&mut self) -> LayerWriter<'_> {
        let layer = self.current_window().fg_layer;
        self.drawlist.layer(layer)
    }

    /// Layer painted below every window
    pub fn background_layer(&mut self) -> LayerWriter<'_> {
        self.drawlist.layer(self.bg_layer)
    }

    /// Layer painted above every window and the tooltip
    pub fn foreground_layer(&mut self) -> LayerWriter<'_> {
        self.drawlist.layer(self.fg_layer)
    }

    pub fn drawlist(&self) -> &DrawList {
        &self.drawlist
    }

    /// Whether the mouse is over any window; applications use this to keep
    /// clicks from reaching the scene behind the UI
    pub fn is_mouse_over_window(&self) -> bool {
        self.hovered_window.is_some()
    }

    // ========================================================================
    // Items
    // ========================================================================

    /// Whether the mouse may interact with `rect` this frame
    pub(crate) fn is_item_hoverable(&self, rect: Rect, id: u32) -> bool {
        let Some(&current) = self.window_stack.last() else {
            return false;
        };
        if self.hovered_window != Some(current) {
            return false;
        }
        let mouse = self.io.mouse_pos();
        if !rect.contains(mouse) {
            return false;
        }
        if let Some(clip) = self.drawlist.current_clip_rect() {
            if !clip.contains(mouse) {
                return false;
            }
        }
        self.active_id == 0 || self.active_id == id
    }

    /// Hover and click handling shared by every interactive item
    ///
    /// A click on a hovered item makes it active for the next frame; it stays
    /// active while the mouse is held and is pressed when the mouse is
    /// released over it. A click and release that land in the same frame
    /// activate the item but never press it.
    pub(crate) fn item_behavior(&mut self, rect: Rect, id: u32) -> ItemState {
        let mut state = ItemState::default();
        if self.is_item_hoverable(rect, id) {
            self.next_hovered_id = id;
            state.hovered = self.hovered_id == id;
        }

        if state.hovered && self.io.mouse_clicked(MouseButton::Left) {
            self.next_active_id = id;
        }
        if self.active_id == id {
            if self.io.mouse_down(MouseButton::Left) {
                self.next_active_id = id;
                state.held = true;
            } else if state.hovered && self.io.mouse_released(MouseButton::Left) {
                state.pressed = true;
            }
        }

        self.last_item = LastItem {
            id,
            rect,
            hovered: state.hovered,
            active: state.held || self.next_active_id == id,
        };
        state
    }

    /// Record a non-interactive item for the `was_last_item_*` queries
    pub(crate) fn set_last_item(&mut self, id: u32, rect: Rect) {
        self.last_item = LastItem {
            id,
            rect,
            hovered: self.is_item_hoverable(rect, id),
            active: false,
        };
    }

    pub(crate) fn mark_last_item_active(&mut self) {
        self.last_item.active = true;
    }

    pub fn was_last_item_hovered(&self) -> bool {
        self.last_item.hovered
    }

    pub fn was_last_item_active(&self) -> bool {
        self.last_item.active
    }

    /// Screen rectangle of the last item
    pub fn last_item_rect(&self) -> Rect {
        self.last_item.rect
    }

    pub(crate) fn last_item_id(&self) -> u32 {
        self.last_item.id
    }

    /// Whether `rect` intersects the current clip rectangle
    pub(crate) fn is_rect_visible(&self, rect: Rect) -> bool {
        match self.drawlist.current_clip_rect() {
            Some(clip) => clip.intersects(&rect),
            None => true,
        }
    }

    // ========================================================================
    // Drawing helpers
    // ========================================================================

    /// Writer for the layer widgets draw into
    pub(crate) fn widget_layer(&mut self) -> LayerWriter<'_> {
        let layer = self.current_window().bg_layer;
        self.drawlist.layer(layer)
    }

    pub(crate) fn text_size(&self, text: &str) -> Vec2 {
        if text.is_empty() {
            return Vec2::new(0.0, self.style.font_size);
        }
        self.font().calculate_text_size(self.style.font_size, text, 0.0)
    }

    pub(crate) fn draw_text(&mut self, pos: Vec2, color: Color, text: &str) {
        if text.is_empty() {
            return;
        }
        let (font, size) = (self.font(), self.style.font_size);
        self.widget_layer().add_text(&font, size, pos, color, text, 0.0);
    }

    pub(crate) fn draw_text_clipped(&mut self, pos: Vec2, clip: Rect, color: Color, text: &str) {
        if text.is_empty() {
            return;
        }
        let (font, size) = (self.font(), self.style.font_size);
        self.widget_layer()
            .add_text_clipped(&font, size, pos, clip.min, clip.max, color, text, 0.0);
    }

    /// Narrow the clip rect for the widget being drawn; pair with `pop_item_clip`
    pub(crate) fn push_item_clip(&mut self, rect: Rect) {
        self.drawlist.push_clip_rect(rect, true);
    }

    pub(crate) fn pop_item_clip(&mut self) {
        self.drawlist.pop_clip_rect();
    }

    /// Filled frame with the hovered/active color of an item
    pub(crate) fn draw_frame(&mut self, rect: Rect, state: ItemState, colors: [Color; 3]) {
        let color = if state.held {
            colors[2]
        } else if state.hovered {
            colors[1]
        } else {
            colors[0]
        };
        self.widget_layer().add_rect_filled(rect.min, rect.max, color);
    }
}

impl Drop for UiContext {
    fn drop(&mut self) {
        if self.in_frame {
            tracing::warn!(frame = self.frame_count, "ui context dropped mid-frame");
        }
        tracing::debug!(windows = self.windows.len(), "ui context destroyed");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::OnceLock;

    use plume_platform::{Event, InputEvent, MouseEvent, WindowEvent};

    use super::*;

    /// Default font, built once for every UI test
    pub(crate) fn test_font() -> Arc<Font> {
        static ATLAS: OnceLock<FontAtlas> = OnceLock::new();
        let atlas = ATLAS.get_or_init(|| {
            let mut atlas = FontAtlas::new();
            atlas.add_default_font().unwrap();
            atlas.build().unwrap();
            atlas
        });
        atlas.font(FontId(0)).unwrap()
    }

    pub(crate) fn test_context() -> UiContext {
        let mut ui = UiContext::new();
        ui.set_font(test_font());
        ui
    }

    /// Input with a display and the mouse at `pos`
    pub(crate) fn input_at(pos: Vec2) -> InputState {
        let mut input = InputState::new();
        input.handle_event(&Event::Window(WindowEvent::Resized {
            width: 1280.0,
            height: 720.0,
        }));
        move_mouse(&mut input, pos);
        input
    }

    pub(crate) fn move_mouse(input: &mut InputState, pos: Vec2) {
        input.handle_event(&Event::Input(InputEvent::Mouse(MouseEvent::Moved { x: pos.x, y: pos.y })));
    }

    pub(crate) fn press(input: &mut InputState) {
        let pos = input.mouse_pos();
        input.handle_event(&Event::Input(InputEvent::Mouse(MouseEvent::ButtonPressed {
            button: MouseButton::Left,
            x: pos.x,
            y: pos.y,
        })));
    }

    pub(crate) fn release(input: &mut InputState) {
        let pos = input.mouse_pos();
        input.handle_event(&Event::Input(InputEvent::Mouse(MouseEvent::ButtonReleased {
            button: MouseButton::Left,
            x: pos.x,
            y: pos.y,
        })));
    }

    /// Place the next window at a fixed spot so tests can aim the mouse
    pub(crate) fn place_window(ui: &mut UiContext, pos: Vec2, size: Vec2) {
        ui.set_next_window_pos(pos, Condition::ALWAYS);
        ui.set_next_window_size(size, Condition::ALWAYS);
    }

    #[test]
    fn test_window_is_created_once() {
        let mut ui = test_context();
        let input = input_at(Vec2::new(-100.0, -100.0));
        for _ in 0..3 {
            ui.new_frame(&input);
            assert!(ui.begin_window("Stats", None, WindowFlags::NONE));
            ui.end_window();
            ui.render();
        }
        assert_eq!(ui.windows.len(), 1);
        let window = ui.find_window("Stats").unwrap();
        assert_eq!(window.name(), "Stats");
        assert_eq!(window.pos(), Vec2::new(200.0, 200.0));
    }

    #[test]
    fn test_storage_persists_across_frames() {
        let mut ui = test_context();
        let input = input_at(Vec2::new(-100.0, -100.0));

        ui.new_frame(&input);
        assert!(ui.begin_window("Counter", None, WindowFlags::NONE));
        let key = ui.get_id("clicks");
        ui.window_storage_mut().set_int(key, 5);
        ui.end_window();
        ui.render();

        ui.new_frame(&input);
        assert!(ui.begin_window("Counter", None, WindowFlags::NONE));
        assert_eq!(ui.get_id("clicks"), key);
        assert_eq!(ui.window_storage_mut().get_int(key, 0), 5);
        ui.end_window();
        ui.render();
    }

    #[test]
    fn test_same_label_in_two_windows_differs() {
        let mut ui = test_context();
        ui.new_frame(&input_at(Vec2::ZERO));
        ui.begin_window("A", None, WindowFlags::NONE);
        let in_a = ui.get_id("OK");
        ui.end_window();
        ui.begin_window("B", None, WindowFlags::NONE);
        let in_b = ui.get_id("OK");
        ui.end_window();
        ui.end_frame();
        assert_ne!(in_a, in_b);
        assert_eq!(ui.get_id("OK"), hash_str("OK", 0));
    }

    #[test]
    fn test_scroll_clamps_to_content() {
        let mut ui = test_context();
        let input = input_at(Vec2::new(-100.0, -100.0));
        let frame = |ui: &mut UiContext| {
            place_window(ui, Vec2::new(0.0, 0.0), Vec2::new(300.0, 200.0));
            assert!(ui.begin_window("Scroll", None, WindowFlags::NONE));
            ui.layout_dynamic(40.0, 1);
            for i in 0..20 {
                ui.push_id_u32(i);
                ui.dummy(Vec2::ZERO);
                ui.pop_id();
            }
            let max = ui.window_scroll_max();
            ui.set_window_scroll(Vec2::new(0.0, 1.0e6));
            let scroll = ui.window_scroll();
            ui.end_window();
            (max, scroll)
        };

        ui.new_frame(&input);
        let (max, _) = frame(&mut ui);
        // content is only known after the first frame
        assert_eq!(max, Vec2::ZERO);
        ui.render();

        ui.new_frame(&input);
        let (max, scroll) = frame(&mut ui);
        assert!(max.y > 0.0);
        assert_eq!(scroll.y, max.y);
        ui.render();
    }

    #[test]
    fn test_hover_commits_at_end_of_frame() {
        let mut ui = test_context();
        let input = input_at(Vec2::new(250.0, 250.0));
        let frame = |ui: &mut UiContext| {
            place_window(ui, Vec2::new(200.0, 200.0), Vec2::new(300.0, 300.0));
            ui.begin_window("Hover", None, WindowFlags::NONE);
            ui.layout_dynamic(100.0, 1);
            ui.invisible_button("target", Vec2::ZERO);
            let id = ui.last_item_id();
            let seen = ui.hovered_id();
            ui.end_window();
            ui.end_frame();
            (id, seen)
        };

        // the window has no rectangle yet, so nothing is hovered
        ui.new_frame(&input);
        let (id, seen) = frame(&mut ui);
        assert_eq!(seen, 0);
        assert_eq!(ui.hovered_id(), 0);

        // hovered during this frame, visible to widgets from the next one
        ui.new_frame(&input);
        let (_, seen) = frame(&mut ui);
        assert_eq!(seen, 0);
        assert_eq!(ui.hovered_id(), id);

        ui.new_frame(&input);
        let (_, seen) = frame(&mut ui);
        assert_eq!(seen, id);
    }

    #[test]
    fn test_click_focuses_window() {
        let mut ui = test_context();
        let mut input = input_at(Vec2::new(50.0, 60.0));
        let frame = |ui: &mut UiContext, input: &InputState| {
            ui.new_frame(input);
            place_window(ui, Vec2::new(0.0, 0.0), Vec2::new(300.0, 300.0));
            ui.begin_window("Back", None, WindowFlags::NONE);
            ui.end_window();
            place_window(ui, Vec2::new(400.0, 0.0), Vec2::new(300.0, 300.0));
            ui.begin_window("Front", None, WindowFlags::NONE);
            ui.end_window();
            ui.render();
        };

        frame(&mut ui, &input);
        let back = ui.window_map[&hash_str("Back", 0)];
        let front = ui.window_map[&hash_str("Front", 0)];
        assert_eq!(ui.focus_order, vec![back, front]);

        press(&mut input);
        input.new_frame(0.016);
        frame(&mut ui, &input);
        assert_eq!(ui.focus_order, vec![front, back]);
    }

    #[test]
    fn test_collapsed_window_skips_content() {
        let mut ui = test_context();
        ui.new_frame(&input_at(Vec2::ZERO));
        ui.set_next_window_collapse(true, Condition::ONCE);
        assert!(!ui.begin_window("Folded", None, WindowFlags::NONE));
        ui.render();

        let window = ui.find_window("Folded").unwrap();
        assert!(window.is_collapsed());
        assert_eq!(window.outer_rect.height(), ui.style.title_bar_height());
    }

    #[test]
    fn test_closed_window_is_skipped() {
        let mut ui = test_context();
        ui.new_frame(&input_at(Vec2::ZERO));
        let mut open = false;
        assert!(!ui.begin_window("Closed", Some(&mut open), WindowFlags::NONE));
        ui.render();
        assert!(ui.find_window("Closed").is_none());
    }

    #[test]
    fn test_render_orders_layers() {
        let mut ui = test_context();
        ui.new_frame(&input_at(Vec2::ZERO));
        ui.begin_window("First", None, WindowFlags::NONE);
        ui.end_window();
        ui.begin_window("Second", None, WindowFlags::NONE);
        ui.end_window();
        ui.render();

        let names: Vec<&str> = ui
            .drawlist()
            .submitted_layers()
            .iter()
            .map(|&layer| ui.drawlist().layer_data(layer).name())
            .collect();
        assert_eq!(
            names,
            vec![
                "ui background",
                "First bg",
                "First fg",
                "Second bg",
                "Second fg",
                "ui foreground",
            ]
        );
    }

    #[test]
    #[should_panic(expected = "still open")]
    fn test_unbalanced_window_panics() {
        let mut ui = test_context();
        ui.new_frame(&input_at(Vec2::ZERO));
        ui.begin_window("Open", None, WindowFlags::NONE);
        ui.end_frame();
    }
}
