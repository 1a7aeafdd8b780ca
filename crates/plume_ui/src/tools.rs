//! Built-in tool windows
//!
//! Three windows an application can toggle from its own menu or hotkeys:
//!
//! - [`show_debug_window`](UiContext::show_debug_window) lists every window
//!   with its rectangles, scroll and draw layers, plus the hovered and
//!   active IDs
//! - [`show_style_window`](UiContext::show_style_window) edits the live
//!   [`UiStyle`] and [`ColorScheme`]
//! - [`show_demo_window`](UiContext::show_demo_window) shows one section per
//!   widget family
//!
//! Each takes the application's open flag; the close button clears it and a
//! cleared flag skips the window.

use plume_core::{Color, Vec2};

use crate::clipper::UiClipper;
use crate::context::UiContext;
use crate::layout::LayoutRowType;
use crate::style::{ColorScheme, UiStyle};
use crate::window::{Condition, WindowFlags};

/// Values edited by the demo window, kept across frames
#[derive(Clone, Debug)]
pub(crate) struct DemoState {
    clicks: u32,
    enabled: bool,
    quality: i32,
    selected: [bool; 3],
    volume: f32,
    gamma: f32,
    samples: i32,
    speed: f32,
    name: String,
    scale: f32,
    count: i32,
    elapsed: f32,
}

impl Default for DemoState {
    fn default() -> Self {
        Self {
            clicks: 0,
            enabled: true,
            quality: 1,
            selected: [true, false, false],
            volume: 0.5,
            gamma: 2.2,
            samples: 4,
            speed: 1.0,
            name: String::new(),
            scale: 1.0,
            count: 10,
            elapsed: 0.0,
        }
    }
}

impl ColorScheme {
    /// Every color with its field name, in declaration order
    pub(crate) fn entries_mut(&mut self) -> [(&'static str, &mut Color); 26] {
        [
            ("title_active", &mut self.title_active),
            ("title_bg", &mut self.title_bg),
            ("title_bg_collapsed", &mut self.title_bg_collapsed),
            ("window_bg", &mut self.window_bg),
            ("window_border", &mut self.window_border),
            ("child_bg", &mut self.child_bg),
            ("button", &mut self.button),
            ("button_hovered", &mut self.button_hovered),
            ("button_active", &mut self.button_active),
            ("text", &mut self.text),
            ("text_disabled", &mut self.text_disabled),
            ("progress_bar", &mut self.progress_bar),
            ("checkmark", &mut self.checkmark),
            ("frame_bg", &mut self.frame_bg),
            ("frame_bg_hovered", &mut self.frame_bg_hovered),
            ("frame_bg_active", &mut self.frame_bg_active),
            ("header", &mut self.header),
            ("header_hovered", &mut self.header_hovered),
            ("header_active", &mut self.header_active),
            ("scrollbar_bg", &mut self.scrollbar_bg),
            ("scrollbar_handle", &mut self.scrollbar_handle),
            ("scrollbar_frame", &mut self.scrollbar_frame),
            ("scrollbar_active", &mut self.scrollbar_active),
            ("scrollbar_hovered", &mut self.scrollbar_hovered),
            ("text_selected_bg", &mut self.text_selected_bg),
            ("separator", &mut self.separator),
        ]
    }
}

/// What the debug window shows for one window
struct WindowSummary {
    label: String,
    lines: [(&'static str, String); 7],
}

impl UiContext {
    // ========================================================================
    // Debug
    // ========================================================================

    pub fn show_debug_window(&mut self, open: &mut bool) {
        self.set_next_window_pos(Vec2::new(40.0, 40.0), Condition::ONCE);
        self.set_next_window_size(Vec2::new(420.0, 360.0), Condition::ONCE);
        if !self.begin_window("Debug", Some(open), WindowFlags::NONE) {
            return;
        }

        self.labeled_text("Frame", &self.frame_count().to_string());
        self.labeled_text("Hovered ID", &format!("{:#010x}", self.hovered_id()));
        self.labeled_text("Active ID", &format!("{:#010x}", self.active_id()));
        self.labeled_text("Windows", &self.windows.len().to_string());
        self.separator();

        // snapshot first: the tree nodes below mutate the window table
        let frame = self.frame_count();
        let summaries: Vec<WindowSummary> = self
            .windows
            .iter()
            .map(|window| {
                let state = if window.last_frame != frame {
                    "hidden"
                } else if window.collapsed {
                    "collapsed"
                } else {
                    "active"
                };
                WindowSummary {
                    label: format!("{} ({state})##{:08x}", window.name, window.id),
                    lines: [
                        ("ID", format!("{:#010x}", window.id)),
                        ("Position", format!("{:.0}, {:.0}", window.pos.x, window.pos.y)),
                        ("Size", format!("{:.0} x {:.0}", window.size.x, window.size.y)),
                        ("Outer rect", format!("{:?}", window.outer_rect)),
                        ("Clip rect", format!("{:?}", window.inner_clip_rect)),
                        (
                            "Scroll",
                            format!(
                                "{:.0}, {:.0} of {:.0}, {:.0}",
                                window.scroll.x,
                                window.scroll.y,
                                window.scroll_max.x,
                                window.scroll_max.y
                            ),
                        ),
                        ("Layers", format!("{:?} / {:?}", window.bg_layer, window.fg_layer)),
                    ],
                }
            })
            .collect();

        for summary in &summaries {
            if self.tree_node(&summary.label) {
                for (label, value) in &summary.lines {
                    self.labeled_text(label, value);
                }
                self.tree_pop();
            }
        }
        self.end_window();
    }

    // ========================================================================
    // Style editor
    // ========================================================================

    /// Sliders over the style metrics and RGBA sliders over every color
    ///
    /// Edits apply when the window ends, so the window never lays itself out
    /// with two different styles in one frame.
    pub fn show_style_window(&mut self, open: &mut bool) {
        self.set_next_window_pos(Vec2::new(480.0, 40.0), Condition::ONCE);
        self.set_next_window_size(Vec2::new(380.0, 520.0), Condition::ONCE);
        if !self.begin_window("Style", Some(open), WindowFlags::NONE) {
            return;
        }

        let mut style = self.style.clone();
        let mut colors = self.colors.clone();

        self.layout_dynamic(0.0, 2);
        if self.button("Reset") {
            style = UiStyle::default();
            colors = ColorScheme::dark();
        }
        if self.button("Dark") {
            colors = ColorScheme::dark();
        }
        self.layout_dynamic(0.0, 1);

        if self.collapsing_header("Metrics") {
            self.slider_float_f("Font size", &mut style.font_size, 6.0, 32.0, "%.0f");
            self.slider_float_f("Title padding", &mut style.title_padding, 0.0, 20.0, "%.0f");
            self.slider_float_f("Indent", &mut style.indent_size, 0.0, 40.0, "%.0f");
            self.slider_float_f(
                "Window padding X",
                &mut style.window_horizontal_padding,
                0.0,
                20.0,
                "%.0f",
            );
            self.slider_float_f(
                "Window padding Y",
                &mut style.window_vertical_padding,
                0.0,
                20.0,
                "%.0f",
            );
            self.slider_float_f("Scrollbar", &mut style.scrollbar_size, 2.0, 30.0, "%.0f");
            self.slider_float_f("Slider grab", &mut style.slider_size, 2.0, 30.0, "%.0f");
            self.vec2_sliders("Item spacing", &mut style.item_spacing, 20.0);
            self.vec2_sliders("Inner spacing", &mut style.inner_spacing, 20.0);
            self.vec2_sliders("Frame padding", &mut style.frame_padding, 20.0);
            self.end_collapsing_header();
        }

        if self.collapsing_header("Colors") {
            for (name, color) in colors.entries_mut() {
                self.push_id_str(name);
                self.text(name);
                self.layout_dynamic(0.0, 4);
                self.slider_float_f("##r", &mut color.r, 0.0, 1.0, "R %.2f");
                self.slider_float_f("##g", &mut color.g, 0.0, 1.0, "G %.2f");
                self.slider_float_f("##b", &mut color.b, 0.0, 1.0, "B %.2f");
                self.slider_float_f("##a", &mut color.a, 0.0, 1.0, "A %.2f");
                self.layout_dynamic(0.0, 1);
                self.pop_id();
            }
            self.end_collapsing_header();
        }

        self.end_window();

        if style != self.style {
            tracing::debug!(font_size = style.font_size, "style edited");
            self.style = style;
        }
        self.colors = colors;
    }

    /// Label on its own row, then X and Y sliders side by side
    fn vec2_sliders(&mut self, label: &str, value: &mut Vec2, max: f32) {
        self.push_id_str(label);
        self.text(label);
        self.layout_dynamic(0.0, 2);
        self.slider_float_f("##x", &mut value.x, 0.0, max, "X %.0f");
        self.slider_float_f("##y", &mut value.y, 0.0, max, "Y %.0f");
        self.layout_dynamic(0.0, 1);
        self.pop_id();
    }

    // ========================================================================
    // Demo
    // ========================================================================

    /// One collapsing section per widget family
    pub fn show_demo_window(&mut self, open: &mut bool) {
        self.set_next_window_pos(Vec2::new(60.0, 80.0), Condition::ONCE);
        self.set_next_window_size(Vec2::new(440.0, 560.0), Condition::ONCE);
        if !self.begin_window("Demo", Some(open), WindowFlags::NONE) {
            return;
        }

        let mut demo = std::mem::take(&mut self.demo);
        demo.elapsed += self.io.delta_time();

        self.text("Plume widgets, one section per family.");
        self.progress_bar((demo.elapsed * 0.25).fract(), Vec2::ZERO, None);

        if self.collapsing_header("Buttons") {
            self.demo_buttons(&mut demo);
            self.end_collapsing_header();
        }
        if self.collapsing_header("Text") {
            self.demo_text();
            self.end_collapsing_header();
        }
        if self.collapsing_header("Sliders") {
            self.demo_sliders(&mut demo);
            self.end_collapsing_header();
        }
        if self.collapsing_header("Input") {
            self.input_text_hint("Name", "type a name", &mut demo.name);
            self.input_float("Scale", &mut demo.scale, "%.2f");
            self.input_int("Count", &mut demo.count);
            self.end_collapsing_header();
        }
        if self.collapsing_header("Trees") {
            self.demo_trees();
            self.end_collapsing_header();
        }
        if self.collapsing_header("Tabs") {
            if self.begin_tab_bar("demo tabs") {
                if self.begin_tab("First") {
                    self.text("Content of the first tab");
                    self.end_tab();
                }
                if self.begin_tab("Second") {
                    self.text("Content of the second tab");
                    self.end_tab();
                }
                self.end_tab_bar();
            }
            self.end_collapsing_header();
        }
        if self.collapsing_header("Layout") {
            self.demo_layout();
            self.end_collapsing_header();
        }
        if self.collapsing_header("Lists") {
            self.layout_dynamic(120.0, 1);
            if self.begin_child("lines") {
                self.layout_dynamic(0.0, 1);
                let mut clipper = UiClipper::new(1000);
                while self.step_clipper(&mut clipper) {
                    for line in clipper.display_start()..clipper.display_end() {
                        self.text(&format!("Line {line}"));
                    }
                }
                self.end_child();
            }
            self.layout_dynamic(0.0, 1);
            self.end_collapsing_header();
        }

        self.demo = demo;
        self.end_window();
    }

    fn demo_buttons(&mut self, demo: &mut DemoState) {
        self.layout_dynamic(0.0, 2);
        if self.button("Click") {
            demo.clicks += 1;
        }
        if self.button("Reset") {
            demo.clicks = 0;
        }
        self.layout_dynamic(0.0, 1);
        self.labeled_text("Clicks", &demo.clicks.to_string());

        self.checkbox("Enabled", &mut demo.enabled);
        if self.was_last_item_hovered() {
            self.tooltip("Checkboxes toggle on release");
        }

        self.layout_dynamic(0.0, 3);
        self.radio_button("Low", &mut demo.quality, 0);
        self.radio_button("Medium", &mut demo.quality, 1);
        self.radio_button("High", &mut demo.quality, 2);
        self.layout_dynamic(0.0, 1);

        for (i, selected) in demo.selected.iter_mut().enumerate() {
            self.selectable(&format!("Item {i}"), selected);
        }
        self.invisible_button("##gap", Vec2::new(0.0, 8.0));
    }

    fn demo_text(&mut self) {
        self.text("Plain text");
        self.color_text(Color::rgba(1.0, 0.8, 0.2, 1.0), "Colored text");
        self.labeled_text("Label", "value");
        self.separator();
        self.indent(0.0);
        self.text("Indented");
        self.unindent(0.0);
        self.vertical_spacing();
        self.dummy(Vec2::new(0.0, 4.0));
        self.text("After some space");
    }

    fn demo_sliders(&mut self, demo: &mut DemoState) {
        self.slider_float("Volume", &mut demo.volume, 0.0, 1.0);
        self.slider_float_f("Gamma", &mut demo.gamma, 1.0, 3.0, "%.2f");
        self.slider_int("Samples", &mut demo.samples, 1, 16);
        self.drag_float_f("Speed", &mut demo.speed, 0.05, 0.0, 10.0, "%.2f m/s");
        let overlay = format!("{:.0}% volume", demo.volume * 100.0);
        self.progress_bar(demo.volume, Vec2::ZERO, Some(&overlay));
    }

    fn demo_trees(&mut self) {
        if self.tree_node("Root") {
            for child in ["Child A", "Child B"] {
                if self.tree_node(child) {
                    self.text("Leaf");
                    self.tree_pop();
                }
            }
            self.tree_pop();
        }
    }

    fn demo_layout(&mut self) {
        self.text("Static columns");
        self.layout_row(LayoutRowType::Static, 0.0, &[60.0, 90.0]);
        self.button("60");
        self.button("90");

        self.text("Template: static, dynamic, variable");
        self.layout_template_begin(0.0);
        self.layout_template_push_static(60.0);
        self.layout_template_push_dynamic();
        self.layout_template_push_variable(40.0);
        self.layout_template_end();
        self.button("Fixed");
        self.button("Fill");
        self.button("Grow");

        self.layout_dynamic(0.0, 1);
    }
}

#[cfg(test)]
mod tests {
    use plume_core::{hash_str, Vec2};
    use plume_platform::InputState;

    use super::*;
    use crate::context::tests::{input_at, move_mouse, press, release, test_context};

    type ShowFn = fn(&mut UiContext, &mut bool);

    fn tool_frame(ui: &mut UiContext, input: &InputState, show: ShowFn, open: &mut bool) {
        ui.new_frame(input);
        show(ui, open);
        ui.render();
    }

    /// Click the close button of the tool window `name` and check it stays shut
    fn assert_close_button_hides(name: &str, show: ShowFn) {
        let mut ui = test_context();
        let mut input = input_at(Vec2::new(-100.0, -100.0));
        let mut open = true;

        input.new_frame(0.016);
        tool_frame(&mut ui, &input, show, &mut open);
        let window = ui.find_window(name).expect("tool window registered");
        let style = ui.style();
        let right = window.pos().x + window.size().x - style.window_horizontal_padding;
        let close = Vec2::new(
            right - style.font_size * 0.5,
            window.pos().y + style.title_bar_height() * 0.5,
        );

        move_mouse(&mut input, close);
        for _ in 0..2 {
            input.new_frame(0.016);
            tool_frame(&mut ui, &input, show, &mut open);
        }
        press(&mut input);
        input.new_frame(0.016);
        tool_frame(&mut ui, &input, show, &mut open);
        assert!(open);

        release(&mut input);
        input.new_frame(0.016);
        tool_frame(&mut ui, &input, show, &mut open);
        assert!(!open, "{name} still open after the close click");

        let last_frame = ui.find_window(name).map(|w| w.last_frame);
        input.new_frame(0.016);
        tool_frame(&mut ui, &input, show, &mut open);
        assert_eq!(ui.find_window(name).map(|w| w.last_frame), last_frame);
    }

    #[test]
    fn test_debug_window_closes() {
        assert_close_button_hides("Debug", UiContext::show_debug_window);
    }

    #[test]
    fn test_style_window_closes() {
        assert_close_button_hides("Style", UiContext::show_style_window);
    }

    #[test]
    fn test_demo_window_closes() {
        assert_close_button_hides("Demo", UiContext::show_demo_window);
    }

    #[test]
    fn test_closed_tool_window_is_never_created() {
        let mut ui = test_context();
        let input = input_at(Vec2::new(-100.0, -100.0));
        let mut open = false;
        ui.new_frame(&input);
        ui.show_debug_window(&mut open);
        ui.show_style_window(&mut open);
        ui.show_demo_window(&mut open);
        ui.render();
        assert!(ui.windows.is_empty());
    }

    #[test]
    fn test_debug_window_lists_every_window() {
        let mut ui = test_context();
        let input = input_at(Vec2::new(-100.0, -100.0));
        let mut open = true;
        let frame = |ui: &mut UiContext, open: &mut bool| {
            ui.new_frame(&input);
            if ui.begin_window("Inspector", None, WindowFlags::NONE) {
                ui.end_window();
            }
            ui.show_debug_window(open);
            ui.render();
        };
        for _ in 0..2 {
            frame(&mut ui, &mut open);
        }

        let debug = ui.find_window("Debug").expect("debug window registered");
        let (debug_id, closed_height) = (debug.id(), debug.content_size().y);
        let inspector_id = ui.find_window("Inspector").expect("window registered").id();
        let node = hash_str(&format!("Inspector (active)##{inspector_id:08x}"), debug_id);
        let index = ui.windows.iter().position(|w| w.name() == "Debug").unwrap();
        ui.windows[index].storage.set_bool(node, true);

        frame(&mut ui, &mut open);
        let open_height = ui.find_window("Debug").unwrap().content_size().y;
        // the opened node shows seven lines of details
        assert!(open_height - closed_height >= 7.0 * ui.style().font_size);
    }

    #[test]
    fn test_style_reset_restores_defaults() {
        let mut ui = test_context();
        ui.style_mut().font_size = 20.0;
        ui.colors_mut().text = Color::GREEN;
        let mut open = true;
        let mut input = input_at(Vec2::new(-100.0, -100.0));

        input.new_frame(0.016);
        tool_frame(&mut ui, &input, UiContext::show_style_window, &mut open);
        assert_eq!(ui.style().font_size, 20.0);
        assert_eq!(ui.colors().text, Color::GREEN);

        // "Reset" is the first button of the first row
        let window = ui.find_window("Style").unwrap();
        let style = ui.style();
        let top = style.title_bar_height() + style.window_vertical_padding;
        let reset = window.pos()
            + Vec2::new(
                style.window_horizontal_padding + 10.0,
                top + style.frame_height() * 0.5,
            );
        move_mouse(&mut input, reset);
        for _ in 0..2 {
            input.new_frame(0.016);
            tool_frame(&mut ui, &input, UiContext::show_style_window, &mut open);
        }
        press(&mut input);
        input.new_frame(0.016);
        tool_frame(&mut ui, &input, UiContext::show_style_window, &mut open);
        release(&mut input);
        input.new_frame(0.016);
        tool_frame(&mut ui, &input, UiContext::show_style_window, &mut open);

        assert!(open);
        assert_eq!(ui.style(), &UiStyle::default());
        assert_eq!(ui.colors(), &ColorScheme::dark());
    }

    #[test]
    fn test_color_entries_cover_the_scheme() {
        let mut colors = ColorScheme::dark();
        for (_, color) in colors.entries_mut() {
            *color = Color::GREEN;
        }
        assert_eq!(colors.text, Color::GREEN);
        assert_eq!(colors.separator, Color::GREEN);
        assert_eq!(colors.title_active, Color::GREEN);

        let names: Vec<&str> = ColorScheme::dark().entries_mut().map(|(name, _)| name).to_vec();
        let mut unique = names.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_demo_sections_all_draw() {
        let mut ui = test_context();
        let mut open = true;
        let input = input_at(Vec2::new(-100.0, -100.0));
        ui.new_frame(&input);
        ui.show_demo_window(&mut open);
        ui.render();

        let demo = ui.find_window("Demo").expect("demo window registered");
        let window_id = demo.id();
        let closed_height = demo.content_size().y;
        let index = ui.windows.iter().position(|w| w.name() == "Demo").unwrap();
        let sections = ["Buttons", "Text", "Sliders", "Input", "Trees", "Tabs", "Layout", "Lists"];
        for section in sections {
            ui.windows[index].storage.set_bool(hash_str(section, window_id), true);
        }
        let root = hash_str("Root", hash_str("Trees", window_id));
        ui.windows[index].storage.set_bool(root, true);

        for _ in 0..2 {
            ui.new_frame(&input);
            ui.show_demo_window(&mut open);
            ui.render();
        }
        assert!(open);
        let demo = ui.find_window("Demo").unwrap();
        assert!(demo.content_size().y > closed_height);
        assert!(demo.scroll_max().y > 0.0);
    }
}
