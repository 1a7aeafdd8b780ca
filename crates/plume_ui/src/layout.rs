//! Row layout systems
//!
//! Every widget asks the current row for its size, draws at the window
//! cursor, then advances the cursor. Rows wrap once their declared column
//! count is reached.
//!
//! | call                         | column widths                                  |
//! |------------------------------|------------------------------------------------|
//! | `layout_dynamic`             | available width split equally                  |
//! | `layout_static`              | fixed pixel width                              |
//! | `layout_row`                 | per-column ratios or pixels from a slice       |
//! | `layout_row_begin/push/end`  | ratio or pixels pushed before each widget      |
//! | `layout_template_*`          | static, dynamic and variable columns mixed     |
//! | `layout_space_*`             | free placement inside one row                  |

use plume_core::Vec2;
use smallvec::SmallVec;

use crate::context::UiContext;
use crate::style::UiStyle;

/// Whether row values are ratios of the available width or pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutRowType {
    #[default]
    Dynamic,
    Static,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum LayoutSystem {
    #[default]
    None,
    Dynamic,
    Static,
    Space,
    Array,
    Template,
    /// Widths pushed one at a time between `layout_row_begin` and `layout_row_end`
    RowPush,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TemplateEntryKind {
    Variable,
    Dynamic,
    Static,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TemplateEntry {
    pub kind: TemplateEntryKind,
    /// Minimum or fixed width while pushing; resolved width after `end`
    pub width: f32,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct LayoutRow {
    pub row_type: LayoutRowType,
    pub system: LayoutSystem,
    /// Ratio or pixel width of the next widget
    pub width: f32,
    /// Row height, 0 means the widget's default height
    pub height: f32,
    pub vertical_offset: f32,
    pub horizontal_offset: f32,
    pub columns: u32,
    pub current_column: u32,
    pub max_width: f32,
    pub max_height: f32,
    /// Height of the next widget placed by the space system
    pub space_height: f32,
    pub sizes: SmallVec<[f32; 8]>,
}

/// Per-frame cursor state of one window
#[derive(Clone, Debug, Default)]
pub(crate) struct WindowLayout {
    /// Where the first widget goes, already offset by scroll
    pub cursor_start: Vec2,
    /// Furthest point any widget reached this frame
    pub cursor_max: Vec2,
    pub row_pos: Vec2,
    pub tree_depth: u32,
    pub extra_indent: f32,
    /// Offset of a row started mid-row by a container such as a tab bar
    pub accum_row_x: f32,
    /// Width rows lay out into before indentation
    pub content_width: f32,
    pub row: LayoutRow,
    pub template: Vec<TemplateEntry>,
}

impl WindowLayout {
    pub fn new(cursor_start: Vec2, content_width: f32) -> Self {
        let mut layout = Self {
            cursor_start,
            cursor_max: cursor_start,
            row_pos: cursor_start,
            content_width,
            ..Self::default()
        };
        layout.set_dynamic(0.0, 1);
        layout
    }

    pub fn cursor_pos(&self, style: &UiStyle) -> Vec2 {
        Vec2::new(
            self.row_start_x(style) + self.row.horizontal_offset,
            self.row_pos.y + self.row.vertical_offset,
        )
    }

    /// Left edge of the current row after tree and manual indentation
    fn row_start_x(&self, style: &UiStyle) -> f32 {
        self.row_pos.x
            + self.accum_row_x
            + self.extra_indent
            + self.tree_depth as f32 * style.indent_size
    }

    /// Width a row can use once tree depth and indentation are removed
    pub fn available_width(&self, style: &UiStyle) -> f32 {
        (self.content_width
            - self.tree_depth as f32 * style.indent_size
            - self.extra_indent
            - self.accum_row_x)
            .max(0.0)
    }

    fn ratio_or_pixels(&self, value: f32, style: &UiStyle) -> f32 {
        match self.row.row_type {
            LayoutRowType::Static => value,
            LayoutRowType::Dynamic => {
                let gaps = self.row.columns.saturating_sub(1) as f32 * style.item_spacing.x;
                value * (self.available_width(style) - gaps).max(0.0)
            }
        }
    }

    /// Size of the next widget in the current row
    pub fn item_size(&self, default_height: f32, style: &UiStyle) -> Vec2 {
        let height = if self.row.height > 0.0 {
            self.row.height
        } else {
            default_height
        };

        let column = self.row.current_column as usize;
        let width = match self.row.system {
            LayoutSystem::None | LayoutSystem::Dynamic | LayoutSystem::RowPush => {
                self.ratio_or_pixels(self.row.width, style)
            }
            LayoutSystem::Static => self.row.width,
            LayoutSystem::Array => {
                let value = self.row.sizes.get(column).copied().unwrap_or(0.0);
                self.ratio_or_pixels(value, style)
            }
            LayoutSystem::Template => self.template.get(column).map_or(0.0, |entry| entry.width),
            LayoutSystem::Space => {
                return Vec2::new(self.row.width, self.row.space_height);
            }
        };
        Vec2::new(width, height)
    }

    /// Move past a widget of the given size
    pub fn advance(&mut self, width: f32, height: f32, style: &UiStyle) {
        let row_start_x = self.row_start_x(style);

        self.row.current_column += 1;
        self.row.max_width = self.row.max_width.max(self.row.horizontal_offset + width);
        self.row.max_height = self
            .row
            .max_height
            .max(self.row.vertical_offset + height)
            .max(self.row.height);

        self.cursor_max = self.cursor_max.max(Vec2::new(
            row_start_x + self.row.max_width,
            self.row_pos.y + self.row.max_height,
        ));

        if self.row.system == LayoutSystem::Space {
            return;
        }

        self.row.horizontal_offset += width + style.item_spacing.x;
        if self.row.current_column >= self.row.columns {
            self.next_row(style);
        }
    }

    /// Close the current row and start the next one below it
    pub fn next_row(&mut self, style: &UiStyle) {
        self.row_pos.y += self.row.max_height + style.item_spacing.y;
        self.row.horizontal_offset = 0.0;
        self.row.vertical_offset = 0.0;
        self.row.current_column = 0;
        self.row.max_width = 0.0;
        self.row.max_height = 0.0;
        self.accum_row_x = 0.0;
    }

    /// Close the current row and leave `amount` of empty space below it
    pub fn skip_vertical(&mut self, amount: f32, style: &UiStyle) {
        self.finish_row(style);
        self.row_pos.y += amount;
        self.cursor_max.y = self.cursor_max.y.max(self.row_pos.y - style.item_spacing.y);
    }

    /// Finish a partially filled row before switching systems
    fn finish_row(&mut self, style: &UiStyle) {
        if self.row.current_column > 0 {
            self.next_row(style);
        }
    }

    fn start_row(&mut self, system: LayoutSystem, row_type: LayoutRowType, height: f32, columns: u32) {
        self.row.system = system;
        self.row.row_type = row_type;
        self.row.height = height;
        self.row.columns = columns.max(1);
        self.row.current_column = 0;
        self.row.horizontal_offset = 0.0;
        self.row.vertical_offset = 0.0;
        self.row.sizes.clear();
    }

    pub fn set_dynamic(&mut self, height: f32, columns: u32) {
        self.start_row(LayoutSystem::Dynamic, LayoutRowType::Dynamic, height, columns);
        self.row.width = 1.0 / self.row.columns as f32;
    }
}

/// Resolve template widths in place
///
/// Static entries keep their width. With dynamic entries present, variable
/// entries keep their minimum and dynamic entries split the rest equally.
/// Otherwise variable entries grow from their minimum in proportion to it.
pub(crate) fn resolve_template(entries: &mut [TemplateEntry], available: f32, spacing: f32) {
    if entries.is_empty() {
        return;
    }
    let count_of = |kind: TemplateEntryKind| entries.iter().filter(|e| e.kind == kind).count();
    let width_of = |kind: TemplateEntryKind| -> f32 {
        entries.iter().filter(|e| e.kind == kind).map(|e| e.width).sum()
    };

    let dynamic_count = count_of(TemplateEntryKind::Dynamic);
    let variable_min = width_of(TemplateEntryKind::Variable);
    let variable_count = count_of(TemplateEntryKind::Variable);
    let gaps = (entries.len() - 1) as f32 * spacing;
    let remaining = (available - gaps - width_of(TemplateEntryKind::Static)).max(0.0);
    let leftover = (remaining - variable_min).max(0.0);

    for entry in entries.iter_mut() {
        entry.width = match entry.kind {
            TemplateEntryKind::Static => entry.width,
            TemplateEntryKind::Dynamic => leftover / dynamic_count as f32,
            TemplateEntryKind::Variable if dynamic_count > 0 => entry.width,
            TemplateEntryKind::Variable if variable_min > 0.0 => {
                entry.width + leftover * entry.width / variable_min
            }
            TemplateEntryKind::Variable => leftover / variable_count as f32,
        };
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout API
// ─────────────────────────────────────────────────────────────────────────────

impl UiContext {
    /// `columns` widgets per row sharing the available width equally
    pub fn layout_dynamic(&mut self, height: f32, columns: u32) {
        let (layout, style) = self.layout_mut();
        layout.finish_row(style);
        layout.set_dynamic(height, columns);
    }

    /// `columns` widgets per row, each `width` pixels wide
    pub fn layout_static(&mut self, height: f32, width: f32, columns: u32) {
        let (layout, style) = self.layout_mut();
        layout.finish_row(style);
        layout.start_row(LayoutSystem::Static, LayoutRowType::Static, height, columns);
        layout.row.width = width;
    }

    /// One widget per entry of `sizes`: ratios for `Dynamic`, pixels for `Static`
    pub fn layout_row(&mut self, row_type: LayoutRowType, height: f32, sizes: &[f32]) {
        let (layout, style) = self.layout_mut();
        layout.finish_row(style);
        layout.start_row(LayoutSystem::Array, row_type, height, sizes.len() as u32);
        layout.row.sizes.extend_from_slice(sizes);
    }

    /// Start a row whose widths are given by [`layout_row_push`](Self::layout_row_push)
    pub fn layout_row_begin(&mut self, row_type: LayoutRowType, height: f32, columns: u32) {
        let (layout, style) = self.layout_mut();
        layout.finish_row(style);
        layout.start_row(LayoutSystem::RowPush, row_type, height, columns);
        layout.row.width = 0.0;
    }

    /// Width (ratio or pixels) of the next widget in the row
    pub fn layout_row_push(&mut self, width: f32) {
        let (layout, _) = self.layout_mut();
        assert!(
            layout.row.system == LayoutSystem::RowPush,
            "layout_row_push called outside layout_row_begin/layout_row_end"
        );
        layout.row.width = width;
    }

    pub fn layout_row_end(&mut self) {
        let (layout, style) = self.layout_mut();
        assert!(
            layout.row.system == LayoutSystem::RowPush,
            "layout_row_end called without layout_row_begin"
        );
        layout.finish_row(style);
        layout.set_dynamic(0.0, 1);
    }

    pub fn layout_template_begin(&mut self, height: f32) {
        let (layout, style) = self.layout_mut();
        layout.finish_row(style);
        layout.start_row(LayoutSystem::Template, LayoutRowType::Static, height, 1);
        layout.template.clear();
    }

    /// Column sharing what static and variable columns leave
    pub fn layout_template_push_dynamic(&mut self) {
        self.push_template_entry(TemplateEntryKind::Dynamic, 0.0);
    }

    /// Column at least `min_width` wide that grows when no dynamic column exists
    pub fn layout_template_push_variable(&mut self, min_width: f32) {
        self.push_template_entry(TemplateEntryKind::Variable, min_width);
    }

    pub fn layout_template_push_static(&mut self, width: f32) {
        self.push_template_entry(TemplateEntryKind::Static, width);
    }

    pub fn layout_template_end(&mut self) {
        let (layout, style) = self.layout_mut();
        assert!(
            layout.row.system == LayoutSystem::Template,
            "layout_template_end called without layout_template_begin"
        );
        let available = layout.available_width(style);
        resolve_template(&mut layout.template, available, style.item_spacing.x);
        layout.row.columns = layout.template.len().max(1) as u32;
    }

    fn push_template_entry(&mut self, kind: TemplateEntryKind, width: f32) {
        let (layout, _) = self.layout_mut();
        assert!(
            layout.row.system == LayoutSystem::Template,
            "template column pushed outside layout_template_begin/layout_template_end"
        );
        layout.template.push(TemplateEntry { kind, width });
    }

    /// Row of `height` where widgets are placed freely with `layout_space_push`
    pub fn layout_space_begin(&mut self, row_type: LayoutRowType, height: f32, count: u32) {
        let (layout, style) = self.layout_mut();
        layout.finish_row(style);
        layout.start_row(LayoutSystem::Space, row_type, height, count);
    }

    /// Place the next widget at (`x`, `y`) inside the row with size (`width`, `height`)
    ///
    /// Values are ratios of the row's width and height for a `Dynamic` row.
    pub fn layout_space_push(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let (layout, style) = self.layout_mut();
        assert!(
            layout.row.system == LayoutSystem::Space,
            "layout_space_push called outside layout_space_begin/layout_space_end"
        );
        let (x, y, width, height) = match layout.row.row_type {
            LayoutRowType::Static => (x, y, width, height),
            LayoutRowType::Dynamic => {
                let row_width = layout.available_width(style);
                let row_height = layout.row.height;
                (x * row_width, y * row_height, width * row_width, height * row_height)
            }
        };
        layout.row.horizontal_offset = x;
        layout.row.vertical_offset = y;
        layout.row.width = width;
        layout.row.space_height = height;
    }

    pub fn layout_space_end(&mut self) {
        let (layout, style) = self.layout_mut();
        assert!(
            layout.row.system == LayoutSystem::Space,
            "layout_space_end called without layout_space_begin"
        );
        layout.row.max_height = layout.row.max_height.max(layout.row.height);
        layout.row.vertical_offset = 0.0;
        layout.next_row(style);
        layout.set_dynamic(0.0, 1);
    }

    /// Where the next widget will be placed
    pub fn cursor_pos(&self) -> Vec2 {
        self.current_window().layout.cursor_pos(&self.style)
    }

    /// Size the current row gives the next widget
    pub(crate) fn calculate_item_size(&self, default_height: f32) -> Vec2 {
        self.current_window().layout.item_size(default_height, &self.style)
    }

    pub(crate) fn advance_cursor(&mut self, width: f32, height: f32) {
        let (layout, style) = self.layout_mut();
        layout.advance(width, height, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> UiStyle {
        UiStyle {
            item_spacing: Vec2::new(10.0, 5.0),
            indent_size: 20.0,
            ..UiStyle::default()
        }
    }

    #[test]
    fn test_dynamic_two_columns_wrap() {
        let style = style();
        let mut layout = WindowLayout::new(Vec2::new(5.0, 30.0), 210.0);
        layout.set_dynamic(0.0, 2);

        let size = layout.item_size(20.0, &style);
        assert_eq!(size, Vec2::new(100.0, 20.0));

        let first = layout.cursor_pos(&style);
        layout.advance(size.x, size.y, &style);
        let second = layout.cursor_pos(&style);
        layout.advance(size.x, size.y, &style);
        let third = layout.cursor_pos(&style);

        assert_eq!(first, Vec2::new(5.0, 30.0));
        assert_eq!(second, Vec2::new(115.0, 30.0));
        assert_eq!(third, Vec2::new(5.0, 55.0));
        assert_eq!(layout.cursor_max, Vec2::new(215.0, 50.0));
    }

    #[test]
    fn test_static_width_and_fixed_height() {
        let style = style();
        let mut layout = WindowLayout::new(Vec2::ZERO, 500.0);
        layout.start_row(LayoutSystem::Static, LayoutRowType::Static, 40.0, 3);
        layout.row.width = 60.0;
        assert_eq!(layout.item_size(20.0, &style), Vec2::new(60.0, 40.0));

        // a shorter widget still moves the next row by the row height
        layout.advance(60.0, 10.0, &style);
        layout.advance(60.0, 10.0, &style);
        layout.advance(60.0, 10.0, &style);
        assert_eq!(layout.cursor_pos(&style), Vec2::new(0.0, 45.0));
    }

    #[test]
    fn test_array_ratios() {
        let style = style();
        let mut layout = WindowLayout::new(Vec2::ZERO, 210.0);
        layout.start_row(LayoutSystem::Array, LayoutRowType::Dynamic, 0.0, 2);
        layout.row.sizes.extend_from_slice(&[0.25, 0.75]);

        assert_eq!(layout.item_size(20.0, &style).x, 50.0);
        layout.advance(50.0, 20.0, &style);
        assert_eq!(layout.item_size(20.0, &style).x, 150.0);
    }

    #[test]
    fn test_template_with_dynamic_column() {
        let mut entries = vec![
            TemplateEntry { kind: TemplateEntryKind::Static, width: 100.0 },
            TemplateEntry { kind: TemplateEntryKind::Variable, width: 50.0 },
            TemplateEntry { kind: TemplateEntryKind::Dynamic, width: 0.0 },
        ];
        resolve_template(&mut entries, 400.0, 0.0);
        let widths: Vec<f32> = entries.iter().map(|e| e.width).collect();
        assert_eq!(widths, vec![100.0, 50.0, 250.0]);
    }

    #[test]
    fn test_template_variables_grow_proportionally() {
        let mut entries = vec![
            TemplateEntry { kind: TemplateEntryKind::Static, width: 100.0 },
            TemplateEntry { kind: TemplateEntryKind::Variable, width: 50.0 },
            TemplateEntry { kind: TemplateEntryKind::Variable, width: 150.0 },
        ];
        resolve_template(&mut entries, 420.0, 10.0);
        let widths: Vec<f32> = entries.iter().map(|e| e.width).collect();
        assert_eq!(widths, vec![100.0, 75.0, 225.0]);
    }

    #[test]
    fn test_tree_depth_indents_cursor() {
        let style = style();
        let mut layout = WindowLayout::new(Vec2::new(5.0, 5.0), 200.0);
        layout.tree_depth = 2;
        assert_eq!(layout.cursor_pos(&style).x, 45.0);
        assert_eq!(layout.available_width(&style), 160.0);

        layout.extra_indent = 10.0;
        assert_eq!(layout.cursor_pos(&style).x, 55.0);
        assert_eq!(layout.available_width(&style), 150.0);
    }
}
