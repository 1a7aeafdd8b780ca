//! Single-line text editing
//!
//! [`TextEditState`] edits a `Vec<char>` with a cursor, a selection anchor
//! and a bounded undo/redo history. It knows nothing about drawing; the
//! input widgets map keys onto it.

use std::collections::VecDeque;

use bitflags::bitflags;

/// Undo records kept before the oldest is dropped
pub const UNDO_RECORD_CAPACITY: usize = 99;
/// Characters stored across all undo records before the oldest are dropped
pub const UNDO_CHAR_CAPACITY: usize = 999;

bitflags! {
    /// Behavior of `input_text_ex`
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InputTextFlags: u32 {
        const NONE = 0;
        /// Allow `0123456789.+-*/`
        const CHARS_DECIMAL = 1 << 0;
        /// Allow `0123456789ABCDEFabcdef`
        const CHARS_HEXADECIMAL = 1 << 1;
        /// Turn `a..z` into `A..Z`
        const CHARS_UPPERCASE = 1 << 2;
        /// Filter out spaces and tabs
        const CHARS_NO_BLANK = 1 << 3;
        /// Select the whole text when the widget is activated
        const AUTO_SELECT_ALL = 1 << 4;
        /// Write back and return `true` only when Enter is pressed
        const ENTER_RETURNS_TRUE = 1 << 5;
        const READ_ONLY = 1 << 14;
        /// Draw every character as `*`
        const PASSWORD = 1 << 15;
        const NO_UNDO_REDO = 1 << 16;
        /// Allow `0123456789.+-*/eE`
        const CHARS_SCIENTIFIC = 1 << 17;
        /// Escape clears the text instead of reverting it
        const ESCAPE_CLEARS_ALL = 1 << 20;
    }
}

/// Apply the character filters in `flags`; `None` drops the character
pub fn filter_char(c: char, flags: InputTextFlags) -> Option<char> {
    if c.is_control() {
        return None;
    }
    if flags.contains(InputTextFlags::CHARS_NO_BLANK) && (c == ' ' || c == '\t') {
        return None;
    }
    if flags.contains(InputTextFlags::CHARS_DECIMAL) && !(c.is_ascii_digit() || ".+-*/".contains(c)) {
        return None;
    }
    if flags.contains(InputTextFlags::CHARS_SCIENTIFIC)
        && !(c.is_ascii_digit() || ".+-*/eE".contains(c))
    {
        return None;
    }
    if flags.contains(InputTextFlags::CHARS_HEXADECIMAL) && !c.is_ascii_hexdigit() {
        return None;
    }
    if flags.contains(InputTextFlags::CHARS_UPPERCASE) {
        return Some(c.to_ascii_uppercase());
    }
    Some(c)
}

/// One reversible edit: `deleted` was removed at `at`, then `inserted` put there
#[derive(Clone, Debug, Default, PartialEq)]
struct UndoRecord {
    at: usize,
    deleted: Vec<char>,
    inserted: Vec<char>,
}

impl UndoRecord {
    fn char_count(&self) -> usize {
        self.deleted.len() + self.inserted.len()
    }
}

/// Bounded undo history plus the redo records undone since the last edit
#[derive(Clone, Debug, Default)]
struct UndoHistory {
    undo: VecDeque<UndoRecord>,
    redo: Vec<UndoRecord>,
    undo_chars: usize,
}

impl UndoHistory {
    fn push(&mut self, record: UndoRecord) {
        self.redo.clear();
        self.push_undo(record);
    }

    fn push_undo(&mut self, record: UndoRecord) {
        self.undo_chars += record.char_count();
        self.undo.push_back(record);
        while self.undo.len() > UNDO_RECORD_CAPACITY || self.undo_chars > UNDO_CHAR_CAPACITY {
            match self.undo.pop_front() {
                Some(dropped) => self.undo_chars -= dropped.char_count(),
                None => break,
            }
        }
    }

    fn pop_undo(&mut self) -> Option<UndoRecord> {
        let record = self.undo.pop_back()?;
        self.undo_chars -= record.char_count();
        Some(record)
    }

    fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.undo_chars = 0;
    }
}

#[derive(Clone, Debug, Default)]
pub struct TextEditState {
    text: Vec<char>,
    cursor: usize,
    /// Other end of the selection, `None` when nothing is selected
    anchor: Option<usize>,
    history: UndoHistory,
}

impl TextEditState {
    pub fn new(text: &str) -> Self {
        let text: Vec<char> = text.chars().collect();
        Self {
            cursor: text.len(),
            text,
            ..Self::default()
        }
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    pub fn chars(&self) -> &[char] {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Cursor position in characters
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Selected character range, ordered
    pub fn selection(&self) -> Option<(usize, usize)> {
        match self.anchor {
            Some(anchor) if anchor != self.cursor => {
                Some((anchor.min(self.cursor), anchor.max(self.cursor)))
            }
            _ => None,
        }
    }

    pub fn has_selection(&self) -> bool {
        self.selection().is_some()
    }

    pub fn select_all(&mut self) {
        self.anchor = Some(0);
        self.cursor = self.text.len();
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    pub fn can_undo(&self) -> bool {
        !self.history.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.history.redo.is_empty()
    }

    // ========================================================================
    // Cursor movement
    // ========================================================================

    fn move_to(&mut self, pos: usize, select: bool) {
        if select {
            self.anchor.get_or_insert(self.cursor);
        } else {
            self.anchor = None;
        }
        self.cursor = pos.min(self.text.len());
    }

    pub fn move_left(&mut self, select: bool) {
        match self.selection() {
            // collapse to the left edge
            Some((start, _)) if !select => self.move_to(start, false),
            _ => self.move_to(self.cursor.saturating_sub(1), select),
        }
    }

    pub fn move_right(&mut self, select: bool) {
        match self.selection() {
            Some((_, end)) if !select => self.move_to(end, false),
            _ => self.move_to(self.cursor + 1, select),
        }
    }

    pub fn move_home(&mut self, select: bool) {
        self.move_to(0, select);
    }

    pub fn move_end(&mut self, select: bool) {
        self.move_to(self.text.len(), select);
    }

    /// Place the cursor at a character index, as for a mouse click
    pub fn set_cursor(&mut self, pos: usize) {
        self.move_to(pos, false);
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Replace the selection (or nothing) with `text`
    ///
    /// At most `max_len` characters are kept in total. Returns whether the
    /// text changed.
    pub fn insert(&mut self, text: &[char], max_len: usize) -> bool {
        let (start, end) = self.selection().unwrap_or((self.cursor, self.cursor));
        let room = max_len.saturating_sub(self.text.len() - (end - start));
        let inserted: Vec<char> = text.iter().copied().take(room).collect();
        if inserted.is_empty() && start == end {
            return false;
        }
        self.replace(start, end, inserted);
        true
    }

    pub fn insert_char(&mut self, c: char, max_len: usize) -> bool {
        self.insert(&[c], max_len)
    }

    /// Backspace: remove the selection or the character before the cursor
    pub fn delete_backward(&mut self) -> bool {
        match self.selection() {
            Some((start, end)) => self.replace(start, end, Vec::new()),
            None if self.cursor > 0 => self.replace(self.cursor - 1, self.cursor, Vec::new()),
            None => return false,
        }
        true
    }

    /// Delete: remove the selection or the character after the cursor
    pub fn delete_forward(&mut self) -> bool {
        match self.selection() {
            Some((start, end)) => self.replace(start, end, Vec::new()),
            None if self.cursor < self.text.len() => {
                self.replace(self.cursor, self.cursor + 1, Vec::new())
            }
            None => return false,
        }
        true
    }

    /// Replace the whole text as one undoable edit
    pub fn set_text(&mut self, text: &str) {
        let inserted: Vec<char> = text.chars().collect();
        if inserted != self.text {
            self.replace(0, self.text.len(), inserted);
        }
    }

    /// Forget all undo/redo history
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn replace(&mut self, start: usize, end: usize, inserted: Vec<char>) {
        let deleted: Vec<char> = self.text.splice(start..end, inserted.iter().copied()).collect();
        self.cursor = start + inserted.len();
        self.anchor = None;
        self.history.push(UndoRecord {
            at: start,
            deleted,
            inserted,
        });
    }

    // ========================================================================
    // Undo / redo
    // ========================================================================

    pub fn undo(&mut self) -> bool {
        let Some(record) = self.history.pop_undo() else {
            return false;
        };
        let end = record.at + record.inserted.len();
        self.text.splice(record.at..end, record.deleted.iter().copied());
        self.cursor = record.at + record.deleted.len();
        self.anchor = None;
        self.history.redo.push(record);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(record) = self.history.redo.pop() else {
            return false;
        };
        let end = record.at + record.deleted.len();
        self.text.splice(record.at..end, record.inserted.iter().copied());
        self.cursor = record.at + record.inserted.len();
        self.anchor = None;
        self.history.push_undo(record);
        true
    }
}

/// Edit state of the focused input widget
///
/// Only one input widget edits at a time, so the context keeps a single
/// instance. The caller's text is copied in on activation and dropped on
/// deactivation.
#[derive(Clone, Debug)]
pub(crate) struct InputTextState {
    pub id: u32,
    pub edit: TextEditState,
    /// Caller's text when the widget was activated, restored by Escape
    pub initial: String,
    pub flags: InputTextFlags,
    /// Horizontal scroll keeping the cursor visible
    pub scroll_x: f32,
}

impl InputTextState {
    pub fn new(id: u32, text: &str, flags: InputTextFlags) -> Self {
        let mut edit = TextEditState::new(text);
        if flags.contains(InputTextFlags::AUTO_SELECT_ALL) {
            edit.select_all();
        }
        Self {
            id,
            edit,
            initial: text.to_string(),
            flags,
            scroll_x: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_insert_and_delete() {
        let mut state = TextEditState::new("");
        assert!(state.insert(&chars("hello"), usize::MAX));
        assert_eq!(state.text(), "hello");
        assert_eq!(state.cursor(), 5);

        state.move_left(false);
        state.move_left(false);
        assert!(state.delete_backward());
        assert_eq!(state.text(), "helo");
        assert!(state.delete_forward());
        assert_eq!(state.text(), "hel");
        assert_eq!(state.cursor(), 2);

        state.move_home(false);
        assert!(!state.delete_backward());
    }

    #[test]
    fn test_selection_replace() {
        let mut state = TextEditState::new("hello world");
        state.move_home(false);
        for _ in 0..5 {
            state.move_right(true);
        }
        assert_eq!(state.selection(), Some((0, 5)));

        state.insert(&chars("HELLO"), usize::MAX);
        assert_eq!(state.text(), "HELLO world");
        assert!(!state.has_selection());

        state.select_all();
        state.move_left(false);
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_max_len() {
        let mut state = TextEditState::new("abc");
        assert!(state.insert(&chars("defgh"), 5));
        assert_eq!(state.text(), "abcde");
        assert!(!state.insert_char('x', 5));
    }

    #[test]
    fn test_undo_redo() {
        let mut state = TextEditState::new("");
        state.insert(&chars("abc"), usize::MAX);
        state.insert_char('d', usize::MAX);
        state.delete_backward();
        assert_eq!(state.text(), "abc");

        assert!(state.undo());
        assert_eq!(state.text(), "abcd");
        assert!(state.undo());
        assert_eq!(state.text(), "abc");
        assert!(state.redo());
        assert_eq!(state.text(), "abcd");

        // a new edit drops the redo records
        state.insert_char('!', usize::MAX);
        assert!(!state.can_redo());
        assert!(state.undo());
        assert_eq!(state.text(), "abcd");
    }

    #[test]
    fn test_history_is_bounded() {
        let mut state = TextEditState::new("");
        for _ in 0..UNDO_RECORD_CAPACITY + 20 {
            state.insert_char('x', usize::MAX);
        }
        let mut undone = 0;
        while state.undo() {
            undone += 1;
        }
        assert_eq!(undone, UNDO_RECORD_CAPACITY);
        assert_eq!(state.len(), 20);

        let mut state = TextEditState::new("");
        let long: Vec<char> = std::iter::repeat('y').take(600).collect();
        state.insert(&long, usize::MAX);
        state.insert(&long, usize::MAX);
        // the first record no longer fits in the char budget
        assert!(state.undo());
        assert!(!state.undo());
        assert_eq!(state.len(), 600);
    }

    #[test]
    fn test_char_filters() {
        let decimal = InputTextFlags::CHARS_DECIMAL;
        assert_eq!(filter_char('7', decimal), Some('7'));
        assert_eq!(filter_char('a', decimal), None);
        assert_eq!(filter_char('e', InputTextFlags::CHARS_SCIENTIFIC), Some('e'));
        assert_eq!(filter_char('F', InputTextFlags::CHARS_HEXADECIMAL), Some('F'));
        assert_eq!(filter_char('g', InputTextFlags::CHARS_HEXADECIMAL), None);
        assert_eq!(filter_char('q', InputTextFlags::CHARS_UPPERCASE), Some('Q'));
        assert_eq!(filter_char(' ', InputTextFlags::CHARS_NO_BLANK), None);
        assert_eq!(filter_char('\u{7}', InputTextFlags::NONE), None);
    }

    #[test]
    fn test_input_state_auto_select() {
        let state = InputTextState::new(1, "abc", InputTextFlags::AUTO_SELECT_ALL);
        assert_eq!(state.edit.selection(), Some((0, 3)));
        assert_eq!(state.initial, "abc");
    }
}
