//! Per-window key/value storage
//!
//! Widgets keep small pieces of state here (tree node open flags, tab
//! selections) keyed by their hashed ID. Entries live in a `Vec` kept sorted
//! by key so lookups are a binary search.

/// One stored value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StorageValue {
    Int(i32),
    Float(f32),
    Bool(bool),
    /// Opaque application handle
    Handle(u64),
}

#[derive(Clone, Debug, Default)]
pub struct Storage {
    entries: Vec<(u32, StorageValue)>,
}

macro_rules! typed_access {
    ($get:ident, $set:ident, $get_mut:ident, $variant:ident, $ty:ty) => {
        pub fn $get(&self, key: u32, default: $ty) -> $ty {
            match self.get(key) {
                Some(StorageValue::$variant(value)) => value,
                _ => default,
            }
        }

        pub fn $set(&mut self, key: u32, value: $ty) {
            self.set(key, StorageValue::$variant(value));
        }

        /// Mutable slot for `key`, inserting `default` when missing
        ///
        /// A slot holding another type is overwritten with `default`.
        pub fn $get_mut(&mut self, key: u32, default: $ty) -> &mut $ty {
            let index = self.slot(key, StorageValue::$variant(default));
            if !matches!(self.entries[index].1, StorageValue::$variant(_)) {
                self.entries[index].1 = StorageValue::$variant(default);
            }
            match &mut self.entries[index].1 {
                StorageValue::$variant(value) => value,
                _ => unreachable!(),
            }
        }
    };
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, key: u32) -> Option<StorageValue> {
        let index = self.lower_bound(key);
        match self.entries.get(index) {
            Some(&(k, value)) if k == key => Some(value),
            _ => None,
        }
    }

    pub fn set(&mut self, key: u32, value: StorageValue) {
        let index = self.lower_bound(key);
        match self.entries.get_mut(index) {
            Some(entry) if entry.0 == key => entry.1 = value,
            _ => self.entries.insert(index, (key, value)),
        }
    }

    pub fn remove(&mut self, key: u32) -> Option<StorageValue> {
        let index = self.lower_bound(key);
        match self.entries.get(index) {
            Some(&(k, _)) if k == key => Some(self.entries.remove(index).1),
            _ => None,
        }
    }

    typed_access!(get_int, set_int, int_mut, Int, i32);
    typed_access!(get_float, set_float, float_mut, Float, f32);
    typed_access!(get_bool, set_bool, bool_mut, Bool, bool);
    typed_access!(get_handle, set_handle, handle_mut, Handle, u64);

    /// Index of the first entry whose key is not less than `key`
    fn lower_bound(&self, key: u32) -> usize {
        self.entries.partition_point(|&(k, _)| k < key)
    }

    fn slot(&mut self, key: u32, default: StorageValue) -> usize {
        let index = self.lower_bound(key);
        if !matches!(self.entries.get(index), Some(&(k, _)) if k == key) {
            self.entries.insert(index, (key, default));
        }
        index
    }
}
