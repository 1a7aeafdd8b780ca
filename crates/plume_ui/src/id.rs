//! Widget identity
//!
//! An ID is the FxHash of a label seeded with the ID on top of the stack, so
//! the same label under two different scopes yields two different IDs.

use plume_core::{hash_bytes, hash_str, hash_u32};
use smallvec::SmallVec;

/// Scope chain used to seed widget hashes
#[derive(Clone, Debug, Default)]
pub struct IdStack {
    stack: SmallVec<[u32; 16]>,
}

impl IdStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed for the next hash, 0 at the root
    pub fn top(&self) -> u32 {
        self.stack.last().copied().unwrap_or(0)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// ID of `label` in the current scope
    pub fn id_str(&self, label: &str) -> u32 {
        hash_str(label, self.top())
    }

    pub fn id_u32(&self, value: u32) -> u32 {
        hash_u32(value, self.top())
    }

    /// ID of an address, for widgets bound to an application object
    pub fn id_ptr<T: ?Sized>(&self, ptr: *const T) -> u32 {
        let address = ptr as *const () as usize;
        hash_bytes(&address.to_le_bytes(), self.top())
    }

    /// Push an already computed ID
    pub fn push(&mut self, id: u32) {
        self.stack.push(id);
    }

    /// # Panics
    ///
    /// Panics if the stack is empty.
    pub fn pop(&mut self) {
        if self.stack.pop().is_none() {
            panic!("pop_id called with an empty ID stack");
        }
    }

    pub(crate) fn clear(&mut self) {
        self.stack.clear();
    }
}

/// Part of a label that is displayed: everything before `##`
pub fn visible_label(label: &str) -> &str {
    match label.find("##") {
        Some(end) => &label[..end],
        None => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_labels_differ() {
        let mut stack = IdStack::new();
        let root = stack.id_str("OK");

        stack.push(stack.id_str("dialog a"));
        let in_a = stack.id_str("OK");
        stack.pop();

        stack.push(stack.id_str("dialog b"));
        let in_b = stack.id_str("OK");
        stack.pop();

        assert_ne!(root, in_a);
        assert_ne!(in_a, in_b);
        assert_eq!(root, stack.id_str("OK"));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_hidden_label_suffix() {
        assert_eq!(visible_label("Apply##first"), "Apply");
        assert_eq!(visible_label("##hidden"), "");
        assert_eq!(visible_label("Plain"), "Plain");

        let stack = IdStack::new();
        assert_ne!(stack.id_str("Apply##first"), stack.id_str("Apply##second"));
    }

    #[test]
    fn test_pointer_ids_are_stable() {
        let stack = IdStack::new();
        let value = 5_u64;
        assert_eq!(stack.id_ptr(&value), stack.id_ptr(&value));
        assert_ne!(stack.id_u32(1), stack.id_u32(2));
    }

    #[test]
    #[should_panic(expected = "empty ID stack")]
    fn test_pop_empty_panics() {
        IdStack::new().pop();
    }
}
