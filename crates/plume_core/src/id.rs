//! Identity hashing and resource handles

use std::hash::Hasher;

use rustc_hash::FxHasher;

/// Opaque handle to a texture registered with a render backend
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

impl TextureId {
    /// Handle that refers to no texture
    pub const NONE: TextureId = TextureId(0);
}

/// Hash raw bytes, chaining from `seed`
///
/// Chaining the seed is what scopes widget identities: the same label hashed
/// under two different parents yields two different ids.
pub fn hash_bytes(bytes: &[u8], seed: u32) -> u32 {
    let mut hasher = FxHasher::default();
    hasher.write_u32(seed);
    hasher.write(bytes);
    let h = hasher.finish();
    (h ^ (h >> 32)) as u32
}

pub fn hash_str(s: &str, seed: u32) -> u32 {
    hash_bytes(s.as_bytes(), seed)
}

pub fn hash_u32(value: u32, seed: u32) -> u32 {
    hash_bytes(&value.to_le_bytes(), seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(hash_str("Window", 0), hash_str("Window", 0));
    }

    #[test]
    fn test_seed_scopes_hash() {
        assert_ne!(hash_str("OK", 1), hash_str("OK", 2));
        assert_ne!(hash_str("OK", 0), hash_str("Cancel", 0));
    }
}
