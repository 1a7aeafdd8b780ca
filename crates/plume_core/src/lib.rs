//! Plume Core
//!
//! Foundational types shared by every Plume crate:
//!
//! - **Geometry**: `Vec2`, `Vec3`, `Mat4` and the min/max `Rect` used for clipping
//! - **Color**: float RGBA colors and their packed RGBA8 vertex form
//! - **Identity**: FxHash-based label hashing and opaque texture handles

pub mod color;
pub mod geometry;
pub mod id;

pub use color::Color;
pub use geometry::{Mat4, Rect, Vec2, Vec3};
pub use id::{hash_bytes, hash_str, hash_u32, TextureId};
