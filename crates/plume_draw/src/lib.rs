//! Plume Draw
//!
//! Batched 2D and 3D geometry for immediate-mode rendering.
//!
//! # Features
//!
//! - Draw layers that batch geometry into the fewest draw commands
//! - Thick polylines, rects, rounded rects, circles, beziers, images and text
//! - A clip-rect stack with accumulating intersection
//! - Per-frame merging of submitted layers into one index buffer
//! - A 3D list for debug lines, boxes, frustums and triangles
//! - The [`RenderBackend`] trait GPU backends implement
//!
//! # Example
//!
//! ```ignore
//! use plume_core::{Color, Vec2};
//! use plume_draw::{DrawContext, RenderBackend};
//!
//! let mut ctx = DrawContext::new();
//! let list = ctx.register_drawlist();
//!
//! // each frame
//! ctx.new_frame();
//! let drawlist = ctx.drawlist_mut(list);
//! let layer = drawlist.request_layer("scene");
//! drawlist
//!     .layer(layer)
//!     .add_rect_rounded_filled(Vec2::new(10.0, 10.0), Vec2::new(110.0, 60.0), Color::BLUE, 6.0, 0);
//! drawlist.submit_layer(layer);
//! ctx.submit(&mut backend, list, 800.0, 600.0);
//! ```

pub mod backend;
pub mod context;
pub mod drawlist;
pub mod drawlist_3d;
pub mod layer;
pub mod primitives;
pub mod text;
pub mod vertex;

pub use backend::{Draw3DFlags, RenderBackend, TextureImage};
pub use context::{DrawContext, DrawList3DId, DrawListId};
pub use drawlist::{DrawData, DrawList};
pub use drawlist_3d::DrawList3D;
pub use layer::{AtlasBinding, DrawCommand, DrawLayer, LayerId, LayerWriter};
pub use vertex::{LineVertex3D, Vertex2D, Vertex3D};
