//! Named collision layers, layer bit masks, and the pairwise layer-collision matrix.
//!
//! Layers are small integer ids (`0..32`) looked up by name through a
//! [`LayerRegistry`]. A [`LayerMask`] is a bit set over those ids, and the
//! [`LayerCollisionMatrix`] records which pairs of layers may interact.

mod layer;
mod matrix;
mod registry;

pub use layer::{LayerId, LayerMask, MAX_LAYERS};
pub use matrix::LayerCollisionMatrix;
pub use registry::{LayerError, LayerRegistry};
