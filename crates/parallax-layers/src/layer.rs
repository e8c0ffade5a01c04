//! Layer ids and layer bit masks.

use serde::{Deserialize, Serialize};

/// Maximum number of distinct layers. Masks are `u32` bit sets.
pub const MAX_LAYERS: usize = 32;

/// Index of a collision/render layer in `0..MAX_LAYERS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(u8);

impl LayerId {
    /// Creates a layer id, returning `None` when `index >= MAX_LAYERS`.
    pub fn new(index: usize) -> Option<Self> {
        (index < MAX_LAYERS).then_some(Self(index as u8))
    }

    /// The raw index of this layer.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The single-bit mask selecting only this layer.
    pub fn mask(self) -> LayerMask {
        LayerMask(1 << self.0)
    }
}

/// A set of layers, one bit per [`LayerId`].
///
/// Used both as a render culling mask and as a physics query filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Selects every layer.
    pub const ALL: Self = Self(u32::MAX);
    /// Selects no layer.
    pub const NONE: Self = Self(0);

    /// Builds a mask from a list of layer ids.
    pub fn from_layers(layers: impl IntoIterator<Item = LayerId>) -> Self {
        layers
            .into_iter()
            .fold(Self::NONE, |mask, layer| mask.with(layer))
    }

    /// Returns true if `layer` is part of this mask.
    pub fn contains(self, layer: LayerId) -> bool {
        self.0 & (1 << layer.0) != 0
    }

    /// Returns a copy of this mask with `layer` added.
    #[must_use]
    pub fn with(self, layer: LayerId) -> Self {
        Self(self.0 | (1 << layer.0))
    }

    /// Returns a copy of this mask with `layer` removed.
    #[must_use]
    pub fn without(self, layer: LayerId) -> Self {
        Self(self.0 & !(1 << layer.0))
    }

    /// Returns true if no layer is selected.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the layers selected by this mask, lowest id first.
    pub fn layers(self) -> impl Iterator<Item = LayerId> {
        (0..MAX_LAYERS as u8)
            .filter(move |&i| self.0 & (1u32 << i) != 0)
            .map(LayerId)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}
