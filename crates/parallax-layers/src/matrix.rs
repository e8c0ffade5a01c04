//! Symmetric layer-vs-layer collision table.

use crate::{LayerId, LayerMask, MAX_LAYERS};

/// Which pairs of layers may collide with each other.
///
/// Symmetric: `set(a, b, x)` also sets `(b, a)`. Every pair collides by default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerCollisionMatrix {
    rows: [LayerMask; MAX_LAYERS],
}

impl LayerCollisionMatrix {
    /// A matrix in which every layer collides with every other layer.
    pub fn new() -> Self {
        Self {
            rows: [LayerMask::ALL; MAX_LAYERS],
        }
    }

    /// Enables or disables collision between `a` and `b`.
    pub fn set(&mut self, a: LayerId, b: LayerId, enabled: bool) {
        if enabled {
            self.rows[a.index()] = self.rows[a.index()].with(b);
            self.rows[b.index()] = self.rows[b.index()].with(a);
        } else {
            self.rows[a.index()] = self.rows[a.index()].without(b);
            self.rows[b.index()] = self.rows[b.index()].without(a);
        }
    }

    /// Returns true if `a` and `b` may collide.
    pub fn collides(&self, a: LayerId, b: LayerId) -> bool {
        self.rows[a.index()].contains(b)
    }

    /// All layers that `layer` currently collides with.
    pub fn mask_for(&self, layer: LayerId) -> LayerMask {
        self.rows[layer.index()]
    }
}

impl Default for LayerCollisionMatrix {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(i: usize) -> LayerId {
        LayerId::new(i).unwrap()
    }

    #[test]
    fn test_everything_collides_by_default() {
        let matrix = LayerCollisionMatrix::new();
        assert!(matrix.collides(id(0), id(31)));
        assert!(matrix.collides(id(4), id(4)));
    }

    #[test]
    fn test_set_is_symmetric() {
        let mut matrix = LayerCollisionMatrix::new();
        matrix.set(id(1), id(5), false);
        assert!(!matrix.collides(id(1), id(5)));
        assert!(!matrix.collides(id(5), id(1)));
        assert!(matrix.collides(id(1), id(6)));

        matrix.set(id(5), id(1), true);
        assert!(matrix.collides(id(1), id(5)));
        assert!(matrix.collides(id(5), id(1)));
    }

    #[test]
    fn test_mask_for_reflects_disabled_pairs() {
        let mut matrix = LayerCollisionMatrix::new();
        matrix.set(id(1), id(3), false);
        matrix.set(id(1), id(4), false);
        let mask = matrix.mask_for(id(1));
        assert!(!mask.contains(id(3)));
        assert!(!mask.contains(id(4)));
        assert!(mask.contains(id(2)));
    }
}
