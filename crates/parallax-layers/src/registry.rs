//! Name-to-layer lookup.

use std::collections::HashMap;

use crate::{LayerId, LayerMask, MAX_LAYERS};

/// Errors raised while building a [`LayerRegistry`] or resolving names.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayerError {
    /// More layer names were supplied than there are layer bits.
    #[error("too many layers: {count} (max {MAX_LAYERS})")]
    TooMany {
        /// Number of names supplied.
        count: usize,
    },

    /// The same layer name appears twice.
    #[error("duplicate layer name: {0}")]
    Duplicate(String),

    /// A name was looked up that is not registered.
    #[error("unknown layer: {0}")]
    Unknown(String),
}

/// Ordered list of named layers. A layer's id is its position in the list.
#[derive(Clone, Debug, Default)]
pub struct LayerRegistry {
    names: Vec<String>,
    by_name: HashMap<String, LayerId>,
}

impl LayerRegistry {
    /// Builds a registry from layer names, assigning ids in order.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self, LayerError> {
        if names.len() > MAX_LAYERS {
            return Err(LayerError::TooMany { count: names.len() });
        }
        let mut registry = Self::default();
        for (index, name) in names.iter().enumerate() {
            let name = name.as_ref();
            if registry.by_name.contains_key(name) {
                return Err(LayerError::Duplicate(name.to_string()));
            }
            // index < MAX_LAYERS was checked above.
            let Some(id) = LayerId::new(index) else {
                return Err(LayerError::TooMany { count: names.len() });
            };
            registry.names.push(name.to_string());
            registry.by_name.insert(name.to_string(), id);
        }
        Ok(registry)
    }

    /// Returns the id registered for `name`, if any.
    pub fn name_to_layer(&self, name: &str) -> Option<LayerId> {
        self.by_name.get(name).copied()
    }

    /// Like [`name_to_layer`](Self::name_to_layer) but with a typed error.
    pub fn resolve(&self, name: &str) -> Result<LayerId, LayerError> {
        self.name_to_layer(name)
            .ok_or_else(|| LayerError::Unknown(name.to_string()))
    }

    /// Resolves a list of names into a mask. Fails on the first unknown name.
    pub fn mask_of<S: AsRef<str>>(&self, names: &[S]) -> Result<LayerMask, LayerError> {
        names.iter().try_fold(LayerMask::NONE, |mask, name| {
            Ok(mask.with(self.resolve(name.as_ref())?))
        })
    }

    /// Returns the name of a registered layer.
    pub fn layer_to_name(&self, layer: LayerId) -> Option<&str> {
        self.names.get(layer.index()).map(String::as_str)
    }

    /// Number of registered layers.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no layers are registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
