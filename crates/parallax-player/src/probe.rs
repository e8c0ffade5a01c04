use parallax_layers::LayerMask;

/// Probe length as a multiple of the body height.
pub const PROBE_LENGTH_FACTOR: f32 = 1.1;

/// A downward sphere sweep from the body's origin, used to let a jump fire
/// just before the body touches ground.
///
/// Only colliders on layers in `mask` count as hits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundProbe {
    /// Sphere radius.
    pub radius: f32,
    /// Sweep length below the origin.
    pub max_distance: f32,
    /// Layers the probe may hit.
    pub mask: LayerMask,
}

impl GroundProbe {
    pub fn new(radius: f32, body_height: f32, mask: LayerMask) -> Self {
        Self {
            radius,
            max_distance: body_height * PROBE_LENGTH_FACTOR,
            mask,
        }
    }
}
