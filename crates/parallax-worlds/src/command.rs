//! Commands emitted by the world switcher for the host to apply.

use glam::Vec3;
use parallax_layers::{LayerId, LayerMask};

use crate::world::{AnimatorId, CameraPose};

/// A single effect on host state.
///
/// The controller only describes what should change; the host owns the
/// camera, the layer-collision matrix, the global time scale and the
/// animators, and applies these in emission order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WorldCommand {
    /// Move the camera rig.
    SetRigPosition(Vec3),
    /// Place the active camera at a world's pose.
    SetCameraPose(CameraPose),
    /// Restrict rendering to the given layers.
    SetCullingMask(LayerMask),
    /// Set the transition tint overlay's alpha (0 is fully clear).
    SetTintAlpha(f32),
    /// Set the global simulation time scale (1 is real time).
    SetTimeScale(f32),
    /// Enable or disable collision between two layers.
    SetLayerCollision {
        a: LayerId,
        b: LayerId,
        enabled: bool,
    },
    /// Set an obstacle animator's playback speed (0 frozen, 1 animating).
    SetAnimatorSpeed { animator: AnimatorId, speed: f32 },
}

/// Ordered list of commands produced during one call into the controller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandBuffer {
    commands: Vec<WorldCommand>,
}

impl CommandBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command.
    pub fn push(&mut self, command: WorldCommand) {
        self.commands.push(command);
    }

    /// Iterates commands in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &WorldCommand> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The last time scale emitted, if any.
    pub fn last_time_scale(&self) -> Option<f32> {
        self.commands.iter().rev().find_map(|c| match c {
            WorldCommand::SetTimeScale(scale) => Some(*scale),
            _ => None,
        })
    }

    /// The last tint alpha emitted, if any.
    pub fn last_tint_alpha(&self) -> Option<f32> {
        self.commands.iter().rev().find_map(|c| match c {
            WorldCommand::SetTintAlpha(alpha) => Some(*alpha),
            _ => None,
        })
    }
}

impl IntoIterator for CommandBuffer {
    type Item = WorldCommand;
    type IntoIter = std::vec::IntoIter<WorldCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

impl<'a> IntoIterator for &'a CommandBuffer {
    type Item = &'a WorldCommand;
    type IntoIter = std::slice::Iter<'a, WorldCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
