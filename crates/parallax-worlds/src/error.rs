/// Errors raised by the world switcher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldSwitchError {
    /// The controller was built with an empty world list.
    #[error("no worlds configured")]
    NoWorlds,
    /// A world or the player references a layer the registry does not know.
    #[error("unknown layer: {0}")]
    UnknownLayer(String),
    /// `set_world` was asked for an index outside the world list.
    #[error("world index {index} out of range (world count {count})")]
    IndexOutOfRange { index: usize, count: usize },
    /// A manual world change was requested while a transition is running.
    #[error("world change refused while a transition is running")]
    TransitionActive,
}
