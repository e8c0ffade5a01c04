use parallax_config::ConfigError;
use parallax_input::InputError;
use parallax_layers::LayerError;
use parallax_worlds::WorldSwitchError;

/// Errors raised while building the host.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Layer(#[from] LayerError),

    #[error(transparent)]
    World(#[from] WorldSwitchError),

    #[error(transparent)]
    Input(#[from] InputError),
}
