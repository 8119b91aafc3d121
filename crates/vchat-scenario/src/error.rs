use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Unknown scene id: {id:?}")]
    UnknownScene { id: String },

    #[error("Non-looping scene {id:?} has no completion target")]
    MissingCompletionTarget { id: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse scenario file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Scenario failed validation: {0}")]
    Invalid(#[from] ScenarioError),
}
