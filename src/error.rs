use thiserror::Error;

/// Input that is rejected before any model is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    #[error("{kind} with an empty id")]
    EmptyId { kind: &'static str },

    #[error("room '{room_id}' must have a capacity of at least 1")]
    InvalidCapacity { room_id: String },

    #[error("class '{class_id}' must require at least one session")]
    InvalidSessionCount { class_id: String },
}

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    #[error("search backend failed: {0}")]
    Backend(String),
}
