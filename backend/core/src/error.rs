use thiserror::Error;

/// Top-level error type for the LingoBot runtime.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error("capability error: {0}")]
    Capability(String),

    #[error("delivery error: {0}")]
    Delivery(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors raised while populating the command registry. Fatal at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("command name cannot be empty")]
    EmptyName,

    #[error("command {0} already registered")]
    DuplicateName(String),

    #[error("alias {0} conflicts with an existing command or alias")]
    DuplicateAlias(String),

    #[error("command {0} not found")]
    NotFound(String),
}

/// Errors raised while converting positional tokens into typed parameters.
/// Recovered: reported to the user, the command aborts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterError {
    #[error("missing required parameter: {0}")]
    Missing(String),

    #[error("invalid {name}: {detail}")]
    Invalid { name: String, detail: String },
}
