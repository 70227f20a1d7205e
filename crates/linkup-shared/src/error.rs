use thiserror::Error;

/// Failure to parse one of the closed vocabularies used across the app.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown persona: {0}")]
    Persona(String),

    #[error("Unknown action: {0}")]
    Action(String),

    #[error("Unknown scope: {0}")]
    Scope(String),

    #[error("Unknown browse filter: {0}")]
    BrowseFilter(String),
}
