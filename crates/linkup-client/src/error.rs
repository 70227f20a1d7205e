use thiserror::Error;

use linkup_shared::types::GroupId;
use linkup_store::StoreError;

use crate::navigation::StepKind;

/// Errors returned by the navigation machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    #[error("Event {event} does not apply to step {step}")]
    UnexpectedEvent { step: StepKind, event: &'static str },

    #[error("Cannot enter {step}: {field} has not been collected")]
    MissingData { step: StepKind, field: &'static str },

    #[error("{0} has no previous step")]
    NoPreviousStep(StepKind),
}

/// Errors returned when a wizard form is submitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Message is {len} characters (max {max})")]
    MessageTooLong { len: usize, max: usize },
}

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("File too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },
}

/// Umbrella error for session commands.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Nav(#[from] NavError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Unknown group: {0}")]
    UnknownGroup(GroupId),

    #[error("No store configured for this session")]
    NoStore,

    /// A screen was asked for data the session does not have; the shell
    /// should offer [`Session::restart`](crate::Session::restart).
    #[error("Missing session context: {0}")]
    MissingContext(&'static str),

    #[error("Session lock poisoned")]
    LockPoisoned,
}
