use thiserror::Error;

/// Errors raised when a domain value fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{kind} cannot be empty")]
    EmptyId { kind: &'static str },
    #[error("{kind} cannot contain '#': {value}")]
    ReservedCharacter { kind: &'static str, value: String },
    #[error("{kind} must be between {min} and {max} characters: {value}")]
    InvalidLength {
        kind: &'static str,
        min: usize,
        max: usize,
        value: String,
    },
    #[error("Invalid mail address: {0}")]
    InvalidMailAddress(String),
}
