use thiserror::Error;

/// Errors raised while validating a password request.
///
/// Both variants are detected before the first random draw, so a failed call
/// never consumes randomness from the source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("invalid password length: {length} (must not be negative)")]
    InvalidLength { length: i64 },
    #[error(
        "requirements need {required} characters but the length is {length} ({excess} too many)"
    )]
    Overconstrained { required: u64, length: u64, excess: u64 },
}

/// Errors raised while loading defaults or parsing command-line requirements.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid requirement `{0}`: expected true, false or a count")]
    InvalidRequirement(String),
}
