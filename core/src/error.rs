//! Error types for the Imaginary URL builder.
//!
//! # Design
//! Configuration problems are reported lazily, when a URL is actually
//! rendered, so a `Client` can be constructed from partial configuration.
//! `MissingConfiguration` names the absent key; `url` is always checked
//! before `client`. The HTTP variants only come out of `Client::parse_image`.

use std::fmt;

/// Result alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, ImaginaryError>;

/// Required configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Url,
    Client,
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigKey::Url => write!(f, "url"),
            ConfigKey::Client => write!(f, "client"),
        }
    }
}

/// Errors returned by `Client` and its helpers.
#[derive(Debug, thiserror::Error)]
pub enum ImaginaryError {
    /// A required configuration key is absent or null.
    #[error("{0} is not defined in the config")]
    MissingConfiguration(ConfigKey),

    /// A named call matched neither a built-in operation nor a macro.
    #[error("definition \"{0}\" not defined")]
    DefinitionNotFound(String),

    /// A manipulation or render was requested before any `fetch`.
    #[error("no image fetched; call fetch before building a url")]
    NoActiveRequest,

    /// A built-in operation was invoked without a required argument.
    #[error("operation \"{operation}\" requires argument {position}")]
    MissingArgument { operation: String, position: usize },

    /// The image service returned 404 for the requested source.
    #[error("image not found")]
    NotFound,

    /// The image service returned a non-200 status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Configuration input could not be deserialized.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}
