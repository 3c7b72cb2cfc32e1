//! services/flashify/src/error.rs
//!
//! Defines the primary error type for the Flashify client application.

use crate::config::ConfigError;
use flashify_core::ports::PortError;

/// The primary error type for the `flashify` application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("{0}")]
    Port(#[from] PortError),

    /// Represents a standard Input/Output error (e.g., reading the terminal).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No usable session is stored, so the command needs a login first.
    #[error("Not signed in, run `flashify login` first")]
    NotSignedIn,

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
