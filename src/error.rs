//! Boundary error types.
//!
//! The simulation itself never fails: crashing into a candle is a normal
//! terminal state, not an error. Errors only arise at the edges of the crate
//! (decoding messages, talking to the leaderboard, loading tuning files) and
//! callers are expected to degrade to safe defaults rather than abort.

use std::fmt;

/// Top-level error enum for Flappy Rockets.
#[derive(Debug)]
pub enum Error {
    /// A message or tuning document could not be (de)serialized.
    Json(serde_json::Error),

    /// A tuning file could not be read.
    Io(std::io::Error),

    /// The message channel to the hosting post is not available.
    TransportUnavailable {
        /// Human-readable description of what was missing.
        context: &'static str,
    },

    /// The leaderboard collaborator failed to answer a request.
    Leaderboard {
        /// Which request failed.
        request: &'static str,
        /// Collaborator-provided reason.
        reason: String,
    },

    /// A tuning value is outside its safe operating range.
    InvalidTuning {
        /// Name of the field (for logging).
        field: &'static str,
        /// Human-readable description of the constraint.
        constraint: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Json(err) => write!(f, "json error: {}", err),
            Error::Io(err) => write!(f, "io error: {}", err),
            Error::TransportUnavailable { context } => {
                write!(f, "message transport unavailable: {}", context)
            }
            Error::Leaderboard { request, reason } => {
                write!(f, "leaderboard request '{}' failed: {}", request, reason)
            }
            Error::InvalidTuning { field, constraint } => {
                write!(f, "invalid tuning value '{}': {}", field, constraint)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(err) => Some(err),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

/// Convenience alias used by every fallible boundary function.
pub type Result<T> = std::result::Result<T, Error>;
