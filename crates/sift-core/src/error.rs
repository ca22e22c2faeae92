//! Error types for sift.
//!
//! One taxonomy is shared by the compiler and both gateways so callers can
//! make a single retry/surface decision regardless of which call failed.

/// Errors that can occur while compiling, searching, or indexing.
///
/// Marked `#[non_exhaustive]` so new failure kinds can be added without
/// breaking downstream matches.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Malformed filter or pagination input. Never retried.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Field that failed validation, if the failure is field-specific
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// A value could not be encoded to or decoded from JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Connectivity or protocol failure talking to the engine.
    #[error("Transport error: {message}")]
    Transport {
        /// Human-readable error message
        message: String,
        /// Underlying error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The engine answered with a non-success status.
    #[error("Engine error ({status}): {message}")]
    Engine {
        /// HTTP-style status code returned by the engine
        status: u16,
        /// Reason reported by the engine
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },
}

/// Convenience `Result` type alias for sift operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether an outer layer may reasonably retry the call.
    ///
    /// Transport failures and 5xx / 429 engine responses are considered
    /// transient. Nothing in this workspace retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport { .. } => true,
            Error::Engine { status, .. } => *status >= 500 || *status == 429,
            Error::InvalidRequest { .. } => false,
            Error::Serialization(_) => false,
            Error::Config { .. } => false,
        }
    }

    /// Returns whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::InvalidRequest { .. } | Error::Serialization(_) => true,
            Error::Engine { status, .. } => (400..500).contains(status) && *status != 429,
            Error::Transport { .. } | Error::Config { .. } => false,
        }
    }

    /// Creates an invalid-request error not tied to a single field.
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Error::InvalidRequest {
            field: None,
            message: message.into(),
        }
    }

    /// Creates an invalid-request error for a named field.
    pub fn invalid_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::InvalidRequest {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a transport error with a message.
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Error::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a transport error with a message and source error.
    pub fn transport_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an engine error from a status code and reason.
    pub fn engine<S: Into<String>>(status: u16, message: S) -> Self {
        Error::Engine {
            status,
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
