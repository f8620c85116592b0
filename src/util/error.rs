// DevPanel - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every error preserves the causal
// chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all DevPanel operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum DevPanelError {
    /// Rejected locally before any remote call was issued.
    Validation { message: String },

    /// A remote call failed (transport, error envelope, or payload shape).
    Rpc(RpcError),

    /// The module registry collaborator failed.
    Registry { message: String },

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for DevPanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { message } => write!(f, "Validation error: {message}"),
            Self::Rpc(e) => write!(f, "RPC error: {e}"),
            Self::Registry { message } => write!(f, "Registry error: {message}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for DevPanelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rpc(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// RPC errors
// ---------------------------------------------------------------------------

/// Errors surfaced by the RPC collaborator or the response envelope.
#[derive(Debug)]
pub enum RpcError {
    /// The backend reported a failure through the envelope's error channel.
    /// `data` must not be trusted when this is returned.
    Command { command: String, message: String },

    /// The transport failed before a response envelope was produced.
    Transport { command: String, message: String },

    /// The response `data` did not match the expected payload shape.
    Payload {
        command: String,
        source: serde_json::Error,
    },
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command { command, message } => {
                write!(f, "Command '{command}' failed: {message}")
            }
            Self::Transport { command, message } => {
                write!(f, "Transport failure during '{command}': {message}")
            }
            Self::Payload { command, source } => {
                write!(f, "Malformed '{command}' response payload: {source}")
            }
        }
    }
}

impl std::error::Error for RpcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Payload { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<RpcError> for DevPanelError {
    fn from(e: RpcError) -> Self {
        Self::Rpc(e)
    }
}

// ---------------------------------------------------------------------------
// Build chain errors
// ---------------------------------------------------------------------------

/// Outcome taxonomy for the two-step build → download chain.
///
/// Replaces a string "stop-chain" sentinel with a tagged type: a download
/// handler receiving `Upstream` knows the failure was already reported by
/// the build step and must not notify the user a second time.
#[derive(Debug)]
pub enum BuildError {
    /// Rejected locally (no prior successful check, or another operation in
    /// flight). Nothing was sent to the backend and nothing was reported.
    Validation { message: String },

    /// The build step failed. Reported once by the build step itself; the
    /// chain stops before the download step is invoked.
    Upstream,

    /// The build step succeeded but the package download failed.
    Download { cause: RpcError },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { message } => write!(f, "Build rejected: {message}"),
            Self::Upstream => write!(f, "Build step failed (already reported)"),
            Self::Download { cause } => write!(f, "Package download failed: {cause}"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Download { cause } => Some(cause),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for DevPanelError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for DevPanel results.
pub type Result<T> = std::result::Result<T, DevPanelError>;
