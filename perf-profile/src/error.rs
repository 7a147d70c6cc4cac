//! Profile error types
//!
//! Structured errors for the profile pipeline. Missing data is not an error:
//! it degrades to NaN metrics or to an absent profile (`Ok(None)`).

use thiserror::Error;

/// Result type alias for profile operations
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Role a configured column plays in a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Part of the key identifying a problem instance
    Instance,
    /// Part of the key identifying a solver configuration
    Combo,
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instance => write!(f, "instance"),
            Self::Combo => write!(f, "combo"),
        }
    }
}

/// Errors that can occur while configuring or building profiles
#[derive(Error, Debug)]
pub enum ProfileError {
    /// A configured key column is absent from the run table
    #[error("Missing {role} key column '{column}' in run table")]
    Schema { column: String, role: ColumnRole },

    /// Registry lookup of an unregistered profile name
    #[error("Profile '{name}' not found (known profiles: {})", .known.join(", "))]
    NotFound { name: String, known: Vec<String> },

    /// Invalid profile settings
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ProfileError {
    /// Create a schema error for a missing key column
    pub fn schema(column: impl Into<String>, role: ColumnRole) -> Self {
        Self::Schema {
            column: column.into(),
            role,
        }
    }

    /// Create a not-found error listing the known names
    pub fn not_found(name: impl Into<String>, known: Vec<String>) -> Self {
        Self::NotFound {
            name: name.into(),
            known,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
