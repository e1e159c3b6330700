use std::path::PathBuf;

use thiserror::Error;

/// All errors returned by `lovely-core`.
#[derive(Debug, Error)]
pub enum LovelyError {
    /// The array's shape cannot be rendered by the requested view.
    #[error("invalid shape {shape:?}: {reason}")]
    InvalidShape {
        shape: Vec<usize>,
        reason: &'static str,
    },

    /// An option or configuration value is out of range.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The view needs at least one finite value and found none.
    #[error("no finite values to plot in array of shape {shape:?}")]
    NoFiniteValues { shape: Vec<usize> },

    /// Reading a config file or writing an output failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config document could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    /// An environment variable holds a value that cannot be used.
    #[error("environment variable {var}={value:?}: {reason}")]
    Env {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl LovelyError {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout `lovely-core`.
pub type Result<T> = std::result::Result<T, LovelyError>;
