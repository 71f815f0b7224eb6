use std::path::PathBuf;

/// Result alias used across the crate.
pub type FrameResult<T> = Result<T, FrameError>;

/// Errors produced while discovering, rendering or writing framed screenshots.
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    /// Invalid input: bad config values, malformed colors, missing directories.
    #[error("validation error: {0}")]
    Validation(String),

    /// No usable font could be resolved or registered.
    #[error("font error: {0}")]
    Font(String),

    /// A screenshot could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Rasterization or PNG encoding failed.
    #[error("render error: {0}")]
    Render(String),

    /// Filesystem access failed for a specific path.
    #[error("io error at '{}': {source}", path.display())]
    Io {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Config (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, typically from a third-party crate.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FrameError {
    /// Build a [`FrameError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FrameError::Font`].
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`FrameError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`FrameError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`FrameError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
