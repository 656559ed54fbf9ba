use thiserror::Error;

use super::AFH_MIN_CHANNELS;

/// Custom error types for the baseband components
#[derive(Error, Debug)]
pub enum Error {
    #[error("insufficient AFH channels: {available} usable, {required} required")]
    InsufficientAfhChannels { available: usize, required: usize },

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates an AFH rejection error for a map with too few usable channels
    pub fn insufficient_afh_channels(available: usize) -> Self {
        Error::InsufficientAfhChannels {
            available,
            required: AFH_MIN_CHANNELS,
        }
    }

    /// Creates a new invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Error::InvalidState(msg.into())
    }

    /// Creates a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::invalid_state("test error");
        assert!(matches!(err, Error::InvalidState(_)));
        assert_eq!(err.to_string(), "invalid state: test error");
    }

    #[test]
    fn test_afh_error_message() {
        let err = Error::insufficient_afh_channels(7);
        assert_eq!(
            err.to_string(),
            "insufficient AFH channels: 7 usable, 20 required"
        );
    }
}
