//! Error types for PCM conversion and source chains.

use thiserror::Error;

/// Result type alias for pcmflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pcmflow operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A sample encoding tag outside the ten supported kinds.
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// Buffer length is not a multiple of the frame size.
    #[error("size mismatch: {len} bytes is not a multiple of frame size {frame_size}")]
    SizeMismatch { len: usize, frame_size: usize },

    /// A buffer's shape disagrees with what its consumer expects.
    #[error("spec mismatch: {field} expected {expected}, got {actual}")]
    SpecMismatch {
        field: &'static str,
        expected: String,
        actual: String,
    },

    /// Storage for a buffer could not be reserved.
    #[error("allocation failure: {0}")]
    AllocationFailure(#[from] std::collections::TryReserveError),

    /// Error from the rate converter.
    #[error("resample error: {0}")]
    Resample(String),

    /// Invalid pipeline configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a spec mismatch error for the named field.
    pub fn spec_mismatch(
        field: &'static str,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Error::SpecMismatch {
            field,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl From<rubato::ResamplerConstructionError> for Error {
    fn from(e: rubato::ResamplerConstructionError) -> Self {
        Error::Resample(e.to_string())
    }
}

impl From<rubato::ResampleError> for Error {
    fn from(e: rubato::ResampleError) -> Self {
        Error::Resample(e.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedEncoding("s12".to_string());
        assert_eq!(format!("{}", err), "unsupported encoding: s12");

        let err = Error::SizeMismatch {
            len: 7,
            frame_size: 4,
        };
        assert!(format!("{}", err).contains("7 bytes"));
        assert!(format!("{}", err).contains("frame size 4"));

        let err = Error::spec_mismatch("rate", 48000, 44100);
        assert_eq!(
            format!("{}", err),
            "spec mismatch: rate expected 48000, got 44100"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_try_reserve() {
        let mut v: Vec<u8> = Vec::new();
        let reserve_err = v.try_reserve_exact(usize::MAX).unwrap_err();
        let err: Error = reserve_err.into();
        assert!(matches!(err, Error::AllocationFailure(_)));
    }
}
