//! Error types for the eye/focus monitor library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Landmark recording or sink record could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The user or the host refused access to the camera
    #[error("Camera permission denied: {0}")]
    CameraPermission(String),

    /// Camera stream could not be opened or read
    #[error("Camera error: {0}")]
    Camera(String),

    /// Landmark model failed to produce a prediction for a frame
    #[error("Landmark source error: {0}")]
    LandmarkSource(String),

    /// A detection is missing the eyelid points the evaluator needs
    #[error("Invalid detection: {0}")]
    InvalidDetection(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic I/O error with description
    #[error("I/O error: {0}")]
    IoError(String),

    /// Command sent to a monitor whose loop has already exited
    #[error("Monitor stopped: {0}")]
    MonitorStopped(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the render loop may log this error and carry on with the next frame
    #[must_use]
    pub fn is_frame_recoverable(&self) -> bool {
        matches!(
            self,
            Self::LandmarkSource(_) | Self::InvalidDetection(_) | Self::Camera(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_recoverable_classification() {
        assert!(Error::LandmarkSource("decode".into()).is_frame_recoverable());
        assert!(Error::InvalidDetection("short contour".into()).is_frame_recoverable());
        assert!(!Error::CameraPermission("denied".into()).is_frame_recoverable());
        assert!(!Error::ConfigError("bad".into()).is_frame_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = Error::CameraPermission("NotAllowedError".into());
        assert_eq!(err.to_string(), "Camera permission denied: NotAllowedError");
    }
}
