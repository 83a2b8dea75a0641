//! Error types for the pose to animation library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `OpenCV` operation failed
    #[cfg(feature = "opencv")]
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// A frame file could not be decoded
    #[error("Frame decoding error in {path}: {source}")]
    FrameDecode {
        /// Offending frame file
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file could not be parsed or serialized
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration value out of range or missing
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Bone definition list is malformed
    #[error("Invalid bone definition at position {index}: {reason}")]
    InvalidBone {
        /// Position of the bone in the definition list
        index: usize,
        /// What is wrong with it
        reason: String,
    },

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The external pose detector could not be started
    #[error("Failed to launch pose detector {program}: {source}")]
    DetectorLaunch {
        /// Program that was executed
        program: PathBuf,
        /// Underlying process error
        #[source]
        source: std::io::Error,
    },

    /// The external pose detector ran but reported failure
    #[error("Pose detector exited with {status}")]
    DetectorFailed {
        /// Exit status reported by the process
        status: std::process::ExitStatus,
    },
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
