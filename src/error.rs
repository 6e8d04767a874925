//! Error types for clearwav.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClearwavError {
    // Configuration errors
    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Normalization statistics not found at {}", path.display())]
    StatsNotFound { path: PathBuf },

    #[error("Failed to parse normalization statistics: {message}")]
    StatsParse { message: String },

    #[error("Normalization statistics malformed: {message}")]
    StatsInvalid { message: String },

    // Input precondition errors (warn-and-skip at file granularity)
    #[error("File \"{}\" does not exist", path.display())]
    InputMissing { path: PathBuf },

    #[error("File \"{}\" is not a readable WAV file: {message}", path.display())]
    InputNotWav { path: PathBuf, message: String },

    #[error("Sample rate of file \"{}\" is {actual} Hz, expected {expected} Hz", path.display())]
    InputSampleRate {
        path: PathBuf,
        actual: u32,
        expected: u32,
    },

    #[error("File \"{}\" has {actual} channels, expected {expected}", path.display())]
    InputChannels {
        path: PathBuf,
        actual: u16,
        expected: u16,
    },

    #[error("Bit depth of file \"{}\" is {actual}, expected {expected}", path.display())]
    InputBitDepth {
        path: PathBuf,
        actual: u16,
        expected: u16,
    },

    // Feature extraction / reconstruction errors
    #[error("Feature extraction failed: {message}")]
    FeatureExtraction { message: String },

    #[error("Waveform reconstruction failed: {message}")]
    Reconstruction { message: String },

    // Estimator gateway errors
    #[error("Mask estimation failed: {message}")]
    Estimator { message: String, trace: String },

    #[error("Mask estimation context terminated without a result")]
    EstimatorNoResult,

    // Output errors
    #[error("Failed to write output WAV: {message}")]
    OutputWrite { message: String },

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClearwavError {
    /// Full diagnostic text for verbose reporting.
    ///
    /// For gateway failures this includes the trace captured on the far side
    /// of the isolation boundary; for everything else it is the display text.
    pub fn diagnostic(&self) -> String {
        match self {
            ClearwavError::Estimator { message, trace } => {
                format!("{}\n{}", message, trace)
            }
            other => other.to_string(),
        }
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ClearwavError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn input_sample_rate_display() {
        let error = ClearwavError::InputSampleRate {
            path: PathBuf::from("/in/a.wav"),
            actual: 8000,
            expected: 16000,
        };
        assert_eq!(
            error.to_string(),
            "Sample rate of file \"/in/a.wav\" is 8000 Hz, expected 16000 Hz"
        );
    }

    #[test]
    fn input_channels_display() {
        let error = ClearwavError::InputChannels {
            path: PathBuf::from("b.wav"),
            actual: 2,
            expected: 1,
        };
        assert_eq!(error.to_string(), "File \"b.wav\" has 2 channels, expected 1");
    }

    #[test]
    fn estimator_diagnostic_includes_trace() {
        let error = ClearwavError::Estimator {
            message: "inference crashed".to_string(),
            trace: "at frame 12: device lost".to_string(),
        };
        let diag = error.diagnostic();
        assert!(diag.contains("inference crashed"));
        assert!(diag.contains("device lost"));
        // Plain display stays one line
        assert!(!error.to_string().contains("device lost"));
    }

    #[test]
    fn non_estimator_diagnostic_matches_display() {
        let error = ClearwavError::FeatureExtraction {
            message: "empty chunk".to_string(),
        };
        assert_eq!(error.diagnostic(), error.to_string());
    }

    #[test]
    fn from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: ClearwavError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<ClearwavError>();
        assert_sync::<ClearwavError>();
    }
}
