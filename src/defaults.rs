//! Shared constants for clearwav.
//!
//! These mirror the fixed parameters of the pre-trained enhancement models:
//! the analysis geometry (window, hop, bin count) is baked into the model and
//! must not be changed independently of it.

/// Expected sample rate (Hz) of input WAV files.
pub const SAMPLE_RATE: u32 = 16000;

/// Expected channel count of input WAV files.
pub const NUM_CHANNELS: u16 = 1;

/// Expected bit depth of input WAV files.
pub const BIT_DEPTH: u16 = 16;

/// Analysis window length in samples for feature extraction.
pub const WL: usize = 512;

/// Analysis hop (half the window length, 50% overlap).
pub const WL2: usize = WL / 2;

/// Number of non-negative frequency bins per analysis frame (`WL/2 + 1`).
pub const NFREQS: usize = WL / 2 + 1;

/// Floor added to power spectra before taking the natural log.
///
/// Keeps silent bins finite; well below any audible energy so it does not
/// perturb the features of real speech.
pub const LOG_FLOOR: f64 = 1e-12;

/// Default maximum chunk size in minutes.
///
/// 10 minutes of 16 kHz audio keeps the estimator's working set under the
/// memory ceiling the pre-trained models were tuned for.
pub const DEFAULT_TRUNCATE_MINUTES: f64 = 10.0;

/// Default stage of the progressive-learning model (1000h variant only).
pub const DEFAULT_STAGE: u32 = 3;

/// File name of the persisted normalization statistics for a model variant.
pub fn stats_file_name(variant: &str) -> String {
    format!("global_{}_mvn_stats.json", variant)
}
