//! Run configuration for clearwav.
//!
//! All knobs are resolved once in `main` into an [`EnhanceConfig`] and passed
//! down the pipeline; nothing below the CLI boundary reads ambient process
//! state. Mode and variant are closed enums, validated here rather than
//! threaded through the pipeline as strings.

use crate::defaults::{DEFAULT_STAGE, DEFAULT_TRUNCATE_MINUTES};
use crate::error::{ClearwavError, Result};
use std::path::PathBuf;

/// Which of the estimator's outputs drives the recovered spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FusionMode {
    /// Apply the estimated ideal ratio mask to the noisy spectrum
    /// (more conservative).
    IrmOnly,
    /// Use the estimator's direct log-power-spectrum estimate
    /// (more aggressive).
    LpsOnly,
    /// Equal-weight blend of the IRM-masked and direct estimates (trade-off).
    Blend,
}

impl FusionMode {
    /// Parse the numeric CLI flag (1=IRM, 2=LPS, 3=blend).
    pub fn from_flag(mode: u8) -> Result<Self> {
        match mode {
            1 => Ok(FusionMode::IrmOnly),
            2 => Ok(FusionMode::LpsOnly),
            3 => Ok(FusionMode::Blend),
            other => Err(ClearwavError::ConfigInvalidValue {
                key: "mode".to_string(),
                message: format!("must be 1, 2 or 3, got {}", other),
            }),
        }
    }

    /// Numeric value handed to the external estimator.
    pub fn as_flag(self) -> u8 {
        match self {
            FusionMode::IrmOnly => 1,
            FusionMode::LpsOnly => 2,
            FusionMode::Blend => 3,
        }
    }
}

/// Named configuration of the external estimator.
///
/// Each variant ships its own normalization statistics and differs in who
/// performs mean/variance normalization: the 400h model expects normalized
/// features on its input, the 1000h model normalizes internally and expects
/// raw features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModelVariant {
    /// Model trained on 400 hours; caller normalizes features.
    #[value(name = "400h")]
    Hours400,
    /// Model trained on 1000 hours; normalizes internally.
    #[value(name = "1000h")]
    Hours1000,
}

impl ModelVariant {
    /// Name used in statistics file names and estimator invocations.
    pub fn name(self) -> &'static str {
        match self {
            ModelVariant::Hours400 => "400h",
            ModelVariant::Hours1000 => "1000h",
        }
    }

    /// Whether features must be normalized before transmission.
    pub fn normalizes_input(self) -> bool {
        matches!(self, ModelVariant::Hours400)
    }
}

/// Resolved run configuration, shared by all files in the batch.
#[derive(Debug, Clone)]
pub struct EnhanceConfig {
    /// Output directory for enhanced WAV files.
    pub output_dir: PathBuf,
    /// Directory holding per-variant normalization statistics.
    pub stats_dir: PathBuf,
    /// Path to the external mask-estimation executable.
    pub estimator_cmd: PathBuf,
    /// Run the estimator on a GPU.
    pub use_gpu: bool,
    /// Device id of the GPU to use.
    pub gpu_id: u32,
    /// Maximum chunk size in minutes.
    pub truncate_minutes: f64,
    /// Fusion policy for the estimator's outputs.
    pub mode: FusionMode,
    /// Pre-trained model variant.
    pub variant: ModelVariant,
    /// Stage of the progressive-learning model (1000h only).
    pub stage: u32,
    /// Scale each input so its peak magnitude reaches full scale.
    pub peak_normalize: bool,
    /// Print full diagnostic traces for failed files.
    pub verbose: bool,
}

impl EnhanceConfig {
    /// Chunk length in samples for a given sample rate.
    ///
    /// Errors when `truncate_minutes` is so small that no full sample fits.
    pub fn chunk_length(&self, sample_rate: u32) -> Result<usize> {
        let samples = (self.truncate_minutes * 60.0 * sample_rate as f64).floor();
        if samples < 1.0 {
            return Err(ClearwavError::ConfigInvalidValue {
                key: "truncate_minutes".to_string(),
                message: format!(
                    "{} minutes yields an empty chunk at {} Hz",
                    self.truncate_minutes, sample_rate
                ),
            });
        }
        Ok(samples as usize)
    }
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::new(),
            stats_dir: PathBuf::from("model"),
            estimator_cmd: PathBuf::new(),
            use_gpu: false,
            gpu_id: 0,
            truncate_minutes: DEFAULT_TRUNCATE_MINUTES,
            mode: FusionMode::Blend,
            variant: ModelVariant::Hours1000,
            stage: DEFAULT_STAGE,
            peak_normalize: true,
            verbose: false,
        }
    }
}
