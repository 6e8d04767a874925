//! clearwav - Offline speech enhancement for long-form WAV recordings
//!
//! Splits mono 16 kHz/16-bit recordings into memory-bounded chunks, extracts
//! log-power-spectrum features, runs an external neural mask estimator in an
//! isolated execution context, fuses its IRM/LPS outputs under a selectable
//! policy, and resynthesizes audio with the noisy phase.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod chunk;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod discovery;
pub mod dsp;
pub mod error;
pub mod estimator;
pub mod matrix;
pub mod pipeline;
pub mod report;
pub mod stats;

// Core pipeline
pub use pipeline::{BatchSummary, Orchestrator};

// Estimator seam (implement `MaskEstimator` to plug in a different backend)
pub use estimator::external::ExternalEstimator;
pub use estimator::{EstimateRequest, MaskEstimate, MaskEstimator};

// Configuration
pub use config::{EnhanceConfig, FusionMode, ModelVariant};
pub use stats::GlobalStats;

// Error handling
pub use error::{ClearwavError, Result};
