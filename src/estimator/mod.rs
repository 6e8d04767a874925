//! The mask-estimation seam.
//!
//! The neural estimator is opaque to this crate: it consumes a feature
//! matrix and returns an ideal-ratio-mask matrix and a direct LPS estimate of
//! the same shape. [`MaskEstimator`] is the contract; [`gateway`] runs any
//! implementation inside an isolated execution context with failure
//! marshalling; [`external`] is the production implementation that shells out
//! to the estimator executable.

pub mod external;
pub mod gateway;

use crate::config::{EnhanceConfig, FusionMode, ModelVariant};
use crate::defaults::NFREQS;
use crate::error::{ClearwavError, Result};
use crate::matrix::Matrix;
use std::path::PathBuf;

/// Result of one estimator invocation for one chunk.
///
/// `irm` values lie in `(0, 1]`; `lps` is the estimator's direct spectral
/// estimate in normalized space. Both are `frames × NFREQS`.
#[derive(Debug, Clone)]
pub struct MaskEstimate {
    pub irm: Matrix,
    pub lps: Matrix,
}

impl MaskEstimate {
    /// Check both matrices against the shape of the transmitted features.
    pub fn check_shape(&self, features: &Matrix) -> Result<()> {
        if !self.irm.same_shape(features) || !self.lps.same_shape(features) {
            return Err(ClearwavError::Estimator {
                message: format!(
                    "estimate shape mismatch: features {}x{}, IRM {}x{}, LPS {}x{}",
                    features.rows(),
                    features.cols(),
                    self.irm.rows(),
                    self.irm.cols(),
                    self.lps.rows(),
                    self.lps.cols()
                ),
                trace: String::new(),
            });
        }
        Ok(())
    }
}

/// Everything an estimator needs for one chunk.
#[derive(Debug, Clone)]
pub struct EstimateRequest {
    /// Features as transmitted (normalized for the 400h variant, raw for
    /// the 1000h variant).
    pub features: Matrix,
    /// Number of frequency bins (always `NFREQS`).
    pub feature_dim: usize,
    /// Upper bound of the declared valid frame range, `frames - 1`.
    /// Carried over verbatim from the reference tool.
    pub declared_frame_end: usize,
    pub use_gpu: bool,
    pub gpu_id: u32,
    pub mode: FusionMode,
    pub variant: ModelVariant,
    pub stage: u32,
    /// Scoped working directory owned by this chunk, released by the caller
    /// on every exit path.
    pub work_dir: PathBuf,
}

impl EstimateRequest {
    /// Build a request for one chunk's transmitted features.
    pub fn new(features: Matrix, config: &EnhanceConfig, work_dir: PathBuf) -> Self {
        let declared_frame_end = features.rows().saturating_sub(1);
        Self {
            features,
            feature_dim: NFREQS,
            declared_frame_end,
            use_gpu: config.use_gpu,
            gpu_id: config.gpu_id,
            mode: config.mode,
            variant: config.variant,
            stage: config.stage,
            work_dir,
        }
    }
}

/// Contract of the opaque mask estimator.
///
/// Implementations must be callable from a separate thread; the gateway
/// never invokes them on the orchestrator's thread.
pub trait MaskEstimator: Send + Sync {
    fn estimate(&self, request: &EstimateRequest) -> Result<MaskEstimate>;
}
