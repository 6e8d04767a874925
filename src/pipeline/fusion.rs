//! Fusion of estimator outputs into a recovered log-power spectrum.
//!
//! The estimator returns two views of the clean speech: a multiplicative
//! ideal ratio mask (applied additively in the log domain) and a direct LPS
//! estimate in normalized space. The fusion mode picks one or averages both.

use crate::config::FusionMode;
use crate::error::Result;
use crate::estimator::MaskEstimate;
use crate::matrix::Matrix;
use crate::stats::GlobalStats;

/// Compute the recovered LPS for one chunk.
///
/// `noisy_lps` is the chunk's *unnormalized* feature matrix. The estimator's
/// LPS output is always de-normalized with the global statistics, regardless
/// of whether the transmitted features were normalized.
pub fn recover_lps(
    mode: FusionMode,
    noisy_lps: &Matrix,
    estimate: &MaskEstimate,
    stats: &GlobalStats,
) -> Result<Matrix> {
    estimate.check_shape(noisy_lps)?;
    match mode {
        FusionMode::IrmOnly => masked(noisy_lps, estimate),
        FusionMode::LpsOnly => stats.denormalize(&estimate.lps),
        FusionMode::Blend => {
            let irm_branch = masked(noisy_lps, estimate)?;
            let lps_branch = stats.denormalize(&estimate.lps)?;
            irm_branch.zip_with(&lps_branch, |a, b| 0.5 * a + 0.5 * b)
        }
    }
}

/// `noisy_lps + ln(IRM)` elementwise.
fn masked(noisy_lps: &Matrix, estimate: &MaskEstimate) -> Result<Matrix> {
    noisy_lps.zip_with(&estimate.irm, |lps, irm| lps + irm.ln())
}
