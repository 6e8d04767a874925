//! Global mean/variance statistics for CMVN-style feature normalization.
//!
//! One `{mean, variance}` pair is persisted per model variant and loaded once
//! at run start; it is read-only for the lifetime of the run and shared by
//! all files and chunks. Whether features are normalized *before*
//! transmission depends on the model variant (the 1000h model normalizes
//! internally), but the estimator's returned LPS estimate is always in
//! normalized space and must be de-normalized here.

use crate::config::ModelVariant;
use crate::defaults::{stats_file_name, NFREQS};
use crate::error::{ClearwavError, Result};
use crate::matrix::Matrix;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct GlobalStats {
    mean: Vec<f64>,
    variance: Vec<f64>,
}

impl GlobalStats {
    /// Load the statistics for `variant` from `stats_dir`.
    pub fn load(stats_dir: &Path, variant: ModelVariant) -> Result<Self> {
        let path = stats_dir.join(stats_file_name(variant.name()));
        if !path.exists() {
            return Err(ClearwavError::StatsNotFound { path });
        }
        let contents = std::fs::read_to_string(&path)?;
        let stats: GlobalStats =
            serde_json::from_str(&contents).map_err(|e| ClearwavError::StatsParse {
                message: format!("{}: {}", path.display(), e),
            })?;
        stats.validate()?;
        Ok(stats)
    }

    /// Construct directly; used by tests and embedded defaults.
    pub fn from_vectors(mean: Vec<f64>, variance: Vec<f64>) -> Result<Self> {
        let stats = GlobalStats { mean, variance };
        stats.validate()?;
        Ok(stats)
    }

    fn validate(&self) -> Result<()> {
        if self.mean.len() != NFREQS || self.variance.len() != NFREQS {
            return Err(ClearwavError::StatsInvalid {
                message: format!(
                    "expected {} mean and variance entries, got {} and {}",
                    NFREQS,
                    self.mean.len(),
                    self.variance.len()
                ),
            });
        }
        if self.variance.iter().any(|&v| v == 0.0 || !v.is_finite()) {
            return Err(ClearwavError::StatsInvalid {
                message: "variance entries must be finite and nonzero".to_string(),
            });
        }
        if self.mean.iter().any(|v| !v.is_finite()) {
            return Err(ClearwavError::StatsInvalid {
                message: "mean entries must be finite".to_string(),
            });
        }
        Ok(())
    }

    /// Normalize features for transmission: `(x - mean) / variance`
    /// per frequency bin.
    pub fn normalize(&self, features: &Matrix) -> Result<Matrix> {
        self.per_bin(features, |x, mean, var| (x - mean) / var)
    }

    /// Undo normalization on an estimator output: `x * variance + mean`
    /// per frequency bin.
    pub fn denormalize(&self, features: &Matrix) -> Result<Matrix> {
        self.per_bin(features, |x, mean, var| x * var + mean)
    }

    fn per_bin(
        &self,
        features: &Matrix,
        f: impl Fn(f64, f64, f64) -> f64,
    ) -> Result<Matrix> {
        if features.cols() != NFREQS {
            return Err(ClearwavError::FeatureExtraction {
                message: format!(
                    "feature matrix has {} bins, statistics cover {}",
                    features.cols(),
                    NFREQS
                ),
            });
        }
        let mut out = Matrix::zeros(features.rows(), features.cols());
        for row in 0..features.rows() {
            for col in 0..features.cols() {
                out.set(
                    row,
                    col,
                    f(features.get(row, col), self.mean[col], self.variance[col]),
                );
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn simple_stats() -> GlobalStats {
        GlobalStats::from_vectors(vec![2.0; NFREQS], vec![4.0; NFREQS]).unwrap()
    }

    #[test]
    fn normalize_then_denormalize_is_identity() {
        let stats = simple_stats();
        let features = Matrix::from_vec(2, NFREQS, (0..2 * NFREQS).map(|i| i as f64).collect())
            .unwrap();
        let normed = stats.normalize(&features).unwrap();
        let restored = stats.denormalize(&normed).unwrap();
        for (&a, &b) in features.as_slice().iter().zip(restored.as_slice()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn normalize_applies_per_bin_formula() {
        let stats = simple_stats();
        let features = Matrix::from_vec(1, NFREQS, vec![10.0; NFREQS]).unwrap();
        let normed = stats.normalize(&features).unwrap();
        // (10 - 2) / 4 = 2
        assert!(normed.as_slice().iter().all(|&v| (v - 2.0).abs() < 1e-12));
    }

    #[test]
    fn rejects_wrong_length_vectors() {
        assert!(GlobalStats::from_vectors(vec![0.0; 10], vec![1.0; 10]).is_err());
        assert!(GlobalStats::from_vectors(vec![0.0; NFREQS], vec![1.0; 10]).is_err());
    }

    #[test]
    fn rejects_zero_variance() {
        let mut variance = vec![1.0; NFREQS];
        variance[7] = 0.0;
        assert!(GlobalStats::from_vectors(vec![0.0; NFREQS], variance).is_err());
    }

    #[test]
    fn rejects_wrong_bin_count_features() {
        let stats = simple_stats();
        let bad = Matrix::zeros(3, NFREQS - 1);
        assert!(stats.normalize(&bad).is_err());
    }

    #[test]
    fn load_reads_variant_specific_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(stats_file_name("400h"));
        let json = serde_json::json!({
            "mean": vec![1.0; NFREQS],
            "variance": vec![2.0; NFREQS],
        });
        std::fs::write(&path, serde_json::to_string(&json).unwrap()).unwrap();

        let stats = GlobalStats::load(dir.path(), ModelVariant::Hours400).unwrap();
        let features = Matrix::from_vec(1, NFREQS, vec![5.0; NFREQS]).unwrap();
        let normed = stats.normalize(&features).unwrap();
        assert!(normed.as_slice().iter().all(|&v| (v - 2.0).abs() < 1e-12));
    }

    #[test]
    fn load_missing_file_reports_path() {
        let dir = tempdir().unwrap();
        match GlobalStats::load(dir.path(), ModelVariant::Hours1000) {
            Err(ClearwavError::StatsNotFound { path }) => {
                assert!(path.to_string_lossy().contains("global_1000h_mvn_stats"));
            }
            other => panic!("expected StatsNotFound, got {:?}", other),
        }
    }

    #[test]
    fn load_rejects_malformed_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(stats_file_name("1000h"));
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            GlobalStats::load(dir.path(), ModelVariant::Hours1000),
            Err(ClearwavError::StatsParse { .. })
        ));
    }
}
