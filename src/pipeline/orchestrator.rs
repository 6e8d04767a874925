//! Per-file orchestration of the enhancement pipeline.
//!
//! Files are processed strictly one at a time, chunks strictly in order; the
//! only isolated unit is the per-chunk gateway call. Any error inside one
//! file's pipeline is caught at file granularity: the file is skipped with a
//! diagnostic and the batch moves on. No output is written for a failed
//! file.

use crate::audio::wav;
use crate::chunk::plan_chunks;
use crate::config::{EnhanceConfig, FusionMode};
use crate::defaults::SAMPLE_RATE;
use crate::dsp::Stft;
use crate::error::Result;
use crate::estimator::{gateway, EstimateRequest, MaskEstimator};
use crate::pipeline::{assembler, fusion};
use crate::report;
use crate::stats::GlobalStats;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Counts of batch outcomes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub enhanced: usize,
    pub skipped: usize,
}

/// Drives the Chunk→Feature→Normalize→Estimate→Fuse→Reconstruct→Assemble
/// pipeline over a batch of files.
pub struct Orchestrator {
    config: EnhanceConfig,
    stats: GlobalStats,
    estimator: Arc<dyn MaskEstimator>,
    stft: Stft,
}

impl Orchestrator {
    pub fn new(
        config: EnhanceConfig,
        stats: GlobalStats,
        estimator: Arc<dyn MaskEstimator>,
    ) -> Self {
        Self {
            config,
            stats,
            estimator,
            stft: Stft::new(),
        }
    }

    /// Enhance every file in the batch, skipping failures.
    pub fn run_batch(&self, files: &[PathBuf]) -> Result<BatchSummary> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let mut summary = BatchSummary::default();
        for src in files {
            if let Err(e) = wav::validate_input(src) {
                report::warn(&format!("{}. Skipping.", e));
                summary.skipped += 1;
                continue;
            }

            let file_name = match src.file_name() {
                Some(name) => name,
                None => {
                    report::warn(&format!(
                        "Path \"{}\" has no file name. Skipping.",
                        src.display()
                    ));
                    summary.skipped += 1;
                    continue;
                }
            };
            let dest = self.config.output_dir.join(file_name);

            match self.enhance_file(src, &dest) {
                Ok(()) => {
                    report::info(&format!("Finished processing file \"{}\".", src.display()));
                    summary.enhanced += 1;
                }
                Err(e) => {
                    let mut msg = format!(
                        "Problem encountered while processing file \"{}\". Skipping.",
                        src.display()
                    );
                    if self.config.verbose {
                        msg = format!("{} Full error output:\n{}", msg, e.diagnostic());
                    }
                    report::error(&msg);
                    summary.skipped += 1;
                }
            }
        }
        Ok(summary)
    }

    /// Enhance one validated file, writing the result to `dest`.
    pub fn enhance_file(&self, src: &Path, dest: &Path) -> Result<()> {
        self.print_mode_banner();

        let raw = wav::read_samples(src)?;
        let samples: Vec<f64> = if self.config.peak_normalize {
            wav::peak_normalize(&raw)
        } else {
            raw.iter().map(|&s| s as f64).collect()
        };

        let chunk_length = self.config.chunk_length(SAMPLE_RATE)?;
        let chunks = plan_chunks(samples.len(), chunk_length);
        let total_chunks = chunks.len();

        let mut segments: Vec<Vec<f64>> = Vec::with_capacity(total_chunks);
        for (i, range) in chunks.iter().enumerate() {
            report::info(&format!(
                "Processing file: {}, segment: {}/{}.",
                src.display(),
                i + 1,
                total_chunks
            ));
            let chunk = &samples[range.clone()];
            segments.push(self.enhance_chunk(chunk)?);
        }

        debug_assert!(assembler::matches_plan(&segments, &chunks));
        let data = assembler::assemble(&segments);
        wav::write_samples(dest, &data)?;
        Ok(())
    }

    /// Enhance one chunk, or pass it through when it is too short to frame.
    fn enhance_chunk(&self, chunk: &[f64]) -> Result<Vec<f64>> {
        if Stft::num_frames(chunk.len()) == 0 {
            return Ok(chunk.to_vec());
        }

        // Scoped working area for transmission artifacts; released on every
        // exit path, including gateway failure.
        let work_dir = tempfile::tempdir()?;

        let spectra = self.stft.analyze(chunk)?;
        let noisy_lps = Stft::log_power(&spectra);

        let transmitted = if self.config.variant.normalizes_input() {
            self.stats.normalize(&noisy_lps)?
        } else {
            noisy_lps.clone()
        };

        let request = EstimateRequest::new(
            transmitted,
            &self.config,
            work_dir.path().to_path_buf(),
        );
        let estimate = gateway::estimate_isolated(Arc::clone(&self.estimator), request)?;

        let recovered = fusion::recover_lps(self.config.mode, &noisy_lps, &estimate, &self.stats)?;
        self.stft.synthesize(&recovered, &spectra, chunk.len())
    }

    fn print_mode_banner(&self) {
        match self.config.mode {
            FusionMode::IrmOnly => report::info(
                "### Selecting the estimated ideal-ratio-masks in mode 1 (more conservative). ###",
            ),
            FusionMode::LpsOnly => report::info(
                "### Selecting the estimated log-power-spec features in mode 2 (more aggressive). ###",
            ),
            FusionMode::Blend => report::info(
                "### Selecting both estimated IRM and LPS outputs with equal weights in mode 3 (trade-off). ###",
            ),
        }
        report::info(&format!(
            "Using the pre-trained {} speech enhancement model.",
            self.config.variant.name()
        ));
    }
}
