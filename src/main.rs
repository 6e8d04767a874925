use anyhow::{bail, Context, Result};
use clap::Parser;
use clearwav::cli::Cli;
use clearwav::config::{EnhanceConfig, FusionMode};
use clearwav::estimator::external::ExternalEstimator;
use clearwav::stats::GlobalStats;
use clearwav::{discovery, report, Orchestrator};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine files to denoise.
    let wav_files = if let Some(scp) = &cli.scp {
        discovery::load_script_file(scp)
            .with_context(|| format!("failed to read script file {}", scp.display()))?
    } else if let Some(dir) = &cli.wav_dir {
        discovery::list_wav_dir(dir)
            .with_context(|| format!("failed to list WAV directory {}", dir.display()))?
    } else {
        // clap's ArgGroup guarantees one of the two is present
        bail!("exactly one of --wav-dir and --scp must be set");
    };

    // Determine output directory for denoised audio.
    let output_dir = match (cli.output_dir, &cli.wav_dir) {
        (Some(dir), _) => dir,
        (None, Some(wav_dir)) => {
            report::warn(&format!(
                "Output directory not specified. Defaulting to \"{}\"",
                wav_dir.display()
            ));
            wav_dir.clone()
        }
        (None, None) => bail!("--output-dir is required when reading from a script file"),
    };

    let config = EnhanceConfig {
        output_dir,
        stats_dir: cli.stats_dir,
        estimator_cmd: cli.estimator.clone(),
        use_gpu: cli.use_gpu,
        gpu_id: cli.gpu_id,
        truncate_minutes: cli.truncate_minutes,
        mode: FusionMode::from_flag(cli.mode)?,
        variant: cli.model_variant,
        stage: cli.stage,
        peak_normalize: !cli.no_peak_norm,
        verbose: cli.verbose,
    };

    // Load global MVN statistics once for the run.
    let stats = GlobalStats::load(&config.stats_dir, config.variant)
        .context("failed to load normalization statistics")?;

    if wav_files.is_empty() {
        report::warn("No WAV files to process.");
        return Ok(());
    }

    let estimator = Arc::new(ExternalEstimator::new(cli.estimator));
    let orchestrator = Orchestrator::new(config, stats, estimator);
    let summary = orchestrator.run_batch(&wav_files)?;

    report::info(&format!(
        "Done: {} file(s) enhanced, {} skipped.",
        summary.enhanced, summary.skipped
    ));
    Ok(())
}
