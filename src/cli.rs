//! Command-line interface for clearwav
//!
//! Provides argument parsing using clap derive macros.

use crate::config::ModelVariant;
use crate::defaults::{DEFAULT_STAGE, DEFAULT_TRUNCATE_MINUTES};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Denoise WAV files with a pre-trained speech enhancement model
#[derive(Parser, Debug)]
#[command(name = "clearwav", version, about = "Denoise WAV files")]
#[command(group(
    ArgGroup::new("inputs")
        .args(["wav_dir", "scp"])
        .required(true)
        .multiple(false)
))]
pub struct Cli {
    /// Directory containing WAV files to denoise
    #[arg(long, value_name = "DIR")]
    pub wav_dir: Option<PathBuf>,

    /// Script file of paths to WAV files to denoise, one per line
    #[arg(short = 'S', long = "scp", value_name = "FILE")]
    pub scp: Option<PathBuf>,

    /// Output directory for denoised WAV files (default: --wav-dir)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory holding normalization statistics (global_<variant>_mvn_stats.json)
    #[arg(long, value_name = "DIR", default_value = "model")]
    pub stats_dir: PathBuf,

    /// Path to the external mask-estimation executable
    #[arg(long, value_name = "CMD")]
    pub estimator: PathBuf,

    /// Run the estimator on a GPU
    #[arg(long)]
    pub use_gpu: bool,

    /// Device id of the GPU to use
    #[arg(long, value_name = "INT", default_value_t = 0)]
    pub gpu_id: u32,

    /// Maximum chunk size in minutes
    #[arg(long, value_name = "FLOAT", default_value_t = DEFAULT_TRUNCATE_MINUTES)]
    pub truncate_minutes: f64,

    /// Which output to use: 1=IRM (conservative), 2=LPS (aggressive), 3=blend
    #[arg(long, value_name = "INT", default_value_t = 3)]
    pub mode: u8,

    /// Which pre-trained model to use
    #[arg(long, value_enum, value_name = "VARIANT", default_value = "1000h")]
    pub model_variant: ModelVariant,

    /// Stage (1, 2 or 3) of the progressive-learning model; 1000h variant only
    #[arg(long, value_name = "INT", default_value_t = DEFAULT_STAGE)]
    pub stage: u32,

    /// Skip peak normalization of the input waveform
    #[arg(long)]
    pub no_peak_norm: bool,

    /// Print full diagnostic traces for files with errors
    #[arg(long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn requires_exactly_one_input_source() {
        // Neither
        assert!(Cli::try_parse_from(["clearwav", "--estimator", "est"]).is_err());
        // Both
        assert!(Cli::try_parse_from([
            "clearwav",
            "--wav-dir",
            "in",
            "--scp",
            "files.scp",
            "--estimator",
            "est",
        ])
        .is_err());
        // Exactly one
        assert!(
            Cli::try_parse_from(["clearwav", "--wav-dir", "in", "--estimator", "est"]).is_ok()
        );
        assert!(Cli::try_parse_from(["clearwav", "-S", "files.scp", "--estimator", "est"]).is_ok());
    }

    #[test]
    fn defaults_match_reference_tool() {
        let cli =
            Cli::try_parse_from(["clearwav", "--wav-dir", "in", "--estimator", "est"]).unwrap();
        assert_eq!(cli.mode, 3);
        assert_eq!(cli.model_variant, ModelVariant::Hours1000);
        assert_eq!(cli.stage, 3);
        assert_eq!(cli.gpu_id, 0);
        assert!(!cli.use_gpu);
        assert!((cli.truncate_minutes - 10.0).abs() < f64::EPSILON);
        assert!(!cli.verbose);
        assert!(!cli.no_peak_norm);
    }

    #[test]
    fn model_variant_parses_both_names() {
        let cli = Cli::try_parse_from([
            "clearwav",
            "--wav-dir",
            "in",
            "--estimator",
            "est",
            "--model-variant",
            "400h",
        ])
        .unwrap();
        assert_eq!(cli.model_variant, ModelVariant::Hours400);
    }
}
