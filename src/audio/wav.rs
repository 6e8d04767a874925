//! WAV reading, validation, writing and peak normalization.
//!
//! The enhancement models only accept mono 16 kHz/16-bit PCM; anything else
//! is rejected up front so no chunk processing is attempted on it.

use crate::defaults::{BIT_DEPTH, NUM_CHANNELS, SAMPLE_RATE};
use crate::error::{ClearwavError, Result};
use std::path::Path;

/// Check the preconditions for one input file: existence, WAV parseability,
/// sample rate, channel count and bit depth.
pub fn validate_input(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ClearwavError::InputMissing {
            path: path.to_path_buf(),
        });
    }
    let reader = hound::WavReader::open(path).map_err(|e| ClearwavError::InputNotWav {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let spec = reader.spec();
    if spec.sample_rate != SAMPLE_RATE {
        return Err(ClearwavError::InputSampleRate {
            path: path.to_path_buf(),
            actual: spec.sample_rate,
            expected: SAMPLE_RATE,
        });
    }
    if spec.channels != NUM_CHANNELS {
        return Err(ClearwavError::InputChannels {
            path: path.to_path_buf(),
            actual: spec.channels,
            expected: NUM_CHANNELS,
        });
    }
    if spec.bits_per_sample != BIT_DEPTH || spec.sample_format != hound::SampleFormat::Int {
        return Err(ClearwavError::InputBitDepth {
            path: path.to_path_buf(),
            actual: spec.bits_per_sample,
            expected: BIT_DEPTH,
        });
    }
    Ok(())
}

/// Read all samples from a validated input file.
pub fn read_samples(path: &Path) -> Result<Vec<i16>> {
    let mut reader = hound::WavReader::open(path).map_err(|e| ClearwavError::InputNotWav {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| ClearwavError::InputNotWav {
            path: path.to_path_buf(),
            message: format!("failed to read samples: {}", e),
        })
}

/// Write enhanced samples as mono 16 kHz/16-bit PCM.
pub fn write_samples(path: &Path, samples: &[i16]) -> Result<()> {
    let spec = hound::WavSpec {
        channels: NUM_CHANNELS,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: BIT_DEPTH,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).map_err(|e| {
        ClearwavError::OutputWrite {
            message: format!("{}: {}", path.display(), e),
        }
    })?;
    for &s in samples {
        writer
            .write_sample(s)
            .map_err(|e| ClearwavError::OutputWrite {
                message: e.to_string(),
            })?;
    }
    writer.finalize().map_err(|e| ClearwavError::OutputWrite {
        message: e.to_string(),
    })?;
    Ok(())
}

/// Scale a waveform so its peak magnitude reaches full scale (32767).
///
/// All-zero input is returned unchanged; input already at full scale maps to
/// itself exactly. Output is floating point; the cast back to 16-bit
/// happens once, at assembly.
pub fn peak_normalize(samples: &[i16]) -> Vec<f64> {
    let peak = samples
        .iter()
        .map(|&s| (s as f64).abs())
        .fold(0.0f64, f64::max);
    if peak == 0.0 {
        return samples.iter().map(|&s| s as f64).collect();
    }
    let gain = i16::MAX as f64 / peak;
    samples.iter().map(|&s| s as f64 * gain).collect()
}
