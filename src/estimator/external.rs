//! Subprocess-backed mask estimator.
//!
//! The estimator executable is handed a feature-table artifact plus a
//! companion descriptor declaring the usable frame range, and leaves a result
//! artifact with the named `IRM` and `LPS` matrices in the same working
//! directory. All artifacts live in the chunk's scoped work dir and vanish
//! with it.
//!
//! Artifact container: magic tag, `u32` row/column counts, `f32`
//! little-endian row-major data; the result file holds a count byte followed
//! by length-prefixed named matrices.

use crate::error::{ClearwavError, Result};
use crate::estimator::{EstimateRequest, MaskEstimate, MaskEstimator};
use crate::matrix::Matrix;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

const FEATURE_MAGIC: &[u8; 4] = b"CWFT";
const ESTIMATE_MAGIC: &[u8; 4] = b"CWES";

const FEATURES_FILE: &str = "noisy_feats.bin";
const DESCRIPTOR_FILE: &str = "noisy_feats.scp";
const ESTIMATES_FILE: &str = "estimates.bin";

/// Mask estimator that invokes an external executable.
pub struct ExternalEstimator {
    cmd: PathBuf,
}

impl ExternalEstimator {
    pub fn new(cmd: PathBuf) -> Self {
        Self { cmd }
    }
}

impl MaskEstimator for ExternalEstimator {
    fn estimate(&self, request: &EstimateRequest) -> Result<MaskEstimate> {
        let features_path = request.work_dir.join(FEATURES_FILE);
        let descriptor_path = request.work_dir.join(DESCRIPTOR_FILE);
        let estimates_path = request.work_dir.join(ESTIMATES_FILE);

        write_feature_matrix(&features_path, &request.features)?;
        write_descriptor(&descriptor_path, &features_path, request.declared_frame_end)?;

        let mut command = Command::new(&self.cmd);
        command
            .arg(&descriptor_path)
            .arg(&request.work_dir)
            .arg("--feature-dim")
            .arg(request.feature_dim.to_string())
            .arg("--mode")
            .arg(request.mode.as_flag().to_string())
            .arg("--model-variant")
            .arg(request.variant.name())
            .arg("--stage")
            .arg(request.stage.to_string())
            .arg("--gpu-id")
            .arg(request.gpu_id.to_string());
        if request.use_gpu {
            command.arg("--use-gpu");
        }

        let output = command.output().map_err(|e| ClearwavError::Estimator {
            message: format!("failed to launch estimator {}: {}", self.cmd.display(), e),
            trace: e.to_string(),
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(ClearwavError::Estimator {
                message: format!("estimator exited with {}", output.status),
                trace: stderr,
            });
        }

        let estimate = read_estimates(&estimates_path)?;
        estimate.check_shape(&request.features)?;
        Ok(estimate)
    }
}

/// Write one matrix as a feature-table artifact.
pub fn write_feature_matrix(path: &Path, matrix: &Matrix) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(FEATURE_MAGIC)?;
    writer.write_all(&(matrix.rows() as u32).to_le_bytes())?;
    writer.write_all(&(matrix.cols() as u32).to_le_bytes())?;
    for &v in matrix.as_slice() {
        writer.write_all(&(v as f32).to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the companion descriptor declaring the usable frame range.
///
/// The range upper bound is `frames - 1`, carried over verbatim from the
/// reference tool's script-file convention.
pub fn write_descriptor(path: &Path, features_path: &Path, frame_end: usize) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "irm={}[0,{}]", features_path.display(), frame_end)?;
    writer.flush()?;
    Ok(())
}

/// Read the result artifact and extract the `IRM` and `LPS` matrices.
pub fn read_estimates(path: &Path) -> Result<MaskEstimate> {
    let file = File::open(path).map_err(|e| ClearwavError::Estimator {
        message: format!("estimator produced no result at {}: {}", path.display(), e),
        trace: e.to_string(),
    })?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != ESTIMATE_MAGIC {
        return Err(malformed(path, "bad magic tag"));
    }

    let mut count = [0u8; 1];
    reader.read_exact(&mut count)?;

    let mut matrices: HashMap<String, Matrix> = HashMap::new();
    for _ in 0..count[0] {
        let (name, matrix) = read_named_matrix(&mut reader, path)?;
        matrices.insert(name, matrix);
    }

    let irm = matrices
        .remove("IRM")
        .ok_or_else(|| malformed(path, "missing IRM matrix"))?;
    let lps = matrices
        .remove("LPS")
        .ok_or_else(|| malformed(path, "missing LPS matrix"))?;
    Ok(MaskEstimate { irm, lps })
}

fn read_named_matrix(reader: &mut impl Read, path: &Path) -> Result<(String, Matrix)> {
    let mut name_len = [0u8; 1];
    reader.read_exact(&mut name_len)?;
    let mut name_bytes = vec![0u8; name_len[0] as usize];
    reader.read_exact(&mut name_bytes)?;
    let name = String::from_utf8(name_bytes).map_err(|_| malformed(path, "non-UTF8 name"))?;

    let mut dims = [0u8; 8];
    reader.read_exact(&mut dims)?;
    let rows = u32::from_le_bytes([dims[0], dims[1], dims[2], dims[3]]) as usize;
    let cols = u32::from_le_bytes([dims[4], dims[5], dims[6], dims[7]]) as usize;

    let mut data = Vec::with_capacity(rows * cols);
    let mut value = [0u8; 4];
    for _ in 0..rows * cols {
        reader
            .read_exact(&mut value)
            .map_err(|_| malformed(path, "truncated matrix data"))?;
        data.push(f32::from_le_bytes(value) as f64);
    }
    let matrix = Matrix::from_vec(rows, cols, data)
        .map_err(|e| malformed(path, &e.to_string()))?;
    Ok((name, matrix))
}

fn malformed(path: &Path, reason: &str) -> ClearwavError {
    ClearwavError::Estimator {
        message: format!("malformed estimator result {}: {}", path.display(), reason),
        trace: String::new(),
    }
}

/// Write a result artifact. Production never calls this (the external
/// executable does) but tests and fixture tooling need the exact container.
pub fn write_estimates(path: &Path, estimate: &MaskEstimate) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(ESTIMATE_MAGIC)?;
    writer.write_all(&[2u8])?;
    for (name, matrix) in [("IRM", &estimate.irm), ("LPS", &estimate.lps)] {
        writer.write_all(&[name.len() as u8])?;
        writer.write_all(name.as_bytes())?;
        writer.write_all(&(matrix.rows() as u32).to_le_bytes())?;
        writer.write_all(&(matrix.cols() as u32).to_le_bytes())?;
        for &v in matrix.as_slice() {
            writer.write_all(&(v as f32).to_le_bytes())?;
        }
    }
    writer.flush()?;
    Ok(())
}
