//! Framed short-time Fourier analysis and overlap-add synthesis.
//!
//! Forward analysis turns a waveform chunk into per-frame complex spectra
//! (window `WL`, hop `WL/2`, `NFREQS` non-negative-frequency bins) from which
//! log-power-spectrum features are derived. Synthesis rebuilds a waveform
//! from a recovered LPS matrix, reusing the noisy chunk's phase: magnitude is
//! replaced, phase is retained, as usual for masking-based enhancement.

use crate::defaults::{LOG_FLOOR, NFREQS, WL, WL2};
use crate::dsp::window::hamming;
use crate::error::{ClearwavError, Result};
use crate::matrix::Matrix;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex64;
use std::sync::Arc;

/// Per-frame complex spectra of one analyzed chunk.
#[derive(Debug, Clone)]
pub struct Spectra {
    frames: Vec<Vec<Complex64>>,
}

impl Spectra {
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Complex bins of one frame.
    pub fn frame(&self, index: usize) -> &[Complex64] {
        &self.frames[index]
    }

    /// Unit-magnitude phase of one bin; zero-magnitude bins get phase 1+0i.
    fn unit_phase(&self, frame: usize, bin: usize) -> Complex64 {
        let v = self.frames[frame][bin];
        let norm = v.norm();
        if norm == 0.0 {
            Complex64::new(1.0, 0.0)
        } else {
            v / norm
        }
    }
}

/// Short-time analysis/synthesis engine with fixed geometry (`WL`, `WL/2`).
pub struct Stft {
    forward: Arc<dyn RealToComplex<f64>>,
    inverse: Arc<dyn ComplexToReal<f64>>,
    window: Vec<f64>,
}

impl Stft {
    pub fn new() -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        Self {
            forward: planner.plan_fft_forward(WL),
            inverse: planner.plan_fft_inverse(WL),
            window: hamming(WL),
        }
    }

    /// Number of analysis frames for a chunk of `len` samples.
    ///
    /// Chunks shorter than one hop cannot form a frame and yield zero;
    /// callers pass those through unchanged. The tail is zero-padded into a
    /// final full-length frame.
    pub fn num_frames(len: usize) -> usize {
        if len < WL2 {
            0
        } else if len <= WL {
            1
        } else {
            1 + (len - WL).div_ceil(WL2)
        }
    }

    /// Forward analysis: windowed frames to complex spectra.
    pub fn analyze(&self, samples: &[f64]) -> Result<Spectra> {
        let num_frames = Self::num_frames(samples.len());
        if num_frames == 0 {
            return Err(ClearwavError::FeatureExtraction {
                message: format!(
                    "chunk of {} samples is shorter than one hop ({})",
                    samples.len(),
                    WL2
                ),
            });
        }

        let mut frames = Vec::with_capacity(num_frames);
        let mut input = self.forward.make_input_vec();
        for m in 0..num_frames {
            let begin = m * WL2;
            for (n, slot) in input.iter_mut().enumerate() {
                let sample = samples.get(begin + n).copied().unwrap_or(0.0);
                *slot = sample * self.window[n];
            }
            let mut spectrum = self.forward.make_output_vec();
            self.forward
                .process(&mut input, &mut spectrum)
                .map_err(|e| ClearwavError::FeatureExtraction {
                    message: format!("forward FFT failed: {}", e),
                })?;
            debug_assert_eq!(spectrum.len(), NFREQS);
            frames.push(spectrum);
        }
        Ok(Spectra { frames })
    }

    /// Log-power-spectrum features: `ln(|X|² + ε)` per frame and bin.
    pub fn log_power(spectra: &Spectra) -> Matrix {
        let mut lps = Matrix::zeros(spectra.num_frames(), NFREQS);
        for (m, frame) in spectra.frames.iter().enumerate() {
            for (k, v) in frame.iter().enumerate() {
                lps.set(m, k, (v.norm_sqr() + LOG_FLOOR).ln());
            }
        }
        lps
    }

    /// Overlap-add synthesis of a recovered LPS matrix using the phase of a
    /// previously analyzed chunk.
    ///
    /// The output is truncated to `out_len`, the length of the analyzed
    /// chunk. Frame count of `lps` and `phase` must agree.
    pub fn synthesize(&self, lps: &Matrix, phase: &Spectra, out_len: usize) -> Result<Vec<f64>> {
        if lps.rows() != phase.num_frames() || lps.cols() != NFREQS {
            return Err(ClearwavError::Reconstruction {
                message: format!(
                    "recovered LPS is {}x{}, expected {}x{}",
                    lps.rows(),
                    lps.cols(),
                    phase.num_frames(),
                    NFREQS
                ),
            });
        }

        let total_len = (lps.rows() - 1) * WL2 + WL;
        let mut out = vec![0.0f64; total_len];
        let mut norm = vec![0.0f64; total_len];

        let mut spectrum = self.inverse.make_input_vec();
        let mut frame_out = self.inverse.make_output_vec();
        for m in 0..lps.rows() {
            for k in 0..NFREQS {
                let magnitude = (lps.get(m, k) / 2.0).exp();
                spectrum[k] = phase.unit_phase(m, k) * magnitude;
            }
            // DC and Nyquist bins of a real signal carry no imaginary part;
            // the inverse transform rejects nonzero values there.
            spectrum[0].im = 0.0;
            spectrum[NFREQS - 1].im = 0.0;

            self.inverse
                .process(&mut spectrum, &mut frame_out)
                .map_err(|e| ClearwavError::Reconstruction {
                    message: format!("inverse FFT failed: {}", e),
                })?;

            let begin = m * WL2;
            for n in 0..WL {
                // realfft's inverse is unnormalized
                let sample = frame_out[n] / WL as f64;
                out[begin + n] += sample * self.window[n];
                norm[begin + n] += self.window[n] * self.window[n];
            }
        }

        for (sample, w) in out.iter_mut().zip(&norm) {
            if *w > 1e-12 {
                *sample /= *w;
            }
        }
        out.truncate(out_len);
        Ok(out)
    }
}

impl Default for Stft {
    fn default() -> Self {
        Self::new()
    }
}
