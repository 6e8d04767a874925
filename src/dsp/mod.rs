//! Short-time Fourier analysis and synthesis.

pub mod stft;
pub mod window;

pub use stft::{Spectra, Stft};
pub use window::hamming;
