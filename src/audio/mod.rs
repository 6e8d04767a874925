//! WAV file handling and waveform conditioning.

pub mod wav;

pub use wav::{peak_normalize, read_samples, validate_input, write_samples};
