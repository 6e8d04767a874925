//! The chunked enhancement pipeline.
//!
//! Data flows strictly: waveform → chunks → features → normalized features →
//! estimate → fused recovered features → reconstructed waveform chunks →
//! assembled output. Control flow is sequential by design; chunk-level
//! parallelism would break the memory bound the chunking exists to provide.

pub mod assembler;
pub mod fusion;
pub mod orchestrator;

pub use assembler::assemble;
pub use fusion::recover_lps;
pub use orchestrator::{BatchSummary, Orchestrator};
