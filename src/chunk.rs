//! Chunk boundary planning for memory-bounded processing.
//!
//! Long recordings are processed in fixed-size chunks so the estimator's
//! working set stays bounded. Chunks partition the buffer exactly, in order,
//! with only the last chunk allowed to run short.

use std::ops::Range;

/// Plan the ordered chunk boundaries for a buffer of `len` samples.
///
/// Every chunk has length `chunk_length` except possibly the last. An empty
/// buffer yields no chunks.
///
/// # Panics
/// Panics if `chunk_length` is zero; callers validate it via
/// [`crate::config::EnhanceConfig::chunk_length`].
pub fn plan_chunks(len: usize, chunk_length: usize) -> Vec<Range<usize>> {
    assert!(chunk_length > 0, "chunk_length must be positive");
    let total_chunks = len.div_ceil(chunk_length);
    (0..total_chunks)
        .map(|i| {
            let begin = i * chunk_length;
            let end = (begin + chunk_length).min(len);
            begin..end
        })
        .collect()
}
