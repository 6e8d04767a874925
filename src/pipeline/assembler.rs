//! Assembly of reconstructed segments into the output buffer.
//!
//! Segments are concatenated in chunk order and converted to 16-bit samples
//! in one pass. Out-of-range values are clamped to the i16 range rather than
//! wrapped (the reference tool wrapped; see DESIGN.md); fractional parts are
//! truncated toward zero, matching the reference cast.

use std::ops::Range;

/// Convert one reconstructed sample to i16: clamp, then truncate.
pub fn to_i16(sample: f64) -> i16 {
    sample.clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Concatenate reconstructed segments, in order, into one 16-bit buffer.
pub fn assemble(segments: &[Vec<f64>]) -> Vec<i16> {
    let total: usize = segments.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(total);
    for segment in segments {
        out.extend(segment.iter().map(|&v| to_i16(v)));
    }
    out
}

/// Check that the reconstructed segments match the planned chunks one-to-one
/// and in order.
pub fn matches_plan(segments: &[Vec<f64>], chunks: &[Range<usize>]) -> bool {
    segments.len() == chunks.len()
        && segments
            .iter()
            .zip(chunks)
            .all(|(segment, chunk)| segment.len() == chunk.len())
}
