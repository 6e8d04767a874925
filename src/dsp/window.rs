//! Analysis window construction.

use std::f64::consts::PI;

/// Symmetric Hamming window of length `len`.
///
/// `w[n] = 0.54 - 0.46·cos(2πn/(len-1))`, the window the enhancement models
/// were trained with.
pub fn hamming(len: usize) -> Vec<f64> {
    match len {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => (0..len)
            .map(|n| 0.54 - 0.46 * (2.0 * PI * n as f64 / (len - 1) as f64).cos())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_and_peak() {
        let w = hamming(512);
        assert_eq!(w.len(), 512);
        // Symmetric Hamming starts and ends at 0.08
        assert!((w[0] - 0.08).abs() < 1e-12);
        assert!((w[511] - 0.08).abs() < 1e-12);
        // Peak near the center approaches 1.0
        let peak = w.iter().fold(0.0f64, |m, &v| m.max(v));
        assert!(peak > 0.999);
    }

    #[test]
    fn window_is_symmetric() {
        let w = hamming(512);
        for i in 0..256 {
            assert!(
                (w[i] - w[511 - i]).abs() < 1e-12,
                "asymmetry at index {}",
                i
            );
        }
    }

    #[test]
    fn degenerate_lengths() {
        assert!(hamming(0).is_empty());
        assert_eq!(hamming(1), vec![1.0]);
    }
}
