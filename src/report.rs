//! Stderr reporting helpers.
//!
//! Batch progress and skip diagnostics go to stderr so stdout stays clean
//! for shell composition.

/// Non-fatal condition; the batch continues.
pub fn warn(msg: &str) {
    eprintln!("WARNING: {}", msg);
}

/// Failure worth attention; the current file is skipped.
pub fn error(msg: &str) {
    eprintln!("ERROR: {}", msg);
}

/// Plain progress message.
pub fn info(msg: &str) {
    eprintln!("{}", msg);
}
