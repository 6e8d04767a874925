//! Isolated invocation of the mask estimator.
//!
//! Repeated in-process invocations of the inference engine accumulate
//! memory, so each chunk's estimate runs in its own execution context: a
//! dedicated thread that reports back over a one-shot channel. The channel
//! carries either the estimate or a captured `(message, trace)` pair, so the
//! original failure reason survives the boundary, including panics, which
//! would otherwise tear down silently with the thread. The caller blocks
//! until the context terminates; there is deliberately no timeout or
//! cancellation, a non-terminating estimator stalls the batch.

use crate::error::{ClearwavError, Result};
use crate::estimator::{EstimateRequest, MaskEstimate, MaskEstimator};
use crossbeam_channel::bounded;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

/// Outcome marshalled across the isolation boundary.
enum Outcome {
    Success(MaskEstimate),
    Failure { message: String, trace: String },
}

/// Run one estimate inside an isolated execution context and block until it
/// terminates.
pub fn estimate_isolated(
    estimator: Arc<dyn MaskEstimator>,
    request: EstimateRequest,
) -> Result<MaskEstimate> {
    let (tx, rx) = bounded::<Outcome>(1);

    let worker = thread::Builder::new()
        .name("mask-estimator".to_string())
        .spawn(move || {
            let outcome = match catch_unwind(AssertUnwindSafe(|| estimator.estimate(&request))) {
                Ok(Ok(estimate)) => Outcome::Success(estimate),
                Ok(Err(e)) => Outcome::Failure {
                    message: e.to_string(),
                    trace: e.diagnostic(),
                },
                Err(panic_info) => {
                    let msg = panic_info
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic_info.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    Outcome::Failure {
                        message: format!("estimator panicked: {}", msg),
                        trace: msg,
                    }
                }
            };
            // Receiver gone means the caller is unwinding; nothing to report to.
            let _ = tx.send(outcome);
        })?;

    let outcome = rx.recv();
    // The context has sent (or dropped the sender); reap the thread either way.
    let _ = worker.join();

    match outcome {
        Ok(Outcome::Success(estimate)) => Ok(estimate),
        Ok(Outcome::Failure { message, trace }) => {
            Err(ClearwavError::Estimator { message, trace })
        }
        // Sender dropped without a message: the thread died before the
        // catch_unwind wrapper could run.
        Err(_) => Err(ClearwavError::EstimatorNoResult),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnhanceConfig;
    use crate::defaults::NFREQS;
    use crate::matrix::Matrix;
    use std::path::PathBuf;

    struct EchoEstimator;

    impl MaskEstimator for EchoEstimator {
        fn estimate(&self, request: &EstimateRequest) -> Result<MaskEstimate> {
            Ok(MaskEstimate {
                irm: request.features.map(|_| 1.0),
                lps: request.features.clone(),
            })
        }
    }

    struct FailingEstimator;

    impl MaskEstimator for FailingEstimator {
        fn estimate(&self, _request: &EstimateRequest) -> Result<MaskEstimate> {
            Err(ClearwavError::Estimator {
                message: "model file corrupt".to_string(),
                trace: "stage 2 weights: bad checksum".to_string(),
            })
        }
    }

    struct PanickingEstimator;

    impl MaskEstimator for PanickingEstimator {
        fn estimate(&self, _request: &EstimateRequest) -> Result<MaskEstimate> {
            panic!("index out of bounds in inference kernel");
        }
    }

    fn request() -> EstimateRequest {
        EstimateRequest::new(
            Matrix::zeros(5, NFREQS),
            &EnhanceConfig::default(),
            PathBuf::from("/tmp/work"),
        )
    }

    #[test]
    fn success_crosses_the_boundary() {
        let estimate = estimate_isolated(Arc::new(EchoEstimator), request()).unwrap();
        assert_eq!(estimate.irm.rows(), 5);
        assert_eq!(estimate.lps.cols(), NFREQS);
    }

    #[test]
    fn error_identity_and_trace_are_preserved() {
        let err = estimate_isolated(Arc::new(FailingEstimator), request()).unwrap_err();
        match err {
            ClearwavError::Estimator { message, trace } => {
                assert!(message.contains("model file corrupt"));
                assert!(trace.contains("bad checksum"));
            }
            other => panic!("expected Estimator error, got {:?}", other),
        }
    }

    #[test]
    fn panic_is_captured_as_failure() {
        let err = estimate_isolated(Arc::new(PanickingEstimator), request()).unwrap_err();
        match err {
            ClearwavError::Estimator { message, .. } => {
                assert!(message.contains("estimator panicked"));
                assert!(message.contains("inference kernel"));
            }
            other => panic!("expected Estimator error, got {:?}", other),
        }
    }

    #[test]
    fn repeated_invocations_are_independent() {
        let estimator: Arc<dyn MaskEstimator> = Arc::new(EchoEstimator);
        for _ in 0..3 {
            assert!(estimate_isolated(Arc::clone(&estimator), request()).is_ok());
        }
    }
}
