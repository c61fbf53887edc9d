/// ==============================================================================================
/// ===================================== Error Handling ==========================================
/// ==============================================================================================
///
/// Invariant violations (degenerate input, broken split consistency, a failed verifier) are
/// contract violations, not recoverable conditions — the original terminates the process naming
/// the violated invariant and recursion level, and this crate does the same via `fatal`, which
/// logs at `error` level and then panics. `Physics` leaf-integrator failures are the one
/// genuinely recoverable boundary and are threaded through as `anyhow::Result` instead (see
/// `physics.rs`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvariantViolation {
    #[error("level {level}: split called on a system with n <= 1 (n={n})")]
    DegenerateSplitInput { level: usize, n: usize },

    #[error("level {level}: split called on a non-contiguous system (last={last}, zeropart={zeropart})")]
    NonContiguousInput {
        level: usize,
        last: usize,
        zeropart: usize,
    },

    #[error("level {level}: split consistency error: {detail}")]
    SplitConsistency { level: usize, detail: String },

    #[error("level {level}: split particle count mismatch: processed={processed} expected={expected}")]
    ParticleCountMismatch {
        level: usize,
        processed: usize,
        expected: usize,
    },

    #[error("level {level}: split exit cursor mismatch: {detail}")]
    CursorMismatch { level: usize, detail: String },

    #[error("level {level}: split verification failed: {detail}")]
    VerifierFailed { level: usize, detail: String },
}

impl InvariantViolation {
    pub fn level(&self) -> usize {
        match self {
            InvariantViolation::DegenerateSplitInput { level, .. }
            | InvariantViolation::NonContiguousInput { level, .. }
            | InvariantViolation::SplitConsistency { level, .. }
            | InvariantViolation::ParticleCountMismatch { level, .. }
            | InvariantViolation::CursorMismatch { level, .. }
            | InvariantViolation::VerifierFailed { level, .. } => *level,
        }
    }
}

/// Log the violation at `error` level, naming the recursion level, then abort the integration.
/// Mirrors the original's `ENDRUN` macro: there is no partial-state recovery from a broken
/// invariant, so unwinding further up the call stack would only operate on corrupted data.
pub fn fatal(err: InvariantViolation) -> ! {
    log::error!("fatal at level {}: {err}", err.level());
    panic!("{err}");
}
