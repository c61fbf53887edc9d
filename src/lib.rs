/// ==============================================================================================
/// ==================================== cc-split-nbody ============================================
/// ==============================================================================================
///
/// Recursive Hamiltonian-splitting N-body integrator based on a connected-components
/// decomposition of the pairwise interaction time-step graph. See `SPEC_FULL.md` for the full
/// module-by-module description; `DESIGN.md` records where each piece is grounded.

pub mod config;
pub mod diag;
pub mod dispatch;
pub mod error;
pub mod evolve;
pub mod model;
pub mod physics;
pub mod split;

#[cfg(test)]
mod tests;

use once_cell::sync::OnceCell;

pub use config::{EvolveConfig, IntegratorKind};
pub use diag::{Diagnostics, DiagnosticsSnapshot};
pub use error::{fatal, InvariantViolation};
pub use evolve::evolve;
pub use model::{Particle, System, Vector3};
pub use physics::Physics;

static LOGGER: OnceCell<()> = OnceCell::new();

/// Initialize process-wide logging exactly once. Safe to call from multiple call sites (tests,
/// multiple `evolve` entry points in one process) — later calls are no-ops.
pub fn init_logging() {
    LOGGER.get_or_init(|| {
        logger_bro::init();
    });
}
