/// ==============================================================================================
/// ====================================== Configuration ==========================================
/// ==============================================================================================

use serde::{Deserialize, Serialize};

/// Leaf-integrator flavor and COM-recentering policy. The `Ccc*` variants enable recentering on
/// the system's center of mass before a step and reverse it afterward (§4.D); the plain `Cc*`
/// variants never recenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegratorKind {
    Cc,
    Ccc,
    CcKepler,
    CccKepler,
    CcBs,
    CccBs,
    CcBsa,
    CccBsa,
}

impl IntegratorKind {
    #[inline]
    pub fn recenters(&self) -> bool {
        matches!(
            self,
            IntegratorKind::Ccc
                | IntegratorKind::CccKepler
                | IntegratorKind::CccBs
                | IntegratorKind::CccBsa
        )
    }

    #[inline]
    pub fn is_kepler(&self) -> bool {
        matches!(self, IntegratorKind::CcKepler | IntegratorKind::CccKepler)
    }

    #[inline]
    pub fn is_bs(&self) -> bool {
        matches!(self, IntegratorKind::CcBs | IntegratorKind::CccBs)
    }

    #[inline]
    pub fn is_bs_adaptive(&self) -> bool {
        matches!(self, IntegratorKind::CcBsa | IntegratorKind::CccBsa)
    }
}

/// Tunables for the evolver and task dispatcher. `bs_subsys_size` doubles as both the BS-family
/// leaf threshold (§4.D) and the task-eligibility threshold (§4.E) exactly as in the original.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvolveConfig {
    pub bs_subsys_size: usize,
    /// Run the verifier (§4.C) after every split. Off by default — this is a debugging aid, not
    /// part of the steady-state hot path.
    pub verify_split: bool,
    /// The commented-out `CC2_SPLIT_SHORTCUTS` shortcut from the original: subdivide `h` up front
    /// when it exceeds the system's maximum pair time step. Disabled by default; see DESIGN.md.
    pub split_shortcuts: bool,
}

impl Default for EvolveConfig {
    fn default() -> Self {
        Self {
            bs_subsys_size: 10,
            verify_split: false,
            split_shortcuts: false,
        }
    }
}
