/// ==============================================================================================
/// ======================================== Particle =============================================
/// ==============================================================================================

use serde::{Deserialize, Serialize};

use super::vector::Vector3;

/// A single body: stable identity, mass, and phase-space state.
///     Massless particles (`mass == 0.0`) receive kicks from massive ones but exert none; they
///     form a distinguished subset tracked separately by `System` (see `system.rs`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: u64,
    pub mass: f64,
    pub pos: Vector3,
    pub vel: Vector3,
    pub acc: Vector3,
}

impl Particle {
    #[inline]
    pub fn new(id: u64, mass: f64, pos: Vector3, vel: Vector3) -> Self {
        Self {
            id,
            mass,
            pos,
            vel,
            acc: Vector3::ZERO,
        }
    }

    #[inline]
    pub fn is_massless(&self) -> bool {
        self.mass == 0.0
    }
}
