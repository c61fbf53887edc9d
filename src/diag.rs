/// ==============================================================================================
/// ===================================== Diagnostics =============================================
/// ==============================================================================================
///
/// Per-level counters updated from multiple rayon tasks (§5: "diagnostics counters ... require
/// atomic increments or per-task accumulators merged at the barrier"). Plain `AtomicU64` covers
/// every integer counter; `simtime` is the one `f64` accumulator and is kept as bit-pattern
/// `AtomicU64` with a compare-exchange retry loop, since `f64` has no native atomic and no `Eq`
/// impl to ride a plain `compare_exchange` on its own type.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Recursion depth is bounded by `log2(max_timestep / min_timestep)` (see DESIGN NOTES); levels
/// beyond this are vanishingly unlikely but are clamped into the deepest bucket rather than
/// panicking, so a pathological input never crashes the diagnostics subsystem itself.
const MAX_LEVELS: usize = 128;

pub struct Diagnostics {
    tstep: Vec<AtomicU64>,
    tcount: Vec<AtomicU64>,
    ntasks: Vec<AtomicU64>,
    taskcount: Vec<AtomicU64>,
    deepsteps: AtomicU64,
    simtime_bits: AtomicU64,
}

/// A plain, loggable snapshot of the counters above (the caller-facing shape; this crate defines
/// no on-disk format for it, matching the persistence Non-goal).
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsSnapshot {
    pub tstep: Vec<u64>,
    pub tcount: Vec<u64>,
    pub ntasks: Vec<u64>,
    pub taskcount: Vec<u64>,
    pub deepsteps: u64,
    pub simtime: f64,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::with_levels(MAX_LEVELS)
    }

    pub fn with_levels(levels: usize) -> Self {
        let levels = levels.max(1);
        Self {
            tstep: (0..levels).map(|_| AtomicU64::new(0)).collect(),
            tcount: (0..levels).map(|_| AtomicU64::new(0)).collect(),
            ntasks: (0..levels).map(|_| AtomicU64::new(0)).collect(),
            taskcount: (0..levels).map(|_| AtomicU64::new(0)).collect(),
            deepsteps: AtomicU64::new(0),
            simtime_bits: AtomicU64::new(0.0f64.to_bits()),
        }
    }

    #[inline]
    fn slot(v: &[AtomicU64], level: usize) -> &AtomicU64 {
        &v[level.min(v.len() - 1)]
    }

    pub fn record_split(&self, level: usize) {
        Self::slot(&self.tstep, level).fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_probe(&self, level: usize) {
        Self::slot(&self.tcount, level).fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_task(&self, level: usize, size: usize) {
        Self::slot(&self.ntasks, level).fetch_add(1, Ordering::Relaxed);
        Self::slot(&self.taskcount, level).fetch_add(size as u64, Ordering::Relaxed);
    }

    /// A leaf of the recursion was reached (the C-list was empty): §4.D step 2.
    pub fn record_deepstep(&self, h: f64) {
        self.deepsteps.fetch_add(1, Ordering::Relaxed);
        let mut cur = self.simtime_bits.load(Ordering::Relaxed);
        loop {
            let new = f64::from_bits(cur) + h;
            match self.simtime_bits.compare_exchange_weak(
                cur,
                new.to_bits(),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(prev) => cur = prev,
            }
        }
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        let load_all = |v: &[AtomicU64]| v.iter().map(|a| a.load(Ordering::Relaxed)).collect();
        DiagnosticsSnapshot {
            tstep: load_all(&self.tstep),
            tcount: load_all(&self.tcount),
            ntasks: load_all(&self.ntasks),
            taskcount: load_all(&self.taskcount),
            deepsteps: self.deepsteps.load(Ordering::Relaxed),
            simtime: f64::from_bits(self.simtime_bits.load(Ordering::Relaxed)),
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}
