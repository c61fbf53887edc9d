/// ==============================================================================================
/// ====================================== Physics trait ===========================================
/// ==============================================================================================
///
/// The force model, time-step prescription, and leaf-integrator choice are explicitly out of
/// scope for this crate (spec §1 Non-goals) — they are named interfaces a caller supplies. This
/// trait is the Rust expression of that boundary: the split and evolver modules depend only on
/// `&dyn Physics`, never on a concrete force law, so they can be implemented and tested (see
/// `src/tests/`) without one.

use crate::model::{Particle, System, Vector3};

/// Implementations must be safe to share across `rayon` tasks (§5): `timestep` is called
/// concurrently from multiple probes within one `split`, and `drift`/`kick`/leaf integrators are
/// called from parallel sub-evolutions that each own a private scratch buffer.
pub trait Physics: Send + Sync {
    /// The critical step for the pair `(p, q)`, given the direction of integration `dir` (+1 or
    /// -1). Must be symmetric in `(p, q)` up to `sign(dir)`, and strictly positive for any
    /// distinct pair.
    fn timestep(&self, p: &Particle, q: &Particle, dir: i32) -> f64;

    /// Advance positions of `view` by `h`, toward absolute time `t_target`.
    fn drift(&self, level: usize, buf: &mut [Particle], view: System, t_target: f64, h: f64);

    /// Apply an impulse to `sink` from sources `src` over step `h`. `sink == src` means internal
    /// interactions within one view.
    fn kick(&self, level: usize, buf: &mut [Particle], sink: System, src: System, h: f64);

    /// Closed-form two-body step. Called only when `view.n == 2` (or the massive count is `<=
    /// 1`) under `CcKepler`/`CccKepler` (§4.D termination shortcut 1).
    fn evolve_kepler(
        &self,
        level: usize,
        buf: &mut [Particle],
        view: System,
        t0: f64,
        t1: f64,
        h: f64,
    ) -> anyhow::Result<()>;

    /// Bulirsch-Stoer leaf integrator, fixed order. Called only when `view.n <=
    /// bs_subsys_size` under `CcBs`/`CccBs`.
    fn evolve_bs(
        &self,
        level: usize,
        buf: &mut [Particle],
        view: System,
        t0: f64,
        t1: f64,
        h: f64,
    ) -> anyhow::Result<()>;

    /// Bulirsch-Stoer leaf integrator with adaptive order/step control. Called only when
    /// `view.n <= bs_subsys_size` under `CcBsa`/`CccBsa`.
    fn evolve_bs_adaptive(
        &self,
        level: usize,
        buf: &mut [Particle],
        view: System,
        t0: f64,
        t1: f64,
        h: f64,
    ) -> anyhow::Result<()>;

    /// Mass-weighted center of mass (position, velocity) of `view`. A default, force-model-
    /// independent implementation is provided; override only if a `Physics` impl has a cheaper
    /// way to track it (e.g. an incrementally maintained COM).
    fn center_of_mass(&self, buf: &[Particle], view: System) -> (Vector3, Vector3) {
        let mut mass = 0.0;
        let mut pos = Vector3::ZERO;
        let mut vel = Vector3::ZERO;
        for p in view.iter(buf) {
            mass += p.mass;
            pos += p.pos * p.mass;
            vel += p.vel * p.mass;
        }
        if mass > 0.0 {
            (pos * (1.0 / mass), vel * (1.0 / mass))
        } else {
            (Vector3::ZERO, Vector3::ZERO)
        }
    }

    /// Shift `view` by `sign * pos` / `sign * vel` (sign is +1 or -1; §4.D uses -1 to enter the
    /// COM frame and +1 to leave it). Default implementation shifts every particle in the view;
    /// massless particles are shifted too (they still occupy physical space).
    fn move_system(
        &self,
        buf: &mut [Particle],
        view: System,
        pos: Vector3,
        vel: Vector3,
        sign: i32,
    ) {
        let s = sign as f64;
        for i in 0..view.n {
            let p = view.get_mut(buf, i);
            p.pos += pos * s;
            p.vel += vel * s;
        }
    }
}
