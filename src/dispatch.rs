/// ==============================================================================================
/// ===================================== Task dispatch ============================================
/// ==============================================================================================
///
/// Eligibility test and scratch-buffer plumbing for §4.E. The actual parallel fan-out lives in
/// `evolve::run_half`, which drives eligible children through `rayon`'s `par_iter_mut` — the
/// project this crate is grounded on already reaches for `ndarray`'s `par_iter_mut` for its own
/// data-parallel work, so this mirrors that idiom rather than hand-rolling `rayon::scope`.

use crate::config::EvolveConfig;
use crate::model::{Particle, System};

/// A component recursion is worth parallelizing only when there is more than one sibling to
/// overlap with, and the sibling is bigger than the BS leaf threshold (otherwise it would bottom
/// out immediately and the scratch-copy overhead dominates).
pub fn eligible(child: &System, config: &EvolveConfig, sibling_count: usize) -> bool {
    sibling_count > 1 && child.n > config.bs_subsys_size
}

/// Copy `view`'s particles (both massive and massless ranges, in view order) out of `buf` into a
/// freshly owned, contiguous buffer, and build the local view over it (`part = 0`, contiguous).
pub fn make_scratch(buf: &[Particle], view: System) -> (Vec<Particle>, System) {
    let scratch: Vec<Particle> = (0..view.n).map(|i| *view.get(buf, i)).collect();
    let local = System::from_bounds(view.n, view.nzero, 0, view.massive_count());
    (scratch, local)
}

/// Copy a scratch buffer's particles back into their original positions in `buf`, position by
/// position, in view order.
pub fn copy_back(buf: &mut [Particle], view: System, scratch: &[Particle], local: System) {
    for i in 0..view.n {
        *view.get_mut(buf, i) = *local.get(scratch, i);
    }
}
