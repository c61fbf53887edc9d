/// ==============================================================================================
/// ====================================== Split verifier ===========================================
/// ==============================================================================================
///
/// Optional consistency check of a split's output against its input (spec §4.C). Gated by
/// `EvolveConfig::verify_split`; off by default, matching the original's `#ifdef
/// CONSISTENCY_CHECKS` debug build.

use std::collections::HashSet;

use crate::error::{fatal, InvariantViolation};
use crate::model::{Particle, System};
use crate::physics::Physics;

/// `s_ids` is the multiset of particle ids that were present in `S` before `split` ran (captured
/// by the caller, since `split` permutes `buf` in place). Panics via `error::fatal` on any
/// mismatch.
pub fn verify(
    level: usize,
    s_ids: &[u64],
    buf: &[Particle],
    components: &[System],
    rest: System,
    dt: f64,
    physics: &dyn Physics,
) {
    let dir: i32 = if dt < 0.0 { -1 } else { 1 };
    let dt = dt.abs();

    // -- membership: every id of S appears in exactly one of C ∪ R --
    let expected: HashSet<u64> = s_ids.iter().copied().collect();
    if expected.len() != s_ids.len() {
        fatal(InvariantViolation::VerifierFailed {
            level,
            detail: "pre-split snapshot contains duplicate ids".into(),
        });
    }

    let mut seen: HashSet<u64> = HashSet::with_capacity(s_ids.len());
    let mut total = 0usize;
    for c in components {
        for id in c.ids(buf) {
            if !seen.insert(id) {
                fatal(InvariantViolation::VerifierFailed {
                    level,
                    detail: format!("particle {id} appears in more than one component"),
                });
            }
            total += 1;
        }
    }
    for id in rest.ids(buf) {
        if !seen.insert(id) {
            fatal(InvariantViolation::VerifierFailed {
                level,
                detail: format!("particle {id} appears in both a component and the rest view"),
            });
        }
        total += 1;
    }

    if total != s_ids.len() || seen != expected {
        fatal(InvariantViolation::VerifierFailed {
            level,
            detail: format!(
                "particle count mismatch: found {total} across C ∪ R, expected {}",
                s_ids.len()
            ),
        });
    }

    // -- internal layout: massive prefix, massless suffix, in every emitted view --
    let check_layout = |v: &System| {
        let nm = v.massive_count();
        for i in 0..nm {
            if v.get(buf, i).is_massless() {
                fatal(InvariantViolation::VerifierFailed {
                    level,
                    detail: "massless particle found in a view's massive prefix".into(),
                });
            }
        }
        for i in nm..v.n {
            if !v.get(buf, i).is_massless() {
                fatal(InvariantViolation::VerifierFailed {
                    level,
                    detail: "massive particle found in a view's massless suffix".into(),
                });
            }
        }
    };
    for c in components {
        if c.n < 2 {
            fatal(InvariantViolation::VerifierFailed {
                level,
                detail: format!("component has n={} < 2", c.n),
            });
        }
        check_layout(c);
    }
    check_layout(&rest);

    // -- edge separation: no fast edge crosses a component/rest boundary --
    for (i, ci) in components.iter().enumerate() {
        for (j, cj) in components.iter().enumerate() {
            if i == j {
                continue;
            }
            for p in ci.iter(buf) {
                for q in cj.iter(buf) {
                    if physics.timestep(p, q, dir) < dt {
                        fatal(InvariantViolation::VerifierFailed {
                            level,
                            detail: format!(
                                "fast edge ({}, {}) crosses a component/component boundary",
                                p.id, q.id
                            ),
                        });
                    }
                }
            }
        }
        for p in ci.iter(buf) {
            for q in rest.iter(buf) {
                if physics.timestep(p, q, dir) < dt {
                    fatal(InvariantViolation::VerifierFailed {
                        level,
                        detail: format!(
                            "fast edge ({}, {}) crosses a component/rest boundary",
                            p.id, q.id
                        ),
                    });
                }
            }
        }
    }
    for p in rest.iter(buf) {
        for q in rest.iter(buf) {
            if p.id == q.id {
                continue;
            }
            if physics.timestep(p, q, dir) < dt {
                fatal(InvariantViolation::VerifierFailed {
                    level,
                    detail: format!("fast edge ({}, {}) found within the rest view", p.id, q.id),
                });
            }
        }
    }
}
