/// ==============================================================================================
/// ======================================== CC-split ==============================================
/// ==============================================================================================
///
/// In-place partition of a contiguous `System` into non-trivial connected components of the
/// time-step graph (edge `(p,q)` iff `timestep(p,q,dir) <= |dt|`) plus a rest view. The
/// partition is a single pass of swaps over the buffer — no extra particle storage, O(1) extra
/// index bookkeeping — translating the original's three-pointer (`comp_next`/`stack_next`/
/// `rest_next`, and the massless-range counterparts) scheme onto buffer indices. See spec §4.B.

pub mod verify;

use crate::diag::Diagnostics;
use crate::error::{fatal, InvariantViolation};
use crate::model::{Particle, System};
use crate::physics::Physics;

/// Partition `s` (a contiguous view into `buf`) by threshold `dt` into non-trivial components and
/// a rest view. `dt`'s sign selects `dir`; its magnitude is the threshold.
///
/// Panics (via `error::fatal`) on any contract violation: `s.n <= 1`, a non-contiguous `s`, or an
/// internal consistency failure — these are caller/programmer errors, not recoverable conditions
/// (spec §7).
pub fn split(
    level: usize,
    buf: &mut [Particle],
    s: System,
    dt: f64,
    physics: &dyn Physics,
    diag: &Diagnostics,
) -> (Vec<System>, System) {
    if s.n <= 1 {
        fatal(InvariantViolation::DegenerateSplitInput { level, n: s.n });
    }
    if !s.contiguous() {
        fatal(InvariantViolation::NonContiguousInput {
            level,
            last: s.last,
            zeropart: s.zeropart,
        });
    }

    let dir: i32 = if dt < 0.0 { -1 } else { 1 };
    let dt = dt.abs();

    diag.record_split(level);

    let mut components: Vec<System> = Vec::new();
    let mut processed: usize = 0;

    let has_massive = s.massive_count() > 0;
    let has_massless = s.nzero > 0;

    let mut stack_next: Option<usize> = has_massive.then_some(s.part);
    let mut rest_next: Option<usize> = has_massive.then_some(s.last);
    let mut stackzero_next: Option<usize> = has_massless.then_some(s.zeropart);
    let mut restzero_next: Option<usize> = has_massless.then_some(s.lastzero);
    let mut comp_next: Option<usize> = stack_next;
    let mut compzero_next: Option<usize> = stackzero_next;

    while processed < s.n {
        if stack_next != comp_next || stackzero_next != compzero_next {
            fatal(InvariantViolation::SplitConsistency {
                level,
                detail: "stack cursor diverged from component cursor at outer-loop entry".into(),
            });
        }

        let mut comp_size: usize = 0;
        let mut compzero_size: usize = 0;
        let mut stack_size: usize = 0;
        // tracks whether the seed (and hence, when comp_size==1, the sole popped particle) was
        // drawn from the massive or massless range.
        let mut last_active_massive = true;

        // --- seed the stack with one particle for the next component: massive first, then
        // massless (§4.B step 1). ---
        if let (Some(sn), Some(rn)) = (stack_next, rest_next) {
            if sn <= rn {
                stack_next = Some(sn + 1);
                stack_size = 1;
            }
        }
        if comp_next == stack_next {
            if let (Some(szn), Some(rzn)) = (stackzero_next, restzero_next) {
                if szn <= rzn {
                    stackzero_next = Some(szn + 1);
                    stack_size = 1;
                }
            }
        }
        if stack_next == comp_next && stackzero_next == compzero_next {
            fatal(InvariantViolation::SplitConsistency {
                level,
                detail: "no seed available while particles remain unprocessed".into(),
            });
        }

        // --- grow the component: repeatedly pop the stack head and probe all unvisited
        // candidates against it (§4.B step 2). ---
        while stack_size > 0 {
            let active_massive = matches!((stack_next, comp_next), (Some(sn), Some(cn)) if sn > cn);
            let active_massless = matches!((stackzero_next, compzero_next), (Some(szn), Some(czn)) if szn > czn);
            if !active_massive && !active_massless {
                fatal(InvariantViolation::SplitConsistency {
                    level,
                    detail: "no active particle available while stack_size > 0".into(),
                });
            }
            last_active_massive = active_massive;
            let active: Particle = if active_massive {
                buf[comp_next.expect("massive active requires comp_next")]
            } else {
                buf[compzero_next.expect("massless active requires compzero_next")]
            };

            if let (Some(sn0), Some(rn)) = (stack_next, rest_next) {
                let mut sn = sn0;
                let mut i = sn0;
                while i <= rn {
                    diag.record_probe(level);
                    if physics.timestep(&active, &buf[i], dir) <= dt {
                        buf.swap(sn, i);
                        sn += 1;
                    }
                    i += 1;
                }
                stack_size += sn - sn0;
                stack_next = Some(sn);
            }
            if let (Some(szn0), Some(rzn)) = (stackzero_next, restzero_next) {
                let mut szn = szn0;
                let mut i = szn0;
                while i <= rzn {
                    diag.record_probe(level);
                    if physics.timestep(&active, &buf[i], dir) <= dt {
                        buf.swap(szn, i);
                        szn += 1;
                    }
                    i += 1;
                }
                stack_size += szn - szn0;
                stackzero_next = Some(szn);
            }

            // pop
            if active_massive {
                comp_next = Some(comp_next.unwrap() + 1);
            } else {
                compzero_next = Some(compzero_next.unwrap() + 1);
                compzero_size += 1;
            }
            comp_size += 1;
            stack_size -= 1;
        }

        processed += comp_size;

        if comp_size > 1 {
            components.push(emit_component(comp_size, compzero_size, comp_next, compzero_next));
        } else {
            // singleton: demote it back into the rest zone it was drawn from.
            if last_active_massive {
                let cn = comp_next.unwrap() - 1;
                let rn = rest_next.unwrap();
                buf.swap(cn, rn);
                rest_next = Some(rn - 1);
                comp_next = Some(cn);
                stack_next = Some(cn);
            } else {
                let czn = compzero_next.unwrap() - 1;
                let rzn = restzero_next.unwrap();
                buf.swap(czn, rzn);
                restzero_next = Some(rzn - 1);
                compzero_next = Some(czn);
                stackzero_next = Some(czn);
            }
        }
    }

    if processed != s.n {
        fatal(InvariantViolation::ParticleCountMismatch {
            level,
            processed,
            expected: s.n,
        });
    }

    let cursor_ok = |stack: Option<usize>, rest: Option<usize>| stack == rest.map(|r| r + 1);
    if !cursor_ok(stack_next, rest_next) || !cursor_ok(stackzero_next, restzero_next) {
        fatal(InvariantViolation::CursorMismatch {
            level,
            detail: format!(
                "stack_next={stack_next:?} rest_next={rest_next:?} stackzero_next={stackzero_next:?} restzero_next={restzero_next:?}"
            ),
        });
    }

    let rest = emit_rest(s, rest_next, restzero_next);
    (components, rest)
}

/// Build the `System` for a just-closed non-trivial component from its final cursor positions.
/// `comp_next`/`compzero_next` point one past the component's massive/massless spans respectively.
fn emit_component(
    comp_size: usize,
    compzero_size: usize,
    comp_next: Option<usize>,
    compzero_next: Option<usize>,
) -> System {
    let nm = comp_size - compzero_size;
    match (nm > 0, compzero_size > 0) {
        (true, true) => {
            let cn = comp_next.unwrap();
            let czn = compzero_next.unwrap();
            System {
                n: comp_size,
                nzero: compzero_size,
                part: cn - nm,
                last: cn - 1,
                zeropart: czn - compzero_size,
                lastzero: czn - 1,
            }
        }
        (true, false) => {
            let cn = comp_next.unwrap();
            let part = cn - nm;
            let last = cn - 1;
            System {
                n: comp_size,
                nzero: 0,
                part,
                last,
                zeropart: part,
                lastzero: part,
            }
        }
        (false, true) => {
            let czn = compzero_next.unwrap();
            let zeropart = czn - compzero_size;
            let lastzero = czn - 1;
            System {
                n: comp_size,
                nzero: compzero_size,
                part: zeropart,
                last: zeropart,
                zeropart,
                lastzero,
            }
        }
        (false, false) => unreachable!("a component always has at least one particle"),
    }
}

/// Build the rest view from the final `rest_next`/`restzero_next` cursors: the rest occupies the
/// tail of each zone, from one past the cursor through `s.last`/`s.lastzero`.
fn emit_rest(s: System, rest_next: Option<usize>, restzero_next: Option<usize>) -> System {
    let nm = rest_next.map_or(0, |rn| s.last - rn);
    let nzero = restzero_next.map_or(0, |rzn| s.lastzero - rzn);
    match (nm > 0, nzero > 0) {
        (true, true) => System {
            n: nm + nzero,
            nzero,
            part: rest_next.unwrap() + 1,
            last: s.last,
            zeropart: restzero_next.unwrap() + 1,
            lastzero: s.lastzero,
        },
        (true, false) => {
            let part = rest_next.unwrap() + 1;
            System {
                n: nm,
                nzero: 0,
                part,
                last: s.last,
                zeropart: part,
                lastzero: part,
            }
        }
        (false, true) => {
            let zeropart = restzero_next.unwrap() + 1;
            System {
                n: nzero,
                nzero,
                part: zeropart,
                last: zeropart,
                zeropart,
                lastzero: s.lastzero,
            }
        }
        (false, false) => System::EMPTY,
    }
}
