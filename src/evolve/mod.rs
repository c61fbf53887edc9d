/// ==============================================================================================
/// ======================================= CC evolver ==============================================
/// ==============================================================================================
///
/// The recursive operator-split step (spec §4.D), grounded directly on `evolve_cc2` in the
/// original source. Each call advances one view by `h`: try a termination shortcut, otherwise
/// split the view into non-trivial components plus a rest, recurse into each half-step, and kick
/// the pieces against each other in between.

use rayon::prelude::*;

use crate::config::{EvolveConfig, IntegratorKind};
use crate::diag::Diagnostics;
use crate::dispatch;
use crate::model::{Particle, System, Vector3};
use crate::physics::Physics;
use crate::split::{split, verify::verify};

/// Advance `view` from `t0` to `t1` (`h = t1 - t0`, signed; its magnitude is the split threshold,
/// its sign is the integration direction). `recenter` gates whether this call may recenter on
/// `view`'s center of mass before splitting (only ever acted on when `inttype` is a `Ccc*`
/// variant) — the caller passes `true` at the top of a run; nested calls receive it from their
/// parent's split (§4.D step 1).
#[allow(clippy::too_many_arguments)]
pub fn evolve(
    level: usize,
    buf: &mut [Particle],
    view: System,
    t0: f64,
    t1: f64,
    h: f64,
    inttype: IntegratorKind,
    recenter: bool,
    physics: &dyn Physics,
    diag: &Diagnostics,
    config: &EvolveConfig,
) -> anyhow::Result<()> {
    log::debug!("entering evolve level={level} n={} h={h:e}", view.n);

    // -- termination shortcuts, checked in order (§4.D) --
    if inttype.is_kepler() && (view.n == 2 || view.massive_count() <= 1) {
        let result = physics.evolve_kepler(level, buf, view, t0, t1, h);
        if let Err(ref e) = result {
            log::warn!("level={level}: evolve_kepler failed: {e}");
        }
        log::debug!("leaving evolve level={level} (kepler shortcut)");
        return result;
    }
    if inttype.is_bs() && view.n <= config.bs_subsys_size {
        let result = physics.evolve_bs(level, buf, view, t0, t1, h);
        if let Err(ref e) = result {
            log::warn!("level={level}: evolve_bs failed: {e}");
        }
        log::debug!("leaving evolve level={level} (bs shortcut)");
        return result;
    }
    if inttype.is_bs_adaptive() && view.n <= config.bs_subsys_size {
        let result = physics.evolve_bs_adaptive(level, buf, view, t0, t1, h);
        if let Err(ref e) = result {
            log::warn!("level={level}: evolve_bs_adaptive failed: {e}");
        }
        log::debug!("leaving evolve level={level} (bs-adaptive shortcut)");
        return result;
    }

    let recentered = inttype.recenters() && recenter;
    let (cmpos, cmvel) = if recentered {
        let com = physics.center_of_mass(buf, view);
        physics.move_system(buf, view, com.0, com.1, -1);
        com
    } else {
        (Vector3::ZERO, Vector3::ZERO)
    };

    let pre_split_ids = config.verify_split.then(|| view.ids(buf));

    let (components, rest) = split(level, buf, view, h, physics, diag);

    log::debug!(
        "level={level}: split produced components={} rest_n={}",
        components.len(),
        rest.n
    );

    if let Some(ids) = pre_split_ids {
        verify(level, &ids, buf, &components, rest, h, physics);
    }

    if components.is_empty() {
        diag.record_deepstep(h);
    }

    // a child recursion recenters only if it will itself split further into more than one piece.
    let recentersub = components.len() > 1 || !rest.is_empty();

    run_half(
        level,
        buf,
        &components,
        t0,
        t0 + h / 2.0,
        h / 2.0,
        inttype,
        recentersub,
        physics,
        diag,
        config,
    )?;

    if !rest.is_empty() {
        physics.drift(level, buf, rest, t0 + h / 2.0, h / 2.0);
    }

    for (i, ci) in components.iter().enumerate() {
        for (j, cj) in components.iter().enumerate() {
            if i != j {
                physics.kick(level, buf, *ci, *cj, h);
            }
        }
    }
    if !rest.is_empty() {
        for ci in &components {
            physics.kick(level, buf, rest, *ci, h);
            physics.kick(level, buf, *ci, rest, h);
        }
        physics.kick(level, buf, rest, rest, h);
    }

    if !rest.is_empty() {
        physics.drift(level, buf, rest, t1, h / 2.0);
    }

    run_half(
        level,
        buf,
        &components,
        t0 + h / 2.0,
        t1,
        h / 2.0,
        inttype,
        recentersub,
        physics,
        diag,
        config,
    )?;

    if recentered {
        let advanced_pos = cmpos + cmvel * h;
        physics.move_system(buf, view, advanced_pos, cmvel, 1);
    }

    log::debug!("leaving evolve level={level}");
    Ok(())
}

/// One half-step over every component (§4.D steps 3 and 9). Components eligible for parallel
/// dispatch (§4.E) get a private scratch copy and run through `rayon`'s `par_iter_mut` — the same
/// idiom this crate's ancestor reaches for when it needs safe, disjoint, concurrent mutation of
/// a `Vec`, rather than a hand-rolled `rayon::scope`/task-spawn tree. Non-eligible children
/// recurse directly against `buf`, in the caller frame, with no copy at all.
#[allow(clippy::too_many_arguments)]
fn run_half(
    level: usize,
    buf: &mut [Particle],
    components: &[System],
    t0: f64,
    t1: f64,
    h: f64,
    inttype: IntegratorKind,
    recentersub: bool,
    physics: &dyn Physics,
    diag: &Diagnostics,
    config: &EvolveConfig,
) -> anyhow::Result<()> {
    let k = components.len();

    let mut batch: Vec<(System, Vec<Particle>, System)> = Vec::new();
    for ci in components {
        if dispatch::eligible(ci, config, k) {
            diag.record_task(level, ci.n);
            let (scratch, local) = dispatch::make_scratch(buf, *ci);
            batch.push((*ci, scratch, local));
        } else {
            evolve(
                level + 1,
                buf,
                *ci,
                t0,
                t1,
                h,
                inttype,
                recentersub,
                physics,
                diag,
                config,
            )?;
        }
    }

    // barrier: every task below completes before this call returns.
    batch.par_iter_mut().try_for_each(|(_, scratch, local)| {
        evolve(
            level + 1,
            scratch,
            *local,
            t0,
            t1,
            h,
            inttype,
            recentersub,
            physics,
            diag,
            config,
        )
    })?;

    for (original, scratch, local) in &batch {
        dispatch::copy_back(buf, *original, scratch, *local);
    }

    Ok(())
}
