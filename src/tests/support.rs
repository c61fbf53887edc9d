/// ==============================================================================================
/// ==================================== Toy physics double =========================================
/// ==============================================================================================
///
/// A small `Physics` implementation used only by the tests in this module tree. `timestep` is
/// driven by an explicit per-pair override table so scenarios can dial in exactly the time-step
/// graph they want to exercise; `drift`/`kick` fall back to a plain direct-sum point-mass gravity
/// so the evolver's drift-kick-drift scheme has something physically sensible to integrate;
/// `evolve_kepler` is an exact analytic stepper for a circular two-body orbit, sufficient for the
/// Kepler-shortcut scenario without pulling in a general Kepler solver.

use std::collections::HashMap;

use crate::model::{Particle, System, Vector3};
use crate::physics::Physics;

pub struct ToyPhysics {
    pub g: f64,
    pub softening2: f64,
    default_timestep: f64,
    overrides: HashMap<(u64, u64), f64>,
}

impl ToyPhysics {
    pub fn new(default_timestep: f64) -> Self {
        Self {
            g: 1.0,
            softening2: 1e-9,
            default_timestep,
            overrides: HashMap::new(),
        }
    }

    fn key(a: u64, b: u64) -> (u64, u64) {
        if a < b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Override the time-step reported for the unordered pair `(a, b)`.
    pub fn set_timestep(&mut self, a: u64, b: u64, ts: f64) {
        self.overrides.insert(Self::key(a, b), ts);
    }

    fn leapfrog(&self, buf: &mut [Particle], view: System, h: f64, substeps: u32) {
        let sub_h = h / substeps as f64;
        for _ in 0..substeps {
            self.kick(0, buf, view, view, sub_h / 2.0);
            self.drift(0, buf, view, 0.0, sub_h);
            self.kick(0, buf, view, view, sub_h / 2.0);
        }
    }
}

impl Physics for ToyPhysics {
    fn timestep(&self, p: &Particle, q: &Particle, _dir: i32) -> f64 {
        self.overrides
            .get(&Self::key(p.id, q.id))
            .copied()
            .unwrap_or(self.default_timestep)
    }

    fn drift(&self, _level: usize, buf: &mut [Particle], view: System, _t_target: f64, h: f64) {
        for i in 0..view.n {
            let p = view.get_mut(buf, i);
            let dv = p.vel;
            p.pos += dv * h;
        }
    }

    fn kick(&self, _level: usize, buf: &mut [Particle], sink: System, src: System, h: f64) {
        let sources: Vec<Particle> = src.iter(buf).copied().collect();
        for i in 0..sink.n {
            let pi = *sink.get(buf, i);
            let mut dv = Vector3::ZERO;
            for pj in &sources {
                if pj.id == pi.id {
                    continue;
                }
                let d = pj.pos - pi.pos;
                let r2 = d.norm2() + self.softening2;
                let r = r2.sqrt();
                dv += d * (self.g * pj.mass / (r2 * r));
            }
            sink.get_mut(buf, i).vel += dv * h;
        }
    }

    fn evolve_kepler(
        &self,
        _level: usize,
        buf: &mut [Particle],
        view: System,
        _t0: f64,
        _t1: f64,
        h: f64,
    ) -> anyhow::Result<()> {
        if view.n != 2 {
            anyhow::bail!("toy evolve_kepler only supports two-body views (n={})", view.n);
        }
        let (com_pos, com_vel) = self.center_of_mass(buf, view);

        let p0 = *view.get(buf, 0);
        let p1 = *view.get(buf, 1);
        let mtot = p0.mass + p1.mass;
        if mtot <= 0.0 {
            anyhow::bail!("toy evolve_kepler requires at least one massive body");
        }

        let rel_pos = p1.pos - p0.pos;
        let rel_vel = p1.vel - p0.vel;
        let r = rel_pos.norm();
        if r <= 0.0 {
            anyhow::bail!("toy evolve_kepler: coincident bodies");
        }
        let omega = (self.g * mtot / r.powi(3)).sqrt();
        let theta = omega * h;
        let (c, s) = (theta.cos(), theta.sin());
        let rotate = |v: Vector3| Vector3::new(v.x * c - v.y * s, v.x * s + v.y * c, v.z);

        let new_rel_pos = rotate(rel_pos);
        let new_rel_vel = rotate(rel_vel);
        let new_com_pos = com_pos + com_vel * h;

        let p0_mut = view.get_mut(buf, 0);
        p0_mut.pos = new_com_pos - new_rel_pos * (p1.mass / mtot);
        p0_mut.vel = com_vel - new_rel_vel * (p1.mass / mtot);

        let p1_mut = view.get_mut(buf, 1);
        p1_mut.pos = new_com_pos + new_rel_pos * (p0.mass / mtot);
        p1_mut.vel = com_vel + new_rel_vel * (p0.mass / mtot);

        Ok(())
    }

    fn evolve_bs(
        &self,
        _level: usize,
        buf: &mut [Particle],
        view: System,
        _t0: f64,
        _t1: f64,
        h: f64,
    ) -> anyhow::Result<()> {
        self.leapfrog(buf, view, h, 8);
        Ok(())
    }

    fn evolve_bs_adaptive(
        &self,
        _level: usize,
        buf: &mut [Particle],
        view: System,
        _t0: f64,
        _t1: f64,
        h: f64,
    ) -> anyhow::Result<()> {
        self.leapfrog(buf, view, h, 16);
        Ok(())
    }
}

pub fn particle(id: u64, mass: f64, pos: Vector3, vel: Vector3) -> Particle {
    Particle::new(id, mass, pos, vel)
}
