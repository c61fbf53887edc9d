/// ==============================================================================================
/// ==================================== System (slice view) =====================================
/// ==============================================================================================
///
/// A `System` is plain index metadata over a shared particle buffer, not an owner of storage —
/// the Rust analogue of the original's pointer-pair view. Recursion passes the same `&mut
/// [Particle]` buffer down and views into it by index; sub-components emitted by a split are
/// generally *not* contiguous with each other (each occupies a slice of the massive zone and,
/// separately, a slice of the massless zone — see `split::split`), so `part`/`last` and
/// `zeropart`/`lastzero` are tracked independently rather than as one contiguous range.
///
/// A component list is a plain `Vec<System>`; an empty vector plays the role of the original's
/// "zero view" sentinel and is never carried through pair enumeration.

use serde::{Deserialize, Serialize};

use super::particle::Particle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct System {
    pub n: usize,
    pub nzero: usize,
    pub part: usize,
    pub last: usize,
    pub zeropart: usize,
    pub lastzero: usize,
}

impl System {
    /// The null/terminal view: `n == 0`. Never itself returned in a component list; `Vec::is_empty`
    /// on the list plays that role instead.
    pub const EMPTY: System = System {
        n: 0,
        nzero: 0,
        part: 0,
        last: 0,
        zeropart: 0,
        lastzero: 0,
    };

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn massive_count(&self) -> usize {
        self.n - self.nzero
    }

    /// A view over the whole buffer, which must already be arranged massive-first (the caller's
    /// responsibility — loading/arranging the initial buffer is out of scope, see spec §1).
    pub fn whole(buf: &[Particle]) -> System {
        let nzero = buf.iter().filter(|p| p.is_massless()).count();
        let nm = buf.len() - nzero;
        debug_assert!(
            buf[..nm].iter().all(|p| !p.is_massless()) && buf[nm..].iter().all(|p| p.is_massless()),
            "System::whole requires a massive-first buffer"
        );
        System::from_bounds(buf.len(), nzero, 0, nm)
    }

    /// Build a view from counts and the start indices of the two ranges.
    pub fn from_bounds(n: usize, nzero: usize, part: usize, zeropart: usize) -> System {
        let nm = n - nzero;
        let last = if nm > 0 { part + nm - 1 } else { part };
        let lastzero = if nzero > 0 { zeropart + nzero - 1 } else { zeropart };
        System {
            n,
            nzero,
            part,
            last,
            zeropart,
            lastzero,
        }
    }

    /// §3 invariant 3: the two ranges are themselves a single contiguous run.
    pub fn contiguous(&self) -> bool {
        match (self.massive_count(), self.nzero) {
            (0, _) | (_, 0) => true,
            _ => self.zeropart == self.last + 1,
        }
    }

    #[inline]
    fn buf_index(&self, i: usize) -> usize {
        let nm = self.massive_count();
        if i < nm {
            self.part + i
        } else {
            self.zeropart + (i - nm)
        }
    }

    /// `GETPART(view, i)`: position `i` in `0..n-nzero` maps into the massive range, the rest
    /// into the massless range.
    #[inline]
    pub fn get<'a>(&self, buf: &'a [Particle], i: usize) -> &'a Particle {
        debug_assert!(i < self.n);
        &buf[self.buf_index(i)]
    }

    #[inline]
    pub fn get_mut<'a>(&self, buf: &'a mut [Particle], i: usize) -> &'a mut Particle {
        debug_assert!(i < self.n);
        &mut buf[self.buf_index(i)]
    }

    /// Borrowed iteration in view order (massive prefix, then massless suffix).
    pub fn iter<'a>(&self, buf: &'a [Particle]) -> impl Iterator<Item = &'a Particle> + 'a {
        let view = *self;
        (0..view.n).map(move |i| &buf[view.buf_index(i)])
    }

    pub fn ids(&self, buf: &[Particle]) -> Vec<u64> {
        self.iter(buf).map(|p| p.id).collect()
    }
}
