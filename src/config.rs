//! Geometry registry (C1).
//!
//! Process-wide geometric constants, set once at startup. Grounded on
//! `original_source/src/geometry.cpp`'s `Geometry::set`; re-expressed per
//! the Design Notes as an explicit value passed through call sites rather
//! than a static singleton, with a one-shot `Geometry::new` standing in for
//! the "cannot re-initialise" contract.

use crate::error::{io_error, DnsError};

/// Coordinate system of the 2-D (x,y) cross-section; the homogeneous
/// direction (z for Cartesian, azimuth for Cylindrical) is always expanded
/// in Fourier modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordSys {
    Cartesian,
    Cylindrical,
}

/// Process-wide geometric configuration (C1).
///
/// Values here never change after construction; `step`/`time` — the only
/// intentionally-mutating process-level values per the Design Notes — live
/// on [`crate::dns::Dns`], not here.
#[derive(Debug, Clone, Copy)]
pub struct Geometry {
    /// Rank of this process within the `nproc`-way Fourier decomposition.
    pid: usize,
    /// Number of cooperating processes (ranks) sharing the z/mode axis.
    nproc: usize,
    /// Number of nodal points along one side of a reference quad element.
    np: usize,
    /// Total number of planes (points / Fourier-pair-planes) in z.
    nz: usize,
    /// Planes held locally by this rank: `nz / nproc`.
    nz_proc: usize,
    /// Number of spectral elements in the 2-D cross-section.
    nel: usize,
    /// Padded plane size: smallest integer >= np*np*nel divisible by
    /// both 2 and 2*nproc.
    psize: usize,
    coord: CoordSys,
}

fn round_up(mut n: usize, a: usize, b: usize) -> usize {
    while n % a != 0 || n % b != 0 {
        n += 1;
    }
    n
}

impl Geometry {
    /// Construct the geometry registry. Mirrors `Geometry::set`'s checks:
    /// `nz` must be even unless `nz == 1`; `nz` must be a multiple of
    /// `2*nproc`; `nproc` can be at most `nz/2`.
    pub fn new(
        pid: usize,
        nproc: usize,
        np: usize,
        nz: usize,
        nel: usize,
        coord: CoordSys,
    ) -> Result<Self, DnsError> {
        const ROUTINE: &str = "Geometry::new";

        if nz > 1 && nz % 2 != 0 {
            return Err(io_error(ROUTINE, format!("N_Z must be even ({nz})")));
        }
        if nproc > 1 {
            if nz % (2 * nproc) != 0 {
                return Err(io_error(
                    ROUTINE,
                    format!("no. of planes ({nz}) per process ({nproc}) must be even"),
                ));
            }
            if 2 * nproc > nz {
                return Err(io_error(
                    ROUTINE,
                    format!("no. of processes ({nproc}) can at most be half N_Z ({nz})"),
                ));
            }
        }

        let nz_proc = if nproc == 0 { nz } else { nz / nproc.max(1) };
        let n_plane = np * np * nel;
        let psize = if nproc > 1 {
            round_up(n_plane, 2 * nproc, 2)
        } else if nz > 1 {
            round_up(n_plane, 1, 2)
        } else {
            n_plane
        };

        Ok(Geometry {
            pid,
            nproc: nproc.max(1),
            np,
            nz,
            nz_proc,
            nel,
            psize,
            coord,
        })
    }

    pub fn pid(&self) -> usize {
        self.pid
    }
    pub fn nproc(&self) -> usize {
        self.nproc
    }
    pub fn np(&self) -> usize {
        self.np
    }
    pub fn nz(&self) -> usize {
        self.nz
    }
    pub fn nz_proc(&self) -> usize {
        self.nz_proc
    }
    pub fn nel(&self) -> usize {
        self.nel
    }
    /// Padded plane size (C3/C2 alignment invariant).
    pub fn plane_size(&self) -> usize {
        self.psize
    }
    /// Unpadded plane size, `np^2 * nel`.
    pub fn n_plane(&self) -> usize {
        self.np * self.np * self.nel
    }
    pub fn coord(&self) -> CoordSys {
        self.coord
    }
    pub fn cylindrical(&self) -> bool {
        self.coord == CoordSys::Cylindrical
    }
    /// Number of spatial dimensions: 3 if `nz > 2`, else 2.
    pub fn ndim(&self) -> usize {
        if self.nz > 2 {
            3
        } else {
            2
        }
    }
    /// Number of Fourier modes held locally.
    pub fn n_mode_proc(&self) -> usize {
        self.nz_proc / 2
    }
    /// First global mode index owned by this rank.
    pub fn base_mode(&self) -> usize {
        self.pid * self.n_mode_proc()
    }
    pub fn n_tot_proc(&self) -> usize {
        self.plane_size() * self.nz_proc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_psize_even() {
        let g = Geometry::new(0, 1, 9, 2, 8, CoordSys::Cartesian).unwrap();
        assert_eq!(g.n_plane(), 9 * 9 * 8);
        assert!(g.plane_size() >= g.n_plane());
        assert_eq!(g.plane_size() % 2, 0);
    }

    #[test]
    fn odd_nz_rejected() {
        assert!(Geometry::new(0, 1, 9, 3, 8, CoordSys::Cartesian).is_err());
    }

    #[test]
    fn nproc_limited_by_nz() {
        assert!(Geometry::new(0, 8, 9, 4, 8, CoordSys::Cartesian).is_err());
    }

    #[test]
    fn ndim_detection() {
        let g2 = Geometry::new(0, 1, 9, 1, 8, CoordSys::Cartesian).unwrap();
        assert_eq!(g2.ndim(), 2);
        let g3 = Geometry::new(0, 1, 9, 4, 8, CoordSys::Cartesian).unwrap();
        assert_eq!(g3.ndim(), 3);
    }
}
