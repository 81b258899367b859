//! Modal matrix system cache (C7), grounded on `original_source/src/matrix.cpp`'s
//! `ModalMatrixSys`: rather than build a fresh Helmholtz/Poisson operator
//! for every Fourier mode of every field, dedup by `(lambda2, betak2)` and
//! share the solver object across modes/fields whose left-hand side is
//! bit-for-bit the same.
use crate::bases::SpaceBase;
use crate::solver::{Hholtz, JacPcg, Poisson};
use std::collections::HashMap;

/// Iterations and residual tolerance for the `JacPcg` solvers this cache
/// builds; matching `matrix.cpp`'s fixed iterative-solve budget rather than
/// threading a configurable knob through every call site.
const JACPCG_MAX_ITER: usize = 500;
const JACPCG_TOL: f64 = 1e-10;

/// Which family of solver to build for a mode; `Mixed` matches
/// `matrix.cpp`'s `MIXED` method: mode 0 gets the direct solve, every
/// other mode gets the iterative one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveMethod {
    Direct,
    JacPcg,
    Mixed,
}

impl SolveMethod {
    /// Resolve `Mixed` into a concrete per-mode choice.
    pub fn for_mode(self, mode: usize) -> SolveMethod {
        match self {
            SolveMethod::Mixed if mode == 0 => SolveMethod::Direct,
            SolveMethod::Mixed => SolveMethod::JacPcg,
            other => other,
        }
    }
}

/// Cache key: a mode's left-hand side is fully determined by `lambda2`
/// and `betak2` (the squared effective Fourier wavenumber, after SVV
/// weighting) once the basis set is fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CacheKey {
    lambda2_bits: u64,
    betak2_bits: u64,
}

impl CacheKey {
    fn new(lambda2: f64, betak2: f64) -> Self {
        CacheKey {
            lambda2_bits: lambda2.to_bits(),
            betak2_bits: betak2.to_bits(),
        }
    }
}
impl Eq for CacheKey {}
impl std::hash::Hash for CacheKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.lambda2_bits.hash(state);
        self.betak2_bits.hash(state);
    }
}

/// Deduplicating cache of 2-D modal solvers (one cross-section operator
/// per distinct `(lambda2, betak2)` pair actually encountered).
pub struct ModalCache<const N: usize> {
    direct: HashMap<CacheKey, Poisson<f64, N>>,
    hholtz: HashMap<CacheKey, Hholtz<f64, N>>,
    direct_jacpcg: HashMap<CacheKey, JacPcg>,
    hholtz_jacpcg: HashMap<CacheKey, JacPcg>,
}

impl<const N: usize> Default for ModalCache<N> {
    fn default() -> Self {
        ModalCache {
            direct: HashMap::new(),
            hholtz: HashMap::new(),
            direct_jacpcg: HashMap::new(),
            hholtz_jacpcg: HashMap::new(),
        }
    }
}

impl ModalCache<1> {
    /// Fetch or build the Poisson solver (`lambda2 == 0`) for this
    /// `betak2`, sharing across modes/fields with the same key.
    pub fn poisson(&mut self, space: &SpaceBase<f64, 1>, betak2: f64) -> &Poisson<f64, 1> {
        let key = CacheKey::new(0.0, betak2);
        self.direct
            .entry(key)
            .or_insert_with(|| Poisson::from_space(space, [1.0 + betak2]))
    }

    /// Fetch or build the Helmholtz solver for `(lambda2, betak2)`.
    pub fn helmholtz(&mut self, space: &SpaceBase<f64, 1>, lambda2: f64, betak2: f64) -> &Hholtz<f64, 1> {
        let key = CacheKey::new(lambda2, betak2);
        self.hholtz
            .entry(key)
            .or_insert_with(|| Hholtz::from_space(space, lambda2 + betak2, [1.0]))
    }

    /// Fetch or build the `JacPcg` solver for the Poisson operator at this
    /// `betak2`, sliced to its non-singular interior (the leading two rows
    /// and columns, reserved for boundary bordering, are structurally zero).
    pub fn poisson_jacpcg(&mut self, space: &SpaceBase<f64, 1>, betak2: f64) -> &JacPcg {
        let key = CacheKey::new(0.0, betak2);
        if !self.direct_jacpcg.contains_key(&key) {
            let dense = self.poisson(space, betak2).dense_matrix().clone();
            let interior = dense.slice(ndarray::s![2.., 2..]).to_owned();
            self.direct_jacpcg
                .insert(key, JacPcg::new(interior, JACPCG_MAX_ITER, JACPCG_TOL));
        }
        self.direct_jacpcg.get(&key).expect("just inserted")
    }

    /// Fetch or build the `JacPcg` solver for the Helmholtz operator at
    /// `(lambda2, betak2)`, sliced the same way as [`Self::poisson_jacpcg`].
    pub fn helmholtz_jacpcg(&mut self, space: &SpaceBase<f64, 1>, lambda2: f64, betak2: f64) -> &JacPcg {
        let key = CacheKey::new(lambda2, betak2);
        if !self.hholtz_jacpcg.contains_key(&key) {
            let dense = self.helmholtz(space, lambda2, betak2).dense_matrix().clone();
            let interior = dense.slice(ndarray::s![2.., 2..]).to_owned();
            self.hholtz_jacpcg
                .insert(key, JacPcg::new(interior, JACPCG_MAX_ITER, JACPCG_TOL));
        }
        self.hholtz_jacpcg.get(&key).expect("just inserted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bases::cheb_dirichlet;

    #[test]
    fn shares_solver_across_identical_modes() {
        let mut cache = ModalCache::<1>::default();
        let space = SpaceBase::new(&[cheb_dirichlet::<f64>(16)]);
        let _ = cache.helmholtz(&space, 1.0, 4.0);
        assert_eq!(cache.hholtz.len(), 1);
        let _ = cache.helmholtz(&space, 1.0, 4.0);
        assert_eq!(cache.hholtz.len(), 1, "identical (lambda2, betak2) must reuse the cached solver");
        let _ = cache.helmholtz(&space, 1.0, 9.0);
        assert_eq!(cache.hholtz.len(), 2);
    }

    #[test]
    fn jacpcg_solver_is_shared_across_identical_modes() {
        let mut cache = ModalCache::<1>::default();
        let space = SpaceBase::new(&[cheb_dirichlet::<f64>(10)]);
        let _ = cache.poisson_jacpcg(&space, 4.0);
        assert_eq!(cache.direct_jacpcg.len(), 1);
        let _ = cache.poisson_jacpcg(&space, 4.0);
        assert_eq!(cache.direct_jacpcg.len(), 1, "identical betak2 must reuse the cached JacPcg solver");
        let _ = cache.poisson_jacpcg(&space, 9.0);
        assert_eq!(cache.direct_jacpcg.len(), 2);
    }

    #[test]
    fn for_mode_resolves_mixed_to_direct_only_at_mode_zero() {
        assert_eq!(SolveMethod::Mixed.for_mode(0), SolveMethod::Direct);
        assert_eq!(SolveMethod::Mixed.for_mode(1), SolveMethod::JacPcg);
        assert_eq!(SolveMethod::Mixed.for_mode(7), SolveMethod::JacPcg);
        assert_eq!(SolveMethod::Direct.for_mode(3), SolveMethod::Direct);
        assert_eq!(SolveMethod::JacPcg.for_mode(0), SolveMethod::JacPcg);
    }
}
