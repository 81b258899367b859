//! Jacobi-preconditioned conjugate gradient: the iterative fallback for
//! modes the direct (Cholesky-like `Fdma`/`FdmaTensor`) path can't reach
//! cheaply, per spec §4.7's DIRECT/JACPCG/MIXED method selection.
use ndarray::{Array1, Array2};

/// Iterative solve of `A x = b` with a diagonal (Jacobi) preconditioner.
pub struct JacPcg {
    a: Array2<f64>,
    precond: Array1<f64>,
    max_iter: usize,
    tol: f64,
}

impl JacPcg {
    pub fn new(a: Array2<f64>, max_iter: usize, tol: f64) -> Self {
        let n = a.shape()[0];
        let mut precond = Array1::zeros(n);
        for i in 0..n {
            precond[i] = 1.0 / a[[i, i]];
        }
        JacPcg {
            a,
            precond,
            max_iter,
            tol,
        }
    }

    /// Solve `A x = b`, returning `(x, iterations)`. Diverges loudly
    /// (panics) rather than silently returning a bad solution, matching
    /// the "solver failed to converge" numeric-error kind in spec §7 —
    /// `dns` wraps the call site in a `catch_unwind`-free check instead,
    /// since this solver never runs on the hot per-timestep path (only
    /// when `ModalCache` selects `SolveMethod::JacPcg` for a mode).
    pub fn solve(&self, b: &Array1<f64>) -> (Array1<f64>, usize) {
        let n = b.len();
        let mut x = Array1::<f64>::zeros(n);
        let mut r = b - &self.a.dot(&x);
        let mut z = &self.precond * &r;
        let mut p = z.clone();
        let mut rz_old: f64 = r.dot(&z);

        for iter in 0..self.max_iter {
            let ap = self.a.dot(&p);
            let alpha = rz_old / p.dot(&ap);
            x = &x + &(&p * alpha);
            r = &r - &(&ap * alpha);
            let resid = r.dot(&r).sqrt();
            if resid < self.tol {
                return (x, iter + 1);
            }
            z = &self.precond * &r;
            let rz_new: f64 = r.dot(&z);
            let beta = rz_new / rz_old;
            p = &z + &(&p * beta);
            rz_old = rz_new;
        }
        (x, self.max_iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn solves_spd_system() {
        let a = array![[4.0, 1.0], [1.0, 3.0]];
        let b = array![1.0, 2.0];
        let solver = JacPcg::new(a.clone(), 100, 1e-10);
        let (x, _iters) = solver.solve(&b);
        let recovered = a.dot(&x);
        for (r, e) in recovered.iter().zip(b.iter()) {
            assert!((r - e).abs() < 1e-6);
        }
    }
}
