//! Four-diagonal matrix solver (offsets -2, 0, 2, 4).
//!
//! The band pattern produced by a Chebyshev second-derivative operator
//! after multiplication by its pseudoinverse: symmetric-ish but not
//! tridiagonal. [`super::FdmaTensor`] composes this with an
//! eigendecomposition to reach multidimensional problems.
use ndarray::{Array1, Array2, ArrayBase, Data, DataMut};
use std::ops::{Add, Mul};

use super::Solve;

/// Banded matrix with nonzero diagonals at offsets -2, 0, 2, 4.
#[derive(Debug, Clone)]
pub struct Fdma<T> {
    n: usize,
    low2: Array1<T>,
    diag: Array1<T>,
    up2: Array1<T>,
    up4: Array1<T>,
    // LU-like forward-sweep coefficients, populated by `sweep`.
    w: Option<Array1<T>>,
    g_is_swept: bool,
}

impl Fdma<f64> {
    /// Extract the four diagonals from a dense square matrix.
    pub fn from_matrix_raw(mat: &Array2<f64>) -> Self {
        let n = mat.shape()[0];
        let mut diag = Array1::zeros(n);
        let mut low2 = Array1::zeros(n);
        let mut up2 = Array1::zeros(n);
        let mut up4 = Array1::zeros(n);
        for i in 0..n {
            diag[i] = mat[[i, i]];
            if i >= 2 {
                low2[i] = mat[[i, i - 2]];
            }
            if i + 2 < n {
                up2[i] = mat[[i, i + 2]];
            }
            if i + 4 < n {
                up4[i] = mat[[i, i + 4]];
            }
        }
        Fdma {
            n,
            low2,
            diag,
            up2,
            up4,
            w: None,
            g_is_swept: false,
        }
    }

    /// Precompute the forward-sweep coefficients once, ahead of repeated
    /// solves with the same left-hand side.
    pub fn sweep(&mut self) {
        if self.g_is_swept {
            return;
        }
        let n = self.n;
        let mut w = Array1::<f64>::zeros(n);
        let mut diag = self.diag.clone();
        for i in 2..n {
            let piv = self.low2[i] / diag[i - 2];
            diag[i] -= piv * self.up2[i - 2];
            w[i] = piv;
        }
        self.w = Some(w);
        self.diag = diag;
        self.g_is_swept = true;
    }

    /// Solve `A x = b` along `axis` of a 1-D array, consuming a prior
    /// [`Fdma::sweep`] if present, else sweeping on the fly.
    pub fn solve<S1, S2>(
        &self,
        input: &ArrayBase<S1, ndarray::Ix1>,
        output: &mut ArrayBase<S2, ndarray::Ix1>,
        _axis: usize,
    ) where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64> + DataMut,
    {
        let n = self.n;
        let mut rhs: Array1<f64> = input.to_owned();
        let diag = &self.diag;
        if let Some(w) = &self.w {
            for i in 2..n {
                rhs[i] -= w[i] * rhs[i - 2];
            }
        }
        let mut x = Array1::<f64>::zeros(n);
        if n >= 1 {
            x[n - 1] = rhs[n - 1] / diag[n - 1];
        }
        if n >= 2 {
            x[n - 2] = rhs[n - 2] / diag[n - 2];
        }
        for i in (0..n.saturating_sub(2)).rev() {
            let mut rhs_i = rhs[i];
            if i + 2 < n {
                rhs_i -= self.up2[i] * x[i + 2];
            }
            if i + 4 < n {
                rhs_i -= self.up4[i] * x[i + 4];
            }
            x[i] = rhs_i / diag[i];
        }
        output.assign(&x);
    }
}

impl Add<&Fdma<f64>> for &Fdma<f64> {
    type Output = Fdma<f64>;
    fn add(self, rhs: &Fdma<f64>) -> Fdma<f64> {
        Fdma {
            n: self.n,
            low2: &self.low2 + &rhs.low2,
            diag: &self.diag + &rhs.diag,
            up2: &self.up2 + &rhs.up2,
            up4: &self.up4 + &rhs.up4,
            w: None,
            g_is_swept: false,
        }
    }
}

impl Mul<f64> for &Fdma<f64> {
    type Output = Fdma<f64>;
    fn mul(self, rhs: f64) -> Fdma<f64> {
        Fdma {
            n: self.n,
            low2: &self.low2 * rhs,
            diag: &self.diag * rhs,
            up2: &self.up2 * rhs,
            up4: &self.up4 * rhs,
            w: None,
            g_is_swept: false,
        }
    }
}

impl Solve<f64, ndarray::Ix1> for Fdma<f64> {
    fn solve<S1, S2>(
        &self,
        input: &ArrayBase<S1, ndarray::Ix1>,
        output: &mut ArrayBase<S2, ndarray::Ix1>,
        axis: usize,
    ) where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64> + DataMut,
    {
        Fdma::solve(self, input, output, axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn recovers_identity() {
        let mat = Array2::<f64>::eye(6);
        let mut fdma = Fdma::from_matrix_raw(&mat);
        fdma.sweep();
        let b = array![1., 2., 3., 4., 5., 6.];
        let mut x = Array1::zeros(6);
        fdma.solve(&b, &mut x, 0);
        for (a, e) in x.iter().zip(b.iter()) {
            assert!((a - e).abs() < 1e-10);
        }
    }
}
