//! Fourier bases along the homogeneous (periodic) direction.
//!
//! `FourierR2c` is the workhorse: real physical data, Hermitian-symmetric
//! complex spectral coefficients, `N/2+1` complex modes stored per C3's
//! Temperton-ordered real-valued convention (see `crate::transform`).
//! `FourierC2c` is kept for complex-valued fields (e.g. an adjoint run)
//! where no Hermitian symmetry can be exploited.
use super::{BaseBasics, LaplacianInverse, Transform};
use crate::Real;
use ndarray::{Array1, Array2, ArrayBase, Data, DataMut, Dimension, RawDataClone, RemoveAxis};
use ndrustfft::{ndfft_r2c, ndifft_r2c, FftHandler, R2cFftHandler};
use num_complex::Complex;

/// Real-to-complex Fourier basis of physical length `n`.
pub struct FourierR2c {
    n: usize,
    m: usize,
    x: Array1<Real>,
    handler: R2cFftHandler<Real>,
}

impl FourierR2c {
    pub fn new(n: usize) -> Self {
        FourierR2c {
            n,
            m: n / 2 + 1,
            x: Array1::linspace(0.0, 2.0 * std::f64::consts::PI * (n - 1) as Real / n as Real, n),
            handler: R2cFftHandler::new(n),
        }
    }

    pub fn len_phys(&self) -> usize {
        self.n
    }
    pub fn len_spec(&self) -> usize {
        self.m
    }
    pub fn coords(&self) -> Array1<Real> {
        self.x.clone()
    }

    /// Mass matrix: Fourier modes are orthonormal under the discrete
    /// inner product, so this is the identity scaled by `n`.
    pub fn mass(&self) -> Array2<Real> {
        Array2::eye(self.m) * self.n as Real
    }

    /// Diagonal second-derivative operator: `-k^2` per mode.
    pub fn laplace(&self) -> Array2<Real> {
        let mut l = Array2::zeros((self.m, self.m));
        for k in 0..self.m {
            l[[k, k]] = -((k * k) as Real);
        }
        l
    }

    pub fn laplace_inv(&self) -> Array2<Real> {
        let mut inv = Array2::zeros((self.m, self.m));
        for k in 1..self.m {
            inv[[k, k]] = -1.0 / (k * k) as Real;
        }
        inv
    }

    pub fn laplace_inv_eye(&self) -> Array2<Real> {
        Array2::eye(self.m)
    }

    /// Direct access to the underlying FFT plan, for callers (e.g.
    /// `transform`) that drive `ndrustfft` without going through the
    /// `Transform` trait's array-shape plumbing.
    pub fn handler_mut(&mut self) -> &mut R2cFftHandler<Real> {
        &mut self.handler
    }
}

impl Transform for FourierR2c {
    type PhType = Real;
    type SpType = Complex<Real>;

    fn forward<R, S, D>(&mut self, input: &mut ArrayBase<R, D>, output: &mut ArrayBase<S, D>, axis: usize)
    where
        R: Data<Elem = Self::PhType> + DataMut + RawDataClone,
        S: Data<Elem = Self::SpType> + DataMut,
        D: Dimension + RemoveAxis,
    {
        ndfft_r2c(&input.view(), &mut output.view_mut(), &mut self.handler, axis);
    }

    fn backward<R, S, D>(&mut self, input: &mut ArrayBase<R, D>, output: &mut ArrayBase<S, D>, axis: usize)
    where
        R: Data<Elem = Self::SpType> + DataMut + RawDataClone,
        S: Data<Elem = Self::PhType> + DataMut,
        D: Dimension + RemoveAxis,
    {
        ndifft_r2c(&input.view(), &mut output.view_mut(), &mut self.handler, axis);
    }

    fn differentiate<T, R, S, D>(&self, input: &ArrayBase<R, D>, output: &mut ArrayBase<S, D>, n_times: usize, axis: usize)
    where
        T: ndarray::LinalgScalar + Send,
        f64: Into<T>,
        R: Data<Elem = T>,
        S: Data<Elem = T> + DataMut,
        D: Dimension,
    {
        let _ = (input, output, n_times, axis);
        unimplemented!("differentiate Fourier-space coefficients via ik multiplication at the call site (complex-valued), not through this real-typed trait method");
    }
}

/// Complex-to-complex Fourier basis of physical length `n`.
pub struct FourierC2c {
    n: usize,
    x: Array1<Real>,
    handler: FftHandler<Real>,
}

impl FourierC2c {
    pub fn new(n: usize) -> Self {
        FourierC2c {
            n,
            x: Array1::linspace(0.0, 2.0 * std::f64::consts::PI * (n - 1) as Real / n as Real, n),
            handler: FftHandler::new(n),
        }
    }

    pub fn len_phys(&self) -> usize {
        self.n
    }
    pub fn len_spec(&self) -> usize {
        self.n
    }
    pub fn coords(&self) -> Array1<Real> {
        self.x.clone()
    }
    pub fn mass(&self) -> Array2<Real> {
        Array2::eye(self.n) * self.n as Real
    }
    pub fn laplace(&self) -> Array2<Real> {
        let n = self.n;
        let mut l = Array2::zeros((n, n));
        for k in 0..n {
            let kk = if k <= n / 2 { k as isize } else { k as isize - n as isize };
            l[[k, k]] = -((kk * kk) as Real);
        }
        l
    }
    pub fn laplace_inv(&self) -> Array2<Real> {
        let n = self.n;
        let mut inv = Array2::zeros((n, n));
        for k in 0..n {
            let kk = if k <= n / 2 { k as isize } else { k as isize - n as isize };
            if kk != 0 {
                inv[[k, k]] = -1.0 / (kk * kk) as Real;
            }
        }
        inv
    }
    pub fn laplace_inv_eye(&self) -> Array2<Real> {
        Array2::eye(self.n)
    }
}

impl Transform for FourierC2c {
    type PhType = Complex<Real>;
    type SpType = Complex<Real>;

    fn forward<R, S, D>(&mut self, input: &mut ArrayBase<R, D>, output: &mut ArrayBase<S, D>, axis: usize)
    where
        R: Data<Elem = Self::PhType> + DataMut + RawDataClone,
        S: Data<Elem = Self::SpType> + DataMut,
        D: Dimension + RemoveAxis,
    {
        ndrustfft::ndfft(&input.view(), &mut output.view_mut(), &mut self.handler, axis);
    }

    fn backward<R, S, D>(&mut self, input: &mut ArrayBase<R, D>, output: &mut ArrayBase<S, D>, axis: usize)
    where
        R: Data<Elem = Self::SpType> + DataMut + RawDataClone,
        S: Data<Elem = Self::PhType> + DataMut,
        D: Dimension + RemoveAxis,
    {
        ndrustfft::ndifft(&input.view(), &mut output.view_mut(), &mut self.handler, axis);
    }

    fn differentiate<T, R, S, D>(&self, input: &ArrayBase<R, D>, output: &mut ArrayBase<S, D>, n_times: usize, axis: usize)
    where
        T: ndarray::LinalgScalar + Send,
        f64: Into<T>,
        R: Data<Elem = T>,
        S: Data<Elem = T> + DataMut,
        D: Dimension,
    {
        let _ = (input, output, n_times, axis);
        unimplemented!("differentiate Fourier-space coefficients via ik multiplication at the call site")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn r2c_mode_count() {
        let f = FourierR2c::new(8);
        assert_eq!(f.len_spec(), 5);
    }
}
