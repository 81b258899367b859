//! Modal matrix system (C7): per-Fourier-mode Helmholtz/Poisson solves.
//!
//! `Solve` is the common interface every concrete solver (banded,
//! tensor-product, matrix-vector) exposes to `field`; `hholtz`/`poisson`
//! build the left-hand-side operator once per mode and cache it, `jacpcg`
//! is the iterative fallback for modes the direct path can't handle
//! cheaply, and `modal` is the selection/cache layer described in spec §4.7.
pub mod fdma;
pub mod fdma_tensor;
pub mod hholtz;
pub mod jacpcg;
pub mod modal;
pub mod poisson;
pub mod utils;

pub use fdma::Fdma;
pub use fdma_tensor::FdmaTensor;
pub use hholtz::Hholtz;
pub use jacpcg::JacPcg;
pub use modal::{ModalCache, SolveMethod};
pub use poisson::Poisson;

use ndarray::{Array2, ArrayBase, Data, DataMut, Dimension};

/// Solve `A x = b` along a given array axis.
pub trait Solve<A, D: Dimension> {
    fn solve<S1, S2>(&self, input: &ArrayBase<S1, D>, output: &mut ArrayBase<S2, D>, axis: usize)
    where
        S1: Data<Elem = A>,
        S2: Data<Elem = A> + DataMut;
}

/// Dispatches to whichever concrete `Solve` implementation a mode selected
/// (see [`SolveMethod`]); lets `field` hold a single solver handle per base
/// regardless of which family was chosen for it.
pub enum SolveReturn<'a, T, const N: usize> {
    Poisson(&'a Poisson<T, N>),
    Hholtz(&'a Hholtz<T, N>),
}

/// A dense matrix-vector multiply, used to pre/post-multiply the
/// right-hand side before handing it to a banded solve (e.g. by a
/// Chebyshev pseudoinverse).
pub enum MatVec<T> {
    MatVecDot(MatVecDot<T>),
}

impl<T> MatVec<T>
where
    T: crate::SolverScalar + std::ops::Mul<f64, Output = T> + std::ops::Add<f64, Output = T>,
{
    pub fn solve<S, D: Dimension>(&self, input: &ArrayBase<S, D>, axis: usize) -> ndarray::Array<T, D>
    where
        S: Data<Elem = T>,
        D: Dimension + ndarray::RemoveAxis,
    {
        match self {
            MatVec::MatVecDot(m) => m.solve(input, axis),
        }
    }
}

/// Matrix-vector multiply along a given axis via a cached dense matrix.
#[derive(Clone)]
pub struct MatVecDot<T> {
    mat: Array2<f64>,
    _marker: std::marker::PhantomData<T>,
}

impl<T> MatVecDot<T> {
    pub fn new(mat: &Array2<f64>) -> Self {
        MatVecDot {
            mat: mat.to_owned(),
            _marker: std::marker::PhantomData,
        }
    }

    pub fn solve<S, D: Dimension>(&self, input: &ArrayBase<S, D>, axis: usize) -> ndarray::Array<T, D>
    where
        T: crate::SolverScalar,
        S: Data<Elem = T>,
        D: Dimension + ndarray::RemoveAxis,
    {
        let mut out_shape = input.raw_dim();
        out_shape[axis] = self.mat.shape()[0];
        let mut out = ndarray::Array::<T, D>::zeros(out_shape);
        ndarray::Zip::from(out.lanes_mut(ndarray::Axis(axis)))
            .and(input.lanes(ndarray::Axis(axis)))
            .for_each(|mut o, i| {
                for (r, row_out) in o.iter_mut().enumerate() {
                    let mut acc = T::zero();
                    for (c, val) in i.iter().enumerate() {
                        acc = acc + *val * self.mat[[r, c]];
                    }
                    *row_out = acc;
                }
            });
        out
    }
}
