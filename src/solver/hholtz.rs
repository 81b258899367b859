//! Helmholtz solver: `(lambda^2 I - D2) x = f`, the per-mode left-hand
//! side of the implicit viscous/diffusive substep in `dns::Dns::integrate`
//! (spec §4.4's BDF time-derivative term folded into `lambda^2`).
use super::utils::vec_to_array;
use super::{FdmaTensor, MatVec};
use crate::bases::{BaseBasics, LaplacianInverse, SpaceBase};
use crate::solver::Solve;
use crate::Base;
use crate::SolverScalar;
use ndarray::prelude::*;
use std::ops::{Add, Div, Mul};

/// Container for the Helmholtz solver, one instance per `(lambda^2, mode)`
/// pair; cached by [`super::modal::ModalCache`].
#[derive(Clone)]
pub struct Hholtz<T, const N: usize> {
    solver: Box<FdmaTensor<N>>,
    matvec: Vec<Option<MatVec<T>>>,
    /// The outermost dimension's dense left-hand side, kept around for
    /// [`SolveMethod::JacPcg`](crate::solver::SolveMethod::JacPcg) to build
    /// its iterative operator from, rather than re-deriving it from the base.
    dense: Array2<f64>,
}

impl<const N: usize> Hholtz<f64, N> {
    pub fn from_space(space: &SpaceBase<f64, N>, lambda2: f64, c: [f64; N]) -> Self {
        let vec = space
            .bases
            .iter()
            .zip(c.iter())
            .map(|(base, ci)| Self::matrix_from_base(base, *ci, lambda2))
            .collect::<Vec<_>>();
        let a_vec: Vec<Array2<f64>> = vec.iter().map(|(a, _)| a.clone()).collect();
        let c_vec: Vec<Array2<f64>> = vec.iter().map(|(_, c)| c.clone()).collect();
        let is_diag: Vec<bool> = space
            .bases
            .iter()
            .map(|b| matches!(b, Base::FourierC2c(_) | Base::FourierR2c(_)))
            .collect();
        let dense = a_vec[N - 1].clone();

        let a = vec_to_array::<&Array2<f64>, N>(a_vec.iter().collect());
        let arr_c = vec_to_array::<&Array2<f64>, N>(c_vec.iter().collect());
        let diag = vec_to_array::<&bool, N>(is_diag.iter().collect());
        let solver = Box::new(FdmaTensor::from_matrix(a, arr_c, diag));

        let matvec: Vec<Option<MatVec<f64>>> = space
            .bases
            .iter()
            .map(|base| Self::matvec_from_base(base))
            .collect();

        Hholtz { solver, matvec, dense }
    }

    /// The dense outermost-dimension operator (the one `FdmaTensor`
    /// banded-factors), for [`SolveMethod::JacPcg`](crate::solver::SolveMethod::JacPcg)
    /// to slice its reduced interior system from.
    pub fn dense_matrix(&self) -> &Array2<f64> {
        &self.dense
    }

    /// Pre-multiply a right-hand side by the same matrix-vector step
    /// `solve` applies before handing off to the banded/iterative solve,
    /// so a [`SolveMethod::JacPcg`](crate::solver::SolveMethod::JacPcg)
    /// caller can reduce its own input identically.
    pub fn reduced_rhs<A>(&self, input: &ndarray::Array1<A>) -> ndarray::Array1<A>
    where
        A: crate::SolverScalar + Mul<f64, Output = A> + Add<f64, Output = A>,
    {
        match &self.matvec[0] {
            Some(mv) => mv.solve(input, 0),
            None => input.to_owned(),
        }
    }

    fn matrix_from_base(base: &Base<f64>, c: f64, lambda2: f64) -> (Array2<f64>, Array2<f64>) {
        let mass = base.mass();
        let lap = base.laplace();
        let pinv = base.laplace_inv();
        let eye = base.laplace_inv_eye();
        match base {
            Base::Chebyshev(_) | Base::CompositeChebyshev(_) => {
                let a = eye.dot(&mass) * lambda2 - eye.dot(&pinv).dot(&(&mass * c));
                (a, eye.dot(&mass))
            }
            Base::FourierC2c(_) | Base::FourierR2c(_) => (lap * c - &mass * lambda2, mass),
        }
    }

    fn matvec_from_base(base: &Base<f64>) -> Option<MatVec<f64>> {
        use crate::solver::MatVecDot;
        match base {
            Base::Chebyshev(_) | Base::CompositeChebyshev(_) => {
                let pinv = base.laplace_inv();
                let mat = pinv.slice(ndarray::s![2.., ..]).to_owned();
                Some(MatVec::MatVecDot(MatVecDot::new(&mat)))
            }
            Base::FourierC2c(_) | Base::FourierR2c(_) => None,
        }
    }
}

#[allow(unused_variables)]
impl<A> Solve<A, Ix1> for Hholtz<f64, 1>
where
    A: SolverScalar + Div<f64, Output = A> + Mul<f64, Output = A> + Add<f64, Output = A> + From<f64>,
{
    fn solve<S1, S2>(&self, input: &ArrayBase<S1, Ix1>, output: &mut ArrayBase<S2, Ix1>, axis: usize)
    where
        S1: ndarray::Data<Elem = A>,
        S2: ndarray::Data<Elem = A> + ndarray::DataMut,
    {
        if let Some(matvec) = &self.matvec[0] {
            let buffer = matvec.solve(input, 0);
            self.solver.solve(&buffer, output, 0);
        } else {
            self.solver.solve(input, output, 0);
        }
    }
}

#[allow(unused_variables)]
impl<A> Solve<A, Ix2> for Hholtz<f64, 2>
where
    A: SolverScalar + Div<f64, Output = A> + Mul<f64, Output = A> + Add<f64, Output = A> + From<f64>,
{
    fn solve<S1, S2>(&self, input: &ArrayBase<S1, Ix2>, output: &mut ArrayBase<S2, Ix2>, axis: usize)
    where
        S1: ndarray::Data<Elem = A>,
        S2: ndarray::Data<Elem = A> + ndarray::DataMut,
    {
        let mut rhs = self.matvec[0]
            .as_ref()
            .map_or_else(|| input.to_owned(), |x| x.solve(input, 0));
        if let Some(x) = &self.matvec[1] {
            rhs = x.solve(&rhs, 1);
        }
        self.solver.solve(&rhs, output, 0);
    }
}
