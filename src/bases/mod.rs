//! Collocation/spectral bases: Chebyshev (wall-normal), its Dirichlet/Neumann
//! composites, and the real/complex Fourier pair used along the homogeneous
//! direction (C3's real 1-D FFT driver sits on top of [`FourierR2c`]).
pub mod chebyshev;
pub mod composite;
pub mod fourier;

pub use chebyshev::{ChebDirichlet, ChebNeumann, Chebyshev, StencilChebyshev};
pub use composite::Composite;
pub use fourier::{FourierC2c, FourierR2c};

use crate::Real;
use ndarray::{Array1, Array2, ArrayBase, Data, DataMut, Dimension, RawDataClone, RemoveAxis};
use std::marker::PhantomData;

/// Transform a single array axis between physical and spectral
/// representation. `PhType`/`SpType` differ only for the Fourier bases
/// (real physical values, complex spectral coefficients); for Chebyshev
/// both are `Real`.
pub trait Transform {
    type PhType;
    type SpType;

    fn forward<R, S, D>(&mut self, input: &mut ArrayBase<R, D>, output: &mut ArrayBase<S, D>, axis: usize)
    where
        R: Data<Elem = Self::PhType> + DataMut + RawDataClone,
        S: Data<Elem = Self::SpType> + DataMut,
        D: Dimension + RemoveAxis;

    fn backward<R, S, D>(&mut self, input: &mut ArrayBase<R, D>, output: &mut ArrayBase<S, D>, axis: usize)
    where
        R: Data<Elem = Self::SpType> + DataMut + RawDataClone,
        S: Data<Elem = Self::PhType> + DataMut,
        D: Dimension + RemoveAxis;

    /// Differentiate `n_times` in spectral space along `axis`.
    fn differentiate<T, R, S, D>(&self, input: &ArrayBase<R, D>, output: &mut ArrayBase<S, D>, n_times: usize, axis: usize)
    where
        T: ndarray::LinalgScalar + Send,
        f64: Into<T>,
        R: Data<Elem = T>,
        S: Data<Elem = T> + DataMut,
        D: Dimension;
}

/// Size/grid metadata common to every basis.
pub trait BaseBasics {
    fn len_phys(&self) -> usize;
    fn len_spec(&self) -> usize;
    fn coords(&self) -> Array1<Real>;
}

/// Dense matrix operators a basis needs to feed the modal matrix system
/// (C7): mass matrix, the collocation Laplacian, its pseudoinverse, and an
/// "eye" operator used to re-insert the two rows a Chebyshev pseudoinverse
/// drops.
pub trait LaplacianInverse {
    fn mass(&self) -> Array2<Real>;
    fn laplace(&self) -> Array2<Real>;
    fn laplace_inv(&self) -> Array2<Real>;
    fn laplace_inv_eye(&self) -> Array2<Real>;
}

/// Composite-basis wrapper: either a Dirichlet or a Neumann Chebyshev
/// composite. A single enum, rather than a trait object, because the
/// modal matrix system needs to match on which BC family it's solving for.
pub enum CompositeChebyshev {
    Dirichlet(ChebDirichlet),
    Neumann(ChebNeumann),
}

/// One basis along one array axis, generic over the field's numeric type
/// `T` (`f64` for scalar fields, used as `Complex<f64>`'s real component
/// type for complex fields). The basis objects themselves always operate
/// in `Real`; `T` only threads through [`SpaceBase`]/[`crate::field::Field`]
/// bookkeeping.
pub enum Base<T> {
    Chebyshev(Chebyshev),
    CompositeChebyshev(CompositeChebyshev),
    FourierC2c(FourierC2c),
    FourierR2c(FourierR2c),
    #[doc(hidden)]
    _Marker(PhantomData<T>),
}

impl<T> BaseBasics for Base<T> {
    fn len_phys(&self) -> usize {
        match self {
            Base::Chebyshev(b) => b.n,
            Base::CompositeChebyshev(CompositeChebyshev::Dirichlet(b)) => b.n,
            Base::CompositeChebyshev(CompositeChebyshev::Neumann(b)) => b.n,
            Base::FourierC2c(b) => b.len_phys(),
            Base::FourierR2c(b) => b.len_phys(),
            Base::_Marker(_) => unreachable!(),
        }
    }
    fn len_spec(&self) -> usize {
        match self {
            Base::Chebyshev(b) => b.m,
            Base::CompositeChebyshev(CompositeChebyshev::Dirichlet(b)) => b.m,
            Base::CompositeChebyshev(CompositeChebyshev::Neumann(b)) => b.m,
            Base::FourierC2c(b) => b.len_spec(),
            Base::FourierR2c(b) => b.len_spec(),
            Base::_Marker(_) => unreachable!(),
        }
    }
    fn coords(&self) -> Array1<Real> {
        match self {
            Base::Chebyshev(b) => b.x.clone(),
            Base::CompositeChebyshev(CompositeChebyshev::Dirichlet(b)) => b.coords().clone(),
            Base::CompositeChebyshev(CompositeChebyshev::Neumann(b)) => b.coords().clone(),
            Base::FourierC2c(b) => b.coords(),
            Base::FourierR2c(b) => b.coords(),
            Base::_Marker(_) => unreachable!(),
        }
    }
}

impl<T> LaplacianInverse for Base<T> {
    fn mass(&self) -> Array2<Real> {
        match self {
            Base::Chebyshev(b) => b.mass(),
            Base::CompositeChebyshev(CompositeChebyshev::Dirichlet(b)) => b.parent_mass(),
            Base::CompositeChebyshev(CompositeChebyshev::Neumann(b)) => b.parent_mass(),
            Base::FourierC2c(b) => b.mass(),
            Base::FourierR2c(b) => b.mass(),
            Base::_Marker(_) => unreachable!(),
        }
    }
    fn laplace(&self) -> Array2<Real> {
        match self {
            Base::Chebyshev(b) => b.laplace(),
            Base::CompositeChebyshev(CompositeChebyshev::Dirichlet(b)) => b.parent_laplace(),
            Base::CompositeChebyshev(CompositeChebyshev::Neumann(b)) => b.parent_laplace(),
            Base::FourierC2c(b) => b.laplace(),
            Base::FourierR2c(b) => b.laplace(),
            Base::_Marker(_) => unreachable!(),
        }
    }
    fn laplace_inv(&self) -> Array2<Real> {
        match self {
            Base::Chebyshev(b) => b.laplace_inv(),
            Base::CompositeChebyshev(CompositeChebyshev::Dirichlet(b)) => b.parent_laplace_inv(),
            Base::CompositeChebyshev(CompositeChebyshev::Neumann(b)) => b.parent_laplace_inv(),
            Base::FourierC2c(b) => b.laplace_inv(),
            Base::FourierR2c(b) => b.laplace_inv(),
            Base::_Marker(_) => unreachable!(),
        }
    }
    fn laplace_inv_eye(&self) -> Array2<Real> {
        match self {
            Base::Chebyshev(b) => b.laplace_inv_eye(),
            Base::CompositeChebyshev(CompositeChebyshev::Dirichlet(b)) => b.parent_laplace_inv_eye(),
            Base::CompositeChebyshev(CompositeChebyshev::Neumann(b)) => b.parent_laplace_inv_eye(),
            Base::FourierC2c(b) => b.laplace_inv_eye(),
            Base::FourierR2c(b) => b.laplace_inv_eye(),
            Base::_Marker(_) => unreachable!(),
        }
    }
}

/// A factored tensor-product space: one basis per dimension.
#[derive(Clone)]
pub struct SpaceBase<T, const N: usize> {
    pub bases: [Base<T>; N],
}

impl<T: Clone, const N: usize> SpaceBase<T, N> {
    pub fn new(bases: &[Base<T>; N]) -> Self
    where
        Base<T>: Clone,
    {
        SpaceBase { bases: bases.clone() }
    }

    pub fn shape_phys(&self) -> [usize; N] {
        std::array::from_fn(|i| self.bases[i].len_phys())
    }

    pub fn shape_spec(&self) -> [usize; N] {
        std::array::from_fn(|i| self.bases[i].len_spec())
    }
}

/// Construct an orthonormal Chebyshev basis.
pub fn chebyshev<T>(n: usize) -> Base<T> {
    Base::Chebyshev(Chebyshev::new(n))
}

/// Construct a homogeneous-Dirichlet Chebyshev composite basis.
pub fn cheb_dirichlet<T>(n: usize) -> Base<T> {
    Base::CompositeChebyshev(CompositeChebyshev::Dirichlet(ChebDirichlet::new(n)))
}

/// Construct a homogeneous-Neumann Chebyshev composite basis.
pub fn cheb_neumann<T>(n: usize) -> Base<T> {
    Base::CompositeChebyshev(CompositeChebyshev::Neumann(ChebNeumann::new(n)))
}

/// Construct the orthonormal-parent Chebyshev basis used as the lifting
/// space for an inhomogeneous boundary condition (see `field::Field::set_bc`).
pub fn cheb_dirichlet_bc<T>(n: usize) -> Base<T> {
    Base::Chebyshev(Chebyshev::new(n))
}

/// Construct a real-to-complex Fourier basis of physical length `n`.
pub fn fourier_r2c<T>(n: usize) -> Base<T> {
    Base::FourierR2c(FourierR2c::new(n))
}

/// Construct a complex-to-complex Fourier basis of physical length `n`.
pub fn fourier_c2c<T>(n: usize) -> Base<T> {
    Base::FourierC2c(FourierC2c::new(n))
}
