//! Spectral-element / Fourier DNS engine for incompressible Navier-Stokes.
//!
//! Cross-sections are discretised with Chebyshev collocation (wall-normal)
//! composed with a spectral-element mesh (`element`); the third,
//! homogeneous direction is expanded in Fourier modes (`transform`,
//! `bases::fourier`) and advanced with the stiffly-stable splitting scheme
//! in `dns`/`integrate`.
pub mod advection;
pub mod analyser;
pub mod bases;
pub mod boundary;
pub mod config;
pub mod dns;
pub mod element;
pub mod error;
pub mod exchange;
pub mod expr;
pub mod field;
pub mod forcing;
pub mod integrate;
pub mod integration;
pub mod io;
pub mod pbc;
pub mod session;
pub mod solver;
pub mod transform;

pub use bases::{
    cheb_dirichlet, cheb_dirichlet_bc, cheb_neumann, chebyshev, fourier_c2c, fourier_r2c, Base,
};
pub use field::{Field, Field1, Field2, Field2Complex, ReadField, WriteField};
pub use integrate::{integrate, Integrate};

/// Floating-point type used throughout the engine. A single alias, not a
/// generic parameter, because the spectral operators (DCT/FFT handlers)
/// are only implemented for `f64` by the crates we build on.
pub type Real = f64;

/// Element type a field/solver can be instantiated over: `Real` for
/// velocity/pressure/scalar fields, `Complex<Real>` for fields that have
/// already crossed a Fourier transform.
pub trait SolverScalar:
    num_traits::Zero
    + Copy
    + Clone
    + Send
    + Sync
    + std::fmt::Debug
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<Output = Self>
    + 'static
{
}

impl SolverScalar for f64 {}
impl SolverScalar for num_complex::Complex<f64> {}
