//! Small dense linear-algebra helpers backing [`super::FdmaTensor`].
//!
//! Eigendecomposition and inversion are delegated to `nalgebra`; only the
//! plumbing between `ndarray` and `nalgebra` storage lives here.
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Diagonal of a square matrix, offset `k` from the main diagonal.
pub fn diag(mat: &Array2<f64>, k: isize) -> Array1<f64> {
    let n = mat.shape()[0];
    let len = if k >= 0 {
        n - k as usize
    } else {
        n - (-k) as usize
    };
    let mut out = Array1::zeros(len);
    for i in 0..len {
        let (r, c) = if k >= 0 {
            (i, i + k as usize)
        } else {
            (i + (-k) as usize, i)
        };
        out[i] = mat[[r, c]];
    }
    out
}

fn to_dmatrix(mat: &Array2<f64>) -> DMatrix<f64> {
    let (nr, nc) = (mat.shape()[0], mat.shape()[1]);
    DMatrix::from_fn(nr, nc, |r, c| mat[[r, c]])
}

fn from_dmatrix(mat: &DMatrix<f64>) -> Array2<f64> {
    let (nr, nc) = mat.shape();
    Array2::from_shape_fn((nr, nc), |(r, c)| mat[(r, c)])
}

/// Inverse of a square matrix, via `nalgebra`'s LU decomposition.
pub fn inv(mat: &Array2<f64>) -> Array2<f64> {
    let m = to_dmatrix(mat);
    let inv = m
        .try_inverse()
        .expect("matrix in FdmaTensor construction must be invertible");
    from_dmatrix(&inv)
}

/// Eigendecomposition `mat = q * diag(l) * q^-1`, returning `(l, q, q^-1)`.
///
/// Used only on the small cross-sectional operator matrices built once at
/// solver-construction time, not in the per-timestep hot loop.
pub fn eig(mat: &Array2<f64>) -> (Array1<f64>, Array2<f64>, Array2<f64>) {
    let m = to_dmatrix(mat);
    let eig = m
        .clone()
        .try_symmetric_eigen(1e-12, 100)
        .unwrap_or_else(|| panic!("eigendecomposition failed to converge"));
    let l = Array1::from_iter(eig.eigenvalues.iter().copied());
    let q = from_dmatrix(&eig.eigenvectors);
    let q_inv = inv(&q);
    (l, q, q_inv)
}

/// Build a fixed-size array `[T; N]` from a `Vec<T>` of matching length.
pub fn vec_to_array<T: Clone, const N: usize>(v: Vec<T>) -> [T; N] {
    assert_eq!(v.len(), N, "vec_to_array: length mismatch");
    let mut iter = v.into_iter();
    std::array::from_fn(|_| iter.next().unwrap())
}
