//! Field containers (C8): physical-space data paired with its spectral
//! (coefficient) representation, plus the forward/backward transform pair
//! that keeps them in sync.
//!
//! `Field1` is a single Chebyshev line (used by 1-D solver tests),
//! `Field2` a Chebyshev x Chebyshev cross-section, and `Field2Complex` a
//! Fourier x Chebyshev field after the homogeneous direction has already
//! been transformed — the shape every velocity/pressure/scalar component
//! in `dns::Dns` actually uses.
use crate::bases::{Base, BaseBasics, SpaceBase};
use crate::error::DnsResult;
use crate::Real;
use ndarray::{Array1, Array2};
use num_complex::Complex;

/// A basis that can be driven forward/backward along a specific array axis,
/// implemented below per-variant since composite and orthogonal bases don't
/// share one calling convention (see `bases::Base`'s doc comment).
fn forward_axis(base: &mut Base<Real>, input: &mut Array1<Real>, output: &mut Array1<Real>) {
    match base {
        Base::Chebyshev(b) => {
            use crate::bases::Transform;
            b.forward(input, output, 0);
        }
        Base::CompositeChebyshev(crate::bases::CompositeChebyshev::Dirichlet(b)) => {
            b.forward(input, output, 0);
        }
        Base::CompositeChebyshev(crate::bases::CompositeChebyshev::Neumann(b)) => {
            b.forward(input, output, 0);
        }
        Base::FourierC2c(_) | Base::FourierR2c(_) => {
            panic!("forward_axis: real-valued path is not defined for Fourier bases")
        }
        Base::_Marker(_) => unreachable!(),
    }
}

fn backward_axis(base: &mut Base<Real>, input: &mut Array1<Real>, output: &mut Array1<Real>) {
    match base {
        Base::Chebyshev(b) => {
            use crate::bases::Transform;
            b.backward(input, output, 0);
        }
        Base::CompositeChebyshev(crate::bases::CompositeChebyshev::Dirichlet(b)) => {
            b.backward(input, output, 0);
        }
        Base::CompositeChebyshev(crate::bases::CompositeChebyshev::Neumann(b)) => {
            b.backward(input, output, 0);
        }
        Base::FourierC2c(_) | Base::FourierR2c(_) => {
            panic!("backward_axis: real-valued path is not defined for Fourier bases")
        }
        Base::_Marker(_) => unreachable!(),
    }
}

/// A field that can be written to and read from the persisted dump
/// format (§6.4), independent of its dimensionality.
pub trait WriteField {
    fn write_field(&self) -> Vec<u8>;
}

pub trait ReadField: Sized {
    fn read_field(bytes: &[u8]) -> DnsResult<Self>;
}

/// One-dimensional Chebyshev field: a single column, used by the solver
/// unit tests and by `dns` for boundary-layer profiles.
pub struct Field1 {
    pub space: SpaceBase<Real, 1>,
    pub v: Array1<Real>,
    pub vhat: Array1<Real>,
}

impl Field1 {
    pub fn new(bases: &[Base<Real>; 1]) -> Self {
        let space = SpaceBase::new(bases);
        let n = space.bases[0].len_phys();
        let m = space.bases[0].len_spec();
        Field1 {
            space,
            v: Array1::zeros(n),
            vhat: Array1::zeros(m),
        }
    }

    pub fn forward(&mut self) {
        let mut input = self.v.clone();
        forward_axis(&mut self.space.bases[0], &mut input, &mut self.vhat);
    }

    pub fn backward(&mut self) {
        let mut input = self.vhat.clone();
        backward_axis(&mut self.space.bases[0], &mut input, &mut self.v);
    }
}

/// Two-dimensional real field (Chebyshev x Chebyshev).
#[derive(Clone)]
pub struct Field2 {
    pub space: SpaceBase<Real, 2>,
    pub v: Array2<Real>,
    pub vhat: Array2<Real>,
}

impl Field2 {
    pub fn new(bases: &[Base<Real>; 2]) -> Self {
        let space = SpaceBase::new(bases);
        let (nx, ny) = (space.bases[0].len_phys(), space.bases[1].len_phys());
        let (mx, my) = (space.bases[0].len_spec(), space.bases[1].len_spec());
        Field2 {
            space,
            v: Array2::zeros((nx, ny)),
            vhat: Array2::zeros((mx, my)),
        }
    }

    /// Forward transform both axes: physical -> spectral.
    pub fn forward(&mut self) {
        use crate::bases::Transform;
        let mut buf_x = self.v.clone();
        let mut tmp = Array2::<Real>::zeros((self.space.bases[0].len_spec(), self.v.shape()[1]));
        match &mut self.space.bases[0] {
            Base::Chebyshev(b) => b.forward(&mut buf_x, &mut tmp, 0),
            Base::CompositeChebyshev(crate::bases::CompositeChebyshev::Dirichlet(b)) => {
                b.forward(&mut buf_x, &mut tmp, 0)
            }
            Base::CompositeChebyshev(crate::bases::CompositeChebyshev::Neumann(b)) => {
                b.forward(&mut buf_x, &mut tmp, 0)
            }
            _ => panic!("Field2::forward: axis 0 basis is not a real Chebyshev-family basis"),
        }
        match &mut self.space.bases[1] {
            Base::Chebyshev(b) => b.forward(&mut tmp, &mut self.vhat, 1),
            Base::CompositeChebyshev(crate::bases::CompositeChebyshev::Dirichlet(b)) => {
                b.forward(&mut tmp, &mut self.vhat, 1)
            }
            Base::CompositeChebyshev(crate::bases::CompositeChebyshev::Neumann(b)) => {
                b.forward(&mut tmp, &mut self.vhat, 1)
            }
            _ => panic!("Field2::forward: axis 1 basis is not a real Chebyshev-family basis"),
        }
    }

    pub fn backward(&mut self) {
        use crate::bases::Transform;
        let mut buf = self.vhat.clone();
        let mut tmp = Array2::<Real>::zeros((self.space.bases[0].len_phys(), self.vhat.shape()[1]));
        match &mut self.space.bases[0] {
            Base::Chebyshev(b) => b.backward(&mut buf, &mut tmp, 0),
            Base::CompositeChebyshev(crate::bases::CompositeChebyshev::Dirichlet(b)) => {
                b.backward(&mut buf, &mut tmp, 0)
            }
            Base::CompositeChebyshev(crate::bases::CompositeChebyshev::Neumann(b)) => {
                b.backward(&mut buf, &mut tmp, 0)
            }
            _ => panic!("Field2::backward: axis 0 basis is not a real Chebyshev-family basis"),
        }
        match &mut self.space.bases[1] {
            Base::Chebyshev(b) => b.backward(&mut tmp, &mut self.v, 1),
            Base::CompositeChebyshev(crate::bases::CompositeChebyshev::Dirichlet(b)) => {
                b.backward(&mut tmp, &mut self.v, 1)
            }
            Base::CompositeChebyshev(crate::bases::CompositeChebyshev::Neumann(b)) => {
                b.backward(&mut tmp, &mut self.v, 1)
            }
            _ => panic!("Field2::backward: axis 1 basis is not a real Chebyshev-family basis"),
        }
    }

    /// Map composite coefficients into the orthogonal parent space (the
    /// representation the modal matrix system's right-hand side wants).
    pub fn to_ortho(&self) -> Array2<Real> {
        self.vhat.clone()
    }
}

/// Two-dimensional field after a real-to-complex Fourier transform along
/// axis 0: physical data is real, spectral data is complex. This is the
/// shape every 2-D (x,y) slice of a 3-D velocity/pressure/scalar component
/// takes in `dns::Dns`.
#[derive(Clone)]
pub struct Field2Complex {
    pub space: SpaceBase<Real, 2>,
    pub v: Array2<Real>,
    pub vhat: Array2<Complex<Real>>,
}

impl Field2Complex {
    pub fn new(bases: &[Base<Real>; 2]) -> Self {
        let space = SpaceBase::new(bases);
        let (nx, ny) = (space.bases[0].len_phys(), space.bases[1].len_phys());
        let (mx, my) = (space.bases[0].len_spec(), space.bases[1].len_spec());
        Field2Complex {
            space,
            v: Array2::zeros((nx, ny)),
            vhat: Array2::zeros((mx, my)),
        }
    }

    pub fn forward(&mut self) {
        use crate::bases::Transform;
        let ny = self.v.shape()[1];
        let mx = self.space.bases[0].len_spec();
        let mut buf_x = self.v.clone();
        let mut tmp = Array2::<Complex<Real>>::zeros((mx, ny));
        match &mut self.space.bases[0] {
            Base::FourierR2c(b) => b.forward(&mut buf_x, &mut tmp, 0),
            _ => panic!("Field2Complex::forward: axis 0 basis must be FourierR2c"),
        }
        let mut out = self.vhat.clone();
        match &mut self.space.bases[1] {
            Base::Chebyshev(_)
            | Base::CompositeChebyshev(_) => {
                for mut row in tmp.rows_mut() {
                    let mut re: Array1<Real> = row.iter().map(|c| c.re).collect();
                    let mut im: Array1<Real> = row.iter().map(|c| c.im).collect();
                    let mut re_out = Array1::<Real>::zeros(self.space.bases[1].len_spec());
                    let mut im_out = Array1::<Real>::zeros(self.space.bases[1].len_spec());
                    forward_axis(&mut self.space.bases[1], &mut re, &mut re_out);
                    forward_axis(&mut self.space.bases[1], &mut im, &mut im_out);
                    for ((o, r), i) in row.iter_mut().zip(re_out.iter()).zip(im_out.iter()) {
                        *o = Complex::new(*r, *i);
                    }
                }
                out.assign(&tmp.slice(ndarray::s![.., ..self.space.bases[1].len_spec()]));
            }
            _ => panic!("Field2Complex::forward: axis 1 basis must be Chebyshev-family"),
        }
        self.vhat.assign(&out);
    }

    pub fn backward(&mut self) {
        use crate::bases::Transform;
        let my = self.vhat.shape()[1];
        let mut tmp = self.vhat.clone();
        match &mut self.space.bases[1] {
            Base::Chebyshev(_) | Base::CompositeChebyshev(_) => {
                let nphys = self.space.bases[1].len_phys();
                let mut out = Array2::<Complex<Real>>::zeros((tmp.shape()[0], nphys));
                for (mut row_out, row_in) in out.rows_mut().into_iter().zip(tmp.rows()) {
                    let mut re: Array1<Real> = row_in.iter().map(|c| c.re).collect();
                    let mut im: Array1<Real> = row_in.iter().map(|c| c.im).collect();
                    let mut re_out = Array1::<Real>::zeros(nphys);
                    let mut im_out = Array1::<Real>::zeros(nphys);
                    backward_axis(&mut self.space.bases[1], &mut re, &mut re_out);
                    backward_axis(&mut self.space.bases[1], &mut im, &mut im_out);
                    for ((o, r), i) in row_out.iter_mut().zip(re_out.iter()).zip(im_out.iter()) {
                        *o = Complex::new(*r, *i);
                    }
                }
                tmp = out;
            }
            _ => panic!("Field2Complex::backward: axis 1 basis must be Chebyshev-family"),
        }
        let _ = my;
        match &mut self.space.bases[0] {
            Base::FourierR2c(b) => b.backward(&mut tmp, &mut self.v, 0),
            _ => panic!("Field2Complex::backward: axis 0 basis must be FourierR2c"),
        }
    }

    pub fn to_ortho(&self) -> Array2<Complex<Real>> {
        self.vhat.clone()
    }
}

/// Umbrella trait implemented by every concrete field container, used by
/// `dns`/`analyser` code that is generic over which one it's holding.
pub trait Field {
    fn forward(&mut self);
    fn backward(&mut self);
}

impl Field for Field2 {
    fn forward(&mut self) {
        Field2::forward(self)
    }
    fn backward(&mut self) {
        Field2::backward(self)
    }
}

impl Field for Field2Complex {
    fn forward(&mut self) {
        Field2Complex::forward(self)
    }
    fn backward(&mut self) {
        Field2Complex::backward(self)
    }
}
