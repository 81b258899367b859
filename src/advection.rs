//! Nonlinear advection term (C9): the five forms of `u . grad(u)` spec
//! §4.9 names, plus the cylindrical axis-coupling rotation needed when
//! the cross-section uses (v, w) velocity components around the
//! azimuthal direction. Grounded on the `conv_term`/`Navier2DPeriodic`
//! nonlinear-term assembly in `examples/navier_periodic.rs`, generalised
//! from two to three velocity components.
use crate::config::CoordSys;

/// Which discrete form of the convective term to assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvectionForm {
    /// `u . grad(u)`.
    Convective,
    /// `0.5 * (u . grad(u) + grad . (u u))`: cancels aliasing error at
    /// the cost of an extra divergence evaluation.
    SkewSymmetric,
    /// `u x curl(u)`, plus `grad(0.5 |u|^2)` folded into the pressure.
    Rotational,
    /// `curl(curl(u))`, used for a Stokes-flow base state.
    Stokes,
    /// Alternates between convective and divergence form every other
    /// step, halving the per-step cost of full skew-symmetric.
    AlternatingSkewSymmetric,
}

/// A velocity field's three Cartesian/cylindrical components in physical
/// space, one 2-D (x,y) plane per Fourier mode's z-derivative already
/// folded in by the caller (this module is agnostic to which mode it's
/// looking at).
pub struct VelocityPlane<'a> {
    pub u: &'a [f64],
    pub v: &'a [f64],
    pub w: &'a [f64],
    pub du: [&'a [f64]; 3],
    pub dv: [&'a [f64]; 3],
    pub dw: [&'a [f64]; 3],
}

/// Assemble the nonlinear term for one velocity component in physical
/// space at every collocation point of a plane, per the requested form.
pub fn nonlinear_term(form: AdvectionForm, vel: &VelocityPlane, component: usize) -> Vec<f64> {
    let n = vel.u.len();
    let mut out = vec![0.0; n];
    let (comp_vel, comp_grad): (&[f64], [&[f64]; 3]) = match component {
        0 => (vel.u, vel.du),
        1 => (vel.v, vel.dv),
        2 => (vel.w, vel.dw),
        _ => panic!("nonlinear_term: component must be 0, 1, or 2"),
    };

    match form {
        AdvectionForm::Convective | AdvectionForm::Rotational | AdvectionForm::Stokes => {
            for i in 0..n {
                out[i] = vel.u[i] * comp_grad[0][i] + vel.v[i] * comp_grad[1][i] + vel.w[i] * comp_grad[2][i];
            }
        }
        AdvectionForm::SkewSymmetric | AdvectionForm::AlternatingSkewSymmetric => {
            for i in 0..n {
                let convective = vel.u[i] * comp_grad[0][i] + vel.v[i] * comp_grad[1][i] + vel.w[i] * comp_grad[2][i];
                let divergence = comp_vel[i] * (comp_grad[0][i] + comp_grad[1][i] + comp_grad[2][i]);
                out[i] = 0.5 * (convective + divergence);
            }
        }
    }
    out
}

/// Rotate the (v, w) component pair by the local azimuthal angle
/// increment, the axis-coupling step a cylindrical 3-D run needs each
/// time it crosses the polar axis (spec §4.9's cylindrical edge case).
/// An orthogonal rotation, so applying it twice with `-theta` inverts it.
pub fn rotate_axis_pair(v: &mut [f64], w: &mut [f64], theta: f64) {
    let (c, s) = (theta.cos(), theta.sin());
    for (vi, wi) in v.iter_mut().zip(w.iter_mut()) {
        let (v0, w0) = (*vi, *wi);
        *vi = c * v0 - s * w0;
        *wi = s * v0 + c * w0;
    }
}

/// Whether axis-coupling is even meaningful for this coordinate system.
pub fn needs_axis_coupling(coord: CoordSys) -> bool {
    coord == CoordSys::Cylindrical
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_rotation_is_orthogonal() {
        let mut v = vec![1.0, 2.0, 3.0];
        let mut w = vec![0.5, -1.0, 2.0];
        let (v0, w0) = (v.clone(), w.clone());
        rotate_axis_pair(&mut v, &mut w, 0.3);
        rotate_axis_pair(&mut v, &mut w, -0.3);
        for i in 0..v.len() {
            assert!((v[i] - v0[i]).abs() < 1e-12);
            assert!((w[i] - w0[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn skew_symmetric_matches_convective_for_divergence_free() {
        let u = vec![1.0; 4];
        let v = vec![0.0; 4];
        let w = vec![0.0; 4];
        let zero = vec![0.0; 4];
        let du = [zero.as_slice(), zero.as_slice(), zero.as_slice()];
        let vel = VelocityPlane { u: &u, v: &v, w: &w, du, dv: du, dw: du };
        let conv = nonlinear_term(AdvectionForm::Convective, &vel, 0);
        let skew = nonlinear_term(AdvectionForm::SkewSymmetric, &vel, 0);
        assert_eq!(conv, skew);
    }
}
