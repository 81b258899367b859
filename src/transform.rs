//! Real 1-D FFT driver (C3): forward/backward transform of a plane of
//! real data into the Temperton-ordered coefficient layout
//! `[Re_0, Re_{N/2}, Re_1, Im_1, Re_2, Im_2, ..., Re_{N/2-1}, Im_{N/2-1}]`
//! spec §4.3 requires, built on `ndrustfft`'s real-to-complex transform
//! (the same crate family the teacher already uses for the Chebyshev DCT).
use crate::bases::FourierR2c;
use crate::error::{numeric_error, DnsResult};
use ndarray::Array1;
use ndrustfft::{ndfft_r2c, ndifft_r2c};
use num_complex::Complex;

/// Forward transform: `nz` real physical values -> `nz` Temperton-ordered
/// coefficients (`nz` must be even).
pub fn forward(data: &[f64]) -> DnsResult<Vec<f64>> {
    const ROUTINE: &str = "transform::forward";
    let nz = data.len();
    if nz % 2 != 0 {
        return Err(numeric_error(ROUTINE, format!("nz must be even, got {nz}")));
    }
    let mut basis = FourierR2c::new(nz);
    let mut input = Array1::from(data.to_vec());
    let mut complex_out = Array1::<Complex<f64>>::zeros(nz / 2 + 1);
    ndfft_r2c(&input.view(), &mut complex_out.view_mut(), basis.handler_mut(), 0);
    let _ = &mut input;

    let mut out = vec![0.0; nz];
    out[0] = complex_out[0].re;
    out[1] = complex_out[nz / 2].re;
    for k in 1..nz / 2 {
        out[2 * k] = complex_out[k].re;
        out[2 * k + 1] = complex_out[k].im;
    }
    Ok(out)
}

/// Inverse of [`forward`]: Temperton-ordered coefficients -> `nz` real
/// physical values.
pub fn backward(coeffs: &[f64]) -> DnsResult<Vec<f64>> {
    const ROUTINE: &str = "transform::backward";
    let nz = coeffs.len();
    if nz % 2 != 0 {
        return Err(numeric_error(ROUTINE, format!("nz must be even, got {nz}")));
    }
    let mut basis = FourierR2c::new(nz);
    let mut complex_in = Array1::<Complex<f64>>::zeros(nz / 2 + 1);
    complex_in[0] = Complex::new(coeffs[0], 0.0);
    complex_in[nz / 2] = Complex::new(coeffs[1], 0.0);
    for k in 1..nz / 2 {
        complex_in[k] = Complex::new(coeffs[2 * k], coeffs[2 * k + 1]);
    }
    let mut out = Array1::<f64>::zeros(nz);
    ndifft_r2c(&complex_in.view(), &mut out.view_mut(), basis.handler_mut(), 0);
    Ok(out.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let data: Vec<f64> = (0..8).map(|i| (i as f64 * 0.7).sin()).collect();
        let coeffs = forward(&data).unwrap();
        let back = backward(&coeffs).unwrap();
        for (a, b) in data.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn rejects_odd_length() {
        assert!(forward(&[1.0, 2.0, 3.0]).is_err());
    }
}
