//! Integration coefficients (C4): stiffly-stable BDF time-derivative
//! weights, extrapolation coefficients for the pressure boundary
//! condition, and the Adams-Bashforth/Adams-Moulton weights used during
//! startup, all grounded on `original_source/src/integration.cpp`.
//!
//! Every table is indexed `[time_order - 1][...]`, `time_order` in `1..=3`
//! per spec; `time_order` ramps up from 1 on the first few steps so the
//! scheme is self-starting (matching the original's behaviour exactly,
//! rather than requiring multi-step history that doesn't exist yet).

/// Backward-differentiation coefficients for the stiffly-stable scheme,
/// order `1..=3`. `coeffs[0]` multiplies the implicit (new-time) term;
/// `coeffs[1..]` multiply the explicit history terms, most recent first.
pub fn stiffly_stable(time_order: usize) -> Vec<f64> {
    match time_order {
        1 => vec![1.0, 1.0],
        2 => vec![1.5, 2.0, -0.5],
        3 => vec![11.0 / 6.0, 3.0, -1.5, 1.0 / 3.0],
        _ => panic!("stiffly_stable: time_order must be 1, 2, or 3"),
    }
}

/// Extrapolation coefficients for the high-order pressure boundary
/// condition (C6): combine `time_order` levels of nonlinear-term/velocity
/// history into an explicit estimate at the new time level.
pub fn extrapolation(time_order: usize) -> Vec<f64> {
    match time_order {
        1 => vec![1.0],
        2 => vec![2.0, -1.0],
        3 => vec![3.0, -3.0, 1.0],
        _ => panic!("extrapolation: time_order must be 1, 2, or 3"),
    }
}

/// Adams-Bashforth coefficients, used only during the startup ramp before
/// `time_order` history levels exist.
pub fn adams_bashforth(order: usize) -> Vec<f64> {
    match order {
        1 => vec![1.0],
        2 => vec![1.5, -0.5],
        3 => vec![23.0 / 12.0, -16.0 / 12.0, 5.0 / 12.0],
        _ => panic!("adams_bashforth: order must be 1, 2, or 3"),
    }
}

/// Adams-Moulton coefficients (implicit corrector), same order range.
pub fn adams_moulton(order: usize) -> Vec<f64> {
    match order {
        1 => vec![0.5, 0.5],
        2 => vec![5.0 / 12.0, 8.0 / 12.0, -1.0 / 12.0],
        _ => panic!("adams_moulton: order must be 1 or 2"),
    }
}

/// The time order to use on step `n` (0-indexed) of a run targeting
/// `target_order`: ramps `1, 2, ..., target_order` over the first few
/// steps so the multi-level history is always fully populated.
pub fn ramp_order(step: usize, target_order: usize) -> usize {
    (step + 1).min(target_order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_reaches_target_order() {
        assert_eq!(ramp_order(0, 3), 1);
        assert_eq!(ramp_order(1, 3), 2);
        assert_eq!(ramp_order(2, 3), 3);
        assert_eq!(ramp_order(10, 3), 3);
    }

    #[test]
    fn stiffly_stable_coeffs_sum_to_zero_on_history() {
        for order in 1..=3 {
            let c = stiffly_stable(order);
            // BDF history coefficients sum to minus the implicit coefficient
            // (consistency condition for a constant solution).
            let hist_sum: f64 = c[1..].iter().sum();
            assert!((hist_sum - c[0]).abs() < 1e-12);
        }
    }
}
