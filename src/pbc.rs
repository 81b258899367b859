//! High-order pressure boundary condition manager (C6).
//!
//! Computes the extrapolated pressure BC from a ring buffer of velocity
//! and nonlinear-term history, per Karniadakis-Israeli-Orszag (KIO91):
//! `dp/dn|_boundary` is built from `time_order` levels of
//! `(nonlinear - diffusive)` history, combined with
//! [`crate::integration::extrapolation`] weights, rather than held fixed
//! or computed implicitly.
use crate::integration::extrapolation;

/// One historical snapshot the PBC extrapolation needs: the nonlinear
/// term and kinematic viscosity at a past time level, sampled on the
/// boundary.
#[derive(Debug, Clone)]
pub struct PbcHistory {
    pub nonlinear: Vec<f64>,
    pub nu_curl_curl_u: Vec<f64>,
}

/// Ring buffer of `time_order` history levels per boundary segment,
/// grounded on spec §4.6's "ring buffer of depth = time order".
pub struct PbcManager {
    time_order: usize,
    history: Vec<PbcHistory>,
}

impl PbcManager {
    pub fn new(time_order: usize, n_boundary_points: usize) -> Self {
        PbcManager {
            time_order,
            history: (0..time_order)
                .map(|_| PbcHistory {
                    nonlinear: vec![0.0; n_boundary_points],
                    nu_curl_curl_u: vec![0.0; n_boundary_points],
                })
                .collect(),
        }
    }

    /// Push a new history level, evicting the oldest (the ring buffer
    /// slides forward by one each timestep).
    pub fn push(&mut self, level: PbcHistory) {
        self.history.pop();
        self.history.insert(0, level);
    }

    /// Extrapolated pressure-gradient boundary value at the new time
    /// level, using however many history levels are actually populated
    /// (`ramp_order`-style self-starting behaviour at startup).
    pub fn extrapolate(&self, active_order: usize) -> Vec<f64> {
        let order = active_order.min(self.time_order).min(self.history.len());
        let weights = extrapolation(order.max(1));
        let n = self.history[0].nonlinear.len();
        let mut out = vec![0.0; n];
        for (level, &w) in self.history.iter().take(order).zip(weights.iter()) {
            for i in 0..n {
                out[i] += w * (level.nonlinear[i] - level.nu_curl_curl_u[i]);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_buffer_evicts_oldest() {
        let mut mgr = PbcManager::new(2, 3);
        mgr.push(PbcHistory { nonlinear: vec![1.0; 3], nu_curl_curl_u: vec![0.0; 3] });
        mgr.push(PbcHistory { nonlinear: vec![2.0; 3], nu_curl_curl_u: vec![0.0; 3] });
        assert_eq!(mgr.history.len(), 2);
        assert_eq!(mgr.history[0].nonlinear[0], 2.0);
        assert_eq!(mgr.history[1].nonlinear[0], 1.0);
    }

    #[test]
    fn extrapolate_ramps_order_at_startup() {
        let mut mgr = PbcManager::new(3, 1);
        mgr.push(PbcHistory { nonlinear: vec![5.0], nu_curl_curl_u: vec![0.0] });
        let out = mgr.extrapolate(1);
        assert_eq!(out[0], 5.0);
    }
}
