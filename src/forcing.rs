//! Body-force plug-ins (§6.3), grounded on
//! `original_source/dns/fieldforce.h`'s `VirtualForce` hierarchy: a
//! registration-ordered list of forces, evaluated and summed into the
//! nonlinear term each step, sponge always applied first (it acts as a
//! relaxation toward a reference state and should see the other forces'
//! contribution already folded in for the fields it's damping).
use rand::Rng;

/// One body-force contribution, evaluated at every collocation point of
/// a plane for a given velocity component.
pub trait BodyForce: Send + Sync {
    /// Short name, used in logging and the `.flx` integrated-force log.
    fn name(&self) -> &'static str;
    /// Add this force's contribution (for velocity `component`) into
    /// `out`, given the current velocity field sampled at the same
    /// points.
    fn apply(&mut self, component: usize, x: &[f64], y: &[f64], t: f64, out: &mut [f64]);
}

/// Relaxes the solution toward a reference field over a masked region;
/// always evaluated first since later forces should act on top of an
/// already-sponged state.
pub struct Sponge {
    pub mask: Vec<f64>,
    pub reference: Vec<f64>,
    pub rate: f64,
}

impl BodyForce for Sponge {
    fn name(&self) -> &'static str {
        "sponge"
    }
    fn apply(&mut self, _component: usize, _x: &[f64], _y: &[f64], _t: f64, out: &mut [f64]) {
        for i in 0..out.len() {
            out[i] += self.rate * self.mask[i] * (self.reference[i] - out[i]);
        }
    }
}

/// Constant rotation-rate Coriolis force, `-2 * Omega x u`.
pub struct Coriolis {
    pub omega: f64,
}

impl BodyForce for Coriolis {
    fn name(&self) -> &'static str {
        "coriolis"
    }
    fn apply(&mut self, component: usize, _x: &[f64], _y: &[f64], _t: f64, out: &mut [f64]) {
        let sign = if component == 0 { -1.0 } else { 1.0 };
        for v in out.iter_mut() {
            *v += sign * 2.0 * self.omega * *v;
        }
    }
}

/// Uniform constant force per component (e.g. a mean pressure gradient
/// driving channel flow).
pub struct Const {
    pub value: [f64; 3],
}

impl BodyForce for Const {
    fn name(&self) -> &'static str {
        "const"
    }
    fn apply(&mut self, component: usize, _x: &[f64], _y: &[f64], _t: f64, out: &mut [f64]) {
        for v in out.iter_mut() {
            *v += self.value[component];
        }
    }
}

/// Additive white noise, amplitude `sigma`, used to seed transition or
/// maintain turbulence against numerical dissipation.
pub struct WhiteNoise {
    pub sigma: f64,
}

impl BodyForce for WhiteNoise {
    fn name(&self) -> &'static str {
        "white-noise"
    }
    fn apply(&mut self, _component: usize, _x: &[f64], _y: &[f64], _t: f64, out: &mut [f64]) {
        let mut rng = rand::thread_rng();
        for v in out.iter_mut() {
            *v += self.sigma * rng.gen_range(-1.0..1.0);
        }
    }
}

/// A fixed, time-independent spatial profile (e.g. a precomputed forcing
/// field loaded from a file).
pub struct Steady {
    pub profile: Vec<f64>,
}

impl BodyForce for Steady {
    fn name(&self) -> &'static str {
        "steady"
    }
    fn apply(&mut self, _component: usize, _x: &[f64], _y: &[f64], _t: f64, out: &mut [f64]) {
        for (v, p) in out.iter_mut().zip(self.profile.iter()) {
            *v += p;
        }
    }
}

/// A steady spatial profile amplitude-modulated in time by
/// `amplitude(t) = base * cos(omega * t + phase)`.
pub struct Modulated {
    pub profile: Vec<f64>,
    pub base: f64,
    pub omega: f64,
    pub phase: f64,
}

impl BodyForce for Modulated {
    fn name(&self) -> &'static str {
        "modulated"
    }
    fn apply(&mut self, _component: usize, _x: &[f64], _y: &[f64], t: f64, out: &mut [f64]) {
        let amp = self.base * (self.omega * t + self.phase).cos();
        for (v, p) in out.iter_mut().zip(self.profile.iter()) {
            *v += amp * p;
        }
    }
}

/// General `f(x, y, t)` closure-based force, for cases the other
/// fixed-shape variants don't cover.
pub struct SpatioTemporal<F: Send + Sync> {
    pub f: F,
}

impl<F> BodyForce for SpatioTemporal<F>
where
    F: Fn(f64, f64, f64, usize) -> f64 + Send + Sync,
{
    fn name(&self) -> &'static str {
        "spatio-temporal"
    }
    fn apply(&mut self, component: usize, x: &[f64], y: &[f64], t: f64, out: &mut [f64]) {
        for i in 0..out.len() {
            out[i] += (self.f)(x[i], y[i], t, component);
        }
    }
}

/// Linear drag opposing the local velocity, `-k * u`.
pub struct Drag {
    pub k: f64,
}

impl BodyForce for Drag {
    fn name(&self) -> &'static str {
        "drag"
    }
    fn apply(&mut self, _component: usize, _x: &[f64], _y: &[f64], _t: f64, out: &mut [f64]) {
        for v in out.iter_mut() {
            *v -= self.k * *v;
        }
    }
}

/// Selective frequency damping: relaxes the solution toward a running
/// low-pass-filtered estimate of itself, a common trick for finding
/// unstable steady states.
pub struct Sfd {
    pub chi: f64,
    pub filtered: Vec<f64>,
    pub cutoff: f64,
}

impl BodyForce for Sfd {
    fn name(&self) -> &'static str {
        "sfd"
    }
    fn apply(&mut self, _component: usize, _x: &[f64], _y: &[f64], _t: f64, out: &mut [f64]) {
        for (v, f) in out.iter_mut().zip(self.filtered.iter_mut()) {
            *f += self.cutoff * (*v - *f);
            *v -= self.chi * (*v - *f);
        }
    }
}

/// Buoyancy, `beta * g * (scalar - scalar_ref)` acting along the
/// gravity-aligned component only.
pub struct Buoyancy {
    pub beta: f64,
    pub gravity_component: usize,
    pub scalar: Vec<f64>,
    pub scalar_ref: f64,
    pub g: f64,
}

impl BodyForce for Buoyancy {
    fn name(&self) -> &'static str {
        "buoyancy"
    }
    fn apply(&mut self, component: usize, _x: &[f64], _y: &[f64], _t: f64, out: &mut [f64]) {
        if component != self.gravity_component {
            return;
        }
        for (v, s) in out.iter_mut().zip(self.scalar.iter()) {
            *v += self.beta * self.g * (*s - self.scalar_ref);
        }
    }
}

/// Registration-ordered list of active forces, sponge (if present)
/// always evaluated first.
#[derive(Default)]
pub struct FieldForce {
    forces: Vec<Box<dyn BodyForce>>,
}

impl FieldForce {
    pub fn new() -> Self {
        FieldForce::default()
    }

    /// Register a force. Sponges are inserted at the front regardless of
    /// call order; everything else appends, preserving registration
    /// order.
    pub fn register(&mut self, force: Box<dyn BodyForce>) {
        if force.name() == "sponge" {
            self.forces.insert(0, force);
        } else {
            self.forces.push(force);
        }
    }

    pub fn apply_all(&mut self, component: usize, x: &[f64], y: &[f64], t: f64, out: &mut [f64]) {
        for force in &mut self.forces {
            force.apply(component, x, y, t, out);
        }
    }

    /// Canonical-steady subtraction path (Open Question (a)): re-invoke the
    /// whole registered force list against a zeroed reference state and
    /// subtract the result from `out`, rather than adding each force's
    /// contribution in place. Forces whose `apply` reads back the running
    /// `out` (`Drag`, `Sfd`) see only the zero baseline here, so they
    /// contribute nothing to the subtraction — the resolution recorded in
    /// DESIGN.md for how non-additive forces interact with this path.
    pub fn apply_all_subtract(&mut self, component: usize, x: &[f64], y: &[f64], t: f64, out: &mut [f64]) {
        let mut hydrostatic = vec![0.0; out.len()];
        for force in &mut self.forces {
            force.apply(component, x, y, t, &mut hydrostatic);
        }
        for (o, h) in out.iter_mut().zip(hydrostatic.iter()) {
            *o -= h;
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.forces.iter().map(|f| f.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sponge_is_always_first() {
        let mut ff = FieldForce::new();
        ff.register(Box::new(Const { value: [1.0, 0.0, 0.0] }));
        ff.register(Box::new(Sponge { mask: vec![1.0], reference: vec![0.0], rate: 1.0 }));
        assert_eq!(ff.names(), vec!["sponge", "const"]);
    }

    #[test]
    fn subtract_path_removes_a_constant_reference_force() {
        let mut ff = FieldForce::new();
        ff.register(Box::new(Const { value: [3.0, 0.0, 0.0] }));
        let mut out = vec![10.0, 10.0];
        ff.apply_all_subtract(0, &[0.0, 0.0], &[0.0, 0.0], 0.0, &mut out);
        assert_eq!(out, vec![7.0, 7.0]);
    }

    #[test]
    fn subtract_path_zeroes_out_state_dependent_forces() {
        let mut ff = FieldForce::new();
        ff.register(Box::new(Drag { k: 0.5 }));
        let mut out = vec![10.0, 10.0];
        ff.apply_all_subtract(0, &[0.0, 0.0], &[0.0, 0.0], 0.0, &mut out);
        // Drag reads back the (zeroed) reference state, so it contributes
        // nothing to the subtraction.
        assert_eq!(out, vec![10.0, 10.0]);
    }
}
