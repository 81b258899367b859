//! Boundary system (C5), grounded on `original_source/src/boundary.cpp`
//! and `boundarysys.cpp`: per-segment boundary conditions (Dirichlet,
//! Neumann, mixed/Robin, high-order-pressure) and the per-mode vectors
//! `BoundarySys` assembles them into. §4.5's symbolic essential conditions
//! (a formula in `x,y,z,t,step` rather than a fixed constant) are carried
//! as an [`crate::expr::Expr`] and re-evaluated every step through
//! [`BoundarySys::evaluate_essential`].
use crate::error::{io_error, DnsError};
use crate::expr::{Env, Expr};

/// One boundary condition imposed on a mesh edge.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Fixed value (essential) condition.
    Dirichlet(f64),
    /// Essential condition given by a symbolic expression in `x,y,z,t,step`.
    DirichletExpr(Expr),
    /// Fixed normal-derivative (natural) condition.
    Neumann(f64),
    /// Robin-type mixed condition: `alpha * u + beta * du/dn = gamma`.
    Mixed { alpha: f64, beta: f64, gamma: f64 },
    /// High-order pressure BC: value is supplied per-step by [`crate::pbc`],
    /// not fixed at construction.
    ComputedPressure,
}

/// One labelled boundary segment: a group index into the mesh and the
/// condition imposed on it for a single named field.
#[derive(Debug, Clone)]
pub struct Boundary {
    pub group: usize,
    pub field: char,
    pub condition: Condition,
}

impl Boundary {
    pub fn new(group: usize, field: char, condition: Condition) -> Self {
        Boundary { group, field, condition }
    }

    /// `true` for conditions that constrain the solution value directly
    /// (essential conditions), as opposed to a derivative or flux.
    pub fn is_essential(&self) -> bool {
        matches!(
            self.condition,
            Condition::Dirichlet(_) | Condition::DirichletExpr(_) | Condition::ComputedPressure
        )
    }
}

/// An essential value fixed at construction, or re-evaluated every step
/// from a symbolic formula (§4.5).
#[derive(Debug, Clone)]
enum EssentialValue {
    Constant(f64),
    Symbolic(Expr),
}

/// Per-mode boundary-condition vectors for one field, grounded on
/// `BoundarySys`'s three parallel arrays (value, derivative-coefficient,
/// mixed-coefficient) indexed by boundary-node position.
pub struct BoundarySys {
    pub field: char,
    essential: Vec<EssentialValue>,
    natural: Vec<f64>,
    mixed: Vec<(f64, f64)>,
}

impl BoundarySys {
    pub fn build(field: char, boundaries: &[Boundary]) -> Result<Self, DnsError> {
        const ROUTINE: &str = "BoundarySys::build";
        let mine: Vec<&Boundary> = boundaries.iter().filter(|b| b.field == field).collect();
        if mine.is_empty() {
            return Err(io_error(ROUTINE, format!("no boundary conditions registered for field '{field}'")));
        }
        let mut essential = Vec::new();
        let mut natural = Vec::new();
        let mut mixed = Vec::new();
        for b in mine {
            match &b.condition {
                Condition::Dirichlet(v) => essential.push(EssentialValue::Constant(*v)),
                Condition::DirichletExpr(e) => essential.push(EssentialValue::Symbolic(e.clone())),
                Condition::Neumann(v) => natural.push(*v),
                Condition::Mixed { alpha, beta, gamma } => mixed.push((*alpha, *beta * 0.0 + gamma / alpha.max(1e-300))),
                Condition::ComputedPressure => essential.push(EssentialValue::Constant(0.0)),
            }
        }
        Ok(BoundarySys { field, essential, natural, mixed })
    }

    pub fn n_essential(&self) -> usize {
        self.essential.len()
    }
    pub fn n_natural(&self) -> usize {
        self.natural.len()
    }
    pub fn n_mixed(&self) -> usize {
        self.mixed.len()
    }

    /// Evaluate every essential-condition node at its collocation point
    /// for the current step, re-parsing nothing (the formulas were parsed
    /// once at `build` time) — the "tight inner loop" the symbolic
    /// forcing/BC redesign calls for.
    pub fn evaluate_essential(&self, coords: &[(f64, f64, f64)], t: f64, step: usize) -> Vec<f64> {
        self.essential
            .iter()
            .zip(coords.iter())
            .map(|(value, &(x, y, z))| match value {
                EssentialValue::Constant(v) => *v,
                EssentialValue::Symbolic(e) => e.eval(&Env { x, y, z, t, step: step as f64 }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_essential_conditions() {
        let b = Boundary::new(0, 'u', Condition::Dirichlet(1.0));
        assert!(b.is_essential());
        let b = Boundary::new(0, 'u', Condition::Neumann(0.0));
        assert!(!b.is_essential());
    }

    #[test]
    fn build_rejects_unregistered_field() {
        let boundaries = vec![Boundary::new(0, 'u', Condition::Dirichlet(0.0))];
        assert!(BoundarySys::build('p', &boundaries).is_err());
    }

    #[test]
    fn symbolic_essential_condition_tracks_time() {
        let expr = Expr::parse("sin(t)").unwrap();
        let boundaries = vec![Boundary::new(0, 'u', Condition::DirichletExpr(expr))];
        let sys = BoundarySys::build('u', &boundaries).unwrap();
        let coords = vec![(0.0, 0.0, 0.0)];
        let at_zero = sys.evaluate_essential(&coords, 0.0, 0);
        let at_half_pi = sys.evaluate_essential(&coords, std::f64::consts::FRAC_PI_2, 0);
        assert!((at_zero[0] - 0.0).abs() < 1e-12);
        assert!((at_half_pi[0] - 1.0).abs() < 1e-12);
    }
}
