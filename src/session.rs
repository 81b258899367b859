//! Session file (§6.2): the run's parameter set. The scalar `[session]`
//! table is plain TOML (`serde` + `toml`, per the ambient-stack section of
//! SPEC_FULL.md); the NODES/ELEMENTS/BCS sections follow the original's
//! plain-text delimited layout and get a hand-written line parser, since
//! that format isn't one `serde` can drive generically.
use crate::boundary::{Boundary, Condition};
use crate::config::CoordSys;
use crate::error::{io_error, DnsError};
use crate::expr::Expr;
use serde::Deserialize;

/// The scalar parameters every run needs, deserialised from the
/// session file's `[session]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionParams {
    pub name: String,
    pub np: usize,
    pub nz: usize,
    pub nel: usize,
    #[serde(default)]
    pub cylindrical: bool,
    pub kinvis: f64,
    pub dt: f64,
    pub time_order: usize,
    #[serde(default)]
    pub svv: bool,
    #[serde(default)]
    pub scalar: bool,
    #[serde(default = "default_beta")]
    pub beta: f64,
}

fn default_beta() -> f64 {
    1.0
}

/// A fully parsed session: scalar parameters plus the boundary-condition
/// table (the NODES/ELEMENTS/mesh geometry itself is consumed through
/// `element::Element`/`AssemblyMap`, not stored here).
pub struct Session {
    pub params: SessionParams,
    pub boundaries: Vec<Boundary>,
}

impl Session {
    /// Parse a session file: a leading `[session]` TOML table, then a
    /// plain-text `<FIELD> <GROUP> <KIND> <VALUE>` BCS block, one
    /// condition per line.
    pub fn parse(text: &str) -> Result<Self, DnsError> {
        const ROUTINE: &str = "Session::parse";
        let (toml_part, bcs_part) = match text.split_once("<BCS>") {
            Some((t, b)) => (t, b.trim_end_matches("</BCS>").trim()),
            None => (text, ""),
        };
        let params: SessionParams = toml::from_str(toml_part)
            .map_err(|e| io_error(ROUTINE, format!("malformed [session] table: {e}")))?;

        let mut boundaries = Vec::new();
        for (lineno, line) in bcs_part.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 {
                return Err(io_error(ROUTINE, format!("BCS line {lineno}: expected 4 fields, got {}", fields.len())));
            }
            let field = fields[0].chars().next().unwrap();
            let group: usize = fields[1]
                .parse()
                .map_err(|_| io_error(ROUTINE, format!("BCS line {lineno}: bad group index")))?;
            let condition = match fields[2] {
                "D" => {
                    let value: f64 = fields[3]
                        .parse()
                        .map_err(|_| io_error(ROUTINE, format!("BCS line {lineno}: bad value")))?;
                    Condition::Dirichlet(value)
                }
                // A symbolic essential condition: the remainder of the line is
                // a formula in x,y,z,t,step (§4.5), not a bare number.
                "E" => {
                    let formula = fields[3..].join(" ");
                    let expr = Expr::parse(&formula)
                        .map_err(|e| io_error(ROUTINE, format!("BCS line {lineno}: {e}")))?;
                    Condition::DirichletExpr(expr)
                }
                "N" => {
                    let value: f64 = fields[3]
                        .parse()
                        .map_err(|_| io_error(ROUTINE, format!("BCS line {lineno}: bad value")))?;
                    Condition::Neumann(value)
                }
                "P" => Condition::ComputedPressure,
                other => return Err(io_error(ROUTINE, format!("BCS line {lineno}: unknown kind '{other}'"))),
            };
            boundaries.push(Boundary::new(group, field, condition));
        }

        Ok(Session { params, boundaries })
    }

    pub fn coord_sys(&self) -> CoordSys {
        if self.params.cylindrical {
            CoordSys::Cylindrical
        } else {
            CoordSys::Cartesian
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scalar_table_and_bcs() {
        let text = r#"
name = "channel"
np = 9
nz = 32
nel = 4
kinvis = 0.01
dt = 0.005
time_order = 3

<BCS>
u 0 D 0.0
v 0 D 0.0
p 0 N 0.0
</BCS>
"#;
        let session = Session::parse(text).unwrap();
        assert_eq!(session.params.name, "channel");
        assert_eq!(session.boundaries.len(), 3);
        assert_eq!(session.coord_sys(), CoordSys::Cartesian);
    }

    #[test]
    fn rejects_malformed_bcs_line() {
        let text = "name = \"x\"\nnp=9\nnz=2\nnel=1\nkinvis=0.1\ndt=0.1\ntime_order=1\n<BCS>\nbad line\n</BCS>";
        assert!(Session::parse(text).is_err());
    }

    #[test]
    fn parses_symbolic_essential_condition() {
        let text = "name = \"x\"\nnp=9\nnz=2\nnel=1\nkinvis=0.1\ndt=0.1\ntime_order=1\n<BCS>\nu 0 E sin ( t )\n</BCS>";
        let session = Session::parse(text).unwrap();
        assert!(matches!(session.boundaries[0].condition, Condition::DirichletExpr(_)));
    }
}
