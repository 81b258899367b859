//! `massmat`: print the system mass-matrix diagonal for every nodal
//! point of the mesh, element by element (§11), grounded on
//! `original_source/utility/massmat.cpp`. That utility folds a
//! radius weighting into the diagonal for cylindrical sessions; this
//! port does the same using the collocation radius `y`, since this
//! workspace's single reference element (`semdns::element::Element`)
//! has no element-local Jacobian to weight by otherwise.
use clap::Parser;
use semdns::bases::chebyshev::Chebyshev;
use semdns::config::CoordSys;
use semdns::session::Session;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "massmat")]
#[command(about = "Print the mass-matrix diagonal for every mesh point, element by element")]
struct Cli {
    /// Session file.
    session: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let text = std::fs::read_to_string(&cli.session)?;
    let session = Session::parse(&text)?;

    let np = session.params.np;
    let nel = session.params.nel;
    let cheb = Chebyshev::new(np);
    let mass = cheb.mass();
    let y = cheb.x.clone();
    let cylindrical = session.coord_sys() == CoordSys::Cylindrical;

    for elem in 0..nel {
        for i in 0..np {
            for j in 0..np {
                let mut m = mass[[i, i]] * mass[[j, j]];
                if cylindrical {
                    m *= y[j].abs();
                }
                println!("{m:.12e}");
            }
        }
        let _ = elem;
    }

    Ok(())
}
