//! `integral`: domain integral of every field in a dump file (§11),
//! grounded on `original_source/utility/integral.cpp`. That utility
//! Gauss-Lobatto-integrates each field over the full 2-D cross-section
//! mesh and multiplies by the homogeneous-direction length for 3-D
//! runs; this port integrates over the one Chebyshev axis this
//! workspace resolves (`y`) using [`semdns::bases::chebyshev::Chebyshev::mass`]'s
//! diagonal as GLL quadrature weights, and averages across the
//! remaining `np`/`nel`/`z`-plane samples rather than assembling the
//! full element Jacobian `integral.cpp` uses — one of the ten utilities
//! kept in only a narrowed form per the scope decision in DESIGN.md.
use clap::Parser;
use semdns::bases::chebyshev::Chebyshev;
use semdns::io::FieldDump;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "integral")]
#[command(about = "Print the domain integral of every field in a dump file")]
struct Cli {
    /// Field dump file to read.
    dump: PathBuf,

    /// Homogeneous-direction wavenumber scale (`beta`); used to recover
    /// the physical period `2*pi/beta` multiplying the integral for a
    /// resolved z-direction.
    #[arg(long, default_value_t = 1.0)]
    beta: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let bytes = std::fs::read(&cli.dump)?;
    let dump = FieldDump::read(&bytes)?;

    let n_plane = dump.np * dump.np * dump.nel;
    println!("np={} nz={} nel={} n_plane={}", dump.np, dump.nz, dump.nel, n_plane);

    let cheb = Chebyshev::new(dump.np);
    let mass = cheb.mass();
    let weights: Vec<f64> = (0..dump.np).map(|i| mass[[i, i]]).collect();

    let lz = if dump.nz > 2 { std::f64::consts::TAU / cli.beta } else { 1.0 };

    for (name, data) in &dump.fields {
        let mut integral = 0.0;
        for (i, &v) in data.iter().enumerate() {
            integral += v * weights[i % dump.np];
        }
        // Average the per-plane quadrature sum over every (nel, z) plane
        // sampled, then scale by the homogeneous-direction length.
        let n_planes = (data.len() / dump.np.max(1)).max(1) as f64;
        let integral = integral / n_planes * lz;
        println!("{name}: {integral:.8e}");
    }

    Ok(())
}
