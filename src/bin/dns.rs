//! Command-line front end (§6.5/§10), grounded on the `clap` derive
//! layout in `other_examples/`'s mesh-transform CLI: a session file plus
//! a handful of run-control flags, `-v` repeated for log verbosity the
//! way `env_logger` is conventionally wired up from a CLI.
use clap::Parser;
use semdns::advection::AdvectionForm;
use semdns::config::Geometry;
use semdns::dns::{Dns, DnsParams};
use semdns::forcing::FieldForce;
use semdns::session::Session;
use semdns::solver::SolveMethod;
use semdns::{integrate, Integrate};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "dns")]
#[command(author, version, about = "Spectral-element / Fourier DNS engine", long_about = None)]
struct Cli {
    /// Session file to read `[session]` parameters and boundary conditions from.
    session: PathBuf,

    /// Number of Chebyshev collocation points in the wall-normal direction.
    #[arg(long, default_value_t = 33)]
    ny: usize,

    /// Simulated end time to integrate to.
    #[arg(short = 'T', long = "time", default_value_t = 1.0)]
    max_time: f64,

    /// Interval (in simulated time) between field dumps; omit to only
    /// write once at the end of the run.
    #[arg(long = "save-every")]
    save_every: Option<f64>,

    /// Advection form: convective, skew, rotational, stokes, alternating.
    #[arg(long, default_value = "convective")]
    form: String,

    /// Per-mode solve strategy: direct, jacpcg, mixed.
    #[arg(long, default_value = "direct")]
    method: String,

    /// Run the canonical-steady Boussinesq path: subtract the registered
    /// forces' hydrostatic contribution from the nonlinear term instead of
    /// adding it.
    #[arg(long)]
    subtract_forcing: bool,

    /// Repeat to raise log verbosity: -v for info, -vv for debug, -vvv for trace.
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_form(s: &str) -> Result<AdvectionForm, String> {
    match s {
        "convective" => Ok(AdvectionForm::Convective),
        "skew" | "skew-symmetric" => Ok(AdvectionForm::SkewSymmetric),
        "rotational" => Ok(AdvectionForm::Rotational),
        "stokes" => Ok(AdvectionForm::Stokes),
        "alternating" => Ok(AdvectionForm::AlternatingSkewSymmetric),
        other => Err(format!("unknown advection form '{other}'")),
    }
}

fn parse_method(s: &str) -> Result<SolveMethod, String> {
    match s {
        "direct" => Ok(SolveMethod::Direct),
        "jacpcg" => Ok(SolveMethod::JacPcg),
        "mixed" => Ok(SolveMethod::Mixed),
        other => Err(format!("unknown solve method '{other}'")),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&cli.session)?;
    let session = Session::parse(&text)?;
    let coord = session.coord_sys();

    let geom = Geometry::new(0, 1, session.params.np, session.params.nz, session.params.nel, coord)?;

    let form = parse_form(&cli.form).map_err(anyhow::Error::msg)?;
    let method = parse_method(&cli.method).map_err(anyhow::Error::msg)?;

    let params = DnsParams {
        kinvis: session.params.kinvis,
        dt: session.params.dt,
        time_order: session.params.time_order,
        beta: session.params.beta,
        coord,
        form,
        method,
        subtract_forcing: cli.subtract_forcing,
    };

    log::info!(
        "starting run '{}': np={} nz={} nel={} kinvis={} dt={}",
        session.params.name,
        session.params.np,
        session.params.nz,
        session.params.nel,
        session.params.kinvis,
        session.params.dt
    );

    let mut dns = Dns::new(&geom, params, cli.ny, FieldForce::new());
    dns.write();
    integrate(&mut dns, cli.max_time, cli.save_every);
    dns.write();

    log::info!("run complete: step={} time={}", dns.step(), dns.get_time());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
