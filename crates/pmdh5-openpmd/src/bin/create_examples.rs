//! Write an openPMD sample file filled with random field data.
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ndarray::Array2;
use num_complex::Complex;
use pmdh5_openpmd::{OpenPmdConfig, Result, Series};
use rand::Rng;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "create-examples")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Write an openPMD 1.0.0 (ED-PIC) sample file with random fields", long_about = None)]
struct Cli {
    /// Output HDF5 file; an existing file is overwritten
    #[arg(default_value = "example.h5")]
    output: PathBuf,

    /// JSON configuration overriding the built-in defaults
    config: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading configuration");
            OpenPmdConfig::from_json_file(path)?
        }
        None => OpenPmdConfig::default(),
    };
    let shape = (config.sample_shape[0], config.sample_shape[1]);

    let mut series = Series::create(&cli.output, config)?;

    // Stand-in for simulation output: uniform samples in [0, 1).
    let mut rng = rand::thread_rng();
    let mut real = || Array2::from_shape_fn(shape, |_| rng.gen::<f64>());
    let rho0 = real();
    let ex = real();
    let ey = real();
    let ez = real();
    let rho1 = Array2::from_shape_fn(shape, |_| Complex::new(rng.gen::<f64>(), rng.gen::<f64>()));

    series.write_rho(rho0.view(), rho1.view())?;
    series.write_e(ex.view(), ey.view(), ez.view())?;
    series.write_species(None)?;
    series.close()?;

    println!("File {} created!", cli.output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
