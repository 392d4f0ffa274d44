use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use verletsim::{bench_broad_phase, bench_update, bench_update_curve};
use verletsim::{Scenario, ScenarioConfig};

#[derive(Parser, Debug)]
#[command(version, about = "Verlet circle solver with a uniform-grid broad phase")]
struct Args {
    /// Scenario file, looked up under `scenarios/` unless it exists as given
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Run this many frames without a window and print a summary
    #[arg(long)]
    headless: Option<usize>,

    /// Frame length in seconds for headless runs
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Print grid vs brute-force timings and exit
    #[arg(long)]
    bench: bool,

    /// With --bench, print the per-N frame cost as CSV instead
    #[arg(long)]
    curve: bool,
}

fn resolve_scenario_path(file_name: &str) -> PathBuf {
    let given = PathBuf::from(file_name);
    if given.exists() {
        return given;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}

// load here to keep main clean
fn load_scenario(file_name: &str) -> Result<Scenario> {
    let path = resolve_scenario_path(file_name);
    let cfg = ScenarioConfig::from_path(&path)?;
    Scenario::build_scenario(cfg).with_context(|| format!("building scenario {}", path.display()))
}

fn run_headless(mut scenario: Scenario, frames: usize, dt: f64) {
    let solver = &mut scenario.solver;
    for _ in 0..frames {
        solver.update(dt);
    }

    info!(
        "headless: {} frames of {:.5} s, {} bodies, max boundary excess {:.4}, max overlap {:.4}",
        frames, dt, solver.len(), solver.max_boundary_excess(), solver.max_overlap()
    );
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.bench {
        if args.curve {
            bench_update_curve();
        } else {
            bench_broad_phase();
            bench_update();
        }
        return Ok(());
    }

    anyhow::ensure!(args.dt.is_finite() && args.dt >= 0.0, "--dt must be finite and >= 0");

    let scenario = load_scenario(&args.file_name)?;

    match args.headless {
        Some(frames) => run_headless(scenario, frames, args.dt),
        None => run_viewer(scenario)?,
    }

    Ok(())
}

#[cfg(feature = "viewer")]
fn run_viewer(scenario: Scenario) -> Result<()> {
    verletsim::run_2d(scenario);
    Ok(())
}

#[cfg(not(feature = "viewer"))]
fn run_viewer(_scenario: Scenario) -> Result<()> {
    anyhow::bail!("built without the `viewer` feature; pass --headless <FRAMES>")
}
