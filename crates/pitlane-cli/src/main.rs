//! Pitlane command-line harness.
//!
//! Drives the simulator from the terminal: a timed run followed by a batch
//! lap calibration, a record-and-replay determinism check, and a dump of
//! the stock setup as JSON.

mod drive;
mod setup;

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::info;
use pitlane_core::{DriverInput, SimSetup, StateField};
use pitlane_engine::SimulationCore;

use crate::drive::{governed_input, ScriptedDriver};

#[derive(Parser)]
#[command(name = "pitlane")]
#[command(about = "Deterministic fixed-timestep vehicle simulator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive car 0 for a while, then run the batch lap calibration
    Run {
        /// JSON setup file (stock setup when omitted)
        #[arg(long)]
        setup: Option<PathBuf>,

        /// Cars on track
        #[arg(long, default_value = "1")]
        cars: usize,

        /// Simulated seconds to drive before the batch run
        #[arg(long, default_value = "90")]
        seconds: f32,

        /// Laps for the batch run
        #[arg(long, default_value = "5")]
        laps: u32,
    },

    /// Record scripted inputs and check that they replay identically
    Verify {
        /// JSON setup file (stock setup when omitted)
        #[arg(long)]
        setup: Option<PathBuf>,

        /// Ticks to record
        #[arg(long, default_value = "2400")]
        ticks: u64,

        /// Cars on track
        #[arg(long, default_value = "4")]
        cars: usize,

        /// Seed for the scripted inputs
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Print the stock setup as JSON
    Defaults,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Defaults => print_defaults(),
        Commands::Run {
            setup,
            cars,
            seconds,
            laps,
        } => {
            env_logger::init();
            run(setup, cars, seconds, laps)
        }
        Commands::Verify {
            setup,
            ticks,
            cars,
            seed,
        } => {
            env_logger::init();
            verify(setup, ticks, cars, seed)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_defaults() -> Result<ExitCode, Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(&SimSetup::default())?);
    Ok(ExitCode::SUCCESS)
}

fn build_core(path: Option<PathBuf>, cars: usize) -> Result<SimulationCore, Box<dyn Error>> {
    let setup = setup::load(path.as_deref())?;
    let mut core = SimulationCore::new(setup)?;
    core.set_car_count(cars);
    if core.car_count() < cars {
        eprintln!(
            "note: {cars} cars requested, setup allows {}",
            core.car_count()
        );
    }
    Ok(core)
}

fn run(
    path: Option<PathBuf>,
    cars: usize,
    seconds: f32,
    laps: u32,
) -> Result<ExitCode, Box<dyn Error>> {
    let mut core = build_core(path, cars)?;
    if core.car_count() == 0 {
        return Err("setup allows no cars".into());
    }

    let dt = core.dt();
    let ticks = (seconds.max(0.0) / dt).round() as u64;
    let ticks_per_second = (1.0 / dt).round().max(1.0) as u64;
    let mut inputs = vec![DriverInput::NEUTRAL; core.car_count()];
    info!("driving {} cars for {ticks} ticks", core.car_count());

    for tick in 1..=ticks {
        let speed = core.state().speed()[0];
        inputs[0] = governed_input(speed);
        core.step(&inputs);

        if tick % ticks_per_second == 0 {
            let view = core.state();
            println!(
                "t={:6.1}s  speed={:6.2} m/s  gear={}  rpm={:7.0}  lap={}  last={:.3}s",
                tick as f32 * dt,
                view.speed()[0],
                view.gear()[0],
                view.engine_rpm()[0],
                view.lap()[0],
                view.field(StateField::LastLapTime)[0],
            );
        }
    }

    let batch = core.run_batch_laps(0, laps);
    println!(
        "batch mean lap: {:.3}s best: {:.3}s laps: {}",
        batch.mean_lap_s, batch.best_lap_s, batch.laps_completed
    );
    Ok(ExitCode::SUCCESS)
}

fn verify(
    path: Option<PathBuf>,
    ticks: u64,
    cars: usize,
    seed: u64,
) -> Result<ExitCode, Box<dyn Error>> {
    let mut core = build_core(path, cars)?;
    let mut driver = ScriptedDriver::new(seed);
    let mut inputs = Vec::with_capacity(core.car_count());

    core.start_replay_capture();
    for _ in 0..ticks {
        driver.fill(core.car_count(), &mut inputs);
        core.step(&inputs);
    }
    core.stop_replay_capture();

    let log = core.replay_log();
    if log.dropped_ticks() > 0 {
        println!(
            "capture full: {} ticks recorded, {} not recorded",
            log.len(),
            log.dropped_ticks()
        );
    }

    let report = core.verify_replay_determinism()?;
    println!(
        "replayed {} ticks  baseline={:016x}  replayed={:016x}  divergent cars={}",
        report.frames_replayed,
        report.baseline_hash,
        report.replayed_hash,
        report.divergences.len()
    );
    for d in &report.divergences {
        println!("  {d}");
    }

    if report.is_deterministic() {
        let exact = if report.is_bit_exact() { " (bit-exact)" } else { "" };
        println!("deterministic{exact}");
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("replay diverged");
        Ok(ExitCode::FAILURE)
    }
}
