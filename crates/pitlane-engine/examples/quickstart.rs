//! Pitlane Quickstart: a small grid of cars on the stock circuit.
//!
//! Demonstrates:
//!   1. Building a core from the stock setup
//!   2. Driving several cars with a simple curvature-following policy
//!   3. Reading the state arrays through a view
//!   4. Capturing a replay and checking it for determinism
//!   5. Running an unattended batch of laps
//!
//! Run with:
//!   cargo run --example quickstart
//!
//! Set `RUST_LOG=debug` to see the core's own log lines.

use pitlane_core::{DriverInput, SimSetup};
use pitlane_engine::{calibration_input, FixedStepClock, SimulationCore};

const CARS: usize = 4;
const SECONDS: u32 = 30;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== Pitlane Quickstart ===\n");

    // 1. Build the core.
    let mut core = SimulationCore::new(SimSetup::default())?;
    core.set_car_count(CARS);
    println!(
        "Track: {:.0} m, {} nodes. Cars: {}, dt = {:.5} s\n",
        core.track().length(),
        core.track().node_count(),
        core.car_count(),
        core.dt()
    );

    // 2. Drive for SECONDS of sim time, pacing with a fixed-step clock the
    // way a frame-driven host would. Each car is a little less committed
    // than the one ahead of it.
    core.start_replay_capture();
    let mut clock = FixedStepClock::new(core.dt());
    let frame_s = 1.0 / 60.0;
    let mut inputs = vec![DriverInput::NEUTRAL; CARS];
    for frame in 0..SECONDS * 60 {
        for _ in 0..clock.advance(frame_s) {
            let view = core.state();
            for (i, input) in inputs.iter_mut().enumerate() {
                let curvature = core.track().curvature(view.s()[i]);
                let mut policy = calibration_input(curvature, view.speed()[i]);
                policy.throttle *= 1.0 - 0.05 * i as f32;
                *input = policy;
            }
            core.step(&inputs);
        }

        if (frame + 1) % 600 == 0 {
            let view = core.state();
            println!("  t = {:>3} s", (frame + 1) / 60);
            for i in 0..view.car_count() {
                println!(
                    "    car {i}: s={:>7.1} m  v={:>5.1} m/s  gear={}  rpm={:>5.0}  lap={}",
                    view.s()[i],
                    view.speed()[i],
                    view.gear()[i],
                    view.engine_rpm()[i],
                    view.lap()[i],
                );
            }
        }
    }
    core.stop_replay_capture();

    // 3. Check the capture replays exactly.
    let report = core.verify_replay_determinism()?;
    println!(
        "\nReplayed {} ticks: deterministic={}, bit-exact={} (hash {:016x})",
        report.frames_replayed,
        report.is_deterministic(),
        report.is_bit_exact(),
        report.replayed_hash
    );

    // 4. Unattended laps for car 0.
    let result = core.run_batch_laps(0, 2);
    println!(
        "\nBatch: {} laps, mean {:.3} s, best {:.3} s",
        result.laps_completed, result.mean_lap_s, result.best_lap_s
    );

    println!("Done.");
    Ok(())
}
