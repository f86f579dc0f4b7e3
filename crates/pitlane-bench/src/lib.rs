//! Benchmark profiles for the Pitlane vehicle simulator.
//!
//! Provides pre-built cores for benchmarking and examples:
//!
//! - [`grid_profile`]: the stock car and circuit with a full grid of cars
//! - [`warmed_profile`]: the same grid after running for a while, so cars
//!   are spread around the lap in different gears
//! - [`profile_inputs`]: per-car inputs derived from the calibration driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use pitlane_core::{ConfigError, DriverInput};
use pitlane_engine::{calibration_input, SimulationCore};
use pitlane_test_utils::setup_with_cars;

/// Stock car on the stock circuit with `cars` cars on the line.
///
/// # Errors
///
/// Only if the stock setup itself fails validation.
pub fn grid_profile(cars: usize) -> Result<SimulationCore, ConfigError> {
    let mut core = SimulationCore::new(setup_with_cars(cars.max(1)))?;
    core.set_car_count(cars);
    Ok(core)
}

/// [`grid_profile`] after `ticks` steps of [`profile_inputs`].
///
/// # Errors
///
/// Only if the stock setup itself fails validation.
pub fn warmed_profile(cars: usize, ticks: u32) -> Result<SimulationCore, ConfigError> {
    let mut core = grid_profile(cars)?;
    let mut inputs = Vec::with_capacity(cars);
    for _ in 0..ticks {
        profile_inputs(&core, &mut inputs);
        core.step(&inputs);
    }
    Ok(core)
}

/// Fill `out` with the calibration driver's input for every car, each
/// scaled down slightly by car index so the grid spreads out.
pub fn profile_inputs(core: &SimulationCore, out: &mut Vec<DriverInput>) {
    let view = core.state();
    out.clear();
    out.extend(view.s().iter().zip(view.speed()).enumerate().map(|(i, (&s, &v))| {
        let base = calibration_input(core.track().curvature(s), v);
        DriverInput {
            throttle: base.throttle * (1.0 - 0.02 * i as f32),
            ..base
        }
    }));
}
