//! Reusable setups and input scripts.
//!
//! - [`stock_setup`] and [`setup_with_cars`]: the stock car on the stock circuit.
//! - [`straight_setup`]: a curvature-free loop, no lateral scrub.
//! - [`coasting_setup`]: straight loop with no drag or rolling resistance,
//!   so a coasting car holds its speed exactly.
//! - [`scripted_inputs`] and [`random_input_script`]: deterministic input
//!   sequences for replay tests.

use pitlane_core::{DriverInput, SimConfig, SimSetup, TrackConfig, TrackNode};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn stock_setup() -> SimSetup {
    SimSetup::default()
}

/// Stock setup with a different car-count ceiling.
pub fn setup_with_cars(max_cars: usize) -> SimSetup {
    SimSetup {
        sim: SimConfig {
            max_cars,
            ..SimConfig::default()
        },
        ..SimSetup::default()
    }
}

/// A flat, curvature-free loop of the given length.
pub fn straight_track(length_m: f32) -> TrackConfig {
    TrackConfig {
        nodes: vec![
            TrackNode {
                s_m: 0.0,
                curvature_1pm: 0.0,
                elevation_m: 0.0,
            },
            TrackNode {
                s_m: length_m * 0.5,
                curvature_1pm: 0.0,
                elevation_m: 0.0,
            },
        ],
        length_m,
    }
}

/// Stock car on a straight loop.
pub fn straight_setup(length_m: f32) -> SimSetup {
    SimSetup {
        track: straight_track(length_m),
        ..SimSetup::default()
    }
}

/// Straight loop, no drag or rolling resistance, custom timestep.
pub fn coasting_setup(length_m: f32, fixed_dt: f32) -> SimSetup {
    let mut setup = straight_setup(length_m);
    setup.sim.fixed_dt = fixed_dt;
    setup.car.drag_area_cda = 0.0;
    setup.car.rolling_resistance_n = 0.0;
    setup
}

/// Inputs for every car at a given tick, varying smoothly with the tick
/// and the car index. Same arguments, same inputs.
pub fn scripted_inputs(tick: u64, car_count: usize) -> Vec<DriverInput> {
    (0..car_count)
        .map(|car| {
            let phase = tick as f32 * 0.01 + car as f32 * 0.7;
            let throttle = 0.75 + 0.25 * phase.sin();
            let brake = if (tick / 600 + car as u64) % 5 == 4 { 0.4 } else { 0.0 };
            DriverInput::new(throttle, brake, 0.3 * (phase * 0.5).cos())
        })
        .collect()
}

/// A seeded random input script: `ticks` frames of `car_count` inputs.
///
/// Values deliberately overshoot the valid ranges so that clamping is
/// exercised.
pub fn random_input_script(seed: u64, ticks: usize, car_count: usize) -> Vec<Vec<DriverInput>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..ticks)
        .map(|_| {
            (0..car_count)
                .map(|_| {
                    DriverInput::new(
                        rng.gen_range(-0.2f32..1.2),
                        if rng.gen_bool(0.15) {
                            rng.gen_range(0.0f32..1.1)
                        } else {
                            0.0
                        },
                        rng.gen_range(-1.3f32..1.3),
                    )
                })
                .collect()
        })
        .collect()
}

/// Full throttle, no brake, no steering, for every car.
pub fn full_throttle(car_count: usize) -> Vec<DriverInput> {
    vec![DriverInput::new(1.0, 0.0, 0.0); car_count]
}
