//! Stock configuration tables.
//!
//! A 4.6 km circuit and an open-wheel car tuned for it. These are the values
//! every `Default` impl in [`config`](crate::config) reproduces, and the
//! values the C ABI hands out from its `pitlane_default_*` entry points.

use crate::config::{TorquePoint, TrackNode};

const fn node(s_m: f32, curvature_1pm: f32, elevation_m: f32) -> TrackNode {
    TrackNode {
        s_m,
        curvature_1pm,
        elevation_m,
    }
}

const fn point(rpm: f32, torque_nm: f32) -> TorquePoint {
    TorquePoint { rpm, torque_nm }
}

/// Loop length of the stock circuit in metres.
pub const STOCK_TRACK_LENGTH_M: f32 = 4600.0;

/// Centerline nodes of the stock circuit.
pub const STOCK_TRACK_NODES: [TrackNode; 16] = [
    node(0.0, 0.0, 0.0),
    node(350.0, 0.0, 0.0),
    node(620.0, 0.018, 0.5),
    node(810.0, 0.040, 1.0),
    node(980.0, 0.008, 1.5),
    node(1220.0, -0.010, 1.2),
    node(1600.0, -0.024, 0.8),
    node(1880.0, -0.006, 0.3),
    node(2250.0, 0.0, -0.2),
    node(2600.0, 0.022, -0.5),
    node(2820.0, 0.048, -0.8),
    node(3000.0, 0.005, -1.0),
    node(3400.0, -0.010, -0.6),
    node(3800.0, -0.030, -0.1),
    node(4150.0, -0.004, 0.2),
    node(4500.0, 0.0, 0.0),
];

/// Engine torque curve of the stock car.
pub const STOCK_TORQUE_CURVE: [TorquePoint; 7] = [
    point(4000.0, 510.0),
    point(6000.0, 640.0),
    point(8000.0, 760.0),
    point(9500.0, 810.0),
    point(11000.0, 780.0),
    point(12000.0, 730.0),
    point(13000.0, 640.0),
];

/// Gear ratios of the stock eight-speed gearbox, first gear first.
pub const STOCK_GEAR_RATIOS: [f32; 8] = [3.18, 2.31, 1.79, 1.45, 1.22, 1.05, 0.92, 0.82];

/// Stock fixed timestep: 240 Hz.
pub const STOCK_FIXED_DT: f32 = 1.0 / 240.0;

/// Stock car-count ceiling.
pub const STOCK_MAX_CARS: usize = 20;

/// Stock replay capacity: 500 s of capture at 240 Hz.
pub const STOCK_REPLAY_CAPACITY_STEPS: usize = 120_000;
