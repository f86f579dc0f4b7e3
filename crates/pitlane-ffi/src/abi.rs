//! `repr(C)` structs crossing the C boundary, and the stock-default tables
//! the `pitlane_default_*` functions point into.
//!
//! Field order is ABI: append, never reorder.

use std::ptr;

use pitlane_core::defaults::{STOCK_TORQUE_CURVE, STOCK_TRACK_LENGTH_M, STOCK_TRACK_NODES};
use pitlane_core::{BatchLapResult, CarConfig, CarSnapshot, DriverInput, SimConfig, MAX_GEARS};
use pitlane_replay::DeterminismReport;

// ── Track ───────────────────────────────────────────────────────

/// One track centerline node.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PitlaneTrackNode {
    /// Arc-length position, metres.
    pub s: f32,
    /// Signed curvature, 1/m.
    pub curvature: f32,
    /// Elevation, metres.
    pub elevation: f32,
}

/// Track geometry: a borrowed node array and the loop length.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct PitlaneTrackConfig {
    /// `node_count` nodes, ordered by `s`. Copied during creation.
    pub nodes: *const PitlaneTrackNode,
    /// Number of nodes.
    pub node_count: u32,
    /// Loop length, metres.
    pub length_m: f32,
}

impl Default for PitlaneTrackConfig {
    fn default() -> Self {
        Self {
            nodes: ptr::null(),
            node_count: 0,
            length_m: 0.0,
        }
    }
}

// ── Car ─────────────────────────────────────────────────────────

/// One torque curve point.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PitlaneTorquePoint {
    /// Engine speed, rpm.
    pub rpm: f32,
    /// Torque, N·m.
    pub torque_nm: f32,
}

/// Gearbox and engine.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct PitlanePowertrainConfig {
    /// Gear ratios; the first `gear_count` are used.
    pub gear_ratios: [f32; MAX_GEARS],
    /// Number of forward gears, 1 to 8.
    pub gear_count: u32,
    /// Final drive ratio.
    pub final_drive: f32,
    /// Fraction of engine torque reaching the wheels.
    pub driveline_efficiency: f32,
    /// Upshift threshold, rpm.
    pub shift_rpm_up: f32,
    /// Downshift threshold, rpm.
    pub shift_rpm_down: f32,
    /// `torque_curve_count` points, rpm increasing. Copied during creation.
    pub torque_curve: *const PitlaneTorquePoint,
    /// Number of torque points.
    pub torque_curve_count: u32,
}

impl Default for PitlanePowertrainConfig {
    fn default() -> Self {
        Self {
            gear_ratios: [0.0; MAX_GEARS],
            gear_count: 0,
            final_drive: 0.0,
            driveline_efficiency: 0.0,
            shift_rpm_up: 0.0,
            shift_rpm_down: 0.0,
            torque_curve: ptr::null(),
            torque_curve_count: 0,
        }
    }
}

/// Car parameters, shared by every car of a simulation.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct PitlaneCarConfig {
    /// Mass, kg.
    pub mass_kg: f32,
    /// Wheelbase, metres.
    pub wheelbase_m: f32,
    /// Centre of gravity to front axle, metres.
    pub cg_to_front_m: f32,
    /// Centre of gravity to rear axle, metres.
    pub cg_to_rear_m: f32,
    /// Driven tire radius, metres.
    pub tire_radius_m: f32,
    /// Longitudinal friction coefficient.
    pub mu_long: f32,
    /// Lateral friction coefficient.
    pub mu_lat: f32,
    /// Drag area, m².
    pub drag_area_cda: f32,
    /// Downforce area, m².
    pub downforce_area_cla: f32,
    /// Rolling resistance, N.
    pub rolling_resistance_n: f32,
    /// Brake force at full pedal, N.
    pub brake_force_max_n: f32,
    /// Steering-to-curvature gain.
    pub steer_gain: f32,
    /// Gearbox and engine.
    pub powertrain: PitlanePowertrainConfig,
}

// ── Simulation ──────────────────────────────────────────────────

/// Integration and capacity settings.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PitlaneSimConfig {
    /// Fixed timestep, seconds.
    pub fixed_dt: f32,
    /// Car-count ceiling.
    pub max_cars: u32,
    /// Replay log capacity, ticks.
    pub replay_capacity_steps: u32,
}

/// Driver commands for one car for one tick.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PitlaneDriverInput {
    /// Throttle, 0 to 1.
    pub throttle: f32,
    /// Brake, 0 to 1.
    pub brake: f32,
    /// Steering, -1 to 1.
    pub steer: f32,
}

/// Lap times from an unattended batch run.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PitlaneBatchLapResult {
    /// Mean lap time, seconds.
    pub mean_lap_time_s: f32,
    /// Best lap time, seconds.
    pub best_lap_time_s: f32,
    /// Laps actually completed.
    pub laps_completed: u32,
}

/// Full state of one car.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PitlaneCarSnapshot {
    /// Arc-length position, metres.
    pub s_m: f32,
    /// World x, metres.
    pub x_m: f32,
    /// World y, metres.
    pub y_m: f32,
    /// Heading, radians.
    pub yaw_rad: f32,
    /// Speed, m/s.
    pub speed_mps: f32,
    /// Longitudinal acceleration, m/s².
    pub accel_long_mps2: f32,
    /// Lateral acceleration, m/s².
    pub accel_lat_mps2: f32,
    /// Engine speed, rpm.
    pub engine_rpm: f32,
    /// Selected gear, from 1.
    pub gear: u32,
    /// Completed laps.
    pub lap: u32,
    /// Time into the current lap, seconds.
    pub lap_time_s: f32,
    /// Time of the last completed lap, seconds.
    pub last_lap_time_s: f32,
}

/// Outcome of a replay determinism check.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PitlaneDeterminismReport {
    /// Ticks replayed.
    pub frames_replayed: u64,
    /// State hash at the end of capture.
    pub baseline_hash: u64,
    /// State hash after the replay.
    pub replayed_hash: u64,
    /// Number of quantities outside tolerance.
    pub divergence_count: u32,
    /// 1 if every quantity is within tolerance.
    pub deterministic: u8,
    /// 1 if the two states hash identically.
    pub bit_exact: u8,
}

/// Everything the browser runtime needs, flattened into one struct.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct PitlaneWasmInitConfig {
    /// Fixed timestep, seconds.
    pub fixed_dt: f32,
    /// Car-count ceiling.
    pub max_cars: u32,
    /// Replay log capacity, ticks.
    pub replay_capacity_steps: u32,
    /// Cars to simulate, clamped to `max_cars`.
    pub active_cars: u32,

    /// Loop length, metres.
    pub track_length_m: f32,
    /// `track_node_count` nodes. Must not be null.
    pub track_nodes: *const PitlaneTrackNode,
    /// Number of nodes, at least 2.
    pub track_node_count: u32,

    /// Mass, kg.
    pub mass_kg: f32,
    /// Wheelbase, metres.
    pub wheelbase_m: f32,
    /// Centre of gravity to front axle, metres.
    pub cg_to_front_m: f32,
    /// Centre of gravity to rear axle, metres.
    pub cg_to_rear_m: f32,
    /// Driven tire radius, metres.
    pub tire_radius_m: f32,
    /// Longitudinal friction coefficient.
    pub mu_long: f32,
    /// Lateral friction coefficient.
    pub mu_lat: f32,
    /// Drag area, m².
    pub drag_area_cda: f32,
    /// Downforce area, m².
    pub downforce_area_cla: f32,
    /// Rolling resistance, N.
    pub rolling_resistance_n: f32,
    /// Brake force at full pedal, N.
    pub brake_force_max_n: f32,
    /// Steering-to-curvature gain.
    pub steer_gain: f32,

    /// Gear ratios; the first `gear_count` are used.
    pub gear_ratios: [f32; MAX_GEARS],
    /// Number of forward gears; values above 8 are clamped to 8.
    pub gear_count: u32,
    /// Final drive ratio.
    pub final_drive: f32,
    /// Fraction of engine torque reaching the wheels.
    pub driveline_efficiency: f32,
    /// Upshift threshold, rpm.
    pub shift_rpm_up: f32,
    /// Downshift threshold, rpm.
    pub shift_rpm_down: f32,

    /// `torque_curve_count` points. Must not be null.
    pub torque_curve: *const PitlaneTorquePoint,
    /// Number of torque points, at least 2.
    pub torque_curve_count: u32,
}

impl PitlaneWasmInitConfig {
    /// Split into the structs the native API takes.
    pub(crate) fn split(&self) -> (PitlaneSimConfig, PitlaneCarConfig, PitlaneTrackConfig) {
        let sim = PitlaneSimConfig {
            fixed_dt: self.fixed_dt,
            max_cars: self.max_cars,
            replay_capacity_steps: self.replay_capacity_steps,
        };
        let car = PitlaneCarConfig {
            mass_kg: self.mass_kg,
            wheelbase_m: self.wheelbase_m,
            cg_to_front_m: self.cg_to_front_m,
            cg_to_rear_m: self.cg_to_rear_m,
            tire_radius_m: self.tire_radius_m,
            mu_long: self.mu_long,
            mu_lat: self.mu_lat,
            drag_area_cda: self.drag_area_cda,
            downforce_area_cla: self.downforce_area_cla,
            rolling_resistance_n: self.rolling_resistance_n,
            brake_force_max_n: self.brake_force_max_n,
            steer_gain: self.steer_gain,
            powertrain: PitlanePowertrainConfig {
                gear_ratios: self.gear_ratios,
                gear_count: self.gear_count,
                final_drive: self.final_drive,
                driveline_efficiency: self.driveline_efficiency,
                shift_rpm_up: self.shift_rpm_up,
                shift_rpm_down: self.shift_rpm_down,
                torque_curve: self.torque_curve,
                torque_curve_count: self.torque_curve_count,
            },
        };
        let track = PitlaneTrackConfig {
            nodes: self.track_nodes,
            node_count: self.track_node_count,
            length_m: self.track_length_m,
        };
        (sim, car, track)
    }

    /// The stock setup with `active_cars` cars, pointing at the static tables.
    pub fn stock(active_cars: u32) -> Self {
        let sim = PitlaneSimConfig::stock();
        let car = PitlaneCarConfig::stock();
        let track = PitlaneTrackConfig::stock();
        let pt = car.powertrain;
        Self {
            fixed_dt: sim.fixed_dt,
            max_cars: sim.max_cars,
            replay_capacity_steps: sim.replay_capacity_steps,
            active_cars,
            track_length_m: track.length_m,
            track_nodes: track.nodes,
            track_node_count: track.node_count,
            mass_kg: car.mass_kg,
            wheelbase_m: car.wheelbase_m,
            cg_to_front_m: car.cg_to_front_m,
            cg_to_rear_m: car.cg_to_rear_m,
            tire_radius_m: car.tire_radius_m,
            mu_long: car.mu_long,
            mu_lat: car.mu_lat,
            drag_area_cda: car.drag_area_cda,
            downforce_area_cla: car.downforce_area_cla,
            rolling_resistance_n: car.rolling_resistance_n,
            brake_force_max_n: car.brake_force_max_n,
            steer_gain: car.steer_gain,
            gear_ratios: pt.gear_ratios,
            gear_count: pt.gear_count,
            final_drive: pt.final_drive,
            driveline_efficiency: pt.driveline_efficiency,
            shift_rpm_up: pt.shift_rpm_up,
            shift_rpm_down: pt.shift_rpm_down,
            torque_curve: pt.torque_curve,
            torque_curve_count: pt.torque_curve_count,
        }
    }
}

// ── Stock defaults ──────────────────────────────────────────────

/// Stock circuit nodes in ABI layout. Lives for the whole program, so the
/// pointer handed out by `pitlane_default_track_config` never dangles.
static STOCK_TRACK_NODES_ABI: [PitlaneTrackNode; STOCK_TRACK_NODES.len()] = {
    let mut out = [PitlaneTrackNode {
        s: 0.0,
        curvature: 0.0,
        elevation: 0.0,
    }; STOCK_TRACK_NODES.len()];
    let mut i = 0;
    while i < out.len() {
        out[i] = PitlaneTrackNode {
            s: STOCK_TRACK_NODES[i].s_m,
            curvature: STOCK_TRACK_NODES[i].curvature_1pm,
            elevation: STOCK_TRACK_NODES[i].elevation_m,
        };
        i += 1;
    }
    out
};

static STOCK_TORQUE_CURVE_ABI: [PitlaneTorquePoint; STOCK_TORQUE_CURVE.len()] = {
    let mut out = [PitlaneTorquePoint {
        rpm: 0.0,
        torque_nm: 0.0,
    }; STOCK_TORQUE_CURVE.len()];
    let mut i = 0;
    while i < out.len() {
        out[i] = PitlaneTorquePoint {
            rpm: STOCK_TORQUE_CURVE[i].rpm,
            torque_nm: STOCK_TORQUE_CURVE[i].torque_nm,
        };
        i += 1;
    }
    out
};

fn saturating_u32(v: usize) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

impl PitlaneTrackConfig {
    /// The stock circuit.
    pub fn stock() -> Self {
        Self {
            nodes: STOCK_TRACK_NODES_ABI.as_ptr(),
            node_count: saturating_u32(STOCK_TRACK_NODES_ABI.len()),
            length_m: STOCK_TRACK_LENGTH_M,
        }
    }
}

impl PitlaneCarConfig {
    /// The stock car.
    pub fn stock() -> Self {
        let car = CarConfig::default();
        let pt = &car.powertrain;
        let mut gear_ratios = [0.0; MAX_GEARS];
        for (slot, ratio) in gear_ratios.iter_mut().zip(&pt.gear_ratios) {
            *slot = *ratio;
        }
        Self {
            mass_kg: car.mass_kg,
            wheelbase_m: car.wheelbase_m,
            cg_to_front_m: car.cg_to_front_m,
            cg_to_rear_m: car.cg_to_rear_m,
            tire_radius_m: car.tire_radius_m,
            mu_long: car.mu_long,
            mu_lat: car.mu_lat,
            drag_area_cda: car.drag_area_cda,
            downforce_area_cla: car.downforce_area_cla,
            rolling_resistance_n: car.rolling_resistance_n,
            brake_force_max_n: car.brake_force_max_n,
            steer_gain: car.steer_gain,
            powertrain: PitlanePowertrainConfig {
                gear_ratios,
                gear_count: saturating_u32(pt.gear_count()),
                final_drive: pt.final_drive,
                driveline_efficiency: pt.driveline_efficiency,
                shift_rpm_up: pt.shift_rpm_up,
                shift_rpm_down: pt.shift_rpm_down,
                torque_curve: STOCK_TORQUE_CURVE_ABI.as_ptr(),
                torque_curve_count: saturating_u32(STOCK_TORQUE_CURVE_ABI.len()),
            },
        }
    }
}

impl PitlaneSimConfig {
    /// Stock timestep and capacities.
    pub fn stock() -> Self {
        Self::from(&SimConfig::default())
    }
}

// ── Conversions ─────────────────────────────────────────────────

impl From<&SimConfig> for PitlaneSimConfig {
    fn from(c: &SimConfig) -> Self {
        Self {
            fixed_dt: c.fixed_dt,
            max_cars: saturating_u32(c.max_cars),
            replay_capacity_steps: saturating_u32(c.replay_capacity_steps),
        }
    }
}

impl From<PitlaneDriverInput> for DriverInput {
    fn from(i: PitlaneDriverInput) -> Self {
        DriverInput::new(i.throttle, i.brake, i.steer)
    }
}

impl From<BatchLapResult> for PitlaneBatchLapResult {
    fn from(r: BatchLapResult) -> Self {
        Self {
            mean_lap_time_s: r.mean_lap_s,
            best_lap_time_s: r.best_lap_s,
            laps_completed: r.laps_completed,
        }
    }
}

impl From<CarSnapshot> for PitlaneCarSnapshot {
    fn from(s: CarSnapshot) -> Self {
        Self {
            s_m: s.s_m,
            x_m: s.x_m,
            y_m: s.y_m,
            yaw_rad: s.yaw_rad,
            speed_mps: s.speed_mps,
            accel_long_mps2: s.accel_long_mps2,
            accel_lat_mps2: s.accel_lat_mps2,
            engine_rpm: s.engine_rpm,
            gear: s.gear,
            lap: s.lap,
            lap_time_s: s.lap_time_s,
            last_lap_time_s: s.last_lap_time_s,
        }
    }
}

impl From<PitlaneCarSnapshot> for CarSnapshot {
    fn from(s: PitlaneCarSnapshot) -> Self {
        Self {
            s_m: s.s_m,
            x_m: s.x_m,
            y_m: s.y_m,
            yaw_rad: s.yaw_rad,
            speed_mps: s.speed_mps,
            accel_long_mps2: s.accel_long_mps2,
            accel_lat_mps2: s.accel_lat_mps2,
            engine_rpm: s.engine_rpm,
            gear: s.gear,
            lap: s.lap,
            lap_time_s: s.lap_time_s,
            last_lap_time_s: s.last_lap_time_s,
        }
    }
}

impl From<&DeterminismReport> for PitlaneDeterminismReport {
    fn from(r: &DeterminismReport) -> Self {
        Self {
            frames_replayed: r.frames_replayed as u64,
            baseline_hash: r.baseline_hash,
            replayed_hash: r.replayed_hash,
            divergence_count: saturating_u32(r.divergences.len()),
            deterministic: u8::from(r.is_deterministic()),
            bit_exact: u8::from(r.is_bit_exact()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_tables_match_core_defaults() {
        let track = PitlaneTrackConfig::stock();
        assert_eq!(track.node_count, 16);
        assert_eq!(track.length_m, 4600.0);
        assert_eq!(STOCK_TRACK_NODES_ABI[10].curvature, 0.048);
        assert_eq!(STOCK_TRACK_NODES_ABI[15].s, 4500.0);

        let car = PitlaneCarConfig::stock();
        assert_eq!(car.mass_kg, 798.0);
        assert_eq!(car.powertrain.gear_count, 8);
        assert_eq!(car.powertrain.gear_ratios[7], 0.82);
        assert_eq!(car.powertrain.torque_curve_count, 7);
        assert_eq!(STOCK_TORQUE_CURVE_ABI[3].torque_nm, 810.0);

        let sim = PitlaneSimConfig::stock();
        assert_eq!(sim.max_cars, 20);
        assert_eq!(sim.replay_capacity_steps, 120_000);
        assert_eq!(sim.fixed_dt, 1.0 / 240.0);
    }

    #[test]
    fn wasm_split_passes_gear_count_through() {
        let mut flat = PitlaneWasmInitConfig::stock(3);
        flat.gear_count = 12;
        let (sim, car, track) = flat.split();
        assert_eq!(car.powertrain.gear_count, 12);
        assert_eq!(sim.max_cars, 20);
        assert_eq!(track.node_count, 16);
        assert_eq!(car.mass_kg, 798.0);
    }

    #[test]
    fn snapshot_conversion_keeps_every_field() {
        let snap = CarSnapshot {
            s_m: 1.0,
            x_m: 2.0,
            y_m: 3.0,
            yaw_rad: 4.0,
            speed_mps: 5.0,
            accel_long_mps2: 6.0,
            accel_lat_mps2: 7.0,
            engine_rpm: 8.0,
            gear: 2,
            lap: 9,
            lap_time_s: 10.0,
            last_lap_time_s: 11.0,
        };
        assert_eq!(CarSnapshot::from(PitlaneCarSnapshot::from(snap)), snap);
    }
}
