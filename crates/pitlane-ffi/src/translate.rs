//! The one translation from ABI structs into a validated [`SimSetup`].
//!
//! Both the native API and the browser runtime build their cores through
//! [`setup_from_abi`], so the two cannot disagree about how a C-side
//! configuration is read.

use pitlane_core::{
    CarConfig, ConfigError, PowertrainConfig, SimConfig, SimSetup, TorquePoint, TrackConfig,
    TrackNode, MAX_GEARS,
};
use smallvec::SmallVec;

use crate::abi::{PitlaneCarConfig, PitlaneSimConfig, PitlaneTrackConfig};

/// Borrow `count` elements at `ptr`, or an empty slice when `ptr` is null
/// or `count` is zero.
///
/// # Safety
///
/// A non-null `ptr` must point to `count` initialised, aligned `T`s that
/// stay valid and unaliased by writers for `'a`.
#[allow(unsafe_code)]
pub(crate) unsafe fn slice_or_empty<'a, T>(ptr: *const T, count: usize) -> &'a [T] {
    if ptr.is_null() || count == 0 {
        &[]
    } else {
        // SAFETY: non-null and sized per the caller contract.
        unsafe { std::slice::from_raw_parts(ptr, count) }
    }
}

/// Copy the C-side configuration into owned config types and validate it.
///
/// Null node or torque-curve pointers are reported as missing data. More
/// than eight gears is rejected rather than truncated.
///
/// # Safety
///
/// The node and torque-curve pointers must each be null or point to as
/// many elements as their count fields say.
#[allow(unsafe_code)]
pub(crate) unsafe fn setup_from_abi(
    sim: &PitlaneSimConfig,
    car: &PitlaneCarConfig,
    track: &PitlaneTrackConfig,
) -> Result<SimSetup, ConfigError> {
    if track.nodes.is_null() {
        return Err(ConfigError::MissingTrackNodes);
    }
    let pt = &car.powertrain;
    if pt.torque_curve.is_null() {
        return Err(ConfigError::MissingTorqueCurve);
    }
    let gear_count = pt.gear_count as usize;
    if gear_count > MAX_GEARS {
        return Err(ConfigError::InvalidGearCount { count: gear_count });
    }

    // SAFETY: non-null, sized per the caller contract.
    let nodes = unsafe { slice_or_empty(track.nodes, track.node_count as usize) };
    let curve = unsafe { slice_or_empty(pt.torque_curve, pt.torque_curve_count as usize) };

    let setup = SimSetup {
        sim: SimConfig {
            fixed_dt: sim.fixed_dt,
            max_cars: sim.max_cars as usize,
            replay_capacity_steps: sim.replay_capacity_steps as usize,
        },
        car: CarConfig {
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
            powertrain: PowertrainConfig {
                gear_ratios: SmallVec::from_slice(&pt.gear_ratios[..gear_count]),
                final_drive: pt.final_drive,
                driveline_efficiency: pt.driveline_efficiency,
                shift_rpm_up: pt.shift_rpm_up,
                shift_rpm_down: pt.shift_rpm_down,
                torque_curve: curve
                    .iter()
                    .map(|p| TorquePoint {
                        rpm: p.rpm,
                        torque_nm: p.torque_nm,
                    })
                    .collect(),
            },
        },
        track: TrackConfig {
            nodes: nodes
                .iter()
                .map(|n| TrackNode {
                    s_m: n.s,
                    curvature_1pm: n.curvature,
                    elevation_m: n.elevation,
                })
                .collect(),
            length_m: track.length_m,
        },
    };
    setup.validate()?;
    Ok(setup)
}
