//! Simulation configuration.
//!
//! [`SimSetup`] bundles the three configuration blocks a simulation is built
//! from. Every block has a `Default` reproducing the stock values in
//! [`defaults`](crate::defaults), and a `validate()` that performs all
//! structural checks so the integrator itself never has to.

use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::defaults::{
    STOCK_FIXED_DT, STOCK_GEAR_RATIOS, STOCK_MAX_CARS, STOCK_REPLAY_CAPACITY_STEPS,
    STOCK_TORQUE_CURVE, STOCK_TRACK_LENGTH_M, STOCK_TRACK_NODES,
};
use crate::error::ConfigError;

/// Maximum number of forward gears a gearbox may declare.
pub const MAX_GEARS: usize = 8;

/// Upper bound on [`SimConfig::max_cars`]. Car state is reserved up front.
pub const MAX_CARS_LIMIT: usize = 4096;

/// Upper bound on [`SimConfig::replay_capacity_steps`]: ten hours at 240 Hz.
pub const MAX_REPLAY_CAPACITY_STEPS: usize = 8_640_000;

// ── Track ───────────────────────────────────────────────────────

/// A sample point along the track centerline.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackNode {
    /// Arc-length position along the loop, metres.
    pub s_m: f32,
    /// Signed path curvature at this node, 1/m.
    pub curvature_1pm: f32,
    /// Height of the centerline at this node, metres.
    pub elevation_m: f32,
}

/// A closed-loop track described by ordered centerline nodes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackConfig {
    /// Nodes in strictly increasing `s_m` order.
    pub nodes: Vec<TrackNode>,
    /// Total loop length, metres. Positions wrap at this value.
    pub length_m: f32,
}

impl TrackConfig {
    /// Check the structural invariants of the track.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.nodes.len() {
            0 => return Err(ConfigError::MissingTrackNodes),
            1 => return Err(ConfigError::TooFewTrackNodes { count: 1 }),
            _ => {}
        }
        if !self.length_m.is_finite() || self.length_m <= 1.0 {
            return Err(ConfigError::TrackTooShort {
                length_m: self.length_m,
            });
        }
        for (index, pair) in self.nodes.windows(2).enumerate() {
            if pair[1].s_m.partial_cmp(&pair[0].s_m) != Some(Ordering::Greater) {
                return Err(ConfigError::UnorderedTrackNodes { index: index + 1 });
            }
        }
        Ok(())
    }
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            nodes: STOCK_TRACK_NODES.to_vec(),
            length_m: STOCK_TRACK_LENGTH_M,
        }
    }
}

// ── Powertrain ──────────────────────────────────────────────────

/// One point of an engine torque curve.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TorquePoint {
    /// Engine speed, revolutions per minute.
    pub rpm: f32,
    /// Full-throttle torque at that speed, newton-metres.
    pub torque_nm: f32,
}

/// Gearbox, final drive and engine torque characteristics.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PowertrainConfig {
    /// Forward gear ratios, first gear first. At most [`MAX_GEARS`].
    pub gear_ratios: SmallVec<[f32; MAX_GEARS]>,
    /// Final drive ratio applied on top of every gear.
    pub final_drive: f32,
    /// Fraction of engine torque reaching the wheels.
    pub driveline_efficiency: f32,
    /// Upshift when the engine exceeds this speed.
    pub shift_rpm_up: f32,
    /// Downshift when the engine falls below this speed.
    pub shift_rpm_down: f32,
    /// Full-throttle torque curve, strictly increasing in rpm.
    pub torque_curve: Vec<TorquePoint>,
}

impl PowertrainConfig {
    /// Number of forward gears.
    pub fn gear_count(&self) -> usize {
        self.gear_ratios.len()
    }

    /// Check gearbox and torque-curve invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let gears = self.gear_ratios.len();
        if gears == 0 || gears > MAX_GEARS {
            return Err(ConfigError::InvalidGearCount { count: gears });
        }
        match self.torque_curve.len() {
            0 => return Err(ConfigError::MissingTorqueCurve),
            1 => return Err(ConfigError::TooFewTorquePoints { count: 1 }),
            _ => {}
        }
        for (index, pair) in self.torque_curve.windows(2).enumerate() {
            if pair[1].rpm.partial_cmp(&pair[0].rpm) != Some(Ordering::Greater) {
                return Err(ConfigError::NonMonotonicTorqueCurve { index: index + 1 });
            }
        }
        Ok(())
    }
}

impl Default for PowertrainConfig {
    fn default() -> Self {
        Self {
            gear_ratios: SmallVec::from_slice(&STOCK_GEAR_RATIOS),
            final_drive: 3.05,
            driveline_efficiency: 0.92,
            shift_rpm_up: 11_800.0,
            shift_rpm_down: 6_200.0,
            torque_curve: STOCK_TORQUE_CURVE.to_vec(),
        }
    }
}

// ── Car ─────────────────────────────────────────────────────────

/// Physical parameters shared by every car in a simulation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CarConfig {
    /// Mass including driver, kg.
    pub mass_kg: f32,
    /// Distance between axles, metres.
    pub wheelbase_m: f32,
    /// Centre of gravity to front axle, metres. Informational.
    pub cg_to_front_m: f32,
    /// Centre of gravity to rear axle, metres. Informational.
    pub cg_to_rear_m: f32,
    /// Driven tire rolling radius, metres.
    pub tire_radius_m: f32,
    /// Longitudinal friction coefficient.
    pub mu_long: f32,
    /// Lateral friction coefficient.
    pub mu_lat: f32,
    /// Drag coefficient times frontal area, m².
    pub drag_area_cda: f32,
    /// Lift coefficient times area (downforce), m².
    pub downforce_area_cla: f32,
    /// Constant rolling resistance force, newtons.
    pub rolling_resistance_n: f32,
    /// Brake force at full pedal, newtons.
    pub brake_force_max_n: f32,
    /// Steering input to curvature gain.
    pub steer_gain: f32,
    /// Engine and gearbox.
    pub powertrain: PowertrainConfig,
}

impl CarConfig {
    /// Check the car's physical parameters and its powertrain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.mass_kg.is_finite() || self.mass_kg <= 0.0 {
            return Err(ConfigError::NonPositiveParameter {
                name: "mass_kg",
                value: self.mass_kg,
            });
        }
        self.powertrain.validate()
    }
}

impl Default for CarConfig {
    fn default() -> Self {
        Self {
            mass_kg: 798.0,
            wheelbase_m: 3.6,
            cg_to_front_m: 1.6,
            cg_to_rear_m: 2.0,
            tire_radius_m: 0.34,
            mu_long: 1.85,
            mu_lat: 2.1,
            drag_area_cda: 1.12,
            downforce_area_cla: 3.2,
            rolling_resistance_n: 180.0,
            brake_force_max_n: 18_500.0,
            steer_gain: 0.22,
            powertrain: PowertrainConfig::default(),
        }
    }
}

// ── Simulation ──────────────────────────────────────────────────

/// Integration and capacity settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Fixed integration step, seconds.
    pub fixed_dt: f32,
    /// Ceiling on the number of simulated cars. Zero is allowed and yields
    /// an empty simulation.
    pub max_cars: usize,
    /// Maximum number of ticks a replay capture retains.
    pub replay_capacity_steps: usize,
}

impl SimConfig {
    /// Check the timestep and the capacity ceilings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fixed_dt.is_finite() || self.fixed_dt <= 0.0 {
            return Err(ConfigError::InvalidTimestep {
                value: self.fixed_dt,
            });
        }
        if self.max_cars > MAX_CARS_LIMIT {
            return Err(ConfigError::CapacityTooLarge {
                name: "max_cars",
                value: self.max_cars,
                max: MAX_CARS_LIMIT,
            });
        }
        if self.replay_capacity_steps > MAX_REPLAY_CAPACITY_STEPS {
            return Err(ConfigError::CapacityTooLarge {
                name: "replay_capacity_steps",
                value: self.replay_capacity_steps,
                max: MAX_REPLAY_CAPACITY_STEPS,
            });
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_dt: STOCK_FIXED_DT,
            max_cars: STOCK_MAX_CARS,
            replay_capacity_steps: STOCK_REPLAY_CAPACITY_STEPS,
        }
    }
}

/// Everything needed to construct a simulation.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimSetup {
    /// Integration and capacity settings.
    pub sim: SimConfig,
    /// Car parameters, shared by every car.
    pub car: CarConfig,
    /// Track geometry.
    pub track: TrackConfig,
}

impl SimSetup {
    /// Validate every block, returning the first error found.
    ///
    /// Checks run in order: simulation settings, track, car.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sim.validate()?;
        self.track.validate()?;
        self.car.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_setup_is_valid() {
        assert!(SimSetup::default().validate().is_ok());
    }

    #[test]
    fn stock_values_match_tables() {
        let setup = SimSetup::default();
        assert_eq!(setup.track.nodes.len(), 16);
        assert_eq!(setup.track.length_m, 4600.0);
        assert_eq!(setup.car.powertrain.gear_count(), 8);
        assert_eq!(setup.car.powertrain.torque_curve.len(), 7);
        assert_eq!(setup.sim.max_cars, 20);
        assert_eq!(setup.sim.replay_capacity_steps, 120_000);
        assert_eq!(setup.sim.fixed_dt, 1.0 / 240.0);
    }

    #[test]
    fn empty_track_rejected() {
        let mut track = TrackConfig::default();
        track.nodes.clear();
        assert_eq!(track.validate(), Err(ConfigError::MissingTrackNodes));
    }

    #[test]
    fn single_node_track_rejected() {
        let mut track = TrackConfig::default();
        track.nodes.truncate(1);
        assert_eq!(
            track.validate(),
            Err(ConfigError::TooFewTrackNodes { count: 1 })
        );
    }

    #[test]
    fn short_track_rejected() {
        for length_m in [1.0, 0.5, -10.0, f32::NAN, f32::INFINITY] {
            let track = TrackConfig {
                length_m,
                ..TrackConfig::default()
            };
            match track.validate() {
                Err(ConfigError::TrackTooShort { .. }) => {}
                other => panic!("length {length_m}: expected TrackTooShort, got {other:?}"),
            }
        }
    }

    #[test]
    fn unordered_nodes_rejected() {
        let mut track = TrackConfig::default();
        track.nodes[3].s_m = track.nodes[2].s_m;
        assert_eq!(
            track.validate(),
            Err(ConfigError::UnorderedTrackNodes { index: 3 })
        );
    }

    #[test]
    fn gear_count_bounds() {
        let mut pt = PowertrainConfig::default();
        pt.gear_ratios.clear();
        assert_eq!(pt.validate(), Err(ConfigError::InvalidGearCount { count: 0 }));
        pt.gear_ratios = SmallVec::from_slice(&[1.0; 9]);
        assert_eq!(pt.validate(), Err(ConfigError::InvalidGearCount { count: 9 }));
        pt.gear_ratios = SmallVec::from_slice(&[1.0]);
        assert!(pt.validate().is_ok());
    }

    #[test]
    fn torque_curve_checks() {
        let mut pt = PowertrainConfig::default();
        pt.torque_curve.truncate(1);
        assert_eq!(
            pt.validate(),
            Err(ConfigError::TooFewTorquePoints { count: 1 })
        );
        pt.torque_curve.clear();
        assert_eq!(pt.validate(), Err(ConfigError::MissingTorqueCurve));

        let mut pt = PowertrainConfig::default();
        pt.torque_curve.swap(2, 3);
        assert_eq!(
            pt.validate(),
            Err(ConfigError::NonMonotonicTorqueCurve { index: 3 })
        );
    }

    #[test]
    fn non_positive_mass_rejected() {
        let car = CarConfig {
            mass_kg: 0.0,
            ..CarConfig::default()
        };
        match car.validate() {
            Err(ConfigError::NonPositiveParameter { name: "mass_kg", .. }) => {}
            other => panic!("expected NonPositiveParameter, got {other:?}"),
        }
    }

    #[test]
    fn invalid_timestep_rejected() {
        for fixed_dt in [0.0, -0.01, f32::NAN, f32::INFINITY] {
            let sim = SimConfig {
                fixed_dt,
                ..SimConfig::default()
            };
            assert!(matches!(
                sim.validate(),
                Err(ConfigError::InvalidTimestep { .. })
            ));
        }
    }

    #[test]
    fn oversized_capacities_rejected() {
        let sim = SimConfig {
            max_cars: MAX_CARS_LIMIT + 1,
            ..SimConfig::default()
        };
        match sim.validate() {
            Err(ConfigError::CapacityTooLarge { name: "max_cars", max, .. }) => {
                assert_eq!(max, MAX_CARS_LIMIT);
            }
            other => panic!("expected CapacityTooLarge, got {other:?}"),
        }

        let sim = SimConfig {
            replay_capacity_steps: u32::MAX as usize,
            ..SimConfig::default()
        };
        assert!(matches!(
            sim.validate(),
            Err(ConfigError::CapacityTooLarge {
                name: "replay_capacity_steps",
                ..
            })
        ));

        let at_limit = SimConfig {
            max_cars: MAX_CARS_LIMIT,
            replay_capacity_steps: MAX_REPLAY_CAPACITY_STEPS,
            ..SimConfig::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn zero_max_cars_is_accepted() {
        let setup = SimSetup {
            sim: SimConfig {
                max_cars: 0,
                ..SimConfig::default()
            },
            ..SimSetup::default()
        };
        assert!(setup.validate().is_ok());
    }

    #[test]
    fn setup_reports_sim_errors_before_track_errors() {
        let mut setup = SimSetup::default();
        setup.sim.fixed_dt = 0.0;
        setup.track.nodes.clear();
        assert!(matches!(
            setup.validate(),
            Err(ConfigError::InvalidTimestep { .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_falls_back_to_stock_values() {
        let setup: SimSetup =
            serde_json::from_str(r#"{ "sim": { "max_cars": 4 }, "car": { "mass_kg": 750.0 } }"#)
                .unwrap();
        assert_eq!(setup.sim.max_cars, 4);
        assert_eq!(setup.sim.fixed_dt, 1.0 / 240.0);
        assert_eq!(setup.car.mass_kg, 750.0);
        assert_eq!(setup.car.powertrain.gear_count(), 8);
        assert_eq!(setup.track.nodes.len(), 16);
    }
}
