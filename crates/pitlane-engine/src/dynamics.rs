//! Point-mass longitudinal and lateral dynamics for one car over one tick.

use pitlane_core::{CarConfig, DriverInput};
use pitlane_track::TrackProfile;

use crate::powertrain::Powertrain;
use crate::state::CarStateSoA;

/// Air density at sea level, kg/m³.
pub const AIR_DENSITY: f32 = 1.225;
/// Standard gravity, m/s².
pub const GRAVITY: f32 = 9.80665;

const MIN_TIRE_RADIUS_M: f32 = 0.05;
const MIN_STEER_WHEELBASE_M: f32 = 1.0;
/// Below this the lateral demand is treated as zero.
const LATERAL_DEMAND_EPSILON: f32 = 1e-3;
/// Speed lost per second at full lateral saturation, m/s².
const SCRUB_DECEL_MPS2: f32 = 4.0;
/// No yaw rate is derived below this speed.
const YAW_SPEED_FLOOR_MPS: f32 = 0.1;

/// Everything shared by every car during one tick.
pub(crate) struct Integrator<'a> {
    car: &'a CarConfig,
    track: &'a TrackProfile,
    powertrain: Powertrain<'a>,
    dt: f32,
}

impl<'a> Integrator<'a> {
    pub(crate) fn new(car: &'a CarConfig, track: &'a TrackProfile, dt: f32) -> Self {
        Self {
            car,
            track,
            powertrain: Powertrain::new(&car.powertrain),
            dt,
        }
    }

    /// Advance car `i` by one tick.
    ///
    /// The shift decision reads the engine speed stored on the previous
    /// tick; the new gear's ratio then drives this tick's forces.
    pub(crate) fn advance(&self, state: &mut CarStateSoA, i: usize, input: DriverInput) {
        let car = self.car;
        let dt = self.dt;
        let input = input.clamped();

        let v = state.speed[i].max(0.0);
        let curv_track = self.track.curvature(state.s[i]);

        state.gear[i] = self.powertrain.shift(state.gear[i], state.engine_rpm[i]);
        let ratio = self.powertrain.overall_ratio(state.gear[i]);

        let engine_rpm = Powertrain::engine_rpm(v, car.tire_radius_m, ratio);
        state.engine_rpm[i] = engine_rpm;

        // Longitudinal.
        let engine_torque = self.powertrain.engine_torque_nm(engine_rpm) * input.throttle;
        let drive_torque = engine_torque * ratio * self.powertrain.efficiency();
        let f_drive = drive_torque / car.tire_radius_m.max(MIN_TIRE_RADIUS_M);

        let downforce = 0.5 * AIR_DENSITY * car.downforce_area_cla * v * v;
        let normal = car.mass_kg * GRAVITY + downforce;

        let f_long_max = car.mu_long * normal;
        let f_drive_limited = f_drive.min(f_long_max);
        let f_brake = input.brake * car.brake_force_max_n;
        let f_drag = 0.5 * AIR_DENSITY * car.drag_area_cda * v * v;

        let f_net_long = f_drive_limited - f_brake - car.rolling_resistance_n - f_drag;
        let a_long = f_net_long / car.mass_kg;

        // Lateral.
        let curv_cmd =
            curv_track + input.steer * car.steer_gain / car.wheelbase_m.max(MIN_STEER_WHEELBASE_M);
        let a_lat_unclamped = v * v * curv_cmd;
        let a_lat_max = car.mu_lat * normal / car.mass_kg;
        let a_lat = clampf(a_lat_unclamped, -a_lat_max, a_lat_max);

        let lat_saturation = if a_lat_unclamped.abs() > LATERAL_DEMAND_EPSILON {
            (a_lat.abs() / a_lat_unclamped.abs()).min(1.0)
        } else {
            1.0
        };
        let a_scrub = (1.0 - lat_saturation) * SCRUB_DECEL_MPS2;

        // Integrate.
        let v_next = (v + (a_long - a_scrub) * dt).max(0.0);

        let yaw_rate = if v_next > YAW_SPEED_FLOOR_MPS {
            a_lat / v_next
        } else {
            0.0
        };
        state.yaw[i] += yaw_rate * dt;

        let yaw = state.yaw[i];
        state.x[i] += yaw.cos() * v_next * dt;
        state.y[i] += yaw.sin() * v_next * dt;

        state.s[i] += v_next * dt;
        let length = self.track.length();
        while state.s[i] >= length {
            let next = state.s[i] - length;
            // Subtraction lost to rounding: fall back to a remainder.
            state.s[i] = if next == state.s[i] {
                state.s[i].rem_euclid(length)
            } else {
                next
            };
            state.last_lap_time[i] = state.lap_time[i];
            state.lap_time[i] = 0.0;
            state.lap[i] = state.lap[i].wrapping_add(1);
        }

        state.lap_time[i] += dt;
        state.speed[i] = v_next;
        state.accel_long[i] = a_long;
        state.accel_lat[i] = a_lat;
    }
}

/// `max(lo, min(hi, x))`. Never panics, unlike `f32::clamp`, when the
/// bounds are inverted or NaN.
fn clampf(x: f32, lo: f32, hi: f32) -> f32 {
    x.min(hi).max(lo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitlane_core::{SimSetup, TrackConfig};

    fn stock_parts() -> (CarConfig, TrackProfile) {
        let setup = SimSetup::default();
        (setup.car, TrackProfile::load(&TrackConfig::default()).unwrap())
    }

    #[test]
    fn first_tick_from_rest_accelerates() {
        let (car, track) = stock_parts();
        let mut state = CarStateSoA::with_capacity(1);
        state.rebuild(1);
        Integrator::new(&car, &track, 1.0 / 240.0).advance(
            &mut state,
            0,
            DriverInput::new(1.0, 0.0, 0.0),
        );
        assert!(state.speed[0] > 0.0);
        assert!(state.accel_long[0] > 0.0);
        assert_eq!(state.gear[0], 1);
        assert!(state.lap_time[0] > 0.0);
    }

    #[test]
    fn braking_at_rest_stays_at_rest() {
        let (car, track) = stock_parts();
        let mut state = CarStateSoA::with_capacity(1);
        state.rebuild(1);
        let integrator = Integrator::new(&car, &track, 1.0 / 240.0);
        for _ in 0..10 {
            integrator.advance(&mut state, 0, DriverInput::new(0.0, 1.0, 0.0));
        }
        assert_eq!(state.speed[0], 0.0);
        assert_eq!(state.s[0], 0.0);
        assert_eq!(state.yaw[0], 0.0);
    }

    #[test]
    fn inverted_grip_bounds_do_not_panic() {
        let (mut car, track) = stock_parts();
        car.mu_lat = -1.0;
        let mut state = CarStateSoA::with_capacity(1);
        state.rebuild(1);
        state.speed[0] = 30.0;
        Integrator::new(&car, &track, 1.0 / 240.0).advance(
            &mut state,
            0,
            DriverInput::new(0.5, 0.0, 1.0),
        );
        assert!(state.speed[0] >= 0.0);
    }

    #[test]
    fn lateral_saturation_costs_speed_in_the_same_tick() {
        let car = SimSetup::default().car;
        let track = TrackProfile::load(&pitlane_test_utils::straight_track(4600.0)).unwrap();
        let integrator = Integrator::new(&car, &track, 1.0 / 240.0);

        let run = |steer: f32| {
            let mut state = CarStateSoA::with_capacity(1);
            state.rebuild(1);
            state.speed[0] = 60.0;
            state.gear[0] = 4;
            state.engine_rpm[0] = 9000.0;
            integrator.advance(&mut state, 0, DriverInput::new(1.0, 0.0, steer));
            state
        };
        let free = run(0.0);
        let saturated = run(1.0);

        assert_eq!(free.accel_lat[0], 0.0);
        assert_eq!(free.accel_long[0], saturated.accel_long[0]);
        assert!(
            saturated.speed[0] < free.speed[0],
            "scrub not applied: {} vs {}",
            saturated.speed[0],
            free.speed[0]
        );
        // Grip-limited, so the demand (v² × 0.22 / 3.6 ≈ 220 m/s²) is cut.
        assert!(saturated.accel_lat[0] > 0.0 && saturated.accel_lat[0] < 60.0);
    }

    #[test]
    fn clampf_matches_clamp_for_ordered_bounds() {
        assert_eq!(clampf(5.0, -1.0, 1.0), 1.0);
        assert_eq!(clampf(-5.0, -1.0, 1.0), -1.0);
        assert_eq!(clampf(0.5, -1.0, 1.0), 0.5);
    }

    #[test]
    fn huge_position_wraps_without_hanging() {
        let (car, track) = stock_parts();
        let mut state = CarStateSoA::with_capacity(1);
        state.rebuild(1);
        state.s[0] = 1.0e30;
        Integrator::new(&car, &track, 1.0 / 240.0).advance(
            &mut state,
            0,
            DriverInput::NEUTRAL,
        );
        assert!(state.s[0] >= 0.0 && state.s[0] < track.length());
    }
}
