//! Engine and gearbox model.

use pitlane_core::{PowertrainConfig, TorquePoint};

/// Lowest engine speed the model reports; the clutch slips below it.
pub const MIN_RPM: f32 = 4000.0;
/// Rev limiter.
pub const MAX_RPM: f32 = 13000.0;

const MIN_TIRE_RADIUS_M: f32 = 0.05;

/// Read-only view of a [`PowertrainConfig`] with the model's lookups.
#[derive(Clone, Copy, Debug)]
pub struct Powertrain<'a> {
    config: &'a PowertrainConfig,
}

impl<'a> Powertrain<'a> {
    /// Wrap a configuration.
    pub fn new(config: &'a PowertrainConfig) -> Self {
        Self { config }
    }

    /// Full-throttle engine torque at `rpm`, newton-metres.
    ///
    /// Linear between curve points, flat beyond either end, zero for an
    /// empty curve.
    pub fn engine_torque_nm(&self, rpm: f32) -> f32 {
        torque_at(&self.config.torque_curve, rpm)
    }

    /// Gear to use next, given the current gear and engine speed.
    ///
    /// Moves at most one gear. Upshifts above `shift_rpm_up` unless already
    /// in top gear; otherwise downshifts below `shift_rpm_down` unless in
    /// first. Single-speed gearboxes never shift.
    pub fn shift(&self, gear: u32, rpm: f32) -> u32 {
        let count = self.gear_count();
        if count < 2 {
            return gear;
        }
        if rpm > self.config.shift_rpm_up && gear < count {
            gear + 1
        } else if rpm < self.config.shift_rpm_down && gear > 1 {
            gear - 1
        } else {
            gear
        }
    }

    /// Gear ratio times final drive for `gear`, clamped into the gearbox.
    pub fn overall_ratio(&self, gear: u32) -> f32 {
        let idx = gear.min(self.gear_count()).max(1) - 1;
        let ratio = self
            .config
            .gear_ratios
            .get(idx as usize)
            .copied()
            .unwrap_or(0.0);
        ratio * self.config.final_drive
    }

    /// Engine speed for a road speed through `ratio`, clamped to
    /// [`MIN_RPM`]..=[`MAX_RPM`].
    pub fn engine_rpm(speed_mps: f32, tire_radius_m: f32, ratio: f32) -> f32 {
        let wheel_omega = speed_mps / tire_radius_m.max(MIN_TIRE_RADIUS_M);
        let rpm = wheel_omega * ratio * 60.0 / (2.0 * std::f32::consts::PI);
        rpm.min(MAX_RPM).max(MIN_RPM)
    }

    /// Driveline efficiency.
    pub fn efficiency(&self) -> f32 {
        self.config.driveline_efficiency
    }

    fn gear_count(&self) -> u32 {
        self.config.gear_ratios.len() as u32
    }
}

fn torque_at(curve: &[TorquePoint], rpm: f32) -> f32 {
    let (Some(first), Some(last)) = (curve.first(), curve.last()) else {
        return 0.0;
    };
    if rpm <= first.rpm {
        return first.torque_nm;
    }
    if rpm >= last.rpm {
        return last.torque_nm;
    }
    for pair in curve.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if rpm <= hi.rpm {
            let t = (rpm - lo.rpm) / (hi.rpm - lo.rpm);
            return lo.torque_nm + (hi.torque_nm - lo.torque_nm) * t;
        }
    }
    last.torque_nm
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ratios(values: &[f32]) -> PowertrainConfig {
        let mut cfg = PowertrainConfig::default();
        cfg.gear_ratios.clear();
        cfg.gear_ratios.extend_from_slice(values);
        cfg
    }

    #[test]
    fn empty_curve_gives_zero_torque() {
        let mut cfg = PowertrainConfig::default();
        cfg.torque_curve.clear();
        assert_eq!(Powertrain::new(&cfg).engine_torque_nm(8000.0), 0.0);
    }

    #[test]
    fn torque_clamps_at_both_ends() {
        let cfg = PowertrainConfig::default();
        let pt = Powertrain::new(&cfg);
        assert_eq!(pt.engine_torque_nm(1000.0), 510.0);
        assert_eq!(pt.engine_torque_nm(4000.0), 510.0);
        assert_eq!(pt.engine_torque_nm(13000.0), 640.0);
        assert_eq!(pt.engine_torque_nm(20000.0), 640.0);
    }

    #[test]
    fn torque_hits_curve_points_and_interpolates() {
        let cfg = PowertrainConfig::default();
        let pt = Powertrain::new(&cfg);
        assert_eq!(pt.engine_torque_nm(9500.0), 810.0);
        assert_eq!(pt.engine_torque_nm(5000.0), 575.0);
        assert_eq!(pt.engine_torque_nm(7000.0), 700.0);
    }

    #[test]
    fn upshift_above_threshold() {
        let cfg = PowertrainConfig::default();
        let pt = Powertrain::new(&cfg);
        assert_eq!(pt.shift(1, 11_900.0), 2);
        assert_eq!(pt.shift(1, 11_800.0), 1);
    }

    #[test]
    fn no_upshift_from_top_gear() {
        let cfg = PowertrainConfig::default();
        assert_eq!(Powertrain::new(&cfg).shift(8, 12_500.0), 8);
    }

    #[test]
    fn downshift_below_threshold() {
        let cfg = PowertrainConfig::default();
        let pt = Powertrain::new(&cfg);
        assert_eq!(pt.shift(3, 6_000.0), 2);
        assert_eq!(pt.shift(1, 4_000.0), 1);
        assert_eq!(pt.shift(3, 6_200.0), 3);
    }

    #[test]
    fn single_speed_never_shifts() {
        let cfg = ratios(&[2.0]);
        let pt = Powertrain::new(&cfg);
        assert_eq!(pt.shift(1, 12_900.0), 1);
        assert_eq!(pt.shift(1, 4_000.0), 1);
    }

    #[test]
    fn overall_ratio_clamps_gear() {
        let cfg = ratios(&[3.0, 2.0]);
        let pt = Powertrain::new(&cfg);
        let fd = cfg.final_drive;
        assert_eq!(pt.overall_ratio(0), 3.0 * fd);
        assert_eq!(pt.overall_ratio(1), 3.0 * fd);
        assert_eq!(pt.overall_ratio(2), 2.0 * fd);
        assert_eq!(pt.overall_ratio(9), 2.0 * fd);
    }

    #[test]
    fn engine_rpm_clamps_to_operating_range() {
        assert_eq!(Powertrain::engine_rpm(0.0, 0.34, 9.7), MIN_RPM);
        assert_eq!(Powertrain::engine_rpm(200.0, 0.34, 9.7), MAX_RPM);
        let mid = Powertrain::engine_rpm(30.0, 0.34, 9.7);
        assert!(mid > MIN_RPM && mid < MAX_RPM);
    }

    #[test]
    fn tiny_tire_radius_is_floored() {
        assert_eq!(
            Powertrain::engine_rpm(1.0, 0.0, 5.0),
            Powertrain::engine_rpm(1.0, 0.05, 5.0)
        );
    }

    proptest! {
        #[test]
        fn torque_stays_within_curve_envelope(rpm in -1.0e5f32..1.0e5) {
            let cfg = PowertrainConfig::default();
            let tq = Powertrain::new(&cfg).engine_torque_nm(rpm);
            prop_assert!((510.0..=810.0).contains(&tq), "torque {} at {}", tq, rpm);
        }

        #[test]
        fn shift_moves_at_most_one_gear(gear in 1u32..=8, rpm in 0.0f32..20_000.0) {
            let cfg = PowertrainConfig::default();
            let next = Powertrain::new(&cfg).shift(gear, rpm);
            prop_assert!(next.abs_diff(gear) <= 1);
            prop_assert!((1..=8).contains(&next));
        }
    }
}
