//! Per-tick driver input.

/// Driver commands for one car for one tick.
///
/// Values outside their documented ranges are accepted and clamped by
/// [`clamped`](Self::clamped) before the integrator uses them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriverInput {
    /// Throttle pedal, `[0, 1]`.
    pub throttle: f32,
    /// Brake pedal, `[0, 1]`.
    pub brake: f32,
    /// Steering, `[-1, 1]`, positive adds curvature in the track's sense.
    pub steer: f32,
}

impl DriverInput {
    /// No throttle, no brake, wheel centred. Used to pad short input slices.
    pub const NEUTRAL: Self = Self {
        throttle: 0.0,
        brake: 0.0,
        steer: 0.0,
    };

    /// Construct an input from raw pedal and steering values.
    pub const fn new(throttle: f32, brake: f32, steer: f32) -> Self {
        Self {
            throttle,
            brake,
            steer,
        }
    }

    /// Clamp every channel into its range. NaN becomes zero.
    pub fn clamped(self) -> Self {
        Self {
            throttle: clamp_or_zero(self.throttle, 0.0, 1.0),
            brake: clamp_or_zero(self.brake, 0.0, 1.0),
            steer: clamp_or_zero(self.steer, -1.0, 1.0),
        }
    }
}

fn clamp_or_zero(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(lo, hi)
    }
}
