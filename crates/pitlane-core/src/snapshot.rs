//! Plain-value copies of simulation state.

/// Every state field of one car, copied out of the simulation.
///
/// Restoring a snapshot into a core and stepping with the same inputs
/// reproduces the original run bit for bit.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarSnapshot {
    /// Arc-length position on the loop, `[0, track length)`.
    pub s_m: f32,
    /// World x position, metres.
    pub x_m: f32,
    /// World y position, metres.
    pub y_m: f32,
    /// Heading, radians. Unwrapped.
    pub yaw_rad: f32,
    /// Forward speed, m/s. Never negative.
    pub speed_mps: f32,
    /// Longitudinal acceleration from driveline, brakes and resistance, m/s².
    pub accel_long_mps2: f32,
    /// Lateral acceleration after grip clamping, m/s².
    pub accel_lat_mps2: f32,
    /// Engine speed, clamped to the engine's operating range.
    pub engine_rpm: f32,
    /// Selected gear, 1-based.
    pub gear: u32,
    /// Completed laps.
    pub lap: u32,
    /// Time since the last line crossing, seconds.
    pub lap_time_s: f32,
    /// Duration of the most recently completed lap, seconds.
    pub last_lap_time_s: f32,
}

/// Aggregate result of a batch lap run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchLapResult {
    /// Laps actually completed.
    pub laps_completed: u32,
    /// Mean duration of the completed laps, seconds. Zero when none.
    pub mean_lap_s: f32,
    /// Shortest completed lap, seconds. Zero when none.
    pub best_lap_s: f32,
}
