//! Read access to per-car state without depending on the engine.

use crate::id::Generation;

/// A per-car floating-point state array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateField {
    /// Arc-length position.
    S,
    /// World x.
    X,
    /// World y.
    Y,
    /// Heading.
    Yaw,
    /// Forward speed.
    Speed,
    /// Longitudinal acceleration.
    AccelLong,
    /// Lateral acceleration.
    AccelLat,
    /// Engine speed.
    EngineRpm,
    /// Current lap time.
    LapTime,
    /// Last completed lap time.
    LastLapTime,
}

impl StateField {
    /// Every field, in storage order.
    pub const ALL: [StateField; 10] = [
        StateField::S,
        StateField::X,
        StateField::Y,
        StateField::Yaw,
        StateField::Speed,
        StateField::AccelLong,
        StateField::AccelLat,
        StateField::EngineRpm,
        StateField::LapTime,
        StateField::LastLapTime,
    ];

    /// Short lowercase name, for reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::S => "s",
            Self::X => "x",
            Self::Y => "y",
            Self::Yaw => "yaw",
            Self::Speed => "speed",
            Self::AccelLong => "accel_long",
            Self::AccelLat => "accel_lat",
            Self::EngineRpm => "engine_rpm",
            Self::LapTime => "lap_time",
            Self::LastLapTime => "last_lap_time",
        }
    }
}

/// A per-car integer state array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CounterField {
    /// Selected gear.
    Gear,
    /// Completed laps.
    Lap,
}

impl CounterField {
    /// Every counter, in storage order.
    pub const ALL: [CounterField; 2] = [CounterField::Gear, CounterField::Lap];

    /// Short lowercase name, for reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::Gear => "gear",
            Self::Lap => "lap",
        }
    }
}

/// Read-only access to the structure-of-arrays car state.
///
/// Every returned slice has exactly [`car_count`](Self::car_count)
/// elements. Replay comparison and state hashing read through
/// `&dyn StateAccess` so they never reference engine storage directly.
pub trait StateAccess {
    /// Number of simulated cars.
    fn car_count(&self) -> usize;

    /// One floating-point array.
    fn read_field(&self, field: StateField) -> &[f32];

    /// One integer array.
    fn read_counter(&self, counter: CounterField) -> &[u32];

    /// Identity of the arrays being read.
    fn generation(&self) -> Generation;
}
