//! C-compatible status codes.
//!
//! [`PitlaneStatus`] is a `repr(i32)` enum returned by every status-reporting
//! entry point. `Ok` is zero, every error is negative, and the values are
//! part of the ABI.

use pitlane_core::ConfigError;
use pitlane_replay::ReplayError;

/// Status code returned by FFI functions.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PitlaneStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid or was already destroyed.
    InvalidHandle = -1,
    /// A pointer is null, an index is out of range, or a value is unusable.
    InvalidArgument = -2,
    /// Track nodes missing, too few, unordered, or loop too short.
    InvalidTrack = -3,
    /// Gear ratios or torque curve rejected.
    InvalidPowertrain = -4,
    /// Fixed timestep is not a positive finite number.
    InvalidTimestep = -5,
    /// A car parameter such as the mass is out of range.
    InvalidCar = -6,
    /// Determinism check requested with nothing captured.
    EmptyReplay = -7,
    /// Caller-provided buffer is too small.
    BufferTooSmall = -8,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -9,
    /// Car count or replay capacity above its ceiling.
    InvalidCapacity = -10,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&ConfigError> for PitlaneStatus {
    fn from(e: &ConfigError) -> Self {
        match e {
            ConfigError::MissingTrackNodes
            | ConfigError::TooFewTrackNodes { .. }
            | ConfigError::TrackTooShort { .. }
            | ConfigError::UnorderedTrackNodes { .. } => PitlaneStatus::InvalidTrack,
            ConfigError::MissingTorqueCurve
            | ConfigError::TooFewTorquePoints { .. }
            | ConfigError::NonMonotonicTorqueCurve { .. }
            | ConfigError::InvalidGearCount { .. } => PitlaneStatus::InvalidPowertrain,
            ConfigError::InvalidTimestep { .. } => PitlaneStatus::InvalidTimestep,
            ConfigError::NonPositiveParameter { .. } => PitlaneStatus::InvalidCar,
            ConfigError::CapacityTooLarge { .. } => PitlaneStatus::InvalidCapacity,
        }
    }
}

impl From<&ReplayError> for PitlaneStatus {
    fn from(e: &ReplayError) -> Self {
        match e {
            ReplayError::EmptyLog => PitlaneStatus::EmptyReplay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_values_are_stable() {
        assert_eq!(PitlaneStatus::Ok as i32, 0);
        assert_eq!(PitlaneStatus::InvalidHandle as i32, -1);
        assert_eq!(PitlaneStatus::InvalidArgument as i32, -2);
        assert_eq!(PitlaneStatus::InvalidTrack as i32, -3);
        assert_eq!(PitlaneStatus::InvalidPowertrain as i32, -4);
        assert_eq!(PitlaneStatus::InvalidTimestep as i32, -5);
        assert_eq!(PitlaneStatus::InvalidCar as i32, -6);
        assert_eq!(PitlaneStatus::EmptyReplay as i32, -7);
        assert_eq!(PitlaneStatus::BufferTooSmall as i32, -8);
        assert_eq!(PitlaneStatus::InternalError as i32, -9);
        assert_eq!(PitlaneStatus::InvalidCapacity as i32, -10);
        assert_eq!(PitlaneStatus::Panicked as i32, -128);
    }

    #[test]
    fn config_error_to_status() {
        assert_eq!(
            PitlaneStatus::from(&ConfigError::MissingTrackNodes),
            PitlaneStatus::InvalidTrack
        );
        assert_eq!(
            PitlaneStatus::from(&ConfigError::UnorderedTrackNodes { index: 3 }),
            PitlaneStatus::InvalidTrack
        );
        assert_eq!(
            PitlaneStatus::from(&ConfigError::TooFewTorquePoints { count: 1 }),
            PitlaneStatus::InvalidPowertrain
        );
        assert_eq!(
            PitlaneStatus::from(&ConfigError::InvalidGearCount { count: 9 }),
            PitlaneStatus::InvalidPowertrain
        );
        assert_eq!(
            PitlaneStatus::from(&ConfigError::InvalidTimestep { value: 0.0 }),
            PitlaneStatus::InvalidTimestep
        );
        assert_eq!(
            PitlaneStatus::from(&ConfigError::NonPositiveParameter {
                name: "mass_kg",
                value: -1.0
            }),
            PitlaneStatus::InvalidCar
        );
        assert_eq!(
            PitlaneStatus::from(&ConfigError::CapacityTooLarge {
                name: "max_cars",
                value: 1 << 20,
                max: 4096
            }),
            PitlaneStatus::InvalidCapacity
        );
    }

    #[test]
    fn replay_error_to_status() {
        assert_eq!(
            PitlaneStatus::from(&ReplayError::EmptyLog),
            PitlaneStatus::EmptyReplay
        );
    }
}
