//! Error types for simulation setup.
//!
//! Stepping never fails; every rejection happens once, when a
//! [`SimSetup`](crate::SimSetup) is validated or a track is loaded.

use std::error::Error;
use std::fmt;

/// Reasons a simulation setup is rejected at construction time.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The track has no nodes at all.
    MissingTrackNodes,
    /// The track has fewer than two nodes.
    TooFewTrackNodes {
        /// Number of nodes supplied.
        count: usize,
    },
    /// The track loop length is not greater than one metre (or is not finite).
    TrackTooShort {
        /// The configured loop length.
        length_m: f32,
    },
    /// Track node arc-length positions are not strictly increasing.
    UnorderedTrackNodes {
        /// Index of the first node whose `s` does not exceed its predecessor's.
        index: usize,
    },
    /// The torque curve has no points at all.
    MissingTorqueCurve,
    /// The torque curve has fewer than two points.
    TooFewTorquePoints {
        /// Number of points supplied.
        count: usize,
    },
    /// Torque curve RPM values are not strictly increasing.
    NonMonotonicTorqueCurve {
        /// Index of the first out-of-order point.
        index: usize,
    },
    /// The gearbox has no gears or more than [`MAX_GEARS`](crate::MAX_GEARS).
    InvalidGearCount {
        /// Number of gear ratios supplied.
        count: usize,
    },
    /// The fixed timestep is not finite and positive.
    InvalidTimestep {
        /// The rejected value.
        value: f32,
    },
    /// A capacity that is reserved up front exceeds its ceiling.
    CapacityTooLarge {
        /// Name of the setting.
        name: &'static str,
        /// The rejected value.
        value: usize,
        /// Largest accepted value.
        max: usize,
    },
    /// A physical parameter that divides the dynamics is not positive.
    NonPositiveParameter {
        /// Name of the parameter.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTrackNodes => write!(f, "track has no nodes"),
            Self::TooFewTrackNodes { count } => {
                write!(f, "track needs at least 2 nodes, got {count}")
            }
            Self::TrackTooShort { length_m } => {
                write!(f, "track length must exceed 1 m, got {length_m}")
            }
            Self::UnorderedTrackNodes { index } => {
                write!(f, "track node {index} is not after its predecessor")
            }
            Self::MissingTorqueCurve => write!(f, "torque curve has no points"),
            Self::TooFewTorquePoints { count } => {
                write!(f, "torque curve needs at least 2 points, got {count}")
            }
            Self::NonMonotonicTorqueCurve { index } => {
                write!(f, "torque curve point {index} is not above its predecessor's rpm")
            }
            Self::InvalidGearCount { count } => {
                write!(f, "gear count must be in 1..={}, got {count}", crate::MAX_GEARS)
            }
            Self::InvalidTimestep { value } => {
                write!(f, "fixed_dt must be finite and positive, got {value}")
            }
            Self::CapacityTooLarge { name, value, max } => {
                write!(f, "{name} must be at most {max}, got {value}")
            }
            Self::NonPositiveParameter { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_value() {
        let msg = ConfigError::TooFewTrackNodes { count: 1 }.to_string();
        assert!(msg.contains('1'), "{msg}");
        let msg = ConfigError::NonPositiveParameter {
            name: "mass_kg",
            value: -3.0,
        }
        .to_string();
        assert!(msg.contains("mass_kg") && msg.contains("-3"), "{msg}");
    }
}
