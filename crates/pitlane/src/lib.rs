//! Pitlane: a deterministic fixed-timestep vehicle dynamics simulator.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Pitlane sub-crates. For most users, adding `pitlane` as a single dependency
//! is sufficient. Hosts in other languages link `pitlane-ffi` instead.
//!
//! # Quick start
//!
//! ```rust
//! use pitlane::prelude::*;
//!
//! // Stock circuit, stock car, a grid of four.
//! let mut core = SimulationCore::new(SimSetup::default()).unwrap();
//! core.set_car_count(4);
//!
//! core.start_replay_capture();
//! let inputs = vec![DriverInput::new(1.0, 0.0, 0.0); 4];
//! for _ in 0..480 {
//!     core.step(&inputs);
//! }
//! assert!(core.state().speed().iter().all(|&v| v > 0.0));
//!
//! // Replaying the captured inputs reproduces the run.
//! let report = core.verify_replay_determinism().unwrap();
//! assert!(report.is_bit_exact());
//!
//! // One unattended lap with the calibration driver.
//! let result = core.run_batch_laps(0, 1);
//! assert_eq!(result.laps_completed, 1);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `pitlane-core` | Configuration, inputs, snapshots, errors, state access traits |
//! | [`track`] | `pitlane-track` | Track profile sampling |
//! | [`replay`] | `pitlane-replay` | Input capture, state hashing, determinism reports |
//! | [`engine`] | `pitlane-engine` | Simulation core, powertrain, fixed-step clock |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types (`pitlane-core`).
///
/// Contains the configuration blocks bundled by [`types::SimSetup`], per-tick
/// [`types::DriverInput`], [`types::CarSnapshot`], [`types::ConfigError`],
/// and the [`types::StateAccess`] trait.
pub use pitlane_core as types;

/// Track profile sampling (`pitlane-track`).
///
/// [`track::TrackProfile`] answers curvature and elevation at any arc-length.
pub use pitlane_track as track;

/// Input capture and determinism checking (`pitlane-replay`).
///
/// [`replay::ReplayLog`] records per-tick inputs; [`replay::compare_states`]
/// and [`replay::DeterminismReport`] judge a replay against its baseline.
pub use pitlane_replay as replay;

/// The simulation core (`pitlane-engine`).
///
/// [`engine::SimulationCore`] steps every car; [`engine::FixedStepClock`]
/// converts wall-clock time into fixed steps.
pub use pitlane_engine as engine;

/// Common imports for typical Pitlane usage.
///
/// ```rust
/// use pitlane::prelude::*;
/// ```
pub mod prelude {
    // Configuration
    pub use pitlane_core::{
        CarConfig, PowertrainConfig, SimConfig, SimSetup, TorquePoint, TrackConfig, TrackNode,
    };

    // Per-tick values
    pub use pitlane_core::{BatchLapResult, CarSnapshot, DriverInput, StateAccess, StateField};

    // Errors
    pub use pitlane_core::ConfigError;
    pub use pitlane_replay::ReplayError;

    // Replay
    pub use pitlane_replay::DeterminismReport;

    // Engine
    pub use pitlane_engine::{FixedStepClock, SimulationCore, StateView};
}
