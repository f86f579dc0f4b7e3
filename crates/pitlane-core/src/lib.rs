//! Core types for the Pitlane vehicle simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! value types shared by every other crate in the workspace: track and car
//! configuration, per-tick driver input, per-car snapshots, the
//! [`ConfigError`] returned when a setup is rejected, and the
//! [`StateAccess`] trait through which replay and hashing code reads
//! simulation state without depending on the engine.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod defaults;
pub mod error;
pub mod id;
pub mod input;
pub mod snapshot;
pub mod traits;

pub use config::{
    CarConfig, PowertrainConfig, SimConfig, SimSetup, TorquePoint, TrackConfig, TrackNode,
    MAX_CARS_LIMIT, MAX_GEARS, MAX_REPLAY_CAPACITY_STEPS,
};
pub use error::ConfigError;
pub use id::{Generation, TickId};
pub use input::DriverInput;
pub use snapshot::{BatchLapResult, CarSnapshot};
pub use traits::{CounterField, StateAccess, StateField};
