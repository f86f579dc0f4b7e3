//! Input capture and determinism verification for Pitlane simulations.
//!
//! The engine records every tick's driver inputs into a bounded
//! [`ReplayLog`]. Re-running that log from a reset state must reproduce the
//! original trajectory; [`compare_states`] measures how closely it did and
//! [`state_hash`] fingerprints a whole state for quick equality checks.
//!
//! # Architecture
//!
//! - [`ReplayLog`] holds captured frames, bounded by a fixed capacity
//! - [`compare_states`] checks speed, position and lap count per car
//!   against [`Tolerances`], producing [`CarDivergence`] entries
//! - [`DeterminismReport`] summarises one verification run
//! - Everything reads state through [`pitlane_core::StateAccess`]

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod capture;
pub mod compare;
pub mod error;
pub mod hash;

pub use capture::{RecordOutcome, ReplayFrame, ReplayLog};
pub use compare::{compare_states, CarDivergence, DeterminismReport, DivergenceKind, Tolerances};
pub use error::ReplayError;
pub use hash::{frames_hash, state_hash};
