//! Deterministic vehicle dynamics for the Pitlane simulator.
//!
//! [`SimulationCore`] advances a fleet of identical cars around a closed
//! track in fixed timesteps. Given the same setup and the same input
//! sequence it produces the same trajectory, which it can prove to itself
//! by replaying a captured input log
//! ([`verify_replay_determinism`](SimulationCore::verify_replay_determinism)).
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`powertrain`] | torque curve lookup, gear selection, engine speed |
//! | [`state`] | structure-of-arrays car state and borrowed views |
//! | [`sim`] | the simulation core |
//! | [`batch`] | unattended lap runner for calibration |
//! | [`clock`] | wall-clock to fixed-step reconciliation |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod clock;
mod dynamics;
pub mod powertrain;
pub mod sim;
pub mod state;

pub use batch::calibration_input;
pub use clock::{FixedStepClock, MAX_CATCH_UP_STEPS};
pub use dynamics::{AIR_DENSITY, GRAVITY};
pub use powertrain::{Powertrain, MAX_RPM, MIN_RPM};
pub use sim::SimulationCore;
pub use state::{CarStateSoA, StateView};
