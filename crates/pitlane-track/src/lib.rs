//! Track geometry for the Pitlane vehicle simulator.
//!
//! A [`TrackProfile`] is a closed loop described by centerline nodes. It
//! answers two questions for any arc-length position: how sharply the road
//! bends, and how high it sits. Positions outside `[0, length)` wrap.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod profile;

pub use profile::TrackProfile;
