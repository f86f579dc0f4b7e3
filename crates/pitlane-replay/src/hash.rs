//! Hashing utilities for state and capture comparison.
//!
//! Uses FNV-1a for fast, deterministic hashing of simulation state. These
//! hashes are not cryptographically secure; they are only used for quick
//! equality checks.

use pitlane_core::{CounterField, StateAccess, StateField};

use crate::capture::ReplayFrame;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

#[inline]
fn fnv1a_u32(mut hash: u64, v: u32) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

#[inline]
fn fnv1a_u64(mut hash: u64, v: u64) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

/// Hash every per-car array of a state.
///
/// Folds in the car count, then each float field (as `f32::to_bits()`) and
/// each counter, with the field position folded in at every boundary so
/// that field order matters. Bit-identical states hash identically;
/// `0.0` and `-0.0` do not.
pub fn state_hash(state: &dyn StateAccess) -> u64 {
    let mut hash = fnv1a_u64(FNV_OFFSET, state.car_count() as u64);
    for (idx, field) in StateField::ALL.iter().enumerate() {
        hash = fnv1a_u32(hash, idx as u32);
        for &v in state.read_field(*field) {
            hash = fnv1a_u32(hash, v.to_bits());
        }
    }
    for (idx, counter) in CounterField::ALL.iter().enumerate() {
        hash = fnv1a_u32(hash, (StateField::ALL.len() + idx) as u32);
        for &v in state.read_counter(*counter) {
            hash = fnv1a_u32(hash, v);
        }
    }
    hash
}

/// Hash a sequence of captured frames.
///
/// Two captures hash equal exactly when they hold the same inputs for the
/// same car counts in the same order.
pub fn frames_hash(frames: &[ReplayFrame]) -> u64 {
    let mut hash = fnv1a_u64(FNV_OFFSET, frames.len() as u64);
    for frame in frames {
        hash = fnv1a_u32(hash, frame.inputs.len() as u32);
        for input in &frame.inputs {
            hash = fnv1a_u32(hash, input.throttle.to_bits());
            hash = fnv1a_u32(hash, input.brake.to_bits());
            hash = fnv1a_u32(hash, input.steer.to_bits());
        }
    }
    hash
}
