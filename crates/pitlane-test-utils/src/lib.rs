//! Test utilities and mock types for Pitlane development.
//!
//! Provides a mock [`StateAccess`] implementation for testing replay
//! comparison and hashing without an engine, plus shared setup and input
//! fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashMap;

use pitlane_core::{CounterField, Generation, StateAccess, StateField};

pub use fixtures::*;

/// Mock car state implementing [`StateAccess`].
///
/// Every field starts zero-filled for `car_count` cars. Overwrite individual
/// arrays with [`set_field`](MockState::set_field) and
/// [`set_counter`](MockState::set_counter).
pub struct MockState {
    car_count: usize,
    fields: HashMap<StateField, Vec<f32>>,
    counters: HashMap<CounterField, Vec<u32>>,
    generation: Generation,
}

impl MockState {
    pub fn new(car_count: usize) -> Self {
        Self {
            car_count,
            fields: StateField::ALL
                .iter()
                .map(|&f| (f, vec![0.0; car_count]))
                .collect(),
            counters: CounterField::ALL
                .iter()
                .map(|&c| (c, vec![0; car_count]))
                .collect(),
            generation: Generation(0),
        }
    }

    /// One car per speed value, everything else zero.
    pub fn with_speeds(speeds: &[f32]) -> Self {
        let mut state = Self::new(speeds.len());
        state.set_field(StateField::Speed, speeds.to_vec());
        state
    }

    /// Replace one float array. Panics if the length is not `car_count`.
    pub fn set_field(&mut self, field: StateField, data: Vec<f32>) {
        assert_eq!(data.len(), self.car_count, "field length must match car count");
        self.fields.insert(field, data);
    }

    /// Replace one counter array. Panics if the length is not `car_count`.
    pub fn set_counter(&mut self, counter: CounterField, data: Vec<u32>) {
        assert_eq!(data.len(), self.car_count, "counter length must match car count");
        self.counters.insert(counter, data);
    }

    pub fn set_generation(&mut self, generation: Generation) {
        self.generation = generation;
    }
}

impl StateAccess for MockState {
    fn car_count(&self) -> usize {
        self.car_count
    }

    fn read_field(&self, field: StateField) -> &[f32] {
        self.fields.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    fn read_counter(&self, counter: CounterField) -> &[u32] {
        self.counters.get(&counter).map(Vec::as_slice).unwrap_or(&[])
    }

    fn generation(&self) -> Generation {
        self.generation
    }
}
