//! Structure-of-arrays car state.
//!
//! Each quantity lives in its own contiguous array indexed by car, so hosts
//! can read one quantity for every car (all speeds, all x positions) as a
//! single slice. Storage is reserved for the car-count ceiling up front and
//! never reallocates afterwards, which keeps raw pointers handed across an
//! ABI stable; the [`Generation`] tells hosts when the contents were rebuilt.

use pitlane_core::{CarSnapshot, CounterField, Generation, StateAccess, StateField};

use crate::powertrain::MIN_RPM;

/// Per-car state, one array per quantity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CarStateSoA {
    pub(crate) s: Vec<f32>,
    pub(crate) x: Vec<f32>,
    pub(crate) y: Vec<f32>,
    pub(crate) yaw: Vec<f32>,
    pub(crate) speed: Vec<f32>,
    pub(crate) accel_long: Vec<f32>,
    pub(crate) accel_lat: Vec<f32>,
    pub(crate) engine_rpm: Vec<f32>,
    pub(crate) lap_time: Vec<f32>,
    pub(crate) last_lap_time: Vec<f32>,
    pub(crate) gear: Vec<u32>,
    pub(crate) lap: Vec<u32>,
    generation: Generation,
}

impl CarStateSoA {
    /// Empty state with room for `max_cars` cars in every array.
    pub fn with_capacity(max_cars: usize) -> Self {
        Self {
            s: Vec::with_capacity(max_cars),
            x: Vec::with_capacity(max_cars),
            y: Vec::with_capacity(max_cars),
            yaw: Vec::with_capacity(max_cars),
            speed: Vec::with_capacity(max_cars),
            accel_long: Vec::with_capacity(max_cars),
            accel_lat: Vec::with_capacity(max_cars),
            engine_rpm: Vec::with_capacity(max_cars),
            lap_time: Vec::with_capacity(max_cars),
            last_lap_time: Vec::with_capacity(max_cars),
            gear: Vec::with_capacity(max_cars),
            lap: Vec::with_capacity(max_cars),
            generation: Generation::default(),
        }
    }

    /// Number of cars.
    pub fn len(&self) -> usize {
        self.s.len()
    }

    /// Whether there are no cars.
    pub fn is_empty(&self) -> bool {
        self.s.is_empty()
    }

    /// Identity of the current contents.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Reinitialise every array for `count` cars at rest on the line, in
    /// first gear at idle, and bump the generation.
    pub(crate) fn rebuild(&mut self, count: usize) {
        for v in [
            &mut self.s,
            &mut self.x,
            &mut self.y,
            &mut self.yaw,
            &mut self.speed,
            &mut self.accel_long,
            &mut self.accel_lat,
            &mut self.lap_time,
            &mut self.last_lap_time,
        ] {
            v.clear();
            v.resize(count, 0.0);
        }
        self.engine_rpm.clear();
        self.engine_rpm.resize(count, MIN_RPM);
        self.gear.clear();
        self.gear.resize(count, 1);
        self.lap.clear();
        self.lap.resize(count, 0);
        self.generation = self.generation.next();
    }

    /// Copy out every field of car `index`.
    pub fn snapshot(&self, index: usize) -> Option<CarSnapshot> {
        if index >= self.len() {
            return None;
        }
        Some(CarSnapshot {
            s_m: self.s[index],
            x_m: self.x[index],
            y_m: self.y[index],
            yaw_rad: self.yaw[index],
            speed_mps: self.speed[index],
            accel_long_mps2: self.accel_long[index],
            accel_lat_mps2: self.accel_lat[index],
            engine_rpm: self.engine_rpm[index],
            gear: self.gear[index],
            lap: self.lap[index],
            lap_time_s: self.lap_time[index],
            last_lap_time_s: self.last_lap_time[index],
        })
    }

    /// Overwrite every field of car `index`. Returns `false` when out of range.
    pub(crate) fn restore(&mut self, index: usize, snap: &CarSnapshot) -> bool {
        if index >= self.len() {
            return false;
        }
        self.s[index] = snap.s_m;
        self.x[index] = snap.x_m;
        self.y[index] = snap.y_m;
        self.yaw[index] = snap.yaw_rad;
        self.speed[index] = snap.speed_mps;
        self.accel_long[index] = snap.accel_long_mps2;
        self.accel_lat[index] = snap.accel_lat_mps2;
        self.engine_rpm[index] = snap.engine_rpm;
        self.gear[index] = snap.gear;
        self.lap[index] = snap.lap;
        self.lap_time[index] = snap.lap_time_s;
        self.last_lap_time[index] = snap.last_lap_time_s;
        true
    }
}

impl StateAccess for CarStateSoA {
    fn car_count(&self) -> usize {
        self.len()
    }

    fn read_field(&self, field: StateField) -> &[f32] {
        match field {
            StateField::S => &self.s,
            StateField::X => &self.x,
            StateField::Y => &self.y,
            StateField::Yaw => &self.yaw,
            StateField::Speed => &self.speed,
            StateField::AccelLong => &self.accel_long,
            StateField::AccelLat => &self.accel_lat,
            StateField::EngineRpm => &self.engine_rpm,
            StateField::LapTime => &self.lap_time,
            StateField::LastLapTime => &self.last_lap_time,
        }
    }

    fn read_counter(&self, counter: CounterField) -> &[u32] {
        match counter {
            CounterField::Gear => &self.gear,
            CounterField::Lap => &self.lap,
        }
    }

    fn generation(&self) -> Generation {
        self.generation
    }
}

// ── StateView ───────────────────────────────────────────────────

/// Borrowed, read-only view of a core's car state.
///
/// The view borrows the core, so the core cannot be stepped, reset or
/// resized while a view is alive; the borrow checker rules out reading
/// arrays that are being rebuilt.
#[derive(Clone, Copy, Debug)]
pub struct StateView<'a> {
    state: &'a CarStateSoA,
}

impl<'a> StateView<'a> {
    pub(crate) fn new(state: &'a CarStateSoA) -> Self {
        Self { state }
    }

    /// Number of cars.
    pub fn car_count(&self) -> usize {
        self.state.len()
    }

    /// Identity of the arrays this view reads.
    pub fn generation(&self) -> Generation {
        self.state.generation
    }

    /// Arc-length positions, metres.
    pub fn s(&self) -> &'a [f32] {
        &self.state.s
    }

    /// World x positions, metres.
    pub fn x(&self) -> &'a [f32] {
        &self.state.x
    }

    /// World y positions, metres.
    pub fn y(&self) -> &'a [f32] {
        &self.state.y
    }

    /// Headings, radians.
    pub fn yaw(&self) -> &'a [f32] {
        &self.state.yaw
    }

    /// Forward speeds, m/s.
    pub fn speed(&self) -> &'a [f32] {
        &self.state.speed
    }

    /// Engine speeds.
    pub fn engine_rpm(&self) -> &'a [f32] {
        &self.state.engine_rpm
    }

    /// Selected gears.
    pub fn gear(&self) -> &'a [u32] {
        &self.state.gear
    }

    /// Completed laps.
    pub fn lap(&self) -> &'a [u32] {
        &self.state.lap
    }

    /// Any float array by name.
    pub fn field(&self, field: StateField) -> &'a [f32] {
        self.state.read_field(field)
    }

    /// Copy out every field of car `index`.
    pub fn snapshot(&self, index: usize) -> Option<CarSnapshot> {
        self.state.snapshot(index)
    }
}

impl StateAccess for StateView<'_> {
    fn car_count(&self) -> usize {
        self.state.len()
    }

    fn read_field(&self, field: StateField) -> &[f32] {
        self.state.read_field(field)
    }

    fn read_counter(&self, counter: CounterField) -> &[u32] {
        self.state.read_counter(counter)
    }

    fn generation(&self) -> Generation {
        self.state.generation
    }
}
