//! Browser-host runtime.
//!
//! A runtime bundles a core with what a frame-driven page needs
//! around it: one human-controlled car (car 0), scripted traffic for the
//! rest, and a [`FixedStepClock`] that turns frame deltas into fixed steps.
//! The page keeps the handle returned by [`pitlane_wasm_init`] and reads
//! positions straight out of the state arrays each frame.
//!
//! Runtimes live in a handle table like native simulations, so a page can
//! run several side by side.

use std::sync::{Arc, Mutex};

use log::{debug, warn};
use pitlane_core::{DriverInput, StateField};
use pitlane_engine::{FixedStepClock, SimulationCore};

use crate::abi::{PitlaneCarSnapshot, PitlaneWasmInitConfig};
use crate::handle::HandleTable;
use crate::status::PitlaneStatus;
use crate::translate::setup_from_abi;

/// Speed above which traffic cars brake, m/s.
const TRAFFIC_BRAKE_SPEED_MPS: f32 = 83.0;

/// Input for traffic car `index` at arc-length `s_m` and `speed_mps`.
///
/// Throttle and steering wander smoothly with position so the field
/// spreads out; the car brakes lightly when it gets too fast.
pub fn traffic_input(index: usize, s_m: f32, speed_mps: f32) -> DriverInput {
    let phase = index as f32 * 0.35 + s_m * 0.003;
    DriverInput {
        throttle: (0.70 + 0.22 * phase.sin()).clamp(0.0, 1.0),
        brake: if speed_mps > TRAFFIC_BRAKE_SPEED_MPS {
            0.2
        } else {
            0.0
        },
        steer: 0.16 * (phase * 0.8).sin(),
    }
}

/// A simulation driven by a browser frame loop.
pub(crate) struct WasmRuntime {
    core: SimulationCore,
    clock: FixedStepClock,
    inputs: Vec<DriverInput>,
}

impl WasmRuntime {
    fn new(core: SimulationCore) -> Self {
        Self {
            clock: FixedStepClock::new(core.dt()),
            inputs: vec![DriverInput::NEUTRAL; core.car_count()],
            core,
        }
    }

    fn reset(&mut self) {
        self.core.reset();
        self.clock.reset();
    }

    fn set_controls(&mut self, input: DriverInput) -> bool {
        match self.inputs.first_mut() {
            Some(player) => {
                *player = input.clamped();
                true
            }
            None => false,
        }
    }

    fn update_traffic(&mut self) {
        let view = self.core.state();
        self.inputs.resize(view.car_count(), DriverInput::NEUTRAL);
        let (s, speed) = (view.s(), view.speed());
        for (i, input) in self.inputs.iter_mut().enumerate().skip(1) {
            *input = traffic_input(i, s[i], speed[i]);
        }
    }

    /// Refresh traffic inputs once, then run every fixed step `elapsed_s`
    /// covers.
    fn step(&mut self, elapsed_s: f32) -> u32 {
        self.update_traffic();
        let steps = self.clock.advance(elapsed_s);
        for _ in 0..steps {
            self.core.step(&self.inputs);
        }
        steps
    }

    fn run_lap(&mut self) -> f32 {
        if self.core.car_count() == 0 {
            return 0.0;
        }
        self.clock.reset();
        self.core.run_batch_laps(0, 1).best_lap_s
    }
}

type RuntimeArc = Arc<Mutex<WasmRuntime>>;

static RUNTIMES: Mutex<HandleTable<RuntimeArc>> = Mutex::new(HandleTable::new());

fn get_runtime(handle: u64) -> Option<RuntimeArc> {
    RUNTIMES.lock().ok()?.get(handle).cloned()
}

fn with_runtime<R>(handle: u64, f: impl FnOnce(&mut WasmRuntime) -> R) -> Option<R> {
    let arc = get_runtime(handle)?;
    let mut rt = arc.lock().ok()?;
    Some(f(&mut rt))
}

fn invalid_handle(op: &str, handle: u64) -> i32 {
    warn!("{op}: invalid runtime handle {handle:#x}");
    PitlaneStatus::InvalidHandle as i32
}

// ── Lifecycle ───────────────────────────────────────────────────

/// Build a runtime from a flat configuration and return its handle, or 0
/// if the configuration is rejected.
///
/// Node and torque arrays must be non-null with at least two entries each.
/// `active_cars` is clamped to `max_cars`, and replay capture starts
/// immediately.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_wasm_init(cfg: *const PitlaneWasmInitConfig) -> u64 {
    ffi_guard_or!(0, {
        if cfg.is_null() {
            warn!("pitlane_wasm_init: null configuration");
            return 0;
        }
        // SAFETY: cfg is valid per caller contract.
        let flat = unsafe { &*cfg };
        let (sim, car, track) = flat.split();
        // SAFETY: the node and torque pointers are sized by their counts.
        let setup = match unsafe { setup_from_abi(&sim, &car, &track) } {
            Ok(setup) => setup,
            Err(e) => {
                warn!("pitlane_wasm_init: {e}");
                return 0;
            }
        };
        let mut core = match SimulationCore::new(setup) {
            Ok(core) => core,
            Err(_) => return 0,
        };
        core.set_car_count(flat.active_cars as usize);
        core.start_replay_capture();

        let Ok(mut table) = RUNTIMES.lock() else {
            return 0;
        };
        let cars = core.car_count();
        let handle = table.insert(Arc::new(Mutex::new(WasmRuntime::new(core))));
        debug!("browser runtime {handle:#x} created with {cars} cars");
        handle
    })
}

/// Destroy a runtime.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_wasm_destroy(handle: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(RUNTIMES).remove(handle) {
            Some(_) => PitlaneStatus::Ok as i32,
            None => invalid_handle("pitlane_wasm_destroy", handle),
        }
    })
}

/// Return every car to the start line and drop accumulated frame time.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_wasm_reset(handle: u64) -> i32 {
    ffi_guard!({
        let Some(arc) = get_runtime(handle) else {
            return invalid_handle("pitlane_wasm_reset", handle);
        };
        ffi_lock!(arc).reset();
        PitlaneStatus::Ok as i32
    })
}

// ── Frame loop ──────────────────────────────────────────────────

/// Set the player's (car 0) controls, clamped to their ranges. They stay in
/// effect until the next call.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_wasm_set_controls(
    handle: u64,
    throttle: f32,
    brake: f32,
    steer: f32,
) -> i32 {
    ffi_guard!({
        let Some(arc) = get_runtime(handle) else {
            return invalid_handle("pitlane_wasm_set_controls", handle);
        };
        if ffi_lock!(arc).set_controls(DriverInput::new(throttle, brake, steer)) {
            PitlaneStatus::Ok as i32
        } else {
            PitlaneStatus::InvalidArgument as i32
        }
    })
}

/// Advance by `elapsed_s` of frame time: refresh the traffic inputs, then
/// run the fixed steps it covers (at most 8192). Returns the steps run.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_wasm_step(handle: u64, elapsed_s: f32) -> u32 {
    ffi_guard_or!(0, {
        with_runtime(handle, |rt| rt.step(elapsed_s)).unwrap_or(0)
    })
}

/// Copy car `car_index`'s state to `*out`; zeroed when out of range.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_wasm_vehicle_state(
    handle: u64,
    car_index: u32,
    out: *mut PitlaneCarSnapshot,
) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return PitlaneStatus::InvalidArgument as i32;
        }
        let Some(arc) = get_runtime(handle) else {
            // SAFETY: out is valid per caller contract.
            unsafe { *out = PitlaneCarSnapshot::default() };
            return invalid_handle("pitlane_wasm_vehicle_state", handle);
        };
        let snap = ffi_lock!(arc).core.snapshot(car_index as usize);
        // SAFETY: out is valid per caller contract.
        unsafe { *out = snap.map(PitlaneCarSnapshot::from).unwrap_or_default() };
        if snap.is_some() {
            PitlaneStatus::Ok as i32
        } else {
            PitlaneStatus::InvalidArgument as i32
        }
    })
}

/// Reset and drive car 0 round one lap with the calibration driver.
/// Returns the lap time in seconds, or 0 if none was completed.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_wasm_run_lap(handle: u64) -> f32 {
    ffi_guard_or!(0.0, {
        with_runtime(handle, WasmRuntime::run_lap).unwrap_or(0.0)
    })
}

// ── State views ─────────────────────────────────────────────────

fn field_ptr(handle: u64, field: StateField) -> *const f32 {
    ffi_guard_or!(std::ptr::null(), {
        with_runtime(handle, |rt| rt.core.state().field(field).as_ptr())
            .unwrap_or(std::ptr::null())
    })
}

/// Pointer to every car's world x, metres.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_wasm_state_x_ptr(handle: u64) -> *const f32 {
    field_ptr(handle, StateField::X)
}

/// Pointer to every car's world y, metres.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_wasm_state_y_ptr(handle: u64) -> *const f32 {
    field_ptr(handle, StateField::Y)
}

/// Pointer to every car's heading, radians.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_wasm_state_yaw_ptr(handle: u64) -> *const f32 {
    field_ptr(handle, StateField::Yaw)
}

/// Pointer to every car's speed, m/s.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_wasm_state_speed_ptr(handle: u64) -> *const f32 {
    field_ptr(handle, StateField::Speed)
}

/// Pointer to every car's arc-length position, metres.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_wasm_state_s_ptr(handle: u64) -> *const f32 {
    field_ptr(handle, StateField::S)
}

/// Number of simulated cars; 0 for an invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_wasm_car_count(handle: u64) -> u32 {
    ffi_guard_or!(0, {
        with_runtime(handle, |rt| rt.core.car_count() as u32).unwrap_or(0)
    })
}

/// Identity of the state arrays' contents; changes on reset. 0 for an
/// invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_wasm_state_generation(handle: u64) -> u64 {
    ffi_guard_or!(0, {
        with_runtime(handle, |rt| rt.core.generation().0).unwrap_or(0)
    })
}
