//! Native handle API: create, step, inspect and destroy simulations.
//!
//! Each simulation sits behind its own `Arc<Mutex<_>>`, so the global
//! table lock is held only for the handle lookup and different
//! simulations can be driven from different threads.
//!
//! Functions returning a status follow [`PitlaneStatus`]. Functions
//! returning a plain value yield zero (or null) for an invalid handle; the
//! `_get` variants report the reason instead.
//!
//! # Raw state pointers
//!
//! `pitlane_state_*_ptr` return pointers into the per-car arrays. Storage
//! for `max_cars` cars is reserved at creation, so the pointers stay valid
//! until the simulation is destroyed. Only the first `pitlane_car_count`
//! elements are meaningful, and a host must not read them while another
//! thread is stepping the same simulation.

use std::sync::{Arc, Mutex};

use log::{debug, warn};
use pitlane_core::{DriverInput, StateField};
use pitlane_engine::{FixedStepClock, SimulationCore};

use crate::abi::{
    PitlaneBatchLapResult, PitlaneCarConfig, PitlaneCarSnapshot, PitlaneDeterminismReport,
    PitlaneDriverInput, PitlaneSimConfig, PitlaneTrackConfig,
};
use crate::handle::HandleTable;
use crate::status::PitlaneStatus;
use crate::translate::{setup_from_abi, slice_or_empty};

/// A simulation plus the host-side buffers the C API needs around it.
pub(crate) struct NativeSim {
    core: SimulationCore,
    clock: FixedStepClock,
    inputs: Vec<DriverInput>,
}

impl NativeSim {
    fn new(core: SimulationCore) -> Self {
        Self {
            clock: FixedStepClock::new(core.dt()),
            inputs: Vec::with_capacity(core.sim_config().max_cars),
            core,
        }
    }

    fn load_inputs(&mut self, inputs: &[PitlaneDriverInput]) {
        self.inputs.clear();
        self.inputs.extend(inputs.iter().map(|&i| DriverInput::from(i)));
    }
}

type SimArc = Arc<Mutex<NativeSim>>;

static SIMS: Mutex<HandleTable<SimArc>> = Mutex::new(HandleTable::new());

fn get_sim(handle: u64) -> Option<SimArc> {
    SIMS.lock().ok()?.get(handle).cloned()
}

/// Run `f` on the simulation behind `handle`, or return `None`.
fn with_sim<R>(handle: u64, f: impl FnOnce(&mut NativeSim) -> R) -> Option<R> {
    let arc = get_sim(handle)?;
    let mut sim = arc.lock().ok()?;
    Some(f(&mut sim))
}

fn invalid_handle(op: &str, handle: u64) -> i32 {
    warn!("{op}: invalid simulation handle {handle:#x}");
    PitlaneStatus::InvalidHandle as i32
}

fn null_argument(op: &str, name: &str) -> i32 {
    warn!("{op}: null {name}");
    PitlaneStatus::InvalidArgument as i32
}

/// Borrow the C input array, treating null as "no inputs".
#[allow(unsafe_code)]
fn input_slice<'a>(inputs: *const PitlaneDriverInput, count: u32) -> &'a [PitlaneDriverInput] {
    // SAFETY: inputs points to count valid structs per caller contract.
    unsafe { slice_or_empty(inputs, count as usize) }
}

// ── Defaults ────────────────────────────────────────────────────

/// Write the stock integration settings to `*out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_default_sim_config(out: *mut PitlaneSimConfig) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return null_argument("pitlane_default_sim_config", "out");
        }
        // SAFETY: out is valid per caller contract.
        unsafe { *out = PitlaneSimConfig::stock() };
        PitlaneStatus::Ok as i32
    })
}

/// Write the stock car to `*out`. The torque curve points at static
/// storage owned by the library.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_default_car_config(out: *mut PitlaneCarConfig) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return null_argument("pitlane_default_car_config", "out");
        }
        // SAFETY: out is valid per caller contract.
        unsafe { *out = PitlaneCarConfig::stock() };
        PitlaneStatus::Ok as i32
    })
}

/// Write the stock circuit to `*out`. The nodes point at static storage
/// owned by the library.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_default_track_config(out: *mut PitlaneTrackConfig) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return null_argument("pitlane_default_track_config", "out");
        }
        // SAFETY: out is valid per caller contract.
        unsafe { *out = PitlaneTrackConfig::stock() };
        PitlaneStatus::Ok as i32
    })
}

// ── Lifecycle ───────────────────────────────────────────────────

/// Validate the configuration, build a simulation with one car, and write
/// its handle to `*out`.
///
/// Node and torque arrays are copied; the caller may free them afterwards.
/// Returns a configuration status (`InvalidTrack`, `InvalidPowertrain`, ...)
/// when the setup is rejected.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_create_checked(
    sim: *const PitlaneSimConfig,
    car: *const PitlaneCarConfig,
    track: *const PitlaneTrackConfig,
    out: *mut u64,
) -> i32 {
    ffi_guard!({
        if sim.is_null() || car.is_null() || track.is_null() || out.is_null() {
            return null_argument("pitlane_create", "configuration or output pointer");
        }
        // SAFETY: all three pointers are valid per caller contract, and the
        // arrays they reference are sized by their count fields.
        let setup = match unsafe { setup_from_abi(&*sim, &*car, &*track) } {
            Ok(setup) => setup,
            Err(e) => {
                warn!("pitlane_create: {e}");
                return PitlaneStatus::from(&e) as i32;
            }
        };
        let core = match SimulationCore::new(setup) {
            Ok(core) => core,
            Err(e) => return PitlaneStatus::from(&e) as i32,
        };

        let mut table = ffi_lock!(SIMS);
        let handle = table.insert(Arc::new(Mutex::new(NativeSim::new(core))));
        debug!("simulation {handle:#x} created ({} live)", table.len());
        // SAFETY: out is valid per caller contract.
        unsafe { *out = handle };
        PitlaneStatus::Ok as i32
    })
}

/// [`pitlane_create_checked`] returning the handle directly: 0 if the
/// configuration was rejected (the reason is logged).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_create(
    sim: *const PitlaneSimConfig,
    car: *const PitlaneCarConfig,
    track: *const PitlaneTrackConfig,
) -> u64 {
    let mut handle = 0u64;
    if pitlane_create_checked(sim, car, track, &mut handle) == PitlaneStatus::Ok as i32 {
        handle
    } else {
        0
    }
}

/// Destroy a simulation. Destroying twice returns `InvalidHandle`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_destroy(handle: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(SIMS).remove(handle) {
            Some(_) => {
                debug!("simulation {handle:#x} destroyed");
                PitlaneStatus::Ok as i32
            }
            None => invalid_handle("pitlane_destroy", handle),
        }
    })
}

/// Set the number of cars (clamped to `max_cars`) and return every car to
/// the start line.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_set_car_count(handle: u64, count: u32) -> i32 {
    ffi_guard!({
        let Some(arc) = get_sim(handle) else {
            return invalid_handle("pitlane_set_car_count", handle);
        };
        let mut sim = ffi_lock!(arc);
        sim.core.set_car_count(count as usize);
        PitlaneStatus::Ok as i32
    })
}

/// Return every car to the start line, clear the replay log and drop any
/// accumulated wall-clock time.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_reset(handle: u64) -> i32 {
    ffi_guard!({
        let Some(arc) = get_sim(handle) else {
            return invalid_handle("pitlane_reset", handle);
        };
        let mut sim = ffi_lock!(arc);
        sim.core.reset();
        sim.clock.reset();
        PitlaneStatus::Ok as i32
    })
}

// ── Stepping ────────────────────────────────────────────────────

/// Advance one fixed timestep.
///
/// `inputs[i]` drives car `i`; cars beyond `count` get neutral input.
/// `inputs` may be null when `count` is 0.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_step(
    handle: u64,
    inputs: *const PitlaneDriverInput,
    count: u32,
) -> i32 {
    ffi_guard!({
        if inputs.is_null() && count > 0 {
            return null_argument("pitlane_step", "inputs");
        }
        let Some(arc) = get_sim(handle) else {
            return invalid_handle("pitlane_step", handle);
        };
        let mut sim = ffi_lock!(arc);
        sim.load_inputs(input_slice(inputs, count));
        let NativeSim { core, inputs, .. } = &mut *sim;
        core.step(inputs);
        PitlaneStatus::Ok as i32
    })
}

/// Add `elapsed_s` of wall-clock time and run as many fixed steps as it
/// covers (at most 8192), all with the same inputs. Returns the number of
/// steps run; 0 for an invalid handle or null inputs.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_step_elapsed(
    handle: u64,
    inputs: *const PitlaneDriverInput,
    count: u32,
    elapsed_s: f32,
) -> u32 {
    ffi_guard_or!(0, {
        if inputs.is_null() && count > 0 {
            null_argument("pitlane_step_elapsed", "inputs");
            return 0;
        }
        with_sim(handle, |sim| {
            sim.load_inputs(input_slice(inputs, count));
            let steps = sim.clock.advance(elapsed_s);
            for _ in 0..steps {
                sim.core.step(&sim.inputs);
            }
            steps
        })
        .unwrap_or_else(|| {
            invalid_handle("pitlane_step_elapsed", handle);
            0
        })
    })
}

// ── Replay ──────────────────────────────────────────────────────

/// Clear the replay log and record every following step.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_start_replay_capture(handle: u64) -> i32 {
    ffi_guard!({
        let Some(arc) = get_sim(handle) else {
            return invalid_handle("pitlane_start_replay_capture", handle);
        };
        ffi_lock!(arc).core.start_replay_capture();
        PitlaneStatus::Ok as i32
    })
}

/// Stop recording; the log is kept.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_stop_replay_capture(handle: u64) -> i32 {
    ffi_guard!({
        let Some(arc) = get_sim(handle) else {
            return invalid_handle("pitlane_stop_replay_capture", handle);
        };
        ffi_lock!(arc).core.stop_replay_capture();
        PitlaneStatus::Ok as i32
    })
}

/// Replay the captured inputs from a reset state and compare with the
/// state at the end of capture. 1 if they match, 0 if they diverge, the
/// log is empty, or the handle is invalid.
///
/// Afterwards the cars hold the replayed state.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_replay_captured_deterministic(handle: u64) -> i32 {
    ffi_guard_or!(0, {
        with_sim(handle, |sim| i32::from(sim.core.replay_captured_deterministic())).unwrap_or(0)
    })
}

/// [`pitlane_replay_captured_deterministic`] with the full report written
/// to `*out`. Returns `EmptyReplay` if nothing was captured.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_verify_replay(handle: u64, out: *mut PitlaneDeterminismReport) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return null_argument("pitlane_verify_replay", "out");
        }
        let Some(arc) = get_sim(handle) else {
            return invalid_handle("pitlane_verify_replay", handle);
        };
        let mut sim = ffi_lock!(arc);
        match sim.core.verify_replay_determinism() {
            Ok(report) => {
                // SAFETY: out is valid per caller contract.
                unsafe { *out = PitlaneDeterminismReport::from(&report) };
                PitlaneStatus::Ok as i32
            }
            Err(e) => PitlaneStatus::from(&e) as i32,
        }
    })
}

// ── Batch ───────────────────────────────────────────────────────

/// Reset and drive car `car_index` for `laps` laps with the built-in
/// calibration driver. All zeros for an invalid handle, out-of-range car
/// or zero laps.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_run_batch_laps(
    handle: u64,
    car_index: u32,
    laps: u32,
) -> PitlaneBatchLapResult {
    ffi_guard_or!(PitlaneBatchLapResult::default(), {
        with_sim(handle, |sim| {
            sim.clock.reset();
            PitlaneBatchLapResult::from(sim.core.run_batch_laps(car_index as usize, laps))
        })
        .unwrap_or_default()
    })
}

// ── Snapshots ───────────────────────────────────────────────────

/// Copy the state of car `car_index` to `*out`.
///
/// For an invalid handle or out-of-range index `*out` is zeroed and the
/// matching error status returned.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_snapshot(
    handle: u64,
    car_index: u32,
    out: *mut PitlaneCarSnapshot,
) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return null_argument("pitlane_snapshot", "out");
        }
        let (snap, status) = match get_sim(handle) {
            Some(arc) => match ffi_lock!(arc).core.snapshot(car_index as usize) {
                Some(snap) => (PitlaneCarSnapshot::from(snap), PitlaneStatus::Ok as i32),
                None => (
                    PitlaneCarSnapshot::default(),
                    PitlaneStatus::InvalidArgument as i32,
                ),
            },
            None => (
                PitlaneCarSnapshot::default(),
                invalid_handle("pitlane_snapshot", handle),
            ),
        };
        // SAFETY: out is valid per caller contract.
        unsafe { *out = snap };
        status
    })
}

/// Overwrite the state of car `car_index` from `*snapshot`, for resuming a
/// saved session. Out-of-range indices change nothing.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_restore_snapshot(
    handle: u64,
    car_index: u32,
    snapshot: *const PitlaneCarSnapshot,
) -> i32 {
    ffi_guard!({
        if snapshot.is_null() {
            return null_argument("pitlane_restore_snapshot", "snapshot");
        }
        let Some(arc) = get_sim(handle) else {
            return invalid_handle("pitlane_restore_snapshot", handle);
        };
        // SAFETY: snapshot is valid per caller contract.
        let snap = unsafe { *snapshot };
        if ffi_lock!(arc).core.restore(car_index as usize, &snap.into()) {
            PitlaneStatus::Ok as i32
        } else {
            PitlaneStatus::InvalidArgument as i32
        }
    })
}

// ── State views ─────────────────────────────────────────────────

fn field_ptr(handle: u64, field: StateField) -> *const f32 {
    ffi_guard_or!(std::ptr::null(), {
        with_sim(handle, |sim| sim.core.state().field(field).as_ptr()).unwrap_or(std::ptr::null())
    })
}

/// Pointer to every car's speed, m/s. Null for an invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_state_speed_ptr(handle: u64) -> *const f32 {
    field_ptr(handle, StateField::Speed)
}

/// Pointer to every car's world x, metres. Null for an invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_state_x_ptr(handle: u64) -> *const f32 {
    field_ptr(handle, StateField::X)
}

/// Pointer to every car's world y, metres. Null for an invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_state_y_ptr(handle: u64) -> *const f32 {
    field_ptr(handle, StateField::Y)
}

/// Pointer to every car's heading, radians. Null for an invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_state_yaw_ptr(handle: u64) -> *const f32 {
    field_ptr(handle, StateField::Yaw)
}

/// Pointer to every car's arc-length position, metres. Null for an invalid
/// handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_state_s_ptr(handle: u64) -> *const f32 {
    field_ptr(handle, StateField::S)
}

/// Number of simulated cars.
///
/// **Ambiguity warning:** returns 0 for both "no cars" and "invalid
/// handle." Prefer [`pitlane_car_count_get`].
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_car_count(handle: u64) -> u32 {
    ffi_guard_or!(0, {
        with_sim(handle, |sim| sim.core.car_count() as u32).unwrap_or(0)
    })
}

/// Car count with explicit error reporting.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_car_count_get(handle: u64, out: *mut u32) -> i32 {
    ffi_guard!({
        if out.is_null() {
            return null_argument("pitlane_car_count_get", "out");
        }
        let Some(arc) = get_sim(handle) else {
            return invalid_handle("pitlane_car_count_get", handle);
        };
        let count = ffi_lock!(arc).core.car_count() as u32;
        // SAFETY: out is valid per caller contract.
        unsafe { *out = count };
        PitlaneStatus::Ok as i32
    })
}

/// Identity of the state arrays' contents. Changes on every reset and
/// car-count change, so a host can tell its cached view is out of date.
/// 0 for an invalid handle; live simulations never report 0.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_state_generation(handle: u64) -> u64 {
    ffi_guard_or!(0, {
        with_sim(handle, |sim| sim.core.generation().0).unwrap_or(0)
    })
}

/// FNV-1a hash of every state array, for bit-exact comparisons between
/// runs. 0 for an invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_state_hash(handle: u64) -> u64 {
    ffi_guard_or!(0, {
        with_sim(handle, |sim| sim.core.state_hash()).unwrap_or(0)
    })
}

/// Ticks stepped since the last reset or car-count change. 0 for an
/// invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn pitlane_current_tick(handle: u64) -> u64 {
    ffi_guard_or!(0, {
        with_sim(handle, |sim| sim.core.current_tick().0).unwrap_or(0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_stock() -> u64 {
        let sim = PitlaneSimConfig::stock();
        let car = PitlaneCarConfig::stock();
        let track = PitlaneTrackConfig::stock();
        let handle = pitlane_create(&sim, &car, &track);
        assert_ne!(handle, 0);
        handle
    }

    #[test]
    fn create_step_destroy_lifecycle() {
        let h = create_stock();
        assert_eq!(pitlane_car_count(h), 1);
        let input = PitlaneDriverInput {
            throttle: 1.0,
            brake: 0.0,
            steer: 0.0,
        };
        for _ in 0..240 {
            assert_eq!(pitlane_step(h, &input, 1), PitlaneStatus::Ok as i32);
        }
        assert_eq!(pitlane_current_tick(h), 240);

        let mut snap = PitlaneCarSnapshot::default();
        assert_eq!(pitlane_snapshot(h, 0, &mut snap), PitlaneStatus::Ok as i32);
        assert!(snap.speed_mps > 0.0);

        assert_eq!(pitlane_destroy(h), PitlaneStatus::Ok as i32);
        assert_eq!(pitlane_destroy(h), PitlaneStatus::InvalidHandle as i32);
    }

    #[test]
    fn destroyed_handle_is_a_safe_no_op() {
        let h = create_stock();
        pitlane_destroy(h);
        assert_eq!(pitlane_step(h, std::ptr::null(), 0), PitlaneStatus::InvalidHandle as i32);
        assert_eq!(pitlane_reset(h), PitlaneStatus::InvalidHandle as i32);
        assert_eq!(pitlane_car_count(h), 0);
        assert_eq!(pitlane_state_generation(h), 0);
        assert!(pitlane_state_speed_ptr(h).is_null());
        assert_eq!(pitlane_replay_captured_deterministic(h), 0);
        assert_eq!(pitlane_run_batch_laps(h, 0, 1), PitlaneBatchLapResult::default());

        let mut snap = PitlaneCarSnapshot {
            speed_mps: 9.0,
            ..PitlaneCarSnapshot::default()
        };
        assert_eq!(pitlane_snapshot(h, 0, &mut snap), PitlaneStatus::InvalidHandle as i32);
        assert_eq!(snap, PitlaneCarSnapshot::default());
    }

    #[test]
    fn rejected_config_reports_status() {
        let sim = PitlaneSimConfig::stock();
        let mut car = PitlaneCarConfig::stock();
        let track = PitlaneTrackConfig::stock();
        car.powertrain.torque_curve = std::ptr::null();
        let mut out = 0u64;
        assert_eq!(
            pitlane_create_checked(&sim, &car, &track, &mut out),
            PitlaneStatus::InvalidPowertrain as i32
        );
        assert_eq!(out, 0);
        assert_eq!(pitlane_create(&sim, &car, &track), 0);

        let mut bad_dt = sim;
        bad_dt.fixed_dt = 0.0;
        assert_eq!(
            pitlane_create_checked(&bad_dt, &PitlaneCarConfig::stock(), &track, &mut out),
            PitlaneStatus::InvalidTimestep as i32
        );
    }

    #[test]
    fn oversized_capacity_is_rejected_not_allocated() {
        let track = PitlaneTrackConfig::stock();
        let car = PitlaneCarConfig::stock();
        let mut out = 0u64;

        let mut sim = PitlaneSimConfig::stock();
        sim.replay_capacity_steps = u32::MAX;
        assert_eq!(
            pitlane_create_checked(&sim, &car, &track, &mut out),
            PitlaneStatus::InvalidCapacity as i32
        );
        assert_eq!(out, 0);

        let mut sim = PitlaneSimConfig::stock();
        sim.max_cars = u32::MAX;
        assert_eq!(
            pitlane_create_checked(&sim, &car, &track, &mut out),
            PitlaneStatus::InvalidCapacity as i32
        );
        assert_eq!(pitlane_create(&sim, &car, &track), 0);
    }

    #[test]
    fn null_arguments_rejected() {
        let mut out = 0u64;
        assert_eq!(
            pitlane_create_checked(std::ptr::null(), std::ptr::null(), std::ptr::null(), &mut out),
            PitlaneStatus::InvalidArgument as i32
        );
        let h = create_stock();
        assert_eq!(pitlane_step(h, std::ptr::null(), 3), PitlaneStatus::InvalidArgument as i32);
        assert_eq!(
            pitlane_snapshot(h, 0, std::ptr::null_mut()),
            PitlaneStatus::InvalidArgument as i32
        );
        pitlane_destroy(h);
    }

    #[test]
    fn out_of_range_snapshot_is_zeroed() {
        let h = create_stock();
        let mut snap = PitlaneCarSnapshot {
            lap: 7,
            ..PitlaneCarSnapshot::default()
        };
        assert_eq!(pitlane_snapshot(h, 5, &mut snap), PitlaneStatus::InvalidArgument as i32);
        assert_eq!(snap, PitlaneCarSnapshot::default());
        assert_eq!(
            pitlane_restore_snapshot(h, 5, &PitlaneCarSnapshot::default()),
            PitlaneStatus::InvalidArgument as i32
        );
        pitlane_destroy(h);
    }

    #[test]
    fn state_pointers_survive_car_count_changes() {
        let h = create_stock();
        let before = pitlane_state_x_ptr(h);
        let g0 = pitlane_state_generation(h);
        assert_eq!(pitlane_set_car_count(h, 20), PitlaneStatus::Ok as i32);
        assert_eq!(pitlane_car_count(h), 20);
        assert_eq!(pitlane_state_x_ptr(h), before);
        assert_ne!(pitlane_state_generation(h), g0);
        assert_eq!(pitlane_set_car_count(h, 50), PitlaneStatus::Ok as i32);
        assert_eq!(pitlane_car_count(h), 20);
        pitlane_destroy(h);
    }

    #[test]
    #[allow(unsafe_code)]
    fn speed_pointer_reads_live_values() {
        let h = create_stock();
        pitlane_set_car_count(h, 2);
        let inputs = [
            PitlaneDriverInput {
                throttle: 1.0,
                brake: 0.0,
                steer: 0.0,
            },
            PitlaneDriverInput::default(),
        ];
        for _ in 0..100 {
            pitlane_step(h, inputs.as_ptr(), 2);
        }
        let ptr = pitlane_state_speed_ptr(h);
        let speeds = unsafe { std::slice::from_raw_parts(ptr, 2) };
        assert!(speeds[0] > 0.0);
        assert_eq!(speeds[1], 0.0);
        pitlane_destroy(h);
    }

    #[test]
    fn step_elapsed_runs_whole_steps() {
        let h = create_stock();
        // 1/240 s steps: 0.1 s covers 24 of them.
        let steps = pitlane_step_elapsed(h, std::ptr::null(), 0, 0.1 + 1e-4);
        assert_eq!(steps, 24);
        assert_eq!(pitlane_current_tick(h), 24);
        assert_eq!(pitlane_step_elapsed(h, std::ptr::null(), 0, -1.0), 0);
        pitlane_destroy(h);
    }

    #[test]
    fn replay_check_through_the_abi() {
        let h = create_stock();
        pitlane_set_car_count(h, 3);
        assert_eq!(pitlane_replay_captured_deterministic(h), 0);

        let mut report = PitlaneDeterminismReport::default();
        assert_eq!(pitlane_verify_replay(h, &mut report), PitlaneStatus::EmptyReplay as i32);

        pitlane_start_replay_capture(h);
        let inputs = [PitlaneDriverInput {
            throttle: 0.8,
            brake: 0.0,
            steer: 0.1,
        }; 3];
        for _ in 0..500 {
            pitlane_step(h, inputs.as_ptr(), 3);
        }
        pitlane_stop_replay_capture(h);
        assert_eq!(pitlane_replay_captured_deterministic(h), 1);
        assert_eq!(pitlane_verify_replay(h, &mut report), PitlaneStatus::Ok as i32);
        assert_eq!(report.frames_replayed, 500);
        assert_eq!(report.bit_exact, 1);
        assert_eq!(report.baseline_hash, report.replayed_hash);
        pitlane_destroy(h);
    }

    #[test]
    fn snapshot_restore_round_trip() {
        let h = create_stock();
        let input = PitlaneDriverInput {
            throttle: 1.0,
            brake: 0.0,
            steer: 0.2,
        };
        for _ in 0..300 {
            pitlane_step(h, &input, 1);
        }
        let mut saved = PitlaneCarSnapshot::default();
        pitlane_snapshot(h, 0, &mut saved);
        let hash = pitlane_state_hash(h);

        pitlane_reset(h);
        assert_ne!(pitlane_state_hash(h), hash);
        assert_eq!(pitlane_restore_snapshot(h, 0, &saved), PitlaneStatus::Ok as i32);
        assert_eq!(pitlane_state_hash(h), hash);
        pitlane_destroy(h);
    }

    #[test]
    fn batch_laps_through_the_abi() {
        let h = create_stock();
        let result = pitlane_run_batch_laps(h, 0, 1);
        assert_eq!(result.laps_completed, 1);
        assert!(result.best_lap_time_s > 0.0);
        assert_eq!(result.mean_lap_time_s, result.best_lap_time_s);
        assert_eq!(pitlane_run_batch_laps(h, 3, 1), PitlaneBatchLapResult::default());
        pitlane_destroy(h);
    }

    #[test]
    fn defaults_write_stock_values() {
        let mut sim = PitlaneSimConfig::default();
        let mut car = PitlaneCarConfig::default();
        let mut track = PitlaneTrackConfig::default();
        assert_eq!(pitlane_default_sim_config(&mut sim), PitlaneStatus::Ok as i32);
        assert_eq!(pitlane_default_car_config(&mut car), PitlaneStatus::Ok as i32);
        assert_eq!(pitlane_default_track_config(&mut track), PitlaneStatus::Ok as i32);
        assert_eq!(sim, PitlaneSimConfig::stock());
        assert_eq!(car.powertrain.gear_count, 8);
        assert_eq!(track.node_count, 16);
        assert_eq!(
            pitlane_default_sim_config(std::ptr::null_mut()),
            PitlaneStatus::InvalidArgument as i32
        );
    }
}
