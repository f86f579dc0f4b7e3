//! The simulation core.
//!
//! [`SimulationCore`] owns the configuration, the loaded track, the car
//! state and the replay log. Every mutating method takes `&mut self` and
//! [`state()`](SimulationCore::state) returns a view that borrows `self`,
//! so a host can never observe the arrays mid-rebuild.
//!
//! # Determinism
//!
//! A step is a pure function of the setup, the state and the input slice:
//! no clocks, no randomness, no iteration over unordered containers. The
//! replay check re-runs a captured input log from a reset state and
//! compares the outcome against the state at the end of capture.

use log::{debug, warn};
use pitlane_core::{
    CarConfig, CarSnapshot, ConfigError, DriverInput, Generation, SimConfig, SimSetup, TickId,
};
use pitlane_replay::{
    compare_states, state_hash, DeterminismReport, RecordOutcome, ReplayError, ReplayLog,
    Tolerances,
};
use pitlane_track::TrackProfile;

use crate::dynamics::Integrator;
use crate::state::{CarStateSoA, StateView};

// Compile-time assertion: the core can move between threads.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<SimulationCore>();
    }
};

/// Fixed-timestep multi-car simulation.
///
/// Created from a [`SimSetup`] via [`new()`](SimulationCore::new). Starts
/// with one car (none if `max_cars` is zero), at rest on the start line.
///
/// # Example
///
/// ```
/// use pitlane_core::{DriverInput, SimSetup};
/// use pitlane_engine::SimulationCore;
///
/// let mut core = SimulationCore::new(SimSetup::default()).unwrap();
/// core.set_car_count(4);
/// let inputs = vec![DriverInput::new(1.0, 0.0, 0.0); 4];
/// for _ in 0..240 {
///     core.step(&inputs);
/// }
/// assert!(core.state().speed().iter().all(|&v| v > 0.0));
/// ```
#[derive(Debug)]
pub struct SimulationCore {
    sim: SimConfig,
    car: CarConfig,
    track: TrackProfile,
    state: CarStateSoA,
    replay: ReplayLog,
    /// State at the moment recording ended, when it ended before the session.
    replay_baseline: Option<CarStateSoA>,
    tick: TickId,
}

impl SimulationCore {
    /// Validate `setup`, load its track and build a ready-to-step core.
    ///
    /// # Errors
    ///
    /// Returns the first problem [`SimSetup::validate`] finds.
    pub fn new(setup: SimSetup) -> Result<Self, ConfigError> {
        if let Err(e) = setup.validate() {
            warn!("simulation setup rejected: {e}");
            return Err(e);
        }
        let track = TrackProfile::load(&setup.track)?;
        let SimSetup { sim, car, .. } = setup;

        let mut core = Self {
            state: CarStateSoA::with_capacity(sim.max_cars),
            replay: ReplayLog::with_capacity(sim.replay_capacity_steps),
            replay_baseline: None,
            tick: TickId(0),
            track,
            car,
            sim,
        };
        core.set_car_count(core.sim.max_cars.min(1));
        debug!(
            "simulation core created: dt={} max_cars={} replay_capacity={}",
            core.sim.fixed_dt, core.sim.max_cars, core.sim.replay_capacity_steps
        );
        Ok(core)
    }

    // ── Accessors ───────────────────────────────────────────────

    /// Integration and capacity settings.
    pub fn sim_config(&self) -> &SimConfig {
        &self.sim
    }

    /// Car parameters shared by every car.
    pub fn car_config(&self) -> &CarConfig {
        &self.car
    }

    /// The loaded track.
    pub fn track(&self) -> &TrackProfile {
        &self.track
    }

    /// Fixed timestep, seconds.
    pub fn dt(&self) -> f32 {
        self.sim.fixed_dt
    }

    /// Number of simulated cars.
    pub fn car_count(&self) -> usize {
        self.state.len()
    }

    /// Ticks stepped since the last reset or car-count change.
    pub fn current_tick(&self) -> TickId {
        self.tick
    }

    /// Identity of the state arrays. Changes on reset and car-count change.
    pub fn generation(&self) -> Generation {
        self.state.generation()
    }

    /// Read-only view of every car's state.
    pub fn state(&self) -> StateView<'_> {
        StateView::new(&self.state)
    }

    /// FNV-1a hash over every state array, for bit-exact comparisons.
    pub fn state_hash(&self) -> u64 {
        state_hash(&self.state)
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Change the number of cars, clamped to `max_cars`, and put every car
    /// back on the start line. The replay log is kept.
    pub fn set_car_count(&mut self, count: usize) {
        let count = count.min(self.sim.max_cars);
        self.state.rebuild(count);
        self.tick = TickId(0);
        debug!(
            "car count set to {count} (generation {})",
            self.state.generation()
        );
    }

    /// Put every car back on the start line and discard the replay log.
    /// Capture stays enabled if it was.
    pub fn reset(&mut self) {
        self.reset_state();
        self.replay.clear();
        self.replay_baseline = None;
        debug!("simulation reset (generation {})", self.state.generation());
    }

    fn reset_state(&mut self) {
        let count = self.state.len();
        self.state.rebuild(count);
        self.tick = TickId(0);
    }

    // ── Stepping ────────────────────────────────────────────────

    /// Advance every car by one fixed timestep.
    ///
    /// `inputs[i]` drives car `i`. Cars without an input get
    /// [`DriverInput::NEUTRAL`]; extra inputs are ignored. Out-of-range
    /// values are clamped. Never fails.
    pub fn step(&mut self, inputs: &[DriverInput]) {
        let car_count = self.state.len();
        if self.replay.record(inputs, car_count) == RecordOutcome::Full
            && self.replay_baseline.is_none()
        {
            self.replay_baseline = Some(self.state.clone());
        }
        self.integrate(inputs);
    }

    fn integrate(&mut self, inputs: &[DriverInput]) {
        let integrator = Integrator::new(&self.car, &self.track, self.sim.fixed_dt);
        for i in 0..self.state.len() {
            let input = inputs.get(i).copied().unwrap_or(DriverInput::NEUTRAL);
            integrator.advance(&mut self.state, i, input);
        }
        self.tick = TickId(self.tick.0 + 1);
    }

    // ── Snapshots ───────────────────────────────────────────────

    /// Copy out every field of car `index`, or `None` if out of range.
    pub fn snapshot(&self, index: usize) -> Option<CarSnapshot> {
        self.state.snapshot(index)
    }

    /// Overwrite every field of car `index`. Returns `false` (and changes
    /// nothing) if out of range.
    pub fn restore(&mut self, index: usize, snapshot: &CarSnapshot) -> bool {
        self.state.restore(index, snapshot)
    }

    // ── Replay ──────────────────────────────────────────────────

    /// Discard any captured frames and record every following tick.
    pub fn start_replay_capture(&mut self) {
        self.replay.start();
        self.replay_baseline = None;
        debug!(
            "replay capture started (capacity {} ticks)",
            self.replay.capacity()
        );
    }

    /// Stop recording. Captured frames are kept for verification.
    pub fn stop_replay_capture(&mut self) {
        if self.replay.is_capturing() && self.replay_baseline.is_none() {
            self.replay_baseline = Some(self.state.clone());
        }
        self.replay.stop();
        debug!("replay capture stopped after {} ticks", self.replay.len());
    }

    /// Whether ticks are being recorded.
    pub fn is_capturing(&self) -> bool {
        self.replay.is_capturing()
    }

    /// The captured input log.
    pub fn replay_log(&self) -> &ReplayLog {
        &self.replay
    }

    /// Re-run the captured inputs from a reset state and compare the result
    /// with the state at the end of capture.
    ///
    /// The comparison baseline is the state when recording ended: when the
    /// log filled up or capture was stopped, or the current state if
    /// recording is still live. Afterwards the cars hold the replayed state
    /// and the log is unchanged, so the check can be repeated.
    ///
    /// # Errors
    ///
    /// [`ReplayError::EmptyLog`] if nothing was captured.
    pub fn verify_replay_determinism(&mut self) -> Result<DeterminismReport, ReplayError> {
        if self.replay.is_empty() {
            return Err(ReplayError::EmptyLog);
        }
        let baseline = self
            .replay_baseline
            .clone()
            .unwrap_or_else(|| self.state.clone());

        let frames = self.replay.take_frames();
        self.reset_state();
        for frame in &frames {
            self.integrate(&frame.inputs);
        }
        let frames_replayed = frames.len();
        self.replay.restore_frames(frames);

        let report = DeterminismReport {
            frames_replayed,
            baseline_hash: state_hash(&baseline),
            replayed_hash: state_hash(&self.state),
            divergences: compare_states(&baseline, &self.state, &Tolerances::default()),
        };
        if report.is_deterministic() {
            debug!("replay of {frames_replayed} ticks matched");
        } else {
            warn!(
                "replay of {frames_replayed} ticks diverged in {} quantities; first: {}",
                report.divergences.len(),
                report.divergences[0]
            );
        }
        Ok(report)
    }

    /// [`verify_replay_determinism`](Self::verify_replay_determinism)
    /// reduced to a flag. `false` when the log is empty.
    pub fn replay_captured_deterministic(&mut self) -> bool {
        self.verify_replay_determinism()
            .map(|report| report.is_deterministic())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitlane_test_utils::{full_throttle, setup_with_cars, stock_setup};

    #[test]
    fn new_starts_with_one_idle_car() {
        let core = SimulationCore::new(stock_setup()).unwrap();
        assert_eq!(core.car_count(), 1);
        let snap = core.snapshot(0).unwrap();
        assert_eq!(snap.gear, 1);
        assert_eq!(snap.engine_rpm, 4000.0);
        assert_eq!(core.current_tick(), TickId(0));
        assert!(!core.is_capturing());
    }

    #[test]
    fn zero_max_cars_gives_empty_core() {
        let mut core = SimulationCore::new(setup_with_cars(0)).unwrap();
        assert_eq!(core.car_count(), 0);
        core.set_car_count(5);
        assert_eq!(core.car_count(), 0);
        core.step(&full_throttle(1));
        assert_eq!(core.current_tick(), TickId(1));
    }

    #[test]
    fn new_rejects_invalid_setup() {
        let mut setup = stock_setup();
        setup.track.nodes.truncate(1);
        assert!(matches!(
            SimulationCore::new(setup),
            Err(ConfigError::TooFewTrackNodes { count: 1 })
        ));
    }

    #[test]
    fn set_car_count_clamps_to_max() {
        let mut core = SimulationCore::new(setup_with_cars(3)).unwrap();
        core.set_car_count(10);
        assert_eq!(core.car_count(), 3);
    }

    #[test]
    fn set_car_count_and_reset_bump_generation() {
        let mut core = SimulationCore::new(stock_setup()).unwrap();
        let g0 = core.generation();
        core.set_car_count(2);
        let g1 = core.generation();
        core.reset();
        let g2 = core.generation();
        assert!(g0 < g1 && g1 < g2);
    }

    #[test]
    fn reset_returns_cars_to_the_line_and_clears_log() {
        let mut core = SimulationCore::new(stock_setup()).unwrap();
        core.start_replay_capture();
        for _ in 0..100 {
            core.step(&full_throttle(1));
        }
        core.reset();
        assert_eq!(core.snapshot(0).unwrap().speed_mps, 0.0);
        assert!(core.replay_log().is_empty());
        assert!(core.is_capturing());
        assert_eq!(core.current_tick(), TickId(0));
    }

    #[test]
    fn missing_inputs_are_neutral() {
        let mut a = SimulationCore::new(stock_setup()).unwrap();
        let mut b = SimulationCore::new(stock_setup()).unwrap();
        a.set_car_count(3);
        b.set_car_count(3);
        let one = [DriverInput::new(1.0, 0.0, 0.0)];
        let padded = [
            DriverInput::new(1.0, 0.0, 0.0),
            DriverInput::NEUTRAL,
            DriverInput::NEUTRAL,
        ];
        for _ in 0..50 {
            a.step(&one);
            b.step(&padded);
        }
        assert_eq!(a.state_hash(), b.state_hash());
        assert_eq!(a.state().speed()[1], 0.0);
    }

    #[test]
    fn verify_on_empty_log_fails() {
        let mut core = SimulationCore::new(stock_setup()).unwrap();
        assert_eq!(
            core.verify_replay_determinism(),
            Err(ReplayError::EmptyLog)
        );
        assert!(!core.replay_captured_deterministic());
    }

    #[test]
    fn verify_leaves_log_intact() {
        let mut core = SimulationCore::new(stock_setup()).unwrap();
        core.start_replay_capture();
        for _ in 0..20 {
            core.step(&full_throttle(1));
        }
        assert!(core.replay_captured_deterministic());
        assert_eq!(core.replay_log().len(), 20);
        assert!(core.replay_captured_deterministic());
    }

    #[test]
    fn stop_freezes_baseline() {
        let mut core = SimulationCore::new(stock_setup()).unwrap();
        core.start_replay_capture();
        for _ in 0..30 {
            core.step(&full_throttle(1));
        }
        core.stop_replay_capture();
        for _ in 0..30 {
            core.step(&full_throttle(1));
        }
        assert_eq!(core.replay_log().len(), 30);
        let report = core.verify_replay_determinism().unwrap();
        assert!(report.is_bit_exact());
        assert_eq!(report.frames_replayed, 30);
    }
}
