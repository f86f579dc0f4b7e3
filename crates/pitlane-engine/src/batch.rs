//! Unattended lap runner.
//!
//! Drives one car around the track with a fixed curvature-following policy
//! and reports lap times. Useful for calibrating car parameters against a
//! target lap time without a human or AI driver in the loop.

use log::{debug, info, warn};
use pitlane_core::{BatchLapResult, DriverInput, StateField};

use crate::sim::SimulationCore;

/// Sim-time ceiling per requested lap before the run is abandoned.
const MAX_SECONDS_PER_LAP: f32 = 3600.0;

/// The calibration driver's input for a given track curvature and speed.
///
/// Full throttle on straights (|κ| < 0.02), 60% in corners; 55% brake in
/// tight corners (|κ| > 0.05) above 72 m/s; steering proportional to
/// curvature.
pub fn calibration_input(curvature: f32, speed_mps: f32) -> DriverInput {
    let bend = curvature.abs();
    DriverInput {
        throttle: if bend < 0.02 { 1.0 } else { 0.6 },
        brake: if bend > 0.05 && speed_mps > 72.0 {
            0.55
        } else {
            0.0
        },
        steer: (curvature * 60.0).clamp(-1.0, 1.0),
    }
}

impl SimulationCore {
    /// Reset the simulation and drive car `car_index` until it completes
    /// `laps` laps.
    ///
    /// The selected car follows [`calibration_input`]; every other car gets
    /// neutral input. Returns an all-zero result when `car_index` is out of
    /// range or `laps` is zero. If the car cannot finish within an hour of
    /// simulated time per lap, the laps completed so far are reported.
    ///
    /// Leaves the core in the state at the end of the run.
    pub fn run_batch_laps(&mut self, car_index: usize, laps: u32) -> BatchLapResult {
        if car_index >= self.car_count() || laps == 0 {
            debug!(
                "batch run skipped: car {car_index} of {}, {laps} laps",
                self.car_count()
            );
            return BatchLapResult::default();
        }

        self.reset();

        let max_steps =
            (f64::from(laps) * f64::from(MAX_SECONDS_PER_LAP) / f64::from(self.dt())).ceil() as u64;
        let mut inputs = vec![DriverInput::NEUTRAL; self.car_count()];
        let mut total = 0.0f32;
        let mut best = f32::MAX;
        let mut done = 0u32;
        let mut steps = 0u64;

        while done < laps {
            if steps >= max_steps {
                warn!(
                    "batch run for car {car_index} gave up after {steps} steps, {done}/{laps} laps"
                );
                break;
            }
            let view = self.state();
            let s = view.s()[car_index];
            let speed = view.speed()[car_index];
            inputs[car_index] = calibration_input(self.track().curvature(s), speed);

            self.step(&inputs);
            steps += 1;

            let snap = self.state();
            if snap.lap()[car_index] > done {
                let lap_time = snap.field(StateField::LastLapTime)[car_index];
                total += lap_time;
                best = best.min(lap_time);
                done += 1;
            }
        }

        let result = if done > 0 {
            BatchLapResult {
                laps_completed: done,
                mean_lap_s: total / done as f32,
                best_lap_s: best,
            }
        } else {
            BatchLapResult::default()
        };
        info!(
            "batch run car {car_index}: {} laps, mean {:.3}s, best {:.3}s",
            result.laps_completed, result.mean_lap_s, result.best_lap_s
        );
        result
    }
}
