//! Tolerance-based comparison of a replayed state against its baseline.
//!
//! Replay determinism is judged on three per-car quantities: forward
//! speed, arc-length position and completed laps. The floats are compared
//! against absolute [`Tolerances`]; laps must match exactly.

use std::fmt;

use pitlane_core::{CounterField, StateAccess, StateField};

/// Absolute tolerances for the float quantities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    /// Maximum speed difference, m/s (exclusive).
    pub speed_mps: f32,
    /// Maximum arc-length difference, metres (exclusive).
    pub s_m: f32,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            speed_mps: 1e-5,
            s_m: 1e-4,
        }
    }
}

/// Which quantity diverged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DivergenceKind {
    /// The two states hold different numbers of cars.
    CarCount,
    /// Forward speed differs by at least the speed tolerance.
    Speed,
    /// Arc-length position differs by at least the position tolerance.
    ArcLength,
    /// Completed lap counts differ.
    Lap,
}

impl fmt::Display for DivergenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CarCount => write!(f, "car count"),
            Self::Speed => write!(f, "speed"),
            Self::ArcLength => write!(f, "arc length"),
            Self::Lap => write!(f, "lap"),
        }
    }
}

/// One quantity of one car that fell outside tolerance.
#[derive(Clone, Debug, PartialEq)]
pub struct CarDivergence {
    /// Index of the car. Zero for [`DivergenceKind::CarCount`].
    pub car: usize,
    /// The quantity that diverged.
    pub kind: DivergenceKind,
    /// Value in the baseline run.
    pub baseline: f64,
    /// Value after replay.
    pub replayed: f64,
}

impl fmt::Display for CarDivergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "car {} {}: baseline={} replayed={}",
            self.car, self.kind, self.baseline, self.replayed
        )
    }
}

/// Outcome of replaying a captured input log.
#[derive(Clone, Debug, PartialEq)]
pub struct DeterminismReport {
    /// Number of frames replayed.
    pub frames_replayed: usize,
    /// Full-state hash of the baseline.
    pub baseline_hash: u64,
    /// Full-state hash after replay.
    pub replayed_hash: u64,
    /// Every out-of-tolerance quantity, in car order.
    pub divergences: Vec<CarDivergence>,
}

impl DeterminismReport {
    /// Whether the replay matched the baseline within tolerance.
    pub fn is_deterministic(&self) -> bool {
        self.divergences.is_empty()
    }

    /// Whether the replay reproduced the baseline bit for bit.
    pub fn is_bit_exact(&self) -> bool {
        self.is_deterministic() && self.baseline_hash == self.replayed_hash
    }
}

/// Compare per-car speed, position and lap count.
///
/// A float quantity passes when `|baseline - replayed| < tolerance`, so NaN
/// on either side is always a divergence. When car counts differ, a single
/// [`DivergenceKind::CarCount`] entry is reported and the common prefix of
/// cars is still compared. An array shorter than its car count reads as
/// NaN past its end, so a missing value is always a divergence.
pub fn compare_states(
    baseline: &dyn StateAccess,
    replayed: &dyn StateAccess,
    tolerances: &Tolerances,
) -> Vec<CarDivergence> {
    let mut divergences = Vec::new();
    if baseline.car_count() != replayed.car_count() {
        divergences.push(CarDivergence {
            car: 0,
            kind: DivergenceKind::CarCount,
            baseline: baseline.car_count() as f64,
            replayed: replayed.car_count() as f64,
        });
    }

    let checks = [
        (StateField::Speed, DivergenceKind::Speed, tolerances.speed_mps),
        (StateField::S, DivergenceKind::ArcLength, tolerances.s_m),
    ];
    let base_lap = baseline.read_counter(CounterField::Lap);
    let rep_lap = replayed.read_counter(CounterField::Lap);
    let cars = baseline.car_count().min(replayed.car_count());

    for car in 0..cars {
        for (field, kind, tolerance) in checks {
            let a = value_at(baseline.read_field(field), car);
            let b = value_at(replayed.read_field(field), car);
            // False for NaN.
            let within = (a - b).abs() < tolerance;
            if !within {
                divergences.push(CarDivergence {
                    car,
                    kind,
                    baseline: a as f64,
                    replayed: b as f64,
                });
            }
        }
        let (a, b) = (base_lap.get(car), rep_lap.get(car));
        if a.is_none() || a != b {
            divergences.push(CarDivergence {
                car,
                kind: DivergenceKind::Lap,
                baseline: a.map_or(f64::NAN, |&v| f64::from(v)),
                replayed: b.map_or(f64::NAN, |&v| f64::from(v)),
            });
        }
    }
    divergences
}

fn value_at(values: &[f32], car: usize) -> f32 {
    values.get(car).copied().unwrap_or(f32::NAN)
}
