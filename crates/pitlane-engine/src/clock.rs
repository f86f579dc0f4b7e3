//! Reconciling wall-clock time with the fixed simulation step.
//!
//! Hosts driven by a display or network clock hand the elapsed real time to
//! a [`FixedStepClock`], which answers how many fixed steps to run now and
//! carries the fractional remainder to the next call.

/// Upper bound on steps yielded by a single [`FixedStepClock::advance`].
///
/// A host that stalls for a long time catches up over several calls
/// instead of freezing while it simulates the whole gap at once.
pub const MAX_CATCH_UP_STEPS: u32 = 8192;

/// Accumulates elapsed time and converts it to whole fixed steps.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedStepClock {
    fixed_dt: f32,
    remainder: f32,
}

impl FixedStepClock {
    /// Create a clock for the given step size, with nothing accumulated.
    pub fn new(fixed_dt: f32) -> Self {
        Self {
            fixed_dt,
            remainder: 0.0,
        }
    }

    /// Add `elapsed_s` of real time and return the number of fixed steps the
    /// caller should run now, at most [`MAX_CATCH_UP_STEPS`].
    ///
    /// Negative and non-finite elapsed times are ignored.
    pub fn advance(&mut self, elapsed_s: f32) -> u32 {
        if elapsed_s.is_finite() && elapsed_s > 0.0 {
            self.remainder += elapsed_s;
        }
        if self.fixed_dt.is_nan() || self.fixed_dt <= 0.0 {
            return 0;
        }
        let mut steps = 0;
        while self.remainder >= self.fixed_dt && steps < MAX_CATCH_UP_STEPS {
            self.remainder -= self.fixed_dt;
            steps += 1;
        }
        steps
    }

    /// Time accumulated but not yet consumed by a step, seconds.
    pub fn remainder(&self) -> f32 {
        self.remainder
    }

    /// Step size, seconds.
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Discard any accumulated time.
    pub fn reset(&mut self) {
        self.remainder = 0.0;
    }
}
