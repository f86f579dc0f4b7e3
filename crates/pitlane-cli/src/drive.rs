//! Input sources for the command-line harness.

use pitlane_core::DriverInput;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Speed-governed driver for `run`: full throttle, a touch of steering
/// above 40 m/s and light braking above 85 m/s.
pub fn governed_input(speed_mps: f32) -> DriverInput {
    DriverInput {
        throttle: 1.0,
        brake: if speed_mps > 85.0 { 0.3 } else { 0.0 },
        steer: if speed_mps > 40.0 { 0.1 } else { 0.0 },
    }
}

/// Seeded pseudo-random inputs for `verify`.
///
/// Throttle is held for a random stretch of ticks per car, with occasional
/// braking and slowly wandering steering.
pub struct ScriptedDriver {
    rng: ChaCha8Rng,
    held: Vec<(DriverInput, u32)>,
}

impl ScriptedDriver {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            held: Vec::new(),
        }
    }

    /// Replace `out` with this tick's inputs for `car_count` cars.
    pub fn fill(&mut self, car_count: usize, out: &mut Vec<DriverInput>) {
        self.held.resize(car_count, (DriverInput::NEUTRAL, 0));
        out.clear();
        for (input, remaining) in &mut self.held {
            if *remaining == 0 {
                *input = DriverInput {
                    throttle: self.rng.gen_range(0.3f32..=1.0),
                    brake: if self.rng.gen_bool(0.2) {
                        self.rng.gen_range(0.1f32..0.8)
                    } else {
                        0.0
                    },
                    steer: self.rng.gen_range(-0.4f32..0.4),
                };
                *remaining = self.rng.gen_range(30..240);
            }
            *remaining -= 1;
            out.push(*input);
        }
    }
}
