//! Periodic piecewise-linear track profile.

use pitlane_core::{ConfigError, TrackConfig};

/// Beyond this many loop lengths from the origin, wrapping starts with a
/// remainder instead of repeated subtraction.
const WRAP_LOOP_LIMIT: f32 = 4.0;

/// Curvature and elevation sampled along a closed loop.
///
/// The default value is an unloaded profile: it has zero length and every
/// sample is `0.0`. A simulation only ever holds a loaded profile, but the
/// unloaded state keeps sampling total.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackProfile {
    s: Vec<f32>,
    curvature: Vec<f32>,
    elevation: Vec<f32>,
    length_m: f32,
}

impl TrackProfile {
    /// Build a profile from validated track nodes.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found by
    /// [`TrackConfig::validate`]: missing or too few nodes, a loop no longer
    /// than one metre, or nodes out of order.
    pub fn load(config: &TrackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let profile = Self {
            s: config.nodes.iter().map(|n| n.s_m).collect(),
            curvature: config.nodes.iter().map(|n| n.curvature_1pm).collect(),
            elevation: config.nodes.iter().map(|n| n.elevation_m).collect(),
            length_m: config.length_m,
        };
        log::debug!(
            "track loaded: {} nodes over {} m",
            profile.s.len(),
            profile.length_m
        );
        Ok(profile)
    }

    /// Whether nodes have been loaded.
    pub fn is_loaded(&self) -> bool {
        !self.s.is_empty()
    }

    /// Loop length in metres, `0.0` when unloaded.
    pub fn length(&self) -> f32 {
        self.length_m
    }

    /// Number of centerline nodes.
    pub fn node_count(&self) -> usize {
        self.s.len()
    }

    /// Map an arc-length position into `[0, length)`.
    ///
    /// Small offsets are corrected by adding or subtracting whole loop
    /// lengths, which leaves positions already in range untouched. NaN
    /// passes through. An unloaded profile returns `s` unchanged.
    pub fn wrap_s(&self, s: f32) -> f32 {
        let len = self.length_m;
        if !self.is_loaded() {
            return s;
        }
        let mut s = s;
        if s.abs() > WRAP_LOOP_LIMIT * len {
            s = s.rem_euclid(len);
        }
        while s < 0.0 {
            s += len;
        }
        while s >= len {
            s -= len;
        }
        s
    }

    /// Signed curvature at `s`, 1/m.
    pub fn curvature(&self, s: f32) -> f32 {
        self.sample(&self.curvature, s)
    }

    /// Centerline elevation at `s`, metres.
    pub fn elevation(&self, s: f32) -> f32 {
        self.sample(&self.elevation, s)
    }

    /// Linear interpolation between the nodes either side of `s`.
    ///
    /// Before the first node the value is interpolated from the last node,
    /// placed one loop length back, instead of holding the first node's
    /// value. This keeps the profile continuous across the wrap when the
    /// first node sits after `s = 0`.
    fn sample(&self, values: &[f32], s: f32) -> f32 {
        let (Some(&first_s), Some(&last_s)) = (self.s.first(), self.s.last()) else {
            return 0.0;
        };
        let (first_v, last_v) = (values[0], values[values.len() - 1]);
        let s = self.wrap_s(s);

        // Index of the first node strictly after `s`.
        let upper = self.s.partition_point(|&node| node <= s);
        if upper == 0 {
            // Before the first node: bridge back to the last one.
            return lerp(last_s - self.length_m, first_s, last_v, first_v, s);
        }
        if upper == self.s.len() {
            return lerp(last_s, self.length_m + first_s, last_v, first_v, s);
        }
        let lower = upper - 1;
        lerp(
            self.s[lower],
            self.s[upper],
            values[lower],
            values[upper],
            s,
        )
    }
}

fn lerp(s0: f32, s1: f32, v0: f32, v1: f32, s: f32) -> f32 {
    if s1 <= s0 {
        return v0;
    }
    let t = (s - s0) / (s1 - s0);
    v0 + (v1 - v0) * t
}
