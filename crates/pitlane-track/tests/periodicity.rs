use pitlane_core::TrackConfig;
use pitlane_track::TrackProfile;
use proptest::prelude::*;

fn stock() -> TrackProfile {
    TrackProfile::load(&TrackConfig::default()).unwrap()
}

proptest! {
    #[test]
    fn wrapped_position_is_in_range(s in -1.0e7f32..1.0e7) {
        let track = stock();
        let w = track.wrap_s(s);
        prop_assert!(w >= 0.0 && w < track.length(), "{} -> {}", s, w);
    }

    #[test]
    fn samples_repeat_every_loop(s in -20_000.0f32..20_000.0) {
        let track = stock();
        let len = track.length();
        prop_assert!((track.curvature(s) - track.curvature(s + len)).abs() < 1e-4);
        prop_assert!((track.elevation(s) - track.elevation(s + len)).abs() < 1e-3);
        prop_assert!((track.curvature(s) - track.curvature(s - len)).abs() < 1e-4);
    }

    #[test]
    fn curvature_stays_within_node_envelope(s in -10_000.0f32..10_000.0) {
        let track = stock();
        let config = TrackConfig::default();
        let lo = config.nodes.iter().map(|n| n.curvature_1pm).fold(f32::INFINITY, f32::min);
        let hi = config.nodes.iter().map(|n| n.curvature_1pm).fold(f32::NEG_INFINITY, f32::max);
        let k = track.curvature(s);
        prop_assert!(k >= lo - 1e-6 && k <= hi + 1e-6, "curvature {} at {}", k, s);
    }
}

#[test]
fn seam_is_continuous() {
    let track = stock();
    let before = track.curvature(track.length() - 0.01);
    let after = track.curvature(0.0);
    assert!((before - after).abs() < 1e-6);
}
