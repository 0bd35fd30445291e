// Host-side tests for the parameter mapper.

use geopulse_core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn resolved_state(day: DayState, lat: f64) -> InteractionState {
    let mut state = InteractionState::default();
    state.apply_resolution(&Resolution {
        coords: GeoCoords::new(lat, 0.0),
        day,
        bpm: 130,
        source: ResolutionSource::Oracle,
    });
    state
}

#[test]
fn midi_to_hz_matches_a4_and_octave() {
    let a4 = midi_to_hz(69.0);
    assert!((a4 - 440.0).abs() < 1e-4);
    let a5 = midi_to_hz(81.0);
    assert!((a5 / a4 - 2.0).abs() < 1e-4);
}

#[test]
fn note_index_sweeps_full_scale_monotonically() {
    let mut seen = [false; 5];
    let mut prev = 0;
    for i in 0..=1000 {
        let fx = i as f32 / 1000.0;
        let idx = note_index(fx);
        assert!(idx <= 4);
        assert!(idx >= prev, "index decreased at fx {fx}");
        seen[idx] = true;
        prev = idx;
    }
    assert!(seen.iter().all(|s| *s), "not every scale step reached");
    assert_eq!(note_index(0.0), 0);
    assert_eq!(note_index(0.19), 0);
    assert_eq!(note_index(0.21), 1);
    assert_eq!(note_index(1.0), 4);
}

#[test]
fn density_is_linear_within_bounds() {
    assert!((density(0.0) - 0.2).abs() < 1e-6);
    assert!((density(1.0) - 1.0).abs() < 1e-6);
    assert!((density(0.5) - 0.6).abs() < 1e-6);
    let mut prev = density(0.0);
    for i in 1..=100 {
        let d = density(i as f32 / 100.0);
        assert!(d > prev);
        assert!((0.2..=1.0 + 1e-6).contains(&d));
        prev = d;
    }
}

#[test]
fn detune_spans_plus_minus_three_hundred_cents() {
    assert!((detune_cents(0.0) + 300.0).abs() < 1e-4);
    assert!((detune_cents(0.5)).abs() < 1e-4);
    assert!((detune_cents(1.0) - 300.0).abs() < 1e-4);
}

#[test]
fn timbre_and_scale_follow_mode() {
    assert_eq!(lead_waveform(Mode::Light), Waveform::Triangle);
    assert_eq!(lead_waveform(Mode::Dark), Waveform::Sine);
    assert_eq!(scale_for(Mode::Light)[0], 72); // C5
    assert_eq!(scale_for(Mode::Dark)[1], 51); // Eb3
}

#[test]
fn lead_step_uses_pointer_and_mode() {
    let mut state = resolved_state(DayState::Day, 0.0);
    state.set_pointer(0.95, 0.5);
    let mut rng = StdRng::seed_from_u64(7);
    let step = lead_step(&state, &mut rng, 0.25);
    assert_eq!(step.midi, 81); // A5
    assert_eq!(step.waveform, Waveform::Triangle);
    assert!((step.detune_cents - 270.0).abs() < 1e-3);
    assert!((step.frequency_hz - midi_to_hz(81.0)).abs() < 1e-3);
    assert!((step.duration_sec - 0.25).abs() < 1e-6);
}

#[test]
fn full_density_always_triggers() {
    let mut state = InteractionState::default();
    state.set_pointer(0.3, 1.0);
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..2000 {
        assert!(lead_step(&state, &mut rng, 0.25).trigger);
    }
}

#[test]
fn minimum_density_triggers_about_one_in_five() {
    let mut state = InteractionState::default();
    state.set_pointer(0.3, 0.0);
    let mut rng = StdRng::seed_from_u64(42);
    let n = 20_000;
    let hits = (0..n)
        .filter(|_| lead_step(&state, &mut rng, 0.25).trigger)
        .count();
    let rate = hits as f32 / n as f32;
    assert!((rate - 0.2).abs() < 0.02, "trigger rate {rate}");
}

#[test]
fn seeded_draws_are_reproducible() {
    let mut state = InteractionState::default();
    state.set_pointer(0.6, 0.4);
    let mut a = StdRng::seed_from_u64(99);
    let mut b = StdRng::seed_from_u64(99);
    for _ in 0..256 {
        assert_eq!(lead_step(&state, &mut a, 0.2), lead_step(&state, &mut b, 0.2));
    }
}

#[test]
fn pad_chords_wrap_around_progression() {
    for mode in [Mode::Light, Mode::Dark] {
        let len = pad_progression(mode).len();
        assert_eq!(pad_chord(mode, 0), pad_chord(mode, len));
        assert_eq!(pad_chord(mode, 1), pad_chord(mode, len * 3 + 1));
    }
    assert_eq!(pad_chord(Mode::Dark, 0), [48, 51, 55]);
}

#[test]
fn pulse_radius_scales_with_energy() {
    assert!((pulse_radius(0.0, 1.0) - 50.0).abs() < 1e-4);
    assert!((pulse_radius(1.0, 1.0) - 250.0).abs() < 1e-4);
    assert!((pulse_radius(0.5, 1.3) - 195.0).abs() < 1e-3);
}

#[test]
fn palettes_follow_mode_and_latitude() {
    let light = visual_params(&resolved_state(DayState::Day, 90.0));
    assert_eq!(light.background.hue, 45.0);
    assert!((light.background.lightness - 82.0).abs() < 1e-4);
    assert_eq!(light.pulse_color, "#fd79a8");

    let dark = visual_params(&resolved_state(DayState::Night, -90.0));
    assert_eq!(dark.background.hue, 210.0);
    assert!((dark.background.lightness - 30.0).abs() < 1e-4);
    assert_eq!(dark.pulse_color, "#74b9ff");

    // unresolved sessions render with the dark palette
    let pending = visual_params(&InteractionState::default());
    assert_eq!(pending.background.hue, 210.0);
}

#[test]
fn hsl_formats_as_css() {
    let css = background(Mode::Light, 0.0).css();
    assert_eq!(css, "hsl(45, 80%, 77.0%)");
}
