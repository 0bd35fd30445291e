// Host-side tests for the look-ahead musical clock.

use geopulse_core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const TICK_SEC: f64 = 0.025;

fn resolve_to(state: &mut InteractionState, bpm: u32) {
    state.apply_resolution(&Resolution {
        coords: GeoCoords::new(0.0, 0.0),
        day: DayState::Day,
        bpm,
        source: ResolutionSource::Oracle,
    });
}

/// Drive the clock like the web scheduler does, in fixed wall-clock ticks.
fn run(
    clock: &mut MusicClock,
    state: &mut InteractionState,
    rng: &mut StdRng,
    from: f64,
    seconds: f64,
) -> Vec<ScheduledEvent> {
    let mut events = Vec::new();
    let mut now = from;
    while now < from + seconds {
        clock.tick(now, state, rng, &mut events).expect("clock running");
        now += TICK_SEC;
    }
    events
}

fn lead_times(events: &[ScheduledEvent]) -> Vec<f64> {
    events
        .iter()
        .filter(|e| matches!(e.event, ClockEvent::Lead(_)))
        .map(|e| e.time_sec)
        .collect()
}

#[test]
fn default_config_is_valid() {
    let config = ClockConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.kick_every_steps, 4);
    assert_eq!(config.pad_every_steps, 32);
}

#[test]
fn invalid_configs_are_rejected() {
    let bad = [
        ClockConfig {
            lookahead_sec: 0.0,
            ..ClockConfig::default()
        },
        ClockConfig {
            kick_every_steps: 0,
            ..ClockConfig::default()
        },
        ClockConfig {
            max_lag_sec: 0.05,
            ..ClockConfig::default()
        },
    ];
    for config in bad {
        assert!(config.validate().is_err(), "{config:?} should be invalid");
    }
}

#[test]
fn tick_before_start_is_rejected() {
    let mut clock = MusicClock::new(ClockConfig::default());
    let mut state = InteractionState::default();
    let mut rng = StdRng::seed_from_u64(1);
    let mut events = Vec::new();
    let res = clock.tick(0.0, &mut state, &mut rng, &mut events);
    assert_eq!(res, Err(ClockError::NotStarted));
    assert!(events.is_empty());
    assert_eq!(state.pulse_energy, 1.0, "no kick may land before start");
}

#[test]
fn first_step_fires_kick_pad_and_lead() {
    let mut clock = MusicClock::new(ClockConfig::default());
    let mut state = InteractionState::default();
    let mut rng = StdRng::seed_from_u64(3);
    clock.start(10.0, 120);
    let mut events = Vec::new();
    let n = clock.tick(10.0, &mut state, &mut rng, &mut events).unwrap();

    assert_eq!(n, 1);
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.step == 0 && e.time_sec == 10.0));
    assert!(events.iter().any(|e| e.event == ClockEvent::Kick));
    assert!(events.iter().any(|e| matches!(
        &e.event,
        ClockEvent::Pad(PadChange { chord_index: 0, .. })
    )));
    assert_eq!(state.pulse_energy, 1.3);
}

#[test]
fn subdivisions_follow_eighth_half_and_four_bars() {
    let mut clock = MusicClock::new(ClockConfig::default());
    let mut state = InteractionState::default();
    resolve_to(&mut state, 120);
    let mut rng = StdRng::seed_from_u64(5);
    clock.start(0.0, 120);
    assert!((clock.seconds_per_step() - 0.25).abs() < 1e-12);

    // 64 eighth notes at 120 bpm = 16 s
    let events = run(&mut clock, &mut state, &mut rng, 0.0, 16.0 - 0.2);
    let leads = events
        .iter()
        .filter(|e| matches!(e.event, ClockEvent::Lead(_)))
        .count();
    let kicks: Vec<u64> = events
        .iter()
        .filter(|e| e.event == ClockEvent::Kick)
        .map(|e| e.step)
        .collect();
    let pads: Vec<&ScheduledEvent> = events
        .iter()
        .filter(|e| matches!(e.event, ClockEvent::Pad(_)))
        .collect();

    assert_eq!(leads, 64);
    assert_eq!(kicks.len(), 16);
    assert!(kicks.iter().all(|s| s % 4 == 0));
    assert_eq!(pads.len(), 2);
    assert_eq!(pads[1].step, 32);
    match &pads[1].event {
        ClockEvent::Pad(change) => {
            assert_eq!(change.chord_index, 1);
            assert_eq!(change.midi, pad_chord(Mode::Light, 1));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn steps_are_never_scheduled_in_the_past_or_beyond_lookahead() {
    let mut clock = MusicClock::new(ClockConfig::default());
    let mut state = InteractionState::default();
    let mut rng = StdRng::seed_from_u64(8);
    clock.start(0.0, 100);
    let mut now = 0.0;
    for _ in 0..400 {
        let mut events = Vec::new();
        clock.tick(now, &mut state, &mut rng, &mut events).unwrap();
        for e in &events {
            assert!(e.time_sec >= now - TICK_SEC - 1e-9);
            assert!(e.time_sec < now + clock.config().lookahead_sec);
        }
        now += TICK_SEC;
    }
}

#[test]
fn tempo_change_lands_on_next_step_boundary() {
    let mut clock = MusicClock::new(ClockConfig::default());
    let mut state = InteractionState::default();
    let mut rng = StdRng::seed_from_u64(11);
    clock.start(0.0, state.bpm());

    let before = run(&mut clock, &mut state, &mut rng, 0.0, 3.0);
    let before_times = lead_times(&before);
    for pair in before_times.windows(2) {
        assert!((pair[1] - pair[0] - 0.3).abs() < 1e-9, "100 bpm spacing");
    }

    resolve_to(&mut state, 130);
    let after = run(&mut clock, &mut state, &mut rng, 3.0, 3.0);
    let after_times = lead_times(&after);

    // the step already queued before the change keeps its slot
    let last_before = *before_times.last().unwrap();
    assert!((after_times[0] - (last_before + 0.3)).abs() < 1e-9);
    for pair in after_times.windows(2) {
        assert!((pair[1] - pair[0] - 30.0 / 130.0).abs() < 1e-9, "130 bpm spacing");
    }
    assert_eq!(clock.bpm(), 130);
}

#[test]
fn clock_resyncs_instead_of_bursting_after_a_stall() {
    let mut clock = MusicClock::new(ClockConfig::default());
    let mut state = InteractionState::default();
    let mut rng = StdRng::seed_from_u64(13);
    clock.start(0.0, 170);
    let mut events = Vec::new();
    clock.tick(0.0, &mut state, &mut rng, &mut events).unwrap();

    events.clear();
    let n = clock.tick(120.0, &mut state, &mut rng, &mut events).unwrap();
    assert!(n <= 1, "burst of {n} steps after stall");
    assert!(events.iter().all(|e| e.time_sec >= 120.0));
}

#[test]
fn lead_fires_every_step_at_full_density() {
    let mut clock = MusicClock::new(ClockConfig::default());
    let mut state = InteractionState::default();
    state.set_pointer(0.1, 1.0);
    let mut rng = StdRng::seed_from_u64(17);
    clock.start(0.0, 100);
    let events = run(&mut clock, &mut state, &mut rng, 0.0, 6.0);
    let mut leads = 0;
    for e in &events {
        if let ClockEvent::Lead(step) = &e.event {
            assert!(step.trigger);
            assert_eq!(step.midi, 48);
            assert_eq!(step.waveform, Waveform::Sine);
            leads += 1;
        }
    }
    assert!(leads >= 19);
}

#[test]
fn same_seed_same_schedule() {
    let mut a = MusicClock::new(ClockConfig::default());
    let mut b = MusicClock::new(ClockConfig::default());
    let mut sa = InteractionState::default();
    let mut sb = InteractionState::default();
    sa.set_pointer(0.4, 0.3);
    sb.set_pointer(0.4, 0.3);
    let mut ra = StdRng::seed_from_u64(21);
    let mut rb = StdRng::seed_from_u64(21);
    a.start(0.0, 140);
    b.start(0.0, 140);
    let ea = run(&mut a, &mut sa, &mut ra, 0.0, 10.0);
    let eb = run(&mut b, &mut sb, &mut rb, 0.0, 10.0);
    assert_eq!(ea, eb);
}

#[test]
fn held_pad_follows_mode_at_next_kick_after_resolution() {
    let mut clock = MusicClock::new(ClockConfig::default());
    let mut state = InteractionState::default();
    let mut rng = StdRng::seed_from_u64(23);
    clock.start(0.0, state.bpm());

    // unresolved sky plays the dark chord; 0.8 s queues steps 0..=2 at 100 bpm
    let before = run(&mut clock, &mut state, &mut rng, 0.0, 0.8);
    let first_pad = before
        .iter()
        .find_map(|e| match &e.event {
            ClockEvent::Pad(change) => Some(change.clone()),
            _ => None,
        })
        .expect("pad at step 0");
    assert_eq!(first_pad.midi, pad_chord(Mode::Dark, 0));

    resolve_to(&mut state, 100);
    let after = run(&mut clock, &mut state, &mut rng, 0.8, 3.0);
    let rekey = after
        .iter()
        .find(|e| matches!(e.event, ClockEvent::Pad(_)))
        .expect("pad re-keyed after resolution");
    assert_eq!(rekey.step % 4, 0, "re-key lands on a kick");
    assert!(rekey.step < 32, "well before the next chord change");
    assert_eq!(
        rekey.event,
        ClockEvent::Pad(PadChange {
            chord_index: 0,
            midi: pad_chord(Mode::Light, 0),
        })
    );
    let pads_after = after
        .iter()
        .filter(|e| matches!(e.event, ClockEvent::Pad(_)))
        .count();
    assert_eq!(pads_after, 1, "mode unchanged after the re-key");
}
