use crate::constants::BPM_MIN;
use crate::mapping::{self, LeadStep};
use crate::state::{InteractionState, Mode};
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("musical clock used before audio output was unlocked")]
    NotStarted,
}

/// Static scheduling configuration.
///
/// - `lookahead_sec`: how far past "now" steps are queued on the audio clock
/// - `kick_every_steps`: kick spacing in eighth notes (4 = half note)
/// - `pad_every_steps`: chord change spacing in eighth notes (32 = four 4/4 bars)
/// - `max_lag_sec`: how far behind the clock may fall before it resyncs
#[derive(Clone, Debug, PartialEq)]
pub struct ClockConfig {
    pub lookahead_sec: f64,
    pub kick_every_steps: u64,
    pub pad_every_steps: u64,
    pub max_lag_sec: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            lookahead_sec: 0.1,
            kick_every_steps: 4,
            pad_every_steps: 32,
            max_lag_sec: 1.0,
        }
    }
}

impl ClockConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.lookahead_sec.is_nan() || self.lookahead_sec <= 0.0 {
            return Err("lookahead_sec must be > 0");
        }
        if self.kick_every_steps == 0 || self.pad_every_steps == 0 {
            return Err("step intervals must be > 0");
        }
        if self.max_lag_sec <= self.lookahead_sec {
            return Err("max_lag_sec must exceed lookahead_sec");
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PadChange {
    pub chord_index: usize,
    pub midi: [i32; 3],
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClockEvent {
    Kick,
    Lead(LeadStep),
    Pad(PadChange),
}

/// An event pinned to an absolute audio-clock time.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledEvent {
    pub time_sec: f64,
    pub step: u64,
    pub event: ClockEvent,
}

/// Eighth-note scheduler that queues events slightly ahead of the audio clock.
///
/// The clock reads tempo from the shared state at each step boundary, so a
/// resolved bpm takes effect on the next step without restarting anything.
#[derive(Clone, Debug)]
pub struct MusicClock {
    config: ClockConfig,
    bpm: u32,
    running: bool,
    next_step_time: f64,
    step: u64,
    pad_index: usize,
    pad_mode: Option<Mode>,
}

impl MusicClock {
    pub fn new(config: ClockConfig) -> Self {
        Self {
            config,
            bpm: BPM_MIN,
            running: false,
            next_step_time: 0.0,
            step: 0,
            pad_index: 0,
            pad_mode: None,
        }
    }

    /// Begin scheduling from `now_sec`; only called once audio is unlocked.
    pub fn start(&mut self, now_sec: f64, bpm: u32) {
        self.bpm = bpm.max(1);
        self.running = true;
        self.next_step_time = now_sec;
        self.step = 0;
        self.pad_index = 0;
        self.pad_mode = None;
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// Eighth-note duration at the current tempo.
    pub fn seconds_per_step(&self) -> f64 {
        30.0 / self.bpm as f64
    }

    /// Queue every step due before `now_sec + lookahead`. Returns how many
    /// steps were emitted.
    pub fn tick<R: Rng>(
        &mut self,
        now_sec: f64,
        state: &mut InteractionState,
        rng: &mut R,
        out_events: &mut Vec<ScheduledEvent>,
    ) -> Result<usize, ClockError> {
        if !self.running {
            return Err(ClockError::NotStarted);
        }
        if now_sec - self.next_step_time > self.config.max_lag_sec {
            log::warn!(
                "[clock] fell {:.2}s behind; resyncing",
                now_sec - self.next_step_time
            );
            self.next_step_time = now_sec;
        }
        let horizon = now_sec + self.config.lookahead_sec;
        let mut emitted = 0;
        while self.next_step_time < horizon {
            if state.bpm() != self.bpm {
                log::info!("[clock] tempo {} -> {}", self.bpm, state.bpm());
                self.bpm = state.bpm().max(1);
            }
            let t = self.next_step_time;
            self.schedule_step(t, state, rng, out_events);
            self.next_step_time += self.seconds_per_step();
            self.step += 1;
            emitted += 1;
        }
        Ok(emitted)
    }

    fn schedule_step<R: Rng>(
        &mut self,
        time_sec: f64,
        state: &mut InteractionState,
        rng: &mut R,
        out_events: &mut Vec<ScheduledEvent>,
    ) {
        let step = self.step;
        if step % self.config.kick_every_steps == 0 {
            state.spike_pulse();
            out_events.push(ScheduledEvent {
                time_sec,
                step,
                event: ClockEvent::Kick,
            });
        }
        let mode = state.mode();
        let chord_index = if step % self.config.pad_every_steps == 0 {
            self.pad_index += 1;
            Some(self.pad_index - 1)
        } else if step % self.config.kick_every_steps == 0
            && self.pad_mode.is_some_and(|held| held != mode)
        {
            // re-key the held chord once the day state has flipped the mode
            log::info!("[clock] pad re-keyed to {mode}");
            Some(self.pad_index.saturating_sub(1))
        } else {
            None
        };
        if let Some(chord_index) = chord_index {
            self.pad_mode = Some(mode);
            out_events.push(ScheduledEvent {
                time_sec,
                step,
                event: ClockEvent::Pad(PadChange {
                    chord_index,
                    midi: mapping::pad_chord(mode, chord_index),
                }),
            });
        }
        let lead = mapping::lead_step(state, rng, self.seconds_per_step() as f32);
        out_events.push(ScheduledEvent {
            time_sec,
            step,
            event: ClockEvent::Lead(lead),
        });
    }
}
