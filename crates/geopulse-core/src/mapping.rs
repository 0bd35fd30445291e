//! Pure mappings from an interaction snapshot to audio and visual parameters.
//!
//! Nothing here mutates state. The only stochastic input is the RNG passed to
//! [`lead_step`], so callers can seed it for deterministic tests.

use crate::constants::*;
use crate::state::{InteractionState, Mode};
use rand::Rng;

/// Oscillator shape used by the lead voice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

/// Everything the lead voice needs for one eighth-note step.
///
/// `detune_cents` and `waveform` apply even when `trigger` is false.
#[derive(Clone, Debug, PartialEq)]
pub struct LeadStep {
    pub midi: i32,
    pub frequency_hz: f32,
    pub detune_cents: f32,
    pub waveform: Waveform,
    pub trigger: bool,
    pub velocity: f32,
    pub duration_sec: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Hsl {
    pub fn css(&self) -> String {
        format!(
            "hsl({:.0}, {:.0}%, {:.1}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualParams {
    pub background: Hsl,
    pub pulse_color: &'static str,
    pub radius: f32,
}

pub fn midi_to_hz(midi: f32) -> f32 {
    440.0 * (2.0_f32).powf((midi - 69.0) / 12.0)
}

pub fn scale_for(mode: Mode) -> &'static [i32; 5] {
    match mode {
        Mode::Light => &LIGHT_SCALE,
        Mode::Dark => &DARK_SCALE,
    }
}

#[inline]
pub fn note_index(fx: f32) -> usize {
    let last = LIGHT_SCALE.len() - 1;
    let idx = (fx * LIGHT_SCALE.len() as f32).floor();
    if idx.is_nan() || idx < 0.0 {
        0
    } else {
        (idx as usize).min(last)
    }
}

#[inline]
pub fn density(fy: f32) -> f32 {
    DENSITY_MIN + fy * DENSITY_SPAN
}

#[inline]
pub fn detune_cents(fx: f32) -> f32 {
    (fx - 0.5) * DETUNE_SPAN_CENTS
}

pub fn lead_waveform(mode: Mode) -> Waveform {
    match mode {
        Mode::Light => Waveform::Triangle,
        Mode::Dark => Waveform::Sine,
    }
}

/// Evaluate the lead for one step, consuming exactly one uniform draw.
pub fn lead_step<R: Rng>(
    state: &InteractionState,
    rng: &mut R,
    duration_sec: f32,
) -> LeadStep {
    let mode = state.mode();
    let midi = scale_for(mode)[note_index(state.fx())];
    let draw: f32 = rng.gen();
    LeadStep {
        midi,
        frequency_hz: midi_to_hz(midi as f32),
        detune_cents: detune_cents(state.fx()),
        waveform: lead_waveform(mode),
        trigger: draw < density(state.fy()),
        velocity: LEAD_VELOCITY,
        duration_sec,
    }
}

pub fn pad_progression(mode: Mode) -> &'static [[i32; 3]] {
    match mode {
        Mode::Light => &LIGHT_PROGRESSION,
        Mode::Dark => &DARK_PROGRESSION,
    }
}

pub fn pad_chord(mode: Mode, index: usize) -> [i32; 3] {
    let progression = pad_progression(mode);
    progression[index % progression.len()]
}

pub fn pulse_radius(fx: f32, pulse_energy: f32) -> f32 {
    (PULSE_BASE_RADIUS + fx * PULSE_RADIUS_SPAN) * pulse_energy
}

pub fn background(mode: Mode, lat: f64) -> Hsl {
    let lat_norm = ((lat.clamp(-90.0, 90.0) + 90.0) / 180.0) as f32;
    match mode {
        Mode::Light => Hsl {
            hue: LIGHT_HUE,
            saturation: PALETTE_SATURATION,
            lightness: LIGHT_LIGHTNESS_BASE + lat_norm * LIGHTNESS_LAT_SPAN,
        },
        Mode::Dark => Hsl {
            hue: DARK_HUE,
            saturation: PALETTE_SATURATION,
            lightness: DARK_LIGHTNESS_BASE + (1.0 - lat_norm) * LIGHTNESS_LAT_SPAN,
        },
    }
}

pub fn visual_params(state: &InteractionState) -> VisualParams {
    let mode = state.mode();
    VisualParams {
        background: background(mode, state.coords().lat),
        pulse_color: match mode {
            Mode::Light => LIGHT_PULSE_COLOR,
            Mode::Dark => DARK_PULSE_COLOR,
        },
        radius: pulse_radius(state.fx(), state.pulse_energy),
    }
}
