//! Interaction state shared by the scheduler, the renderer and event handlers.
//!
//! The web frontend keeps one `InteractionState` per session behind an
//! `Rc<RefCell<_>>` and passes it by reference into each component's update
//! function. Fields with invariants are private and only change through the
//! methods below.

use crate::constants::DEFAULT_BPM;
use crate::geo::Resolution;
use crate::pulse::{self, PULSE_REST, PULSE_SMOOTHING, PULSE_SPIKE};
use glam::Vec2;
use std::fmt;

/// Binary ambient mode governing palette, scale and lead timbre.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Light,
    Dark,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Light => f.write_str("light"),
            Mode::Dark => f.write_str("dark"),
        }
    }
}

/// Tri-state day/night flag; `Unknown` until geo resolution completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DayState {
    #[default]
    Unknown,
    Day,
    Night,
}

impl DayState {
    pub fn from_is_day(is_day: bool) -> Self {
        if is_day {
            DayState::Day
        } else {
            DayState::Night
        }
    }

    /// `Light` only for a known day; `Unknown` keeps the unlit palette.
    pub fn mode(self) -> Mode {
        match self {
            DayState::Day => Mode::Light,
            DayState::Night | DayState::Unknown => Mode::Dark,
        }
    }
}

/// Geographic position in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeoCoords {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoords {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Mixer channel addressed by a volume slider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MixerChannel {
    Master,
    Lead,
    Pad,
    Kick,
}

impl MixerChannel {
    pub const ALL: [MixerChannel; 4] = [
        MixerChannel::Master,
        MixerChannel::Lead,
        MixerChannel::Pad,
        MixerChannel::Kick,
    ];

    /// DOM id of the slider controlling this channel.
    pub fn element_id(self) -> &'static str {
        match self {
            MixerChannel::Master => "vol-master",
            MixerChannel::Lead => "vol-lead",
            MixerChannel::Pad => "vol-pad",
            MixerChannel::Kick => "vol-kick",
        }
    }
}

/// Per-channel gains in \[0, 1\].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MixerGains {
    pub master: f32,
    pub lead: f32,
    pub pad: f32,
    pub kick: f32,
}

impl Default for MixerGains {
    fn default() -> Self {
        Self {
            master: 0.8,
            lead: 0.7,
            pad: 0.5,
            kick: 0.8,
        }
    }
}

impl MixerGains {
    pub fn get(&self, channel: MixerChannel) -> f32 {
        match channel {
            MixerChannel::Master => self.master,
            MixerChannel::Lead => self.lead,
            MixerChannel::Pad => self.pad,
            MixerChannel::Kick => self.kick,
        }
    }

    /// Direct pass-through; returns the stored (clamped) value.
    pub fn set(&mut self, channel: MixerChannel, value: f32) -> f32 {
        let v = if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            self.get(channel)
        };
        match channel {
            MixerChannel::Master => self.master = v,
            MixerChannel::Lead => self.lead = v,
            MixerChannel::Pad => self.pad = v,
            MixerChannel::Kick => self.kick = v,
        }
        v
    }
}

#[derive(Clone, Debug)]
pub struct InteractionState {
    pointer: Vec2,
    pub dragging: bool,
    coords: GeoCoords,
    day: DayState,
    bpm: u32,
    pub pulse_energy: f32,
    pub mixer: MixerGains,
    resolved: bool,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            pointer: Vec2::new(0.5, 0.5),
            dragging: false,
            coords: GeoCoords::default(),
            day: DayState::Unknown,
            bpm: DEFAULT_BPM,
            pulse_energy: PULSE_REST,
            mixer: MixerGains::default(),
            resolved: false,
        }
    }
}

impl InteractionState {
    pub fn fx(&self) -> f32 {
        self.pointer.x
    }

    pub fn fy(&self) -> f32 {
        self.pointer.y
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Clamp each axis into \[0, 1\]; non-finite axes keep their last value.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        if x.is_finite() {
            self.pointer.x = x.clamp(0.0, 1.0);
        }
        if y.is_finite() {
            self.pointer.y = y.clamp(0.0, 1.0);
        }
    }

    pub fn begin_drag(&mut self, x: f32, y: f32) {
        self.dragging = true;
        self.set_pointer(x, y);
    }

    /// Moves the pointer only while a drag is active.
    pub fn drag_to(&mut self, x: f32, y: f32) -> bool {
        if self.dragging {
            self.set_pointer(x, y);
        }
        self.dragging
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn coords(&self) -> GeoCoords {
        self.coords
    }

    pub fn day(&self) -> DayState {
        self.day
    }

    pub fn mode(&self) -> Mode {
        self.day.mode()
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Publish a geo resolution. Only the first call per session is applied.
    pub fn apply_resolution(&mut self, resolution: &Resolution) -> bool {
        if self.resolved {
            log::warn!("[geo] resolution already applied; ignoring {:?}", resolution);
            return false;
        }
        self.coords = resolution.coords;
        self.day = resolution.day;
        self.bpm = resolution.bpm;
        self.resolved = true;
        true
    }

    pub fn spike_pulse(&mut self) {
        self.pulse_energy = PULSE_SPIKE;
    }

    pub fn decay_pulse(&mut self) {
        self.pulse_energy = pulse::decay_pulse(self.pulse_energy, PULSE_SMOOTHING);
    }
}
