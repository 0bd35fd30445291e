//! Text for the heads-up overlay. Display-only.

use crate::state::{DayState, InteractionState};

/// Shown while day/night is still being resolved.
pub const UNKNOWN_GLYPH: &str = "?";

pub const LEGEND: &str = "drag: x = pitch, y = density";

pub fn day_label(day: DayState) -> &'static str {
    match day {
        DayState::Unknown => UNKNOWN_GLYPH,
        DayState::Day => "day",
        DayState::Night => "night",
    }
}

pub fn hud_lines(state: &InteractionState) -> [String; 5] {
    let coords = state.coords();
    [
        format!("Mode: {}", state.mode()),
        format!("Sky: {}", day_label(state.day())),
        format!("BPM (lon): {}", state.bpm()),
        format!("Lat: {:.2}  Lon: {:.2}", coords.lat, coords.lon),
        LEGEND.to_string(),
    ]
}
