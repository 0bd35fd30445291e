// Shared musical/visual tuning constants used by the core and the web frontend.

// Tempo mapping (longitude sweeps the full range west to east)
pub const BPM_MIN: u32 = 90;
pub const BPM_MAX: u32 = 170;
pub const DEFAULT_BPM: u32 = 100; // used until the first resolution lands

// Timezone heuristic: local daylight window [start, end)
pub const DAY_START_HOUR: u32 = 6;
pub const DAY_END_HOUR: u32 = 18;
pub const DEGREES_PER_HOUR: f64 = 15.0;

// Melodic scales as MIDI note numbers
pub const LIGHT_SCALE: [i32; 5] = [72, 74, 76, 79, 81]; // C5 D5 E5 G5 A5
pub const DARK_SCALE: [i32; 5] = [48, 51, 53, 55, 58]; // C3 Eb3 F3 G3 Bb3

// Lead mapping
pub const DENSITY_MIN: f32 = 0.2;
pub const DENSITY_SPAN: f32 = 0.8;
pub const DETUNE_SPAN_CENTS: f32 = 600.0; // full pointer sweep, centered on 0
pub const LEAD_VELOCITY: f32 = 0.8;

// Pad progressions (triads), four bars per chord
pub const LIGHT_PROGRESSION: [[i32; 3]; 4] = [
    [60, 64, 67], // C
    [57, 60, 64], // Am
    [53, 57, 60], // F
    [55, 59, 62], // G
];
pub const DARK_PROGRESSION: [[i32; 3]; 4] = [
    [48, 51, 55], // Cm
    [44, 48, 51], // Ab
    [46, 50, 53], // Bb
    [43, 46, 50], // Gm
];

// Pulse circle
pub const PULSE_BASE_RADIUS: f32 = 50.0;
pub const PULSE_RADIUS_SPAN: f32 = 200.0;

// Palettes (HSL hue/saturation in degrees/percent, CSS pulse colors)
pub const LIGHT_HUE: f32 = 45.0;
pub const DARK_HUE: f32 = 210.0;
pub const PALETTE_SATURATION: f32 = 80.0;
pub const LIGHT_LIGHTNESS_BASE: f32 = 72.0;
pub const DARK_LIGHTNESS_BASE: f32 = 20.0;
pub const LIGHTNESS_LAT_SPAN: f32 = 10.0;
pub const LIGHT_PULSE_COLOR: &str = "#fd79a8";
pub const DARK_PULSE_COLOR: &str = "#74b9ff";

// Day/night oracle
pub const DEFAULT_ORACLE_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";
