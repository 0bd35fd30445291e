/// Web frontend tuning constants: scheduler pacing, voice envelopes, reverb
/// and HUD layout. Musical mappings live in `geopulse_core::constants`.
// Scheduler wake-up period; must stay well under the clock's look-ahead
pub const SCHEDULER_INTERVAL_MS: i32 = 25;

// Lead envelope (seconds, sustain as fraction of velocity)
pub const LEAD_ATTACK_SEC: f64 = 0.01;
pub const LEAD_DECAY_SEC: f64 = 0.2;
pub const LEAD_SUSTAIN: f32 = 0.2;
pub const LEAD_RELEASE_SEC: f64 = 0.3;

// Kick: pitch-swept sine
pub const KICK_BASE_MIDI: f32 = 36.0; // C2
pub const KICK_PITCH_OCTAVES: f32 = 2.0; // sweep start above the base
pub const KICK_PITCH_DECAY_SEC: f64 = 0.06;
pub const KICK_DECAY_SEC: f64 = 0.45;
pub const KICK_LEVEL: f32 = 0.9;
pub const KICK_FLOOR: f32 = 0.001; // exponential ramps cannot reach 0

// Pad: slow-attack chord tones
pub const PAD_ATTACK_SEC: f64 = 1.5;
pub const PAD_RELEASE_TAU_SEC: f64 = 0.8;
pub const PAD_TAIL_TAUS: f64 = 6.0; // oscillators stop after this many release constants
pub const PAD_TONE_LEVEL: f32 = 0.15;

// Shared reverb send
pub const REVERB_SECONDS: f32 = 2.5;
pub const REVERB_DECAY_TAU_SEC: f32 = 0.8;
pub const REVERB_SEND: f32 = 0.35;
pub const REVERB_WET: f32 = 0.5;

// HUD box (CSS pixels, top-right corner)
pub const HUD_WIDTH: f64 = 236.0;
pub const HUD_MARGIN: f64 = 12.0;
pub const HUD_PADDING: f64 = 10.0;
pub const HUD_LINE_HEIGHT: f64 = 18.0;
pub const HUD_FONT: &str = "13px monospace";
pub const HUD_BACKGROUND: &str = "rgba(0,0,0,0.45)";
pub const HUD_TEXT: &str = "#fff";
