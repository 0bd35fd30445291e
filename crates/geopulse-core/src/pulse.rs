/// Pulse energy rest value; the renderer's radius multiplier at idle.
pub const PULSE_REST: f32 = 1.0;
/// Value the kick resets pulse energy to.
pub const PULSE_SPIKE: f32 = 1.3;
/// Per-frame smoothing factor of the exponential decay.
pub const PULSE_SMOOTHING: f32 = 0.05;

/// One frame of exponential decay toward `PULSE_REST`.
///
/// Never crosses the rest value and is a no-op once there.
#[inline]
pub fn decay_pulse(energy: f32, k: f32) -> f32 {
    if !energy.is_finite() {
        return PULSE_REST;
    }
    let k = k.clamp(0.0, 1.0);
    let next = energy + (PULSE_REST - energy) * k;
    if energy >= PULSE_REST {
        next.max(PULSE_REST)
    } else {
        next.min(PULSE_REST)
    }
}
