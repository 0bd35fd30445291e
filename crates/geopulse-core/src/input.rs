use glam::Vec2;

/// Normalize a client-space pointer position against an element rectangle.
///
/// Returns `None` for a degenerate rectangle so callers keep the last pointer.
#[inline]
pub fn pointer_fraction(client: Vec2, rect_origin: Vec2, rect_size: Vec2) -> Option<Vec2> {
    if !(rect_size.x > 0.0 && rect_size.y > 0.0) {
        return None;
    }
    let uv = (client - rect_origin) / rect_size;
    uv.is_finite().then(|| uv.clamp(Vec2::ZERO, Vec2::ONE))
}
