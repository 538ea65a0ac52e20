// extensions/easing.rs
//
// Easing for presentational transitions. Pure math on normalized time.

/// Fast start, slow end. `t` is clamped to [0, 1].
#[inline]
pub fn quad_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Opacity envelope over a normalized lifetime: ramps in over the first
/// `fade_in`, holds, and ramps out over the last `fade_out`.
pub fn fade_envelope(t: f32, fade_in: f32, fade_out: f32) -> f32 {
    if !(0.0..=1.0).contains(&t) {
        return 0.0;
    }
    let rise = if fade_in > 0.0 { (t / fade_in).min(1.0) } else { 1.0 };
    let fall = if fade_out > 0.0 { ((1.0 - t) / fade_out).min(1.0) } else { 1.0 };
    rise.min(fall)
}
