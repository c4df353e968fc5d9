/// Wrap a track distance into [0, total).
pub fn wrap_distance(distance: f64, total: f64) -> f64 {
    distance.rem_euclid(total)
}

/// Forward distance from `from` to `to` along the lap direction, in [0, total).
pub fn forward_gap(from: f64, to: f64, total: f64) -> f64 {
    (to - from).rem_euclid(total)
}

/// Clamp a percentage quantity to [0, 100].
pub fn clamp_pct(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// True when `distance` lies in the modular interval [start, end) of a lap.
pub fn in_span(distance: f64, start: f64, end: f64, total: f64) -> bool {
    forward_gap(start, distance, total) < forward_gap(start, end, total)
}
