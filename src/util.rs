pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// Average guarded against an empty accumulator. An entity only exists after at
// least one match, so the zero branch is belt-and-braces.
pub fn average2(sum: f64, count: u32) -> f64 {
    if count == 0 {
        return 0.0;
    }

    round2(sum / count as f64)
}
