use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Rounds a non-negative average to the nearest whole minute, halves rounding up.
pub fn round_minutes(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    (value + 0.5).floor().min(u32::MAX as f64) as u32
}

/// Coerces a wait-time cell to minutes. Anything that is not a finite,
/// non-negative number becomes 0.
pub fn coerce_wait(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Boolean-like availability: the case-insensitive literal `true` or the
/// numeral 1. Everything else is unavailable.
pub fn is_available(raw: &str) -> bool {
    let raw = raw.trim();
    raw.eq_ignore_ascii_case("true") || raw.parse::<f64>().is_ok_and(|v| v == 1.0)
}

/// Sort key for ride names: decomposed, combining marks removed, lowercased.
pub fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
