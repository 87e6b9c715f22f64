/// Converts an hour-of-day (0–23) into a compact 12-hour clock label.
///
/// | Hour    | Label      |
/// |---------|------------|
/// | 0       | 12a        |
/// | 1–11    | 1a … 11a   |
/// | 12      | 12p        |
/// | 13–23   | 1p … 11p   |
pub fn hour_label(hour: u32) -> String {
    match hour {
        0 => "12a".into(),
        h if h < 12 => format!("{h}a"),
        12 => "12p".into(),
        h => format!("{}p", h % 12),
    }
}
