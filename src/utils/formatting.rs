//! Formatting utilities used for CLI and export outputs.

/// Day amounts as shown in tables: `3.5d`, `0d`.
pub fn days2readable(days: f64) -> String {
    if days.fract().abs() < f64::EPSILON {
        format!("{:.0}d", days)
    } else {
        format!("{:.1}d", days)
    }
}

/// Cut `s` to `width` characters, marking the cut with `…`.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
