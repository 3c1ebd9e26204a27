use chrono::{DateTime, Utc};
use unicode_width::UnicodeWidthChar;

/// Clamp `text` to a single line of at most `max_width` terminal columns.
///
/// Only the first line is kept; overflow is cut and marked with `…`.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    let width: usize = first_line.chars().filter_map(UnicodeWidthChar::width).sum();
    if width <= max_width && first_line.len() == text.len() {
        return first_line.to_owned();
    }
    if width <= max_width {
        return format!("{first_line}\u{2026}");
    }

    let budget = max_width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for c in first_line.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('\u{2026}');
    out
}

/// Avatar stand-in: up to two uppercase initials of a display name.
pub fn initials(name: &str) -> String {
    let mut words = name.split_whitespace();
    let first = words.next().and_then(|w| w.chars().next());
    let last = words.last().and_then(|w| w.chars().next());
    [first, last]
        .into_iter()
        .flatten()
        .flat_map(char::to_uppercase)
        .collect()
}

/// Format a datetime according to the configured date format.
///
/// `"relative"` (or empty) gives `"2h"`, `"3d"`, `"1w"`; anything else is a
/// `strftime` pattern.
pub fn format_date(dt: &DateTime<Utc>, date_format: &str) -> String {
    if date_format.is_empty() || date_format == "relative" {
        format_relative_time(dt)
    } else {
        dt.format(date_format).to_string()
    }
}

fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(dt);

    let minutes = duration.num_minutes();
    if minutes < 1 {
        return "now".to_owned();
    }
    if minutes < 60 {
        return format!("{minutes}m");
    }

    let hours = duration.num_hours();
    if hours < 24 {
        return format!("{hours}h");
    }

    let days = duration.num_days();
    if days < 7 {
        return format!("{days}d");
    }
    if days < 30 {
        return format!("{}w", days / 7);
    }
    if days < 365 {
        return format!("{}mo", days / 30);
    }

    format!("{}y", days / 365)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_untouched() {
        assert_eq!(truncate_to_width("Ann", 10), "Ann");
    }

    #[test]
    fn long_name_gets_ellipsis() {
        assert_eq!(truncate_to_width("Bartholomew", 6), "Barth\u{2026}");
    }

    #[test]
    fn wide_chars_count_double() {
        // Each CJK char is two columns wide.
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本\u{2026}");
    }

    #[test]
    fn second_line_is_clamped() {
        assert_eq!(truncate_to_width("one\ntwo", 20), "one\u{2026}");
    }

    #[test]
    fn initials_of_names() {
        assert_eq!(initials("ann lee"), "AL");
        assert_eq!(initials("Ann"), "A");
        assert_eq!(initials("Mary Ann Smith"), "MS");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn strftime_format() {
        let dt = DateTime::from_timestamp(0, 0).unwrap();
        assert_eq!(format_date(&dt, "%Y-%m-%d"), "1970-01-01");
    }
}
