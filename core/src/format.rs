//! Display formatting. Pure functions only.

use chrono::{DateTime, Local, NaiveDateTime};

use crate::models::SegmentType;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses backend timestamps as local wall-clock time.
///
/// Zoned RFC 3339 values are converted to the local zone; naive values are
/// taken as already local.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
        return Some(zoned.with_timezone(&Local).naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

pub fn format_clock(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds < 60 {
        return format!("{} s", seconds);
    }
    let minutes = (seconds + 30) / 60;
    if minutes < 60 {
        format!("{} min", minutes)
    } else {
        format!("{} h {:02}", minutes / 60, minutes % 60)
    }
}

pub fn mode_label(mode: SegmentType) -> &'static str {
    match mode {
        SegmentType::Walking => "Walk",
        SegmentType::Transfer => "Transfer",
        SegmentType::Waiting => "Wait",
        SegmentType::Metro => "Metro",
        SegmentType::Bus => "Bus",
        SegmentType::Tram => "Tram",
        SegmentType::Rer => "RER",
        SegmentType::Train => "Train",
        SegmentType::Other => "Transit",
    }
}

pub fn mode_icon(mode: SegmentType) -> &'static str {
    match mode {
        SegmentType::Walking => "\u{1F6B6}",
        SegmentType::Transfer => "\u{1F501}",
        SegmentType::Waiting => "\u{23F3}",
        SegmentType::Metro => "\u{1F687}",
        SegmentType::Bus => "\u{1F68C}",
        SegmentType::Tram => "\u{1F68B}",
        SegmentType::Rer | SegmentType::Train => "\u{1F686}",
        SegmentType::Other => "\u{1F68F}",
    }
}

fn parse_hex_color(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Black or white text, whichever reads better on a line's brand colour.
pub fn contrast_text_color(background: &str) -> &'static str {
    let Some((r, g, b)) = parse_hex_color(background) else {
        return "#FFFFFF";
    };
    let linear = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    let luminance = 0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b);
    if luminance > 0.179 {
        "#000000"
    } else {
        "#FFFFFF"
    }
}

pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().find(|c| c.is_alphanumeric()))
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}

pub fn format_co2(kg: f64) -> String {
    if !kg.is_finite() || kg <= 0.0 {
        return "0 g".to_string();
    }
    if kg < 1.0 {
        format!("{:.0} g", kg * 1000.0)
    } else {
        format!("{:.1} kg", kg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_naive_and_partial_timestamps() {
        let t = parse_timestamp("2025-03-01T08:05").unwrap();
        assert_eq!(t.format("%H:%M").to_string(), "08:05");
        assert!(parse_timestamp("2025-03-01T08:05:09.123").is_some());
        assert!(parse_timestamp("2025-03-01 08:05:09").is_some());
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_parse_zoned_timestamp() {
        assert!(parse_timestamp("2025-03-01T08:05:00Z").is_some());
        assert!(parse_timestamp("2025-03-01T08:05:00+01:00").is_some());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(Some("2025-03-01T17:45:00")), "17:45");
        assert_eq!(format_clock(Some("garbage")), "--:--");
        assert_eq!(format_clock(None), "--:--");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(-5), "0 s");
        assert_eq!(format_duration(45), "45 s");
        assert_eq!(format_duration(720), "12 min");
        assert_eq!(format_duration(3900), "1 h 05");
    }

    #[test]
    fn test_contrast_text_color() {
        assert_eq!(contrast_text_color("#FFCD00"), "#000000");
        assert_eq!(contrast_text_color("003CA6"), "#FFFFFF");
        assert_eq!(contrast_text_color("#fff"), "#000000");
        assert_eq!(contrast_text_color("blue-ish"), "#FFFFFF");
        assert_eq!(contrast_text_color("ab\u{20AC}d"), "#FFFFFF");
        assert_eq!(contrast_text_color("#\u{20AC}\u{20AC}"), "#FFFFFF");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("ada lovelace byron"), "AL");
        assert_eq!(initials("Zoé"), "Z");
        assert_eq!(initials("   "), "?");
    }

    #[test]
    fn test_format_co2() {
        assert_eq!(format_co2(0.25), "250 g");
        assert_eq!(format_co2(12.34), "12.3 kg");
        assert_eq!(format_co2(f64::NAN), "0 g");
    }
}
