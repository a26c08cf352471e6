use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Short month names, indexed by zero-based month. Fixed so labels do not
/// depend on the runtime locale.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn month_abbreviation(month0: u32) -> &'static str {
    MONTH_ABBREVIATIONS[(month0 % 12) as usize]
}

/// "Mar 2025" style label for the month containing `date`.
pub fn month_label(date: NaiveDate) -> String {
    format!("{} {:04}", month_abbreviation(date.month0()), date.year())
}

/// year * 100 + zero-based month. The year dominates, so keys order
/// chronologically across year boundaries.
pub fn month_sort_key(date: NaiveDate) -> i32 {
    date.year() * 100 + date.month0() as i32
}

/// Splits a bucket label into its month and year parts for two-line axis labels.
pub fn split_month_label(label: &str) -> (&str, &str) {
    match label.split_once(' ') {
        Some((month, year)) => (month, year),
        None => (label, ""),
    }
}

/// Text of a loosely-typed field. Null and empty strings count as absent.
pub fn present_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Integer value of a loosely-typed field, reading the leading integer of
/// text values ("5", " 11 ", "7abc" all parse; "abc" does not).
pub fn value_as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

/// Floating value of a loosely-typed field, reading the leading decimal
/// number of text values ("399.0000", "399.00 ZAR").
pub fn value_as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_leading_float(s),
        _ => None,
    }
}

pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['+', '-']));
    let end = trimmed[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed.len(), |i| i + sign_len);

    if end == sign_len {
        return None;
    }
    trimmed[..end].parse().ok()
}

pub fn parse_leading_float(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    trimmed[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Parses an ISO-like date or timestamp into the calendar date it names.
///
/// The first space is replaced with `T` so "2025-03-01 10:15:00" is read like
/// "2025-03-01T10:15:00". Timestamps with an offset keep the date as written
/// in that offset.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.trim().replacen(' ', "T", 1);

    if let Ok(date) = NaiveDate::parse_from_str(&cleaned, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&cleaned) {
        return Some(dt.date_naive());
    }

    if let Ok(dt) = DateTime::parse_from_str(&cleaned, "%Y-%m-%dT%H:%M:%S%.f%#z") {
        return Some(dt.date_naive());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&cleaned, fmt).ok())
        .map(|dt| dt.date())
}
