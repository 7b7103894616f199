// Parsing and formatting helpers shared across the pipeline. Everything
// string-shaped from the CSV funnels through here so the typed modules never
// see raw cell text.
use num_format::{Locale, ToFormattedString};

/// Lenient numeric parse for CSV cells: trims, strips `","` thousands
/// separators, and refuses anything containing letters. Returns `None` for
/// missing, empty, or unparseable values.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() || s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    s.replace(',', "").parse::<f64>().ok()
}

/// Integer counterpart of `parse_f64_safe`. Fractional text is rejected, not
/// truncated.
pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

/// Arithmetic mean; 0 for an empty slice so callers never see NaN.
pub fn average(v: &[f64]) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    v.iter().sum::<f64>() / v.len() as f64
}

/// Fixed-decimal rendering with locale thousands separators, e.g.
/// `1,234,567.89`.
pub fn format_number(n: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, n.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let mut out = int_part
        .parse::<i64>()
        .unwrap_or(0)
        .to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    if n.is_sign_negative() {
        out.insert(0, '-');
    }
    out
}

/// Separator formatting for counts in console messages (`9,855 rows loaded`).
pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
