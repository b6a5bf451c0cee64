//! Lenient attribute value parsing
//!
//! SAT documents in the wild carry stray whitespace, thousands separators and the
//! occasional empty attribute. None of that should reject a receipt.

/// Parse a monetary or count attribute.
///
/// Reads the longest leading decimal literal and ignores the rest. Empty,
/// unparsable or non-finite input yields `0.0`.
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let end = numeric_prefix_len(trimmed);
    if end == 0 {
        return 0.0;
    }

    trimmed[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Keep only the calendar date of an ISO timestamp (`2024-01-15T10:00:00` -> `2024-01-15`)
pub fn normalize_date(raw: &str) -> String {
    raw.split('T').next().unwrap_or_default().to_string()
}

/// Length in bytes of the decimal literal at the start of `s`, or 0 if there is none
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - frac_start;
        // a lone "." only counts when digits surround it
        if digits > 0 {
            i = j;
        }
    }

    if digits == 0 {
        return 0;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    i
}
