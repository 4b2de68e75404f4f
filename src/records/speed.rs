//! Lenient numeric parsing and speed-unit coercion.

/// Parses the leading decimal number of `s`, ignoring any trailing text.
///
/// `"50 Mbps"` yields `50.0`, `" -1.5e2ms"` yields `-150.0`, and text with no
/// leading digits yields `None`.
pub fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when followed by at least one digit.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses the leading integer of `s` as a sample count. Negative or
/// unparseable input counts as zero.
pub fn parse_count(s: &str) -> u64 {
    match parse_number(s) {
        Some(v) if v >= 1.0 => v.trunc() as u64,
        _ => 0,
    }
}

/// Resolves a speed in Mbps.
///
/// A positive value in the dedicated Mbps column wins. Otherwise the free-text
/// value is read with its unit: `kbps` is scaled down by 1000, `mbps` or a
/// bare number is taken as-is. Anything unparseable is `0.0`.
pub fn normalize_speed(mbps: Option<&str>, raw: Option<&str>) -> f64 {
    if let Some(v) = mbps.and_then(parse_number) {
        if v > 0.0 {
            return v;
        }
    }

    let Some(raw) = raw else {
        return 0.0;
    };

    let text = raw.trim().to_lowercase();
    if text.is_empty() {
        return 0.0;
    }

    let value = parse_number(&text).unwrap_or(0.0);
    let value = if !text.contains("mbps") && text.contains("kbps") {
        value / 1000.0
    } else {
        value
    };

    value.max(0.0)
}
