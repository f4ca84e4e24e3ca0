use crate::models::FieldValue;

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use simreport_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a half ULP at the target precision so exact midpoints round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        // "0.50" → ".50"
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a field value for a text table: integers without decimals, floats
/// with `float_decimals` places.
///
/// ```
/// use simreport_core::formatting::format_field_value;
/// use simreport_core::models::FieldValue;
///
/// assert_eq!(format_field_value(FieldValue::Integer(12000), 4), "12,000");
/// assert_eq!(format_field_value(FieldValue::Float(0.5), 4), "0.5000");
/// ```
pub fn format_field_value(value: FieldValue, float_decimals: u32) -> String {
    match value {
        FieldValue::Integer(v) => format_number(v as f64, 0),
        FieldValue::Float(v) => format_number(v, float_decimals),
    }
}

/// Format a power figure in watts.
///
/// ```
/// use simreport_core::formatting::format_watts;
///
/// assert_eq!(format_watts(0.0123), "0.0123 W");
/// ```
pub fn format_watts(value: f64) -> String {
    format!("{} W", format_number(value, 4))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
