// 💰 Rupiah Codec - Indonesian currency parsing and formatting
//
// Sheet values look like "Rp 1.234.567,89" (period = thousands, comma = decimal),
// but hand-typed cells also show up as "1234,5" or "1500.75".

use serde_json::Value;

/// Currency symbol placed before every formatted amount
pub const CURRENCY_SYMBOL: &str = "Rp";

// ============================================================================
// PARSING
// ============================================================================

/// Parse a Rupiah string into a number. Never fails: garbage reads as 0.
///
/// Disambiguation order (both-present MUST be checked first):
/// 1. "." and "," present → "." is thousands (removed), first "," becomes the decimal point
/// 2. only "," present    → first "," becomes the decimal point
/// 3. otherwise           → parsed as-is
///
/// Known limitation: a period-only value is always read as a decimal point,
/// so "1.234" is 1.234, not 1234. Sheets that depend on this keep working.
pub fn parse_rupiah(input: &str) -> f64 {
    let mut cleaned: String = input
        .chars()
        .filter(|c| *c != 'R' && *c != 'p' && !c.is_whitespace())
        .collect();

    let has_comma = cleaned.contains(',');
    let has_period = cleaned.contains('.');

    if has_comma && has_period {
        cleaned = cleaned.replace('.', "").replacen(',', ".", 1);
    } else if has_comma {
        cleaned = cleaned.replacen(',', ".", 1);
    }

    leading_float(&cleaned)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse an already-typed cell: numbers pass through, strings go through
/// [`parse_rupiah`], everything else is 0.
pub fn parse_amount(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(s) => parse_rupiah(s),
        _ => 0.0,
    }
}

/// Read the longest numeric prefix: `[+-]digits[.digits][e[+-]digits]`
///
/// "12abc" → 12, "1.2.3" → 1.2, "abc" → None
fn leading_float(s: &str) -> Option<f64> {
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
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when followed by at least one digit
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
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

    s[..end].parse::<f64>().ok()
}

/// Integer prefix parse for day counts: "30 hari" → 30, "abc" → 0
pub fn parse_int_prefix(input: &str) -> i64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return 0;
    }

    // Only digits remain, so a parse failure is overflow: saturate
    let negative = bytes[0] == b'-';
    s[..end]
        .parse::<i64>()
        .unwrap_or(if negative { i64::MIN } else { i64::MAX })
}

// ============================================================================
// FORMATTING
// ============================================================================

/// Full Rupiah format: "Rp 1.234.567", "Rp 500,00", "- Rp 500,00"
///
/// Amounts of 1000 and above drop their fraction (floored); smaller ones keep two
/// decimals, rounded half-up. NaN and both infinities render as "Rp 0" so a broken
/// cell never shows "Infinity" on a card.
pub fn format_rupiah(num: f64) -> String {
    if !num.is_finite() {
        return format!("{} 0", CURRENCY_SYMBOL);
    }

    let abs = num.abs();
    let formatted = if abs >= 1000.0 {
        format!("{}", abs.floor())
    } else {
        to_fixed(abs, 2)
    };

    let (integer, decimal) = match formatted.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (formatted.as_str(), None),
    };

    let sign = if num < 0.0 { "- " } else { "" };
    let mut out = format!("{}{} {}", sign, CURRENCY_SYMBOL, group_thousands(integer));
    if let Some(d) = decimal.filter(|d| !d.is_empty()) {
        out.push(',');
        out.push_str(d);
    }
    out
}

/// Short format for chart axes and cards: "Rp 2.5B", "Rp 1.2M", "Rp 3.4K"
///
/// Thresholds compare the signed value; negatives fall through to [`format_rupiah`].
pub fn format_short_rupiah(num: f64) -> String {
    const SCALES: [(f64, &str); 3] = [(1e9, "B"), (1e6, "M"), (1e3, "K")];

    for (divisor, suffix) in SCALES {
        if num >= divisor {
            return format!("{} {}{}", CURRENCY_SYMBOL, to_fixed(num / divisor, 1), suffix);
        }
    }

    format_rupiah(num)
}

/// Fixed-point text with exact halves rounded away from zero ("1.25" → "1.3")
///
/// `{:.N}` alone rounds exact halves to even, which turns Rp 1.250.000 into "1.2M".
/// Ties are detected on the exact binary value, so 1.005 (really 1.00499...)
/// still rounds down.
pub fn to_fixed(value: f64, digits: usize) -> String {
    const GUARD: usize = 40;

    let magnitude = value.abs();
    let wide = format!("{:.*}", digits + GUARD, magnitude);
    let (head, tail) = wide.split_at(wide.len() - GUARD);
    let is_tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');

    let text = if is_tie {
        increment_last_digit(head.trim_end_matches('.'))
    } else {
        format!("{:.*}", digits, magnitude)
    };

    if value < 0.0 {
        format!("-{}", text)
    } else {
        text
    }
}

/// "1.29" → "1.30", "9.99" → "10.00"
fn increment_last_digit(digits: &str) -> String {
    let mut chars: Vec<char> = digits.chars().collect();

    for i in (0..chars.len()).rev() {
        match chars[i] {
            '.' => continue,
            '9' => chars[i] = '0',
            d => {
                chars[i] = char::from(d as u8 + 1);
                return chars.into_iter().collect();
            }
        }
    }

    std::iter::once('1').chain(chars).collect()
}

/// Insert "." every three digits from the right
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_indonesian_format() {
        assert_eq!(parse_rupiah("Rp 1.234.567,89"), 1234567.89);
        assert_eq!(parse_rupiah("Rp1.000.000,00"), 1000000.0);
    }

    #[test]
    fn test_parse_comma_only_is_decimal() {
        assert_eq!(parse_rupiah("1234,5"), 1234.5);
        assert_eq!(parse_rupiah("Rp 0,75"), 0.75);
    }

    #[test]
    fn test_parse_period_only_is_decimal() {
        // documented ambiguity: never read as a thousands separator
        assert_eq!(parse_rupiah("1.234"), 1.234);
        assert_eq!(parse_rupiah("Rp 1500.75"), 1500.75);
    }

    #[test]
    fn test_parse_only_first_comma_converted() {
        assert_eq!(parse_rupiah("1,234,5"), 1.234);
    }

    #[test]
    fn test_parse_garbage_is_zero() {
        assert_eq!(parse_rupiah(""), 0.0);
        assert_eq!(parse_rupiah("Rp"), 0.0);
        assert_eq!(parse_rupiah("abc"), 0.0);
        assert_eq!(parse_rupiah("-"), 0.0);
        assert_eq!(parse_rupiah("Infinity"), 0.0);
    }

    #[test]
    fn test_parse_numeric_prefix() {
        assert_eq!(parse_rupiah("12abc"), 12.0);
        assert_eq!(parse_rupiah("-Rp 5.000,5"), -5000.5);
        assert_eq!(parse_rupiah("1e3"), 1000.0);
        assert_eq!(parse_rupiah("2e"), 2.0);
    }

    #[test]
    fn test_parse_amount_by_json_type() {
        assert_eq!(parse_amount(&json!(42.5)), 42.5);
        assert_eq!(parse_amount(&json!("Rp 2.500,00")), 2500.0);
        assert_eq!(parse_amount(&json!(null)), 0.0);
        assert_eq!(parse_amount(&json!(true)), 0.0);
        assert_eq!(parse_amount(&json!(["1"])), 0.0);
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("30"), 30);
        assert_eq!(parse_int_prefix(" 45 hari"), 45);
        assert_eq!(parse_int_prefix("1.234"), 1);
        assert_eq!(parse_int_prefix("-7"), -7);
        assert_eq!(parse_int_prefix("hari"), 0);
        assert_eq!(parse_int_prefix(""), 0);
    }

    #[test]
    fn test_parse_int_prefix_saturates_on_overflow() {
        assert_eq!(parse_int_prefix("99999999999999999999 hari"), i64::MAX);
        assert_eq!(parse_int_prefix("-99999999999999999999"), i64::MIN);
    }

    #[test]
    fn test_format_large_amount_no_decimals() {
        assert_eq!(format_rupiah(1234567.0), "Rp 1.234.567");
        assert_eq!(format_rupiah(1234567.89), "Rp 1.234.567");
        assert_eq!(format_rupiah(1000.0), "Rp 1.000");
    }

    #[test]
    fn test_format_small_amount_two_decimals() {
        assert_eq!(format_rupiah(500.0), "Rp 500,00");
        assert_eq!(format_rupiah(0.5), "Rp 0,50");
        assert_eq!(format_rupiah(0.0), "Rp 0,00");
    }

    #[test]
    fn test_format_negative_has_sign_marker() {
        assert_eq!(format_rupiah(-500.0), "- Rp 500,00");
        assert_eq!(format_rupiah(-2500000.0), "- Rp 2.500.000");
    }

    #[test]
    fn test_format_non_finite() {
        assert_eq!(format_rupiah(f64::NAN), "Rp 0");
        assert_eq!(format_rupiah(f64::INFINITY), "Rp 0");
    }

    #[test]
    fn test_format_short() {
        assert_eq!(format_short_rupiah(2_500_000_000.0), "Rp 2.5B");
        assert_eq!(format_short_rupiah(1_240_000.0), "Rp 1.2M");
        assert_eq!(format_short_rupiah(3_400.0), "Rp 3.4K");
        assert_eq!(format_short_rupiah(500.0), format_rupiah(500.0));
        assert_eq!(format_short_rupiah(-5_000_000.0), "- Rp 5.000.000");
    }

    #[test]
    fn test_exact_halves_round_up() {
        assert_eq!(format_short_rupiah(1_250_000.0), "Rp 1.3M");
        assert_eq!(format_short_rupiah(2_250.0), "Rp 2.3K");
        assert_eq!(format_short_rupiah(2_750_000_000.0), "Rp 2.8B");
        assert_eq!(format_rupiah(0.125), "Rp 0,13");
        assert_eq!(format_rupiah(-0.125), "- Rp 0,13");
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(1.25, 1), "1.3");
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(9.95, 1), "9.9"); // 9.95 is really 9.949999...
        assert_eq!(to_fixed(9.75, 1), "9.8");
        assert_eq!(to_fixed(99.5, 0), "100");
        assert_eq!(to_fixed(999.995, 2), "1000.00"); // just above the half in binary
        assert_eq!(to_fixed(1.24, 1), "1.2");
        assert_eq!(to_fixed(-1.25, 1), "-1.3");
        assert_eq!(to_fixed(500.0, 2), "500.00");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1.234");
        assert_eq!(group_thousands("123456789"), "123.456.789");
    }
}
