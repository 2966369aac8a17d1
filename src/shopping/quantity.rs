//! Quantity parsing and display
//!
//! Quantities arrive either as numbers or as free text from recipe providers
//! ("2", "1/2", "1 1/2 cups", "pinch"). Parsing reads the leading amount and
//! ignores whatever follows it, so "2 cups" reads as 2.

/// Decimal places kept when an amount is displayed
const DISPLAY_PRECISION: f64 = 1_000_000.0;

/// Parse the amount at the start of a quantity string
///
/// Returns None when the text does not start with a number or the number is
/// not finite.
pub fn parse_quantity(text: &str) -> Option<f64> {
    leading_amount(text).map(|(value, _)| value)
}

/// Split the leading amount off a quantity string
///
/// Returns the amount and the unparsed remainder, e.g. "1 1/2 cups" ->
/// (1.5, " cups"). The remainder is a suffix of the input.
pub fn leading_amount(text: &str) -> Option<(f64, &str)> {
    let s = text.trim_start();
    let (first, rest, is_integer) = scan_decimal(s)?;

    // Simple fraction: "1/2"
    if is_integer {
        if let Some(after_slash) = rest.strip_prefix('/') {
            if let Some((denominator, tail)) = scan_integer(after_slash) {
                if denominator != 0.0 {
                    return finite(first / denominator, tail);
                }
            }
            return finite(first, rest);
        }

        // Mixed number: "1 1/2"
        let spaced = rest.trim_start();
        if spaced.len() < rest.len() {
            if let Some((numerator, after_numerator)) = scan_integer(spaced) {
                if let Some(after_slash) = after_numerator.strip_prefix('/') {
                    if let Some((denominator, tail)) = scan_integer(after_slash) {
                        if denominator != 0.0 {
                            let fraction = numerator / denominator;
                            let value = if first < 0.0 {
                                first - fraction
                            } else {
                                first + fraction
                            };
                            return finite(value, tail);
                        }
                    }
                }
            }
        }
    }

    finite(first, rest)
}

/// Add two amounts, refusing a total that is no longer finite
pub fn add_amounts(current: f64, extra: f64) -> Option<f64> {
    let total = current + extra;
    total.is_finite().then_some(total)
}

/// Format an amount for display: rounded, no exponent, never "-0"
pub fn format_amount(value: f64) -> String {
    let rounded = (value * DISPLAY_PRECISION).round() / DISPLAY_PRECISION;
    let shown = if rounded.is_finite() { rounded } else { value };
    if shown == 0.0 {
        return "0".to_string();
    }
    shown.to_string()
}

fn finite(value: f64, rest: &str) -> Option<(f64, &str)> {
    value.is_finite().then_some((value, rest))
}

/// Scan `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`
fn scan_decimal(s: &str) -> Option<(f64, &str, bool)> {
    let bytes = s.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut is_integer = true;
    if i < bytes.len() && bytes[i] == b'.' {
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        let frac_digits = j - i - 1;
        if int_digits > 0 || frac_digits > 0 {
            i = j;
            is_integer = false;
        }
    }

    if int_digits == 0 && is_integer {
        return None;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
            is_integer = false;
        }
    }

    let value: f64 = s[..i].parse().ok()?;
    Some((value, &s[i..], is_integer))
}

fn scan_integer(s: &str) -> Option<(f64, &str)> {
    let end = s
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let value: f64 = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_amounts_refuses_overflow() {
        assert_eq!(add_amounts(1.5, 2.0), Some(3.5));
        assert_eq!(add_amounts(1e308, 1e308), None);
        assert_eq!(add_amounts(-1e308, -1e308), None);
    }

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_quantity("2"), Some(2.0));
        assert_eq!(parse_quantity(" 1.5 "), Some(1.5));
        assert_eq!(parse_quantity(".5"), Some(0.5));
        assert_eq!(parse_quantity("-3"), Some(-3.0));
        assert_eq!(parse_quantity("1e2"), Some(100.0));
    }

    #[test]
    fn test_parse_leading_number_ignores_trailing_text() {
        assert_eq!(parse_quantity("2 cups"), Some(2.0));
        assert_eq!(parse_quantity("3cm piece"), Some(3.0));
        assert_eq!(parse_quantity("2e"), Some(2.0));
    }

    #[test]
    fn test_parse_fractions() {
        assert_eq!(parse_quantity("1/2"), Some(0.5));
        assert_eq!(parse_quantity("1 1/2 cups"), Some(1.5));
        assert_eq!(parse_quantity("3/4 tsp"), Some(0.75));
        assert_eq!(parse_quantity("1/0"), Some(1.0));
    }

    #[test]
    fn test_parse_rejects_non_numbers() {
        assert_eq!(parse_quantity("abc"), None);
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("   "), None);
        assert_eq!(parse_quantity("pinch"), None);
        assert_eq!(parse_quantity("inf"), None);
        assert_eq!(parse_quantity("NaN"), None);
        assert_eq!(parse_quantity("."), None);
        assert_eq!(parse_quantity("1e999"), None);
    }

    #[test]
    fn test_leading_amount_returns_remainder() {
        assert_eq!(leading_amount("3 cup"), Some((3.0, " cup")));
        assert_eq!(leading_amount("1 1/2 tbsp"), Some((1.5, " tbsp")));
        assert_eq!(leading_amount("4"), Some((4.0, "")));
        assert_eq!(leading_amount("a few"), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(3.0), "3");
        assert_eq!(format_amount(0.5), "0.5");
        assert_eq!(format_amount(0.1 + 0.2), "0.3");
        assert_eq!(format_amount(-0.0), "0");
        assert_eq!(format_amount(1.0 / 3.0), "0.333333");
    }
}
