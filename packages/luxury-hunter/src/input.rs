//! Lenient parsing of operator-typed numbers.
//!
//! Numeric form fields (exchange rate, price edits) never reject input. The
//! longest leading decimal number is used, so `"12.5€"` reads as 12.5, and
//! anything without one, or anything non-finite, reads as 0.

/// Parse user-typed numeric text, falling back to 0.
pub fn parse_numeric_input(raw: &str) -> f64 {
    let text = raw.trim_start();
    let end = numeric_prefix_len(text);

    match text[..end].parse::<f64>() {
        Ok(value) if value.is_finite() && value != 0.0 => value,
        _ => 0.0,
    }
}

/// Byte length of the leading `[+-]digits[.digits][e[+-]digits]` run.
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = match bytes.first() {
        Some(b'+' | b'-') => 1,
        _ => 0,
    };

    let int_end = digits_from(end);
    let mut digit_count = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        digit_count += frac_end - (end + 1);
        if digit_count > 0 {
            end = frac_end;
        }
    }

    if digit_count == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_numeric_input("37"), 37.0);
        assert_eq!(parse_numeric_input("36.5"), 36.5);
        assert_eq!(parse_numeric_input("  1015 "), 1015.0);
        assert_eq!(parse_numeric_input(".5"), 0.5);
        assert_eq!(parse_numeric_input("5."), 5.0);
        assert_eq!(parse_numeric_input("+12"), 12.0);
        assert_eq!(parse_numeric_input("-3"), -3.0);
        assert_eq!(parse_numeric_input("1e3"), 1000.0);
    }

    #[test]
    fn uses_leading_number() {
        assert_eq!(parse_numeric_input("12.5€"), 12.5);
        assert_eq!(parse_numeric_input("450 EUR"), 450.0);
        assert_eq!(parse_numeric_input("2e"), 2.0);
        assert_eq!(parse_numeric_input("1.2.3"), 1.2);
    }

    #[test]
    fn falls_back_to_zero() {
        assert_eq!(parse_numeric_input(""), 0.0);
        assert_eq!(parse_numeric_input("abc"), 0.0);
        assert_eq!(parse_numeric_input("€12"), 0.0);
        assert_eq!(parse_numeric_input("."), 0.0);
        assert_eq!(parse_numeric_input("-"), 0.0);
        assert_eq!(parse_numeric_input("1e999"), 0.0);
    }

    #[test]
    fn negative_zero_is_zero() {
        let value = parse_numeric_input("-0");
        assert_eq!(value, 0.0);
        assert!(value.is_sign_positive());
    }
}
