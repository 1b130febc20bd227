//! Numeric string formatting shared by variables and builtins.

/// Format a float with six decimal places, then strip insignificant
/// trailing zeros and any trailing decimal point: `5.400000` becomes
/// `5.4`, `20.000000` becomes `20`.
pub(crate) fn format_number(x: f64) -> String {
    if !x.is_finite() {
        return x.to_string();
    }
    strip_zeros(format!("{x:.6}"))
}

/// Strip trailing zeros after a decimal point, and the point itself if
/// nothing significant remains.
pub(crate) fn strip_zeros(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

/// Whether `s` is a plain decimal number: optional leading sign, digits,
/// at most one decimal point.
pub(crate) fn is_number(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() {
        return false;
    }
    let mut dot_seen = false;
    let mut digit_seen = false;
    for c in digits.chars() {
        match c {
            '.' if dot_seen => return false,
            '.' => dot_seen = true,
            '0'..='9' => digit_seen = true,
            _ => return false,
        }
    }
    digit_seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_strips_trailing_zeros() {
        assert_eq!(format_number(20.0), "20");
        assert_eq!(format_number(5.4), "5.4");
        assert_eq!(format_number(-3.25), "-3.25");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn format_keeps_infinities() {
        assert_eq!(format_number(f64::INFINITY), "inf");
    }

    #[test]
    fn number_detection() {
        assert!(is_number("3.14"));
        assert!(is_number("+782"));
        assert!(is_number("-0.0"));
        assert!(!is_number("tree"));
        assert!(!is_number("42 skidoo"));
        assert!(!is_number("1.2.3"));
        assert!(!is_number(""));
        assert!(!is_number("+"));
    }
}
