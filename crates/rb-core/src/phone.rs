//! Phone numbers are stored as bare digits and only formatted for display.

/// Remove everything that is not an ASCII digit.
pub fn strip_phone(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format as `XXX-XXX-XXXX`. Partial input is formatted as far as it goes;
/// digits past the tenth are dropped.
pub fn format_phone(value: &str) -> String {
    let digits = strip_phone(value);
    match digits.len() {
        0..=3 => digits,
        4..=6 => format!("{}-{}", &digits[..3], &digits[3..]),
        n => {
            let end = n.min(10);
            format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..end])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_keeps_digits_only() {
        assert_eq!(strip_phone("050-371 1137"), "0503711137");
        assert_eq!(strip_phone("(+972) 50"), "97250");
        assert_eq!(strip_phone("--"), "");
    }

    #[test]
    fn format_full_number() {
        assert_eq!(format_phone("0503711137"), "050-371-1137");
        assert_eq!(format_phone("050-371-1137"), "050-371-1137");
    }

    #[test]
    fn format_partial_numbers() {
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone("05"), "05");
        assert_eq!(format_phone("050"), "050");
        assert_eq!(format_phone("0503"), "050-3");
        assert_eq!(format_phone("050371"), "050-371");
        assert_eq!(format_phone("0503711"), "050-371-1");
    }

    #[test]
    fn format_drops_extra_digits() {
        assert_eq!(format_phone("050371113799"), "050-371-1137");
    }
}
