use std::sync::LazyLock;

use regex::Regex;

// ASCII digits only, `\d` would also match other scripts
static LETTER_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)-([0-9]+)$").unwrap());
static OTHER_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)$").unwrap());

/// Range end of a letter dispatch number, `.../12-034` gives `34`.
pub fn parse_letter_number(dispatch_number: &str) -> Option<u64> {
    LETTER_NUMBER
        .captures(dispatch_number)
        .and_then(|caps| caps.get(2))
        .and_then(|m| m.as_str().parse().ok())
}

/// Trailing run of digits, `.../2024/057` gives `57`.
pub fn parse_other_number(dispatch_number: &str) -> Option<u64> {
    OTHER_NUMBER
        .captures(dispatch_number)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::{parse_letter_number, parse_other_number};

    #[test]
    fn test_letter() {
        assert_eq!(parse_letter_number("No.BHCP/2024/CAT/12-034"), Some(34));
        assert_eq!(parse_letter_number("X/1-5"), Some(5));
        assert_eq!(parse_letter_number("7-0"), Some(0));
    }

    #[test]
    fn test_letter_takes_last_pair() {
        assert_eq!(parse_letter_number("No.1-2/3-4"), Some(4));
        assert_eq!(parse_letter_number("1-2-3"), Some(3));
    }

    #[test]
    fn test_other() {
        assert_eq!(parse_other_number("No.BHCP/CAT/2024/057"), Some(57));
        assert_eq!(parse_other_number("12-034"), Some(34));
        assert_eq!(parse_other_number("8"), Some(8));
    }

    #[test]
    fn test_absent() {
        assert_eq!(parse_letter_number("no-trailing-number"), None);
        assert_eq!(parse_other_number("also-none"), None);
        assert_eq!(parse_letter_number("No.BHCP/CAT/2024/057"), None);
        assert_eq!(parse_letter_number(""), None);
        assert_eq!(parse_other_number(""), None);
    }

    #[test]
    fn test_no_normalization() {
        assert_eq!(parse_other_number("No/057 "), None);
        assert_eq!(parse_letter_number("12-034\n"), None);
        assert_eq!(parse_other_number("No/٣"), None);
    }

    #[test]
    fn test_overflow() {
        assert_eq!(parse_other_number("No/99999999999999999999999"), None);
        assert_eq!(parse_letter_number("1-99999999999999999999999"), None);
    }
}
