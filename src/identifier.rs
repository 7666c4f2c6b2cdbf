use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

use crate::carrier::is_known_prefix;
use crate::issuer::IssueError;

pub const SUFFIX_LENGTHS: RangeInclusive<usize> = 7..=9;

fn shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| Regex::new(r"^62[0-9]{3}[0-9]{7,9}$").expect("static pattern compiles"))
}

/// Strips surrounding whitespace and one leading `+`, then checks the
/// result is a country code, operator code and 7 to 9 subscriber digits.
///
/// The operator code is not required to be in the prefix table, so numbers
/// dialled by hand on other carriers can still be recorded as used.
pub fn normalize(raw: &str) -> Result<String, IssueError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if shape().is_match(digits) {
        Ok(digits.to_string())
    } else {
        Err(IssueError::InvalidIdentifier(raw.to_string()))
    }
}

/// True when `phone` is something the generator itself could have produced.
pub fn is_issuable(phone: &str) -> bool {
    match (phone.get(..5), phone.get(5..)) {
        (Some(prefix), Some(suffix)) => {
            is_known_prefix(prefix)
                && SUFFIX_LENGTHS.contains(&suffix.len())
                && suffix.bytes().all(|b| b.is_ascii_digit())
        }
        _ => false,
    }
}

pub fn with_plus(phone: &str) -> String {
    format!("+{}", phone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_plus_and_whitespace() {
        assert_eq!(normalize(" +628121234567 ").unwrap(), "628121234567");
        assert_eq!(normalize("62812123456789").unwrap(), "62812123456789");
        assert_eq!(normalize("629991234567").unwrap(), "629991234567");
    }

    #[test]
    fn test_normalize_rejects_bad_shapes() {
        for raw in ["", "+", "08121234567", "62812123456", "628121234567890", "62812abc4567", "++628121234567"] {
            match normalize(raw) {
                Err(IssueError::InvalidIdentifier(value)) => assert_eq!(value, raw),
                other => panic!("expected InvalidIdentifier for {:?}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_is_issuable() {
        assert!(is_issuable("628121234567"));
        assert!(is_issuable("62851123456789"));
        assert!(!is_issuable("629991234567"));
        assert!(!is_issuable("62812123456"));
        assert!(!is_issuable("+628121234567"));
        assert!(!is_issuable("6281"));
    }

    #[test]
    fn test_with_plus() {
        assert_eq!(with_plus("628121234567"), "+628121234567");
    }
}
