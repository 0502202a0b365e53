//! Input validation utilities

use crate::constants::MAX_CONTEST_NAME_LENGTH;

/// Interpret a checkbox-style form value as a boolean.
///
/// An absent field means unchecked. Returns `None` for values that are not
/// a recognized boolean encoding.
pub fn parse_checkbox(value: Option<&str>) -> Option<bool> {
    let Some(value) = value else {
        return Some(false);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Some(true),
        "" | "off" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Validate a contest name
pub fn validate_contest_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Contest name must not be empty");
    }
    if name.len() as u64 > MAX_CONTEST_NAME_LENGTH {
        return Err("Contest name is too long");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_checkbox_truthy() {
        assert_eq!(parse_checkbox(Some("on")), Some(true));
        assert_eq!(parse_checkbox(Some("true")), Some(true));
        assert_eq!(parse_checkbox(Some("1")), Some(true));
        assert_eq!(parse_checkbox(Some("Yes")), Some(true));
    }

    #[test]
    fn test_parse_checkbox_falsey() {
        assert_eq!(parse_checkbox(None), Some(false));
        assert_eq!(parse_checkbox(Some("")), Some(false));
        assert_eq!(parse_checkbox(Some("off")), Some(false));
        assert_eq!(parse_checkbox(Some("false")), Some(false));
        assert_eq!(parse_checkbox(Some("0")), Some(false));
    }

    #[test]
    fn test_parse_checkbox_unrecognized() {
        assert_eq!(parse_checkbox(Some("maybe")), None);
        assert_eq!(parse_checkbox(Some("2")), None);
    }

    #[test]
    fn test_validate_contest_name() {
        assert!(validate_contest_name("Spring 2024").is_ok());
        assert!(validate_contest_name("").is_err());
        assert!(validate_contest_name("   ").is_err());
        assert!(validate_contest_name(&"x".repeat(300)).is_err());
    }
}
