//! Intake validation for new leads.

/// Normalizes a phone number to digits plus an optional leading `+`.
/// Spaces, dashes, dots, and parentheses are dropped; anything else makes the
/// number invalid.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    for (i, c) in raw.trim().chars().enumerate() {
        match c {
            '+' if i == 0 => out.push('+'),
            '0'..='9' => out.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return None,
        }
    }
    let digits = out.chars().filter(|c| c.is_ascii_digit()).count();
    if (7..=15).contains(&digits) {
        Some(out)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeError {
    pub field: &'static str,
    pub message: String,
}

/// Validates the intake payload and returns the normalized phone.
pub fn validate_intake(name: &str, phone: &str) -> Result<String, IntakeError> {
    if name.trim().is_empty() {
        return Err(IntakeError {
            field: "name",
            message: "Lead name must not be empty".to_string(),
        });
    }
    normalize_phone(phone).ok_or_else(|| IntakeError {
        field: "phone",
        message: format!("'{phone}' is not a valid phone number"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_formatting() {
        assert_eq!(
            normalize_phone("+90 (532) 123-45-67").as_deref(),
            Some("+905321234567")
        );
        assert_eq!(normalize_phone("555.010.0199").as_deref(), Some("5550100199"));
    }

    #[test]
    fn test_normalize_plus_only_leading() {
        assert_eq!(normalize_phone("555+0100199"), None);
    }

    #[test]
    fn test_normalize_rejects_letters() {
        assert_eq!(normalize_phone("555-CALL-NOW"), None);
    }

    #[test]
    fn test_normalize_length_bounds() {
        assert_eq!(normalize_phone("123456"), None); // 6 digits, too short
        assert!(normalize_phone("1234567").is_some());
        assert_eq!(normalize_phone("1234567890123456"), None); // 16 digits
    }

    #[test]
    fn test_validate_empty_name() {
        let err = validate_intake("  ", "5550100199").unwrap_err();
        assert_eq!(err.field, "name");
    }

    #[test]
    fn test_validate_bad_phone() {
        let err = validate_intake("Acme", "not-a-phone").unwrap_err();
        assert_eq!(err.field, "phone");
    }

    #[test]
    fn test_validate_ok_returns_normalized() {
        assert_eq!(
            validate_intake("Acme", "+1 555 010 0199").unwrap(),
            "+15550100199"
        );
    }
}
