use profilesync_shared::constants::{MAX_DISPLAY_NAME_LENGTH, MIN_PASSWORD_LENGTH};
use profilesync_shared::error::AuthError;

/// Display-name policy of the local identity backend. The name is checked as
/// given: at most 64 characters and no control characters.
pub fn check_display_name(name: &str) -> Result<(), AuthError> {
    if name.chars().count() > MAX_DISPLAY_NAME_LENGTH
        || name.chars().any(|c| c.is_control())
    {
        return Err(AuthError::new("invalid-display-name"));
    }
    Ok(())
}

/// Normalize an email address, classifying malformed input as `invalid-email`.
pub fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim();
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(AuthError::new("invalid-email"));
    }
    if !parts[1].contains('.') || email.chars().any(|c| c.is_whitespace()) {
        return Err(AuthError::new("invalid-email"));
    }
    Ok(email.to_lowercase())
}

/// Reject passwords the identity backend considers too weak.
pub fn check_password_strength(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::new("weak-password"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_display_name_accepts_name_as_given() {
        assert!(check_display_name("Alice").is_ok());
        assert!(check_display_name("alice ").is_ok());
        assert!(check_display_name(&"a".repeat(64)).is_ok());
    }

    #[test]
    fn check_display_name_rejects_over_64_chars() {
        assert_eq!(
            check_display_name(&"a".repeat(65)).unwrap_err().cause,
            "invalid-display-name"
        );
    }

    #[test]
    fn check_display_name_rejects_control_characters() {
        assert!(check_display_name("Alice\x00Bob").is_err());
        assert!(check_display_name("Alice\nBob").is_err());
    }

    #[test]
    fn check_display_name_counts_chars_not_bytes() {
        assert!(check_display_name(&"\u{4e00}".repeat(64)).is_ok());
        assert!(check_display_name(&"\u{4e00}".repeat(65)).is_err());
    }

    #[test]
    fn normalize_email_lowercases_and_trims() {
        assert_eq!(
            normalize_email("  Alice@Example.COM ").unwrap(),
            "alice@example.com"
        );
    }

    #[test]
    fn normalize_email_rejects_malformed() {
        for bad in ["", "alice", "@example.com", "alice@", "alice@example", "a@b@c.com", "a b@c.com"] {
            assert_eq!(
                normalize_email(bad).unwrap_err().cause,
                "invalid-email",
                "{bad}"
            );
        }
    }

    #[test]
    fn check_password_strength_rejects_short() {
        assert_eq!(
            check_password_strength("12345").unwrap_err().cause,
            "weak-password"
        );
    }

    #[test]
    fn check_password_strength_accepts_minimum_length() {
        assert!(check_password_strength("123456").is_ok());
    }
}
