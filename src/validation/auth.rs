use crate::error::{AppError, Result};

/// Validates a login/registration email address. Shape check only, delivery
/// is confirmed elsewhere.
pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() || email.len() > 255 {
        return Err(AppError::Validation(
            "Email must be between 1 and 255 characters".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(AppError::Validation("Invalid email address".to_string()));
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }

    if email.chars().any(char::is_whitespace) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }

    Ok(())
}

/// Validates a password.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be at most 128 characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_emails() {
        assert!(validate_email("admin@club.test").is_ok());
        assert!(validate_email("a.b+c@utopia-society.it").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in ["", "no-at-sign", "@club.test", "admin@", "admin@nodot", "a b@club.test"] {
            assert!(validate_email(email).is_err(), "accepted {:?}", email);
        }
    }

    #[test]
    fn password_length_bounds() {
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password(&"x".repeat(128)).is_ok());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }
}
