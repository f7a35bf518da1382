use crate::error::{AppError, Result};
use crate::validation::auth::validate_email;

/// Validates a public membership application payload.
pub fn validate_application(
    full_name: &str,
    email: &str,
    phone: Option<&str>,
    fiscal_code: Option<&str>,
) -> Result<()> {
    if full_name.trim().is_empty() || full_name.len() > 255 {
        return Err(AppError::Validation("Name cannot be empty".to_string()));
    }

    validate_email(email)?;

    if let Some(phone) = phone {
        let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
        if !(6..=20).contains(&digits)
            || !phone.chars().all(|c| c.is_ascii_digit() || c == '+' || c == ' ')
        {
            return Err(AppError::Validation("Invalid phone number".to_string()));
        }
    }

    if let Some(code) = fiscal_code {
        // Italian codice fiscale: 16 alphanumeric characters.
        if code.len() != 16 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::Validation("Invalid fiscal code".to_string()));
        }
    }

    Ok(())
}

/// Validates a public contact message payload.
pub fn validate_contact_message(name: &str, email: &str, body: &str) -> Result<()> {
    if name.trim().is_empty() || name.len() > 255 {
        return Err(AppError::Validation("Name cannot be empty".to_string()));
    }

    validate_email(email)?;

    if body.trim().is_empty() {
        return Err(AppError::Validation("Message cannot be empty".to_string()));
    }
    if body.len() > 10_000 {
        return Err(AppError::Validation("Message is too long".to_string()));
    }

    Ok(())
}
