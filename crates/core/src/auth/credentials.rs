//! Registration and password-change rules.

use fintrack_shared::auth::MIN_PASSWORD_LEN;

use super::password::PasswordError;

/// Currency assigned when a user registers without one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Trims and lowercases an email for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Rejects passwords shorter than the minimum length.
///
/// # Errors
///
/// Returns `PasswordError::TooShort` when the password is too short.
pub fn validate_new_password(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// A validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Display name, trimmed.
    pub name: String,
    /// Normalized email.
    pub email: String,
    /// Plaintext password, length-checked.
    pub password: String,
    /// ISO currency code.
    pub currency: String,
}

impl Registration {
    /// Validates raw sign-up fields.
    ///
    /// # Errors
    ///
    /// Returns a message suitable for a 400 response.
    pub fn new(
        name: &str,
        email: &str,
        password: &str,
        currency: Option<&str>,
    ) -> Result<Self, String> {
        let name = name.trim();
        let email = normalize_email(email);
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err("Please provide name, email and password".to_string());
        }
        if !email.contains('@') {
            return Err("Please provide a valid email".to_string());
        }
        validate_new_password(password).map_err(|e| e.to_string())?;

        let currency = currency
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map_or_else(|| DEFAULT_CURRENCY.to_string(), str::to_uppercase);

        Ok(Self {
            name: name.to_string(),
            email,
            password: password.to_string(),
            currency,
        })
    }
}
