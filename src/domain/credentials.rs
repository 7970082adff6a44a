//! Local validation of login and signup forms.
//!
//! Validation runs before any request leaves the plugin. A failed validation
//! becomes an error toast and the submit is never attempted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum accepted signup password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum length of a derived signup username.
const MIN_USERNAME_LENGTH: usize = 3;

/// Maximum length of a derived signup username.
const MAX_USERNAME_LENGTH: usize = 50;

/// Reasons a form is rejected before submission.
///
/// The `Display` text is the notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingField,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
}

/// Validated login request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Validated signup request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub password: String,
}

/// Tokens returned by a successful login or signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Checks the login form.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] when either field is blank.
pub fn validate_login(email: &str, password: &str) -> Result<LoginRequest, ValidationError> {
    if is_blank(email) || password.is_empty() {
        return Err(ValidationError::MissingField);
    }
    Ok(LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    })
}

/// Checks the signup form.
///
/// Rules are applied in order: blank fields, password mismatch, password length.
///
/// # Errors
///
/// Returns the first rule that fails.
///
/// ```
/// use kirjastokaveri::domain::credentials::{validate_signup, ValidationError};
///
/// let err = validate_signup("Aino", "aino@example.fi", "secret1", "secret2").unwrap_err();
/// assert_eq!(err, ValidationError::PasswordMismatch);
/// assert_eq!(err.to_string(), "Passwords do not match");
/// ```
pub fn validate_signup(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<SignupRequest, ValidationError> {
    if is_blank(name) || is_blank(email) || password.is_empty() || confirm_password.is_empty() {
        return Err(ValidationError::MissingField);
    }
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }

    let email = email.trim().to_string();
    Ok(SignupRequest {
        username: derive_username(name, &email),
        full_name: name.trim().to_string(),
        email,
        password: password.to_string(),
    })
}

/// Derives an account username from the display name.
///
/// Lower-cases, turns whitespace into `_` and drops anything outside
/// `[a-z0-9_-]`. Falls back to the email local part when the result is too
/// short, and pads with `_` as a last resort.
#[must_use]
pub fn derive_username(name: &str, email: &str) -> String {
    fn slug(raw: &str) -> String {
        raw.trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .take(MAX_USERNAME_LENGTH)
            .collect()
    }

    let from_name = slug(name);
    if from_name.len() >= MIN_USERNAME_LENGTH {
        return from_name;
    }

    let local_part = email.split('@').next().unwrap_or_default();
    let mut from_email = slug(local_part);
    while from_email.len() < MIN_USERNAME_LENGTH {
        from_email.push('_');
    }
    from_email
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_both_fields() {
        assert_eq!(validate_login("", "pw"), Err(ValidationError::MissingField));
        assert_eq!(validate_login("a@b.fi", ""), Err(ValidationError::MissingField));
        assert_eq!(validate_login("   ", "pw"), Err(ValidationError::MissingField));
    }

    #[test]
    fn login_trims_email_only() {
        let req = validate_login(" a@b.fi ", " pw ").unwrap();
        assert_eq!(req.email, "a@b.fi");
        assert_eq!(req.password, " pw ");
    }

    #[test]
    fn signup_mismatch_is_reported_before_length() {
        let err = validate_signup("Aino", "a@b.fi", "abc", "abd").unwrap_err();
        assert_eq!(err, ValidationError::PasswordMismatch);
    }

    #[test]
    fn signup_rejects_five_character_password() {
        let err = validate_signup("Aino", "a@b.fi", "abcde", "abcde").unwrap_err();
        assert_eq!(err, ValidationError::PasswordTooShort);
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
    }

    #[test]
    fn signup_accepts_valid_form() {
        let req = validate_signup("Aino Ackté", "aino@b.fi", "abcdef", "abcdef").unwrap();
        assert_eq!(req.full_name, "Aino Ackté");
        assert_eq!(req.username, "aino_ackt");
        assert_eq!(req.email, "aino@b.fi");
    }

    #[test]
    fn username_falls_back_to_email() {
        assert_eq!(derive_username("Li", "li.wei@example.com"), "liwei");
        assert_eq!(derive_username("Ö", "x@y"), "x__");
    }

    #[test]
    fn token_type_defaults_to_bearer() {
        let tokens: TokenPair =
            serde_json::from_str(r#"{"access_token":"a","refresh_token":"r"}"#).unwrap();
        assert_eq!(tokens.token_type, "bearer");
    }
}
