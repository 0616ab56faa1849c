//! Field validation shared by the form endpoints

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FieldErrors;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]{3,30}$").expect("valid username regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_FULL_NAME_LEN: usize = 100;
pub const MIN_CONTACT_MESSAGE_LEN: usize = 10;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// At least 8 characters, one letter and one digit
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Trimmed value, `None` when absent or blank
pub fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Record `"<label> is required"` when blank; returns the trimmed value
pub fn require(
    errors: &mut FieldErrors,
    field: &str,
    label: &str,
    value: &Option<String>,
) -> String {
    match trimmed(value) {
        Some(v) => v,
        None => {
            errors.add(field, format!("{} is required", label));
            String::new()
        }
    }
}

pub fn check_email(errors: &mut FieldErrors, value: &Option<String>) -> String {
    let email = require(errors, "email", "Email", value);
    if !email.is_empty() && !is_valid_email(&email) {
        errors.add("email", "Please enter a valid email address");
    }
    email
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usernames() {
        assert!(is_valid_username("dj_nova"));
        assert!(is_valid_username("abc"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("émile"));
        assert!(!is_valid_username(&"x".repeat(31)));
    }

    #[test]
    fn test_emails() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("@c.de"));
    }

    #[test]
    fn test_passwords() {
        assert!(is_strong_password("abcdefg1"));
        assert!(!is_strong_password("abcdefgh"));
        assert!(!is_strong_password("12345678"));
        assert!(!is_strong_password("abc12"));
    }

    #[test]
    fn test_require_records_once() {
        let mut errors = FieldErrors::new();
        assert_eq!(require(&mut errors, "name", "Name", &Some("  ".into())), "");
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(check_email(&mut errors, &Some("nope".into())), "nope");
        assert_eq!(errors.get("email"), Some("Please enter a valid email address"));
    }
}
