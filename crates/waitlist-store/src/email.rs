//! Email normalization and syntax checks.

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest address accepted, per RFC 5321 path limits.
pub const MAX_EMAIL_LEN: usize = 254;

/// Normalize an email address for comparison and storage.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `localpart@domain.tld`: local part of letters, digits and `._%+-`;
/// domain of non-empty dot-separated labels of letters, digits and `-`;
/// final label at least two letters.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// Check that an address is non-empty, at most [`MAX_EMAIL_LEN`] bytes and
/// matches the `localpart@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= MAX_EMAIL_LEN && EMAIL_REGEX.is_match(email)
}
