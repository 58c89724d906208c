//! Last-line checks applied before rows are written. Request-level,
//! field-by-field validation happens in the service crate.

use crate::errors::ModelError;

pub const MAX_EMAIL_LEN: usize = 254;

/// Trim and lower-case an address. Uniqueness is enforced on this form.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Structural address check: one `@`, non-empty local part, a dotted
/// domain without empty labels, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else { return false };
    if local.is_empty() || local.len() > 64 || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|l| !l.is_empty() && !l.starts_with('-') && !l.ends_with('-'))
        && labels.last().is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ModelError::Validation("invalid email".into()))
    }
}

pub fn validate_required(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelError::Validation(format!("{field} required")));
    }
    if trimmed.chars().count() > max {
        return Err(ModelError::Validation(format!("{field} longer than {max} characters")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_valid_email("investor@fragma.io"));
        assert!(is_valid_email("first.last+news@mail.example.co.uk"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "plain", "@fragma.io", "a@", "a@b", "a b@c.io", "a@@c.io", "a@c..io", "a@-c.io", "a@c.i0"] {
            assert!(!is_valid_email(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_email("  Jane.Doe@Fragma.IO "), "jane.doe@fragma.io");
    }

    #[test]
    fn required_checks_blank_and_length() {
        assert!(validate_required("title", "  ", 10).is_err());
        assert!(validate_required("title", "abcdefghijk", 10).is_err());
        assert!(validate_required("title", "ok", 10).is_ok());
    }
}
