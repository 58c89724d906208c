//! Field-level request validation.
//!
//! Request DTOs keep every field optional so that a missing field becomes a
//! field error in the 400 body instead of a deserialization failure.

use common::types::FieldError;
use models::validation::{is_valid_email, normalize_email};

use crate::errors::ServiceError;

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.push(field, message);
        }
    }

    /// Trimmed value with `min..=max` characters.
    pub fn required(&mut self, field: &str, value: Option<&str>, min: usize, max: usize) -> Option<String> {
        let trimmed = value.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            self.push(field, "is required");
            return None;
        }
        let len = trimmed.chars().count();
        if len < min {
            self.push(field, format!("must be at least {min} characters"));
            return None;
        }
        if len > max {
            self.push(field, format!("must be at most {max} characters"));
            return None;
        }
        Some(trimmed.to_string())
    }

    /// Blank counts as absent.
    pub fn optional(&mut self, field: &str, value: Option<&str>, max: usize) -> Option<String> {
        let trimmed = value.map(str::trim).filter(|v| !v.is_empty())?;
        if trimmed.chars().count() > max {
            self.push(field, format!("must be at most {max} characters"));
            return None;
        }
        Some(trimmed.to_string())
    }

    /// Normalized (trimmed, lower-cased) address.
    pub fn email(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        let Some(raw) = value.filter(|v| !v.trim().is_empty()) else {
            self.push(field, "is required");
            return None;
        };
        let email = normalize_email(raw);
        if !is_valid_email(&email) {
            self.push(field, "must be a valid email address");
            return None;
        }
        Some(email)
    }

    /// Parse into one of the allowed string enums.
    pub fn one_of<T: std::str::FromStr>(&mut self, field: &str, value: Option<&str>, allowed: &[&str]) -> Option<T> {
        let raw = value.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            self.push(field, "is required");
            return None;
        }
        match raw.parse::<T>() {
            Ok(v) => Some(v),
            Err(_) => {
                self.push(field, format!("must be one of: {}", allowed.join(", ")));
                None
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Result<(), ServiceError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Invalid(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::status::InvestorType;

    #[test]
    fn collects_every_problem() {
        let mut v = Validator::new();
        assert!(v.required("fullName", Some(" "), 2, 10).is_none());
        assert!(v.email("email", Some("nope")).is_none());
        assert!(v.one_of::<InvestorType>("investorType", Some("whale"), &["individual"]).is_none());
        let Err(ServiceError::Invalid(errors)) = v.finish() else { panic!("expected invalid") };
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["fullName", "email", "investorType"]);
    }

    #[test]
    fn normalizes_accepted_values() {
        let mut v = Validator::new();
        assert_eq!(v.email("email", Some(" A@B.io ")).as_deref(), Some("a@b.io"));
        assert_eq!(v.optional("phone", Some("   "), 5), None);
        assert_eq!(v.required("name", Some(" Jo "), 2, 10).as_deref(), Some("Jo"));
        assert!(v.finish().is_ok());
    }

    #[test]
    fn length_bounds_use_characters() {
        let mut v = Validator::new();
        assert!(v.required("name", Some("ÅÅ"), 2, 2).is_some());
        assert!(v.optional("message", Some("abcdef"), 5).is_none());
        assert!(!v.is_ok());
    }
}
