//! Payload validation
//!
//! Validators are pluggable collaborators that run before any store round
//! trip. A failed validation yields a [`ValidationReport`] whose first
//! detail becomes the caller-facing message.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::model::{CreatePostInput, CreateUserInput, UpdatePostInput, UpdateUserInput};

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("valid email regex")
    })
}

/// One failed rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDetail {
    /// Payload field the rule applies to
    pub path: String,
    /// Human-readable description of the failed rule
    pub message: String,
}

/// Outcome of a failed validation, rules in evaluation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub details: Vec<ValidationDetail>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report with a single rule failure
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        let mut report = Self::new();
        report.push(path, message);
        report
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.details.push(ValidationDetail {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    pub fn first_message(&self) -> Option<&str> {
        self.details.first().map(|d| d.message.as_str())
    }

    /// `Ok` when no rule failed
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.details.iter().map(|d| d.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Validator collaborator for one payload type
pub trait Validator<T>: Send + Sync {
    /// # Errors
    ///
    /// Returns the failed rules when the payload is rejected.
    fn validate(&self, payload: &T) -> Result<(), ValidationReport>;
}

/// Default field rules for the gateway payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

fn require(report: &mut ValidationReport, path: &str, value: &str) {
    if value.trim().is_empty() {
        report.push(path, format!("\"{}\" is not allowed to be empty", path));
    }
}

fn optional_non_empty(report: &mut ValidationReport, path: &str, value: Option<&str>) {
    if let Some(value) = value {
        require(report, path, value);
    }
}

fn email(report: &mut ValidationReport, path: &str, value: &str) {
    if !value.trim().is_empty() && !email_re().is_match(value) {
        report.push(path, format!("\"{}\" must be a valid email", path));
    }
}

impl Validator<CreateUserInput> for SchemaValidator {
    fn validate(&self, payload: &CreateUserInput) -> Result<(), ValidationReport> {
        let mut report = ValidationReport::new();
        require(&mut report, "username", &payload.username);
        require(&mut report, "email", &payload.email);
        email(&mut report, "email", &payload.email);
        optional_non_empty(&mut report, "fullName", payload.full_name.as_deref());
        report.into_result()
    }
}

impl Validator<UpdateUserInput> for SchemaValidator {
    fn validate(&self, payload: &UpdateUserInput) -> Result<(), ValidationReport> {
        let mut report = ValidationReport::new();
        optional_non_empty(&mut report, "username", payload.username.as_deref());
        if let Some(value) = payload.email.as_deref() {
            require(&mut report, "email", value);
            email(&mut report, "email", value);
        }
        optional_non_empty(&mut report, "fullName", payload.full_name.as_deref());
        report.into_result()
    }
}

impl Validator<CreatePostInput> for SchemaValidator {
    fn validate(&self, payload: &CreatePostInput) -> Result<(), ValidationReport> {
        let mut report = ValidationReport::new();
        require(&mut report, "title", &payload.title);
        require(&mut report, "content", &payload.content);
        require(&mut report, "authorId", &payload.author_id);
        report.into_result()
    }
}

impl Validator<UpdatePostInput> for SchemaValidator {
    fn validate(&self, payload: &UpdatePostInput) -> Result<(), ValidationReport> {
        let mut report = ValidationReport::new();
        optional_non_empty(&mut report, "title", payload.title.as_deref());
        optional_non_empty(&mut report, "content", payload.content.as_deref());
        report.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_user(username: &str, email: &str) -> CreateUserInput {
        CreateUserInput {
            username: username.into(),
            email: email.into(),
            full_name: None,
        }
    }

    #[test]
    fn test_valid_create_user_passes() {
        assert!(SchemaValidator
            .validate(&create_user("ada", "ada@x.io"))
            .is_ok());
    }

    #[test]
    fn test_bad_email_rejected() {
        for bad in ["ada", "ada@", "@x.io", "ada@x", "a da@x.io", "ada@@x.io"] {
            let report = SchemaValidator
                .validate(&create_user("ada", bad))
                .unwrap_err();
            assert_eq!(
                report.first_message(),
                Some("\"email\" must be a valid email"),
                "accepted {bad}"
            );
        }
    }

    #[test]
    fn test_first_rule_reported_first() {
        let report = SchemaValidator.validate(&create_user("", "")).unwrap_err();
        assert_eq!(report.details.len(), 2);
        assert_eq!(
            report.first_message(),
            Some("\"username\" is not allowed to be empty")
        );
    }

    #[test]
    fn test_empty_full_name_rejected() {
        let mut input = create_user("ada", "ada@x.io");
        input.full_name = Some("  ".into());
        let report = SchemaValidator.validate(&input).unwrap_err();
        assert_eq!(report.details[0].path, "fullName");
    }

    #[test]
    fn test_update_user_checks_only_supplied_fields() {
        let ok = UpdateUserInput {
            full_name: Some("Ada".into()),
            ..Default::default()
        };
        assert!(SchemaValidator.validate(&ok).is_ok());

        let bad = UpdateUserInput {
            email: Some("nope".into()),
            ..Default::default()
        };
        assert!(SchemaValidator.validate(&bad).is_err());
    }

    #[test]
    fn test_create_post_requires_author() {
        let input = CreatePostInput {
            title: "t".into(),
            content: "c".into(),
            author_id: String::new(),
        };
        let report = SchemaValidator.validate(&input).unwrap_err();
        assert_eq!(report.details[0].path, "authorId");
    }

    #[test]
    fn test_report_display_joins_messages() {
        let mut report = ValidationReport::single("a", "first");
        report.push("b", "second");
        assert_eq!(report.to_string(), "first; second");
    }
}
