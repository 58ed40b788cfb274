//! Decoding of raw contact-form bodies into [`NewContactRequest`].
//!
//! The decoder never panics and never returns a partially filled record:
//! either every field passes, or every violation is reported.

use email_address::{EmailAddress, Options};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::db::NewContactRequest;

pub const NAME_MAX_CHARS: usize = 120;
pub const WHATSAPP_MAX_CHARS: usize = 32;
pub const MESSAGE_MAX_CHARS: usize = 2000;

/// Bare `local@domain.tld` only: no display name, no IP literal, and the
/// domain must have at least two labels.
fn email_options() -> Options {
    Options::default()
        .without_display_text()
        .without_domain_literal()
        .with_minimum_sub_domains(2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Violation {
    Required,
    TooLong { max: usize },
    InvalidFormat,
    InvalidType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    #[serde(flatten)]
    pub violation: Violation,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &'static str, violation: Violation) -> Self {
        let message = match violation {
            Violation::Required => format!("{field} is required"),
            Violation::TooLong { max } => format!("{field} must be at most {max} characters"),
            Violation::InvalidFormat => format!("{field} is not a valid email address"),
            Violation::InvalidType => format!("{field} must be a string"),
        };
        Self {
            field,
            violation,
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} invalid field(s)", .violations.len())]
pub struct ValidationErrors {
    pub violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// True when at least one of the mandatory fields is missing.
    pub fn missing_required(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.violation == Violation::Required)
    }

    pub fn has(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

/// Validate and normalize a contact submission.
pub fn validate_contact(body: &Value) -> Result<NewContactRequest, ValidationErrors> {
    let empty = Map::new();
    let mut violations = Vec::new();

    let fields = match body {
        Value::Object(map) => map,
        _ => {
            violations.push(FieldViolation::new("body", Violation::InvalidType));
            &empty
        }
    };

    let name = required_text(fields, "name", &mut violations);
    if let Some(name) = &name {
        check_length("name", name, NAME_MAX_CHARS, &mut violations);
    }

    let email = required_text(fields, "email", &mut violations).map(|e| e.to_lowercase());
    if let Some(email) = &email {
        if EmailAddress::parse_with_options(email, email_options()).is_err() {
            violations.push(FieldViolation::new("email", Violation::InvalidFormat));
        }
    }

    let whatsapp = optional_text(fields, "whatsapp", &mut violations);
    check_length("whatsapp", &whatsapp, WHATSAPP_MAX_CHARS, &mut violations);

    let message = optional_text(fields, "message", &mut violations);
    check_length("message", &message, MESSAGE_MAX_CHARS, &mut violations);

    match (name, email) {
        (Some(name), Some(email)) if violations.is_empty() => Ok(NewContactRequest {
            name,
            email,
            whatsapp,
            message,
        }),
        _ => Err(ValidationErrors { violations }),
    }
}

/// Trimmed string value, or `None` (with a violation recorded) when missing,
/// blank or not a string.
fn required_text(
    fields: &Map<String, Value>,
    field: &'static str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match fields.get(field) {
        None | Some(Value::Null) => {
            violations.push(FieldViolation::new(field, Violation::Required));
            None
        }
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                violations.push(FieldViolation::new(field, Violation::Required));
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(_) => {
            violations.push(FieldViolation::new(field, Violation::InvalidType));
            None
        }
    }
}

/// Trimmed string value; missing and null both read as empty.
fn optional_text(
    fields: &Map<String, Value>,
    field: &'static str,
    violations: &mut Vec<FieldViolation>,
) -> String {
    match fields.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(_) => {
            violations.push(FieldViolation::new(field, Violation::InvalidType));
            String::new()
        }
    }
}

fn check_length(
    field: &'static str,
    value: &str,
    max: usize,
    violations: &mut Vec<FieldViolation>,
) {
    if value.chars().count() > max {
        violations.push(FieldViolation::new(field, Violation::TooLong { max }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trims_and_lowercases() {
        let record = validate_contact(&json!({
            "name": "  Ada Lovelace ",
            "email": " Ada@Example.COM ",
            "whatsapp": " +44 20 7946 0000 ",
            "message": "\n Need a website \n",
        }))
        .unwrap();

        assert_eq!(
            record,
            NewContactRequest {
                name: "Ada Lovelace".into(),
                email: "ada@example.com".into(),
                whatsapp: "+44 20 7946 0000".into(),
                message: "Need a website".into(),
            }
        );
    }

    #[test]
    fn optional_fields_may_be_absent_or_empty() {
        let record = validate_contact(&json!({
            "name": "Ada",
            "email": "ada@example.com",
            "whatsapp": "",
            "message": null,
        }))
        .unwrap();

        assert_eq!(record.whatsapp, "");
        assert_eq!(record.message, "");
    }

    #[test]
    fn blank_name_is_required() {
        let err = validate_contact(&json!({"name": "   ", "email": "ada@example.com"})).unwrap_err();
        assert!(err.missing_required());
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].field, "name");
    }

    #[test]
    fn malformed_email_is_a_format_violation() {
        let err = validate_contact(&json!({"name": "Ada", "email": "not-an-email"})).unwrap_err();
        assert!(!err.missing_required());
        assert_eq!(err.violations[0].violation, Violation::InvalidFormat);
    }

    #[test]
    fn every_violation_is_reported() {
        let err = validate_contact(&json!({
            "name": "x".repeat(NAME_MAX_CHARS + 1),
            "email": 42,
            "whatsapp": "1".repeat(WHATSAPP_MAX_CHARS + 1),
            "message": "m".repeat(MESSAGE_MAX_CHARS + 1),
        }))
        .unwrap_err();

        assert!(err.has("name"));
        assert!(err.has("email"));
        assert!(err.has("whatsapp"));
        assert!(err.has("message"));
        assert_eq!(err.violations.len(), 4);
    }

    #[test]
    fn length_limits_count_characters() {
        let name = "é".repeat(NAME_MAX_CHARS);
        assert!(validate_contact(&json!({"name": name, "email": "a@b.co"})).is_ok());
    }

    #[test]
    fn email_must_be_a_bare_address() {
        for email in ["Ada <ada@example.com>", "ada@[127.0.0.1]", "ada@localhost"] {
            let err = validate_contact(&json!({"name": "Ada", "email": email})).unwrap_err();
            assert_eq!(err.violations.len(), 1, "{email}");
            assert_eq!(err.violations[0].field, "email");
            assert_eq!(err.violations[0].violation, Violation::InvalidFormat);
        }
        assert!(validate_contact(&json!({"name": "Ada", "email": "ada@mail.example.co.uk"})).is_ok());
    }

    #[test]
    fn non_object_body() {
        let err = validate_contact(&json!(["Ada", "ada@example.com"])).unwrap_err();
        assert!(err.has("body"));
        assert!(err.has("name"));
        assert!(err.has("email"));
    }

    #[test]
    fn violation_serializes_with_reason_tag() {
        let v = FieldViolation::new("whatsapp", Violation::TooLong { max: 32 });
        let value = serde_json::to_value(&v).unwrap();
        assert_eq!(value["field"], "whatsapp");
        assert_eq!(value["reason"], "too_long");
        assert_eq!(value["max"], 32);
    }
}
